use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::Error;
use crate::types::{
    AnonymizationConfig, PseudonymStrategy, Qid, Result, ShuffleTarget, DEFAULT_K_ANONYMITY,
    DEFAULT_NOISE_SIGMA, DEFAULT_SEED,
};

/// Release player tables under soft k-anonymity
#[derive(Parser, Debug)]
#[command(name = "player-anonymizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log escalation rounds
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a player table
    Anonymize(AnonymizeArgs),
}

/// Identifier replacement policy
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PseudonymKind {
    /// Random token per row, unlinkable
    Random,
    /// Truncated salted SHA-256, stable across runs
    Hash,
}

#[derive(clap::Args, Debug)]
pub struct AnonymizeArgs {
    /// Input file path (.csv, .tsv, .xlsx)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output table path (.csv, .tsv)
    #[arg(short, long)]
    pub out: PathBuf,

    /// Metrics JSON path (stdout if not specified)
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Minimum equivalence class size
    #[arg(short, long, default_value_t = DEFAULT_K_ANONYMITY)]
    pub k: usize,

    /// Log-normal spread of the value noise
    #[arg(long, default_value_t = DEFAULT_NOISE_SIGMA)]
    pub sigma: f64,

    /// Seed for noise, pseudonyms and shuffling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// QIDs in escalation order
    #[arg(long, value_delimiter = ',', default_value = "height,age,role,region")]
    pub escalation_order: Vec<String>,

    /// Attributes shuffled within each equivalence class
    #[arg(long, value_delimiter = ',', default_value = "pace,market_value")]
    pub shuffle: Vec<String>,

    /// Identifier replacement policy
    #[arg(long, value_enum, default_value_t = PseudonymKind::Random)]
    pub pseudonym: PseudonymKind,

    /// Salt for hash pseudonyms
    #[arg(long, default_value = "")]
    pub salt: String,

    /// Give rows still violating after enforcement the most common region
    #[arg(long, default_value_t = false)]
    pub fill_common_region: bool,

    /// Workbook sheet to read
    #[arg(long)]
    pub sheet: Option<String>,

    /// Field delimiter for CSV input and output
    #[arg(long)]
    pub delimiter: Option<char>,
}

impl AnonymizeArgs {
    /// Build and validate the run configuration
    pub fn to_config(&self) -> Result<AnonymizationConfig> {
        let escalation_order = self
            .escalation_order
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Qid>())
            .collect::<Result<Vec<_>>>()?;
        let shuffle_targets = self
            .shuffle
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<ShuffleTarget>())
            .collect::<Result<Vec<_>>>()?;
        let pseudonym = match self.pseudonym {
            PseudonymKind::Random => PseudonymStrategy::Random,
            PseudonymKind::Hash => PseudonymStrategy::Hash {
                salt: self.salt.clone(),
            },
        };

        let config = AnonymizationConfig {
            k: self.k,
            sigma: self.sigma,
            seed: self.seed,
            escalation_order,
            shuffle_targets,
            pseudonym,
            fill_common_region: self.fill_common_region,
        };
        config.validate()?;
        Ok(config)
    }

    /// Delimiter as a single byte
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(Error::Config(format!("delimiter '{}' is not ASCII", c))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AnonymizeArgs {
        let mut argv = vec!["player-anonymizer", "anonymize", "-i", "in.csv", "-o", "out.csv"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Anonymize(args) => args,
        }
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let config = parse(&[]).to_config().unwrap();
        let defaults = AnonymizationConfig::default();
        assert_eq!(config.k, defaults.k);
        assert_eq!(config.sigma, defaults.sigma);
        assert_eq!(config.seed, defaults.seed);
        assert_eq!(config.escalation_order, defaults.escalation_order);
        assert_eq!(config.shuffle_targets, defaults.shuffle_targets);
        assert_eq!(config.pseudonym, PseudonymStrategy::Random);
    }

    #[test]
    fn test_custom_escalation_order() {
        let config = parse(&["--escalation-order", "region,age"]).to_config().unwrap();
        assert_eq!(config.escalation_order, vec![Qid::Region, Qid::Age]);
    }

    #[test]
    fn test_unknown_qid_fails_closed() {
        let args = parse(&["--escalation-order", "height,weight"]);
        assert!(matches!(args.to_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_k_fails_closed() {
        let args = parse(&["-k", "0"]);
        assert!(matches!(args.to_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_hash_pseudonym_with_salt() {
        let config = parse(&["--pseudonym", "hash", "--salt", "pepper"])
            .to_config()
            .unwrap();
        assert_eq!(
            config.pseudonym,
            PseudonymStrategy::Hash {
                salt: "pepper".to_string()
            }
        );
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(parse(&["--delimiter", ";"]).delimiter_byte().unwrap(), Some(b';'));
        assert_eq!(parse(&[]).delimiter_byte().unwrap(), None);
    }
}
