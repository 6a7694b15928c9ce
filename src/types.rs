use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default minimum equivalence class size
pub const DEFAULT_K_ANONYMITY: usize = 3;

/// Default log-space spread of the multiplicative value noise
pub const DEFAULT_NOISE_SIGMA: f64 = 0.12;

/// Default run seed
pub const DEFAULT_SEED: u64 = 42;

/// Resolution the noisy value is rounded to
pub const NOISE_RESOLUTION: f64 = 100.0;

/// Hex characters kept from a SHA-256 pseudonym
pub const HASH_TOKEN_LEN: usize = 16;

/// Number of quasi-identifier columns
pub const QID_COUNT: usize = 4;

/// Quasi-identifying attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qid {
    Age,
    Height,
    Role,
    Region,
}

impl Qid {
    #[allow(dead_code)]
    pub const ALL: [Qid; QID_COUNT] = [Qid::Age, Qid::Height, Qid::Role, Qid::Region];

    /// Slot of this QID inside a `QidValues` tuple
    pub fn index(self) -> usize {
        match self {
            Qid::Age => 0,
            Qid::Height => 1,
            Qid::Role => 2,
            Qid::Region => 3,
        }
    }
}

impl fmt::Display for Qid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Qid::Age => "age",
            Qid::Height => "height",
            Qid::Role => "role",
            Qid::Region => "region",
        };
        f.write_str(name)
    }
}

impl FromStr for Qid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "age" | "age_bucket" => Ok(Qid::Age),
            "height" | "height_cm" | "height_bucket" => Ok(Qid::Height),
            "role" | "position" | "pos_group" => Ok(Qid::Role),
            "region" | "nationality" | "region_nat" => Ok(Qid::Region),
            other => Err(Error::Config(format!("unknown quasi-identifier '{}'", other))),
        }
    }
}

/// Current generalized value of every QID for one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QidValues([String; QID_COUNT]);

impl QidValues {
    pub fn new(age: &str, height: &str, role: &str, region: &str) -> Self {
        Self([
            age.to_string(),
            height.to_string(),
            role.to_string(),
            region.to_string(),
        ])
    }
}

impl Index<Qid> for QidValues {
    type Output = String;

    fn index(&self, qid: Qid) -> &String {
        &self.0[qid.index()]
    }
}

impl IndexMut<Qid> for QidValues {
    fn index_mut(&mut self, qid: Qid) -> &mut String {
        &mut self.0[qid.index()]
    }
}

/// Non-identifying attribute permuted inside each final equivalence class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleTarget {
    /// Utility score (pace)
    Pace,
    /// Noisy sensitive value
    MarketValue,
}

impl FromStr for ShuffleTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pace" | "utility" => Ok(ShuffleTarget::Pace),
            "market_value" | "value" | "market_value_eur_noisy" => Ok(ShuffleTarget::MarketValue),
            other => Err(Error::Config(format!("unknown shuffle target '{}'", other))),
        }
    }
}

/// How direct identifiers are replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PseudonymStrategy {
    /// Seeded random token per row position, no relation to the identifier
    Random,
    /// Truncated SHA-256 of salt + identifier, stable across runs
    Hash { salt: String },
}

/// Independent random streams derived from the run seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    Noise,
    Pseudonym,
    Shuffle,
}

/// Anonymization run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Minimum equivalence class size
    pub k: usize,

    /// Log-normal spread for value noise
    pub sigma: f64,

    /// Seed for every randomized component
    pub seed: u64,

    /// QIDs in the order they are escalated
    pub escalation_order: Vec<Qid>,

    /// Attributes shuffled within final classes
    pub shuffle_targets: Vec<ShuffleTarget>,

    /// Identifier replacement policy
    pub pseudonym: PseudonymStrategy,

    /// Overwrite the region of rows still violating after enforcement with the most common region
    pub fill_common_region: bool,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K_ANONYMITY,
            sigma: DEFAULT_NOISE_SIGMA,
            seed: DEFAULT_SEED,
            escalation_order: vec![Qid::Height, Qid::Age, Qid::Role, Qid::Region],
            shuffle_targets: vec![ShuffleTarget::Pace, ShuffleTarget::MarketValue],
            pseudonym: PseudonymStrategy::Random,
            fill_common_region: false,
        }
    }
}

impl AnonymizationConfig {
    /// Refuse to run with a configuration that weakens the guarantee
    pub fn validate(&self) -> Result<()> {
        if self.k < 1 {
            return Err(Error::Config("k must be at least 1".to_string()));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(Error::Config(format!(
                "sigma must be a finite non-negative number, got {}",
                self.sigma
            )));
        }
        if self.escalation_order.is_empty() {
            return Err(Error::Config("escalation order is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for qid in &self.escalation_order {
            if !seen.insert(*qid) {
                return Err(Error::Config(format!(
                    "quasi-identifier '{}' appears twice in escalation order",
                    qid
                )));
            }
        }
        Ok(())
    }

    /// Seed for one randomized component
    pub fn stream_seed(&self, stream: RngStream) -> u64 {
        let salt: u64 = match stream {
            RngStream::Noise => 0,
            RngStream::Pseudonym => 1,
            RngStream::Shuffle => 2,
        };
        self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// One validated input row
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub identifier: String,
    pub age: f64,
    pub height_cm: f64,
    pub nationality: String,
    pub position: String,
    pub pace: f64,
    pub market_value: f64,
}

/// One released row; field order is the output column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedRecord {
    pub player_id: String,
    pub age_bucket: String,
    pub height_bucket: String,
    pub pos_group: String,
    pub region_nat: String,
    pub market_value_eur_noisy: f64,
    pub pace: f64,
}

/// Rows of named string fields as delivered by a reader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" => Some(FileFormat::Excel),
            _ => None,
        }
    }
}

/// Outcome of one anonymization run, reported alongside the released table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Rows released
    pub rows: usize,

    /// Requested minimum class size
    pub k: usize,

    /// Escalation rounds used
    pub rounds: usize,

    /// Structural bound on rounds
    pub max_rounds: usize,

    /// Distinct QID tuples in the release
    pub equivalence_classes: usize,

    /// Rows left in classes smaller than k
    pub violating_rows: usize,

    /// Classes smaller than k
    pub shortfall_classes: usize,

    /// Smallest class size, absent for an empty table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_class_size: Option<usize>,

    /// Row-level coarsenings applied per QID
    pub escalations: BTreeMap<Qid, usize>,

    /// Rows whose region was replaced by the common-region fallback
    pub region_fallback_rows: usize,

    /// True when every class has at least k members
    pub soft_guarantee_met: bool,

    /// Linkage property of the released identifiers
    pub pseudonym_policy: String,
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, crate::error::Error>;
