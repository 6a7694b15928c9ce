//! Generalization hierarchies for each quasi-identifier.
//!
//! Level 0 is the fine category produced by the `fine_*` functions. Every
//! further level is a total mapping from the previous level's domain to a
//! smaller one; values missing from a level's table take its fallback.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::Qid;

/// What a level does with a value absent from its table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Pass the value through unchanged
    Keep,
    /// Replace the value with a fixed label
    Constant(&'static str),
}

/// One coarsening step
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub table: &'static [(&'static str, &'static str)],
    pub fallback: Fallback,
}

impl Level {
    pub fn apply(&self, value: &str) -> String {
        match self.table.iter().find(|(from, _)| *from == value) {
            Some((_, to)) => (*to).to_string(),
            None => match self.fallback {
                Fallback::Keep => value.to_string(),
                Fallback::Constant(label) => label.to_string(),
            },
        }
    }
}

/// Ordered fine-to-coarse levels for one QID
#[derive(Debug)]
pub struct Hierarchy {
    #[allow(dead_code)]
    pub qid: Qid,
    pub levels: &'static [Level],
}

impl Hierarchy {
    pub fn for_qid(qid: Qid) -> &'static Hierarchy {
        match qid {
            Qid::Age => &AGE,
            Qid::Height => &HEIGHT,
            Qid::Role => &ROLE,
            Qid::Region => &REGION,
        }
    }

    /// Number of coarsening steps above the fine level
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Map a value at `level` to `level + 1`, or `None` when `level` is the top
    pub fn coarsen(&self, level: usize, value: &str) -> Option<String> {
        self.levels.get(level).map(|l| l.apply(value))
    }
}

/// Fine age buckets: upper bound (inclusive) and label
const AGE_BINS: &[(f64, &str)] = &[
    (20.0, "<=20"),
    (24.0, "21-24"),
    (29.0, "25-29"),
    (34.0, "30-34"),
    (40.0, "35-40"),
];
const AGE_TOP: &str = "40+";

const HEIGHT_BINS: &[(f64, &str)] = &[
    (170.0, "<170"),
    (175.0, "170-174"),
    (180.0, "175-179"),
    (185.0, "180-184"),
    (190.0, "185-189"),
];
const HEIGHT_TOP: &str = "190+";

const AGE_COARSE: &[(&str, &str)] = &[
    ("<=20", "<=24"),
    ("21-24", "<=24"),
    ("25-29", "25-34"),
    ("30-34", "25-34"),
    ("35-40", "35+"),
    ("40+", "35+"),
];

const HEIGHT_COARSE: &[(&str, &str)] = &[
    ("<170", "<=175"),
    ("170-174", "<=175"),
    ("175-179", "176-185"),
    ("180-184", "176-185"),
    ("185-189", ">=186"),
    ("190+", ">=186"),
];

const ROLE_GROUPS: &[(&str, &str)] = &[
    ("GK", "GK"),
    ("DEF", "OUTFIELD"),
    ("MID", "OUTFIELD"),
    ("FWD", "OUTFIELD"),
];

/// Region assigned to nationalities absent from the table
pub const REGION_OTHER: &str = "OTHER";

/// Single top-level region value
pub const REGION_GLOBAL: &str = "GLOBAL";

static AGE: Hierarchy = Hierarchy {
    qid: Qid::Age,
    levels: &[Level {
        table: AGE_COARSE,
        fallback: Fallback::Keep,
    }],
};

static HEIGHT: Hierarchy = Hierarchy {
    qid: Qid::Height,
    levels: &[Level {
        table: HEIGHT_COARSE,
        fallback: Fallback::Keep,
    }],
};

static ROLE: Hierarchy = Hierarchy {
    qid: Qid::Role,
    levels: &[Level {
        table: ROLE_GROUPS,
        fallback: Fallback::Constant("OUTFIELD"),
    }],
};

static REGION: Hierarchy = Hierarchy {
    qid: Qid::Region,
    levels: &[Level {
        table: &[],
        fallback: Fallback::Constant(REGION_GLOBAL),
    }],
};

static NATIONALITY_REGIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("brazil", "SA"),
        ("argentina", "SA"),
        ("uruguay", "SA"),
        ("colombia", "SA"),
        ("spain", "EU"),
        ("germany", "EU"),
        ("france", "EU"),
        ("italy", "EU"),
        ("portugal", "EU"),
        ("england", "EU"),
        ("netherlands", "EU"),
        ("usa", "NA"),
        ("united states", "NA"),
        ("mexico", "NA"),
        ("canada", "NA"),
        ("japan", "AS"),
        ("korea republic", "AS"),
        ("nigeria", "AF"),
        ("ghana", "AF"),
        ("senegal", "AF"),
    ]
    .into_iter()
    .collect()
});

fn bin_label(value: f64, bins: &[(f64, &'static str)], top: &'static str) -> &'static str {
    bins.iter()
        .find(|(upper, _)| value <= *upper)
        .map(|(_, label)| *label)
        .unwrap_or(top)
}

/// Fine age bucket; values below the first bound land in the lowest bin
pub fn fine_age(age: f64) -> &'static str {
    bin_label(age, AGE_BINS, AGE_TOP)
}

/// Fine height bucket in centimeters
pub fn fine_height(height_cm: f64) -> &'static str {
    bin_label(height_cm, HEIGHT_BINS, HEIGHT_TOP)
}

/// Region code for a nationality
pub fn fine_region(nationality: &str) -> &'static str {
    NATIONALITY_REGIONS
        .get(nationality.trim().to_lowercase().as_str())
        .copied()
        .unwrap_or(REGION_OTHER)
}

/// Normalized role code
pub fn fine_role(position: &str) -> String {
    position.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fine_age_boundaries() {
        assert_eq!(fine_age(0.0), "<=20");
        assert_eq!(fine_age(20.0), "<=20");
        assert_eq!(fine_age(20.5), "21-24");
        assert_eq!(fine_age(24.0), "21-24");
        assert_eq!(fine_age(25.0), "25-29");
        assert_eq!(fine_age(34.0), "30-34");
        assert_eq!(fine_age(40.0), "35-40");
        assert_eq!(fine_age(41.0), "40+");
    }

    #[test]
    fn test_fine_age_out_of_range_uses_extremal_bins() {
        assert_eq!(fine_age(-3.0), "<=20");
        assert_eq!(fine_age(150.0), "40+");
    }

    #[test]
    fn test_fine_height_boundaries() {
        assert_eq!(fine_height(150.0), "<170");
        assert_eq!(fine_height(170.0), "<170");
        assert_eq!(fine_height(171.0), "170-174");
        assert_eq!(fine_height(184.0), "180-184");
        assert_eq!(fine_height(190.0), "185-189");
        assert_eq!(fine_height(191.0), "190+");
        assert_eq!(fine_height(260.0), "190+");
    }

    #[test]
    fn test_fine_region() {
        assert_eq!(fine_region("Brazil"), "SA");
        assert_eq!(fine_region("  germany "), "EU");
        assert_eq!(fine_region("USA"), "NA");
        assert_eq!(fine_region("Japan"), "AS");
        assert_eq!(fine_region("Nigeria"), "AF");
        assert_eq!(fine_region("Atlantis"), REGION_OTHER);
    }

    #[test]
    fn test_fine_role_normalizes() {
        assert_eq!(fine_role(" gk "), "GK");
        assert_eq!(fine_role("Mid"), "MID");
    }

    #[test]
    fn test_every_fine_bucket_has_one_coarse_value() {
        let age = Hierarchy::for_qid(Qid::Age);
        for (_, label) in AGE_BINS {
            assert!(AGE_COARSE.iter().any(|(from, _)| from == label));
        }
        assert_eq!(age.coarsen(0, AGE_TOP).as_deref(), Some("35+"));

        let height = Hierarchy::for_qid(Qid::Height);
        for (_, label) in HEIGHT_BINS {
            assert!(HEIGHT_COARSE.iter().any(|(from, _)| from == label));
        }
        assert_eq!(height.coarsen(0, HEIGHT_TOP).as_deref(), Some(">=186"));
    }

    #[test]
    fn test_coarse_domains_are_three_way() {
        let mut ages: Vec<_> = AGE_COARSE.iter().map(|(_, to)| *to).collect();
        ages.dedup();
        assert_eq!(ages, vec!["<=24", "25-34", "35+"]);

        let mut heights: Vec<_> = HEIGHT_COARSE.iter().map(|(_, to)| *to).collect();
        heights.dedup();
        assert_eq!(heights, vec!["<=175", "176-185", ">=186"]);
    }

    #[test]
    fn test_role_coarsening() {
        let role = Hierarchy::for_qid(Qid::Role);
        assert_eq!(role.coarsen(0, "GK").as_deref(), Some("GK"));
        assert_eq!(role.coarsen(0, "DEF").as_deref(), Some("OUTFIELD"));
        assert_eq!(role.coarsen(0, "WINGBACK").as_deref(), Some("OUTFIELD"));
    }

    #[test]
    fn test_region_top_is_single_value() {
        let region = Hierarchy::for_qid(Qid::Region);
        assert_eq!(region.coarsen(0, "SA").as_deref(), Some(REGION_GLOBAL));
        assert_eq!(region.coarsen(0, REGION_OTHER).as_deref(), Some(REGION_GLOBAL));
    }

    #[test]
    fn test_coarsen_past_top_is_none() {
        for qid in Qid::ALL {
            let hierarchy = Hierarchy::for_qid(qid);
            assert_eq!(hierarchy.qid, qid);
            assert_eq!(hierarchy.depth(), 1);
            assert!(hierarchy.coarsen(hierarchy.depth(), "x").is_none());
        }
    }
}
