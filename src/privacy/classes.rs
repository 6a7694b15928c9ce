use std::collections::BTreeMap;

use crate::types::QidValues;

/// Row indices grouped by identical QID tuple, in tuple order
pub fn equivalence_classes(rows: &[QidValues]) -> BTreeMap<&QidValues, Vec<usize>> {
    let mut classes: BTreeMap<&QidValues, Vec<usize>> = BTreeMap::new();
    for (idx, values) in rows.iter().enumerate() {
        classes.entry(values).or_default().push(idx);
    }
    classes
}

/// Rows belonging to a class with fewer than `k` members, ascending
pub fn violating_rows(rows: &[QidValues], k: usize) -> Vec<usize> {
    let mut violators: Vec<usize> = equivalence_classes(rows)
        .into_values()
        .filter(|members| members.len() < k)
        .flatten()
        .collect();
    violators.sort_unstable();
    violators
}

/// Class-size summary of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSummary {
    pub classes: usize,
    pub shortfall_classes: usize,
    pub violating_rows: usize,
    pub min_class_size: Option<usize>,
}

pub fn summarize(rows: &[QidValues], k: usize) -> ClassSummary {
    let classes = equivalence_classes(rows);
    let mut summary = ClassSummary {
        classes: classes.len(),
        ..ClassSummary::default()
    };
    for members in classes.values() {
        let size = members.len();
        if size < k {
            summary.shortfall_classes += 1;
            summary.violating_rows += size;
        }
        summary.min_class_size = Some(summary.min_class_size.map_or(size, |m| m.min(size)));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(age: &str, role: &str) -> QidValues {
        QidValues::new(age, "180-184", role, "EU")
    }

    #[test]
    fn test_equivalence_classes_group_identical_tuples() {
        let rows = vec![row("21-24", "GK"), row("25-29", "GK"), row("21-24", "GK")];
        let classes = equivalence_classes(&rows);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[&row("21-24", "GK")], vec![0, 2]);
        assert_eq!(classes[&row("25-29", "GK")], vec![1]);
    }

    #[test]
    fn test_violating_rows_below_k() {
        let rows = vec![
            row("21-24", "GK"),
            row("25-29", "GK"),
            row("21-24", "GK"),
            row("21-24", "GK"),
            row("40+", "DEF"),
        ];
        assert_eq!(violating_rows(&rows, 3), vec![1, 4]);
        assert_eq!(violating_rows(&rows, 1), Vec::<usize>::new());
    }

    #[test]
    fn test_class_of_exactly_k_is_not_violating() {
        let rows = vec![row("21-24", "GK"); 3];
        assert!(violating_rows(&rows, 3).is_empty());
    }

    #[test]
    fn test_summarize() {
        let rows = vec![row("21-24", "GK"), row("21-24", "GK"), row("40+", "DEF")];
        let summary = summarize(&rows, 2);
        assert_eq!(summary.classes, 2);
        assert_eq!(summary.shortfall_classes, 1);
        assert_eq!(summary.violating_rows, 1);
        assert_eq!(summary.min_class_size, Some(1));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], 3);
        assert_eq!(summary, ClassSummary::default());
        assert_eq!(summary.min_class_size, None);
    }
}
