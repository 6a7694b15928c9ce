//! Soft k-anonymity enforcement.
//!
//! Rows in classes smaller than k are escalated one hierarchy level at a time,
//! one QID at a time, following a fixed escalation order. Rows already in a
//! class of at least k never move. When every QID in the order is exhausted for
//! the remaining violators the shortfall is accepted and reported.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::types::{Qid, QidValues, QID_COUNT};

use super::classes::violating_rows;
use super::hierarchy::Hierarchy;

/// Rows escalated in one round
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrace {
    pub qid: Qid,
    pub escalated: Vec<usize>,
    pub violators_after: usize,
}

/// Result of an enforcement pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enforcement {
    pub rounds: usize,
    pub max_rounds: usize,
    /// Hierarchy level reached by each row, indexed by `Qid::index`
    pub levels: Vec<[usize; QID_COUNT]>,
    /// Rows still in classes smaller than k, ascending
    pub violators: Vec<usize>,
    pub escalations: BTreeMap<Qid, usize>,
    #[allow(dead_code)]
    pub trace: Vec<RoundTrace>,
}

/// Escalates generalization of violating rows until every class reaches k
#[derive(Debug, Clone)]
pub struct KAnonymityEnforcer {
    k: usize,
    order: Vec<Qid>,
}

impl KAnonymityEnforcer {
    pub fn new(k: usize, order: Vec<Qid>) -> Self {
        Self { k, order }
    }

    /// Upper bound on rounds: QIDs in the order times the deepest hierarchy
    pub fn max_rounds(&self) -> usize {
        let max_depth = self
            .order
            .iter()
            .map(|q| Hierarchy::for_qid(*q).depth())
            .max()
            .unwrap_or(0);
        self.order.len() * max_depth
    }

    /// Generalize `rows` in place
    pub fn enforce(&self, rows: &mut [QidValues]) -> Enforcement {
        let max_rounds = self.max_rounds();
        let mut outcome = Enforcement {
            max_rounds,
            levels: vec![[0; QID_COUNT]; rows.len()],
            ..Enforcement::default()
        };

        let mut violators = violating_rows(rows, self.k);
        let mut cursor = 0;

        while !violators.is_empty() && outcome.rounds < max_rounds {
            let Some(next) = self.next_escalation(cursor, &violators, &outcome.levels) else {
                break;
            };
            cursor = next;
            let qid = self.order[cursor];
            let hierarchy = Hierarchy::for_qid(qid);

            let mut escalated = Vec::new();
            for &idx in &violators {
                let level = &mut outcome.levels[idx][qid.index()];
                if let Some(coarser) = hierarchy.coarsen(*level, &rows[idx][qid]) {
                    rows[idx][qid] = coarser;
                    *level += 1;
                    escalated.push(idx);
                }
            }

            outcome.rounds += 1;
            *outcome.escalations.entry(qid).or_insert(0) += escalated.len();
            violators = violating_rows(rows, self.k);

            debug!(
                round = outcome.rounds,
                qid = %qid,
                escalated = escalated.len(),
                violators = violators.len(),
                "escalation round"
            );

            outcome.trace.push(RoundTrace {
                qid,
                escalated,
                violators_after: violators.len(),
            });
        }

        outcome.violators = violators;
        outcome
    }

    /// First position at or after `cursor` whose QID can still coarsen some violator
    fn next_escalation(
        &self,
        cursor: usize,
        violators: &[usize],
        levels: &[[usize; QID_COUNT]],
    ) -> Option<usize> {
        (cursor..self.order.len()).find(|&pos| {
            let qid = self.order[pos];
            let depth = Hierarchy::for_qid(qid).depth();
            violators.iter().any(|&idx| levels[idx][qid.index()] < depth)
        })
    }
}

/// Set the region of `violators` to the table's most common region.
/// Ties go to the lexicographically smallest region. Returns rows changed.
pub fn fill_common_region(rows: &mut [QidValues], violators: &[usize]) -> usize {
    if violators.is_empty() {
        return 0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for values in rows.iter() {
        *counts.entry(values[Qid::Region].as_str()).or_insert(0) += 1;
    }
    let common = counts
        .into_iter()
        .max_by(|(a_region, a_count), (b_region, b_count)| {
            a_count.cmp(b_count).then_with(|| b_region.cmp(a_region))
        })
        .map(|(region, _)| region.to_string());

    let Some(common) = common else {
        return 0;
    };

    let mut changed = 0;
    for &idx in violators {
        if rows[idx][Qid::Region] != common {
            rows[idx][Qid::Region] = common.clone();
            changed += 1;
        }
    }
    changed
}
