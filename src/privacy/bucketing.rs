use crate::types::{QidValues, RawRecord};

use super::hierarchy::{fine_age, fine_height, fine_region, fine_role};

/// Finest-grain QID values for a record
pub fn bucketize(record: &RawRecord) -> QidValues {
    QidValues::new(
        fine_age(record.age),
        fine_height(record.height_cm),
        &fine_role(&record.position),
        fine_region(&record.nationality),
    )
}
