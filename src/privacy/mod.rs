pub mod bucketing;
pub mod classes;
pub mod enforcer;
pub mod hierarchy;
pub mod noise;
pub mod pseudonym;
pub mod shuffle;

pub use bucketing::bucketize;
pub use classes::{equivalence_classes, summarize};
pub use enforcer::{fill_common_region, KAnonymityEnforcer};
pub use noise::NoiseInjector;
pub use pseudonym::Pseudonymizer;
pub use shuffle::GroupShuffler;
