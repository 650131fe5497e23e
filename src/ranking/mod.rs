//! Priority rule composition for ranking demand.
//!
//! Rules are applied in order; a later rule is only consulted when every
//! earlier rule ties. Keys ([`RankKey`]) compare exactly: integer keys keep
//! full `i64` precision and float keys use a total order. Items that tie on every rule keep their input order,
//! so a ranking is a deterministic total order over the batch.
//!
//! The engine itself knows nothing about shipments or clusters. The
//! dispatch ranking (cluster ascending, priority score descending) is
//! built from two rules in [`crate::dispatch`].
//!
//! # References
//!
//! Dispatching rule composition: Pinedo (2016), "Scheduling: Theory,
//! Algorithms, and Systems"

mod engine;
mod types;

pub use engine::RuleEngine;
pub use types::{RankKey, RankingRule};
