//! Capacity-bearing resources.
//!
//! A [`ResourcePool`] is built once per allocation run from an ordered
//! catalog of [`ResourceTemplate`]s, each replicated a fixed number of
//! times. Every [`Vehicle`] tracks two independent consumable capacities
//! (mass and volume) and a sticky `used` flag.
//!
//! Remaining capacity only ever decreases, and never below zero:
//! [`ResourcePool::try_consume`] checks both dimensions and decrements them
//! in one step, or leaves the vehicle untouched. The pool is owned by a
//! single run and mutated through `&mut`, so no two demands can claim the
//! same capacity.

mod pool;
mod types;

pub use pool::{PoolUtilization, ResourcePool};
pub use types::{PropertyClass, ResourceTemplate, Vehicle};
