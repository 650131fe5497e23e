//! Capacity-constrained allocation of demand units to finite resources.
//!
//! Two allocation flavours share one tabular ingestion layer:
//!
//! - **Dispatch** ([`dispatch`]): shipments are ranked by cluster and
//!   priority score, then greedily matched all-or-nothing to vehicles whose
//!   remaining mass and volume can take them. Doubly sensitive loads are
//!   restricted to specialised vehicles.
//! - **Zone allocation** ([`zone`]): a policy picks one warehouse zone per
//!   storage request and the zone takes as much as it can hold, with the
//!   shortfall reported.
//!
//! Supporting modules:
//!
//! - [`table`]: column-list / row-list batches with strict cell coercion.
//! - [`ranking`]: multi-rule stable ordering engine.
//! - [`resource`]: vehicle templates, pools and per-vehicle load tracking.
//! - [`error`]: batch-level error taxonomy.
//!
//! Pools and capacity maps are owned by a single run; nothing is shared
//! between runs, so independent batches may run concurrently (see
//! [`dispatch::DispatchRunner::run_many`] with the `parallel` feature).

pub mod dispatch;
pub mod error;
pub mod ranking;
pub mod resource;
pub mod table;
pub mod zone;

pub use error::AllocError;
