//! Operation counters for [`WordTable`](crate::table::WordTable).
//!
//! Compiled only with the `metrics` feature. Recording, snapshotting and
//! exporting are split into separate traits (see [`traits`]).

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
