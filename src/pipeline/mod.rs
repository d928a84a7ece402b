//! Pipeline entry points.
//!
//! - `find_new`: diff a batch against the snapshot
//! - `Pipeline::run`: one fetch → extract → diff → save → notify pass

pub mod diff;
pub mod run;

pub use diff::{extend_snapshot, find_new};
pub use run::{Pipeline, Source, run_once};
