//! Data migration from a Tackle 1 instance into a Tackle 2 hub
//!
//! An export run loads the destination's seed data, builds the entity graph
//! from the source and writes a snapshot. An import run checks the snapshot
//! against the destination and replays it. A clean run deletes what an
//! import created. The runs share nothing but the snapshot directory.

pub mod clean;
pub mod context;
pub mod error;
pub mod extract;
pub mod import;
pub mod preflight;
pub mod seed;
pub mod snapshot;
pub mod types;

pub use clean::Cleaner;
pub use context::{Collections, RunContext};
pub use extract::EntityGraphBuilder;
pub use import::Importer;
pub use preflight::PreflightChecker;
pub use seed::load_destination_index;
pub use snapshot::SnapshotStore;
