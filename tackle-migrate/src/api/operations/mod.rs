//! Tackle Operations Module
//!
//! This module provides a unified description of the REST calls the
//! migration issues against either Tackle instance.

pub mod operation;

pub use operation::{Operation, OperationResult};
