//! Application subsystems

pub mod orientation;

pub use orientation::{OrientationTask, ReadoutWatch, RunSummary};
