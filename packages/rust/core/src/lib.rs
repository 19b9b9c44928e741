//! Pipeline orchestration for termdoc.
//!
//! Ties discovery, terminology checking, quality scoring and navigation
//! generation into the end-to-end workflows the CLI runs.

pub mod navigation;
pub mod output;
pub mod progress;
pub mod quality;
pub mod terminology;

pub use progress::{NoopProgress, ProgressReporter};
