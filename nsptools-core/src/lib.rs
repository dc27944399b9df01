#![forbid(unsafe_code)]

pub mod error;
pub mod options;

pub mod naming;
pub mod progress;
pub mod source;

pub mod combine;
pub mod split;

// Re-exports: stable API surface
pub use combine::{CombineReport, Combiner};
pub use options::{CombineOptions, ExistingParts, SplitOptions};
pub use progress::ProgressSink;
pub use source::{PartFile, SourceFile};
pub use split::{SplitReport, Splitter};

pub const MIB: u64 = 1024 * 1024;
