//! Progress-callback trait for conversion lifecycle events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ViewerConfigBuilder::progress_callback`] to receive
//! events as a selection moves through reading, uploading and generation.
//!
//! Every event carries the selection's sequence number so an observer can
//! tell a stale conversion from the current one.
//!
//! # Example
//!
//! ```rust
//! use documark::{ConversionProgressCallback, ConversionStage, ViewerConfig};
//! use std::sync::Arc;
//!
//! struct LogStages;
//!
//! impl ConversionProgressCallback for LogStages {
//!     fn on_stage(&self, seq: u64, stage: ConversionStage) {
//!         eprintln!("#{seq}: {stage}");
//!     }
//! }
//!
//! let config = ViewerConfig::builder()
//!     .progress_callback(Arc::new(LogStages))
//!     .build()
//!     .unwrap();
//! ```

use crate::state::ProcessingState;
use std::fmt;
use std::sync::Arc;

/// Coarse steps of one conversion attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// Reading the selected file from disk.
    Reading,
    /// Preparing the request to the model.
    Initializing,
    /// Request sent; the model is analysing the document.
    Uploading,
    /// Response received; assembling the result.
    Generating,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reading => "Reading file…",
            Self::Initializing => "Initializing AI…",
            Self::Uploading => "Uploading and analysing document…",
            Self::Generating => "Generating result…",
        };
        f.write_str(s)
    }
}

/// Called by the controller as a selection is processed.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because a
/// pending conversion may be driven on any runtime thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// A file was selected and assigned sequence number `seq`.
    fn on_selection(&self, file_name: &str, seq: u64) {
        let _ = (file_name, seq);
    }

    /// Conversion `seq` entered `stage`.
    fn on_stage(&self, seq: u64, stage: ConversionStage) {
        let _ = (seq, stage);
    }

    /// Conversion `seq` landed; `state` is the resulting processing state.
    fn on_finished(&self, seq: u64, state: &ProcessingState) {
        let _ = (seq, state);
    }

    /// Conversion `seq` resolved after a newer selection and was dropped.
    fn on_discarded(&self, seq: u64) {
        let _ = seq;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ViewerConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
