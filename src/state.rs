//! Processing state: the mutually-exclusive status of the current conversion.

use crate::config::Locale;
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

/// Progress marker set as soon as a file is selected.
pub const INITIAL_PROGRESS: u8 = 10;

/// Which of the four phases a [`ProcessingState`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    InFlight,
    Success,
    Error,
}

/// Status record of the conversion pipeline.
///
/// Only the constructors below produce values, so the fields never disagree:
/// `is_processing` implies no error, and an error implies `progress == 0`.
/// It serialises for reporting but cannot be read back:
///
/// ```rust,compile_fail
/// let state: documark::ProcessingState =
///     serde_json::from_str(r#"{"is_processing":true,"progress":10,"error":null}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingState {
    is_processing: bool,
    progress: u8,
    error: Option<ConversionError>,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self::idle()
    }
}

impl ProcessingState {
    pub fn idle() -> Self {
        Self {
            is_processing: false,
            progress: 0,
            error: None,
        }
    }

    pub fn in_flight() -> Self {
        Self {
            is_processing: true,
            progress: INITIAL_PROGRESS,
            error: None,
        }
    }

    pub fn succeeded() -> Self {
        Self {
            is_processing: false,
            progress: 100,
            error: None,
        }
    }

    pub fn failed(error: ConversionError) -> Self {
        Self {
            is_processing: false,
            progress: 0,
            error: Some(error),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Coarse percentage, 0–100.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn error(&self) -> Option<&ConversionError> {
        self.error.as_ref()
    }

    /// Localized message for the error slot, if any.
    pub fn error_message(&self, locale: Locale) -> Option<String> {
        self.error.as_ref().map(|e| e.user_message(locale))
    }

    pub fn phase(&self) -> Phase {
        match (self.is_processing, &self.error, self.progress) {
            (true, _, _) => Phase::InFlight,
            (false, Some(_), _) => Phase::Error,
            (false, None, 100) => Phase::Success,
            (false, None, _) => Phase::Idle,
        }
    }
}
