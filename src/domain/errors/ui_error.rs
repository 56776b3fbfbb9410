//! Widget contract violations and user input validation errors.

use thiserror::Error;

/// Programming-contract violations rejected when a widget or page is built.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum UiError {
    #[error("cycle item '{label}' has no options")]
    EmptyCycleOptions { label: String },

    #[error("cycle item '{label}' index {index} is outside its {len} options")]
    CycleIndexOutOfRange {
        label: String,
        index: usize,
        len: usize,
    },

    #[error("settings list attached to a frame has no items")]
    EmptySettingsList,

    #[error("check list attached to a frame has no items")]
    EmptyCheckList,

    #[error("button grid has no enabled items")]
    EmptyButtonGrid,

    #[error("button index {index} is outside the {len} buttons of the bar")]
    ButtonIndexOutOfRange { index: usize, len: usize },

    #[error("page '{0}' is not registered")]
    UnknownPage(String),
}

impl UiError {
    /// Creates empty cycle error.
    #[must_use]
    pub fn empty_cycle(label: impl Into<String>) -> Self {
        Self::EmptyCycleOptions {
            label: label.into(),
        }
    }

    /// Creates cycle index error.
    #[must_use]
    pub fn cycle_index(label: impl Into<String>, index: usize, len: usize) -> Self {
        Self::CycleIndexOutOfRange {
            label: label.into(),
            index,
            len,
        }
    }
}

/// Malformed user input, reported on the inline status line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
