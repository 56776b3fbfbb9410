use super::{ReaderInfo, TokenInfo};

/// Media indexing progress pushed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingProgress {
    pub step: u32,
    pub total: u32,
    pub system: Option<String>,
    /// Files processed, reported once the run has finished.
    pub files: Option<u32>,
}

impl IndexingProgress {
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.total > 0 && self.step >= self.total
    }

    /// Completed fraction in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (f64::from(self.step) / f64::from(self.total)).min(1.0)
    }

    /// Short status line, e.g. `Indexing media 3/10 (NES)`.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.system {
            Some(system) => format!("Indexing media {}/{} ({system})", self.step, self.total),
            None => format!("Indexing media {}/{}", self.step, self.total),
        }
    }
}

/// Asynchronous event pushed by the settings service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ReadersChanged(Vec<ReaderInfo>),
    TokenScanned(TokenInfo),
    TokenRemoved,
    Indexing(IndexingProgress),
    /// The service could not be reached; cleared by the next notification.
    ServiceUnavailable,
}
