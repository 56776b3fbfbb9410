//! Ephemeral UI state shared between pages.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::entities::{ALL_SYSTEMS_LABEL, IndexingProgress};

/// Snapshot of the session fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub search_name: String,
    /// System id filter; empty means all systems.
    pub search_system: String,
    pub search_system_name: String,
    pub main_menu_index: usize,
    pub pending_write_text: String,
    pub indexing: Option<IndexingProgress>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            search_name: String::new(),
            search_system: String::new(),
            search_system_name: ALL_SYSTEMS_LABEL.to_string(),
            main_menu_index: 0,
            pending_write_text: String::new(),
            indexing: None,
        }
    }
}

/// Cheaply cloneable handle to the shared session.
///
/// Every read and write goes through one lock, so multi-field updates made
/// with [`Session::update`] are never observed half-applied.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.read())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state.write())
    }

    #[must_use]
    pub fn search_name(&self) -> String {
        self.read(|s| s.search_name.clone())
    }

    pub fn set_search_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.update(|s| s.search_name = name);
    }

    /// Returns `(system id, system label)`.
    #[must_use]
    pub fn search_system(&self) -> (String, String) {
        self.read(|s| (s.search_system.clone(), s.search_system_name.clone()))
    }

    /// Sets the system filter; an empty id resets the label to "All".
    pub fn set_search_system(&self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let name = if id.is_empty() {
            ALL_SYSTEMS_LABEL.to_string()
        } else {
            name.into()
        };
        self.update(|s| {
            s.search_system = id;
            s.search_system_name = name;
        });
    }

    #[must_use]
    pub fn main_menu_index(&self) -> usize {
        self.read(|s| s.main_menu_index)
    }

    pub fn set_main_menu_index(&self, index: usize) {
        self.update(|s| s.main_menu_index = index);
    }

    #[must_use]
    pub fn pending_write_text(&self) -> String {
        self.read(|s| s.pending_write_text.clone())
    }

    pub fn set_pending_write_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| s.pending_write_text = text);
    }

    #[must_use]
    pub fn indexing(&self) -> Option<IndexingProgress> {
        self.read(|s| s.indexing.clone())
    }

    /// Records indexing progress; a finished run clears it.
    pub fn set_indexing(&self, progress: IndexingProgress) {
        self.update(|s| {
            s.indexing = (!progress.is_finished()).then_some(progress);
        });
    }

    /// Clears the search filters back to their defaults.
    pub fn reset_search(&self) {
        self.update(|s| {
            let defaults = SessionState::default();
            s.search_name = defaults.search_name;
            s.search_system = defaults.search_system;
            s.search_system_name = defaults.search_system_name;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_defaults() {
        let session = Session::new();
        let state = session.snapshot();
        assert_eq!(state.search_name, "");
        assert_eq!(state.search_system, "");
        assert_eq!(state.search_system_name, "All");
        assert_eq!(state.main_menu_index, 0);
        assert!(state.indexing.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::new();
        let other = session.clone();
        other.set_search_name("mario");
        assert_eq!(session.search_name(), "mario");
    }

    #[test]
    fn test_empty_system_id_resets_label() {
        let session = Session::new();
        session.set_search_system("NES", "Nintendo Entertainment System");
        assert_eq!(
            session.search_system(),
            ("NES".to_string(), "Nintendo Entertainment System".to_string())
        );

        session.set_search_system("", "ignored");
        assert_eq!(session.search_system(), (String::new(), "All".to_string()));
    }

    #[test]
    fn test_finished_indexing_clears_progress() {
        let session = Session::new();
        session.set_indexing(IndexingProgress {
            step: 2,
            total: 10,
            system: None,
            files: None,
        });
        assert!(session.indexing().is_some());

        session.set_indexing(IndexingProgress {
            step: 10,
            total: 10,
            system: None,
            files: None,
        });
        assert!(session.indexing().is_none());
    }

    #[test]
    fn test_reset_search_keeps_other_fields() {
        let session = Session::new();
        session.set_search_name("zelda");
        session.set_search_system("SNES", "Super Nintendo");
        session.set_main_menu_index(2);

        session.reset_search();

        let state = session.snapshot();
        assert_eq!(state.search_name, "");
        assert_eq!(state.search_system_name, "All");
        assert_eq!(state.main_menu_index, 2);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_system_update() {
        let session = Session::new();
        let pairs = [("NES", "NES label"), ("SNES", "SNES label"), ("", "All")];

        let writer = {
            let session = session.clone();
            thread::spawn(move || {
                for i in 0..2_000 {
                    let (id, name) = pairs[i % pairs.len()];
                    session.set_search_system(id, name);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let session = session.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let (id, name) = session.search_system();
                        let expected = match id.as_str() {
                            "NES" => "NES label",
                            "SNES" => "SNES label",
                            _ => "All",
                        };
                        assert_eq!(name, expected);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
