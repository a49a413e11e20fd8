//! An edit session over one configuration snapshot.

use tracing::instrument;

use crate::domain::{ConfigurationSnapshot, Edit, InvariantViolation};

/// The single owner of a [`ConfigurationSnapshot`] for the duration of an
/// edit session.
///
/// Edits are applied one at a time. Because every edit produces a new
/// snapshot, the session keeps the previous ones for undo and redo.
/// Discarding the session without saving cancels it.
#[derive(Debug, Clone)]
pub struct EditSession {
    loaded: ConfigurationSnapshot,
    current: ConfigurationSnapshot,
    undo: Vec<ConfigurationSnapshot>,
    redo: Vec<ConfigurationSnapshot>,
}

impl EditSession {
    /// Starts a session on a loaded snapshot.
    #[must_use]
    pub fn new(snapshot: ConfigurationSnapshot) -> Self {
        Self {
            loaded: snapshot.clone(),
            current: snapshot,
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// The current state of the snapshot.
    #[must_use]
    pub const fn current(&self) -> &ConfigurationSnapshot {
        &self.current
    }

    /// Applies an edit.
    ///
    /// # Errors
    ///
    /// Returns the [`InvariantViolation`] if the edit is rejected, in which
    /// case the session is unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, edit: Edit) -> Result<&ConfigurationSnapshot, InvariantViolation> {
        match self.current.apply(edit) {
            Ok(next) => {
                let previous = std::mem::replace(&mut self.current, next);
                self.undo.push(previous);
                self.redo.clear();
                tracing::debug!("edit applied");
                Ok(&self.current)
            }
            Err(violation) => {
                tracing::warn!("edit rejected: {violation}");
                Err(violation)
            }
        }
    }

    /// Reverts the most recent edit.
    ///
    /// Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let undone = std::mem::replace(&mut self.current, previous);
        self.redo.push(undone);
        true
    }

    /// Re-applies the most recently undone edit.
    ///
    /// Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let redone = std::mem::replace(&mut self.current, next);
        self.undo.push(redone);
        true
    }

    /// Whether the current snapshot differs from the loaded one.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.current != self.loaded
    }

    /// Ends the session, returning the current snapshot.
    #[must_use]
    pub fn into_snapshot(self) -> ConfigurationSnapshot {
        self.current
    }
}
