//! Undo/redo history of labelled commands.

use std::collections::VecDeque;

use crate::commands::Command;
use crate::error::Result;
use crate::scene::Selection;

/// Bounded stack of applied commands plus the commands undone since.
pub struct UndoHistory {
    /// Oldest first; trimmed from the front past `capacity`
    done: VecDeque<Box<dyn Command>>,
    undone: Vec<Box<dyn Command>>,
    capacity: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            capacity,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Label of the command `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.done.back().map(|c| c.description())
    }

    pub fn undo_count(&self) -> usize {
        self.done.len()
    }

    pub fn redo_count(&self) -> usize {
        self.undone.len()
    }

    /// Record a command whose effect is already applied. Drops the redo branch.
    pub fn push(&mut self, cmd: Box<dyn Command>) {
        log::debug!("History: recorded '{}'", cmd.description());
        self.undone.clear();
        self.done.push_back(cmd);
        while self.done.len() > self.capacity {
            self.done.pop_front();
        }
    }

    /// Revert the latest command and return its label.
    ///
    /// A command that fails to revert stays on the undo side.
    pub fn undo(&mut self, selection: &mut Selection) -> Result<Option<String>> {
        let Some(mut cmd) = self.done.pop_back() else {
            return Ok(None);
        };
        match cmd.undo(selection) {
            Ok(()) => {
                let label = cmd.description().to_string();
                self.undone.push(cmd);
                Ok(Some(label))
            }
            Err(e) => {
                self.done.push_back(cmd);
                Err(e)
            }
        }
    }

    /// Re-apply the latest undone command and return its label.
    pub fn redo(&mut self, selection: &mut Selection) -> Result<Option<String>> {
        let Some(mut cmd) = self.undone.pop() else {
            return Ok(None);
        };
        match cmd.execute(selection) {
            Ok(()) => {
                let label = cmd.description().to_string();
                self.done.push_back(cmd);
                Ok(Some(label))
            }
            Err(e) => {
                self.undone.push(cmd);
                Err(e)
            }
        }
    }
}
