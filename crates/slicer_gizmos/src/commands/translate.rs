//! Translation command produced at the end of a move drag.

use super::{Command, CommandResult};
use crate::scene::{Selection, VolumeOffsets};

/// Moves selected volumes between two sets of captured offsets.
pub struct TranslateCommand {
    label: String,
    before: Vec<VolumeOffsets>,
    after: Vec<VolumeOffsets>,
}

impl TranslateCommand {
    pub fn new(label: impl Into<String>, before: Vec<VolumeOffsets>, after: Vec<VolumeOffsets>) -> Self {
        Self {
            label: label.into(),
            before,
            after,
        }
    }

    /// True when the drag ended where it started.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

impl Command for TranslateCommand {
    fn description(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, selection: &mut Selection) -> CommandResult {
        selection.set_offsets(&self.after)
    }

    fn undo(&mut self, selection: &mut Selection) -> CommandResult {
        selection.set_offsets(&self.before)
    }
}
