//! Command trait and result types.

use crate::error::GizmoError;
use crate::scene::Selection;

/// Result type for command execution.
pub type CommandResult = Result<(), GizmoError>;

/// A change to the selection that can be executed, undone and redone.
///
/// Commands produced by gizmos have already been applied when they are
/// pushed to the history; `execute` is used for redo.
pub trait Command: Send {
    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str;

    /// Execute (or re-execute) the command.
    fn execute(&mut self, selection: &mut Selection) -> CommandResult;

    /// Undo the command, restoring the previous state.
    fn undo(&mut self, selection: &mut Selection) -> CommandResult;
}
