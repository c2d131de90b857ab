//! Command system for undo/redo.
//!
//! Gizmos apply their changes live while dragging, then hand back a
//! command describing the net change so the host can undo and redo it.

mod command;
mod translate;

pub use command::{Command, CommandResult};
pub use translate::TranslateCommand;
