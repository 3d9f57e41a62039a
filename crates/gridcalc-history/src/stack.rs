use thiserror::Error;

use crate::command::CommandBox;
use gridcalc_core::{CellCoord, Grid};

/// Undo/redo misuse by the caller. Callers are expected to check
/// `can_undo`/`can_redo` first; an empty-stack call is a contract violation
/// reported explicitly, never absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Invoker holding the undo and redo stacks.
#[derive(Debug, Default)]
pub struct CommandInvoker {
    undo_stack: Vec<CommandBox>,
    redo_stack: Vec<CommandBox>,
}

impl CommandInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command, push it onto the undo stack, and clear the redo
    /// stack (a new action invalidates any undone future).
    pub fn execute(&mut self, mut command: CommandBox, grid: &mut Grid) -> Vec<CellCoord> {
        let affected = command.execute(grid);
        self.undo_stack.push(command);
        self.redo_stack.clear();
        affected
    }

    /// Reverse the most recent command and move it to the redo stack.
    pub fn undo(&mut self, grid: &mut Grid) -> Result<Vec<CellCoord>, HistoryError> {
        let mut command = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;
        let affected = command.undo(grid);
        self.redo_stack.push(command);
        Ok(affected)
    }

    /// Re-apply the most recently undone command and move it back to the
    /// undo stack.
    pub fn redo(&mut self, grid: &mut Grid) -> Result<Vec<CellCoord>, HistoryError> {
        let mut command = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        let affected = command.execute(grid);
        self.undo_stack.push(command);
        Ok(affected)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Title of the command an undo would reverse
    pub fn undo_title(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.title())
    }

    /// Title of the command a redo would re-apply
    pub fn redo_title(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.title())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
