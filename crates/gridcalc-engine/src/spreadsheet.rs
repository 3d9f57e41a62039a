use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use gridcalc_core::{
    format_number, parse_cell_name, Cell, CellCoord, CellError, CellRecord, Grid, NameError,
};
use gridcalc_formula::{DependencyGraph, ExpressionTree, OperatorRegistry};
use gridcalc_history::{ChangeColorCommand, CommandInvoker, EditTextCommand, HistoryError};

/// Caller misuse of the spreadsheet API.
///
/// User input problems (bad formulas, bad references inside formulas) never
/// show up here; those surface as display markers on the cell. These errors
/// mean the *caller* addressed a cell that does not exist or drove the
/// history stacks without checking availability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cell {0} is outside the grid")]
    OutOfRange(CellCoord),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// A grid of cells with formula evaluation, dependency-driven
/// recomputation, and undo/redo.
///
/// Edits run as commands through the history invoker, then the edited cell
/// and everything that transitively reads it recompute in topological
/// order. All recomputation is synchronous; control returns to the caller
/// only after the cascade has run to completion.
pub struct Spreadsheet {
    grid: Grid,
    registry: OperatorRegistry,
    deps: DependencyGraph,
    history: CommandInvoker,
}

impl Spreadsheet {
    /// Create a spreadsheet with fixed dimensions and the four arithmetic
    /// operators registered.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            registry: OperatorRegistry::with_builtins(),
            deps: DependencyGraph::new(),
            history: CommandInvoker::new(),
        }
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.grid.cell(coord)
    }

    /// A cell's display value; empty string for untouched cells.
    pub fn value(&self, coord: CellCoord) -> &str {
        self.grid.cell(coord).map(|c| c.value()).unwrap_or("")
    }

    /// Resolve a cell name (e.g. "B12") against this grid. Malformed and
    /// out-of-range names are contract errors at this surface, not markers.
    pub fn coord_of(&self, name: &str) -> Result<CellCoord, EngineError> {
        let coord = parse_cell_name(name)?;
        if !self.grid.contains(coord) {
            return Err(EngineError::OutOfRange(coord));
        }
        Ok(coord)
    }

    /// The operator registry, for registering additional operators before
    /// any formulas are entered.
    pub fn registry_mut(&mut self) -> &mut OperatorRegistry {
        &mut self.registry
    }

    /// Set a cell's text through an undoable command, then recompute it and
    /// every dependent. Returns all affected coordinates.
    ///
    /// Setting the current text again is a no-op: no value change, no
    /// resubscription churn, no history entry.
    pub fn edit_cell_text(
        &mut self,
        coord: CellCoord,
        text: &str,
    ) -> Result<Vec<CellCoord>, EngineError> {
        let cell = self.grid.cell(coord).ok_or(EngineError::OutOfRange(coord))?;
        if cell.text() == text {
            return Ok(Vec::new());
        }

        let command = Box::new(EditTextCommand::new(coord, text));
        let affected = self.history.execute(command, &mut self.grid);

        Ok(self.recompute_all(affected))
    }

    /// Change the background color of a group of cells as one undoable,
    /// atomic command.
    pub fn change_cell_color(
        &mut self,
        cells: Vec<CellCoord>,
        color: u32,
    ) -> Result<Vec<CellCoord>, EngineError> {
        for &coord in &cells {
            if !self.grid.contains(coord) {
                return Err(EngineError::OutOfRange(coord));
            }
        }

        let command = Box::new(ChangeColorCommand::new(cells, color));
        Ok(self.history.execute(command, &mut self.grid))
    }

    /// Reverse the most recent command, recomputing whatever it touched.
    /// Calling with an empty history is an explicit error; check
    /// `can_undo` first.
    pub fn undo(&mut self) -> Result<Vec<CellCoord>, EngineError> {
        let affected = self.history.undo(&mut self.grid)?;
        Ok(self.recompute_all(affected))
    }

    /// Re-apply the most recently undone command, recomputing whatever it
    /// touched.
    pub fn redo(&mut self) -> Result<Vec<CellCoord>, EngineError> {
        let affected = self.history.redo(&mut self.grid)?;
        Ok(self.recompute_all(affected))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_title(&self) -> Option<&str> {
        self.history.undo_title()
    }

    pub fn redo_title(&self) -> Option<&str> {
        self.history.redo_title()
    }

    /// Persisted records for every cell modified from its default state,
    /// raw text exactly as entered.
    pub fn save(&self) -> Vec<CellRecord> {
        self.grid.modified_cells().map(CellRecord::from_cell).collect()
    }

    /// Replace the spreadsheet contents with the given records.
    ///
    /// The grid resets first, so anything not named in a record returns to
    /// its default state. Text is applied through the normal recompute path
    /// (formulas re-evaluate; record order does not matter because
    /// subscriptions register even while a reference is still empty).
    /// History is cleared; a freshly loaded document has nothing to undo.
    pub fn load(&mut self, records: &[CellRecord]) -> Result<(), EngineError> {
        let mut parsed = Vec::with_capacity(records.len());
        for record in records {
            let coord = parse_cell_name(&record.name)?;
            if !self.grid.contains(coord) {
                return Err(EngineError::OutOfRange(coord));
            }
            parsed.push((coord, record));
        }

        self.grid.reset();
        self.deps.clear();
        self.history.clear();

        for (coord, record) in parsed {
            if let Some(cell) = self.grid.cell_mut(coord) {
                cell.set_background_color(record.background_color);
                cell.set_text(record.text.clone());
            }
            self.refresh_cell(coord);
            self.cascade(coord);
        }

        Ok(())
    }

    /// Recompute a set of directly changed cells and cascade through their
    /// dependents, returning every coordinate whose state was touched.
    fn recompute_all(&mut self, changed: Vec<CellCoord>) -> Vec<CellCoord> {
        let mut affected = Vec::new();
        for coord in changed {
            self.refresh_cell(coord);
            affected.push(coord);
            affected.extend(self.cascade(coord));
        }
        affected
    }

    /// Recompute every dependent of `origin` in topological order
    /// (dependencies before dependents).
    fn cascade(&mut self, origin: CellCoord) -> Vec<CellCoord> {
        let order = match self.deps.recalc_order(origin) {
            Ok(order) => order,
            Err(err) => {
                // Cycle-closing edits are never registered, so the walk
                // cannot cycle; guard anyway rather than cascading forever.
                warn!(cell = %origin, %err, "cascade aborted");
                return Vec::new();
            }
        };

        let mut affected = Vec::new();
        for coord in order {
            if coord != origin {
                self.refresh_cell(coord);
                affected.push(coord);
            }
        }
        affected
    }

    /// Re-derive one cell's display value and subscriptions from its text.
    fn refresh_cell(&mut self, coord: CellCoord) {
        let text = match self.grid.cell(coord) {
            Some(cell) => cell.text().to_string(),
            None => return,
        };

        // Plain text: the value is the text verbatim and any formula
        // subscriptions are torn down.
        if !text.starts_with('=') {
            self.deps.remove_cell(coord);
            if let Some(cell) = self.grid.cell_mut(coord) {
                cell.clear_referenced_names();
                cell.set_value(text);
            }
            return;
        }

        let source = &text[1..];
        debug!(cell = %coord, formula = source, "recomputing");

        self.deps.remove_cell(coord);

        let tree = match ExpressionTree::build(source, &self.registry) {
            Ok(tree) => tree,
            Err(err) => {
                warn!(cell = %coord, formula = source, %err, "formula rejected");
                self.mark_cell(coord, HashSet::new(), CellError::InvalidReference);
                return;
            }
        };

        // The cell's referenced-name set mirrors the tree's variables,
        // resolvable or not.
        let names: HashSet<String> = tree.variable_names().iter().cloned().collect();

        // Resolve names to coordinates; a malformed or out-of-range name
        // fails the evaluation but leaves the rest subscribed.
        let mut resolved = Vec::new();
        let mut bad_reference = false;
        for name in tree.variable_names() {
            match parse_cell_name(name) {
                Ok(target) if self.grid.contains(target) => resolved.push((name.clone(), target)),
                _ => bad_reference = true,
            }
        }

        // A new dependency that already depends on this cell would close a
        // cycle: flag the edit and register no edges so cascades terminate.
        // The cell's own coordinate is exempt; self-reference is a one-shot
        // read of the current value, not a cycle.
        for (_, target) in &resolved {
            if *target != coord && self.deps.would_create_cycle(coord, *target) {
                warn!(cell = %coord, formula = source, "formula closes a reference cycle");
                self.mark_cell(coord, names, CellError::CircularReference);
                return;
            }
        }

        let edges: HashSet<CellCoord> = resolved
            .iter()
            .map(|(_, target)| *target)
            .filter(|target| *target != coord)
            .collect();
        self.deps.set_dependencies(coord, edges);

        if bad_reference {
            self.mark_cell(coord, names, CellError::InvalidReference);
            return;
        }

        // Bare reference, e.g. "=A1": a direct alias. The referenced value
        // is taken verbatim so non-numeric text and error markers propagate
        // as-is; an empty referenced value marks the alias invalid.
        if resolved.len() == 1 && source.trim() == resolved[0].0 {
            let target = resolved[0].1;
            let referenced = self.value(target).to_string();
            if let Some(cell) = self.grid.cell_mut(coord) {
                cell.set_referenced_names(names);
                if referenced.is_empty() {
                    cell.set_value(CellError::InvalidReference.to_string());
                } else {
                    cell.set_value(referenced);
                }
            }
            return;
        }

        // General formula: bind every referenced cell's current value as a
        // number. Any non-numeric operand fails the whole evaluation.
        let mut tree = tree;
        let mut numeric = true;
        for (name, target) in &resolved {
            let raw = self.value(*target).to_string();
            match raw.parse::<f64>() {
                Ok(value) => {
                    if tree.set_variable(name.clone(), value).is_err() {
                        numeric = false;
                        break;
                    }
                }
                Err(_) => {
                    numeric = false;
                    break;
                }
            }
        }

        if !numeric {
            self.mark_cell(coord, names, CellError::InvalidReference);
            return;
        }

        let result = tree.evaluate();
        if let Some(cell) = self.grid.cell_mut(coord) {
            cell.set_referenced_names(names);
            cell.set_value(format_number(result));
        }
    }

    /// Set a cell's display value to an error marker.
    fn mark_cell(&mut self, coord: CellCoord, names: HashSet<String>, error: CellError) {
        if let Some(cell) = self.grid.cell_mut(coord) {
            cell.set_referenced_names(names);
            cell.set_value(error.to_string());
        }
    }
}
