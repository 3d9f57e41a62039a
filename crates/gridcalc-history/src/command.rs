use gridcalc_core::{CellCoord, Grid};

/// Type alias for boxed commands
pub type CommandBox = Box<dyn Command>;

/// A reversible cell mutation.
///
/// Commands touch raw cell state (text, color) only; re-evaluating display
/// values after execute or undo is the spreadsheet's job, driven by the
/// affected coordinates both methods return.
pub trait Command: std::fmt::Debug {
    /// Apply the command, returning affected cell coordinates
    fn execute(&mut self, grid: &mut Grid) -> Vec<CellCoord>;

    /// Exactly reverse the command, returning affected cell coordinates
    fn undo(&mut self, grid: &mut Grid) -> Vec<CellCoord>;

    /// Short title for UI display ("undo text edit", "redo color change")
    fn title(&self) -> &str;
}

/// Edit one cell's raw text
#[derive(Debug)]
pub struct EditTextCommand {
    coord: CellCoord,
    new_text: String,
    old_text: Option<String>,
}

impl EditTextCommand {
    pub fn new(coord: CellCoord, new_text: impl Into<String>) -> Self {
        Self {
            coord,
            new_text: new_text.into(),
            old_text: None,
        }
    }
}

impl Command for EditTextCommand {
    fn execute(&mut self, grid: &mut Grid) -> Vec<CellCoord> {
        if let Some(cell) = grid.cell_mut(self.coord) {
            self.old_text = Some(cell.text().to_string());
            cell.set_text(self.new_text.clone());
        }
        vec![self.coord]
    }

    fn undo(&mut self, grid: &mut Grid) -> Vec<CellCoord> {
        if let (Some(cell), Some(old)) = (grid.cell_mut(self.coord), self.old_text.take()) {
            cell.set_text(old);
        }
        vec![self.coord]
    }

    fn title(&self) -> &str {
        "text edit"
    }
}

/// Change the background color of one or more cells as a single atomic
/// group; undo restores every affected cell in one step.
#[derive(Debug)]
pub struct ChangeColorCommand {
    cells: Vec<CellCoord>,
    new_color: u32,
    old_colors: Vec<(CellCoord, u32)>,
}

impl ChangeColorCommand {
    pub fn new(cells: Vec<CellCoord>, new_color: u32) -> Self {
        Self {
            cells,
            new_color,
            old_colors: Vec::new(),
        }
    }
}

impl Command for ChangeColorCommand {
    fn execute(&mut self, grid: &mut Grid) -> Vec<CellCoord> {
        self.old_colors.clear();

        for &coord in &self.cells {
            if let Some(cell) = grid.cell_mut(coord) {
                self.old_colors.push((coord, cell.background_color()));
                cell.set_background_color(self.new_color);
            }
        }

        self.cells.clone()
    }

    fn undo(&mut self, grid: &mut Grid) -> Vec<CellCoord> {
        for (coord, color) in self.old_colors.drain(..) {
            if let Some(cell) = grid.cell_mut(coord) {
                cell.set_background_color(color);
            }
        }

        self.cells.clone()
    }

    fn title(&self) -> &str {
        "color change"
    }
}
