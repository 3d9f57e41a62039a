pub mod spreadsheet;

pub use spreadsheet::{EngineError, Spreadsheet};

pub use gridcalc_core::{Cell, CellCoord, CellRecord, Grid};
pub use gridcalc_formula::OperatorRegistry;
