pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod record;

pub use cell::{format_number, Cell, DEFAULT_COLOR};
pub use coord::{col_from_label, col_to_label, parse_cell_name, CellCoord};
pub use error::{CellError, NameError};
pub use grid::Grid;
pub use record::CellRecord;
