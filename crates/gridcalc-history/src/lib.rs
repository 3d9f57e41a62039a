pub mod command;
pub mod stack;

pub use command::{ChangeColorCommand, Command, CommandBox, EditTextCommand};
pub use stack::{CommandInvoker, HistoryError};
