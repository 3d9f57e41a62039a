pub mod dependency;
pub mod error;
pub mod lexer;
pub mod postfix;
pub mod registry;
pub mod tree;

pub use dependency::DependencyGraph;
pub use error::FormulaError;
pub use lexer::{Lexer, Token};
pub use postfix::to_postfix;
pub use registry::{BinaryRule, OperatorDescriptor, OperatorRegistry};
pub use tree::{ExprNode, ExpressionTree};
