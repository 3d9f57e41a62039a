use std::collections::HashMap;

use crate::error::FormulaError;
use crate::lexer::{Lexer, Token};
use crate::postfix::to_postfix;
use crate::registry::{OperatorDescriptor, OperatorRegistry};

/// Expression tree node: a constant, a named variable, or a binary operator
/// with two children. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Value(f64),
    Variable(String),
    Operator {
        op: OperatorDescriptor,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
}

impl ExprNode {
    /// Post-order evaluation. Value nodes return their constant, variable
    /// nodes look themselves up in the bindings (unbound names read as 0),
    /// operator nodes evaluate left then right and apply their rule.
    fn evaluate(&self, bindings: &HashMap<String, f64>) -> f64 {
        match self {
            ExprNode::Value(n) => *n,
            ExprNode::Variable(name) => bindings.get(name).copied().unwrap_or(0.0),
            ExprNode::Operator { op, left, right } => {
                let left_value = left.evaluate(bindings);
                let right_value = right.evaluate(bindings);
                (op.apply)(left_value, right_value)
            }
        }
    }
}

/// An expression tree built from an infix source string, together with its
/// variable bindings.
///
/// Trees are rebuilt wholesale whenever the source text changes; bindings
/// belong to the tree, so no state leaks between unrelated evaluations.
#[derive(Debug, Clone)]
pub struct ExpressionTree {
    root: ExprNode,
    source: String,
    bindings: HashMap<String, f64>,
    variable_names: Vec<String>,
}

impl ExpressionTree {
    /// Tokenize, reorder to postfix, and build the tree.
    pub fn build(source: &str, registry: &OperatorRegistry) -> Result<Self, FormulaError> {
        let tokens = Lexer::new(source, registry).tokenize();
        let postfix = to_postfix(tokens, registry)?;

        let mut stack: Vec<ExprNode> = Vec::new();
        let mut variable_names: Vec<String> = Vec::new();

        for token in postfix {
            match token {
                Token::Operator(symbol) => {
                    // Pop right first, then left; order matters for
                    // non-commutative operators
                    let right = stack.pop().ok_or(FormulaError::Malformed)?;
                    let left = stack.pop().ok_or(FormulaError::Malformed)?;
                    let node = registry
                        .node(symbol, left, right)
                        .ok_or(FormulaError::Malformed)?;
                    stack.push(node);
                }
                Token::Identifier(name) => {
                    if !variable_names.contains(&name) {
                        variable_names.push(name.clone());
                    }
                    stack.push(ExprNode::Variable(name));
                }
                Token::Literal(text) => {
                    let value: f64 = text
                        .parse()
                        .map_err(|_| FormulaError::InvalidLiteral(text.clone()))?;
                    stack.push(ExprNode::Value(value));
                }
                Token::LeftParen | Token::RightParen => return Err(FormulaError::Malformed),
            }
        }

        let root = match (stack.pop(), stack.is_empty()) {
            (Some(root), true) => root,
            (None, _) => return Err(FormulaError::Empty),
            _ => return Err(FormulaError::Malformed),
        };

        Ok(ExpressionTree {
            root,
            source: source.to_string(),
            bindings: HashMap::new(),
            variable_names,
        })
    }

    /// The infix source the tree was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Variable names referenced by the expression, in first-seen order
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Bind a variable for evaluation. Names must start with an alphabetic
    /// character.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: f64,
    ) -> Result<(), FormulaError> {
        let name = name.into();
        if !name.chars().next().is_some_and(|c| c.is_alphabetic()) {
            return Err(FormulaError::InvalidVariableName(name));
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// Evaluate the expression against the current bindings.
    ///
    /// Pure and infallible: a built tree always has a root, unbound
    /// variables read as 0, and division by zero follows float semantics
    /// (infinity or NaN, not an error).
    pub fn evaluate(&self) -> f64 {
        self.root.evaluate(&self.bindings)
    }
}
