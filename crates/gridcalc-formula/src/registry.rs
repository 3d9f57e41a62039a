use std::collections::HashMap;

use crate::tree::ExprNode;

/// Evaluation rule for a binary operator
pub type BinaryRule = fn(f64, f64) -> f64;

/// A registered binary operator: its symbol, precedence (higher binds
/// tighter), and evaluation rule.
#[derive(Debug, Clone, Copy)]
pub struct OperatorDescriptor {
    pub symbol: char,
    pub precedence: u8,
    pub apply: BinaryRule,
}

impl PartialEq for OperatorDescriptor {
    fn eq(&self, other: &Self) -> bool {
        // Symbols are unique within a live registry, so the symbol is
        // sufficient identity for tree comparisons in tests.
        self.symbol == other.symbol && self.precedence == other.precedence
    }
}

/// Maps operator symbols to their descriptors.
///
/// Operators are registered explicitly at construction time; new ones can be
/// added at runtime without touching the tokenizer or the converter, both of
/// which consult the registry instead of hardcoding a symbol set.
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistry {
    operators: HashMap<char, OperatorDescriptor>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four arithmetic operators. Additive operators sit
    /// at precedence 11 and multiplicative at 12, matching Java's levels.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register('+', 11, |left, right| left + right);
        registry.register('-', 11, |left, right| left - right);
        registry.register('*', 12, |left, right| left * right);
        registry.register('/', 12, |left, right| left / right);
        registry
    }

    /// Register an operator, replacing any previous registration of the
    /// same symbol.
    pub fn register(&mut self, symbol: char, precedence: u8, apply: BinaryRule) {
        self.operators.insert(
            symbol,
            OperatorDescriptor {
                symbol,
                precedence,
                apply,
            },
        );
    }

    pub fn lookup(&self, symbol: char) -> Option<&OperatorDescriptor> {
        self.operators.get(&symbol)
    }

    pub fn is_operator(&self, symbol: char) -> bool {
        self.operators.contains_key(&symbol)
    }

    /// Construct an operator node for the symbol with the given children.
    ///
    /// Returns `None` for unknown symbols so callers can tell operator
    /// tokens from operand tokens without an error path.
    pub fn node(&self, symbol: char, left: ExprNode, right: ExprNode) -> Option<ExprNode> {
        self.lookup(symbol).map(|op| ExprNode::Operator {
            op: *op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_operators() {
        let registry = OperatorRegistry::with_builtins();

        for symbol in ['+', '-', '*', '/'] {
            assert!(registry.is_operator(symbol), "missing {}", symbol);
        }
        assert!(!registry.is_operator('^'));

        let add = registry.lookup('+').unwrap();
        let mul = registry.lookup('*').unwrap();
        assert_eq!(add.precedence, 11);
        assert_eq!(mul.precedence, 12);
        assert!(mul.precedence > add.precedence);

        assert_eq!((add.apply)(3.0, 7.0), 10.0);
        assert_eq!((registry.lookup('-').unwrap().apply)(3.0, 7.0), -4.0);
        assert_eq!((mul.apply)(3.0, 7.0), 21.0);
        assert_eq!((registry.lookup('/').unwrap().apply)(3.0, 6.0), 0.5);
    }

    #[test]
    fn test_runtime_registration() {
        let mut registry = OperatorRegistry::with_builtins();
        registry.register('^', 13, |left, right| left.powf(right));

        let pow = registry.lookup('^').unwrap();
        assert_eq!(pow.precedence, 13);
        assert_eq!((pow.apply)(2.0, 10.0), 1024.0);
    }

    #[test]
    fn test_node_on_unknown_symbol() {
        let registry = OperatorRegistry::with_builtins();
        let node = registry.node('%', ExprNode::Value(1.0), ExprNode::Value(2.0));
        assert!(node.is_none());
    }
}
