use crate::error::FormulaError;
use crate::lexer::Token;
use crate::registry::OperatorRegistry;

/// Reorder an infix token sequence into postfix (shunting yard).
///
/// Operands pass straight to the output. An operator pops every stacked
/// operator of greater or equal precedence before being pushed, which makes
/// equal-precedence operators left-associative: `3-2-8-8` comes out as
/// `3 2 - 8 - 8 -`. Parentheses group as usual; a `)` with no matching `(`
/// on the stack, or a leftover `(` at the end, is a mismatch error.
pub fn to_postfix(
    tokens: Vec<Token>,
    registry: &OperatorRegistry,
) -> Result<Vec<Token>, FormulaError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(_) | Token::Identifier(_) => output.push(token),

            Token::Operator(symbol) => {
                let precedence = registry
                    .lookup(symbol)
                    .map(|op| op.precedence)
                    .unwrap_or(0);

                while let Some(&Token::Operator(top)) = stack.last() {
                    let top_precedence =
                        registry.lookup(top).map(|op| op.precedence).unwrap_or(0);
                    if top_precedence < precedence {
                        break;
                    }
                    stack.pop();
                    output.push(Token::Operator(top));
                }

                stack.push(token);
            }

            Token::LeftParen => stack.push(token),

            Token::RightParen => loop {
                match stack.pop() {
                    Some(Token::LeftParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(FormulaError::MismatchedParens),
                }
            },
        }
    }

    while let Some(token) = stack.pop() {
        if matches!(token, Token::LeftParen) {
            return Err(FormulaError::MismatchedParens);
        }
        output.push(token);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn postfix(input: &str) -> Result<Vec<Token>, FormulaError> {
        let registry = OperatorRegistry::with_builtins();
        let tokens = Lexer::new(input, &registry).tokenize();
        to_postfix(tokens, &registry)
    }

    fn render(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| match t {
                Token::Operator(c) => c.to_string(),
                Token::Literal(s) | Token::Identifier(s) => s.clone(),
                Token::LeftParen => "(".to_string(),
                Token::RightParen => ")".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render(&postfix("3+7/4").unwrap()), "3 7 4 / +");
        assert_eq!(render(&postfix("3*2-5/8").unwrap()), "3 2 * 5 8 / -");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(render(&postfix("3-2-8-8").unwrap()), "3 2 - 8 - 8 -");
        assert_eq!(render(&postfix("3/7/2/1").unwrap()), "3 7 / 2 / 1 /");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(render(&postfix("(3+7)/4").unwrap()), "3 7 + 4 /");
        assert_eq!(render(&postfix("3/(7+4)").unwrap()), "3 7 4 + /");
        assert_eq!(render(&postfix("((1))").unwrap()), "1");
    }

    #[test]
    fn test_variables() {
        assert_eq!(render(&postfix("(2/A1)+3*5").unwrap()), "2 A1 / 3 5 * +");
    }

    #[test]
    fn test_mismatched_parens() {
        assert_eq!(postfix("(3+7"), Err(FormulaError::MismatchedParens));
        assert_eq!(postfix("3+7)"), Err(FormulaError::MismatchedParens));
        assert_eq!(postfix(")("), Err(FormulaError::MismatchedParens));
    }

    #[test]
    fn test_empty() {
        assert_eq!(postfix("").unwrap(), vec![]);
    }
}
