// Checks the next token against a pattern
// Consumes and returns the token if it matches, otherwise returns a syntax error
// expect!(self, TokenType::Semicolon, "';'")
macro_rules! expect {
    ($parser:expr, $pattern:pat, $expected:expr) => {{
        match $parser.peek_type() {
            $pattern => Ok($parser.next()),
            _ => Err($parser.unexpected($expected)),
        }
    }};
}

pub mod ast;
mod ast_print;
mod parse_expression;
mod parse_global;
mod parse_statement;

pub use self::ast::*;

use crate::error;
use crate::error::CompileError;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenType};

/// Recursive descent parser over a fully lexed token list.
/// The first syntax error aborts parsing, no partial tree is returned.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

/// Lexes and parses an entire source text
pub fn parse_program(source: &str) -> Result<Program, CompileError> {
    let tokens = Lexer::from_source(source).lex()?;
    Parser::new(tokens).parse_program()
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Parser {
        // The parser relies on the list being terminated by Eof
        if tokens.last().map(|t| t.token_ref()) != Some(&TokenType::Eof) {
            let span = tokens
                .last()
                .map(|t| t.span().clone())
                .unwrap_or_default();
            tokens.push(Token::new(TokenType::Eof, span));
        }
        Parser { tokens, index: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn peek_type(&self) -> &TokenType {
        self.peek().token_ref()
    }

    fn peek_span(&self) -> Span {
        self.peek().span().clone()
    }

    // Looks n tokens ahead, staying on Eof at the end
    fn peek_nth_type(&self, n: usize) -> &TokenType {
        let index = std::cmp::min(self.index + n, self.tokens.len() - 1);
        self.tokens[index].token_ref()
    }

    // Consumes the current token. Eof is never consumed
    fn next(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    // The span of the last consumed token
    fn last_span(&self) -> Span {
        self.tokens[self.index.saturating_sub(1)].span().clone()
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        let token = self.peek();
        error!(
            Syntax,
            token.span(),
            "Expected {}, but found {}",
            expected,
            token
        )
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<(String, Span), CompileError> {
        let token = expect!(self, TokenType::Ident(_), expected)?;
        match token.token() {
            TokenType::Ident(name) => Ok((name, token.span().clone())),
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ast::*;
    use super::parse_program;
    use crate::error::ErrorKind;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn statements(source: &str) -> Vec<Statement> {
        parse_program(source).unwrap().block.statements
    }

    fn expression(source: &str) -> Expression {
        match statements(&format!("{};", source)).remove(0) {
            Statement::Expression { expression, .. } => expression,
            statement => panic!("expected expression statement, got {:?}", statement),
        }
    }

    // Renders an expression fully parenthesized to check the tree shape
    fn shape(expression: &Expression) -> String {
        use ExpressionVariant::*;
        match &expression.variant {
            Equation(op, left, right) => {
                format!("({} {} {})", shape(left), op.symbol(), shape(right))
            }
            ImmediateInt(value) => value.clone(),
            ImmediateString(value) => format!("{:?}", value),
            Variable(name) => name.clone(),
            FunctionCall(name, arguments) => format!(
                "{}({})",
                name,
                arguments.iter().map(shape).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    fn kind(statement: &Statement) -> &'static str {
        match statement {
            Statement::Expression { .. } => "expression",
            Statement::If { .. } => "if",
            Statement::While { .. } => "while",
            Statement::Return { .. } => "return",
            Statement::DefineVariable { .. } => "var",
            Statement::Assign { .. } => "assign",
            Statement::FunctionDefine(_) => "function",
        }
    }

    #[test]
    fn statements_keep_source_order() {
        let parsed = statements("var x: int = 1; x = 2; print(x); return x; while (x) { }");
        let kinds: Vec<_> = parsed.iter().map(kind).collect();
        assert_eq!(kinds, vec!["var", "assign", "expression", "return", "while"]);

        let swapped = statements("print(x); x = 2;");
        let kinds: Vec<_> = swapped.iter().map(kind).collect();
        assert_eq!(kinds, vec!["expression", "assign"]);
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let parsed = statements("function f(zeta: int, alpha: string, mid: int): void;");
        match &parsed[0] {
            Statement::FunctionDefine(function) => {
                let names: Vec<_> = function
                    .parameters
                    .iter()
                    .map(|p| (p.name.as_str(), p.parameter_type.as_str()))
                    .collect();
                assert_eq!(
                    names,
                    vec![("zeta", "int"), ("alpha", "string"), ("mid", "int")]
                );
                assert_eq!(function.return_type, "void");
                assert!(function.block.is_none());
            }
            statement => panic!("expected function, got {:?}", statement),
        }
    }

    #[test]
    fn empty_parameter_and_argument_lists() {
        let parsed = statements("function f(): int { return g(); }");
        match &parsed[0] {
            Statement::FunctionDefine(function) => {
                assert!(function.parameters.is_empty());
                let body = function.block.as_ref().unwrap();
                match &body.statements[0] {
                    Statement::Return {
                        expression: Some(expression),
                        ..
                    } => assert_eq!(shape(expression), "g()"),
                    statement => panic!("expected return, got {:?}", statement),
                }
            }
            statement => panic!("expected function, got {:?}", statement),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(shape(&expression("1 + 2 * 3")), "(1 + (2 * 3))");
        assert_eq!(shape(&expression("1 - 2 - 3")), "((1 - 2) - 3)");
        assert_eq!(shape(&expression("8 / 4 / 2")), "((8 / 4) / 2)");
        assert_eq!(
            shape(&expression("a + 1 < b * 2 == c")),
            "(((a + 1) < (b * 2)) == c)"
        );
        assert_eq!(shape(&expression("(1 + 2) * 3")), "((1 + 2) * 3)");
        assert_eq!(
            shape(&expression("f(1, g(2), \"s\" )")),
            "f(1, g(2), \"s\")"
        );
    }

    #[test]
    fn if_without_else_has_no_else_block() {
        match &statements("if (x) { y = 1; }")[0] {
            Statement::If { else_block, .. } => assert!(else_block.is_none()),
            statement => panic!("expected if, got {:?}", statement),
        }
        match &statements("if (x) { y = 1; } else { }")[0] {
            Statement::If {
                else_block: Some(block),
                ..
            } => assert!(block.statements.is_empty()),
            statement => panic!("expected if, got {:?}", statement),
        }
    }

    #[test]
    fn else_if_is_nested_in_else_block() {
        match &statements("if (a) { } else if (b) { } else { x = 1; }")[0] {
            Statement::If {
                else_block: Some(block),
                ..
            } => {
                assert_eq!(block.statements.len(), 1);
                match &block.statements[0] {
                    Statement::If {
                        condition,
                        else_block: Some(inner),
                        ..
                    } => {
                        assert_eq!(shape(condition), "b");
                        assert_eq!(inner.statements.len(), 1);
                    }
                    statement => panic!("expected nested if, got {:?}", statement),
                }
            }
            statement => panic!("expected if, got {:?}", statement),
        }
    }

    #[test]
    fn return_without_expression() {
        match &statements("return;")[0] {
            Statement::Return { expression, .. } => assert!(expression.is_none()),
            statement => panic!("expected return, got {:?}", statement),
        }
    }

    #[test]
    fn missing_semicolon_at_end_of_file() {
        let error = parse_program("var x: int = 1").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Syntax);
        assert_eq!(error.message, "Expected ';', but found end of file");
    }

    #[test]
    fn missing_block_brace() {
        let error = parse_program("while (x) y = 1;").unwrap_err();
        assert_eq!(error.kind, ErrorKind::Syntax);
        assert_eq!(error.message, "Expected '{', but found 'y'");
    }

    #[test]
    fn malformed_parameter_list() {
        let error = parse_program("function f(a: int,): int;").unwrap_err();
        assert_eq!(error.message, "Expected parameter name, but found ')'");

        let error = parse_program("function f(a int): int;").unwrap_err();
        assert_eq!(error.message, "Expected ':', but found 'int'");
    }

    #[test]
    fn else_must_be_followed_by_block() {
        let error = parse_program("if (a) { } else x = 1;").unwrap_err();
        assert_eq!(error.message, "Expected '{' or 'if', but found 'x'");
    }

    #[test]
    fn missing_expression() {
        let error = parse_program("x = ;").unwrap_err();
        assert_eq!(error.message, "Expected expression, but found ';'");
    }

    #[test]
    fn unclosed_block_at_end_of_file() {
        let error = parse_program("function f(): void { return;").unwrap_err();
        assert_eq!(error.message, "Expected '}', but found end of file");
    }

    #[test]
    fn parsing_is_idempotent() {
        let source = "function f(a: int): int { if (a < 2) { return a; } return f(a - 1) + f(a - 2); } f(10);";
        let tokens = Lexer::from_source(source).lex().unwrap();
        let first = Parser::new(tokens.clone()).parse_program().unwrap();
        let second = Parser::new(tokens).parse_program().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_token_list_is_an_empty_program() {
        let program = Parser::new(Vec::new()).parse_program().unwrap();
        assert!(program.block.statements.is_empty());
    }
}
