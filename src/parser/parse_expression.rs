use super::ast::*;
use super::Parser;
use crate::error::CompileError;
use crate::token::TokenType;

// Binary operators with their precedence, higher binds stronger
// All operators are left associative
fn binary_operator(token: &TokenType) -> Option<(BinaryExpressionType, u8)> {
    use BinaryExpressionType::*;
    let operator = match token {
        TokenType::Equal => (Equal, 1),
        TokenType::Inequal => (Inequal, 1),
        TokenType::Less => (Less, 1),
        TokenType::LessEqual => (LessEqual, 1),
        TokenType::Greater => (Greater, 1),
        TokenType::GreaterEqual => (GreaterEqual, 1),
        TokenType::Plus => (Add, 2),
        TokenType::Minus => (Subtract, 2),
        TokenType::Asterisk => (Multiply, 3),
        TokenType::Divide => (Divide, 3),
        _ => return None,
    };
    Some(operator)
}

impl Parser {
    // <expression> ::= <additive> (('=='|'!='|'<'|'<='|'>'|'>=') <additive>)*
    // <additive>   ::= <term> (('+'|'-') <term>)*
    // <term>       ::= <factor> (('*'|'/') <factor>)*
    pub(super) fn parse_expression(&mut self) -> Result<Expression, CompileError> {
        self.parse_binary(1)
    }

    // Precedence climbing: only operators binding at least as strong as min_precedence are consumed here
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression, CompileError> {
        let mut left = self.parse_factor()?;
        while let Some((op, precedence)) = binary_operator(self.peek_type()) {
            if precedence < min_precedence {
                break;
            }
            self.next();
            let right = self.parse_binary(precedence + 1)?;
            let span = left.span.to(&right.span);
            left = Expression {
                span,
                variant: ExpressionVariant::Equation(op, Box::new(left), Box::new(right)),
            };
        }
        Ok(left)
    }

    // <factor> ::= integer | string | name | name '(' <arguments>? ')' | '(' <expression> ')'
    fn parse_factor(&mut self) -> Result<Expression, CompileError> {
        let begin = self.peek_span();
        use ExpressionVariant::*;
        match self.peek_type() {
            TokenType::ConstI(_) | TokenType::CString(_) => {
                let token = self.next();
                let variant = match token.token() {
                    TokenType::ConstI(value) => ImmediateInt(value),
                    TokenType::CString(value) => ImmediateString(value),
                    _ => unreachable!(),
                };
                Ok(Expression {
                    span: begin,
                    variant,
                })
            }

            TokenType::Ident(_) => {
                let (name, _) = self.expect_identifier("identifier")?;
                if self.peek_type() == &TokenType::LParenthesis {
                    self.next();
                    let arguments = self.parse_arguments()?;
                    expect!(self, TokenType::RParenthesis, "')'")?;
                    Ok(Expression {
                        span: begin.to(&self.last_span()),
                        variant: FunctionCall(name, arguments),
                    })
                } else {
                    Ok(Expression {
                        span: begin,
                        variant: Variable(name),
                    })
                }
            }

            TokenType::LParenthesis => {
                self.next();
                let mut expression = self.parse_expression()?;
                expect!(self, TokenType::RParenthesis, "')'")?;
                expression.span = begin.to(&self.last_span());
                Ok(expression)
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    // Arguments are kept in call-site order
    // <arguments> ::= <expression> (',' <expression>)*
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, CompileError> {
        let mut arguments = Vec::new();
        if self.peek_type() == &TokenType::RParenthesis {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression()?);
            if self.peek_type() == &TokenType::Comma {
                self.next();
            } else {
                break;
            }
        }
        Ok(arguments)
    }
}
