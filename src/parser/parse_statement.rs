use super::ast::*;
use super::Parser;
use crate::error::CompileError;
use crate::token::TokenType;

impl Parser {
    // All statements within the brace are parsed
    // <block> ::= '{' <statement>* '}'
    pub(super) fn parse_block(&mut self) -> Result<Block, CompileError> {
        let begin = self.peek_span();
        expect!(self, TokenType::LBrace, "'{'")?;
        let mut statements = Vec::<Statement>::new();
        loop {
            match self.peek_type() {
                TokenType::RBrace => {
                    self.next();
                    break;
                }
                TokenType::Eof => return Err(self.unexpected("'}'")),
                _ => statements.push(self.parse_statement()?),
            }
        }
        Ok(Block {
            span: begin.to(&self.last_span()),
            statements,
        })
    }

    // Parsing statements
    // <statement> ::= <function>
    //               | 'var' name ':' type '=' <expression> ';'
    //               | 'if' <expression> <block> ('else' (<block> | <if>))?
    //               | 'while' <expression> <block>
    //               | 'return' <expression>? ';'
    //               | name '=' <expression> ';'
    //               | <expression> ';'
    pub(super) fn parse_statement(&mut self) -> Result<Statement, CompileError> {
        let begin = self.peek_span();
        use TokenType::*;
        match self.peek_type() {
            Function => self.parse_function_definition(),

            Var => self.parse_variable_definition(),

            If => self.parse_if(),

            While => {
                self.next();
                let condition = self.parse_expression()?;
                let block = self.parse_block()?;
                Ok(Statement::While {
                    span: begin.to(&self.last_span()),
                    condition,
                    block,
                })
            }

            Return => {
                self.next();
                let expression = match self.peek_type() {
                    Semicolon => None,
                    _ => Some(self.parse_expression()?),
                };
                expect!(self, Semicolon, "';'")?;
                Ok(Statement::Return {
                    span: begin.to(&self.last_span()),
                    expression,
                })
            }

            Ident(_) if self.peek_nth_type(1) == &Assign => {
                let (dest, _) = self.expect_identifier("variable name")?;
                self.next();
                let value = self.parse_expression()?;
                expect!(self, Semicolon, "';'")?;
                Ok(Statement::Assign {
                    span: begin.to(&self.last_span()),
                    dest,
                    value,
                })
            }

            _ => {
                let expression = self.parse_expression()?;
                expect!(self, Semicolon, "';'")?;
                Ok(Statement::Expression {
                    span: begin.to(&self.last_span()),
                    expression,
                })
            }
        }
    }

    // An else-if chain is stored as an else block containing the nested if
    fn parse_if(&mut self) -> Result<Statement, CompileError> {
        let begin = self.peek_span();
        expect!(self, TokenType::If, "'if'")?;
        let condition = self.parse_expression()?;
        let block = self.parse_block()?;

        let else_block = if self.peek_type() == &TokenType::Else {
            self.next();
            match self.peek_type() {
                TokenType::LBrace => Some(self.parse_block()?),
                TokenType::If => {
                    let nested = self.parse_if()?;
                    Some(Block {
                        span: nested.span().clone(),
                        statements: vec![nested],
                    })
                }
                _ => return Err(self.unexpected("'{' or 'if'")),
            }
        } else {
            None
        };

        Ok(Statement::If {
            span: begin.to(&self.last_span()),
            condition,
            block,
            else_block,
        })
    }

    // Variables are always initialized
    // 'var' name ':' type '=' <expression> ';'
    fn parse_variable_definition(&mut self) -> Result<Statement, CompileError> {
        let begin = self.peek_span();
        expect!(self, TokenType::Var, "'var'")?;
        let (name, _) = self.expect_identifier("variable name")?;
        expect!(self, TokenType::Colon, "':'")?;
        let (declared_type, _) = self.expect_identifier("variable type")?;
        expect!(self, TokenType::Assign, "'='")?;
        let init = self.parse_expression()?;
        expect!(self, TokenType::Semicolon, "';'")?;

        Ok(Statement::DefineVariable {
            span: begin.to(&self.last_span()),
            declared_type,
            name,
            init,
        })
    }
}
