use super::ast::*;
use super::Parser;

use crate::error::CompileError;
use crate::token::TokenType;

impl Parser {
    // The public parser function used by the compiler
    // Parses statements until the end of the file
    // Declarations and other statements may be mixed freely
    // <program> ::= <statement>*
    pub fn parse_program(&mut self) -> Result<Program, CompileError> {
        log::info!("Parser started");
        let begin = self.peek_span();
        let mut statements = Vec::<Statement>::new();
        while self.peek_type() != &TokenType::Eof {
            statements.push(self.parse_statement()?);
        }
        let span = begin.to(&self.peek_span());
        log::debug!("Parsed {} top level statements", statements.len());
        Ok(Program {
            block: Block { span, statements },
        })
    }

    // Parses a function definition, or a declaration when the body is missing
    // <function> ::= 'function' name '(' <parameters>? ')' ':' type (<block> | ';')
    pub(super) fn parse_function_definition(&mut self) -> Result<Statement, CompileError> {
        let begin = self.peek_span();
        expect!(self, TokenType::Function, "'function'")?;
        let (name, _) = self.expect_identifier("function name")?;

        expect!(self, TokenType::LParenthesis, "'('")?;
        let parameters = self.parse_parameters()?;
        expect!(self, TokenType::RParenthesis, "')'")?;

        expect!(self, TokenType::Colon, "':'")?;
        let (return_type, _) = self.expect_identifier("return type")?;

        let block = match self.peek_type() {
            TokenType::LBrace => Some(self.parse_block()?),
            TokenType::Semicolon => {
                self.next();
                None
            }
            _ => return Err(self.unexpected("'{' or ';'")),
        };

        log::trace!(
            "Function {} with {} parameters{}",
            name,
            parameters.len(),
            if block.is_none() { " (declaration)" } else { "" }
        );

        Ok(Statement::FunctionDefine(FunctionDefinition {
            span: begin.to(&self.last_span()),
            name,
            return_type,
            parameters,
            block,
        }))
    }

    // Parses the possibly empty parameter list, keeping the declaration order
    // <parameters> ::= <parameter> (',' <parameter>)*
    // <parameter> ::= name ':' type
    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, CompileError> {
        let mut parameters = Vec::new();
        if self.peek_type() == &TokenType::RParenthesis {
            return Ok(parameters);
        }
        loop {
            let (name, begin) = self.expect_identifier("parameter name")?;
            expect!(self, TokenType::Colon, "':'")?;
            let (parameter_type, _) = self.expect_identifier("parameter type")?;
            parameters.push(Parameter {
                span: begin.to(&self.last_span()),
                name,
                parameter_type,
            });
            if self.peek_type() == &TokenType::Comma {
                self.next();
            } else {
                break;
            }
        }
        Ok(parameters)
    }
}
