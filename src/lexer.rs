use std::iter::Fuse;
use std::str::Chars;

use crate::error;
use crate::error::CompileError;
use crate::span::Span;
use crate::token;
use crate::token::Token;
use crate::token::TokenType;

// The Lexer is a mutuable structure keeping track of the current location in the source
// It can work on any arbitrary iterator that returns characters
pub struct Lexer<T: Iterator<Item = char>> {
    input: Fuse<T>,
    line: u32,
    column: u32,
    offset: u32,
    last_char: Option<char>,
}

impl<'a> Lexer<Chars<'a>> {
    pub fn from_source(source: &'a str) -> Lexer<Chars<'a>> {
        Lexer::new(source.chars())
    }
}

impl<T: Iterator<Item = char>> Lexer<T> {
    pub fn new(input: T) -> Lexer<T> {
        Lexer {
            input: input.fuse(),
            line: 1,
            column: 1,
            offset: 0,
            last_char: None,
        }
    }

    // Returns the location of the next character
    fn here(&self) -> Span {
        Span::new(self.line, self.column, self.offset, 1)
    }

    // Returns the area from start up to the current location
    fn span_from(&self, start: &Span) -> Span {
        Span::new(
            start.line(),
            start.column(),
            start.offset(),
            self.offset - start.offset(),
        )
    }

    fn peek(&mut self) -> Option<char> {
        if self.last_char.is_none() {
            self.last_char = self.input.next();
        }
        self.last_char
    }

    fn next(&mut self) -> Option<char> {
        let result = self.peek();
        self.last_char = None;
        // Keeping track of current character location and offset
        if let Some(c) = result {
            self.offset += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    /// Lexes the entire input. The last token is always Eof.
    pub fn lex(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut output = Vec::<Token>::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.token_ref() == &TokenType::Eof;
            output.push(token);
            if is_eof {
                break;
            }
        }
        log::debug!("Lexed {} tokens", output.len());
        Ok(output)
    }

    /// Scans a single token, skipping whitespace and comments.
    /// Once the input is exhausted every call returns Eof.
    // More complex analysis like identifiers and numbers are split out
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        loop {
            let start = self.here();
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return Ok(Token::new(
                        TokenType::Eof,
                        Span::new(self.line, self.column, self.offset, 0),
                    ))
                }
            };
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.next();
                }
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.lex_identifier()),
                '0'..='9' => return Ok(self.lex_number()),
                '"' => return self.lex_string(),
                '/' => {
                    self.next();
                    match self.peek() {
                        Some('/') => self.skip_line_comment(),
                        Some('*') => self.skip_block_comment(&start)?,
                        _ => return Ok(Token::new(TokenType::Divide, self.span_from(&start))),
                    }
                }
                ';' | '{' | '}' | '(' | ')' | '+' | '-' | '*' | ':' | ',' => {
                    self.next();
                    return Ok(Token::new(token::punct(c), self.span_from(&start)));
                }
                '=' | '!' | '<' | '>' => {
                    self.next();
                    if let Some('=') = self.peek() {
                        self.next();
                        let token = match c {
                            '=' => TokenType::Equal,
                            '!' => TokenType::Inequal,
                            '<' => TokenType::LessEqual,
                            '>' => TokenType::GreaterEqual,
                            _ => unreachable!(),
                        };
                        return Ok(Token::new(token, self.span_from(&start)));
                    } else if c == '!' {
                        return Err(error!(Lexical, start, "Unknown character '!'"));
                    } else {
                        return Ok(Token::new(token::punct(c), self.span_from(&start)));
                    }
                }
                _ => {
                    self.next();
                    return Err(error!(Lexical, start, "Unknown character {:?}", c));
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.next() {
            if c == '\n' {
                break;
            }
        }
    }

    // The opening '/' has already been consumed, the '*' has not
    fn skip_block_comment(&mut self, start: &Span) -> Result<(), CompileError> {
        self.next();
        let mut last = None;
        loop {
            match self.next() {
                Some('/') if last == Some('*') => return Ok(()),
                Some(c) => last = Some(c),
                None => {
                    return Err(error!(
                        Lexical,
                        self.span_from(start),
                        "Unterminated comment, expected */ before end of file"
                    ))
                }
            }
        }
    }

    // Lex an identifier or keyword
    fn lex_identifier(&mut self) -> Token {
        let start = self.here();
        let mut identifier = String::new();
        while let Some(c) = self.peek() {
            match c {
                'a'..='z' | 'A'..='Z' | '_' | '0'..='9' => {
                    self.next();
                    identifier.push(c);
                }
                _ => break,
            }
        }
        let span = self.span_from(&start);
        match token::keyword(&identifier) {
            Some(keyword) => Token::new(keyword, span),
            None => Token::new(TokenType::Ident(identifier), span),
        }
    }

    // Lex a number
    // The digits are kept as text, the width is decided during evaluation
    fn lex_number(&mut self) -> Token {
        let start = self.here();
        let mut number = String::new();
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.next();
                    number.push(c);
                }
                _ => break,
            }
        }
        Token::new(TokenType::ConstI(number), self.span_from(&start))
    }

    fn lex_string(&mut self) -> Result<Token, CompileError> {
        let start = self.here();
        let mut string = String::new();
        self.next();

        loop {
            let escape = self.here();
            match self.next() {
                Some('"') => break,
                Some('\\') => string.push(self.lex_escape(&escape)?),
                Some('\n') | None => {
                    return Err(error!(
                        Lexical,
                        self.span_from(&start),
                        "Unterminated string literal"
                    ))
                }
                Some(c) => string.push(c),
            }
        }

        Ok(Token::new(TokenType::CString(string), self.span_from(&start)))
    }

    //   \" \\ \n \t \r \0
    fn lex_escape(&mut self, start: &Span) -> Result<char, CompileError> {
        match self.next() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('0') => Ok('\0'),
            Some(c) if c != '\n' => Err(error!(
                Lexical,
                start,
                "Expected an escape sequence in string, but found '\\{}'",
                c
            )),
            _ => Err(error!(
                Lexical,
                start,
                "Unterminated string literal"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lexer;
    use crate::error::ErrorKind;
    use crate::span::Span;
    use crate::token::TokenType::{self, *};
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenType> {
        Lexer::from_source(source)
            .lex()
            .unwrap()
            .into_iter()
            .map(|t| t.token())
            .collect()
    }

    #[test]
    fn function_definition() {
        assert_eq!(
            kinds("function add(a: int, b: int): int { return a + b; }"),
            vec![
                Function,
                Ident("add".into()),
                LParenthesis,
                Ident("a".into()),
                Colon,
                Ident("int".into()),
                Comma,
                Ident("b".into()),
                Colon,
                Ident("int".into()),
                RParenthesis,
                Colon,
                Ident("int".into()),
                LBrace,
                Return,
                Ident("a".into()),
                Plus,
                Ident("b".into()),
                Semicolon,
                RBrace,
                Eof,
            ]
        );
    }

    #[test]
    fn longest_match_operators() {
        assert_eq!(
            kinds("= == != < <= > >= / * -"),
            vec![
                Assign,
                Equal,
                Inequal,
                Less,
                LessEqual,
                Greater,
                GreaterEqual,
                Divide,
                Asterisk,
                Minus,
                Eof
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("var if else while return function _x1 iff"),
            vec![
                Var,
                If,
                Else,
                While,
                Return,
                Function,
                Ident("_x1".into()),
                Ident("iff".into()),
                Eof
            ]
        );
    }

    #[test]
    fn integer_literal_kept_as_text() {
        assert_eq!(
            kinds("007 123456789012345678901234567890"),
            vec![
                ConstI("007".into()),
                ConstI("123456789012345678901234567890".into()),
                Eof
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let source = "a // line comment\n/* block\n * comment */ b / c";
        assert_eq!(
            kinds(source),
            vec![
                Ident("a".into()),
                Ident("b".into()),
                Divide,
                Ident("c".into()),
                Eof
            ]
        );
    }

    #[test]
    fn string_escapes_are_resolved() {
        assert_eq!(
            kinds(r#""say \"hi\"\\ \n""#),
            vec![CString("say \"hi\"\\ \n".into()), Eof]
        );
    }

    #[test]
    fn unterminated_string() {
        let error = Lexer::from_source("\"abc").lex().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Lexical);
        assert_eq!(error.message, "Unterminated string literal");
    }

    #[test]
    fn unterminated_comment() {
        let error = Lexer::from_source("a /* never closed").lex().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Lexical);
    }

    #[test]
    fn unknown_character_reports_position() {
        let error = Lexer::from_source("var x\n  @").lex().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Lexical);
        assert_eq!(error.message, "Unknown character '@'");
        let span = error.span.unwrap();
        assert_eq!((span.line(), span.column()), (2, 3));
    }

    #[test]
    fn lone_exclamation_mark_is_rejected() {
        let error = Lexer::from_source("a ! b").lex().unwrap_err();
        assert_eq!(error.message, "Unknown character '!'");
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::from_source("x");
        assert_eq!(lexer.next_token().unwrap().token(), Ident("x".into()));
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().token(), Eof);
        }
    }

    #[test]
    fn token_spans() {
        let tokens = Lexer::from_source("var x\n  == 42").lex().unwrap();
        assert_eq!(tokens[0].span(), &Span::new(1, 1, 0, 3));
        assert_eq!(tokens[1].span(), &Span::new(1, 5, 4, 1));
        assert_eq!(tokens[2].span(), &Span::new(2, 3, 8, 2));
        assert_eq!(tokens[3].span(), &Span::new(2, 6, 11, 2));
    }

    #[test]
    fn lexing_is_idempotent() {
        let source = "while (i < 10) { i = i + 1; print(\"x\"); }";
        let first = Lexer::from_source(source).lex().unwrap();
        let second = Lexer::from_source(source).lex().unwrap();
        assert_eq!(first, second);
    }
}
