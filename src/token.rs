use std::collections::HashMap;
use std::fmt::Display;

use lazy_static::lazy_static;

use crate::span::Span;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum TokenType {
    //Declaration keywords
    Var,
    Function,

    //Statement keywords
    If,
    Else,
    While,
    Return,

    //Punctuation symbols
    LBrace,
    RBrace,
    LParenthesis,
    RParenthesis,
    Comma,
    Semicolon,
    Colon,

    //Operators
    Assign,
    Plus,
    Minus,
    Asterisk,
    Divide,
    Equal,
    Inequal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    //Types with a value
    ConstI(String),
    CString(String),
    Ident(String),

    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        use TokenType::*;
        let mut keywords = HashMap::new();
        keywords.insert("var", Var);
        keywords.insert("function", Function);
        keywords.insert("if", If);
        keywords.insert("else", Else);
        keywords.insert("while", While);
        keywords.insert("return", Return);
        keywords
    };
}

/// Looks up an identifier in the keyword table
pub fn keyword(identifier: &str) -> Option<TokenType> {
    KEYWORDS.get(identifier).cloned()
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Token {
    span: Span,
    token: TokenType,
}

pub fn punct<T: Into<TokenType>>(input: T) -> TokenType {
    input.into()
}

impl Token {
    pub fn new(token: TokenType, span: Span) -> Token {
        Token { span, token }
    }
    pub fn span(&self) -> &Span {
        &self.span
    }
    pub fn token(&self) -> TokenType {
        self.token.clone()
    }
    pub fn token_ref(&self) -> &TokenType {
        &self.token
    }
}

// Only single character tokens can be converted
impl From<char> for TokenType {
    fn from(c: char) -> TokenType {
        use TokenType::*;
        match c {
            '{' => LBrace,
            '}' => RBrace,
            '(' => LParenthesis,
            ')' => RParenthesis,
            ',' => Comma,
            ';' => Semicolon,
            ':' => Colon,
            '=' => Assign,
            '+' => Plus,
            '-' => Minus,
            '*' => Asterisk,
            '/' => Divide,
            '<' => Less,
            '>' => Greater,
            _ => {
                log::warn!(
                    "char to TokenType conversion with unimplemented character {}",
                    c
                );
                Semicolon
            }
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenType::*;
        match self {
            Var => write!(f, "'var'"),
            Function => write!(f, "'function'"),

            If => write!(f, "'if'"),
            Else => write!(f, "'else'"),
            While => write!(f, "'while'"),
            Return => write!(f, "'return'"),

            LBrace => write!(f, "'{{'"),
            RBrace => write!(f, "'}}'"),
            LParenthesis => write!(f, "'('"),
            RParenthesis => write!(f, "')'"),
            Comma => write!(f, "','"),
            Semicolon => write!(f, "';'"),
            Colon => write!(f, "':'"),

            Assign => write!(f, "'='"),
            Plus => write!(f, "'+'"),
            Minus => write!(f, "'-'"),
            Asterisk => write!(f, "'*'"),
            Divide => write!(f, "'/'"),
            Equal => write!(f, "'=='"),
            Inequal => write!(f, "'!='"),
            Less => write!(f, "'<'"),
            LessEqual => write!(f, "'<='"),
            Greater => write!(f, "'>'"),
            GreaterEqual => write!(f, "'>='"),

            Ident(val) => write!(f, "'{}'", val),
            ConstI(val) => write!(f, "'{}'", val),
            CString(val) => write!(f, "{:?}", val),

            Eof => write!(f, "end of file"),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token)
    }
}
