use std::fmt::{self, Display};

use colored::Colorize;

use crate::span::Span;

/// The stage of the pipeline an error originates from
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Io,
    Target,
    Internal,
}

/// A fatal diagnostic. The first one aborts the compilation.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub message: String,
}

impl CompileError {
    pub fn new(kind: ErrorKind, span: Option<Span>, message: String) -> CompileError {
        CompileError {
            kind,
            span,
            message,
        }
    }

    pub fn io(message: String) -> CompileError {
        CompileError::new(ErrorKind::Io, None, message)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical"),
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Semantic => write!(f, "semantic"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Target => write!(f, "target"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = format!("{} error: {}", self.kind, self.message);
        match &self.span {
            Some(span) => write!(f, "{}: {}", span, message.red()),
            None => write!(f, "{}", message.red()),
        }
    }
}

impl std::error::Error for CompileError {}

// Builds a CompileError of the given kind located at span
// error!(Semantic, span, "Identifier {} is not defined", name)
#[macro_export]
macro_rules! error {
    ($kind:ident, $span:expr, $( $exp:expr ),*) => {
        {
            let error = $crate::error::CompileError::new(
                $crate::error::ErrorKind::$kind,
                Some($span.clone()),
                format!($($exp,)*),
            );
            log::debug!("{}", error.message);
            error
        }
    };
}
