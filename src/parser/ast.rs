use crate::span::Span;

// The syntax tree owns all of its children
// Dropping the Program drops the entire tree

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub span: Span,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression {
        span: Span,
        expression: Expression,
    },
    If {
        span: Span,
        condition: Expression,
        block: Block,
        else_block: Option<Block>,
    },
    While {
        span: Span,
        condition: Expression,
        block: Block,
    },
    Return {
        span: Span,
        expression: Option<Expression>,
    },
    DefineVariable {
        span: Span,
        declared_type: String,
        name: String,
        init: Expression,
    },
    Assign {
        span: Span,
        dest: String,
        value: Expression,
    },
    FunctionDefine(FunctionDefinition),
}

/// A function definition or, without body, a declaration of an external function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub span: Span,
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub block: Option<Block>,
}

// Parameters are kept in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub span: Span,
    pub name: String,
    pub parameter_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub span: Span,
    pub variant: ExpressionVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionVariant {
    Equation(BinaryExpressionType, Box<Expression>, Box<Expression>),
    ImmediateInt(String),
    ImmediateString(String),
    Variable(String),
    FunctionCall(String, Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryExpressionType {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    Inequal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Statement {
    pub fn span(&self) -> &Span {
        use Statement::*;
        match self {
            Expression { span, .. }
            | If { span, .. }
            | While { span, .. }
            | Return { span, .. }
            | DefineVariable { span, .. }
            | Assign { span, .. } => span,
            FunctionDefine(function) => &function.span,
        }
    }
}

impl BinaryExpressionType {
    pub fn symbol(&self) -> &'static str {
        use BinaryExpressionType::*;
        match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Equal => "==",
            Inequal => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
        }
    }
}
