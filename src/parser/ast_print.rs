use super::ast::*;
use std::fmt;
use std::fmt::Display;

// This module implements the Display trait for the AST
// The print-out is the indented tree written by --ast
// Every node prints its own name, its children are indented one level deeper

trait Dump {
    fn dump(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result;
}

fn indent(f: &mut fmt::Formatter, count: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = count * 2)
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Program(")?;
        indent(f, 1)?;
        write!(f, "block: ")?;
        self.block.dump(f, 1)?;
        writeln!(f, ")")
    }
}

impl Dump for Block {
    fn dump(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        writeln!(f, "Block: [")?;
        for statement in &self.statements {
            indent(f, level + 1)?;
            statement.dump(f, level + 1)?;
        }
        indent(f, level)?;
        writeln!(f, "]")
    }
}

impl Dump for Statement {
    fn dump(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        use Statement::*;
        match self {
            Expression { expression, .. } => expression.dump(f, level),

            If {
                condition,
                block,
                else_block,
                ..
            } => {
                write!(f, "If(condition: ")?;
                condition.dump(f, level + 1)?;
                indent(f, level + 1)?;
                write!(f, "true: ")?;
                block.dump(f, level + 1)?;
                indent(f, level + 1)?;
                write!(f, "false: ")?;
                match else_block {
                    Some(block) => block.dump(f, level + 1)?,
                    None => writeln!(f, "(none)")?,
                }
                indent(f, level)?;
                writeln!(f, ")")
            }

            While {
                condition, block, ..
            } => {
                write!(f, "While(condition: ")?;
                condition.dump(f, level + 1)?;
                indent(f, level + 1)?;
                write!(f, "block: ")?;
                block.dump(f, level + 1)?;
                indent(f, level)?;
                writeln!(f, ")")
            }

            Return { expression, .. } => {
                write!(f, "Return(expr: ")?;
                match expression {
                    Some(expression) => expression.dump(f, level + 1)?,
                    None => writeln!(f, "(void return)")?,
                }
                indent(f, level)?;
                writeln!(f, ")")
            }

            DefineVariable {
                declared_type,
                name,
                init,
                ..
            } => {
                writeln!(f, "DefineVariable(type: {}, dest: {}", declared_type, name)?;
                indent(f, level + 1)?;
                write!(f, "value: ")?;
                init.dump(f, level + 1)?;
                indent(f, level)?;
                writeln!(f, ")")
            }

            Assign { dest, value, .. } => {
                writeln!(f, "Assign(dest: {}", dest)?;
                indent(f, level + 1)?;
                write!(f, "value: ")?;
                value.dump(f, level + 1)?;
                indent(f, level)?;
                writeln!(f, ")")
            }

            FunctionDefine(function) => function.dump(f, level),
        }
    }
}

impl Dump for FunctionDefinition {
    fn dump(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        writeln!(f, "FunctionDef(")?;
        indent(f, level + 1)?;
        writeln!(f, "name: {}", self.name)?;
        indent(f, level + 1)?;
        writeln!(f, "retType: {}", self.return_type)?;

        indent(f, level + 1)?;
        writeln!(f, "args: [")?;
        for parameter in &self.parameters {
            indent(f, level + 2)?;
            writeln!(
                f,
                "Arg(type: {}, name: {})",
                parameter.parameter_type, parameter.name
            )?;
        }
        indent(f, level + 1)?;
        writeln!(f, "]")?;

        indent(f, level + 1)?;
        write!(f, "statements: ")?;
        match &self.block {
            Some(block) => block.dump(f, level + 1)?,
            None => writeln!(f, "(declaration)")?,
        }
        indent(f, level)?;
        writeln!(f, ")")
    }
}

impl Dump for Expression {
    fn dump(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        use ExpressionVariant::*;
        match &self.variant {
            Equation(op, left, right) => {
                writeln!(f, "Equation(operator: {}", op.symbol())?;
                indent(f, level + 1)?;
                write!(f, "lhs: ")?;
                left.dump(f, level + 1)?;
                indent(f, level + 1)?;
                write!(f, "rhs: ")?;
                right.dump(f, level + 1)?;
                indent(f, level)?;
                writeln!(f, ")")
            }
            ImmediateInt(value) => writeln!(f, "ImmediateInt(value: {})", value),
            ImmediateString(value) => writeln!(f, "ImmediateString(value: {:?})", value),
            Variable(name) => writeln!(f, "Variable(name: {})", name),
            FunctionCall(name, arguments) => {
                writeln!(f, "FunctionCall(name: {}", name)?;
                indent(f, level + 1)?;
                writeln!(f, "args: [")?;
                for argument in arguments {
                    indent(f, level + 2)?;
                    argument.dump(f, level + 2)?;
                }
                indent(f, level + 1)?;
                writeln!(f, "]")?;
                indent(f, level)?;
                writeln!(f, ")")
            }
        }
    }
}
