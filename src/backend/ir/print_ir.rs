use super::ir::*;
use std::fmt;
use std::fmt::Display;

// This prints the IR in an LLVM like format using the Display trait

impl Display for IRModule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (string, i) in self.strings.iter().zip(0..) {
            writeln!(f, "@str{} = \"{}\"", i, string.escape_debug())?;
        }
        for declaration in &self.declarations {
            writeln!(f, "declare {}", declaration)?;
        }
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{}", function)?;
        }
        Ok(())
    }
}

impl Display for IRSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @{}(", self.return_size, self.name)?;
        for (i, size) in self.arguments.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", size)?;
        }
        write!(f, ")")
    }
}

impl Display for IRFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "define {} {{", self.signature())?;
        for (variable, i) in self.variables.iter().zip(0..) {
            writeln!(f, "\t; ${} {} {}", i, variable.size, variable.name)?;
        }
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        writeln!(f, "}}")
    }
}

impl Display for IRBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "L{}: ; {}", self.label, self.name)?;
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

impl Display for IRInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use IRInstruction::*;
        let ins = self.to_type();
        match self {
            Imm(size, reg, value) => write!(f, "\t%{} = {} {} #{}", reg, ins, size, value),
            Str(reg, index) => write!(f, "\t%{} = {} ptr @str{}", reg, ins, index),
            Arg(size, reg, index) => write!(f, "\t%{} = {} {} #{}", reg, ins, size, index),
            AddrL(size, reg, index) => write!(f, "\t%{} = {} {} ${}", reg, ins, size, index),
            Load(size, result, address) => {
                write!(f, "\t%{} = {} {} %{}", result, ins, size, address)
            }
            Store(size, from, address) => write!(f, "\t{} {} %{}, %{}", ins, size, from, address),
            Add(size, result, left, right)
            | Sub(size, result, left, right)
            | Mul(size, result, left, right)
            | Div(size, result, left, right)
            | Eq(size, result, left, right)
            | Ne(size, result, left, right)
            | Lt(size, result, left, right)
            | Le(size, result, left, right)
            | Gt(size, result, left, right)
            | Ge(size, result, left, right) => {
                write!(f, "\t%{} = {} {} %{}, %{}", result, ins, size, left, right)
            }
            Call(size, result, name, arguments) => {
                match result {
                    Some(result) => write!(f, "\t%{} = {} {} @{}(", result, ins, size, name)?,
                    None => write!(f, "\t{} {} @{}(", ins, size, name)?,
                }
                for (i, (size, reg)) in arguments
                    .sizes
                    .iter()
                    .zip(arguments.arguments.iter())
                    .enumerate()
                {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} %{}", size, reg)?;
                }
                write!(f, ")")
            }
            Jmp(label) => write!(f, "\t{} L{}", ins, label),
            Jcc(size, reg, then, otherwise) => {
                write!(f, "\t{} {} %{}, L{}, L{}", ins, size, reg, then, otherwise)
            }
            Ret(size, Some(reg)) => write!(f, "\t{} {} %{}", ins, size, reg),
            Ret(size, None) => write!(f, "\t{} {}", ins, size),
        }
    }
}

impl Display for IRType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use IRType::*;
        match self {
            Imm => write!(f, "loadi"),
            Str => write!(f, "str"),
            Arg => write!(f, "arg"),
            AddrL => write!(f, "addrl"),
            Load => write!(f, "load"),
            Store => write!(f, "store"),
            Add => write!(f, "add"),
            Sub => write!(f, "sub"),
            Mul => write!(f, "mul"),
            Div => write!(f, "div"),
            Eq => write!(f, "eq"),
            Ne => write!(f, "ne"),
            Lt => write!(f, "lt"),
            Le => write!(f, "le"),
            Gt => write!(f, "gt"),
            Ge => write!(f, "ge"),
            Call => write!(f, "call"),
            Jmp => write!(f, "jmp"),
            Jcc => write!(f, "jcc"),
            Ret => write!(f, "ret"),
        }
    }
}

impl Display for IRSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IRSize::S32 => write!(f, "i32"),
            IRSize::P => write!(f, "ptr"),
            IRSize::V => write!(f, "void"),
        }
    }
}
