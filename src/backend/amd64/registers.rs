use std::fmt::Display;

use crate::backend::ir::IRSize;

// The scratch and argument registers used by the stack based code generator
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Register {
    Rax,
    Rcx,
    Rdx,
    Rdi,
    Rsi,
    R8,
    R9,
}

// Integer and pointer arguments in System V order
pub const CALL_REGS: [Register; 6] = {
    use Register::*;
    [Rdi, Rsi, Rdx, Rcx, R8, R9]
};

impl Register {
    pub fn to_string_i64(&self) -> &'static str {
        match self {
            Self::Rax => "rax",
            Self::Rcx => "rcx",
            Self::Rdx => "rdx",
            Self::Rdi => "rdi",
            Self::Rsi => "rsi",
            Self::R8 => "r8",
            Self::R9 => "r9",
        }
    }

    pub fn to_string_i32(&self) -> &'static str {
        match self {
            Self::Rax => "eax",
            Self::Rcx => "ecx",
            Self::Rdx => "edx",
            Self::Rdi => "edi",
            Self::Rsi => "esi",
            Self::R8 => "r8d",
            Self::R9 => "r9d",
        }
    }

    pub fn to_string_i8(&self) -> &'static str {
        match self {
            Self::Rax => "al",
            Self::Rcx => "cl",
            Self::Rdx => "dl",
            Self::Rdi => "dil",
            Self::Rsi => "sil",
            Self::R8 => "r8b",
            Self::R9 => "r9b",
        }
    }
}

// The precision selects the width of the register: format!("{:.32}", Register::Rax) is eax
impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(8) => write!(f, "{}", self.to_string_i8())?,
            Some(32) => write!(f, "{}", self.to_string_i32())?,
            Some(64) | None => write!(f, "{}", self.to_string_i64())?,
            Some(s) => log::error!("Unsupported precision {}", s),
        }
        Ok(())
    }
}

// Register width used for a value of the given size
pub fn width(size: IRSize) -> usize {
    match size {
        IRSize::S32 => 32,
        IRSize::P | IRSize::V => 64,
    }
}

// The NASM operand size keyword for memory accesses of the given size
pub fn size_keyword(size: IRSize) -> &'static str {
    match size {
        IRSize::S32 => "dword",
        IRSize::P | IRSize::V => "qword",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_selects_width() {
        assert_eq!(format!("{:.32}", Register::R8), "r8d");
        assert_eq!(format!("{:.64}", Register::Rdi), "rdi");
        assert_eq!(format!("{:.8}", Register::Rax), "al");
        assert_eq!(format!("{}", Register::Rsi), "rsi");
        assert_eq!(
            format!("{:.w$}", Register::Rcx, w = width(IRSize::S32)),
            "ecx"
        );
    }
}
