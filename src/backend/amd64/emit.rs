use super::registers::{size_keyword, width, Register, CALL_REGS};
use super::BackendAMD64;
use crate::backend::ir::*;

impl BackendAMD64 {
    // Emits the assembly for a single instruction
    // Operands are always reloaded from their slots, results are always written back
    pub fn emit_instruction(&self, instruction: &IRInstruction) -> String {
        use IRInstruction::*;
        use Register::*;
        match instruction {
            Imm(size, reg, value) => format!(
                "\tmov {} {}, {}\n",
                size_keyword(*size),
                self.vreg(*reg),
                value
            ),

            Str(reg, index) => format!(
                "\tlea rax, [{}]\n\tmov {}, rax\n",
                string_label(*index),
                self.vreg(*reg)
            ),

            Arg(size, reg, index) => match CALL_REGS.get(*index) {
                Some(register) => format!(
                    "\tmov {}, {:.w$}\n",
                    self.vreg(*reg),
                    register,
                    w = width(*size)
                ),
                // Stack arguments start above the return address and the saved rbp
                None => format!(
                    "\tmov {:.w$}, {} [rbp+{}]\n\tmov {}, {:.w$}\n",
                    Rax,
                    size_keyword(*size),
                    16 + 8 * (index - CALL_REGS.len()),
                    self.vreg(*reg),
                    Rax,
                    w = width(*size)
                ),
            },

            AddrL(_, reg, index) => format!(
                "\tlea rax, {}\n\tmov {}, rax\n",
                self.variable(*index),
                self.vreg(*reg)
            ),

            Load(size, result, address) => format!(
                "\tmov rax, {}\n\tmov {:.w$}, {} [rax]\n\tmov {}, {:.w$}\n",
                self.vreg(*address),
                Rcx,
                size_keyword(*size),
                self.vreg(*result),
                Rcx,
                w = width(*size)
            ),

            Store(size, from, address) => format!(
                "\tmov rax, {}\n\tmov {:.w$}, {} {}\n\tmov {} [rax], {:.w$}\n",
                self.vreg(*address),
                Rcx,
                size_keyword(*size),
                self.vreg(*from),
                size_keyword(*size),
                Rcx,
                w = width(*size)
            ),

            Add(size, result, left, right) => self.emit_arithmetic("add", *size, *result, *left, *right),
            Sub(size, result, left, right) => self.emit_arithmetic("sub", *size, *result, *left, *right),
            Mul(size, result, left, right) => {
                self.emit_arithmetic("imul", *size, *result, *left, *right)
            }

            Div(size, result, left, right) => format!(
                "\tmov {:.w$}, {} {}\n\t{}\n\tidiv {} {}\n\tmov {}, {:.w$}\n",
                Rax,
                size_keyword(*size),
                self.vreg(*left),
                if *size == IRSize::S32 { "cdq" } else { "cqo" },
                size_keyword(*size),
                self.vreg(*right),
                self.vreg(*result),
                Rax,
                w = width(*size)
            ),

            Eq(size, result, left, right) => self.emit_comparison("sete", *size, *result, *left, *right),
            Ne(size, result, left, right) => {
                self.emit_comparison("setne", *size, *result, *left, *right)
            }
            Lt(size, result, left, right) => self.emit_comparison("setl", *size, *result, *left, *right),
            Le(size, result, left, right) => {
                self.emit_comparison("setle", *size, *result, *left, *right)
            }
            Gt(size, result, left, right) => self.emit_comparison("setg", *size, *result, *left, *right),
            Ge(size, result, left, right) => {
                self.emit_comparison("setge", *size, *result, *left, *right)
            }

            Call(size, result, name, arguments) => self.emit_call(*size, *result, name, arguments),

            Jmp(label) => format!("\tjmp .L{}\n", label),

            Jcc(size, reg, then, otherwise) => format!(
                "\tcmp {} {}, 0\n\tjne .L{}\n\tjmp .L{}\n",
                size_keyword(*size),
                self.vreg(*reg),
                then,
                otherwise
            ),

            Ret(size, Some(reg)) => format!(
                "\tmov {:.w$}, {} {}\n\tjmp .end\n",
                Rax,
                size_keyword(*size),
                self.vreg(*reg),
                w = width(*size)
            ),
            Ret(_, None) => "\tjmp .end\n".to_string(),
        }
    }

    fn emit_arithmetic(
        &self,
        operation: &str,
        size: IRSize,
        result: IRReg,
        left: IRReg,
        right: IRReg,
    ) -> String {
        format!(
            "\tmov {:.w$}, {} {}\n\t{} {:.w$}, {} {}\n\tmov {}, {:.w$}\n",
            Register::Rax,
            size_keyword(size),
            self.vreg(left),
            operation,
            Register::Rax,
            size_keyword(size),
            self.vreg(right),
            self.vreg(result),
            Register::Rax,
            w = width(size)
        )
    }

    // Comparisons produce 0 or 1 as a 32 bit int
    fn emit_comparison(
        &self,
        set: &str,
        size: IRSize,
        result: IRReg,
        left: IRReg,
        right: IRReg,
    ) -> String {
        format!(
            "\tmov {:.w$}, {} {}\n\tcmp {:.w$}, {} {}\n\t{} al\n\tmovzx eax, al\n\tmov {}, eax\n",
            Register::Rax,
            size_keyword(size),
            self.vreg(left),
            Register::Rax,
            size_keyword(size),
            self.vreg(right),
            set,
            self.vreg(result),
            w = width(size)
        )
    }

    // System V: the first six arguments in registers, the rest pushed right to left
    // rsp must be 16 byte aligned at the call, an odd number of pushes is padded
    fn emit_call(
        &self,
        size: IRSize,
        result: Option<IRReg>,
        name: &str,
        arguments: &IRArguments,
    ) -> String {
        let mut assembly = String::new();
        let count = arguments.arguments.len();
        let stack_arguments = count.saturating_sub(CALL_REGS.len());
        let padding = if stack_arguments % 2 == 1 { 8 } else { 0 };
        if padding != 0 {
            assembly.push_str(&format!("\tsub rsp, {}\n", padding));
        }

        let arguments: Vec<(IRSize, IRReg)> = arguments
            .sizes
            .iter()
            .copied()
            .zip(arguments.arguments.iter().copied())
            .collect();
        for (size, reg) in arguments.iter().skip(CALL_REGS.len()).rev() {
            match size {
                IRSize::S32 => {
                    assembly.push_str(&format!("\tmovsxd rax, dword {}\n", self.vreg(*reg)))
                }
                _ => assembly.push_str(&format!("\tmov rax, qword {}\n", self.vreg(*reg))),
            }
            assembly.push_str("\tpush rax\n");
        }
        for ((size, reg), register) in arguments.iter().zip(CALL_REGS.iter()) {
            assembly.push_str(&format!(
                "\tmov {:.w$}, {} {}\n",
                register,
                size_keyword(*size),
                self.vreg(*reg),
                w = width(*size)
            ));
        }

        // al holds the number of vector registers used by a variadic call
        assembly.push_str("\txor eax, eax\n");
        let outside_file = if self.function_names.contains(name) {
            ""
        } else {
            " wrt ..plt"
        };
        assembly.push_str(&format!("\tcall {}{}\n", symbol(name), outside_file));

        let cleanup = 8 * stack_arguments + padding;
        if cleanup != 0 {
            assembly.push_str(&format!("\tadd rsp, {}\n", cleanup));
        }
        if let Some(result) = result {
            assembly.push_str(&format!(
                "\tmov {}, {:.w$}\n",
                self.vreg(result),
                Register::Rax,
                w = width(size)
            ));
        }
        assembly
    }

    pub fn emit_function_declaration(&self, name: &str) -> String {
        format!("extern {}\n", symbol(name))
    }

    // Emits the prologue for a function, such that it will be correct for the compiler
    pub fn emit_prologue(&self) -> String {
        let name = symbol(&self.function_name);
        let mut prologue = format!(
            "global {}\nsection .text\n{}:\n\tpush rbp\n\tmov rbp, rsp\n",
            name, name
        );
        if self.stack_size != 0 {
            prologue.push_str(&format!("\tsub rsp, {}\n", self.stack_size));
        }
        prologue
    }

    // Every return jumps to the shared epilogue
    pub fn emit_epilogue(&self) -> String {
        let mut epilogue = ".end:\n".to_string();
        if self.stack_size != 0 {
            epilogue.push_str(&format!("\tadd rsp, {}\n", self.stack_size));
        }
        epilogue.push_str("\tpop rbp\n\tret\n");
        epilogue
    }

    // Strings are stored as zero terminated bytes
    pub fn emit_strings(&self, strings: &[String]) -> String {
        if strings.is_empty() {
            return String::new();
        }
        let mut result = String::from("section .rodata\n");
        for (string, i) in strings.iter().zip(0..) {
            result.push_str(&format!("{}:\n\tdb ", string_label(i)));
            for b in string.bytes() {
                result.push_str(&format!("{},", b))
            }
            result.push_str("0\n")
        }
        result
    }
}

// Function names are escaped so names like add or loop are not read as instructions
fn symbol(name: &str) -> String {
    format!("${}", name)
}

fn string_label(index: usize) -> String {
    format!("__string{}", index)
}
