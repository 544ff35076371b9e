mod emit;
mod registers;

use std::collections::HashSet;

use super::ir::*;
use super::Backend;

// A simple stack based code generator for x86_64 linux in NASM syntax
// Every virtual register and every variable gets its own 8 byte slot below rbp
// Instructions load their operands into scratch registers and store their result right away
pub struct BackendAMD64 {
    function_name: String,
    vreg_count: u32,
    stack_size: usize,
    function_names: HashSet<String>,
}

impl BackendAMD64 {
    pub fn new() -> BackendAMD64 {
        BackendAMD64 {
            function_name: String::new(),
            vreg_count: 0,
            stack_size: 0,
            function_names: HashSet::new(),
        }
    }

    // Memory operand of the slot of a virtual register
    fn vreg(&self, reg: IRReg) -> String {
        format!("[rbp-{}]", 8 * (reg as usize + 1))
    }

    // Memory operand of the slot of a variable
    fn variable(&self, index: usize) -> String {
        format!("[rbp-{}]", 8 * (self.vreg_count as usize + index + 1))
    }
}

impl Backend for BackendAMD64 {
    fn backend_type(&self) -> &'static str {
        "stack"
    }

    fn generate_global_prologue(&mut self) -> String {
        "default rel\n".to_string()
    }

    fn generate(&mut self, function: &IRFunction, function_names: &HashSet<String>) -> String {
        log::debug!("Generating amd64 assembly for {}", function.name);
        self.function_name = function.name.clone();
        self.vreg_count = function.vreg_count;
        self.function_names = function_names.clone();
        let slots = function.vreg_count as usize + function.variables.len();
        // rsp stays 16 byte aligned after the prologue
        self.stack_size = (slots * 8 + 15) / 16 * 16;

        let mut assembly = self.emit_prologue();
        for block in &function.blocks {
            assembly.push_str(&format!(".L{}:\n", block.label));
            for instruction in &block.instructions {
                assembly.push_str(&self.emit_instruction(instruction));
            }
        }
        assembly.push_str(&self.emit_epilogue());
        assembly
    }

    fn generate_globals(&mut self, module: &IRModule) -> String {
        let mut assembly = String::new();
        for declaration in &module.declarations {
            assembly.push_str(&self.emit_function_declaration(&declaration.name));
        }
        assembly.push_str(&self.emit_strings(&module.strings));
        assembly.push_str("section .note.GNU-stack noalloc noexec nowrite progbits\n");
        assembly
    }
}
