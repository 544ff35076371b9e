use super::ir::*;

/// The interface the generator emits IR through.
/// Functions are built one block at a time, instructions are appended to the current block.
/// Function construction may nest: begin_function while another function is open suspends it
/// until the matching finish_function.
pub trait IRBuilder {
    fn declare_function(&mut self, signature: IRSignature);
    // Opens a new function and positions at its entry block
    fn begin_function(&mut self, signature: IRSignature) -> IRLabel;
    fn finish_function(&mut self);

    fn append_block(&mut self, name: &str) -> IRLabel;
    fn position_at_end(&mut self, label: IRLabel);
    fn current_block(&self) -> Option<IRLabel>;
    // True if the current block already ends in a terminator
    fn is_terminated(&self) -> bool;

    fn next_vreg(&mut self) -> IRReg;
    fn add_variable(&mut self, size: IRSize, name: &str) -> usize;
    // Strings are module constants, equal strings share one index
    fn add_string(&mut self, value: &str) -> usize;
    fn push(&mut self, instruction: IRInstruction);
}

struct OpenFunction {
    function: IRFunction,
    position: IRLabel,
}

/// Builds an IRModule in memory
#[derive(Default)]
pub struct ModuleBuilder {
    module: IRModule,
    open: Vec<OpenFunction>,
}

impl ModuleBuilder {
    pub fn new() -> ModuleBuilder {
        ModuleBuilder::default()
    }

    // Declarations of functions that were defined later are dropped
    pub fn finish(mut self) -> IRModule {
        while !self.open.is_empty() {
            log::error!("Function left open at the end of the module");
            self.finish_function();
        }
        let functions = &self.module.functions;
        self.module
            .declarations
            .retain(|declaration| !functions.iter().any(|f| f.name == declaration.name));
        self.module
    }

    fn current(&self) -> Option<&OpenFunction> {
        self.open.last()
    }

    fn current_mut(&mut self) -> Option<&mut OpenFunction> {
        let current = self.open.last_mut();
        if current.is_none() {
            log::error!("IR emitted outside of a function");
        }
        current
    }
}

impl IRBuilder for ModuleBuilder {
    fn declare_function(&mut self, signature: IRSignature) {
        let known = self
            .module
            .declarations
            .iter()
            .any(|declaration| declaration.name == signature.name);
        if !known {
            log::trace!("Declaring {}", signature);
            self.module.declarations.push(signature);
        }
    }

    fn begin_function(&mut self, signature: IRSignature) -> IRLabel {
        log::trace!("Begin function {}", signature);
        let mut function = IRFunction::new(signature);
        function.blocks.push(IRBlock::new(0, "entry"));
        self.open.push(OpenFunction {
            function,
            position: 0,
        });
        0
    }

    fn finish_function(&mut self) {
        match self.open.pop() {
            Some(open) => {
                log::trace!("Finished function {}", open.function.name);
                self.module.functions.push(open.function)
            }
            None => log::error!("finish_function without an open function"),
        }
    }

    fn append_block(&mut self, name: &str) -> IRLabel {
        match self.current_mut() {
            Some(open) => {
                let label = open.function.blocks.len() as IRLabel;
                open.function.blocks.push(IRBlock::new(label, name));
                label
            }
            None => 0,
        }
    }

    fn position_at_end(&mut self, label: IRLabel) {
        if let Some(open) = self.current_mut() {
            if (label as usize) < open.function.blocks.len() {
                open.position = label;
            } else {
                log::error!("Positioned at unknown block {}", label);
            }
        }
    }

    fn current_block(&self) -> Option<IRLabel> {
        self.current().map(|open| open.position)
    }

    fn is_terminated(&self) -> bool {
        match self.current() {
            Some(open) => open.function.block(open.position).is_terminated(),
            None => false,
        }
    }

    fn next_vreg(&mut self) -> IRReg {
        match self.current_mut() {
            Some(open) => {
                let vreg = open.function.vreg_count;
                open.function.vreg_count += 1;
                vreg
            }
            None => 0,
        }
    }

    fn add_variable(&mut self, size: IRSize, name: &str) -> usize {
        match self.current_mut() {
            Some(open) => {
                open.function.variables.push(IRVariable {
                    size,
                    name: name.to_string(),
                });
                open.function.variables.len() - 1
            }
            None => 0,
        }
    }

    fn add_string(&mut self, value: &str) -> usize {
        let strings = &mut self.module.strings;
        match strings.iter().position(|string| string == value) {
            Some(index) => index,
            None => {
                strings.push(value.to_string());
                strings.len() - 1
            }
        }
    }

    fn push(&mut self, instruction: IRInstruction) {
        if let Some(open) = self.current_mut() {
            let block = &mut open.function.blocks[open.position as usize];
            if block.is_terminated() {
                log::error!(
                    "{:?} emitted after the terminator of block {}",
                    instruction,
                    block.label
                );
                return;
            }
            log::trace!("{}", instruction);
            block.instructions.push(instruction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(name: &str) -> IRSignature {
        IRSignature {
            name: name.to_string(),
            return_size: IRSize::S32,
            arguments: vec![],
        }
    }

    #[test]
    fn strings_are_deduplicated() {
        let mut builder = ModuleBuilder::new();
        assert_eq!(builder.add_string("a"), 0);
        assert_eq!(builder.add_string("b"), 1);
        assert_eq!(builder.add_string("a"), 0);
        assert_eq!(builder.finish().strings, vec!["a", "b"]);
    }

    #[test]
    fn nested_functions_resume_position() {
        let mut builder = ModuleBuilder::new();
        builder.begin_function(signature("main"));
        let second = builder.append_block("second");
        builder.position_at_end(second);
        let outer = builder.next_vreg();

        builder.begin_function(signature("inner"));
        assert_eq!(builder.current_block(), Some(0));
        assert_eq!(builder.next_vreg(), 0);
        let value = builder.next_vreg();
        builder.push(IRInstruction::Imm(IRSize::S32, value, 1));
        builder.push(IRInstruction::Ret(IRSize::S32, Some(value)));
        assert!(builder.is_terminated());
        builder.finish_function();

        assert_eq!(builder.current_block(), Some(second));
        assert!(!builder.is_terminated());
        builder.push(IRInstruction::Imm(IRSize::S32, outer, 0));
        builder.push(IRInstruction::Ret(IRSize::S32, Some(outer)));
        builder.finish_function();

        let module = builder.finish();
        let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["inner", "main"]);
        assert_eq!(module.function("main").unwrap().block(second).instructions.len(), 2);
    }

    #[test]
    fn nothing_is_appended_after_a_terminator() {
        let mut builder = ModuleBuilder::new();
        builder.begin_function(signature("f"));
        builder.push(IRInstruction::Ret(IRSize::V, None));
        builder.push(IRInstruction::Jmp(0));
        builder.finish_function();
        let module = builder.finish();
        assert_eq!(module.functions[0].blocks[0].instructions.len(), 1);
    }

    #[test]
    fn defined_declarations_are_dropped() {
        let mut builder = ModuleBuilder::new();
        builder.declare_function(signature("f"));
        builder.declare_function(signature("g"));
        builder.declare_function(signature("f"));
        builder.begin_function(signature("f"));
        builder.push(IRInstruction::Ret(IRSize::V, None));
        builder.finish_function();
        let module = builder.finish();
        assert_eq!(module.declarations, vec![signature("g")]);
    }
}
