use crate::backend::ir::*;
use crate::error;
use crate::error::CompileError;
use crate::span::Span;
use crate::table::{DeclarationType, FunctionSignature, SymbolTable, Type};

/// The result of an expression: the register holding it and its type.
/// Calls to void functions have no register.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Value {
    pub vreg: Option<IRReg>,
    pub value_type: Type,
}

impl Value {
    pub fn new(vreg: IRReg, value_type: Type) -> Value {
        Value {
            vreg: Some(vreg),
            value_type,
        }
    }
}

// The function whose body is being generated
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

pub struct EvaluationContext<'a> {
    pub builder: &'a mut dyn IRBuilder,
    pub symbol_table: SymbolTable,
    pub function: Option<FunctionContext>,
    main_open: bool,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(builder: &'a mut dyn IRBuilder) -> EvaluationContext<'a> {
        EvaluationContext {
            builder,
            symbol_table: SymbolTable::new(),
            function: None,
            main_open: false,
        }
    }

    pub fn next_vreg(&mut self) -> IRReg {
        self.builder.next_vreg()
    }

    pub fn push(&mut self, instruction: IRInstruction) {
        self.builder.push(instruction)
    }

    // Checks that value has the expected type and returns its register
    pub fn expect_type(
        &self,
        span: &Span,
        value: Value,
        expected: Type,
        context: &str,
    ) -> Result<IRReg, CompileError> {
        match value.vreg {
            Some(vreg) if value.value_type == expected => Ok(vreg),
            _ => Err(error!(
                Semantic,
                span,
                "Type mismatch in {}: expected {}, but found {}",
                context,
                expected,
                value.value_type
            )),
        }
    }

    // Statements outside of function definitions make up the body of main
    // main is opened by the first of them and shares the rules of an explicit main(): int
    pub fn enter_main(&mut self, span: &Span) -> Result<(), CompileError> {
        if self.main_open {
            return Ok(());
        }
        let signature = FunctionSignature {
            name: "main".to_string(),
            return_type: Type::Int,
            parameters: Vec::new(),
        };
        if self
            .symbol_table
            .try_insert_function(signature, DeclarationType::Definition)
            .is_err()
        {
            return Err(error!(
                Semantic,
                span,
                "Statements outside of a function conflict with the definition of main"
            ));
        }
        log::debug!("Opening implicit main");
        self.builder.begin_function(IRSignature {
            name: "main".to_string(),
            return_size: IRSize::S32,
            arguments: Vec::new(),
        });
        self.symbol_table.enter_scope();
        self.function = Some(FunctionContext {
            name: "main".to_string(),
            return_type: Type::Int,
        });
        self.main_open = true;
        Ok(())
    }

    // main implicitly returns 0 when control reaches its end
    pub fn finish_main(&mut self) {
        if !self.main_open {
            return;
        }
        if !self.builder.is_terminated() {
            let vreg = self.next_vreg();
            self.push(IRInstruction::Imm(IRSize::S32, vreg, 0));
            self.push(IRInstruction::Ret(IRSize::S32, Some(vreg)));
        }
        self.symbol_table.leave_scope();
        self.builder.finish_function();
        self.function = None;
        self.main_open = false;
    }
}
