use std::collections::HashSet;

use super::evaluation_context::FunctionContext;
use super::{Evaluate, EvaluationContext};
use crate::backend::ir::*;
use crate::error;
use crate::error::CompileError;
use crate::parser::ast::*;
use crate::table::{DeclarationType, FunctionConflict, FunctionSignature, Symbol, Type};

impl FunctionDefinition {
    // Resolves the source type names of the signature
    pub(super) fn signature(&self) -> Result<FunctionSignature, CompileError> {
        let return_type = match Type::resolve(&self.return_type) {
            Some(typ) => typ,
            None => {
                return Err(error!(
                    Semantic,
                    self.span,
                    "Unknown return type '{}' of function {}",
                    self.return_type,
                    self.name
                ))
            }
        };

        let mut names = HashSet::new();
        let mut parameters = Vec::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            let parameter_type = match Type::resolve(&parameter.parameter_type) {
                Some(Type::Void) => {
                    return Err(error!(
                        Semantic,
                        parameter.span,
                        "Parameter {} can not have type void",
                        parameter.name
                    ))
                }
                Some(typ) => typ,
                None => {
                    return Err(error!(
                        Semantic,
                        parameter.span,
                        "Unknown type '{}' of parameter {}",
                        parameter.parameter_type,
                        parameter.name
                    ))
                }
            };
            if !names.insert(parameter.name.as_str()) {
                return Err(error!(
                    Semantic,
                    parameter.span,
                    "Parameter {} of function {} is declared twice",
                    parameter.name,
                    self.name
                ));
            }
            parameters.push((parameter.name.clone(), parameter_type));
        }

        Ok(FunctionSignature {
            name: self.name.clone(),
            return_type,
            parameters,
        })
    }

    // Registers the function and generates its body if it has one
    // The body is generated in isolation: the locals of an enclosing implicit main are hidden
    pub(super) fn eval_global(&self, context: &mut EvaluationContext) -> Result<(), CompileError> {
        let signature = self.signature()?;
        let declaration_type = match self.block {
            Some(_) => DeclarationType::Definition,
            None => DeclarationType::Declaration,
        };
        match context
            .symbol_table
            .try_insert_function(signature.clone(), declaration_type)
        {
            Ok(()) => (),
            Err(FunctionConflict::Signature) => {
                return Err(error!(
                    Semantic,
                    self.span,
                    "Conflicting types for function {}",
                    signature
                ))
            }
            Err(FunctionConflict::Redefinition) => {
                return Err(error!(
                    Semantic,
                    self.span,
                    "Function {} is already defined",
                    self.name
                ))
            }
        }

        let ir_signature = IRSignature {
            name: signature.name.clone(),
            return_size: signature.return_type.irsize(),
            arguments: signature
                .parameters
                .iter()
                .map(|(_, typ)| typ.irsize())
                .collect(),
        };
        let block = match &self.block {
            Some(block) => block,
            None => {
                context.builder.declare_function(ir_signature);
                return Ok(());
            }
        };

        log::debug!("Generating function {}", signature);
        let saved_locals = context.symbol_table.suspend_locals();
        let saved_function = context.function.replace(FunctionContext {
            name: signature.name.clone(),
            return_type: signature.return_type,
        });
        context.builder.begin_function(ir_signature);

        // Parameters are copied into stack slots so they can be assigned like variables
        context.symbol_table.enter_scope();
        for (index, (name, parameter_type)) in signature.parameters.iter().enumerate() {
            let size = parameter_type.irsize();
            let value = context.next_vreg();
            context.push(IRInstruction::Arg(size, value, index));
            let number = context.builder.add_variable(size, name);
            let addr = context.next_vreg();
            context.push(IRInstruction::AddrL(IRSize::P, addr, number));
            context.push(IRInstruction::Store(size, value, addr));
            let symbol = Symbol {
                number,
                symbol_type: *parameter_type,
            };
            if context.symbol_table.try_insert(name, symbol).is_err() {
                log::error!("Parameter {} inserted twice", name);
            }
        }

        block.eval(context)?;

        if !context.builder.is_terminated() {
            if signature.return_type.is_void() {
                context.push(IRInstruction::Ret(IRSize::V, None));
            } else {
                return Err(error!(
                    Semantic,
                    self.span,
                    "Function {} can reach its end without returning a value",
                    self.name
                ));
            }
        }
        context.symbol_table.leave_scope();
        context.builder.finish_function();

        context.function = saved_function;
        context.symbol_table.resume_locals(saved_locals);
        Ok(())
    }
}
