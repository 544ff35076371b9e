use crate::backend::ir::*;
use crate::error::{CompileError, ErrorKind};
use crate::parser::ast::*;

use self::evaluation_context::EvaluationContext;

mod evaluation_context;
mod expression_eval;
mod global_eval;
mod statement_eval;

// This module is used to evaluate the AST into an IR

// The trait Evaluate is used by blocks, statements and expressions
// Instructions are emitted through the builder of the context
// Expressions return the value representing their result
trait Evaluate {
    type Output;
    fn eval(&self, context: &mut EvaluationContext) -> Result<Self::Output, CompileError>;
}

// The public function used to evaluate the ast
// The resulting functions are checked for structural consistency
pub fn evaluate(program: &Program) -> Result<IRModule, CompileError> {
    let mut builder = ModuleBuilder::new();
    evaluate_with(program, &mut builder)?;
    let module = builder.finish();
    for function in &module.functions {
        if let Err(message) = function.verify() {
            log::error!("Generated IR is malformed:\n{}", function);
            return Err(CompileError::new(ErrorKind::Internal, None, message));
        }
    }
    log::info!(
        "Generated {} functions and {} declarations",
        module.functions.len(),
        module.declarations.len()
    );
    Ok(module)
}

// Evaluates the ast into any builder
// Function definitions are generated as they are encountered
// all other top level statements form the body of main
pub fn evaluate_with(program: &Program, builder: &mut dyn IRBuilder) -> Result<(), CompileError> {
    log::info!("Generating IR");
    let mut context = EvaluationContext::new(builder);
    for statement in &program.block.statements {
        match statement {
            Statement::FunctionDefine(function) => function.eval_global(&mut context)?,
            statement => {
                context.enter_main(statement.span())?;
                statement.eval(&mut context)?;
            }
        }
    }
    context.finish_main();
    Ok(())
}
