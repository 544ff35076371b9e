use super::{Evaluate, EvaluationContext};
use crate::backend::ir::*;
use crate::error;
use crate::error::CompileError;
use crate::parser::ast::*;
use crate::table::{Symbol, Type};

impl Evaluate for Block {
    type Output = ();

    // Every block opens a new scope
    fn eval(&self, context: &mut EvaluationContext) -> Result<(), CompileError> {
        context.symbol_table.enter_scope();
        for statement in &self.statements {
            statement.eval(context)?;
        }
        context.symbol_table.leave_scope();
        Ok(())
    }
}

impl Evaluate for Statement {
    type Output = ();

    fn eval(&self, context: &mut EvaluationContext) -> Result<(), CompileError> {
        // Code following a return in the same path can never run
        if context.builder.is_terminated() {
            return Err(error!(
                Semantic,
                self.span(),
                "Unreachable statement after return"
            ));
        }

        match self {
            Statement::Expression { expression, .. } => {
                expression.eval(context)?;
            }

            Statement::DefineVariable {
                span,
                declared_type,
                name,
                init,
            } => {
                let variable_type = match Type::resolve(declared_type) {
                    Some(Type::Void) => {
                        return Err(error!(
                            Semantic,
                            span,
                            "Variable {} can not have type void",
                            name
                        ))
                    }
                    Some(typ) => typ,
                    None => {
                        return Err(error!(Semantic, span, "Unknown type '{}'", declared_type))
                    }
                };
                // The initializer does not see the variable it initializes
                let value = init.eval(context)?;
                let description = format!("definition of {}", name);
                let vreg = context.expect_type(&init.span, value, variable_type, &description)?;

                let size = variable_type.irsize();
                let number = context.builder.add_variable(size, name);
                let symbol = Symbol {
                    number,
                    symbol_type: variable_type,
                };
                if context.symbol_table.try_insert(name, symbol).is_err() {
                    return Err(error!(
                        Semantic,
                        span,
                        "Variable {} is already defined in this scope",
                        name
                    ));
                }
                let addr = context.next_vreg();
                context.push(IRInstruction::AddrL(IRSize::P, addr, number));
                context.push(IRInstruction::Store(size, vreg, addr));
            }

            Statement::Assign { span, dest, value } => {
                let symbol = match context.symbol_table.get(dest) {
                    Some(symbol) => symbol.clone(),
                    None => return Err(error!(Semantic, span, "Undefined variable '{}'", dest)),
                };
                let result = value.eval(context)?;
                let description = format!("assignment to {}", dest);
                let vreg =
                    context.expect_type(&value.span, result, symbol.symbol_type, &description)?;
                let addr = context.next_vreg();
                context.push(IRInstruction::AddrL(IRSize::P, addr, symbol.number));
                context.push(IRInstruction::Store(
                    symbol.symbol_type.irsize(),
                    vreg,
                    addr,
                ));
            }

            Statement::If {
                condition,
                block,
                else_block,
                ..
            } => {
                let value = condition.eval(context)?;
                let cond = context.expect_type(&condition.span, value, Type::Int, "if condition")?;
                let then_label = context.builder.append_block("then");

                match else_block {
                    Some(else_block) => {
                        let else_label = context.builder.append_block("else");
                        context.push(IRInstruction::Jcc(IRSize::S32, cond, then_label, else_label));

                        let then_end = eval_arm(block, then_label, context)?;
                        let else_end = eval_arm(else_block, else_label, context)?;

                        // The join block only exists if one of the arms falls through
                        if then_end.is_some() || else_end.is_some() {
                            let end_label = context.builder.append_block("endif");
                            for end in then_end.iter().chain(else_end.iter()) {
                                context.builder.position_at_end(*end);
                                context.push(IRInstruction::Jmp(end_label));
                            }
                            context.builder.position_at_end(end_label);
                        }
                    }
                    None => {
                        let end_label = context.builder.append_block("endif");
                        context.push(IRInstruction::Jcc(IRSize::S32, cond, then_label, end_label));
                        if let Some(then_end) = eval_arm(block, then_label, context)? {
                            context.builder.position_at_end(then_end);
                            context.push(IRInstruction::Jmp(end_label));
                        }
                        context.builder.position_at_end(end_label);
                    }
                }
            }

            Statement::While {
                condition, block, ..
            } => {
                let check_label = context.builder.append_block("while.cond");
                context.push(IRInstruction::Jmp(check_label));
                context.builder.position_at_end(check_label);

                let value = condition.eval(context)?;
                let cond =
                    context.expect_type(&condition.span, value, Type::Int, "while condition")?;
                let body_label = context.builder.append_block("while.body");
                let end_label = context.builder.append_block("while.end");
                context.push(IRInstruction::Jcc(IRSize::S32, cond, body_label, end_label));

                if let Some(body_end) = eval_arm(block, body_label, context)? {
                    context.builder.position_at_end(body_end);
                    context.push(IRInstruction::Jmp(check_label));
                }
                context.builder.position_at_end(end_label);
            }

            Statement::Return { span, expression } => {
                let (name, return_type) = match &context.function {
                    Some(function) => (function.name.clone(), function.return_type),
                    None => return Err(error!(Semantic, span, "Return outside of a function")),
                };
                match expression {
                    None if return_type.is_void() => {
                        context.push(IRInstruction::Ret(IRSize::V, None));
                    }
                    None => {
                        return Err(error!(
                            Semantic,
                            span,
                            "Function {} must return a value of type {}",
                            name,
                            return_type
                        ))
                    }
                    Some(_) if return_type.is_void() => {
                        return Err(error!(
                            Semantic,
                            span,
                            "Function {} returns void, but a value is returned",
                            name
                        ))
                    }
                    Some(expression) => {
                        let value = expression.eval(context)?;
                        let description = format!("return of {}", name);
                        let vreg = context.expect_type(
                            &expression.span,
                            value,
                            return_type,
                            &description,
                        )?;
                        context.push(IRInstruction::Ret(return_type.irsize(), Some(vreg)));
                    }
                }
            }

            Statement::FunctionDefine(function) => {
                return Err(error!(
                    Semantic,
                    function.span,
                    "Function {} must be defined at the top level",
                    function.name
                ))
            }
        }
        Ok(())
    }
}

// Generates a block starting in the basic block label
// Returns the basic block control falls out of, None if every path returned
fn eval_arm(
    block: &Block,
    label: IRLabel,
    context: &mut EvaluationContext,
) -> Result<Option<IRLabel>, CompileError> {
    context.builder.position_at_end(label);
    block.eval(context)?;
    if context.builder.is_terminated() {
        Ok(None)
    } else {
        Ok(context.builder.current_block())
    }
}
