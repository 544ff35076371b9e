use super::evaluation_context::Value;
use super::{Evaluate, EvaluationContext};
use crate::backend::ir::*;
use crate::error;
use crate::error::CompileError;
use crate::parser::ast::*;
use crate::table::Type;

impl Evaluate for Expression {
    type Output = Value;

    fn eval(&self, context: &mut EvaluationContext) -> Result<Value, CompileError> {
        use ExpressionVariant::*;
        match &self.variant {
            ImmediateInt(text) => {
                let value = match text.parse::<i32>() {
                    Ok(value) => value,
                    Err(_) => {
                        return Err(error!(
                            Semantic,
                            self.span,
                            "Integer literal {} does not fit in an int",
                            text
                        ))
                    }
                };
                let vreg = context.next_vreg();
                context.push(IRInstruction::Imm(IRSize::S32, vreg, value as i128));
                Ok(Value::new(vreg, Type::Int))
            }

            ImmediateString(text) => {
                let index = context.builder.add_string(text);
                let vreg = context.next_vreg();
                context.push(IRInstruction::Str(vreg, index));
                Ok(Value::new(vreg, Type::String))
            }

            Variable(name) => {
                let symbol = match context.symbol_table.get(name) {
                    Some(symbol) => symbol.clone(),
                    None => return Err(error!(Semantic, self.span, "Undefined variable '{}'", name)),
                };
                let size = symbol.symbol_type.irsize();
                let addr = context.next_vreg();
                context.push(IRInstruction::AddrL(IRSize::P, addr, symbol.number));
                let vreg = context.next_vreg();
                context.push(IRInstruction::Load(size, vreg, addr));
                Ok(Value::new(vreg, symbol.symbol_type))
            }

            FunctionCall(name, arguments) => self.eval_call(name, arguments, context),

            Equation(op, left, right) => {
                let left_value = left.eval(context)?;
                let right_value = right.eval(context)?;
                let (left, right) = match (left_value, right_value) {
                    (
                        Value {
                            vreg: Some(left),
                            value_type: Type::Int,
                        },
                        Value {
                            vreg: Some(right),
                            value_type: Type::Int,
                        },
                    ) => (left, right),
                    _ => {
                        return Err(error!(
                            Semantic,
                            self.span,
                            "Operator '{}' can not be applied to {} and {}",
                            op.symbol(),
                            left_value.value_type,
                            right_value.value_type
                        ))
                    }
                };

                use BinaryExpressionType::*;
                let vreg = context.next_vreg();
                let size = IRSize::S32;
                context.push(match op {
                    Add => IRInstruction::Add(size, vreg, left, right),
                    Subtract => IRInstruction::Sub(size, vreg, left, right),
                    Multiply => IRInstruction::Mul(size, vreg, left, right),
                    Divide => IRInstruction::Div(size, vreg, left, right),
                    Equal => IRInstruction::Eq(size, vreg, left, right),
                    Inequal => IRInstruction::Ne(size, vreg, left, right),
                    Less => IRInstruction::Lt(size, vreg, left, right),
                    LessEqual => IRInstruction::Le(size, vreg, left, right),
                    Greater => IRInstruction::Gt(size, vreg, left, right),
                    GreaterEqual => IRInstruction::Ge(size, vreg, left, right),
                });
                Ok(Value::new(vreg, Type::Int))
            }
        }
    }
}

impl Expression {
    // Arguments are evaluated left to right and passed in the same order
    fn eval_call(
        &self,
        name: &str,
        arguments: &[Expression],
        context: &mut EvaluationContext,
    ) -> Result<Value, CompileError> {
        let signature = match context.symbol_table.get_function(name) {
            Some(function) => function.signature.clone(),
            None => return Err(error!(Semantic, self.span, "Undefined function '{}'", name)),
        };
        if signature.arity() != arguments.len() {
            return Err(error!(
                Semantic,
                self.span,
                "Function {} expects {} arguments, but {} were given",
                name,
                signature.arity(),
                arguments.len()
            ));
        }

        let mut registers = Vec::with_capacity(arguments.len());
        for (i, (argument, (_, parameter_type))) in
            arguments.iter().zip(signature.parameters.iter()).enumerate()
        {
            let value = argument.eval(context)?;
            let description = format!("argument {} of {}", i + 1, name);
            registers.push(context.expect_type(
                &argument.span,
                value,
                *parameter_type,
                &description,
            )?);
        }

        let return_type = signature.return_type;
        let result = if return_type.is_void() {
            None
        } else {
            Some(context.next_vreg())
        };
        context.push(IRInstruction::Call(
            return_type.irsize(),
            result,
            name.to_string(),
            Box::new(IRArguments {
                sizes: signature
                    .parameters
                    .iter()
                    .map(|(_, typ)| typ.irsize())
                    .collect(),
                arguments: registers,
            }),
        ));
        Ok(Value {
            vreg: result,
            value_type: return_type,
        })
    }
}
