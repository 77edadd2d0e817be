use crate::{
    ast::{
        expressions::{Expr, Literal, Operator},
        types::VarType,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::{Compiler, DIV_ZERO_TRAP};

/// Generates code for `expression`, leaving its value pushed on the stack.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<(), Error> {
    match expression {
        Expr::Literal { value, .. } => {
            let word = match value {
                Literal::Int(value) => *value,
                Literal::Bool(value) => *value as i32,
            };
            compiler.emit(format!("li $t0, {}", word));
            compiler.push("$t0");
        }
        Expr::Variable { name, line } => {
            let slot = compiler.lookup_variable(name, *line)?;
            compiler.emit(format!("lw $t0, {}", slot.location.operand()));
            compiler.push("$t0");
        }
        Expr::Unary {
            operator, right, ..
        } => {
            gen_expression(compiler, right)?;
            compiler.pop("$t0");
            match operator {
                Operator::Not => compiler.emit("xori $t2, $t0, 1"),
                _ => compiler.emit("subu $t2, $zero, $t0"),
            }
            compiler.push("$t2");
        }
        Expr::Binary {
            left,
            operator,
            right,
            line,
        } => {
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.pop("$t1");
            compiler.pop("$t0");
            gen_binary_operator(compiler, *operator, *line)?;
            compiler.push("$t2");
        }
        Expr::Call {
            name,
            arguments,
            line,
        } => {
            compiler.lookup_function(name, *line)?;

            for argument in arguments {
                gen_expression(compiler, argument)?;
            }
            compiler.emit(format!("jal fun_{}", name));
            if !arguments.is_empty() {
                compiler.emit(format!("addu $sp, $sp, {}", 4 * arguments.len()));
            }
            compiler.push("$v0");
        }
    }

    Ok(())
}

/// Combines `$t0` (left) and `$t1` (right) into `$t2`.
fn gen_binary_operator(
    compiler: &mut Compiler,
    operator: Operator,
    line: u32,
) -> Result<(), Error> {
    let instruction = match operator {
        Operator::Plus => "addu",
        Operator::Minus => "subu",
        Operator::Multiply => "mul",
        Operator::Divide => {
            compiler.emit(format!("beq $t1, $zero, {}", DIV_ZERO_TRAP));
            compiler.emit("div $t0, $t1");
            compiler.emit("mflo $t2");
            return Ok(());
        }
        Operator::And => "and",
        Operator::Or => "or",
        Operator::Equal => "seq",
        Operator::NotEqual => "sne",
        Operator::Less => "slt",
        Operator::LessEqual => "sle",
        Operator::Greater => "sgt",
        Operator::GreaterEqual => "sge",
        // `!` only ever comes out of the parser as a unary operator.
        Operator::Not => {
            return Err(Error::on_line(
                ErrorImpl::UnexpectedToken {
                    token: operator.to_string(),
                },
                line,
            ))
        }
    };

    compiler.emit(format!("{} $t2, $t0, $t1", instruction));
    Ok(())
}

/// Static type of `expression`, used to pick how `print` renders it.
pub fn infer_type(compiler: &Compiler, expression: &Expr) -> Result<VarType, Error> {
    match expression {
        Expr::Literal { value, .. } => Ok(value.get_type()),
        Expr::Variable { name, line } => Ok(compiler.lookup_variable(name, *line)?.var_type),
        Expr::Unary { operator, .. } => Ok(match operator {
            Operator::Not => VarType::Bool,
            _ => VarType::Int,
        }),
        Expr::Binary { operator, .. } => Ok(match operator {
            Operator::Plus | Operator::Minus | Operator::Multiply | Operator::Divide => {
                VarType::Int
            }
            _ => VarType::Bool,
        }),
        Expr::Call { name, line, .. } => compiler.lookup_function(name, *line),
    }
}
