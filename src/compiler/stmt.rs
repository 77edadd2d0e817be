use crate::{
    ast::{statements::Stmt, types::VarType},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::Compiler,
    expr::{gen_expression, infer_type},
    frame::Location,
};

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::Block { body, .. } => {
            compiler.frame.enter_scope();
            for stmt in body {
                gen_statement(compiler, stmt)?;
            }
            compiler.frame.exit_scope();
        }
        Stmt::Var {
            name,
            var_type,
            initializer,
            ..
        } => {
            match initializer {
                Some(initializer) => gen_expression(compiler, initializer)?,
                None => {
                    compiler.emit("li $t0, 0");
                    compiler.push("$t0");
                }
            }

            // The initializer must not see the new name.
            let location = if compiler.frame.is_main() && compiler.frame.at_top_level() {
                Location::Static(name.clone())
            } else {
                compiler.frame.declare_local(name, *var_type)
            };

            compiler.pop("$t0");
            compiler.emit(format!("sw $t0, {}", location.operand()));
        }
        Stmt::Assign { name, value, line } => {
            gen_expression(compiler, value)?;
            let slot = compiler.lookup_variable(name, *line)?;

            compiler.pop("$t0");
            compiler.emit(format!("sw $t0, {}", slot.location.operand()));
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            let id = compiler.next_label_id();
            let else_label = format!("else_{}", id);
            let end_label = format!("endif_{}", id);

            gen_expression(compiler, condition)?;
            compiler.pop("$t0");
            compiler.emit(format!("beq $t0, $zero, {}", else_label));

            gen_scoped(compiler, then_branch)?;
            compiler.emit(format!("j {}", end_label));

            compiler.emit_label(&else_label);
            if let Some(else_branch) = else_branch {
                gen_scoped(compiler, else_branch)?;
            }
            compiler.emit_label(&end_label);
        }
        Stmt::While {
            condition, body, ..
        } => {
            let id = compiler.next_label_id();
            let start_label = format!("while_{}", id);
            let end_label = format!("endwhile_{}", id);

            compiler.emit_label(&start_label);
            gen_expression(compiler, condition)?;
            compiler.pop("$t0");
            compiler.emit(format!("beq $t0, $zero, {}", end_label));

            gen_scoped(compiler, body)?;
            compiler.emit(format!("j {}", start_label));
            compiler.emit_label(&end_label);
        }
        Stmt::Return { value, line } => {
            let Some(return_label) = compiler.frame.return_label.clone() else {
                return Err(Error::on_line(ErrorImpl::ReturnOutsideFunction, *line));
            };

            if let Some(value) = value {
                gen_expression(compiler, value)?;
                compiler.pop("$t0");
            }
            compiler.emit(format!("j {}", return_label));
        }
        Stmt::Print { expression, .. } => {
            let print_type = infer_type(compiler, expression)?;
            gen_expression(compiler, expression)?;

            if print_type == VarType::Bool {
                let label = format!("print_bool_{}", compiler.next_label_id());
                compiler.pop("$t0");
                compiler.emit("la $a0, bool_true");
                compiler.emit(format!("bne $t0, $zero, {}", label));
                compiler.emit("la $a0, bool_false");
                compiler.emit_label(&label);
                compiler.emit("li $v0, 4");
                compiler.emit("syscall");
            } else {
                compiler.pop("$a0");
                compiler.emit("li $v0, 1");
                compiler.emit("syscall");
                compiler.emit("la $a0, newline");
                compiler.emit("li $v0, 4");
                compiler.emit("syscall");
            }
        }
        Stmt::Expression { expression, .. } => {
            gen_expression(compiler, expression)?;
            // Discard the unused result.
            compiler.emit("addu $sp, $sp, 4");
        }
        // Functions are generated after `main`; nested ones never are.
        Stmt::Function(_) => {}
    }

    Ok(())
}

/// Generates `statement` inside a scope of its own.
fn gen_scoped(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    compiler.frame.enter_scope();
    let result = gen_statement(compiler, statement);
    compiler.frame.exit_scope();
    result
}
