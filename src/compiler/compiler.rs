//! Main compiler module.
//!
//! This module contains the core Compiler structure and drives code
//! generation from a checked AST to MIPS assembly for the SPIM simulator.
//! It owns the output buffers, the label counter, the static variables and
//! the frame of the routine currently being generated.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{
        ast::Program,
        statements::{FunctionDecl, Stmt},
        types::VarType,
    },
    environment::environment::FunctionTable,
    errors::errors::{Error, ErrorImpl},
};

use super::{
    frame::{Frame, Location, Slot},
    stmt::gen_statement,
};

pub const DIV_ZERO_TRAP: &str = "runtime_div_zero";
pub const MISSING_RETURN_TRAP: &str = "runtime_missing_return";

/// The main compiler structure that holds the state of the compilation process.
///
/// Every expression leaves exactly one word on the operand stack at `$sp`;
/// statements leave the stack as they found it.
pub struct Compiler {
    /// Lines of the `.text` section
    text: Vec<String>,
    /// Top-level variables, in declaration order
    statics: Vec<(String, VarType)>,
    static_lookup: HashMap<String, VarType>,
    /// Return types of the callable functions
    pub functions: FunctionTable<VarType>,
    /// Layout of the routine being generated
    pub frame: Frame,
    label_count: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            text: vec![],
            statics: vec![],
            static_lookup: HashMap::new(),
            functions: FunctionTable::new(),
            frame: Frame::for_main(&[]),
            label_count: 0,
        }
    }

    /// Emits one indented instruction.
    pub fn emit(&mut self, instruction: impl Into<String>) {
        self.text.push(format!("    {}", instruction.into()));
    }

    pub fn emit_label(&mut self, label: &str) {
        self.text.push(format!("{}:", label));
    }

    /// Returns a fresh number for a family of related labels.
    pub fn next_label_id(&mut self) -> usize {
        let id = self.label_count;
        self.label_count += 1;
        id
    }

    pub fn push(&mut self, register: &str) {
        self.emit(format!("sw {}, 0($sp)", register));
        self.emit("subu $sp, $sp, 4");
    }

    pub fn pop(&mut self, register: &str) {
        self.emit(format!("lw {}, 4($sp)", register));
        self.emit("addu $sp, $sp, 4");
    }

    /// Resolves a variable: the routine's own scopes first, then statics.
    pub fn lookup_variable(&self, name: &str, line: u32) -> Result<Slot, Error> {
        if let Some(slot) = self.frame.lookup(name) {
            return Ok(slot.clone());
        }

        match self.static_lookup.get(name) {
            Some(var_type) => Ok(Slot {
                location: Location::Static(String::from(name)),
                var_type: *var_type,
            }),
            None => Err(Error::on_line(
                ErrorImpl::VariableNotDeclared {
                    variable: String::from(name),
                },
                line,
            )),
        }
    }

    pub fn lookup_function(&self, name: &str, line: u32) -> Result<VarType, Error> {
        self.functions.get_function(name).copied().ok_or_else(|| {
            Error::on_line(
                ErrorImpl::FunctionNotDeclared {
                    function: String::from(name),
                },
                line,
            )
        })
    }

    fn gen_prologue(&mut self) {
        let size = self.frame.size();
        self.emit("sw $ra, 0($sp)");
        self.emit("sw $fp, -4($sp)");
        self.emit("move $fp, $sp");
        self.emit(format!("subu $sp, $sp, {}", size));
    }

    fn gen_main(&mut self, program: &Program) -> Result<(), Error> {
        self.frame = Frame::for_main(&program.body);

        self.emit_label("main");
        self.gen_prologue();
        for stmt in program.iter() {
            gen_statement(self, stmt)?;
        }
        self.emit("li $v0, 10");
        self.emit("syscall");

        Ok(())
    }

    fn gen_function(&mut self, function: &FunctionDecl) -> Result<(), Error> {
        self.frame = Frame::for_function(function);
        let return_label = Frame::return_label_for(&function.name);

        self.text.push(String::new());
        self.emit_label(&format!("fun_{}", function.name));
        self.gen_prologue();
        for stmt in &function.body {
            gen_statement(self, stmt)?;
        }
        // Falling off the end means no return statement ran.
        self.emit(format!("j {}", MISSING_RETURN_TRAP));

        self.emit_label(&return_label);
        self.emit("move $v0, $t0");
        self.emit("lw $ra, 0($fp)");
        self.emit("move $sp, $fp");
        self.emit("lw $fp, -4($fp)");
        self.emit("jr $ra");

        debug!(
            function = function.name.as_str(),
            frame_size = self.frame.size(),
            "generated function"
        );
        Ok(())
    }

    fn gen_runtime_traps(&mut self) {
        for trap in [DIV_ZERO_TRAP, MISSING_RETURN_TRAP] {
            self.text.push(String::new());
            self.emit_label(trap);
            self.emit("li $a0, 1");
            self.emit("li $v0, 17");
            self.emit("syscall");
        }
    }

    fn data_section(&self) -> Vec<String> {
        let mut data = vec![String::from(".data"), String::from("    .align 2")];

        for (name, _) in &self.statics {
            data.push(format!("var_{}: .word 0", name));
        }
        data.push(String::from("bool_true: .asciiz \"true\\n\""));
        data.push(String::from("bool_false: .asciiz \"false\\n\""));
        data.push(String::from("newline: .asciiz \"\\n\""));

        data
    }

    /// Generates the complete assembly text for `program`.
    pub fn compile(mut self, program: &Program) -> Result<String, Error> {
        for function in program.functions() {
            self.functions
                .declare_function(&function.name, function.return_type)
                .map_err(|error_impl| Error::on_line(error_impl, function.line))?;
        }

        for stmt in program.iter() {
            if let Stmt::Var { name, var_type, .. } = stmt {
                if !self.static_lookup.contains_key(name) {
                    self.static_lookup.insert(name.clone(), *var_type);
                    self.statics.push((name.clone(), *var_type));
                }
            }
        }

        self.gen_main(program)?;
        for function in program.functions() {
            self.gen_function(function)?;
        }
        self.gen_runtime_traps();

        let mut lines = self.data_section();
        lines.push(String::new());
        lines.push(String::from(".text"));
        lines.push(String::from(".globl main"));
        lines.append(&mut self.text);

        debug!(
            statics = self.statics.len(),
            functions = self.functions.len(),
            lines = lines.len(),
            "generated assembly"
        );

        let mut assembly = lines.join("\n");
        assembly.push('\n');
        Ok(assembly)
    }
}
