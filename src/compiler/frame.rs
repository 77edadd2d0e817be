//! Stack frame layout for generated routines.
//!
//! ```text
//!   $fp + 4*n    argument 0
//!   ...
//!   $fp + 4      argument n-1
//!   $fp + 0      saved $ra
//!   $fp - 4      saved $fp
//!   $fp - 8      local 0
//!   $fp - 12     local 1
//!   ...
//! ```
//!
//! Locals are flattened: every `Var` in a routine body, however deeply it is
//! nested in blocks, `if` or `while`, gets its own slot in declaration order.

use std::collections::HashMap;

use crate::ast::{
    statements::{FunctionDecl, Stmt},
    types::VarType,
};

/// Where a variable lives at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A `.word` in the data section
    Static(String),
    /// An offset from `$fp`
    Local(i32),
}

impl Location {
    /// The memory operand for `lw`/`sw`.
    pub fn operand(&self) -> String {
        match self {
            Location::Static(name) => format!("var_{}", name),
            Location::Local(offset) => format!("{}($fp)", offset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub location: Location,
    pub var_type: VarType,
}

#[derive(Debug)]
pub struct Frame {
    /// Label of the shared epilogue, `None` for `main`
    pub return_label: Option<String>,
    scopes: Vec<HashMap<String, Slot>>,
    locals: usize,
    next_local: usize,
}

impl Frame {
    /// Frame for the top-level code. Variables declared directly at the top
    /// level are statics, so only nested declarations take slots.
    pub fn for_main(body: &[Stmt]) -> Self {
        let locals = body
            .iter()
            .filter(|stmt| !matches!(stmt, Stmt::Var { .. }))
            .map(count_locals)
            .sum();

        Frame {
            return_label: None,
            scopes: vec![HashMap::new()],
            locals,
            next_local: 0,
        }
    }

    pub fn for_function(function: &FunctionDecl) -> Self {
        let count = function.parameters.len() as i32;
        let parameters = function
            .parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| {
                let slot = Slot {
                    location: Location::Local(4 * (count - i as i32)),
                    var_type: parameter.var_type,
                };
                (parameter.name.clone(), slot)
            })
            .collect();

        Frame {
            return_label: Some(Self::return_label_for(&function.name)),
            scopes: vec![parameters],
            locals: function.body.iter().map(count_locals).sum(),
            next_local: 0,
        }
    }

    /// Epilogue label of `name`. The `ret_` prefix keeps it apart from the
    /// `fun_` entry labels, which users choose the rest of.
    pub fn return_label_for(name: &str) -> String {
        format!("ret_{}", name)
    }

    pub fn is_main(&self) -> bool {
        self.return_label.is_none()
    }

    /// True while generating the outermost scope of the routine.
    pub fn at_top_level(&self) -> bool {
        self.scopes.len() == 1
    }

    /// Bytes to reserve below `$fp`: saved `$ra`, saved `$fp` and the locals.
    pub fn size(&self) -> u32 {
        let bytes = 8 + 4 * self.locals as u32;
        (bytes + 3) & !3
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Gives `name` the next local slot, in the innermost scope.
    pub fn declare_local(&mut self, name: &str, var_type: VarType) -> Location {
        let location = Location::Local(-8 - 4 * self.next_local as i32);
        self.next_local += 1;

        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                String::from(name),
                Slot {
                    location: location.clone(),
                    var_type,
                },
            );
        }

        location
    }

    pub fn lookup(&self, name: &str) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// Number of `Var` declarations in `stmt`, including nested ones. Nested
/// functions are never generated, so their bodies do not count.
pub fn count_locals(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::Var { .. } => 1,
        Stmt::Block { body, .. } => body.iter().map(count_locals).sum(),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => count_locals(then_branch) + else_branch.as_deref().map_or(0, count_locals),
        Stmt::While { body, .. } => count_locals(body),
        Stmt::Assign { .. }
        | Stmt::Return { .. }
        | Stmt::Print { .. }
        | Stmt::Expression { .. }
        | Stmt::Function(_) => 0,
    }
}
