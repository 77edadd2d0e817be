use std::collections::HashMap;

use crate::errors::errors::ErrorImpl;

/// One scope: the names declared directly in it.
#[derive(Debug)]
pub struct Frame<T> {
    pub variable_lookup: HashMap<String, T>,
    pub parent: Option<usize>,
    pub return_to: usize,
}

impl<T> Frame<T> {
    fn new(parent: Option<usize>, return_to: usize) -> Self {
        Frame {
            variable_lookup: HashMap::new(),
            parent,
            return_to,
        }
    }

    pub fn declare_variable(&mut self, variable_name: &str, value: T) -> Result<(), ErrorImpl> {
        if self.variable_lookup.contains_key(variable_name) {
            Err(ErrorImpl::VariableAlreadyDeclared {
                variable: String::from(variable_name),
            })
        } else {
            self.variable_lookup.insert(String::from(variable_name), value);
            Ok(())
        }
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<&T> {
        self.variable_lookup.get(variable_name)
    }
}

/// An arena of frames addressed by index. Frame 0 is the global frame and is
/// never popped. Frames are pushed and popped strictly LIFO, so the current
/// frame is always the last one.
#[derive(Debug)]
pub struct Environment<T> {
    frames: Vec<Frame<T>>,
    current: usize,
}

impl<T> Default for Environment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Environment<T> {
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::new(None, 0)],
            current: 0,
        }
    }

    /// Opens a block scope whose parent is the current frame.
    pub fn enter_scope(&mut self) {
        self.push_frame(self.current);
    }

    /// Opens a function scope. Its parent is the global frame, so the body
    /// only sees globals and its own names, never the caller's locals.
    pub fn enter_function_scope(&mut self) {
        self.push_frame(0);
    }

    fn push_frame(&mut self, parent: usize) {
        self.frames.push(Frame::new(Some(parent), self.current));
        self.current = self.frames.len() - 1;
    }

    /// Closes the current frame. Closing the global frame is a no-op.
    pub fn exit_scope(&mut self) {
        if self.current == 0 {
            return;
        }

        if let Some(frame) = self.frames.pop() {
            self.current = frame.return_to;
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_global(&self) -> bool {
        self.current == 0
    }

    pub fn get_current_frame(&self) -> &Frame<T> {
        &self.frames[self.current]
    }

    /// Defines `name` in the current frame. Fails only when the current
    /// frame already has it; outer frames may be shadowed.
    pub fn declare_variable(&mut self, name: &str, value: T) -> Result<(), ErrorImpl> {
        self.frames[self.current].declare_variable(name, value)
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        let mut index = Some(self.current);

        while let Some(frame_index) = index {
            let frame = &self.frames[frame_index];
            if frame.variable_lookup.contains_key(name) {
                return Some(frame_index);
            }
            index = frame.parent;
        }

        None
    }

    /// Looks `name` up, searching outward from the current frame.
    pub fn get_variable(&self, name: &str) -> Option<&T> {
        let frame_index = self.resolve(name)?;
        self.frames[frame_index].get_variable(name)
    }

    /// Overwrites the innermost visible binding of `name`.
    pub fn assign_variable(&mut self, name: &str, value: T) -> Result<(), ErrorImpl> {
        let frame_index = self
            .resolve(name)
            .ok_or_else(|| ErrorImpl::VariableNotDeclared {
                variable: String::from(name),
            })?;

        self.frames[frame_index]
            .variable_lookup
            .insert(String::from(name), value);
        Ok(())
    }
}

/// Global function namespace, populated before any body runs.
#[derive(Debug)]
pub struct FunctionTable<F> {
    function_lookup: HashMap<String, F>,
}

impl<F> Default for FunctionTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FunctionTable<F> {
    pub fn new() -> Self {
        FunctionTable {
            function_lookup: HashMap::new(),
        }
    }

    /// Registers `name`. The first declaration wins; later ones fail.
    pub fn declare_function(&mut self, name: &str, function: F) -> Result<(), ErrorImpl> {
        if self.function_lookup.contains_key(name) {
            return Err(ErrorImpl::FunctionAlreadyDeclared {
                function: String::from(name),
            });
        }

        self.function_lookup.insert(String::from(name), function);
        Ok(())
    }

    pub fn get_function(&self, name: &str) -> Option<&F> {
        self.function_lookup.get(name)
    }

    pub fn len(&self) -> usize {
        self.function_lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.function_lookup.is_empty()
    }
}
