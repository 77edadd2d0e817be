//! Lexical scopes shared by the checker and the interpreter.
//!
//! `Environment<T>` is a chain of frames mapping names to a payload: the
//! checker stores a `VarType` per name, the interpreter a `Value`.
//! `FunctionTable<F>` is the single global function namespace.

pub mod environment;
