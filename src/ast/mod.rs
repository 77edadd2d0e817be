/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root
/// - expressions: Literals, operators and the expression enum
/// - statements: The statement enum and function declarations
/// - types: The static types of the language
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
