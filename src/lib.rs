pub mod context;
pub mod error;
pub mod evaluation;
pub mod parsing;
pub mod repl;
pub mod reprs;
pub mod typing;
