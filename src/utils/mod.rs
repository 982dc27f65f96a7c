pub mod env;
pub mod path;
pub mod shell;
