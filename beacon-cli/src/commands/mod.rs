//! CLI command implementations

pub mod render;
pub mod search;
pub mod shell;

pub use search::SearchArgs;
pub use shell::ShellArgs;
