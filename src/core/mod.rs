// src/core/mod.rs
//! Building blocks shared by the CLI and the HTTP server

pub mod fs_ops;
pub mod markup;
pub mod process;

pub use fs_ops::{remove_files, CleanupReport};
pub use markup::ResumeMarkup;
pub use process::{run_command, CommandError, CommandOutput};
