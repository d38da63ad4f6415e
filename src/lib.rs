//! A micro command-pipeline shell.
//!
//! One line of user text becomes one or more connected OS processes:
//! tokens split on spaces, stages split on the `|` token, bare program
//! names resolved through the search path, and stages wired together with
//! real pipes. The execution unit is the process — fork, exec, wait — with
//! no threads and no async machinery anywhere.
//!
//! The crate is Unix-only. The high-level entry point is [`Shell`]; the
//! phases it drives (lexing, stage grouping, path resolution, launching,
//! pipeline execution) are exposed as modules for reuse and testing.

pub mod executor;
pub mod launcher;
pub mod lexer;
pub mod parser;
pub mod resolver;
mod shell;

pub use shell::{DEFAULT_MAX_ARGUMENTS, Shell};
