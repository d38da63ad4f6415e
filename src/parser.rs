//! Grouping tokens into pipeline stages.

use crate::lexer::{PIPE_MARK, Tokenized};
use std::fmt;

/// One pipeline segment: a program identifier plus its arguments.
///
/// The argument vector is never empty; `argv[0]` is the program identifier
/// and is passed to the child as argument zero. Note that individual
/// arguments may be empty strings (the tokenizer preserves runs of spaces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    argv: Vec<String>,
}

impl Stage {
    /// Build a stage from an argument vector. `argv` must be non-empty.
    pub fn new(argv: Vec<String>) -> Self {
        debug_assert!(!argv.is_empty());
        Stage { argv }
    }

    /// The program identifier, i.e. the first token of the stage.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// The full argument vector, program identifier included.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Number of arguments, program identifier included.
    pub fn len(&self) -> usize {
        self.argv.len()
    }
}

/// Errors detected while grouping tokens into stages.
///
/// Both are syntax errors: they are reported before any pipe or process
/// is created and the offending line is abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The pipe token was the last token of the line.
    DanglingPipe,
    /// A pipe token with no command before it (leading or doubled pipes).
    EmptyStage,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::DanglingPipe => write!(f, "executable expected after \"{PIPE_MARK}\""),
            StageError::EmptyStage => write!(f, "executable expected before \"{PIPE_MARK}\""),
        }
    }
}

impl std::error::Error for StageError {}

/// Split the token list into stages on pipe tokens.
///
/// Only a token that is exactly the pipe marker separates stages; empty
/// tokens and tokens merely containing the marker are ordinary arguments.
/// Returns at least one stage on success.
pub fn group_stages(tokenized: Tokenized) -> Result<Vec<Stage>, StageError> {
    let pipe_token = PIPE_MARK.to_string();

    if tokenized.tokens.last().map(String::as_str) == Some(pipe_token.as_str()) {
        return Err(StageError::DanglingPipe);
    }

    let mut stages = Vec::with_capacity(tokenized.pipe_marks + 1);
    let mut current = Vec::new();
    for token in tokenized.tokens {
        if token == pipe_token {
            if current.is_empty() {
                return Err(StageError::EmptyStage);
            }
            stages.push(Stage::new(std::mem::take(&mut current)));
        } else {
            current.push(token);
        }
    }
    // Non-empty by construction: the dangling-pipe check above rejected the
    // only way the final segment could come up empty.
    stages.push(Stage::new(current));

    Ok(stages)
}
