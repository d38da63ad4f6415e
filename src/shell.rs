//! Per-line orchestration and the interactive read loop.

use crate::executor::{self, PipelineError};
use crate::launcher;
use crate::{lexer, parser};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Default cap on arguments per stage, program identifier included.
///
/// Two means one executable plus at most one argument. The limit is a
/// policy knob, not a correctness constraint; see [`Shell::new`].
pub const DEFAULT_MAX_ARGUMENTS: usize = 2;

/// The command-pipeline engine: one line of text in, processes out.
///
/// Each accepted line is tokenized, grouped into stages, and executed —
/// directly for a single stage, through the pipeline executor otherwise.
/// Rejections and per-stage failures are reported as single-line
/// diagnostics and the shell stays usable; only an inability to create a
/// child process at all is returned as an error.
///
/// ```no_run
/// use pipesh::Shell;
/// let shell = Shell::new(8);
/// shell.run_line("echo hi | wc").unwrap();
/// ```
pub struct Shell {
    max_arguments: usize,
    prompt: String,
}

impl Shell {
    /// Create a shell that allows `max_arguments` tokens per stage,
    /// program identifier included.
    pub fn new(max_arguments: usize) -> Self {
        Shell {
            max_arguments,
            prompt: String::from("pipesh% "),
        }
    }

    /// Replace the prompt shown by the interactive loop.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Execute one pre-read line to completion.
    ///
    /// Returns once the pipeline (or its rejection) is fully resolved:
    /// every spawned child has been reaped and every pipe endpoint owned by
    /// this process has been released. Syntax errors and per-stage
    /// rejections are printed, not returned; `Err` means the fatal
    /// fork-failure condition and the caller should stop issuing lines.
    pub fn run_line(&self, line: &str) -> anyhow::Result<()> {
        let tokenized = lexer::split_into_tokens(line);
        if tokenized.is_empty_command() {
            return Ok(());
        }

        let stages = match parser::group_stages(tokenized) {
            Ok(stages) => stages,
            Err(err) => {
                eprintln!("{err}");
                return Ok(());
            }
        };

        if stages.len() == 1 {
            // No pipelining: the child inherits this process's own standard
            // streams and nothing is rebound or closed afterwards.
            match launcher::launch(&stages[0], self.max_arguments, None, None) {
                Ok(_) => {}
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => eprintln!("{err}"),
            }
        } else {
            match executor::run_pipeline(&stages, self.max_arguments) {
                Ok(()) => {}
                Err(PipelineError::Launch(err)) if err.is_fatal() => return Err(err.into()),
                Err(err) => eprintln!("{err}"),
            }
        }

        Ok(())
    }

    /// The interactive read loop: prompt, read, run, repeat.
    ///
    /// Owns the "exit" sentinel and line history. Ends on "exit", Ctrl-C,
    /// or end of input; a fatal error from [`Shell::run_line`] terminates
    /// the process with [`launcher::FORK_FAILURE`].
    pub fn repl(&self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;

        loop {
            match editor.readline(&self.prompt) {
                Ok(line) => {
                    if line == "exit" {
                        break;
                    }
                    editor.add_history_entry(line.as_str())?;
                    if let Err(err) = self.run_line(&line) {
                        eprintln!("{err}");
                        std::process::exit(launcher::FORK_FAILURE);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(DEFAULT_MAX_ARGUMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_a_no_op() {
        Shell::default().run_line("").unwrap();
    }

    #[test]
    fn dangling_pipe_is_reported_not_fatal() {
        // Diagnostic goes to stderr; zero processes are created.
        Shell::default().run_line("ls |").unwrap();
    }

    #[test]
    fn failing_command_does_not_end_the_shell() {
        // /bin/false exits non-zero; the orchestrator returns to read the
        // next line regardless.
        let shell = Shell::new(8);
        shell.run_line("/bin/false").unwrap();
        shell.run_line("/bin/true").unwrap();
    }

    #[test]
    fn unresolvable_command_is_reported_not_fatal() {
        Shell::new(8).run_line("/no/such/program").unwrap();
    }

    #[test]
    fn default_argument_limit_is_enforced() {
        // Three tokens against the default limit of two: rejected before
        // any process-creation primitive runs, shell stays alive.
        Shell::default().run_line("/bin/echo a b").unwrap();
    }
}
