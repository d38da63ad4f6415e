//! Driving a multi-stage pipeline.

use crate::launcher::{self, LaunchError};
use crate::parser::Stage;
use nix::errno::Errno;
use nix::unistd::pipe;
use std::fmt;
use std::os::fd::OwnedFd;

/// Why a whole pipeline attempt ended early.
#[derive(Debug)]
pub enum PipelineError {
    /// A pipe pair could not be allocated. Nothing was launched; any pairs
    /// already created were released. Non-fatal to the orchestrator.
    PipeSetup(Errno),
    /// A stage launch failed fatally (fork failure, see
    /// [`LaunchError::is_fatal`]).
    Launch(LaunchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::PipeSetup(errno) => write!(f, "failed to create pipe: {errno}"),
            PipelineError::Launch(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Run `stages` connected by pipes, first stage reading the inherited
/// standard input and last stage writing the inherited standard output.
///
/// All N−1 pipe pairs are allocated up front. Stage i then receives the
/// read end of pair i−1 and the write end of pair i; the parent's copy of
/// each endpoint is closed as soon as the stage it belongs to has been
/// dealt with, including stages rejected before a process was created.
///
/// Known limitation, kept from the design this reimplements: each stage is
/// launched and then waited on before the next stage starts, so stages
/// never run concurrently. A producer that fills the pipe buffer while its
/// consumer is not yet running will stall the pipeline.
///
/// Pre-flight rejections of individual stages are reported here, once per
/// stage, and the remaining stages still run; only pipe-allocation failure
/// and the fatal fork case abort the attempt.
pub fn run_pipeline(stages: &[Stage], max_arguments: usize) -> Result<(), PipelineError> {
    let pipe_count = stages.len().saturating_sub(1);

    let mut endpoints: Vec<(Option<OwnedFd>, Option<OwnedFd>)> = Vec::with_capacity(pipe_count);
    for _ in 0..pipe_count {
        // On failure the pairs collected so far drop and close right here.
        let (read_end, write_end) = pipe().map_err(PipelineError::PipeSetup)?;
        endpoints.push((Some(read_end), Some(write_end)));
    }

    for (i, stage) in stages.iter().enumerate() {
        let stdin_source = if i > 0 { endpoints[i - 1].0.take() } else { None };
        let stdout_sink = if i < pipe_count {
            endpoints[i].1.take()
        } else {
            None
        };

        match launcher::launch(stage, max_arguments, stdin_source, stdout_sink) {
            Ok(_) => {}
            Err(err) if err.is_fatal() => return Err(PipelineError::Launch(err)),
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}
