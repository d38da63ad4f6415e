//! Creating one child process for one pipeline stage.
//!
//! The launcher validates a stage, forks, rewires the child's standard
//! streams to the supplied pipe endpoints, and replaces the child's image
//! with the requested program. The parent blocks until that child has
//! terminated, then drops whatever endpoints it was handed, closing them.

use crate::parser::Stage;
use crate::resolver;
use nix::errno::Errno;
use nix::libc;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, dup2, execv, execvp, fork};
use std::ffi::CString;
use std::fmt;
use std::os::fd::{AsRawFd, OwnedFd};

/// Exit code of a child whose process could not be created at all.
/// Also the exit code of the orchestrator when it gives up for that reason.
pub const FORK_FAILURE: i32 = 5;
/// Exit code of a child that failed to rebind its standard streams.
pub const STREAM_SETUP_FAILURE: i32 = 6;
/// Exit code of a child whose program image could not be replaced.
pub const BAD_EXEC: i32 = 7;

/// Why a stage could not be launched.
///
/// Every variant except [`LaunchError::Spawn`] is a pre-flight rejection:
/// it is reported once, no process exists for the stage, and the caller's
/// read loop carries on. `Spawn` means fork itself failed and the
/// orchestrator cannot meaningfully continue.
#[derive(Debug)]
pub enum LaunchError {
    /// The stage's argument vector exceeds the configured maximum.
    TooManyArguments { program: String, limit: usize },
    /// The program identifier did not resolve to an executable file.
    NotExecutable { program: String },
    /// An argument cannot be passed to exec (interior NUL byte).
    BadArgument { program: String },
    /// fork(2) failed. The one fatal condition in the system.
    Spawn { program: String, errno: Errno },
    /// waitpid(2) failed while reaping the child.
    Reap { program: String, errno: Errno },
}

impl LaunchError {
    /// True for the single condition that should terminate the orchestrator.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LaunchError::Spawn { .. })
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::TooManyArguments { program, limit } => write!(
                f,
                "too many arguments for executable \"{program}\" (limit is {limit})"
            ),
            LaunchError::NotExecutable { program } => {
                write!(f, "the file entered, \"{program}\", is not executable")
            }
            LaunchError::BadArgument { program } => {
                write!(f, "argument for \"{program}\" contains a NUL byte")
            }
            LaunchError::Spawn { program, errno } => {
                write!(f, "fork failed on \"{program}\": {errno}")
            }
            LaunchError::Reap { program, errno } => {
                write!(f, "failed to reap \"{program}\": {errno}")
            }
        }
    }
}

impl std::error::Error for LaunchError {}

/// Spawn a process for `stage`, wired to the given endpoints.
///
/// `stdin_source` and `stdout_sink` are pipe endpoints the stage should
/// read from and write to; `None` means the inherited standard stream is
/// kept and nothing is rebound. Ownership of supplied endpoints transfers
/// here: on every return path the parent's copies are closed, whether the
/// launch succeeded, was rejected pre-flight, or the child failed later.
/// The inherited standard streams themselves are never closed.
///
/// Blocks until the child has terminated and returns its wait status; the
/// status is handed back unexamined so a non-zero exit (including the
/// distinguished [`STREAM_SETUP_FAILURE`] and [`BAD_EXEC`] codes) never
/// disturbs the orchestrator.
pub fn launch(
    stage: &Stage,
    max_arguments: usize,
    stdin_source: Option<OwnedFd>,
    stdout_sink: Option<OwnedFd>,
) -> Result<WaitStatus, LaunchError> {
    if stage.len() > max_arguments {
        return Err(LaunchError::TooManyArguments {
            program: stage.program().to_string(),
            limit: max_arguments,
        });
    }

    let search_paths = std::env::var_os("PATH");
    if !resolver::is_executable(search_paths.as_deref(), stage.program()) {
        return Err(LaunchError::NotExecutable {
            program: stage.program().to_string(),
        });
    }

    // Built before forking so the child does nothing but dup2 and exec.
    let argv = stage
        .argv()
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| LaunchError::BadArgument {
            program: stage.program().to_string(),
        })?;

    let child = match unsafe { fork() } {
        Err(errno) => {
            return Err(LaunchError::Spawn {
                program: stage.program().to_string(),
                errno,
            });
        }
        Ok(ForkResult::Child) => {
            // Child side. Never return into orchestrator logic from here:
            // every failure path exits with a distinguished code.
            if let Some(fd) = &stdin_source {
                if dup2(fd.as_raw_fd(), libc::STDIN_FILENO).is_err() {
                    eprintln!(
                        "failed to rebind standard input for \"{}\"",
                        stage.program()
                    );
                    std::process::exit(STREAM_SETUP_FAILURE);
                }
            }
            if let Some(fd) = &stdout_sink {
                if dup2(fd.as_raw_fd(), libc::STDOUT_FILENO).is_err() {
                    eprintln!(
                        "failed to rebind standard output for \"{}\"",
                        stage.program()
                    );
                    std::process::exit(STREAM_SETUP_FAILURE);
                }
            }

            // execvp consults the search path for bare names; execv takes
            // the identifier as given. Either only returns on failure.
            let _ = if resolver::search_required(stage.program()) {
                execvp(&argv[0], &argv)
            } else {
                execv(&argv[0], &argv)
            };
            eprintln!("failed to execute process: \"{}\"", stage.program());
            std::process::exit(BAD_EXEC);
        }
        Ok(ForkResult::Parent { child }) => child,
    };

    let status = waitpid(child, None).map_err(|errno| LaunchError::Reap {
        program: stage.program().to_string(),
        errno,
    })?;

    // The parent's endpoint copies close when `stdin_source`/`stdout_sink`
    // drop here. A surviving write-end copy would keep the downstream
    // reader from ever seeing end-of-stream.
    Ok(status)
}
