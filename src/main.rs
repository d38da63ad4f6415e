use argh::FromArgs;
use pipesh::{DEFAULT_MAX_ARGUMENTS, Shell, launcher};

/// A micro shell: runs one command pipeline per input line.
#[derive(FromArgs)]
struct Options {
    /// maximum arguments per pipeline stage, program name included
    #[argh(option, default = "DEFAULT_MAX_ARGUMENTS")]
    max_args: usize,

    /// prompt shown before each line
    #[argh(option, default = "String::from(\"pipesh% \")")]
    prompt: String,

    /// run a single command line and exit instead of reading interactively
    #[argh(option, short = 'c')]
    command: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    let shell = Shell::new(options.max_args).with_prompt(options.prompt);

    match options.command {
        Some(line) => {
            if let Err(err) = shell.run_line(&line) {
                eprintln!("{err}");
                std::process::exit(launcher::FORK_FAILURE);
            }
            Ok(())
        }
        None => shell.repl(),
    }
}
