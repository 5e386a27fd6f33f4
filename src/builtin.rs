//! Commands implemented inside the interpreter.

use crate::command::{Builtin, CapturedOutput, ExitCode};
use crate::env::Environment;
use crate::resolve::find_command_path;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process. Their
/// output is captured like the output of external programs so that it can be redirected.
/// Most of them are parsed using the [`argh`] crate (`FromArgs`); `echo` and `exit` take
/// their words verbatim, since any of them may start with `-`.
pub(crate) trait BuiltinCommand: Sized {
    /// Executes the command using provided output streams and environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode>;
}

impl Builtin {
    /// Parse `args` for this builtin and run it, capturing everything it prints.
    pub(crate) fn run(
        self,
        args: &[&str],
        env: &mut Environment,
    ) -> Result<(CapturedOutput, ExitCode)> {
        let name = self.name();
        match self {
            Builtin::Cd => run_parsed::<Cd>(name, args, env),
            Builtin::Echo => run_command(name, Echo::from_words(args), env),
            Builtin::Exit => run_command(name, Exit::from_words(args), env),
            Builtin::Pwd => run_parsed::<Pwd>(name, args, env),
            Builtin::Type => run_parsed::<Type>(name, args, env),
        }
    }
}

fn run_parsed<T: BuiltinCommand + FromArgs>(
    name: &str,
    args: &[&str],
    env: &mut Environment,
) -> Result<(CapturedOutput, ExitCode)> {
    match T::from_args(&[name], args) {
        Ok(cmd) => run_command(name, cmd, env),
        // `--help` lands here with a successful status.
        Err(EarlyExit { output: text, status }) => {
            let mut output = CapturedOutput::default();
            let code = match status {
                Ok(()) => {
                    output.stdout.write_all(text.as_bytes())?;
                    0
                }
                Err(()) => {
                    output.stderr.write_all(text.as_bytes())?;
                    1
                }
            };
            Ok((output, code))
        }
    }
}

fn run_command<T: BuiltinCommand>(
    name: &str,
    cmd: T,
    env: &mut Environment,
) -> Result<(CapturedOutput, ExitCode)> {
    let mut output = CapturedOutput::default();
    let code = match cmd.execute(&mut output.stdout, &mut output.stderr, env) {
        Ok(x) => x,
        Err(e) => {
            writeln!(output.stderr, "{name}: {e:#}")?;
            1
        }
    };
    Ok((output, code))
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        writeln!(stdout, "{}", env.current_dir.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. `~` expands to $HOME.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let home = env.get_var("HOME");
        let arg = self.target.unwrap_or_default();
        let target = if arg.is_empty() {
            match &home {
                Some(home) => PathBuf::from(home),
                None => return Err(anyhow::anyhow!("HOME not set")),
            }
        } else if let Some(home) = &home {
            PathBuf::from(arg.replace('~', home))
        } else {
            PathBuf::from(&arg)
        };

        let new_dir = env.current_dir.join(target);
        match fs::canonicalize(&new_dir) {
            Ok(dir) if dir.is_dir() => {
                log::debug!("cd: {} -> {}", env.current_dir.display(), dir.display());
                env.current_dir = dir;
                Ok(0)
            }
            Ok(_) => {
                writeln!(stderr, "cd: {arg}: Not a directory")?;
                Ok(1)
            }
            Err(_) => {
                writeln!(stderr, "cd: {arg}: No such file or directory")?;
                Ok(1)
            }
        }
    }
}

/// Exit the shell with the given status (0 when omitted, 1 when not a number).
pub struct Exit {
    pub code: Option<String>,
}

impl Exit {
    fn from_words(args: &[&str]) -> Self {
        Self {
            code: args.first().map(|s| s.to_string()),
        }
    }
}

impl BuiltinCommand for Exit {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let code = match self.code {
            None => 0,
            Some(code) => code.trim().parse().unwrap_or(1),
        };
        env.exit_request = Some(code);
        Ok(code)
    }
}

/// Write the arguments to standard output, separated by spaces.
/// By default, a trailing newline is printed; leading `-n` words suppress it.
pub struct Echo {
    pub no_newline: bool,
    pub args: Vec<String>,
}

impl Echo {
    fn from_words(args: &[&str]) -> Self {
        let flags = args.iter().take_while(|&&arg| arg == "-n").count();
        Self {
            no_newline: flags > 0,
            args: args.iter().skip(flags).map(|s| s.to_string()).collect(),
        }
    }
}

impl BuiltinCommand for Echo {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        let s = self.args.join(" ");
        if self.no_newline {
            write!(stdout, "{s}")?;
        } else {
            writeln!(stdout, "{s}")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Tell how each name would be interpreted if used as a command.
pub struct Type {
    #[argh(positional, greedy)]
    /// command names to look up.
    pub names: Vec<String>,
}

impl BuiltinCommand for Type {
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        let mut code = 0;
        for name in &self.names {
            if Builtin::from_name(name).is_some() {
                writeln!(stdout, "{name} is a shell builtin")?;
            } else if let Some(path) =
                find_command_path(&env.search_path(), name, &env.current_dir)
            {
                writeln!(stdout, "{name} is {}", path.display())?;
            } else {
                writeln!(stderr, "{name}: not found")?;
                code = 1;
            }
        }
        Ok(code)
    }
}
