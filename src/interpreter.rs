//! The interactive interpreter: one input line in, routed command output out.

use crate::command::{
    CapturedOutput, CommandKind, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND, ExitCode,
};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external;
use crate::router::{self, Terminal};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Exit status for a line rejected by the tokenizer.
const EXIT_SYNTAX: ExitCode = 2;

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// Each line goes through the same cycle: redirection extraction, tokenization,
/// classification of the first word, execution with fully captured output, and routing of
/// that output to the terminal or to the redirection target.
///
/// Example
/// ```
/// use myshell::Interpreter;
/// let mut sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let code = sh.execute_line("echo 'hello   world'", &mut out, &mut err).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"hello   world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    config: ShellConfig,
}

impl Interpreter {
    /// Create an interpreter over the current process environment.
    pub fn new(config: ShellConfig) -> Self {
        Self::with_env(config, Environment::new())
    }

    pub fn with_env(config: ShellConfig, env: Environment) -> Self {
        Self { env, config }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Status requested by the `exit` builtin, if it ran.
    pub fn exit_request(&self) -> Option<ExitCode> {
        self.env.exit_request
    }

    /// Run one input line, writing to the given terminal streams.
    ///
    /// Returns the status of the command. Command failures are reported on `err` and are
    /// not errors of this method; `Err` means the terminal streams themselves failed.
    pub fn execute_line(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(0);
        }

        let (text, redirection) = self.config.redirect_scan.extract(line);
        log::debug!("command text {text:?}, redirection {redirection:?}");

        let tokens = match self.config.tokenize(&text) {
            Ok(tokens) => tokens,
            Err(e) => {
                writeln!(err, "{e}")?;
                return Ok(EXIT_SYNTAX);
            }
        };
        log::debug!("tokens {tokens:?}");

        let (output, code) = match tokens.split_first() {
            // A bare redirection still creates or truncates its target.
            None => (CapturedOutput::default(), 0),
            Some((name, args)) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.dispatch(name, &args, err)?
            }
        };

        let base_dir = self.env.current_dir.clone();
        router::route(&output, &redirection, &base_dir, &mut Terminal::new(out, err))?;
        Ok(code)
    }

    fn dispatch(
        &mut self,
        name: &str,
        args: &[&str],
        err: &mut dyn Write,
    ) -> anyhow::Result<(CapturedOutput, ExitCode)> {
        let kind =
            CommandKind::classify(name, &self.env.search_path(), &self.env.current_dir);
        log::debug!("{name} classified as {kind:?}");

        match kind {
            CommandKind::Builtin(builtin) => builtin.run(args, &mut self.env),
            CommandKind::External(path) => {
                let result = external::run(name, args, &path, &self.env);
                match result.start_error {
                    Some(e) => {
                        writeln!(err, "{e}")?;
                        Ok((result.output, EXIT_CANNOT_EXECUTE))
                    }
                    None => Ok((
                        result.output,
                        result.exit_code.unwrap_or(EXIT_CANNOT_EXECUTE),
                    )),
                }
            }
            CommandKind::NotFound => {
                writeln!(err, "{}", ShellError::CommandNotFound(name.to_string()))?;
                Ok((CapturedOutput::default(), EXIT_NOT_FOUND))
            }
        }
    }

    /// Run a line against the process's own stdout and stderr.
    pub fn run_line(&mut self, line: &str) -> anyhow::Result<ExitCode> {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        self.execute_line(line, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Read-Eval-Print Loop over a line editor with history.
    ///
    /// Stops on end of input, on interrupt, or once `exit` has run. Returns the status the
    /// shell should exit with.
    pub fn repl(&mut self) -> rustyline::Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        let mut last_status = 0;

        while self.env.exit_request.is_none() {
            match rl.readline(&self.config.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    match self.run_line(&line) {
                        Ok(code) => last_status = code,
                        Err(e) => {
                            log::error!("terminal write failed: {e:#}");
                            return Err(ReadlineError::Io(std::io::Error::other(e)));
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(self.env.exit_request.unwrap_or(last_status))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
