//! Launching external programs and collecting their output and status.

use crate::command::{CapturedOutput, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Outcome of running an external program.
///
/// A program that ran and exited with a non-zero status is not an error here: its output
/// is captured as usual and `start_error` stays `None`.
#[derive(Debug, Default)]
pub struct ExecutionResult {
    pub output: CapturedOutput,
    /// Exit status of the child; `None` if it never started.
    pub exit_code: Option<ExitCode>,
    /// Set when the program could not be launched at all.
    pub start_error: Option<ShellError>,
}

impl ExecutionResult {
    fn not_started(error: ShellError) -> Self {
        Self {
            start_error: Some(error),
            ..Self::default()
        }
    }
}

/// Run `executable` with `args`, presenting `name` as its `argv[0]`.
///
/// Standard output and standard error are collected into memory until the child exits;
/// nothing reaches the terminal while it runs. Standard input is inherited. The child gets
/// the variables of `env` and runs in `env.current_dir`.
pub fn run(name: &str, args: &[&str], executable: &Path, env: &Environment) -> ExecutionResult {
    let mut cmd = Command::new(executable);
    set_arg0(&mut cmd, name);
    cmd.args(args)
        .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&env.current_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            log::debug!("failed to spawn {}: {source}", executable.display());
            return ExecutionResult::not_started(ShellError::Launch {
                name: name.to_string(),
                source,
            });
        }
    };

    // Reads both pipes to the end, so a chatty child cannot block on a full pipe.
    match child.wait_with_output() {
        Ok(out) => {
            let code = exit_code(out.status);
            log::debug!("{name} exited with {code}");
            ExecutionResult {
                output: CapturedOutput {
                    stdout: out.stdout,
                    stderr: out.stderr,
                },
                exit_code: Some(code),
                start_error: None,
            }
        }
        Err(source) => ExecutionResult::not_started(ShellError::Launch {
            name: name.to_string(),
            source,
        }),
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut Command, _name: &str) {}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn sh(script: &str) -> ExecutionResult {
        run("sh", &["-c", script], Path::new("/bin/sh"), &Environment::new())
    }

    #[test]
    fn test_captures_both_streams_separately() {
        let res = sh("echo out; echo err >&2");
        assert!(res.start_error.is_none());
        assert_eq!(res.output.stdout, b"out\n");
        assert_eq!(res.output.stderr, b"err\n");
        assert_eq!(res.exit_code, Some(0));
    }

    #[test]
    fn test_non_zero_exit_is_not_a_start_error() {
        let res = sh("echo oops >&2; exit 3");
        assert!(res.start_error.is_none());
        assert_eq!(res.exit_code, Some(3));
        assert_eq!(res.output.stderr, b"oops\n");
    }

    #[test]
    fn test_killed_child_reports_signal_status() {
        let res = sh("kill -9 $$");
        assert!(res.start_error.is_none());
        assert_eq!(res.exit_code, Some(128 + 9));
    }

    #[test]
    fn test_argv0_is_the_typed_name() {
        let res = run(
            "my-alias",
            &["-c", "echo $0"],
            Path::new("/bin/sh"),
            &Environment::new(),
        );
        assert_eq!(res.output.stdout, b"my-alias\n");
    }

    #[test]
    fn test_runs_in_environment_dir_with_its_vars() {
        let dir = tempdir().unwrap();
        let mut env = Environment::new();
        env.current_dir = fs::canonicalize(dir.path()).unwrap();
        env.set_var("MYSHELL_TEST_VAR", "from-env");

        let res = run(
            "sh",
            &["-c", "pwd; echo $MYSHELL_TEST_VAR"],
            Path::new("/bin/sh"),
            &env,
        );
        let expected = format!("{}\nfrom-env\n", env.current_dir.display());
        assert_eq!(String::from_utf8(res.output.stdout).unwrap(), expected);
    }

    #[test]
    fn test_large_output_on_both_streams() {
        let res = sh("i=0; while [ $i -lt 20000 ]; do echo line; echo err >&2; i=$((i+1)); done");
        assert_eq!(res.output.stdout.len(), 20000 * 5);
        assert_eq!(res.output.stderr.len(), 20000 * 4);
    }

    #[test]
    fn test_missing_executable_is_a_start_error() {
        let res = run(
            "ghost",
            &[],
            Path::new("/definitely/not/here"),
            &Environment::new(),
        );
        assert!(matches!(res.start_error, Some(ShellError::Launch { ref name, .. }) if name == "ghost"));
        assert_eq!(res.exit_code, None);
        assert!(res.output.stdout.is_empty() && res.output.stderr.is_empty());
    }

    #[test]
    fn test_non_executable_file_is_a_start_error() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("script");
        fs::write(&script, b"#!/bin/sh\necho hi\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

        let res = run("script", &[], &script, &Environment::new());
        assert!(res.start_error.is_some());
    }
}
