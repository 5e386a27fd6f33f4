//! Exit codes, builtin names and per-line command classification.

use crate::resolve::{SearchPath, find_command_path};
use std::path::{Path, PathBuf};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Status reported when a command name cannot be resolved.
pub const EXIT_NOT_FOUND: ExitCode = 127;
/// Status reported when a resolved program cannot be started.
pub const EXIT_CANNOT_EXECUTE: ExitCode = 126;

/// Commands implemented inside the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Echo,
    Exit,
    Pwd,
    Type,
}

impl Builtin {
    pub const ALL: [Builtin; 5] = [
        Builtin::Cd,
        Builtin::Echo,
        Builtin::Exit,
        Builtin::Pwd,
        Builtin::Type,
    ];

    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Echo => "echo",
            Builtin::Exit => "exit",
            Builtin::Pwd => "pwd",
            Builtin::Type => "type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// What the first word of a line refers to, decided once per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    /// An executable file found for the name.
    External(PathBuf),
    NotFound,
}

impl CommandKind {
    /// Builtins shadow executables of the same name. Relative names resolve from `base_dir`.
    pub fn classify(name: &str, search_path: &SearchPath, base_dir: &Path) -> Self {
        if let Some(builtin) = Builtin::from_name(name) {
            return CommandKind::Builtin(builtin);
        }
        match find_command_path(search_path, name, base_dir) {
            Some(path) => CommandKind::External(path),
            None => CommandKind::NotFound,
        }
    }
}

/// Output of one command, fully buffered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}
