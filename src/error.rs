//! Error taxonomy shared by the line pipeline.

use std::io;
use thiserror::Error;

/// Failures reported by the line pipeline.
///
/// None of them is fatal: the interpreter prints the message on the error stream and
/// moves on to the next prompt. The `Display` text is the diagnostic shown to the user.
#[derive(Error, Debug)]
pub enum ShellError {
    /// The command name is neither a builtin nor an executable on the search path.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// The executable was resolved but the OS refused to start it.
    #[error("{name}: {source}")]
    Launch {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The redirection target could not be opened for writing.
    #[error("{path}: {source}")]
    RedirectOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The redirection target was opened but writing the output to it failed.
    #[error("{path}: write failed: {source}")]
    RedirectWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A quote was still open at the end of the line (strict mode only).
    #[error("syntax error: unterminated quote")]
    UnterminatedQuote,
}
