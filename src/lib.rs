//! A tiny interactive shell with output redirection.
//!
//! The crate turns one line of user input into a command run: the line is scanned for an
//! output redirection operator, the remaining text is split into words honoring quotes and
//! backslash escapes, the first word is dispatched to a builtin or to an executable found on
//! `PATH`, and the captured output is delivered to the terminal or to a file.
//!
//! The main entry point is [`Interpreter`]. The building blocks are public so each stage can
//! be used on its own: [`lexer::split_into_tokens`], [`redirect::extract`],
//! [`resolve::find_command_path`], [`external::run`] and [`router::route`].

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod redirect;
pub mod resolve;
pub mod router;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
