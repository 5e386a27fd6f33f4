//! Output redirection extraction.
//!
//! Redirection is recognised on the raw line, before it is split into words. The operators
//! are tried in a fixed precedence order and the first one present wins; the line is cut at
//! its first occurrence.

use crate::lexer::unquoted_mask;

/// Which output stream of the command goes to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Descriptor {
    /// No redirection: both streams go to the terminal.
    #[default]
    None,
    Stdout,
    Stderr,
}

/// How the redirection target is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Discard previous content (`>`).
    #[default]
    Truncate,
    /// Keep previous content and write after it (`>>`).
    Append,
}

/// Parsed redirection of one input line.
///
/// The default value means "no redirection".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Redirection {
    pub descriptor: Descriptor,
    pub mode: WriteMode,
    /// Target file path, trimmed. Empty when `descriptor` is [`Descriptor::None`].
    pub path: String,
}

impl Redirection {
    pub fn is_redirected(&self) -> bool {
        self.descriptor != Descriptor::None
    }
}

/// Recognised operators, highest precedence first.
const OPERATORS: [(&str, Descriptor, WriteMode); 6] = [
    ("1>>", Descriptor::Stdout, WriteMode::Append),
    ("2>>", Descriptor::Stderr, WriteMode::Append),
    (">>", Descriptor::Stdout, WriteMode::Append),
    ("1>", Descriptor::Stdout, WriteMode::Truncate),
    ("2>", Descriptor::Stderr, WriteMode::Truncate),
    (">", Descriptor::Stdout, WriteMode::Truncate),
];

/// How operators are located in the raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectScan {
    /// Plain substring search. An operator inside quotes is still taken as a redirection.
    #[default]
    Raw,
    /// Only occurrences that are outside quotes and not escaped count.
    QuoteAware,
}

impl RedirectScan {
    /// Splits `line` into the command text and its redirection using this scan mode.
    pub fn extract(self, line: &str) -> (String, Redirection) {
        match self {
            RedirectScan::Raw => extract(line),
            RedirectScan::QuoteAware => extract_quote_aware(line),
        }
    }
}

/// Splits `line` into the command text and its redirection.
///
/// Operators are matched as raw substrings, so `echo '>'` redirects to an empty path.
/// The command text is returned untrimmed.
///
/// ```
/// use myshell::redirect::{extract, Descriptor, WriteMode};
/// let (cmd, redir) = extract("echo hi 1>> out.txt");
/// assert_eq!(cmd, "echo hi ");
/// assert_eq!(redir.descriptor, Descriptor::Stdout);
/// assert_eq!(redir.mode, WriteMode::Append);
/// assert_eq!(redir.path, "out.txt");
/// ```
pub fn extract(line: &str) -> (String, Redirection) {
    extract_with(line, |op| line.find(op))
}

/// Like [`extract`], but ignores operator characters that are quoted or escaped.
pub fn extract_quote_aware(line: &str) -> (String, Redirection) {
    let mask = unquoted_mask(line);
    extract_with(line, |op| {
        line.match_indices(op)
            .map(|(idx, _)| idx)
            .find(|&idx| {
                mask.get(idx..idx + op.len())
                    .is_some_and(|bytes| bytes.iter().all(|&active| active))
            })
    })
}

fn extract_with(line: &str, find: impl Fn(&str) -> Option<usize>) -> (String, Redirection) {
    for (op, descriptor, mode) in OPERATORS {
        let Some(idx) = find(op) else { continue };
        let (command, rest) = line.split_at(idx);
        let path = rest.get(op.len()..).unwrap_or_default().trim();
        log::trace!("redirection operator {op:?} at byte {idx}, target {path:?}");
        return (
            command.to_string(),
            Redirection {
                descriptor,
                mode,
                path: path.to_string(),
            },
        );
    }
    (line.to_string(), Redirection::default())
}
