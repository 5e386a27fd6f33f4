//! Delivery of captured command output to the terminal or to a redirection target.

use crate::command::CapturedOutput;
use crate::error::ShellError;
use crate::redirect::{Descriptor, Redirection, WriteMode};
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// The interpreter's own output streams.
pub struct Terminal<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl<'a> Terminal<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }
}

/// Write `output` where `redirection` says.
///
/// - no redirection: stderr to the terminal first, then stdout;
/// - stdout redirected: stdout to the file, stderr to the terminal;
/// - stderr redirected: stderr to the file, stdout to the terminal.
///
/// Every non-empty buffer gets a trailing newline if it lacks one. The target file is
/// opened even when its buffer is empty, so truncation still happens. When it cannot be
/// opened the failure is reported on the terminal error stream and only the redirected
/// data is lost. A relative target is taken relative to `base_dir`.
///
/// Errors are returned only for failures to write to the terminal itself.
pub fn route(
    output: &CapturedOutput,
    redirection: &Redirection,
    base_dir: &Path,
    term: &mut Terminal<'_>,
) -> io::Result<()> {
    let stdout = with_trailing_newline(&output.stdout);
    let stderr = with_trailing_newline(&output.stderr);

    match redirection.descriptor {
        Descriptor::None => {
            term.err.write_all(&stderr)?;
            term.out.write_all(&stdout)?;
        }
        Descriptor::Stdout => {
            write_to_target(redirection, base_dir, &stdout, term)?;
            term.err.write_all(&stderr)?;
        }
        Descriptor::Stderr => {
            write_to_target(redirection, base_dir, &stderr, term)?;
            term.out.write_all(&stdout)?;
        }
    }

    term.err.flush()?;
    term.out.flush()
}

/// Append a newline to a non-empty buffer that does not already end with one.
pub fn with_trailing_newline(buf: &[u8]) -> Cow<'_, [u8]> {
    match buf.last() {
        None | Some(b'\n') => Cow::Borrowed(buf),
        Some(_) => {
            let mut owned = Vec::with_capacity(buf.len() + 1);
            owned.extend_from_slice(buf);
            owned.push(b'\n');
            Cow::Owned(owned)
        }
    }
}

/// Open the redirection target for writing, creating it with `rw-r--r--` if needed.
pub fn open_target(redirection: &Redirection, base_dir: &Path) -> Result<File, ShellError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    match redirection.mode {
        WriteMode::Truncate => options.truncate(true),
        WriteMode::Append => options.append(true),
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options
        .open(base_dir.join(&redirection.path))
        .map_err(|source| ShellError::RedirectOpen {
            path: redirection.path.clone(),
            source,
        })
}

fn write_to_target(
    redirection: &Redirection,
    base_dir: &Path,
    data: &[u8],
    term: &mut Terminal<'_>,
) -> io::Result<()> {
    let mut file = match open_target(redirection, base_dir) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("dropping redirected output: {e}");
            return writeln!(term.err, "{e}");
        }
    };

    if let Err(source) = file.write_all(data) {
        let e = ShellError::RedirectWrite {
            path: redirection.path.clone(),
            source,
        };
        log::warn!("redirected output truncated: {e}");
        writeln!(term.err, "{e}")?;
    }
    Ok(())
}
