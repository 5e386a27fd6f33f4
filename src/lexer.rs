//! A module implementing lexical analysis (tokenization) of a command line into words.
//!
//! Quoting follows the usual POSIX shell conventions, minus any kind of expansion:
//! - outside quotes a backslash makes the next character literal (spaces and quotes included);
//! - inside single quotes every character is literal;
//! - inside double quotes only `\"` and `\\` are escapes, any other backslash is kept as is.

use crate::error::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Normal,
    SingleQuote,
    DoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
    /// Set when a quote opened inside the current word, so that `''` still yields a word.
    quoted: bool,
}

impl LexingFSM {
    /// Creates a new instance of the lexical analysis Finite State Machine.
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Normal,
            buffer: String::new(),
            quoted: false,
        }
    }

    /// Runs the machine over the whole input and returns the words found.
    ///
    /// A quote still open at the end of the input silently terminates the last word;
    /// the final state stays available in `self.state` for callers that want to reject it.
    fn make_tokens(&mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Normal => self.handle_normal(ch, &mut out),
                LexingState::SingleQuote => self.handle_single_quote(ch),
                LexingState::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        self.flush_word(&mut out);
        out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn handle_normal(&mut self, ch: char, out: &mut Vec<String>) {
        match ch {
            ' ' | '\t' => self.flush_word(out),
            '\\' => {
                // A trailing backslash has nothing to escape and is dropped.
                if let Some(next) = self.read_char() {
                    self.buffer.push(next);
                }
            }
            '\'' => {
                self.quoted = true;
                self.state = LexingState::SingleQuote;
            }
            '"' => {
                self.quoted = true;
                self.state = LexingState::DoubleQuote;
            }
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::Normal,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::Normal,
            '\\' => match self.peek_char() {
                Some(c @ ('\\' | '"')) => {
                    self.read_char();
                    self.buffer.push(c);
                }
                _ => self.buffer.push('\\'),
            },
            c => self.buffer.push(c),
        }
    }

    fn flush_word(&mut self, out: &mut Vec<String>) {
        if !self.buffer.is_empty() || self.quoted {
            out.push(std::mem::take(&mut self.buffer));
        }
        self.quoted = false;
    }
}

/// The main entry point function to perform lexical analysis.
///
/// Splits `line` into fully unquoted and unescaped words. An unterminated quote closes the
/// last word at the end of the line without complaint.
///
/// ```
/// use myshell::lexer::split_into_tokens;
/// assert_eq!(split_into_tokens(r#"cat 'a b' "c\"d""#), ["cat", "a b", "c\"d"]);
/// ```
pub fn split_into_tokens(line: &str) -> Vec<String> {
    LexingFSM::new(line).make_tokens()
}

/// Same as [`split_into_tokens`], but rejects a line that ends inside a quote.
pub fn split_into_tokens_strict(line: &str) -> Result<Vec<String>, ShellError> {
    let mut lexer = LexingFSM::new(line);
    let tokens = lexer.make_tokens();
    match lexer.state {
        LexingState::Normal => Ok(tokens),
        LexingState::SingleQuote | LexingState::DoubleQuote => {
            Err(ShellError::UnterminatedQuote)
        }
    }
}

/// Marks which bytes of `line` are syntactically active, i.e. neither quoted nor escaped.
///
/// The mask is indexed by byte offset and has the same length as `line`. Quote characters,
/// escaping backslashes and the characters they protect are all `false`.
pub fn unquoted_mask(line: &str) -> Vec<bool> {
    let mut mask = vec![false; line.len()];
    let mut state = LexingState::Normal;
    let mut chars = line.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match (state, ch) {
            (LexingState::Normal, '\\') => {
                chars.next();
            }
            (LexingState::Normal, '\'') => state = LexingState::SingleQuote,
            (LexingState::Normal, '"') => state = LexingState::DoubleQuote,
            (LexingState::Normal, c) => {
                if let Some(slots) = mask.get_mut(idx..idx + c.len_utf8()) {
                    slots.fill(true);
                }
            }
            (LexingState::SingleQuote, '\'') => state = LexingState::Normal,
            (LexingState::DoubleQuote, '"') => state = LexingState::Normal,
            (LexingState::DoubleQuote, '\\') => {
                if matches!(chars.peek(), Some((_, '\\' | '"'))) {
                    chars.next();
                }
            }
            _ => {}
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_split_on_whitespace_runs() {
        let line = "ls   -la \t /tmp  ";
        let expected: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(split_into_tokens(line), expected);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens("    ").is_empty());
    }

    #[test]
    fn test_single_quotes_are_verbatim() {
        assert_eq!(
            split_into_tokens(r"cat 'a b' 'c\d'"),
            ["cat", "a b", r"c\d"]
        );
    }

    #[test]
    fn test_single_quotes_keep_inner_spacing() {
        let line = "cat '/tmp/baz/f   69' '/tmp/baz/f   23' '/tmp/baz/f   80'";
        assert_eq!(
            split_into_tokens(line),
            ["cat", "/tmp/baz/f   69", "/tmp/baz/f   23", "/tmp/baz/f   80"]
        );
    }

    #[test]
    fn test_double_quotes_only_escape_quote_and_backslash() {
        assert_eq!(
            split_into_tokens(r#"echo "a\"b" "c\\d""#),
            ["echo", "a\"b", r"c\d"]
        );
        assert_eq!(
            split_into_tokens(r#"cat "file\\name" "file\ name""#),
            ["cat", r"file\name", r"file\ name"]
        );
    }

    #[test]
    fn test_double_quotes_with_single_quote_inside() {
        assert_eq!(
            split_into_tokens(r#"echo "test"  "shell's"  "world""#),
            ["echo", "test", "shell's", "world"]
        );
    }

    #[test]
    fn test_escaped_spaces_join_words() {
        assert_eq!(split_into_tokens(r"a\ \ b"), ["a  b"]);
        assert_eq!(
            split_into_tokens(r"world\ \ \ \ \ \ script"),
            ["world      script"]
        );
    }

    #[test]
    fn test_escaped_quotes_outside_quotes() {
        assert_eq!(
            split_into_tokens(r#"echo \'\"test script\"\'"#),
            ["echo", "'\"test", "script\"'"]
        );
    }

    #[test]
    fn test_escaped_backslash_outside_quotes() {
        assert_eq!(split_into_tokens(r"a\\b"), [r"a\b"]);
        assert_eq!(split_into_tokens(r"a\nb"), ["anb"]);
    }

    #[test]
    fn test_adjacent_quoted_parts_form_one_word() {
        assert_eq!(split_into_tokens(r#"x'a b'"c d"y"#), ["xa bc dy"]);
    }

    #[test]
    fn test_empty_quotes_produce_empty_word() {
        assert_eq!(split_into_tokens("echo '' \"\""), ["echo", "", ""]);
        assert_eq!(split_into_tokens("a''b"), ["ab"]);
    }

    #[test]
    fn test_trailing_backslash_is_dropped() {
        assert_eq!(split_into_tokens(r"echo hi\"), ["echo", "hi"]);
    }

    #[test]
    fn test_unterminated_quote_closes_word() {
        assert_eq!(split_into_tokens("echo 'abc def"), ["echo", "abc def"]);
        assert_eq!(split_into_tokens("echo \"abc"), ["echo", "abc"]);
    }

    #[test]
    fn test_strict_mode_rejects_unterminated_quote() {
        assert!(matches!(
            split_into_tokens_strict("echo 'abc"),
            Err(ShellError::UnterminatedQuote)
        ));
        assert!(matches!(
            split_into_tokens_strict("echo \"abc"),
            Err(ShellError::UnterminatedQuote)
        ));
        assert_eq!(
            split_into_tokens_strict("echo 'abc'").unwrap(),
            ["echo", "abc"]
        );
    }

    #[test]
    fn test_unquoted_mask_skips_quotes_and_escapes() {
        let line = r#"a'>'b">"\>c"#;
        let mask = unquoted_mask(line);
        assert_eq!(mask.len(), line.len());
        let active: String = line
            .char_indices()
            .filter(|(i, _)| mask[*i])
            .map(|(_, c)| c)
            .collect();
        assert_eq!(active, "abc");
    }

    #[test]
    fn test_unquoted_mask_handles_multibyte_chars() {
        let line = "é>'ü'";
        let mask = unquoted_mask(line);
        assert_eq!(mask, [true, true, true, false, false, false, false]);
    }
}
