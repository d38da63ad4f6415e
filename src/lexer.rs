//! Splitting a raw command line into tokens.
//!
//! The rules are deliberately primitive: a space always splits, there is no
//! quoting or escaping, and a run of consecutive spaces produces empty
//! tokens. Callers see exactly what the user typed, one fragment per token.

/// The reserved pipeline separator character.
pub const PIPE_MARK: char = '|';

/// Result of tokenizing one line.
///
/// `pipe_marks` counts occurrences of [`PIPE_MARK`] anywhere in the line,
/// including inside a larger token like `a|b`. Only tokens that consist of
/// the marker alone separate pipeline stages; the count is carried here so
/// later phases can size their buffers without re-scanning the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    /// Ordered token list. Never empty: an empty line yields one empty token.
    pub tokens: Vec<String>,
    /// Number of pipe-marker characters seen while scanning.
    pub pipe_marks: usize,
}

impl Tokenized {
    /// True when the line held nothing but a single empty token, i.e. the
    /// user pressed enter on an empty (or all-pipe-free, zero-length) line.
    pub fn is_empty_command(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0].is_empty()
    }
}

/// Tokenize a line on single space characters.
///
/// Every run between spaces becomes one token, including zero-length runs
/// caused by consecutive spaces. No other whitespace is special.
pub fn split_into_tokens(line: &str) -> Tokenized {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut pipe_marks = 0;

    for ch in line.chars() {
        if ch == ' ' {
            tokens.push(std::mem::take(&mut current));
        } else {
            if ch == PIPE_MARK {
                pipe_marks += 1;
            }
            current.push(ch);
        }
    }
    tokens.push(current);

    Tokenized { tokens, pipe_marks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        split_into_tokens(line).tokens
    }

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(tokens("ls -l /tmp"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn consecutive_spaces_yield_empty_tokens() {
        assert_eq!(tokens("echo  hi"), vec!["echo", "", "hi"]);
        assert_eq!(tokens(" ls"), vec!["", "ls"]);
        assert_eq!(tokens("ls "), vec!["ls", ""]);
    }

    #[test]
    fn empty_line_is_one_empty_token() {
        let out = split_into_tokens("");
        assert_eq!(out.tokens, vec![""]);
        assert!(out.is_empty_command());
    }

    #[test]
    fn counts_pipe_marks_everywhere() {
        let out = split_into_tokens("ls | wc");
        assert_eq!(out.tokens, vec!["ls", "|", "wc"]);
        assert_eq!(out.pipe_marks, 1);

        // A marker embedded in a token is counted but does not split.
        let out = split_into_tokens("a|b");
        assert_eq!(out.tokens, vec!["a|b"]);
        assert_eq!(out.pipe_marks, 1);
    }

    #[test]
    fn tab_is_not_a_separator() {
        assert_eq!(tokens("ls\t-l"), vec!["ls\t-l"]);
    }
}
