use std::path::PathBuf;
use thiserror::Error;

/// Redirection targets extracted from one command line.
///
/// Ownership is transient: the paths live for a single invocation and are
/// consumed when the launched process's stdio is set up.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Redirection {
    /// File to open read-only as the (first) command's standard input.
    pub input: Option<PathBuf>,
    /// File to create/truncate as the (last) command's standard output.
    pub output: Option<PathBuf>,
}

impl Redirection {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    /// A `<` or `>` operator appeared as the last token, with no filename
    /// after it. The whole line must be discarded.
    #[error("missing file name after '{operator}'")]
    MissingRedirectionTarget { operator: char },
}

/// Scan a token sequence for `<` and `>` operators.
///
/// Returns the residual tokens with each operator and its operand removed
/// (relative order of the survivors preserved) together with the extracted
/// [`Redirection`]. When the same operator appears more than once, the last
/// occurrence wins. The input slice is never mutated, so on error the
/// caller's tokens are intact.
pub fn split(tokens: &[String]) -> Result<(Vec<String>, Redirection), RedirectError> {
    let mut residual = Vec::with_capacity(tokens.len());
    let mut redir = Redirection::default();

    let mut i = 0;
    while i < tokens.len() {
        let operator = match tokens[i].as_str() {
            "<" => '<',
            ">" => '>',
            _ => {
                residual.push(tokens[i].clone());
                i += 1;
                continue;
            }
        };
        let Some(target) = tokens.get(i + 1) else {
            return Err(RedirectError::MissingRedirectionTarget { operator });
        };
        match operator {
            '<' => redir.input = Some(PathBuf::from(target)),
            _ => redir.output = Some(PathBuf::from(target)),
        }
        i += 2;
    }

    Ok((residual, redir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn passthrough_without_operators() {
        let input = toks(&["echo", "hi", "there"]);
        let (residual, redir) = split(&input).unwrap();
        assert_eq!(residual, input);
        assert!(redir.is_empty());
    }

    #[test]
    fn extracts_input_file_and_preserves_order() {
        let input = toks(&["sort", "<", "data.txt", "-r"]);
        let (residual, redir) = split(&input).unwrap();
        assert_eq!(residual, toks(&["sort", "-r"]));
        assert_eq!(redir.input, Some(PathBuf::from("data.txt")));
        assert_eq!(redir.output, None);
    }

    #[test]
    fn extracts_both_directions() {
        let input = toks(&["cat", "<", "in.txt", ">", "out.txt"]);
        let (residual, redir) = split(&input).unwrap();
        assert_eq!(residual, toks(&["cat"]));
        assert_eq!(redir.input, Some(PathBuf::from("in.txt")));
        assert_eq!(redir.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn last_occurrence_wins() {
        let input = toks(&["cmd", ">", "first.txt", ">", "second.txt"]);
        let (residual, redir) = split(&input).unwrap();
        assert_eq!(residual, toks(&["cmd"]));
        assert_eq!(redir.output, Some(PathBuf::from("second.txt")));
    }

    #[test]
    fn trailing_operator_is_an_error_and_input_is_untouched() {
        let input = toks(&["echo", "hi", ">"]);
        let before = input.clone();
        let err = split(&input).unwrap_err();
        assert_eq!(
            err,
            RedirectError::MissingRedirectionTarget { operator: '>' }
        );
        assert_eq!(input, before);
    }

    #[test]
    fn trailing_input_operator_is_an_error() {
        let input = toks(&["wc", "<"]);
        let err = split(&input).unwrap_err();
        assert_eq!(
            err,
            RedirectError::MissingRedirectionTarget { operator: '<' }
        );
    }

    #[test]
    fn no_operator_tokens_survive() {
        let input = toks(&["a", "<", "b", "c", ">", "d", "e"]);
        let (residual, _) = split(&input).unwrap();
        assert!(residual.iter().all(|t| t != "<" && t != ">"));
        assert_eq!(residual, toks(&["a", "c", "e"]));
    }
}
