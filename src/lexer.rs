use crate::env::Environment;

/// Split a raw input line into whitespace-separated tokens.
///
/// No quoting or escaping is supported; the execution core only ever sees
/// plain word tokens plus the `|`, `<`, `>` and `&` operators as their own
/// tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Apply tilde and variable expansion to every token, in place.
///
/// - A token that is exactly `~` or starts with `~/` has the tilde replaced
///   with `$HOME`; when `HOME` is unset the token is left alone.
/// - A token starting with `$` is replaced with the named variable's value,
///   or the empty string when the variable is unset.
///
/// Tokens that expand to the empty string are removed, so downstream
/// consumers never see embedded empty tokens.
pub fn expand_tokens(env: &Environment, tokens: &mut Vec<String>) {
    for tok in tokens.iter_mut() {
        if let Some(expanded) = expand_tilde(env, tok) {
            *tok = expanded;
        }
        if let Some(name) = tok.strip_prefix('$') {
            *tok = env.get_var(name).unwrap_or_default();
        }
    }
    tokens.retain(|t| !t.is_empty());
}

fn expand_tilde(env: &Environment, tok: &str) -> Option<String> {
    let rest = match tok.strip_prefix('~') {
        Some("") => "",
        Some(r) if r.starts_with('/') => r,
        _ => return None,
    };
    env.home().map(|home| format!("{home}{rest}"))
}
