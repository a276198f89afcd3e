use regex::Regex;
use std::sync::OnceLock;

const SECRET_REFERENCE_PATTERN: &str = r"^<% \$secrets\.([A-Za-z_][A-Za-z0-9_]*) %>$";

fn secret_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SECRET_REFERENCE_PATTERN).expect("valid regex"))
}

/// Returns the secret key named by a `<% $secrets.<key> %>` token.
///
/// The token has to be the whole string: `"<% $secrets.k1 %>suffix"` is a plain
/// value, not a reference.
pub fn parse_secret_reference(input: &str) -> Option<&str> {
    secret_reference_regex()
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str())
}

pub fn format_secret_reference(key: &str) -> String {
    format!("<% $secrets.{key} %>")
}

#[cfg(test)]
#[path = "secrets_test.rs"]
mod tests;
