//! Mapbox access token handling.

const TOKEN_PREFIXES: [&str; 3] = ["pk.", "sk.", "tk."];

/// A Mapbox access token that passed format validation.
///
/// Format checks only: a well-formed token can still be rejected by the API,
/// which the pipeline treats like any other request failure.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Accept `pk.`/`sk.`/`tk.` tokens with a non-empty body and no whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.chars().any(char::is_whitespace) {
            return None;
        }
        let body = TOKEN_PREFIXES
            .iter()
            .find_map(|prefix| token.strip_prefix(prefix))?;
        if body.is_empty() {
            return None;
        }
        Some(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = self.0.get(..3).unwrap_or_default();
        write!(f, "AccessToken({prefix}***)")
    }
}
