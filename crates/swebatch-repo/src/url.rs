//! Credential embedding for git remote URLs

/// Embed `token` as the userinfo component of `url`.
///
/// `https://host/path` becomes `https://<token>@host/path`. Scheme, host and
/// path are preserved exactly. If either input is empty, or the URL has no
/// `scheme://` authority, the URL is returned unchanged.
pub fn build_authenticated_url(url: &str, token: &str) -> String {
    if url.is_empty() || token.is_empty() {
        return url.to_string();
    }

    match url.split_once("://") {
        Some((scheme, rest)) => format!("{}://{}@{}", scheme, token, rest),
        None => url.to_string(),
    }
}

/// Replace every occurrence of `token` in `text` with `***`.
///
/// Anything that may end up in a log line or on a terminal goes through here.
pub fn redact_token(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "***")
}
