use url::form_urlencoded;

/// Request form expected by an upstream search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Whitespace runs become `-`; used as a path segment (`/search/the-matrix`).
    Hyphen,
    /// Whitespace runs become `+` and everything else is form-encoded,
    /// parentheses included; used as a query-string value.
    Plus,
}

/// Turn a free-text query into the shape a source expects. Never fails; an
/// empty query yields an empty string.
pub fn normalize(query: &str, mode: NormalizeMode) -> String {
    let collapsed = collapse_whitespace(query);
    match mode {
        NormalizeMode::Hyphen => collapsed.replace(' ', "-"),
        // form encoding leaves only [A-Za-z0-9*-._] bare, so '(' and ')' come out as %28/%29
        NormalizeMode::Plus => form_urlencoded::byte_serialize(collapsed.as_bytes()).collect(),
    }
}

/// Trim and squeeze every whitespace run (newlines included) to one space.
pub(crate) fn collapse_whitespace(q: &str) -> String {
    let t = q.trim();
    let mut o = String::with_capacity(t.len());
    let mut s = false;
    for c in t.chars() {
        if c.is_whitespace() {
            if !s { o.push(' '); s = true; }
        } else {
            o.push(c); s = false;
        }
    }
    o
}
