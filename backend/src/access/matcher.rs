/// Paths reachable without any session.
pub const PUBLIC_ROUTES: [&str; 2] = ["/login", "/404"];

/// path_matches
///
/// Returns true if `path` satisfies any of `patterns`.
///
/// A pattern ending in `/*` matches every path that starts with the pattern minus its
/// `*`, slash included: `/foo/*` matches `/foo/` and `/foo/42` but neither `/foo` nor
/// `/foobar`. Any other pattern must equal the path exactly.
pub fn path_matches<P: AsRef<str>>(path: &str, patterns: &[P]) -> bool {
    patterns.iter().any(|pattern| {
        let pattern = pattern.as_ref();
        match pattern.strip_suffix('*') {
            Some(prefix) if prefix.ends_with('/') => path.starts_with(prefix),
            _ => path == pattern,
        }
    })
}

