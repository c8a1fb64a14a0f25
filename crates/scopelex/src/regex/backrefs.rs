//! # Back-Reference Rewriting
//!
//! End patterns may refer to text captured by their scope's begin pattern
//! with `\1` .. `\9`. These are not regex back-references (the end pattern
//! never saw the begin text); they are rewritten into escaped literals
//! before the end pattern is compiled.

/// Does `source` contain a `\1` .. `\9` reference?
///
/// Escaped backslashes (`\\1`) are not references.
pub fn has_backrefs(source: &str) -> bool {
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('1'..='9') => return true,
                _ => continue,
            }
        }
    }
    false
}

/// Rewrite `\N` references in `source` with the escaped text of `captures[N]`.
///
/// ## Arguments
/// * `source` - the pattern source.
/// * `captures` - `[total, group1, group2, ...]` texts; missing groups become empty.
///
/// ## Returns
/// The rewritten pattern source.
pub fn substitute_backrefs<S: AsRef<str>>(
    source: &str,
    captures: &[S],
) -> String {
    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(d @ '1'..='9') => {
                let idx = d as usize - '0' as usize;
                if let Some(text) = captures.get(idx) {
                    result.push_str(&regex::escape(text.as_ref()));
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_backrefs() {
        assert!(has_backrefs(r"\1"));
        assert!(has_backrefs(r"^\s*\2$"));
        assert!(!has_backrefs(r"\\1"));
        assert!(!has_backrefs(r"\d+\0"));
        assert!(!has_backrefs("plain"));
        assert!(!has_backrefs("trailing\\"));
    }

    #[test]
    fn test_substitute_backrefs() {
        assert_eq!(substitute_backrefs(r"^\1$", &["<<EOT", "EOT"]), "^EOT$");
        assert_eq!(substitute_backrefs(r"\1", &["'", "'"]), "'");
        assert_eq!(substitute_backrefs(r"\1\2", &["x", "a.b"]), r"a\.b");
        assert_eq!(substitute_backrefs(r"\\1\d", &["x", "y"]), r"\\1\d");
        assert_eq!(substitute_backrefs(r"x\", &["x"]), r"x\");
    }
}
