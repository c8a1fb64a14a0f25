//! # Regex Wrapper
//! This modules provides mechanisms to mix `regex-automata` and `fancy_regex` types,
//! behind a single position-anchored interface.

use core::{fmt::Debug, ops::Range};
use std::sync::Arc;

use regex_automata::{Anchored, Input, meta};

/// Error wrapper for regex patterns.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ErrorWrapper {
    /// Error from the `regex-automata` meta engine.
    Basic(Box<meta::BuildError>),

    /// Error from `fancy_regex`.
    Fancy(Box<fancy_regex::Error>),
}

impl From<meta::BuildError> for ErrorWrapper {
    fn from(err: meta::BuildError) -> Self {
        Self::Basic(err.into())
    }
}

impl From<fancy_regex::Error> for ErrorWrapper {
    fn from(err: fancy_regex::Error) -> Self {
        Self::Fancy(err.into())
    }
}

impl core::fmt::Display for ErrorWrapper {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        match self {
            Self::Basic(err) => core::fmt::Display::fmt(err, f),
            Self::Fancy(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for ErrorWrapper {}

/// Label for regex patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RegexPattern {
    /// This is a pattern for the `regex-automata` meta engine.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the basic engine first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl<S: AsRef<str>> From<S> for RegexPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

impl RegexPattern {
    /// Get the underlying regex pattern.
    ///
    /// ## Returns
    /// The regex pattern string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a `RegexWrapper`.
    ///
    /// ## Returns
    /// A `Result` containing the compiled `RegexWrapper` or an `ErrorWrapper`.
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        match self {
            Self::Basic(pattern) => meta::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Fancy(pattern) => compile_fancy(pattern),
            Self::Adaptive(pattern) => meta::Regex::new(pattern)
                .map(RegexWrapper::from)
                .or_else(|_| compile_fancy(pattern)),
        }
    }
}

/// Compile a `fancy_regex` pattern which can only match at the search start.
///
/// The backtracking engine has no anchored search mode; `\G` pins the match
/// to the start position so a failed search fails there instead of
/// re-running the pattern at every later position. A trailing extended-mode
/// comment would swallow the closing group, so that form is retried with a
/// line break before it.
fn compile_fancy(pattern: &str) -> Result<RegexWrapper, ErrorWrapper> {
    fancy_regex::Regex::new(pattern)?;
    let regex = fancy_regex::Regex::new(&format!(r"\G(?:{pattern})"))
        .or_else(|_| fancy_regex::Regex::new(&format!("\\G(?:{pattern}\n)")))?;
    Ok(regex.into())
}

/// Common Regex Wrapper Handle Type
pub type RegexWrapperHandle = Arc<RegexWrapper>;

/// Wrapper for compiled regex patterns.
///
/// Every search is anchored at the caller's position: a match either starts
/// exactly there or does not exist. The haystack before the position stays
/// visible to look-behind and word-boundary assertions.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// Wrapper for `regex_automata::meta::Regex`.
    Basic(meta::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<meta::Regex> for RegexWrapper {
    fn from(regex: meta::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Is this `Basic`?
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic(_))
    }

    /// Is this `Fancy`?
    pub fn is_fancy(&self) -> bool {
        matches!(self, Self::Fancy(_))
    }

    /// The number of explicit capture groups (group 0 excluded).
    pub fn group_count(&self) -> usize {
        let total = match self {
            Self::Basic(regex) => regex.captures_len(),
            Self::Fancy(regex) => regex.captures_len(),
        };
        total.saturating_sub(1)
    }

    /// Find the end of a match anchored at `pos`.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    /// * `pos` - The byte position the match must start at.
    ///
    /// ## Returns
    /// The match end, `None` if no match starts at `pos`; or the backtracking
    /// engine's runtime error message.
    pub fn find_end_at(
        &self,
        haystack: &str,
        pos: usize,
    ) -> Result<Option<usize>, String> {
        match self {
            Self::Basic(regex) => {
                let input = Input::new(haystack).range(pos..).anchored(Anchored::Yes);
                Ok(regex.search(&input).map(|m| m.end()))
            }
            Self::Fancy(regex) => match regex.find_from_pos(haystack, pos) {
                Ok(Some(m)) if m.start() == pos => Ok(Some(m.end())),
                Ok(_) => Ok(None),
                Err(err) => Err(err.to_string()),
            },
        }
    }

    /// Capture all groups of a match anchored at `pos`.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    /// * `pos` - The byte position the match must start at.
    ///
    /// ## Returns
    /// `[group0, group1, ...]` spans, with `None` for groups which did not
    /// participate; `None` if no match starts at `pos`.
    pub fn captures_at(
        &self,
        haystack: &str,
        pos: usize,
    ) -> Result<Option<Vec<Option<Range<usize>>>>, String> {
        match self {
            Self::Basic(regex) => {
                let input = Input::new(haystack).range(pos..).anchored(Anchored::Yes);
                let mut caps = regex.create_captures();
                regex.search_captures(&input, &mut caps);
                if !caps.is_match() {
                    return Ok(None);
                }
                Ok(Some(
                    (0..caps.group_len())
                        .map(|idx| caps.get_group(idx).map(|span| span.range()))
                        .collect(),
                ))
            }
            Self::Fancy(regex) => match regex.captures_from_pos(haystack, pos) {
                Ok(Some(caps)) => match caps.get(0) {
                    Some(m) if m.start() == pos => Ok(Some(
                        (0..caps.len())
                            .map(|idx| caps.get(idx).map(|m| m.start()..m.end()))
                            .collect(),
                    )),
                    _ => Ok(None),
                },
                Ok(None) => Ok(None),
                Err(err) => Err(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_selects_engine() {
        let basic = RegexPattern::from(r"\w+").compile().unwrap();
        assert!(basic.is_basic());

        let fancy = RegexPattern::from(r"\w+(?=!)").compile().unwrap();
        assert!(fancy.is_fancy());

        assert!(RegexPattern::Basic(r"a(?=b)".to_string()).compile().is_err());
        assert!(RegexPattern::from("(").compile().is_err());
    }

    #[test]
    fn test_find_end_is_anchored() {
        for pattern in [RegexPattern::Basic("b+".into()), RegexPattern::Fancy("b+".into())] {
            let re = pattern.compile().unwrap();
            assert_eq!(re.find_end_at("abbc", 0), Ok(None));
            assert_eq!(re.find_end_at("abbc", 1), Ok(Some(3)));
            assert_eq!(re.find_end_at("abbc", 3), Ok(None));
        }
    }

    #[test]
    fn test_lookbehind_sees_prefix() {
        let re = RegexPattern::from(r"\bfoo").compile().unwrap();
        assert_eq!(re.find_end_at("afoo", 1), Ok(None));
        assert_eq!(re.find_end_at("a foo", 2), Ok(Some(5)));

        let re = RegexPattern::from(r"(?<=@)\w+").compile().unwrap();
        assert!(re.is_fancy());
        assert_eq!(re.find_end_at("@abc", 1), Ok(Some(4)));
        assert_eq!(re.find_end_at("#abc", 1), Ok(None));
    }

    #[test]
    fn test_fancy_is_pinned_to_start() {
        let re = RegexPattern::from(r"a(?=b)|c").compile().unwrap();
        assert!(re.is_fancy());
        assert_eq!(re.group_count(), 0);
        assert_eq!(re.find_end_at("xxab", 0), Ok(None));
        assert_eq!(re.find_end_at("xxab", 2), Ok(Some(3)));
        assert_eq!(re.find_end_at("xc", 0), Ok(None));
        assert_eq!(re.captures_at("xxab", 1), Ok(None));

        let long = format!("{}ab", "x".repeat(2_000));
        for pos in 0..long.len() - 2 {
            assert_eq!(re.find_end_at(&long, pos), Ok(None));
        }
    }

    #[test]
    fn test_fancy_extended_trailing_comment() {
        let re = RegexPattern::Fancy("(?x) a (?=b) # an a before b".into())
            .compile()
            .unwrap();
        assert_eq!(re.find_end_at("ab", 0), Ok(Some(1)));
        assert_eq!(re.find_end_at("xab", 0), Ok(None));

        assert!(RegexPattern::Fancy("a(?=b".into()).compile().is_err());
    }

    #[test]
    fn test_captures_at() {
        for pattern in [
            RegexPattern::Basic(r"(a)(x)?(b)".into()),
            RegexPattern::Fancy(r"(a)(x)?(b)".into()),
        ] {
            let re = pattern.compile().unwrap();
            assert_eq!(re.group_count(), 3);
            assert_eq!(
                re.captures_at("zab", 1),
                Ok(Some(vec![Some(1..3), Some(1..2), None, Some(2..3)]))
            );
            assert_eq!(re.captures_at("zab", 0), Ok(None));
        }
    }
}
