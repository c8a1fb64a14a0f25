//! # Position-Anchored Matcher
//!
//! [`RegExpMatcher`] is the only way rules touch regular expressions.
//! It never scans forward: every call asks "does the pattern match starting
//! exactly here?".

use core::ops::Range;
use std::borrow::Cow;

use crate::{
    errors::{GResult, GrammarError},
    regex::{
        ErrorWrapper,
        RegexPattern,
        RegexWrapperHandle,
        backrefs::{has_backrefs, substitute_backrefs},
    },
};

/// Translate a flags string into an inline-flag prefix.
///
/// `i`, `m`, `s`, `x` map to inline flags; `g`, `y`, `u` and `d` are
/// meaningless for anchored matching and are dropped.
fn inline_flags(flags: &str) -> String {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'g' | 'y' | 'u' | 'd' => {}
            other => log::warn!("ignoring unknown regex flag {other:?}"),
        }
    }
    if inline.is_empty() {
        inline
    } else {
        format!("(?{inline})")
    }
}

/// A successful anchored match.
///
/// Group spans are absolute byte ranges into the matched text. Groups which
/// did not participate are empty spans located at the end of the previous group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExpMatch {
    spans: Vec<Range<usize>>,
}

impl RegExpMatch {
    /// The span of the whole match.
    pub fn range(&self) -> Range<usize> {
        self.spans[0].clone()
    }

    /// The length of the whole match in bytes.
    pub fn len(&self) -> usize {
        self.spans[0].len()
    }

    /// Is this a zero-width match?
    pub fn is_empty(&self) -> bool {
        self.spans[0].is_empty()
    }

    /// The number of explicit capture groups.
    pub fn group_count(&self) -> usize {
        self.spans.len() - 1
    }

    /// The span of group `idx`; `0` is the whole match.
    pub fn group(
        &self,
        idx: usize,
    ) -> Option<Range<usize>> {
        self.spans.get(idx).cloned()
    }

    /// `[total, group1, group2, ...]` texts.
    pub fn texts<'t>(
        &self,
        text: &'t str,
    ) -> Vec<&'t str> {
        self.spans.iter().map(|span| &text[span.clone()]).collect()
    }

    /// `[total, group1, group2, ...]` owned texts.
    pub fn to_strings(
        &self,
        text: &str,
    ) -> Vec<String> {
        self.texts(text).into_iter().map(String::from).collect()
    }
}

/// A regular expression matcher anchored at caller-supplied positions.
///
/// A matcher whose pattern failed to compile is *disabled*: rules treat it as
/// never matching, but direct [`RegExpMatcher::test`] / [`RegExpMatcher::match_at`]
/// calls return [`GrammarError::DisabledMatcher`].
///
/// A matcher whose source contains `\1` .. `\9` is *deferred*: it has no
/// compiled form until [`RegExpMatcher::with_backrefs`] supplies the texts.
#[derive(Debug, Clone)]
pub struct RegExpMatcher {
    source: String,
    flags: String,
    regex: Option<RegexWrapperHandle>,
    group_count: usize,
    backrefs: bool,
}

impl PartialEq for RegExpMatcher {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl RegExpMatcher {
    /// Build a matcher, disabling it if the pattern does not compile.
    ///
    /// ## Arguments
    /// * `source` - the pattern source.
    /// * `flags` - flag characters, e.g. `"i"`.
    pub fn new(
        source: &str,
        flags: &str,
    ) -> Self {
        let (matcher, err) = Self::compile(source, flags);
        if let Some(err) = err {
            log::warn!("disabling pattern /{source}/: {err}");
        }
        matcher
    }

    /// Build a matcher, failing with [`GrammarError::InvalidPattern`] if the
    /// pattern does not compile.
    pub fn strict(
        source: &str,
        flags: &str,
    ) -> GResult<Self> {
        match Self::compile(source, flags) {
            (_, Some(err)) => Err(GrammarError::InvalidPattern {
                pattern: source.to_string(),
                source: err,
            }),
            (matcher, None) => Ok(matcher),
        }
    }

    /// Build a matcher, strictly or leniently.
    pub fn build(
        source: &str,
        flags: &str,
        strict: bool,
    ) -> GResult<Self> {
        if strict {
            Self::strict(source, flags)
        } else {
            Ok(Self::new(source, flags))
        }
    }

    fn compile(
        source: &str,
        flags: &str,
    ) -> (Self, Option<ErrorWrapper>) {
        let mut matcher = Self {
            source: source.to_string(),
            flags: flags.to_string(),
            regex: None,
            group_count: 0,
            backrefs: has_backrefs(source),
        };
        if matcher.backrefs {
            return (matcher, None);
        }

        let pattern = RegexPattern::from(format!("{}{}", inline_flags(flags), source));
        match pattern.compile() {
            Ok(regex) => {
                matcher.group_count = regex.group_count();
                matcher.regex = Some(regex.into());
                (matcher, None)
            }
            Err(err) => (matcher, Some(err)),
        }
    }

    /// The pattern source, as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flags string, as written.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Is there a compiled regex behind this matcher?
    pub fn is_enabled(&self) -> bool {
        self.regex.is_some()
    }

    /// Does the source refer to begin captures with `\1` .. `\9`?
    pub fn has_backrefs(&self) -> bool {
        self.backrefs
    }

    /// The number of explicit capture groups (0 when disabled).
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Resolve `\N` references against previously captured texts.
    ///
    /// ## Arguments
    /// * `captures` - `[total, group1, ...]` texts of the begin match.
    ///
    /// ## Returns
    /// `self` unchanged when the source has no references; otherwise a
    /// freshly compiled matcher over the rewritten source.
    pub fn with_backrefs<S: AsRef<str>>(
        &self,
        captures: &[S],
    ) -> Cow<'_, Self> {
        if !self.backrefs {
            return Cow::Borrowed(self);
        }
        let resolved = substitute_backrefs(&self.source, captures);
        Cow::Owned(Self::new(&resolved, &self.flags))
    }

    fn regex(&self) -> GResult<&RegexWrapperHandle> {
        self.regex
            .as_ref()
            .ok_or_else(|| GrammarError::DisabledMatcher {
                pattern: self.source.clone(),
            })
    }

    fn runtime_error(
        &self,
        message: String,
    ) -> GrammarError {
        GrammarError::RegexRuntime {
            pattern: self.source.clone(),
            message,
        }
    }

    /// Does the pattern match starting exactly at `pos`?
    pub fn test(
        &self,
        text: &str,
        pos: usize,
    ) -> GResult<bool> {
        Ok(self
            .regex()?
            .find_end_at(text, pos)
            .map_err(|msg| self.runtime_error(msg))?
            .is_some())
    }

    /// Match starting exactly at `pos`.
    ///
    /// ## Returns
    /// The match spans, or `None` if the pattern does not match at `pos`.
    ///
    /// ## Errors
    /// * [`GrammarError::DisabledMatcher`] if the pattern did not compile.
    /// * [`GrammarError::MalformedCaptureGroups`] if the capture groups do not
    ///   concatenate to the full match.
    pub fn match_at(
        &self,
        text: &str,
        pos: usize,
    ) -> GResult<Option<RegExpMatch>> {
        let regex = self.regex()?;

        if self.group_count == 0 {
            return Ok(regex
                .find_end_at(text, pos)
                .map_err(|msg| self.runtime_error(msg))?
                .map(|end| RegExpMatch {
                    spans: vec![pos..end],
                }));
        }

        let Some(groups) = regex
            .captures_at(text, pos)
            .map_err(|msg| self.runtime_error(msg))?
        else {
            return Ok(None);
        };

        let mut spans = Vec::with_capacity(groups.len());
        let mut cursor = pos;
        for group in groups {
            let span = group.unwrap_or(cursor..cursor);
            if !spans.is_empty() {
                cursor = span.end;
            }
            spans.push(span);
        }

        let found = RegExpMatch { spans };
        let texts = found.texts(text);
        let captured: String = texts[1..].concat();
        if captured != texts[0] {
            return Err(GrammarError::MalformedCaptureGroups {
                pattern: self.source.clone(),
                matched: texts[0].to_string(),
                captured,
            });
        }
        Ok(Some(found))
    }

    /// Match starting at `pos`, treating a disabled matcher as never matching.
    pub(crate) fn match_enabled(
        &self,
        text: &str,
        pos: usize,
    ) -> GResult<Option<RegExpMatch>> {
        if self.is_enabled() {
            self.match_at(text, pos)
        } else {
            Ok(None)
        }
    }
}
