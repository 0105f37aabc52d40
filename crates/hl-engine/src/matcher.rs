//! Literal substring matching for one term.
//!
//! Term text is always treated as a literal string: every regex
//! metacharacter is escaped before the matcher is compiled, so no user
//! input can fail matcher construction. Case-insensitive terms compile
//! with the regex engine's case folding rather than lowercasing content,
//! which keeps byte offsets into the original text valid.

use regex::{Regex, RegexBuilder};

/// A compiled matcher for one active term.
#[derive(Debug)]
pub struct Matcher {
    /// The escaped-literal pattern.
    regex: Regex,
}

impl Matcher {
    /// Builds a matcher for a literal term.
    ///
    /// Returns `None` for empty text: an empty term is inactive and must
    /// never be scanned.
    pub fn new(text: &str, case_sensitive: bool) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        // Escaped literals always compile; a failure here degrades to
        // "no matcher", the same as an inactive term.
        let regex = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(!case_sensitive)
            .build()
            .ok()?;
        Some(Self { regex })
    }

    /// Returns true if the content contains at least one occurrence.
    pub fn is_match(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Splits content into an alternating sequence of literal and matched
    /// segments.
    ///
    /// Matches are found greedily left-to-right and never overlap: a
    /// matched span is not re-entered by a later match attempt. Empty
    /// literal runs between adjacent matches are omitted, and the
    /// concatenation of all segment text equals the input exactly.
    pub fn segments<'a>(&self, content: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for found in self.regex.find_iter(content) {
            if found.start() > cursor {
                segments.push(Segment {
                    text: &content[cursor..found.start()],
                    is_match: false,
                });
            }
            segments.push(Segment {
                text: found.as_str(),
                is_match: true,
            });
            cursor = found.end();
        }
        if cursor < content.len() {
            segments.push(Segment {
                text: &content[cursor..],
                is_match: false,
            });
        }
        segments
    }
}

/// One run of leaf content, either matched or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The segment's text, borrowed from the scanned content.
    pub text: &'a str,
    /// True when this run is an occurrence of the term.
    pub is_match: bool,
}
