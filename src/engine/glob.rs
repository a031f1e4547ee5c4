//! Wildcard scanning and glob matching.
//!
//! Path elements and action names share one wildcard dialect:
//!
//! - `*` matches any run of characters (including none)
//! - `?` matches exactly one character
//!
//! Everything else is literal. [`ElementFlags::scan`] is the cheap check the
//! rule walk runs on every element; [`Glob`] is the compiled form used when a
//! wildcard token actually has to be matched against candidates.

use crate::{Result, VpathError};
use regex::Regex;

bitflags::bitflags! {
    /// Coarse features of one path element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        const EMPTY    = 1 << 0;
        const STAR     = 1 << 1;
        const QUESTION = 1 << 2;
    }
}

impl ElementFlags {
    pub const WILDCARD: ElementFlags = ElementFlags::STAR.union(ElementFlags::QUESTION);

    pub fn scan(element: &str) -> Self {
        let mut flags = ElementFlags::empty();
        if element.is_empty() {
            flags |= ElementFlags::EMPTY;
        }
        for b in element.bytes() {
            match b {
                b'*' => flags |= ElementFlags::STAR,
                b'?' => flags |= ElementFlags::QUESTION,
                _ => {}
            }
        }
        flags
    }

    /// True when the element asks for many matches instead of one.
    pub fn is_multimatch(self) -> bool {
        self.intersects(ElementFlags::WILDCARD)
    }
}

/// Shorthand for `ElementFlags::scan(s).is_multimatch()`.
pub fn has_wildcard(s: &str) -> bool {
    ElementFlags::scan(s).is_multimatch()
}

/// A compiled wildcard pattern that must match the whole candidate.
#[derive(Debug, Clone)]
pub struct Glob {
    source: String,
    regex: Regex,
}

impl Glob {
    /// Compile `pattern`. Literal text is escaped, so the only failure is a
    /// pattern too large for the regex engine.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&to_regex_source(pattern))
            .map_err(|err| VpathError::InvalidPattern { pattern: pattern.to_string(), reason: err.to_string() })?;
        Ok(Glob { source: pattern.to_string(), regex })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the pattern in SQL `LIKE` syntax (`*` → `%`, `?` → `_`).
    pub fn like_pattern(&self) -> String {
        self.source.replace('*', "%").replace('?', "_")
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

fn to_regex_source(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}
