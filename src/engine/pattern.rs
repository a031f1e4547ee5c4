//! Level pattern compilation.
//!
//! A level format such as `${n} - ${title}` is compiled into a [`PatternNode`]
//! tree and then rendered, once, into an anchored regex. The tree is built from
//! the tail backwards so that every suffix starting at a placeholder boundary
//! becomes an optional group:
//!
//! ```text
//! "${a} - ${b} (${c})"
//!
//! (a) (?: " - " (b) (?: " (" (c) (?: ")" )? )? )?
//! ```
//!
//! That nesting lets a token that only spells out the leading placeholders
//! still match; the missing trailing captures simply do not participate.
//! Captures are lazy, so each one takes the shortest text that lets the rest
//! of the pattern match.

use crate::{Result, Row, VpathError};
use regex::{Captures, Regex};

/// One node of the compiled matcher: a literal anchor, optionally followed by
/// a capture and the (optional) remainder of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternNode {
    literal: String,
    capture: Option<Capture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Capture {
    var: String,
    rest: Option<Box<PatternNode>>,
}

impl PatternNode {
    pub(crate) fn build(template: &str) -> Self {
        let Some(caps) = placeholder_regex().captures(template) else {
            return PatternNode { literal: template.to_string(), capture: None };
        };
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let var = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let rest = &template[whole.end..];

        // The empty suffix bottoms out without an optional wrapper.
        let rest = if rest.is_empty() { None } else { Some(Box::new(PatternNode::build(rest))) };

        PatternNode { literal: template[..whole.start].to_string(), capture: Some(Capture { var, rest }) }
    }

    fn write_regex(&self, out: &mut String) {
        out.push_str(&regex::escape(&self.literal));
        if let Some(capture) = &self.capture {
            out.push_str("(.*?)");
            if let Some(rest) = &capture.rest {
                out.push_str("(?:");
                rest.write_regex(out);
                out.push_str(")?");
            }
        }
    }

    fn collect_vars(&self, vars: &mut Vec<String>) {
        if let Some(capture) = &self.capture {
            vars.push(capture.var.clone());
            if let Some(rest) = &capture.rest {
                rest.collect_vars(vars);
            }
        }
    }

    pub(crate) fn to_regex_source(&self) -> String {
        let mut out = String::from("(?s)^");
        self.write_regex(&mut out);
        out.push('$');
        out
    }
}

fn placeholder_regex() -> &'static Regex {
    regex!(r"\$\{(.*?)\}")
}

/// One compiled `/`-separated segment of a rule template.
#[derive(Debug, Clone)]
pub struct Level {
    format: String,
    vars: Vec<String>,
    regex: Regex,
}

impl Level {
    pub fn new(format: &str) -> Result<Self> {
        if format.is_empty() {
            return Err(VpathError::InvalidRule("empty level format".to_string()));
        }

        let tree = PatternNode::build(format);
        let mut vars = Vec::new();
        tree.collect_vars(&mut vars);

        let source = tree.to_regex_source();
        let regex = Regex::new(&source)
            .map_err(|err| VpathError::InvalidRule(format!("level '{format}' does not compile: {err}")))?;

        Ok(Level { format: format.to_string(), vars, regex })
    }

    /// The literal template text of this level.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Placeholder names, left to right.
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    pub fn is_literal(&self) -> bool {
        self.vars.is_empty()
    }

    /// Match `token` against the level.
    ///
    /// Returns `None` when the token does not fit the level at all. On success
    /// only the placeholders whose capture participated are returned, in
    /// template order.
    pub fn match_token(&self, token: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(token)?;
        Some(self.bound_values(&caps))
    }

    fn bound_values(&self, caps: &Captures<'_>) -> Vec<(String, String)> {
        self.vars
            .iter()
            .enumerate()
            .filter_map(|(idx, var)| caps.get(idx + 1).map(|m| (var.clone(), m.as_str().to_string())))
            .collect()
    }

    /// Substitute each `${name}` with its value from `row`; unknown names
    /// render as the empty string.
    pub fn render(&self, row: &Row) -> String {
        placeholder_regex()
            .replace_all(&self.format, |caps: &Captures<'_>| {
                caps.get(1).and_then(|m| row.get(m.as_str())).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
    }
}

impl Eq for Level {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(level: &Level, token: &str) -> Option<Vec<(String, String)>> {
        level.match_token(token)
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn builds_nested_optional_regex() {
        assert_eq!(PatternNode::build("Artists").to_regex_source(), "(?s)^Artists$");
        assert_eq!(PatternNode::build("${a}").to_regex_source(), "(?s)^(.*?)$");
        assert_eq!(PatternNode::build("${a}${b}${c}").to_regex_source(), "(?s)^(.*?)(?:(.*?)(?:(.*?))?)?$");
        assert_eq!(PatternNode::build("${n} - ${title}").to_regex_source(), "(?s)^(.*?)(?: \\- (.*?))?$");
        assert_eq!(PatternNode::build("#${n}.").to_regex_source(), "(?s)^\\#(.*?)(?:\\.)?$");
    }

    #[test]
    fn extracts_vars_in_order() {
        let level = Level::new("${tracknr} - ${artist} - ${title}").unwrap();
        assert_eq!(level.vars(), ["tracknr", "artist", "title"]);
        assert!(!level.is_literal());
        assert!(Level::new("Artists").unwrap().is_literal());
    }

    #[test]
    fn empty_level_is_invalid() {
        assert!(matches!(Level::new(""), Err(VpathError::InvalidRule(_))));
    }

    #[test]
    fn literal_level_matches_exactly() {
        let level = Level::new("Artists").unwrap();
        assert_eq!(values(&level, "Artists"), Some(vec![]));
        assert_eq!(values(&level, "artists"), None);
        assert_eq!(values(&level, "Artists2"), None);
        assert_eq!(values(&level, "Artist"), None);
    }

    #[test]
    fn single_placeholder_takes_whole_token() {
        let level = Level::new("${artist}").unwrap();
        assert_eq!(values(&level, "Moon Safari"), Some(vec![pair("artist", "Moon Safari")]));
        assert_eq!(values(&level, "a/b"), Some(vec![pair("artist", "a/b")]));
    }

    #[test]
    fn full_token_binds_every_placeholder() {
        let level = Level::new("${n} - ${title}").unwrap();
        assert_eq!(values(&level, "01 - La Femme d'Argent"), Some(vec![pair("n", "01"), pair("title", "La Femme d'Argent")]));
    }

    #[test]
    fn partial_token_binds_leading_placeholders() {
        let level = Level::new("${n} - ${title}").unwrap();
        assert_eq!(values(&level, "01"), Some(vec![pair("n", "01")]));

        let level = Level::new("${album} (${year})").unwrap();
        assert_eq!(values(&level, "Moon Safari"), Some(vec![pair("album", "Moon Safari")]));
        assert_eq!(values(&level, "Moon Safari (1998)"), Some(vec![pair("album", "Moon Safari"), pair("year", "1998")]));
    }

    #[test]
    fn captures_are_lazy() {
        let level = Level::new("${a}-${b}").unwrap();
        assert_eq!(values(&level, "x-y-z"), Some(vec![pair("a", "x"), pair("b", "y-z")]));
    }

    #[test]
    fn leading_literal_is_mandatory() {
        let level = Level::new("CD ${disc}").unwrap();
        assert_eq!(values(&level, "CD 2"), Some(vec![pair("disc", "2")]));
        assert_eq!(values(&level, "2"), None);
    }

    #[test]
    fn render_substitutes_row_values() {
        let level = Level::new("${n} - ${title}").unwrap();
        let mut row = Row::new();
        row.insert("n".to_string(), "01".to_string());
        row.insert("title".to_string(), "La Femme d'Argent".to_string());
        assert_eq!(level.render(&row), "01 - La Femme d'Argent");

        row.remove("n");
        assert_eq!(level.render(&row), " - La Femme d'Argent");
    }
}
