//! Rules: compiled virtual-path templates and the level walk.

use super::context::MatchContext;
use super::glob::ElementFlags;
use super::pattern::Level;
use crate::{Result, VpathError};
use std::sync::Arc;

pub(crate) const SEPARATOR: char = '/';

/// An ordered, non-empty sequence of levels compiled from one template.
#[derive(Debug, PartialEq, Eq)]
pub struct Rule {
    spec: String,
    levels: Vec<Level>,
}

impl Rule {
    /// Compile a template such as `/Artists/${artist}/${album}`.
    pub fn compile(spec: &str) -> Result<Self> {
        if spec.chars().count() < 2 {
            return Err(VpathError::InvalidRule(format!("empty rule '{spec}'")));
        }
        let Some(body) = spec.strip_prefix(SEPARATOR) else {
            return Err(VpathError::InvalidRule(format!("rule '{spec}' must start with '{SEPARATOR}'")));
        };

        let mut tokens: Vec<&str> = body.split(SEPARATOR).collect();
        if tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
        if tokens.is_empty() {
            return Err(VpathError::InvalidRule(format!("rule '{spec}' has no levels")));
        }

        let levels = tokens
            .into_iter()
            .map(Level::new)
            .collect::<Result<Vec<_>>>()
            .map_err(|err| VpathError::InvalidRule(format!("rule '{spec}': {err}")))?;

        Ok(Rule { spec: spec.to_string(), levels })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, idx: usize) -> Option<&Level> {
        self.levels.get(idx)
    }

    pub fn last_index(&self) -> usize {
        self.levels.len() - 1
    }

    /// Walk `path` (the part after the action name, e.g. `/Air/Moon Safari`)
    /// against the levels of `rule`.
    ///
    /// The walk stops when the path runs out or when its final element is a
    /// wildcard. A final wildcard element is left unbound and kept as the
    /// context's pending token so it can be completed. A final element that is
    /// neither empty nor a wildcard marks the context as settled.
    pub fn parse(rule: &Arc<Rule>, path: &str) -> MatchContext {
        let elems = split_elements(path);
        let mut ctx = MatchContext::new(Arc::clone(rule));

        for (idx, level) in rule.levels.iter().enumerate() {
            ctx.append_fields(level.vars());

            let Some(elem) = elems.get(idx).copied() else {
                // Out of input: the remaining levels still describe the field shape.
                for rest in &rule.levels[idx + 1..] {
                    ctx.append_fields(rest.vars());
                }
                log::debug!("[walk] level {idx} '{}' has no element, stopping", level.format());
                break;
            };

            ctx.set_position(idx);
            let flags = ElementFlags::scan(elem);

            if idx == elems.len() - 1 && flags.is_multimatch() {
                log::debug!("[walk] level {idx} '{}' multimatch on '{elem}'", level.format());
                ctx.set_pending(elem);
                break;
            }

            if flags.contains(ElementFlags::EMPTY) {
                log::debug!("[walk] level {idx} '{}' left unspecified", level.format());
                continue;
            }

            if idx == elems.len() - 1 {
                ctx.set_settled();
            }

            match level.match_token(elem) {
                Some(values) => {
                    log::debug!("[walk] level {idx} '{}' bound {values:?}", level.format());
                    ctx.append_values(values);
                }
                None => log::debug!("[walk] level {idx} '{}' does not match '{elem}'", level.format()),
            }
        }

        ctx
    }
}

/// Split the remainder of a virtual path into its elements.
///
/// Empty elements are kept (`/Air//x` has three) while an empty remainder has
/// none at all.
fn split_elements(path: &str) -> Vec<&str> {
    match path.strip_prefix(SEPARATOR) {
        Some(rest) => rest.split(SEPARATOR).collect(),
        None if path.is_empty() => Vec::new(),
        None => path.split(SEPARATOR).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(spec: &str) -> Arc<Rule> {
        Arc::new(Rule::compile(spec).unwrap())
    }

    #[test]
    fn compile_splits_levels_in_order() {
        let r = rule("/Artists/${artist}/${album}/${title}");
        let formats: Vec<&str> = r.levels().iter().map(Level::format).collect();
        assert_eq!(formats, ["Artists", "${artist}", "${album}", "${title}"]);
        assert_eq!(r.last_index(), 3);
    }

    #[test]
    fn compile_drops_one_trailing_slash() {
        let r = rule("/${artist}/${album}/");
        assert_eq!(r.levels().len(), 2);
    }

    #[test]
    fn compile_rejects_empty_specs() {
        assert!(matches!(Rule::compile(""), Err(VpathError::InvalidRule(_))));
        assert!(matches!(Rule::compile("/"), Err(VpathError::InvalidRule(_))));
        assert!(matches!(Rule::compile("//"), Err(VpathError::InvalidRule(_))));
        assert!(matches!(Rule::compile("/a//b"), Err(VpathError::InvalidRule(_))));
        assert!(matches!(Rule::compile("abc"), Err(VpathError::InvalidRule(_))));
    }

    #[test]
    fn split_elements_keeps_empty_pieces() {
        assert_eq!(split_elements(""), Vec::<&str>::new());
        assert_eq!(split_elements("/"), [""]);
        assert_eq!(split_elements("/Air"), ["Air"]);
        assert_eq!(split_elements("/Air/"), ["Air", ""]);
        assert_eq!(split_elements("//Pocket*"), ["", "Pocket*"]);
    }

    #[test]
    fn parse_without_elements_points_at_first_level() {
        let r = rule("/${artist}/${album}");
        let ctx = Rule::parse(&r, "");
        assert_eq!(ctx.position(), None);
        assert!(ctx.current().is_none());
        assert_eq!(ctx.next().format(), "${artist}");
        assert_eq!(ctx.all_fields(), ["artist", "album"]);
        assert!(ctx.values().is_empty());
    }

    #[test]
    fn parse_ignores_extra_elements() {
        let r = rule("/${artist}");
        let ctx = Rule::parse(&r, "/Air/Moon Safari/extra");
        assert!(ctx.is_full());
        assert_eq!(ctx.value("artist"), Some("Air"));
        assert_eq!(ctx.all_fields(), ["artist"]);
    }

    #[test]
    fn parse_tolerates_non_matching_element() {
        let r = rule("/CD ${disc}/${title}");
        let ctx = Rule::parse(&r, "/Side A/Intro");
        assert!(ctx.is_full());
        assert_eq!(ctx.value("disc"), None);
        assert_eq!(ctx.value("title"), Some("Intro"));
    }

    #[test]
    fn empty_element_binds_nothing_but_advances() {
        let r = rule("/${artist}/${album}/${title}");
        let ctx = Rule::parse(&r, "//Moon Safari");
        assert_eq!(ctx.position(), Some(1));
        assert_eq!(ctx.value("artist"), None);
        assert_eq!(ctx.value("album"), Some("Moon Safari"));
    }

    #[test]
    fn wildcard_in_middle_element_is_bound() {
        let r = rule("/${artist}/${album}");
        let ctx = Rule::parse(&r, "/Po*/");
        assert_eq!(ctx.value("artist"), Some("Po*"));
        assert_eq!(ctx.position(), Some(1));
        assert_eq!(ctx.pending(), None);
    }

    #[test]
    fn only_concrete_final_element_settles() {
        let r = rule("/${artist}/${album}");
        assert!(Rule::parse(&r, "/Air").is_settled());
        assert!(Rule::parse(&r, "/Po*/Moon Safari").is_settled());
        assert!(!Rule::parse(&r, "").is_settled());
        assert!(!Rule::parse(&r, "/Air/").is_settled());
        assert!(!Rule::parse(&r, "/Air/Moon*").is_settled());
    }

    #[test]
    fn final_wildcard_on_last_level_is_full() {
        let r = rule("/${artist}/${album}");
        let ctx = Rule::parse(&r, "/Air/M?on*");
        assert!(ctx.is_full());
        assert_eq!(ctx.pending(), Some("M?on*"));
        assert_eq!(ctx.value("album"), None);
    }
}
