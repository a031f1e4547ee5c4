//! Per-query result of walking a rule against a concrete path.

use super::filter::Filter;
use super::pattern::Level;
use super::rule::Rule;
use crate::Result;
use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Bindings, field shape and stopping point of one walk.
///
/// The filter is built lazily on first use and cached, so a context is meant
/// to be owned by a single caller.
#[derive(Debug)]
pub struct MatchContext {
    rule: Arc<Rule>,
    values: BTreeMap<String, String>,
    all_fields: Vec<String>,
    /// Last level that had an element; `None` when the path stopped at the
    /// action name.
    position: Option<usize>,
    pending: Option<String>,
    /// The final element was concrete text, so its level is already chosen.
    settled: bool,
    filter: OnceCell<Filter>,
}

impl MatchContext {
    pub(crate) fn new(rule: Arc<Rule>) -> Self {
        MatchContext {
            rule,
            values: BTreeMap::new(),
            all_fields: Vec::new(),
            position: None,
            pending: None,
            settled: false,
            filter: OnceCell::new(),
        }
    }

    pub(crate) fn append_values(&mut self, values: impl IntoIterator<Item = (String, String)>) {
        self.values.extend(values);
    }

    pub(crate) fn append_fields(&mut self, fields: &[String]) {
        self.all_fields.extend_from_slice(fields);
    }

    pub(crate) fn set_position(&mut self, idx: usize) {
        self.position = Some(idx);
    }

    pub(crate) fn set_pending(&mut self, token: &str) {
        self.pending = Some(token.to_string());
    }

    pub(crate) fn set_settled(&mut self) {
        self.settled = true;
    }

    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The level the input stopped at.
    pub fn current(&self) -> Option<&Level> {
        self.position.and_then(|idx| self.rule.level(idx))
    }

    /// The level after the stopping point; the final level never advances.
    pub fn next(&self) -> &Level {
        let idx = match self.position {
            Some(idx) => (idx + 1).min(self.rule.last_index()),
            None => 0,
        };
        &self.rule.levels()[idx]
    }

    /// The level whose values a listing should show.
    pub fn target(&self) -> &Level {
        self.current().unwrap_or_else(|| self.next())
    }

    /// The level a browse listing should show.
    ///
    /// A concrete final element (`//Artists/Air`) names a value of its level,
    /// so its children are listed. An empty or wildcard final element still
    /// has to be chosen, so that level is listed instead.
    pub fn browse_level(&self) -> &Level {
        if self.settled && !self.is_full() { self.next() } else { self.target() }
    }

    /// Whether the final element was concrete text rather than empty or a
    /// wildcard.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_full(&self) -> bool {
        self.position == Some(self.rule.last_index())
    }

    /// Every variable name met during the walk, in visiting order.
    pub fn all_fields(&self) -> &[String] {
        &self.all_fields
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Wildcard token that halted the walk, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Fails only when a bound wildcard value cannot be compiled; a failed
    /// build is not cached.
    pub fn filter(&self) -> Result<&Filter> {
        self.filter.get_or_try_init(|| Filter::from_values(&self.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(spec: &str, path: &str) -> MatchContext {
        Rule::parse(&Arc::new(Rule::compile(spec).unwrap()), path)
    }

    #[test]
    fn next_never_runs_past_final_level() {
        let ctx = context("/${artist}/${album}", "/Air/Moon Safari");
        assert!(ctx.is_full());
        assert_eq!(ctx.current().map(Level::format), Some("${album}"));
        assert_eq!(ctx.next().format(), "${album}");
    }

    #[test]
    fn target_prefers_current_level() {
        let ctx = context("/${artist}/${album}", "/Air/");
        assert_eq!(ctx.target().format(), "${album}");

        let ctx = context("/${artist}/${album}", "");
        assert_eq!(ctx.target().format(), "${artist}");
    }

    #[test]
    fn browse_level_descends_past_concrete_element() {
        let ctx = context("/${artist}/${album}/${title}", "/Air");
        assert!(ctx.is_settled());
        assert_eq!(ctx.target().format(), "${artist}");
        assert_eq!(ctx.browse_level().format(), "${album}");

        let ctx = context("/${artist}/${album}/${title}", "/Air/");
        assert!(!ctx.is_settled());
        assert_eq!(ctx.browse_level().format(), "${album}");

        let ctx = context("/${artist}/${album}/${title}", "/Po*");
        assert!(!ctx.is_settled());
        assert_eq!(ctx.browse_level().format(), "${artist}");

        let ctx = context("/${artist}/${album}", "/Air/Moon Safari");
        assert!(ctx.is_full());
        assert_eq!(ctx.browse_level().format(), "${album}");
    }

    #[test]
    fn filter_is_built_once() {
        let ctx = context("/${artist}/${album}", "/Air/Moon*/");
        let first = ctx.filter().unwrap() as *const Filter;
        let second = ctx.filter().unwrap() as *const Filter;
        assert_eq!(first, second);
        assert_eq!(ctx.filter().unwrap().conditions().len(), 2);
    }

    #[test]
    fn oversized_bound_wildcard_has_no_filter() {
        let path = format!("/{}/", "a*?".repeat(40_000));
        let ctx = context("/${artist}/${album}", &path);
        assert_eq!(ctx.value("artist").map(str::len), Some(120_000));
        assert!(matches!(ctx.filter(), Err(crate::VpathError::InvalidPattern { .. })));
    }

    #[test]
    fn fields_repeat_across_levels() {
        let ctx = context("/${artist}/${artist} - ${album}", "/Air/Air - Moon Safari");
        assert_eq!(ctx.all_fields(), ["artist", "artist", "album"]);
        assert_eq!(ctx.value("artist"), Some("Air"));
        assert_eq!(ctx.value("album"), Some("Moon Safari"));
    }
}
