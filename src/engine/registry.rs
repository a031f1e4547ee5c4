//! Named rules and the `//action/...` entry point.

use super::context::MatchContext;
use super::glob::Glob;
use super::rule::{Rule, SEPARATOR};
use crate::{Result, VpathError};
use std::collections::HashMap;
use std::sync::Arc;

const VIRTUAL_PREFIX: &str = "//";

/// Name → rule table.
///
/// Aliases share the target's `Arc<Rule>`; nothing is ever copied. The table
/// is written while rules load and only read afterwards, so a loaded registry
/// can be shared across threads.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `name`.
    ///
    /// A spec starting with `/` is compiled as a template; anything else is
    /// the name of an already registered rule to alias. On error the registry
    /// is left untouched.
    pub fn add_rule(&mut self, name: &str, spec: &str) -> Result<&mut Self> {
        if self.rules.contains_key(name) {
            return Err(VpathError::DuplicateRule(name.to_string()));
        }

        let rule = if spec.starts_with(SEPARATOR) {
            log::debug!("[registry] compiling rule '{name}' = {spec}");
            Arc::new(Rule::compile(spec)?)
        } else {
            let target = self
                .rules
                .get(spec)
                .ok_or_else(|| VpathError::BadRefRule { name: name.to_string(), target: spec.to_string() })?;
            log::debug!("[registry] aliasing '{name}' to '{spec}'");
            Arc::clone(target)
        };

        self.rules.insert(name.to_string(), rule);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Rule>> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a `//action/elem/...` path against the rule named `action`.
    pub fn match_path(&self, path: &str) -> Result<MatchContext> {
        let rest = strip_virtual_prefix(path)?;
        let (action, remainder) = match rest.find(SEPARATOR) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        let rule = self.rules.get(action).ok_or_else(|| VpathError::InvalidAction(action.to_string()))?;
        log::debug!("[registry] '{path}' -> action '{action}', remainder '{remainder}'");

        Ok(Rule::parse(rule, remainder))
    }

    /// Registered names matching the glob `partial` (after its `//` prefix).
    pub fn fuzzy_complete_actions(&self, partial: &str) -> Result<Vec<String>> {
        let glob = Glob::new(strip_virtual_prefix(partial)?)?;
        let mut names: Vec<String> = self.rules.keys().filter(|name| glob.is_match(name)).cloned().collect();
        names.sort_unstable();
        Ok(names)
    }
}

fn strip_virtual_prefix(path: &str) -> Result<&str> {
    path.strip_prefix(VIRTUAL_PREFIX).ok_or_else(|| VpathError::NotVirtualPath(path.to_string()))
}
