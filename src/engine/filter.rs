//! Backend-facing condition trees.
//!
//! A [`Filter`] is built from the bindings of a [`MatchContext`]: one condition
//! per bound variable, chained pairwise with `And`. Values carrying a wildcard
//! become pattern conditions, everything else is an exact comparison. With no
//! bindings at all the filter is [`Filter::Universe`].
//!
//! [`MatchContext`]: super::context::MatchContext

use super::glob::{Glob, has_wildcard};
use crate::{Result, Row};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every entry.
    Universe,
    Equals {
        field: String,
        value: String,
    },
    /// Wildcard comparison; see [`Glob::like_pattern`] for the SQL form.
    Match {
        field: String,
        pattern: Glob,
    },
    And(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn condition(field: &str, value: &str) -> Result<Filter> {
        Ok(if has_wildcard(value) {
            Filter::Match { field: field.to_string(), pattern: Glob::new(value)? }
        } else {
            Filter::Equals { field: field.to_string(), value: value.to_string() }
        })
    }

    /// Fold the bindings into one filter, each new condition wrapping the
    /// conditions before it.
    pub fn from_values(values: &BTreeMap<String, String>) -> Result<Filter> {
        values.iter().try_fold(Filter::Universe, |acc, (field, value)| {
            let cond = Filter::condition(field, value)?;
            Ok(match acc {
                Filter::Universe => cond,
                acc => Filter::And(Box::new(cond), Box::new(acc)),
            })
        })
    }

    /// Leaf conditions in tree order (outermost first).
    pub fn conditions(&self) -> Vec<&Filter> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Filter>) {
        match self {
            Filter::Universe => {}
            Filter::And(lhs, rhs) => {
                lhs.collect_conditions(out);
                rhs.collect_conditions(out);
            }
            leaf => out.push(leaf),
        }
    }

    /// Evaluate the filter against one entry's fields. A missing field never
    /// satisfies a condition.
    pub fn matches(&self, fields: &Row) -> bool {
        match self {
            Filter::Universe => true,
            Filter::Equals { field, value } => fields.get(field).is_some_and(|v| v == value),
            Filter::Match { field, pattern } => fields.get(field).is_some_and(|v| pattern.is_match(v)),
            Filter::And(lhs, rhs) => lhs.matches(fields) && rhs.matches(fields),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Universe => write!(f, "*"),
            Filter::Equals { field, value } => write!(f, "{field} = {value:?}"),
            Filter::Match { field, pattern } => write!(f, "{field} LIKE {:?}", pattern.like_pattern()),
            Filter::And(lhs, rhs) => write!(f, "{lhs} AND {rhs}"),
        }
    }
}
