//! Virtual paths over a media collection.
//!
//! Rules such as `Artists = /${artist}/${album}/${title}` turn a typed path
//! like `//Artists/Air/Moon Safari` into a [`MatchContext`]: the values bound
//! so far, the field shape of the rule, the level to list or complete next and
//! a [`Filter`] for the media backend.
//!
//! ```
//! use vpath::RuleRegistry;
//!
//! let mut rules = RuleRegistry::new();
//! rules.add_rule("Artists", "/${artist}/${album}/${title}").unwrap();
//!
//! let ctx = rules.match_path("//Artists/Air").unwrap();
//! assert_eq!(ctx.value("artist"), Some("Air"));
//! assert_eq!(ctx.next().format(), "${album}");
//! assert!(!ctx.is_full());
//! ```

extern crate self as vpath;

#[macro_use]
mod macros;
mod api;
pub mod backend;
mod engine;
mod error;
pub mod loader;

use std::collections::BTreeMap;

pub use api::{Browser, Completion, DEFAULT_RULES_PATH, Options, complete};
pub use backend::{Backend, Entry, MemoryBackend};
pub use engine::{ElementFlags, Filter, Glob, Level, MatchContext, Rule, RuleRegistry, has_wildcard};
pub use error::{Result, VpathError};
pub use loader::{LoadReport, load_rules, load_rules_file};

/// Field name → value, as exchanged with a [`Backend`].
pub type Row = BTreeMap<String, String>;
