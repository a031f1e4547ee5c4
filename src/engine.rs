//! Virtual-path rule engine.
//!
//! A rule is a `/`-separated template, one *level* per segment, each level a
//! format string with `${name}` placeholders. Resolving a concrete path is a
//! two-phase affair:
//!
//! ```text
//! "name = /Artists/${artist}/${album}"
//!          │
//!          │  RuleRegistry::add_rule      (registry.rs)
//!          │    └─ Rule::compile          (rule.rs)
//!          │         └─ Level::new        (pattern.rs, nested optional regex)
//!          v
//!   Arc<Rule> in the registry (aliases share it)
//!
//! "//Artists/Air/Moon*"
//!          │
//!          │  RuleRegistry::match_path    (registry.rs)
//!          │    └─ Rule::parse            (rule.rs)
//!          │         - lockstep walk of levels and elements
//!          │         - ElementFlags scan  (glob.rs, multimatch stop)
//!          v
//!   MatchContext                          (context.rs)
//!     - bindings, all_fields, position, pending token
//!     - filter()  -> Result<&Filter>      (filter.rs, built once)
//!     - current()/next() -> Level format for printing
//! ```
//!
//! ## Responsibilities by module
//!
//! - `pattern.rs`: compiles one level into a matcher tree and regex; renders
//!   rows back into the level's format.
//! - `rule.rs`: compiles template specs and walks concrete paths.
//! - `context.rs`: the per-query match result and its derived queries.
//! - `filter.rs`: backend-facing condition tree.
//! - `registry.rs`: named rules, aliases, the `//action` entry point and
//!   fuzzy action completion.
//! - `glob.rs`: wildcard detection and glob matching shared by element and
//!   action completion.
//!
//! ## Debugging
//!
//! The walk logs every level it visits at `debug` level. Run the CLI with
//! `RUST_LOG=vpath=debug` to see them.

#[path = "engine/context.rs"]
mod context;
#[path = "engine/filter.rs"]
mod filter;
#[path = "engine/glob.rs"]
mod glob;
#[path = "engine/pattern.rs"]
mod pattern;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/rule.rs"]
mod rule;


pub use context::MatchContext;
pub use filter::Filter;
pub use glob::{ElementFlags, Glob, has_wildcard};
pub use pattern::Level;
pub use registry::RuleRegistry;
pub use rule::Rule;
