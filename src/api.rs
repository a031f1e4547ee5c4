use crate::backend::Backend;
use crate::engine::{Glob, Level, MatchContext, RuleRegistry, has_wildcard};
use crate::{Result, VpathError};
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_RULES_PATH: &str = "vpaths.conf";

/// Runtime configuration.
///
/// Defaults can be overridden with `VPATH_RULES` and `VPATH_LIBRARY`; the CLI
/// flags override both.
#[derive(Debug, Clone)]
pub struct Options {
    /// Rule file to load.
    pub rules_path: PathBuf,
    /// Tab-separated library for the in-memory backend.
    pub library_path: Option<PathBuf>,
    /// Complete the path instead of listing it.
    pub complete: bool,
    pub color: bool,
    /// Print the match context report.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            library_path: None,
            complete: false,
            color: false,
            verbose: false,
        }
    }
}

impl Options {
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(path) = std::env::var_os("VPATH_RULES") {
            opts.rules_path = PathBuf::from(path);
        }
        if let Some(path) = std::env::var_os("VPATH_LIBRARY") {
            opts.library_path = Some(PathBuf::from(path));
        }
        opts
    }
}

/// What a completion request resolved to.
#[derive(Debug)]
pub enum Completion {
    /// The action itself is unknown; these registered names fit the partial.
    Actions(Vec<String>),
    Context(MatchContext),
}

/// Resolve `path` for completion, falling back to action-name suggestions
/// when the action is not registered.
pub fn complete(registry: &RuleRegistry, path: &str) -> Result<Completion> {
    match registry.match_path(path) {
        Ok(ctx) => Ok(Completion::Context(ctx)),
        Err(VpathError::InvalidAction(action)) => {
            log::debug!("[complete] unknown action '{action}', suggesting names");
            let partial = if has_wildcard(&action) { format!("//{action}") } else { format!("//{action}*") };
            Ok(Completion::Actions(registry.fuzzy_complete_actions(&partial)?))
        }
        Err(err) => Err(err),
    }
}

/// Lists the values of the level a context points at.
pub struct Browser<B> {
    backend: B,
}

impl<B: Backend> Browser<B> {
    pub fn new(backend: B) -> Self {
        Browser { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Render every distinct value of `ctx.browse_level()` allowed by the
    /// context's filter: `//Artists/Air` lists the albums of Air.
    pub fn list(&self, ctx: &MatchContext) -> Result<Vec<String>> {
        self.render_level(ctx, ctx.browse_level())
    }

    /// Completion candidates for the element being typed: the values of
    /// `ctx.target()`, so `//Artists/Ai` offers artists. A pending wildcard
    /// token narrows both listings further.
    pub fn candidates(&self, ctx: &MatchContext) -> Result<Vec<String>> {
        self.render_level(ctx, ctx.target())
    }

    fn render_level(&self, ctx: &MatchContext, level: &Level) -> Result<Vec<String>> {
        let rows = self.backend.query_info(ctx.filter()?, level.vars(), ctx.all_fields())?;
        let pending = ctx.pending().map(Glob::new).transpose()?;

        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for row in &rows {
            let line = level.render(row);
            if pending.as_ref().is_some_and(|glob| !glob.is_match(&line)) {
                continue;
            }
            if seen.insert(line.clone()) {
                lines.push(line);
            }
        }

        log::debug!("[browse] {} rows, {} lines for level '{}'", rows.len(), lines.len(), level.format());
        Ok(lines)
    }

    /// Entry ids matching the context's filter.
    pub fn entries(&self, ctx: &MatchContext) -> Result<Vec<u32>> {
        self.backend.query_ids(ctx.filter()?)
    }
}
