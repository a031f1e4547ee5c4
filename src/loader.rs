//! Rule file loading.
//!
//! A rule file holds one `name = spec` pair per line:
//!
//! ```text
//! # browse by artist
//! Artists = /${artist}/${album}/${tracknr} - ${title}
//! Albums  = /${album}/${tracknr} - ${title}
//! ar = Artists
//! ```
//!
//! Lines that do not look like `key = value` are ignored. Rules that fail to
//! register are logged and skipped so one bad line never stops the rest.

use crate::engine::RuleRegistry;
use crate::{Result, VpathError};
use std::path::Path;

/// Outcome of loading a rule file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Skipped rules with the 1-based line they came from.
    pub skipped: Vec<(usize, VpathError)>,
}

pub fn load_rules(text: &str, registry: &mut RuleRegistry) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(caps) = regex!(r"^(.*?) = (.*)$").captures(line) else {
            log::debug!("[loader] line {} ignored: {line:?}", idx + 1);
            continue;
        };
        let name = caps[1].trim();
        let spec = caps[2].trim();

        match registry.add_rule(name, spec) {
            Ok(_) => report.loaded += 1,
            Err(err) => {
                log::warn!("line {}: {err}", idx + 1);
                report.skipped.push((idx + 1, err));
            }
        }
    }

    log::debug!("[loader] {} rules loaded, {} skipped", report.loaded, report.skipped.len());
    report
}

pub fn load_rules_file(path: &Path, registry: &mut RuleRegistry) -> Result<LoadReport> {
    let text =
        std::fs::read_to_string(path).map_err(|source| VpathError::Io { path: path.to_path_buf(), source })?;
    Ok(load_rules(&text, registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "\
# comment
Artists = /${artist}/${album}/${title}

Albums = /${album}/${tracknr} - ${title}
not a rule line
ar = Artists
Artists = /${genre}
bad = Missing
empty = /
";

    #[test]
    fn loads_valid_rules_and_skips_bad_ones() {
        let mut reg = RuleRegistry::new();
        let report = load_rules(RULES, &mut reg);

        assert_eq!(report.loaded, 3);
        assert_eq!(reg.names(), ["Albums", "Artists", "ar"]);

        let lines: Vec<usize> = report.skipped.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, [7, 8, 9]);
        assert!(matches!(report.skipped[0].1, VpathError::DuplicateRule(_)));
        assert!(matches!(report.skipped[1].1, VpathError::BadRefRule { .. }));
        assert!(matches!(report.skipped[2].1, VpathError::InvalidRule(_)));
        assert!(report.skipped.iter().all(|(_, err)| err.is_recoverable()));
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut reg = RuleRegistry::new();
        let err = load_rules_file(Path::new("/nonexistent/vpaths.conf"), &mut reg).unwrap_err();
        assert!(matches!(err, VpathError::Io { .. }));
        assert!(!err.is_recoverable());
    }
}
