//! Media query backends.
//!
//! The engine never talks to a media index itself: it shapes a [`Filter`] and
//! the ordered field list, and a [`Backend`] answers the query. The crate ships
//! [`MemoryBackend`], a small in-process index loaded from a tab-separated
//! library file.

use crate::{Filter, Result, Row, VpathError};
use std::collections::HashSet;
use std::path::Path;

pub trait Backend {
    /// Rows of `fetch` fields for entries accepted by `filter`, one row per
    /// distinct combination of `group` fields.
    fn query_info(&self, filter: &Filter, fetch: &[String], group: &[String]) -> Result<Vec<Row>>;

    /// Identifiers of every entry accepted by `filter`.
    fn query_ids(&self, filter: &Filter) -> Result<Vec<u32>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: u32,
    pub fields: Row,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Vec<Entry>,
}

impl MemoryBackend {
    pub fn new(entries: Vec<Entry>) -> Self {
        MemoryBackend { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Parse a library: a header line of field names followed by one
    /// tab-separated row per entry. Entry ids count data rows from 1.
    pub fn from_tsv(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let Some((_, header)) = lines.next() else {
            return Ok(Self::default());
        };
        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

        let mut entries = Vec::new();
        for (idx, line) in lines {
            let cells: Vec<&str> = line.split('\t').collect();
            if cells.len() != columns.len() {
                return Err(VpathError::Library {
                    line: idx + 1,
                    reason: format!("expected {} columns, found {}", columns.len(), cells.len()),
                });
            }
            let fields = columns.iter().zip(cells).map(|(col, cell)| (col.to_string(), cell.to_string())).collect();
            let id = next_id(entries.len(), idx + 1)?;
            entries.push(Entry { id, fields });
        }

        log::debug!("[library] {} entries, columns {:?}", entries.len(), columns);
        Ok(Self::new(entries))
    }

    pub fn from_tsv_file(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|source| VpathError::Io { path: path.to_path_buf(), source })?;
        Self::from_tsv(&text)
    }
}

impl Backend for MemoryBackend {
    fn query_info(&self, filter: &Filter, fetch: &[String], group: &[String]) -> Result<Vec<Row>> {
        let mut seen: HashSet<Vec<Option<&str>>> = HashSet::new();
        let mut rows = Vec::new();

        for entry in self.entries.iter().filter(|e| filter.matches(&e.fields)) {
            let key: Vec<Option<&str>> = group.iter().map(|g| entry.fields.get(g).map(String::as_str)).collect();
            if !seen.insert(key) {
                continue;
            }
            let row: Row =
                fetch.iter().filter_map(|f| entry.fields.get(f).map(|v| (f.clone(), v.clone()))).collect();
            rows.push(row);
        }

        Ok(rows)
    }

    fn query_ids(&self, filter: &Filter) -> Result<Vec<u32>> {
        Ok(self.entries.iter().filter(|e| filter.matches(&e.fields)).map(|e| e.id).collect())
    }
}

/// Id for the entry after `count` loaded ones.
fn next_id(count: usize, line: usize) -> Result<u32> {
    count
        .checked_add(1)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| VpathError::Library { line, reason: format!("more than {} entries", u32::MAX) })
}
