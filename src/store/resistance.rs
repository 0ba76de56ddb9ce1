use crate::error::StoreError;
use crate::store::ResistanceLine;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_STORE_FILE: &str = "resistance_lines.json";

/// Result of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The symbol had no lines; nothing was touched on disk.
    SymbolNotFound,
    /// Number of lines dropped. Zero still rewrites the file.
    Removed(usize),
}

/// Symbol -> resistance lines, backed by a JSON file that is rewritten in full
/// after every mutation.
///
/// There is no locking: two processes sharing a file race and the last writer
/// wins.
#[derive(Debug, Clone)]
pub struct ResistanceStore {
    path: PathBuf,
    lines: BTreeMap<String, Vec<ResistanceLine>>,
}

impl ResistanceStore {
    /// Reads the store at `path`. A missing file yields an empty store. A file
    /// that cannot be read or is not a symbol -> lines mapping is reported and
    /// also yields an empty store; it stays on disk until the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lines = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, Vec<ResistanceLine>>>(&contents) {
                Ok(mut lines) => {
                    lines.retain(|_, entries| !entries.is_empty());
                    debug!(path = %path.display(), symbols = lines.len(), "resistance store loaded");
                    lines
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "resistance store is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no resistance store yet");
                BTreeMap::new()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "resistance store is unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self { path, lines }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines for `symbol` in insertion order.
    pub fn query(&self, symbol: &str) -> &[ResistanceLine] {
        self.lines.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Prices only, in insertion order, for the chart overlay.
    pub fn levels(&self, symbol: &str) -> Vec<f64> {
        self.query(symbol).iter().map(|line| line.price).collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Appends a line and persists. Nothing is mutated if the input is rejected.
    pub fn add(
        &mut self,
        symbol: &str,
        price: f64,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Result<ResistanceLine, StoreError> {
        if !price.is_finite() {
            return Err(StoreError::InvalidInput(format!("price {price} is not a finite number")));
        }
        if start_date > end_date {
            return Err(StoreError::InvalidInput(format!(
                "start date {} is after end date {}",
                start_date.format("%Y-%m-%d"),
                end_date.format("%Y-%m-%d")
            )));
        }

        let line = ResistanceLine::new(price, start_date, end_date);
        self.lines
            .entry(symbol.to_string())
            .or_default()
            .push(line.clone());
        self.persist()?;

        info!(symbol, price, "resistance line added");
        Ok(line)
    }

    /// Drops every line for `symbol` whose price is exactly `price`.
    pub fn remove(&mut self, symbol: &str, price: f64) -> Result<RemoveOutcome, StoreError> {
        let Some(entries) = self.lines.get_mut(symbol) else {
            return Ok(RemoveOutcome::SymbolNotFound);
        };

        let before = entries.len();
        entries.retain(|line| line.price != price);
        let removed = before - entries.len();
        if entries.is_empty() {
            self.lines.remove(symbol);
        }
        self.persist()?;

        info!(symbol, price, removed, "resistance lines removed");
        Ok(RemoveOutcome::Removed(removed))
    }

    /// Rewrites the whole file through a sibling temp file and a rename.
    pub fn persist(&self) -> Result<(), StoreError> {
        let mut payload = serde_json::to_string_pretty(&self.lines)?;
        payload.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = tmp_path(&self.path);
        std::fs::write(&tmp_path, payload)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), symbols = self.lines.len(), "resistance store saved");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
