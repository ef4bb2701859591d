use crate::error::{PadopError, Result};
use crate::paths;
use crate::relations::DbCredentials;
use crate::types::{Event, Flag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,
    pub event: Event,
    pub timestamp: DateTime<Utc>,
    pub outcome: String,
}

// ---------------------------------------------------------------------------
// FactSet
// ---------------------------------------------------------------------------

/// Everything this unit has learned and done, persisted across events.
///
/// Flags are monotonic: once true they model an irreversible real-world
/// action or an observed condition, and normal operation never clears
/// them. The cached credential tuple is owned here from capture until the
/// settings file consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactSet {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub flags: BTreeSet<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<DbCredentials>,
    /// Port currently opened for the website relation, recorded so a
    /// config change can close the old one exactly once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_port: Option<u16>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub last_updated: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl Default for FactSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FactSet {
    pub fn new() -> Self {
        Self {
            version: 1,
            flags: BTreeSet::new(),
            db: None,
            open_port: None,
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::facts_path(root);
        if !path.exists() {
            return Err(PadopError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let facts: FactSet = serde_yaml::from_str(&data)?;
        Ok(facts)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::facts_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn is_set(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    /// Mark a flag true. Returns whether it was newly set.
    pub fn set(&mut self, flag: Flag) -> bool {
        let newly = self.flags.insert(flag);
        if newly {
            self.last_updated = Utc::now();
        }
        newly
    }

    pub fn store_db_credentials(&mut self, creds: DbCredentials) {
        self.db = Some(creds);
        self.last_updated = Utc::now();
    }

    pub fn record_port(&mut self, port: u16) {
        self.open_port = Some(port);
        self.last_updated = Utc::now();
    }

    pub fn record_action(&mut self, action: &str, event: Event, outcome: &str) {
        self.history.push(HistoryEntry {
            action: action.to_string(),
            event,
            timestamp: Utc::now(),
            outcome: outcome.to_string(),
        });
        // Trim history to last 200 entries
        if self.history.len() > 200 {
            self.history.drain(..self.history.len() - 200);
        }
        self.last_updated = Utc::now();
    }

    pub fn last_action(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
