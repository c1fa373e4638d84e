//! flowcast-storage-json
//!
//! Reads a user's ledger, payment sources and recurring definitions from one
//! JSON file per user and serves them through [`SnapshotSource`].

pub mod normalize;

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use flowcast_core::{CoreError, ForecastSnapshot, SnapshotSource};
use flowcast_domain::{LedgerTransaction, PaymentSource, RecurringDefinition};

use crate::normalize::{normalize, DefinitionRecord, StoredSnapshot};

const SNAPSHOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed snapshot store: `<root>/<user>.json`.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    root: PathBuf,
}

impl JsonSnapshotStorage {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn user_path(&self, user_id: &str) -> Result<PathBuf, CoreError> {
        Ok(self
            .root
            .join(format!("{}.{}", canonical_user(user_id)?, SNAPSHOT_EXTENSION)))
    }

    /// Users with a snapshot file, sorted.
    pub fn list_users(&self) -> Result<Vec<String>, CoreError> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                users.push(stem.to_string());
            }
        }
        users.sort();
        Ok(users)
    }

    /// Writes `snapshot` in the current record layout, replacing the user's
    /// file atomically.
    pub fn save_snapshot(&self, user_id: &str, snapshot: &ForecastSnapshot) -> Result<(), CoreError> {
        let mut stored = StoredSnapshot {
            transactions: to_values(&snapshot.transactions)?,
            payment_sources: to_values(&snapshot.sources)?,
            ..StoredSnapshot::default()
        };
        for definition in &snapshot.definitions {
            match DefinitionRecord::from(definition) {
                DefinitionRecord::Salary(record) => stored.salaries.push(to_value(&record)?),
                DefinitionRecord::Subscription(record) => {
                    stored.subscriptions.push(to_value(&record)?)
                }
                DefinitionRecord::Loan(record) => stored.loans.push(to_value(&record)?),
            }
        }
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|err| CoreError::Serde(err.to_string()))?;

        let path = self.user_path(user_id)?;
        let tmp = tmp_path(&path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(user = user_id, path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn read_stored(&self, user_id: &str) -> Result<StoredSnapshot, CoreError> {
        let path = self.user_path(user_id)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(CoreError::UserNotFound(user_id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&data).map_err(|err| {
            CoreError::Storage(format!("{} is not a valid snapshot: {err}", path.display()))
        })
    }
}

impl SnapshotSource for JsonSnapshotStorage {
    fn list_ledger_transactions(&self, user_id: &str) -> Result<Vec<LedgerTransaction>, CoreError> {
        Ok(self.load_snapshot(user_id, NaiveDate::MIN)?.transactions)
    }

    fn list_payment_sources(&self, user_id: &str) -> Result<Vec<PaymentSource>, CoreError> {
        Ok(self.load_snapshot(user_id, NaiveDate::MIN)?.sources)
    }

    fn list_recurring_definitions(
        &self,
        user_id: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<RecurringDefinition>, CoreError> {
        Ok(self.load_snapshot(user_id, as_of)?.definitions)
    }

    /// Reads the user's file once and normalizes every collection from it.
    fn load_snapshot(&self, user_id: &str, as_of: NaiveDate) -> Result<ForecastSnapshot, CoreError> {
        let normalized = normalize(self.read_stored(user_id)?, as_of);
        debug!(
            user = user_id,
            transactions = normalized.transactions.len(),
            sources = normalized.sources.len(),
            definitions = normalized.definitions.len(),
            skipped = normalized.skipped,
            "snapshot loaded"
        );
        Ok(ForecastSnapshot {
            transactions: normalized.transactions,
            sources: normalized.sources,
            definitions: normalized.definitions,
            skipped: normalized.skipped,
        })
    }
}

/// User ids double as file stems, so only a conservative character set is
/// accepted.
fn canonical_user(user_id: &str) -> Result<String, CoreError> {
    let trimmed = user_id.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        && !trimmed.starts_with('.');
    if valid {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(CoreError::Validation(format!("invalid user id `{user_id}`")))
    }
}

fn to_value<T: Serialize>(item: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(item).map_err(|err| CoreError::Serde(err.to_string()))
}

fn to_values<T: Serialize>(items: &[T]) -> Result<Vec<serde_json::Value>, CoreError> {
    items.iter().map(to_value).collect()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("{SNAPSHOT_EXTENSION}.{TMP_SUFFIX}"));
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ids_are_sanitized() {
        assert_eq!(canonical_user(" Alice ").unwrap(), "alice");
        assert_eq!(canonical_user("bob_2.home").unwrap(), "bob_2.home");
        assert!(canonical_user("../etc/passwd").is_err());
        assert!(canonical_user("").is_err());
        assert!(canonical_user(".hidden").is_err());
    }
}
