//! JSON file persistence for rosters.
//!
//! One pretty-printed file per entity under the data directory (`ps1.json`).
//! Writes go through a temporary file that is renamed over the target.

use crate::{
    core::participant::{EntityId, Roster},
    errors::{Error, Result},
};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Outcome of reading a persisted roster.
#[derive(Debug)]
pub enum StoredRoster {
    /// A valid record was found
    Present(Roster),
    /// No file, or a file that does not match the roster layout
    Absent,
}

/// File-per-entity roster storage.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at `data_dir`. The directory is created on first write.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the roster files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `entity`.
    #[must_use]
    pub fn path_for(&self, entity: &EntityId) -> PathBuf {
        self.data_dir.join(format!("{}.json", entity.file_stem()))
    }

    /// Reads the roster for `entity`.
    ///
    /// Missing files and structurally incompatible records are reported as
    /// [`StoredRoster::Absent`]; any other I/O failure is a `Storage` error.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn read(&self, entity: &EntityId) -> Result<StoredRoster> {
        let path = self.path_for(entity);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No roster file at {}", path.display());
                return Ok(StoredRoster::Absent);
            }
            Err(e) => return Err(storage_error(&path, &e)),
        };

        match serde_json::from_str::<Roster>(&contents) {
            Ok(roster) => Ok(StoredRoster::Present(roster)),
            Err(e) => {
                warn!(
                    "Discarding unreadable roster file {}: {}",
                    path.display(),
                    e
                );
                Ok(StoredRoster::Absent)
            }
        }
    }

    /// Overwrites the roster for `entity` wholesale.
    #[instrument(skip(self, roster), fields(entity = %entity, participants = roster.participants.len()))]
    pub async fn write(&self, entity: &EntityId, roster: &Roster) -> Result<()> {
        let path = self.path_for(entity);
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| storage_error(&self.data_dir, &e))?;

        let json = serde_json::to_string_pretty(roster)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|e| storage_error(&tmp_path, &e))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(storage_error(&path, &e));
        }

        debug!("Saved roster to {}", path.display());
        Ok(())
    }
}

fn storage_error(path: &Path, err: &std::io::Error) -> Error {
    Error::Storage {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::participant::{Announcement, Participant};
    use crate::test_utils::temp_data_dir;

    fn sample_roster(entity: &EntityId) -> Roster {
        let mut roster = Roster::new(Announcement::from_template("LIST {entity}", entity));
        roster
            .participants
            .push(Participant::new(Some("42".into()), "Alice", "AliceR"));
        roster
    }

    #[tokio::test]
    async fn test_write_then_read() -> Result<()> {
        let storage = JsonFileStorage::new(temp_data_dir());
        let entity = EntityId::normalized("PS1");
        let roster = sample_roster(&entity);

        storage.write(&entity, &roster).await?;
        assert!(storage.path_for(&entity).ends_with("ps1.json"));

        match storage.read(&entity).await? {
            StoredRoster::Present(loaded) => assert_eq!(loaded, roster),
            StoredRoster::Absent => panic!("roster should be present"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_absent() -> Result<()> {
        let storage = JsonFileStorage::new(temp_data_dir());
        let entity = EntityId::normalized("PS2");
        assert!(matches!(storage.read(&entity).await?, StoredRoster::Absent));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_absent() -> Result<()> {
        let dir = temp_data_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("ps3.json"), "{ not json")?;
        std::fs::write(dir.join("ps4.json"), r#"{"participants": 5}"#)?;

        let storage = JsonFileStorage::new(dir);
        for raw in ["PS3", "PS4"] {
            let entity = EntityId::normalized(raw);
            assert!(matches!(storage.read(&entity).await?, StoredRoster::Absent));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_leaves_no_tmp() -> Result<()> {
        let dir = temp_data_dir().join("nested").join("ps");
        let storage = JsonFileStorage::new(&dir);
        let entity = EntityId::normalized("PS5");
        storage.write(&entity, &sample_roster(&entity)).await?;

        assert!(dir.join("ps5.json").exists());
        assert!(!dir.join("ps5.json.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_path_is_storage_error() -> Result<()> {
        let dir = temp_data_dir();
        std::fs::create_dir_all(dir.join("ps6.json"))?;

        let storage = JsonFileStorage::new(dir);
        let entity = EntityId::normalized("PS6");
        let result = storage.read(&entity).await;
        assert!(matches!(result, Err(Error::Storage { .. })));

        let result = storage.write(&entity, &sample_roster(&entity)).await;
        assert!(matches!(result, Err(Error::Storage { .. })));
        assert!(!storage.data_dir().join("ps6.json.tmp").exists());
        Ok(())
    }
}
