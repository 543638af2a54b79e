use super::{GuildId, Roster};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode characters: {0}")]
    Json(#[from] serde_json::Error),
    #[error("character {0:?} not found")]
    NotFound(String),
    #[error("you already have a character named {0:?}")]
    DuplicateName(String),
    #[error("page {page} doesn't exist; available pages: 1-{pages}")]
    PageOutOfRange { page: usize, pages: usize },
    #[error("{0:?} doesn't have any notes yet")]
    NoNotes(String),
}

impl StoreError {
    /// False for failures of the storage itself.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Json(_))
    }
}

/// Where guild rosters live between commands.
pub trait CharacterStore {
    /// A guild with no saved roster, or one that cannot be read, is empty.
    /// Implementations should keep an undecodable roster somewhere a save
    /// won't overwrite it.
    fn load(&self, guild: GuildId) -> Roster;

    fn save(&self, guild: GuildId, roster: &Roster) -> Result<(), StoreError>;

    /// Loads the roster, applies `f` and saves the result if `f` succeeded.
    /// The save replaces the whole guild file.
    fn update<T, F>(&self, guild: GuildId, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Roster) -> Result<T, StoreError>,
    {
        let mut roster = self.load(guild);
        let ret = f(&mut roster)?;
        self.save(guild, &roster)?;
        Ok(ret)
    }
}

/// One pretty-printed `<guild>.json` file per guild.
#[derive(Debug, Clone)]
pub struct JsonCharacterStore {
    dir: PathBuf,
}

impl JsonCharacterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, guild: GuildId) -> PathBuf {
        self.dir.join(format!("{}.json", guild))
    }

    /// Moves an undecodable roster out of the way so the next save can't
    /// overwrite it.
    fn quarantine(path: &Path) -> Result<PathBuf, StoreError> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%f");
        let aside = path.with_extension(format!("corrupt-{}.json", stamp));
        fs::rename(path, &aside).map_err(|source| StoreError::Io {
            path: path.to_owned(),
            source,
        })?;
        Ok(aside)
    }

    fn read(path: &Path) -> Result<Option<Roster>, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&text)?))
    }
}

impl CharacterStore for JsonCharacterStore {
    fn load(&self, guild: GuildId) -> Roster {
        let path = self.path(guild);
        match Self::read(&path) {
            Ok(roster) => roster.unwrap_or_default(),
            Err(e @ StoreError::Json(_)) => {
                tracing::error!(guild, error = %e, "failed to load characters");
                match Self::quarantine(&path) {
                    Ok(aside) => tracing::warn!(
                        guild,
                        aside = %aside.display(),
                        "moved unreadable characters aside"
                    ),
                    Err(e) => {
                        tracing::error!(guild, error = %e, "failed to move unreadable characters")
                    }
                }
                Roster::default()
            }
            Err(e) => {
                tracing::error!(guild, error = %e, "failed to load characters");
                Roster::default()
            }
        }
    }

    fn save(&self, guild: GuildId, roster: &Roster) -> Result<(), StoreError> {
        let path = self.path(guild);
        let json = serde_json::to_string_pretty(roster)?;
        fs::write(&path, json).map_err(|source| {
            tracing::error!(guild, error = %source, "failed to save characters");
            StoreError::Io { path, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatSystem;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> (tempfile::TempDir, JsonCharacterStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCharacterStore::new(dir.path().join("characters")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_guild_is_empty() {
        let (_dir, store) = store();
        assert!(store.load(42).is_empty());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let created = store
            .update(7, |roster| roster.create(99, "Aragorn", "Ranger", &mut rng, now))
            .unwrap();
        store
            .update(7, |roster| roster.add_note(99, "Aragorn", "heir of Isildur"))
            .unwrap();

        let roster = store.load(7);
        let aragorn = roster.find(99, "aragorn").unwrap();
        assert_eq!(aragorn.stats, created.stats);
        assert_eq!(aragorn.notes, vec!["heir of Isildur"]);
        assert!(store.load(8).is_empty());
    }

    #[test]
    fn test_failed_update_is_not_saved() {
        let (_dir, store) = store();
        let err = store
            .update(1, |roster| roster.set_role(5, "Nobody", "Ghost"))
            .unwrap_err();
        assert!(err.is_user_error());
        assert!(!store.dir().join("1.json").exists());
    }

    #[test]
    fn test_reads_existing_layout() {
        let (_dir, store) = store();
        let json = r#"{
  "123": {
    "123_0": {
      "name": "Vex",
      "nickname": null,
      "role": "Rogue",
      "system": "cortex",
      "stats": {"STR": 3, "DEX": 8, "CON": 2, "INT": 5, "WIS": 1, "CHA": 6},
      "backstory": null,
      "notes": [],
      "created_by": 123,
      "created_at": "2024-03-01T18:30:00.123000+00:00"
    }
  }
}"#;
        fs::write(store.dir().join("55.json"), json).unwrap();

        let roster = store.load(55);
        let vex = roster.find(123, "vex").unwrap();
        assert_eq!(vex.system, StatSystem::Cortex);
        let labels: Vec<_> = vex.stats.keys().cloned().collect();
        assert_eq!(labels, ["STR", "DEX", "CON", "INT", "WIS", "CHA"]);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let (_dir, store) = store();
        fs::write(store.dir().join("9.json"), "{ not json").unwrap();
        assert!(store.load(9).is_empty());
    }

    #[test]
    fn test_corrupt_file_survives_update() {
        let (_dir, store) = store();
        let mut rng = StdRng::seed_from_u64(4);
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        fs::write(store.dir().join("9.json"), "{ not json").unwrap();

        store
            .update(9, |roster| roster.create(1, "Merry", "Squire", &mut rng, now))
            .unwrap();

        let kept: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .map_or(false, |name| name.to_string_lossy().starts_with("9.corrupt-"))
            })
            .collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(fs::read_to_string(&kept[0]).unwrap(), "{ not json");
        assert!(store.load(9).find(1, "merry").is_some());
    }
}
