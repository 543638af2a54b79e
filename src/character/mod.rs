//! Per-guild character sheets.
//!
//! A [`Roster`] holds every character in one guild, keyed by user and then by
//! character id. Lookups by name are case-insensitive and also match the
//! nickname, except for renames which only look at the name.

mod store;

pub use store::{CharacterStore, JsonCharacterStore, StoreError};

use crate::common::{is_clear_keyword, Int};
use crate::roll::Roller;
use crate::stats::{self, StatBlock, StatSystem};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type GuildId = u64;
pub type UserId = u64;

pub const NOTES_PER_PAGE: usize = 5;

type SResult<T> = Result<T, StoreError>;

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub nickname: Option<String>,
    pub role: String,
    pub system: StatSystem,
    /// Label to score, in the order the system lists them.
    pub stats: IndexMap<String, Int>,
    pub backstory: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Character {
    fn matches(&self, name: &str) -> bool {
        same_name(&self.name, name)
            || self
                .nickname
                .as_deref()
                .map_or(false, |nick| same_name(nick, name))
    }

    fn set_stats(&mut self, block: &StatBlock) {
        self.system = block.system;
        self.stats = block
            .scores()
            .map(|(label, value)| (label.to_owned(), value))
            .collect();
    }
}

/// One page of a character's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesPage<'a> {
    pub notes: &'a [String],
    /// 1-based.
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    /// 1-based number of the first note on this page.
    pub first: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    users: IndexMap<String, IndexMap<String, Character>>,
}

impl Roster {
    fn user_key(user: UserId) -> String {
        user.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.users.values().all(IndexMap::is_empty)
    }

    pub fn characters(&self, user: UserId) -> impl Iterator<Item = (&str, &Character)> + '_ {
        self.users
            .get(&Self::user_key(user))
            .into_iter()
            .flat_map(|chars| chars.iter().map(|(id, c)| (id.as_str(), c)))
    }

    pub fn find(&self, user: UserId, name: &str) -> Option<&Character> {
        self.characters(user)
            .map(|(_, c)| c)
            .find(|c| c.matches(name))
    }

    fn find_mut(&mut self, user: UserId, name: &str) -> SResult<&mut Character> {
        self.users
            .get_mut(&Self::user_key(user))
            .and_then(|chars| chars.values_mut().find(|c| c.matches(name)))
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    fn has_name(&self, user: UserId, name: &str) -> bool {
        self.characters(user)
            .any(|(_, c)| same_name(&c.name, name))
    }

    /// Creates a character with freshly rolled `dnd` stats.
    pub fn create<R: Roller>(
        &mut self,
        user: UserId,
        name: &str,
        role: &str,
        roller: &mut R,
        now: DateTime<Utc>,
    ) -> SResult<Character> {
        if self.has_name(user, name) {
            return Err(StoreError::DuplicateName(name.to_owned()));
        }

        let chars = self.users.entry(Self::user_key(user)).or_default();
        let mut n = chars.len();
        let id = loop {
            let id = format!("{}_{}", user, n);
            if !chars.contains_key(&id) {
                break id;
            }
            n += 1;
        };

        let mut character = Character {
            name: name.to_owned(),
            nickname: None,
            role: role.to_owned(),
            system: StatSystem::default(),
            stats: IndexMap::new(),
            backstory: None,
            notes: Vec::new(),
            created_by: user,
            created_at: now,
        };
        character.set_stats(&stats::generate(StatSystem::default(), roller));

        tracing::info!(user, name, %id, "created character");
        chars.insert(id, character.clone());
        Ok(character)
    }

    pub fn delete(&mut self, user: UserId, name: &str) -> SResult<Character> {
        let chars = self
            .users
            .get_mut(&Self::user_key(user))
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        let index = chars
            .values()
            .position(|c| c.matches(name))
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        chars
            .shift_remove_index(index)
            .map(|(_, c)| c)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    /// Returns the old name.
    pub fn rename(&mut self, user: UserId, current: &str, new: &str) -> SResult<String> {
        let clash = self
            .characters(user)
            .any(|(_, c)| same_name(&c.name, new) && !same_name(&c.name, current));
        let character = self
            .users
            .get_mut(&Self::user_key(user))
            .and_then(|chars| chars.values_mut().find(|c| same_name(&c.name, current)))
            .ok_or_else(|| StoreError::NotFound(current.to_owned()))?;
        if clash {
            return Err(StoreError::DuplicateName(new.to_owned()));
        }
        Ok(std::mem::replace(&mut character.name, new.to_owned()))
    }

    /// `None` or a clear keyword removes the nickname. Returns the new one.
    pub fn set_nickname(
        &mut self,
        user: UserId,
        name: &str,
        nickname: Option<&str>,
    ) -> SResult<Option<String>> {
        let character = self.find_mut(user, name)?;
        character.nickname = nickname
            .filter(|nick| !is_clear_keyword(nick))
            .map(str::to_owned);
        Ok(character.nickname.clone())
    }

    /// Returns the old role.
    pub fn set_role(&mut self, user: UserId, name: &str, role: &str) -> SResult<String> {
        let character = self.find_mut(user, name)?;
        Ok(std::mem::replace(&mut character.role, role.to_owned()))
    }

    /// Switches the stat system, rerolling the stats only if asked to.
    /// Returns the old system.
    pub fn set_system<R: Roller>(
        &mut self,
        user: UserId,
        name: &str,
        system: StatSystem,
        regenerate: bool,
        roller: &mut R,
    ) -> SResult<StatSystem> {
        let character = self.find_mut(user, name)?;
        let old = character.system;
        if regenerate {
            character.set_stats(&stats::generate(system, roller));
        } else {
            character.system = system;
        }
        Ok(old)
    }

    /// A clear keyword removes the backstory.
    pub fn set_backstory(&mut self, user: UserId, name: &str, backstory: &str) -> SResult<()> {
        let character = self.find_mut(user, name)?;
        character.backstory = if is_clear_keyword(backstory) {
            None
        } else {
            Some(backstory.to_owned())
        };
        Ok(())
    }

    /// Returns how many notes the character has now.
    pub fn add_note(&mut self, user: UserId, name: &str, note: &str) -> SResult<usize> {
        let character = self.find_mut(user, name)?;
        character.notes.push(note.to_owned());
        Ok(character.notes.len())
    }

    pub fn notes_page(&self, user: UserId, name: &str, page: usize) -> SResult<NotesPage<'_>> {
        let character = self
            .find(user, name)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        let total = character.notes.len();
        if total == 0 {
            return Err(StoreError::NoNotes(character.name.clone()));
        }

        let pages = (total + NOTES_PER_PAGE - 1) / NOTES_PER_PAGE;
        if page < 1 || page > pages {
            return Err(StoreError::PageOutOfRange { page, pages });
        }

        let start = (page - 1) * NOTES_PER_PAGE;
        let end = (start + NOTES_PER_PAGE).min(total);
        Ok(NotesPage {
            notes: &character.notes[start..end],
            page,
            pages,
            total,
            first: start + 1,
        })
    }

    /// Returns how many notes were removed.
    pub fn clear_notes(&mut self, user: UserId, name: &str) -> SResult<usize> {
        let character = self.find_mut(user, name)?;
        Ok(std::mem::take(&mut character.notes).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALICE: UserId = 1;
    const BOB: UserId = 2;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn roster() -> (Roster, StdRng) {
        let mut rng = StdRng::seed_from_u64(17);
        let mut roster = Roster::default();
        roster.create(ALICE, "Gandalf", "Wizard", &mut rng, now()).unwrap();
        (roster, rng)
    }

    #[test]
    fn test_create() {
        let (roster, _) = roster();
        let (id, gandalf) = roster.characters(ALICE).next().unwrap();
        assert_eq!(id, "1_0");
        assert_eq!(gandalf.role, "Wizard");
        assert_eq!(gandalf.system, StatSystem::Dnd);
        let labels: Vec<_> = gandalf.stats.keys().map(String::as_str).collect();
        assert_eq!(labels, stats::ABILITIES);
        assert!(gandalf.stats.values().all(|v| (3..=18).contains(v)));
        assert_eq!(roster.characters(BOB).count(), 0);
    }

    #[test]
    fn test_create_duplicate() {
        let (mut roster, mut rng) = roster();
        let err = roster
            .create(ALICE, "gandalf", "Grey", &mut rng, now())
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "gandalf"));
        // another user may reuse the name
        assert!(roster.create(BOB, "Gandalf", "Imposter", &mut rng, now()).is_ok());
    }

    #[test]
    fn test_ids_stay_unique_after_delete() {
        let (mut roster, mut rng) = roster();
        roster.create(ALICE, "Frodo", "Hobbit", &mut rng, now()).unwrap();
        roster.delete(ALICE, "Gandalf").unwrap();
        roster.create(ALICE, "Sam", "Gardener", &mut rng, now()).unwrap();
        let ids: Vec<_> = roster.characters(ALICE).map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1_1", "1_2"]);
    }

    #[test]
    fn test_find_by_nickname() {
        let (mut roster, _) = roster();
        roster.set_nickname(ALICE, "Gandalf", Some("Mithrandir")).unwrap();
        assert_eq!(roster.find(ALICE, "mithrandir").unwrap().name, "Gandalf");
        assert_eq!(roster.set_nickname(ALICE, "Gandalf", Some("clear")).unwrap(), None);
        assert!(roster.find(ALICE, "Mithrandir").is_none());
    }

    #[test]
    fn test_rename() {
        let (mut roster, mut rng) = roster();
        roster.create(ALICE, "Frodo", "Hobbit", &mut rng, now()).unwrap();
        assert!(matches!(
            roster.rename(ALICE, "Gandalf", "frodo"),
            Err(StoreError::DuplicateName(_))
        ));
        assert_eq!(roster.rename(ALICE, "gandalf", "Gandalf the White").unwrap(), "Gandalf");
        assert!(roster.find(ALICE, "Gandalf the White").is_some());
        assert!(matches!(
            roster.rename(ALICE, "Saruman", "Sharkey"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_system() {
        let (mut roster, mut rng) = roster();
        let before = roster.find(ALICE, "Gandalf").unwrap().stats.clone();

        let old = roster
            .set_system(ALICE, "Gandalf", StatSystem::Special, false, &mut rng)
            .unwrap();
        assert_eq!(old, StatSystem::Dnd);
        let gandalf = roster.find(ALICE, "Gandalf").unwrap();
        assert_eq!(gandalf.system, StatSystem::Special);
        assert_eq!(gandalf.stats, before);

        roster
            .set_system(ALICE, "Gandalf", StatSystem::Special, true, &mut rng)
            .unwrap();
        let gandalf = roster.find(ALICE, "Gandalf").unwrap();
        assert_eq!(gandalf.stats.len(), 7);
        assert!(gandalf.stats.contains_key("LCK"));
    }

    #[test]
    fn test_role_and_backstory() {
        let (mut roster, _) = roster();
        assert_eq!(roster.set_role(ALICE, "Gandalf", "Istar").unwrap(), "Wizard");
        roster.set_backstory(ALICE, "Gandalf", "Came over the sea.").unwrap();
        assert_eq!(
            roster.find(ALICE, "Gandalf").unwrap().backstory.as_deref(),
            Some("Came over the sea.")
        );
        roster.set_backstory(ALICE, "Gandalf", "remove").unwrap();
        assert_eq!(roster.find(ALICE, "Gandalf").unwrap().backstory, None);
    }

    #[test]
    fn test_notes_pages() {
        let (mut roster, _) = roster();
        assert!(matches!(
            roster.notes_page(ALICE, "Gandalf", 1),
            Err(StoreError::NoNotes(_))
        ));
        for i in 1..=7 {
            assert_eq!(roster.add_note(ALICE, "Gandalf", &format!("note {}", i)).unwrap(), i);
        }

        let page = roster.notes_page(ALICE, "Gandalf", 2).unwrap();
        assert_eq!(page.notes, ["note 6", "note 7"]);
        assert_eq!((page.page, page.pages, page.total, page.first), (2, 2, 7, 6));
        assert!(matches!(
            roster.notes_page(ALICE, "Gandalf", 3),
            Err(StoreError::PageOutOfRange { page: 3, pages: 2 })
        ));
        assert!(matches!(
            roster.notes_page(ALICE, "Gandalf", 0),
            Err(StoreError::PageOutOfRange { page: 0, pages: 2 })
        ));

        assert_eq!(roster.clear_notes(ALICE, "Gandalf").unwrap(), 7);
        assert!(roster.find(ALICE, "Gandalf").unwrap().notes.is_empty());
    }

    #[test]
    fn test_delete() {
        let (mut roster, _) = roster();
        assert!(matches!(roster.delete(BOB, "Gandalf"), Err(StoreError::NotFound(_))));
        assert_eq!(roster.delete(ALICE, "GANDALF").unwrap().name, "Gandalf");
        assert!(roster.is_empty());
    }
}
