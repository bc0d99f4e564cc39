//! Roster Store - durable CRUD over rosters keyed by entity identifier.
//!
//! Every mutation is a load-modify-save against the entity's JSON file, run
//! under a per-entity async mutex so two concurrent commands on the same list
//! cannot overwrite each other's update. Slot numbers are 1-based everywhere.

use crate::{
    core::{
        participant::{
            Announcement, EntityId, Participant, ParticipantEdit, ParticipantInput, Roster,
            TrackedMessageRef,
        },
        storage::{JsonFileStorage, StoredRoster},
    },
    errors::{Error, Result},
};
use dashmap::DashMap;
use serde::Deserialize;
use std::{collections::HashSet, sync::Arc};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Where `append` places a new participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendMode {
    /// Always add at the end
    #[default]
    Append,
    /// Overwrite the first placeholder slot, append if there is none
    ReusePlaceholder,
}

/// Capacity and defaults applied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPolicy {
    /// Maximum live slots, including the reserved row when enabled
    pub capacity: usize,
    /// Last row is a fixed admin row; users get `capacity - 1` slots
    pub reserve_last_row: bool,
    /// Placement of new participants
    pub append_mode: AppendMode,
    /// Default announcement title, `{entity}` is interpolated
    pub title_template: String,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            capacity: 20,
            reserve_last_row: false,
            append_mode: AppendMode::Append,
            title_template: "📋 LIST {entity}".to_string(),
        }
    }
}

impl RosterPolicy {
    /// Number of slots available to users.
    #[must_use]
    pub const fn user_capacity(&self) -> usize {
        if self.reserve_last_row {
            self.capacity.saturating_sub(1)
        } else {
            self.capacity
        }
    }
}

/// Persistent roster collection for the configured entities.
#[derive(Debug)]
pub struct RosterStore {
    storage: JsonFileStorage,
    policy: RosterPolicy,
    entities: Vec<EntityId>,
    locks: DashMap<EntityId, Arc<Mutex<()>>>,
}

impl RosterStore {
    /// Creates a store managing `entities`, persisted through `storage`.
    #[must_use]
    pub fn new(storage: JsonFileStorage, policy: RosterPolicy, entities: &[String]) -> Self {
        let mut seen = HashSet::new();
        let ids: Vec<EntityId> = entities
            .iter()
            .map(|e| EntityId::normalized(e))
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self {
            storage,
            policy,
            entities: ids,
            locks: DashMap::new(),
        }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    /// All configured entities, in configuration order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Validates a raw identifier against the configured entities (case-insensitive).
    pub fn entity(&self, raw: &str) -> Result<EntityId> {
        let id = EntityId::normalized(raw);
        if self.entities.contains(&id) {
            Ok(id)
        } else {
            Err(Error::UnknownEntity {
                id: raw.trim().to_string(),
            })
        }
    }

    fn default_roster(&self, entity: &EntityId) -> Roster {
        Roster::new(Announcement::from_template(&self.policy.title_template, entity))
    }

    fn lock_for(&self, entity: &EntityId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(entity.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    /// Returns the persisted roster, or a fresh default one.
    ///
    /// Never fails: unreadable state is logged and replaced by the default roster.
    pub async fn load(&self, entity: &EntityId) -> Roster {
        match self.storage.read(entity).await {
            Ok(StoredRoster::Present(roster)) => roster,
            Ok(StoredRoster::Absent) => self.default_roster(entity),
            Err(e) => {
                warn!("Falling back to empty roster for {entity}: {e}");
                self.default_roster(entity)
            }
        }
    }

    /// Overwrites the persisted roster wholesale.
    pub async fn save(&self, entity: &EntityId, roster: &Roster) -> Result<()> {
        let lock = self.lock_for(entity);
        let _guard = lock.lock().await;
        self.storage.write(entity, roster).await
    }

    /// Runs `op` on the current roster under the entity lock and saves the result.
    ///
    /// Nothing is written when `op` fails. A read failure other than "absent"
    /// aborts with `Storage` instead of overwriting state that could not be read.
    async fn mutate<T, F>(&self, entity: &EntityId, op: F) -> Result<T>
    where
        F: FnOnce(&mut Roster) -> Result<T>,
    {
        let lock = self.lock_for(entity);
        let _guard = lock.lock().await;

        let mut roster = match self.storage.read(entity).await? {
            StoredRoster::Present(roster) => roster,
            StoredRoster::Absent => self.default_roster(entity),
        };
        let value = op(&mut roster)?;
        self.storage.write(entity, &roster).await?;
        Ok(value)
    }

    /// Adds a participant and returns its 1-based slot.
    #[instrument(skip(self, input), fields(entity = %entity))]
    pub async fn append(&self, entity: &EntityId, input: ParticipantInput) -> Result<usize> {
        let capacity = self.policy.user_capacity();
        let mode = self.policy.append_mode;
        let slot = self
            .mutate(entity, |roster| {
                let participant = input.into_participant(true);

                if mode == AppendMode::ReusePlaceholder {
                    if let Some(index) = roster
                        .participants
                        .iter()
                        .take(capacity)
                        .position(Participant::is_placeholder)
                    {
                        roster.participants[index] = participant;
                        return Ok(index + 1);
                    }
                }

                if roster.participants.len() >= capacity {
                    return Err(Error::CapacityExceeded {
                        entity: entity.to_string(),
                        capacity,
                    });
                }
                roster.participants.push(participant);
                Ok(roster.participants.len())
            })
            .await?;

        info!("Added participant to {entity} at slot {slot}");
        Ok(slot)
    }

    /// Replaces the participant at `slot`, keeping its status unless one is supplied.
    #[instrument(skip(self, input), fields(entity = %entity))]
    pub async fn replace_at(
        &self,
        entity: &EntityId,
        slot: usize,
        input: ParticipantInput,
    ) -> Result<()> {
        self.mutate(entity, |roster| {
            let index = slot_index(roster, slot)?;
            let status = roster.participants[index].status;
            roster.participants[index] = input.into_participant(status);
            Ok(())
        })
        .await?;
        info!("Edited slot {slot} of {entity}");
        Ok(())
    }

    /// Applies `edit` to the participant at `slot`, keeping every field it leaves unset.
    ///
    /// The current values are read under the entity lock, so a concurrent
    /// removal cannot shift another participant into the edited slot's data.
    #[instrument(skip(self, edit), fields(entity = %entity))]
    pub async fn edit_at(&self, entity: &EntityId, slot: usize, edit: ParticipantEdit) -> Result<()> {
        self.mutate(entity, |roster| {
            let index = slot_index(roster, slot)?;
            edit.apply(&mut roster.participants[index]);
            Ok(())
        })
        .await?;
        info!("Edited slot {slot} of {entity}");
        Ok(())
    }

    /// Removes the participant at `slot`; later slots shift down by one.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn remove_at(&self, entity: &EntityId, slot: usize) -> Result<Participant> {
        let removed = self
            .mutate(entity, |roster| {
                let index = slot_index(roster, slot)?;
                Ok(roster.participants.remove(index))
            })
            .await?;
        info!("Removed slot {slot} from {entity}");
        Ok(removed)
    }

    /// Flips the status of the participant at `slot` and returns the new value.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn toggle_status(&self, entity: &EntityId, slot: usize) -> Result<bool> {
        self.mutate(entity, |roster| {
            let index = slot_index(roster, slot)?;
            let participant = &mut roster.participants[index];
            participant.status = !participant.status;
            Ok(participant.status)
        })
        .await
    }

    /// Empties the participant list; the announcement is kept.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn clear(&self, entity: &EntityId) -> Result<()> {
        self.mutate(entity, |roster| {
            roster.participants.clear();
            Ok(())
        })
        .await?;
        info!("Cleared {entity}");
        Ok(())
    }

    /// Overwrites the announcement fields that are given; `None` keeps the current value.
    #[instrument(skip(self, title, info_text), fields(entity = %entity))]
    pub async fn set_announcement(
        &self,
        entity: &EntityId,
        title: Option<String>,
        info_text: Option<String>,
    ) -> Result<()> {
        self.mutate(entity, |roster| {
            if let Some(title) = title {
                roster.announcement.title = title;
            }
            if let Some(info_text) = info_text {
                roster.announcement.info_text = info_text;
            }
            Ok(())
        })
        .await
    }

    /// Records where the list was last rendered.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn set_tracked_message_ref(
        &self,
        entity: &EntityId,
        tracked: TrackedMessageRef,
    ) -> Result<()> {
        self.mutate(entity, |roster| {
            roster.tracked_message_ref = Some(tracked);
            Ok(())
        })
        .await
    }

    /// Drops placeholder entries and entries without a secondary handle.
    ///
    /// Returns the number of removed entries. Nothing is written when there is
    /// nothing to remove.
    #[instrument(skip(self), fields(entity = %entity))]
    pub async fn purge_placeholders(&self, entity: &EntityId) -> Result<usize> {
        let lock = self.lock_for(entity);
        let _guard = lock.lock().await;

        let StoredRoster::Present(mut roster) = self.storage.read(entity).await? else {
            return Ok(0);
        };
        let before = roster.participants.len();
        roster.participants.retain(|p| !p.is_invalid_entry());
        let removed = before - roster.participants.len();

        if removed > 0 {
            self.storage.write(entity, &roster).await?;
            info!(
                "Removed {removed} invalid entries from {entity}, kept {}",
                roster.participants.len()
            );
        }
        Ok(removed)
    }

    /// Runs [`Self::purge_placeholders`] over every configured entity.
    ///
    /// A failure on one entity is recorded and does not stop the others.
    pub async fn purge_all(&self) -> Vec<(EntityId, Result<usize>)> {
        let mut results = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let result = self.purge_placeholders(entity).await;
            if let Err(e) = &result {
                warn!("Purge failed for {entity}: {e}");
            }
            results.push((entity.clone(), result));
        }
        results
    }
}

fn slot_index(roster: &Roster, slot: usize) -> Result<usize> {
    let len = roster.participants.len();
    if slot == 0 || slot > len {
        return Err(Error::SlotOutOfRange { slot, len });
    }
    Ok(slot - 1)
}
