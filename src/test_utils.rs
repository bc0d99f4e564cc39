//! Shared test utilities.
//!
//! Every store gets its own directory under the system temp dir so tests can
//! run in parallel without sharing roster files.

use crate::{
    core::{
        participant::{EntityId, ParticipantInput},
        roster::{RosterPolicy, RosterStore},
        storage::JsonFileStorage,
    },
    errors::Result,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default test entities, matching the default configuration.
pub const TEST_ENTITIES: [&str; 7] = ["PS1", "PS2", "PS3", "PS4", "PS5", "PS6", "PS7"];

/// Routes tracing output through the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A fresh, not yet created directory for roster files.
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir()
        .join("j2y-roster-tests")
        .join(uuid::Uuid::new_v4().to_string())
}

/// Roster store with the default policy over PS1..PS7.
pub fn setup_test_store() -> RosterStore {
    setup_test_store_with(RosterPolicy::default())
}

/// Roster store with a custom policy over PS1..PS7.
pub fn setup_test_store_with(policy: RosterPolicy) -> RosterStore {
    init_test_tracing();
    let entities: Vec<String> = TEST_ENTITIES.iter().map(ToString::to_string).collect();
    RosterStore::new(JsonFileStorage::new(temp_data_dir()), policy, &entities)
}

/// Participant input with an identity, name and secondary handle.
pub fn input(identity: &str, name: &str, handle: &str) -> ParticipantInput {
    ParticipantInput::new(Some(identity.to_string()), name, handle)
}

/// Appends `count` numbered participants.
pub async fn fill_roster(store: &RosterStore, entity: &EntityId, count: usize) -> Result<()> {
    for n in 0..count {
        store
            .append(entity, input(&(1000 + n).to_string(), &format!("User{n}"), &format!("Handle{n}")))
            .await?;
    }
    Ok(())
}
