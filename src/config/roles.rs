//! Role authorization lists.
//!
//! Mutating roster commands are limited to members holding one of the configured
//! admin roles. Extra role ids can be supplied through `ADMIN_ROLE_IDS`
//! (comma separated) in the `.env` file.

/// Parses a comma separated list of role ids, skipping blanks and invalid entries.
#[must_use]
pub fn parse_role_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Ignoring invalid role id '{s}': {e}");
                None
            }
        })
        .collect()
}

/// Reads `ADMIN_ROLE_IDS` from the environment.
#[must_use]
pub fn role_ids_from_env() -> Vec<u64> {
    std::env::var("ADMIN_ROLE_IDS")
        .map(|raw| parse_role_ids(&raw))
        .unwrap_or_default()
}

/// Returns true when any of `member_roles` is in `allowed`.
///
/// An empty allow list authorizes nobody.
#[must_use]
pub fn has_authorized_role(member_roles: &[u64], allowed: &[u64]) -> bool {
    member_roles.iter().any(|role| allowed.contains(role))
}
