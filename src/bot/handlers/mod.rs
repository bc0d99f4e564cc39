//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete,
//! permission checks, list message publishing and gateway events.

/// Autocomplete handlers for roster ids, catalog items and payment methods
pub mod autocomplete;
/// Role-based permission checks
pub mod checks;
/// Serenity implementation of the list display sink
pub mod display;
/// Gateway events and background maintenance
pub mod events;
