//! Core roster and order logic, independent of Discord.

/// Item catalog and price formatting
pub mod catalog;
/// Publishing rendered lists and refreshing tracked list messages
pub mod display;
/// Order intake sessions
pub mod order;
/// Roster data model
pub mod participant;
/// List Renderer
pub mod render;
/// Roster Store
pub mod roster;
/// JSON file persistence
pub mod storage;
