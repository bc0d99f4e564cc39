//! Unified error types for the roster bot.
//!
//! Input errors (`CapacityExceeded`, `SlotOutOfRange`, order-flow errors) carry
//! user-facing messages and are shown verbatim by the command error hook.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The entity identifier is not one of the configured rosters
    #[error("Unknown list '{id}'")]
    UnknownEntity {
        /// The identifier as supplied by the caller
        id: String,
    },

    /// The roster already holds its maximum number of live participants
    #[error("{entity} is full ({capacity}/{capacity})")]
    CapacityExceeded {
        /// Roster identifier
        entity: String,
        /// Effective user capacity
        capacity: usize,
    },

    /// Slot number outside `1..=len`
    #[error("Slot {slot} does not exist (list has {len} entries)")]
    SlotOutOfRange {
        /// Requested 1-based slot
        slot: usize,
        /// Current participant count
        len: usize,
    },

    /// Persisted roster state could not be read or written
    #[error("Storage failure at {path}: {message}")]
    Storage {
        /// File the operation targeted
        path: String,
        /// Underlying cause
        message: String,
    },

    /// A tracked list message could not be updated
    #[error("Display refresh failed: {message}")]
    DisplayRefresh {
        /// Underlying cause
        message: String,
    },

    /// No active order session for this channel and user
    #[error("No active order in this channel")]
    SessionNotFound,

    /// An order session already exists in this channel
    #[error("An order is already in progress in this channel")]
    SessionExists,

    /// The order step does not match the current stage
    #[error("Cannot {action} now: order is {stage}")]
    InvalidStage {
        /// Step the user attempted
        action: String,
        /// Current stage, rendered
        stage: String,
    },

    /// Item id not present in the catalog
    #[error("Unknown item '{id}'")]
    UnknownItem {
        /// Item id as supplied
        id: String,
    },

    /// Quantity must be at least one
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Quantity as supplied
        quantity: i64,
    },

    /// Payment method not offered
    #[error("Unknown payment method '{method}'")]
    UnknownPaymentMethod {
        /// Method as supplied
        method: String,
    },

    /// Rating outside 1..=5 or no confirmed order awaiting a rating
    #[error("Invalid rating: {message}")]
    InvalidRating {
        /// Why the rating was rejected
        message: String,
    },

    /// I/O error outside roster storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting error while building a message
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion error
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether the error is caused by user input rather than the bot itself.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity { .. }
                | Self::CapacityExceeded { .. }
                | Self::SlotOutOfRange { .. }
                | Self::SessionNotFound
                | Self::SessionExists
                | Self::InvalidStage { .. }
                | Self::UnknownItem { .. }
                | Self::InvalidQuantity { .. }
                | Self::UnknownPaymentMethod { .. }
                | Self::InvalidRating { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
