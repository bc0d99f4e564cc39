//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// General utility commands
pub mod general;

/// Order intake commands
pub mod order;

/// PS list commands
pub mod roster;

// Export commands
pub use general::*;
pub use order::*;
pub use roster::*;

/// Every top-level command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![ping(), help(), ps(), order()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree() {
        let commands = all_commands();
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ping", "help", "ps", "order"]);

        let ps = &commands[2];
        let subcommands: Vec<&str> = ps.subcommands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            subcommands,
            vec!["list", "add", "edit", "remove", "toggle", "clear", "announce", "purge"]
        );
        assert!(ps.subcommands.iter().all(|c| !c.checks.is_empty()));

        let order = &commands[3];
        assert_eq!(order.subcommands.len(), 7);
        assert!(order.subcommands.iter().all(|c| c.checks.is_empty()));
    }
}
