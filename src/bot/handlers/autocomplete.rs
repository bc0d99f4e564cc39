//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from configuration, so they need no I/O.

use crate::{bot::BotData, errors::Error};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

fn matching<'a, I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let partial_lower = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.to_lowercase().contains(&partial_lower))
        .map(ToString::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests configured roster ids (PS1..PS7).
pub async fn autocomplete_entity(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        ctx.data().rosters.entities().iter().map(|e| e.as_str()),
        partial,
    )
}

/// Suggests catalog item ids.
pub async fn autocomplete_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        ctx.data().catalog.items().iter().map(|item| item.id.as_str()),
        partial,
    )
}

/// Suggests payment methods.
pub async fn autocomplete_payment_method(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(
        ctx.data().catalog.payment_methods().iter().map(String::as_str),
        partial,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let candidates = ["PS1", "PS2", "PS12"];
        assert_eq!(matching(candidates, "ps1"), vec!["PS1", "PS12"]);
        assert_eq!(matching(candidates, ""), vec!["PS1", "PS2", "PS12"]);
        assert!(matching(candidates, "x").is_empty());
    }

    #[test]
    fn test_matching_caps_suggestions() {
        let names: Vec<String> = (0..40).map(|n| format!("item{n}")).collect();
        let result = matching(names.iter().map(String::as_str), "item");
        assert_eq!(result.len(), MAX_SUGGESTIONS);
    }
}
