//! List Renderer - projects a roster snapshot into a fixed 20-row numbered block.
//!
//! Rendering is pure: no I/O, and the same roster always yields the same output.

use crate::core::{
    participant::{Participant, Roster},
    roster::RosterPolicy,
};
use std::collections::HashSet;

/// Number of rows in every rendered list.
pub const DISPLAY_ROWS: usize = 20;

/// Glyph for `status == true`.
pub const STATUS_ON: &str = "✅";

/// Glyph for `status == false`.
pub const STATUS_OFF: &str = "❌";

/// Literal shown on the reserved last row.
pub const ADMIN_ROW: &str = "ADMIN";

/// Rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Capacity shown in the footer
    pub capacity: usize,
    /// Row 20 is the fixed admin row
    pub reserve_last_row: bool,
    /// Mention a repeated identity only on its first row
    pub dedupe_mentions: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            capacity: DISPLAY_ROWS,
            reserve_last_row: false,
            dedupe_mentions: true,
        }
    }
}

impl RenderOptions {
    /// Options matching a store policy.
    #[must_use]
    pub const fn from_policy(policy: &RosterPolicy, dedupe_mentions: bool) -> Self {
        Self {
            capacity: policy.capacity,
            reserve_last_row: policy.reserve_last_row,
            dedupe_mentions,
        }
    }
}

/// Result of rendering a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    /// Exactly [`DISPLAY_ROWS`] lines joined by `\n`
    pub body: String,
    /// Live (non-placeholder) participants
    pub participant_count: usize,
    /// Capacity shown in the footer
    pub capacity: usize,
}

impl RenderedList {
    /// Footer summary, e.g. `1/20`.
    #[must_use]
    pub fn footer(&self) -> String {
        format!("{}/{}", self.participant_count, self.capacity)
    }
}

/// Renders `roster` into numbered rows plus a participant count.
#[must_use]
pub fn render(roster: &Roster, options: &RenderOptions) -> RenderedList {
    let mut mentioned: HashSet<&str> = HashSet::new();
    let mut lines = Vec::with_capacity(DISPLAY_ROWS);

    for row in 1..=DISPLAY_ROWS {
        if options.reserve_last_row && row == DISPLAY_ROWS {
            lines.push(format!("{row}. {ADMIN_ROW}"));
            continue;
        }

        let line = match roster.participants.get(row - 1) {
            Some(p) if !p.is_placeholder() => {
                let mention = p
                    .identity()
                    .filter(|id| is_snowflake(id))
                    .filter(|id| !options.dedupe_mentions || mentioned.insert(*id));
                format_row(row, p, mention)
            }
            _ => format!("{row}. -"),
        };
        lines.push(line);
    }

    let participant_count = roster
        .participants
        .iter()
        .take(row_limit(options))
        .filter(|p| !p.is_placeholder())
        .count();

    RenderedList {
        body: lines.join("\n"),
        participant_count,
        capacity: if options.reserve_last_row {
            options.capacity.saturating_sub(1)
        } else {
            options.capacity
        },
    }
}

const fn row_limit(options: &RenderOptions) -> usize {
    if options.reserve_last_row {
        DISPLAY_ROWS - 1
    } else {
        DISPLAY_ROWS
    }
}

fn format_row(row: usize, participant: &Participant, mention: Option<&str>) -> String {
    let label = mention.map_or_else(
        || participant.display_name.clone(),
        |id| format!("<@{id}>"),
    );
    let mut line = format!("{row}. {label}");
    if !participant.secondary_handle.is_empty() {
        line.push(' ');
        line.push_str(&participant.secondary_handle);
    }
    line.push(' ');
    line.push_str(status_glyph(participant.status));
    line
}

/// Glyph for a status flag.
#[must_use]
pub const fn status_glyph(status: bool) -> &'static str {
    if status { STATUS_ON } else { STATUS_OFF }
}

/// Discord ids are numeric; anything else is shown as plain text.
fn is_snowflake(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::{Announcement, EntityId};

    fn roster_with(participants: Vec<Participant>) -> Roster {
        let mut roster = Roster::new(Announcement::from_template(
            "LIST {entity}",
            &EntityId::normalized("PS1"),
        ));
        roster.participants = participants;
        roster
    }

    #[test]
    fn test_always_twenty_rows() {
        for len in [0, 1, 7, 19, 20] {
            let participants = (0..len)
                .map(|n| Participant::new(None, format!("User{n}"), "R"))
                .collect();
            let rendered = render(&roster_with(participants), &RenderOptions::default());
            assert_eq!(rendered.body.lines().count(), DISPLAY_ROWS);
            assert_eq!(rendered.participant_count, len);
        }
    }

    #[test]
    fn test_single_participant_scenario() {
        let roster = roster_with(vec![Participant::new(Some("u1".into()), "Alice", "AliceR")]);
        let rendered = render(&roster, &RenderOptions::default());
        let lines: Vec<&str> = rendered.body.lines().collect();

        assert_eq!(lines[0], "1. Alice AliceR ✅");
        for (i, line) in lines.iter().enumerate().skip(1) {
            assert_eq!(*line, format!("{}. -", i + 1));
        }
        assert_eq!(rendered.footer(), "1/20");
    }

    #[test]
    fn test_numeric_identity_renders_mention() {
        let mut p = Participant::new(Some("123456".into()), "Alice", "AliceR");
        p.status = false;
        let rendered = render(&roster_with(vec![p]), &RenderOptions::default());
        assert_eq!(rendered.body.lines().next(), Some("1. <@123456> AliceR ❌"));
    }

    #[test]
    fn test_placeholders_render_empty_and_do_not_count() {
        let roster = roster_with(vec![
            Participant::new(None, "Alice", "AliceR"),
            Participant::new(None, "-", "-"),
            Participant::new(None, "", ""),
            Participant::new(None, "Dan", "DanR"),
        ]);
        let rendered = render(&roster, &RenderOptions::default());
        let lines: Vec<&str> = rendered.body.lines().collect();
        assert_eq!(lines[1], "2. -");
        assert_eq!(lines[2], "3. -");
        assert_eq!(lines[3], "4. Dan DanR ✅");
        assert_eq!(rendered.participant_count, 2);
    }

    #[test]
    fn test_reserved_admin_row() {
        let participants = (0..20)
            .map(|n| Participant::new(None, format!("User{n}"), "R"))
            .collect();
        let options = RenderOptions {
            reserve_last_row: true,
            ..RenderOptions::default()
        };
        let rendered = render(&roster_with(participants), &options);
        let lines: Vec<&str> = rendered.body.lines().collect();
        assert_eq!(lines.len(), DISPLAY_ROWS);
        assert_eq!(lines[19], "20. ADMIN");
        assert_eq!(rendered.participant_count, 19);
        assert_eq!(rendered.footer(), "19/19");
    }

    #[test]
    fn test_duplicate_identity_mentioned_once() {
        let roster = roster_with(vec![
            Participant::new(Some("42".into()), "Alice", "Main"),
            Participant::new(Some("42".into()), "Alice", "Alt"),
        ]);
        let rendered = render(&roster, &RenderOptions::default());
        let lines: Vec<&str> = rendered.body.lines().collect();
        assert_eq!(lines[0], "1. <@42> Main ✅");
        assert_eq!(lines[1], "2. Alice Alt ✅");

        let options = RenderOptions {
            dedupe_mentions: false,
            ..RenderOptions::default()
        };
        let rendered = render(&roster, &options);
        assert_eq!(rendered.body.lines().nth(1), Some("2. <@42> Alt ✅"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let roster = roster_with(vec![Participant::new(Some("7".into()), "Bo", "BoR")]);
        let options = RenderOptions::default();
        assert_eq!(render(&roster, &options), render(&roster, &options));
    }
}
