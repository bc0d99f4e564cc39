//! Publishing rendered lists and keeping the tracked list message current.
//!
//! The actual message transport sits behind [`DisplaySink`]; the bot layer
//! provides a serenity implementation. A refresh never fails its caller: the
//! mutation that triggered it has already been saved.

use crate::{
    core::{
        participant::{EntityId, Roster, TrackedMessageRef},
        render::{RenderOptions, RenderedList, render},
        roster::RosterStore,
    },
    errors::Result,
};
use std::future::Future;
use tracing::{debug, warn};

/// Something that can post and edit rendered list messages.
pub trait DisplaySink {
    /// Posts a new list message in `channel_id` and returns its location.
    fn publish(
        &self,
        channel_id: u64,
        entity: &EntityId,
        roster: &Roster,
        rendered: &RenderedList,
    ) -> impl Future<Output = Result<TrackedMessageRef>> + Send;

    /// Edits a previously posted list message in place.
    fn update(
        &self,
        tracked: TrackedMessageRef,
        entity: &EntityId,
        roster: &Roster,
        rendered: &RenderedList,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Outcome of refreshing a tracked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The tracked message was edited
    Refreshed,
    /// No list message has been posted for this roster
    NotTracked,
    /// The sink could not update the message; logged and dropped
    Failed,
}

/// Renders the roster, posts it to `channel_id` and tracks the new message.
pub async fn publish_list<S: DisplaySink>(
    store: &RosterStore,
    sink: &S,
    options: &RenderOptions,
    entity: &EntityId,
    channel_id: u64,
) -> Result<TrackedMessageRef> {
    let roster = store.load(entity).await;
    let rendered = render(&roster, options);
    let tracked = sink.publish(channel_id, entity, &roster, &rendered).await?;
    store.set_tracked_message_ref(entity, tracked).await?;
    debug!("Tracking {entity} list at message {}", tracked.message_id);
    Ok(tracked)
}

/// Re-renders the roster into its tracked message, if there is one.
pub async fn refresh_tracked_list<S: DisplaySink>(
    store: &RosterStore,
    sink: &S,
    options: &RenderOptions,
    entity: &EntityId,
) -> RefreshOutcome {
    let roster = store.load(entity).await;
    let Some(tracked) = roster.tracked_message_ref else {
        return RefreshOutcome::NotTracked;
    };

    let rendered = render(&roster, options);
    match sink.update(tracked, entity, &roster, &rendered).await {
        Ok(()) => RefreshOutcome::Refreshed,
        Err(e) => {
            warn!(
                "Could not refresh {entity} list message {} in channel {}: {e}",
                tracked.message_id, tracked.channel_id
            );
            RefreshOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{input, setup_test_store};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        published: Mutex<Vec<(u64, String)>>,
        updated: Mutex<Vec<(TrackedMessageRef, String)>>,
        fail_updates: bool,
    }

    impl DisplaySink for RecordingSink {
        async fn publish(
            &self,
            channel_id: u64,
            _entity: &EntityId,
            _roster: &Roster,
            rendered: &RenderedList,
        ) -> Result<TrackedMessageRef> {
            let mut published = self.published.lock().unwrap();
            published.push((channel_id, rendered.body.clone()));
            Ok(TrackedMessageRef {
                channel_id,
                message_id: 1000 + published.len() as u64,
            })
        }

        async fn update(
            &self,
            tracked: TrackedMessageRef,
            _entity: &EntityId,
            _roster: &Roster,
            rendered: &RenderedList,
        ) -> Result<()> {
            if self.fail_updates {
                return Err(Error::DisplayRefresh {
                    message: "Unknown Message".to_string(),
                });
            }
            self.updated
                .lock()
                .unwrap()
                .push((tracked, rendered.footer()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publish_tracks_message() -> Result<()> {
        let store = setup_test_store();
        let sink = RecordingSink::default();
        let entity = store.entity("PS1")?;
        let options = RenderOptions::default();

        let tracked = publish_list(&store, &sink, &options, &entity, 55).await?;
        assert_eq!(tracked.channel_id, 55);
        assert_eq!(tracked.message_id, 1001);
        assert_eq!(store.load(&entity).await.tracked_message_ref, Some(tracked));
        assert_eq!(sink.published.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_without_tracked_message() -> Result<()> {
        let store = setup_test_store();
        let sink = RecordingSink::default();
        let entity = store.entity("PS2")?;

        let outcome = refresh_tracked_list(&store, &sink, &RenderOptions::default(), &entity).await;
        assert_eq!(outcome, RefreshOutcome::NotTracked);
        assert!(sink.updated.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_after_mutation() -> Result<()> {
        let store = setup_test_store();
        let sink = RecordingSink::default();
        let entity = store.entity("PS1")?;
        let options = RenderOptions::default();

        let tracked = publish_list(&store, &sink, &options, &entity, 7).await?;
        store.append(&entity, input("u1", "Alice", "AliceR")).await?;

        let outcome = refresh_tracked_list(&store, &sink, &options, &entity).await;
        assert_eq!(outcome, RefreshOutcome::Refreshed);
        let updated = sink.updated.lock().unwrap();
        assert_eq!(updated.as_slice(), &[(tracked, "1/20".to_string())]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_is_swallowed() -> Result<()> {
        let store = setup_test_store();
        let sink = RecordingSink {
            fail_updates: true,
            ..RecordingSink::default()
        };
        let entity = store.entity("PS1")?;
        let options = RenderOptions::default();
        publish_list(&store, &sink, &options, &entity, 7).await?;
        store.append(&entity, input("u1", "Alice", "AliceR")).await?;

        let outcome = refresh_tracked_list(&store, &sink, &options, &entity).await;
        assert_eq!(outcome, RefreshOutcome::Failed);
        // the mutation itself is kept
        assert_eq!(store.load(&entity).await.participants.len(), 1);
        Ok(())
    }
}
