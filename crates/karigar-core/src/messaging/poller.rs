//! Polling refresh for an open conversation.
//!
//! There is no push delivery: while a conversation view is open, a
//! background task re-reads the active thread and the conversation list on a
//! fixed interval and marks the active thread read for the viewing user.
//! Read-plus-mark-read only -- the poller never writes content.

use std::sync::Arc;
use std::time::Duration;

use karigar_types::booking::BookingId;
use karigar_types::message::Message;
use karigar_types::user::{Role, UserId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{ConversationSummary, MessagingService};
use crate::repository::booking::BookingRepository;
use crate::repository::message::MessageRepository;

/// What one poll tick observed.
#[derive(Debug, Clone, Default)]
pub struct ConversationSnapshot {
    /// The active thread, oldest first.
    pub thread: Vec<Message>,
    /// The viewer's conversation list, most recent activity first.
    pub conversations: Vec<ConversationSummary>,
}

/// A running conversation watch. Dropping it (or calling [`stop`]) cancels
/// the background task.
///
/// [`stop`]: ConversationWatch::stop
pub struct ConversationWatch {
    snapshots: watch::Receiver<ConversationSnapshot>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ConversationWatch {
    /// Receiver for the latest snapshot. `changed().await` wakes on each
    /// refresh.
    pub fn snapshots(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshots.clone()
    }

    /// Cancel the poll loop and wait for it to wind down.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ConversationWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the fixed-interval refresh for an open conversation.
///
/// Every `period` (2 s by default via [`AppConfig`]), the task marks the
/// thread read for `viewer` and publishes a fresh [`ConversationSnapshot`].
/// Storage errors are logged and the loop keeps going; the next tick
/// usually succeeds.
///
/// [`AppConfig`]: karigar_types::config::AppConfig
pub fn watch_conversation<M, B>(
    messaging: Arc<MessagingService<M, B>>,
    booking_id: BookingId,
    viewer: UserId,
    acting_as: Role,
    period: Duration,
) -> ConversationWatch
where
    M: MessageRepository + 'static,
    B: BookingRepository + 'static,
{
    let (tx, rx) = watch::channel(ConversationSnapshot::default());
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = loop_cancel.cancelled() => break,
                _ = interval.tick() => {
                    match refresh(&messaging, &booking_id, viewer, acting_as).await {
                        Ok(snapshot) => {
                            // Receivers may all be gone; that's not an error,
                            // cancellation will follow shortly.
                            let _ = tx.send(snapshot);
                        }
                        Err(e) => warn!(%booking_id, error = %e, "conversation refresh failed"),
                    }
                }
            }
        }
        debug!(%booking_id, "conversation watch stopped");
    });

    ConversationWatch {
        snapshots: rx,
        cancel,
        handle: Some(handle),
    }
}

async fn refresh<M, B>(
    messaging: &MessagingService<M, B>,
    booking_id: &BookingId,
    viewer: UserId,
    acting_as: Role,
) -> Result<ConversationSnapshot, karigar_types::error::MessageError>
where
    M: MessageRepository,
    B: BookingRepository,
{
    messaging.mark_read(booking_id, viewer).await?;
    let thread = messaging.thread(booking_id).await?;
    let conversations = messaging.conversations(viewer, acting_as).await?;
    Ok(ConversationSnapshot {
        thread,
        conversations,
    })
}
