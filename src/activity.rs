//! Admin activity log.

use crate::{models::NewActivityLog, repository::Repository};
use uuid::Uuid;

/// Actor recorded for actions the server takes on its own (scheduled publishing).
pub const SYSTEM_USER_ID: Uuid = Uuid::nil();

/// Number of entries returned by the activity feed.
pub const ACTIVITY_FEED_LIMIT: i64 = 100;

/// record
///
/// Writes an activity entry. A failed write is logged and swallowed; the action it
/// describes has already happened.
pub async fn record(repo: &dyn Repository, entry: NewActivityLog) {
    let action = entry.action.clone();
    if let Err(e) = repo.log_activity(entry).await {
        tracing::warn!("Failed to record activity '{}': {}", action, e);
    }
}
