//! Scheduled-publish sweep.

use crate::{
    activity::{self, SYSTEM_USER_ID},
    error::AppError,
    models::{NewActivityLog, PublishFailure, PublishReport, PublishedPostRef},
    repository::RepositoryState,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::time::Duration;
use tokio::task::JoinHandle;

/// publish_due_posts
///
/// Publishes every scheduled post whose `scheduled_at` has passed. A failure on one post
/// is recorded in the report and does not stop the sweep. Only the initial lookup can fail
/// the whole call.
pub async fn publish_due_posts(
    repo: &RepositoryState,
    now: DateTime<Utc>,
) -> Result<PublishReport, AppError> {
    let due = repo.get_due_scheduled_posts(now).await?;

    if due.is_empty() {
        return Ok(PublishReport {
            message: "No posts to publish".to_string(),
            published: 0,
            posts: vec![],
            errors: vec![],
        });
    }

    let mut posts = Vec::new();
    let mut errors = Vec::new();

    for post in due {
        match repo.publish_scheduled_post(post.id, now).await {
            Ok(true) => {
                tracing::info!("Auto-published scheduled post {} ({})", post.id, post.slug);
                activity::record(
                    repo.as_ref(),
                    NewActivityLog::new(
                        SYSTEM_USER_ID,
                        "auto_publish_scheduled",
                        "blog_post",
                        Some(post.id),
                    )
                    .with_details(json!({
                        "title": post.title,
                        "scheduled_at": post.scheduled_at,
                    })),
                )
                .await;
                posts.push(PublishedPostRef {
                    id: post.id,
                    title: post.title,
                    slug: post.slug,
                });
            }
            // Another sweep got there first.
            Ok(false) => {
                tracing::debug!("Scheduled post {} was already published", post.id);
            }
            Err(e) => {
                tracing::error!("Failed to publish scheduled post {}: {}", post.id, e);
                errors.push(PublishFailure {
                    id: post.id,
                    title: post.title,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(PublishReport {
        message: format!("Published {} posts", posts.len()),
        published: posts.len(),
        posts,
        errors,
    })
}

/// spawn_publish_sweeper
///
/// Runs `publish_due_posts` every `period` on a background task for the lifetime of the
/// process.
pub fn spawn_publish_sweeper(repo: RepositoryState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match publish_due_posts(&repo, Utc::now()).await {
                Ok(report) if report.published > 0 || !report.errors.is_empty() => {
                    tracing::info!(
                        published = report.published,
                        failed = report.errors.len(),
                        "Scheduled publish sweep finished"
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Scheduled publish sweep failed: {}", e),
            }
        }
    })
}
