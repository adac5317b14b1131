//! Related-post suggestions.
//!
//! Two posts are related when they share a category or a tag. Candidates come from the
//! join tables; only published posts are suggested and the current post is never included.

use crate::{models::RelatedPost, repository::Repository};
use std::collections::HashSet;
use uuid::Uuid;

/// How many candidates each side (categories, tags) contributes.
pub const RELATED_LIMIT: usize = 5;

/// Deduplicates ids keeping first occurrences in order, dropping `exclude`.
pub fn unique_in_order(ids: Vec<Uuid>, exclude: Option<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| Some(*id) != exclude)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Concatenates category matches then tag matches, keeping the first post per id.
pub fn merge_unique(by_category: Vec<RelatedPost>, by_tag: Vec<RelatedPost>) -> Vec<RelatedPost> {
    let mut seen = HashSet::new();
    by_category
        .into_iter()
        .chain(by_tag)
        .filter(|post| seen.insert(post.id))
        .collect()
}

/// suggest_related
///
/// Set-intersection lookup over `post_categories` and `post_tags`. Each side takes the first
/// `RELATED_LIMIT` candidate ids before filtering to published posts, so a side may yield
/// fewer than the limit even when more published matches exist. The merged list holds at
/// most `2 * RELATED_LIMIT` posts.
pub async fn suggest_related(
    repo: &dyn Repository,
    post_id: Option<Uuid>,
    category_ids: &[Uuid],
    tag_ids: &[Uuid],
) -> Vec<RelatedPost> {
    let by_category = if category_ids.is_empty() {
        vec![]
    } else {
        let ids = unique_in_order(repo.post_ids_in_categories(category_ids).await, post_id);
        let ids: Vec<Uuid> = ids.into_iter().take(RELATED_LIMIT).collect();
        if ids.is_empty() {
            vec![]
        } else {
            repo.get_published_summaries(&ids).await
        }
    };

    let by_tag = if tag_ids.is_empty() {
        vec![]
    } else {
        let ids = unique_in_order(repo.post_ids_with_tags(tag_ids).await, post_id);
        let ids: Vec<Uuid> = ids.into_iter().take(RELATED_LIMIT).collect();
        if ids.is_empty() {
            vec![]
        } else {
            repo.get_published_summaries(&ids).await
        }
    };

    merge_unique(by_category, by_tag)
}
