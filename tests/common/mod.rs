#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use health_blog::{
    AppConfig, AppState,
    auth::AuthUser,
    error::AppError,
    models::{
        ActivityLog, AdminDashboardStats, BlogPost, Category, ContentQualityScore, Disclaimer,
        NewActivityLog, NewsletterSubscriber, PostDraft, PostFilter, PostStatus,
        PublicPostFilter, QualityReport, RelatedPost, SitemapPost, Tag, User,
    },
    repository::{Repository, RepositoryState},
    storage::{MockStorageService, StorageState},
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const DUPLICATE: &str = "A record with this name already exists";

/// Tables of the fake database.
#[derive(Default)]
pub struct Store {
    pub users: Vec<User>,
    pub posts: Vec<BlogPost>,
    pub post_categories: Vec<(Uuid, Uuid)>,
    pub post_tags: Vec<(Uuid, Uuid)>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub disclaimers: Vec<Disclaimer>,
    pub subscribers: Vec<NewsletterSubscriber>,
    pub quality: Vec<ContentQualityScore>,
    pub activity: Vec<ActivityLog>,
}

/// InMemoryRepository
///
/// A `Repository` with the same observable semantics as the Postgres one, plus switches to
/// simulate failures.
#[derive(Default)]
pub struct InMemoryRepository {
    pub store: Mutex<Store>,
    /// Posts whose scheduled publication fails.
    pub fail_publish: Mutex<Vec<Uuid>>,
    pub fail_sitemap: Mutex<bool>,
    pub fail_activity: Mutex<bool>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, role: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store.lock().unwrap().users.push(User {
            id,
            email: format!("{}@example.com", &id.simple().to_string()[..8]),
            role: role.to_string(),
        });
        id
    }

    pub fn insert_post(&self, post: BlogPost) -> BlogPost {
        self.store.lock().unwrap().posts.push(post.clone());
        post
    }

    pub fn insert_category(&self, name: &str, slug: &str) -> Category {
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            created_at: Utc::now(),
        };
        self.store.lock().unwrap().categories.push(category.clone());
        category
    }

    pub fn insert_tag(&self, name: &str, slug: &str) -> Tag {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now(),
        };
        self.store.lock().unwrap().tags.push(tag.clone());
        tag
    }

    pub fn insert_disclaimer(&self, name: &str, content: &str, version: i32, active: bool) {
        self.store.lock().unwrap().disclaimers.push(Disclaimer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content: content.to_string(),
            is_active: active,
            version,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn link_category(&self, post_id: Uuid, category_id: Uuid) {
        self.store
            .lock()
            .unwrap()
            .post_categories
            .push((post_id, category_id));
    }

    pub fn link_tag(&self, post_id: Uuid, tag_id: Uuid) {
        self.store.lock().unwrap().post_tags.push((post_id, tag_id));
    }

    pub fn post(&self, id: Uuid) -> Option<BlogPost> {
        self.store
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn activity_actions(&self) -> Vec<String> {
        self.store
            .lock()
            .unwrap()
            .activity
            .iter()
            .map(|a| a.action.clone())
            .collect()
    }

    pub fn activity(&self) -> Vec<ActivityLog> {
        self.store.lock().unwrap().activity.clone()
    }
}

fn replace_links(links: &mut Vec<(Uuid, Uuid)>, post_id: Uuid, ids: &[Uuid]) {
    links.retain(|(p, _)| *p != post_id);
    links.extend(ids.iter().map(|id| (post_id, *id)));
}

fn apply_published(post: &mut BlogPost, published: bool, now: DateTime<Utc>) {
    post.published = published;
    if published {
        post.status = PostStatus::Published;
        post.published_at = post.published_at.or(Some(now));
        post.scheduled_at = None;
    } else {
        post.status = PostStatus::Draft;
    }
    post.updated_at = Utc::now();
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    async fn list_published_posts(&self, filter: &PublicPostFilter) -> Vec<BlogPost> {
        let store = self.store.lock().unwrap();
        let category_id = filter.category.as_ref().and_then(|slug| {
            store
                .categories
                .iter()
                .find(|c| &c.slug == slug)
                .map(|c| c.id)
        });
        let tag_id = filter
            .tag
            .as_ref()
            .and_then(|slug| store.tags.iter().find(|t| &t.slug == slug).map(|t| t.id));

        let mut posts: Vec<BlogPost> = store
            .posts
            .iter()
            .filter(|p| p.published)
            .filter(|p| match &filter.category {
                None => true,
                Some(_) => category_id
                    .map(|c| store.post_categories.contains(&(p.id, c)))
                    .unwrap_or(false),
            })
            .filter(|p| match &filter.tag {
                None => true,
                Some(_) => tag_id
                    .map(|t| store.post_tags.contains(&(p.id, t)))
                    .unwrap_or(false),
            })
            .filter(|p| match &filter.search {
                None => true,
                Some(s) => {
                    contains_ci(&p.title, s)
                        || p.excerpt.as_deref().map(|e| contains_ci(e, s)).unwrap_or(false)
                }
            })
            .cloned()
            .collect();

        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect()
    }

    async fn get_published_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        self.store
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.slug == slug && p.published)
            .cloned()
    }

    async fn get_post_categories(&self, post_id: Uuid) -> Vec<Category> {
        let store = self.store.lock().unwrap();
        let mut categories: Vec<Category> = store
            .categories
            .iter()
            .filter(|c| store.post_categories.contains(&(post_id, c.id)))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    async fn get_post_tags(&self, post_id: Uuid) -> Vec<Tag> {
        let store = self.store.lock().unwrap();
        let mut tags: Vec<Tag> = store
            .tags
            .iter()
            .filter(|t| store.post_tags.contains(&(post_id, t.id)))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    async fn list_posts(&self, filter: &PostFilter) -> Vec<BlogPost> {
        let store = self.store.lock().unwrap();
        let mut posts: Vec<BlogPost> = store
            .posts
            .iter()
            .filter(|p| filter.status.map(|s| p.status == s).unwrap_or(true))
            .filter(|p| {
                filter
                    .search
                    .as_deref()
                    .map(|s| contains_ci(&p.title, s))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    async fn get_post(&self, id: Uuid) -> Option<BlogPost> {
        self.post(id)
    }

    async fn create_post(&self, draft: PostDraft) -> Result<BlogPost, AppError> {
        let mut store = self.store.lock().unwrap();
        if store.posts.iter().any(|p| p.slug == draft.slug) {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            excerpt: draft.excerpt,
            content: draft.content,
            featured_image: draft.featured_image,
            status: draft.status,
            published: draft.published,
            published_at: draft.published_at,
            scheduled_at: draft.scheduled_at,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            reading_time: draft.reading_time,
            author_id: draft.author_id,
            reviewer_id: draft.reviewer_id,
            created_at: now,
            updated_at: now,
        };
        store.posts.push(post.clone());
        replace_links(&mut store.post_categories, post.id, &draft.category_ids);
        replace_links(&mut store.post_tags, post.id, &draft.tag_ids);
        Ok(post)
    }

    async fn update_post(
        &self,
        id: Uuid,
        draft: PostDraft,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut store = self.store.lock().unwrap();
        if store
            .posts
            .iter()
            .any(|p| p.slug == draft.slug && p.id != id)
        {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }
        let Some(post) = store.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.title = draft.title;
        post.slug = draft.slug;
        post.excerpt = draft.excerpt;
        post.content = draft.content;
        post.featured_image = draft.featured_image;
        post.status = draft.status;
        post.published = draft.published;
        post.published_at = draft.published_at;
        post.scheduled_at = draft.scheduled_at;
        post.seo_title = draft.seo_title;
        post.seo_description = draft.seo_description;
        post.reading_time = draft.reading_time;
        post.author_id = draft.author_id;
        post.reviewer_id = draft.reviewer_id;
        post.updated_at = Utc::now();
        let updated = post.clone();
        replace_links(&mut store.post_categories, id, &draft.category_ids);
        replace_links(&mut store.post_tags, id, &draft.tag_ids);
        Ok(Some(updated))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();
        let before = store.posts.len();
        store.posts.retain(|p| p.id != id);
        store.post_categories.retain(|(p, _)| *p != id);
        store.post_tags.retain(|(p, _)| *p != id);
        store.quality.retain(|q| q.post_id != id);
        Ok(store.posts.len() < before)
    }

    async fn set_post_published(
        &self,
        id: Uuid,
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.posts.iter_mut().find(|p| p.id == id).map(|post| {
            apply_published(post, published, now);
            post.clone()
        }))
    }

    async fn bulk_set_published(
        &self,
        ids: &[Uuid],
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut store = self.store.lock().unwrap();
        let mut affected = 0;
        for post in store.posts.iter_mut().filter(|p| ids.contains(&p.id)) {
            apply_published(post, published, now);
            affected += 1;
        }
        Ok(affected)
    }

    async fn bulk_delete_posts(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut store = self.store.lock().unwrap();
        let before = store.posts.len();
        store.posts.retain(|p| !ids.contains(&p.id));
        store.post_categories.retain(|(p, _)| !ids.contains(p));
        store.post_tags.retain(|(p, _)| !ids.contains(p));
        Ok((before - store.posts.len()) as u64)
    }

    async fn get_due_scheduled_posts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, AppError> {
        let store = self.store.lock().unwrap();
        let mut due: Vec<BlogPost> = store
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Scheduled && !p.published)
            .filter(|p| p.scheduled_at.map(|at| at <= now).unwrap_or(false))
            .cloned()
            .collect();
        due.sort_by_key(|p| p.scheduled_at);
        Ok(due)
    }

    async fn publish_scheduled_post(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if self.fail_publish.lock().unwrap().contains(&id) {
            return Err(AppError::Database("connection reset".to_string()));
        }
        let mut store = self.store.lock().unwrap();
        match store
            .posts
            .iter_mut()
            .find(|p| p.id == id && p.status == PostStatus::Scheduled && !p.published)
        {
            Some(post) => {
                post.status = PostStatus::Published;
                post.published = true;
                post.published_at = Some(now);
                post.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_sitemap_posts(&self) -> Result<Vec<SitemapPost>, AppError> {
        if *self.fail_sitemap.lock().unwrap() {
            return Err(AppError::Database("relation does not exist".to_string()));
        }
        let store = self.store.lock().unwrap();
        let mut posts: Vec<&BlogPost> = store.posts.iter().filter(|p| p.published).collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts
            .into_iter()
            .map(|p| SitemapPost {
                slug: p.slug.clone(),
                updated_at: Some(p.updated_at),
                published_at: p.published_at,
            })
            .collect())
    }

    async fn list_category_slugs(&self) -> Result<Vec<String>, AppError> {
        let store = self.store.lock().unwrap();
        let mut categories = store.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories.into_iter().map(|c| c.slug).collect())
    }

    async fn post_ids_in_categories(&self, category_ids: &[Uuid]) -> Vec<Uuid> {
        self.store
            .lock()
            .unwrap()
            .post_categories
            .iter()
            .filter(|(_, c)| category_ids.contains(c))
            .map(|(p, _)| *p)
            .collect()
    }

    async fn post_ids_with_tags(&self, tag_ids: &[Uuid]) -> Vec<Uuid> {
        self.store
            .lock()
            .unwrap()
            .post_tags
            .iter()
            .filter(|(_, t)| tag_ids.contains(t))
            .map(|(p, _)| *p)
            .collect()
    }

    async fn get_published_summaries(&self, ids: &[Uuid]) -> Vec<RelatedPost> {
        let store = self.store.lock().unwrap();
        ids.iter()
            .filter_map(|id| store.posts.iter().find(|p| p.id == *id && p.published))
            .map(|p| RelatedPost {
                id: p.id,
                title: p.title.clone(),
                slug: p.slug.clone(),
                excerpt: p.excerpt.clone(),
            })
            .collect()
    }

    async fn list_categories(&self) -> Vec<Category> {
        let mut categories = self.store.lock().unwrap().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        let mut store = self.store.lock().unwrap();
        if store.categories.iter().any(|c| c.slug == slug) {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Option<Category>, AppError> {
        let mut store = self.store.lock().unwrap();
        if store.categories.iter().any(|c| c.slug == slug && c.id != id) {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }
        Ok(store.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.slug = slug.to_string();
            c.description = description.map(str::to_string);
            c.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();
        store.post_categories.retain(|(_, c)| *c != id);
        let before = store.categories.len();
        store.categories.retain(|c| c.id != id);
        Ok(store.categories.len() < before)
    }

    async fn list_tags(&self) -> Vec<Tag> {
        let mut tags = self.store.lock().unwrap().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    async fn create_tag(&self, name: &str, slug: &str) -> Result<Tag, AppError> {
        let mut store = self.store.lock().unwrap();
        if store.tags.iter().any(|t| t.slug == slug) {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now(),
        };
        store.tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();
        store.post_tags.retain(|(_, t)| *t != id);
        let before = store.tags.len();
        store.tags.retain(|t| t.id != id);
        Ok(store.tags.len() < before)
    }

    async fn list_disclaimers(&self) -> Vec<Disclaimer> {
        self.store.lock().unwrap().disclaimers.clone()
    }

    async fn get_disclaimer(&self, id: Uuid) -> Option<Disclaimer> {
        self.store
            .lock()
            .unwrap()
            .disclaimers
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    async fn get_active_disclaimer(&self, name: &str) -> Option<Disclaimer> {
        self.store
            .lock()
            .unwrap()
            .disclaimers
            .iter()
            .filter(|d| d.name == name && d.is_active)
            .max_by_key(|d| d.version)
            .cloned()
    }

    async fn create_disclaimer(
        &self,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Disclaimer, AppError> {
        let disclaimer = Disclaimer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content: content.to_string(),
            is_active,
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.store
            .lock()
            .unwrap()
            .disclaimers
            .push(disclaimer.clone());
        Ok(disclaimer)
    }

    async fn update_disclaimer(
        &self,
        id: Uuid,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.disclaimers.iter_mut().find(|d| d.id == id).map(|d| {
            d.name = name.to_string();
            d.content = content.to_string();
            d.is_active = is_active;
            d.version += 1;
            d.updated_at = Utc::now();
            d.clone()
        }))
    }

    async fn set_disclaimer_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.disclaimers.iter_mut().find(|d| d.id == id).map(|d| {
            d.is_active = is_active;
            d.clone()
        }))
    }

    async fn delete_disclaimer(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();
        let before = store.disclaimers.len();
        store.disclaimers.retain(|d| d.id != id);
        Ok(store.disclaimers.len() < before)
    }

    async fn subscribe(&self, email: &str) -> Result<NewsletterSubscriber, AppError> {
        let mut store = self.store.lock().unwrap();
        if let Some(existing) = store.subscribers.iter_mut().find(|s| s.email == email) {
            existing.is_active = true;
            return Ok(existing.clone());
        }
        let subscriber = NewsletterSubscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_active: true,
            subscribed_at: Utc::now(),
            created_at: Utc::now(),
        };
        store.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn list_subscribers(&self, search: Option<&str>) -> Vec<NewsletterSubscriber> {
        let mut subscribers: Vec<NewsletterSubscriber> = self
            .store
            .lock()
            .unwrap()
            .subscribers
            .iter()
            .filter(|s| search.map(|q| contains_ci(&s.email, q)).unwrap_or(true))
            .cloned()
            .collect();
        subscribers.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        subscribers
    }

    async fn set_subscriber_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscriber>, AppError> {
        let mut store = self.store.lock().unwrap();
        Ok(store.subscribers.iter_mut().find(|s| s.id == id).map(|s| {
            s.is_active = is_active;
            s.clone()
        }))
    }

    async fn delete_subscriber(&self, id: Uuid) -> Result<bool, AppError> {
        let mut store = self.store.lock().unwrap();
        let before = store.subscribers.len();
        store.subscribers.retain(|s| s.id != id);
        Ok(store.subscribers.len() < before)
    }

    async fn save_quality_score(
        &self,
        post_id: Uuid,
        report: &QualityReport,
    ) -> Result<ContentQualityScore, AppError> {
        let score = ContentQualityScore {
            post_id,
            overall_score: report.overall,
            readability_score: report.readability,
            seo_score: report.seo,
            word_count: report.word_count,
            has_disclaimer: report.has_disclaimer,
            has_sources: report.has_sources,
            has_reviewer: report.has_reviewer,
            issues: report.issues.clone(),
            checked_at: Utc::now(),
        };
        let mut store = self.store.lock().unwrap();
        store.quality.retain(|q| q.post_id != post_id);
        store.quality.push(score.clone());
        Ok(score)
    }

    async fn get_quality_score(&self, post_id: Uuid) -> Option<ContentQualityScore> {
        self.store
            .lock()
            .unwrap()
            .quality
            .iter()
            .find(|q| q.post_id == post_id)
            .cloned()
    }

    async fn log_activity(&self, entry: NewActivityLog) -> Result<(), AppError> {
        if *self.fail_activity.lock().unwrap() {
            return Err(AppError::Database("activity table locked".to_string()));
        }
        self.store.lock().unwrap().activity.push(ActivityLog {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            details: entry.details,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_activity(&self, limit: i64) -> Vec<ActivityLog> {
        self.store
            .lock()
            .unwrap()
            .activity
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect()
    }

    async fn get_stats(&self) -> AdminDashboardStats {
        let store = self.store.lock().unwrap();
        let count = |f: &dyn Fn(&BlogPost) -> bool| store.posts.iter().filter(|p| f(p)).count() as i64;
        AdminDashboardStats {
            total_posts: store.posts.len() as i64,
            published_posts: count(&|p| p.published),
            draft_posts: count(&|p| p.status == PostStatus::Draft),
            in_review_posts: count(&|p| p.status == PostStatus::EditorReview),
            scheduled_posts: count(&|p| p.status == PostStatus::Scheduled && !p.published),
            total_categories: store.categories.len() as i64,
            total_tags: store.tags.len() as i64,
            active_subscribers: store.subscribers.iter().filter(|s| s.is_active).count() as i64,
        }
    }
}

// --- Fixtures ---

pub fn post_fixture(title: &str, slug: &str, status: PostStatus) -> BlogPost {
    let now = Utc::now();
    let published = status == PostStatus::Published;
    BlogPost {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        excerpt: Some(format!("About {}", title)),
        content: format!("<p>{}</p>", title),
        status,
        published,
        published_at: published.then_some(now - Duration::days(1)),
        reading_time: 1,
        author_id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        ..BlogPost::default()
    }
}

pub fn scheduled_fixture(title: &str, slug: &str, at: DateTime<Utc>) -> BlogPost {
    BlogPost {
        scheduled_at: Some(at),
        ..post_fixture(title, slug, PostStatus::Scheduled)
    }
}

pub fn admin(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        role: "admin".to_string(),
    }
}

pub fn reader(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        role: "user".to_string(),
    }
}

pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    test_state_with_storage(repo, MockStorageService::new())
}

pub fn test_state_with_storage(
    repo: Arc<InMemoryRepository>,
    storage: MockStorageService,
) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        storage: Arc::new(storage) as StorageState,
        config: AppConfig::default(),
    }
}
