use crate::{
    error::AppError,
    models::{
        ActivityLog, AdminDashboardStats, BlogPost, Category, ContentQualityScore, Disclaimer,
        NewActivityLog, NewsletterSubscriber, PostDraft, PostFilter, PublicPostFilter,
        QualityReport, RelatedPost, SitemapPost, Tag, User,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction, query_builder::QueryBuilder, types::Json};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for all persistence operations, so handlers can run against Postgres in
/// production and an in-memory double in tests.
///
/// Reads degrade to an empty result and log the failure. Writes return `Result` so that
/// unique violations surface as 409 and missing rows as 404.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User/Auth ---
    async fn get_user(&self, id: Uuid) -> Option<User>;

    // --- Public Post Retrieval ---
    // Must enforce published = true.
    async fn list_published_posts(&self, filter: &PublicPostFilter) -> Vec<BlogPost>;
    async fn get_published_post_by_slug(&self, slug: &str) -> Option<BlogPost>;
    async fn get_post_categories(&self, post_id: Uuid) -> Vec<Category>;
    async fn get_post_tags(&self, post_id: Uuid) -> Vec<Tag>;

    // --- Admin Post Management ---
    async fn list_posts(&self, filter: &PostFilter) -> Vec<BlogPost>;
    async fn get_post(&self, id: Uuid) -> Option<BlogPost>;
    // Inserts the row and its category/tag links atomically.
    async fn create_post(&self, draft: PostDraft) -> Result<BlogPost, AppError>;
    // Replaces the row and its links atomically. Ok(None) when the id is unknown.
    async fn update_post(&self, id: Uuid, draft: PostDraft)
    -> Result<Option<BlogPost>, AppError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError>;
    async fn set_post_published(
        &self,
        id: Uuid,
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError>;
    async fn bulk_set_published(
        &self,
        ids: &[Uuid],
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;
    async fn bulk_delete_posts(&self, ids: &[Uuid]) -> Result<u64, AppError>;

    // --- Scheduled Publishing ---
    async fn get_due_scheduled_posts(&self, now: DateTime<Utc>)
    -> Result<Vec<BlogPost>, AppError>;
    // Returns false if the post was no longer scheduled (published concurrently).
    async fn publish_scheduled_post(&self, id: Uuid, now: DateTime<Utc>)
    -> Result<bool, AppError>;

    // --- Sitemap ---
    async fn list_sitemap_posts(&self) -> Result<Vec<SitemapPost>, AppError>;
    async fn list_category_slugs(&self) -> Result<Vec<String>, AppError>;

    // --- Related Posts ---
    async fn post_ids_in_categories(&self, category_ids: &[Uuid]) -> Vec<Uuid>;
    async fn post_ids_with_tags(&self, tag_ids: &[Uuid]) -> Vec<Uuid>;
    // Published posts among `ids`, in the order of `ids`.
    async fn get_published_summaries(&self, ids: &[Uuid]) -> Vec<RelatedPost>;

    // --- Categories ---
    async fn list_categories(&self) -> Vec<Category>;
    async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>;
    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Option<Category>, AppError>;
    // Also removes the category from every post.
    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Tags ---
    async fn list_tags(&self) -> Vec<Tag>;
    async fn create_tag(&self, name: &str, slug: &str) -> Result<Tag, AppError>;
    async fn delete_tag(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Disclaimers ---
    async fn list_disclaimers(&self) -> Vec<Disclaimer>;
    async fn get_disclaimer(&self, id: Uuid) -> Option<Disclaimer>;
    // Highest active version with this name.
    async fn get_active_disclaimer(&self, name: &str) -> Option<Disclaimer>;
    async fn create_disclaimer(
        &self,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Disclaimer, AppError>;
    // Bumps `version` on every edit.
    async fn update_disclaimer(
        &self,
        id: Uuid,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError>;
    async fn set_disclaimer_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError>;
    async fn delete_disclaimer(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Newsletter ---
    // Idempotent: an existing address is reactivated.
    async fn subscribe(&self, email: &str) -> Result<NewsletterSubscriber, AppError>;
    async fn list_subscribers(&self, search: Option<&str>) -> Vec<NewsletterSubscriber>;
    async fn set_subscriber_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscriber>, AppError>;
    async fn delete_subscriber(&self, id: Uuid) -> Result<bool, AppError>;

    // --- Content Quality ---
    async fn save_quality_score(
        &self,
        post_id: Uuid,
        report: &QualityReport,
    ) -> Result<ContentQualityScore, AppError>;
    async fn get_quality_score(&self, post_id: Uuid) -> Option<ContentQualityScore>;

    // --- Activity Log ---
    async fn log_activity(&self, entry: NewActivityLog) -> Result<(), AppError>;
    async fn list_activity(&self, limit: i64) -> Vec<ActivityLog>;

    async fn get_stats(&self) -> AdminDashboardStats;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, featured_image, status, published, \
     published_at, scheduled_at, seo_title, seo_description, reading_time, author_id, \
     reviewer_id, created_at, updated_at";

const QUALITY_COLUMNS: &str = "post_id, overall_score, readability_score, seo_score, word_count, \
     has_disclaimer, has_sources, has_reviewer, issues, checked_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rewrites the category and tag links of a post inside the caller's transaction.
async fn replace_post_terms(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    category_ids: &[Uuid],
    tag_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    if !category_ids.is_empty() {
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;
    }

    sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
        .bind(post_id)
        .execute(&mut **tx)
        .await?;
    if !tag_ids.is_empty() {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) SELECT $1, UNNEST($2::uuid[])")
            .bind(post_id)
            .bind(tag_ids)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Restores the order of `ids` on a set of summaries fetched with `ANY($1)`.
fn order_by_ids(mut posts: Vec<RelatedPost>, ids: &[Uuid]) -> Vec<RelatedPost> {
    posts.sort_by_key(|post| ids.iter().position(|id| *id == post.id));
    posts
}

/// contains_pattern
///
/// `ILIKE` pattern matching `search` anywhere in the column. `%`, `_` and the escape
/// character itself are matched literally; queries pair it with `ESCAPE '\'`.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>("SELECT id, email, role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_user error: {:?}", e);
                None
            })
    }

    /// list_published_posts
    ///
    /// Filtering via QueryBuilder for safe parameterization. The base query strictly
    /// enforces `published = true`; category and tag filters match on slug.
    async fn list_published_posts(&self, filter: &PublicPostFilter) -> Vec<BlogPost> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {POST_COLUMNS} FROM blog_posts p WHERE p.published = true"
        ));

        if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
            builder.push(
                " AND EXISTS (SELECT 1 FROM post_categories pc \
                 JOIN categories c ON c.id = pc.category_id \
                 WHERE pc.post_id = p.id AND c.slug = ",
            );
            builder.push_bind(category.to_string());
            builder.push(")");
        }

        if let Some(tag) = filter.tag.as_deref().filter(|s| !s.is_empty()) {
            builder.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt \
                 JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ",
            );
            builder.push_bind(tag.to_string());
            builder.push(")");
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = contains_pattern(search);
            builder.push(" AND (p.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(r" ESCAPE '\' OR p.excerpt ILIKE ");
            builder.push_bind(pattern);
            builder.push(r" ESCAPE '\')");
        }

        builder.push(" ORDER BY p.published_at DESC NULLS LAST LIMIT ");
        builder.push_bind(filter.limit());
        builder.push(" OFFSET ");
        builder.push_bind(filter.offset());

        match builder.build_query_as::<BlogPost>().fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("list_published_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_published_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = $1 AND published = true");
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_published_post_by_slug error: {:?}", e);
                None
            })
    }

    async fn get_post_categories(&self, post_id: Uuid) -> Vec<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.slug, c.description, c.created_at
            FROM categories c
            JOIN post_categories pc ON pc.category_id = c.id
            WHERE pc.post_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post_categories error: {:?}", e);
            vec![]
        })
    }

    async fn get_post_tags(&self, post_id: Uuid) -> Vec<Tag> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.slug, t.created_at
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post_tags error: {:?}", e);
            vec![]
        })
    }

    /// list_posts
    ///
    /// Admin listing across every status, newest first.
    async fn list_posts(&self, filter: &PostFilter) -> Vec<BlogPost> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE 1 = 1"));

        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            builder.push(" AND title ILIKE ");
            builder.push_bind(contains_pattern(search));
            builder.push(r" ESCAPE '\'");
        }

        builder.push(" ORDER BY created_at DESC");

        match builder.build_query_as::<BlogPost>().fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("list_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_post(&self, id: Uuid) -> Option<BlogPost> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1");
        sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_post error: {:?}", e);
                None
            })
    }

    async fn create_post(&self, draft: PostDraft) -> Result<BlogPost, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, featured_image, status, published,
                published_at, scheduled_at, seo_title, seo_description, reading_time,
                author_id, reviewer_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {POST_COLUMNS}
            "#
        );
        let post = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(&draft.title)
            .bind(&draft.slug)
            .bind(&draft.excerpt)
            .bind(&draft.content)
            .bind(&draft.featured_image)
            .bind(draft.status)
            .bind(draft.published)
            .bind(draft.published_at)
            .bind(draft.scheduled_at)
            .bind(&draft.seo_title)
            .bind(&draft.seo_description)
            .bind(draft.reading_time)
            .bind(draft.author_id)
            .bind(draft.reviewer_id)
            .fetch_one(&mut *tx)
            .await?;

        replace_post_terms(&mut tx, post.id, &draft.category_ids, &draft.tag_ids).await?;
        tx.commit().await?;
        Ok(post)
    }

    async fn update_post(
        &self,
        id: Uuid,
        draft: PostDraft,
    ) -> Result<Option<BlogPost>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE blog_posts
            SET title = $2, slug = $3, excerpt = $4, content = $5, featured_image = $6,
                status = $7, published = $8, published_at = $9, scheduled_at = $10,
                seo_title = $11, seo_description = $12, reading_time = $13,
                author_id = $14, reviewer_id = $15, updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.slug)
            .bind(&draft.excerpt)
            .bind(&draft.content)
            .bind(&draft.featured_image)
            .bind(draft.status)
            .bind(draft.published)
            .bind(draft.published_at)
            .bind(draft.scheduled_at)
            .bind(&draft.seo_title)
            .bind(&draft.seo_description)
            .bind(draft.reading_time)
            .bind(draft.author_id)
            .bind(draft.reviewer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(post) = updated else {
            return Ok(None);
        };

        replace_post_terms(&mut tx, post.id, &draft.category_ids, &draft.tag_ids).await?;
        tx.commit().await?;
        Ok(Some(post))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        // Link rows cascade; quality scores cascade.
        let res = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// set_post_published
    ///
    /// Toggles publication and keeps `status` in step. A first publication stamps
    /// `published_at`; unpublishing keeps the stamp so a re-publish retains the original date.
    async fn set_post_published(
        &self,
        id: Uuid,
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, AppError> {
        let sql = format!(
            r#"
            UPDATE blog_posts
            SET published = $2,
                status = CASE WHEN $2 THEN 'published'::post_status ELSE 'draft'::post_status END,
                published_at = CASE WHEN $2 THEN COALESCE(published_at, $3) ELSE published_at END,
                scheduled_at = CASE WHEN $2 THEN NULL ELSE scheduled_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let post = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(id)
            .bind(published)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn bulk_set_published(
        &self,
        ids: &[Uuid],
        published: bool,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let res = sqlx::query(
            r#"
            UPDATE blog_posts
            SET published = $2,
                status = CASE WHEN $2 THEN 'published'::post_status ELSE 'draft'::post_status END,
                published_at = CASE WHEN $2 THEN COALESCE(published_at, $3) ELSE published_at END,
                scheduled_at = CASE WHEN $2 THEN NULL ELSE scheduled_at END,
                updated_at = NOW()
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .bind(published)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn bulk_delete_posts(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM blog_posts WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn get_due_scheduled_posts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, AppError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS} FROM blog_posts
            WHERE status = 'scheduled' AND published = false
              AND scheduled_at IS NOT NULL AND scheduled_at <= $1
            ORDER BY scheduled_at ASC
            "#
        );
        let posts = sqlx::query_as::<_, BlogPost>(&sql)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    /// publish_scheduled_post
    ///
    /// The `status = 'scheduled'` guard makes concurrent sweeps publish each post once.
    async fn publish_scheduled_post(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let res = sqlx::query(
            r#"
            UPDATE blog_posts
            SET status = 'published', published = true, published_at = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled' AND published = false
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_sitemap_posts(&self) -> Result<Vec<SitemapPost>, AppError> {
        let posts = sqlx::query_as::<_, SitemapPost>(
            r#"
            SELECT slug, updated_at, published_at FROM blog_posts
            WHERE published = true
            ORDER BY published_at DESC NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn list_category_slugs(&self) -> Result<Vec<String>, AppError> {
        let slugs = sqlx::query_scalar::<_, String>("SELECT slug FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(slugs)
    }

    async fn post_ids_in_categories(&self, category_ids: &[Uuid]) -> Vec<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT post_id FROM post_categories WHERE category_id = ANY($1)",
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("post_ids_in_categories error: {:?}", e);
            vec![]
        })
    }

    async fn post_ids_with_tags(&self, tag_ids: &[Uuid]) -> Vec<Uuid> {
        sqlx::query_scalar::<_, Uuid>("SELECT post_id FROM post_tags WHERE tag_id = ANY($1)")
            .bind(tag_ids)
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("post_ids_with_tags error: {:?}", e);
                vec![]
            })
    }

    async fn get_published_summaries(&self, ids: &[Uuid]) -> Vec<RelatedPost> {
        let posts = sqlx::query_as::<_, RelatedPost>(
            "SELECT id, title, slug, excerpt FROM blog_posts WHERE id = ANY($1) AND published = true",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_published_summaries error: {:?}", e);
            vec![]
        });
        order_by_ids(posts, ids)
    }

    // --- CATEGORIES ---

    async fn list_categories(&self) -> Vec<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_categories error: {:?}", e);
            vec![]
        })
    }

    async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description) VALUES ($1, $2, $3)
            RETURNING id, name, slug, description, created_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $2, slug = $3, description = $4
            WHERE id = $1
            RETURNING id, name, slug, description, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM post_categories WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    // --- TAGS ---

    async fn list_tags(&self) -> Vec<Tag> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug, created_at FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("list_tags error: {:?}", e);
                vec![]
            })
    }

    async fn create_tag(&self, name: &str, slug: &str) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) RETURNING id, name, slug, created_at",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(tag)
    }

    async fn delete_tag(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM post_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let res = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(res.rows_affected() > 0)
    }

    // --- DISCLAIMERS ---

    async fn list_disclaimers(&self) -> Vec<Disclaimer> {
        sqlx::query_as::<_, Disclaimer>(
            r#"
            SELECT id, name, content, is_active, version, created_at, updated_at
            FROM disclaimers ORDER BY name, version DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_disclaimers error: {:?}", e);
            vec![]
        })
    }

    async fn get_disclaimer(&self, id: Uuid) -> Option<Disclaimer> {
        sqlx::query_as::<_, Disclaimer>(
            r#"
            SELECT id, name, content, is_active, version, created_at, updated_at
            FROM disclaimers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_disclaimer error: {:?}", e);
            None
        })
    }

    async fn get_active_disclaimer(&self, name: &str) -> Option<Disclaimer> {
        sqlx::query_as::<_, Disclaimer>(
            r#"
            SELECT id, name, content, is_active, version, created_at, updated_at
            FROM disclaimers
            WHERE name = $1 AND is_active = true
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_active_disclaimer error: {:?}", e);
            None
        })
    }

    async fn create_disclaimer(
        &self,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Disclaimer, AppError> {
        let disclaimer = sqlx::query_as::<_, Disclaimer>(
            r#"
            INSERT INTO disclaimers (name, content, is_active, version) VALUES ($1, $2, $3, 1)
            RETURNING id, name, content, is_active, version, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(content)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(disclaimer)
    }

    async fn update_disclaimer(
        &self,
        id: Uuid,
        name: &str,
        content: &str,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError> {
        let disclaimer = sqlx::query_as::<_, Disclaimer>(
            r#"
            UPDATE disclaimers
            SET name = $2, content = $3, is_active = $4, version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, content, is_active, version, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(content)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(disclaimer)
    }

    async fn set_disclaimer_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Disclaimer>, AppError> {
        let disclaimer = sqlx::query_as::<_, Disclaimer>(
            r#"
            UPDATE disclaimers SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, content, is_active, version, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(disclaimer)
    }

    async fn delete_disclaimer(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM disclaimers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- NEWSLETTER ---

    async fn subscribe(&self, email: &str) -> Result<NewsletterSubscriber, AppError> {
        let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
            r#"
            INSERT INTO newsletter_subscribers (email) VALUES ($1)
            ON CONFLICT (email) DO UPDATE SET is_active = true
            RETURNING id, email, is_active, subscribed_at, created_at
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(subscriber)
    }

    async fn list_subscribers(&self, search: Option<&str>) -> Vec<NewsletterSubscriber> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, email, is_active, subscribed_at, created_at FROM newsletter_subscribers",
        );
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            builder.push(" WHERE email ILIKE ");
            builder.push_bind(contains_pattern(search));
            builder.push(r" ESCAPE '\'");
        }
        builder.push(" ORDER BY subscribed_at DESC");

        match builder
            .build_query_as::<NewsletterSubscriber>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(subscribers) => subscribers,
            Err(e) => {
                tracing::error!("list_subscribers error: {:?}", e);
                vec![]
            }
        }
    }

    async fn set_subscriber_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscriber>, AppError> {
        let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
            r#"
            UPDATE newsletter_subscribers SET is_active = $2 WHERE id = $1
            RETURNING id, email, is_active, subscribed_at, created_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(subscriber)
    }

    async fn delete_subscriber(&self, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- CONTENT QUALITY ---

    /// save_quality_score
    ///
    /// Upsert keyed on `post_id`: a post has at most one stored report, the latest.
    async fn save_quality_score(
        &self,
        post_id: Uuid,
        report: &QualityReport,
    ) -> Result<ContentQualityScore, AppError> {
        let sql = format!(
            r#"
            INSERT INTO content_quality_scores (
                post_id, overall_score, readability_score, seo_score, word_count,
                has_disclaimer, has_sources, has_reviewer, issues, checked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (post_id) DO UPDATE SET
                overall_score = EXCLUDED.overall_score,
                readability_score = EXCLUDED.readability_score,
                seo_score = EXCLUDED.seo_score,
                word_count = EXCLUDED.word_count,
                has_disclaimer = EXCLUDED.has_disclaimer,
                has_sources = EXCLUDED.has_sources,
                has_reviewer = EXCLUDED.has_reviewer,
                issues = EXCLUDED.issues,
                checked_at = EXCLUDED.checked_at
            RETURNING {QUALITY_COLUMNS}
            "#
        );
        let score = sqlx::query_as::<_, ContentQualityScore>(&sql)
            .bind(post_id)
            .bind(report.overall)
            .bind(report.readability)
            .bind(report.seo)
            .bind(report.word_count)
            .bind(report.has_disclaimer)
            .bind(report.has_sources)
            .bind(report.has_reviewer)
            .bind(Json(&report.issues))
            .fetch_one(&self.pool)
            .await?;
        Ok(score)
    }

    async fn get_quality_score(&self, post_id: Uuid) -> Option<ContentQualityScore> {
        let sql = format!("SELECT {QUALITY_COLUMNS} FROM content_quality_scores WHERE post_id = $1");
        sqlx::query_as::<_, ContentQualityScore>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_quality_score error: {:?}", e);
                None
            })
    }

    // --- ACTIVITY LOG ---

    async fn log_activity(&self, entry: NewActivityLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO admin_activity_logs (user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(entry.details.map(Json))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_activity(&self, limit: i64) -> Vec<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, action, entity_type, entity_id, details, created_at
            FROM admin_activity_logs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_activity error: {:?}", e);
            vec![]
        })
    }

    /// get_stats
    ///
    /// Compiles every dashboard counter in a single round trip.
    async fn get_stats(&self) -> AdminDashboardStats {
        sqlx::query_as::<_, AdminDashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM blog_posts) AS total_posts,
                (SELECT COUNT(*) FROM blog_posts WHERE published = true) AS published_posts,
                (SELECT COUNT(*) FROM blog_posts WHERE status = 'draft') AS draft_posts,
                (SELECT COUNT(*) FROM blog_posts WHERE status = 'editor_review') AS in_review_posts,
                (SELECT COUNT(*) FROM blog_posts
                    WHERE status = 'scheduled' AND published = false) AS scheduled_posts,
                (SELECT COUNT(*) FROM categories) AS total_categories,
                (SELECT COUNT(*) FROM tags) AS total_tags,
                (SELECT COUNT(*) FROM newsletter_subscribers WHERE is_active = true) AS active_subscribers
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_stats error: {:?}", e);
            AdminDashboardStats::default()
        })
    }
}
