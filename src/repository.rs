use crate::{
    db::Database,
    error::StoreError,
    hosted::{HostedClients, Privilege, Select},
    models::{
        Blog, BlogInput, Capability, CapabilityInput, ContactInquiry, ContactInquiryInsert,
        NewTestimonial, RecordPatch, TESTIMONIAL_ALIASES, Testimonial, Work, WorkInput,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// LeadFilter
///
/// Optional narrowing of the admin lead list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Repository
///
/// Every persistence operation the handlers need, for all five entities. Handlers only
/// see this trait, which lets the tests drive the full router against an in-memory
/// implementation.
///
/// Blogs, work items and capabilities update by full replace (`replace_*`);
/// testimonials and contact inquiries update by partial merge (`merge_*`).
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Blogs ---
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError>;
    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
    async fn top_featured_blog(&self) -> Result<Option<Blog>, StoreError>;
    async fn create_blog(&self, input: BlogInput) -> Result<Blog, StoreError>;
    async fn replace_blog(&self, id: Uuid, input: BlogInput) -> Result<Option<Blog>, StoreError>;
    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Work items ---
    async fn list_work(&self) -> Result<Vec<Work>, StoreError>;
    async fn featured_work(&self, limit: i64) -> Result<Vec<Work>, StoreError>;
    async fn get_work(&self, id: Uuid) -> Result<Option<Work>, StoreError>;
    async fn create_work(&self, input: WorkInput) -> Result<Work, StoreError>;
    async fn replace_work(&self, id: Uuid, input: WorkInput) -> Result<Option<Work>, StoreError>;
    async fn delete_work(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Capabilities ---
    async fn list_capabilities(&self) -> Result<Vec<Capability>, StoreError>;
    async fn get_capability(&self, id: Uuid) -> Result<Option<Capability>, StoreError>;
    async fn create_capability(&self, input: CapabilityInput) -> Result<Capability, StoreError>;
    async fn replace_capability(
        &self,
        id: Uuid,
        input: CapabilityInput,
    ) -> Result<Option<Capability>, StoreError>;
    async fn delete_capability(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Testimonials ---
    async fn list_testimonials(
        &self,
        privilege: Privilege,
        featured_only: bool,
    ) -> Result<Vec<Testimonial>, StoreError>;
    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, StoreError>;
    async fn create_testimonial(&self, input: NewTestimonial) -> Result<Testimonial, StoreError>;
    async fn merge_testimonial(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<Testimonial>, StoreError>;
    async fn delete_testimonial(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Contact inquiries ---
    async fn list_inquiries(&self, filter: LeadFilter) -> Result<Vec<ContactInquiry>, StoreError>;
    async fn get_inquiry(&self, id: Uuid) -> Result<Option<ContactInquiry>, StoreError>;
    async fn create_inquiry(
        &self,
        privilege: Privilege,
        row: ContactInquiryInsert,
    ) -> Result<ContactInquiry, StoreError>;
    async fn merge_inquiry(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<ContactInquiry>, StoreError>;
    async fn delete_inquiry(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The shared handle to the persistence layer held by the application state.
pub type RepositoryState = Arc<dyn Repository>;

const TESTIMONIALS: &str = "testimonials";
const CONTACT_INQUIRIES: &str = "contact_inquiries";

const BLOG_COLUMNS: &str = "id, title, excerpt, content, image_url, category, date, read_time, \
     author, featured, top_featured, created_at, updated_at";
/// `BLOG_COLUMNS` qualified for statements that join another relation.
const BLOG_RETURNING: &str = "blogs.id, blogs.title, blogs.excerpt, blogs.content, \
     blogs.image_url, blogs.category, blogs.date, blogs.read_time, blogs.author, \
     blogs.featured, blogs.top_featured, blogs.created_at, blogs.updated_at";
const WORK_COLUMNS: &str = "id, title, description, image_url, category, date, client, \
     attendees, location, featured, created_at, updated_at";
const CAPABILITY_COLUMNS: &str = "id, image_url, image_text, title, tag, description, features, \
     sort_order, created_at, updated_at";

/// StoreRepository
///
/// Production `Repository`. Blogs, work items and capabilities go through the SQL
/// pool; testimonials and contact inquiries go through the hosted table API.
pub struct StoreRepository {
    db: Database,
    hosted: HostedClients,
}

impl StoreRepository {
    pub fn new(db: Database, hosted: HostedClients) -> Self {
        Self { db, hosted }
    }
}

#[async_trait]
impl Repository for StoreRepository {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC");
        self.db
            .fetch_all("blogs.list", sqlx::query_as::<_, Blog>(&sql))
            .await
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
        self.db
            .fetch_optional("blogs.get", sqlx::query_as::<_, Blog>(&sql).bind(id))
            .await
    }

    async fn top_featured_blog(&self) -> Result<Option<Blog>, StoreError> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE top_featured = true \
             ORDER BY updated_at DESC LIMIT 1"
        );
        self.db
            .fetch_optional("blogs.top_featured", sqlx::query_as::<_, Blog>(&sql))
            .await
    }

    /// create_blog
    ///
    /// When the new post is top-featured the flag is cleared on every other post in the
    /// same statement (data-modifying CTE), keeping the single-holder rule in one round trip.
    /// The insert reads from `cleared` so the clearing runs first; the partial unique
    /// index on `top_featured` would reject the new row otherwise.
    async fn create_blog(&self, input: BlogInput) -> Result<Blog, StoreError> {
        let sql = format!(
            r#"
            WITH cleared AS (
                UPDATE blogs SET top_featured = false WHERE top_featured AND $10
                RETURNING id
            )
            INSERT INTO blogs (title, excerpt, content, image_url, category, date, read_time,
                               author, featured, top_featured)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            FROM (SELECT COUNT(*) FROM cleared) AS demoted
            RETURNING {BLOG_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, Blog>(&sql)
            .bind(input.title)
            .bind(input.excerpt)
            .bind(input.content)
            .bind(input.image_url)
            .bind(input.category)
            .bind(input.date)
            .bind(input.read_time)
            .bind(input.author)
            .bind(input.featured)
            .bind(input.top_featured);
        self.db.fetch_one("blogs.create", query).await
    }

    async fn replace_blog(&self, id: Uuid, input: BlogInput) -> Result<Option<Blog>, StoreError> {
        let sql = format!(
            r#"
            WITH cleared AS (
                UPDATE blogs SET top_featured = false
                WHERE top_featured AND $10 AND id <> $11
                RETURNING id
            )
            UPDATE blogs
            SET title = $1, excerpt = $2, content = $3, image_url = $4, category = $5,
                date = $6, read_time = $7, author = $8, featured = $9, top_featured = $10,
                updated_at = NOW()
            FROM (SELECT COUNT(*) FROM cleared) AS demoted
            WHERE blogs.id = $11
            RETURNING {BLOG_RETURNING}
            "#
        );
        let query = sqlx::query_as::<_, Blog>(&sql)
            .bind(input.title)
            .bind(input.excerpt)
            .bind(input.content)
            .bind(input.image_url)
            .bind(input.category)
            .bind(input.date)
            .bind(input.read_time)
            .bind(input.author)
            .bind(input.featured)
            .bind(input.top_featured)
            .bind(id);
        self.db.fetch_optional("blogs.replace", query).await
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let rows = self
            .db
            .execute("blogs.delete", sqlx::query("DELETE FROM blogs WHERE id = $1").bind(id))
            .await?;
        Ok(rows > 0)
    }

    async fn list_work(&self) -> Result<Vec<Work>, StoreError> {
        let sql = format!("SELECT {WORK_COLUMNS} FROM our_work ORDER BY created_at DESC");
        self.db
            .fetch_all("work.list", sqlx::query_as::<_, Work>(&sql))
            .await
    }

    async fn featured_work(&self, limit: i64) -> Result<Vec<Work>, StoreError> {
        let sql = format!(
            "SELECT {WORK_COLUMNS} FROM our_work WHERE featured = true \
             ORDER BY created_at DESC LIMIT $1"
        );
        self.db
            .fetch_all("work.featured", sqlx::query_as::<_, Work>(&sql).bind(limit))
            .await
    }

    async fn get_work(&self, id: Uuid) -> Result<Option<Work>, StoreError> {
        let sql = format!("SELECT {WORK_COLUMNS} FROM our_work WHERE id = $1");
        self.db
            .fetch_optional("work.get", sqlx::query_as::<_, Work>(&sql).bind(id))
            .await
    }

    async fn create_work(&self, input: WorkInput) -> Result<Work, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO our_work (title, description, image_url, category, date, client,
                                  attendees, location, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {WORK_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, Work>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.image_url)
            .bind(input.category)
            .bind(input.date)
            .bind(input.client)
            .bind(input.attendees)
            .bind(input.location)
            .bind(input.featured);
        self.db.fetch_one("work.create", query).await
    }

    async fn replace_work(&self, id: Uuid, input: WorkInput) -> Result<Option<Work>, StoreError> {
        let sql = format!(
            r#"
            UPDATE our_work
            SET title = $1, description = $2, image_url = $3, category = $4, date = $5,
                client = $6, attendees = $7, location = $8, featured = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {WORK_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, Work>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.image_url)
            .bind(input.category)
            .bind(input.date)
            .bind(input.client)
            .bind(input.attendees)
            .bind(input.location)
            .bind(input.featured)
            .bind(id);
        self.db.fetch_optional("work.replace", query).await
    }

    async fn delete_work(&self, id: Uuid) -> Result<bool, StoreError> {
        let rows = self
            .db
            .execute("work.delete", sqlx::query("DELETE FROM our_work WHERE id = $1").bind(id))
            .await?;
        Ok(rows > 0)
    }

    async fn list_capabilities(&self) -> Result<Vec<Capability>, StoreError> {
        let sql = format!(
            "SELECT {CAPABILITY_COLUMNS} FROM capabilities ORDER BY sort_order ASC, created_at DESC"
        );
        self.db
            .fetch_all("capabilities.list", sqlx::query_as::<_, Capability>(&sql))
            .await
    }

    async fn get_capability(&self, id: Uuid) -> Result<Option<Capability>, StoreError> {
        let sql = format!("SELECT {CAPABILITY_COLUMNS} FROM capabilities WHERE id = $1");
        self.db
            .fetch_optional(
                "capabilities.get",
                sqlx::query_as::<_, Capability>(&sql).bind(id),
            )
            .await
    }

    async fn create_capability(&self, input: CapabilityInput) -> Result<Capability, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO capabilities (image_url, image_text, title, tag, description, features,
                                      sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CAPABILITY_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, Capability>(&sql)
            .bind(input.image_url)
            .bind(input.image_text)
            .bind(input.title)
            .bind(input.tag)
            .bind(input.description)
            .bind(input.features)
            .bind(input.sort_order);
        self.db.fetch_one("capabilities.create", query).await
    }

    async fn replace_capability(
        &self,
        id: Uuid,
        input: CapabilityInput,
    ) -> Result<Option<Capability>, StoreError> {
        let sql = format!(
            r#"
            UPDATE capabilities
            SET image_url = $1, image_text = $2, title = $3, tag = $4, description = $5,
                features = $6, sort_order = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {CAPABILITY_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, Capability>(&sql)
            .bind(input.image_url)
            .bind(input.image_text)
            .bind(input.title)
            .bind(input.tag)
            .bind(input.description)
            .bind(input.features)
            .bind(input.sort_order)
            .bind(id);
        self.db.fetch_optional("capabilities.replace", query).await
    }

    async fn delete_capability(&self, id: Uuid) -> Result<bool, StoreError> {
        let rows = self
            .db
            .execute(
                "capabilities.delete",
                sqlx::query("DELETE FROM capabilities WHERE id = $1").bind(id),
            )
            .await?;
        Ok(rows > 0)
    }

    async fn list_testimonials(
        &self,
        privilege: Privilege,
        featured_only: bool,
    ) -> Result<Vec<Testimonial>, StoreError> {
        let mut select = Select::new();
        if featured_only {
            select = select.eq("featured", true);
        }
        let select = select
            .order("sort_order", false)
            .order("created_at", true);
        self.hosted
            .with(privilege)
            .select(TESTIMONIALS, &select)
            .await
    }

    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, StoreError> {
        self.hosted.admin.select_by_id(TESTIMONIALS, id).await
    }

    async fn create_testimonial(&self, input: NewTestimonial) -> Result<Testimonial, StoreError> {
        self.hosted.admin.insert(TESTIMONIALS, &input).await
    }

    async fn merge_testimonial(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<Testimonial>, StoreError> {
        self.hosted
            .admin
            .update(TESTIMONIALS, id, &patch.into_columns(&TESTIMONIAL_ALIASES))
            .await
    }

    async fn delete_testimonial(&self, id: Uuid) -> Result<bool, StoreError> {
        self.hosted.admin.delete(TESTIMONIALS, id).await
    }

    async fn list_inquiries(&self, filter: LeadFilter) -> Result<Vec<ContactInquiry>, StoreError> {
        let mut select = Select::new();
        if let Some(status) = &filter.status {
            select = select.eq("status", status);
        }
        if let Some(priority) = &filter.priority {
            select = select.eq("priority", priority);
        }
        let select = select.order("created_at", true);
        self.hosted.admin.select(CONTACT_INQUIRIES, &select).await
    }

    async fn get_inquiry(&self, id: Uuid) -> Result<Option<ContactInquiry>, StoreError> {
        self.hosted.admin.select_by_id(CONTACT_INQUIRIES, id).await
    }

    async fn create_inquiry(
        &self,
        privilege: Privilege,
        row: ContactInquiryInsert,
    ) -> Result<ContactInquiry, StoreError> {
        self.hosted
            .with(privilege)
            .insert(CONTACT_INQUIRIES, &row)
            .await
    }

    async fn merge_inquiry(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<ContactInquiry>, StoreError> {
        self.hosted
            .admin
            .update(CONTACT_INQUIRIES, id, &patch.into_columns(&[]))
            .await
    }

    async fn delete_inquiry(&self, id: Uuid) -> Result<bool, StoreError> {
        self.hosted.admin.delete(CONTACT_INQUIRIES, id).await
    }
}
