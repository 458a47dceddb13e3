#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use chrono::{DateTime, Duration, Utc};
use intellsys_portal::{
    AppConfig, AppState, MockStorageService, create_router,
    error::StoreError,
    hosted::Privilege,
    models::{
        Blog, BlogInput, Capability, CapabilityInput, ContactInquiry, ContactInquiryInsert,
        NewTestimonial, RecordPatch, TESTIMONIAL_ALIASES, Testimonial, Work, WorkInput,
    },
    repository::{LeadFilter, Repository},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI64, Ordering},
};
use tower::util::ServiceExt;
use uuid::Uuid;

// --- In-memory repository ---

/// InMemoryRepository
///
/// Behaves like the production repository as far as the handlers can tell: store
/// assigned ids and timestamps, newest-first and sort-order listings, full replace on
/// the SQL-path entities and key merge on the hosted-path ones. With `failing` set,
/// every call errors like an unreachable store.
#[derive(Default)]
pub struct InMemoryRepository {
    pub failing: bool,
    clock: AtomicI64,
    blogs: Mutex<Vec<Blog>>,
    work: Mutex<Vec<Work>>,
    capabilities: Mutex<Vec<Capability>>,
    testimonials: Mutex<Vec<Testimonial>>,
    inquiries: Mutex<Vec<ContactInquiry>>,
    pub last_inquiry_privilege: Mutex<Option<Privilege>>,
    pub last_testimonial_privilege: Mutex<Option<Privilege>>,
}

impl InMemoryRepository {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Strictly increasing timestamps so ordering assertions are deterministic.
    fn now(&self) -> DateTime<Utc> {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::seconds(tick)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Hosted {
                status: 503,
                message: "connection refused: secret-db-host:5432".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Builds a stored record from an insert body the way the store would.
    fn stamp<B: Serialize, T: DeserializeOwned>(&self, body: &B) -> T {
        let now = self.now();
        let mut value = serde_json::to_value(body).unwrap();
        let object = value.as_object_mut().unwrap();
        object.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        object.insert("created_at".into(), serde_json::to_value(now).unwrap());
        object.insert("updated_at".into(), serde_json::to_value(now).unwrap());
        serde_json::from_value(value).unwrap()
    }

    fn merge<T: Serialize + DeserializeOwned>(
        &self,
        record: &T,
        patch: RecordPatch,
        aliases: &[(&str, &str)],
    ) -> T {
        let mut value = serde_json::to_value(record).unwrap();
        let object = value.as_object_mut().unwrap();
        for (key, field) in patch.into_columns(aliases) {
            object.insert(key, field);
        }
        object.insert(
            "updated_at".into(),
            serde_json::to_value(self.now()).unwrap(),
        );
        serde_json::from_value(value).unwrap()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

fn blog_from(id: Uuid, input: BlogInput, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Blog {
    Blog {
        id,
        title: input.title,
        excerpt: input.excerpt,
        content: input.content,
        image_url: input.image_url,
        category: input.category,
        date: input.date,
        read_time: input.read_time,
        author: input.author,
        featured: input.featured,
        top_featured: input.top_featured,
        created_at,
        updated_at: now,
    }
}

fn work_from(id: Uuid, input: WorkInput, created_at: DateTime<Utc>, now: DateTime<Utc>) -> Work {
    Work {
        id,
        title: input.title,
        description: input.description,
        image_url: input.image_url,
        category: input.category,
        date: input.date,
        client: input.client,
        attendees: input.attendees,
        location: input.location,
        featured: input.featured,
        created_at,
        updated_at: now,
    }
}

fn capability_from(
    id: Uuid,
    input: CapabilityInput,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Capability {
    Capability {
        id,
        image_url: input.image_url,
        image_text: input.image_text,
        title: input.title,
        tag: input.tag,
        description: input.description,
        features: input.features,
        sort_order: input.sort_order,
        created_at,
        updated_at: now,
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        self.check()?;
        let mut blogs = self.blogs.lock().unwrap().clone();
        newest_first(&mut blogs, |b| b.created_at);
        Ok(blogs)
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        self.check()?;
        Ok(self.blogs.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn top_featured_blog(&self) -> Result<Option<Blog>, StoreError> {
        self.check()?;
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.top_featured)
            .max_by_key(|b| b.updated_at)
            .cloned())
    }

    async fn create_blog(&self, input: BlogInput) -> Result<Blog, StoreError> {
        self.check()?;
        let now = self.now();
        let mut blogs = self.blogs.lock().unwrap();
        if input.top_featured {
            blogs.iter_mut().for_each(|b| b.top_featured = false);
        }
        let blog = blog_from(Uuid::new_v4(), input, now, now);
        blogs.push(blog.clone());
        Ok(blog)
    }

    async fn replace_blog(&self, id: Uuid, input: BlogInput) -> Result<Option<Blog>, StoreError> {
        self.check()?;
        let now = self.now();
        let mut blogs = self.blogs.lock().unwrap();
        let Some(created_at) = blogs.iter().find(|b| b.id == id).map(|b| b.created_at) else {
            return Ok(None);
        };
        if input.top_featured {
            blogs
                .iter_mut()
                .filter(|b| b.id != id)
                .for_each(|b| b.top_featured = false);
        }
        let replaced = blog_from(id, input, created_at, now);
        if let Some(slot) = blogs.iter_mut().find(|b| b.id == id) {
            *slot = replaced.clone();
        }
        Ok(Some(replaced))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        Ok(remove_by(&mut self.blogs.lock().unwrap(), |b| b.id == id))
    }

    async fn list_work(&self) -> Result<Vec<Work>, StoreError> {
        self.check()?;
        let mut work = self.work.lock().unwrap().clone();
        newest_first(&mut work, |w| w.created_at);
        Ok(work)
    }

    async fn featured_work(&self, limit: i64) -> Result<Vec<Work>, StoreError> {
        let mut work = self.list_work().await?;
        work.retain(|w| w.featured);
        work.truncate(limit as usize);
        Ok(work)
    }

    async fn get_work(&self, id: Uuid) -> Result<Option<Work>, StoreError> {
        self.check()?;
        Ok(self.work.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }

    async fn create_work(&self, input: WorkInput) -> Result<Work, StoreError> {
        self.check()?;
        let now = self.now();
        let work = work_from(Uuid::new_v4(), input, now, now);
        self.work.lock().unwrap().push(work.clone());
        Ok(work)
    }

    async fn replace_work(&self, id: Uuid, input: WorkInput) -> Result<Option<Work>, StoreError> {
        self.check()?;
        let now = self.now();
        let mut items = self.work.lock().unwrap();
        Ok(items.iter_mut().find(|w| w.id == id).map(|slot| {
            *slot = work_from(id, input, slot.created_at, now);
            slot.clone()
        }))
    }

    async fn delete_work(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        Ok(remove_by(&mut self.work.lock().unwrap(), |w| w.id == id))
    }

    async fn list_capabilities(&self) -> Result<Vec<Capability>, StoreError> {
        self.check()?;
        let mut items = self.capabilities.lock().unwrap().clone();
        items.sort_by_key(|c| (c.sort_order, std::cmp::Reverse(c.created_at)));
        Ok(items)
    }

    async fn get_capability(&self, id: Uuid) -> Result<Option<Capability>, StoreError> {
        self.check()?;
        Ok(self
            .capabilities
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_capability(&self, input: CapabilityInput) -> Result<Capability, StoreError> {
        self.check()?;
        let now = self.now();
        let capability = capability_from(Uuid::new_v4(), input, now, now);
        self.capabilities.lock().unwrap().push(capability.clone());
        Ok(capability)
    }

    async fn replace_capability(
        &self,
        id: Uuid,
        input: CapabilityInput,
    ) -> Result<Option<Capability>, StoreError> {
        self.check()?;
        let now = self.now();
        let mut items = self.capabilities.lock().unwrap();
        Ok(items.iter_mut().find(|c| c.id == id).map(|slot| {
            *slot = capability_from(id, input, slot.created_at, now);
            slot.clone()
        }))
    }

    async fn delete_capability(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        Ok(remove_by(&mut self.capabilities.lock().unwrap(), |c| c.id == id))
    }

    async fn list_testimonials(
        &self,
        privilege: Privilege,
        featured_only: bool,
    ) -> Result<Vec<Testimonial>, StoreError> {
        self.check()?;
        *self.last_testimonial_privilege.lock().unwrap() = Some(privilege);
        let mut items = self.testimonials.lock().unwrap().clone();
        if featured_only {
            items.retain(|t| t.featured);
        }
        items.sort_by_key(|t| (t.sort_order, std::cmp::Reverse(t.created_at)));
        Ok(items)
    }

    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, StoreError> {
        self.check()?;
        Ok(self
            .testimonials
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn create_testimonial(&self, input: NewTestimonial) -> Result<Testimonial, StoreError> {
        self.check()?;
        let testimonial: Testimonial = self.stamp(&input);
        self.testimonials.lock().unwrap().push(testimonial.clone());
        Ok(testimonial)
    }

    async fn merge_testimonial(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<Testimonial>, StoreError> {
        self.check()?;
        let mut items = self.testimonials.lock().unwrap();
        let Some(slot) = items.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        *slot = self.merge(slot, patch, &TESTIMONIAL_ALIASES);
        Ok(Some(slot.clone()))
    }

    async fn delete_testimonial(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        Ok(remove_by(&mut self.testimonials.lock().unwrap(), |t| t.id == id))
    }

    async fn list_inquiries(&self, filter: LeadFilter) -> Result<Vec<ContactInquiry>, StoreError> {
        self.check()?;
        let mut items = self.inquiries.lock().unwrap().clone();
        items.retain(|i| {
            filter.status.as_ref().is_none_or(|s| &i.status == s)
                && filter.priority.as_ref().is_none_or(|p| &i.priority == p)
        });
        newest_first(&mut items, |i| i.created_at);
        Ok(items)
    }

    async fn get_inquiry(&self, id: Uuid) -> Result<Option<ContactInquiry>, StoreError> {
        self.check()?;
        Ok(self
            .inquiries
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create_inquiry(
        &self,
        privilege: Privilege,
        row: ContactInquiryInsert,
    ) -> Result<ContactInquiry, StoreError> {
        self.check()?;
        *self.last_inquiry_privilege.lock().unwrap() = Some(privilege);
        let inquiry: ContactInquiry = self.stamp(&row);
        self.inquiries.lock().unwrap().push(inquiry.clone());
        Ok(inquiry)
    }

    async fn merge_inquiry(
        &self,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<Option<ContactInquiry>, StoreError> {
        self.check()?;
        let mut items = self.inquiries.lock().unwrap();
        let Some(slot) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        *slot = self.merge(slot, patch, &[]);
        Ok(Some(slot.clone()))
    }

    async fn delete_inquiry(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        Ok(remove_by(&mut self.inquiries.lock().unwrap(), |i| i.id == id))
    }
}

// --- Router helpers ---

pub const ADMIN_COOKIE_HEADER: &str = "admin-authenticated=true";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRepository>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(InMemoryRepository::default(), MockStorageService::new())
}

pub fn spawn_app_with(repo: InMemoryRepository, storage: MockStorageService) -> TestApp {
    let repo = Arc::new(repo);
    let state = AppState {
        repo: repo.clone(),
        storage: Arc::new(storage),
        config: AppConfig::default(),
    };
    TestApp {
        router: create_router(state),
        repo,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, None, false)).await
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        self.send(request(method, uri, body, true)).await
    }

    /// POSTs through the admin API and returns the created record.
    pub async fn admin_create(&self, uri: &str, body: Value) -> Value {
        let response = self.admin(Method::POST, uri, Some(body)).await;
        assert_eq!(response.status(), 201, "create via {uri} failed");
        body_json(response).await
    }
}

pub fn request(method: Method, uri: &str, body: Option<Value>, authed: bool) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if authed {
        builder = builder.header(header::COOKIE, ADMIN_COOKIE_HEADER);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serves `router` on an ephemeral port and returns its base address.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}
