use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- SQL path records ---

/// Blog
///
/// A row of the `blogs` table. At most one row carries `top_featured = true`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    pub read_time: Option<String>,
    pub author: Option<String>,
    pub featured: bool,
    pub top_featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// BlogInput
///
/// Body of blog create and update. Update replaces every column, so a field left out
/// of the body is stored as NULL (or `false`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct BlogInput {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    pub read_time: Option<String>,
    pub author: Option<String>,
    pub featured: bool,
    pub top_featured: bool,
}

/// Work
///
/// A portfolio entry (`our_work` table) describing a past event.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct Work {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    pub client: Option<String>,
    pub attendees: Option<String>,
    pub location: Option<String>,
    pub featured: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Full-replace body for work items.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct WorkInput {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    pub client: Option<String>,
    pub attendees: Option<String>,
    pub location: Option<String>,
    pub featured: bool,
}

/// Capability
///
/// A labelled service category. `features` is an ordered list; `sort_order` drives
/// display order.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct Capability {
    pub id: Uuid,
    pub image_url: Option<String>,
    pub image_text: Option<String>,
    pub title: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub sort_order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Full-replace body for capabilities.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct CapabilityInput {
    pub image_url: Option<String>,
    pub image_text: Option<String>,
    pub title: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub sort_order: i32,
}

// --- Hosted path records ---

/// Testimonial
///
/// A row of the `testimonials` table. Older rows and clients use `designation` and
/// `image_url`; both are accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    #[serde(alias = "designation")]
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: String,
    #[serde(alias = "image_url")]
    pub avatar_url: Option<String>,
    pub rating: i32,
    pub featured: bool,
    pub sort_order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Body of testimonial create. `rating` is checked against 1..=5 before insert.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct NewTestimonial {
    pub name: String,
    #[serde(alias = "designation")]
    pub position: Option<String>,
    pub company: Option<String>,
    pub content: String,
    #[serde(alias = "image_url")]
    pub avatar_url: Option<String>,
    pub rating: Option<i32>,
    pub featured: bool,
    pub sort_order: i32,
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
/// Stored when a testimonial is created without a rating.
pub const DEFAULT_RATING: i32 = 5;

/// ContactInquiry
///
/// A lead collected by the multi-step contact form, plus the fields the sales team
/// maintains from the console (`status`, `priority`, `admin_notes`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default)]
#[ts(export)]
pub struct ContactInquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<String>,
    pub budget: Option<String>,
    pub guest_count: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub priority: String,
    pub admin_notes: Option<String>,
    pub lead_source: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    #[ts(type = "string | null")]
    pub step1_completed_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub step2_completed_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub step3_completed_at: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// NewContactInquiry
///
/// What the public form posts (camelCase, like the rest of the site's client code).
/// Everything is optional at the type level so missing required fields can be
/// reported together instead of failing on the first one.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct NewContactInquiry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<String>,
    pub budget: Option<String>,
    pub guest_count: Option<String>,
    pub message: Option<String>,
    pub lead_source: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    #[ts(type = "string | null")]
    pub step1_completed_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub step2_completed_at: Option<DateTime<Utc>>,
    #[ts(type = "string | null")]
    pub step3_completed_at: Option<DateTime<Utc>>,
}

impl NewContactInquiry {
    /// Required fields that are absent or blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("eventType", &self.event_type),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect()
    }

    /// into_insert
    ///
    /// Converts a validated submission into the row sent to the store, filling the
    /// lead defaults. `submitted_at` stands in for a missing step-one timestamp.
    pub fn into_insert(self, submitted_at: DateTime<Utc>) -> ContactInquiryInsert {
        ContactInquiryInsert {
            name: self.name.unwrap_or_default().trim().to_string(),
            email: self.email.unwrap_or_default().trim().to_string(),
            company: self.company,
            phone: self.phone,
            country: self.country,
            pincode: self.pincode,
            state: self.state,
            city: self.city,
            event_type: self.event_type,
            event_date: self.event_date,
            budget: self.budget,
            guest_count: self.guest_count,
            message: self.message,
            status: LEAD_STATUS_NEW.to_string(),
            priority: LEAD_PRIORITY_DEFAULT.to_string(),
            lead_source: Some(
                self.lead_source
                    .unwrap_or_else(|| LEAD_SOURCE_DEFAULT.to_string()),
            ),
            utm_source: self.utm_source,
            utm_medium: self.utm_medium,
            utm_campaign: self.utm_campaign,
            utm_term: self.utm_term,
            utm_content: self.utm_content,
            step1_completed_at: Some(self.step1_completed_at.unwrap_or(submitted_at)),
            step2_completed_at: self.step2_completed_at,
            step3_completed_at: self.step3_completed_at,
        }
    }
}

pub const LEAD_STATUS_NEW: &str = "new";
pub const LEAD_PRIORITY_DEFAULT: &str = "medium";
pub const LEAD_SOURCE_DEFAULT: &str = "website";

/// The row inserted for a new lead; absent optionals are left to column defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInquiryInsert {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step1_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step2_completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step3_completed_at: Option<DateTime<Utc>>,
}

/// RecordPatch
///
/// Partial-merge body for hosted-path updates: whatever keys the caller sends are
/// written, everything else is left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RecordPatch(pub Map<String, Value>);

/// Columns the store owns; a patch may never overwrite them.
const STORE_OWNED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

impl RecordPatch {
    /// Drops store-owned keys so `id` and the timestamps stay under the store's control.
    pub fn without_store_columns(mut self) -> Self {
        for column in STORE_OWNED_COLUMNS {
            self.0.remove(column);
        }
        self
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// into_columns
    ///
    /// Rewrites the patch into the table's column names. camelCase keys become
    /// snake_case, then each `(alias, column)` pair in `aliases` is folded onto its
    /// column; a key already spelled as the column wins over its alias. Store-owned
    /// columns are dropped last.
    pub fn into_columns(self, aliases: &[(&str, &str)]) -> Map<String, Value> {
        let mut columns = Map::new();
        let mut aliased = Vec::new();
        for (key, value) in self.0 {
            let key = snake_case(&key);
            match aliases.iter().find(|(alias, _)| *alias == key) {
                Some((_, column)) => aliased.push((column.to_string(), value)),
                None => {
                    columns.insert(key, value);
                }
            }
        }
        for (column, value) in aliased {
            columns.entry(column).or_insert(value);
        }
        RecordPatch(columns).without_store_columns().into_inner()
    }
}

/// Older testimonial clients send these names for `position` and `avatar_url`.
pub const TESTIMONIAL_ALIASES: [(&str, &str); 2] =
    [("designation", "position"), ("image_url", "avatar_url")];

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// --- Response and request helpers ---

/// Returned by every delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, PartialEq)]
#[ts(export)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS, Default, PartialEq)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
}
