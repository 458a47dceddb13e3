use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::Arc;

/// StorageService
///
/// Contract for the object store. Swappable between the real S3 client and the
/// in-memory mock used by the handler tests.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the bucket if missing. Only called for the local MinIO setup.
    async fn ensure_bucket_exists(&self);

    /// upload
    ///
    /// Stores `data` under a key derived from `folder` and `filename` and reports the
    /// outcome as a value. Implementations never panic and never return `Err`; the
    /// caller inspects the returned [`UploadOutcome`].
    async fn upload(&self, data: Vec<u8>, filename: &str, folder: &str) -> UploadOutcome;
}

/// UploadOutcome
///
/// Result of a single put. `Uploaded` carries the public URL of the stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { url: String, key: String },
    Failed { error: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}

/// S3StorageClient
///
/// The AWS SDK backed implementation. With a custom endpoint (MinIO) it switches to
/// path-style addressing and builds public URLs against that endpoint.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    region: String,
    endpoint: Option<String>,
}

impl S3StorageClient {
    pub fn new(
        endpoint: Option<&str>,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let mut builder = s3::Config::builder()
            .credentials_provider(credentials)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest();

        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: s3::Client::from_conf(builder.build()),
            bucket_name: bucket.to_string(),
            region: region.to_string(),
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(
            self.endpoint.as_deref(),
            &self.bucket_name,
            &self.region,
            key,
        )
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            // Already-exists lands here too; it is only worth a debug line.
            tracing::debug!(bucket = %self.bucket_name, error = %e, "create_bucket skipped");
        }
    }

    async fn upload(&self, data: Vec<u8>, filename: &str, folder: &str) -> UploadOutcome {
        let key = object_key(folder, filename, chrono::Utc::now().timestamp_millis());
        let content_type = content_type_for(filename);

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(key = %key, content_type, "asset uploaded");
                UploadOutcome::Uploaded {
                    url: self.public_url(&key),
                    key,
                }
            }
            Err(e) => {
                tracing::error!(key = %key, error = %e, "asset upload failed");
                UploadOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// content_type_for
///
/// Looks the MIME type up from the file extension; unknown extensions are sent as
/// generic binary.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

/// object_key
///
/// `{folder}/{millis}-{filename}` with the folder stripped of traversal segments and
/// the filename reduced to a URL-safe character set.
pub fn object_key(folder: &str, filename: &str, timestamp_millis: i64) -> String {
    let folder = sanitize_folder(folder);
    let folder = if folder.is_empty() {
        "uploads".to_string()
    } else {
        folder
    };
    format!("{folder}/{timestamp_millis}-{}", sanitize_filename(filename))
}

/// Drops `..`, `.` and empty segments so a caller-supplied folder cannot escape the
/// bucket prefix, and cleans each remaining segment like a filename.
fn sanitize_folder(folder: &str) -> String {
    folder
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .map(url_safe)
        .collect::<Vec<_>>()
        .join("/")
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `-`.
fn url_safe(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn sanitize_filename(filename: &str) -> String {
    // Only the last path component is kept; browsers on some platforms send full paths.
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned = url_safe(base);

    if cleaned.trim_matches(['.', '-']).is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

pub fn public_url(endpoint: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{endpoint}/{bucket}/{key}"),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

/// MockStorageService
///
/// Network-free `StorageService` for tests. Applies the same key derivation as the
/// real client so assertions on returned URLs stay meaningful.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true every upload reports a failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn upload(&self, _data: Vec<u8>, filename: &str, folder: &str) -> UploadOutcome {
        if self.should_fail {
            return UploadOutcome::Failed {
                error: "Mock Storage Error: Simulation requested".to_string(),
            };
        }

        let key = object_key(folder, filename, chrono::Utc::now().timestamp_millis());
        UploadOutcome::Uploaded {
            url: public_url(Some("http://localhost:9000"), "mock-bucket", "us-east-1", &key),
            key,
        }
    }
}

/// StorageState
///
/// The shared handle to the storage service held by the application state.
pub type StorageState = Arc<dyn StorageService>;
