use async_trait::async_trait;
use aws_sdk_s3 as s3;
use chrono::{DateTime, Utc};
use s3::presigning::PresigningConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Lifetime of a presigned upload URL.
pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

/// Keys requested per ListObjectsV2 round trip.
pub const LIST_PAGE_SIZE: i32 = 1000;

/// StoredObject
///
/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

// 1. StorageService Contract
/// StorageService
///
/// Abstract contract for the object storage holding post images. The real S3 client
/// (S3StorageClient) runs in production, the in-memory MockStorageService in tests.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket if missing. Only called in `Env::Local` (MinIO).
    async fn ensure_bucket_exists(&self);

    /// Generates a temporary signed URL allowing the browser to PUT a file directly into
    /// the bucket. The URL is bound to `content_type` and expires after `UPLOAD_URL_TTL`.
    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String>;

    /// Lists every object under `prefix`, in no particular order.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>, String>;

    async fn delete_object(&self, key: &str) -> Result<(), String>;

    /// Publicly readable URL of an object.
    fn public_url(&self, key: &str) -> String;
}

// 2. The Real Implementation (S3/MinIO/Supabase)
/// S3StorageClient
///
/// Concrete implementation using the AWS SDK for S3. Connects to MinIO locally and to the
/// Supabase Storage S3 gateway in production.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3StorageClient {
    /// new
    ///
    /// `public_base_url` is the prefix of public object URLs; the bucket and key are appended.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_base_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            // MinIO and Supabase Storage only accept path-style addressing (endpoint/bucket/key).
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
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
            // Already-exists errors land here too.
            tracing::debug!("create_bucket {}: {:?}", self.bucket_name, e);
        }
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String> {
        let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL).map_err(|e| e.to_string())?;

        let presigned_req = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            // The browser must send exactly this Content-Type or the signature fails.
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| e.to_string())?;

        Ok(presigned_req.uri().to_string())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>, String> {
        // S3 returns keys in ascending order a page at a time; walk every page so callers
        // see the whole prefix.
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .prefix(prefix)
            .max_keys(LIST_PAGE_SIZE)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| e.to_string())?;
            objects.extend(page.contents().iter().filter_map(|object| {
                let key = object.key()?.to_string();
                let last_modified = object
                    .last_modified()
                    .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()));
                Some(StoredObject {
                    key,
                    size: object.size().unwrap_or(0),
                    last_modified,
                })
            }));
        }

        Ok(objects)
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket_name, key)
    }
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) and empty segments from a key,
/// so a user-supplied name cannot escape its prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// key_from_public_url
///
/// Recovers the object key from a public URL: everything after the first `/{bucket}/`
/// path segment, query string dropped. None when the bucket segment is absent.
pub fn key_from_public_url(url: &str, bucket: &str) -> Option<String> {
    let url = reqwest::Url::parse(url).ok()?;
    let mut segments = url.path_segments()?;
    segments.by_ref().find(|segment| *segment == bucket)?;
    let key = sanitize_key(&segments.collect::<Vec<_>>().join("/"));
    if key.is_empty() { None } else { Some(key) }
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory `StorageService` for tests. Objects live in a shared vector so listing and
/// deletion can be asserted without a network connection.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    pub objects: Arc<Mutex<Vec<StoredObject>>>,
}

pub const MOCK_BUCKET: &str = "mock-bucket";

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_objects(objects: Vec<StoredObject>) -> Self {
        Self {
            should_fail: false,
            objects: Arc::new(Mutex::new(objects)),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.iter().map(|o| o.key.clone()).collect())
            .unwrap_or_default()
    }

    fn fail() -> String {
        "Mock Storage Error: Simulation requested".to_string()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        _content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err(Self::fail());
        }

        Ok(format!(
            "http://localhost:9000/{}/{}?signature=fake",
            MOCK_BUCKET,
            sanitize_key(key)
        ))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>, String> {
        if self.should_fail {
            return Err(Self::fail());
        }
        let objects = self.objects.lock().map_err(|e| e.to_string())?;
        Ok(objects
            .iter()
            .filter(|o| o.key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        if self.should_fail {
            return Err(Self::fail());
        }
        let mut objects = self.objects.lock().map_err(|e| e.to_string())?;
        objects.retain(|o| o.key != key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://localhost:9000/{}/{}", MOCK_BUCKET, key)
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;
