//! Building storage backends from root URLs.

use object_store::ClientOptions;
use object_store::ObjectStore;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use pv_error::{PvError, Result};
use pv_traits::Storage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::ObjectStoreStorage;

/// Options for S3 access.
///
/// Anything left unset falls back to the standard `AWS_*` environment
/// variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageOptions {
    /// AWS region
    pub region: Option<String>,

    /// Optional S3 endpoint URL (for LocalStack or MinIO)
    pub endpoint: Option<String>,

    /// Optional AWS access key ID
    pub access_key: Option<String>,

    /// Optional AWS secret access key
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,

    /// Optional AWS session token (for temporary credentials)
    #[serde(skip_serializing)]
    pub session_token: Option<String>,

    /// Allow plain HTTP endpoints
    pub allow_http: bool,
}

impl StorageOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the S3 endpoint URL. Plain `http://` endpoints are allowed.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.allow_http |= endpoint.starts_with("http://");
        self.endpoint = Some(endpoint);
        self
    }

    /// Set AWS credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self.session_token = session_token;
        self
    }
}

/// HTTP client options for S3 listing and reads.
fn create_s3_client_options(allow_http: bool) -> ClientOptions {
    let options = ClientOptions::new()
        .with_pool_max_idle_per_host(100)
        .with_pool_idle_timeout(Duration::from_secs(90))
        .with_timeout(Duration::from_secs(300))
        .with_connect_timeout(Duration::from_secs(10));

    if allow_http {
        options.with_allow_http(true)
    } else {
        options
    }
}

/// Split a root URL into scheme, authority and root path.
///
/// The returned root path is relative to the backend and ends with `/` unless
/// it is empty.
///
/// # Errors
///
/// Returns [`PvError::Config`] for unparseable URLs.
pub fn parse_root_url(root: &str) -> Result<(String, String, String)> {
    let url = Url::parse(root).map_err(|e| PvError::Config(format!("Invalid root URL '{root}': {e}")))?;

    let authority = url.host_str().unwrap_or_default().to_string();
    let path = url.path().trim_matches('/');
    let path = if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    };

    Ok((url.scheme().to_string(), authority, path))
}

/// Build a storage backend for a root URL.
///
/// Supported schemes:
/// - `file:///abs/path` - local filesystem rooted at the path (root path is empty)
/// - `s3://bucket/prefix` - Amazon S3 or any S3-compatible endpoint
/// - `memory://` - an empty in-memory store
///
/// Returns the storage and the root path to start discovery from.
///
/// # Errors
///
/// Returns [`PvError::Config`] for unsupported schemes or invalid URLs, and
/// [`PvError::Storage`] when the backend cannot be created.
pub fn storage_from_url(root: &str, options: &StorageOptions) -> Result<(Arc<dyn Storage>, String)> {
    let (scheme, authority, path) = parse_root_url(root)?;

    let (store, root_path): (Arc<dyn ObjectStore>, String) = match scheme.as_str() {
        "file" => {
            let directory = format!("/{path}");
            debug!(directory = %directory, "Creating local filesystem storage");
            let store = LocalFileSystem::new_with_prefix(&directory).map_err(|e| {
                PvError::Storage(format!("Failed to open local directory '{directory}': {e}"))
            })?;
            (Arc::new(store), String::new())
        }
        "s3" => {
            if authority.is_empty() {
                return Err(PvError::Config(format!("Missing bucket in S3 URL: {root}")));
            }
            debug!(bucket = %authority, prefix = %path, "Creating S3 storage");
            let store = build_s3(&authority, options)?;
            (Arc::new(store), path)
        }
        "memory" => (Arc::new(InMemory::new()), path),
        other => {
            return Err(PvError::Config(format!(
                "Unsupported storage scheme '{other}' in {root}"
            )));
        }
    };

    let storage: Arc<dyn Storage> = Arc::new(ObjectStoreStorage::new(store, root));
    Ok((storage, root_path))
}

fn build_s3(bucket: &str, options: &StorageOptions) -> Result<AmazonS3> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(bucket)
        .with_client_options(create_s3_client_options(options.allow_http));

    if let Some(region) = &options.region {
        builder = builder.with_region(region);
    }

    if let (Some(access_key), Some(secret_key)) = (&options.access_key, &options.secret_key) {
        builder = builder
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key);

        if let Some(token) = &options.session_token {
            builder = builder.with_token(token);
        }
    }

    if let Some(endpoint) = &options.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(options.allow_http)
            .with_virtual_hosted_style_request(false);
    }

    builder
        .build()
        .map_err(|e| PvError::Storage(format!("Failed to create S3 object store: {e}")))
}
