use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Which blob store backend to construct at start-up.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    #[default]
    Local,
    S3,
}

/// Blob storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Backend selector. Default: `local`.
    #[serde(default)]
    pub driver: StorageDriver,
    /// Largest accepted upload in bytes. Default: 32 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
    /// Lifetime of links handed out on read paths. Default: 24 hours.
    #[serde(default = "default_link_ttl_secs")]
    pub link_ttl_secs: u64,
    /// Deadline for a single blob or metadata write. Default: 30 seconds.
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// Required when `driver = "s3"`.
    #[serde(default)]
    pub s3: Option<S3StorageConfig>,
}

/// Filesystem backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LocalStorageConfig {
    /// Directory objects are written under. Default: `./uploads`.
    #[serde(default = "default_local_root")]
    pub root: PathBuf,
    /// URL path the static file route serves `root` at. Default: `/static`.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

/// S3-compatible backend settings.
#[derive(Deserialize, Clone)]
pub struct S3StorageConfig {
    /// Host (and port) of the object service, e.g. `minio:9000`.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Signing region. Default: `us-east-1`.
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Use https when `endpoint` carries no scheme. Default: false.
    #[serde(default)]
    pub use_ssl: bool,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`. Default: true.
    #[serde(default = "default_path_style")]
    pub path_style: bool,
}

impl fmt::Debug for S3StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("use_ssl", &self.use_ssl)
            .field("path_style", &self.path_style)
            .finish()
    }
}

fn default_max_blob_size() -> u64 {
    32 * 1024 * 1024
}
fn default_link_ttl_secs() -> u64 {
    24 * 60 * 60
}
fn default_io_timeout_secs() -> u64 {
    30
}
fn default_local_root() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_public_prefix() -> String {
    "/static".into()
}
fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_path_style() -> bool {
    true
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
            public_prefix: default_public_prefix(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            driver: StorageDriver::default(),
            max_blob_size: default_max_blob_size(),
            link_ttl_secs: default_link_ttl_secs(),
            io_timeout_secs: default_io_timeout_secs(),
            local: LocalStorageConfig::default(),
            s3: None,
        }
    }
}
