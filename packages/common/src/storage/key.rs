use std::fmt;

use chrono::{DateTime, Utc};

use super::hash::ContentHash;

const KEY_PREFIX: &str = "maps";
const DEFAULT_EXTENSION: &str = "png";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Address of a blob inside a backend: `maps/<YYYY>/<MM>/<DD>/<sha256-hex>.<ext>`.
///
/// The date partition is the UTC upload day and only groups objects for
/// browsing. Identity lives in the digest, so the same bytes uploaded on two
/// different days land under two different keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn derive(hash: &ContentHash, uploaded_at: DateTime<Utc>, extension: &str) -> Self {
        Self(format!(
            "{KEY_PREFIX}/{}/{}.{extension}",
            uploaded_at.format("%Y/%m/%d"),
            hash.to_hex()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pick the content type to store a blob with.
///
/// A declared type wins unless it is missing or the generic octet-stream, in
/// which case the type is guessed from the upload's file name.
pub fn resolve_content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    let declared = declared
        .map(normalize_mime)
        .filter(|m| !m.is_empty() && m != FALLBACK_CONTENT_TYPE);
    if let Some(mime) = declared {
        return mime;
    }

    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}

/// File extension used in the storage key for a content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match normalize_mime(content_type).as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/tiff" => "tif",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        _ => DEFAULT_EXTENSION,
    }
}

fn normalize_mime(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}
