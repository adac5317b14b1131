//! Post image library: upload keys and listing.

use crate::{
    models::MediaFile,
    storage::{StorageService, StoredObject, sanitize_key},
};
use uuid::Uuid;

/// Every post image lives under this prefix.
pub const MEDIA_PREFIX: &str = "posts/";

/// Most files returned by one library listing.
pub const MEDIA_LIST_LIMIT: usize = 100;

/// Lowercased extension of `filename`, defaulting to `bin` when there is none.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

/// upload_key
///
/// `posts/{unix_millis}-{uuid}.{ext}`. The timestamp keeps keys sortable by upload time,
/// the uuid keeps them unique.
pub fn upload_key(filename: &str, unix_millis: i64, id: Uuid) -> String {
    format!(
        "{}{}-{}.{}",
        MEDIA_PREFIX,
        unix_millis,
        id,
        file_extension(filename)
    )
}

/// Key of a file in the library addressed by its bare name.
pub fn key_for_name(name: &str) -> String {
    format!("{}{}", MEDIA_PREFIX, sanitize_key(name))
}

/// to_media_files
///
/// Drops folder placeholders, applies the case-insensitive name filter, sorts newest first
/// and keeps the first `MEDIA_LIST_LIMIT`. Ties on `last_modified` fall back to the key,
/// whose millisecond prefix orders uploads.
pub fn to_media_files(
    storage: &dyn StorageService,
    objects: Vec<StoredObject>,
    search: Option<&str>,
) -> Vec<MediaFile> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut files: Vec<MediaFile> = objects
        .into_iter()
        .filter(|object| !object.key.ends_with('/'))
        .filter_map(|object| {
            let name = object
                .key
                .strip_prefix(MEDIA_PREFIX)
                .unwrap_or(&object.key)
                .to_string();
            if name.is_empty() {
                return None;
            }
            if let Some(needle) = &needle {
                if !name.to_lowercase().contains(needle) {
                    return None;
                }
            }
            Some(MediaFile {
                url: storage.public_url(&object.key),
                name,
                key: object.key,
                size: object.size,
                created_at: object.last_modified,
            })
        })
        .collect();

    files.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.key.cmp(&a.key))
    });
    files.truncate(MEDIA_LIST_LIMIT);
    files
}
