//! Disk-backed asset store.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AssetError, AssetStore};

/// Writes uploads under a root directory and hands back `/uploads/...`
/// references. Filenames get a UUID prefix, so a repeated upload of the same
/// file never collides.
#[derive(Debug, Clone)]
pub struct DiskAssetStore {
    root: PathBuf,
}

impl DiskAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetStore for DiskAssetStore {
    async fn save(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, AssetError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;

        let filename = format!("{}-{}", Uuid::now_v7(), sanitize(original_name));
        tokio::fs::write(self.root.join(&filename), bytes)
            .await
            .map_err(|e| AssetError::Io(e.to_string()))?;

        Ok(format!("/uploads/{filename}"))
    }
}

/// Strip anything that could escape the uploads directory or confuse a URL.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['_', '.']).is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostile_filenames_are_neutralized() {
        assert_eq!(sanitize("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize("shoe photo.png"), "shoe_photo.png");
        assert_eq!(sanitize("///"), "upload");
    }

    #[tokio::test]
    async fn save_writes_the_file_and_returns_a_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskAssetStore::new(dir.path());

        let reference = store.save("shoe.png", b"png-bytes".to_vec()).await.unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with("-shoe.png"));

        let filename = reference.strip_prefix("/uploads/").unwrap();
        let written = tokio::fs::read(dir.path().join(filename)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }
}
