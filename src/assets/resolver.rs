//! Asset path resolution with SPA fallback.

use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::assets::mime;
use crate::config::AssetConfig;

/// A resolved asset ready to serve.
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Resolves request paths to files under the served root, falling back
/// to the entry document for anything that does not name a regular file.
pub struct StaticRouter {
    root: PathBuf,
    index: String,
}

impl StaticRouter {
    pub fn new(config: &AssetConfig) -> Self {
        Self {
            root: config.root.clone(),
            index: config.index.clone(),
        }
    }

    /// Resolve a request path. `None` only when even the entry document
    /// is unreadable; every other miss falls back to it.
    pub async fn resolve(&self, path: &str) -> Option<Asset> {
        if let Some(relative) = sanitize(path) {
            if !relative.as_os_str().is_empty() {
                let candidate = self.root.join(&relative);
                if let Some(asset) = read_file(&candidate).await {
                    return Some(asset);
                }
            }
        }
        self.entry_document().await
    }

    async fn entry_document(&self) -> Option<Asset> {
        let path = self.root.join(&self.index);
        match read_file(&path).await {
            Some(asset) => Some(asset),
            None => {
                tracing::warn!(path = %path.display(), "entry document unreadable");
                None
            }
        }
    }
}

async fn read_file(path: &Path) -> Option<Asset> {
    let metadata = fs::metadata(path).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    let bytes = fs::read(path).await.ok()?;
    Some(Asset {
        bytes,
        content_type: mime::content_type_for(path),
    })
}

/// Strip the leading slash and refuse any path that could escape the
/// served root. Rejected paths resolve to the entry document.
fn sanitize(path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return None,
        }
    }
    Some(relative.to_path_buf())
}
