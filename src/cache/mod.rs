//! Opt-in post cache
//!
//! The default entry points re-read the posts directory on every call. For
//! larger blogs a [`PostCache`] keeps the last loaded list and only reloads
//! when the directory fingerprint (file names, sizes and modification times)
//! changes, or after an explicit [`PostCache::invalidate`].

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::content::{ContentError, ContentLoader, Post};

#[derive(Debug)]
struct CacheEntry {
    fingerprint: u64,
    posts: Vec<Post>,
}

/// Cached result of [`ContentLoader::load_all_posts`]
#[derive(Debug, Default)]
pub struct PostCache {
    entry: Mutex<Option<CacheEntry>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published posts, reloading only if the directory changed
    pub fn posts(&self, loader: &ContentLoader) -> Result<Vec<Post>, ContentError> {
        let fingerprint = fingerprint(loader)?;
        let mut entry = self.lock();

        if let Some(cached) = entry.as_ref() {
            if cached.fingerprint == fingerprint {
                tracing::debug!("Post cache hit ({} posts)", cached.posts.len());
                return Ok(cached.posts.clone());
            }
            tracing::info!("Posts directory changed, reloading");
        }

        let posts = loader.load_all_posts()?;
        *entry = Some(CacheEntry {
            fingerprint,
            posts: posts.clone(),
        });
        Ok(posts)
    }

    /// Drop the cached list so the next call reloads
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    pub fn is_warm(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // The entry is replaced wholesale, so a poisoned lock holds no
        // half-written state.
        self.entry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Hash of every post file's name, size and modification time
pub fn fingerprint(loader: &ContentLoader) -> Result<u64, ContentError> {
    let mut hasher = DefaultHasher::new();

    let dir = loader.posts_dir();
    dir.exists().hash(&mut hasher);
    if !dir.exists() {
        return Ok(hasher.finish());
    }

    for path in loader.post_files()? {
        path.file_name().hash(&mut hasher);
        match fs::metadata(&path) {
            Ok(metadata) => {
                metadata.len().hash(&mut hasher);
                metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
                    .hash(&mut hasher);
            }
            // Vanished between listing and stat; the name alone still counts
            Err(e) => tracing::debug!("Cannot stat {:?}: {}", path, e),
        }
    }

    Ok(hasher.finish())
}
