//! Content loader - loads posts from the posts directory

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::frontmatter::FrontMatterError;
use super::{FrontMatter, Post};

/// File extensions recognized as posts, in lookup order
pub const POST_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Why a post could not be loaded
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("post not found: {0}")]
    NotFound(String),

    #[error("invalid post slug: {0:?}")]
    InvalidSlug(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Loads posts from a single, non-recursive posts directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(posts_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Load all published posts, newest first.
    ///
    /// A missing directory yields no posts. Files that fail to read or parse
    /// are logged and skipped. Posts are ordered by date descending; posts
    /// sharing a date keep file-name order, and posts without a parseable
    /// date come last.
    pub fn load_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        let posts = self
            .load_every_post()?
            .into_iter()
            .filter(|post| post.published)
            .collect();
        Ok(posts)
    }

    /// Load every post including drafts, newest first
    pub fn load_every_post(&self) -> Result<Vec<Post>, ContentError> {
        if !self.posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", self.posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for path in self.post_files()? {
            match self.load_post_file(&path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", path, e);
                }
            }
        }

        sort_newest_first(&mut posts);

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Post files in the directory, in file-name order
    pub fn post_files(&self) -> Result<Vec<PathBuf>, ContentError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::Io {
                        path: self.posts_dir.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.posts_dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && is_post_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Load the post stored as `<slug>.md` (or `<slug>.markdown`)
    pub fn load_post_by_slug(&self, slug: &str) -> Result<Post, ContentError> {
        let path = self
            .find_post_file(slug)?
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))?;
        self.load_post_file(&path)
    }

    /// Locate the source file for a slug, if one exists
    pub fn find_post_file(&self, slug: &str) -> Result<Option<PathBuf>, ContentError> {
        validate_slug(slug)?;
        Ok(POST_EXTENSIONS
            .iter()
            .map(|ext| self.posts_dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file()))
    }

    /// Load a single post from a file
    pub fn load_post_file(&self, path: &Path) -> Result<Post, ContentError> {
        let source = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (fm, body) =
            FrontMatter::parse(&source).map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        // The file name, not the title, is the canonical slug
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Post::from_front_matter(slug, fm, body))
    }
}

/// Stable sort by date descending; undated posts go last
pub fn sort_newest_first(posts: &mut Vec<Post>) {
    let mut keyed: Vec<(Option<i64>, Post)> =
        posts.drain(..).map(|p| (p.timestamp(), p)).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    posts.extend(keyed.into_iter().map(|(_, p)| p));
}

/// Reject slugs that could escape the posts directory
fn validate_slug(slug: &str) -> Result<(), ContentError> {
    let invalid = slug.trim().is_empty()
        || slug.starts_with('.')
        || slug.contains(['/', '\\'])
        || Path::new(slug).components().count() != 1;
    if invalid {
        return Err(ContentError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Check if a file has a recognized post extension
pub fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}
