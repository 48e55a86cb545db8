//! lakeblog: a personal blog backed by a directory of markdown files
//!
//! Posts are read from disk on every call, parsed into [`content::Post`]
//! records and grouped into categories and tags. The [`Blog`] handle bundles
//! the immutable configuration with the entry points used by the CLI and by
//! any presentation layer.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod editor;
pub mod query;
pub mod taxonomy;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use content::{Category, ContentError, ContentLoader, MarkdownRenderer, Post, RenderError, Tag};

/// Name of the configuration file in the blog base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration, fixed for the lifetime of the handle
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the post files
    pub posts_dir: PathBuf,
    renderer: OnceLock<Arc<MarkdownRenderer>>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::BlogConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        Self {
            config,
            base_dir,
            posts_dir,
            renderer: OnceLock::new(),
        }
    }

    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.posts_dir)
    }

    pub fn writer(&self) -> editor::PostWriter {
        editor::PostWriter::new(self.loader())
    }

    /// All published posts, newest first
    pub fn load_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        self.loader().load_all_posts()
    }

    /// Look up one post by slug; every failure reads as "not found".
    ///
    /// Use [`ContentLoader::load_post_by_slug`] to tell a missing file from a
    /// malformed one.
    pub fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        match self.loader().load_post_by_slug(slug) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::debug!("Post {:?} not available: {}", slug, e);
                None
            }
        }
    }

    pub fn all_categories(&self) -> Result<Vec<Category>, ContentError> {
        Ok(taxonomy::categories(&self.load_all_posts()?))
    }

    pub fn all_tags(&self) -> Result<Vec<Tag>, ContentError> {
        Ok(taxonomy::tags(&self.load_all_posts()?))
    }

    pub fn posts_by_category(&self, category_slug: &str) -> Result<Vec<Post>, ContentError> {
        Ok(query::by_category(self.load_all_posts()?, category_slug))
    }

    pub fn posts_by_tag(&self, tag_slug: &str) -> Result<Vec<Post>, ContentError> {
        Ok(query::by_tag(self.load_all_posts()?, tag_slug))
    }

    pub fn search(&self, text: &str) -> Result<Vec<Post>, ContentError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(query::search(self.load_all_posts()?, text))
    }

    /// Shared markdown renderer, built on first use
    pub fn renderer(&self) -> Arc<MarkdownRenderer> {
        self.renderer
            .get_or_init(|| Arc::new(MarkdownRenderer::from_config(&self.config.highlight)))
            .clone()
    }

    /// Render a markdown body to HTML
    pub async fn markdown_to_html(&self, markdown: &str) -> Result<String, RenderError> {
        content::markdown_to_html(self.renderer(), markdown.to_string()).await
    }
}
