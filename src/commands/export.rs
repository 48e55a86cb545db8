//! Export the derived views for a static front end

use anyhow::{bail, Context, Result};
use notify::{RecursiveMode, Watcher};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::BlogConfig;
use crate::content::Post;
use crate::taxonomy;
use crate::{Blog, CONFIG_FILE};

/// Default export directory, relative to the blog base directory
pub const DEFAULT_OUT_DIR: &str = "public";

/// Quiet period after a file change before re-exporting
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Entry in the search index
#[derive(Debug, Serialize)]
struct SearchEntry<'a> {
    slug: &'a str,
    title: &'a str,
    excerpt: &'a str,
    category: &'a str,
    tags: &'a [String],
    date: &'a str,
}

impl<'a> From<&'a Post> for SearchEntry<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            excerpt: &post.excerpt,
            category: &post.category,
            tags: &post.tags,
            date: &post.date,
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Write posts, categories, tags, search index and per-post HTML to `out_dir`
pub async fn run(blog: &Blog, out_dir: &Path) -> Result<()> {
    let start = Instant::now();

    let posts = blog.load_all_posts()?;
    let categories = taxonomy::categories(&posts);
    let tags = taxonomy::tags(&posts);
    tracing::info!(
        "Loaded {} posts, {} categories, {} tags",
        posts.len(),
        categories.len(),
        tags.len()
    );

    // Fragments are rebuilt from scratch so deleted or unpublished posts go away
    let html_dir = out_dir.join("posts");
    if html_dir.exists() {
        fs::remove_dir_all(&html_dir).with_context(|| format!("clearing {:?}", html_dir))?;
    }
    fs::create_dir_all(&html_dir).with_context(|| format!("creating {:?}", html_dir))?;

    write_json(&out_dir.join("site.json"), &blog.config)?;
    write_json(&out_dir.join("posts.json"), &posts)?;
    write_json(&out_dir.join("categories.json"), &categories)?;
    write_json(&out_dir.join("tags.json"), &tags)?;

    let index: Vec<SearchEntry> = posts.iter().map(SearchEntry::from).collect();
    write_json(&out_dir.join("search.json"), &index)?;

    for post in &posts {
        let html = blog
            .markdown_to_html(&post.content)
            .await
            .with_context(|| format!("rendering post {:?}", post.slug))?;
        let path = html_dir.join(format!("{}.html", post.slug));
        fs::write(&path, html).with_context(|| format!("writing {:?}", path))?;
    }

    tracing::info!(
        "Exported to {:?} in {:.2}s",
        out_dir,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Re-export whenever the posts directory or config changes
pub async fn watch(blog: &Blog, out_dir: &Path) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    fs::create_dir_all(&blog.posts_dir)?;
    watcher.watch(&blog.posts_dir, RecursiveMode::NonRecursive)?;

    let config_path = blog.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", blog.posts_dir);

    let mut current = blog.clone();

    while let Some(event) = rx.recv().await {
        let mut config_changed = event.paths.iter().any(|p| p.ends_with(CONFIG_FILE));

        // Let a burst of events settle before exporting once
        while let Ok(Some(event)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {
            config_changed |= event.paths.iter().any(|p| p.ends_with(CONFIG_FILE));
        }

        // Config is immutable per handle; an edited config means a new handle
        if config_changed {
            match BlogConfig::load(&config_path) {
                Ok(config) => current = Blog::with_config(&blog.base_dir, config),
                Err(e) => tracing::error!("Keeping previous config: {:#}", e),
            }
        }

        tracing::info!("Change detected, exporting...");
        if let Err(e) = run(&current, out_dir).await {
            tracing::error!("Export failed: {:#}", e);
        }
    }

    Ok(())
}

/// Remove the export directory.
///
/// Refuses a directory that is the blog itself or holds the posts.
pub fn clean(blog: &Blog, out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        return Ok(());
    }

    let out = fs::canonicalize(out_dir).with_context(|| format!("resolving {:?}", out_dir))?;
    let base = fs::canonicalize(&blog.base_dir).unwrap_or_else(|_| blog.base_dir.clone());
    let posts = base.join(&blog.config.posts_dir);
    if out == base || posts.starts_with(&out) {
        bail!("refusing to remove {:?}: it contains the blog content", out_dir);
    }

    fs::remove_dir_all(&out).with_context(|| format!("removing {:?}", out_dir))?;
    tracing::info!("Deleted: {:?}", out_dir);
    Ok(())
}
