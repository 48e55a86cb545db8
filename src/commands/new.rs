//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::PostDraft;
use crate::Blog;

/// Read post content from a file, or `-` for stdin
pub fn read_content(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("reading content from stdin");
    }
    fs::read_to_string(source).with_context(|| format!("reading content from {:?}", source))
}

/// Create a new post from a draft
pub fn create_post(blog: &Blog, draft: PostDraft) -> Result<PathBuf> {
    let today = chrono::Local::now().date_naive();
    let post = draft.into_post(None, today)?;
    let path = blog.writer().create(&post)?;

    println!("Created: {:?}", path);
    Ok(path)
}
