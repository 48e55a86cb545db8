//! Edit or delete an existing post

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::editor::PostDraft;
use crate::Blog;

/// Fields to change on an existing post; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
}

impl PostChanges {
    fn apply(self, draft: &mut PostDraft) {
        let fields = [
            (self.title, &mut draft.title),
            (self.excerpt, &mut draft.excerpt),
            (self.content, &mut draft.content),
            (self.category, &mut draft.category),
            (self.tags, &mut draft.tags),
            (self.cover_image, &mut draft.cover_image),
        ];
        for (change, field) in fields {
            if let Some(value) = change {
                *field = value;
            }
        }
        if let Some(published) = self.published {
            draft.published = published;
        }
    }
}

/// Apply changes to the post stored under `slug`.
///
/// Untouched tags are kept as stored, so a tag containing a comma survives.
/// Unknown front-matter keys are preserved, but JSON front-matter is
/// rewritten as YAML.
pub fn update_post(blog: &Blog, slug: &str, changes: PostChanges) -> Result<PathBuf> {
    let existing = blog
        .loader()
        .load_post_by_slug(slug)
        .with_context(|| format!("cannot edit post {:?}", slug))?;

    let keep_tags = changes.tags.is_none();
    let mut draft = PostDraft::from_post(&existing);
    changes.apply(&mut draft);

    let today = chrono::Local::now().date_naive();
    let mut post = draft.into_post(Some(&existing), today)?;
    if keep_tags {
        post.tags = existing.tags.clone();
    }
    let path = blog.writer().update(&post)?;

    println!("Updated: {:?}", path);
    Ok(path)
}

/// Remove the post stored under `slug`
pub fn delete_post(blog: &Blog, slug: &str) -> Result<PathBuf> {
    let path = blog.writer().delete(slug)?;
    println!("Deleted: {:?}", path);
    Ok(path)
}
