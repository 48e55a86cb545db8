//! Post editor: turns drafts into posts and writes them to the posts directory

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::content::{
    reading_time, slugify, ContentError, ContentLoader, FrontMatter, FrontMatterError, Post,
};

/// Category given to drafts that leave it blank
pub const DEFAULT_CATEGORY: &str = "未分类";

/// Author given to new posts when none is known
pub const DEFAULT_AUTHOR: &str = "博主";

/// Characters of content used for a generated excerpt
const EXCERPT_CHARS: usize = 150;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("title must not be empty")]
    MissingTitle,

    #[error("content must not be empty")]
    MissingContent,

    #[error("title {0:?} does not produce a usable slug")]
    EmptySlug(String),

    #[error("post already exists: {0}")]
    AlreadyExists(String),

    #[error("post not found: {0}")]
    NotFound(String),

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] FrontMatterError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// What the editor form submits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    /// Comma-separated tag list as typed in the form
    pub tags: String,
    pub cover_image: String,
    pub published: bool,
}

impl PostDraft {
    /// Prefill a draft from an existing post
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            tags: post.tags.join(", "),
            cover_image: post.cover_image.clone().unwrap_or_default(),
            published: post.published,
        }
    }

    /// Validate the draft and fill in defaults.
    ///
    /// When `existing` is given its slug, date and author are kept; otherwise
    /// the slug comes from the title and the date is `today`.
    pub fn into_post(self, existing: Option<&Post>, today: NaiveDate) -> Result<Post, EditorError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() {
            return Err(EditorError::MissingTitle);
        }
        if content.is_empty() {
            return Err(EditorError::MissingContent);
        }

        let slug = match existing {
            Some(post) => post.slug.clone(),
            None => {
                let slug = slugify(&title);
                if slug.is_empty() {
                    return Err(EditorError::EmptySlug(title));
                }
                slug
            }
        };

        let excerpt = match self.excerpt.trim() {
            "" => generated_excerpt(&content),
            excerpt => excerpt.to_string(),
        };

        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            category => category.to_string(),
        };

        let tags = self
            .tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect();

        let cover_image = Some(self.cover_image.trim())
            .filter(|s| !s.is_empty())
            .map(String::from);

        let date = existing
            .map(|post| post.date.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

        let author = existing
            .map(|post| post.author.clone())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        Ok(Post {
            slug,
            title,
            excerpt,
            reading_time: reading_time(&content),
            content,
            date,
            author,
            category,
            tags,
            cover_image,
            published: self.published,
        })
    }
}

fn generated_excerpt(content: &str) -> String {
    let head: String = content.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", head)
}

/// Creates, updates and deletes post files
pub struct PostWriter {
    loader: ContentLoader,
}

impl PostWriter {
    pub fn new(loader: ContentLoader) -> Self {
        Self { loader }
    }

    /// Write a new `<slug>.md`; refuses to overwrite any existing post file
    pub fn create(&self, post: &Post) -> Result<PathBuf, EditorError> {
        if self.loader.find_post_file(&post.slug)?.is_some() {
            return Err(EditorError::AlreadyExists(post.slug.clone()));
        }

        let dir = self.loader.posts_dir();
        fs::create_dir_all(dir).map_err(|source| EditorError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(format!("{}.md", post.slug));
        write_post(&path, &post.front_matter(), &post.content)?;
        tracing::info!("Created post {:?}", path);
        Ok(path)
    }

    /// Overwrite the existing file for `post.slug`, keeping its extension.
    ///
    /// Front-matter keys the post model does not know are carried over from
    /// the current file. The block is always written back as YAML.
    pub fn update(&self, post: &Post) -> Result<PathBuf, EditorError> {
        let path = self
            .loader
            .find_post_file(&post.slug)?
            .ok_or_else(|| EditorError::NotFound(post.slug.clone()))?;

        let mut front_matter = post.front_matter();
        front_matter.extra = current_extra(&path)?;
        write_post(&path, &front_matter, &post.content)?;
        tracing::info!("Updated post {:?}", path);
        Ok(path)
    }

    /// Remove the file for `slug`
    pub fn delete(&self, slug: &str) -> Result<PathBuf, EditorError> {
        let path = self
            .loader
            .find_post_file(slug)?
            .ok_or_else(|| EditorError::NotFound(slug.to_string()))?;

        fs::remove_file(&path).map_err(|source| EditorError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Deleted post {:?}", path);
        Ok(path)
    }
}

/// Unknown front-matter keys of the file currently on disk
fn current_extra(path: &Path) -> Result<IndexMap<String, serde_yaml::Value>, EditorError> {
    let source = fs::read_to_string(path).map_err(|source| EditorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (front_matter, _) =
        FrontMatter::parse(&source).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(front_matter.extra)
}

fn write_post(path: &Path, front_matter: &FrontMatter, body: &str) -> Result<(), EditorError> {
    let document = front_matter.to_document(body)?;
    fs::write(path, document).map_err(|source| EditorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn draft() -> PostDraft {
        PostDraft {
            title: "  Hello, World!  ".to_string(),
            content: "Some content here".to_string(),
            tags: "rust, , blog ,".to_string(),
            published: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_into_post_defaults() {
        let post = draft().into_post(None, today()).unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello, World!");
        assert_eq!(post.excerpt, "Some content here...");
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert_eq!(post.tags, vec!["rust", "blog"]);
        assert_eq!(post.date, "2024-06-01");
        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert_eq!(post.cover_image, None);
        assert_eq!(post.reading_time, 1);
    }

    #[test]
    fn test_generated_excerpt_counts_characters() {
        let draft = PostDraft {
            title: "长文".to_string(),
            content: "字".repeat(300),
            ..Default::default()
        };
        let post = draft.into_post(None, today()).unwrap();
        assert_eq!(post.excerpt.chars().count(), 153);
        assert!(post.excerpt.ends_with("..."));
    }

    #[test]
    fn test_into_post_validation() {
        let mut d = draft();
        d.title = "   ".to_string();
        assert!(matches!(d.into_post(None, today()), Err(EditorError::MissingTitle)));

        let mut d = draft();
        d.content = "\n".to_string();
        assert!(matches!(d.into_post(None, today()), Err(EditorError::MissingContent)));

        let mut d = draft();
        d.title = "!!!".to_string();
        assert!(matches!(d.into_post(None, today()), Err(EditorError::EmptySlug(_))));
    }

    #[test]
    fn test_into_post_keeps_existing_identity() {
        let existing = draft().into_post(None, today()).unwrap();
        let mut edit = PostDraft::from_post(&existing);
        edit.title = "A Completely New Title".to_string();

        let later = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let updated = edit.into_post(Some(&existing), later).unwrap();
        assert_eq!(updated.slug, "hello-world");
        assert_eq!(updated.date, "2024-06-01");
        assert_eq!(updated.tags, existing.tags);
    }

    #[test]
    fn test_create_update_delete() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(dir.path().join("posts"));
        let writer = PostWriter::new(loader.clone());

        let post = draft().into_post(None, today()).unwrap();
        let path = writer.create(&post).unwrap();
        assert!(path.ends_with("posts/hello-world.md"));
        assert_eq!(loader.load_post_by_slug("hello-world").unwrap(), post);
        assert!(matches!(writer.create(&post), Err(EditorError::AlreadyExists(_))));

        let mut changed = post.clone();
        changed.category = "技术".to_string();
        writer.update(&changed).unwrap();
        assert_eq!(loader.load_all_posts().unwrap(), vec![changed]);

        writer.delete("hello-world").unwrap();
        assert!(loader.load_all_posts().unwrap().is_empty());
        assert!(matches!(writer.delete("hello-world"), Err(EditorError::NotFound(_))));
    }

    #[test]
    fn test_update_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("series.md"),
            "---\ntitle: Part One\nseries: rust-101\n---\nbody\n",
        )
        .unwrap();
        let loader = ContentLoader::new(dir.path());
        let writer = PostWriter::new(loader.clone());

        let mut post = loader.load_post_by_slug("series").unwrap();
        post.title = "Part 1".to_string();
        writer.update(&post).unwrap();

        let source = fs::read_to_string(dir.path().join("series.md")).unwrap();
        assert!(source.contains("series: rust-101"));
        assert_eq!(loader.load_post_by_slug("series").unwrap().title, "Part 1");
    }

    #[test]
    fn test_update_missing_post() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PostWriter::new(ContentLoader::new(dir.path()));
        let post = draft().into_post(None, today()).unwrap();
        assert!(matches!(writer.update(&post), Err(EditorError::NotFound(_))));
    }

    #[test]
    fn test_unpublished_post_written_but_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(dir.path());
        let writer = PostWriter::new(loader.clone());

        let mut d = draft();
        d.published = false;
        writer.create(&d.into_post(None, today()).unwrap()).unwrap();

        assert!(loader.load_all_posts().unwrap().is_empty());
        assert!(!loader.load_post_by_slug("hello-world").unwrap().published);
    }
}
