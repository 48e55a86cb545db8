//! Post, Category and Tag models

use serde::{Deserialize, Serialize};

use super::frontmatter::{parse_date_string, FrontMatter};

/// Words read per minute when estimating reading time
pub const WORDS_PER_MINUTE: usize = 200;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// URL-friendly identifier, the source file stem
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    /// Raw markdown body
    pub content: String,

    /// Publication date as written in the front-matter
    pub date: String,

    pub author: String,

    pub category: String,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    pub published: bool,

    /// Estimated minutes to read, derived from `content`
    pub reading_time: usize,
}

impl Post {
    /// Build a post from parsed front-matter and its body
    pub fn from_front_matter(slug: String, fm: FrontMatter, body: &str) -> Self {
        Self {
            slug,
            title: fm.title,
            excerpt: fm.excerpt,
            content: body.to_string(),
            date: fm.date.unwrap_or_default(),
            author: fm.author,
            category: fm.category,
            tags: fm.tags,
            cover_image: fm.cover_image,
            published: fm.published,
            reading_time: reading_time(body),
        }
    }

    /// The front-matter that writes this post back to disk
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            date: (!self.date.is_empty()).then(|| self.date.clone()),
            author: self.author.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            cover_image: self.cover_image.clone(),
            published: self.published,
            extra: Default::default(),
        }
    }

    /// Timestamp used for ordering, `None` when the date does not parse
    pub fn timestamp(&self) -> Option<i64> {
        parse_date_string(&self.date).map(|dt| dt.and_utc().timestamp())
    }

    /// Get the previous (newer) post in a date-sorted list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        pos.checked_sub(1).map(|i| &posts[i])
    }

    /// Get the next (older) post in a date-sorted list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

/// Minutes needed to read `content`, rounded up
pub fn reading_time(content: &str) -> usize {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE)
}

/// A category with its published post count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: usize,
}

impl Category {
    pub fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            slug: super::slugify(name),
            description: format!("{} 篇文章", count),
            count,
        }
    }
}

/// A tag with the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

impl Tag {
    pub fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            slug: super::slugify(name),
            count,
        }
    }
}
