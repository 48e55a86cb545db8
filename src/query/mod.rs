//! Filtering, search and listing helpers over a loaded post list

use serde::Serialize;

use crate::content::{slugify, Post};

/// Posts whose category slugifies to `category_slug`
pub fn by_category(posts: Vec<Post>, category_slug: &str) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| slugify(&post.category) == category_slug)
        .collect()
}

/// Posts carrying at least one tag that slugifies to `tag_slug`
pub fn by_tag(posts: Vec<Post>, tag_slug: &str) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| post.tags.iter().any(|tag| slugify(tag) == tag_slug))
        .collect()
}

/// Case-insensitive substring search.
///
/// Matches title, excerpt, content, category and each tag. A blank query
/// matches nothing rather than everything.
pub fn search(posts: Vec<Post>, query: &str) -> Vec<Post> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    posts
        .into_iter()
        .filter(|post| matches_query(post, &needle))
        .collect()
}

fn matches_query(post: &Post, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&post.title)
        || contains(&post.excerpt)
        || contains(&post.content)
        || contains(&post.category)
        || post.tags.iter().any(|tag| contains(tag))
}

/// The first `count` posts of a date-sorted list
pub fn featured(posts: &[Post], count: usize) -> &[Post] {
    &posts[..count.min(posts.len())]
}

/// Newer and older neighbours of the post with `slug`
pub fn adjacent<'a>(posts: &'a [Post], slug: &str) -> (Option<&'a Post>, Option<&'a Post>) {
    match posts.iter().find(|p| p.slug == slug) {
        Some(post) => (post.prev(posts), post.next(posts)),
        None => (None, None),
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number that was requested
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `items` into 1-based pages of `per_page` entries
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Paginated<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let page_items = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    Paginated {
        items: page_items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn post(slug: &str, title: &str, category: &str, tags: &[&str], body: &str) -> Post {
        let fm = FrontMatter {
            title: title.to_string(),
            excerpt: format!("About {}", slug),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        Post::from_front_matter(slug.to_string(), fm, body)
    }

    fn sample() -> Vec<Post> {
        vec![
            post("rust-intro", "Getting Started with Rust", "技术", &["Rust", "入门"], "cargo new"),
            post("tokyo", "Tokyo Trip", "生活", &["Travel"], "sushi and trains"),
            post("web", "Web Dev Notes", "Web Dev", &["HTTP"], "status codes"),
        ]
    }

    #[test]
    fn test_by_category() {
        let found = by_category(sample(), "技术");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slug, "rust-intro");
        assert_eq!(by_category(sample(), "web-dev")[0].slug, "web");
        assert!(by_category(sample(), "Web Dev").is_empty());
    }

    #[test]
    fn test_by_tag() {
        assert_eq!(by_tag(sample(), "rust")[0].slug, "rust-intro");
        assert_eq!(by_tag(sample(), "入门")[0].slug, "rust-intro");
        assert!(by_tag(sample(), "Rust").is_empty());
    }

    #[test]
    fn test_search_empty_query() {
        assert!(search(sample(), "").is_empty());
        assert!(search(sample(), "   ").is_empty());
    }

    #[test]
    fn test_search_no_match() {
        assert!(search(sample(), "nonexistent-token-xyz").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        for q in ["started with", "STARTED WITH", "Started With"] {
            let found = search(sample(), q);
            assert_eq!(found.len(), 1, "{}", q);
            assert_eq!(found[0].slug, "rust-intro");
        }
    }

    #[test]
    fn test_search_fields() {
        assert_eq!(search(sample(), "SUSHI")[0].slug, "tokyo");
        assert_eq!(search(sample(), "about web")[0].slug, "web");
        assert_eq!(search(sample(), "生活")[0].slug, "tokyo");
        assert_eq!(search(sample(), "http")[0].slug, "web");
    }

    #[test]
    fn test_featured_and_adjacent() {
        let posts = sample();
        assert_eq!(featured(&posts, 2).len(), 2);
        assert_eq!(featured(&posts, 10).len(), 3);

        let (newer, older) = adjacent(&posts, "tokyo");
        assert_eq!(newer.map(|p| p.slug.as_str()), Some("rust-intro"));
        assert_eq!(older.map(|p| p.slug.as_str()), Some("web"));
        assert_eq!(adjacent(&posts, "missing"), (None, None));
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=13).collect();

        let first = paginate(&items, 1, 6);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = paginate(&items, 3, 6);
        assert_eq!(last.items, vec![13]);
        assert!(!last.has_next());

        let beyond = paginate(&items, 9, 6);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 13);

        assert_eq!(paginate(&items, 0, 0).items, vec![1]);
        assert_eq!(paginate::<u32>(&[], 1, 6).total_pages, 0);
    }
}
