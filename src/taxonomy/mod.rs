//! Category and tag aggregation
//!
//! Both collections are rebuilt from a post list on every call. Entries come
//! back in first-seen order; callers that want popularity order sort with
//! [`popular_tags`].

use indexmap::IndexMap;
use serde::Serialize;

use crate::content::{Category, Post, Tag};

/// Count posts per category, in first-seen order
pub fn categories(posts: &[Post]) -> Vec<Category> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for post in posts {
        *counts.entry(post.category.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(name, count)| Category::new(name, count))
        .collect()
}

/// Count posts per tag string (case-sensitive), in first-seen order
pub fn tags(posts: &[Post]) -> Vec<Tag> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for tag in posts.iter().flat_map(|post| &post.tags) {
        *counts.entry(tag.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(name, count)| Tag::new(name, count))
        .collect()
}

/// The `limit` most used tags, ties keeping their original order
pub fn popular_tags(tags: &[Tag], limit: usize) -> Vec<Tag> {
    let mut sorted = tags.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(limit);
    sorted
}

/// Tag-cloud scale for a tag, between 0.8 and 2.5
pub fn tag_weight(tag: &Tag, tags: &[Tag]) -> f64 {
    let max = tags.iter().map(|t| t.count).max().unwrap_or(0);
    let min = tags.iter().map(|t| t.count).min().unwrap_or(0);
    let ratio = if max > min {
        (tag.count.saturating_sub(min)) as f64 / (max - min) as f64
    } else {
        0.0
    };
    f64::max(0.8, 1.0 + ratio * 1.5)
}

/// Other tags to suggest on a tag's page
pub fn related_tags<'a>(tags: &'a [Tag], current_slug: &str, limit: usize) -> Vec<&'a Tag> {
    tags.iter()
        .filter(|t| t.slug != current_slug)
        .take(limit)
        .collect()
}

/// Summary numbers shown on the categories overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total_categories: usize,
    pub total_posts: usize,
    /// Posts per category, rounded to the nearest integer
    pub average_posts: usize,
    pub max_posts: usize,
}

impl CategoryStats {
    pub fn from_categories(categories: &[Category]) -> Self {
        let total_categories = categories.len();
        let total_posts: usize = categories.iter().map(|c| c.count).sum();
        let average_posts = if total_categories == 0 {
            0
        } else {
            (total_posts as f64 / total_categories as f64).round() as usize
        };
        let max_posts = categories.iter().map(|c| c.count).max().unwrap_or(0);

        Self {
            total_categories,
            total_posts,
            average_posts,
            max_posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    fn post(slug: &str, category: &str, tags: &[&str]) -> Post {
        let fm = FrontMatter {
            title: slug.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        Post::from_front_matter(slug.to_string(), fm, "")
    }

    fn sample() -> Vec<Post> {
        vec![
            post("a", "技术", &["Rust", "cli"]),
            post("b", "生活", &["travel"]),
            post("c", "技术", &["Rust", "rust"]),
            post("d", "Web Dev", &[]),
        ]
    }

    #[test]
    fn test_categories_first_seen_order() {
        let cats = categories(&sample());
        let names: Vec<_> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["技术", "生活", "Web Dev"]);
        assert_eq!(cats[0].count, 2);
        assert_eq!(cats[0].description, "2 篇文章");
        assert_eq!(cats[2].slug, "web-dev");
    }

    #[test]
    fn test_category_counts_sum_to_post_count() {
        let posts = sample();
        let total: usize = categories(&posts).iter().map(|c| c.count).sum();
        assert_eq!(total, posts.len());
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let tags = tags(&sample());
        let pairs: Vec<_> = tags.iter().map(|t| (t.name.as_str(), t.count)).collect();
        assert_eq!(
            pairs,
            vec![("Rust", 2), ("cli", 1), ("travel", 1), ("rust", 1)]
        );
        // Different names, same slug: no collision detection
        assert_eq!(tags[0].slug, tags[3].slug);
    }

    #[test]
    fn test_popular_tags() {
        let all = tags(&sample());
        let popular = popular_tags(&all, 2);
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].name, "Rust");
        assert_eq!(popular[1].name, "cli");
    }

    #[test]
    fn test_tag_weight_bounds() {
        let all = tags(&sample());
        assert_eq!(tag_weight(&all[0], &all), 2.5);
        assert_eq!(tag_weight(&all[1], &all), 1.0);

        let flat = vec![Tag::new("x", 1), Tag::new("y", 1)];
        assert_eq!(tag_weight(&flat[0], &flat), 1.0);
    }

    #[test]
    fn test_related_tags_skips_current() {
        let all = tags(&sample());
        let related = related_tags(&all, "cli", 10);
        assert!(related.iter().all(|t| t.slug != "cli"));
        assert_eq!(related.len(), 3);
    }

    #[test]
    fn test_category_stats() {
        let stats = CategoryStats::from_categories(&categories(&sample()));
        assert_eq!(stats.total_categories, 3);
        assert_eq!(stats.total_posts, 4);
        assert_eq!(stats.average_posts, 1);
        assert_eq!(stats.max_posts, 2);

        let empty = CategoryStats::from_categories(&[]);
        assert_eq!(empty.total_posts, 0);
        assert_eq!(empty.average_posts, 0);
    }
}
