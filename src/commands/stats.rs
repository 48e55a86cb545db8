//! Blog overview: category statistics, popular tags and featured posts

use anyhow::Result;

use crate::query::featured;
use crate::taxonomy::{self, CategoryStats};
use crate::Blog;

/// Number of tags shown as "popular"
pub const POPULAR_TAG_COUNT: usize = 10;

pub fn run(blog: &Blog) -> Result<()> {
    let posts = blog.load_all_posts()?;
    let categories = taxonomy::categories(&posts);
    let tags = taxonomy::tags(&posts);
    let stats = CategoryStats::from_categories(&categories);

    println!("{} - {}", blog.config.site_name, blog.config.site_description);
    println!();
    println!("Categories:        {}", stats.total_categories);
    println!("Posts:             {}", stats.total_posts);
    println!("Avg per category:  {}", stats.average_posts);
    println!("Max in category:   {}", stats.max_posts);
    println!("Tags:              {}", tags.len());

    let popular = taxonomy::popular_tags(&tags, POPULAR_TAG_COUNT);
    if !popular.is_empty() {
        println!();
        println!("Popular tags:");
        for (rank, tag) in popular.iter().enumerate() {
            println!("  #{} {} ({} 篇)", rank + 1, tag.name, tag.count);
        }
    }

    let featured = featured(&posts, blog.config.featured_posts_count);
    if !featured.is_empty() {
        println!();
        println!("Featured:");
        for post in featured {
            println!("  {} - {} [{}]", post.date, post.title, post.slug);
        }
    }

    Ok(())
}
