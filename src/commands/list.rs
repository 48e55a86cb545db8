//! List blog content

use anyhow::{bail, Result};

use crate::query::paginate;
use crate::taxonomy;
use crate::Blog;

/// List blog content by type
pub fn run(blog: &Blog, content_type: &str, page: usize, drafts: bool) -> Result<()> {
    let loader = blog.loader();

    match content_type {
        "post" | "posts" => {
            let posts = if drafts {
                loader.load_every_post()?
            } else {
                loader.load_all_posts()?
            };
            let listing = paginate(&posts, page, blog.config.posts_per_page);
            println!(
                "Posts ({}), page {}/{}:",
                listing.total_items,
                listing.page,
                listing.total_pages.max(1)
            );
            for post in &listing.items {
                let marker = if post.published { "" } else { " (draft)" };
                println!(
                    "  {} - {} [{}] {} min{}",
                    post.date, post.title, post.slug, post.reading_time, marker
                );
            }
        }
        "tag" | "tags" => {
            let tags = blog.all_tags()?;
            println!("Tags ({}):", tags.len());
            for tag in taxonomy::popular_tags(&tags, tags.len()) {
                println!("  {} ({}) -> {}", tag.name, tag.count, tag.slug);
            }
        }
        "category" | "categories" => {
            let categories = blog.all_categories()?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!(
                    "  {} - {} -> {}",
                    category.name, category.description, category.slug
                );
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
