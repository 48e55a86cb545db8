//! Show a single post

use anyhow::{Context, Result};

use crate::query::adjacent;
use crate::Blog;

/// Print a post's metadata, and its rendered HTML when asked
pub async fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    // Go through the typed loader so the user sees why a post is missing
    let post = blog
        .loader()
        .load_post_by_slug(slug)
        .with_context(|| format!("cannot show post {:?}", slug))?;

    println!("{}", post.title);
    println!("  slug:     {}", post.slug);
    println!("  date:     {}", post.date);
    println!("  author:   {}", post.author);
    println!("  category: {}", post.category);
    println!("  tags:     {}", post.tags.join(", "));
    println!("  reading:  {} min", post.reading_time);
    if !post.published {
        println!("  status:   draft");
    }
    if let Some(cover) = &post.cover_image {
        println!("  cover:    {}", cover);
    }
    println!();
    println!("{}", post.excerpt);

    let posts = blog.load_all_posts()?;
    let (newer, older) = adjacent(&posts, &post.slug);
    if let Some(newer) = newer {
        println!("  newer: {} [{}]", newer.title, newer.slug);
    }
    if let Some(older) = older {
        println!("  older: {} [{}]", older.title, older.slug);
    }

    if html {
        let rendered = blog.markdown_to_html(&post.content).await?;
        println!();
        println!("{}", rendered);
    }

    Ok(())
}
