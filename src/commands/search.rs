//! Search posts

use anyhow::Result;

use crate::Blog;

pub fn run(blog: &Blog, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        println!("Enter a keyword to search titles, content, categories and tags.");
        return Ok(());
    }

    let results = blog.search(text)?;
    println!("Found {} posts matching '{}':", results.len(), text);
    for post in results {
        println!("  {} - {} [{}]", post.date, post.title, post.slug);
    }

    Ok(())
}
