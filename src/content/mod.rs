//! Content module - handles posts, front-matter and markdown processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod slug;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use loader::{ContentError, ContentLoader};
pub use markdown::{markdown_to_html, MarkdownRenderer, RenderError};
pub use post::{reading_time, Category, Post, Tag, WORDS_PER_MINUTE};
pub use slug::slugify;
