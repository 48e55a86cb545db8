//! Initialize a new blog

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::BlogConfig;
use crate::editor::PostDraft;
use crate::{Blog, CONFIG_FILE};

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    let config = BlogConfig::default();
    fs::create_dir_all(target_dir.join(&config.posts_dir))?;

    let config_content = format!(
        "# Blog configuration\n\n{}",
        serde_yaml::to_string(&config)?
    );
    fs::write(&config_path, config_content)?;

    let blog = Blog::with_config(target_dir, config);
    let today = chrono::Local::now().date_naive();
    let sample = PostDraft {
        title: "Hello World".to_string(),
        excerpt: "第一篇文章".to_string(),
        content: SAMPLE_BODY.to_string(),
        category: "分享".to_string(),
        tags: "blog, markdown".to_string(),
        published: true,
        ..Default::default()
    }
    .into_post(None, today)?;
    blog.writer().create(&sample)?;

    Ok(())
}

const SAMPLE_BODY: &str = r#"Welcome! This is your very first post.

## Writing

Every markdown file in `content/posts` is a post. The file name is the slug:
`content/posts/hello-world.md` is served as `hello-world`.

```bash
$ lakeblog new "My New Post" --category 技术 --tags rust,cli
```

## Drafts

Set `published: false` in the front-matter to keep a post out of listings.
"#;
