//! Blog configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main blog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub site_name: String,
    pub site_description: String,
    #[serde(default)]
    pub author: AuthorProfile,

    // Listing
    pub posts_per_page: usize,
    pub featured_posts_count: usize,

    // Content
    /// Posts directory, relative to the blog base directory
    pub posts_dir: String,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            site_name: "Lakeminder Blog".to_string(),
            site_description: "一个现代化的个人博客，分享技术、生活和思考".to_string(),
            author: AuthorProfile::default(),

            posts_per_page: 6,
            featured_posts_count: 3,

            posts_dir: "content/posts".to_string(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: BlogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

/// The blog author's public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorProfile {
    pub name: String,
    pub bio: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
}

impl Default for AuthorProfile {
    fn default() -> Self {
        Self {
            name: "lakeminder".to_string(),
            bio: String::new(),
            avatar: None,
            social: SocialLinks::default(),
        }
    }
}

/// Optional social profile links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

/// Code block highlighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}
