//! CLI entry point for lakeblog

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lakeblog::commands::edit::PostChanges;
use lakeblog::commands::{self, export};
use lakeblog::editor::PostDraft;

#[derive(Parser)]
#[command(name = "lakeblog")]
#[command(version)]
#[command(about = "A personal blog kept as markdown files on disk", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// List posts, categories or tags
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Page of the post listing (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Include unpublished posts
        #[arg(long)]
        drafts: bool,
    },

    /// Show a post
    Show {
        slug: String,

        /// Print the rendered HTML body
        #[arg(long)]
        html: bool,
    },

    /// Search titles, excerpts, content, categories and tags
    Search { query: String },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        #[arg(short, long)]
        excerpt: Option<String>,

        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        #[arg(long)]
        cover_image: Option<String>,

        /// Post body
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the post body from a file (`-` for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save without publishing
        #[arg(long)]
        draft: bool,
    },

    /// Edit an existing post
    Edit {
        slug: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        excerpt: Option<String>,

        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,

        #[arg(long)]
        cover_image: Option<String>,

        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the new body from a file (`-` for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,

        #[arg(long)]
        unpublish: bool,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete { slug: String },

    /// Category statistics, popular tags and featured posts
    Stats,

    /// Export posts, categories, tags and rendered HTML as static files
    Export {
        /// Output directory (defaults to <cwd>/public)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Watch for file changes and export again
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove the export directory
    Clean {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn body_from(content: Option<String>, file: Option<PathBuf>) -> Result<Option<String>> {
    match (content, file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(file)) => commands::new::read_content(&file).map(Some),
        (None, None) => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "lakeblog=debug,info"
    } else {
        "lakeblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::List {
            r#type,
            page,
            drafts,
        } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            commands::list::run(&blog, &r#type, page, drafts)?;
        }

        Commands::Show { slug, html } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            commands::show::run(&blog, &slug, html).await?;
        }

        Commands::Search { query } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            commands::search::run(&blog, &query)?;
        }

        Commands::New {
            title,
            excerpt,
            category,
            tags,
            cover_image,
            content,
            file,
            draft,
        } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            let Some(content) = body_from(content, file)? else {
                bail!("a post needs content: pass --content or --file");
            };
            tracing::info!("Creating new post with title: {}", title);
            let draft = PostDraft {
                title,
                excerpt: excerpt.unwrap_or_default(),
                content,
                category: category.unwrap_or_default(),
                tags: tags.unwrap_or_default(),
                cover_image: cover_image.unwrap_or_default(),
                published: !draft,
            };
            commands::new::create_post(&blog, draft)?;
        }

        Commands::Edit {
            slug,
            title,
            excerpt,
            category,
            tags,
            cover_image,
            content,
            file,
            publish,
            unpublish,
        } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            let published = match (publish, unpublish) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let changes = PostChanges {
                title,
                excerpt,
                content: body_from(content, file)?,
                category,
                tags,
                cover_image,
                published,
            };
            commands::edit::update_post(&blog, &slug, changes)?;
        }

        Commands::Delete { slug } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            commands::edit::delete_post(&blog, &slug)?;
        }

        Commands::Stats => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            commands::stats::run(&blog)?;
        }

        Commands::Export { out, watch } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            let out_dir = out.unwrap_or_else(|| base_dir.join(export::DEFAULT_OUT_DIR));
            tracing::info!("Exporting to {:?}...", out_dir);

            export::run(&blog, &out_dir).await?;
            println!("Exported successfully!");

            if watch {
                export::watch(&blog, &out_dir).await?;
            }
        }

        Commands::Clean { out } => {
            let blog = lakeblog::Blog::new(&base_dir)?;
            let out_dir = out.unwrap_or_else(|| base_dir.join(export::DEFAULT_OUT_DIR));
            export::clean(&blog, &out_dir)?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
