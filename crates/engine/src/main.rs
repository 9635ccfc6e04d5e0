//! `gallery` command-line tool.
//!
//! Inspect galleries from the shell: print the SQL a listing runs, list
//! galleries, and show breadcrumbs or keywords for one gallery.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gallery_engine::query::ParentScope;
use gallery_engine::{
    Config, GalleryQuery, GalleryRepository, GalleryStore, HierarchyNavigator, KeywordIndex,
    Level, PgGalleryStore, RenderContext, SortDirection, db,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SQL a listing would run.
    Sql(ListArgs),
    /// List visible galleries.
    List(ListArgs),
    /// Show the breadcrumb trail of a gallery.
    Breadcrumbs {
        /// Gallery id.
        id: i64,

        /// Render the HTML the breadcrumbs tag would emit.
        #[arg(long)]
        html: bool,
    },
    /// Show the unique keywords of a gallery.
    Keywords {
        /// Gallery id.
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// current, top, bottom or all.
    #[arg(long, default_value = "all")]
    level: String,

    /// Column to sort by.
    #[arg(long)]
    by: Option<String>,

    /// asc or desc.
    #[arg(long)]
    order: Option<String>,

    #[arg(long)]
    limit: Option<u64>,

    #[arg(long, default_value = "0")]
    offset: u64,

    /// Comma-separated keywords; matches any.
    #[arg(long)]
    keywords: Option<String>,
}

impl ListArgs {
    fn query(&self, config: &Config) -> Result<GalleryQuery> {
        let level: Level = self.level.parse()?;
        let mut query = GalleryQuery::builder()
            .parent(ParentScope::for_level(level, None, config.base_gallery_id))
            .direction(SortDirection::parse_lenient(self.order.as_deref()))
            .limit(self.limit.unwrap_or(config.settings.default_limit))
            .offset(self.offset);
        if let Some(by) = &self.by {
            query = query.sort_by(by.as_str());
        }
        if let Some(keywords) = &self.keywords {
            query = query.keywords(gallery_engine::keywords::parse_keyword_list(keywords));
        }
        Ok(query.build()?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    if let Command::Sql(args) = &cli.command {
        println!("{}", args.query(&config)?.to_sql());
        return Ok(());
    }

    let pool = db::create_pool(&config).await?;
    info!("Database connection established");
    let store: Arc<dyn GalleryStore> = Arc::new(PgGalleryStore::new(pool));

    match cli.command {
        Command::Sql(_) => {}
        Command::List(args) => {
            let repository = GalleryRepository::new(store);
            let galleries = repository.list(&args.query(&config)?).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&galleries)?);
            } else {
                for gallery in &galleries {
                    println!("{}\t{}\t{}", gallery.id, gallery.position, gallery.name);
                }
            }
        }
        Command::Breadcrumbs { id, html } => {
            let repository = GalleryRepository::new(Arc::clone(&store));
            let Some(gallery) = repository.find_by_id(id).await? else {
                bail!("gallery {id} not found");
            };
            let navigator = HierarchyNavigator::new(store);
            if html {
                let mut context = RenderContext::new(config.page_url.as_str())
                    .with_current_gallery(gallery.clone());
                if let Some(base_id) = config.base_gallery_id {
                    let Some(base) = repository.find_by_id(base_id).await? else {
                        bail!("base gallery {base_id} not found");
                    };
                    context = context.with_base_gallery(base);
                }
                let crumbs = navigator
                    .breadcrumbs(&gallery, &context, &config.settings.breadcrumb_separator)
                    .await?;
                println!("{crumbs}");
                return Ok(());
            }
            let trail = navigator
                .breadcrumb_trail(&gallery, config.base_gallery_id)
                .await?;
            if cli.json {
                let crumbs: Vec<_> = trail
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "id": c.gallery.id,
                            "name": c.gallery.name,
                            "path": c.path,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&crumbs)?);
            } else {
                for crumb in &trail {
                    println!("{}\t/{}", crumb.gallery.name, crumb.path);
                }
            }
        }
        Command::Keywords { id } => {
            let repository = GalleryRepository::new(Arc::clone(&store));
            let Some(gallery) = repository.find_by_id(id).await? else {
                bail!("gallery {id} not found");
            };
            let keywords = KeywordIndex::new(store).keywords_of(&gallery).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&keywords)?);
            } else {
                println!("{}", keywords.join(config.settings.keyword_separator.as_str()));
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
