mod app;
mod cache;
mod commands;
mod config;
mod event;
mod feed;
mod logging;
mod news;
mod query;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use cache::{CacheLayer, MemoryStorage, NoopStorage, SqliteStorage};
use config::Config;
use feed::{filter, ArticleRepository, Feed};
use news::{CategoryFilter, NewsClient};
use ui::views::{ArticleDetailView, ArticleListView};

#[derive(Parser, Debug)]
#[command(name = "newsdeck")]
#[command(about = "A terminal news reader with an offline article cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/newsdeck/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Initial category: all, business, entertainment, health, science, sports, technology
  #[arg(long, default_value = "all")]
  category: CategoryFilter,

  /// Open directly on an article, resolved from the local cache
  #[arg(long, value_name = "ID")]
  article: Option<String>,

  /// Print the listing to stdout instead of starting the UI
  #[arg(long)]
  print: bool,

  /// Filter headlines containing this text
  #[arg(short, long, default_value = "")]
  search: String,

  /// Keep the cache in memory for this session only
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;
  let _log_guard = logging::init_logging(&config.log)?;

  let cache = open_cache(&config, args.no_cache);
  let client = NewsClient::new(&config, Config::get_api_key().ok())?;

  if args.print {
    return print_listing(cache, client, args.category, &args.search).await;
  }

  let mut feed = Feed::with_client(cache.clone(), config.debounce(), client);
  feed.set_search(&args.search);
  feed.start(args.category);

  let mut app = app::App::new(config.title.clone(), Box::new(ArticleListView::new(feed)));
  if let Some(id) = args.article {
    app.push(Box::new(ArticleDetailView::resolve(cache, &id)));
  }
  app.run().await?;

  Ok(())
}

/// Durable cache unless disabled; an unusable database degrades to no
/// caching rather than failing startup
fn open_cache(config: &Config, no_cache: bool) -> CacheLayer {
  if no_cache {
    info!("Caching disabled, using in-memory storage");
    return CacheLayer::new(MemoryStorage::new());
  }

  match SqliteStorage::open(config.cache.path.as_deref()) {
    Ok(storage) => CacheLayer::new(storage),
    Err(e) => {
      warn!("Cache unavailable, continuing without it: {}", e);
      CacheLayer::new(NoopStorage)
    }
  }
}

async fn print_listing(
  cache: CacheLayer,
  client: NewsClient,
  category: CategoryFilter,
  search: &str,
) -> Result<()> {
  let mut repository = ArticleRepository::new(cache);
  let source = repository
    .initialize(|request| async move { client.fetch(&request).await })
    .await
    .map_err(|e| eyre!("{}", e))?;
  info!("Printing listing from {:?}", source);

  let articles = filter::visible(repository.working_set(), category, search);
  if articles.is_empty() {
    println!("No articles.");
    return Ok(());
  }

  for article in articles {
    println!(
      "{}  {:<16}  {}",
      article.published_at.format("%Y-%m-%d %H:%M"),
      article.id(),
      article.title
    );
    println!("{:<36}{}", "", article.link);
  }
  Ok(())
}
