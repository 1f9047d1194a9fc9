use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cinema::application::{
    BookmarksController, ListKind, MovieListController, SEARCH_DEBOUNCE, SearchController,
};
use cinema::domain::deep_link;
use cinema::domain::entities::Movie;
use cinema::domain::ports::{BookmarkStorePort, CatalogPort, ResponseCachePort};
use cinema::infrastructure::{
    AppConfig, CliArgs, Command, Database, DiskImageCache, ImageLoader, MemoryImageCache,
    MovieCatalogService, SqliteBookmarkStore, SqliteResponseCache, TmdbClient,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

/// Process-wide stores, wired once at startup.
struct Stores {
    database: Database,
    response_cache: Arc<SqliteResponseCache>,
    bookmarks: Arc<dyn BookmarkStorePort>,
}

fn open_stores(config: &AppConfig) -> Stores {
    let database = Database::open(AppConfig::database_path());

    let response_cache = Arc::new(SqliteResponseCache::with_ttl(
        database.clone(),
        config.cache.response_ttl(),
    ));
    let bookmarks: Arc<dyn BookmarkStorePort> = Arc::new(SqliteBookmarkStore::new(database.clone()));

    // Expired cached responses are also swept opportunistically at start.
    let sweeper = Arc::clone(&response_cache);
    tokio::spawn(async move { sweeper.sweep_expired().await });

    Stores {
        database,
        response_cache,
        bookmarks,
    }
}

fn build_catalog(config: &AppConfig, stores: &Stores) -> Result<Arc<dyn CatalogPort>> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        eyre!("no API key configured; set TMDB_API_KEY or api_key in config.toml")
    })?;

    let client = TmdbClient::with_base_url(config.base_url.clone(), api_key)?;
    let cache = Arc::clone(&stores.response_cache) as Arc<dyn ResponseCachePort>;
    Ok(Arc::new(MovieCatalogService::new(client, cache)))
}

async fn print_movies(movies: &[Movie], bookmarks: &Arc<dyn BookmarkStorePort>) {
    for movie in movies {
        let marker = if bookmarks.is_bookmarked(movie.id).await {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} {:>8}  {:<44}  {:>4}  {}",
            movie.id,
            movie.title,
            movie.formatted_rating(),
            movie.formatted_release_date(),
        );
    }
}

async fn run_list(
    kind: ListKind,
    pages: u32,
    catalog: Arc<dyn CatalogPort>,
    bookmarks: Arc<dyn BookmarkStorePort>,
) {
    let mut controller = MovieListController::new(kind, catalog, Arc::clone(&bookmarks));
    controller.load_initial().await;
    for _ in 1..pages {
        controller.load_more().await;
    }

    print_movies(&controller.state().movies, &bookmarks).await;
    if let Some(message) = &controller.state().error_message {
        eprintln!("{message}");
    }
}

async fn run_search(
    query: &str,
    pages: u32,
    catalog: Arc<dyn CatalogPort>,
    bookmarks: Arc<dyn BookmarkStorePort>,
) {
    let mut controller = SearchController::new(catalog, Arc::clone(&bookmarks));
    controller.search(query);

    // Wait out the debounce window, then the fetch itself.
    tokio::time::sleep(SEARCH_DEBOUNCE + Duration::from_millis(50)).await;
    while controller.state().is_loading {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    for _ in 1..pages {
        controller.load_more().await;
    }

    let state = controller.state();
    print_movies(&state.movies, &bookmarks).await;
    if let Some(message) = &state.error_message {
        eprintln!("{message}");
    }
}

async fn run_bookmarks(bookmarks: Arc<dyn BookmarkStorePort>) {
    let mut controller = BookmarksController::new(Arc::clone(&bookmarks));
    controller.load().await;

    print_movies(controller.movies(), &bookmarks).await;
    if let Some(message) = controller.error_message() {
        eprintln!("{message}");
    }
}

async fn run_toggle_bookmark(
    id: u64,
    catalog: Arc<dyn CatalogPort>,
    bookmarks: Arc<dyn BookmarkStorePort>,
) -> Result<()> {
    let id = cinema::domain::entities::MovieId(id);
    if bookmarks.is_bookmarked(id).await {
        bookmarks.remove(id).await;
        println!("Removed bookmark for movie {id}");
    } else {
        let movie = catalog.movie_details(id).await?;
        bookmarks.save(&movie).await;
        println!("Bookmarked {}", movie.title);
    }
    Ok(())
}

async fn run_open(link: &str, config: &AppConfig, catalog: Arc<dyn CatalogPort>) -> Result<()> {
    let Some(id) = deep_link::parse_movie_deep_link(link) else {
        // Unrecognized links are ignored.
        warn!(link, "Ignoring unrecognized deep link");
        return Ok(());
    };

    let movie = catalog.movie_details(id).await?;
    println!("{} ({})", movie.title, movie.formatted_release_date());
    println!("Rating: {} ({} votes)", movie.formatted_rating(), movie.vote_count);
    println!("Share:  {}", movie.share_url());
    println!();
    println!("{}", movie.overview);

    if let Some(poster) = movie.poster_url() {
        let memory = Arc::new(MemoryImageCache::new(
            config.cache.image_memory_count,
            config.cache.image_memory_bytes,
        ));
        let disk = DiskImageCache::new(AppConfig::image_cache_dir(), config.cache.image_max_age())
            .await?;
        let loader = ImageLoader::new(memory, disk)?;
        match loader.load(&poster).await {
            Ok((image, source)) => println!(
                "\nPoster: {poster} ({}x{}, {source:?})",
                image.width(),
                image.height()
            ),
            Err(e) => warn!(url = %poster, error = %e, "Failed to load poster"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let mut config = AppConfig::load(args.config.as_deref());
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = cinema::VERSION, "Starting cinema");

    let stores = open_stores(&config);
    // The store initializes in the background; give it a bounded window
    // before the first query. Stores degrade to empty results past it.
    if !stores.database.wait_ready(Duration::from_secs(5)).await {
        warn!("Persistent store not ready; continuing without it");
    }

    match args.command {
        Command::Trending { pages } => {
            let catalog = build_catalog(&config, &stores)?;
            run_list(ListKind::Trending, pages, catalog, stores.bookmarks).await;
        }
        Command::NowPlaying { pages } => {
            let catalog = build_catalog(&config, &stores)?;
            run_list(ListKind::NowPlaying, pages, catalog, stores.bookmarks).await;
        }
        Command::Search { query, pages } => {
            let catalog = build_catalog(&config, &stores)?;
            run_search(&query, pages, catalog, stores.bookmarks).await;
        }
        Command::Bookmarks => run_bookmarks(stores.bookmarks).await,
        Command::Bookmark { id } => {
            let catalog = build_catalog(&config, &stores)?;
            run_toggle_bookmark(id, catalog, stores.bookmarks).await?;
        }
        Command::Open { link } => {
            let catalog = build_catalog(&config, &stores)?;
            run_open(&link, &config, catalog).await?;
        }
    }

    // Cache writes run on background tasks; let them land before the
    // runtime shuts down.
    tokio::time::sleep(Duration::from_millis(150)).await;

    Ok(())
}
