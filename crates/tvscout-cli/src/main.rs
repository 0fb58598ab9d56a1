//! tvscout - TMDB TV series discovery CLI.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_discover_form;
use tvscout_api::discover::{
    Combinator, CountBounds, FilterCriteria, GenreFilter, MIN_KEYWORD_QUERY_CHARS, SearchOptions,
    ShowStatus, is_searchable_keyword_query, search_shows, suggest_keywords,
};
use tvscout_api::tmdb::{LocalTmdbApi, TmdbClient, TmdbTvDetails};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "tvscout", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List TMDB TV genres.
    Genres(GenresArgs),
    /// Search TMDB keywords (typeahead lookup without debounce).
    Keywords(KeywordsArgs),
    /// Show details and keywords of one TV series.
    Details(DetailsArgs),
    /// Discover TV series matching the given criteria.
    Discover(DiscoverArgs),
    /// Open the interactive discover form.
    Form(FormArgs),
    /// Inspect or edit the config file.
    Config(ConfigCommand),
    /// Print shell completions to stdout.
    Completions(CompletionsArgs),
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Case-insensitive substring filter on the genre name.
    #[arg(long)]
    filter: Option<String>,
}

/// Arguments for the `keywords` subcommand.
#[derive(clap::Args)]
struct KeywordsArgs {
    /// Search text (more than two characters).
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB series ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `discover` subcommand.
///
/// Omitted flags keep the form defaults.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// How included genres combine: and|or.
    #[arg(long)]
    genre_combinator: Option<Combinator>,
    /// How keywords combine: and|or.
    #[arg(long)]
    keyword_combinator: Option<Combinator>,
    /// Keep shows with more seasons than this.
    #[arg(long)]
    season_min: Option<u32>,
    /// Keep shows with fewer seasons than this.
    #[arg(long)]
    season_max: Option<u32>,
    /// Keep shows with more episodes than this.
    #[arg(long)]
    episode_min: Option<u32>,
    /// Keep shows with fewer episodes than this.
    #[arg(long)]
    episode_max: Option<u32>,
    /// Minimum rating (0-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    rating_min: Option<u8>,
    /// Maximum rating (0-100).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    rating_max: Option<u8>,
    /// First year of the first-air-date range.
    #[arg(long)]
    year_min: Option<i32>,
    /// Last year of the first-air-date range.
    #[arg(long)]
    year_max: Option<i32>,
    /// Comma-separated genre IDs to include (e.g. "18,80").
    #[arg(long, value_delimiter = ',')]
    genres: Vec<u32>,
    /// Comma-separated genre IDs to drop (e.g. "16").
    #[arg(long, value_delimiter = ',')]
    exclude_genres: Vec<u32>,
    /// Comma-separated keyword IDs (e.g. "4379,9882").
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<u64>,
    /// Series status: returning|planned|in-production|ended|cancelled|pilot.
    #[arg(long)]
    status: Option<ShowStatus>,
    /// Detail requests in flight (default: `[search] concurrency`).
    #[arg(long)]
    concurrency: Option<usize>,
}

impl DiscoverArgs {
    /// Builds criteria from the flags on top of the defaults for `current_year`.
    fn to_criteria(&self, current_year: i32) -> FilterCriteria {
        let defaults = FilterCriteria::for_year(current_year);
        FilterCriteria {
            genre_combinator: self.genre_combinator.unwrap_or(defaults.genre_combinator),
            keyword_combinator: self
                .keyword_combinator
                .unwrap_or(defaults.keyword_combinator),
            seasons: CountBounds::new(
                self.season_min.unwrap_or(defaults.seasons.min),
                self.season_max,
            ),
            episodes: CountBounds::new(
                self.episode_min.unwrap_or(defaults.episodes.min),
                self.episode_max,
            ),
            rating_min: self.rating_min.unwrap_or(defaults.rating_min),
            rating_max: self.rating_max.unwrap_or(defaults.rating_max),
            year_min: self.year_min.unwrap_or(defaults.year_min),
            year_max: self.year_max.unwrap_or(defaults.year_max),
            genres: self.genres.iter().copied().collect(),
            excluded_genres: self.exclude_genres.iter().copied().collect(),
            keywords: self.keywords.iter().copied().collect::<BTreeSet<u64>>(),
            status: self.status.unwrap_or(defaults.status),
        }
    }
}

/// Arguments for the `form` subcommand.
#[derive(clap::Args)]
struct FormArgs {
    /// Detail requests in flight (default: `[search] concurrency`).
    #[arg(long)]
    concurrency: Option<usize>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration (secrets redacted).
    Show,
    /// Update values in the config file.
    Set(ConfigSetArgs),
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// TMDB v3 API key.
    #[arg(long)]
    api_key: Option<String>,
    /// TMDB v4 read access token.
    #[arg(long)]
    api_token: Option<String>,
    /// TMDB API base URL.
    #[arg(long)]
    base_url: Option<String>,
    /// Default detail-fetch concurrency.
    #[arg(long)]
    concurrency: Option<usize>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads the config file selected by `--dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from the environment and config file.
///
/// # Errors
///
/// Returns an error if no credential is configured, the base URL is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let credential = config.resolve_credential()?;

    let mut builder = TmdbClient::builder()
        .credential(credential)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid [tmdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;

    let response = client
        .tv_genres()
        .await
        .context("TMDB genre/tv/list request failed")?;

    let mut filter = GenreFilter::new(response.genres.into());
    if let Some(term) = &args.filter {
        filter.set_term(term.as_str());
    }

    tracing::info!("ID\tName");
    for genre in filter.matching() {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", filter.len());

    Ok(())
}

/// Runs the `keywords` subcommand.
///
/// Queries of two characters or fewer are answered locally; no credential
/// is needed for them.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_keywords(args: &KeywordsArgs, dir: Option<&PathBuf>) -> Result<()> {
    if !is_searchable_keyword_query(&args.query) {
        tracing::info!(
            "Found 0 keywords (query must be longer than {MIN_KEYWORD_QUERY_CHARS} characters)"
        );
        return Ok(());
    }

    let client = build_tmdb_client(&load_config(dir)?)?;
    let keywords = suggest_keywords(&client, &args.query).await?;

    tracing::info!("ID\tName");
    for keyword in &keywords {
        tracing::info!("{}\t{}", keyword.id, keyword.name);
    }
    tracing::info!("Found {} keywords", keywords.len());

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;

    let details = client
        .tv_details(args.id)
        .await
        .context("TMDB tv details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!("Name: {}", details.name);
    tracing::info!("Original Name: {}", details.original_name);
    tracing::info!(
        "First Air Date: {}",
        details.first_air_date.as_deref().unwrap_or("-")
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    tracing::info!("Seasons: {}", details.number_of_seasons);
    tracing::info!("Episodes: {}", details.number_of_episodes);
    tracing::info!("Rating: {:.1}", details.vote_average);
    tracing::info!(
        "Genres: {}",
        details
            .genres
            .iter()
            .map(|g| format!("{} ({})", g.name, g.id))
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!("---");
    for keyword in &details.keywords.results {
        tracing::info!("  {}\t{}", keyword.id, keyword.name);
    }

    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the criteria are invalid, the TMDB client fails to
/// build, or any API request fails.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, dir: Option<&PathBuf>) -> Result<()> {
    let criteria = args.to_criteria(Local::now().year());
    criteria.validate()?;

    let config = load_config(dir)?;
    let options = SearchOptions {
        concurrency: args.concurrency.unwrap_or_else(|| config.concurrency()).max(1),
    };
    let client = build_tmdb_client(&config)?;

    let result = search_shows(&client, &criteria, &options).await?;

    tracing::info!(
        "Candidates: {} (of {} total), matched: {}",
        result.candidates,
        result.total_results,
        result.shows.len()
    );
    tracing::info!("{DISCOVER_HEADER}");
    for show in &result.shows {
        tracing::info!("{}", format_show_row(show));
    }

    Ok(())
}

/// Column header for `discover` output.
const DISCOVER_HEADER: &str = "ID\tSeasons\tEpisodes\tRating\tFirstAirDate\tName";

/// Formats one `discover` result row aligned with [`DISCOVER_HEADER`].
fn format_show_row(show: &TmdbTvDetails) -> String {
    format!(
        "{}\t{}\t{}\t{:.1}\t{}\t{}",
        show.id,
        show.number_of_seasons,
        show.number_of_episodes,
        show.vote_average,
        show.first_air_date.as_deref().unwrap_or("-"),
        show.name,
    )
}

/// Runs the `form` subcommand.
///
/// Fetches the genre list once, then launches the TUI.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build, the genre list
/// cannot be fetched, or the TUI fails.
#[instrument(skip_all)]
async fn run_form(args: &FormArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let options = SearchOptions {
        concurrency: args.concurrency.unwrap_or_else(|| config.concurrency()).max(1),
    };
    let client = build_tmdb_client(&config)?;

    tracing::info!("Fetching genre list from TMDB...");
    let genres = client
        .tv_genres()
        .await
        .context("TMDB genre/tv/list request failed")?
        .genres;

    run_discover_form(&client, genres, Local::now().year(), options)
        .await
        .context("discover form TUI failed")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let mark = |v: Option<&String>| if v.is_some() { "(set)" } else { "-" };

    tracing::info!("Config: {}", config_path.display());
    tracing::info!("[tmdb] api_key: {}", mark(config.tmdb.api_key.as_ref()));
    tracing::info!("[tmdb] api_token: {}", mark(config.tmdb.api_token.as_ref()));
    tracing::info!(
        "[tmdb] base_url: {}",
        config.tmdb.base_url.as_deref().unwrap_or("-")
    );
    tracing::info!("[search] concurrency: {}", config.search.concurrency);
    match config.resolve_credential() {
        Ok(credential) => tracing::info!("Effective credential: {credential:?}"),
        Err(_) => tracing::warn!("No TMDB credential configured"),
    }

    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the config file cannot
/// be read or written.
#[instrument(skip_all)]
fn run_config_set(args: ConfigSetArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    if let Some(base_url) = &args.base_url {
        Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
    }
    if args.api_key.is_some() {
        config.tmdb.api_key = args.api_key;
    }
    if args.api_token.is_some() {
        config.tmdb.api_token = args.api_token;
    }
    if args.base_url.is_some() {
        config.tmdb.base_url = args.base_url;
    }
    if let Some(concurrency) = args.concurrency {
        config.search.concurrency = concurrency.max(1);
    }

    config.save(&config_path).context("failed to save config")?;
    tracing::info!("Saved {}", config_path.display());

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Genres(args) => run_genres(&args, dir).await,
        Commands::Keywords(args) => run_keywords(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Discover(args) => run_discover(&args, dir).await,
        Commands::Form(args) => run_form(&args, dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Set(args) => run_config_set(args, dir),
        },
        Commands::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "tvscout", &mut io::stdout());
            Ok(())
        }
    }
}
