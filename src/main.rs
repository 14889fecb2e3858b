mod cli;

use clap::Parser;
use cli::{Cli, Command};
use dialoguer::Select;
use humansize::{DECIMAL, format_size};
use std::process;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tvdb_client::{
    CastMember, ClientConfig, ConfigError, Mirror, ModelError, ProgressEvent, RemoteId,
    RetrievalError, SeriesDetails, ShowRecord, TvDbApi, TvDbClient, TvDbError,
};

/// Errors of the command line front end
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    TvDb(#[from] TvDbError),

    #[error("Failed to serialize series: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Selection failed: {0}")]
    Selection(#[from] dialoguer::Error),
}

impl From<ModelError> for CliError {
    fn from(error: ModelError) -> Self {
        CliError::TvDb(error.into())
    }
}

impl From<RetrievalError> for CliError {
    fn from(error: RetrievalError) -> Self {
        CliError::TvDb(error.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::TvDb(error.into())
    }
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::ResolvingMirror => {
            println!("Resolving mirror...");
        }
        ProgressEvent::MirrorResolved { address } => {
            println!("Using mirror {}", address);
        }
        ProgressEvent::DownloadingArchive {
            series_id,
            language,
        } => {
            println!("Downloading series {} ({})...", series_id, language);
        }
        ProgressEvent::ArchiveDownloaded { bytes } => {
            println!("Downloaded {}", format_size(bytes, DECIMAL));
        }
        ProgressEvent::ExtractingArchive { .. } => {
            println!("Extracting archive...");
        }
        ProgressEvent::Loaded { .. } => {
            println!();
        }
    }
}

/// Id to request the full record with; search results carry it in either field
fn series_id(show: &ShowRecord) -> i32 {
    if show.base.id > 0 { show.base.id } else { show.show_id }
}

fn print_shows(shows: &[ShowRecord]) {
    if shows.is_empty() {
        println!("No series found.");
        return;
    }

    for show in shows {
        println!(
            "{:>8}  {}  ({})",
            series_id(show),
            show.base.name.as_deref().unwrap_or("<unnamed>"),
            show.base.language.as_deref().unwrap_or("?")
        );
    }
}

fn print_details(details: &SeriesDetails, json: bool, episodes: bool) -> Result<(), CliError> {
    let show = details.show()?;

    if json {
        println!("{}", serde_json::to_string_pretty(show.as_ref())?);
        return Ok(());
    }

    println!("=== {} ===", show.base.name.as_deref().unwrap_or("<unnamed>"));
    if let Some(network) = &show.network {
        println!("Network:  {}", network);
    }
    if let Some(genre) = &show.genre {
        println!("Genre:    {}", genre);
    }
    if let Some(status) = &show.status {
        println!("Status:   {}", status);
    }
    if show.rating >= 0.0 {
        println!("Rating:   {:.1} ({} votes)", show.rating, show.rating_count);
    }
    println!("Episodes: {}", show.episodes.len());
    println!("Artwork:  {}", details.artworks()?.len());

    let mut cast: Vec<&CastMember> = show.cast.iter().collect();
    cast.sort_by(|a, b| a.cmp_by_sort_order(b));
    if !cast.is_empty() {
        println!("\nCast:");
        for member in cast {
            println!(
                "  {} as {}",
                member.name.as_deref().unwrap_or("?"),
                member.role.as_deref().unwrap_or("?")
            );
        }
    }

    if let Some(overview) = &show.base.overview {
        println!("\n{}", overview);
    }

    if episodes {
        println!("\nEpisodes:");
        for episode in &show.episodes {
            println!(
                "  S{:02}E{:02}  {}",
                episode.season_number,
                episode.number,
                episode.base.name.as_deref().unwrap_or("<untitled>")
            );
        }
    }

    Ok(())
}

fn print_mirror(mirror: &Mirror) {
    let capabilities = mirror.capabilities;
    println!(
        "{:>4}  {:<32} xml:{} banners:{} zip:{}",
        mirror.id,
        mirror.address.as_deref().unwrap_or("?"),
        capabilities.xml,
        capabilities.banners,
        capabilities.zip
    );
}

/// Show chosen in the selection prompt; `None` when the prompt was cancelled
fn selected_show(
    shows: &[ShowRecord],
    selection: dialoguer::Result<Option<usize>>,
) -> Result<Option<&ShowRecord>, CliError> {
    Ok(selection?.and_then(|index| shows.get(index)))
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::ConfigPath = cli.command {
        println!("{}", ClientConfig::config_path().display());
        return Ok(());
    }

    let mut config = ClientConfig::load()?;
    if let Some(api_key) = &cli.api_key {
        config.apply_api_key_override(api_key);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let client = TvDbClient::new(config)?;
    let language = cli.language.as_deref();

    match cli.command {
        Command::Mirrors => {
            let mut mirrors = client.mirrors()?;
            mirrors.sort_by(Mirror::cmp_by_id);
            mirrors.iter().for_each(print_mirror);
        }
        Command::Languages => {
            for locale in client.languages(None)? {
                println!(
                    "{:<4} {}",
                    locale.abbreviation.as_deref().unwrap_or("?"),
                    locale.name.as_deref().unwrap_or("?")
                );
            }
        }
        Command::Search { name, pick } => {
            let shows = client.series_by_name(&name, language, None)?;
            if !pick || shows.is_empty() {
                print_shows(&shows);
                return Ok(());
            }

            let items: Vec<String> = shows
                .iter()
                .map(|show| show.base.name.clone().unwrap_or_else(|| series_id(show).to_string()))
                .collect();

            let selection = Select::new()
                .with_prompt("Select a series")
                .items(&items)
                .default(0)
                .interact_opt();

            match selected_show(&shows, selection)? {
                Some(show) => {
                    let id = u32::try_from(series_id(show)).unwrap_or_default();
                    let details = client.full_series_with_progress(id, language, None, handle_progress_event)?;
                    print_details(&details, false, false)?;
                }
                None => println!("Nothing selected."),
            }
        }
        Command::Lookup { imdb, zap2it } => {
            let remote_id = match (imdb, zap2it) {
                (Some(id), _) => RemoteId::Imdb(id),
                (None, Some(id)) => RemoteId::Zap2It(id),
                (None, None) => {
                    return Err(RetrievalError::InvalidArgument {
                        parameter: "remote_id",
                        reason: "Either an IMDb or a Zap2it id is required",
                    }
                    .into());
                }
            };
            print_shows(&client.series_by_remote_id(&remote_id, language, None)?);
        }
        Command::Series { id, json, episodes } => {
            let details = if json {
                client.full_series_by_id(id, language, None)?
            } else {
                client.full_series_with_progress(id, language, None, handle_progress_event)?
            };
            print_details(&details, json, episodes)?;
        }
        Command::ConfigPath => {}
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
