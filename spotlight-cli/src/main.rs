//! Spotlight CLI
//!
//! Command-line surface for the Spotlight artist directory.
//!
//! # Usage
//!
//! ```bash
//! # Store and validate API credentials
//! spotlight configure --client-id ID --client-secret SECRET
//!
//! # Curate the directory
//! spotlight artist add 4Z8W4fKeB5YxbusRsdQVPb
//! spotlight artist list
//!
//! # Autocomplete-style search
//! spotlight search "nina simone" --format json
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::FmtSubscriber;

use spotlight_core::{
    ArtistDirectory, ArtistEntry, ArtistId, CatalogClient, MemoryCache, SettingsStore, TokenCache,
    TokenSource,
};

#[derive(Parser)]
#[command(name = "spotlight")]
#[command(about = "Artist directory backed by the Spotify catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store API credentials and validate them against the token endpoint
    Configure {
        /// OAuth client ID
        #[arg(long)]
        client_id: String,

        /// OAuth client secret
        #[arg(long)]
        client_secret: String,
    },

    /// Manage the artist directory
    #[command(subcommand)]
    Artist(ArtistCommands),

    /// Search the catalog for artists by name
    Search {
        /// Search text; an empty query yields no suggestions
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Allow or restrict viewing of unlisted artists
    OpenAccess {
        /// "on" to allow any artist ID, "off" to restrict to the directory
        state: String,
    },
}

#[derive(Subcommand)]
enum ArtistCommands {
    /// Resolve an artist by ID and add it to the directory
    Add {
        /// Catalog artist ID
        id: String,
    },

    /// Remove an artist from the directory
    Remove {
        /// Catalog artist ID
        id: String,
    },

    /// List the directory's artists
    List,

    /// Show artist details, honoring the access settings
    Show {
        /// Catalog artist ID
        id: String,
    },
}

/// An autocomplete suggestion: the stored value is the artist's ID, the
/// label shown to the user includes the name and the ID.
#[derive(Serialize)]
struct Suggestion {
    value: String,
    label: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        FmtSubscriber::builder()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match cli.command {
        Commands::Configure {
            client_id,
            client_secret,
        } => configure(&client_id, &client_secret).await,
        Commands::Artist(ArtistCommands::Add { id }) => add_artist(&id).await,
        Commands::Artist(ArtistCommands::Remove { id }) => remove_artist(&id),
        Commands::Artist(ArtistCommands::List) => list_artists(),
        Commands::Artist(ArtistCommands::Show { id }) => show_artist(&id).await,
        Commands::Search { query, format } => search(&query, &format).await,
        Commands::OpenAccess { state } => set_open_access(&state),
    }
}

fn load_settings() -> Result<Arc<SettingsStore>> {
    Ok(Arc::new(
        SettingsStore::load().context("failed to load settings")?,
    ))
}

fn catalog_client() -> Result<CatalogClient<TokenCache<MemoryCache>>> {
    let settings = load_settings()?;
    Ok(CatalogClient::new(TokenCache::new(
        MemoryCache::new(),
        settings,
    )))
}

async fn configure(client_id: &str, client_secret: &str) -> Result<()> {
    let settings = load_settings()?;
    settings
        .set_credentials(client_id, client_secret)
        .context("failed to save credentials")?;

    // Validate by forcing a token fetch with the fresh credentials.
    let tokens = TokenCache::new(MemoryCache::new(), settings);
    match tokens.get_token().await {
        Ok(_) => {
            println!("Credentials saved; access token issued successfully.");
            Ok(())
        }
        Err(e) => bail!("credentials saved, but validation failed: {}", e),
    }
}

async fn add_artist(id: &str) -> Result<()> {
    let id = ArtistId::new(id);
    if id.is_empty() {
        bail!("artist ID cannot be empty");
    }

    let catalog = catalog_client()?;
    let artist = match catalog.get_artist(&id).await {
        Ok(artist) => artist,
        Err(e) => bail!("invalid artist ID or unable to fetch artist details: {}", e),
    };

    let directory = ArtistDirectory::load().context("failed to load artist directory")?;
    directory.add(ArtistEntry::new(artist.id, artist.name.clone()))?;

    println!("Artist {} added successfully.", artist.name);
    Ok(())
}

fn remove_artist(id: &str) -> Result<()> {
    let directory = ArtistDirectory::load().context("failed to load artist directory")?;
    directory.remove(&ArtistId::new(id))?;

    println!("Artist removed successfully.");
    Ok(())
}

fn list_artists() -> Result<()> {
    let directory = ArtistDirectory::load().context("failed to load artist directory")?;
    let artists = directory.list()?;

    if artists.is_empty() {
        println!("No artists added yet.");
        return Ok(());
    }

    for entry in artists {
        println!("{} ({})", entry.name, entry.id);
    }
    Ok(())
}

async fn show_artist(id: &str) -> Result<()> {
    let id = ArtistId::new(id);
    let directory = ArtistDirectory::load().context("failed to load artist directory")?;

    if !directory.is_visible(&id)? {
        bail!("this artist is not available for public viewing");
    }

    let catalog = catalog_client()?;
    let artist = match catalog.get_artist(&id).await {
        Ok(artist) => artist,
        Err(e) => bail!("failed to fetch artist details: {}", e),
    };

    println!("{}", artist.name);
    println!("  ID: {}", artist.id);
    if let Some(genres) = artist.raw.get("genres").and_then(|g| g.as_array()) {
        let genres: Vec<&str> = genres.iter().filter_map(|g| g.as_str()).collect();
        if !genres.is_empty() {
            println!("  Genres: {}", genres.join(", "));
        }
    }
    if let Some(followers) = artist
        .raw
        .get("followers")
        .and_then(|f| f.get("total"))
        .and_then(|t| t.as_u64())
    {
        println!("  Followers: {}", followers);
    }
    if let Some(popularity) = artist.raw.get("popularity").and_then(|p| p.as_u64()) {
        println!("  Popularity: {}", popularity);
    }
    Ok(())
}

async fn search(query: &str, format: &str) -> Result<()> {
    let catalog = catalog_client()?;

    // Failures are logged by the client and rendered here as an empty
    // suggestion list, like the autocomplete endpoint this replaces.
    let artists = catalog.search_artists(query).await.unwrap_or_default();

    let suggestions: Vec<Suggestion> = artists
        .iter()
        .map(|artist| Suggestion {
            value: artist.id.to_string(),
            label: artist.label(),
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string(&suggestions)?),
        _ => {
            if suggestions.is_empty() {
                println!("No matches.");
            }
            for suggestion in suggestions {
                println!("{}", suggestion.label);
            }
        }
    }
    Ok(())
}

fn set_open_access(state: &str) -> Result<()> {
    let open = match state {
        "on" => true,
        "off" => false,
        other => bail!("expected 'on' or 'off', got '{}'", other),
    };

    let directory = ArtistDirectory::load().context("failed to load artist directory")?;
    directory.set_open_access(open)?;

    println!(
        "Access settings saved: {}",
        if open {
            "any artist ID can be viewed"
        } else {
            "only directory artists can be viewed"
        }
    );
    Ok(())
}
