// SPDX-FileCopyrightText: 2026 Jukebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jukebot - a generative-media chat bot.
//!
//! This is the binary entry point. It loads and validates configuration,
//! initializes logging, and wires the core services. The chat-platform
//! client itself is an external collaborator: a deployment connects one
//! and routes slash-command invocations into `jukebot-commands`.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use jukebot_config::JukebotConfig;
use jukebot_core::JukebotError;
use jukebot_media::ArtifactStore;
use jukebot_openai::OpenAiClient;
use jukebot_storage::{Database, SqliteRecordStore};
use tracing::info;

/// Jukebot - a generative-media chat bot.
#[derive(Parser, Debug)]
#[command(name = "jukebot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Jukebot core services.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match jukebot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            jukebot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve(&config).await {
                eprintln!("jukebot serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        None => {
            println!("jukebot: use --help for available commands");
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Opens storage and the backend client, then waits for a platform adapter.
async fn serve(config: &JukebotConfig) -> Result<(), JukebotError> {
    let database = Database::open(&config.storage.database_path).await?;
    let _records = SqliteRecordStore::new(database);

    let api_key = config.backend.api_key.clone().ok_or_else(|| {
        JukebotError::Config(
            "backend.api_key is not set (jukebot.toml or JUKEBOT_BACKEND_API_KEY)".into(),
        )
    })?;
    let mut backend = OpenAiClient::new(api_key, config.backend.text_model.clone())?;
    if let Some(base_url) = &config.backend.base_url {
        backend = backend.with_base_url(base_url.clone());
    }

    let _artifacts = ArtifactStore::new(&config.artifacts.root)?;

    info!(
        database = %config.storage.database_path,
        artifacts = %config.artifacts.root,
        "core services ready"
    );
    println!(
        "jukebot: core services ready; connect a chat-platform adapter to \
         register the slash commands"
    );
    Ok(())
}

fn print_config(config: &JukebotConfig) {
    println!("agent.name = {}", config.agent.name);
    println!("agent.log_level = {}", config.agent.log_level);
    println!("backend.text_model = {}", config.backend.text_model);
    println!("backend.vision_model = {}", config.backend.vision_model);
    println!("backend.image_model = {}", config.backend.image_model);
    println!("backend.speech_model = {}", config.backend.speech_model);
    println!("backend.video_model = {}", config.backend.video_model);
    println!(
        "backend.poll_interval_secs = {}",
        config.backend.poll_interval_secs
    );
    println!(
        "limits.image_daily_limit = {}",
        config.limits.image_daily_limit
    );
    println!(
        "auth.video_allowed_users = {:?}",
        config.auth.video_allowed_users
    );
    println!("storage.database_path = {}", config.storage.database_path);
    println!("artifacts.root = {}", config.artifacts.root);
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = jukebot_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "jukebot");
    }
}
