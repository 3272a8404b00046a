mod auth;
mod cli;
mod config;
mod notes;
mod storage;
mod tui;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use jot_core::{
    notes::{search_and_sort, NoteRepository, SortMode},
    storage::KvStore,
};
use jot_notes::KvNoteRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point wiring the CLI to the credential and note stores.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(cli::Command::Tui) {
        cli::Command::Tui => run_tui(&config).await?,
        cli::Command::Signup { username, password } => {
            auth::signup(&username, &password, &config).await?
        }
        cli::Command::Login { username, password } => {
            auth::login(&username, &password, &config).await?
        }
        cli::Command::Logout => auth::logout(&config).await?,
        cli::Command::Whoami => auth::whoami(&config).await?,
        cli::Command::Note(cmd) => notes::handle(cmd, &config).await?,
        cli::Command::Version => print_version(),
        cli::Command::Health => run_health_check(&config).await?,
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("jot {}", env!("CARGO_PKG_VERSION"));
}

async fn run_tui(config: &config::Config) -> Result<()> {
    let username = auth::session_user(config).await?.ok_or_else(|| {
        color_eyre::eyre::eyre!("not logged in; run `jot login <username>` first")
    })?;
    let repo = KvNoteRepo::new(storage::store_from_config(config)?);
    let notes = repo
        .list(&username)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let visible = search_and_sort(&notes, "", SortMode::NewestFirst);
    tui::launch(&username, &visible)
}

/// Runs a quick round-trip probe of the storage backend.
async fn run_health_check(config: &config::Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    run_store_health(&store).await?;
    println!("Storage: ok");
    Ok(())
}

async fn run_store_health<S: KvStore>(store: &S) -> Result<()> {
    let probe_key = "health/probe";
    let payload = b"ok";
    store
        .put(probe_key, payload)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let round_trip = store
        .get(probe_key)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    store
        .delete(probe_key)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;

    if round_trip != payload {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage;
    use jot_auth::KvAuthStore;
    use jot_core::{auth::AuthStore, notes::NoteDraft};

    #[tokio::test]
    async fn health_check_with_test_store_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = storage::test_store(dir.path());
        run_store_health(&store)
            .await
            .expect("health check should succeed");
    }

    #[tokio::test]
    async fn full_scenario_against_the_file_store() {
        let dir = tempfile::tempdir().expect("tempdir");

        let auth = KvAuthStore::new(storage::test_store(dir.path()));
        assert!(auth.register("alice", "secret").await.expect("register"));
        assert_eq!(
            auth.current_user().await.expect("current").as_deref(),
            Some("alice")
        );

        let repo = KvNoteRepo::new(storage::test_store(dir.path()));
        let created = repo
            .add(
                "alice",
                NoteDraft {
                    title: "Groceries".into(),
                    body: "milk, eggs".into(),
                    image_uri: None,
                },
            )
            .await
            .expect("add");

        let notes = repo.list("alice").await.expect("list");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Groceries");

        repo.delete("alice", created.id).await.expect("delete");
        assert!(repo.list("alice").await.expect("list").is_empty());
    }
}
