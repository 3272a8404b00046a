use color_eyre::Result;
use jot_core::notes::{search_and_sort, Note, NoteDraft, NotePatch, NoteRepository};
use jot_notes::KvNoteRepo;
use uuid::Uuid;

use crate::{auth, cli::NoteCommand, config, storage};

/// Execute a note subcommand for the logged-in user.
pub async fn handle(cmd: NoteCommand, config: &config::Config) -> Result<()> {
    let username = auth::session_user(config).await?.ok_or_else(|| {
        color_eyre::eyre::eyre!("not logged in; run `jot login <username>` first")
    })?;
    let repo = KvNoteRepo::new(storage::store_from_config(config)?);

    match cmd {
        NoteCommand::List { search, sort } => {
            let notes = repo
                .list(&username)
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
            let visible = search_and_sort(&notes, search.as_deref().unwrap_or(""), sort.into());
            if visible.is_empty() {
                println!("No notes. Add one with `jot note add <title>`.");
                return Ok(());
            }
            for note in visible {
                print_note(&note);
            }
        }
        NoteCommand::Add { title, body, image } => {
            let note = repo
                .add(
                    &username,
                    NoteDraft {
                        title: fallback_title(&title),
                        body: body.trim().to_string(),
                        image_uri: image,
                    },
                )
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
            println!("Created note {}: {}", note.id, note.title);
        }
        NoteCommand::Edit {
            id,
            title,
            body,
            image,
            remove_image,
        } => {
            let patch = NotePatch {
                title: title.map(|t| fallback_title(&t)),
                body: body.map(|b| b.trim().to_string()),
                image_uri: if remove_image {
                    Some(None)
                } else {
                    image.map(Some)
                },
            };
            if patch == NotePatch::default() {
                color_eyre::eyre::bail!("nothing to change; pass --title, --body, or an image flag");
            }
            let note = repo
                .update(&username, parse_id(&id)?, patch)
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
            println!("Updated note {}: {}", note.id, note.title);
        }
        NoteCommand::Rm { id } => {
            repo.delete(&username, parse_id(&id)?)
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
            println!("Deleted.");
        }
    }

    Ok(())
}

fn print_note(note: &Note) {
    let marker = if note.image_uri.is_some() {
        " [img]"
    } else {
        ""
    };
    println!(
        "{} {} ({}){marker}",
        note.id,
        note.title,
        note.updated_at.format("%Y-%m-%d %H:%M")
    );
    if !note.body.is_empty() {
        println!("    {}", note.body);
    }
}

/// Untitled notes get a placeholder instead of an empty heading.
fn fallback_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        "New Note".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| color_eyre::eyre::eyre!("invalid note id `{id}`: {e}"))
}
