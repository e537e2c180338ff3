//! Terminal front end for the shopping list core.
//!
//! # Responsibility
//! - Map subcommands onto `ShoppingService` entry points.
//! - Resolve short item ids printed by `list` back to stable ids.

use clap::{Parser, Subcommand};
use shoplist_core::{
    init_logging_for, AppConfig, ChannelReminderSink, DeviceShoppingService, Item, ItemId,
    ListFilter, StaticPermission, ThemeMode,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "shoplist", version, about = "Shopping list with reminders")]
struct Cli {
    /// Absolute directory holding the database and logs.
    #[arg(long, env = "SHOPLIST_DATA_DIR")]
    data_dir: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Theme used when none has been stored yet.
    #[arg(long)]
    system_dark: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the list.
    List {
        #[arg(long)]
        favorites: bool,
    },
    /// Add an item and optionally wait for its reminder.
    Add {
        name: String,
        quantity: String,
        /// Stay running until the reminder fires.
        #[arg(long)]
        wait_reminder: bool,
        #[arg(long, default_value_t = 10)]
        reminder_delay_secs: u64,
    },
    /// Replace name and quantity of an item.
    Edit {
        id: String,
        name: String,
        quantity: String,
    },
    /// Delete an item.
    Delete { id: String },
    /// Flip the favorite flag of an item.
    Favorite { id: String },
    /// Show the theme, or switch it with `toggle`.
    Theme {
        #[arg(value_parser = ["toggle"])]
        action: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::new(cli.data_dir);
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    let wait_reminder = match &cli.command {
        Command::Add {
            wait_reminder,
            reminder_delay_secs,
            ..
        } => {
            config = config.with_reminder_delay(Duration::from_secs(*reminder_delay_secs));
            *wait_reminder
        }
        _ => false,
    };

    config.ensure_dirs()?;
    if let Err(err) = init_logging_for(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let (sink, mut reminders) = ChannelReminderSink::new();
    let service = DeviceShoppingService::open(&config, StaticPermission(wait_reminder), sink)
        .map_err(|err| format!("cannot open storage: {err}"))?;
    let state = service
        .start(ThemeMode::from_dark_flag(cli.system_dark))
        .await
        .map_err(|err| err.to_string())?;
    if let Some(list_error) = state.list_error {
        eprintln!("warning: saved list ignored: {list_error}");
    }

    match cli.command {
        Command::List { favorites } => {
            let items = service
                .view(ListFilter {
                    favorites_only: favorites,
                })
                .await;
            if items.is_empty() {
                println!("List is empty.");
            }
            for item in &items {
                println!("{}", render(item));
            }
        }
        Command::Add { name, quantity, .. } => {
            match service.add(&name, &quantity).await.map_err(|e| e.to_string())? {
                Some(item) => println!("added {}", render(&item)),
                None => return Err("name and quantity are required".to_string()),
            }
            if wait_reminder {
                if let Some(reminder) = reminders.recv().await {
                    println!("{} {}", reminder.title, reminder.body);
                }
            }
        }
        Command::Edit { id, name, quantity } => {
            let id = resolve_id(&service.items().await, &id)?;
            let item = service
                .edit(id, &name, &quantity)
                .await
                .map_err(|e| e.to_string())?;
            println!("updated {}", render(&item));
        }
        Command::Delete { id } => {
            let id = resolve_id(&service.items().await, &id)?;
            let item = service.delete(id).await.map_err(|e| e.to_string())?;
            println!("deleted {}", render(&item));
        }
        Command::Favorite { id } => {
            let id = resolve_id(&service.items().await, &id)?;
            let item = service
                .toggle_favorite(id)
                .await
                .map_err(|e| e.to_string())?;
            println!("{}", render(&item));
        }
        Command::Theme { action } => {
            let mode = if action.is_some() {
                service.toggle_theme().await.map_err(|e| e.to_string())?
            } else {
                service.theme().await
            };
            println!("theme: {}", mode.as_str());
        }
    }
    Ok(())
}

fn render(item: &Item) -> String {
    let id = item.id.to_string();
    format!(
        "{} {} {} - {}",
        &id[..SHORT_ID_LEN],
        if item.favorite { "♥" } else { "·" },
        item.name,
        item.quantity
    )
}

/// Accepts a full id or a unique prefix of one.
fn resolve_id(items: &[Item], raw: &str) -> Result<ItemId, String> {
    let needle = raw.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err("item id cannot be empty".to_string());
    }
    let mut matches = items
        .iter()
        .filter(|item| item.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id),
        (None, _) => Err(format!("no item matches id `{needle}`")),
        (Some(_), Some(_)) => Err(format!("id `{needle}` is ambiguous")),
    }
}

#[cfg(test)]
mod tests {
    use super::{render, resolve_id, Cli};
    use clap::CommandFactory;
    use shoplist_core::Item;
    use uuid::Uuid;

    fn item(id: &str, name: &str) -> Item {
        Item::with_id(Uuid::parse_str(id).unwrap(), name, "1")
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let items = vec![
            item("aaaaaaaa-0000-4000-8000-000000000001", "A"),
            item("abbbbbbb-0000-4000-8000-000000000002", "B"),
        ];
        assert_eq!(resolve_id(&items, "AB").unwrap(), items[1].id);
        assert!(resolve_id(&items, "a").unwrap_err().contains("ambiguous"));
        assert!(resolve_id(&items, "c").unwrap_err().contains("no item"));
    }

    #[test]
    fn render_shows_short_id_and_favorite_marker() {
        let mut bread = item("12345678-0000-4000-8000-000000000001", "Bread");
        bread.favorite = true;
        assert_eq!(render(&bread), "12345678 ♥ Bread - 1");
    }
}
