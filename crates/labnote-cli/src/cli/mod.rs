pub mod args;

use std::io::IsTerminal;
use std::path::Path;

use serde::Serialize;

use labnote_core::api::{EntityApi, HttpEntityApi};
use labnote_core::config::Config;
use labnote_core::entity::UsageInput;
use labnote_core::error::LabnoteError;
use labnote_core::palette::Palette;
use labnote_core::search::ScoredItem;
use labnote_core::storage::JsonFileRepository;
use labnote_core::tabs::{Tab, TabStore};

use self::args::{Cli, Command, EntitiesCommand, TabsCommand};

pub fn run(cli: Cli) -> color_eyre::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)?;
    let _log_guard = crate::logging::init(&config)?;

    match cli.command {
        None | Some(Command::Palette) => cmd_palette(&config, &config_path)?,
        Some(Command::Search { query, json }) => cmd_search(&config, &query, json)?,
        Some(Command::Tabs { command }) => cmd_tabs(&config, command)?,
        Some(Command::Entities { command }) => cmd_entities(&config, command)?,
    }

    Ok(())
}

fn open_store(config: &Config) -> TabStore<JsonFileRepository> {
    TabStore::load(JsonFileRepository::new(config.state_path()))
}

fn api(config: &Config) -> Result<HttpEntityApi, LabnoteError> {
    config
        .api_base_url
        .as_deref()
        .map(HttpEntityApi::new)
        .ok_or(LabnoteError::ApiNotConfigured)
}

fn cmd_palette(config: &Config, config_path: &Path) -> color_eyre::Result<()> {
    if !std::io::stderr().is_terminal() {
        eprintln!("The palette needs a terminal. Use `labnote search <query>` instead.");
        return Ok(());
    }
    let mut store = open_store(config);
    crate::tui::run_palette(&mut store, config, config_path)
}

#[derive(Serialize)]
struct GroupOutput<'a> {
    category: &'static str,
    items: &'a [ScoredItem],
}

fn cmd_search(config: &Config, query: &str, json: bool) -> color_eyre::Result<()> {
    let store = open_store(config);
    let mut palette = Palette::new().with_limit(config.max_results);
    palette.set_recent(&crate::tui::actions::recent_items(
        store.groups(),
        config.recent_limit,
    ));

    if let Ok(api) = api(config) {
        match api.search(None, query) {
            Ok(records) => palette.set_records(&records),
            Err(e) => eprintln!("  ! inventory search failed: {e}"),
        }
    }
    palette.set_query(query);

    if json {
        let groups: Vec<GroupOutput> = palette
            .groups()
            .into_iter()
            .map(|(category, items)| GroupOutput {
                category: category.label(),
                items,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if palette.is_empty() {
        eprintln!("No matches for \"{query}\"");
        return Ok(());
    }
    for (category, items) in palette.groups() {
        println!("{} {}", category.icon(), category.label());
        for r in items {
            println!(
                "  {}\t{}\t{}",
                r.score,
                r.item.title,
                r.item.subtitle.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

fn cmd_tabs(config: &Config, command: TabsCommand) -> color_eyre::Result<()> {
    let mut store = open_store(config);

    match command {
        TabsCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.groups())?);
            } else {
                print_groups(&store);
            }
        }
        TabsCommand::Open {
            key,
            title,
            path,
            icon,
            group,
        } => {
            store.open_tab(Tab::new(&key, &title, &path, icon), group)?;
            eprintln!("Opened {key} in group {group}");
        }
        TabsCommand::Close { key, group } => {
            let tab = store.close_tab(&key, group)?;
            eprintln!("Closed {} ({})", tab.title, tab.key);
        }
        TabsCommand::Move { key, from, to } => {
            store.move_tab_to_group(&key, from, to)?;
            eprintln!("Moved {key} from group {from} to {to}");
        }
        TabsCommand::Pin { key, group } => store.set_pinned(&key, group, true)?,
        TabsCommand::Unpin { key, group } => store.set_pinned(&key, group, false)?,
        TabsCommand::Rename { key, title, group } => store.rename(&key, group, &title)?,
        TabsCommand::AddGroup => {
            let index = store.add_tab_group();
            eprintln!("Added group {index}");
        }
        TabsCommand::RemoveGroup { index } => {
            let removed = store.remove_tab_group(index)?;
            eprintln!("Removed group {index} ({} tabs)", removed.tabs.len());
        }
    }

    Ok(())
}

fn print_groups(store: &TabStore<JsonFileRepository>) {
    for (i, group) in store.groups().iter().enumerate() {
        println!("[{i}] {}", group.id);
        if group.tabs.is_empty() {
            println!("    (empty)");
        }
        for tab in &group.tabs {
            let active = if group.active_tab.as_deref() == Some(tab.key.as_str()) {
                '*'
            } else {
                ' '
            };
            let pin = if tab.pinned { "^" } else { "" };
            let dirty = if tab.dirty { "+" } else { "" };
            println!(
                "  {active} {} {}{pin}{dirty}\t{}\t{}",
                tab.icon.glyph(),
                tab.title,
                tab.key,
                tab.path
            );
        }
    }
}

fn cmd_entities(config: &Config, command: EntitiesCommand) -> color_eyre::Result<()> {
    let api = api(config)?;

    match command {
        EntitiesCommand::List { entity_type, json } => {
            let records = api.list(entity_type)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            if records.is_empty() {
                eprintln!("No {} records", entity_type.path_segment());
            }
            for e in &records {
                println!(
                    "{}\t{}\t{}\t{}",
                    e.id,
                    e.name,
                    e.stock_display().unwrap_or_else(|| "-".to_string()),
                    e.location.as_deref().unwrap_or("-")
                );
            }
        }
        EntitiesCommand::Alerts { json } => {
            let alerts = api.low_stock_alerts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&alerts)?);
                return Ok(());
            }
            if alerts.is_empty() {
                eprintln!("No low-stock alerts");
            }
            for a in &alerts {
                println!(
                    "{}\t{}\t{} / {} {}",
                    a.entity.entity_type,
                    a.entity.name,
                    a.current,
                    a.minimum,
                    a.entity.unit.as_deref().unwrap_or("")
                );
            }
        }
        EntitiesCommand::Usage {
            entity_type,
            id,
            json,
        } => {
            let logs = api.usage(entity_type, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&logs)?);
                return Ok(());
            }
            for log in &logs {
                println!(
                    "{}\t{} {}\t{}",
                    log.used_at.format("%Y-%m-%d %H:%M"),
                    log.quantity,
                    log.unit.as_deref().unwrap_or(""),
                    log.note.as_deref().unwrap_or("-")
                );
            }
        }
        EntitiesCommand::Use {
            entity_type,
            id,
            quantity,
            unit,
            note,
        } => {
            let log = api.record_usage(entity_type, &id, &UsageInput { quantity, unit, note })?;
            eprintln!(
                "Logged {} {} of {id}",
                log.quantity,
                log.unit.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}
