use std::collections::HashSet;

use chrono::Utc;

use labnote_core::commands::CommandId;
use labnote_core::error::LabnoteError;
use labnote_core::item::{ItemKind, RecentItem, SearchableItem};
use labnote_core::storage::TabRepository;
use labnote_core::tabs::{Tab, TabGroup, TabIcon, TabStore};

/// What the view should do after an item was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Focus this group; the store already holds the change.
    Focus(usize),
    /// Re-open the palette to search inventory.
    SearchInventory,
    ReloadConfig,
    Message(String),
}

/// Most recently accessed tabs across every group, one per path.
pub fn recent_items(groups: &[TabGroup], limit: usize) -> Vec<RecentItem> {
    let mut tabs: Vec<&Tab> = groups.iter().flat_map(|g| &g.tabs).collect();
    tabs.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    let mut seen = HashSet::new();
    tabs.into_iter()
        .filter(|t| seen.insert(t.path.as_str()))
        .take(limit)
        .map(|t| RecentItem {
            title: t.title.clone(),
            path: t.path.clone(),
        })
        .collect()
}

fn page(key: &str, title: &str, path: &str, icon: TabIcon) -> Tab {
    Tab::new(key, title, path, icon)
}

fn draft(kind: &str, title: &str, icon: TabIcon) -> Tab {
    let stamp = Utc::now().timestamp_millis();
    let mut tab = Tab::new(
        &format!("{kind}:draft-{stamp}"),
        title,
        &format!("/{kind}s/new"),
        icon,
    );
    tab.dirty = true;
    tab
}

/// Apply an invoked palette item to the workspace.
pub fn apply<R: TabRepository>(
    item: &SearchableItem,
    store: &mut TabStore<R>,
    group: usize,
) -> Result<Outcome, LabnoteError> {
    match &item.kind {
        ItemKind::Entity { entity_type, id } => {
            let segment = entity_type.path_segment();
            let tab = Tab::new(
                &format!("entity:{segment}:{id}"),
                &item.title,
                &format!("/inventory/{segment}/{id}"),
                TabIcon::for_entity(*entity_type),
            );
            store.open_tab(tab, group)?;
            Ok(Outcome::Focus(group))
        }
        ItemKind::Recent { path } => {
            let found = store.groups().iter().enumerate().find_map(|(i, g)| {
                g.tabs
                    .iter()
                    .find(|t| &t.path == path)
                    .map(|t| (i, t.key.clone()))
            });
            match found {
                Some((i, key)) => {
                    store.set_active(&key, i)?;
                    Ok(Outcome::Focus(i))
                }
                None => {
                    store.open_tab(page(path, &item.title, path, TabIcon::Page), group)?;
                    Ok(Outcome::Focus(group))
                }
            }
        }
        ItemKind::Command { command } => run_command(*command, store, group),
    }
}

/// Run a built-in command against the focused group.
pub fn run_command<R: TabRepository>(
    command: CommandId,
    store: &mut TabStore<R>,
    group: usize,
) -> Result<Outcome, LabnoteError> {
    let open = |store: &mut TabStore<R>, tab: Tab| -> Result<Outcome, LabnoteError> {
        store.open_tab(tab, group)?;
        Ok(Outcome::Focus(group))
    };

    match command {
        CommandId::GoToNotes => open(store, page("page:notes", "Notes", "/notes", TabIcon::Note)),
        CommandId::GoToProjects => open(
            store,
            page("page:projects", "Projects", "/projects", TabIcon::Project),
        ),
        CommandId::GoToProtocols => open(
            store,
            page("page:protocols", "Protocols", "/protocols", TabIcon::Protocol),
        ),
        CommandId::GoToInventory => open(
            store,
            page("page:inventory", "Inventory", "/inventory", TabIcon::Inventory),
        ),
        CommandId::NewNote => open(store, draft("note", "Untitled note", TabIcon::Note)),
        CommandId::NewProject => open(store, draft("project", "Untitled project", TabIcon::Project)),
        CommandId::NewProtocol => open(
            store,
            draft("protocol", "Untitled protocol", TabIcon::Protocol),
        ),
        CommandId::NewInventoryRecord => {
            open(store, draft("record", "New inventory record", TabIcon::Inventory))
        }
        CommandId::SplitPane => Ok(Outcome::Focus(store.add_tab_group())),
        CommandId::ClosePane => {
            store.remove_tab_group(group)?;
            let last = store.groups().len() - 1;
            Ok(Outcome::Focus(group.min(last)))
        }
        CommandId::CloseTab => {
            let active = store.group(group)?.active_tab.clone();
            match active {
                Some(key) => {
                    let tab = store.close_tab(&key, group)?;
                    Ok(Outcome::Message(format!("Closed {}", tab.title)))
                }
                None => Ok(Outcome::Message("No tab to close".to_string())),
            }
        }
        CommandId::TogglePin => {
            let active = store.group(group)?.active().map(|t| (t.key.clone(), t.pinned));
            match active {
                Some((key, pinned)) => {
                    store.set_pinned(&key, group, !pinned)?;
                    Ok(Outcome::Message(
                        if pinned { "Unpinned" } else { "Pinned" }.to_string(),
                    ))
                }
                None => Ok(Outcome::Message("No tab to pin".to_string())),
            }
        }
        CommandId::SearchInventory => Ok(Outcome::SearchInventory),
        CommandId::OpenSettings => open(
            store,
            page("page:settings", "Settings", "/settings", TabIcon::Settings),
        ),
        CommandId::ReloadConfig => Ok(Outcome::ReloadConfig),
    }
}
