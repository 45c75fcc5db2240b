//! Multi-pane tab groups, persisted through a [`TabRepository`] after every
//! mutation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entity::EntityType;
use crate::error::LabnoteError;
use crate::storage::TabRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabIcon {
    Note,
    Project,
    Protocol,
    Chemical,
    Gene,
    Reagent,
    Equipment,
    Inventory,
    Settings,
    Page,
}

impl TabIcon {
    pub fn for_entity(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Chemical => TabIcon::Chemical,
            EntityType::Gene => TabIcon::Gene,
            EntityType::Reagent => TabIcon::Reagent,
            EntityType::Equipment => TabIcon::Equipment,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            TabIcon::Note => "✎",
            TabIcon::Project => "▣",
            TabIcon::Protocol => "☰",
            TabIcon::Chemical => "⚗",
            TabIcon::Gene => "🧬",
            TabIcon::Reagent => "◉",
            TabIcon::Equipment => "⚙",
            TabIcon::Inventory => "▤",
            TabIcon::Settings => "⚒",
            TabIcon::Page => "▢",
        }
    }
}

impl std::str::FromStr for TabIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
            .map_err(|_| format!("unknown tab icon: {s}"))
    }
}

/// An open page or record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub key: String,
    pub title: String,
    pub path: String,
    pub icon: TabIcon,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default)]
    pub pinned: bool,
    pub last_accessed: DateTime<Utc>,
}

impl Tab {
    pub fn new(key: &str, title: &str, path: &str, icon: TabIcon) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            path: path.to_string(),
            icon,
            dirty: false,
            pinned: false,
            last_accessed: Utc::now(),
        }
    }
}

/// One pane of the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: String,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active_tab: Option<String>,
}

impl Default for TabGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl TabGroup {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tabs: Vec::new(),
            active_tab: None,
        }
    }

    pub fn find(&self, key: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.key == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.key == key)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active_tab.as_deref().and_then(|k| self.find(k))
    }

    fn activate(&mut self, key: &str) {
        if let Some(tab) = self.find_mut(key) {
            tab.last_accessed = Utc::now();
            self.active_tab = Some(key.to_string());
        }
    }

    /// Remove a tab, moving the active pointer to the last tab if needed.
    fn take(&mut self, key: &str) -> Option<Tab> {
        let idx = self.tabs.iter().position(|t| t.key == key)?;
        let tab = self.tabs.remove(idx);
        if self.active_tab.as_deref() == Some(key) {
            self.active_tab = self.tabs.last().map(|t| t.key.clone());
        }
        Some(tab)
    }

    /// Drop duplicate keys and a dangling active pointer.
    fn repair(&mut self) {
        let mut seen = HashSet::new();
        self.tabs.retain(|t| seen.insert(t.key.clone()));
        if self.active_tab.as_deref().is_some_and(|k| self.find(k).is_none()) {
            self.active_tab = self.tabs.last().map(|t| t.key.clone());
        }
    }
}

/// All tab groups plus the repository they persist to.
pub struct TabStore<R: TabRepository> {
    groups: Vec<TabGroup>,
    repo: R,
}

impl<R: TabRepository> TabStore<R> {
    /// Rehydrate from `repo`. Unreadable or empty state yields one empty group.
    pub fn load(repo: R) -> Self {
        let mut groups = match repo.load() {
            Ok(groups) => groups,
            Err(e) => {
                warn!(error = %e, "discarding unreadable tab state");
                Vec::new()
            }
        };
        for group in &mut groups {
            group.repair();
        }
        if groups.is_empty() {
            groups.push(TabGroup::new());
        }
        debug!(groups = groups.len(), "tab state loaded");
        Self { groups, repo }
    }

    pub fn groups(&self) -> &[TabGroup] {
        &self.groups
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn group(&self, index: usize) -> Result<&TabGroup, LabnoteError> {
        self.groups.get(index).ok_or(LabnoteError::GroupOutOfRange {
            index,
            count: self.groups.len(),
        })
    }

    fn group_mut(&mut self, index: usize) -> Result<&mut TabGroup, LabnoteError> {
        let count = self.groups.len();
        self.groups
            .get_mut(index)
            .ok_or(LabnoteError::GroupOutOfRange { index, count })
    }

    fn tab_mut(&mut self, key: &str, group: usize) -> Result<&mut Tab, LabnoteError> {
        self.group_mut(group)?
            .find_mut(key)
            .ok_or_else(|| LabnoteError::TabNotFound {
                key: key.to_string(),
                group,
            })
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.groups) {
            warn!(error = %e, "failed to persist tab state");
        }
    }

    /// Open `tab` in `group`, or focus it if the key is already open there.
    pub fn open_tab(&mut self, tab: Tab, group: usize) -> Result<(), LabnoteError> {
        let g = self.group_mut(group)?;
        let key = tab.key.clone();
        if g.find(&key).is_none() {
            g.tabs.push(tab);
        }
        g.activate(&key);
        debug!(%key, group, "tab opened");
        self.persist();
        Ok(())
    }

    pub fn close_tab(&mut self, key: &str, group: usize) -> Result<Tab, LabnoteError> {
        let tab = self
            .group_mut(group)?
            .take(key)
            .ok_or_else(|| LabnoteError::TabNotFound {
                key: key.to_string(),
                group,
            })?;
        debug!(%key, group, "tab closed");
        self.persist();
        Ok(tab)
    }

    /// Move a tab between groups and focus it at the destination.
    pub fn move_tab_to_group(
        &mut self,
        key: &str,
        from: usize,
        to: usize,
    ) -> Result<(), LabnoteError> {
        self.group(to)?;
        if from == to {
            self.tab_mut(key, from)?;
            self.group_mut(to)?.activate(key);
            self.persist();
            return Ok(());
        }

        let tab = self
            .group_mut(from)?
            .take(key)
            .ok_or_else(|| LabnoteError::TabNotFound {
                key: key.to_string(),
                group: from,
            })?;
        let dest = self.group_mut(to)?;
        if dest.find(key).is_none() {
            dest.tabs.push(tab);
        }
        dest.activate(key);
        debug!(%key, from, to, "tab moved");
        self.persist();
        Ok(())
    }

    /// Append an empty group, returning its index.
    pub fn add_tab_group(&mut self) -> usize {
        self.groups.push(TabGroup::new());
        self.persist();
        self.groups.len() - 1
    }

    /// Remove a group. Removing the only group leaves a fresh empty one.
    pub fn remove_tab_group(&mut self, index: usize) -> Result<TabGroup, LabnoteError> {
        self.group(index)?;
        let removed = self.groups.remove(index);
        if self.groups.is_empty() {
            self.groups.push(TabGroup::new());
        }
        self.persist();
        Ok(removed)
    }

    pub fn set_active(&mut self, key: &str, group: usize) -> Result<(), LabnoteError> {
        self.tab_mut(key, group)?;
        self.group_mut(group)?.activate(key);
        self.persist();
        Ok(())
    }

    pub fn set_pinned(&mut self, key: &str, group: usize, pinned: bool) -> Result<(), LabnoteError> {
        self.tab_mut(key, group)?.pinned = pinned;
        self.persist();
        Ok(())
    }

    pub fn set_dirty(&mut self, key: &str, group: usize, dirty: bool) -> Result<(), LabnoteError> {
        self.tab_mut(key, group)?.dirty = dirty;
        self.persist();
        Ok(())
    }

    pub fn rename(&mut self, key: &str, group: usize, title: &str) -> Result<(), LabnoteError> {
        self.tab_mut(key, group)?.title = title.to_string();
        self.persist();
        Ok(())
    }

    /// Close every tab in `group` except `key` and pinned tabs.
    pub fn close_others(&mut self, key: &str, group: usize) -> Result<Vec<Tab>, LabnoteError> {
        self.tab_mut(key, group)?;
        let g = self.group_mut(group)?;
        let (kept, closed): (Vec<_>, Vec<_>) = std::mem::take(&mut g.tabs)
            .into_iter()
            .partition(|t| t.key == key || t.pinned);
        g.tabs = kept;
        g.activate(key);
        self.persist();
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileRepository, MemoryRepository};

    fn tab(key: &str) -> Tab {
        Tab::new(key, &key.to_uppercase(), &format!("/notes/{key}"), TabIcon::Note)
    }

    fn keys(group: &TabGroup) -> Vec<&str> {
        group.tabs.iter().map(|t| t.key.as_str()).collect()
    }

    fn store_with(keys: &[&str]) -> TabStore<MemoryRepository> {
        let mut store = TabStore::load(MemoryRepository::new());
        for k in keys {
            store.open_tab(tab(k), 0).unwrap();
        }
        store
    }

    #[test]
    fn empty_repository_yields_one_group() {
        let store = TabStore::load(MemoryRepository::new());
        assert_eq!(store.groups().len(), 1);
        assert!(store.groups()[0].tabs.is_empty());
        assert!(store.groups()[0].active_tab.is_none());
    }

    #[test]
    fn open_appends_and_activates() {
        let store = store_with(&["a", "b"]);
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "b"]);
        assert_eq!(g.active_tab.as_deref(), Some("b"));
    }

    #[test]
    fn reopening_existing_key_only_focuses() {
        let mut store = store_with(&["a", "b"]);
        store.open_tab(tab("a"), 0).unwrap();
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "b"]);
        assert_eq!(g.active_tab.as_deref(), Some("a"));
    }

    #[test]
    fn closing_inactive_tab_keeps_active() {
        let mut store = store_with(&["a", "b", "c"]);
        store.set_active("a", 0).unwrap();
        store.close_tab("b", 0).unwrap();
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "c"]);
        assert_eq!(g.active_tab.as_deref(), Some("a"));
    }

    #[test]
    fn closing_active_tab_falls_back_to_last() {
        let mut store = store_with(&["a", "b", "c"]);
        store.set_active("b", 0).unwrap();
        store.close_tab("b", 0).unwrap();
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "c"]);
        assert_eq!(g.active_tab.as_deref(), Some("c"));
    }

    #[test]
    fn closing_last_tab_clears_active() {
        let mut store = store_with(&["a"]);
        store.close_tab("a", 0).unwrap();
        assert!(store.group(0).unwrap().active_tab.is_none());
    }

    #[test]
    fn open_then_close_restores_sequence() {
        let mut store = store_with(&["a", "b"]);
        let before = keys(store.group(0).unwrap())
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        store.open_tab(tab("x"), 0).unwrap();
        store.close_tab("x", 0).unwrap();
        assert_eq!(keys(store.group(0).unwrap()), before);
    }

    #[test]
    fn close_unknown_key_errors() {
        let mut store = store_with(&["a"]);
        let err = store.close_tab("zzz", 0).unwrap_err();
        assert!(matches!(err, LabnoteError::TabNotFound { .. }));
    }

    #[test]
    fn bad_group_index_errors() {
        let mut store = store_with(&[]);
        let err = store.open_tab(tab("a"), 3).unwrap_err();
        assert!(matches!(
            err,
            LabnoteError::GroupOutOfRange { index: 3, count: 1 }
        ));
    }

    #[test]
    fn move_transfers_without_duplicates() {
        let mut store = store_with(&["a", "b"]);
        let right = store.add_tab_group();
        store.move_tab_to_group("b", 0, right).unwrap();

        let left = store.group(0).unwrap();
        let dest = store.group(right).unwrap();
        assert_eq!(keys(left), vec!["a"]);
        assert_eq!(left.active_tab.as_deref(), Some("a"));
        assert_eq!(keys(dest), vec!["b"]);
        assert_eq!(dest.active_tab.as_deref(), Some("b"));
    }

    #[test]
    fn move_onto_existing_key_does_not_duplicate() {
        let mut store = store_with(&["a"]);
        let right = store.add_tab_group();
        store.open_tab(tab("a"), right).unwrap();
        store.open_tab(tab("z"), right).unwrap();
        store.move_tab_to_group("a", 0, right).unwrap();

        assert!(store.group(0).unwrap().tabs.is_empty());
        assert!(store.group(0).unwrap().active_tab.is_none());
        let dest = store.group(right).unwrap();
        assert_eq!(keys(dest), vec!["a", "z"]);
        assert_eq!(dest.active_tab.as_deref(), Some("a"));
    }

    #[test]
    fn move_never_leaves_dangling_active() {
        let mut store = store_with(&["a", "b", "c"]);
        let right = store.add_tab_group();
        for key in ["c", "a", "b"] {
            store.move_tab_to_group(key, 0, right).unwrap();
            for g in store.groups() {
                if let Some(active) = &g.active_tab {
                    assert!(g.find(active).is_some());
                }
            }
        }
        let all: Vec<&str> = store.groups().iter().flat_map(keys).collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn move_within_same_group_only_activates() {
        let mut store = store_with(&["a", "b"]);
        store.move_tab_to_group("a", 0, 0).unwrap();
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "b"]);
        assert_eq!(g.active_tab.as_deref(), Some("a"));
    }

    #[test]
    fn move_to_missing_group_leaves_source_untouched() {
        let mut store = store_with(&["a"]);
        assert!(store.move_tab_to_group("a", 0, 5).is_err());
        assert_eq!(keys(store.group(0).unwrap()), vec!["a"]);
    }

    #[test]
    fn remove_group_shifts_later_indices() {
        let mut store = store_with(&["a"]);
        let second = store.add_tab_group();
        let third = store.add_tab_group();
        store.open_tab(tab("c"), third).unwrap();

        store.remove_tab_group(second).unwrap();
        assert_eq!(store.groups().len(), 2);
        assert_eq!(keys(store.group(1).unwrap()), vec!["c"]);
    }

    #[test]
    fn removing_only_group_reseeds_empty_one() {
        let mut store = store_with(&["a"]);
        let old_id = store.group(0).unwrap().id.clone();
        store.remove_tab_group(0).unwrap();
        assert_eq!(store.groups().len(), 1);
        assert_ne!(store.group(0).unwrap().id, old_id);
        assert!(store.group(0).unwrap().tabs.is_empty());
    }

    #[test]
    fn flags_and_rename() {
        let mut store = store_with(&["a"]);
        store.set_pinned("a", 0, true).unwrap();
        store.set_dirty("a", 0, true).unwrap();
        store.rename("a", 0, "Buffer prep").unwrap();

        let t = store.group(0).unwrap().find("a").unwrap();
        assert!(t.pinned && t.dirty);
        assert_eq!(t.title, "Buffer prep");
    }

    #[test]
    fn close_others_keeps_pinned() {
        let mut store = store_with(&["a", "b", "c", "d"]);
        store.set_pinned("a", 0, true).unwrap();
        let closed = store.close_others("c", 0).unwrap();

        assert_eq!(closed.len(), 2);
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "c"]);
        assert_eq!(g.active_tab.as_deref(), Some("c"));
    }

    #[test]
    fn every_mutation_is_saved() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.repository().save_count(), 2);
        store.close_tab("a", 0).unwrap();
        store.add_tab_group();
        assert_eq!(store.repository().save_count(), 4);
        assert_eq!(store.repository().last_saved().unwrap(), store.groups());
    }

    #[test]
    fn failed_operations_are_not_saved() {
        let mut store = store_with(&["a"]);
        let _ = store.close_tab("missing", 0);
        let _ = store.rename("a", 9, "x");
        assert_eq!(store.repository().save_count(), 1);
    }

    #[test]
    fn load_repairs_dangling_active_and_duplicates() {
        let mut group = TabGroup::new();
        group.tabs = vec![tab("a"), tab("b"), tab("a")];
        group.active_tab = Some("gone".to_string());

        let store = TabStore::load(MemoryRepository::with_groups(vec![group]));
        let g = store.group(0).unwrap();
        assert_eq!(keys(g), vec!["a", "b"]);
        assert_eq!(g.active_tab.as_deref(), Some("b"));
    }

    #[test]
    fn malformed_state_file_falls_back_to_one_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabs.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = TabStore::load(JsonFileRepository::new(&path));
        assert_eq!(store.groups().len(), 1);
        assert!(store.groups()[0].tabs.is_empty());
    }

    #[test]
    fn state_survives_reload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabs.json");
        {
            let mut store = TabStore::load(JsonFileRepository::new(&path));
            store.open_tab(tab("a"), 0).unwrap();
            let right = store.add_tab_group();
            store.open_tab(tab("b"), right).unwrap();
        }
        let store = TabStore::load(JsonFileRepository::new(&path));
        assert_eq!(store.groups().len(), 2);
        assert_eq!(store.group(1).unwrap().active_tab.as_deref(), Some("b"));
    }

    #[test]
    fn icon_parses_from_lowercase_name() {
        assert_eq!("gene".parse::<TabIcon>(), Ok(TabIcon::Gene));
        assert_eq!("Protocol".parse::<TabIcon>(), Ok(TabIcon::Protocol));
        assert!("plasmid".parse::<TabIcon>().is_err());
    }
}
