//! Command palette: aggregates commands, recent pages and inventory records,
//! ranks them against the query and groups them by [`Category`].

use tracing::debug;

use crate::commands;
use crate::entity::Entity;
use crate::item::{Category, RecentItem, SearchableItem};
use crate::search::{self, ScoredItem};

pub struct Palette {
    query: String,
    commands: Vec<SearchableItem>,
    recent: Vec<SearchableItem>,
    records: Vec<SearchableItem>,
    /// Ranked results in display order: grouped by category, score order within.
    results: Vec<ScoredItem>,
    selected: usize,
    open: bool,
    limit: Option<usize>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// A palette seeded with the built-in command catalog.
    pub fn new() -> Self {
        let commands = commands::catalog()
            .iter()
            .map(SearchableItem::command)
            .collect();
        Self::with_commands(commands)
    }

    pub fn with_commands(commands: Vec<SearchableItem>) -> Self {
        let mut palette = Self {
            query: String::new(),
            commands,
            recent: Vec::new(),
            records: Vec::new(),
            results: Vec::new(),
            selected: 0,
            open: true,
            limit: None,
        };
        palette.refresh();
        palette
    }

    /// Cap the number of ranked results kept before grouping.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self.refresh();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.refresh();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refresh();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.refresh();
    }

    pub fn set_recent(&mut self, recent: &[RecentItem]) {
        self.recent = recent.iter().map(SearchableItem::recent).collect();
        self.refresh();
    }

    pub fn set_records(&mut self, records: &[Entity]) {
        self.records = records.iter().map(SearchableItem::entity).collect();
        self.refresh();
    }

    fn refresh(&mut self) {
        let candidates = self
            .recent
            .iter()
            .chain(&self.commands)
            .chain(&self.records)
            .cloned();
        let mut ranked = search::rank(&self.query, candidates);
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        // stable, so score order survives inside each category
        ranked.sort_by_key(|r| r.item.category);

        let changed = ranked.len() != self.results.len()
            || ranked
                .iter()
                .zip(&self.results)
                .any(|(a, b)| a.item.id != b.item.id);
        self.results = ranked;
        if changed {
            self.selected = 0;
        }
        debug!(
            query = %self.query,
            results = self.results.len(),
            "palette refreshed"
        );
    }

    /// Results in display order; the selection indexes into this.
    pub fn results(&self) -> &[ScoredItem] {
        &self.results
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Non-empty groups in fixed category order.
    pub fn groups(&self) -> Vec<(Category, &[ScoredItem])> {
        let mut groups = Vec::new();
        let mut start = 0;
        while start < self.results.len() {
            let category = self.results[start].item.category;
            let len = self.results[start..]
                .iter()
                .take_while(|r| r.item.category == category)
                .count();
            groups.push((category, &self.results[start..start + len]));
            start += len;
        }
        groups
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&ScoredItem> {
        self.results.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Take the selected item and close the palette.
    pub fn confirm(&mut self) -> Option<SearchableItem> {
        self.open = false;
        self.selected().map(|r| r.item.clone())
    }

    /// Close without invoking anything.
    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Re-open with a cleared query.
    pub fn reopen(&mut self) {
        self.open = true;
        self.set_query("");
    }
}
