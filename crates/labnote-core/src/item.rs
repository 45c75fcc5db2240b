use serde::Serialize;

use crate::commands::{CommandId, CommandSpec};
use crate::entity::{Entity, EntityType};

/// Palette section. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recent,
    Navigation,
    Create,
    Actions,
    Search,
    Settings,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Recent,
        Category::Navigation,
        Category::Create,
        Category::Actions,
        Category::Search,
        Category::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Recent => "Recent",
            Category::Navigation => "Navigation",
            Category::Create => "Create",
            Category::Actions => "Actions",
            Category::Search => "Search",
            Category::Settings => "Settings",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Recent => "◷",
            Category::Navigation => "→",
            Category::Create => "+",
            Category::Actions => "⚡",
            Category::Search => "⌕",
            Category::Settings => "⚙",
        }
    }
}

/// What invoking an item does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    Command { command: CommandId },
    Entity { entity_type: EntityType, id: String },
    Recent { path: String },
}

/// A recently opened page, as fed to the palette.
#[derive(Debug, Clone)]
pub struct RecentItem {
    pub title: String,
    pub path: String,
}

/// One palette candidate. Rebuilt from upstream data on every search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchableItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub category: Category,
    pub priority: u8,
}

impl SearchableItem {
    pub fn command(spec: &CommandSpec) -> Self {
        Self {
            id: format!("command:{}", spec.id.as_str()),
            kind: ItemKind::Command { command: spec.id },
            title: spec.title.to_string(),
            subtitle: spec.shortcut.map(str::to_string),
            description: Some(spec.description.to_string()),
            keywords: spec.keywords.iter().map(|k| k.to_string()).collect(),
            category: spec.category,
            priority: spec.priority,
        }
    }

    pub fn entity(entity: &Entity) -> Self {
        let subtitle = match (&entity.location, entity.stock_display()) {
            (Some(loc), Some(stock)) => format!("{} · {loc} · {stock}", entity.entity_type),
            (Some(loc), None) => format!("{} · {loc}", entity.entity_type),
            (None, Some(stock)) => format!("{} · {stock}", entity.entity_type),
            (None, None) => entity.entity_type.to_string(),
        };
        Self {
            id: format!("entity:{}:{}", entity.entity_type.path_segment(), entity.id),
            kind: ItemKind::Entity {
                entity_type: entity.entity_type,
                id: entity.id.clone(),
            },
            title: entity.name.clone(),
            subtitle: Some(subtitle),
            description: entity.description.clone(),
            keywords: entity.tags.clone(),
            category: Category::Search,
            priority: 0,
        }
    }

    pub fn recent(recent: &RecentItem) -> Self {
        Self {
            id: format!("recent:{}", recent.path),
            kind: ItemKind::Recent {
                path: recent.path.clone(),
            },
            title: recent.title.clone(),
            subtitle: Some(recent.path.clone()),
            description: None,
            keywords: Vec::new(),
            category: Category::Recent,
            priority: 1,
        }
    }
}
