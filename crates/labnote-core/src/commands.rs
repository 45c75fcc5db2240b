use serde::Serialize;

use crate::item::Category;

/// Built-in palette commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandId {
    GoToNotes,
    GoToProjects,
    GoToProtocols,
    GoToInventory,
    NewNote,
    NewProject,
    NewProtocol,
    NewInventoryRecord,
    SplitPane,
    ClosePane,
    CloseTab,
    TogglePin,
    SearchInventory,
    OpenSettings,
    ReloadConfig,
}

impl CommandId {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandId::GoToNotes => "go-to-notes",
            CommandId::GoToProjects => "go-to-projects",
            CommandId::GoToProtocols => "go-to-protocols",
            CommandId::GoToInventory => "go-to-inventory",
            CommandId::NewNote => "new-note",
            CommandId::NewProject => "new-project",
            CommandId::NewProtocol => "new-protocol",
            CommandId::NewInventoryRecord => "new-inventory-record",
            CommandId::SplitPane => "split-pane",
            CommandId::ClosePane => "close-pane",
            CommandId::CloseTab => "close-tab",
            CommandId::TogglePin => "toggle-pin",
            CommandId::SearchInventory => "search-inventory",
            CommandId::OpenSettings => "open-settings",
            CommandId::ReloadConfig => "reload-config",
        }
    }
}

/// Static description of a command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub id: CommandId,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub shortcut: Option<&'static str>,
    pub category: Category,
    pub priority: u8,
}

const CATALOG: &[CommandSpec] = &[
    CommandSpec {
        id: CommandId::GoToNotes,
        title: "Go to Notes",
        description: "Open the notes overview",
        keywords: &["journal", "entries"],
        shortcut: Some("g n"),
        category: Category::Navigation,
        priority: 3,
    },
    CommandSpec {
        id: CommandId::GoToProjects,
        title: "Go to Projects",
        description: "Open the projects overview",
        keywords: &["experiments", "studies"],
        shortcut: Some("g p"),
        category: Category::Navigation,
        priority: 2,
    },
    CommandSpec {
        id: CommandId::GoToProtocols,
        title: "Go to Protocols",
        description: "Open the protocol library",
        keywords: &["methods", "procedures", "sop"],
        shortcut: None,
        category: Category::Navigation,
        priority: 1,
    },
    CommandSpec {
        id: CommandId::GoToInventory,
        title: "Go to Inventory",
        description: "Browse chemicals, genes, reagents and equipment",
        keywords: &["stock", "chemicals", "reagents", "equipment", "genes"],
        shortcut: Some("g i"),
        category: Category::Navigation,
        priority: 2,
    },
    CommandSpec {
        id: CommandId::NewNote,
        title: "New Note",
        description: "Create a blank note",
        keywords: &["create", "write", "page"],
        shortcut: Some("n"),
        category: Category::Create,
        priority: 3,
    },
    CommandSpec {
        id: CommandId::NewProject,
        title: "New Project",
        description: "Start a new research project",
        keywords: &["create", "experiment"],
        shortcut: None,
        category: Category::Create,
        priority: 1,
    },
    CommandSpec {
        id: CommandId::NewProtocol,
        title: "New Protocol",
        description: "Write a new step-by-step protocol",
        keywords: &["create", "method", "sop"],
        shortcut: None,
        category: Category::Create,
        priority: 1,
    },
    CommandSpec {
        id: CommandId::NewInventoryRecord,
        title: "New Inventory Record",
        description: "Register a chemical, gene, reagent or equipment item",
        keywords: &["create", "add", "stock"],
        shortcut: None,
        category: Category::Create,
        priority: 0,
    },
    CommandSpec {
        id: CommandId::SplitPane,
        title: "Split Pane",
        description: "Open a new tab group beside the current one",
        keywords: &["split", "group", "window"],
        shortcut: Some("ctrl-\\"),
        category: Category::Actions,
        priority: 1,
    },
    CommandSpec {
        id: CommandId::ClosePane,
        title: "Close Pane",
        description: "Close the current tab group",
        keywords: &["group", "window"],
        shortcut: None,
        category: Category::Actions,
        priority: 0,
    },
    CommandSpec {
        id: CommandId::CloseTab,
        title: "Close Tab",
        description: "Close the active tab",
        keywords: &["tab"],
        shortcut: Some("ctrl-w"),
        category: Category::Actions,
        priority: 1,
    },
    CommandSpec {
        id: CommandId::TogglePin,
        title: "Pin or Unpin Tab",
        description: "Keep the active tab open when closing others",
        keywords: &["pin", "tab"],
        shortcut: None,
        category: Category::Actions,
        priority: 0,
    },
    CommandSpec {
        id: CommandId::SearchInventory,
        title: "Search Inventory",
        description: "Search all lab inventory records",
        keywords: &["find", "lookup", "chemical", "gene", "reagent"],
        shortcut: Some("/"),
        category: Category::Search,
        priority: 2,
    },
    CommandSpec {
        id: CommandId::OpenSettings,
        title: "Open Settings",
        description: "Edit labnote preferences",
        keywords: &["preferences", "config", "options"],
        shortcut: None,
        category: Category::Settings,
        priority: 0,
    },
    CommandSpec {
        id: CommandId::ReloadConfig,
        title: "Reload Config",
        description: "Re-read config.toml from disk",
        keywords: &["refresh", "config"],
        shortcut: None,
        category: Category::Settings,
        priority: 0,
    },
];

/// Every built-in command, in catalog order.
pub fn catalog() -> &'static [CommandSpec] {
    CATALOG
}
