use std::path::PathBuf;

use clap::{Parser, Subcommand};
use labnote_core::entity::EntityType;
use labnote_core::tabs::TabIcon;

#[derive(Parser)]
#[command(name = "labnote", about = "Lab notebook workspace: palette, tabs and inventory", version)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the interactive command palette (default)
    Palette,

    /// Rank palette items against a query and print them grouped
    Search {
        /// Search text
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect and edit the persisted tab groups
    Tabs {
        #[command(subcommand)]
        command: TabsCommand,
    },

    /// Query the inventory API
    Entities {
        #[command(subcommand)]
        command: EntitiesCommand,
    },
}

#[derive(Subcommand)]
pub enum TabsCommand {
    /// List every group and its tabs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a tab, or focus it if already open
    Open {
        /// Unique tab key
        key: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        path: String,
        /// note, project, protocol, chemical, gene, reagent, equipment, inventory, settings, page
        #[arg(long, default_value = "page")]
        icon: TabIcon,
        #[arg(long, default_value = "0")]
        group: usize,
    },

    /// Close a tab
    Close {
        key: String,
        #[arg(long, default_value = "0")]
        group: usize,
    },

    /// Move a tab to another group
    Move {
        key: String,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },

    /// Pin a tab
    Pin {
        key: String,
        #[arg(long, default_value = "0")]
        group: usize,
    },

    /// Unpin a tab
    Unpin {
        key: String,
        #[arg(long, default_value = "0")]
        group: usize,
    },

    /// Change a tab's title
    Rename {
        key: String,
        title: String,
        #[arg(long, default_value = "0")]
        group: usize,
    },

    /// Append an empty group
    AddGroup,

    /// Remove a group by index
    RemoveGroup { index: usize },
}

#[derive(Subcommand)]
pub enum EntitiesCommand {
    /// List records of one type
    List {
        /// chemical, gene, reagent or equipment
        entity_type: EntityType,
        #[arg(long)]
        json: bool,
    },

    /// Show low-stock alerts
    Alerts {
        #[arg(long)]
        json: bool,
    },

    /// Show usage history of a record
    Usage {
        entity_type: EntityType,
        id: String,
        #[arg(long)]
        json: bool,
    },

    /// Log consumption of a record
    Use {
        entity_type: EntityType,
        id: String,
        quantity: f64,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
}
