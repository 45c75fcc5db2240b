//! Core library for `labnote` — the workspace layer of a lab research notebook.
//!
//! Provides fuzzy matching and ranking for the command palette, persisted
//! multi-pane tab groups, and a client for the inventory REST API.

pub mod api;
pub mod commands;
pub mod config;
pub mod entity;
pub mod error;
pub mod fuzzy;
pub mod item;
pub mod palette;
pub mod request;
pub mod search;
pub mod storage;
pub mod tabs;
