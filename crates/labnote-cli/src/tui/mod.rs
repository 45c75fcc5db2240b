pub mod actions;
mod app;
mod view;

use std::path::Path;

use labnote_core::config::Config;
use labnote_core::storage::JsonFileRepository;
use labnote_core::tabs::TabStore;

/// Run the interactive palette and workspace view on stderr.
pub fn run_palette(
    store: &mut TabStore<JsonFileRepository>,
    config: &Config,
    config_path: &Path,
) -> color_eyre::Result<()> {
    app::run_palette(store, config, config_path)
}
