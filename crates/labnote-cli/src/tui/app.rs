use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info, warn};

use labnote_core::api::{EntityApi, HttpEntityApi};
use labnote_core::commands::CommandId;
use labnote_core::config::Config;
use labnote_core::entity::Entity;
use labnote_core::error::LabnoteError;
use labnote_core::palette::Palette;
use labnote_core::request::{Debouncer, RequestSequencer, RequestToken};
use labnote_core::storage::{JsonFileRepository, TabRepository};
use labnote_core::tabs::TabStore;

use super::actions::{self, Outcome};
use super::view;

type SearchReply = (RequestToken, Result<Vec<Entity>, LabnoteError>);

pub struct AppState {
    pub palette: Palette,
    pub focused: usize,
    pub message: Option<String>,
    pub searching: bool,
}

/// Inventory search that runs off the UI thread and drops stale replies.
struct InventorySearch {
    api: Option<HttpEntityApi>,
    sequencer: RequestSequencer,
    debouncer: Debouncer,
    tx: Sender<SearchReply>,
    rx: Receiver<SearchReply>,
}

impl InventorySearch {
    fn new(config: &Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api: config.api_base_url.as_deref().map(HttpEntityApi::new),
            sequencer: RequestSequencer::new(),
            debouncer: Debouncer::new(config.debounce()),
            tx,
            rx,
        }
    }

    fn keystroke(&mut self) {
        self.debouncer.touch(Instant::now());
    }

    /// Issue a request if the query has been quiet long enough.
    fn dispatch(&mut self, state: &mut AppState) {
        if !self.debouncer.ready(Instant::now()) {
            return;
        }
        let Some(api) = &self.api else {
            return;
        };
        let query = state.palette.query().to_string();
        if query.is_empty() {
            self.sequencer.cancel();
            state.searching = false;
            state.palette.set_records(&[]);
            return;
        }

        let token = self.sequencer.issue();
        let api = api.clone();
        let tx = self.tx.clone();
        state.searching = true;
        debug!(?token, %query, "inventory search issued");
        thread::spawn(move || {
            let reply = api.search(None, &query);
            let _ = tx.send((token, reply));
        });
    }

    /// Apply finished replies; anything but the newest request is dropped.
    fn collect(&mut self, state: &mut AppState) {
        while let Ok((token, reply)) = self.rx.try_recv() {
            if !self.sequencer.accept(token) {
                debug!(?token, "stale inventory response discarded");
                continue;
            }
            state.searching = false;
            match reply {
                Ok(records) => state.palette.set_records(&records),
                Err(e) => {
                    warn!(error = %e, "inventory search failed");
                    state.message = Some(format!("Inventory search failed: {e}"));
                }
            }
        }
    }

    /// Drop the pending burst and every in-flight request.
    fn reset(&mut self) {
        self.debouncer.cancel();
        self.sequencer.cancel();
    }
}

/// Run the palette TUI on stderr until the user quits.
pub fn run_palette(
    store: &mut TabStore<JsonFileRepository>,
    config: &Config,
    config_path: &Path,
) -> color_eyre::Result<()> {
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, cursor::Hide)?;
    terminal::enable_raw_mode()?;

    let backend = CrosstermBackend::new(io::stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, store, config.clone(), config_path);

    terminal::disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, cursor::Show)?;

    result
}

fn open_palette<R: TabRepository>(
    state: &mut AppState,
    store: &TabStore<R>,
    config: &Config,
    search: &mut InventorySearch,
) {
    search.reset();
    state.searching = false;
    state.palette.reopen();
    state.palette.set_records(&[]);
    state
        .palette
        .set_recent(&actions::recent_items(store.groups(), config.recent_limit));
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    store: &mut TabStore<JsonFileRepository>,
    mut config: Config,
    config_path: &Path,
) -> color_eyre::Result<()> {
    let mut state = AppState {
        palette: Palette::new().with_limit(config.max_results),
        focused: 0,
        message: None,
        searching: false,
    };
    state
        .palette
        .set_recent(&actions::recent_items(store.groups(), config.recent_limit));
    let mut search = InventorySearch::new(&config);

    loop {
        search.collect(&mut state);
        search.dispatch(&mut state);

        terminal.draw(|f| view::render(f, &state, store.groups()))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if state.palette.is_open() {
            match key.code {
                KeyCode::Esc => {
                    state.palette.cancel();
                    search.reset();
                    state.searching = false;
                }
                KeyCode::Enter => {
                    search.reset();
                    state.searching = false;
                    if let Some(item) = state.palette.confirm() {
                        info!(item = %item.id, "palette item invoked");
                        let outcome = actions::apply(&item, store, state.focused);
                        handle_outcome(
                            outcome,
                            &mut state,
                            store,
                            &mut config,
                            config_path,
                            &mut search,
                        );
                    }
                }
                KeyCode::Up => state.palette.move_up(),
                KeyCode::Down => state.palette.move_down(),
                KeyCode::Backspace => {
                    state.palette.pop_char();
                    search.keystroke();
                }
                KeyCode::Char(c) => {
                    state.palette.push_char(c);
                    search.keystroke();
                }
                _ => {}
            }
        } else if !handle_workspace_key(key, &mut state, store, &config, &mut search) {
            break;
        }

        state.focused = state.focused.min(store.groups().len().saturating_sub(1));
    }

    Ok(())
}

/// Keys while the palette is closed. Returns false to quit.
fn handle_workspace_key(
    key: KeyEvent,
    state: &mut AppState,
    store: &mut TabStore<JsonFileRepository>,
    config: &Config,
    search: &mut InventorySearch,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('p') if ctrl => {
            open_palette(state, store, config, search);
            return true;
        }
        KeyCode::Char(':') => {
            open_palette(state, store, config, search);
            return true;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.focused = state.focused.saturating_sub(1);
            return true;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if state.focused + 1 < store.groups().len() {
                state.focused += 1;
            }
            return true;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            cycle_tab(state, store, -1);
            return true;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            cycle_tab(state, store, 1);
            return true;
        }
        KeyCode::Char('x') => CommandId::CloseTab,
        KeyCode::Char('p') => CommandId::TogglePin,
        KeyCode::Char('s') => CommandId::SplitPane,
        _ => return true,
    };

    state.message = match actions::run_command(command, store, state.focused) {
        Ok(Outcome::Message(msg)) => Some(msg),
        Ok(Outcome::Focus(group)) => {
            state.focused = group;
            None
        }
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    };
    true
}

fn cycle_tab(state: &mut AppState, store: &mut TabStore<JsonFileRepository>, step: isize) {
    let Ok(group) = store.group(state.focused) else {
        return;
    };
    if group.tabs.is_empty() {
        return;
    }
    let current = group
        .active_tab
        .as_deref()
        .and_then(|k| group.tabs.iter().position(|t| t.key == k))
        .unwrap_or(0);
    let len = group.tabs.len() as isize;
    let next = (current as isize + step).rem_euclid(len) as usize;
    let key = group.tabs[next].key.clone();
    if let Err(e) = store.set_active(&key, state.focused) {
        state.message = Some(e.to_string());
    }
}

fn handle_outcome(
    outcome: Result<Outcome, LabnoteError>,
    state: &mut AppState,
    store: &TabStore<JsonFileRepository>,
    config: &mut Config,
    config_path: &Path,
    search: &mut InventorySearch,
) {
    state.message = None;
    match outcome {
        Ok(Outcome::Focus(group)) => state.focused = group,
        Ok(Outcome::SearchInventory) => {
            open_palette(state, store, config, search);
            state.message = Some("Type to search inventory".to_string());
        }
        Ok(Outcome::ReloadConfig) => match Config::load_from(config_path) {
            Ok(reloaded) => {
                info!(path = %config_path.display(), "config reloaded");
                *search = InventorySearch::new(&reloaded);
                state.palette = Palette::new().with_limit(reloaded.max_results);
                state.palette.cancel();
                *config = reloaded;
                state.message = Some("Config reloaded".to_string());
            }
            Err(e) => state.message = Some(e.to_string()),
        },
        Ok(Outcome::Message(msg)) => state.message = Some(msg),
        Err(e) => {
            warn!(error = %e, "palette action failed");
            state.message = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labnote_core::entity::EntityType;
    use labnote_core::item::ItemKind;
    use labnote_core::storage::MemoryRepository;

    fn config() -> Config {
        Config {
            api_base_url: Some("http://127.0.0.1:9".to_string()),
            debounce_ms: 10,
            ..Config::default()
        }
    }

    fn state() -> AppState {
        AppState {
            palette: Palette::new(),
            focused: 0,
            message: None,
            searching: false,
        }
    }

    fn type_query(state: &mut AppState, search: &mut InventorySearch, query: &str) {
        for c in query.chars() {
            state.palette.push_char(c);
            search.keystroke();
        }
    }

    fn reagent() -> Entity {
        Entity {
            id: "r-1".to_string(),
            entity_type: EntityType::Reagent,
            name: "Sodium dodecyl sulfate".to_string(),
            description: None,
            tags: Vec::new(),
            quantity: None,
            unit: None,
            location: None,
            min_stock: None,
        }
    }

    fn has_records(state: &AppState) -> bool {
        state
            .palette
            .results()
            .iter()
            .any(|r| matches!(r.item.kind, ItemKind::Entity { .. }))
    }

    #[test]
    fn esc_drops_pending_search() {
        let config = config();
        let mut search = InventorySearch::new(&config);
        let mut state = state();
        type_query(&mut state, &mut search, "sod");

        state.palette.cancel();
        search.reset();
        thread::sleep(Duration::from_millis(30));
        search.dispatch(&mut state);

        assert!(!state.searching);
        assert!(!search.debouncer.is_pending());
    }

    #[test]
    fn reply_for_old_query_is_ignored_after_reopen() {
        let config = config();
        let store = TabStore::load(MemoryRepository::new());
        let mut search = InventorySearch::new(&config);
        let mut state = state();
        type_query(&mut state, &mut search, "sod");

        let token = search.sequencer.issue();
        state.palette.cancel();
        open_palette(&mut state, &store, &config, &mut search);
        search.tx.send((token, Ok(vec![reagent()]))).unwrap();
        search.collect(&mut state);

        assert!(state.palette.is_open());
        assert!(state.palette.query().is_empty());
        assert!(!has_records(&state));
    }

    #[test]
    fn reply_for_current_query_is_applied() {
        let config = config();
        let mut search = InventorySearch::new(&config);
        let mut state = state();
        type_query(&mut state, &mut search, "sod");

        let token = search.sequencer.issue();
        state.searching = true;
        search.tx.send((token, Ok(vec![reagent()]))).unwrap();
        search.collect(&mut state);

        assert!(!state.searching);
        assert!(has_records(&state));
    }
}
