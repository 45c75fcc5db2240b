use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use labnote_core::search::ScoredItem;
use labnote_core::tabs::TabGroup;

use super::app::AppState;

pub fn render(f: &mut Frame, state: &AppState, groups: &[TabGroup]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // tab groups
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_groups(f, chunks[0], state.focused, groups, state.palette.is_open());
    render_status(f, chunks[1], state, groups);

    if state.palette.is_open() {
        render_palette(f, state);
    }
}

fn render_groups(f: &mut Frame, area: Rect, focused: usize, groups: &[TabGroup], dimmed: bool) {
    let constraints: Vec<Constraint> = groups
        .iter()
        .map(|_| Constraint::Ratio(1, groups.len() as u32))
        .collect();
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, (group, pane)) in groups.iter().zip(panes.iter()).enumerate() {
        let items: Vec<ListItem> = group
            .tabs
            .iter()
            .map(|tab| {
                let active = group.active_tab.as_deref() == Some(tab.key.as_str());
                let style = if active {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if active { "> " } else { "  " };
                let mut spans = vec![
                    Span::styled(prefix, style),
                    Span::styled(format!("{} {}", tab.icon.glyph(), tab.title), style),
                ];
                if tab.dirty {
                    spans.push(Span::styled(" ●", Style::default().fg(Color::Red)));
                }
                if tab.pinned {
                    spans.push(Span::styled(" ^", Style::default().fg(Color::Magenta)));
                }
                spans.push(Span::styled(
                    format!("  {}", tab.path),
                    Style::default().fg(Color::DarkGray),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let border = if i == focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" Group {i} "));
        let mut list = List::new(items).block(block);
        if dimmed {
            list = list.style(Style::default().fg(Color::DarkGray));
        }
        f.render_widget(list, *pane);
    }
}

fn render_status(f: &mut Frame, area: Rect, state: &AppState, groups: &[TabGroup]) {
    let hints = if state.palette.is_open() {
        " | Esc: close | Enter: run | ↑/↓: select"
    } else {
        " | q: quit | ctrl-p/: palette | h/l: group | j/k: tab | x: close | p: pin | s: split"
    };
    let tab_count: usize = groups.iter().map(|g| g.tabs.len()).sum();
    let mut spans = vec![
        Span::styled(
            format!(" {} groups, {} tabs ", groups.len(), tab_count),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ];
    if state.searching {
        spans.push(Span::styled("  searching…", Style::default().fg(Color::Blue)));
    }
    if let Some(msg) = &state.message {
        spans.push(Span::styled(
            format!("  {msg}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_palette(f: &mut Frame, state: &AppState) {
    let width = 80u16.min(f.area().width.saturating_sub(4));
    let height = 24u16.min(f.area().height.saturating_sub(2));
    let area = centered_rect(width, height, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(1),    // results
        ])
        .split(area);

    let query = state.palette.query();
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(query),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Command palette "));
    f.render_widget(input, chunks[0]);

    let cursor_x = chunks[0].x + 2 + query.chars().count() as u16;
    let cursor_y = chunks[0].y + 1;
    f.set_cursor_position((cursor_x, cursor_y));

    let mut rows = Vec::new();
    let mut selected_row = None;
    let mut flat = 0;
    for (category, items) in state.palette.groups() {
        rows.push(ListItem::new(Line::from(Span::styled(
            format!("{} {}", category.icon(), category.label().to_uppercase()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))));
        for scored in items {
            let selected = flat == state.palette.selected_index();
            if selected {
                selected_row = Some(rows.len());
            }
            rows.push(result_row(scored, selected));
            flat += 1;
        }
    }

    let title = format!(" {} results ", state.palette.results().len());
    let list = List::new(rows).block(Block::default().borders(Borders::ALL).title(title));
    let mut list_state = ListState::default().with_selected(selected_row);
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn result_row(scored: &ScoredItem, selected: bool) -> ListItem<'static> {
    let base = if selected {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
    };
    let hit = base.fg(Color::Yellow);

    let mut spans = vec![Span::styled(if selected { "> " } else { "  " }, base)];
    for (text, matched) in highlight_segments(&scored.item.title, &scored.title_positions) {
        spans.push(Span::styled(text, if matched { hit } else { base }));
    }
    if let Some(subtitle) = &scored.item.subtitle {
        spans.push(Span::styled(
            format!("  {subtitle}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Split `text` into runs of matched and unmatched chars.
fn highlight_segments(text: &str, positions: &[usize]) -> Vec<(String, bool)> {
    let mut segments: Vec<(String, bool)> = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let matched = positions.binary_search(&i).is_ok();
        match segments.last_mut() {
            Some((run, m)) if *m == matched => run.push(ch),
            _ => segments.push((ch.to_string(), matched)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_match_boundaries() {
        let segments = highlight_segments("Sodium Chloride", &[0, 1, 2, 7]);
        assert_eq!(
            segments,
            vec![
                ("Sod".to_string(), true),
                ("ium ".to_string(), false),
                ("C".to_string(), true),
                ("hloride".to_string(), false),
            ]
        );
    }

    #[test]
    fn no_positions_is_one_plain_segment() {
        assert_eq!(
            highlight_segments("Agarose", &[]),
            vec![("Agarose".to_string(), false)]
        );
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 4, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.y, 3);
    }
}
