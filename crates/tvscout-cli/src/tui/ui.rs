//! TUI rendering logic for the discover form.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::state::{CriteriaField, FormState, GenrePicker, Pane};

/// Draws the discover form UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(15), // criteria + pickers
            Constraint::Min(5),     // results
            Constraint::Length(3),  // footer
        ])
        .split(frame.area());

    draw_inputs(frame, chunks[0], state);
    draw_results(frame, chunks[1], state);
    draw_footer(frame, chunks[2], state);
}

fn border_style(state: &FormState, pane: Pane) -> Style {
    if state.focus == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn cursor_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Draws the criteria pane and the three pickers side by side.
#[allow(clippy::indexing_slicing)]
fn draw_inputs(frame: &mut Frame, area: Rect, state: &FormState) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(28),
        ])
        .split(area);

    draw_criteria(frame, panes[0], state);
    draw_genre_picker(
        frame,
        panes[1],
        state,
        Pane::IncludedGenres,
        &state.included,
        " Genres ",
    );
    draw_genre_picker(
        frame,
        panes[2],
        state,
        Pane::ExcludedGenres,
        &state.excluded,
        " Exclude genres ",
    );
    draw_keywords(frame, panes[3], state);
}

fn draw_criteria(frame: &mut Frame, area: Rect, state: &FormState) {
    let is_active = state.focus == Pane::Criteria;
    let items: Vec<ListItem> = CriteriaField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let on_cursor = is_active && i == state.field_cursor;
            let marker = if on_cursor { "\u{25b8} " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::raw(format!("{:<15}", field.label())),
                Span::styled(state.field_value(*field), cursor_style(on_cursor)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state, Pane::Criteria))
            .title(" Criteria "),
    );
    frame.render_widget(list, area);
}

#[allow(clippy::indexing_slicing)]
fn draw_genre_picker(
    frame: &mut Frame,
    area: Rect,
    state: &FormState,
    pane: Pane,
    picker: &GenrePicker,
    title: &str,
) {
    let is_active = state.focus == pane;
    let selected = if pane == Pane::IncludedGenres {
        &state.criteria.genres
    } else {
        &state.criteria.excluded_genres
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, pane))
        .title(format!("{title}({}) ", selected.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let term = Paragraph::new(format!("/ {}", picker.filter.term())).style(if is_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    });
    frame.render_widget(term, rows[0]);

    let items: Vec<ListItem> = picker
        .filter
        .matching()
        .enumerate()
        .map(|(i, genre)| {
            let checkbox = if selected.contains(&genre.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if is_active && i == picker.cursor {
                cursor_style(true)
            } else if selected.contains(&genre.id) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!("{checkbox} {}", genre.name), style))
        })
        .collect();
    frame.render_widget(List::new(items), rows[1]);
}

#[allow(clippy::indexing_slicing)]
fn draw_keywords(frame: &mut Frame, area: Rect, state: &FormState) {
    let is_active = state.focus == Pane::Keywords;
    let picker = &state.keywords;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Pane::Keywords))
        .title(format!(" Keywords ({}) ", picker.selected.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(inner);

    let pending = if picker.debouncer.is_pending() {
        " \u{2026}"
    } else {
        ""
    };
    let query = Paragraph::new(format!("? {}{pending}", picker.query)).style(if is_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    });
    frame.render_widget(query, rows[0]);

    let items: Vec<ListItem> = picker
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, keyword)| {
            let checked = picker.selected.contains_key(&keyword.id);
            let checkbox = if checked { "[x]" } else { "[ ]" };
            let style = if is_active && i == picker.cursor {
                cursor_style(true)
            } else if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!("{checkbox} {}", keyword.name), style))
        })
        .collect();
    frame.render_widget(List::new(items), rows[1]);

    let chosen: Vec<&str> = picker
        .selected_sorted()
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    let chosen = Paragraph::new(chosen.join(", "))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::TOP).title(" Selected "));
    frame.render_widget(chosen, rows[2]);
}

fn draw_results(frame: &mut Frame, area: Rect, state: &FormState) {
    let is_active = state.focus == Pane::Results;
    let shows = state.results.as_ref().map_or(&[][..], |r| r.shows.as_slice());

    let items: Vec<ListItem> = shows
        .iter()
        .enumerate()
        .map(|(i, show)| {
            let on_cursor = is_active && i == state.result_cursor;
            let marker = if on_cursor { "\u{25b8} " } else { "  " };
            let genres: Vec<&str> = show.genres.iter().map(|g| g.name.as_str()).collect();
            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::styled(
                    format!(
                        "{:<8} {:<36} {:>3}s {:>5}e  {:>4.1}  {:<10}  {}",
                        show.id,
                        show.name,
                        show.number_of_seasons,
                        show.number_of_episodes,
                        show.vote_average,
                        show.first_air_date.as_deref().unwrap_or("-"),
                        genres.join(", "),
                    ),
                    cursor_style(on_cursor),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state, Pane::Results))
            .title(format!(" Results ({}) ", shows.len())),
    );
    frame.render_widget(list, area);
}

/// Draws the status line with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &FormState) {
    let hints = match state.focus {
        Pane::Criteria => "\u{2191}\u{2193}: field  \u{2190}\u{2192}: change  x: clear max",
        Pane::IncludedGenres | Pane::ExcludedGenres => {
            "type: filter  \u{2191}\u{2193}: move  Space: toggle"
        }
        Pane::Keywords => "type: search  \u{2191}\u{2193}: move  Enter: toggle",
        Pane::Results => "\u{2191}\u{2193}: move",
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(state.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw(format!(
            "  |  {hints}  Tab: pane  Ctrl-S: search  Ctrl-R: reset  Esc: quit"
        )),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
