//! Discover form TUI main loop.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::instrument::WithSubscriber;
use tracing::subscriber::NoSubscriber;
use tvscout_api::discover::{SearchOptions, search_shows, suggest_keywords};
use tvscout_api::tmdb::{LocalTmdbApi, TmdbGenre};

use super::state::{FormState, Pane};
use super::ui;

/// Event poll interval; bounds how late a debounced lookup can fire.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    /// Keep running.
    Continue,
    /// Run the search with the current criteria.
    Submit,
    /// Leave the form.
    Quit,
}

/// Runs the discover form until the user quits.
///
/// Log events raised while the form owns the terminal are discarded so
/// they do not tear the alternate screen.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails. Remote
/// call failures are shown in the status line instead.
pub async fn run_discover_form(
    api: &(impl LocalTmdbApi + Sync),
    genres: Vec<TmdbGenre>,
    current_year: i32,
    options: SearchOptions,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = FormState::new(genres, current_year);

    let result = run_event_loop(&mut terminal, &mut state, api, &options)
        .with_subscriber(NoSubscriber::default())
        .await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut FormState,
    api: &(impl LocalTmdbApi + Sync),
    options: &SearchOptions,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if let Some(query) = state.keywords.debouncer.poll(Instant::now()) {
            match suggest_keywords(api, &query).await {
                Ok(keywords) => state.keywords.set_suggestions(keywords),
                Err(e) => state.set_error(&e),
            }
            continue;
        }

        if event::poll(POLL_INTERVAL).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(state, key.code, key.modifiers, Instant::now()) {
                FormAction::Continue => {}
                FormAction::Quit => return Ok(()),
                FormAction::Submit => {
                    state.status = String::from("Searching...");
                    terminal
                        .draw(|frame| ui::draw(frame, state))
                        .context("failed to draw TUI")?;
                    match search_shows(api, &state.criteria, options).await {
                        Ok(result) => state.set_results(result),
                        Err(e) => state.set_error(&e),
                    }
                }
            }
        }
    }
}

/// Applies one key press to the form.
fn handle_key(
    state: &mut FormState,
    key: KeyCode,
    modifiers: KeyModifiers,
    now: Instant,
) -> FormAction {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('c') => return FormAction::Quit,
            KeyCode::Char('s') => return FormAction::Submit,
            KeyCode::Char('r') => state.reset(),
            _ => {}
        }
        return FormAction::Continue;
    }

    match key {
        KeyCode::Esc => return FormAction::Quit,
        KeyCode::Tab => state.focus_next(),
        KeyCode::BackTab => state.focus_prev(),
        KeyCode::Up => state.move_up(),
        KeyCode::Down => state.move_down(),
        KeyCode::Backspace => state.backspace(now),
        KeyCode::Left if state.focus == Pane::Criteria => state.adjust(false),
        KeyCode::Right if state.focus == Pane::Criteria => state.adjust(true),
        KeyCode::Char('x') if state.focus == Pane::Criteria => state.clear_current_max(),
        KeyCode::Enter if state.focus == Pane::Keywords => state.toggle_current(),
        KeyCode::Char(' ')
            if matches!(state.focus, Pane::IncludedGenres | Pane::ExcludedGenres) =>
        {
            state.toggle_current();
        }
        KeyCode::Char(c) => state.type_char(c, now),
        _ => {}
    }
    FormAction::Continue
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeSet;

    use tvscout_api::discover::FilterCriteria;

    use super::*;

    fn sample_state() -> FormState {
        FormState::new(
            vec![
                TmdbGenre {
                    id: 16,
                    name: String::from("Animation"),
                },
                TmdbGenre {
                    id: 18,
                    name: String::from("Drama"),
                },
            ],
            2024,
        )
    }

    fn press(state: &mut FormState, key: KeyCode) -> FormAction {
        handle_key(state, key, KeyModifiers::NONE, Instant::now())
    }

    #[test]
    fn test_ctrl_s_submits_and_esc_quits() {
        // Arrange
        let mut state = sample_state();

        // Act
        let submit = handle_key(
            &mut state,
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
            Instant::now(),
        );
        let quit = press(&mut state, KeyCode::Esc);

        // Assert
        assert_eq!(submit, FormAction::Submit);
        assert_eq!(quit, FormAction::Quit);
    }

    #[test]
    fn test_ctrl_r_resets() {
        // Arrange
        let mut state = sample_state();
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Right);

        // Act
        let action = handle_key(
            &mut state,
            KeyCode::Char('r'),
            KeyModifiers::CONTROL,
            Instant::now(),
        );

        // Assert
        assert_eq!(action, FormAction::Continue);
        assert_eq!(state.criteria, FilterCriteria::for_year(2024));
    }

    #[test]
    fn test_space_toggles_genre_but_types_in_keywords() {
        // Arrange
        let mut state = sample_state();
        press(&mut state, KeyCode::Tab);

        // Act
        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        for c in "time travel".chars() {
            press(&mut state, KeyCode::Char(c));
        }

        // Assert
        assert_eq!(state.criteria.genres, BTreeSet::from([16]));
        assert_eq!(state.focus, Pane::Keywords);
        assert_eq!(state.keywords.query, "time travel");
    }

    #[test]
    fn test_x_only_clears_in_criteria_pane() {
        // Arrange
        let mut state = sample_state();
        state.focus = Pane::IncludedGenres;

        // Act
        press(&mut state, KeyCode::Char('x'));

        // Assert
        assert_eq!(state.included.filter.term(), "x");
    }
}
