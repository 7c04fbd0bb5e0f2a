//! `ratatui` front-end: key handling and the board renderer.

use crate::app::Board;
use crate::log_debug;
use crate::phrases::PhraseRecord;
use crate::terminal_restore::TerminalRestoreGuard;
use crate::text::{display_safe, display_width, fit_columns};
use crate::theme::ThemeColors;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Phrase cell size including its border.
const CELL_WIDTH: u16 = 24;
const CELL_HEIGHT: u16 = 4;
const HISTORY_HEIGHT: u16 = 8;

/// Configure the terminal, run the drawing loop, and tear everything down.
pub fn run_app(board: &mut Board) -> Result<()> {
    let mut stdout = io::stdout();
    let terminal_guard = TerminalRestoreGuard::enter(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app_loop(&mut terminal, board);

    drop(terminal);
    terminal_guard.restore();

    result
}

fn app_loop<B: Backend>(terminal: &mut Terminal<B>, board: &mut Board) -> Result<()> {
    terminal.draw(|frame| draw(frame, board))?;

    loop {
        board.poll_speech();

        let poll_duration = if board.is_speaking() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        let mut should_draw = board.take_redraw_request();
        let mut should_quit = false;

        if event::poll(poll_duration)? {
            match event::read()? {
                Event::Key(key) => {
                    let columns = grid_columns(terminal.size()?.width);
                    should_quit = handle_key_event(board, key, columns);
                    should_draw = true;
                }
                Event::Resize(_, _) => should_draw = true,
                _ => {}
            }
        }

        if should_draw {
            board.take_redraw_request();
            terminal.draw(|frame| draw(frame, board))?;
        }

        if should_quit {
            break;
        }
    }
    Ok(())
}

/// How many phrase cells fit across a terminal `width` columns wide.
pub(crate) fn grid_columns(width: u16) -> usize {
    usize::from((width.saturating_sub(2) / CELL_WIDTH).max(1))
}

/// Apply one keystroke to the board. Returns true when the app should quit.
///
/// `columns` is the current grid width so Up/Down move a whole row.
pub(crate) fn handle_key_event(board: &mut Board, key: KeyEvent, columns: usize) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    log_debug(&format!(
        "key event: {:?} with modifiers: {:?}",
        key.code, key.modifiers
    ));

    if board.is_sleeping() {
        board.wake();
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return true,
            KeyCode::Char('e') => board.toggle_edit_mode(),
            KeyCode::Char('t') => board.toggle_theme(),
            KeyCode::Char('s') => board.enter_sleep(),
            KeyCode::Char('a') => board.trigger_alert(),
            KeyCode::Char('w') => board.open_contact_link(),
            KeyCode::Char('r') => report(board.replay_last()),
            KeyCode::Char('d') => board.clear_history(),
            _ => {}
        }
        return false;
    }

    let row = isize::try_from(columns).unwrap_or(1);
    match key.code {
        KeyCode::Enter => report(board.submit()),
        KeyCode::Tab => board.focus_next_suggestion(),
        KeyCode::Esc => board.clear_input(),
        KeyCode::Backspace => board.backspace_input(),
        KeyCode::Left => board.move_selection(-1),
        KeyCode::Right => board.move_selection(1),
        KeyCode::Up => board.move_selection(-row),
        KeyCode::Down => board.move_selection(row),
        KeyCode::Char(c) => board.push_input_char(c),
        _ => {}
    }
    false
}

/// The board already put the failure in the status line.
fn report(result: Result<()>) {
    if let Err(err) = result {
        log_debug(&format!("ui: action failed: {err:#}"));
    }
}

struct Regions {
    header: Rect,
    input: Rect,
    suggestions: Rect,
    grid: Rect,
    history: Rect,
    status: Rect,
}

fn split(area: Rect, show_suggestions: bool) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(if show_suggestions { 3 } else { 0 }),
            Constraint::Min(CELL_HEIGHT + 2),
            Constraint::Length(HISTORY_HEIGHT),
            Constraint::Length(3),
        ])
        .split(area);
    Regions {
        header: chunks[0],
        input: chunks[1],
        suggestions: chunks[2],
        grid: chunks[3],
        history: chunks[4],
        status: chunks[5],
    }
}

fn panel<'a>(title: &'a str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors.title)
                .add_modifier(Modifier::BOLD),
        ))
}

fn hint<'a>(key: &'a str, action: &'a str, colors: &ThemeColors) -> [Span<'a>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(action, Style::default().fg(colors.muted)),
    ]
}

/// Render the whole board: header, input, suggestions, phrase grid, history, status.
pub fn draw(frame: &mut Frame<'_>, board: &Board) {
    let colors = board.theme().colors();
    let area = frame.size();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        area,
    );

    let suggestions = board.suggestions();
    let regions = split(area, suggestions.is_some());

    draw_header(frame, board, &colors, regions.header);
    draw_input(frame, board, &colors, regions.input);
    if let Some(matches) = &suggestions {
        draw_suggestions(frame, matches, board.suggestion_focus(), &colors, regions.suggestions);
    }
    draw_grid(frame, board, &colors, regions.grid);
    draw_history(frame, board, &colors, regions.history);
    draw_status(frame, board, &colors, regions.status);

    if board.is_sleeping() {
        draw_sleep_overlay(frame, area);
        return;
    }

    let inner_width = regions.input.width.saturating_sub(2);
    let typed = display_safe(board.input());
    let typed_width = display_width(&typed).min(usize::from(u16::MAX)) as u16;
    let cursor_x = regions
        .input
        .x
        .saturating_add(1)
        .saturating_add(typed_width.min(inner_width));
    frame.set_cursor(cursor_x, regions.input.y + 1);
}

fn draw_header(frame: &mut Frame<'_>, board: &Board, colors: &ThemeColors, area: Rect) {
    let mut spans = vec![Span::styled(
        " VoxBoard ",
        Style::default()
            .fg(colors.title)
            .add_modifier(Modifier::BOLD),
    )];
    if board.is_speaking() {
        spans.push(Span::styled(
            " 🔊 Hablando… ",
            Style::default()
                .fg(colors.speaking)
                .add_modifier(Modifier::BOLD),
        ));
    }
    // The button shows the action a press takes, like the original toggle.
    let (edit_label, edit_color) = if board.edit_mode() {
        (" [Listo] ", colors.danger)
    } else {
        (" [Editar] ", colors.accent)
    };
    spans.push(Span::styled(edit_label, Style::default().fg(edit_color)));
    spans.push(Span::styled(
        format!(" {} ", board.theme().toggle_icon()),
        Style::default().fg(colors.muted),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(frame: &mut Frame<'_>, board: &Board, colors: &ThemeColors, area: Rect) {
    let typed = display_safe(board.input());
    let mut footer = Vec::new();
    footer.extend(hint(" Enter ", "hablar  ", colors));
    footer.extend(hint("Tab ", "sugerencias  ", colors));
    footer.extend(hint("Esc ", "borrar ", colors));
    let block = panel(" Escribe una frase ", colors).title_bottom(Line::from(footer));
    let input = Paragraph::new(typed)
        .block(block)
        .style(Style::default().fg(colors.text));
    frame.render_widget(input, area);
}

fn draw_suggestions(
    frame: &mut Frame<'_>,
    matches: &[&PhraseRecord],
    focus: Option<usize>,
    colors: &ThemeColors,
    area: Rect,
) {
    let mut spans = Vec::with_capacity(matches.len() * 2);
    for (idx, phrase) in matches.iter().enumerate() {
        let chip = format!(
            " {} {} ",
            display_safe(&phrase.emoji),
            display_safe(&phrase.label)
        );
        let style = if focus == Some(idx) {
            Style::default()
                .fg(colors.selected_fg)
                .bg(colors.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.accent)
        };
        spans.push(Span::styled(chip, style));
        spans.push(Span::raw(" "));
    }
    let row = Paragraph::new(Line::from(spans)).block(panel(" Sugerencias ", colors));
    frame.render_widget(row, area);
}

fn draw_grid(frame: &mut Frame<'_>, board: &Board, colors: &ThemeColors, area: Rect) {
    let title = if board.edit_mode() {
        " Frases (Enter borra) "
    } else {
        " Frases "
    };
    let block = panel(title, colors);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = usize::from((inner.width / CELL_WIDTH).max(1));
    let visible_rows = usize::from((inner.height / CELL_HEIGHT).max(1));
    let selected_row = board.selected() / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    for (position, phrase) in board.ranked().into_iter().enumerate() {
        let row = position / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = position % columns;
        let cell = Rect {
            x: inner.x + col as u16 * CELL_WIDTH,
            y: inner.y + (row - first_row) as u16 * CELL_HEIGHT,
            width: CELL_WIDTH.min(inner.width),
            height: CELL_HEIGHT.min(inner.height),
        };
        let selected = position == board.selected();
        draw_cell(frame, phrase, selected, board.edit_mode(), colors, cell);
    }
}

fn draw_cell(
    frame: &mut Frame<'_>,
    phrase: &PhraseRecord,
    selected: bool,
    edit_mode: bool,
    colors: &ThemeColors,
    cell: Rect,
) {
    let width = usize::from(cell.width.saturating_sub(2));
    let caption = format!(
        "{} {}",
        display_safe(&phrase.emoji),
        display_safe(&phrase.label)
    );
    let footer = if edit_mode {
        Span::styled(
            fit_columns("✕ borrar", width),
            Style::default().fg(colors.danger),
        )
    } else if phrase.count > 0 {
        Span::styled(
            fit_columns(&format!("{}×", phrase.count), width),
            Style::default().fg(colors.badge),
        )
    } else {
        Span::raw(fit_columns("", width))
    };

    let (border, body) = if selected {
        (
            Style::default()
                .fg(colors.selected_bg)
                .add_modifier(Modifier::BOLD),
            Style::default()
                .fg(colors.selected_fg)
                .bg(colors.selected_bg),
        )
    } else {
        (
            Style::default().fg(colors.border),
            Style::default().fg(colors.text),
        )
    };
    let text = Text::from(vec![
        Line::from(Span::styled(fit_columns(&caption, width), body)),
        Line::from(footer),
    ]);
    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border),
    );
    frame.render_widget(widget, cell);
}

fn draw_history(frame: &mut Frame<'_>, board: &Board, colors: &ThemeColors, area: Rect) {
    let width = usize::from(area.width.saturating_sub(2));
    let lines: Vec<Line> = if board.history().is_empty() {
        vec![Line::from(Span::styled(
            "Aquí aparecerá lo que digas...",
            Style::default().fg(colors.muted),
        ))]
    } else {
        board
            .history()
            .iter()
            .take(usize::from(area.height.saturating_sub(2)))
            .map(|entry| {
                let time = format!("{} ", display_safe(&entry.time));
                let text_width = width.saturating_sub(display_width(&time));
                Line::from(vec![
                    Span::styled(time, Style::default().fg(colors.muted)),
                    Span::styled(
                        fit_columns(&display_safe(&entry.text), text_width),
                        Style::default().fg(colors.text),
                    ),
                ])
            })
            .collect()
    };
    let mut block = panel(" Historial ", colors);
    if board.edit_mode() {
        let mut footer = Vec::new();
        footer.extend(hint(" Ctrl+D ", "borrar historial ", colors));
        block = block.title_bottom(Line::from(footer));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_status(frame: &mut Frame<'_>, board: &Board, colors: &ThemeColors, area: Rect) {
    let mut footer = Vec::new();
    footer.extend(hint(" ^E ", "editar ", colors));
    footer.extend(hint("^T ", "tema ", colors));
    footer.extend(hint("^S ", "descanso ", colors));
    footer.extend(hint("^A ", "alerta ", colors));
    footer.extend(hint("^W ", "ayuda ", colors));
    footer.extend(hint("^R ", "repetir ", colors));
    footer.extend(hint("^Q ", "salir ", colors));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.muted))
        .title_bottom(Line::from(footer));
    let status = Paragraph::new(display_safe(board.status_text()))
        .block(block)
        .style(Style::default().fg(colors.muted));
    frame.render_widget(status, area);
}

fn draw_sleep_overlay(frame: &mut Frame<'_>, area: Rect) {
    frame.render_widget(Clear, area);
    let dim = Style::default()
        .bg(ratatui::style::Color::Black)
        .fg(ratatui::style::Color::DarkGray);
    let top_padding = usize::from(area.height.saturating_sub(3) / 2);
    let mut lines = vec![Line::from(""); top_padding];
    lines.push(Line::from("Modo descanso"));
    lines.push(Line::from(""));
    lines.push(Line::from("Pulsa cualquier tecla para volver"));
    let overlay = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .style(dim);
    frame.render_widget(overlay, area);
}
