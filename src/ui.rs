use crate::{
    app::{App, DetailsState, InputMode, LogLevel, ToastLevel},
    theme::Palette,
    view::{self, DetailsView},
};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    io,
    ops::Range,
    time::{Duration, Instant},
};

const SEARCH_PLACEHOLDER: &str = "Search games...";

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    app.start_fetch();
    loop {
        app.tick();
        app.poll_fetch();
        app.clamp_selection();
        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }

    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if app.current_notice().is_some() {
        handle_notice_mode(app, key);
        return;
    }
    if app.details.is_some() {
        handle_details_mode(app, key);
        return;
    }
    match app.input_mode {
        InputMode::Search => handle_search_mode(app, key),
        InputMode::Normal => handle_normal_mode(app, key),
    }
}

fn handle_notice_mode(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_notice();
    }
}

fn handle_details_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => app.close_details(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => app.details_prev_link(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Tab => {
            app.details_next_link()
        }
        KeyCode::PageDown | KeyCode::Char(' ') => app.details_page_down(),
        KeyCode::PageUp => app.details_page_up(),
        KeyCode::Home => app.details_scroll_top(),
        KeyCode::End => app.details_scroll_bottom(),
        KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char('O') => app.activate_link(),
        KeyCode::Char('y') | KeyCode::Char('Y') => app.copy_link(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_search_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.finish_search(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return;
            }
            app.search_push(c);
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('S') => app.begin_search(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.start_fetch() {
                app.set_toast("Refreshing catalog", ToastLevel::Info, Duration::from_secs(2));
            } else {
                app.set_toast("Catalog is already loading", ToastLevel::Warn, Duration::from_secs(2));
            }
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => app.select_next(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home => app.selected = 0,
        KeyCode::End => {
            app.selected = usize::MAX;
            app.clamp_selection();
        }
        KeyCode::Enter => app.open_selected_details(),
        KeyCode::Esc => app.cancel_search(),
        _ => {}
    }
}

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(6),
        ])
        .split(area);

    draw_header(frame, app, &palette, chunks[0]);
    draw_search(frame, app, &palette, chunks[1]);
    draw_cards(frame, app, &palette, chunks[2]);

    let status_block = palette.panel("Status");
    let status_inner = status_block.inner(chunks[3]);
    let status = Paragraph::new(status_bar_line(app, status_inner.width))
        .style(Style::default().fg(palette.text))
        .block(status_block);
    frame.render_widget(status, chunks[3]);

    let log_block = palette.panel("Log");
    let log_inner = log_block.inner(chunks[4]);
    let log = Paragraph::new(build_log_lines(app, &palette, log_inner.height as usize))
        .block(log_block);
    frame.render_widget(log, chunks[4]);

    if let Some(details) = app.details.as_mut() {
        let view = view::details_view(&details.game, &palette);
        draw_details(frame, &view, details, &palette);
    }
    if app.current_notice().is_some() {
        draw_notice(frame, app, &palette);
    }
    draw_toast(frame, app, &palette, chunks[2]);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let total = app.games.len();
    let showing = app.visible_games().len();
    let count_label = if app.is_loading() && !app.has_loaded() {
        "loading".to_string()
    } else {
        format!("{showing}/{total}")
    };
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "Dependo",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Game Dependency Viewer", Style::default().fg(palette.text)),
            Span::raw("   "),
            Span::styled("Theme: ", Style::default().fg(palette.subtle)),
            Span::styled(
                app.theme.mode().label(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Games: ", Style::default().fg(palette.subtle)),
            Span::styled(count_label, Style::default().fg(palette.text)),
        ]),
        Line::from(Span::styled(
            app.source_label(),
            Style::default().fg(palette.subtle),
        )),
    ])
    .style(Style::default().bg(palette.surface))
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_search(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let block = palette.panel(if editing { "Search (editing)" } else { "Search" });
    let inner = block.inner(area);
    let content = if app.search.is_empty() {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(palette.subtle))
    } else {
        Span::styled(app.search.clone(), Style::default().fg(palette.text))
    };
    let search = Paragraph::new(Line::from(content))
        .style(Style::default().bg(palette.surface))
        .block(block);
    frame.render_widget(search, area);
    if editing {
        let offset = app.search.chars().count() as u16;
        let x = inner.x + offset.min(inner.width.saturating_sub(1));
        frame.set_cursor(x, inner.y);
    }
}

fn draw_cards(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let block = palette.block("Games");
    if app.is_loading() && app.games.is_empty() {
        let elapsed = app
            .loading_elapsed()
            .map(|elapsed| format!(" ({}s)", elapsed.as_secs()))
            .unwrap_or_default();
        let loading = Paragraph::new(format!("Loading catalog...{elapsed}"))
            .style(Style::default().fg(palette.subtle))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(loading, area);
        return;
    }

    let indices = app.visible_indices();
    if indices.is_empty() {
        let message = if app.games.is_empty() {
            "No games loaded. Press r to retry."
        } else {
            "No games match the search."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(palette.subtle))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'static>> = indices
        .iter()
        .map(|&index| {
            let card = view::card_view(index, &app.games[index], palette);
            ListItem::new(vec![card.title, card.summary, Line::from("")])
                .style(Style::default().bg(palette.surface))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(palette.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn status_bar_line(app: &App, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }
    let left = format!("Status: {}", app.status);
    let right = app.hint().to_string();
    let left_len = left.chars().count();
    let right_len = right.chars().count();

    if left_len + right_len + 1 > width {
        let available = width.saturating_sub(left_len + 1);
        let trimmed_right: String = right.chars().take(available).collect();
        return format!("{left} {trimmed_right}");
    }

    let spaces = width - left_len - right_len;
    format!("{left}{}{right}", " ".repeat(spaces))
}

fn build_log_lines(app: &App, palette: &Palette, height: usize) -> Vec<Line<'static>> {
    if height == 0 {
        return Vec::new();
    }
    if app.logs.is_empty() {
        return vec![Line::from(Span::styled(
            "No recent events.",
            Style::default().fg(palette.subtle),
        ))];
    }

    let start = app.logs.len().saturating_sub(height);
    app.logs[start..]
        .iter()
        .map(|entry| {
            let (label, color) = match entry.level {
                LogLevel::Info => ("[i]", palette.accent),
                LogLevel::Warn => ("[!]", palette.subtle),
                LogLevel::Error => ("[x]", palette.error),
            };
            Line::from(vec![
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(entry.message.clone(), Style::default().fg(palette.text)),
            ])
        })
        .collect()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn draw_details(
    frame: &mut Frame<'_>,
    view: &DetailsView,
    details: &mut DetailsState,
    palette: &Palette,
) {
    let area = frame.size();
    let width = (area.width.saturating_mul(3) / 4).max(40).min(area.width);
    // Borders plus one cell of padding on each side.
    let text_width = width.saturating_sub(4) as usize;

    let mut lines = view.lines.clone();
    let first_link = lines.len();
    for (index, link) in view.links.iter().enumerate() {
        lines.push(DetailsView::link_line(
            link,
            index == details.selected_link,
            palette,
        ));
    }
    if let Some(link) = view.links.get(details.selected_link) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            link.url.clone(),
            Style::default().fg(palette.subtle),
        )));
    }

    let selected_line = (!view.links.is_empty()).then_some(first_link + details.selected_link);
    let mut rows = Vec::new();
    let mut selected_rows = None;
    for (index, line) in lines.into_iter().enumerate() {
        let start = rows.len();
        rows.extend(wrap_line(line, text_width));
        if Some(index) == selected_line {
            selected_rows = Some(start..rows.len());
        }
    }

    let height = (rows.len() as u16).saturating_add(4).max(10);
    let details_area = centered(area, width, height);
    let viewport = details_area.height.saturating_sub(4) as usize;
    let keep_visible = if details.follow_link {
        selected_rows
    } else {
        None
    };
    details.viewport = viewport;
    details.scroll = resolve_scroll(details.scroll, keep_visible, rows.len(), viewport);
    details.follow_link = false;

    let mut title = vec![Span::styled(
        view.title.clone(),
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if rows.len() > viewport {
        title.push(Span::styled(
            format!(" {}/{} ", details.scroll + 1, rows.len() - viewport + 1),
            Style::default().fg(palette.subtle),
        ));
    }

    frame.render_widget(Clear, details_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.background))
        .title(Line::from(title))
        .padding(ratatui::widgets::Padding::uniform(1));
    let offset = u16::try_from(details.scroll).unwrap_or(u16::MAX);
    let widget = Paragraph::new(rows)
        .block(block)
        .style(Style::default().fg(palette.text))
        .scroll((offset, 0));
    frame.render_widget(widget, details_area);
}

/// First visible row after clamping to the content, optionally pulled so
/// `keep_visible` sits inside the viewport.
fn resolve_scroll(
    scroll: usize,
    keep_visible: Option<Range<usize>>,
    total: usize,
    viewport: usize,
) -> usize {
    let max_scroll = total.saturating_sub(viewport);
    let mut scroll = scroll.min(max_scroll);
    if let Some(rows) = keep_visible {
        if rows.start < scroll {
            scroll = rows.start;
        } else if rows.end > scroll + viewport {
            scroll = rows.end.saturating_sub(viewport).min(rows.start);
        }
    }
    scroll.min(max_scroll)
}

/// Hard-wraps a styled line at `width` columns so rows map one to one onto
/// scroll offsets.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in line.spans {
        let style = span.style;
        let mut chunk = String::new();
        for c in span.content.chars() {
            if used == width {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                rows.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            chunk.push(c);
            used += 1;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
    if !current.is_empty() {
        rows.push(Line::from(current));
    }
    rows
}

fn draw_notice(frame: &mut Frame<'_>, app: &App, palette: &Palette) {
    let Some(notice) = app.current_notice() else {
        return;
    };
    let area = frame.size();
    let mut lines = vec![
        Line::from(Span::styled(
            notice.title.clone(),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(notice.message.lines().map(|line| Line::from(line.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" OK ", palette.highlight())));

    let width = (area.width.saturating_mul(2) / 3).clamp(34, area.width.max(34));
    let height = lines.len() as u16 + 6;
    let notice_area = centered(area, width, height);

    frame.render_widget(Clear, notice_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error))
        .style(Style::default().bg(palette.surface));
    let widget = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(palette.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, notice_area);
}

fn draw_toast(frame: &mut Frame<'_>, app: &App, palette: &Palette, body_area: Rect) {
    let Some(toast) = app.toast.as_ref() else {
        return;
    };
    if toast.expires_at <= Instant::now() {
        return;
    }

    let mut message = toast.message.clone();
    let max_width = body_area.width.saturating_sub(4).max(24);
    let max_text = max_width.saturating_sub(4) as usize;
    if message.chars().count() > max_text {
        message = message.chars().take(max_text.saturating_sub(3)).collect();
        message.push_str("...");
    }
    let width = (message.chars().count() as u16 + 4).clamp(24, max_width);
    let x = body_area.x + (body_area.width.saturating_sub(width)) / 2;
    let toast_area = Rect::new(x, body_area.y + 1, width, 3).intersection(frame.size());

    let border = match toast.level {
        ToastLevel::Info => palette.accent,
        ToastLevel::Warn => palette.subtle,
        ToastLevel::Error => palette.error,
    };
    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.surface));
    let content = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(palette.text))
        .alignment(Alignment::Center);
    frame.render_widget(content, toast_area);
}
