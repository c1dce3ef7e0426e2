use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::output::format_win_rate;
use crate::tui::app::{App, InputMode, LoginField, MatchField, PendingDelete, PlayerField, View};
use crate::tui::theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::AddPlayer => render_player_form(frame, app),
        InputMode::AddMatch => render_match_form(frame, app),
        InputMode::Login => render_login_form(frame, app),
        InputMode::ConfirmDelete => render_confirm_popup(frame, app),
        InputMode::Help => render_help_popup(frame),
        InputMode::Normal => {}
    }

    // Loading overlay goes on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "matchpoint",
        Style::default().fg(theme::TITLE_COLOR).bold(),
    )];

    let session = match &app.session_username {
        Some(username) => format!("logged in as {}", username),
        None => "read-only (press l to log in)".to_string(),
    };
    let left_len = "matchpoint".len();
    let padding_len = (area.width as usize).saturating_sub(left_len + session.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(session, Style::default().fg(theme::MUTED)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Players", "Matches", "Leaderboard"];
    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(Style::default().fg(theme::MUTED))
        .highlight_style(Style::default().fg(theme::TITLE_COLOR).bold().reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    match app.current_view {
        View::Players => render_players_table(frame, area, app),
        View::Matches => render_matches_table(frame, area, app),
        View::Leaderboard => render_leaderboard_table(frame, area, app),
    }
}

fn alt_row_style(idx: usize) -> Style {
    if idx % 2 == 1 {
        Style::default().bg(theme::ROW_ALT_BG)
    } else {
        Style::default()
    }
}

fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let empty_msg = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default());
    frame.render_widget(empty_msg, area);
}

fn render_players_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.data.players.is_empty() {
        render_empty(frame, area, "No players registered. Press p to add one.");
        return;
    }

    let rows: Vec<Row> = app
        .data
        .players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1))
                    .style(Style::default().fg(theme::INDEX_COLOR)),
                Cell::from(player.name.clone()),
                Cell::from(format!("{}", player.age)),
                Cell::from(player.player_type.to_string()),
            ])
            .style(alt_row_style(idx))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Name", "Age", "Type"])
                .style(theme::header_style())
                .bottom_margin(1),
        )
        .row_highlight_style(theme::row_selected());

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_matches_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.data.matches.is_empty() {
        render_empty(frame, area, "No matches recorded. Press m to add one.");
        return;
    }

    let rows: Vec<Row> = app
        .data
        .matches
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            Row::new(vec![
                Cell::from(format!("{}", m.id)).style(Style::default().fg(theme::INDEX_COLOR)),
                Cell::from(m.player_a_name.clone()),
                Cell::from(m.player_b_name.clone()),
                Cell::from(Span::styled(
                    m.score.clone(),
                    Style::default().fg(Color::Yellow),
                )),
                Cell::from(m.date.format("%Y-%m-%d").to_string()),
            ])
            .style(alt_row_style(idx))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["ID", "Player A", "Player B", "Score", "Date"])
                .style(theme::header_style())
                .bottom_margin(1),
        )
        .row_highlight_style(theme::row_selected());

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_leaderboard_table(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.data.leaderboard.is_empty() {
        render_empty(frame, area, "Leaderboard is empty. Record a match first.");
        return;
    }

    let rows: Vec<Row> = app
        .data
        .leaderboard
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let rate_color = theme::win_rate_color(row.win_rate_percent);
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1))
                    .style(Style::default().fg(theme::INDEX_COLOR)),
                Cell::from(row.name.clone()),
                Cell::from(format!("{}", row.matches)),
                Cell::from(Span::styled(
                    format!("{}", row.wins),
                    Style::default().fg(theme::WIN_COLOR),
                )),
                Cell::from(Span::styled(
                    format!("{}", row.losses),
                    Style::default().fg(theme::LOSS_COLOR),
                )),
                Cell::from(Span::styled(
                    format_win_rate(row.win_rate_percent),
                    Style::default().fg(rate_color),
                )),
            ])
            .style(alt_row_style(idx))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Name", "Matches", "Wins", "Losses", "Rate"])
                .style(theme::header_style())
                .bottom_margin(1),
        )
        .row_highlight_style(theme::row_selected());

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed")
            || msg.contains("failed")
            || msg.contains("timed out")
            || msg.contains("cancelled")
        {
            theme::FLASH_ERROR
        } else if msg.starts_with("Added")
            || msg.starts_with("Recorded")
            || msg.starts_with("Deleted")
            || msg.starts_with("Refreshed")
            || msg.starts_with("Logged in")
        {
            theme::FLASH_SUCCESS
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let elapsed = app.last_refresh.elapsed();
        let refresh_time = if elapsed.as_secs() < 60 {
            format!("refreshed {}s ago", elapsed.as_secs())
        } else {
            format!("refreshed {}m ago", elapsed.as_secs() / 60)
        };

        let hints: Vec<(&str, &str)> = vec![
            ("j/k", ":nav "),
            ("Tab", ":view "),
            ("p", ":player "),
            ("m", ":match "),
            ("d", ":delete "),
            ("r", ":refresh "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(
                format!("{} rows", app.current_len()),
                Style::default().fg(theme::MUTED),
            ),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(theme::MUTED)),
            Span::raw("  "),
        ];
        for (key, label) in hints {
            spans.push(Span::styled(key, Style::default().fg(theme::STATUS_KEY_COLOR)));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme::STATUS_BAR_BG)),
        area,
    );
}

/// One form line: label, value, and a cursor when the field has focus.
fn form_field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let value_span = if focused {
        Span::styled(format!("{}|", value), theme::focused_field())
    } else {
        Span::raw(value)
    };
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(theme::FORM_LABEL)),
        value_span,
    ])
}

fn render_form_errors<'a>(errors: &'a [String]) -> Vec<Line<'a>> {
    errors
        .iter()
        .map(|e| Line::from(Span::styled(e.as_str(), Style::default().fg(theme::FORM_ERROR))))
        .collect()
}

fn render_player_form(frame: &mut Frame, app: &App) {
    let height = 8 + app.player_form.errors.len() as u16;
    let popup_area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Add Player ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let form = &app.player_form;
    let mut lines = vec![
        form_field_line("Name", form.name.clone(), form.focus == PlayerField::Name),
        form_field_line("Age", form.age.clone(), form.focus == PlayerField::Age),
        form_field_line(
            "Type",
            format!("< {} >", form.kind),
            form.focus == PlayerField::Kind,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Tab: next field | Space: toggle type | Enter: save | Esc: cancel",
            Style::default().fg(theme::MUTED),
        )),
    ];
    lines.extend(render_form_errors(&form.errors));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_match_form(frame: &mut Frame, app: &App) {
    let height = 9 + app.match_form.errors.len() as u16;
    let popup_area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Record Match ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let form = &app.match_form;
    let mut lines = vec![
        form_field_line(
            "Player A",
            form.player_a.clone(),
            form.focus == Some(MatchField::PlayerA),
        ),
        form_field_line(
            "Player B",
            form.player_b.clone(),
            form.focus == Some(MatchField::PlayerB),
        ),
        form_field_line(
            "Score",
            form.score.clone(),
            form.focus == Some(MatchField::Score),
        ),
        form_field_line(
            "Date",
            form.date.clone(),
            form.focus == Some(MatchField::Date),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Score like 6:4, 7:6 | Tab: next field | Enter: save | Esc: cancel",
            Style::default().fg(theme::MUTED),
        )),
    ];
    lines.extend(render_form_errors(&form.errors));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_login_form(frame: &mut Frame, app: &App) {
    let height = if app.login_form.error.is_some() { 8 } else { 7 };
    let popup_area = centered_rect_fixed(50, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Log In ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let form = &app.login_form;
    let masked = "\u{2022}".repeat(form.password.chars().count());
    let mut lines = vec![
        form_field_line(
            "Username",
            form.username.clone(),
            form.focus == LoginField::Username,
        ),
        form_field_line("Password", masked, form.focus == LoginField::Password),
        Line::from(""),
        Line::from(Span::styled(
            "Reads are public; writes need an account.",
            Style::default().fg(theme::MUTED),
        )),
        Line::from(Span::styled(
            "Tab: switch field | Enter: log in | Esc: cancel",
            Style::default().fg(theme::MUTED),
        )),
    ];
    if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(theme::FORM_ERROR),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm_popup(frame: &mut Frame, app: &App) {
    let prompt = match &app.pending_delete {
        Some(pending) => pending.prompt(),
        None => return,
    };
    let is_player = matches!(app.pending_delete, Some(PendingDelete::Player { .. }));

    let popup_area = centered_rect_fixed(56, 6, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Confirm ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let mut lines = vec![Line::from(prompt)];
    if is_player {
        lines.push(Line::from(Span::styled(
            "The server refuses while the player still has matches.",
            Style::default().fg(theme::MUTED),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y: delete | n/Esc: keep",
        Style::default().fg(theme::MUTED),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame) {
    let popup_area = centered_rect_fixed(52, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key = |k: &'static str| Span::styled(format!("{:<14}", k), Style::default().fg(Color::Cyan).bold());
    let help_lines = vec![
        Line::from(vec![key("j / Down"), Span::raw("Move down")]),
        Line::from(vec![key("k / Up"), Span::raw("Move up")]),
        Line::from(vec![key("Tab"), Span::raw("Next tab (Players/Matches/Leaderboard)")]),
        Line::from(vec![key("p"), Span::raw("Add a player")]),
        Line::from(vec![key("m"), Span::raw("Record a match")]),
        Line::from(vec![key("d"), Span::raw("Delete the selected row")]),
        Line::from(vec![key("l"), Span::raw("Log in")]),
        Line::from(vec![key("r"), Span::raw("Refresh from the server")]),
        Line::from(vec![key("?"), Span::raw("Show/hide this help")]),
        Line::from(vec![key("q / Ctrl-c"), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(theme::MUTED),
        )),
    ];

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % 10];

    let text = if app.data.players.is_empty() && app.data.matches.is_empty() {
        format!("{} Loading club data...", spinner)
    } else {
        format!("{} Refreshing...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(loading_text, inner);
}
