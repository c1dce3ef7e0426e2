pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::api::{ApiClient, AuthError};
use crate::tui::app::{InputMode, PlayerField, WriteOp};

pub async fn run_tui(mut app: App, mut client: ApiClient) -> anyhow::Result<()> {
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    // Create event handler with tick rate and auto-refresh interval
    let mut events = EventHandler::new(Duration::from_millis(250), app.auto_refresh_interval());

    // Spawn initial fetch as background task. No verbose logging inside the
    // TUI; stderr output would corrupt the display.
    let client_clone = client.clone();
    let mut pending_fetch: Option<tokio::task::JoinHandle<_>> = Some(tokio::spawn(async move {
        tokio::time::timeout(
            Duration::from_secs(20),
            async move { crate::fetch::fetch_club_data(&client_clone, false).await },
        )
        .await
    }));
    app.is_loading = true;

    // At most one write in flight; the op rides along for the flash message.
    let mut pending_write: Option<(WriteOp, tokio::task::JoinHandle<anyhow::Result<()>>)> = None;

    // Main loop
    loop {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Handle events
        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::AutoRefresh => {
                app.needs_refresh = true;
            }
        }

        // Apply a login submitted from the form
        if let Some(credentials) = app.queued_login.take() {
            app.session_username = Some(credentials.username.clone());
            app.show_flash(format!("Logged in as {}", credentials.username));
            client.set_credentials(credentials);

            // Resume the write that the login interrupted
            if let Some(op) = app.deferred_write.take() {
                app.queued_write = Some(op);
            }
        }

        // Start a queued write, collecting credentials first if needed
        if app.queued_write.is_some() && pending_write.is_none() {
            if client.has_credentials() {
                let op = app.queued_write.take().unwrap();
                let client_clone = client.clone();
                let op_clone = op.clone();
                let handle = tokio::spawn(async move {
                    match op_clone {
                        WriteOp::AddPlayer(player) => {
                            client_clone.add_player(&player).await.map(|_| ())
                        }
                        WriteOp::AddMatch(new_match) => {
                            client_clone.add_match(&new_match).await.map(|_| ())
                        }
                        WriteOp::DeletePlayer(name) => client_clone.delete_player(&name).await,
                        WriteOp::DeleteMatch(id) => client_clone.delete_match(id).await,
                    }
                });
                pending_write = Some((op, handle));
            } else {
                app.deferred_write = app.queued_write.take();
                app.open_login();
            }
        }

        // Collect a finished write
        if let Some((_, handle)) = &mut pending_write {
            if handle.is_finished() {
                let (op, handle) = pending_write.take().unwrap();
                match handle.await {
                    Ok(Ok(())) => {
                        app.show_flash(op.success_message());
                        app.needs_refresh = true;
                    }
                    Ok(Err(e)) => {
                        if e.downcast_ref::<AuthError>().is_some() {
                            // Stale session: park the write and collect a new one
                            app.session_username = None;
                            app.deferred_write = Some(op);
                            app.open_login();
                            app.login_form.error = Some(e.to_string());
                        } else {
                            app.show_flash(format!("Failed: {}", e));
                        }
                    }
                    Err(e) => {
                        app.show_flash(format!("Failed: write task panicked: {}", e));
                    }
                }
            }
        }

        // Check if background fetch has completed
        if let Some(handle) = &mut pending_fetch {
            if handle.is_finished() {
                let handle = pending_fetch.take().unwrap();
                match handle.await {
                    Ok(Ok(Ok(data))) => {
                        app.update_data(data);
                    }
                    Ok(Ok(Err(e))) => {
                        if e.downcast_ref::<AuthError>().is_some() {
                            // Reads are public; a 401 here means the server is
                            // locked down. Restore the terminal, re-prompt, re-init.
                            ratatui::restore();

                            let previous = app
                                .session_username
                                .clone()
                                .unwrap_or_else(|| "(anonymous)".to_string());
                            match crate::credentials::reprompt_for_credentials(&previous) {
                                Ok(new_credentials) => {
                                    app.session_username =
                                        Some(new_credentials.username.clone());
                                    client.set_credentials(new_credentials);

                                    terminal = ratatui::init();
                                    app.needs_refresh = true;
                                    app.show_flash("Logged in. Refreshing...".to_string());
                                }
                                Err(pe) => {
                                    // User cancelled or error during prompt
                                    terminal = ratatui::init();
                                    app.show_flash(format!("Login cancelled: {}", pe));
                                }
                            }
                        } else {
                            app.show_flash(format!("Refresh failed: {}", e));
                        }
                    }
                    Ok(Err(_elapsed)) => {
                        // Timeout: fetch took longer than 20 seconds
                        app.show_flash(
                            "Refresh timed out (20s). Will retry on next refresh.".to_string(),
                        );
                    }
                    Err(e) => {
                        app.show_flash(format!("Refresh task panicked: {}", e));
                    }
                }
                app.is_loading = false;
            }
        }

        // Spawn a new refresh if needed and no fetch is pending. While a form
        // is open, needs_refresh stays set and refresh waits for Normal mode.
        if app.needs_refresh && pending_fetch.is_none() && app.input_mode == InputMode::Normal {
            app.needs_refresh = false;

            let client_clone = client.clone();
            pending_fetch = Some(tokio::spawn(async move {
                tokio::time::timeout(
                    Duration::from_secs(20),
                    async move { crate::fetch::fetch_club_data(&client_clone, false).await },
                )
                .await
            }));
            app.is_loading = true;
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    ratatui::restore();

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Tab switching
                KeyCode::Tab => app.next_view(),

                // Forms
                KeyCode::Char('p') => app.open_add_player(),
                KeyCode::Char('m') => app.open_add_match(),

                // Delete selected row (asks for confirmation)
                KeyCode::Char('d') => app.request_delete_selected(),

                // Login
                KeyCode::Char('l') => app.open_login(),

                // Refresh
                KeyCode::Char('r') => {
                    app.needs_refresh = true;
                    app.show_flash("Refreshing...".to_string());
                }

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        InputMode::AddPlayer => match key.code {
            KeyCode::Enter => app.submit_player_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Tab | KeyCode::Down => app.player_form_next_field(),
            KeyCode::Backspace => app.player_form_backspace(),
            // Space toggles the type selector when it has focus
            KeyCode::Char(' ') if app.player_form.focus == PlayerField::Kind => {
                app.player_form_toggle_kind()
            }
            KeyCode::Char(c) => app.player_form_input(c),
            _ => {}
        },
        InputMode::AddMatch => match key.code {
            KeyCode::Enter => app.submit_match_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Tab | KeyCode::Down => app.match_form_next_field(),
            KeyCode::Backspace => app.match_form_backspace(),
            KeyCode::Char(c) => app.match_form_input(c),
            _ => {}
        },
        InputMode::Login => match key.code {
            KeyCode::Enter => app.submit_login(),
            KeyCode::Esc => app.cancel_login(),
            KeyCode::Tab | KeyCode::Down => app.login_form_next_field(),
            KeyCode::Backspace => app.login_form_backspace(),
            KeyCode::Char(c) => app.login_form_input(c),
            _ => {}
        },
        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
