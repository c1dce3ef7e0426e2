use std::time::Instant;

use chrono::Local;

use crate::api::types::{MatchRecord, NewMatch, NewPlayer, Player, PlayerType};
use crate::config::Config;
use crate::credentials::Credentials;
use crate::fetch::ClubData;
use crate::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Players,
    Matches,
    Leaderboard,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Players => View::Matches,
            View::Matches => View::Leaderboard,
            View::Leaderboard => View::Players,
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Players => 0,
            View::Matches => 1,
            View::Leaderboard => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddPlayer,
    AddMatch,
    Login,
    ConfirmDelete,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Age,
    Kind,
}

#[derive(Debug, Clone)]
pub struct PlayerForm {
    pub name: String,
    pub age: String,
    pub kind: PlayerType,
    pub focus: PlayerField,
    pub errors: Vec<String>,
}

impl Default for PlayerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            kind: PlayerType::Amateur,
            focus: PlayerField::Name,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    PlayerA,
    PlayerB,
    Score,
    Date,
}

#[derive(Debug, Clone, Default)]
pub struct MatchForm {
    pub player_a: String,
    pub player_b: String,
    pub score: String,
    pub date: String,
    pub focus: Option<MatchField>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PendingDelete {
    Player { name: String },
    Match { id: u64, label: String },
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        match self {
            PendingDelete::Player { name } => format!("Delete player '{}'?", name),
            PendingDelete::Match { label, .. } => format!("Delete match {}?", label),
        }
    }
}

/// A write the TUI wants issued. The event loop owns the client and the
/// session, so the state object only queues the operation.
#[derive(Debug, Clone)]
pub enum WriteOp {
    AddPlayer(NewPlayer),
    AddMatch(NewMatch),
    DeletePlayer(String),
    DeleteMatch(u64),
}

impl WriteOp {
    pub fn success_message(&self) -> String {
        match self {
            WriteOp::AddPlayer(p) => format!("Added player: {}", p.name),
            WriteOp::AddMatch(m) => format!("Recorded: {} vs {} ({})", m.player_a, m.player_b, m.score),
            WriteOp::DeletePlayer(name) => format!("Deleted player: {}", name),
            WriteOp::DeleteMatch(id) => format!("Deleted match #{}", id),
        }
    }
}

/// The application-state object the whole TUI renders from and mutates.
pub struct App {
    pub data: ClubData,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub player_form: PlayerForm,
    pub match_form: MatchForm,
    pub login_form: LoginForm,
    pub pending_delete: Option<PendingDelete>,
    pub queued_write: Option<WriteOp>,
    /// A write parked while the login form collects credentials.
    pub deferred_write: Option<WriteOp>,
    pub queued_login: Option<Credentials>,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub needs_refresh: bool,
    pub should_quit: bool,
    pub config: Config,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub session_username: Option<String>,
}

impl App {
    /// Fresh App in loading state; data arrives from the background fetch.
    pub fn new_loading(config: Config, session_username: Option<String>) -> Self {
        Self {
            data: ClubData::default(),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Players,
            input_mode: InputMode::Normal,
            player_form: PlayerForm::default(),
            match_form: MatchForm::default(),
            login_form: LoginForm::default(),
            pending_delete: None,
            queued_write: None,
            deferred_write: None,
            queued_login: None,
            flash_message: None,
            last_refresh: Instant::now(),
            needs_refresh: false,
            should_quit: false,
            config,
            is_loading: true,
            spinner_frame: 0,
            session_username,
        }
    }

    pub fn current_len(&self) -> usize {
        match self.current_view {
            View::Players => self.data.players.len(),
            View::Matches => self.data.matches.len(),
            View::Leaderboard => self.data.leaderboard.len(),
        }
    }

    pub fn next_row(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_player(&self) -> Option<&Player> {
        if self.current_view != View::Players {
            return None;
        }
        self.table_state
            .selected()
            .and_then(|i| self.data.players.get(i))
    }

    pub fn selected_match(&self) -> Option<&MatchRecord> {
        if self.current_view != View::Matches {
            return None;
        }
        self.table_state
            .selected()
            .and_then(|i| self.data.matches.get(i))
    }

    /// Cycle Players -> Matches -> Leaderboard, resetting the selection.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        if self.current_len() == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn auto_refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.config.auto_refresh_interval)
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Replace the data lists with fresh fetch results, keeping the
    /// selection valid.
    pub fn update_data(&mut self, data: ClubData) {
        self.data = data;

        let len = self.current_len();
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected() {
            if selected >= len {
                self.table_state.select(Some(len - 1));
            }
        } else {
            self.table_state.select(Some(0));
        }

        self.last_refresh = Instant::now();
        self.show_flash(format!(
            "Refreshed ({} players, {} matches)",
            self.data.players.len(),
            self.data.matches.len()
        ));
    }

    // -- Add-player form --

    pub fn open_add_player(&mut self) {
        self.player_form = PlayerForm::default();
        self.input_mode = InputMode::AddPlayer;
    }

    pub fn player_form_next_field(&mut self) {
        self.player_form.focus = match self.player_form.focus {
            PlayerField::Name => PlayerField::Age,
            PlayerField::Age => PlayerField::Kind,
            PlayerField::Kind => PlayerField::Name,
        };
    }

    pub fn player_form_input(&mut self, c: char) {
        match self.player_form.focus {
            PlayerField::Name => self.player_form.name.push(c),
            PlayerField::Age => {
                if c.is_ascii_digit() && self.player_form.age.len() < 3 {
                    self.player_form.age.push(c);
                }
            }
            PlayerField::Kind => {} // Toggled, not typed.
        }
    }

    pub fn player_form_backspace(&mut self) {
        match self.player_form.focus {
            PlayerField::Name => {
                self.player_form.name.pop();
            }
            PlayerField::Age => {
                self.player_form.age.pop();
            }
            PlayerField::Kind => {}
        }
    }

    pub fn player_form_toggle_kind(&mut self) {
        if self.player_form.focus == PlayerField::Kind {
            self.player_form.kind = match self.player_form.kind {
                PlayerType::Amateur => PlayerType::Professional,
                PlayerType::Professional => PlayerType::Amateur,
            };
        }
    }

    /// Validate and queue the add-player request. Validation failures stay
    /// in the form; no network call happens for an invalid form.
    pub fn submit_player_form(&mut self) {
        let name = self.player_form.name.trim().to_string();
        let age: u32 = self.player_form.age.trim().parse().unwrap_or(0);

        match rules::validate_new_player(&name, age) {
            Ok(()) => {
                self.queue_write(WriteOp::AddPlayer(NewPlayer {
                    name,
                    age,
                    player_type: self.player_form.kind,
                }));
            }
            Err(errors) => {
                self.player_form.errors = errors;
            }
        }
    }

    pub fn cancel_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // -- Add-match form --

    pub fn open_add_match(&mut self) {
        self.match_form = MatchForm {
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            focus: Some(MatchField::PlayerA),
            ..MatchForm::default()
        };
        self.input_mode = InputMode::AddMatch;
    }

    pub fn match_form_next_field(&mut self) {
        self.match_form.focus = Some(match self.match_form.focus {
            Some(MatchField::PlayerA) => MatchField::PlayerB,
            Some(MatchField::PlayerB) => MatchField::Score,
            Some(MatchField::Score) => MatchField::Date,
            Some(MatchField::Date) | None => MatchField::PlayerA,
        });
    }

    pub fn match_form_input(&mut self, c: char) {
        let field = match self.match_form.focus {
            Some(f) => f,
            None => return,
        };
        match field {
            MatchField::PlayerA => self.match_form.player_a.push(c),
            MatchField::PlayerB => self.match_form.player_b.push(c),
            MatchField::Score => self.match_form.score.push(c),
            MatchField::Date => self.match_form.date.push(c),
        }
    }

    pub fn match_form_backspace(&mut self) {
        let field = match self.match_form.focus {
            Some(f) => f,
            None => return,
        };
        match field {
            MatchField::PlayerA => self.match_form.player_a.pop(),
            MatchField::PlayerB => self.match_form.player_b.pop(),
            MatchField::Score => self.match_form.score.pop(),
            MatchField::Date => self.match_form.date.pop(),
        };
    }

    /// Validate and queue the add-match request. The score validator runs
    /// here, before anything touches the network, and its exact rejection
    /// message lands in the form.
    pub fn submit_match_form(&mut self) {
        let form = &self.match_form;
        match rules::validate_new_match(&form.player_a, &form.player_b, &form.score, &form.date) {
            Ok(()) => {
                self.queue_write(WriteOp::AddMatch(NewMatch {
                    player_a: form.player_a.trim().to_string(),
                    player_b: form.player_b.trim().to_string(),
                    score: form.score.trim().to_string(),
                    date: form.date.trim().to_string(),
                }));
            }
            Err(errors) => {
                self.match_form.errors = errors;
            }
        }
    }

    // -- Deletes --

    /// Ask for confirmation before deleting whatever is selected.
    pub fn request_delete_selected(&mut self) {
        let pending = match self.current_view {
            View::Players => self.selected_player().map(|p| PendingDelete::Player {
                name: p.name.clone(),
            }),
            View::Matches => self.selected_match().map(|m| PendingDelete::Match {
                id: m.id,
                label: format!("#{} ({})", m.id, m.pairing()),
            }),
            View::Leaderboard => {
                self.show_flash("Delete from the Players or Matches tab.".to_string());
                None
            }
        };

        if let Some(pending) = pending {
            self.pending_delete = Some(pending);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            let op = match pending {
                PendingDelete::Player { name } => WriteOp::DeletePlayer(name),
                PendingDelete::Match { id, .. } => WriteOp::DeleteMatch(id),
            };
            self.queue_write(op);
        } else {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = InputMode::Normal;
    }

    // -- Login --

    pub fn open_login(&mut self) {
        self.login_form = LoginForm::default();
        if let Some(username) = self.session_username.clone().or_else(|| self.config.username.clone()) {
            self.login_form.username = username;
        }
        self.input_mode = InputMode::Login;
    }

    pub fn login_form_next_field(&mut self) {
        self.login_form.focus = match self.login_form.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn login_form_input(&mut self, c: char) {
        match self.login_form.focus {
            LoginField::Username => self.login_form.username.push(c),
            LoginField::Password => self.login_form.password.push(c),
        }
    }

    pub fn login_form_backspace(&mut self) {
        match self.login_form.focus {
            LoginField::Username => {
                self.login_form.username.pop();
            }
            LoginField::Password => {
                self.login_form.password.pop();
            }
        }
    }

    pub fn submit_login(&mut self) {
        let username = self.login_form.username.trim().to_string();
        let password = self.login_form.password.clone();
        if username.is_empty() || password.is_empty() {
            self.login_form.error = Some("Enter both username and password.".to_string());
            return;
        }
        self.queued_login = Some(Credentials::new(username, password));
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_login(&mut self) {
        self.deferred_write = None;
        self.input_mode = InputMode::Normal;
    }

    /// Queue a write for the event loop and leave whatever form queued it.
    fn queue_write(&mut self, op: WriteOp) {
        self.queued_write = Some(op);
        self.input_mode = InputMode::Normal;
    }

    // -- Help --

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::LeaderboardRow;
    use chrono::NaiveDate;

    fn app_with_data() -> App {
        let mut app = App::new_loading(Config::default(), None);
        app.update_data(ClubData {
            players: vec![
                Player {
                    id: Some(1),
                    name: "Ana".to_string(),
                    age: 30,
                    player_type: PlayerType::Amateur,
                },
                Player {
                    id: Some(2),
                    name: "Eva".to_string(),
                    age: 28,
                    player_type: PlayerType::Professional,
                },
            ],
            matches: vec![MatchRecord {
                id: 5,
                player_a_name: "Ana".to_string(),
                player_b_name: "Eva".to_string(),
                score: "6:4".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            }],
            leaderboard: vec![LeaderboardRow {
                name: "Ana".to_string(),
                matches: 1,
                wins: 1,
                losses: 0,
                win_rate_percent: 100.0,
            }],
        });
        app.is_loading = false;
        app
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app_with_data();
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[test]
    fn test_view_cycle_resets_selection() {
        let mut app = app_with_data();
        app.next_row();
        app.next_view();
        assert_eq!(app.current_view, View::Matches);
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_view();
        assert_eq!(app.current_view, View::Leaderboard);
        app.next_view();
        assert_eq!(app.current_view, View::Players);
    }

    #[test]
    fn test_update_data_clamps_selection() {
        let mut app = app_with_data();
        app.next_row(); // Index 1.
        app.update_data(ClubData {
            players: vec![Player {
                id: Some(1),
                name: "Ana".to_string(),
                age: 30,
                player_type: PlayerType::Amateur,
            }],
            ..ClubData::default()
        });
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_valid_player_form_queues_write() {
        let mut app = app_with_data();
        app.open_add_player();
        for c in "Nina".chars() {
            app.player_form_input(c);
        }
        app.player_form_next_field();
        app.player_form_input('2');
        app.player_form_input('5');
        app.submit_player_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        match app.queued_write {
            Some(WriteOp::AddPlayer(ref p)) => {
                assert_eq!(p.name, "Nina");
                assert_eq!(p.age, 25);
            }
            ref other => panic!("expected AddPlayer, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_player_form_stays_open_with_errors() {
        let mut app = app_with_data();
        app.open_add_player();
        app.player_form_input('9'); // Digits are rejected by the name rule...
        app.submit_player_form();

        assert_eq!(app.input_mode, InputMode::AddPlayer);
        assert!(app.queued_write.is_none());
        assert!(!app.player_form.errors.is_empty());
    }

    #[test]
    fn test_age_field_only_accepts_digits() {
        let mut app = app_with_data();
        app.open_add_player();
        app.player_form_next_field();
        app.player_form_input('x');
        app.player_form_input('3');
        app.player_form_input('0');
        assert_eq!(app.player_form.age, "30");
    }

    #[test]
    fn test_kind_toggles_only_when_focused() {
        let mut app = app_with_data();
        app.open_add_player();
        app.player_form_toggle_kind(); // Focus is on Name; no-op.
        assert_eq!(app.player_form.kind, PlayerType::Amateur);
        app.player_form_next_field();
        app.player_form_next_field();
        app.player_form_toggle_kind();
        assert_eq!(app.player_form.kind, PlayerType::Professional);
    }

    #[test]
    fn test_match_form_score_rejection_surfaces_reason() {
        let mut app = app_with_data();
        app.open_add_match();
        for c in "Nina".chars() {
            app.match_form_input(c);
        }
        app.match_form_next_field();
        for c in "Ola".chars() {
            app.match_form_input(c);
        }
        app.match_form_next_field();
        for c in "7:4".chars() {
            app.match_form_input(c);
        }
        app.submit_match_form();

        assert_eq!(app.input_mode, InputMode::AddMatch);
        assert!(app.queued_write.is_none());
        assert!(app.match_form.errors.iter().any(|e| e.contains("7:5 or 7:6")));
    }

    #[test]
    fn test_match_form_prefills_today() {
        let mut app = app_with_data();
        app.open_add_match();
        assert_eq!(app.match_form.date.len(), 10);
        assert!(app.match_form.date.contains('-'));
    }

    #[test]
    fn test_valid_match_form_queues_write() {
        let mut app = app_with_data();
        app.open_add_match();
        for c in "Nina".chars() {
            app.match_form_input(c);
        }
        app.match_form_next_field();
        for c in "Ola".chars() {
            app.match_form_input(c);
        }
        app.match_form_next_field();
        for c in "6:4, 7:6".chars() {
            app.match_form_input(c);
        }
        app.submit_match_form();

        match app.queued_write {
            Some(WriteOp::AddMatch(ref m)) => {
                assert_eq!(m.player_a, "Nina");
                assert_eq!(m.score, "6:4, 7:6");
            }
            ref other => panic!("expected AddMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_flow_asks_first() {
        let mut app = app_with_data();
        app.request_delete_selected();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert!(app.queued_write.is_none());

        app.confirm_delete();
        match app.queued_write {
            Some(WriteOp::DeletePlayer(ref name)) => assert_eq!(name, "Ana"),
            ref other => panic!("expected DeletePlayer, got {:?}", other),
        }
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_delete_can_be_cancelled() {
        let mut app = app_with_data();
        app.request_delete_selected();
        app.cancel_delete();
        assert!(app.queued_write.is_none());
        assert!(app.pending_delete.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_delete_from_leaderboard_is_refused() {
        let mut app = app_with_data();
        app.next_view();
        app.next_view();
        assert_eq!(app.current_view, View::Leaderboard);
        app.request_delete_selected();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut app = app_with_data();
        app.open_login();
        app.submit_login();
        assert!(app.queued_login.is_none());
        assert!(app.login_form.error.is_some());
    }

    #[test]
    fn test_login_queues_credentials() {
        let mut app = app_with_data();
        app.open_login();
        for c in "admin".chars() {
            app.login_form_input(c);
        }
        app.login_form_next_field();
        for c in "secret".chars() {
            app.login_form_input(c);
        }
        app.submit_login();

        let creds = app.queued_login.expect("credentials queued");
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_auto_refresh_interval_comes_from_config() {
        let mut config = Config::default();
        config.auto_refresh_interval = 60;
        let app = App::new_loading(config, None);
        assert_eq!(
            app.auto_refresh_interval(),
            std::time::Duration::from_secs(60)
        );
    }

    #[test]
    fn test_login_prefills_config_username() {
        let mut config = Config::default();
        config.username = Some("admin".to_string());
        let mut app = App::new_loading(config, None);
        app.open_login();
        assert_eq!(app.login_form.username, "admin");
    }
}
