use crate::{
    catalog::{self, Game},
    config::{self, AppConfig},
    fetch::{self, CatalogSource, FetchMessage, FileSource, HttpSource},
    opener::{LinkOpener, SystemOpener},
    theme::ThemeState,
    view::{self, DownloadLink, ViewAction},
};
use arboard::Clipboard;
use std::{
    collections::VecDeque,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc,
    },
    time::{Duration, Instant},
};

const LOG_CAPACITY: usize = 200;
const PAGE_STEP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Modal message the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Details overlay. Owns its own copy of the record so a refresh underneath
/// does not change what is shown.
///
/// `scroll` is the first visible row. The renderer clamps it to the content
/// and, when `follow_link` is set, moves it so the selected link is on screen.
#[derive(Debug, Clone)]
pub struct DetailsState {
    pub game: Game,
    pub links: Vec<DownloadLink>,
    pub selected_link: usize,
    pub scroll: usize,
    pub viewport: usize,
    pub follow_link: bool,
}

impl DetailsState {
    fn new(game: Game) -> Self {
        let links = view::download_links(&game);
        Self {
            game,
            links,
            selected_link: 0,
            scroll: 0,
            viewport: 0,
            follow_link: false,
        }
    }

    fn page(&self) -> usize {
        self.viewport.saturating_sub(1).max(1)
    }

    pub fn selected(&self) -> Option<&DownloadLink> {
        self.links.get(self.selected_link)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
}

pub struct App {
    pub theme: ThemeState,
    pub games: Vec<Game>,
    pub search: String,
    pub input_mode: InputMode,
    pub selected: usize,
    pub details: Option<DetailsState>,
    pub notices: VecDeque<Notice>,
    pub toast: Option<Toast>,
    pub status: String,
    pub logs: Vec<LogEntry>,
    pub should_quit: bool,
    source: Arc<dyn CatalogSource>,
    opener: Box<dyn LinkOpener>,
    clipboard: Option<Clipboard>,
    log_path: Option<PathBuf>,
    fetch_tx: Sender<FetchMessage>,
    fetch_rx: Receiver<FetchMessage>,
    fetch_active: bool,
    fetch_started_at: Option<Instant>,
    loaded_once: bool,
}

impl App {
    pub fn new(source: Arc<dyn CatalogSource>, opener: Box<dyn LinkOpener>) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        Self {
            theme: ThemeState::default(),
            games: Vec::new(),
            search: String::new(),
            input_mode: InputMode::Normal,
            selected: 0,
            details: None,
            notices: VecDeque::new(),
            toast: None,
            status: "Ready".to_string(),
            logs: Vec::new(),
            should_quit: false,
            source,
            opener,
            clipboard: None,
            log_path: None,
            fetch_tx,
            fetch_rx,
            fetch_active: false,
            fetch_started_at: None,
            loaded_once: false,
        }
    }

    pub fn initialize(options: &AppOptions) -> Self {
        let (config, warning) = AppConfig::load();
        let mut app = Self::from_config(config, options, Box::new(SystemOpener));
        app.log_path = config::log_path();
        if let Some(warning) = warning {
            app.report_config_problem(&warning);
        }
        app.log_info(format!("Catalog source: {}", app.source.describe()));
        app
    }

    fn from_config(
        mut config: AppConfig,
        options: &AppOptions,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        if let Some(url) = &options.url {
            config.catalog_url = url.clone();
        }
        let source = catalog_source(&config, options.file.as_deref());
        App::new(source, opener)
    }

    fn report_config_problem(&mut self, warning: &str) {
        self.log_warn(warning.to_string());
        self.push_notice(
            "Configuration Error",
            &format!("Using default settings.\n\n{warning}"),
        );
    }

    pub fn source_label(&self) -> String {
        self.source.describe()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_active
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded_once
    }

    pub fn loading_elapsed(&self) -> Option<Duration> {
        self.fetch_started_at.map(|started| started.elapsed())
    }

    /// Returns false when a fetch is already in flight.
    pub fn start_fetch(&mut self) -> bool {
        if self.fetch_active {
            self.status = "Catalog is already loading".to_string();
            return false;
        }
        self.fetch_active = true;
        self.fetch_started_at = Some(Instant::now());
        self.status = "Loading catalog...".to_string();
        self.log_info(format!("Fetch started: {}", self.source.describe()));
        fetch::spawn_fetch(Arc::clone(&self.source), self.fetch_tx.clone());
        true
    }

    pub fn poll_fetch(&mut self) {
        loop {
            match self.fetch_rx.try_recv() {
                Ok(message) => self.handle_fetch_message(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_fetch_message(&mut self, message: FetchMessage) {
        self.fetch_active = false;
        self.fetch_started_at = None;
        self.loaded_once = true;
        match message {
            FetchMessage::Completed(games) => {
                self.replace_games(games);
                self.status = format!("Loaded {} game(s)", self.games.len());
                self.log_info(format!("Fetch completed: {} game(s)", self.games.len()));
            }
            FetchMessage::Failed { error } => {
                self.replace_games(Vec::new());
                self.status = "Failed to load game data".to_string();
                self.log_error(format!("Fetch failed: {error}"));
                self.push_notice(
                    "Network Error",
                    &format!(
                        "Failed to load game data. Please check your internet connection.\n\nError: {error}"
                    ),
                );
            }
        }
    }

    pub fn replace_games(&mut self, mut games: Vec<Game>) {
        catalog::sort_games(&mut games);
        self.games = games;
        self.clamp_selection();
    }

    pub fn visible_games(&self) -> Vec<&Game> {
        catalog::filter_games(&self.games, &self.search)
    }

    /// Indices into `games` for the current filtered view.
    pub fn visible_indices(&self) -> Vec<usize> {
        catalog::filter_indices(&self.games, &self.search)
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_games().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.saturating_add(1);
        self.clamp_selection();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        self.selected = self.selected.saturating_add(PAGE_STEP);
        self.clamp_selection();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(PAGE_STEP);
    }

    pub fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
    }

    pub fn search_pop(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.clamp_selection();
    }

    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search.clear();
        self.selected = 0;
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
        self.log_info(format!("Theme: {}", self.theme.mode().label()));
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        match action {
            ViewAction::ShowDetails { index } => self.open_details(index),
            ViewAction::OpenLink { url } => self.open_link(&url),
        }
    }

    pub fn open_selected_details(&mut self) {
        let Some(index) = self.visible_indices().get(self.selected).copied() else {
            return;
        };
        let palette = self.theme.palette();
        let action = view::card_view(index, &self.games[index], &palette).action;
        self.dispatch(action);
    }

    fn open_details(&mut self, index: usize) {
        if let Some(game) = self.games.get(index) {
            self.details = Some(DetailsState::new(game.clone()));
        }
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    pub fn details_next_link(&mut self) {
        if let Some(details) = &mut self.details {
            if details.selected_link + 1 < details.links.len() {
                details.selected_link += 1;
            }
            details.follow_link = true;
        }
    }

    pub fn details_prev_link(&mut self) {
        if let Some(details) = &mut self.details {
            details.selected_link = details.selected_link.saturating_sub(1);
            details.follow_link = true;
        }
    }

    pub fn details_page_down(&mut self) {
        if let Some(details) = &mut self.details {
            details.scroll = details.scroll.saturating_add(details.page());
            details.follow_link = false;
        }
    }

    pub fn details_page_up(&mut self) {
        if let Some(details) = &mut self.details {
            details.scroll = details.scroll.saturating_sub(details.page());
            details.follow_link = false;
        }
    }

    pub fn details_scroll_top(&mut self) {
        if let Some(details) = &mut self.details {
            details.scroll = 0;
            details.follow_link = false;
        }
    }

    /// Overshoots on purpose; the next render clamps to the last page.
    pub fn details_scroll_bottom(&mut self) {
        if let Some(details) = &mut self.details {
            details.scroll = usize::MAX;
            details.follow_link = false;
        }
    }

    pub fn activate_link(&mut self) {
        let action = self
            .details
            .as_ref()
            .and_then(|details| details.selected())
            .map(DownloadLink::action);
        if let Some(action) = action {
            self.dispatch(action);
        }
    }

    fn open_link(&mut self, url: &str) {
        match self.opener.open(url) {
            Ok(()) => {
                self.status = format!("Opened {url}");
                self.log_info(format!("Opened link: {url}"));
            }
            Err(err) => {
                self.status = "Failed to open link".to_string();
                self.log_warn(format!("Failed to open {url}: {err}"));
                self.push_notice("Error", &format!("Could not open the link. Error: {err}"));
            }
        }
    }

    pub fn copy_link(&mut self) {
        let Some(url) = self
            .details
            .as_ref()
            .and_then(|details| details.selected())
            .map(|link| link.url.clone())
        else {
            return;
        };
        if self.copy_to_clipboard(&url) {
            self.set_toast("Link copied", ToastLevel::Info, Duration::from_secs(2));
        } else {
            self.set_toast("Copy failed", ToastLevel::Error, Duration::from_secs(2));
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) -> bool {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(err) => {
                    self.status = format!("Clipboard unavailable: {err}");
                    self.log_warn(format!("Clipboard unavailable: {err}"));
                    return false;
                }
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return false;
        };
        if let Err(err) = clipboard.set_text(text.to_string()) {
            self.status = format!("Clipboard copy failed: {err}");
            self.log_warn(format!("Clipboard copy failed: {err}"));
            return false;
        }
        true
    }

    pub fn push_notice(&mut self, title: &str, message: &str) {
        self.notices.push_back(Notice {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn set_toast(&mut self, message: &str, level: ToastLevel, duration: Duration) {
        self.toast = Some(Toast {
            message: message.to_string(),
            level,
            expires_at: Instant::now() + duration,
        });
    }

    pub fn tick(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.expires_at <= Instant::now() {
                self.toast = None;
            }
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.current_notice().is_some() {
            return "Enter/Esc dismiss";
        }
        if self.details.is_some() {
            return "↑/↓ link | PgUp/PgDn scroll | Enter open | y copy | Esc close";
        }
        match self.input_mode {
            InputMode::Search => "Type to filter | Enter keep | Esc clear",
            InputMode::Normal => "/ search | Enter details | t theme | r refresh | q quit",
        }
    }

    pub fn log_info(&mut self, message: String) {
        self.push_log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: String) {
        self.push_log(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: String) {
        self.push_log(LogLevel::Error, message);
    }

    fn push_log(&mut self, level: LogLevel, message: String) {
        if let Some(path) = &self.log_path {
            let _ = append_log_file(path, level, &message);
        }
        self.logs.push(LogEntry { level, message });
        if self.logs.len() > LOG_CAPACITY {
            let overflow = self.logs.len() - LOG_CAPACITY;
            self.logs.drain(0..overflow);
        }
    }
}

pub fn catalog_source(config: &AppConfig, file: Option<&Path>) -> Arc<dyn CatalogSource> {
    match file {
        Some(path) => Arc::new(FileSource::new(path)),
        None => Arc::new(HttpSource::new(config)),
    }
}

pub fn log_level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn append_log_file(path: &Path, level: LogLevel, message: &str) -> std::io::Result<()> {
    let label = log_level_label(level);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "[{label}] {message}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use anyhow::Result;
    use std::{
        cell::RefCell,
        io,
        rc::Rc,
        sync::Mutex,
    };

    pub(crate) struct StaticSource {
        result: Mutex<Option<Result<Vec<Game>, FetchError>>>,
        delay: Duration,
    }

    impl StaticSource {
        pub(crate) fn ok(games: Vec<Game>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Ok(games))),
                delay: Duration::ZERO,
            })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Err(FetchError::Read(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))))),
                delay: Duration::ZERO,
            })
        }

        fn slow(games: Vec<Game>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Ok(games))),
                delay: Duration::from_millis(200),
            })
        }
    }

    impl CatalogSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        fn load(&self) -> Result<Vec<Game>, FetchError> {
            std::thread::sleep(self.delay);
            let mut slot = self.result.lock().unwrap();
            match slot.take() {
                Some(Ok(games)) => {
                    *slot = Some(Ok(games.clone()));
                    Ok(games)
                }
                Some(Err(err)) => Err(err),
                None => Ok(Vec::new()),
            }
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct RecordingOpener {
        pub(crate) opened: Rc<RefCell<Vec<String>>>,
        pub(crate) fail: bool,
    }

    impl LinkOpener for RecordingOpener {
        fn open(&self, target: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no handler for {target}");
            }
            self.opened.borrow_mut().push(target.to_string());
            Ok(())
        }
    }

    pub(crate) fn game(name: &str) -> Game {
        Game {
            name: name.to_string(),
            ..Game::default()
        }
    }

    pub(crate) fn app_with(source: Arc<dyn CatalogSource>, opener: RecordingOpener) -> App {
        App::new(source, Box::new(opener))
    }

    pub(crate) fn wait_for_fetch(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_loading() && Instant::now() < deadline {
            app.poll_fetch();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.is_loading(), "fetch did not finish");
    }

    fn linked(name: &str) -> Game {
        let mut entry = game(name);
        entry.dotnet = Some("4.8".to_string());
        entry.downloads = Some(crate::catalog::DownloadLinks {
            directx: Some("https://example.com/dx".to_string()),
            vc_redist: None,
            dotnet: Some("https://example.com/net".to_string()),
        });
        entry
    }

    fn visible_names(app: &App) -> Vec<String> {
        app.visible_games().iter().map(|game| game.name.clone()).collect()
    }

    #[test]
    fn bad_config_degrades_to_defaults_with_notice() {
        let options = AppOptions {
            url: None,
            file: Some(PathBuf::from("/nonexistent/games.json")),
        };
        let mut app = App::from_config(
            AppConfig::default(),
            &options,
            Box::new(RecordingOpener::default()),
        );
        app.report_config_problem("Ignoring config.json: parse app config");
        assert_eq!(app.source_label(), "/nonexistent/games.json");
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.current_notice().unwrap().title, "Configuration Error");
        assert!(app
            .logs
            .iter()
            .any(|entry| entry.level == LogLevel::Warn && entry.message.contains("parse app config")));
    }

    #[test]
    fn url_override_replaces_configured_catalog() {
        let options = AppOptions {
            url: Some("http://localhost/games.json".to_string()),
            file: None,
        };
        let app = App::from_config(
            AppConfig::default(),
            &options,
            Box::new(RecordingOpener::default()),
        );
        assert_eq!(app.source_label(), "http://localhost/games.json");
    }

    #[test]
    fn fetch_sorts_and_replaces_catalog() {
        let source = StaticSource::ok(vec![game("Witcher 3"), game("alan wake"), game("Bioshock")]);
        let mut app = app_with(source, RecordingOpener::default());
        app.games = vec![game("Stale")];
        assert!(app.start_fetch());
        wait_for_fetch(&mut app);
        assert_eq!(visible_names(&app), vec!["alan wake", "Bioshock", "Witcher 3"]);
        assert!(app.notices.is_empty());
        assert!(app.has_loaded());
    }

    #[test]
    fn fetch_failure_yields_empty_list_and_one_notice() {
        let mut app = app_with(StaticSource::failing(), RecordingOpener::default());
        app.games = vec![game("Stale")];
        app.start_fetch();
        wait_for_fetch(&mut app);
        assert!(app.games.is_empty());
        assert!(app.visible_games().is_empty());
        assert_eq!(app.notices.len(), 1);
        let notice = app.current_notice().unwrap();
        assert_eq!(notice.title, "Network Error");
        assert!(notice.message.contains("connection refused"));
        assert!(app
            .logs
            .iter()
            .any(|entry| entry.level == LogLevel::Error));
    }

    #[test]
    fn second_fetch_is_rejected_while_one_is_outstanding() {
        let mut app = app_with(StaticSource::slow(vec![game("Halo")]), RecordingOpener::default());
        assert!(app.start_fetch());
        assert!(!app.start_fetch());
        assert_eq!(app.status, "Catalog is already loading");
        wait_for_fetch(&mut app);
        assert_eq!(app.games.len(), 1);
        assert!(app.start_fetch());
        wait_for_fetch(&mut app);
        assert_eq!(app.games.len(), 1);
    }

    #[test]
    fn search_narrows_view_and_resets_selection() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![game("Dark Souls"), game("Halo"), game("Darksiders")]);
        app.selected = 2;
        app.begin_search();
        for c in "dark".chars() {
            app.search_push(c);
        }
        assert_eq!(app.selected, 0);
        assert_eq!(visible_names(&app), vec!["Dark Souls", "Darksiders"]);
        app.search_pop();
        app.finish_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search, "dar");
        app.cancel_search();
        assert_eq!(visible_names(&app).len(), 3);
    }

    #[test]
    fn visible_indices_point_into_snapshot() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![game("Alpha"), game("Beta"), game("Alphabet")]);
        app.search = "alpha".to_string();
        assert_eq!(app.visible_indices(), vec![0, 1]);
        app.search = "bet".to_string();
        assert_eq!(app.visible_indices(), vec![1, 2]);
    }

    #[test]
    fn selection_is_clamped_to_view() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![game("A"), game("B"), game("C")]);
        app.page_down();
        assert_eq!(app.selected, 2);
        app.select_next();
        assert_eq!(app.selected, 2);
        app.page_up();
        assert_eq!(app.selected, 0);
        app.select_prev();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn details_open_for_selected_record() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![linked("Bioshock"), game("Alan Wake")]);
        app.search = "bio".to_string();
        app.open_selected_details();
        let details = app.details.as_ref().unwrap();
        assert_eq!(details.game.name, "Bioshock");
        assert_eq!(details.links.len(), 2);
    }

    #[test]
    fn details_survive_catalog_replacement() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![linked("Bioshock")]);
        app.open_selected_details();
        app.replace_games(Vec::new());
        assert_eq!(app.details.as_ref().unwrap().game.name, "Bioshock");
        app.close_details();
        assert!(app.details.is_none());
    }

    #[test]
    fn details_paging_moves_scroll_and_drops_follow() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.replace_games(vec![linked("Bioshock")]);
        app.open_selected_details();
        if let Some(details) = app.details.as_mut() {
            details.viewport = 10;
        }
        app.details_page_down();
        app.details_page_down();
        assert_eq!(app.details.as_ref().unwrap().scroll, 18);
        app.details_page_up();
        assert_eq!(app.details.as_ref().unwrap().scroll, 9);
        app.details_next_link();
        assert!(app.details.as_ref().unwrap().follow_link);
        app.details_scroll_top();
        let details = app.details.as_ref().unwrap();
        assert_eq!(details.scroll, 0);
        assert!(!details.follow_link);
    }

    #[test]
    fn open_details_on_empty_view_is_noop() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.open_selected_details();
        assert!(app.details.is_none());
    }

    #[test]
    fn activating_link_opens_selected_url() {
        let opener = RecordingOpener::default();
        let opened = Rc::clone(&opener.opened);
        let mut app = app_with(StaticSource::ok(Vec::new()), opener);
        app.replace_games(vec![linked("Bioshock")]);
        app.open_selected_details();
        app.details_next_link();
        app.details_next_link();
        app.activate_link();
        app.details_prev_link();
        app.activate_link();
        assert_eq!(
            *opened.borrow(),
            vec!["https://example.com/net", "https://example.com/dx"]
        );
        assert!(app.notices.is_empty());
    }

    #[test]
    fn link_failure_reports_one_notice() {
        let opener = RecordingOpener {
            fail: true,
            ..RecordingOpener::default()
        };
        let mut app = app_with(StaticSource::ok(Vec::new()), opener);
        app.replace_games(vec![linked("Bioshock")]);
        app.open_selected_details();
        app.activate_link();
        assert_eq!(app.notices.len(), 1);
        assert!(app
            .current_notice()
            .unwrap()
            .message
            .starts_with("Could not open the link. Error:"));
        assert!(app.details.is_some());
        assert_eq!(app.games.len(), 1);
        app.dismiss_notice();
        assert!(app.notices.is_empty());
    }

    #[test]
    fn theme_toggle_round_trips() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        let before = app.theme.palette();
        app.toggle_theme();
        assert_eq!(app.theme.mode(), crate::theme::ThemeMode::Light);
        app.toggle_theme();
        assert_eq!(app.theme.palette(), before);
    }

    #[test]
    fn log_ring_is_bounded() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        for index in 0..(LOG_CAPACITY + 25) {
            app.log_info(format!("entry {index}"));
        }
        assert_eq!(app.logs.len(), LOG_CAPACITY);
        assert_eq!(app.logs[0].message, "entry 25");
    }

    #[test]
    fn expired_toast_is_cleared() {
        let mut app = app_with(StaticSource::ok(Vec::new()), RecordingOpener::default());
        app.set_toast("hello", ToastLevel::Info, Duration::ZERO);
        app.tick();
        assert!(app.toast.is_none());
    }
}
