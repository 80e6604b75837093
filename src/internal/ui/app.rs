#![allow(clippy::single_match)]
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use strum_macros::Display;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::api::ContentService;
use crate::config::AppConfig;
use crate::internal::chat::{BOT_REPLY_DELAY, ChatPanel};
use crate::internal::content::{HIGHLIGHT_DURATION, render_article};
use crate::internal::headings::extract_headings;
use crate::internal::models::{Category, ContentState, HeadingItem, HeadingsState, ThemeMode};
use crate::internal::navigation::NavGroup;
use crate::internal::notification::Notification;
use crate::internal::storage::LocalStorage;
use crate::tui::Tui;
use crate::utils::datetime;
use crate::utils::theme_loader::{ThemePalettes, TuiTheme};

/// Local storage key holding "light" or "dark".
pub const THEME_STORAGE_KEY: &str = "theme";

/// Rows moved by PageUp/PageDown in the content area.
const PAGE_SCROLL: usize = 10;

/// Which pane receives cursor keys.
#[derive(Debug, PartialEq, Clone, Copy, Display)]
pub enum Focus {
    Categories,
    Headings,
    Content,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Categories => Focus::Headings,
            Focus::Headings => Focus::Content,
            Focus::Content => Focus::Categories,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Categories => Focus::Content,
            Focus::Headings => Focus::Categories,
            Focus::Content => Focus::Headings,
        }
    }
}

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    DateInput,
    Chat,
}

/// One content fetch. `page` ties it to the page that issued it; `refresh_headings`
/// marks loads triggered by a category click, which also rebuild the headings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub id: u64,
    pub page: u64,
    pub category: String,
    pub heading: Option<String>,
    pub refresh_headings: bool,
}

/// Actions/messages sent through the app action channel.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ToggleTheme,
    ToggleHelp,
    ToggleChat,
    SubmitChat,
    BotReply { page: u64 },
    FocusNext,
    FocusPrev,
    NavigateUp,
    NavigateDown,
    PageUp,
    PageDown,
    Enter,
    SelectCategory(usize),
    SelectHeading(usize),
    Reload,
    ChangeDate(String),
    ShiftDate(i64),
    OpenInBrowser,
    ContentLoaded(LoadRequest, Result<Option<String>, String>),
    ClearHighlight { page: u64, token: u64 },
}

/// Content area state plus the scroll and highlight bookkeeping around it.
#[derive(Debug, Clone, Default)]
pub struct ContentPane {
    pub state: ContentState,
    pub scroll: usize,
    /// Element index to bring into view on the next draw.
    pub scroll_target: Option<usize>,
    /// Element index of the highlighted heading.
    pub highlight: Option<usize>,
    highlight_token: u64,
    request: Option<u64>,
}

impl ContentPane {
    fn begin(&mut self, request_id: u64) {
        self.state = ContentState::Loading;
        self.scroll = 0;
        self.scroll_target = None;
        self.highlight = None;
        self.request = Some(request_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadingsPane {
    pub state: HeadingsState,
    request: Option<u64>,
}

impl HeadingsPane {
    fn begin(&mut self, request_id: u64) {
        self.state = HeadingsState::Loading;
        self.request = Some(request_id);
    }

    pub fn nav(&self) -> Option<&NavGroup<HeadingItem>> {
        match &self.state {
            HeadingsState::Ready(nav) => Some(nav),
            _ => None,
        }
    }

    fn nav_mut(&mut self) -> Option<&mut NavGroup<HeadingItem>> {
        match &mut self.state {
            HeadingsState::Ready(nav) => Some(nav),
            _ => None,
        }
    }
}

/// Page controller: owns all page state and mediates navigation, content loading,
/// theme and chat.
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub content_service: Arc<ContentService>,
    pub storage: LocalStorage,
    pub theme_mode: ThemeMode,
    pub palettes: ThemePalettes,
    pub selected_date: String,
    pub date_input: String,
    pub categories: NavGroup<Category>,
    pub headings: HeadingsPane,
    pub content: ContentPane,
    pub chat: ChatPanel,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub notification: Option<Notification>,
    pub spinner_state: usize,
    last_spinner_update: Option<Instant>,
    page: u64,
    page_token: CancellationToken,
    next_request_id: u64,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    /// Build the app, opening the persisted local storage named by the config.
    pub fn with_config(config: AppConfig) -> Self {
        let storage = match &config.storage_file {
            Some(path) => LocalStorage::open(PathBuf::from(path)),
            None => LocalStorage::load_or_create(),
        };
        let storage = storage.unwrap_or_else(|e| {
            tracing::error!("Failed to open local storage, theme will not persist: {:#}", e);
            LocalStorage::in_memory()
        });
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: AppConfig, storage: LocalStorage) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let content_service = Arc::new(ContentService::new(&config.server));
        let palettes = ThemePalettes::resolve(config.theme_file.as_deref());
        let categories = NavGroup::new(config.categories.clone());
        let selected_date = datetime::today();

        tracing::info!(
            "App config: base_url='{}', categories={}, theme_file={:?}",
            content_service.base_url(),
            categories.len(),
            config.theme_file
        );

        Self {
            running: true,
            config,
            content_service,
            storage,
            theme_mode: ThemeMode::default(),
            palettes,
            selected_date,
            date_input: String::new(),
            categories,
            headings: HeadingsPane::default(),
            content: ContentPane::default(),
            chat: ChatPanel::new(),
            focus: Focus::Categories,
            input_mode: InputMode::Normal,
            show_help: false,
            notification: None,
            spinner_state: 0,
            last_spinner_update: None,
            page: 0,
            page_token: CancellationToken::new(),
            next_request_id: 0,
            action_tx,
            action_rx,
        }
    }

    /// Page load: apply the persisted theme and click the first category to establish
    /// the default view.
    pub fn start(&mut self) {
        self.initialize_theme();
        tracing::info!(date = %self.selected_date, page = self.page, "page.load");
        if !self.categories.is_empty() {
            let _ = self.action_tx.send(Action::SelectCategory(0));
        }
    }

    pub fn initialize_theme(&mut self) {
        self.theme_mode = ThemeMode::from_stored(self.storage.get_item(THEME_STORAGE_KEY));
    }

    pub fn toggle_theme(&mut self) {
        self.theme_mode = self.theme_mode.toggled();
        if let Err(e) = self
            .storage
            .set_item(THEME_STORAGE_KEY, self.theme_mode.as_ref())
        {
            tracing::error!("Failed to persist theme: {:#}", e);
            self.notify_error("Could not save theme preference");
        }
    }

    /// Palette for the current theme.
    pub fn theme(&self) -> &TuiTheme {
        self.palettes.for_mode(self.theme_mode)
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::info(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }

    pub fn is_loading(&self) -> bool {
        self.content.state == ContentState::Loading
            || self.headings.state == HeadingsState::Loading
    }

    pub fn get_spinner_char(&self) -> &'static str {
        const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER_FRAMES[self.spinner_state % SPINNER_FRAMES.len()]
    }

    pub async fn run(&mut self, mut tui: Tui) -> Result<()> {
        self.start();

        let mut event_interval = tokio::time::interval(Duration::from_millis(16));

        loop {
            self.tick();
            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                        && key.kind == KeyEventKind::Press
                    {
                        self.handle_key_event(key);
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                }
            }

            if !self.running {
                break;
            }
        }

        self.page_token.cancel();
        Ok(())
    }

    /// Advance the spinner and drop an expired notification.
    fn tick(&mut self) {
        let now = Instant::now();
        match self.last_spinner_update {
            Some(last) if now.duration_since(last) >= Duration::from_millis(100) => {
                self.spinner_state = self.spinner_state.wrapping_add(1);
                self.last_spinner_update = Some(now);
            }
            None => self.last_spinner_update = Some(now),
            _ => {}
        }

        if self.notification.as_ref().is_some_and(|n| n.is_expired()) {
            self.notification = None;
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            let _ = self.action_tx.send(Action::Quit);
            return;
        }

        match self.input_mode {
            InputMode::DateInput => self.handle_date_input(key),
            InputMode::Chat => self.handle_chat_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_date_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let value = std::mem::take(&mut self.date_input);
                let _ = self.action_tx.send(Action::ChangeDate(value));
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.date_input.clear();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) if (c.is_ascii_digit() || c == '-') && self.date_input.len() < 10 => {
                self.date_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_chat_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let _ = self.action_tx.send(Action::SubmitChat);
            }
            KeyCode::Esc => {
                let _ = self.action_tx.send(Action::ToggleChat);
            }
            KeyCode::Backspace => self.chat.pop_char(),
            KeyCode::Char(c) => self.chat.push_char(c),
            _ => {}
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => self.show_help = false,
                _ => {}
            }
            return;
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('c') => Some(Action::ToggleChat),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('o') => Some(Action::OpenInBrowser),
            KeyCode::Char('[') => Some(Action::ShiftDate(-1)),
            KeyCode::Char(']') => Some(Action::ShiftDate(1)),
            KeyCode::Char('d') => {
                self.date_input = self.selected_date.clone();
                self.input_mode = InputMode::DateInput;
                None
            }
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Enter => Some(Action::Enter),
            _ => None,
        };

        if let Some(action) = action {
            let _ = self.action_tx.send(action);
        }
    }

    #[tracing::instrument(skip(self, action))]
    pub async fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ToggleChat => {
                self.chat.toggle();
                self.input_mode = match self.chat.visible {
                    true => InputMode::Chat,
                    false => InputMode::Normal,
                };
            }
            Action::SubmitChat => {
                if self.chat.submit() {
                    self.spawn_delayed(BOT_REPLY_DELAY, Action::BotReply { page: self.page });
                }
            }
            Action::BotReply { page } => {
                // The reply lands even if the panel was closed in the meantime.
                if page == self.page {
                    self.chat.add_bot_reply();
                }
            }
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::NavigateUp => match self.focus {
                Focus::Categories => self.categories.select_prev(),
                Focus::Headings => {
                    if let Some(nav) = self.headings.nav_mut() {
                        nav.select_prev();
                    }
                }
                Focus::Content => self.content.scroll = self.content.scroll.saturating_sub(1),
            },
            Action::NavigateDown => match self.focus {
                Focus::Categories => self.categories.select_next(),
                Focus::Headings => {
                    if let Some(nav) = self.headings.nav_mut() {
                        nav.select_next();
                    }
                }
                Focus::Content => self.content.scroll = self.content.scroll.saturating_add(1),
            },
            Action::PageUp => {
                self.content.scroll = self.content.scroll.saturating_sub(PAGE_SCROLL);
            }
            Action::PageDown => {
                self.content.scroll = self.content.scroll.saturating_add(PAGE_SCROLL);
            }
            Action::Enter => match self.focus {
                Focus::Categories => {
                    if let Some(category) = self.categories.click_cursor().cloned() {
                        self.load_content(category.id, None, true);
                    }
                }
                Focus::Headings => {
                    let item = self
                        .headings
                        .nav_mut()
                        .and_then(|nav| nav.click_cursor().cloned());
                    if let Some(item) = item {
                        self.load_content(item.category, Some(item.text), false);
                    }
                }
                Focus::Content => {}
            },
            Action::SelectCategory(index) => self.select_category(index),
            Action::SelectHeading(index) => self.select_heading(index),
            Action::Reload => {
                if let Some(index) = self.categories.active() {
                    self.select_category(index);
                }
            }
            Action::ChangeDate(value) => match datetime::parse_date(&value) {
                Ok(_) => self.navigate(value.trim().to_string()),
                Err(e) => {
                    tracing::warn!("Rejected date selector value: {:#}", e);
                    self.notify_error(format!("{:#}", e));
                }
            },
            Action::ShiftDate(days) => match datetime::shift_date(&self.selected_date, days) {
                Ok(date) => self.navigate(date),
                Err(e) => self.notify_error(format!("{:#}", e)),
            },
            Action::OpenInBrowser => {
                let url = self.content_service.page_url(&self.selected_date);
                match open::that(&url) {
                    Ok(()) => self.notify_info(format!("Opened {}", url)),
                    Err(e) => {
                        tracing::error!("Failed to open {}: {}", url, e);
                        self.notify_error(format!("Could not open {}", url));
                    }
                }
            }
            Action::ContentLoaded(request, result) => self.apply_loaded(request, result),
            Action::ClearHighlight { page, token } => {
                if page == self.page && token == self.content.highlight_token {
                    self.content.highlight = None;
                }
            }
        }
    }

    fn select_category(&mut self, index: usize) {
        let Some(category) = self.categories.click(index).cloned() else {
            return;
        };
        self.load_content(category.id, None, true);
    }

    fn select_heading(&mut self, index: usize) {
        let Some(item) = self
            .headings
            .nav_mut()
            .and_then(|nav| nav.click(index).cloned())
        else {
            return;
        };
        self.load_content(item.category, Some(item.text), false);
    }

    /// Full navigation to `date`: every piece of page state is rebuilt and outstanding
    /// fetches and timers of the old page are cancelled.
    fn navigate(&mut self, date: String) {
        tracing::info!(from = %self.selected_date, to = %date, "navigate");
        self.page_token.cancel();
        self.page_token = CancellationToken::new();
        self.page += 1;

        self.selected_date = date;
        self.categories = NavGroup::new(self.config.categories.clone());
        self.headings = HeadingsPane::default();
        self.content = ContentPane::default();
        self.chat = ChatPanel::new();
        self.focus = Focus::Categories;
        self.input_mode = InputMode::Normal;
        self.show_help = false;

        self.start();
    }

    fn load_content(&mut self, category: String, heading: Option<String>, refresh_headings: bool) {
        self.next_request_id += 1;
        let request = LoadRequest {
            id: self.next_request_id,
            page: self.page,
            category,
            heading,
            refresh_headings,
        };
        tracing::debug!(?request, date = %self.selected_date, "content.load");

        self.content.begin(request.id);
        if refresh_headings {
            self.headings.begin(request.id);
        }

        let service = Arc::clone(&self.content_service);
        let tx = self.action_tx.clone();
        let token = self.page_token.clone();
        let date = self.selected_date.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = service.fetch_markdown(&request.category, &date) => result,
            };
            let _ = tx.send(Action::ContentLoaded(
                request,
                result.map_err(|e| format!("{:#}", e)),
            ));
        });
    }

    fn apply_loaded(&mut self, request: LoadRequest, result: Result<Option<String>, String>) {
        if request.page != self.page {
            tracing::debug!(id = request.id, "response for a previous page dropped");
            return;
        }
        if let Err(e) = &result {
            tracing::error!(
                category = %request.category,
                date = %self.selected_date,
                "Error fetching content: {}",
                e
            );
        }

        if request.refresh_headings && self.headings.request == Some(request.id) {
            self.headings.request = None;
            self.headings.state = match &result {
                Ok(Some(markdown)) => {
                    let items: Vec<HeadingItem> = extract_headings(markdown)
                        .into_iter()
                        .map(|text| HeadingItem {
                            category: request.category.clone(),
                            text,
                        })
                        .collect();
                    match items.is_empty() {
                        true => HeadingsState::NoHeadings,
                        false => HeadingsState::Ready(NavGroup::new(items)),
                    }
                }
                Ok(None) => HeadingsState::NoData,
                Err(_) => HeadingsState::Failed,
            };
        }

        if self.content.request != Some(request.id) {
            tracing::debug!(id = request.id, "stale content response dropped");
            return;
        }
        self.content.request = None;

        match result {
            Ok(Some(markdown)) => {
                let article = render_article(&request.category, &markdown);
                let target = request
                    .heading
                    .as_deref()
                    .and_then(|heading| article.find_heading(heading));
                self.content.state = ContentState::Loaded(article);
                if let Some(index) = target {
                    self.content.scroll_target = Some(index);
                    self.content.highlight = Some(index);
                    self.content.highlight_token += 1;
                    let clear = Action::ClearHighlight {
                        page: self.page,
                        token: self.content.highlight_token,
                    };
                    self.spawn_delayed(HIGHLIGHT_DURATION, clear);
                }
            }
            Ok(None) => self.content.state = ContentState::NoData,
            Err(_) => self.content.state = ContentState::Failed,
        }
    }

    /// One-shot timer bound to the current page.
    fn spawn_delayed(&self, delay: Duration, action: Action) {
        let tx = self.action_tx.clone();
        let token = self.page_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(action);
                }
            }
        });
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }
}
