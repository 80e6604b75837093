use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use super::navigation::NavGroup;

/// Page colour scheme. Persisted in local storage as "light" / "dark".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Icon and label shown by the theme toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeIndicator {
    pub icon: &'static str,
    pub label: &'static str,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parse a persisted value. Anything other than "dark" reads as light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::parse::<ThemeMode>) {
            Some(Ok(mode)) => mode,
            _ => Self::Light,
        }
    }

    pub fn indicator(self) -> ThemeIndicator {
        match self {
            Self::Dark => ThemeIndicator {
                icon: "🌙",
                label: "Dark mode",
            },
            Self::Light => ThemeIndicator {
                icon: "☀",
                label: "Light mode",
            },
        }
    }
}

/// A digest source, addressed on the server by its `app_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl Category {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Sender {
    #[strum(serialize = "You")]
    User,
    #[strum(serialize = "Bot")]
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArticleElement {
    Paragraph(String),
    Heading(usize, String), // level, text
    CodeBlock { lang: Option<String>, code: String },
    List(Vec<String>),
    Table(Vec<Vec<String>>), // rows -> cols
    Image(String),           // alt text or src
    Quote(String),
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub elements: Vec<ArticleElement>,
}

/// What the content area currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContentState {
    #[default]
    Empty,
    Loading,
    Loaded(Article),
    NoData,
    Failed,
}

/// One entry of the headings panel; clicking it reloads `category` and jumps to `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingItem {
    pub category: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HeadingsState {
    #[default]
    Empty,
    Loading,
    Ready(NavGroup<HeadingItem>),
    NoHeadings,
    NoData,
    Failed,
}
