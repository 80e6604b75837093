#![allow(clippy::single_match)]
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Focus, InputMode};
use crate::internal::models::{
    Article, ArticleElement, ContentState, HeadingsState, Sender, ThemeMode,
};
use crate::internal::notification::NotificationKind;
use crate::utils::highlight::highlight_code;
use crate::utils::theme_loader::TuiTheme;

pub const NO_DATA_MESSAGE: &str = "No data is available for this date.";
pub const LOAD_ERROR_MESSAGE: &str = "An error occurred while loading the content.";
const NO_HEADINGS_MESSAGE: &str = "No headings";
const HEADINGS_NO_DATA_MESSAGE: &str = "No data";
const HEADINGS_ERROR_MESSAGE: &str = "An error occurred";
const EMPTY_CONTENT_MESSAGE: &str = "Select a category to start reading.";

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    let start = std::time::Instant::now();
    let theme = app.theme().clone();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_top_bar(app, &theme, f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.config.ui.sidebar_width),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(app.categories.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(body[0]);

    render_categories(app, &theme, f, sidebar[0]);
    render_headings(app, &theme, f, sidebar[1]);
    render_content(app, &theme, f, body[1]);
    render_status_bar(app, &theme, f, chunks[2]);

    if app.chat.visible {
        render_chat(app, &theme, f, chunks[1]);
    }

    if app.show_help {
        render_help_overlay(&theme, f);
    }

    tracing::trace!(elapsed = ?start.elapsed(), "render.draw");
}

fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &TuiTheme) -> Block<'a> {
    let border = match focused {
        true => theme.accent,
        false => theme.border,
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .title_style(Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background))
}

fn render_top_bar(app: &App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(16)])
        .split(area);

    let date = match app.input_mode {
        InputMode::DateInput => Span::styled(
            format!("{}█", app.date_input),
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg),
        ),
        _ => Span::styled(
            app.selected_date.clone(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
    };

    let left = Line::from(vec![
        Span::styled(
            " Nook ",
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ Date: ", Style::default().fg(theme.muted)),
        date,
    ]);
    f.render_widget(Paragraph::new(left), chunks[0]);

    let indicator = app.theme_mode.indicator();
    let right = Paragraph::new(format!("{} {} ", indicator.icon, indicator.label))
        .alignment(Alignment::Right)
        .style(Style::default().fg(theme.foreground));
    f.render_widget(right, chunks[1]);
}

fn render_categories(app: &App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Categories && app.input_mode == InputMode::Normal;

    let items: Vec<ListItem> = app
        .categories
        .items()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let active = app.categories.is_active(i);
            let (marker, style) = match active {
                true => (
                    "▶ ",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                false => ("  ", Style::default().fg(theme.foreground)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(category.label.clone(), style),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if focused {
        state.select(app.categories.cursor());
    }

    let list = List::new(items)
        .block(pane_block(" Categories ", focused, theme))
        .highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn render_headings(app: &App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Headings && app.input_mode == InputMode::Normal;
    let block = pane_block(" Headings ", focused, theme);

    let message = match &app.headings.state {
        HeadingsState::Ready(nav) => {
            let items: Vec<ListItem> = nav
                .items()
                .iter()
                .enumerate()
                .map(|(i, heading)| {
                    let style = match nav.is_active(i) {
                        true => Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                        false => Style::default().fg(theme.foreground),
                    };
                    ListItem::new(Span::styled(heading.text.clone(), style))
                })
                .collect();

            let mut state = ListState::default();
            if focused {
                state.select(nav.cursor());
            }
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(theme.selection_bg)
                    .fg(theme.selection_fg),
            );
            f.render_stateful_widget(list, area, &mut state);
            return;
        }
        HeadingsState::Empty => Line::from(""),
        HeadingsState::Loading => Line::styled(
            format!("{} Loading...", app.get_spinner_char()),
            Style::default().fg(theme.muted),
        ),
        HeadingsState::NoHeadings => {
            Line::styled(NO_HEADINGS_MESSAGE, Style::default().fg(theme.muted))
        }
        HeadingsState::NoData => {
            Line::styled(HEADINGS_NO_DATA_MESSAGE, Style::default().fg(theme.muted))
        }
        HeadingsState::Failed => {
            Line::styled(HEADINGS_ERROR_MESSAGE, Style::default().fg(theme.error))
        }
    };

    f.render_widget(Paragraph::new(message).block(block), area);
}

fn render_content(app: &mut App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Content && app.input_mode == InputMode::Normal;

    let title = match &app.content.state {
        ContentState::Loaded(article) => article.title.clone(),
        _ => app
            .categories
            .active_item()
            .map(|c| c.label.clone())
            .unwrap_or_else(|| "Nook".to_string()),
    };
    let block = pane_block(format!(" {} ", title), focused, theme)
        .title(Line::from(" [c] Chat ").right_aligned());
    let inner = block.inner(area);
    let width = inner.width.max(20) as usize;

    let lines = match &app.content.state {
        ContentState::Empty => vec![Line::styled(
            EMPTY_CONTENT_MESSAGE,
            Style::default().fg(theme.muted),
        )],
        ContentState::Loading => vec![Line::styled(
            format!("{} Loading...", app.get_spinner_char()),
            Style::default().fg(theme.muted),
        )],
        ContentState::NoData => vec![Line::styled(
            NO_DATA_MESSAGE,
            Style::default().fg(theme.accent),
        )],
        ContentState::Failed => vec![Line::styled(
            LOAD_ERROR_MESSAGE,
            Style::default().fg(theme.error),
        )],
        ContentState::Loaded(article) => {
            let (lines, anchors) =
                article_lines(article, width, theme, app.theme_mode, app.content.highlight);
            if let Some(row) = app
                .content
                .scroll_target
                .take()
                .and_then(|index| anchors.get(index).copied())
            {
                app.content.scroll = row;
            }
            lines
        }
    };

    app.content.scroll = app.content.scroll.min(lines.len().saturating_sub(1));

    let p = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(theme.foreground).bg(theme.background))
        .scroll((app.content.scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(p, area);
}

/// Lay out `article` at `width` columns. Returns the lines and, for each element, the
/// row it starts on.
pub fn article_lines(
    article: &Article,
    width: usize,
    theme: &TuiTheme,
    mode: ThemeMode,
    highlight: Option<usize>,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let text = Style::default().fg(theme.foreground);
    let muted = Style::default().fg(theme.muted);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut anchors = Vec::with_capacity(article.elements.len());

    let wrapped = |content: &str, style: Style, first: &str, rest: &str| -> Vec<Line<'static>> {
        let options = textwrap::Options::new(width)
            .initial_indent(first)
            .subsequent_indent(rest);
        textwrap::wrap(content, options)
            .into_iter()
            .map(|l| Line::styled(l.into_owned(), style))
            .collect()
    };

    for (index, element) in article.elements.iter().enumerate() {
        anchors.push(lines.len());
        match element {
            ArticleElement::Paragraph(content) => {
                lines.extend(wrapped(content, text, "", ""));
            }
            ArticleElement::Heading(level, content) => {
                let mut style = match level {
                    1 => text.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    2 => Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                    _ => text.add_modifier(Modifier::ITALIC),
                };
                if highlight == Some(index) {
                    style = style.bg(theme.highlight_bg);
                }
                lines.extend(wrapped(content, style, "", ""));
            }
            ArticleElement::CodeBlock { lang, code } => {
                lines.push(Line::styled(
                    format!("```{}", lang.as_deref().unwrap_or("")),
                    muted,
                ));
                lines.extend(highlight_code(code, lang.as_deref(), mode, text));
                lines.push(Line::styled("```", muted));
            }
            ArticleElement::List(items) => {
                for item in items {
                    lines.extend(wrapped(item, text, " • ", "   "));
                }
            }
            ArticleElement::Table(rows) => {
                for row in rows {
                    lines.push(Line::styled(format!("| {} |", row.join(" | ")), text));
                }
            }
            ArticleElement::Image(alt) => {
                lines.push(Line::styled(
                    format!("[IMAGE: {}]", alt),
                    muted.add_modifier(Modifier::ITALIC),
                ));
            }
            ArticleElement::Quote(content) => {
                lines.extend(wrapped(
                    content,
                    text.add_modifier(Modifier::ITALIC),
                    "│ ",
                    "│ ",
                ));
            }
            ArticleElement::Rule => {
                lines.push(Line::styled("─".repeat(width), Style::default().fg(theme.border)));
            }
        }
        lines.push(Line::from(""));
    }

    (lines, anchors)
}

fn render_status_bar(app: &App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let (status, style) = match (&app.notification, app.input_mode, app.is_loading()) {
        (Some(notification), _, _) => {
            let fg = match notification.kind {
                NotificationKind::Info => theme.selection_fg,
                NotificationKind::Error => theme.error,
            };
            (
                notification.message.clone(),
                Style::default()
                    .fg(fg)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        (None, InputMode::DateInput, _) => (
            "Date: type YYYY-MM-DD | Enter: Go | Esc: Cancel".to_string(),
            Style::default().fg(theme.selection_fg).bg(theme.selection_bg),
        ),
        (None, InputMode::Chat, _) => (
            "Chat: Type | Enter: Send | Esc: Close".to_string(),
            Style::default().fg(theme.selection_fg).bg(theme.selection_bg),
        ),
        (None, InputMode::Normal, true) => (
            format!("{} Loading...", app.get_spinner_char()),
            Style::default().fg(theme.selection_fg).bg(theme.selection_bg),
        ),
        (None, InputMode::Normal, false) => (
            format!(
                "{} | Tab: Focus | j/k: Nav | Enter: Open | [/]: Day | d: Date | t: Theme | c: Chat | ?: Help | q: Quit",
                app.focus
            ),
            Style::default().fg(theme.selection_fg).bg(theme.selection_bg),
        ),
    };

    f.render_widget(Paragraph::new(format!(" {}", status)).style(style), area);
}

fn render_chat(app: &App, theme: &TuiTheme, f: &mut Frame, area: Rect) {
    let width = app.config.ui.chat_width.min(area.width.saturating_sub(2));
    let height = (area.height * 3 / 4).max(8).min(area.height);
    let popup_area = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height),
        width,
        height,
    );

    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Chat (Esc to close) ")
        .title_style(Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner);

    let text_width = chunks[0].width.max(10) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in app.chat.messages() {
        let color = match message.sender {
            Sender::User => theme.user_message,
            Sender::Bot => theme.bot_message,
        };
        let prefix = format!("{}: ", message.sender);
        let indent = " ".repeat(prefix.len());
        let options = textwrap::Options::new(text_width)
            .initial_indent(&prefix)
            .subsequent_indent(&indent);
        for line in textwrap::wrap(&message.text, options) {
            lines.push(Line::styled(line.into_owned(), Style::default().fg(color)));
        }
        lines.push(Line::from(""));
    }

    let scroll = lines.len().saturating_sub(chunks[0].height as usize);
    f.render_widget(
        Paragraph::new(lines).scroll((scroll.min(u16::MAX as usize) as u16, 0)),
        chunks[0],
    );

    let input = Paragraph::new(format!("> {}█", app.chat.input))
        .style(Style::default().fg(theme.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(input, chunks[1]);
}

fn render_help_overlay(theme: &TuiTheme, f: &mut Frame) {
    let area = f.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.selection_bg))
        .title(" Keyboard Shortcuts (Esc/q to close) ")
        .title_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(theme.background));

    let key_style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let shortcuts = [
        ("Tab / Shift-Tab", "Move focus between panes"),
        ("j/k, ↓/↑", "Move cursor / scroll"),
        ("PgDn / PgUp", "Scroll content"),
        ("Enter", "Open category or heading"),
        ("[ / ]", "Previous / next day"),
        ("d", "Type a date"),
        ("r", "Reload category"),
        ("o", "Open page in browser"),
        ("t", "Toggle light / dark"),
        ("c", "Toggle chat"),
        ("?", "Toggle help"),
        ("q / Ctrl-C", "Quit"),
    ];
    let lines: Vec<Line> = shortcuts
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), key_style),
                Span::styled(*description, Style::default().fg(theme.foreground)),
            ])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}
