use once_cell::sync::Lazy;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::internal::models::ThemeMode;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

fn syntect_theme_name(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "InspiredGitHub",
        ThemeMode::Dark => "base16-ocean.dark",
    }
}

/// Highlight a fenced code block into one `Line` per source line. Unknown languages are
/// rendered as plain text in `fallback`.
pub fn highlight_code(
    code: &str,
    lang: Option<&str>,
    mode: ThemeMode,
    fallback: Style,
) -> Vec<Line<'static>> {
    let syntax = lang
        .and_then(|token| SYNTAX_SET.find_syntax_by_token(token))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let Some(theme) = THEME_SET.themes.get(syntect_theme_name(mode)) else {
        return plain_lines(code, fallback);
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => {
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .map(|(style, text)| {
                        let fg = style.foreground;
                        Span::styled(
                            text.trim_end_matches(['\n', '\r']).to_string(),
                            fallback.fg(Color::Rgb(fg.r, fg.g, fg.b)),
                        )
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
            Err(e) => {
                tracing::debug!("highlight failed, rendering plain: {}", e);
                return plain_lines(code, fallback);
            }
        }
    }
    lines
}

fn plain_lines(code: &str, style: Style) -> Vec<Line<'static>> {
    code.lines()
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_one_line_per_source_line() {
        let code = "fn main() {\n    println!(\"hi\");\n}\n";
        let lines = highlight_code(code, Some("rust"), ThemeMode::Dark, Style::default());
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[1]), "    println!(\"hi\");");
    }

    #[test]
    fn test_unknown_language_keeps_text() {
        let lines = highlight_code(
            "just words",
            Some("no-such-lang"),
            ThemeMode::Light,
            Style::default(),
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "just words");
    }
}
