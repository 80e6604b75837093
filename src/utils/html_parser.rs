use crate::internal::models::ArticleElement;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, pre, ul, ol, table, img, blockquote, hr").unwrap()
});
static CODE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("code").unwrap());
static TR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

/// Containers whose children are rendered by the container itself.
const CONTAINER_TAGS: &[&str] = &["li", "blockquote", "table", "pre", "ul", "ol"];

/// Convert an HTML fragment (rendered markdown body) into display elements, in document
/// order.
pub fn parse_article_html(html: &str) -> Vec<ArticleElement> {
    let fragment = Html::parse_fragment(html);
    let mut elements = Vec::new();

    for element in fragment.select(&BLOCK_SELECTOR) {
        if is_nested(&element) {
            continue;
        }
        let tag_name = element.value().name();

        match tag_name {
            "p" => {
                let text = collapse_whitespace(&inner_text(&element));
                if !text.is_empty() {
                    elements.push(ArticleElement::Paragraph(text));
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag_name[1..].parse::<usize>().unwrap_or(1);
                let text = inner_text(&element);
                elements.push(ArticleElement::Heading(level, text.trim().to_string()));
            }
            "pre" => {
                let code_elem = element.select(&CODE_SELECTOR).next();
                let code = match code_elem {
                    Some(code) => inner_text(&code),
                    None => inner_text(&element),
                };

                let lang = element
                    .value()
                    .attr("class")
                    .or_else(|| code_elem.and_then(|c| c.value().attr("class")))
                    .map(|c| c.trim_start_matches("language-").to_string());

                elements.push(ArticleElement::CodeBlock { lang, code });
            }
            "ul" | "ol" => {
                let mut items = Vec::new();
                collect_list_items(element, 0, &mut items);

                if !items.is_empty() {
                    elements.push(ArticleElement::List(items));
                }
            }
            "table" => {
                let rows: Vec<Vec<String>> = element
                    .select(&TR_SELECTOR)
                    .map(|tr| {
                        tr.select(&CELL_SELECTOR)
                            .map(|cell| collapse_whitespace(&inner_text(&cell)))
                            .collect::<Vec<_>>()
                    })
                    .filter(|cols| !cols.is_empty())
                    .collect();

                if !rows.is_empty() {
                    elements.push(ArticleElement::Table(rows));
                }
            }
            "img" => {
                if let Some(src) = element.value().attr("src") {
                    let alt = element
                        .value()
                        .attr("alt")
                        .filter(|a| !a.is_empty())
                        .unwrap_or(src);
                    elements.push(ArticleElement::Image(alt.to_string()));
                }
            }
            "blockquote" => {
                let text = collapse_whitespace(&inner_text(&element));
                if !text.is_empty() {
                    elements.push(ArticleElement::Quote(text));
                }
            }
            "hr" => elements.push(ArticleElement::Rule),
            _ => {}
        }
    }

    elements
}

/// Text content of an HTML fragment with tags stripped and entities decoded.
pub fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<String>()
}

fn inner_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Flatten a list into item texts; nested lists follow their parent item, indented two
/// spaces per level.
fn collect_list_items(list: ElementRef, depth: usize, items: &mut Vec<String>) {
    let children = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "li");

    for li in children {
        let mut text = String::new();
        let mut nested = Vec::new();
        item_text(li, &mut text, &mut nested);

        let text = collapse_whitespace(&text);
        if !text.is_empty() {
            items.push(format!("{}{}", "  ".repeat(depth), text));
        }
        for sublist in nested {
            collect_list_items(sublist, depth + 1, items);
        }
    }
}

/// Text of a list item without its nested lists, which are handed back in `nested`.
fn item_text<'a>(element: ElementRef<'a>, text: &mut String, nested: &mut Vec<ElementRef<'a>>) {
    for child in element.children() {
        if let Some(t) = child.value().as_text() {
            text.push_str(t);
        } else if let Some(child) = ElementRef::wrap(child) {
            match child.value().name() {
                "ul" | "ol" => nested.push(child),
                _ => item_text(child, text, nested),
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Headings inside a container stay part of the container's text, so an `<h2>` inside a
/// list item is not a jump target.
fn is_nested(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| CONTAINER_TAGS.contains(&e.name()))
    })
}
