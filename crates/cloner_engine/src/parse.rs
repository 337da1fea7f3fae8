use scraper::{ElementRef, Html, Selector};

/// Style dependencies of a document, each list in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    /// Text content of every `<style>` element.
    pub style_blocks: Vec<String>,
    /// Raw `href` of every `<link rel="stylesheet">` element.
    pub stylesheet_links: Vec<String>,
}

/// Minimal structural view of a markup document.
pub trait StructuralParser: Send + Sync {
    fn parse_document(&self, text: &str) -> ParsedDocument;
}

/// [`StructuralParser`] backed by the html5ever tree builder in `scraper`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperParser;

impl StructuralParser for ScraperParser {
    fn parse_document(&self, text: &str) -> ParsedDocument {
        let doc = Html::parse_document(text);
        let Ok(selector) = Selector::parse("style, link") else {
            return ParsedDocument::default();
        };

        let mut parsed = ParsedDocument::default();
        for element in doc.select(&selector) {
            match element.value().name() {
                "style" => parsed.style_blocks.push(element.text().collect()),
                "link" => {
                    if let Some(href) = stylesheet_href(element) {
                        parsed.stylesheet_links.push(href.to_string());
                    }
                }
                _ => {}
            }
        }
        parsed
    }
}

fn stylesheet_href(element: ElementRef<'_>) -> Option<&str> {
    let value = element.value();
    let is_stylesheet = value
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false);
    if !is_stylesheet {
        return None;
    }
    value
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
}
