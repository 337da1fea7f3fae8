use cloner_core::ResolvedDocument;

pub const DEFAULT_TITLE: &str = "Cloned website";

/// Wrap markup and stylesheet text into a self-contained HTML5 document.
///
/// Pure: identical inputs give byte-identical output, so the saved file and
/// the copied text always agree.
pub fn compose(html_markup: &str, stylesheet_text: &str, title: &str) -> String {
    let title = html_escape::encode_text(title);
    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n    \
<meta charset=\"UTF-8\">\n    \
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
<title>{title}</title>\n    \
<style>\n\
{stylesheet_text}\n    \
</style>\n\
</head>\n\
<body>\n\
{html_markup}\n\
</body>\n\
</html>"
    )
}

pub fn compose_document(document: &ResolvedDocument, title: &str) -> String {
    compose(document.html_markup(), document.stylesheet_text(), title)
}
