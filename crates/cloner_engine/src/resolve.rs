use cloner_core::{CloneError, ResolvedDocument};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::future::join_all;
use url::Url;

use crate::decode::decode_text;
use crate::fetch::Fetcher;
use crate::parse::StructuralParser;
use crate::{FailureKind, FetchError};

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// The cloned document itself could not be fetched or read.
    #[error("{url}: {source}")]
    RootFetchFailed { url: String, source: FetchError },
}

impl From<ResolutionError> for CloneError {
    fn from(err: ResolutionError) -> Self {
        CloneError::RootFetchFailed(err.to_string())
    }
}

/// Builds one ordered stylesheet text from a cloned document.
///
/// Inline `<style>` blocks come first, then linked stylesheets, each group in
/// source order. Linked stylesheets are fetched concurrently from the service
/// origin; a stylesheet that fails to fetch is logged and left out.
pub struct StylesheetResolver<'a> {
    fetcher: &'a dyn Fetcher,
    parser: &'a dyn StructuralParser,
    service_origin: Url,
}

impl<'a> StylesheetResolver<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        parser: &'a dyn StructuralParser,
        service_origin: Url,
    ) -> Self {
        Self {
            fetcher,
            parser,
            service_origin,
        }
    }

    pub async fn resolve(&self, document_url: &str) -> Result<ResolvedDocument, ResolutionError> {
        let root_failed = |source: FetchError| ResolutionError::RootFetchFailed {
            url: document_url.to_string(),
            source,
        };

        let base = Url::parse(document_url)
            .map_err(|err| root_failed(FetchError::new(FailureKind::InvalidUrl, err.to_string())))?;
        let output = self.fetcher.fetch(document_url).await.map_err(root_failed)?;
        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_errors {
            engine_warn!(
                "Document {} has malformed {} bytes; replaced",
                document_url,
                decoded.encoding_label
            );
        }
        let html = decoded.text;

        let parsed = self.parser.parse_document(&html);
        engine_debug!(
            "Document {} has {} style blocks and {} stylesheet links",
            document_url,
            parsed.style_blocks.len(),
            parsed.stylesheet_links.len()
        );

        let mut stylesheet_text = String::new();
        for block in &parsed.style_blocks {
            stylesheet_text.push_str(block);
            stylesheet_text.push('\n');
        }

        // join_all keeps input order, so completion order does not matter.
        let linked = join_all(
            parsed
                .stylesheet_links
                .iter()
                .map(|href| self.fetch_stylesheet(&base, href)),
        )
        .await;
        let fetched = linked.iter().flatten().count();
        for block in linked.into_iter().flatten() {
            stylesheet_text.push_str(&block);
        }

        engine_info!(
            "Resolved {}: {}/{} linked stylesheets",
            document_url,
            fetched,
            parsed.stylesheet_links.len()
        );
        Ok(ResolvedDocument::new(html, stylesheet_text))
    }

    /// Fetch one linked stylesheet and return its provenance-annotated block.
    async fn fetch_stylesheet(&self, base: &Url, href: &str) -> Option<String> {
        let absolute = match base.join(href) {
            Ok(url) => url,
            Err(err) => {
                engine_warn!("Skipping stylesheet with unresolvable href {:?}: {}", href, err);
                return None;
            }
        };

        let mut target = self.service_origin.clone();
        target.set_path(absolute.path());
        target.set_query(None);
        target.set_fragment(None);

        let output = match self.fetcher.fetch(target.as_str()).await {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("Failed to fetch external CSS {} from {}: {}", absolute, target, err);
                return None;
            }
        };
        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_errors {
            engine_warn!(
                "External CSS {} has malformed {} bytes; replaced",
                absolute,
                decoded.encoding_label
            );
        }
        let css = decoded.text;

        Some(format!("/* {absolute} */\n{css}\n"))
    }
}
