use std::collections::HashSet;
use std::io::{Cursor, Write};

use engine_logging::{engine_info, engine_warn};
use futures_util::stream::{self, StreamExt};
use url::Url;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fetch::Fetcher;
use crate::FetchError;

pub const DOCUMENT_ENTRY: &str = "index.html";

#[derive(Debug, Clone)]
pub struct PackageSettings {
    /// Name of the entry holding the composed document.
    pub document_entry: String,
    /// Upper bound on asset fetches in flight at once.
    pub max_concurrent_fetches: usize,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            document_entry: DOCUMENT_ENTRY.to_string(),
            max_concurrent_fetches: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmissionReason {
    Fetch(FetchError),
    UnsafePath,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmittedAsset {
    pub path: String,
    pub reason: OmissionReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArchive {
    pub bytes: Vec<u8>,
    /// Entry names in archive order, starting with the document entry.
    pub included: Vec<String>,
    pub omitted: Vec<OmittedAsset>,
}

/// Only writing the archive itself can fail; missing assets never do.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("failed to write archive entry {entry}: {source}")]
    Entry {
        entry: String,
        source: zip::result::ZipError,
    },
    #[error("failed to write archive entry {entry}: {source}")]
    Io {
        entry: String,
        source: std::io::Error,
    },
    #[error("failed to finish archive: {0}")]
    Finish(zip::result::ZipError),
}

pub struct ArchivePackager<'a> {
    fetcher: &'a dyn Fetcher,
    settings: PackageSettings,
}

impl<'a> ArchivePackager<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, settings: PackageSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Pack `document` plus every fetchable asset into one zip archive.
    ///
    /// Each asset is fetched from `asset_base` joined with its path and stored
    /// under that same relative path. Assets that fail are left out.
    pub async fn pack(
        &self,
        document: &str,
        asset_base: &Url,
        asset_paths: &[String],
    ) -> Result<PackagedArchive, PackageError> {
        let document_entry = self.settings.document_entry.clone();
        let mut omitted = Vec::new();
        let mut seen = HashSet::from([document_entry.clone()]);
        let mut planned = Vec::new();
        for path in asset_paths {
            match entry_name(path) {
                Some(entry) if seen.insert(entry.clone()) => planned.push((path.clone(), entry)),
                Some(_) => {
                    engine_warn!("Skipping duplicate asset entry {}", path);
                    omitted.push(OmittedAsset {
                        path: path.clone(),
                        reason: OmissionReason::Duplicate,
                    });
                }
                None => {
                    engine_warn!("Skipping asset with unsafe path {:?}", path);
                    omitted.push(OmittedAsset {
                        path: path.clone(),
                        reason: OmissionReason::UnsafePath,
                    });
                }
            }
        }

        // `buffered` yields in input order, so entries follow `asset_paths`.
        let fetched: Vec<_> = stream::iter(planned)
            .map(|(path, entry)| async move {
                let url = asset_url(asset_base, &entry);
                let result = self.fetcher.fetch(&url).await;
                (path, entry, result)
            })
            .buffered(self.settings.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        write_entry(&mut writer, options, &document_entry, document.as_bytes())?;
        let mut included = vec![document_entry];

        for (path, entry, result) in fetched {
            match result {
                Ok(output) => {
                    write_entry(&mut writer, options, &entry, &output.bytes)?;
                    included.push(entry);
                }
                Err(err) => {
                    engine_warn!("Failed to download asset {}: {}", path, err);
                    omitted.push(OmittedAsset {
                        path,
                        reason: OmissionReason::Fetch(err),
                    });
                }
            }
        }

        let bytes = writer.finish().map_err(PackageError::Finish)?.into_inner();
        engine_info!(
            "Packed {} entries ({} assets omitted, {} bytes)",
            included.len(),
            omitted.len(),
            bytes.len()
        );
        Ok(PackagedArchive {
            bytes,
            included,
            omitted,
        })
    }
}

fn write_entry(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    entry: &str,
    contents: &[u8],
) -> Result<(), PackageError> {
    writer
        .start_file(entry, options)
        .map_err(|source| PackageError::Entry {
            entry: entry.to_string(),
            source,
        })?;
    writer.write_all(contents).map_err(|source| PackageError::Io {
        entry: entry.to_string(),
        source,
    })
}

/// Archive key for an asset path: the path with empty and `.` segments dropped.
///
/// Paths with `..` segments or backslashes are refused, as are paths that
/// name nothing once normalized.
pub(crate) fn entry_name(path: &str) -> Option<String> {
    if path.contains('\\') {
        return None;
    }
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

fn asset_url(base: &Url, entry: &str) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), entry)
}

#[cfg(test)]
mod tests {
    use super::{asset_url, entry_name};
    use url::Url;

    #[test]
    fn entry_names_keep_relative_structure() {
        assert_eq!(entry_name("css/b.css").as_deref(), Some("css/b.css"));
        assert_eq!(entry_name("/img/a.png").as_deref(), Some("img/a.png"));
    }

    #[test]
    fn redundant_segments_are_normalized() {
        assert_eq!(entry_name("./css/b.css").as_deref(), Some("css/b.css"));
        assert_eq!(entry_name("a//b").as_deref(), Some("a/b"));
        assert_eq!(entry_name("fonts/./x.woff2").as_deref(), Some("fonts/x.woff2"));
        assert_eq!(entry_name(" my file.png").as_deref(), Some(" my file.png"));
    }

    #[test]
    fn unsafe_entry_names_are_refused() {
        for path in ["", "/", ".", "./", "../etc/passwd", "a/../../b", "a\\b"] {
            assert_eq!(entry_name(path), None, "{path}");
        }
    }

    #[test]
    fn asset_url_joins_without_double_slash() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(asset_url(&base, "a.png"), "http://localhost:8000/a.png");
        let base = Url::parse("http://localhost:8000/sites/").unwrap();
        assert_eq!(asset_url(&base, "css/b.css"), "http://localhost:8000/sites/css/b.css");
    }
}
