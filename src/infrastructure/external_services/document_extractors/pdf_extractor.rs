use async_trait::async_trait;
use lopdf::{Document, Object};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor, ExtractedContent,
};

static INLINE_WHITESPACE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").ok());
static HYPHENATED_BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\w)-\n(\w)").ok());

pub struct PdfExtractor {
    password: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"Length",
            b"BBox",
            b"Matrix",
            b"Filter",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"FontDescriptor",
            b"ExtGState",
            b"MediaBox",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    fn load(&self, path: &Path) -> Result<Document, DocumentExtractionError> {
        std::fs::metadata(path).map_err(|e| DocumentExtractionError::IoError(e.to_string()))?;

        let mut doc = Document::load_filtered(path, Self::filter_func)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_| {
                DocumentExtractionError::ExtractionFailed(
                    "PDF is encrypted and could not be decrypted".to_string(),
                )
            })?;
        }

        Ok(doc)
    }

    /// Per-page text in page order, plus one warning per page that failed.
    fn extract_pages(doc: &Document) -> (BTreeMap<u32, String>, Vec<String>) {
        let pages: Vec<u32> = doc.get_pages().into_keys().collect();

        let extracted: Vec<Result<(u32, String), String>> = pages
            .into_par_iter()
            .map(|page_num| {
                doc.extract_text(&[page_num])
                    .map(|text| (page_num, normalize_page_text(&text)))
                    .map_err(|e| format!("page {}: {}", page_num, e))
            })
            .collect();

        let mut page_texts = BTreeMap::new();
        let mut warnings = Vec::new();
        for result in extracted {
            match result {
                Ok((page_num, text)) => {
                    page_texts.insert(page_num, text);
                }
                Err(e) => warnings.push(e),
            }
        }

        (page_texts, warnings)
    }

    fn extract_blocking(&self, path: &Path) -> Result<ExtractedContent, DocumentExtractionError> {
        let doc = self.load(path)?;
        let (page_texts, warnings) = Self::extract_pages(&doc);

        if page_texts.is_empty() && !warnings.is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(warnings.join("; ")));
        }

        let text = page_texts
            .values()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ExtractedContent {
            text,
            page_count: page_texts.len(),
            warnings,
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses runs of inline whitespace, rejoins words hyphenated across line
/// breaks and drops blank lines.
fn normalize_page_text(raw: &str) -> String {
    let joined = match HYPHENATED_BREAK.as_ref() {
        Some(re) => re.replace_all(raw, "$1$2"),
        None => raw.into(),
    };
    joined
        .lines()
        .map(|line| match INLINE_WHITESPACE.as_ref() {
            Some(re) => re.replace_all(line, " ").trim().to_string(),
            None => line.trim().to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_text(&self, file_path: &Path) -> Result<ExtractedContent, DocumentExtractionError> {
        let path: PathBuf = file_path.to_path_buf();
        let extractor = PdfExtractor {
            password: self.password.clone(),
        };

        let content = tokio::task::spawn_blocking(move || extractor.extract_blocking(&path))
            .await
            .map_err(|e| DocumentExtractionError::ExtractionFailed(e.to_string()))??;

        for warning in &content.warnings {
            tracing::warn!(file = %file_path.display(), "skipped unreadable page: {}", warning);
        }
        tracing::debug!(
            file = %file_path.display(),
            pages = content.page_count,
            chars = content.text.len(),
            "extracted pdf text"
        );

        Ok(content)
    }
}
