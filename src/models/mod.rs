use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::services::stamp::DocumentStamp;

pub const UNTITLED_BOOK: &str = "Без названия";
pub const UNKNOWN_AUTHOR: &str = "Автор";

const PREVIEW_LIMIT: usize = 1500;
const PREVIEW_MORE: &str = "\n\n[...продолжение...]";

/// One uploaded or read input, before title extraction.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name as supplied by the caller, used for ordering.
    pub name: String,
    /// Decoded text, or a description of why it could not be read.
    pub content: Result<String, String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            content: Ok(content.into()),
        }
    }

    /// Decodes raw bytes as UTF-8, skipping a leading byte order mark.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let content = std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| e.to_string());

        SourceFile {
            name: name.into(),
            content,
        }
    }

    /// The file name without directories or extension.
    pub fn stem(&self) -> String {
        std::path::Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub body: Vec<String>,
    /// Name of the source the chapter came from. Never rendered.
    pub source: String,
}

impl Chapter {
    pub fn preview(&self) -> String {
        let mut text = self.body.join("\n");
        if let Some((cut, _)) = text.char_indices().nth(PREVIEW_LIMIT) {
            text.truncate(cut);
            text.push_str(PREVIEW_MORE);
        }

        format!("=== {} ===\n\n{}", self.title, text)
    }
}

/// Book-level fields rendered into the description block.
#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub date: NaiveDateTime,
    pub id: Uuid,
}

impl BookMetadata {
    pub fn new(title: &str, author: &str, stamp: &dyn DocumentStamp) -> Self {
        BookMetadata {
            title: or_placeholder(title, UNTITLED_BOOK),
            author: or_placeholder(author, UNKNOWN_AUTHOR),
            date: stamp.now(),
            id: stamp.new_id(),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    match value.trim() {
        "" => placeholder.to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterSummary {
    pub title: String,
    pub source: String,
    pub line_count: usize,
    pub preview: String,
}

impl From<&Chapter> for ChapterSummary {
    fn from(chapter: &Chapter) -> Self {
        ChapterSummary {
            title: chapter.title.clone(),
            source: chapter.source.clone(),
            line_count: chapter.body.len(),
            preview: chapter.preview(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConvertResult {
    pub success: bool,
    pub chapter_count: usize,
    pub book_title: String,
    pub file_name: String,
    pub download_url: String,
}
