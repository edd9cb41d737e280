use crate::error::{ConvertError, Result};
use crate::models::{BookMetadata, Chapter};
use crate::services::escape::fb2_escape;

pub const GENRE: &str = "fiction";
pub const LANG: &str = "ru";
pub const GENERATOR_NICKNAME: &str = "TXT2FB2 Converter";
pub const PROGRAM_USED: &str = "TXT to FB2 Converter";
pub const FORMAT_VERSION: &str = "1.0";

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Builds a complete FictionBook 2.0 document.
///
/// Every piece of chapter and metadata text is escaped exactly once here.
/// Refuses to build a document without chapters.
pub fn assemble_document(chapters: &[Chapter], meta: &BookMetadata) -> Result<String> {
    if chapters.is_empty() {
        return Err(ConvertError::NoContent);
    }

    let body = chapters
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n");

    let mut doc = String::with_capacity(body.len() + 1024);
    doc.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    doc.push_str(
        "<FictionBook xmlns=\"http://www.gribuser.ru/xml/fictionbook/2.0\" \
         xmlns:l=\"http://www.w3.org/1999/xlink\">\n",
    );
    doc.push_str("  <description>\n");
    doc.push_str("    <title-info>\n");
    doc.push_str(&format!("      <genre>{}</genre>\n", GENRE));
    doc.push_str("      <author>\n");
    doc.push_str(&format!(
        "        <nickname>{}</nickname>\n",
        fb2_escape(&meta.author)
    ));
    doc.push_str("      </author>\n");
    doc.push_str(&format!(
        "      <book-title>{}</book-title>\n",
        fb2_escape(&meta.title)
    ));
    doc.push_str(&format!("      <lang>{}</lang>\n", LANG));
    doc.push_str("    </title-info>\n");
    doc.push_str("    <document-info>\n");
    doc.push_str("      <author>\n");
    doc.push_str(&format!(
        "        <nickname>{}</nickname>\n",
        GENERATOR_NICKNAME
    ));
    doc.push_str("      </author>\n");
    doc.push_str(&format!(
        "      <program-used>{}</program-used>\n",
        PROGRAM_USED
    ));
    doc.push_str(&format!(
        "      <date>{}</date>\n",
        meta.date.format(DATE_FORMAT)
    ));
    doc.push_str(&format!("      <id>{}</id>\n", meta.id));
    doc.push_str(&format!("      <version>{}</version>\n", FORMAT_VERSION));
    doc.push_str("    </document-info>\n");
    doc.push_str("  </description>\n");
    doc.push_str("  <body>\n");
    doc.push_str(&body);
    doc.push('\n');
    doc.push_str("  </body>\n");
    doc.push_str("</FictionBook>\n");

    Ok(doc)
}

fn render_section(chapter: &Chapter) -> String {
    let mut section = String::new();
    section.push_str("  <section>\n");
    section.push_str("    <title>\n");
    section.push_str(&format!("      <p>{}</p>\n", fb2_escape(&chapter.title)));
    section.push_str("    </title>\n");

    for line in &chapter.body {
        if line.trim().is_empty() {
            section.push_str("    <empty-line/>\n");
        } else {
            section.push_str(&format!("    <p>{}</p>\n", fb2_escape(line)));
        }
    }

    section.push_str("  </section>");
    section
}
