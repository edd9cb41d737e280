use crate::models::{Chapter, SourceFile};
use std::collections::{HashMap, HashSet};

const READ_FAILURE_PREFIX: &str = "Ошибка чтения файла";

/// Turns an ordered list of sources into chapters with unique titles.
///
/// Title counts live only for the duration of one call, so the same input
/// always produces the same chapters.
pub fn extract_chapters(sources: &[SourceFile]) -> Vec<Chapter> {
    let mut titles = TitleRegistry::default();

    sources
        .iter()
        .map(|source| {
            let mut chapter = extract_chapter(source);
            chapter.title = titles.claim(chapter.title);
            chapter
        })
        .collect()
}

/// Extracts a single chapter without deduplicating its title.
pub fn extract_chapter(source: &SourceFile) -> Chapter {
    let text = match &source.content {
        Ok(text) => text,
        Err(cause) => {
            tracing::warn!("Could not read {}: {}", source.name, cause);
            return Chapter {
                title: source.stem(),
                body: vec![format!("{}: {}", READ_FAILURE_PREFIX, cause)],
                source: source.name.clone(),
            };
        }
    };

    let lines = split_lines(text);
    let Some(title_idx) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return Chapter {
            title: source.stem(),
            body: Vec::new(),
            source: source.name.clone(),
        };
    };

    Chapter {
        title: clean_title(lines[title_idx]),
        body: lines[title_idx + 1..].iter().map(|l| l.to_string()).collect(),
        source: source.name.clone(),
    }
}

/// Strips decorative `=` and spaces, then surrounding whitespace.
///
/// A line made only of markers is kept as-is.
pub fn clean_title(line: &str) -> String {
    let candidate = line.trim();
    let cleaned = candidate.trim_matches(|c: char| c == '=' || c == ' ').trim();

    if cleaned.is_empty() {
        candidate.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Splits on every common line terminator, keeping empty lines.
///
/// A terminator at the very end does not produce a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + c.len_utf8();
        if c == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                start = next_idx + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

#[derive(Debug, Default)]
struct TitleRegistry {
    counts: HashMap<String, usize>,
    used: HashSet<String>,
}

impl TitleRegistry {
    /// Returns `title` if unused, otherwise the next free `"title (n)"`.
    fn claim(&mut self, title: String) -> String {
        if self.used.insert(title.clone()) {
            self.counts.insert(title.clone(), 1);
            return title;
        }

        let count = self.counts.entry(title.clone()).or_insert(1);
        let unique = loop {
            *count += 1;
            let candidate = format!("{} ({})", title, count);
            if !self.used.contains(&candidate) {
                break candidate;
            }
        };

        self.used.insert(unique.clone());
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(chapters: &[Chapter]) -> Vec<&str> {
        chapters.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn title_is_first_non_blank_line_without_markers() {
        let chapter = extract_chapter(&SourceFile::new(
            "one.txt",
            "=== Chapter One ===\nHello\n\nWorld",
        ));

        assert_eq!(chapter.title, "Chapter One");
        assert_eq!(chapter.body, ["Hello", "", "World"]);
        assert_eq!(chapter.source, "one.txt");
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let chapter = extract_chapter(&SourceFile::new("a.txt", "\n   \n  Title  \nText\n"));
        assert_eq!(chapter.title, "Title");
        assert_eq!(chapter.body, ["Text"]);
    }

    #[test]
    fn blank_content_falls_back_to_file_stem() {
        let chapter = extract_chapter(&SourceFile::new("dir/empty part.txt", "\n  \n\t\n"));
        assert_eq!(chapter.title, "empty part");
        assert!(chapter.body.is_empty());

        let chapter = extract_chapter(&SourceFile::new("nothing.txt", ""));
        assert_eq!(chapter.title, "nothing");
        assert!(chapter.body.is_empty());
    }

    #[test]
    fn title_of_only_markers_keeps_the_original_line() {
        let chapter = extract_chapter(&SourceFile::new("sep.txt", "  =====  \nbody"));
        assert_eq!(chapter.title, "=====");
        assert_eq!(chapter.body, ["body"]);
    }

    #[test]
    fn markers_behind_other_whitespace_stay_in_title() {
        assert_eq!(clean_title("=\t= Title"), "= Title");
        assert_eq!(clean_title("== Title ==\t"), "Title");
        assert_eq!(clean_title("= = Title = ="), "Title");
    }

    #[test]
    fn unreadable_source_becomes_placeholder_chapter() {
        let chapter = extract_chapter(&SourceFile::from_bytes("broken.txt", &[0xC3, 0x28]));
        assert_eq!(chapter.title, "broken");
        assert_eq!(chapter.body.len(), 1);
        assert!(chapter.body[0].starts_with("Ошибка чтения файла: "));
    }

    #[test]
    fn bad_file_does_not_abort_the_batch() {
        let sources = vec![
            SourceFile::new("1.txt", "First\nA"),
            SourceFile::from_bytes("2.txt", &[0xFF]),
            SourceFile::new("3.txt", "Third\nC"),
        ];
        let chapters = extract_chapters(&sources);
        assert_eq!(titles(&chapters), ["First", "2", "Third"]);
    }

    #[test]
    fn duplicate_titles_get_ordinal_suffixes() {
        let sources: Vec<SourceFile> = (0..3)
            .map(|i| SourceFile::new(format!("{}.txt", i), "Intro\ntext"))
            .collect();
        let chapters = extract_chapters(&sources);
        assert_eq!(titles(&chapters), ["Intro", "Intro (2)", "Intro (3)"]);
    }

    #[test]
    fn suffixes_never_collide_with_existing_titles() {
        let sources = vec![
            SourceFile::new("a.txt", "Intro"),
            SourceFile::new("b.txt", "Intro (2)"),
            SourceFile::new("c.txt", "Intro"),
            SourceFile::new("d.txt", "Intro (2)"),
        ];
        let chapters = extract_chapters(&sources);
        assert_eq!(
            titles(&chapters),
            ["Intro", "Intro (2)", "Intro (3)", "Intro (2) (2)"]
        );
    }

    #[test]
    fn extraction_is_repeatable() {
        let sources = vec![
            SourceFile::new("a.txt", "Ch1\nLine A"),
            SourceFile::new("b.txt", "Ch1\nLine B"),
        ];
        assert_eq!(extract_chapters(&sources), extract_chapters(&sources));
    }

    #[test]
    fn lines_split_on_any_terminator() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\nb\n"), ["a", "", "b"]);
        assert_eq!(split_lines("a\u{2028}b"), ["a", "b"]);
        assert_eq!(split_lines("\r\n"), [""]);
        assert!(split_lines("").is_empty());
    }
}
