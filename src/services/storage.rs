use crate::error::{ConvertError, Result};
use crate::models::UNTITLED_BOOK;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `content` to `dir/file_name` in one step.
///
/// The document goes to a hidden sibling first and is renamed into place,
/// so the destination never holds a partial book.
pub fn write_book(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let tmp = dir.join(format!(".{}.tmp", file_name));
    let fail = |source| ConvertError::Write {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(dir).map_err(fail)?;

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&tmp, &path)) {
        let _ = fs::remove_file(&tmp);
        return Err(fail(e));
    }

    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}

/// `<title>.fb2` with characters unsafe in file names replaced.
pub fn suggested_file_name(title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match safe.trim_start_matches('.') {
        "" => format!("{}.fb2", UNTITLED_BOOK),
        name => format!("{}.fb2", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_whole_document_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");

        let path = write_book(&target, "book.fb2", "<FictionBook/>").unwrap();

        assert_eq!(path, target.join("book.fb2"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<FictionBook/>");
        let leftovers: Vec<_> = fs::read_dir(&target).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn replaces_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        write_book(dir.path(), "book.fb2", "old").unwrap();
        let path = write_book(dir.path(), "book.fb2", "new").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn unwritable_destination_reports_cause() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_book(&blocker, "book.fb2", "content").unwrap_err();
        match err {
            ConvertError::Write { path, .. } => assert_eq!(path, blocker.join("book.fb2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(suggested_file_name("Война и мир"), "Война и мир.fb2");
        assert_eq!(suggested_file_name("a/b: c?"), "a_b_ c_.fb2");
        assert_eq!(suggested_file_name("..hidden"), "hidden.fb2");
    }

    #[test]
    fn nameless_titles_fall_back_to_placeholder() {
        assert_eq!(suggested_file_name("..."), "Без названия.fb2");
        assert_eq!(suggested_file_name("  "), "Без названия.fb2");
    }
}
