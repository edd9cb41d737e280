/// Escape the five XML-significant characters for element content.
///
/// `&` goes first so the entities produced for the others stay intact.
pub fn fb2_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
