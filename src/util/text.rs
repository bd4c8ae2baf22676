// src/util/text.rs
use html_escape::decode_html_entities;
use lazy_static::lazy_static;
use regex::Regex;
use sha1::{Digest, Sha1};

lazy_static! {
    static ref COMMENT_RE: Regex =
        Regex::new(r"(?s)<!--.*?-->").expect("Failed to compile comment regex");
    static ref STYLE_SCRIPT_RE: Regex =
        Regex::new(r"(?is)<style.*?>.*?</style>|<script.*?>.*?</script>")
            .expect("Failed to compile style/script regex");
    static ref BLOCK_RE: Regex =
        Regex::new(r"</?(p|div|br|li|h[1-6])[^>]*>").expect("Failed to compile block tag regex");
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").expect("Failed to compile tag regex");
}

/// Plain text of an HTML field, as used for sorting and duplicate checks.
///
/// Comments, `<style>` and `<script>` blocks and all tags are removed, entities
/// decoded and surrounding whitespace trimmed.
///
/// ```
/// use ankipack::util::text::strip_html;
///
/// assert_eq!(strip_html("<p>Trees &amp; <b>Graphs</b></p>"), "Trees & Graphs");
/// ```
pub fn strip_html(html: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(html, "");
    let without_blocks = STYLE_SCRIPT_RE.replace_all(&without_comments, "");
    let without_tags = TAG_RE.replace_all(&without_blocks, "");
    decode_html_entities(&without_tags).trim().to_string()
}

/// Duplicate-check checksum of a field: first 8 hex digits of its SHA-1.
pub fn field_checksum(html: &str) -> i64 {
    let digest = Sha1::digest(strip_html(html).as_bytes());
    let mut head = [0u8; 4];
    head.copy_from_slice(&digest[..4]);
    i64::from(u32::from_be_bytes(head))
}

/// Extract the first line of plain text from HTML content.
///
/// ```
/// use ankipack::util::text::extract_first_line;
///
/// let html = "<p>What is a Tree?</p><p>Second line</p>";
/// let first_line = extract_first_line(html);
/// assert_eq!(first_line, "What is a Tree?");
/// ```
pub fn extract_first_line(html: &str) -> String {
    // Decode HTML entities first
    let decoded = decode_html_entities(html).to_string();

    // Block-level tags become line breaks
    let with_newlines = BLOCK_RE.replace_all(&decoded, "\n").into_owned();
    let no_tags = TAG_RE.replace_all(&with_newlines, "").into_owned();

    no_tags
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}
