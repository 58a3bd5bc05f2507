use std::ops::Range;
use std::path::{Component, Path};

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// True when the text holds nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Markdown formatting shortcuts offered by the toolbar and Format menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Quote,
    /// Heading level, clamped to 1..=6
    Header(u8),
}

impl FormatAction {
    /// Inline marker for the wrapping actions.
    pub fn wrapper(self) -> Option<&'static str> {
        match self {
            FormatAction::Bold => Some("**"),
            FormatAction::Italic => Some("*"),
            FormatAction::Underline => Some("_"),
            FormatAction::Strikethrough => Some("~~"),
            FormatAction::Code => Some("`"),
            FormatAction::Quote | FormatAction::Header(_) => None,
        }
    }
}

/// A single replacement in a buffer, in byte offsets.
///
/// `cursor` is where the insertion point should land once the edit is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
    pub cursor: usize,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        let replacement = text.into();
        Self {
            cursor: at + replacement.len(),
            range: at..at,
            replacement,
        }
    }

    pub fn apply(&self, text: &mut String) {
        text.replace_range(self.range.clone(), &self.replacement);
    }
}

/// Markdown link for an image plus whether it points outside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub markdown: String,
    pub outside_project: bool,
}

/// Build the edit for `action` given the current selection (empty range = cursor).
pub fn apply_format(text: &str, selection: Range<usize>, action: FormatAction) -> TextEdit {
    let start = floor_char_boundary(text, selection.start.min(selection.end));
    let end = floor_char_boundary(text, selection.end.max(selection.start));

    match action {
        FormatAction::Quote => toggle_quote(text, end),
        FormatAction::Header(level) => set_header(text, end, level),
        wrapping => {
            let wrapper = wrapping.wrapper().unwrap_or_default();
            if start < end {
                wrap_selection(text, start..end, wrapper)
            } else {
                wrap_word(text, end, wrapper)
            }
        }
    }
}

fn wrap_selection(text: &str, selection: Range<usize>, wrapper: &str) -> TextEdit {
    let selected = &text[selection.clone()];
    let w = wrapper.len();
    let replacement = if selected.len() >= 2 * w
        && selected.starts_with(wrapper)
        && selected.ends_with(wrapper)
    {
        selected[w..selected.len() - w].to_string()
    } else {
        format!("{wrapper}{selected}{wrapper}")
    };
    TextEdit {
        cursor: selection.start + replacement.len(),
        range: selection,
        replacement,
    }
}

fn wrap_word(text: &str, cursor: usize, wrapper: &str) -> TextEdit {
    let word = word_bounds(text, cursor);
    let inner = &text[word.clone()];
    let replacement = format!("{wrapper}{inner}{wrapper}");
    // Empty word: leave the cursor between the markers so typing lands inside.
    let cursor = if inner.is_empty() {
        word.start + wrapper.len()
    } else {
        word.start + replacement.len()
    };
    TextEdit {
        range: word,
        replacement,
        cursor,
    }
}

fn toggle_quote(text: &str, cursor: usize) -> TextEdit {
    const MARKER: &str = "> ";
    let line = line_bounds(text, cursor);
    if text[line.clone()].starts_with(MARKER) {
        TextEdit {
            range: line.start..line.start + MARKER.len(),
            replacement: String::new(),
            cursor: cursor.saturating_sub(MARKER.len()).max(line.start),
        }
    } else {
        TextEdit {
            range: line.start..line.start,
            replacement: MARKER.to_string(),
            cursor: cursor + MARKER.len(),
        }
    }
}

fn set_header(text: &str, cursor: usize, level: u8) -> TextEdit {
    let level = level.clamp(1, 6);
    let marker = format!("{} ", "#".repeat(level as usize));
    let line = line_bounds(text, cursor);
    let trimmed = text[line.clone()].trim();

    if trimmed.is_empty() {
        return TextEdit::insert(line.start, marker);
    }

    let new_line = match header_level(trimmed) {
        Some((existing, rest)) if existing == level => rest.to_string(),
        Some((_, rest)) => format!("{marker}{rest}"),
        None => format!("{marker}{trimmed}"),
    };
    TextEdit {
        cursor: line.start + new_line.len(),
        range: line,
        replacement: new_line,
    }
}

/// `"## Title"` -> `Some((2, "Title"))`
fn header_level(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    line[hashes..].strip_prefix(' ').map(|rest| (hashes as u8, rest))
}

/// Prefix the cursor's line with a list bullet.
pub fn insert_list_item(text: &str, cursor: usize) -> TextEdit {
    let cursor = floor_char_boundary(text, cursor);
    let line = line_bounds(text, cursor);
    TextEdit {
        range: line.start..line.start,
        replacement: "- ".to_string(),
        cursor: cursor + 2,
    }
}

/// Markdown image reference relative to `project_dir`.
pub fn image_link(image: &Path, project_dir: &Path) -> ImageLink {
    match pathdiff::diff_paths(image, project_dir) {
        Some(relative) => ImageLink {
            outside_project: relative.components().any(|c| c == Component::ParentDir),
            markdown: format!("![Image](<{}>)\n", relative.display()),
        },
        None => ImageLink {
            markdown: format!("![Image](<{}>)\n", image.display()),
            outside_project: true,
        },
    }
}

/// Byte range of the line containing `pos`, without its newline.
pub fn line_bounds(text: &str, pos: usize) -> Range<usize> {
    let pos = floor_char_boundary(text, pos);
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    start..end
}

fn word_bounds(text: &str, pos: usize) -> Range<usize> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let start = text[..pos]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(pos, |(i, _)| i);
    let end = text[pos..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map_or(text.len(), |(i, _)| pos + i);
    start..end
}

/// Largest char boundary at or below `pos`, clamped to the text length.
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn run(text: &str, selection: Range<usize>, action: FormatAction) -> (String, usize) {
        let edit = apply_format(text, selection, action);
        let mut out = text.to_string();
        edit.apply(&mut out);
        (out, edit.cursor)
    }

    #[test]
    fn test_extract_filename_from_path() {
        assert_eq!(extract_filename("/home/user/test.md"), "test.md");
        assert_eq!(extract_filename("notes.md"), "notes.md");
        assert_eq!(extract_filename("/path/with/many/levels/file.md"), "file.md");
    }

    #[test]
    fn test_extract_filename_edge_cases() {
        assert_eq!(extract_filename("/home/user/"), "user");
        assert_eq!(extract_filename(""), "Unknown");
        assert_eq!(extract_filename("."), "Unknown");
        assert_eq!(extract_filename("/"), "Unknown");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_bold_wraps_selection() {
        let (out, cursor) = run("make this bold", 5..9, FormatAction::Bold);
        assert_eq!(out, "make **this** bold");
        assert_eq!(cursor, 13);
    }

    #[test]
    fn test_wrapping_an_already_wrapped_selection_unwraps() {
        let (out, _) = run("a ~~gone~~ b", 2..10, FormatAction::Strikethrough);
        assert_eq!(out, "a gone b");
    }

    #[test]
    fn test_italic_without_selection_wraps_word_under_cursor() {
        let (out, cursor) = run("plant care", 2..2, FormatAction::Italic);
        assert_eq!(out, "*plant* care");
        assert_eq!(cursor, 7);
    }

    #[test]
    fn test_code_on_whitespace_inserts_marker_pair() {
        let (out, cursor) = run("a  b", 2..2, FormatAction::Code);
        assert_eq!(out, "a `` b");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_word_bounds_respect_multibyte_chars() {
        let (out, _) = run("полив растений", 3..3, FormatAction::Underline);
        assert_eq!(out, "_полив_ растений");
    }

    #[test]
    fn test_quote_toggles() {
        let (out, cursor) = run("one\ntwo", 5..5, FormatAction::Quote);
        assert_eq!(out, "one\n> two");
        assert_eq!(cursor, 7);

        let (out, _) = run(&out, 7..7, FormatAction::Quote);
        assert_eq!(out, "one\ntwo");
    }

    #[test]
    fn test_header_on_blank_line_inserts_marker() {
        let (out, cursor) = run("intro\n\nrest", 6..6, FormatAction::Header(2));
        assert_eq!(out, "intro\n## \nrest");
        assert_eq!(cursor, 9);
    }

    #[test]
    fn test_header_same_level_removes_marker() {
        let (out, _) = run("## Watering", 4..4, FormatAction::Header(2));
        assert_eq!(out, "Watering");
    }

    #[test]
    fn test_header_replaces_other_level() {
        let (out, _) = run("# Watering\nbody", 3..3, FormatAction::Header(3));
        assert_eq!(out, "### Watering\nbody");

        let (out, _) = run("Watering", 0..0, FormatAction::Header(1));
        assert_eq!(out, "# Watering");
    }

    #[test]
    fn test_header_level_is_clamped() {
        let (out, _) = run("Title", 0..0, FormatAction::Header(9));
        assert_eq!(out, "###### Title");
    }

    #[test]
    fn test_list_item_prefixes_line() {
        let edit = insert_list_item("a\nwater daily", 4);
        let mut out = "a\nwater daily".to_string();
        edit.apply(&mut out);
        assert_eq!(out, "a\n- water daily");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn test_image_link_inside_project() {
        let link = image_link(
            &PathBuf::from("/notes/img/fern.png"),
            &PathBuf::from("/notes"),
        );
        assert_eq!(link.markdown, format!("![Image](<{}>)\n", Path::new("img/fern.png").display()));
        assert!(!link.outside_project);
    }

    #[test]
    fn test_image_link_outside_project() {
        let link = image_link(
            &PathBuf::from("/pictures/fern.png"),
            &PathBuf::from("/notes"),
        );
        assert!(link.outside_project);
        assert!(link.markdown.contains(".."));
    }

    #[test]
    fn test_line_bounds() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_bounds(text, 0), 0..3);
        assert_eq!(line_bounds(text, 5), 4..7);
        assert_eq!(line_bounds(text, text.len()), 8..13);
    }
}
