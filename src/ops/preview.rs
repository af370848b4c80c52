/// Placeholder shown for an idea without content
pub const NO_CONTENT: &str = "(No content)";

const PREVIEW_LINES: usize = 2;
const PREVIEW_MAX_CHARS: usize = 150;
const PREVIEW_CUT_CHARS: usize = 145;

/// One-line preview of an idea's content for list rows: the first two lines
/// joined by a space, cut to 145 characters plus `...` when longer than 150.
pub fn get_preview(content: Option<&str>) -> String {
    let content = match content {
        Some(c) if !c.is_empty() => c,
        _ => return NO_CONTENT.to_string(),
    };

    let preview = content
        .split('\n')
        .take(PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join(" ");

    if preview.chars().count() > PREVIEW_MAX_CHARS {
        let mut cut: String = preview.chars().take(PREVIEW_CUT_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        preview
    }
}
