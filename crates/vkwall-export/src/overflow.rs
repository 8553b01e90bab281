//! Long-text handling for spreadsheet cells.
//!
//! A cell holds at most [`MAX_CELL_CHARS`] characters. Longer post texts are
//! cut, and the untruncated text is written next to the report so nothing is
//! lost.

use std::fs;
use std::io;
use std::path::Path;

use vkwall_core::Post;

/// Largest text a single cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Appended to the kept part of an oversized text.
const ELLIPSIS: &str = "...";

/// Directory, relative to the report, holding untruncated texts.
pub const FULL_TEXT_DIR: &str = "full_texts";

/// The text to put in a post's cell.
///
/// Texts within [`MAX_CELL_CHARS`] pass through unchanged. For longer texts
/// the full text is written to `{output_dir}/full_texts/post_{post_id}.txt`
/// and the cell holds as much of the text as fits together with `"..."` and
/// a note naming that file, or noting the failure if it could not be written.
/// The result never exceeds [`MAX_CELL_CHARS`].
pub(crate) fn cell_text(post: &Post, output_dir: &Path) -> String {
    if post.text.chars().count() <= MAX_CELL_CHARS {
        return post.text.clone();
    }

    let file_name = full_text_file_name(&post.post_id);
    let note = match write_full_text(&output_dir.join(FULL_TEXT_DIR), &file_name, &post.text) {
        Ok(()) => {
            tracing::warn!(post_id = %post.post_id, file = %file_name, "post text too long for a cell; full text saved to file");
            format!(" [full text in file: {file_name}]")
        }
        Err(e) => {
            tracing::error!(post_id = %post.post_id, error = %e, "failed to save full post text");
            " [failed to save full text]".to_owned()
        }
    };

    let keep = MAX_CELL_CHARS.saturating_sub(ELLIPSIS.len() + note.chars().count());
    let mut display: String = post.text.chars().take(keep).collect();
    display.push_str(ELLIPSIS);
    display.push_str(&note);
    display
}

fn full_text_file_name(post_id: &str) -> String {
    let safe: String = post_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("post_{safe}.txt")
}

fn write_full_text(dir: &Path, file_name: &str, text: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(file_name), text)
}
