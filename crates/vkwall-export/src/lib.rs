//! Spreadsheet report writer for collected posts.
//!
//! Produces one `.xlsx` workbook per run with a single `Posts` sheet. Texts
//! too long for a cell are handled by [`overflow`].

pub mod overflow;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use thiserror::Error;
use vkwall_core::Post;

pub const SHEET_NAME: &str = "Posts";

pub const HEADERS: [&str; 9] = [
    "Community ID",
    "Community name",
    "Post ID",
    "Published (UTC)",
    "Text",
    "Likes",
    "Reposts",
    "Comments",
    "URL",
];

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const MAX_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("output directory {path} is not usable: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Writes `posts` to `{output_dir}/report_{YYYYmmdd_HHMMSS}.xlsx`, named
/// after the current local time, and returns the report path.
///
/// # Errors
///
/// - [`ExportError::OutputDir`] if `output_dir` cannot be created.
/// - [`ExportError::Xlsx`] if the workbook cannot be built or saved.
pub fn export_posts(posts: &[Post], output_dir: &Path) -> Result<PathBuf, ExportError> {
    export_posts_at(posts, output_dir, Local::now().naive_local())
}

/// Same as [`export_posts`] with an explicit timestamp for the file name.
///
/// # Errors
///
/// See [`export_posts`].
pub fn export_posts_at(
    posts: &[Post],
    output_dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(report_file_name(generated_at));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for (col, header) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }

    for (row, post) in (1u32..).zip(posts) {
        let text = overflow::cell_text(post, output_dir);
        write_row(worksheet, row, post, &text, &date_format)?;

        let rendered = [
            post.owner_id.to_string().len(),
            post.community_name.chars().count(),
            post.post_id.chars().count(),
            DATE_FORMAT.len(),
            text.chars().count(),
            post.like_count.to_string().len(),
            post.repost_count.to_string().len(),
            post.comment_count.to_string().len(),
            post.url.chars().count(),
        ];
        for (width, len) in widths.iter_mut().zip(rendered) {
            *width = (*width).max(len);
        }
    }

    for (col, width) in (0u16..).zip(&widths) {
        worksheet.set_column_width(col, column_width(*width))?;
    }

    workbook.save(&path)?;
    tracing::info!(path = %path.display(), posts = posts.len(), "report written");
    Ok(path)
}

#[allow(clippy::cast_precision_loss)]
fn write_row(
    worksheet: &mut Worksheet,
    row: u32,
    post: &Post,
    text: &str,
    date_format: &Format,
) -> Result<(), XlsxError> {
    worksheet.write_number(row, 0, post.owner_id as f64)?;
    worksheet.write_string(row, 1, &post.community_name)?;
    worksheet.write_string(row, 2, &post.post_id)?;
    worksheet.write_number_with_format(row, 3, excel_serial(post.published_at), date_format)?;
    worksheet.write_string(row, 4, text)?;
    worksheet.write_number(row, 5, post.like_count as f64)?;
    worksheet.write_number(row, 6, post.repost_count as f64)?;
    worksheet.write_number(row, 7, post.comment_count as f64)?;
    worksheet.write_string(row, 8, &post.url)?;
    Ok(())
}

fn report_file_name(generated_at: NaiveDateTime) -> String {
    format!("report_{}.xlsx", generated_at.format("%Y%m%d_%H%M%S"))
}

/// Widest rendered value plus padding, capped.
#[allow(clippy::cast_precision_loss)]
fn column_width(max_len: usize) -> f64 {
    (max_len + 2).min(MAX_COLUMN_WIDTH) as f64
}

/// Serial day number of 1970-01-01 in spreadsheet date arithmetic.
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;

/// Days since 1899-12-30 with the time of day as the fraction. The timezone
/// is dropped; values are UTC.
#[allow(clippy::cast_precision_loss)]
fn excel_serial(at: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_SERIAL + at.timestamp() as f64 / 86_400.0
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
