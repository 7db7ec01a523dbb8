//! Phrase-count report for the header repair pass

use crate::error::{DatasheetError, DatasheetResult};
use crate::staging::PhraseCount;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

/// Sheet holding one row per inspected text file.
pub const REPORT_SHEET: &str = "Phrases";
/// Sheet holding the generation timestamp.
pub const ABOUT_SHEET: &str = "About";

pub const REPORT_HEADERS: [&str; 4] = ["Filename", "Keyword", "Phrase", "Count"];

fn export_error(what: &str) -> impl Fn(XlsxError) -> DatasheetError + '_ {
    move |e| DatasheetError::Export(format!("Failed to write {}: {}", what, e))
}

/// Write one row per inspected text file: `Filename | Keyword | Phrase | Count`.
///
/// The table sheet holds nothing else; the timestamp goes on its own sheet.
pub fn write_phrase_report(path: &Path, counts: &[PhraseCount]) -> DatasheetResult<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(REPORT_SHEET)
        .map_err(export_error("worksheet name"))?;

    worksheet.set_column_width(0, 60).ok();
    worksheet.set_column_width(1, 14).ok();
    worksheet.set_column_width(2, 28).ok();
    worksheet.set_column_width(3, 8).ok();

    let header_format = Format::new().set_bold();
    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(export_error("header"))?;
    }

    for (i, count) in counts.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet
            .write_string(row, 0, &count.filename)
            .map_err(export_error("filename"))?;
        worksheet
            .write_string(row, 1, &count.keyword)
            .map_err(export_error("keyword"))?;
        worksheet
            .write_string(row, 2, &count.phrase)
            .map_err(export_error("phrase"))?;
        worksheet
            .write_number(row, 3, count.count as f64)
            .map_err(export_error("count"))?;
    }

    let about = workbook.add_worksheet();
    about
        .set_name(ABOUT_SHEET)
        .map_err(export_error("worksheet name"))?;
    about
        .write_string(
            0,
            0,
            format!(
                "Generated {} by laser-datasheet v{}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                env!("CARGO_PKG_VERSION")
            ),
        )
        .map_err(export_error("timestamp"))?;

    workbook
        .save(path)
        .map_err(|e| DatasheetError::Export(format!("Failed to save phrase report: {}", e)))?;

    Ok(())
}
