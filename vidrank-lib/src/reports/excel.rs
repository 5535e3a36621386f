use super::{ReportableRun, common};
use crate::Result;
use crate::columns::{COLUMN_DEFINITIONS, CellValue, cells};
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;

const LINK_HEADER: &str = "Link";
const LINK_DESCRIPTION: &str = "Watch page on YouTube";

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
pub fn generate<W: Write>(run: &ReportableRun, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new().set_author("vidrank").set_title(format!("Videos for {}", run.target));
    workbook.set_properties(&properties);

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x00FE_D7AA))
        .set_align(FormatAlign::Left);
    let per_day_format = Format::new().set_num_format("#,##0.0");
    let count_format = Format::new().set_num_format("#,##0");
    let polarity_format = Format::new().set_num_format("0.00");

    let videos = workbook.add_worksheet().set_name("Videos")?;

    for (col, def) in COLUMN_DEFINITIONS.iter().enumerate() {
        videos.write_string_with_format(0, column(col), def.header, &header_format)?;
    }
    let link_col = column(COLUMN_DEFINITIONS.len());
    videos.write_string_with_format(0, link_col, LINK_HEADER, &header_format)?;

    // Keep the header row visible while scrolling
    videos.set_freeze_panes(1, 0)?;

    for (row_index, record) in run.records.iter().enumerate() {
        let row = u32::try_from(row_index + 1)?;
        for (col, (_, value)) in cells(record).enumerate() {
            write_cell(videos, row, column(col), &value, &count_format, &per_day_format)?;
        }
        videos.write_url(row, link_col, common::watch_url(record.id()).as_str())?;
    }

    videos.autofit();

    let summary = workbook.add_worksheet().set_name("Summary")?;
    let bold = Format::new().set_bold();

    summary.write_string_with_format(0, 0, "Query", &bold)?;
    summary.write_string(0, 1, run.target.value())?;
    summary.write_string_with_format(1, 0, "Mode", &bold)?;
    summary.write_string(1, 1, run.target.mode())?;
    summary.write_string_with_format(2, 0, "Evaluated at", &bold)?;
    summary.write_string(2, 1, run.evaluated_at.format("%Y-%m-%d %H:%M UTC").to_string())?;

    let mut row = 4;
    if let Some(metrics) = run.summary.metrics() {
        #[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
        let lines = [
            ("Videos", metrics.count() as f64, &count_format),
            ("Average views", metrics.mean_views(), &per_day_format),
            ("Average views/day", metrics.mean_views_per_day(), &per_day_format),
            ("Oldest video (days)", metrics.max_days_old() as f64, &count_format),
        ];

        for (label, value, format) in lines {
            summary.write_string_with_format(row, 0, label, &bold)?;
            summary.write_number_with_format(row, 1, value, format)?;
            row += 1;
        }
    } else {
        summary.write_string_with_format(row, 0, "No videos found", &bold)?;
        row += 1;
    }

    if let Some(sentiment) = &run.sentiment {
        #[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
        let lines = [
            ("Average title polarity", sentiment.mean, &polarity_format),
            ("Positive titles", sentiment.positive as f64, &count_format),
            ("Neutral titles", sentiment.neutral as f64, &count_format),
            ("Negative titles", sentiment.negative as f64, &count_format),
        ];

        row += 1;
        for (label, value, format) in lines {
            summary.write_string_with_format(row, 0, label, &bold)?;
            summary.write_number_with_format(row, 1, value, format)?;
            row += 1;
        }
    }

    if !run.exclusions.is_empty() {
        row += 1;
        summary.write_string_with_format(row, 0, "Excluded", &bold)?;
        for exclusion in &run.exclusions {
            summary.write_string(row, 1, exclusion.to_string())?;
            row += 1;
        }
    }

    summary.autofit();

    let legend = workbook.add_worksheet().set_name("Columns")?;
    legend.write_string_with_format(0, 0, "Column", &header_format)?;
    legend.write_string_with_format(0, 1, "Description", &header_format)?;
    for (index, (header, description)) in column_legend().enumerate() {
        let row = u32::try_from(index + 1)?;
        legend.write_string(row, 0, header)?;
        legend.write_string(row, 1, description)?;
    }

    legend.autofit();

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

/// Header and meaning of every column on the Videos sheet, in sheet order.
fn column_legend() -> impl Iterator<Item = (&'static str, &'static str)> {
    COLUMN_DEFINITIONS
        .iter()
        .map(|def| (def.header, def.description))
        .chain([(LINK_HEADER, LINK_DESCRIPTION)])
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue<'_>,
    count_format: &Format,
    per_day_format: &Format,
) -> Result<()> {
    match value {
        CellValue::UInt(u) => {
            worksheet.write_number_with_format(row, col, *u as f64, count_format)?;
        }
        CellValue::Float(f) => {
            worksheet.write_number_with_format(row, col, *f, per_day_format)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, *s)?;
        }
        CellValue::Date(d) => {
            worksheet.write_string(row, col, d.format("%Y-%m-%d").to_string())?;
        }
    }
    Ok(())
}

#[expect(clippy::cast_possible_truncation, reason = "Column count is a handful, far below Excel's u16 column limit")]
const fn column(index: usize) -> u16 {
    index as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::SearchTarget;
    use crate::pipeline::{Exclusion, ExclusionReason, PipelineOutput, Summary};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    #[test]
    fn test_generate_without_data() {
        let run = ReportableRun::new(
            SearchTarget::Keyword("nothing".into()),
            Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap(),
            PipelineOutput {
                records: Vec::new(),
                summary: Summary::NoData,
                exclusions: vec![Exclusion {
                    id: "x".into(),
                    reason: ExclusionReason::DuplicateIdentifier,
                }],
            },
            Vec::new(),
        );

        let mut output = Cursor::new(Vec::new());
        generate(&run, &mut output).unwrap();

        let bytes = output.into_inner();
        assert_eq!(&bytes[0..2], b"PK", "Excel file should be a valid ZIP archive");
    }

    #[test]
    fn test_column_legend_describes_every_sheet_column() {
        let legend: Vec<_> = column_legend().collect();
        assert_eq!(legend.len(), COLUMN_DEFINITIONS.len() + 1);
        assert_eq!(legend[0], ("Title", "Video title as published"));
        assert_eq!(legend[6], ("Views/Day", "Average views per day since publication"));
        assert_eq!(legend.last(), Some(&(LINK_HEADER, LINK_DESCRIPTION)));
        assert!(legend.iter().all(|(_, description)| !description.is_empty()));
    }
}
