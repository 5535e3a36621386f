use super::CellValue;
use crate::pipeline::VideoRecord;

#[derive(Debug)]
pub struct ColumnDef {
    /// Machine name, used as the CSV header and the JSON key.
    pub name: &'static str,

    /// Human-facing header for the console and spreadsheets.
    pub header: &'static str,

    /// What the column holds, listed on the spreadsheet's Columns sheet.
    pub description: &'static str,
    pub extractor: fn(&VideoRecord) -> CellValue<'_>,
}

macro_rules! column_def {
    ($name:expr, $header:expr, $description:expr, $extractor:expr) => {
        ColumnDef {
            name: $name,
            header: $header,
            description: $description,
            extractor: $extractor,
        }
    };
}

pub const COLUMN_DEFINITIONS: &[ColumnDef] = &[
    column_def!("title", "Title", "Video title as published", |r| CellValue::Text(r.title())),
    column_def!("channel", "Channel", "Name of the publishing channel", |r| CellValue::Text(r.channel())),
    column_def!("published", "Published", "Publication date (UTC)", |r| CellValue::Date(r.published())),
    column_def!("views", "Views", "Total view count", |r| CellValue::UInt(r.views())),
    column_def!("likes", "Likes", "Total like count", |r| CellValue::UInt(r.likes())),
    column_def!("comments", "Comments", "Total comment count", |r| CellValue::UInt(r.comments())),
    column_def!("views_per_day", "Views/Day", "Average views per day since publication", |r| {
        CellValue::Float(r.views_per_day())
    }),
];
