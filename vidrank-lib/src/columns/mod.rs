//! The tabular export columns
//!
//! Every report walks [`COLUMN_DEFINITIONS`] to lay out a [`VideoRecord`], so the column set
//! and its order are defined exactly once. The order is fixed:
//! `title, channel, published, views, likes, comments, views_per_day`.

mod cell_value;
mod column_def;

pub use cell_value::CellValue;
pub use column_def::{COLUMN_DEFINITIONS, ColumnDef};

use crate::pipeline::VideoRecord;

/// Extract every column of `record`, in column order.
pub fn cells(record: &VideoRecord) -> impl Iterator<Item = (&'static ColumnDef, CellValue<'_>)> {
    COLUMN_DEFINITIONS.iter().map(move |def| (def, (def.extractor)(record)))
}
