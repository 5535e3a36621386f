use chrono::NaiveDate;
use core::fmt::{Display, Formatter};

/// A single typed cell of the tabular export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    UInt(u64),
    Float(f64),
    Text(&'a str),
    Date(NaiveDate),
}

impl Display for CellValue<'_> {
    /// Plain rendering, with floats at round-trip precision.
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
