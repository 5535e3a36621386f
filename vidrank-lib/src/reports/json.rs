use super::{ReportableRun, common};
use crate::Result;
use crate::columns::{CellValue, cells};
use crate::pipeline::VideoRecord;
use core::fmt::Write;
use serde_json::json;

pub fn generate<W: Write>(run: &ReportableRun, writer: &mut W) -> Result<()> {
    let summary = run.summary.metrics().map_or(serde_json::Value::Null, |s| {
        let mut summary = json!({
            "mean_views": s.mean_views(),
            "mean_views_per_day": s.mean_views_per_day(),
            "max_days_old": s.max_days_old(),
            "count": s.count(),
        });

        if let Some(sentiment) = &run.sentiment {
            summary["sentiment"] = json!(sentiment);
        }

        summary
    });

    let videos: Vec<_> = run
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| video_to_json(record, run.polarity(index)))
        .collect();

    let excluded: Vec<_> = run
        .exclusions
        .iter()
        .map(|e| {
            let mut entry = json!({ "id": e.id, "reason": e.reason.to_string() });
            if let Some(error) = e.error() {
                entry["error"] = json!(error.to_string());
            }
            entry
        })
        .collect();

    let output = json!({
        "query": run.target.value(),
        "mode": run.target.mode(),
        "evaluated_at": run.evaluated_at.to_rfc3339(),
        "summary": summary,
        "videos": videos,
        "excluded": excluded,
        "top_words": run.top_words,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(unused_results, reason = "Map::insert intentionally overwrites values")]
fn video_to_json(record: &VideoRecord, polarity: Option<f64>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("id".to_string(), json!(record.id()));

    for (def, value) in cells(record) {
        obj.insert(def.name.to_string(), cell_to_json(&value));
    }

    obj.insert("days_old".to_string(), json!(record.days_old()));
    obj.insert("url".to_string(), json!(common::watch_url(record.id())));
    obj.insert("thumbnail_url".to_string(), json!(record.thumbnail_url()));

    if let Some(polarity) = polarity {
        obj.insert("sentiment".to_string(), json!(polarity));
    }

    serde_json::Value::Object(obj)
}

fn cell_to_json(value: &CellValue<'_>) -> serde_json::Value {
    match value {
        CellValue::UInt(u) => json!(u),
        CellValue::Float(f) => json!(f),
        CellValue::Text(s) => json!(s),
        CellValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
    }
}
