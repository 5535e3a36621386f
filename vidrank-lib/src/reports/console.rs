use super::{ReportableRun, common};
use crate::Result;
use crate::analysis::Suggestions;
use crate::columns::{COLUMN_DEFINITIONS, CellValue, cells};
use crate::pipeline::VideoRecord;
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

const TITLE_COLUMN: &str = "title";
const MIN_TITLE_WIDTH: usize = 20;
const COLUMN_GAP: &str = "  ";

pub fn generate<W: Write>(run: &ReportableRun, use_colors: bool, writer: &mut W) -> Result<()> {
    generate_with_width(run, use_colors, get_terminal_width(), writer)
}

pub fn generate_with_width<W: Write>(run: &ReportableRun, use_colors: bool, width: usize, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", heading(&format!("Videos for {}", run.target), use_colors))?;
    writeln!(writer, "Evaluated at {}", run.evaluated_at.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(writer)?;

    let Some(summary) = run.summary.metrics() else {
        writeln!(writer, "No videos found.")?;
        return Ok(());
    };

    writeln!(writer, "{}", heading("Summary", use_colors))?;
    let lines = [
        ("Average views", common::format_whole(summary.mean_views())),
        ("Average views/day", common::format_whole(summary.mean_views_per_day())),
        ("Oldest video", format!("{} days", common::format_thousands(summary.max_days_old()))),
        ("Videos", summary.count().to_string()),
    ];

    write_labeled(&lines, use_colors, writer)?;

    writeln!(writer)?;
    write_table(&run.records, use_colors, width, writer)?;

    if let Some(sentiment) = &run.sentiment {
        writeln!(writer)?;
        writeln!(writer, "{}", heading("Title sentiment", use_colors))?;

        let mut lines = vec![
            ("Average polarity".to_string(), format!("{:.2}", sentiment.mean)),
            (
                "Tone".to_string(),
                format!(
                    "{} positive, {} neutral, {} negative",
                    sentiment.positive, sentiment.neutral, sentiment.negative
                ),
            ),
        ];

        for bucket in &sentiment.buckets {
            let close = if bucket.upper >= 1.0 { ']' } else { ')' };
            lines.push((format!("[{:>4.1}, {:>4.1}{close}", bucket.lower, bucket.upper), bucket.count.to_string()));
        }

        write_labeled(&lines, use_colors, writer)?;
    }

    if !run.top_words.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", heading("Top title words", use_colors))?;

        let text = run
            .top_words
            .iter()
            .map(|w| format!("{} ({})", w.word, w.count))
            .collect::<Vec<_>>()
            .join(", ");

        for line in wrap_text(&text, width, 2) {
            writeln!(writer, "{line}")?;
        }
    }

    Ok(())
}

/// Render model suggestions, produced after the main report.
pub fn generate_suggestions<W: Write>(suggestions: &Suggestions, use_colors: bool, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", heading("Suggested titles", use_colors))?;
    write_indented(&suggestions.titles, writer)?;
    writeln!(writer)?;
    writeln!(writer, "{}", heading("Tags and content strategy", use_colors))?;
    write_indented(&suggestions.strategy, writer)?;
    Ok(())
}

fn write_labeled<W: Write, L: AsRef<str>>(lines: &[(L, String)], use_colors: bool, writer: &mut W) -> Result<()> {
    let label_width = lines.iter().map(|(label, _)| label.as_ref().chars().count()).max().unwrap_or(0);
    for (label, value) in lines {
        let label = label.as_ref();
        if use_colors {
            writeln!(writer, "  {label:<label_width$} : {}", value.cyan())?;
        } else {
            writeln!(writer, "  {label:<label_width$} : {value}")?;
        }
    }
    Ok(())
}

fn write_table<W: Write>(records: &[VideoRecord], use_colors: bool, width: usize, writer: &mut W) -> Result<()> {
    let rows: Vec<Vec<(String, bool)>> = records
        .iter()
        .map(|r| cells(r).map(|(_, v)| (common::format_cell(&v), is_numeric(&v))).collect())
        .collect();

    let right_aligned: Vec<bool> = rows
        .first()
        .map_or_else(|| vec![false; COLUMN_DEFINITIONS.len()], |row| row.iter().map(|(_, numeric)| *numeric).collect());

    let mut widths: Vec<usize> = COLUMN_DEFINITIONS.iter().map(|c| c.header.chars().count()).collect();
    for row in &rows {
        for (w, (text, _)) in widths.iter_mut().zip(row) {
            *w = (*w).max(text.chars().count());
        }
    }

    let index_width = records.len().to_string().len();

    // The title column absorbs whatever the terminal cannot fit
    if let Some(title_index) = COLUMN_DEFINITIONS.iter().position(|c| c.name == TITLE_COLUMN) {
        let fixed: usize = index_width
            + widths
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != title_index)
                .map(|(_, w)| *w)
                .sum::<usize>()
            + COLUMN_GAP.len() * widths.len();

        let available = width.saturating_sub(fixed).max(MIN_TITLE_WIDTH);
        widths[title_index] = widths[title_index].min(available);
    }

    let mut header = format!("{:>index_width$}", "#");
    for ((def, w), right) in COLUMN_DEFINITIONS.iter().zip(&widths).zip(&right_aligned) {
        header.push_str(COLUMN_GAP);
        header.push_str(&pad(def.header, *w, *right));
    }

    if use_colors {
        writeln!(writer, "{}", header.bold())?;
    } else {
        writeln!(writer, "{header}")?;
    }

    for (index, row) in rows.iter().enumerate() {
        write!(writer, "{:>index_width$}", index + 1)?;
        for ((text, right), w) in row.iter().zip(&widths) {
            write!(writer, "{COLUMN_GAP}{}", pad(&common::truncate(text, *w), *w, *right))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

const fn is_numeric(value: &CellValue<'_>) -> bool {
    matches!(value, CellValue::UInt(_) | CellValue::Float(_))
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn write_indented<W: Write>(text: &str, writer: &mut W) -> Result<()> {
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            writeln!(writer)?;
        } else {
            writeln!(writer, "  {line}")?;
        }
    }
    Ok(())
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| w as usize)
}

/// Word-wrap text to fit within a given width, indenting every line
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    let prefix = " ".repeat(indent);
    if width <= indent {
        // Not enough space, return single line
        return vec![format!("{prefix}{text}")];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let separator_len = usize::from(!current_line.is_empty());
        if !current_line.is_empty() && indent + current_line.chars().count() + separator_len + word.chars().count() > width {
            lines.push(format!("{prefix}{current_line}"));
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        lines.push(format!("{prefix}{current_line}"));
    }

    lines
}
