//! Plain-text rendering of classified responses and the conversation log.

use crate::classify::display_value;
use crate::models::{BotContent, ConversationEntry, FeatureSection, HoursRow, TableRow};

const HOURS_HEADER: [&str; 2] = ["Platform", "Hours"];
const SUB_FEATURE_HEADER: [&str; 6] = [
    "Sub-feature",
    "Android Hours",
    "iOS Hours",
    "API Hours",
    "Website Hours",
    "Hourly Rate",
];

/// Render classified content.
///
/// Example output for an hours table:
/// ```text
/// +----------+-------+
/// | Platform | Hours |
/// +----------+-------+
/// | Cpu      | 3     |
/// | Gpu      | 5     |
/// +----------+-------+
/// ```
pub fn render_content(content: &BotContent) -> String {
    match content {
        BotContent::Text { text } => format!("{}\n", text),
        BotContent::Hours { rows } => render_hours(rows),
        BotContent::Features { sections } => {
            let mut output = String::new();
            for section in sections {
                render_section(&mut output, section);
            }
            output
        }
    }
}

fn render_section(output: &mut String, section: &FeatureSection) {
    let title = section.name.as_ref().map(display_value).unwrap_or_default();
    output.push_str(&title);
    output.push('\n');
    output.push_str(&render_hours(&section.rows));
}

fn render_hours(rows: &[HoursRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| vec![row.platform.clone(), display_value(&row.hours)])
        .collect();
    render_table(&HOURS_HEADER, &cells)
}

/// Render sub-feature rows. Empty input renders nothing.
pub fn render_sub_features(rows: &[TableRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            [
                &row.sub_feature_name,
                &row.android_hours,
                &row.ios_hours,
                &row.api_hours,
                &row.website_hours,
                &row.hourly_rate,
            ]
            .into_iter()
            .map(display_value)
            .collect()
        })
        .collect();
    render_table(&SUB_FEATURE_HEADER, &cells)
}

/// Render one entry, prefixed with its avatar label.
pub fn render_entry(entry: &ConversationEntry) -> String {
    let mut body = render_content(&entry.content);
    body.push_str(&render_sub_features(&entry.table_data));
    if let Some(ref contact) = entry.contact_details {
        body.push_str(contact);
        body.push('\n');
    }

    let label = format!("[{}] ", entry.role.avatar());
    let indent = " ".repeat(label.len());
    let mut output = String::new();
    for (i, line) in body.lines().enumerate() {
        let prefix = if i == 0 { &label } else { &indent };
        output.push_str(format!("{}{}", prefix, line).trim_end());
        output.push('\n');
    }
    output
}

/// Render the whole log, one blank line between entries.
pub fn render_history(history: &[ConversationEntry]) -> String {
    history
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table<const N: usize>(header: &[&str; N], rows: &[Vec<String>]) -> String {
    let mut widths: [usize; N] = header.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };

    let mut output = separator.clone();
    push_row(&mut output, header.iter().copied(), &widths);
    output.push_str(&separator);
    for row in rows {
        push_row(&mut output, row.iter().map(String::as_str), &widths);
    }
    output.push_str(&separator);
    output
}

fn push_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    output.push('|');
    for (cell, width) in cells.zip(widths) {
        let pad = width - cell.chars().count();
        output.push(' ');
        output.push_str(cell);
        output.push_str(&" ".repeat(pad + 1));
        output.push('|');
    }
    output.push('\n');
}
