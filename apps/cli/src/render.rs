//! Terminal rendering of schemas, previews and training results.

use colored::Colorize;
use comfy_table::{Cell, Color as ComfyColor, Table};
use foresight_training::{Dataset, EpochRow, FieldSpec, ModelFamily, ResultView};
use serde_json::Value;

fn fixed4(value: f64) -> String {
    format!("{:.4}", value)
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells.iter().map(|title| Cell::new(title).fg(ComfyColor::Cyan)).collect()
}

fn bound(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Field table for one family, common fields first.
pub fn schema_table(fields: &[&FieldSpec]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["Name", "Label", "Type", "Min", "Max", "Step", "Default"]));

    for field in fields {
        let kind = match field.choices() {
            Some(values) => format!("{} ({})", field.kind.as_str(), values.join(", ")),
            None => field.kind.as_str().to_string(),
        };
        table.add_row(vec![
            Cell::new(field.name).fg(ComfyColor::Yellow),
            Cell::new(field.label),
            Cell::new(kind),
            Cell::new(bound(field.min)),
            Cell::new(bound(field.max)),
            Cell::new(bound(field.step)),
            Cell::new(field.default),
        ]);
    }
    table
}

pub fn print_schema(family: ModelFamily, fields: &[&FieldSpec]) {
    println!();
    println!("{}", format!("{} ({})", family.label(), family.as_str()).bold().cyan());
    println!("{}", schema_table(fields));
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Preview rows laid out under the dataset's columns.
pub fn preview_table(dataset: &Dataset) -> Table {
    let mut table = Table::new();
    let titles: Vec<&str> = dataset.columns().iter().map(String::as_str).collect();
    table.set_header(header(&titles));

    for row in dataset.preview_rows() {
        table.add_row(dataset.columns().iter().map(|column| row.get(column).map(cell_text).unwrap_or_default()));
    }
    table
}

pub fn print_dataset(dataset: &Dataset, target: Option<&str>) {
    println!();
    println!("{} {}", "Dataset:".bold().cyan(), dataset.identifier());
    if let (Some(rows), Some(columns)) = (dataset.row_count(), dataset.column_count()) {
        println!("{} {} rows x {} columns", "Shape:".bold(), rows, columns);
    }
    println!("{} {}", "Columns:".bold(), dataset.columns().join(", "));
    if let Some(target) = target {
        println!("{} {}", "Target:".bold(), target);
    }
    if dataset.preview().is_some() {
        println!("{}", preview_table(dataset));
    } else {
        println!("{}", "No preview available.".yellow());
    }
}

/// Label and formatted value for every metric the view carries, in display order.
pub fn metric_lines(view: &ResultView) -> Vec<(&'static str, String)> {
    let mut lines = vec![("MSE", fixed4(view.mse)), ("RMSE", fixed4(view.rmse))];
    if let Some(aic) = view.aic {
        lines.push(("AIC", fixed4(aic)));
    }
    if let Some(mape) = view.mape {
        lines.push(("MAPE", format!("{}%", fixed4(mape))));
    }
    if let Some(secs) = view.training_time {
        lines.push(("Training Time", format!("{:.2} seconds", secs)));
    }
    lines
}

pub fn history_table(rows: &[EpochRow]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["Epoch", "Training Loss", "Validation Loss"]));
    for row in rows {
        table.add_row(vec![
            row.epoch.to_string(),
            fixed4(row.loss),
            row.validation_loss.map(fixed4).unwrap_or_default(),
        ]);
    }
    table
}

pub fn print_result(view: &ResultView) {
    println!();
    println!("{}", format!("Results: {}", view.family.label()).bold().cyan());
    for (label, value) in metric_lines(view) {
        println!("  {} {}", format!("{}:", label).bold(), value);
    }
    if let Some(rows) = &view.history {
        println!();
        println!("{}", "Training History".bold());
        println!("{}", history_table(rows));
    }
    if let Some(note) = view.completion_note() {
        println!();
        println!("{}", note.green());
    }
}
