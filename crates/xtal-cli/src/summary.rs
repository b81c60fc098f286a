use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use xtal_cli::pipeline::MergeReport;

pub fn print_summary(report: &MergeReport) {
    println!("Input: {}", report.input.display());
    println!("Space group: {}", report.spacegroup);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Reflections")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in summary_rows(report) {
        table.add_row(vec![Cell::new(label), value]);
    }
    println!("{table}");
}

/// Label and value cell for each summary line, in display order.
fn summary_rows(report: &MergeReport) -> Vec<(&'static str, Cell)> {
    let merged_label = if report.plus_minus {
        "Unique I(+)/I(-)"
    } else {
        "Unique reflections"
    };
    vec![
        ("Rows read", Cell::new(report.ingest.total)),
        ("Accepted", Cell::new(report.ingest.accepted)),
        ("Rejected", count_cell(report.ingest.rejected(), Color::Yellow)),
        ("Absences removed", count_cell(report.merge.absences_removed, Color::Yellow)),
        (
            merged_label,
            Cell::new(report.merge.merged)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ),
        (
            "Multiplicity",
            Cell::new(format!("{:.2}", report.merge.multiplicity())),
        ),
        ("Resolution (A)", resolution_cell(report.resolution)),
    ]
}

fn resolution_cell(range: Option<(f64, f64)>) -> Cell {
    match range {
        Some(range) => Cell::new(format_resolution(range)),
        None => dim_cell("-"),
    }
}

fn format_resolution((d_max, d_min): (f64, f64)) -> String {
    if d_max.is_infinite() {
        format!("inf - {d_min:.2}")
    } else {
        format!("{d_max:.2} - {d_min:.2}")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
