//! Plain-text rendering of the page: error banner, person table, details.

use owo_colors::OwoColorize;
use person_core::{FieldError, Person};

const HEADERS: [&str; 4] = ["Name", "Email", "Phone", "Id"];
const EMPTY: &str = "No persons registered";

pub fn table(persons: &[Person]) -> String {
    if persons.is_empty() {
        return format!("{EMPTY}\n");
    }

    let rows: Vec<[String; 4]> = persons
        .iter()
        .map(|p| {
            [
                p.full_name.clone(),
                p.email.clone(),
                p.phone_number.clone(),
                p.id.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    push_row(&mut out, &widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell}{}", " ".repeat(width - cell.chars().count())))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// The dismissible error banner, or `None` when there is nothing to show.
pub fn banner(error: Option<&str>, field_errors: &[FieldError], color: bool) -> Option<String> {
    let message = error?;
    let mut out = format!("! {message}\n");
    for fe in field_errors {
        out.push_str(&format!("  - {}: {}\n", fe.field, fe.message));
    }
    if color {
        out = out.red().to_string();
    }
    Some(out)
}

pub fn details(person: &Person) -> String {
    let mut out = format!(
        "Id:        {}\nFull name: {}\nEmail:     {}\nPhone:     {}\n",
        person.id, person.full_name, person.email, person.phone_number
    );
    if let Some(created) = person.created_at {
        out.push_str(&format!("Created:   {}\n", created.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(updated) = person.updated_at {
        out.push_str(&format!("Updated:   {}\n", updated.format("%Y-%m-%d %H:%M:%S")));
    }
    out
}
