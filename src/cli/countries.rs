use comfy_table::{Cell, Table};

use super::ui;
use crate::core::currency::{countries, currency_for_country};

/// Table of every selectable country and the currency it converts with.
pub fn countries_table() -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Country"),
        ui::header_cell("Dial code"),
        ui::header_cell("Currency"),
    ]);

    for country in countries() {
        table.add_row(vec![
            Cell::new(&country.code),
            Cell::new(&country.name),
            Cell::new(&country.dial_code),
            Cell::new(currency_for_country(&country.code).unwrap_or("N/A")),
        ]);
    }
    table
}

pub fn run() {
    println!("{}", countries_table());
}
