use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use ucu_cli::commands::SavedPage;
use ucu_filters::{FilterKey, FilterOptions};

pub fn print_page(saved: &SavedPage) {
    println!("Page: {}", saved.page);
    if let Some(saved_at) = saved.saved_at {
        println!("Saved: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Tab: {}", saved.state.active_tab.as_deref().unwrap_or("-"));
    println!("Drilldown: {}", saved.state.drilldown.as_deref().unwrap_or("-"));
    if !saved.state.search_term.is_empty() {
        println!("Search: {}", saved.state.search_term);
    }

    if saved.state.filters.is_empty() {
        println!("No filters set.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Filter"), header_cell("Key"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (key, value) in &saved.state.filters {
        table.add_row(vec![
            Cell::new(key.label()),
            dim_cell(key.as_str()),
            Cell::new(value),
        ]);
    }
    println!("{table}");
}

pub fn print_pages(pages: &[String]) {
    if pages.is_empty() {
        println!("No saved pages.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Page")]);
    apply_table_style(&mut table);
    for page in pages {
        table.add_row(vec![page.as_str()]);
    }
    println!("{table}");
}

pub fn print_options(options: &FilterOptions, only: Option<FilterKey>) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Filter"), header_cell("Id"), header_cell("Label")]);
    apply_table_style(&mut table);
    let mut rows = 0usize;
    for (key, set) in options.iter() {
        if only.is_some_and(|only| only != key) {
            continue;
        }
        if set.is_empty() {
            table.add_row(vec![Cell::new(key.label()), dim_cell("-"), dim_cell("(none)")]);
        }
        for option in set.iter() {
            table.add_row(vec![
                Cell::new(key.label()),
                Cell::new(&option.id),
                Cell::new(&option.label),
            ]);
            rows += 1;
        }
    }
    println!("{table}");
    println!("{rows} options");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
