use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::view::JobState;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Colors a job state the way the web page does.
pub fn job_state_cell(state: JobState) -> Cell {
    let color = match state {
        JobState::Queued => TableColor::Blue,
        JobState::Running | JobState::Succeeded => TableColor::Green,
        JobState::Failed => TableColor::Red,
    };
    let cell = Cell::new(state.label()).fg(color);
    if state.is_complete() {
        cell.add_attribute(comfy_table::Attribute::Bold)
    } else {
        cell
    }
}
