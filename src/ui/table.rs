use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Result table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered rows in the central panel.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open een bestand om te zoeken  (Bestand → Openen…)");
        });
        return;
    }

    let table = &state.outcome.table;
    if table.is_empty() {
        ui.label(empty_hint(state));
        return;
    }

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(32.0))
            .columns(Column::auto().at_least(60.0).clip(true), table.columns.len())
            .min_scrolled_height(0.0)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for name in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let index = row.index();
                    let cells = &table.rows[index].cells;
                    row.col(|ui: &mut Ui| {
                        ui.label(index.to_string());
                    });
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

fn empty_hint(state: &AppState) -> &'static str {
    use crate::data::filter::FilterMode;

    if !state.session.search_text.trim().is_empty() {
        return "Geen resultaten voor deze zoekterm.";
    }
    match state.session.mode {
        FilterMode::Slot if state.session.selected_slot.is_none() => "Kies een tijdsvak.",
        FilterMode::UpcomingHour | FilterMode::UpcomingSlot => "Niets gepland in het komende uur.",
        _ => "Geen resultaten.",
    }
}
