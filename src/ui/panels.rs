use chrono::{NaiveTime, Timelike};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::FilterMode;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Zoeken");
    ui.separator();

    if state.table.is_none() {
        ui.label("Geen bestand geladen.");
        return;
    }

    let mut changed = false;

    // ---- Free text ----
    ui.strong("Zoek op titel of artiest");
    changed |= ui
        .text_edit_singleline(&mut state.session.search_text)
        .changed();
    let searching = !state.session.search_text.trim().is_empty();
    if searching {
        ui.label(RichText::new("Zoekt in alle dagen en tijdsvakken.").italics());
    }
    ui.separator();

    ui.add_enabled_ui(!searching, |ui: &mut Ui| {
        changed |= date_picker(ui, state);
        ui.separator();

        // ---- View mode ----
        ui.strong("Weergave");
        for mode in FilterMode::ALL {
            changed |= ui
                .radio_value(&mut state.session.mode, mode, mode.label())
                .changed();
        }
        ui.separator();

        match state.session.mode {
            FilterMode::Date => {}
            FilterMode::Slot => changed |= slot_picker(ui, state),
            FilterMode::UpcomingHour | FilterMode::UpcomingSlot => {
                changed |= reference_time(ui, state)
            }
        }
    });

    ui.separator();
    if ui.button("Reset").clicked() {
        state.reset();
        return;
    }

    if changed {
        state.session_changed();
    }
}

fn date_picker(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.strong("Datum");
    let (Some(&first), Some(&last)) = (state.dates.first(), state.dates.last()) else {
        ui.label("Geen geldige datums in het bestand.");
        return false;
    };

    let current = state.session.selected_date.unwrap_or(first);
    let mut picked = current;
    let position = state.dates.iter().position(|d| *d == current);

    ui.horizontal(|ui: &mut Ui| {
        let prev = match position {
            Some(i) => i.checked_sub(1).map(|i| state.dates[i]),
            None => state.dates.iter().rev().find(|d| **d < current).copied(),
        };
        if ui.add_enabled(prev.is_some(), egui::Button::new("◀")).clicked() {
            picked = prev.unwrap_or(current);
        }

        ui.add(DatePickerButton::new(&mut picked).id_salt("selected_date"));

        let next = match position {
            Some(i) => state.dates.get(i + 1).copied(),
            None => state.dates.iter().find(|d| **d > current).copied(),
        };
        if ui.add_enabled(next.is_some(), egui::Button::new("▶")).clicked() {
            picked = next.unwrap_or(current);
        }
    });
    ui.label(format!(
        "{} t/m {}",
        first.format("%d-%m-%Y"),
        last.format("%d-%m-%Y")
    ));

    if picked != current || state.session.selected_date.is_none() {
        state.session.selected_date = Some(picked);
        state.session.selected_slot = None;
        return true;
    }
    false
}

fn slot_picker(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.strong("Tijdsvak");
    if state.slots.is_empty() {
        ui.label("Geen tijdsvakken op deze datum.");
        return false;
    }

    let before = state.session.selected_slot.clone();
    let selected_text = before.clone().unwrap_or_else(|| "Kies een tijdsvak".to_string());
    egui::ComboBox::from_id_salt("selected_slot")
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            for slot in &state.slots {
                ui.selectable_value(&mut state.session.selected_slot, Some(slot.clone()), slot);
            }
        });
    state.session.selected_slot != before
}

fn reference_time(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.strong("Vanaf");
    let mut use_now = state.session.reference_time.is_none();
    let mut changed = false;

    if ui.checkbox(&mut use_now, "Nu").changed() {
        state.session.reference_time = if use_now {
            None
        } else {
            let now = chrono::Local::now().time();
            NaiveTime::from_hms_opt(now.hour(), 0, 0)
        };
        changed = true;
    }

    if let Some(time) = state.session.reference_time {
        let mut hour = time.hour();
        let mut minute = time.minute();
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui.add(egui::DragValue::new(&mut hour).range(0..=23)).changed();
            ui.label(":");
            changed |= ui.add(egui::DragValue::new(&mut minute).range(0..=59)).changed();
        });
        state.session.reference_time = NaiveTime::from_hms_opt(hour, minute, 0).or(Some(time));
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Bestand", |ui: &mut Ui| {
            if ui.button("Openen…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Opnieuw laden").clicked() {
                state.cache.invalidate();
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if state.table.is_some() {
            ui.label(format!("Aantal resultaten: {}", state.outcome.count));
            ui.separator();
            ui.label(state.source().display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Top 2000 data")
        .add_filter("Supported files", &["csv", "txt"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open(path);
    }
}
