//! Loading screen
//!
//! Shown full-screen once onboarding is out of the way. Besides the spinner it
//! surfaces what the bootstrap did: the seeded preferences and the storage
//! tree.

use crate::app_info::AppInfo;
use crate::defaults::DEFAULT_SETTINGS;
use crate::directories::{storage_path, BootstrapReport, StorageCategory};
use crate::preferences::{PreferenceStore, PreferenceValue};
use crate::room::RoomState;
use egui::{Color32, RichText};
use std::path::Path;

pub struct LoadingView<'a> {
    pub app_info: &'a AppInfo,
    pub tint: Color32,
    pub paused: bool,
    pub room_state: Option<RoomState>,
    pub preferences: &'a dyn PreferenceStore,
    pub storage: Option<&'a BootstrapReport>,
    pub documents_root: &'a Path,
}

fn format_value(value: Option<PreferenceValue>) -> String {
    match value {
        Some(PreferenceValue::Bool(b)) => (if b { "On" } else { "Off" }).to_string(),
        Some(PreferenceValue::Int(n)) => n.to_string(),
        None => "unset".to_string(),
    }
}

fn storage_status(
    report: Option<&BootstrapReport>,
    category: StorageCategory,
) -> (&'static str, Color32) {
    let Some(report) = report else {
        return ("pending", Color32::GRAY);
    };
    if report.created.contains(&category) {
        ("created", Color32::from_rgb(100, 200, 100))
    } else if report.existing.contains(&category) {
        ("ok", Color32::from_rgb(100, 200, 100))
    } else {
        ("failed", Color32::from_rgb(255, 59, 48))
    }
}

pub fn show(ctx: &egui::Context, view: &LoadingView<'_>) {
    egui::TopBottomPanel::bottom("status_bar")
        .exact_height(24.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                if view.paused {
                    ui.colored_label(Color32::from_rgb(255, 180, 0), "⏸ PAUSED");
                } else {
                    ui.colored_label(Color32::from_rgb(100, 200, 100), "▶ READY");
                }
                ui.separator();
                match view.room_state {
                    Some(state) => ui.label(format!("Room: {}", state.label())),
                    None => ui.label("Room: offline"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(view.app_info.caption());
                });
            });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.heading(RichText::new("Limón").size(40.0).color(view.tint));
            ui.add_space(16.0);
            ui.add(egui::Spinner::new().size(32.0).color(view.tint));
            ui.add_space(8.0);
            ui.label(RichText::new("Loading library…").weak());
            ui.add_space(24.0);
        });

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::CollapsingHeader::new("Preferences")
                .default_open(false)
                .show(ui, |ui| {
                    egui::Grid::new("preferences_grid")
                        .num_columns(3)
                        .striped(true)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            for setting in DEFAULT_SETTINGS {
                                ui.label(RichText::new(setting.category.label()).weak());
                                ui.label(setting.key);
                                ui.label(format_value(view.preferences.value(setting.key)));
                                ui.end_row();
                            }
                        });
                });

            egui::CollapsingHeader::new("Storage")
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(RichText::new(view.documents_root.display().to_string()).monospace());
                    egui::Grid::new("storage_grid")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for category in StorageCategory::ALL {
                                let (status, color) = storage_status(view.storage, category);
                                ui.label(
                                    storage_path(view.documents_root, category)
                                        .display()
                                        .to_string(),
                                );
                                ui.colored_label(color, status);
                                ui.end_row();
                            }
                        });
                });
        });
    });
}
