//! What's New dialog

use crate::onboarding::{WhatsNewAction, WhatsNewContent};
use egui::{Color32, RichText, Vec2};

const SYSTEM_RED: Color32 = Color32::from_rgb(255, 59, 48);

fn symbol_glyph(symbol: &str) -> &'static str {
    match symbol {
        "app.badge.fill" => "🆕",
        "ladybug.fill" => "🐞",
        "car.rear.and.tire.marks" => "🚗",
        _ => "•",
    }
}

/// Draw the dialog; returns the button pressed this frame, if any
pub fn show(
    ctx: &egui::Context,
    content: &WhatsNewContent,
    tint: Color32,
) -> Option<WhatsNewAction> {
    let mut chosen = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(32.0);
            ui.label(RichText::new(symbol_glyph(content.symbol)).size(48.0).color(tint));
            ui.heading(RichText::new(content.title).size(32.0).strong());
            ui.add_space(8.0);
            ui.label(content.detail);
            ui.add_space(24.0);
        });

        for item in &content.items {
            ui.horizontal(|ui| {
                ui.label(RichText::new(symbol_glyph(item.symbol)).size(24.0).color(tint));
                ui.vertical(|ui| {
                    ui.label(RichText::new(item.title).strong());
                    ui.label(RichText::new(item.description).weak());
                });
            });
            ui.add_space(12.0);
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.add_space(16.0);
            ui.small(content.caption.as_str());
            ui.add_space(8.0);

            // Laid out bottom-up, so the secondary action goes first
            for action in content.actions.iter().rev() {
                let button = match action {
                    WhatsNewAction::Acknowledge => egui::Button::new(
                        RichText::new(action.title()).strong().color(Color32::BLACK),
                    )
                    .fill(tint)
                    .min_size(Vec2::new(280.0, 44.0)),
                    WhatsNewAction::DontShowAgain => {
                        egui::Button::new(RichText::new(action.title()).strong().color(SYSTEM_RED))
                            .frame(false)
                            .min_size(Vec2::new(280.0, 44.0))
                    }
                };
                if ui.add(button).clicked() {
                    chosen = Some(*action);
                }
            }
        });
    });

    chosen
}
