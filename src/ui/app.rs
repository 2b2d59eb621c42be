//! Main Limon application with egui integration
//!
//! The eframe window plays the part of the scene: it connects when the app
//! is created, reports focus and minimise changes as lifecycle callbacks,
//! and disconnects on exit.

use super::loading::{self, LoadingView};
use super::whats_new;
use crate::emulator::EmulationControl;
use crate::events::{NotificationPayload, ON_ROOM_STATE_CHANGED};
use crate::room::RoomState;
use crate::scene::{SceneActivation, SceneDelegate, Screen, Surface, Tint};
use egui::Color32;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// How often the UI wakes up to drain room events while idle
const ROOM_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn tint_color(tint: Tint) -> Color32 {
    match tint {
        Tint::SystemYellow => Color32::from_rgb(255, 204, 0),
    }
}

/// Main application state
pub struct LimonApp {
    scene: SceneDelegate,
    emulation: Arc<EmulationControl>,
    room_state: Arc<Mutex<Option<RoomState>>>,
    focused: bool,
    minimized: bool,
    tint_applied: bool,
}

impl LimonApp {
    pub fn new(mut scene: SceneDelegate, emulation: Arc<EmulationControl>) -> Self {
        let room_state = Arc::new(Mutex::new(None));
        let latest = Arc::clone(&room_state);
        scene
            .services()
            .notifications
            .add_observer(Some(ON_ROOM_STATE_CHANGED), move |notification| {
                if let NotificationPayload::RoomState(state) = notification.payload {
                    *latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(state);
                }
            });

        scene.will_connect(Surface::Window {
            title: "Limón".to_string(),
        });

        Self {
            scene,
            emulation,
            room_state,
            focused: false,
            minimized: false,
            tint_applied: false,
        }
    }

    fn apply_tint(&self, ctx: &egui::Context, tint: Color32) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = Color32::from_rgb(18, 18, 24);
        visuals.window_fill = Color32::from_rgb(24, 24, 32);
        visuals.selection.bg_fill = tint;
        visuals.hyperlink_color = tint;
        visuals.widgets.active.bg_fill = tint;
        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(10);
        ctx.set_visuals(visuals);
    }

    /// Translate viewport focus/minimise changes into scene callbacks
    fn track_lifecycle(&mut self, ctx: &egui::Context) {
        let (focused, minimized) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.focused.unwrap_or(true),
                viewport.minimized.unwrap_or(false),
            )
        });

        if minimized != self.minimized {
            if minimized {
                if self.scene.activation() == SceneActivation::ForegroundActive {
                    self.scene.will_resign_active();
                }
                self.scene.did_enter_background();
            } else {
                self.scene.will_enter_foreground();
            }
            self.minimized = minimized;
        }

        if !minimized && focused != self.focused {
            if focused {
                self.scene.did_become_active();
            } else {
                self.scene.will_resign_active();
            }
        }
        self.focused = focused;
    }

    fn render(&mut self, ctx: &egui::Context) {
        let Some(window) = self.scene.window() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| ui.label("No window attached"));
            });
            return;
        };
        let tint = tint_color(window.tint);

        match window.visible_screen().clone() {
            Screen::WhatsNew(content) => {
                if let Some(action) = whats_new::show(ctx, &content, tint) {
                    self.scene.choose_whats_new_action(action);
                }
            }
            Screen::Loading => {
                let services = self.scene.services();
                let room_state = *self.room_state.lock().unwrap_or_else(PoisonError::into_inner);
                loading::show(
                    ctx,
                    &LoadingView {
                        app_info: &services.app_info,
                        tint,
                        paused: self.emulation.is_paused(),
                        room_state,
                        preferences: services.preferences.as_ref(),
                        storage: self.scene.last_bootstrap(),
                        documents_root: &services.documents_root,
                    },
                );
            }
        }
    }
}

impl eframe::App for LimonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.tint_applied {
            if let Some(window) = self.scene.window() {
                self.apply_tint(ctx, tint_color(window.tint));
            }
            self.tint_applied = true;
        }

        self.scene.pump_room_events();
        self.track_lifecycle(ctx);
        self.render(ctx);

        ctx.request_repaint_after(ROOM_POLL_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.scene.activation() == SceneActivation::ForegroundActive {
            self.scene.will_resign_active();
        }
        if self.scene.activation() != SceneActivation::Background {
            self.scene.did_enter_background();
        }
        self.scene.did_disconnect();
    }
}
