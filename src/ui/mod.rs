//! Limon UI - egui-based desktop host for the scene
//!
//! This module maps eframe's window lifecycle onto the scene delegate and
//! renders whichever screen the scene's window currently shows.

mod app;
mod audio;
mod loading;
mod whats_new;

pub use app::LimonApp;
pub use audio::CpalAudioSession;
