//! Limon - front-end shell for a handheld console emulator
//!
//! The library owns everything that happens around the emulator core when a
//! scene comes and goes: picking the first screen, seeding default
//! preferences, creating the per-install storage tree, configuring audio,
//! and relaying lifecycle and multiplayer room events. The core itself is
//! reached only through the [`emulator::EmulatorCore`] handle.

pub mod app_info;
pub mod audio_session;
pub mod defaults;
pub mod directories;
pub mod emulator;
pub mod error;
pub mod events;
pub mod feedback;
pub mod onboarding;
pub mod preferences;
pub mod room;
pub mod scene;

#[cfg(feature = "desktop")]
pub mod config;
#[cfg(feature = "desktop")]
pub mod ui;

pub use app_info::AppInfo;
pub use error::{AudioSessionError, PreferenceError};
pub use onboarding::{select_initial_screen, DismissalFlags, OnboardingSupport, ScreenChoice};
pub use preferences::{PreferenceStore, PreferenceValue};
pub use scene::{SceneDelegate, SceneServices};
