//! Audio session configuration
//!
//! The shell asks for a playback session at scene connect. Failing to get one
//! is not fatal; the app keeps running without a guaranteed audio category.

use crate::error::AudioSessionError;

/// How the app's audio mixes with the rest of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCategory {
    Ambient,
    SoloAmbient,
    Playback,
}

/// Platform audio session
pub trait AudioSession {
    fn set_category(&mut self, category: AudioCategory) -> Result<(), AudioSessionError>;

    fn set_active(&mut self, active: bool) -> Result<(), AudioSessionError>;
}

/// Switch the session to playback and activate it; failures are logged
pub fn configure_playback(session: &mut dyn AudioSession) -> bool {
    let result = session
        .set_category(AudioCategory::Playback)
        .and_then(|()| session.set_active(true));

    match result {
        Ok(()) => {
            log::info!("Audio session active for playback");
            true
        }
        Err(e) => {
            log::error!("Failed to configure audio session: {}", e);
            false
        }
    }
}

/// Session for platforms where audio focus is owned elsewhere
#[derive(Debug, Default)]
pub struct NullAudioSession {
    category: Option<AudioCategory>,
    active: bool,
}

impl NullAudioSession {
    pub fn category(&self) -> Option<AudioCategory> {
        self.category
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AudioSession for NullAudioSession {
    fn set_category(&mut self, category: AudioCategory) -> Result<(), AudioSessionError> {
        self.category = Some(category);
        Ok(())
    }

    fn set_active(&mut self, active: bool) -> Result<(), AudioSessionError> {
        self.active = active;
        Ok(())
    }
}
