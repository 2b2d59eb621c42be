//! Audio session backed by cpal
//!
//! Setting the playback category resolves the default output device; making
//! the session active opens a silent output stream on it so the device stays
//! claimed until the session is deactivated.

use crate::audio_session::{AudioCategory, AudioSession};
use crate::error::AudioSessionError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

pub struct CpalAudioSession {
    host: cpal::Host,
    device: Option<(cpal::Device, cpal::SupportedStreamConfig)>,
    category: Option<AudioCategory>,
    stream: Option<cpal::Stream>,
}

impl Default for CpalAudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CpalAudioSession {
    pub fn new() -> Self {
        let host = cpal::default_host();
        log::info!("Using audio host: {:?}", host.id());
        Self {
            host,
            device: None,
            category: None,
            stream: None,
        }
    }

    pub fn category(&self) -> Option<AudioCategory> {
        self.category
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    fn build_silent_stream(
        device: &cpal::Device,
        supported: &cpal::SupportedStreamConfig,
    ) -> Result<cpal::Stream, AudioSessionError> {
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.clone().into();
        let on_error = |err: cpal::StreamError| log::error!("Audio stream error: {}", err);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &config,
                |data: &mut [f32], _: &cpal::OutputCallbackInfo| data.fill(0.0),
                on_error,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_output_stream(
                &config,
                |data: &mut [i16], _: &cpal::OutputCallbackInfo| data.fill(0),
                on_error,
                None,
            ),
            other => return Err(AudioSessionError::UnsupportedFormat(format!("{:?}", other))),
        };

        stream.map_err(|e| AudioSessionError::Backend(e.to_string()))
    }
}

impl AudioSession for CpalAudioSession {
    fn set_category(&mut self, category: AudioCategory) -> Result<(), AudioSessionError> {
        // Every category needs an output device on desktop; they only differ
        // in how a mobile OS would mix us with other apps
        let device = self
            .host
            .default_output_device()
            .ok_or(AudioSessionError::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioSessionError::Backend(e.to_string()))?;

        log::info!(
            "Audio category {:?} on {:?} ({} ch, {} Hz)",
            category,
            device.name().unwrap_or_default(),
            supported.channels(),
            supported.sample_rate().0
        );

        self.device = Some((device, supported));
        self.category = Some(category);
        Ok(())
    }

    fn set_active(&mut self, active: bool) -> Result<(), AudioSessionError> {
        if !active {
            self.stream = None;
            return Ok(());
        }
        if self.stream.is_some() {
            return Ok(());
        }

        let (device, supported) = self
            .device
            .as_ref()
            .ok_or(AudioSessionError::NoOutputDevice)?;
        let stream = Self::build_silent_stream(device, supported)?;
        stream
            .play()
            .map_err(|e| AudioSessionError::Backend(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }
}
