//! First-launch default settings

use self::SettingCategory::{Audio, Core, Renderer, Stereoscopy};
use crate::preferences::{PreferenceStore, PreferenceValue};

/// Guard flag set once the defaults have been written
pub const HAS_SET_DEFAULT_SETTINGS: &str = "hasSetDefaultSettings";

/// Settings group, used when listing the table in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingCategory {
    Core,
    Audio,
    Renderer,
    Stereoscopy,
}

impl SettingCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Audio => "Audio",
            Self::Renderer => "Renderer",
            Self::Stereoscopy => "Stereoscopy",
        }
    }
}

/// One row of the default settings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultSetting {
    pub key: &'static str,
    pub value: PreferenceValue,
    pub category: SettingCategory,
}

const fn flag(key: &'static str, value: bool, category: SettingCategory) -> DefaultSetting {
    DefaultSetting {
        key,
        value: PreferenceValue::Bool(value),
        category,
    }
}

const fn int(key: &'static str, value: i64, category: SettingCategory) -> DefaultSetting {
    DefaultSetting {
        key,
        value: PreferenceValue::Int(value),
        category,
    }
}

pub const DEFAULT_SETTINGS: &[DefaultSetting] = &[
    flag("useCPUJIT", false, Core),
    int("cpuClockPercentage", 100, Core),
    flag("isNew3DS", true, Core),
    int("audioInputType", 0, Audio),
    int("audioOutputType", 0, Audio),
    flag("spirvShaderGen", true, Renderer),
    flag("asyncShaderCompilation", false, Renderer),
    flag("asyncShaderPresentation", true, Renderer),
    flag("useHWShader", true, Renderer),
    flag("useDiskShaderCache", true, Renderer),
    flag("shadersAccurateMul", true, Renderer),
    flag("useNewVSync", true, Renderer),
    flag("useShaderJIT", false, Renderer),
    int("resolutionFactor", 1, Renderer),
    int("frameLimit", 100, Renderer),
    int("textureFilter", 0, Renderer),
    int("stereoRender", 0, Stereoscopy),
    int("factor3D", 0, Stereoscopy),
    int("monoRender", 0, Stereoscopy),
];

/// Write the default settings table, once per install
///
/// Does nothing when the guard flag is already set, so values the user has
/// changed since the first launch are never overwritten.
pub fn seed_default_settings(store: &dyn PreferenceStore) {
    if store.bool(HAS_SET_DEFAULT_SETTINGS) {
        log::debug!("Default settings already seeded");
        return;
    }

    for setting in DEFAULT_SETTINGS {
        store.set_value(setting.key, setting.value);
    }
    store.set_bool(HAS_SET_DEFAULT_SETTINGS, true);

    log::info!("Seeded {} default settings", DEFAULT_SETTINGS.len());
}
