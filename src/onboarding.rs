//! What's New onboarding
//!
//! Decides whether a connecting scene opens on the What's New dialog or
//! straight on the loading screen, and persists the user's answer.

use crate::app_info::AppInfo;
use crate::preferences::PreferenceStore;

/// Global "never show the dialog again" flag
pub const DONT_SHOW_WHATS_NEW_AGAIN: &str = "dontShowWhatsNewAgain";

/// Per-release acknowledgement flag key, `acknowledgedWhatsNew_{version}.{build}`
pub fn acknowledged_key(info: &AppInfo) -> String {
    format!("acknowledgedWhatsNew_{}.{}", info.version, info.build)
}

/// Whether the platform can show the onboarding dialog at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingSupport {
    Available,
    Unavailable,
}

impl From<bool> for OnboardingSupport {
    fn from(available: bool) -> Self {
        if available {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

/// The two persisted dismissal flags, as seen by the current release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DismissalFlags {
    pub acknowledged_current: bool,
    pub dont_show_again: bool,
}

impl DismissalFlags {
    pub fn read(store: &dyn PreferenceStore, info: &AppInfo) -> Self {
        Self {
            acknowledged_current: store.bool(&acknowledged_key(info)),
            dont_show_again: store.bool(DONT_SHOW_WHATS_NEW_AGAIN),
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.acknowledged_current || self.dont_show_again
    }

    /// Forget both answers so the dialog shows again on next connect
    pub fn reset(store: &dyn PreferenceStore, info: &AppInfo) {
        store.remove(&acknowledged_key(info));
        store.remove(DONT_SHOW_WHATS_NEW_AGAIN);
    }
}

/// First screen of a freshly connected window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenChoice {
    WhatsNew,
    Loading,
}

/// Pick the initial screen from the dismissal flags
pub fn select_initial_screen(flags: DismissalFlags, support: OnboardingSupport) -> ScreenChoice {
    match support {
        OnboardingSupport::Unavailable => ScreenChoice::Loading,
        OnboardingSupport::Available if flags.is_dismissed() => ScreenChoice::Loading,
        OnboardingSupport::Available => ScreenChoice::WhatsNew,
    }
}

/// Buttons on the What's New dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhatsNewAction {
    Acknowledge,
    DontShowAgain,
}

impl WhatsNewAction {
    pub const ALL: [WhatsNewAction; 2] = [Self::Acknowledge, Self::DontShowAgain];

    pub fn title(self) -> &'static str {
        match self {
            Self::Acknowledge => "Acknowledge",
            Self::DontShowAgain => "Don't Show Again",
        }
    }

    /// Persist the flag this action stands for
    pub fn apply(self, store: &dyn PreferenceStore, info: &AppInfo) {
        match self {
            Self::Acknowledge => store.set_bool(&acknowledged_key(info), true),
            Self::DontShowAgain => store.set_bool(DONT_SHOW_WHATS_NEW_AGAIN, true),
        }
        log::info!("What's New dismissed with {:?} for {}", self, info);
    }

    /// Raw value used across the JNI boundary
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Acknowledge),
            1 => Some(Self::DontShowAgain),
            _ => None,
        }
    }
}

/// A bulleted entry in the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsNewItem {
    pub title: &'static str,
    pub description: &'static str,
    /// Symbol name of the bullet icon
    pub symbol: &'static str,
}

const RELEASE_NOTES: &[WhatsNewItem] = &[
    WhatsNewItem {
        title: "Added JIT Support",
        description: "Added the ability to enable the CPU JIT on supported devices",
        symbol: "ladybug.fill",
    },
    WhatsNewItem {
        title: "Fixed Crashing on Older Systems",
        description: "Fixed the application crashing on older systems by skipping this screen there",
        symbol: "car.rear.and.tire.marks",
    },
];

/// Everything the dialog displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsNewContent {
    pub title: &'static str,
    pub detail: &'static str,
    pub symbol: &'static str,
    pub items: Vec<WhatsNewItem>,
    pub caption: String,
    pub actions: [WhatsNewAction; 2],
}

impl WhatsNewContent {
    pub fn for_release(info: &AppInfo) -> Self {
        Self {
            title: "What's New",
            detail: "See what's been added, changed, fixed or removed in the latest version of Limón",
            symbol: "app.badge.fill",
            items: RELEASE_NOTES.to_vec(),
            caption: info.caption(),
            actions: WhatsNewAction::ALL,
        }
    }
}
