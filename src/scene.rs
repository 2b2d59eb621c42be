//! Scene lifecycle
//!
//! [`SceneDelegate`] receives the host's lifecycle callbacks on the UI thread.
//! On connect it builds the window and runs the one-time bootstrap steps; on
//! backgrounding it pauses the emulator core; room callbacks queued through a
//! [`RoomRelay`] are turned into feedback and broadcasts by
//! [`SceneDelegate::pump_room_events`].

use crate::app_info::AppInfo;
use crate::audio_session::{self, AudioSession};
use crate::defaults;
use crate::directories::{self, BootstrapReport};
use crate::emulator::EmulatorCore;
use crate::events::{
    NotificationCenter, NotificationPayload, ON_ROOM_STATE_CHANGED, SCENE_DID_ENTER_BACKGROUND,
};
use crate::feedback::{FeedbackGenerator, FeedbackKind};
use crate::onboarding::{
    select_initial_screen, DismissalFlags, OnboardingSupport, ScreenChoice, WhatsNewAction,
    WhatsNewContent,
};
use crate::preferences::PreferenceStore;
use crate::room::{RoomEvent, RoomRelay, RoomState};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

/// Display surface offered by the host when a scene connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    /// A surface that can host an application window
    Window { title: String },
    /// Anything else (external display, widget, car screen)
    External,
}

/// Host-reported activation of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneActivation {
    Unattached,
    ForegroundInactive,
    ForegroundActive,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    SystemYellow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    WhatsNew(WhatsNewContent),
    Loading,
}

impl Screen {
    pub fn choice(&self) -> ScreenChoice {
        match self {
            Self::WhatsNew(_) => ScreenChoice::WhatsNew,
            Self::Loading => ScreenChoice::Loading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    FullScreen,
}

/// The scene's single root window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub title: String,
    pub root: Screen,
    /// Screen presented modally over the root, if any
    pub presented: Option<(Screen, Presentation)>,
    pub tint: Tint,
    pub key_and_visible: bool,
}

impl Window {
    fn new(title: String, root: Screen) -> Self {
        Self {
            title,
            root,
            presented: None,
            tint: Tint::SystemYellow,
            key_and_visible: false,
        }
    }

    fn make_key_and_visible(&mut self) {
        self.key_and_visible = true;
    }

    /// The screen the user currently sees
    pub fn visible_screen(&self) -> &Screen {
        self.presented
            .as_ref()
            .map(|(screen, _)| screen)
            .unwrap_or(&self.root)
    }
}

/// Everything the delegate talks to, passed in rather than reached globally
pub struct SceneServices {
    pub preferences: Arc<dyn PreferenceStore>,
    pub emulator: Arc<dyn EmulatorCore>,
    pub notifications: Arc<NotificationCenter>,
    pub feedback: Box<dyn FeedbackGenerator>,
    pub audio: Box<dyn AudioSession>,
    pub documents_root: PathBuf,
    pub app_info: AppInfo,
    pub onboarding: OnboardingSupport,
}

pub struct SceneDelegate {
    services: SceneServices,
    window: Option<Window>,
    activation: SceneActivation,
    last_bootstrap: Option<BootstrapReport>,
    room_sender: Sender<RoomEvent>,
    room_events: Receiver<RoomEvent>,
}

impl SceneDelegate {
    pub fn new(services: SceneServices) -> Self {
        let (room_sender, room_events) = channel();
        Self {
            services,
            window: None,
            activation: SceneActivation::Unattached,
            last_bootstrap: None,
            room_sender,
            room_events,
        }
    }

    pub fn services(&self) -> &SceneServices {
        &self.services
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    pub fn activation(&self) -> SceneActivation {
        self.activation
    }

    /// Result of the last storage bootstrap, if a window ever connected
    pub fn last_bootstrap(&self) -> Option<&BootstrapReport> {
        self.last_bootstrap.as_ref()
    }

    /// Observer to hand to the room client; safe to call from any thread
    pub fn room_relay(&self) -> RoomRelay {
        RoomRelay::new(self.room_sender.clone())
    }

    // -------------------------------------------------------------------------
    // Lifecycle callbacks
    // -------------------------------------------------------------------------

    /// Build the window for a connecting surface and run first-launch setup
    pub fn will_connect(&mut self, surface: Surface) -> Option<&Window> {
        let title = match surface {
            Surface::Window { title } => title,
            Surface::External => {
                log::debug!("Ignoring connection from a non-window surface");
                return None;
            }
        };

        let root = self.initial_screen();
        log::info!("Scene connected, showing {:?}", root.choice());

        let mut window = Window::new(title, root);
        window.make_key_and_visible();
        self.window = Some(window);
        self.activation = SceneActivation::ForegroundInactive;

        let services = &mut self.services;
        defaults::seed_default_settings(services.preferences.as_ref());
        audio_session::configure_playback(services.audio.as_mut());
        self.last_bootstrap = Some(directories::ensure_storage_directories(
            &services.documents_root,
        ));

        self.window.as_ref()
    }

    pub fn did_become_active(&mut self) {
        self.transition(SceneActivation::ForegroundActive);
    }

    pub fn will_resign_active(&mut self) {
        self.transition(SceneActivation::ForegroundInactive);
    }

    pub fn will_enter_foreground(&mut self) {
        self.transition(SceneActivation::ForegroundInactive);
    }

    pub fn did_enter_background(&mut self) {
        self.transition(SceneActivation::Background);
        self.services.emulator.pause();
        self.services
            .notifications
            .post_name(SCENE_DID_ENTER_BACKGROUND, NotificationPayload::Empty);
    }

    pub fn did_disconnect(&mut self) {
        self.transition(SceneActivation::Unattached);
        self.window = None;
    }

    fn transition(&mut self, to: SceneActivation) {
        log::debug!("Scene {:?} -> {:?}", self.activation, to);
        self.activation = to;
    }

    // -------------------------------------------------------------------------
    // Onboarding
    // -------------------------------------------------------------------------

    fn initial_screen(&self) -> Screen {
        let flags = DismissalFlags::read(
            self.services.preferences.as_ref(),
            &self.services.app_info,
        );
        match select_initial_screen(flags, self.services.onboarding) {
            ScreenChoice::WhatsNew => {
                Screen::WhatsNew(WhatsNewContent::for_release(&self.services.app_info))
            }
            ScreenChoice::Loading => Screen::Loading,
        }
    }

    /// Handle a What's New button; returns false when no dialog is showing
    pub fn choose_whats_new_action(&mut self, action: WhatsNewAction) -> bool {
        let Some(window) = self.window.as_mut() else {
            return false;
        };
        if !matches!(window.visible_screen(), Screen::WhatsNew(_)) {
            log::warn!("{:?} chosen with no What's New dialog visible", action);
            return false;
        }

        action.apply(self.services.preferences.as_ref(), &self.services.app_info);
        window.presented = Some((Screen::Loading, Presentation::FullScreen));
        true
    }

    // -------------------------------------------------------------------------
    // Room events
    // -------------------------------------------------------------------------

    /// Handle queued room callbacks; returns how many were processed
    pub fn pump_room_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.room_events.try_recv() {
                Ok(event) => {
                    self.handle_room_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    fn handle_room_event(&self, event: RoomEvent) {
        match event {
            RoomEvent::Error(error) => {
                log::warn!("Room error: {}", error);
                self.services
                    .feedback
                    .notification_occurred(FeedbackKind::Error);
            }
            RoomEvent::StateChanged(state) => {
                log::info!("Room state changed: {:?}", state);
                self.services.notifications.post_name(
                    ON_ROOM_STATE_CHANGED,
                    NotificationPayload::RoomState(state),
                );
                if state == RoomState::Joined {
                    self.services
                        .feedback
                        .notification_occurred(FeedbackKind::Success);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_session::NullAudioSession;
    use crate::emulator::EmulationControl;
    use crate::onboarding::{acknowledged_key, DONT_SHOW_WHATS_NEW_AGAIN};
    use crate::preferences::MemoryPreferenceStore;
    use crate::room::{RoomError, RoomObserver};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordedFeedback(Arc<Mutex<Vec<FeedbackKind>>>);

    impl FeedbackGenerator for RecordedFeedback {
        fn notification_occurred(&self, kind: FeedbackKind) {
            self.0.lock().unwrap().push(kind);
        }
    }

    struct Fixture {
        _dir: TempDir,
        store: Arc<MemoryPreferenceStore>,
        emulator: Arc<EmulationControl>,
        feedback: RecordedFeedback,
        delegate: SceneDelegate,
    }

    fn fixture(onboarding: OnboardingSupport) -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryPreferenceStore::new());
        let emulator = Arc::new(EmulationControl::new());
        let feedback = RecordedFeedback::default();
        let delegate = SceneDelegate::new(SceneServices {
            preferences: store.clone(),
            emulator: emulator.clone(),
            notifications: Arc::new(NotificationCenter::new()),
            feedback: Box::new(feedback.clone()),
            audio: Box::new(NullAudioSession::default()),
            documents_root: dir.path().to_path_buf(),
            app_info: AppInfo::new("1.0.4", "12"),
            onboarding,
        });
        Fixture {
            _dir: dir,
            store,
            emulator,
            feedback,
            delegate,
        }
    }

    fn window_surface() -> Surface {
        Surface::Window {
            title: "Limon".to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Connect
    // -------------------------------------------------------------------------

    #[test]
    fn test_connect_runs_bootstrap() {
        let mut f = fixture(OnboardingSupport::Available);
        let window = f.delegate.will_connect(window_surface()).unwrap();

        assert!(window.key_and_visible);
        assert_eq!(window.tint, Tint::SystemYellow);
        assert_eq!(window.root.choice(), ScreenChoice::WhatsNew);
        assert_eq!(f.delegate.activation(), SceneActivation::ForegroundInactive);
        assert!(f.store.bool(defaults::HAS_SET_DEFAULT_SETTINGS));
        assert!(f.delegate.last_bootstrap().unwrap().is_complete());
    }

    #[test]
    fn test_external_surface_is_ignored() {
        let mut f = fixture(OnboardingSupport::Available);
        assert!(f.delegate.will_connect(Surface::External).is_none());

        assert!(f.delegate.window().is_none());
        assert_eq!(f.delegate.activation(), SceneActivation::Unattached);
        assert!(!f.store.contains(defaults::HAS_SET_DEFAULT_SETTINGS));
        assert!(f.delegate.last_bootstrap().is_none());
    }

    #[test]
    fn test_unsupported_platform_goes_to_loading() {
        let mut f = fixture(OnboardingSupport::Unavailable);
        let window = f.delegate.will_connect(window_surface()).unwrap();
        assert_eq!(window.root, Screen::Loading);
    }

    #[test]
    fn test_dismissed_release_goes_to_loading() {
        let mut f = fixture(OnboardingSupport::Available);
        f.store
            .set_bool(&acknowledged_key(&AppInfo::new("1.0.4", "12")), true);
        let window = f.delegate.will_connect(window_surface()).unwrap();
        assert_eq!(window.root, Screen::Loading);
    }

    // -------------------------------------------------------------------------
    // Dialog actions
    // -------------------------------------------------------------------------

    #[test]
    fn test_dont_show_again_presents_loading() {
        let mut f = fixture(OnboardingSupport::Available);
        f.delegate.will_connect(window_surface());

        assert!(f.delegate.choose_whats_new_action(WhatsNewAction::DontShowAgain));
        assert!(f.store.bool(DONT_SHOW_WHATS_NEW_AGAIN));

        let window = f.delegate.window().unwrap();
        assert_eq!(window.root.choice(), ScreenChoice::WhatsNew);
        assert_eq!(
            window.presented,
            Some((Screen::Loading, Presentation::FullScreen))
        );
        assert_eq!(window.visible_screen(), &Screen::Loading);
    }

    #[test]
    fn test_action_without_dialog_is_rejected() {
        let mut f = fixture(OnboardingSupport::Unavailable);
        assert!(!f.delegate.choose_whats_new_action(WhatsNewAction::Acknowledge));

        f.delegate.will_connect(window_surface());
        assert!(!f.delegate.choose_whats_new_action(WhatsNewAction::Acknowledge));
        assert!(!f.store.contains(&acknowledged_key(&AppInfo::new("1.0.4", "12"))));
    }

    #[test]
    fn test_second_action_is_rejected() {
        let mut f = fixture(OnboardingSupport::Available);
        f.delegate.will_connect(window_surface());
        assert!(f.delegate.choose_whats_new_action(WhatsNewAction::Acknowledge));
        assert!(!f.delegate.choose_whats_new_action(WhatsNewAction::DontShowAgain));
        assert!(!f.store.contains(DONT_SHOW_WHATS_NEW_AGAIN));
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_activation_transitions() {
        let mut f = fixture(OnboardingSupport::Available);
        f.delegate.will_connect(window_surface());

        f.delegate.did_become_active();
        assert_eq!(f.delegate.activation(), SceneActivation::ForegroundActive);
        f.delegate.will_resign_active();
        assert_eq!(f.delegate.activation(), SceneActivation::ForegroundInactive);
        f.delegate.did_enter_background();
        assert_eq!(f.delegate.activation(), SceneActivation::Background);
        f.delegate.will_enter_foreground();
        assert_eq!(f.delegate.activation(), SceneActivation::ForegroundInactive);

        f.delegate.did_disconnect();
        assert_eq!(f.delegate.activation(), SceneActivation::Unattached);
        assert!(f.delegate.window().is_none());
    }

    #[test]
    fn test_foreground_transitions_do_not_touch_emulator() {
        let mut f = fixture(OnboardingSupport::Available);
        f.delegate.will_connect(window_surface());
        f.delegate.did_become_active();
        f.delegate.will_resign_active();
        f.delegate.will_enter_foreground();
        f.delegate.did_disconnect();

        assert_eq!(f.emulator.pause_requests(), 0);
        assert!(f.feedback.0.lock().unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Room events
    // -------------------------------------------------------------------------

    #[test]
    fn test_room_error_produces_error_feedback_only() {
        let mut f = fixture(OnboardingSupport::Available);
        let posts = Arc::new(Mutex::new(0));
        let p = Arc::clone(&posts);
        f.delegate
            .services()
            .notifications
            .add_observer(None, move |_| *p.lock().unwrap() += 1);

        f.delegate.room_relay().on_error(RoomError::LostConnection);
        assert_eq!(f.delegate.pump_room_events(), 1);

        assert_eq!(*f.feedback.0.lock().unwrap(), vec![FeedbackKind::Error]);
        assert_eq!(*posts.lock().unwrap(), 0);
    }

    #[test]
    fn test_non_joined_states_have_no_feedback() {
        let mut f = fixture(OnboardingSupport::Available);
        let relay = f.delegate.room_relay();
        for state in [
            RoomState::Uninitialized,
            RoomState::Idle,
            RoomState::Joining,
            RoomState::Moderator,
        ] {
            relay.on_room_state_changed(state);
        }
        assert_eq!(f.delegate.pump_room_events(), 4);
        assert!(f.feedback.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_events_wait_for_pump() {
        let mut f = fixture(OnboardingSupport::Available);
        let relay = f.delegate.room_relay();

        std::thread::spawn(move || relay.on_room_state_changed(RoomState::Joined))
            .join()
            .unwrap();

        assert!(f.feedback.0.lock().unwrap().is_empty());
        assert_eq!(f.delegate.pump_room_events(), 1);
        assert_eq!(*f.feedback.0.lock().unwrap(), vec![FeedbackKind::Success]);
        assert_eq!(f.delegate.pump_room_events(), 0);
    }
}
