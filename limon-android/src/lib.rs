//! Limon Android JNI Bindings
//!
//! This crate exposes the Limon scene shell to the Android activity
//! (`com.limon.LimonCore`). Scene callbacks arrive on the UI thread and the
//! delegate lives there; room callbacks may come from the network thread and
//! only go through the relay.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jint, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;

use limon::audio_session::NullAudioSession;
use limon::emulator::EmulationControl;
use limon::events::NotificationCenter;
use limon::feedback::{FeedbackGenerator, FeedbackKind};
use limon::onboarding::{OnboardingSupport, ScreenChoice, WhatsNewAction};
use limon::preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore};
use limon::room::{RoomError, RoomObserver, RoomRelay, RoomState};
use limon::scene::{Surface, Window};
use limon::{AppInfo, SceneDelegate, SceneServices};

const SCREEN_NONE: jint = 0;
const SCREEN_WHATS_NEW: jint = 1;
const SCREEN_LOADING: jint = 2;

thread_local! {
    /// Scene delegate, owned by the UI thread
    static SCENE: RefCell<Option<SceneDelegate>> = const { RefCell::new(None) };
}

/// Relay handed to the room client, reachable from any thread
static ROOM_RELAY: Mutex<Option<RoomRelay>> = Mutex::new(None);

/// Feedback waiting for the Java side to play it on the vibrator
static FEEDBACK: Mutex<VecDeque<FeedbackKind>> = Mutex::new(VecDeque::new());

fn emulation() -> &'static Arc<EmulationControl> {
    static EMULATION: OnceLock<Arc<EmulationControl>> = OnceLock::new();
    EMULATION.get_or_init(|| Arc::new(EmulationControl::new()))
}

/// Queues feedback for `takeFeedback`
struct QueuedFeedback;

impl FeedbackGenerator for QueuedFeedback {
    fn notification_occurred(&self, kind: FeedbackKind) {
        FEEDBACK
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(kind);
    }
}

fn screen_code(window: Option<&Window>) -> jint {
    match window.map(|w| w.visible_screen().choice()) {
        None => SCREEN_NONE,
        Some(ScreenChoice::WhatsNew) => SCREEN_WHATS_NEW,
        Some(ScreenChoice::Loading) => SCREEN_LOADING,
    }
}

fn with_scene<R>(f: impl FnOnce(&mut SceneDelegate) -> R) -> Option<R> {
    SCENE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Run `f`, logging and replacing a panic with `fallback`
fn guarded<R>(name: &str, fallback: R, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(panic::AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Panic in {}: {:?}", name, e);
            fallback
        }
    }
}

fn room_relay() -> Option<RoomRelay> {
    ROOM_RELAY
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

// ============================================================================
// JNI Functions
// ============================================================================

/// Initialize Android logging
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_initLogging(_env: JNIEnv, _class: JClass) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("Limon"),
    );
    log::info!("Limon Android logging initialized");
}

/// Connect the scene; returns the screen to show (0 none, 1 What's New, 2 loading)
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "system" fn Java_com_limon_LimonCore_sceneWillConnect<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    documents_path: JString<'local>,
    preferences_path: JString<'local>,
    version: JString<'local>,
    build: JString<'local>,
    is_window: jboolean,
    onboarding_available: jboolean,
) -> jint {
    guarded("sceneWillConnect", SCREEN_NONE, || {
        let strings = [&documents_path, &preferences_path, &version, &build]
            .into_iter()
            .map(|s| env.get_string(s).map(String::from))
            .collect::<Result<Vec<_>, _>>();
        let [documents, preferences, version, build]: [String; 4] = match strings {
            Ok(values) => match values.try_into() {
                Ok(array) => array,
                Err(_) => return SCREEN_NONE,
            },
            Err(e) => {
                log::error!("Failed to read connect arguments: {}", e);
                return SCREEN_NONE;
            }
        };

        let surface = if is_window == JNI_TRUE {
            Surface::Window {
                title: "Limón".to_string(),
            }
        } else {
            Surface::External
        };
        let onboarding = OnboardingSupport::from(onboarding_available == JNI_TRUE);

        SCENE.with(|cell| {
            let mut slot = cell.borrow_mut();
            let scene = slot.get_or_insert_with(|| {
                new_scene(
                    PathBuf::from(documents),
                    PathBuf::from(preferences),
                    AppInfo::new(version, build),
                    onboarding,
                )
            });
            screen_code(scene.will_connect(surface))
        })
    })
}

fn new_scene(
    documents_root: PathBuf,
    preferences_path: PathBuf,
    app_info: AppInfo,
    onboarding: OnboardingSupport,
) -> SceneDelegate {
    let preferences: Arc<dyn PreferenceStore> = match JsonPreferenceStore::open(&preferences_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("{}; using in-memory preferences", e);
            Arc::new(MemoryPreferenceStore::new())
        }
    };

    let notifications = Arc::new(NotificationCenter::new());
    notifications.add_observer(None, |n| {
        log::debug!("Notification {}: {:?}", n.name, n.payload);
    });

    let scene = SceneDelegate::new(SceneServices {
        preferences,
        emulator: emulation().clone(),
        notifications,
        feedback: Box::new(QueuedFeedback),
        audio: Box::new(NullAudioSession::default()),
        documents_root,
        app_info,
        onboarding,
    });

    *ROOM_RELAY.lock().unwrap_or_else(PoisonError::into_inner) = Some(scene.room_relay());
    log::info!("Scene delegate created");
    scene
}

/// Press a What's New button; returns the screen now visible
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_chooseWhatsNewAction(
    _env: JNIEnv,
    _class: JClass,
    action: jint,
) -> jint {
    guarded("chooseWhatsNewAction", SCREEN_NONE, || {
        let Some(action) = WhatsNewAction::from_raw(action) else {
            log::warn!("Unknown What's New action {}", action);
            return with_scene(|s| screen_code(s.window())).unwrap_or(SCREEN_NONE);
        };
        with_scene(|s| {
            s.choose_whats_new_action(action);
            screen_code(s.window())
        })
        .unwrap_or(SCREEN_NONE)
    })
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_sceneDidBecomeActive(_env: JNIEnv, _class: JClass) {
    guarded("sceneDidBecomeActive", None, || with_scene(|s| s.did_become_active()));
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_sceneWillResignActive(
    _env: JNIEnv,
    _class: JClass,
) {
    guarded("sceneWillResignActive", None, || {
        with_scene(|s| s.will_resign_active())
    });
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_sceneWillEnterForeground(
    _env: JNIEnv,
    _class: JClass,
) {
    guarded("sceneWillEnterForeground", None, || {
        with_scene(|s| s.will_enter_foreground())
    });
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_sceneDidEnterBackground(
    _env: JNIEnv,
    _class: JClass,
) {
    guarded("sceneDidEnterBackground", None, || {
        with_scene(|s| s.did_enter_background())
    });
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_sceneDidDisconnect(_env: JNIEnv, _class: JClass) {
    guarded("sceneDidDisconnect", None, || with_scene(|s| s.did_disconnect()));
}

/// Room state callback; may be called from any thread
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_onRoomStateChanged(
    _env: JNIEnv,
    _class: JClass,
    state: jint,
) {
    let Some(state) = RoomState::from_raw(state) else {
        log::warn!("Unknown room state {}", state);
        return;
    };
    match room_relay() {
        Some(relay) => relay.on_room_state_changed(state),
        None => log::warn!("Room state {:?} before scene connect", state),
    }
}

/// Room error callback; may be called from any thread
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_onRoomError(
    _env: JNIEnv,
    _class: JClass,
    error: jint,
) {
    let error = RoomError::from_raw(error).unwrap_or(RoomError::UnknownError);
    match room_relay() {
        Some(relay) => relay.on_error(error),
        None => log::warn!("Room error '{}' before scene connect", error),
    }
}

/// Handle queued room events on the UI thread; returns how many ran
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_pumpEvents(_env: JNIEnv, _class: JClass) -> jint {
    guarded("pumpEvents", 0, || {
        with_scene(|s| s.pump_room_events() as jint).unwrap_or(0)
    })
}

/// Next feedback to play (0 success, 1 warning, 2 error), or -1 when none
#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_takeFeedback(_env: JNIEnv, _class: JClass) -> jint {
    FEEDBACK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
        .map(FeedbackKind::as_raw)
        .unwrap_or(-1)
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_isEmulationPaused(
    _env: JNIEnv,
    _class: JClass,
) -> jboolean {
    if emulation().is_paused() {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

#[no_mangle]
pub extern "system" fn Java_com_limon_LimonCore_resumeEmulation(_env: JNIEnv, _class: JClass) {
    emulation().resume();
    log::info!("Emulation resumed");
}
