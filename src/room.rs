//! Multiplayer room callbacks
//!
//! The room client lives outside the shell and may call back from its own
//! network thread. [`RoomRelay`] is what it gets handed: it only queues the
//! event, and the scene delegate acts on it later from its own thread.

use std::fmt;
use std::sync::mpsc::Sender;

/// Status of the local member in a multiplayer room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Uninitialized,
    Idle,
    Joining,
    Joined,
    Moderator,
}

impl RoomState {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Uninitialized),
            1 => Some(Self::Idle),
            2 => Some(Self::Joining),
            3 => Some(Self::Joined),
            4 => Some(Self::Moderator),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "Not initialized",
            Self::Idle => "Idle",
            Self::Joining => "Joining",
            Self::Joined => "Joined",
            Self::Moderator => "Joined as moderator",
        }
    }
}

/// Reasons the room client reports an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomError {
    LostConnection,
    HostKicked,
    UnknownError,
    NameCollision,
    MacCollision,
    ConsoleIdCollision,
    WrongVersion,
    WrongPassword,
    CouldNotConnect,
    RoomIsFull,
    HostBanned,
    PermissionDenied,
    NoSuchUser,
}

impl RoomError {
    pub fn from_raw(raw: i32) -> Option<Self> {
        let error = match raw {
            0 => Self::LostConnection,
            1 => Self::HostKicked,
            2 => Self::UnknownError,
            3 => Self::NameCollision,
            4 => Self::MacCollision,
            5 => Self::ConsoleIdCollision,
            6 => Self::WrongVersion,
            7 => Self::WrongPassword,
            8 => Self::CouldNotConnect,
            9 => Self::RoomIsFull,
            10 => Self::HostBanned,
            11 => Self::PermissionDenied,
            12 => Self::NoSuchUser,
            _ => return None,
        };
        Some(error)
    }
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::LostConnection => "connection to the room was lost",
            Self::HostKicked => "kicked by the host",
            Self::UnknownError => "unknown error",
            Self::NameCollision => "nickname already in use",
            Self::MacCollision => "MAC address already in use",
            Self::ConsoleIdCollision => "console ID already in use",
            Self::WrongVersion => "room runs a different version",
            Self::WrongPassword => "wrong password",
            Self::CouldNotConnect => "could not connect to the room",
            Self::RoomIsFull => "room is full",
            Self::HostBanned => "banned by the host",
            Self::PermissionDenied => "permission denied",
            Self::NoSuchUser => "no such user",
        };
        f.write_str(message)
    }
}

/// Callbacks delivered by the room client
pub trait RoomObserver: Send + Sync {
    fn on_error(&self, error: RoomError);

    fn on_room_state_changed(&self, state: RoomState);
}

/// A room callback waiting to be handled on the scene's thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEvent {
    Error(RoomError),
    StateChanged(RoomState),
}

/// Thread-safe [`RoomObserver`] that forwards into the scene's event queue
#[derive(Debug, Clone)]
pub struct RoomRelay {
    sender: Sender<RoomEvent>,
}

impl RoomRelay {
    pub(crate) fn new(sender: Sender<RoomEvent>) -> Self {
        Self { sender }
    }

    fn forward(&self, event: RoomEvent) {
        if self.sender.send(event).is_err() {
            log::debug!("Dropped {:?}: scene is gone", event);
        }
    }
}

impl RoomObserver for RoomRelay {
    fn on_error(&self, error: RoomError) {
        self.forward(RoomEvent::Error(error));
    }

    fn on_room_state_changed(&self, state: RoomState) {
        self.forward(RoomEvent::StateChanged(state));
    }
}
