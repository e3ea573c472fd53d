//! Boundary message contracts.
//!
//! The front end is an opaque collaborator that talks to the runtime through
//! named ports. Each direction is a tagged union so that every port is
//! enumerated exhaustively; on the wire a message is
//! `{"port": "<name>", "payload": <value>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages accepted from the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum Inbound {
    /// Play a sound immediately.
    PlaySound(String),
    /// Fade out and stop a sound.
    StopSound(String),
    /// Queue a music loop for the next boundary.
    QueueLoopReq(String),
    /// Stop all loop layers.
    StopMusic,
    /// Fade the drama layer in.
    AddDramaReq,
    /// Fade the drama layer out.
    RemoveDramaReq,
    /// Request the ordered list of save slots.
    PersistListReq,
    /// Request the history stored in a slot.
    PersistLoadReq(String),
    /// Store a history in a slot.
    PersistSaveReq(String, Vec<Value>),
    /// Remove a slot.
    PersistDeleteReq(String),
}

impl Inbound {
    /// The port name this message arrived on (for logging/routing).
    #[must_use]
    pub fn port_name(&self) -> &'static str {
        match self {
            Self::PlaySound(_) => "playSound",
            Self::StopSound(_) => "stopSound",
            Self::QueueLoopReq(_) => "queueLoopReq",
            Self::StopMusic => "stopMusic",
            Self::AddDramaReq => "addDramaReq",
            Self::RemoveDramaReq => "removeDramaReq",
            Self::PersistListReq => "persistListReq",
            Self::PersistLoadReq(_) => "persistLoadReq",
            Self::PersistSaveReq(..) => "persistSaveReq",
            Self::PersistDeleteReq(_) => "persistDeleteReq",
        }
    }
}

/// Messages emitted to the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum Outbound {
    /// Every blocking asset has finished loading. Always `true`, sent once.
    #[serde(alias = "assetsLoaded")]
    Loaded(bool),
    /// Preload progress after each counted completion.
    LoadProgress {
        /// Blocking assets completed so far.
        completed: usize,
        /// Blocking assets declared.
        required: usize,
    },
    /// Response to `persistListReq`: request time and slots, newest first.
    PersistListRes(String, Vec<String>),
    /// Response to `persistLoadReq`.
    PersistLoadRes(Vec<Value>),
    /// The set of save slots changed.
    PersistListChanged,
}

/// Outbound half of the boundary port.
pub trait MessageSink {
    /// Deliver a message to the boundary.
    fn send(&mut self, message: Outbound);
}
