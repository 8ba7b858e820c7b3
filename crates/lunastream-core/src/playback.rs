use crate::store::KeyValueStore;
use crate::watch_state::WatchStateRepository;
use lunastream_models::EmbedMediaType;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, info};

pub const MEDIA_DATA: &str = "MEDIA_DATA";
pub const PLAYER_EVENT: &str = "PLAYER_EVENT";

/// Progress snapshot posted by an embed
#[derive(Debug, Clone, PartialEq)]
pub struct MediaData {
    pub id: String,
    pub media_type: EmbedMediaType,
    /// Full payload as sent, merged into the progress map
    pub payload: Map<String, Value>,
}

/// Playback event, only ever logged
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEvent {
    pub event: String,
    pub current_time: Option<f64>,
    pub duration: Option<f64>,
}

/// Validated cross-frame message
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMessage {
    MediaData(MediaData),
    PlayerEvent(PlayerEvent),
}

/// Providers post either objects or JSON-encoded strings
fn as_object(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

impl MediaData {
    fn validate(data: Map<String, Value>) -> Option<Self> {
        let id = data.get("id").and_then(id_string)?;
        let media_type = data.get("type").and_then(Value::as_str).and_then(EmbedMediaType::parse)?;
        Some(Self { id, media_type, payload: data })
    }
}

impl PlayerEvent {
    fn validate(data: &Map<String, Value>) -> Option<Self> {
        let event = data.get("event").and_then(Value::as_str)?.to_string();
        Some(Self {
            event,
            current_time: data.get("currentTime").and_then(Value::as_f64),
            duration: data.get("duration").and_then(Value::as_f64),
        })
    }
}

impl PlayerMessage {
    /// Validate a raw message; anything malformed or unrecognised is `None`
    pub fn parse(raw: &Value) -> Option<Self> {
        let message = as_object(raw)?;
        let data = message.get("data").and_then(as_object)?;

        match message.get("type").and_then(Value::as_str)? {
            MEDIA_DATA => MediaData::validate(data).map(PlayerMessage::MediaData),
            PLAYER_EVENT => PlayerEvent::validate(&data).map(PlayerMessage::PlayerEvent),
            _ => None,
        }
    }
}

/// What a handler did with a message
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    Progress { id: String },
    PlayerEvent(PlayerEvent),
    Ignored,
}

pub trait MessageHandler: Send + Sync {
    fn handle(&self, raw: &Value) -> Handled;
}

/// Forwards accepted progress messages into the repository
pub struct PlaybackListener<S> {
    repo: Arc<WatchStateRepository<S>>,
}

impl<S: KeyValueStore> PlaybackListener<S> {
    pub fn new(repo: Arc<WatchStateRepository<S>>) -> Self {
        Self { repo }
    }
}

impl<S: KeyValueStore> MessageHandler for PlaybackListener<S> {
    fn handle(&self, raw: &Value) -> Handled {
        match PlayerMessage::parse(raw) {
            Some(PlayerMessage::MediaData(data)) => {
                debug!("Media data for {} {}", data.media_type, data.id);
                self.repo.merge_progress(&data.id, data.payload);
                Handled::Progress { id: data.id }
            }
            Some(PlayerMessage::PlayerEvent(event)) => {
                info!(
                    event = %event.event,
                    current_time = ?event.current_time,
                    duration = ?event.duration,
                    "Player event"
                );
                Handled::PlayerEvent(event)
            }
            None => {
                debug!("Ignoring player message: {}", raw);
                Handled::Ignored
            }
        }
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    handler: Option<Arc<dyn MessageHandler>>,
}

/// Message source of the active embed; holds at most one subscriber
#[derive(Default, Clone)]
pub struct PlayerWindow {
    slot: Arc<Mutex<Slot>>,
}

impl PlayerWindow {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach `handler`, detaching whichever one was attached before
    pub fn subscribe(&self, handler: Arc<dyn MessageHandler>) -> Subscription {
        let mut slot = self.lock();
        if slot.handler.is_some() {
            debug!("Replacing active player message listener");
        }
        slot.generation += 1;
        slot.handler = Some(handler);
        Subscription {
            slot: Arc::downgrade(&self.slot),
            generation: slot.generation,
        }
    }

    pub fn listener_count(&self) -> usize {
        usize::from(self.lock().handler.is_some())
    }

    /// Deliver a message to the current subscriber, if any
    pub fn post_message(&self, raw: &Value) -> Handled {
        let handler = self.lock().handler.clone();
        match handler {
            Some(handler) => handler.handle(raw),
            None => Handled::Ignored,
        }
    }
}

/// Detaches its handler when dropped
///
/// A subscription that has already been replaced leaves the newer handler
/// alone.
pub struct Subscription {
    slot: Weak<Mutex<Slot>>,
    generation: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                let slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                slot.generation == self.generation && slot.handler.is_some()
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.upgrade() {
            let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if slot.generation == self.generation {
                slot.handler = None;
                debug!("Player message listener detached");
            }
        }
    }
}
