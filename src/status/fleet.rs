use crate::channel::{ChannelEvent, ChannelState};
use crate::status::EntitySnapshot;

pub type StatusEvent = ChannelEvent<Vec<EntitySnapshot>>;

/// Last known fleet status plus the stream's connection state.
///
/// Every message replaces the whole list. Disconnects keep the stale list so
/// the view never blanks.
#[derive(Debug, Clone)]
pub struct Fleet {
    entities: Vec<EntitySnapshot>,
    state: ChannelState,
    received: bool,
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            state: ChannelState::Disconnected,
            received: false,
        }
    }
}

impl Fleet {
    pub fn apply(&mut self, event: StatusEvent) {
        match event {
            ChannelEvent::State(state) => self.state = state,
            ChannelEvent::Message(list) => {
                self.entities = list;
                self.received = true;
            }
        }
    }

    pub fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// False until the first snapshot arrives.
    pub fn has_data(&self) -> bool {
        self.received
    }
}

/// Projection of the fleet onto one bot.
#[derive(Debug, Clone)]
pub struct DetailView {
    id: String,
    current: Option<EntitySnapshot>,
}

impl DetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Pick this bot out of a snapshot list. Returns false (and keeps the last
    /// known state) when the bot is absent.
    pub fn observe(&mut self, entities: &[EntitySnapshot]) -> bool {
        match entities.iter().find(|e| e.id == self.id) {
            Some(found) => {
                self.current = Some(found.clone());
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&EntitySnapshot> {
        self.current.as_ref()
    }
}
