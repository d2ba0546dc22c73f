use crate::Result;
use anyhow::bail;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One-shot operations guarded against double submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Delete,
    Create,
    SaveConfig,
    SaveSettings,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Delete => "delete",
            Action::Create => "create",
            Action::SaveConfig => "save config",
            Action::SaveSettings => "save settings",
        };
        f.write_str(s)
    }
}

type ActionKey = (Action, String);

/// Pending/idle state per (action, target). A second request for the same
/// key while the first is in flight is refused.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    pending: Arc<Mutex<HashSet<ActionKey>>>,
}

impl ActionGate {
    pub fn begin(&self, action: Action, target: &str) -> Result<PendingAction> {
        let key = (action, target.to_string());
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !pending.insert(key.clone()) {
            bail!("{} {} is already in progress", action, target);
        }
        Ok(PendingAction {
            pending: Arc::clone(&self.pending),
            key,
        })
    }
}

/// Marks an action in flight; the action returns to idle when dropped.
#[derive(Debug)]
pub struct PendingAction {
    pending: Arc<Mutex<HashSet<ActionKey>>>,
    key: ActionKey,
}

impl Drop for PendingAction {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.key);
    }
}
