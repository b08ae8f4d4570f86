//! Transient user-visible messages that dismiss themselves after a
//! severity-dependent lifetime.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn lifetime(&self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_secs(3),
            Severity::Warning => Duration::from_secs(4),
            Severity::Error => Duration::from_secs(5),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Info => "💡",
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.severity.lifetime()
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Keeps the visible stack plus a bounded log of everything shown.
pub struct NotificationCenter {
    inner: Mutex<CenterState>,
    max_visible: usize,
}

struct CenterState {
    next_id: u64,
    visible: VecDeque<Notification>,
    shown: Vec<Notification>,
}

const SHOWN_LOG_LIMIT: usize = 100;

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(5)
    }
}

impl NotificationCenter {
    pub fn new(max_visible: usize) -> Self {
        Self {
            inner: Mutex::new(CenterState {
                next_id: 1,
                visible: VecDeque::new(),
                shown: Vec::new(),
            }),
            max_visible: max_visible.max(1),
        }
    }

    pub fn push_at(&self, severity: Severity, message: &str, now: Instant) -> u64 {
        let Ok(mut state) = self.inner.lock() else {
            return 0;
        };
        let id = state.next_id;
        state.next_id += 1;

        let notification = Notification {
            id,
            severity,
            message: message.to_string(),
            shown_at: now,
        };
        state.visible.push_back(notification.clone());
        while state.visible.len() > self.max_visible {
            state.visible.pop_front();
        }
        state.shown.push(notification);
        if state.shown.len() > SHOWN_LOG_LIMIT {
            state.shown.remove(0);
        }
        id
    }

    /// Visible notifications at `now`; expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let Ok(mut state) = self.inner.lock() else {
            return Vec::new();
        };
        state.visible.retain(|n| n.expires_at() > now);
        state.visible.iter().cloned().collect()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    pub fn dismiss(&self, id: u64) {
        if let Ok(mut state) = self.inner.lock() {
            state.visible.retain(|n| n.id != id);
        }
    }

    /// Everything shown so far, oldest first.
    pub fn shown(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|state| state.shown.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.inner
            .lock()
            .ok()
            .and_then(|state| state.shown.last().cloned())
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => log::error!("{} {}", severity.icon(), message),
            Severity::Warning => log::warn!("{} {}", severity.icon(), message),
            _ => log::info!("{} {}", severity.icon(), message),
        }
        self.push_at(severity, message, Instant::now());
    }
}
