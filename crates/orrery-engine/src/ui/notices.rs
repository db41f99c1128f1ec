//! User-facing messages: loading status line, bounded debug log, timed toasts
//! and levelled notifications.
//!
//! The core posts [`Notice`]s; the board stamps durations, keeps the live
//! state for queries and queues [`HostNotice`]s for the UI shell to render.

use serde::Serialize;

/// Severity of a corner notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// A message produced by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Replaces the loading status line; also written to the debug log.
    Status(String),
    /// Debug panel only.
    Debug(String),
    /// Short-lived message near the bottom of the screen.
    Toast(String),
    /// Corner notification with a level.
    Notify(NoticeLevel, String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Status(t) | Notice::Debug(t) | Notice::Toast(t) | Notice::Notify(_, t) => t,
        }
    }
}

/// What the host receives, serialized as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostNotice {
    Status { text: String },
    Debug { text: String },
    /// The debug panel overflowed and was wiped.
    DebugCleared,
    Toast { text: String, duration_ms: u32 },
    Notification { text: String, level: NoticeLevel, duration_ms: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct NoticeTimings {
    pub debug_log_capacity: usize,
    pub toast_ms: u32,
    pub notification_ms: u32,
}

impl Default for NoticeTimings {
    fn default() -> Self {
        Self {
            debug_log_capacity: 30,
            toast_ms: 3000,
            notification_ms: 6000,
        }
    }
}

pub const DEBUG_CLEARED: &str = "Debug cleared (too many messages)";

#[derive(Debug, Clone, PartialEq)]
struct Timed {
    text: String,
    level: Option<NoticeLevel>,
    remaining: f32,
}

pub struct NoticeBoard {
    timings: NoticeTimings,
    status: String,
    debug_log: Vec<String>,
    /// Messages counted toward the capacity since the last wipe.
    debug_count: usize,
    toasts: Vec<Timed>,
    notifications: Vec<Timed>,
    outbox: Vec<HostNotice>,
}

impl NoticeBoard {
    pub fn new(timings: NoticeTimings) -> Self {
        Self {
            timings,
            status: String::new(),
            debug_log: Vec::new(),
            debug_count: 0,
            toasts: Vec::new(),
            notifications: Vec::new(),
            outbox: Vec::new(),
        }
    }

    pub fn post(&mut self, notice: Notice) {
        match notice {
            Notice::Status(text) => {
                self.status = text.clone();
                self.outbox.push(HostNotice::Status { text: text.clone() });
                self.push_debug(text);
            }
            Notice::Debug(text) => self.push_debug(text),
            Notice::Toast(text) => {
                let duration_ms = self.timings.toast_ms;
                self.toasts.push(Timed {
                    text: text.clone(),
                    level: None,
                    remaining: duration_ms as f32 / 1000.0,
                });
                self.outbox.push(HostNotice::Toast { text, duration_ms });
            }
            Notice::Notify(level, text) => {
                let duration_ms = self.timings.notification_ms;
                self.notifications.push(Timed {
                    text: text.clone(),
                    level: Some(level),
                    remaining: duration_ms as f32 / 1000.0,
                });
                self.outbox.push(HostNotice::Notification { text, level, duration_ms });
            }
        }
    }

    pub fn post_all(&mut self, notices: impl IntoIterator<Item = Notice>) {
        for notice in notices {
            self.post(notice);
        }
    }

    fn push_debug(&mut self, text: String) {
        if self.debug_count > self.timings.debug_log_capacity {
            self.debug_log.clear();
            self.debug_log.push(DEBUG_CLEARED.to_string());
            self.debug_count = 0;
            self.outbox.push(HostNotice::DebugCleared);
        }
        self.debug_log.push(text.clone());
        self.debug_count += 1;
        self.outbox.push(HostNotice::Debug { text });
    }

    /// Age toasts and notifications by `dt` seconds, dropping expired ones.
    pub fn tick(&mut self, dt: f32) {
        for list in [&mut self.toasts, &mut self.notifications] {
            for item in list.iter_mut() {
                item.remaining -= dt;
            }
            list.retain(|t| t.remaining > 0.0);
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn debug_log(&self) -> &[String] {
        &self.debug_log
    }

    pub fn active_toasts(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|t| t.text.as_str())
    }

    pub fn active_notifications(&self) -> impl Iterator<Item = (NoticeLevel, &str)> {
        self.notifications
            .iter()
            .map(|t| (t.level.unwrap_or(NoticeLevel::Info), t.text.as_str()))
    }

    /// Hand queued notices to the host.
    pub fn drain(&mut self) -> Vec<HostNotice> {
        std::mem::take(&mut self.outbox)
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(NoticeTimings::default())
    }
}
