//! User-visible outcome log
//!
//! A bounded FIFO of info/error entries behind a tray that shows itself on
//! every push and fades out after an idle timeout. Time only moves through
//! `tick_at()`, which a frontend polls at a fixed interval; the tray's
//! countdown is paused while the pointer hovers it.
//!
//! Every entry is mirrored to the developer log at debug level, since the
//! ring buffer drops old entries. Frontends print the entries themselves.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 10;

/// Kind of outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

/// One logged outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NotificationEntry {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NotificationKind::Error)
    }
}

impl fmt::Display for NotificationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.created_at.format("%H:%M"), self.message)
    }
}

/// Timing and capacity settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub capacity: usize,
    /// Idle time before the tray hides
    pub decay: TimeDelta,
    /// Final part of `decay` during which opacity falls to zero
    pub fade: TimeDelta,
    /// Entries older than this are evicted on tick
    pub retention: Option<TimeDelta>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            decay: TimeDelta::milliseconds(2000),
            fade: TimeDelta::milliseconds(1000),
            retention: Some(TimeDelta::seconds(300)),
        }
    }
}

/// Bounded, decaying notification queue
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<NotificationEntry>,
    settings: NotificationSettings,
    visible: bool,
    hovered: bool,
    remaining: TimeDelta,
    last_tick: Option<DateTime<Utc>>,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(NotificationSettings::default())
    }
}

impl NotificationLog {
    #[must_use]
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            entries: VecDeque::with_capacity(settings.capacity + 1),
            settings,
            visible: false,
            hovered: false,
            remaining: settings.decay,
            last_tick: None,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.push_at(kind, message, Utc::now());
    }

    /// Append an entry, evicting the oldest past capacity, and show the tray
    pub fn push_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        let message = message.into();
        tracing::debug!(?kind, %message, "notification");
        self.entries.push_back(NotificationEntry {
            kind,
            message,
            created_at: now,
        });
        while self.entries.len() > self.settings.capacity {
            self.entries.pop_front();
        }
        self.show_at(now);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    /// Show the tray at full opacity and restart the countdown
    fn show_at(&mut self, now: DateTime<Utc>) {
        self.visible = true;
        self.remaining = self.settings.decay;
        self.last_tick = Some(now);
    }

    /// Close the tray immediately
    pub const fn hide(&mut self) {
        self.visible = false;
        self.hovered = false;
    }

    /// Pointer entered the tray: pause decay at full opacity
    pub fn pointer_enter(&mut self, now: DateTime<Utc>) {
        self.hovered = true;
        self.show_at(now);
    }

    /// Pointer left the tray: resume decay from the full timeout
    pub fn pointer_leave(&mut self, now: DateTime<Utc>) {
        self.hovered = false;
        self.remaining = self.settings.decay;
        self.last_tick = Some(now);
    }

    pub fn tick(&mut self) {
        self.tick_at(Utc::now());
    }

    /// Advance timers to `now`
    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        let elapsed = self
            .last_tick
            .map_or(TimeDelta::zero(), |last| (now - last).max(TimeDelta::zero()));
        self.last_tick = Some(now);

        if let Some(retention) = self.settings.retention {
            while self
                .entries
                .front()
                .is_some_and(|e| now - e.created_at > retention)
            {
                self.entries.pop_front();
            }
        }

        if self.hovered || !self.visible {
            return;
        }
        self.remaining = self.remaining - elapsed;
        if self.remaining <= TimeDelta::zero() {
            self.visible = false;
        }
    }

    /// Tray opacity in `[0, 1]`, fading during the last `fade` interval
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if !self.visible {
            return 0.0;
        }
        let fade = self.settings.fade.num_milliseconds();
        let remaining = self.remaining.num_milliseconds();
        if fade <= 0 || remaining >= fade {
            1.0
        } else {
            (remaining.max(0) as f32) / (fade as f32)
        }
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &NotificationEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&NotificationEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_error()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry
    pub fn drain(&mut self) -> Vec<NotificationEntry> {
        self.entries.drain(..).collect()
    }

    #[must_use]
    pub const fn settings(&self) -> &NotificationSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ms(n: i64) -> TimeDelta {
        TimeDelta::milliseconds(n)
    }

    #[test]
    fn test_eleventh_entry_evicts_oldest() {
        let mut log = NotificationLog::default();
        for i in 0..11 {
            log.push_at(NotificationKind::Info, format!("event {i}"), t0());
        }
        assert_eq!(log.len(), 10);
        assert_eq!(log.entries().next().unwrap().message, "event 1");
        assert_eq!(log.latest().unwrap().message, "event 10");
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut log = NotificationLog::new(NotificationSettings {
            capacity: 3,
            ..NotificationSettings::default()
        });
        for i in 0..50 {
            log.push_at(NotificationKind::Error, i.to_string(), t0());
            assert!(log.len() <= 3);
        }
        let messages: Vec<_> = log.entries().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["47", "48", "49"]);
    }

    #[test]
    fn test_tray_hides_after_decay() {
        let mut log = NotificationLog::default();
        log.push_at(NotificationKind::Info, "saved", t0());
        assert!(log.is_visible());

        let mut now = t0();
        for _ in 0..39 {
            now += ms(50);
            log.tick_at(now);
        }
        assert!(log.is_visible());

        now += ms(50);
        log.tick_at(now);
        assert!(!log.is_visible());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_hover_pauses_and_leave_restarts_countdown() {
        let mut log = NotificationLog::default();
        log.push_at(NotificationKind::Info, "saved", t0());

        log.tick_at(t0() + ms(1500));
        log.pointer_enter(t0() + ms(1500));
        log.tick_at(t0() + ms(60_000));
        assert!(log.is_visible());
        assert!((log.opacity() - 1.0).abs() < f32::EPSILON);

        let left = t0() + ms(60_000);
        log.pointer_leave(left);
        log.tick_at(left + ms(1900));
        assert!(log.is_visible());
        log.tick_at(left + ms(2100));
        assert!(!log.is_visible());
    }

    #[test]
    fn test_opacity_fades_in_last_second() {
        let mut log = NotificationLog::default();
        log.push_at(NotificationKind::Info, "saved", t0());
        assert!((log.opacity() - 1.0).abs() < f32::EPSILON);

        log.tick_at(t0() + ms(1500));
        assert!((log.opacity() - 0.5).abs() < 0.01);

        log.hide();
        assert!(log.opacity().abs() < f32::EPSILON);
    }

    #[test]
    fn test_push_restarts_countdown() {
        let mut log = NotificationLog::default();
        log.push_at(NotificationKind::Info, "one", t0());
        log.tick_at(t0() + ms(1800));
        log.push_at(NotificationKind::Error, "two", t0() + ms(1800));
        log.tick_at(t0() + ms(3000));
        assert!(log.is_visible());
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn test_retention_evicts_old_entries() {
        let mut log = NotificationLog::new(NotificationSettings {
            retention: Some(TimeDelta::seconds(10)),
            ..NotificationSettings::default()
        });
        log.push_at(NotificationKind::Info, "old", t0());
        log.push_at(NotificationKind::Info, "new", t0() + TimeDelta::seconds(8));

        log.tick_at(t0() + TimeDelta::seconds(11));
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["new"]);
    }
}
