#![forbid(unsafe_code)]

//! Toast queue driven by the host clock.
//!
//! The queue provides:
//! - FIFO ordering with a maximum visible limit
//! - Content-based deduplication within a configurable time window
//! - Per-kind display durations; loading toasts stay until resolved
//! - Tag-based replacement, so a loading toast turns into its outcome
//!
//! Time never comes from the system clock. Every call that needs "now" takes
//! it from the host.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use kartan_runtime::{Toast, ToastKind};
//! use kartan_web::notify::{NotificationQueue, QueueAction, QueueConfig};
//!
//! let mut queue = NotificationQueue::new(QueueConfig::default());
//! let id = queue
//!     .push(&Toast::new(ToastKind::Success, "Sparat"), Duration::ZERO)
//!     .unwrap();
//! assert_eq!(queue.tick(Duration::ZERO), vec![QueueAction::Show(id)]);
//! assert_eq!(queue.tick(Duration::from_secs(2)), vec![QueueAction::Hide(id)]);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::time::Duration;

use kartan_runtime::config::NotifyConfig;
use kartan_runtime::{Toast, ToastKind};
use tracing::debug;

/// Identifier of one notification, unique per queue.
pub type NotificationId = u64;

/// Queue limits and display durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of toasts visible at once.
    pub max_visible: usize,
    /// Maximum number of notifications waiting in queue.
    pub max_queued: usize,
    /// Identical toasts inside this window are dropped.
    pub dedup_window: Duration,
    pub success: Duration,
    pub error: Duration,
    pub info: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::from(&NotifyConfig::default())
    }
}

impl From<&NotifyConfig> for QueueConfig {
    fn from(c: &NotifyConfig) -> Self {
        Self {
            max_visible: c.max_visible,
            max_queued: c.max_queued,
            dedup_window: c.dedup_window(),
            success: Duration::from_millis(c.success_ms),
            error: Duration::from_millis(c.error_ms),
            info: Duration::from_millis(c.info_ms),
        }
    }
}

impl QueueConfig {
    /// Display time for a kind. `None` means until replaced or dismissed.
    #[must_use]
    pub fn duration_for(&self, kind: ToastKind) -> Option<Duration> {
        match kind {
            ToastKind::Loading => None,
            ToastKind::Success => Some(self.success),
            ToastKind::Error => Some(self.error),
            ToastKind::Info => Some(self.info),
        }
    }
}

/// One toast as the host renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: ToastKind,
    pub message: String,
    pub tag: Option<String>,
    /// Set when the toast becomes visible.
    pub shown_at: Option<Duration>,
    duration: Option<Duration>,
}

impl Notification {
    /// When the toast disappears, if it is visible and not sticky.
    #[must_use]
    pub fn expires_at(&self) -> Option<Duration> {
        Some(self.shown_at?.saturating_add(self.duration?))
    }

    fn is_expired(&self, now: Duration) -> bool {
        self.expires_at().is_some_and(|t| t <= now)
    }
}

fn content_hash(kind: ToastKind, message: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    message.hash(&mut hasher);
    hasher.finish()
}

/// Actions returned by [`NotificationQueue::tick`] and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueAction {
    Show(NotificationId),
    Hide(NotificationId),
    /// A visible toast changed kind or text.
    Update(NotificationId),
}

/// Queue statistics for monitoring and debugging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub total_pushed: u64,
    /// Rejected because the queue was full.
    pub overflow_count: u64,
    /// Rejected as duplicates.
    pub dedup_count: u64,
    pub resolved: u64,
    pub user_dismissed: u64,
    pub auto_expired: u64,
}

/// Notification queue manager.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    queue: VecDeque<Notification>,
    visible: Vec<Notification>,
    config: QueueConfig,
    recent_hashes: HashMap<u64, Duration>,
    next_id: NotificationId,
    stats: QueueStats,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl NotificationQueue {
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            visible: Vec::new(),
            config,
            recent_hashes: HashMap::new(),
            next_id: 1,
            stats: QueueStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Queue a toast.
    ///
    /// A tagged toast replaces the live notification with the same tag and
    /// returns its id. Otherwise returns the new id, or `None` when the toast
    /// was rejected as a duplicate or because the queue is full.
    pub fn push(&mut self, toast: &Toast, now: Duration) -> Option<NotificationId> {
        self.stats.total_pushed += 1;

        if let Some(tag) = toast.tag.as_deref()
            && let Some(id) = self.find_tag(tag)
        {
            self.resolve(id, toast.kind, &toast.message, now);
            return Some(id);
        }

        let hash = content_hash(toast.kind, &toast.message);
        if !self.dedup_check(hash, now) {
            self.stats.dedup_count += 1;
            debug!(target: "kartan.web", message = %toast.message, "duplicate toast dropped");
            return None;
        }
        if self.queue.len() >= self.config.max_queued {
            self.stats.overflow_count += 1;
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.queue.push_back(Notification {
            id,
            kind: toast.kind,
            message: toast.message.clone(),
            tag: toast.tag.clone(),
            shown_at: None,
            duration: self.config.duration_for(toast.kind),
        });
        Some(id)
    }

    /// Change a notification's kind and text. A visible toast restarts its
    /// display time. Returns `false` for unknown ids.
    pub fn resolve(
        &mut self,
        id: NotificationId,
        kind: ToastKind,
        message: &str,
        now: Duration,
    ) -> bool {
        let duration = self.config.duration_for(kind);
        let Some(n) = self
            .visible
            .iter_mut()
            .chain(self.queue.iter_mut())
            .find(|n| n.id == id)
        else {
            return false;
        };
        n.kind = kind;
        n.message = message.to_owned();
        n.duration = duration;
        if n.shown_at.is_some() {
            n.shown_at = Some(now);
        }
        self.stats.resolved += 1;
        true
    }

    /// Remove a notification now.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(idx) = self.visible.iter().position(|n| n.id == id) {
            self.visible.remove(idx);
            self.stats.user_dismissed += 1;
            return true;
        }
        if let Some(idx) = self.queue.iter().position(|n| n.id == id) {
            self.queue.remove(idx);
            self.stats.user_dismissed += 1;
            return true;
        }
        false
    }

    /// Expire visible toasts and promote waiting ones.
    pub fn tick(&mut self, now: Duration) -> Vec<QueueAction> {
        let mut actions = Vec::new();

        let window = self.config.dedup_window;
        self.recent_hashes
            .retain(|_, t| now.saturating_sub(*t) < window);

        let mut i = 0;
        while i < self.visible.len() {
            if self.visible[i].is_expired(now) {
                let id = self.visible.remove(i).id;
                self.stats.auto_expired += 1;
                actions.push(QueueAction::Hide(id));
            } else {
                i += 1;
            }
        }

        while self.visible.len() < self.config.max_visible {
            let Some(mut n) = self.queue.pop_front() else {
                break;
            };
            n.shown_at = Some(now);
            actions.push(QueueAction::Show(n.id));
            self.visible.push(n);
        }

        actions
    }

    /// Earliest time a visible toast expires. The host schedules its next
    /// tick for then.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.visible.iter().filter_map(Notification::expires_at).min()
    }

    #[inline]
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[inline]
    pub fn total_count(&self) -> usize {
        self.visible.len() + self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.queue.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    fn find_tag(&self, tag: &str) -> Option<NotificationId> {
        self.visible
            .iter()
            .chain(self.queue.iter())
            .find(|n| n.tag.as_deref() == Some(tag))
            .map(|n| n.id)
    }

    fn dedup_check(&mut self, hash: u64, now: Duration) -> bool {
        let window = self.config.dedup_window;
        if let Some(&seen) = self.recent_hashes.get(&hash)
            && now.saturating_sub(seen) < window
        {
            return false;
        }
        self.recent_hashes.insert(hash, now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn toast(kind: ToastKind, message: &str) -> Toast {
        Toast::new(kind, message)
    }

    #[test]
    fn durations_follow_kind() {
        let config = QueueConfig::default();
        assert_eq!(config.duration_for(ToastKind::Success), Some(ms(2000)));
        assert_eq!(config.duration_for(ToastKind::Error), Some(ms(4000)));
        assert_eq!(config.duration_for(ToastKind::Loading), None);
    }

    #[test]
    fn fifo_with_visible_limit() {
        let mut q = NotificationQueue::default();
        let ids: Vec<_> = (0..5)
            .map(|i| q.push(&toast(ToastKind::Info, &format!("t{i}")), ms(0)).unwrap())
            .collect();
        let shown = q.tick(ms(0));
        assert_eq!(
            shown,
            ids[..3].iter().map(|&id| QueueAction::Show(id)).collect::<Vec<_>>()
        );
        assert_eq!(q.pending_count(), 2);

        let actions = q.tick(ms(4000));
        assert_eq!(
            actions,
            vec![
                QueueAction::Hide(ids[0]),
                QueueAction::Hide(ids[1]),
                QueueAction::Hide(ids[2]),
                QueueAction::Show(ids[3]),
                QueueAction::Show(ids[4]),
            ]
        );
        assert_eq!(q.stats().auto_expired, 3);
    }

    #[test]
    fn expiry_uses_host_time() {
        let mut q = NotificationQueue::default();
        let id = q.push(&toast(ToastKind::Success, "ok"), ms(0)).unwrap();
        q.tick(ms(100));
        assert_eq!(q.next_deadline(), Some(ms(2100)));
        assert!(q.tick(ms(2099)).is_empty());
        assert_eq!(q.tick(ms(2100)), vec![QueueAction::Hide(id)]);
        assert!(q.is_empty());
    }

    #[test]
    fn duplicates_inside_window_are_dropped() {
        let mut q = NotificationQueue::default();
        assert!(q.push(&toast(ToastKind::Error, "fel"), ms(0)).is_some());
        assert!(q.push(&toast(ToastKind::Error, "fel"), ms(500)).is_none());
        assert!(q.push(&toast(ToastKind::Info, "fel"), ms(500)).is_some());
        assert!(q.push(&toast(ToastKind::Error, "fel"), ms(1000)).is_some());
        assert_eq!(q.stats().dedup_count, 1);
    }

    #[test]
    fn overflow_rejects_new_toasts() {
        let config = QueueConfig {
            max_queued: 2,
            ..QueueConfig::default()
        };
        let mut q = NotificationQueue::new(config);
        assert!(q.push(&toast(ToastKind::Info, "a"), ms(0)).is_some());
        assert!(q.push(&toast(ToastKind::Info, "b"), ms(0)).is_some());
        assert!(q.push(&toast(ToastKind::Info, "c"), ms(0)).is_none());
        assert_eq!(q.stats().overflow_count, 1);
    }

    #[test]
    fn loading_is_sticky_until_resolved_by_tag() {
        let mut q = NotificationQueue::default();
        let loading = Toast::new(ToastKind::Loading, "Skickar...").tagged("submission");
        let id = q.push(&loading, ms(0)).unwrap();
        q.tick(ms(0));
        assert_eq!(q.next_deadline(), None);
        assert!(q.tick(ms(60_000)).is_empty());

        let done = Toast::new(ToastKind::Success, "Klart").tagged("submission");
        assert_eq!(q.push(&done, ms(60_000)), Some(id));
        assert_eq!(q.visible()[0].kind, ToastKind::Success);
        assert_eq!(q.visible()[0].message, "Klart");
        assert_eq!(q.next_deadline(), Some(ms(62_000)));
        assert_eq!(q.stats().resolved, 1);
    }

    #[test]
    fn dismiss_visible_and_queued() {
        let mut q = NotificationQueue::new(QueueConfig {
            max_visible: 1,
            ..QueueConfig::default()
        });
        let a = q.push(&toast(ToastKind::Info, "a"), ms(0)).unwrap();
        let b = q.push(&toast(ToastKind::Info, "b"), ms(0)).unwrap();
        q.tick(ms(0));
        assert!(q.dismiss(b));
        assert!(q.dismiss(a));
        assert!(!q.dismiss(a));
        assert_eq!(q.total_count(), 0);
        assert_eq!(q.stats().user_dismissed, 2);
    }

    #[test]
    fn resolve_unknown_id() {
        let mut q = NotificationQueue::default();
        assert!(!q.resolve(42, ToastKind::Error, "x", ms(0)));
    }
}
