use std::collections::VecDeque;

/// Seconds a notification stays on screen.
pub(crate) const NOTIFICATION_TTL_SECONDS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
struct ActiveNotification {
    seq: u64,
    message: String,
    expires_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledClear {
    seq: u64,
    due_at: f64,
}

/// Single-slot transient message with its own clear queue.
///
/// Every `notify` replaces the slot and schedules a clear tagged with the
/// message's sequence number. A clear that comes due after the slot has been
/// replaced finds a different tag and leaves the newer message alone.
#[derive(Debug)]
pub(crate) struct NotificationTimer {
    ttl_seconds: f64,
    next_seq: u64,
    current: Option<ActiveNotification>,
    pending_clears: VecDeque<ScheduledClear>,
}

impl Default for NotificationTimer {
    fn default() -> Self {
        Self::with_ttl(NOTIFICATION_TTL_SECONDS)
    }
}

impl NotificationTimer {
    pub(crate) fn with_ttl(ttl_seconds: f64) -> Self {
        Self {
            ttl_seconds,
            next_seq: 0,
            current: None,
            pending_clears: VecDeque::new(),
        }
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, now: f64) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        let due_at = now + self.ttl_seconds;
        self.current = Some(ActiveNotification {
            seq,
            message: message.into(),
            expires_at: due_at,
        });

        let at = self
            .pending_clears
            .partition_point(|clear| clear.due_at <= due_at);
        self.pending_clears.insert(at, ScheduledClear { seq, due_at });
    }

    /// Fires every clear due at or before `now`. Returns true when the visible
    /// message was removed.
    pub(crate) fn tick(&mut self, now: f64) -> bool {
        let mut cleared = false;
        while let Some(clear) = self.pending_clears.front().copied() {
            if clear.due_at > now {
                break;
            }
            self.pending_clears.pop_front();
            if self
                .current
                .as_ref()
                .is_some_and(|active| active.seq == clear.seq)
            {
                self.current = None;
                cleared = true;
            }
        }
        cleared
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|active| active.message.as_str())
    }

    pub(crate) fn expires_at(&self) -> Option<f64> {
        self.current.as_ref().map(|active| active.expires_at)
    }

    #[cfg(test)]
    pub(crate) fn pending_clear_count(&self) -> usize {
        self.pending_clears.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_survives_until_ttl() {
        let mut timer = NotificationTimer::default();
        timer.notify("Piuma raccolta! (1/12)", 10.0);

        assert!(!timer.tick(13.9));
        assert_eq!(timer.current(), Some("Piuma raccolta! (1/12)"));
        assert_eq!(timer.expires_at(), Some(14.0));

        assert!(timer.tick(14.0));
        assert_eq!(timer.current(), None);
        assert_eq!(timer.pending_clear_count(), 0);
    }

    #[test]
    fn stale_clear_does_not_remove_newer_message() {
        let mut timer = NotificationTimer::default();
        timer.notify("first", 0.0);
        timer.notify("second", 3.0);

        assert!(!timer.tick(4.5));
        assert_eq!(timer.current(), Some("second"));

        assert!(timer.tick(7.0));
        assert_eq!(timer.current(), None);
    }

    #[test]
    fn late_tick_drains_every_due_clear() {
        let mut timer = NotificationTimer::with_ttl(1.0);
        timer.notify("a", 0.0);
        timer.notify("b", 0.5);
        timer.notify("c", 0.7);

        assert!(timer.tick(100.0));
        assert_eq!(timer.pending_clear_count(), 0);
        assert_eq!(timer.current(), None);
    }

    #[test]
    fn clears_stay_time_ordered_for_out_of_order_notifies() {
        let mut timer = NotificationTimer::with_ttl(1.0);
        timer.notify("late", 5.0);
        timer.notify("early", 1.0);

        // "early" is visible and its clear is due first.
        assert!(timer.tick(2.0));
        assert_eq!(timer.pending_clear_count(), 1);
    }

    #[test]
    fn dropping_timer_with_pending_clears_is_safe() {
        let mut timer = NotificationTimer::default();
        timer.notify("pending", 0.0);
        drop(timer);
    }
}
