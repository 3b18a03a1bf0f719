use alloc::string::String;

/// A column resize in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeSession {
    pub column_key: String,
    /// Last width written during the drag; 0 until the first update.
    pub live_width: u32,
}

/// Tracks the active resize session and rate-limits intermediate notifications.
///
/// Time is supplied by the caller (`now_ms`), like every other clock in this crate.
#[derive(Clone, Debug)]
pub struct ResizeController {
    session: Option<ResizeSession>,
    interval_ms: u64,
    last_notified_ms: Option<u64>,
}

impl ResizeController {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            session: None,
            interval_ms,
            last_notified_ms: None,
        }
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn start(&mut self, column_key: impl Into<String>) {
        let column_key = column_key.into();
        ptrace!(key = column_key.as_str(), "resize start");
        self.session = Some(ResizeSession {
            column_key,
            live_width: 0,
        });
        self.last_notified_ms = None;
    }

    /// Records a live width. Returns whether an intermediate notification is due.
    ///
    /// An update for a column other than the active one replaces the session.
    pub fn update(&mut self, column_key: &str, width: u32, now_ms: u64) -> bool {
        let active = self
            .session
            .as_ref()
            .is_some_and(|s| s.column_key == column_key);
        if !active {
            pwarn!(key = column_key, "resize update without a matching session");
            self.start(column_key);
        }
        if let Some(session) = &mut self.session {
            session.live_width = width;
        }

        let due = match self.last_notified_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
            None => true,
        };
        if due {
            self.last_notified_ms = Some(now_ms);
        }
        due
    }

    /// Closes the session. Returns it when a width was recorded.
    pub fn stop(&mut self) -> Option<ResizeSession> {
        self.last_notified_ms = None;
        self.session.take().filter(|s| s.live_width > 0)
    }
}
