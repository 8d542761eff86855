use std::time::Duration;

/// How long a banner stays on screen.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: Level,
    pub posted_at: Duration,
}

impl Notice {
    pub fn remaining(&self, now: Duration) -> Duration {
        (self.posted_at + NOTICE_LIFETIME).saturating_sub(now)
    }
}

#[derive(Debug, Clone)]
struct Pending {
    due: Duration,
    message: String,
    level: Level,
}

/// Stack of transient banners. Timestamps are session-relative so the
/// same code runs under a terminal clock and `performance.now()`.
#[derive(Debug, Default)]
pub struct Notices {
    active: Vec<Notice>,
    pending: Vec<Pending>,
    next_id: u64,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, message: impl Into<String>, level: Level, now: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, level = level.as_str(), %message, "notice posted");
        // newest first, banners stack downwards from the top
        self.active.insert(
            0,
            Notice {
                id,
                message,
                level,
                posted_at: now,
            },
        );
        id
    }

    pub fn post_later(
        &mut self,
        message: impl Into<String>,
        level: Level,
        now: Duration,
        delay: Duration,
    ) {
        self.pending.push(Pending {
            due: now + delay,
            message: message.into(),
            level,
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.active.retain(|notice| notice.id != id);
    }

    /// Promotes due delayed notices and drops expired ones.
    pub fn tick(&mut self, now: Duration) {
        let mut due = Vec::new();
        self.pending.retain(|pending| {
            if pending.due <= now {
                due.push(pending.clone());
                false
            } else {
                true
            }
        });
        for pending in due {
            // a late tick still stamps the notice with its due time
            self.post(pending.message, pending.level, pending.due);
        }

        self.active
            .retain(|notice| notice.posted_at + NOTICE_LIFETIME > now);
    }

    pub fn active(&self) -> &[Notice] {
        &self.active
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
