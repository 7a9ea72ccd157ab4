// SPDX-License-Identifier: MIT OR Apache-2.0
//! Leveled notices shown at the bottom of the window.
//!
//! Most notices are pushed on the UI thread. Background jobs that report
//! progress per item hold a clone of the [`Noticer`] and push from their
//! worker thread, so the queue sits behind a shared mutex. Each notice
//! expires after the configured lifetime.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

const NOTICE_HEIGHT: f32 = 30.0;
const NOTICE_MARGIN: f32 = 10.0;
const MAX_NOTICES: usize = 16;

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    /// Something succeeded
    Info,
    /// Nothing happened that the user expected
    Warn,
    /// An operation failed
    Error,
}

impl NoticeLevel {
    /// Background color of the notice bar
    pub fn color(&self) -> egui::Color32 {
        match self {
            Self::Info => egui::Color32::from_rgb(58, 110, 165),
            Self::Warn => egui::Color32::from_rgb(255, 128, 0),
            Self::Error => egui::Color32::from_rgb(204, 51, 0),
        }
    }
}

/// A single message with its expiry time
#[derive(Debug, Clone)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
    /// When the notice disappears
    pub expires_at: Instant,
}

/// Shared queue of visible notices
#[derive(Debug, Clone)]
pub struct Noticer {
    notices: Arc<Mutex<VecDeque<Notice>>>,
    lifetime: Duration,
}

impl Noticer {
    /// Create an empty queue
    pub fn new(lifetime: Duration) -> Self {
        Self {
            notices: Arc::new(Mutex::new(VecDeque::new())),
            lifetime,
        }
    }

    /// Push a notice and log it at the matching level
    pub fn push(&self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => tracing::info!("{message}"),
            NoticeLevel::Warn => tracing::warn!("{message}"),
            NoticeLevel::Error => tracing::error!("{message}"),
        }

        let mut notices = self.notices.lock();
        notices.push_back(Notice {
            level,
            message,
            expires_at: Instant::now() + self.lifetime,
        });
        while notices.len() > MAX_NOTICES {
            notices.pop_front();
        }
    }

    /// Push an info notice
    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    /// Push a warning notice
    pub fn warn(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Warn, message);
    }

    /// Push an error notice
    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Drop notices that expired before `now`
    pub fn expire(&self, now: Instant) {
        self.notices.lock().retain(|notice| notice.expires_at > now);
    }

    /// Copy of the visible notices, oldest first
    pub fn visible(&self) -> Vec<Notice> {
        self.notices.lock().iter().cloned().collect()
    }

    /// Draw the notices stacked upwards from the bottom of the screen
    pub fn show(&self, ctx: &egui::Context) {
        self.expire(Instant::now());
        let notices = self.visible();
        if notices.is_empty() {
            return;
        }

        let screen = ctx.screen_rect();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("notices"),
        ));

        for (i, notice) in notices.iter().enumerate() {
            let bottom = screen.max.y - NOTICE_MARGIN - (NOTICE_HEIGHT + NOTICE_MARGIN) * i as f32;
            let rect = egui::Rect::from_min_max(
                egui::pos2(screen.min.x + NOTICE_MARGIN, bottom - NOTICE_HEIGHT),
                egui::pos2(screen.max.x - NOTICE_MARGIN, bottom),
            );
            painter.rect_filled(rect, 2.0, notice.level.color());
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &notice.message,
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
        }

        // Keep repainting so notices disappear on time
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_expire() {
        let noticer = Noticer::new(Duration::from_secs(5));
        noticer.info("3 sprites are loaded!");
        noticer.error("boom");
        assert_eq!(noticer.visible().len(), 2);

        noticer.expire(Instant::now());
        assert_eq!(noticer.visible().len(), 2);

        noticer.expire(Instant::now() + Duration::from_secs(6));
        assert!(noticer.visible().is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let noticer = Noticer::new(Duration::from_secs(5));
        let handle = noticer.clone();
        std::thread::spawn(move || handle.warn("No sprite is loaded!"))
            .join()
            .unwrap();

        let visible = noticer.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].level, NoticeLevel::Warn);
        assert_eq!(visible[0].message, "No sprite is loaded!");
    }

    #[test]
    fn test_queue_is_bounded() {
        let noticer = Noticer::new(Duration::from_secs(5));
        for i in 0..(MAX_NOTICES + 4) {
            noticer.info(format!("notice {i}"));
        }
        assert_eq!(noticer.visible().len(), MAX_NOTICES);
        assert_eq!(noticer.visible()[0].message, "notice 4");
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(NoticeLevel::Info.color(), egui::Color32::from_rgb(58, 110, 165));
        assert_eq!(NoticeLevel::Warn.color(), egui::Color32::from_rgb(255, 128, 0));
        assert_eq!(NoticeLevel::Error.color(), egui::Color32::from_rgb(204, 51, 0));
    }
}
