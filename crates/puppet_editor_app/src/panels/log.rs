// SPDX-License-Identifier: MIT OR Apache-2.0
//! Log panel - tracing output inside the editor.

use std::collections::VecDeque;
use std::sync::mpsc;

/// Entries kept before the oldest are dropped
const MAX_ENTRIES: usize = 1000;

/// A tracing event captured by the [`TracingBridge`] layer.
#[derive(Debug, Clone)]
pub struct TracingEvent {
    /// The log level.
    pub level: LogLevel,
    /// The formatted message.
    pub message: String,
    /// Module path of the call site.
    pub target: String,
}

/// A `tracing_subscriber::Layer` that forwards events over an `mpsc` channel
/// so the [`LogPanel`] can display them.
pub struct TracingBridge {
    sender: mpsc::Sender<TracingEvent>,
}

impl TracingBridge {
    /// Create a new bridge and return `(layer, receiver)`.
    pub fn new() -> (Self, mpsc::Receiver<TracingEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<S> tracing_subscriber::Layer<S> for TracingBridge
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        // The panel may already be gone during shutdown
        let _ = self.sender.send(TracingEvent {
            level: LogLevel::from(*meta.level()),
            message: visitor.message,
            target: meta.target().to_string(),
        });
    }
}

/// Collects the `message` field, then any other fields as `name = value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: String) {
        if name == "message" {
            if self.message.is_empty() {
                self.message = value;
            } else {
                self.message = format!("{value}, {}", self.message);
            }
        } else if self.message.is_empty() {
            self.message = format!("{name} = {value}");
        } else {
            self.message.push_str(&format!(", {name} = {value}"));
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), value.to_string());
    }
}

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

    fn short_name(&self) -> &'static str {
        match self {
            Self::Trace => "T",
            Self::Debug => "D",
            Self::Info => "I",
            Self::Warn => "W",
            Self::Error => "E",
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            Self::Trace => egui::Color32::from_rgb(100, 100, 100),
            Self::Debug => egui::Color32::from_rgb(150, 150, 150),
            Self::Info => egui::Color32::from_rgb(200, 200, 200),
            Self::Warn => egui::Color32::from_rgb(255, 200, 80),
            Self::Error => egui::Color32::from_rgb(255, 100, 100),
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    /// Number of identical consecutive messages folded into this entry
    pub count: u32,
}

/// The log panel
pub struct LogPanel {
    receiver: Option<mpsc::Receiver<TracingEvent>>,
    entries: VecDeque<LogEntry>,
    counts: [usize; 5],
    shown: [bool; 5],
    search: String,
    auto_scroll: bool,
}

impl LogPanel {
    /// Create a panel reading from the tracing bridge, if one is installed
    pub fn new(receiver: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        Self {
            receiver,
            entries: VecDeque::new(),
            counts: [0; 5],
            shown: [false, true, true, true, true],
            search: String::new(),
            auto_scroll: true,
        }
    }

    /// Add an entry, folding it into the previous one if identical
    pub fn push(&mut self, level: LogLevel, target: impl Into<String>, message: impl Into<String>) {
        let target = target.into();
        let message = message.into();
        self.counts[level.index()] += 1;

        if let Some(last) = self.entries.back_mut() {
            if last.level == level && last.target == target && last.message == message {
                last.count += 1;
                return;
            }
        }

        self.entries.push_back(LogEntry {
            level,
            target,
            message,
            count: 1,
        });
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counts = [0; 5];
    }

    /// Drain pending tracing events into the panel
    pub fn poll(&mut self) {
        let Some(receiver) = &self.receiver else {
            return;
        };
        let events: Vec<TracingEvent> = receiver.try_iter().collect();
        for event in events {
            self.push(event.level, event.target, event.message);
        }
    }

    /// Entries passing the level toggles and the search filter
    pub fn filtered(&self) -> impl Iterator<Item = &LogEntry> {
        let needle = self.search.to_lowercase();
        self.entries.iter().filter(move |entry| {
            self.shown[entry.level.index()]
                && (needle.is_empty() || entry.message.to_lowercase().contains(&needle))
        })
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll();

        ui.horizontal(|ui| {
            if ui.button("Clear").clicked() {
                self.clear();
            }
            ui.separator();

            for level in LogLevel::ALL {
                let shown = &mut self.shown[level.index()];
                let text = format!("{} {}", level.short_name(), self.counts[level.index()]);
                let color = if *shown { level.color() } else { egui::Color32::GRAY };
                if ui
                    .add(egui::Button::new(egui::RichText::new(text).color(color).monospace()))
                    .clicked()
                {
                    *shown = !*shown;
                }
            }
            ui.separator();

            ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search...")
                    .desired_width(150.0),
            );
            ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
        });

        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(self.auto_scroll)
            .show(ui, |ui| {
                for entry in self.filtered() {
                    let row = ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("[{}]", entry.level.short_name()))
                                .monospace()
                                .color(entry.level.color()),
                        );
                        if entry.count > 1 {
                            ui.label(
                                egui::RichText::new(format!("({})", entry.count))
                                    .monospace()
                                    .color(egui::Color32::from_rgb(150, 150, 200)),
                            );
                        }
                        ui.label(
                            egui::RichText::new(&entry.message)
                                .monospace()
                                .color(entry.level.color()),
                        );
                    });

                    row.response.on_hover_text(&entry.target).context_menu(|ui| {
                        if ui.button("Copy message").clicked() {
                            ui.ctx().copy_text(entry.message.clone());
                            ui.close_menu();
                        }
                    });
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_fold() {
        let mut panel = LogPanel::new(None);
        panel.push(LogLevel::Info, "app", "Exported!");
        panel.push(LogLevel::Info, "app", "Exported!");
        panel.push(LogLevel::Warn, "app", "Exported!");

        let entries: Vec<&LogEntry> = panel.filtered().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].count, 2);
        assert_eq!(panel.counts[LogLevel::Info.index()], 2);
    }

    #[test]
    fn test_filter_by_level_and_search() {
        let mut panel = LogPanel::new(None);
        panel.push(LogLevel::Trace, "app", "hidden by default");
        panel.push(LogLevel::Info, "app", "3 sprites are loaded!");
        panel.push(LogLevel::Error, "app", "Failed to read sprite sheet");
        assert_eq!(panel.filtered().count(), 2);

        panel.search = "SPRITE".to_string();
        assert_eq!(panel.filtered().count(), 2);
        panel.search = "sheet".to_string();
        assert_eq!(panel.filtered().count(), 1);
    }

    #[test]
    fn test_bounded_and_clear() {
        let mut panel = LogPanel::new(None);
        for i in 0..(MAX_ENTRIES + 10) {
            panel.push(LogLevel::Info, "app", format!("line {i}"));
        }
        assert_eq!(panel.entries.len(), MAX_ENTRIES);
        assert_eq!(panel.entries[0].message, "line 10");

        panel.clear();
        assert_eq!(panel.filtered().count(), 0);
        assert_eq!(panel.counts, [0; 5]);
    }

    #[test]
    fn test_poll_drains_bridge_channel() {
        let (bridge, receiver) = TracingBridge::new();
        let mut panel = LogPanel::new(Some(receiver));
        bridge
            .sender
            .send(TracingEvent {
                level: LogLevel::Warn,
                message: "No sprite is loaded!".to_string(),
                target: "puppet_editor_app".to_string(),
            })
            .unwrap();

        panel.poll();
        let entries: Vec<&LogEntry> = panel.filtered().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
    }
}
