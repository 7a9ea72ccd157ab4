// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! [`EditorState`] owns the playback controller, the sprite pool, the open
//! dialog and the background jobs. Menu clicks, property links and dialog
//! answers all end up here; the UI only draws what this state exposes.

use crate::clock::TickClock;
use crate::config::EditorConfig;
use crate::dialogs::{split_paths, Dialog, DialogAnswer, DialogPurpose};
use crate::loader::{self, LoadError};
use crate::menus::MenuAction;
use crate::notices::Noticer;
use crate::panels::PlayerAction;
use crate::project::{self, ExportSummary, ImportedProject, ProjectError};
use crate::tasks::{PendingTask, TaskError, TaskPoll, TaskRunner};
use indexmap::IndexMap;
use puppet_editor_timeline::edit::{self, EditError};
use puppet_editor_timeline::export::{self, ExportError};
use puppet_editor_timeline::{Animation, PartEdit, PlaybackController, Sprite, SpriteId};
use std::path::PathBuf;

/// Base window title
pub const APP_TITLE: &str = "Puppet Editor";

/// Default name offered for a new animation
const DEFAULT_ANIMATION_NAME: &str = "animation";

/// Result delivered by a background job
enum JobOutcome {
    Sprites(Vec<Sprite>),
    SpriteSheet(Result<Vec<Sprite>, LoadError>),
    Import(Result<ImportedProject, ProjectError>),
    Export(Result<ExportSummary, ProjectError>),
    Gif(Result<PathBuf, ExportError>),
}

/// Complete editor state outside the window and renderer
pub struct EditorState {
    config: EditorConfig,
    name: Option<String>,
    playback: PlaybackController,
    clock: TickClock,
    sprites: IndexMap<SpriteId, Sprite>,
    dialog: Option<Dialog>,
    noticer: Noticer,
    runner: TaskRunner,
    jobs: Vec<PendingTask<JobOutcome>>,
}

impl EditorState {
    /// Create the state and start the background runtime
    pub fn new(config: EditorConfig) -> Result<Self, TaskError> {
        let size = config.default_canvas_size;
        let playback = PlaybackController::with_animation(Animation::new(size, size), config.ticks_per_second())
            .unwrap_or_else(|e| {
                tracing::warn!("Default canvas {size}x{size} rejected ({e}), using the built-in size");
                PlaybackController::new(config.ticks_per_second())
            });
        let empty = Sprite::empty();

        Ok(Self {
            clock: TickClock::new(config.tick_duration()),
            noticer: Noticer::new(config.notice_lifetime()),
            runner: TaskRunner::new()?,
            sprites: IndexMap::from([(empty.id().clone(), empty)]),
            name: None,
            playback,
            dialog: None,
            jobs: Vec::new(),
            config,
        })
    }

    /// Loaded configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Project name once an animation was created or imported
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether an animation was created or imported
    pub fn is_started(&self) -> bool {
        self.name.is_some()
    }

    /// Window title
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{APP_TITLE} - {name}"),
            None => APP_TITLE.to_string(),
        }
    }

    /// The playback controller
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// The playback controller, for transport widgets
    pub fn playback_mut(&mut self) -> &mut PlaybackController {
        &mut self.playback
    }

    /// Sprite pool in load order, starting with the empty sprite
    pub fn sprites(&self) -> &IndexMap<SpriteId, Sprite> {
        &self.sprites
    }

    /// Shared notice queue
    pub fn noticer(&self) -> &Noticer {
        &self.noticer
    }

    /// Open dialog, if any
    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.dialog.as_mut()
    }

    /// Whether a dialog is open
    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    /// Number of background jobs still running
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Advance playback by `delta_time` seconds of wall time
    pub fn advance(&mut self, delta_time: f64) -> u32 {
        let steps = self.clock.advance(delta_time, self.playback.is_playing());
        for _ in 0..steps {
            self.playback.update();
        }
        steps
    }

    /// Whether a menu action can be used right now
    pub fn menu_enabled(&self, action: MenuAction) -> bool {
        if action.needs_project() != self.is_started() {
            return false;
        }
        match action {
            MenuAction::Export | MenuAction::ExportGif => self.playback.can_export(),
            _ => true,
        }
    }

    /// Start a menu action, usually by opening its dialog
    pub fn run_menu(&mut self, action: MenuAction) {
        if !self.menu_enabled(action) || self.has_dialog() {
            return;
        }
        self.playback.pause();

        let dialog = match action {
            MenuAction::NewAnimation => Dialog::entry(DialogPurpose::NewAnimation, DEFAULT_ANIMATION_NAME),
            MenuAction::Import => Dialog::entry(DialogPurpose::Import, ""),
            MenuAction::Export => Dialog::entry(DialogPurpose::Export, "."),
            MenuAction::ExportGif => {
                let name = self.name.as_deref().unwrap_or(DEFAULT_ANIMATION_NAME);
                Dialog::entry(DialogPurpose::ExportGif, format!("{name}.gif"))
            }
            MenuAction::LoadFiles => Dialog::entry(DialogPurpose::LoadFiles, ""),
            MenuAction::LoadSpriteSheet => Dialog::entry(DialogPurpose::LoadSpriteSheet, ""),
        };
        self.dialog = Some(dialog);
    }

    /// Handle a property link from the player
    pub fn run_player_action(&mut self, action: PlayerAction) {
        if self.has_dialog() {
            return;
        }
        self.playback.pause();

        if action == PlayerAction::CanvasSize {
            let animation = self.playback.animation();
            let size = format!("{}x{}", animation.width, animation.height);
            self.dialog = Some(Dialog::entry(DialogPurpose::CanvasSize, size));
            return;
        }

        let Some(part) = self.playback.current() else {
            return;
        };
        if action.needs_sprite() && part.sprite.is_empty() {
            return;
        }

        let dialog = match action {
            PlayerAction::Scale => Dialog::entry(DialogPurpose::Scale, part.scale.to_string()),
            PlayerAction::DiffX => Dialog::entry(DialogPurpose::DiffX, part.diff_x.to_string()),
            PlayerAction::DiffY => Dialog::entry(DialogPurpose::DiffY, part.diff_y.to_string()),
            PlayerAction::Length => Dialog::entry(DialogPurpose::Length, part.length.to_string()),
            PlayerAction::Reset => Dialog::question(DialogPurpose::ConfirmReset),
            PlayerAction::Delete => Dialog::question(DialogPurpose::ConfirmDelete),
            PlayerAction::ToggleReverse => return self.apply_edit(Ok(PartEdit::ToggleReverse)),
            PlayerAction::AutoScale => return self.apply_edit(Ok(PartEdit::AutoScale)),
            PlayerAction::CanvasSize => return,
        };
        self.dialog = Some(dialog);
    }

    /// Append a pooled sprite to the timeline
    pub fn append_sprite(&mut self, id: &SpriteId) {
        if !self.is_started() {
            return;
        }
        let Some(sprite) = self.sprites.get(id).cloned() else {
            return;
        };
        self.playback.pause();
        if let Err(e) = self.playback.append(sprite) {
            self.noticer.warn(e.to_string());
        }
    }

    /// Close the open dialog with the user's answer
    pub fn answer(&mut self, answer: DialogAnswer) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match answer {
            DialogAnswer::Cancel => {
                tracing::debug!("{} cancelled", dialog.purpose().title());
            }
            DialogAnswer::Accept(input) => self.submit(dialog.purpose().clone(), input.trim()),
        }
    }

    fn submit(&mut self, purpose: DialogPurpose, input: &str) {
        match purpose {
            DialogPurpose::NewAnimation => self.new_animation(input),
            DialogPurpose::Import => {
                let Some(path) = self.require_path(input) else {
                    return;
                };
                self.spawn("import", move || JobOutcome::Import(project::import_project(&path)));
            }
            DialogPurpose::Export => {
                let Some(dir) = self.require_path(input) else {
                    return;
                };
                if !dir.is_dir() {
                    self.noticer.error(format!("{} is not a directory", dir.display()));
                    return;
                }
                let name = self.name.clone().unwrap_or_default();
                if project::existing_outputs(&dir, &name).is_empty() {
                    self.start_export(dir);
                } else {
                    self.dialog = Some(Dialog::question(DialogPurpose::ConfirmExport(dir)));
                }
            }
            DialogPurpose::ConfirmExport(dir) => self.start_export(dir),
            DialogPurpose::ExportGif => {
                let Some(path) = self.require_path(input) else {
                    return;
                };
                let animation = self.playback.snapshot();
                let tps = self.playback.ticks_per_second();
                self.spawn("export gif", move || {
                    JobOutcome::Gif(export::write_gif(&animation, tps, &path).map(|()| path))
                });
            }
            DialogPurpose::LoadFiles => {
                let paths = split_paths(input);
                if paths.is_empty() {
                    self.noticer.warn("No sprite is loaded!");
                    return;
                }
                let noticer = self.noticer.clone();
                self.spawn("load files", move || {
                    let report = loader::read_sprites(&paths);
                    for (path, e) in &report.failures {
                        noticer.error(format!("Failed to load {}: {e}", path.display()));
                    }
                    JobOutcome::Sprites(report.sprites)
                });
            }
            DialogPurpose::LoadSpriteSheet => {
                let Some(path) = self.require_path(input) else {
                    return;
                };
                self.spawn("load sprite sheet", move || {
                    JobOutcome::SpriteSheet(loader::read_sprite_sheet(&path))
                });
            }
            DialogPurpose::Scale => self.apply_edit(edit::parse_scale(input).map(PartEdit::Scale)),
            DialogPurpose::DiffX => self.apply_edit(edit::parse_offset(input).map(PartEdit::DiffX)),
            DialogPurpose::DiffY => self.apply_edit(edit::parse_offset(input).map(PartEdit::DiffY)),
            DialogPurpose::Length => self.apply_edit(edit::parse_length(input).map(PartEdit::Length)),
            DialogPurpose::ConfirmReset => self.apply_edit(Ok(PartEdit::Reset)),
            DialogPurpose::ConfirmDelete => {
                if let Some(index) = self.playback.current_part() {
                    self.playback.delete_part(index);
                }
            }
            DialogPurpose::CanvasSize => {
                let result = edit::parse_size(input)
                    .and_then(|(width, height)| self.playback.set_canvas_size(width, height));
                match result {
                    Ok(()) => {
                        let animation = self.playback.animation();
                        self.noticer.info(format!(
                            "Animation size is changed to {}x{}",
                            animation.width, animation.height
                        ));
                    }
                    Err(e) => self.noticer.warn(e.to_string()),
                }
            }
        }
    }

    fn new_animation(&mut self, name: &str) {
        if let Err(e) = edit::validate_name(name) {
            self.noticer.warn(e.to_string());
            return;
        }
        let size = self.config.default_canvas_size;
        if let Err(e) = self.playback.import(Animation::new(size, size)) {
            self.noticer.warn(e.to_string());
            return;
        }
        self.name = Some(name.to_string());
        tracing::info!("Started animation '{name}'");
    }

    fn require_path(&self, input: &str) -> Option<PathBuf> {
        if input.is_empty() {
            self.noticer.warn("No path is given!");
            return None;
        }
        Some(PathBuf::from(input))
    }

    fn apply_edit(&mut self, edit: Result<PartEdit, EditError>) {
        if let Err(e) = edit.and_then(|edit| self.playback.apply_edit(edit)) {
            self.noticer.warn(e.to_string());
        }
    }

    fn start_export(&mut self, dir: PathBuf) {
        let name = self.name.clone().unwrap_or_default();
        let animation = self.playback.snapshot();
        self.spawn("export", move || {
            JobOutcome::Export(project::export_project(&dir, &name, &animation))
        });
    }

    fn spawn(&mut self, label: &str, work: impl FnOnce() -> JobOutcome + Send + 'static) {
        self.jobs.push(self.runner.spawn_blocking(label, work));
    }

    /// Collect finished background jobs and apply their results
    pub fn poll_jobs(&mut self) {
        let mut still_running = Vec::with_capacity(self.jobs.len());
        for mut job in std::mem::take(&mut self.jobs) {
            match job.poll() {
                TaskPoll::Pending => still_running.push(job),
                TaskPoll::Ready(outcome) => self.finish(outcome),
                TaskPoll::Lost => self.noticer.error(format!("{} failed", job.label())),
            }
        }
        // Finishing a job never starts another, so nothing is lost here
        self.jobs = still_running;
    }

    fn finish(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Sprites(sprites) | JobOutcome::SpriteSheet(Ok(sprites)) => self.add_sprites(sprites),
            JobOutcome::SpriteSheet(Err(e)) => self.noticer.error(e.to_string()),
            JobOutcome::Import(Ok(imported)) => {
                if let Err(e) = self.playback.import(imported.animation) {
                    self.noticer.error(e.to_string());
                    return;
                }
                let count = imported.sprites.len();
                self.noticer.info(format!(
                    "Project \"{}\" is imported with {count} sprites!",
                    imported.name
                ));
                self.name = Some(imported.name);
                self.insert_sprites(imported.sprites);
            }
            JobOutcome::Import(Err(e)) => self.noticer.error(e.to_string()),
            JobOutcome::Export(Ok(summary)) => {
                tracing::debug!("Wrote {:?}", summary.json_path);
                self.noticer.info("Exported!");
            }
            JobOutcome::Export(Err(e)) => self.noticer.error(e.to_string()),
            JobOutcome::Gif(Ok(path)) => {
                tracing::debug!("Wrote {:?}", path);
                self.noticer.info("Exported!");
            }
            JobOutcome::Gif(Err(e)) => self.noticer.error(e.to_string()),
        }
    }

    fn add_sprites(&mut self, sprites: Vec<Sprite>) {
        match loader::loaded_message(sprites.len()) {
            Some(message) => self.noticer.info(message),
            None => self.noticer.warn("No sprite is loaded!"),
        }
        self.insert_sprites(sprites);
    }

    fn insert_sprites(&mut self, sprites: Vec<Sprite>) {
        for sprite in sprites {
            self.sprites.insert(sprite.id().clone(), sprite);
        }
    }
}
