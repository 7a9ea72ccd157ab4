// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback controller owning the animation and its tick index.
//!
//! All navigation and structural edits go through [`PlaybackController`],
//! which keeps the current tick, the current part and the [`TimelineIndex`]
//! consistent. Apart from [`PlaybackController::toggle_play`],
//! [`PlaybackController::pause`] and the tick advance itself, every operation
//! is rejected while playing.

use crate::animation::Animation;
use crate::edit::{self, EditError, PartEdit};
use crate::part::{Part, DEFAULT_TICKS_PER_SECOND};
use crate::sprite::Sprite;
use crate::timeline::TimelineIndex;
use std::num::NonZeroU32;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No parts; navigation is a no-op
    #[default]
    Empty,
    /// Parts present, tick not advancing
    Paused,
    /// Tick advancing once per update
    Playing,
}

impl PlaybackState {
    /// Label for the play/stop button
    pub fn toggle_label(&self) -> &'static str {
        match self {
            PlaybackState::Playing => "Stop",
            PlaybackState::Empty | PlaybackState::Paused => "Play",
        }
    }
}

/// Playback controller for an animation
#[derive(Debug, Clone)]
pub struct PlaybackController {
    /// The document being played
    animation: Animation,
    /// Start ticks derived from `animation.parts`
    index: TimelineIndex,
    /// Current playback tick
    current_tick: u32,
    /// Active part, `None` when empty
    current_part: Option<usize>,
    /// Whether the tick advances
    playing: bool,
    /// Simulation rate, also the length of appended parts
    ticks_per_second: NonZeroU32,
}

impl PlaybackController {
    /// Create a controller around an empty default animation
    pub fn new(ticks_per_second: NonZeroU32) -> Self {
        Self {
            animation: Animation::default(),
            index: TimelineIndex::new(),
            current_tick: 0,
            current_part: None,
            playing: false,
            ticks_per_second,
        }
    }

    /// Create a controller around an existing animation
    pub fn with_animation(animation: Animation, ticks_per_second: NonZeroU32) -> Result<Self, EditError> {
        let mut controller = Self::new(ticks_per_second);
        controller.import(animation)?;
        Ok(controller)
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        if self.animation.parts.is_empty() {
            PlaybackState::Empty
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Whether the tick is advancing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The animation being played
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Tick index over the parts
    pub fn index(&self) -> &TimelineIndex {
        &self.index
    }

    /// Current tick
    pub fn current_tick(&self) -> u32 {
        self.current_tick
    }

    /// Current part index, `None` when empty
    pub fn current_part(&self) -> Option<usize> {
        self.current_part
    }

    /// The active part
    pub fn current(&self) -> Option<&Part> {
        self.current_part.and_then(|i| self.animation.parts.get(i))
    }

    /// Total duration in ticks
    pub fn max_tick(&self) -> u32 {
        self.index.max_tick()
    }

    /// Simulation rate
    pub fn ticks_per_second(&self) -> NonZeroU32 {
        self.ticks_per_second
    }

    /// Whether there is anything to export
    pub fn can_export(&self) -> bool {
        self.animation.can_export()
    }

    /// Position within the animation in `[0, 1)`, zero when empty
    pub fn progress(&self) -> f64 {
        match self.max_tick() {
            0 => 0.0,
            max => f64::from(self.current_tick) / f64::from(max),
        }
    }

    /// Read-only copy for export and persistence
    pub fn snapshot(&self) -> Animation {
        self.animation.clone()
    }

    fn navigable(&self) -> bool {
        !self.playing && !self.animation.parts.is_empty()
    }

    /// Append a part showing `sprite` with default properties.
    ///
    /// Jumps to the start of the new part.
    pub fn append(&mut self, sprite: Sprite) -> Result<(), EditError> {
        if self.playing {
            return Err(EditError::Playing);
        }

        let length = self.ticks_per_second;
        edit::total_length([self.max_tick(), length.get()])?;
        self.animation.parts.push(Part::new(sprite, length));
        if self.current_part.is_none() {
            self.current_part = Some(0);
        }
        self.current_tick = self.index.push(length.get());

        tracing::debug!(
            "Appended part {} ({} ticks total)",
            self.animation.parts.len() - 1,
            self.index.max_tick()
        );
        Ok(())
    }

    /// Jump to the start of the next part; no wrap at the end
    pub fn step_part_forward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        let Some(part) = self.current_part else {
            return false;
        };
        let Some(start) = self.index.start_of(part + 1) else {
            return false;
        };
        self.current_part = Some(part + 1);
        self.current_tick = start;
        true
    }

    /// Jump to the start of the previous part, or to tick zero on the first part
    pub fn step_part_backward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        match self.current_part {
            Some(0) | None => {
                self.current_part = Some(0);
                self.current_tick = 0;
            }
            Some(part) => {
                self.current_part = Some(part - 1);
                self.current_tick = self.index.start_of(part - 1).unwrap_or(0);
            }
        }
        true
    }

    /// Advance one tick, wrapping to zero past the end.
    ///
    /// The current part follows on the next [`update`](Self::update).
    pub fn step_tick_forward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.current_tick = (self.current_tick + 1) % self.max_tick();
        true
    }

    /// Go back one tick, wrapping to the last tick before zero
    pub fn step_tick_backward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.current_tick = match self.current_tick {
            0 => self.max_tick() - 1,
            tick => tick - 1,
        };
        true
    }

    /// Advance one tick, stopping at the last tick
    pub fn nudge_tick_forward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.current_tick = (self.current_tick + 1).min(self.max_tick() - 1);
        true
    }

    /// Go back one tick, stopping at zero
    pub fn nudge_tick_backward(&mut self) -> bool {
        if !self.navigable() {
            return false;
        }
        self.current_tick = self.current_tick.saturating_sub(1);
        true
    }

    /// Pause and jump to the tick at `fraction` of the total duration.
    ///
    /// This is the scrubber contract: the landing part is the one whose
    /// time range contains `fraction * max_tick`.
    pub fn seek_by_fraction(&mut self, fraction: f64) -> bool {
        self.playing = false;
        let max_tick = self.max_tick();
        if max_tick == 0 {
            return false;
        }

        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        // Truncation is the intended floor; the value is within [0, max_tick].
        let tick = (fraction * f64::from(max_tick)) as u32;
        self.jump_to(tick.min(max_tick - 1));
        true
    }

    /// Pause and jump to `tick`, clamped into the animation
    pub fn seek(&mut self, tick: u32) -> bool {
        self.playing = false;
        let max_tick = self.max_tick();
        if max_tick == 0 {
            return false;
        }
        self.jump_to(tick.min(max_tick - 1));
        true
    }

    fn jump_to(&mut self, tick: u32) {
        self.current_tick = tick;
        self.current_part = Some(self.index.part_at_or_before(tick));
    }

    /// Switch between playing and paused.
    ///
    /// Starting playback is rejected while the total duration is zero.
    pub fn toggle_play(&mut self) -> bool {
        if self.playing {
            self.playing = false;
            return true;
        }
        if self.max_tick() == 0 {
            return false;
        }
        self.playing = true;
        true
    }

    /// Stop advancing; returns whether playback was running
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    /// Advance the tick by one while playing, wrapping at the end
    pub fn tick(&mut self) {
        let max_tick = self.max_tick();
        if self.playing && max_tick > 0 {
            self.current_tick = (self.current_tick + 1) % max_tick;
        }
    }

    /// One fixed simulation step: advance, then resolve the current part
    pub fn update(&mut self) {
        self.tick();
        if let Some(part) = self.current_part {
            self.current_part = self.index.resolve(part, self.current_tick);
        }
    }

    /// Remove part `index`.
    ///
    /// Removing the last remaining part empties the controller; otherwise the
    /// current part steps back when the removed part was at or before it.
    pub fn delete_part(&mut self, index: usize) -> bool {
        if self.playing || index >= self.animation.parts.len() {
            return false;
        }

        if self.animation.parts.len() == 1 {
            self.animation.parts.clear();
            self.index.rebuild(&[], None);
            self.current_part = None;
            self.current_tick = 0;
            tracing::debug!("Deleted the only part");
            return true;
        }

        self.animation.parts.remove(index);
        if let Some(current) = self.current_part {
            if index <= current {
                self.current_part = Some(current.saturating_sub(1));
            }
        }
        self.rebuild_preserving_current();

        tracing::debug!("Deleted part {index}, {} remaining", self.animation.parts.len());
        true
    }

    /// Change the duration of part `index` and pin the view to the current
    /// part's new start tick
    pub fn resize_part(&mut self, index: usize, length: NonZeroU32) -> Result<(), EditError> {
        if self.playing {
            return Err(EditError::Playing);
        }
        self.check_length(index, length)?;
        let part = self
            .animation
            .parts
            .get_mut(index)
            .ok_or(EditError::NoSuchPart(index))?;
        part.length = length;
        self.rebuild_preserving_current();

        tracing::debug!("Resized part {index} to {length} ticks");
        Ok(())
    }

    /// Fail unless the total duration fits once part `index` lasts `length`
    fn check_length(&self, index: usize, length: NonZeroU32) -> Result<(), EditError> {
        let part = self.animation.parts.get(index).ok_or(EditError::NoSuchPart(index))?;
        edit::total_length([self.max_tick() - part.len(), length.get()]).map(|_| ())
    }

    fn rebuild_preserving_current(&mut self) {
        if let Some(current) = self.current_part {
            let last = self.animation.parts.len().saturating_sub(1);
            self.current_part = Some(current.min(last));
        }
        self.current_tick = self
            .index
            .rebuild(&self.animation.parts, self.current_part)
            .unwrap_or(0);
    }

    /// Apply a property edit to the current part
    pub fn apply_edit(&mut self, edit: PartEdit) -> Result<(), EditError> {
        if self.playing {
            return Err(EditError::Playing);
        }
        edit.validate()?;
        let current = self.current_part.ok_or(EditError::NoCurrentPart)?;
        if let PartEdit::Length(length) = edit {
            return self.resize_part(current, length);
        }
        let tps = self.ticks_per_second;
        if let Some(length) = edit.new_length(tps) {
            self.check_length(current, length)?;
        }

        let canvas = (self.animation.width, self.animation.height);
        let part = self
            .animation
            .parts
            .get_mut(current)
            .ok_or(EditError::NoCurrentPart)?;

        match edit {
            PartEdit::Scale(scale) => part.scale = scale,
            PartEdit::DiffX(diff_x) => part.diff_x = diff_x,
            PartEdit::DiffY(diff_y) => part.diff_y = diff_y,
            PartEdit::ToggleReverse => part.reverse = !part.reverse,
            PartEdit::AutoScale => {
                if !part.sprite.is_empty() {
                    part.scale = edit::auto_scale(part.sprite.dimensions(), canvas);
                }
            }
            PartEdit::Length(_) => {} // resized above
            PartEdit::Reset => part.reset(tps),
        }

        if edit.is_structural() {
            self.rebuild_preserving_current();
        }
        tracing::debug!("Applied {} to part {current}", edit.label());
        Ok(())
    }

    /// Resize the canvas
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<(), EditError> {
        if self.playing {
            return Err(EditError::Playing);
        }
        if !self.animation.set_size(width, height) {
            return Err(EditError::InvalidSize);
        }
        Ok(())
    }

    /// Replace the animation wholesale and reset the playback position.
    ///
    /// An animation with an invalid canvas or a total duration past
    /// `u32::MAX` is rejected and the current one is kept.
    pub fn import(&mut self, animation: Animation) -> Result<(), EditError> {
        animation.validate()?;
        self.animation = animation;
        self.index.rebuild(&self.animation.parts, None);
        self.current_part = if self.animation.parts.is_empty() { None } else { Some(0) };
        self.current_tick = 0;
        self.playing = false;

        tracing::debug!(
            "Imported animation with {} parts ({} ticks)",
            self.animation.parts.len(),
            self.index.max_tick()
        );
        Ok(())
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn ticks(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn controller(lengths: &[u32]) -> PlaybackController {
        let parts = lengths
            .iter()
            .map(|&len| Part::new(Sprite::empty(), ticks(len)))
            .collect();
        PlaybackController::with_animation(Animation::default().with_parts(parts), ticks(60)).unwrap()
    }

    #[test]
    fn test_append_to_empty() {
        let mut playback = PlaybackController::default();
        assert_eq!(playback.state(), PlaybackState::Empty);
        assert!(!playback.can_export());

        playback.append(Sprite::empty()).unwrap();

        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.current_part(), Some(0));
        assert_eq!(playback.current_tick(), 0);
        assert_eq!(playback.max_tick(), 60);
        assert!(playback.can_export());
    }

    #[test]
    fn test_append_jumps_to_new_part() {
        let mut playback = controller(&[10, 5]);
        playback.append(Sprite::empty()).unwrap();
        assert_eq!(playback.current_tick(), 15);
        assert_eq!(playback.index().indexes(), &[0, 10, 15]);
        assert_eq!(playback.max_tick(), 75);

        playback.update();
        assert_eq!(playback.current_part(), Some(2));
    }

    #[test]
    fn test_three_part_scenario() {
        let mut playback = controller(&[10, 5, 20]);
        assert_eq!(playback.max_tick(), 35);
        assert_eq!(playback.index().indexes(), &[0, 10, 15]);

        assert!(playback.step_tick_backward());
        assert_eq!(playback.current_tick(), 34);
        playback.update();
        assert_eq!(playback.current_part(), Some(2));

        assert!(playback.seek_by_fraction(0.5));
        assert_eq!(playback.current_tick(), 17);
        assert_eq!(playback.current_part(), Some(2));
    }

    #[test]
    fn test_seek_by_fraction_bounds() {
        let mut playback = controller(&[10, 5, 20]);
        playback.seek_by_fraction(0.0);
        assert_eq!((playback.current_tick(), playback.current_part()), (0, Some(0)));

        playback.seek_by_fraction(1.0);
        assert_eq!(playback.current_tick(), 34);
        playback.seek_by_fraction(0.9999);
        assert!(playback.current_tick() < playback.max_tick());
        playback.seek_by_fraction(7.0);
        assert_eq!(playback.current_tick(), 34);
    }

    #[test]
    fn test_seek_by_fraction_pauses() {
        let mut playback = controller(&[10, 5]);
        playback.toggle_play();
        assert!(playback.seek_by_fraction(0.7));
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.current_part(), Some(1));
    }

    #[test]
    fn test_step_part_navigation() {
        let mut playback = controller(&[10, 5, 20]);
        assert!(playback.step_part_forward());
        assert_eq!((playback.current_tick(), playback.current_part()), (10, Some(1)));
        assert!(playback.step_part_forward());
        assert_eq!((playback.current_tick(), playback.current_part()), (15, Some(2)));
        assert!(!playback.step_part_forward());
        assert_eq!(playback.current_part(), Some(2));

        assert!(playback.step_part_backward());
        assert_eq!((playback.current_tick(), playback.current_part()), (10, Some(1)));

        playback.seek(3);
        assert!(playback.step_part_backward());
        assert_eq!((playback.current_tick(), playback.current_part()), (0, Some(0)));
    }

    #[test]
    fn test_tick_steps_wrap() {
        let mut playback = controller(&[3]);
        playback.seek(2);
        playback.step_tick_forward();
        assert_eq!(playback.current_tick(), 0);
        playback.step_tick_backward();
        assert_eq!(playback.current_tick(), 2);
    }

    #[test]
    fn test_nudges_clamp() {
        let mut playback = controller(&[3]);
        playback.nudge_tick_backward();
        assert_eq!(playback.current_tick(), 0);
        playback.seek(2);
        playback.nudge_tick_forward();
        assert_eq!(playback.current_tick(), 2);

        playback.seek(0);
        playback.seek(u32::MAX);
        assert_eq!((playback.current_tick(), playback.current_part()), (2, Some(0)));
    }

    #[test]
    fn test_navigation_disabled_while_playing() {
        let mut playback = controller(&[10, 5]);
        assert!(playback.toggle_play());
        assert!(!playback.step_part_forward());
        assert!(!playback.step_tick_backward());
        assert_eq!(playback.append(Sprite::empty()), Err(EditError::Playing));
        assert!(!playback.delete_part(0));
        assert_eq!(playback.resize_part(0, ticks(2)), Err(EditError::Playing));
        assert_eq!(playback.apply_edit(PartEdit::ToggleReverse), Err(EditError::Playing));
        assert_eq!(playback.current_tick(), 0);
    }

    #[test]
    fn test_update_advances_and_resolves() {
        let mut playback = controller(&[2, 2]);
        playback.toggle_play();
        playback.update();
        playback.update();
        assert_eq!((playback.current_tick(), playback.current_part()), (2, Some(1)));
        playback.update();
        playback.update();
        assert_eq!((playback.current_tick(), playback.current_part()), (0, Some(0)));
    }

    #[test]
    fn test_paused_update_does_not_advance() {
        let mut playback = controller(&[4]);
        playback.update();
        assert_eq!(playback.current_tick(), 0);
    }

    #[test]
    fn test_delete_only_part_empties() {
        let mut playback = controller(&[10]);
        assert!(playback.delete_part(0));
        assert_eq!(playback.state(), PlaybackState::Empty);
        assert_eq!(playback.current_part(), None);
        assert_eq!(playback.max_tick(), 0);
        assert!(!playback.toggle_play());
        assert!(!playback.is_playing());
        assert!(!playback.can_export());
    }

    #[test]
    fn test_delete_current_steps_back() {
        let mut playback = controller(&[10, 5, 20]);
        playback.step_part_forward();
        playback.step_part_forward();
        assert!(playback.delete_part(2));
        assert_eq!(playback.current_part(), Some(1));
        assert_eq!(playback.current_tick(), 10);
        assert_eq!(playback.max_tick(), 15);
    }

    #[test]
    fn test_delete_first_clamps_to_zero() {
        let mut playback = controller(&[10, 5, 20]);
        assert!(playback.delete_part(0));
        assert_eq!(playback.current_part(), Some(0));
        assert_eq!(playback.index().indexes(), &[0, 5]);
    }

    #[test]
    fn test_delete_after_current_keeps_part() {
        let mut playback = controller(&[10, 5, 20]);
        playback.step_part_forward();
        assert!(playback.delete_part(2));
        assert_eq!((playback.current_tick(), playback.current_part()), (10, Some(1)));
        assert!(!playback.delete_part(9));
    }

    #[test]
    fn test_resize_current_part_pins_view() {
        let mut playback = controller(&[10, 5, 20]);
        playback.seek(30);
        playback.resize_part(0, ticks(40)).unwrap();
        assert_eq!(playback.current_part(), Some(2));
        assert_eq!(playback.current_tick(), 45);
        assert_eq!(playback.max_tick(), 65);
    }

    #[test]
    fn test_toggle_play() {
        let mut playback = controller(&[10]);
        assert!(playback.toggle_play());
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert!(playback.toggle_play());
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert!(!playback.pause());
    }

    #[test]
    fn test_edits_apply_to_current_part() {
        let mut playback = controller(&[10, 5]);
        playback.step_part_forward();
        playback.apply_edit(PartEdit::Scale(2.0)).unwrap();
        playback.apply_edit(PartEdit::DiffX(-3)).unwrap();
        playback.apply_edit(PartEdit::DiffY(7)).unwrap();
        playback.apply_edit(PartEdit::ToggleReverse).unwrap();

        let part = playback.current().unwrap();
        assert_eq!(part.scale, 2.0);
        assert_eq!((part.diff_x, part.diff_y), (-3, 7));
        assert!(part.reverse);
        assert_eq!(playback.animation().parts[0].scale, 1.0);
    }

    #[test]
    fn test_invalid_edit_leaves_state() {
        let mut playback = controller(&[10]);
        assert_eq!(playback.apply_edit(PartEdit::Scale(-1.0)), Err(EditError::NonPositiveScale));
        assert_eq!(playback.current().unwrap().scale, 1.0);

        let mut empty = PlaybackController::default();
        assert_eq!(empty.apply_edit(PartEdit::Reset), Err(EditError::NoCurrentPart));
    }

    #[test]
    fn test_length_and_reset_rebuild() {
        let mut playback = controller(&[10, 5]);
        playback.step_part_forward();
        playback.apply_edit(PartEdit::Length(ticks(8))).unwrap();
        assert_eq!(playback.max_tick(), 18);
        assert_eq!(playback.current_tick(), 10);

        playback.apply_edit(PartEdit::Reset).unwrap();
        assert_eq!(playback.max_tick(), 70);
        assert_eq!(playback.current().unwrap().len(), 60);
    }

    #[test]
    fn test_auto_scale_edit() {
        let mut playback = PlaybackController::default();
        playback.append(Sprite::new(RgbaImage::new(20, 10))).unwrap();
        playback.apply_edit(PartEdit::AutoScale).unwrap();
        assert_eq!(playback.current().unwrap().scale, 5.0);

        playback.append(Sprite::empty()).unwrap();
        playback.update();
        playback.apply_edit(PartEdit::AutoScale).unwrap();
        assert_eq!(playback.current().unwrap().scale, 1.0);
    }

    #[test]
    fn test_canvas_size() {
        let mut playback = PlaybackController::default();
        assert_eq!(playback.set_canvas_size(0, 5), Err(EditError::InvalidSize));
        playback.set_canvas_size(64, 32).unwrap();
        assert_eq!((playback.animation().width, playback.animation().height), (64, 32));
    }

    #[test]
    fn test_import_resets_position() {
        let mut playback = controller(&[10, 5, 20]);
        playback.seek(20);
        playback
            .import(Animation::default().with_parts(vec![Part::new(Sprite::empty(), ticks(4))]))
            .unwrap();
        assert_eq!((playback.current_tick(), playback.current_part()), (0, Some(0)));
        assert_eq!(playback.max_tick(), 4);

        playback.import(Animation::default()).unwrap();
        assert_eq!(playback.current_part(), None);
        assert_eq!(playback.state(), PlaybackState::Empty);
    }

    #[test]
    fn test_length_past_tick_range_is_rejected() {
        let mut playback = controller(&[10, 5]);
        let huge = edit::parse_length("4294967295").unwrap();

        assert_eq!(playback.apply_edit(PartEdit::Length(huge)), Err(EditError::TooLong));
        assert_eq!(playback.current().unwrap().len(), 10);
        assert_eq!(playback.max_tick(), 15);

        playback.step_part_forward();
        assert_eq!(playback.resize_part(0, huge), Err(EditError::TooLong));
        assert_eq!(playback.animation().parts[0].len(), 10);
        assert_eq!(playback.current_tick(), 10);
    }

    #[test]
    fn test_longest_fitting_length_is_accepted() {
        let mut playback = controller(&[10, 5]);
        playback.apply_edit(PartEdit::Length(ticks(u32::MAX - 5))).unwrap();
        assert_eq!(playback.max_tick(), u32::MAX);

        assert_eq!(playback.append(Sprite::empty()), Err(EditError::TooLong));
        assert_eq!(playback.animation().parts.len(), 2);
        assert_eq!(playback.apply_edit(PartEdit::Reset), Ok(()));
        assert_eq!(playback.max_tick(), 65);
    }

    #[test]
    fn test_import_rejects_overflowing_animation() {
        let mut playback = controller(&[10, 5]);
        let oversized = Animation::default().with_parts(vec![
            Part::new(Sprite::empty(), NonZeroU32::MAX),
            Part::new(Sprite::empty(), NonZeroU32::MAX),
        ]);
        assert_eq!(playback.import(oversized), Err(EditError::TooLong));
        assert_eq!(playback.max_tick(), 15);
        assert_eq!(playback.animation().parts.len(), 2);
    }

    #[test]
    fn test_resize_missing_part() {
        let mut playback = controller(&[10]);
        assert_eq!(playback.resize_part(3, ticks(2)), Err(EditError::NoSuchPart(3)));
    }
}
