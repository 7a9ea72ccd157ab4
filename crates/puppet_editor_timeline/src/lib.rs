// SPDX-License-Identifier: MIT OR Apache-2.0
//! Part timeline and playback for the Puppet Editor.
//!
//! This crate provides the animation core:
//! - Sprites, parts and the animation document
//! - Tick index mapping a playback position to its part
//! - Playback control and structural editing
//! - Validated property edits
//! - Frame rendering and GIF export
//!
//! ## Architecture
//!
//! The [`PlaybackController`] is the sole owner of the [`Animation`] and its
//! [`TimelineIndex`]. Other components refer to parts by index and read
//! snapshots for export or persistence.

pub mod animation;
pub mod edit;
pub mod export;
pub mod part;
pub mod playback;
pub mod sprite;
pub mod timeline;
pub mod ui;

pub use animation::{Animation, DEFAULT_ANIMATION_SIZE, MAX_ANIMATION_SIZE};
pub use edit::{EditError, PartEdit};
pub use export::{ExportError, ExportFrame};
pub use part::{Part, DEFAULT_TICKS_PER_SECOND};
pub use playback::{PlaybackController, PlaybackState};
pub use sprite::{Sprite, SpriteId};
pub use timeline::TimelineIndex;
pub use ui::PlayerControls;
