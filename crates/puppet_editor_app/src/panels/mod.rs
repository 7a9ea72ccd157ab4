// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor panel implementations.

mod explorer;
pub mod log;
pub mod player;

pub use explorer::ExplorerPanel;
pub use log::LogPanel;
pub use player::{PlayerAction, PlayerPanel};
