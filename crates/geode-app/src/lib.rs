//! Host-side wiring for geode.
//!
//! [`Session`] owns a world and its managers. [`GameLoop`] ticks it at a
//! fixed rate, and [`BackgroundGod`] runs the terrain and render managers on
//! their own threads between ticks.

pub mod background;
pub mod error;
pub mod game_loop;
pub mod logging_sink;
pub mod session;
pub mod settings;

pub use background::BackgroundGod;
pub use error::AppError;
pub use game_loop::{DEFAULT_TICK_RATE_HZ, GameLoop, MAX_FRAME_TIME};
pub use logging_sink::{LoggingSink, spawn_renderer};
pub use session::{Session, TickInput, surface_below};
pub use settings::{physics_params, player_entity, terrain_params};
