//! Domain managers ("gods").
//!
//! Each god owns a spherical domain of chunks around an origin and a *realm*:
//! the chunks it has already dealt with. An update does the work for chunks
//! in the domain but not yet in the realm, so calling it again with nothing
//! changed does nothing.
//!
//! - [`TerrainGod`] generates missing chunks.
//! - [`EntityGod`] steps every entity through the motion resolver.
//! - [`RenderGod`] meshes chunks into a shared [`RenderCache`].

mod entity_god;
mod god;
mod render_cache;
mod render_god;
mod terrain_god;

pub use entity_god::EntityGod;
pub use god::{Domain, God};
pub use render_cache::{RenderCache, RenderCacheHandle};
pub use render_god::RenderGod;
pub use terrain_god::TerrainGod;
