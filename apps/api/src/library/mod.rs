// Resource library: resources, per-parent favorites, and named collections
// with a denormalized resource count.

pub mod collections;
pub mod favorites;
pub mod handlers;
pub mod resources;
