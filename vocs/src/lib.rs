#![forbid(unsafe_code)]

//! # `vocs`: Voxel Component System
//!
//! Positioning and compact storage for a sparse voxel world.
//!
//! The world is a sparse grid of 16x16x16 cubes, addressed by `GlobalChunkPosition`. Inside a cube,
//! a block is identified by a packed `CubePosition`, which doubles as the index into 4096-element
//! component arrays. Vertical extent is not fixed: `Bounds` describes which Y levels are valid for a
//! particular world, and everything outside of it is treated as empty space by consumers.
//!
//! Light values and other small per-block properties fit in 4 bits, so `nibbles` provides a packed
//! `u4` storage that halves the memory of a byte array.

pub mod position;

/// Bulk nibble storage. Useful for lighting data and other values in the range 0-15, but not much else.
pub mod nibbles;

/// Sparse collections of cubes.
pub mod world;
