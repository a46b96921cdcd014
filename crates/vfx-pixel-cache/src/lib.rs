//! Tiered pixel cache: per-thread, region-oriented read/write access to an
//! image's pixel plane across three storage tiers (anonymous memory,
//! file-backed map, raw disk file), a boundary-sampling virtual-pixel
//! service, and an optional remote transport exposing a cache over TCP.
//!
//! # Overview
//!
//! A [`descriptor::Cache`] owns the backing [`tier::StorageTier`]
//! and a per-thread array of [`nexus::Nexus`] scratch regions. Callers pick
//! a thread id, then call [`descriptor::Cache::get_authentic`] /
//! [`descriptor::Cache::queue_authentic`] /
//! [`descriptor::Cache::sync_authentic`] for real pixels, or
//! [`descriptor::Cache::get_virtual`] for boundary-extrapolated
//! reads. [`remote`] lets another process stand in for the local tier over
//! a TCP session.
//!
//! # Dependencies
//!
//! - [`thiserror`] for the error enum, [`tracing`] for structured logging,
//!   [`rayon`] for the one data-parallel loop (`descriptor::clone_pixels`'s
//!   row copy), [`memmap2`] for the Map tier, [`rand`] for the random
//!   virtual-pixel policy and handshake nonces, [`twox_hash`] for the
//!   session-key hash, [`tempfile`]/[`libc`] for temp-file and positional
//!   I/O plumbing.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod nexus;
pub mod random;
pub mod region;
pub mod remote;
pub mod resource;
pub mod tempfile_registry;
pub mod tier;
pub mod virtual_pixel;

pub use descriptor::{Cache, ColorSpace, StorageClass};
pub use error::{Error, Result};
pub use region::Region;
pub use tier::Mode;
pub use virtual_pixel::VirtualPixelMethod;

/// The per-channel sample type.
///
/// Fixed at 16 bits rather than generic over the original's compile-time
/// `MAGICKCORE_QUANTUM_DEPTH` (8/16/32-bit or floating point) — see
/// DESIGN.md for why this crate pins one width instead of parameterising
/// every type over it.
pub type Quantum = u16;

/// The maximum value a [`Quantum`] sample can hold.
pub const QUANTUM_RANGE: Quantum = u16::MAX;

/// Samples per pixel packet: red, green, blue, opacity.
pub const CHANNELS_PER_PIXEL: usize = 4;

/// One interleaved pixel: `[red, green, blue, opacity]`.
pub type Pixel = [Quantum; CHANNELS_PER_PIXEL];
