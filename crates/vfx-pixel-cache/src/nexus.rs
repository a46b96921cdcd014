//! The per-thread, per-access scratch region ("nexus").
//!
//! [`Nexus::set_pixels`] is `set_pixel_cache_nexus_pixels` from spec.md
//! §4.3: it decides whether the requested rectangle can be accessed
//! authentically (a direct view into the tier backing, no copy) or must be
//! staged into a private buffer, in the exact clause order the spec gives —
//! reordering it changes which branch wins at the zero-height/zero-width
//! edges, so the `&&` chain below is not simplified or reordered.

use crate::error::{Error, Result};
use crate::region::Region;
use crate::tier::TierKind;
use crate::Quantum;

/// Samples per pixel in the packet layout (red, green, blue, opacity).
pub const CHANNELS_PER_PIXEL: usize = 4;

/// A per-thread scratch region bound to one rectangle at a time.
#[derive(Debug)]
pub struct Nexus {
    region: Region,
    authentic: bool,
    staging_pixels: Vec<Quantum>,
    staging_indexes: Vec<Quantum>,
}

impl Nexus {
    /// An unbound nexus, as every slot in a descriptor's nexus array starts.
    pub fn empty() -> Self {
        Self {
            region: Region::new(0, 0, 0, 0),
            authentic: false,
            staging_pixels: Vec::new(),
            staging_indexes: Vec::new(),
        }
    }

    /// `set_pixel_cache_nexus_pixels`: binds this nexus to `region`,
    /// choosing the authentic shortcut when the tier, masks, and rectangle
    /// shape allow it, otherwise (re)allocating the staging buffers.
    pub fn set_pixels(
        &mut self,
        region: Region,
        tier_kind: TierKind,
        columns: u32,
        rows: u32,
        has_clip_mask: bool,
        has_soft_mask: bool,
        active_index: bool,
    ) -> Result<()> {
        if tier_kind == TierKind::Undefined {
            return Err(Error::NoPixelsDefinedInCache { path: String::new() });
        }
        self.region = region;

        let authentic = tier_kind != TierKind::Disk
            && tier_kind != TierKind::Ping
            && !has_clip_mask
            && !has_soft_mask
            && region.is_authenticity_shape(columns)
            && region.is_within(columns, rows);

        if authentic {
            self.authentic = true;
            return Ok(());
        }

        self.authentic = false;
        let pixel_count = region.area() as usize;
        let pixel_len = pixel_count * CHANNELS_PER_PIXEL;
        let index_len = if active_index { pixel_count } else { 0 };

        if self.staging_pixels.len() != pixel_len {
            self.staging_pixels = vec![0; pixel_len];
        }
        if self.staging_indexes.len() != index_len {
            self.staging_indexes = vec![0; index_len];
        }
        Ok(())
    }

    /// Binds this nexus directly to `region` as a synthetic single-pixel
    /// scratch, independent of any descriptor's thread-indexed nexus array.
    /// `get_virtual`'s slow path (`descriptor::Cache::fetch_disposable_pixel`)
    /// uses one of these per one-pixel authentic lookup (spec.md §4.4)
    /// rather than re-binding the calling thread's own nexus slot.
    pub fn bind_disposable(&mut self, region: Region) {
        self.region = region;
        self.authentic = false;
        let pixel_len = region.area() as usize * CHANNELS_PER_PIXEL;
        self.staging_pixels = vec![0; pixel_len];
        self.staging_indexes.clear();
    }

    /// `true` if the last [`Nexus::set_pixels`] chose the authentic shortcut.
    pub fn is_authentic(&self) -> bool {
        self.authentic
    }

    /// The rectangle this nexus is currently bound to.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The synthetic staging buffer for pixel samples (empty when authentic).
    pub fn staging_pixels(&self) -> &[Quantum] {
        &self.staging_pixels
    }

    /// Mutable access to the staging pixel buffer.
    pub fn staging_pixels_mut(&mut self) -> &mut [Quantum] {
        &mut self.staging_pixels
    }

    /// The synthetic staging buffer for index samples (empty unless active).
    pub fn staging_indexes(&self) -> &[Quantum] {
        &self.staging_indexes
    }

    /// Mutable access to the staging index buffer.
    pub fn staging_indexes_mut(&mut self) -> &mut [Quantum] {
        &mut self.staging_indexes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_stripe_is_authentic_when_unmasked() {
        let mut nexus = Nexus::empty();
        nexus
            .set_pixels(Region::new(0, 0, 4, 4), TierKind::Memory, 4, 4, false, false, false)
            .unwrap();
        assert!(nexus.is_authentic());
        assert!(nexus.staging_pixels().is_empty());
    }

    #[test]
    fn clip_mask_forces_synthetic_even_for_full_width() {
        let mut nexus = Nexus::empty();
        nexus
            .set_pixels(Region::new(0, 0, 4, 4), TierKind::Memory, 4, 4, true, false, false)
            .unwrap();
        assert!(!nexus.is_authentic());
        assert_eq!(nexus.staging_pixels().len(), 4 * 4 * CHANNELS_PER_PIXEL);
    }

    #[test]
    fn disk_tier_is_never_authentic() {
        let mut nexus = Nexus::empty();
        nexus
            .set_pixels(Region::new(0, 0, 4, 4), TierKind::Disk, 4, 4, false, false, false)
            .unwrap();
        assert!(!nexus.is_authentic());
    }

    #[test]
    fn partial_row_is_synthetic_and_allocates_indexes_when_active() {
        let mut nexus = Nexus::empty();
        nexus
            .set_pixels(Region::new(0, 0, 2, 3), TierKind::Memory, 4, 4, false, false, true)
            .unwrap();
        assert!(!nexus.is_authentic());
        assert_eq!(nexus.staging_pixels().len(), 2 * 3 * CHANNELS_PER_PIXEL);
        assert_eq!(nexus.staging_indexes().len(), 2 * 3);
    }

    #[test]
    fn undefined_tier_fails() {
        let mut nexus = Nexus::empty();
        let err = nexus
            .set_pixels(Region::new(0, 0, 1, 1), TierKind::Undefined, 4, 4, false, false, false)
            .unwrap_err();
        assert!(matches!(err, Error::NoPixelsDefinedInCache { .. }));
    }

    #[test]
    fn restaging_with_the_same_length_keeps_the_buffer() {
        let mut nexus = Nexus::empty();
        nexus
            .set_pixels(Region::new(0, 0, 2, 2), TierKind::Disk, 4, 4, false, false, false)
            .unwrap();
        nexus.staging_pixels_mut()[0] = 42;
        nexus
            .set_pixels(Region::new(1, 1, 2, 2), TierKind::Disk, 4, 4, false, false, false)
            .unwrap();
        assert_eq!(nexus.staging_pixels()[0], 42);
    }
}
