//! The per-image cache descriptor: geometry, sample format, tier, nexus
//! array, and the region-transfer protocol (`get_authentic`/`queue_authentic`/
//! `sync_authentic`/`get_virtual`) that stages and flushes pixels against it.
//!
//! One [`CacheDescriptor`] exists per image; [`Cache`] is the cheap-to-clone
//! handle callers hold (`Arc<CacheDescriptor>`). Cloning a handle is
//! spec.md's `reference()` — it simply bumps the `Arc` strong count, which
//! doubles as the reference count the copy-on-write check in
//! [`Cache::acquire_for_write`] inspects, rather than a hand-rolled counter
//! the source keeps alongside the `Arc`-equivalent refcounted pointer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::nexus::Nexus;
use crate::random::RandomState;
use crate::region::{composite_clip_mask, composite_soft_mask, ClipMask, Region, SoftMask};
use crate::resource::{Resource, ResourceGovernor, ResourceGuard};
use crate::tier::{Mode, StorageTier, TierKind};
use crate::virtual_pixel::{self, Sample, VirtualPixelMethod};
use crate::{Pixel, Quantum, CHANNELS_PER_PIXEL};

/// Samples per index packet (one quantum: palette index or CMYK black).
pub const INDEX_CHANNELS_PER_PIXEL: usize = 1;

/// `StorageClass` from spec.md §3: `Pseudo` adds a palette-index channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageClass {
    /// Direct RGBA samples, no index plane (unless the colorspace demands one).
    #[default]
    Direct,
    /// Palette-indexed: an index plane carries the palette lookup.
    Pseudo,
}

/// The colorspace tag. Only the `Cmyk` distinction is semantically observed
/// by the cache (it forces an index/black-channel plane); the rest are
/// carried only so callers can round-trip a descriptor's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// sRGB or any other colorspace with no extra channel requirements.
    #[default]
    Rgb,
    /// Single-channel gray.
    Gray,
    /// CMYK: implies an index (black) channel is required.
    Cmyk,
}

impl ColorSpace {
    /// `true` iff this colorspace requires an index/black channel.
    pub fn requires_index_channel(self) -> bool {
        matches!(self, Self::Cmyk)
    }
}

/// `active_index_channel` is a pure function of storage class and colorspace
/// (spec.md §3 invariant).
fn active_index_channel(storage_class: StorageClass, colorspace: ColorSpace) -> bool {
    matches!(storage_class, StorageClass::Pseudo) || colorspace.requires_index_channel()
}

/// Geometry and sample-format fields, grouped so morphology can be
/// revalidated and swapped atomically (spec.md §4.2: "morphology is
/// revalidated... if it differs from current geometry the backing is
/// re-opened").
#[derive(Debug, Clone, Copy)]
struct Geometry {
    columns: u32,
    rows: u32,
    storage_class: StorageClass,
    colorspace: ColorSpace,
    active_index_channel: bool,
}

impl Geometry {
    fn new(columns: u32, rows: u32, storage_class: StorageClass, colorspace: ColorSpace) -> Self {
        Self {
            columns,
            rows,
            storage_class,
            colorspace,
            active_index_channel: active_index_channel(storage_class, colorspace),
        }
    }

    fn pixel_plane_quanta(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows) * CHANNELS_PER_PIXEL as u64
    }

    fn index_plane_quanta(&self) -> u64 {
        if self.active_index_channel {
            u64::from(self.columns) * u64::from(self.rows) * INDEX_CHANNELS_PER_PIXEL as u64
        } else {
            0
        }
    }

    fn total_bytes(&self) -> u64 {
        (self.pixel_plane_quanta() + self.index_plane_quanta()) * std::mem::size_of::<Quantum>() as u64
    }

    fn matches(&self, other: &Geometry) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && self.storage_class == other.storage_class
            && self.colorspace == other.colorspace
    }
}

/// The per-image cache descriptor (spec.md §3). Never constructed directly
/// by callers — see [`Cache::acquire`].
pub struct CacheDescriptor {
    geometry: RwLock<Geometry>,
    mode: Mutex<Mode>,
    tier: Mutex<StorageTier>,
    nexus: Vec<Mutex<Nexus>>,
    virtual_pixel_method: Mutex<VirtualPixelMethod>,
    background: RwLock<Pixel>,
    clip_mask: RwLock<Option<ClipMask>>,
    soft_mask: RwLock<Option<(SoftMask, Vec<Quantum>)>>,
    random: Mutex<Option<RandomState>>,
    governor: Arc<ResourceGovernor>,
    config: Arc<CacheConfig>,
    label: RwLock<String>,
    acquisitions: AtomicU64,
    signature: u32,
    /// Reservation of the `Thread` resource for this descriptor's nexus
    /// array (spec.md §5: thread is one of the seven resources the governor
    /// negotiates for). Released automatically when the descriptor drops.
    _thread_guard: ResourceGuard,
}

const CACHE_SIGNATURE: u32 = 0x4d41_4749; // "MAGI", the sentinel spec.md §3 names.

impl CacheDescriptor {
    fn random(&self) -> RandomGuard<'_> {
        let mut guard = self.random.lock().expect("random mutex poisoned");
        if guard.is_none() {
            *guard = Some(RandomState::new());
        }
        RandomGuard(guard)
    }

    fn nexus_slot(&self, thread_id: usize) -> Result<&Mutex<Nexus>> {
        self.nexus
            .get(thread_id)
            .ok_or(Error::UnableToGetCacheNexus { thread_id })
    }

    fn label(&self) -> String {
        self.label.read().expect("label lock poisoned").clone()
    }

    /// Throttle + time-limit check run on every acquisition (spec.md §4.2).
    fn throttle_and_check_time(&self) -> Result<()> {
        let count = self.acquisitions.fetch_add(1, Ordering::Relaxed) + 1;
        if count % 32 == 0 {
            let throttle = self.config.throttle;
            if !throttle.is_zero() {
                trace!(cache = %self.label(), ms = throttle.as_millis(), "throttling cache acquisition");
                std::thread::sleep(throttle);
            }
        }
        self.governor.check_time_limit()
    }
}

struct RandomGuard<'a>(MutexGuard<'a, Option<RandomState>>);

impl<'a> std::ops::Deref for RandomGuard<'a> {
    type Target = RandomState;
    fn deref(&self) -> &RandomState {
        self.0.as_ref().expect("initialized above")
    }
}

/// A cheap-to-clone handle to a [`CacheDescriptor`]. Cloning is spec.md's
/// `reference()`: it bumps the underlying `Arc`'s strong count.
#[derive(Clone)]
pub struct Cache(Arc<CacheDescriptor>);

/// Borrowed access to one bound nexus, returned by [`Cache::get_authentic`]
/// and [`Cache::queue_authentic`]. Dropping it without calling
/// [`NexusAccess::sync`] discards any synthetic writes (mirroring the
/// source: a caller that forgets to sync simply never flushes).
pub struct NexusAccess<'a> {
    cache: &'a CacheDescriptor,
    thread_id: usize,
    guard: MutexGuard<'a, Nexus>,
}

impl<'a> NexusAccess<'a> {
    /// The rectangle this access is bound to.
    pub fn region(&self) -> Region {
        self.guard.region()
    }

    /// `true` if this access is a direct view into the tier backing.
    pub fn is_authentic(&self) -> bool {
        self.guard.is_authentic()
    }

    /// Like [`NexusAccess::pixels`], but fails instead of silently falling
    /// back to the staging buffer — for callers that need a direct pointer
    /// into the backing (e.g. to hand off to code that writes through the
    /// tier without going through `sync`) and must know if they didn't get
    /// one (spec.md §7, `PixelsAreNotAuthentic`).
    pub fn authentic_pixels(&self) -> Result<&[Quantum]> {
        if !self.guard.is_authentic() {
            return Err(Error::PixelsAreNotAuthentic {
                region: format!("{:?}", self.guard.region()),
            });
        }
        Ok(self.pixels())
    }

    /// Immutable pixel samples for this access's region, row-major,
    /// `CHANNELS_PER_PIXEL` quanta per pixel.
    pub fn pixels(&self) -> &[Quantum] {
        if self.guard.is_authentic() {
            // SAFETY: see `CacheDescriptor::authentic_pixel_slice`.
            unsafe { self.cache.authentic_pixel_slice(self.guard.region()) }
        } else {
            self.guard.staging_pixels()
        }
    }

    /// Mutable pixel samples for this access's region.
    pub fn pixels_mut(&mut self) -> &mut [Quantum] {
        if self.guard.is_authentic() {
            // SAFETY: see `CacheDescriptor::authentic_pixel_slice`.
            unsafe { self.cache.authentic_pixel_slice(self.guard.region()) }
        } else {
            self.guard.staging_pixels_mut()
        }
    }

    /// Immutable index samples (empty unless the descriptor has an active
    /// index channel).
    pub fn indexes(&self) -> &[Quantum] {
        if self.guard.is_authentic() {
            // SAFETY: see `CacheDescriptor::authentic_index_slice`.
            unsafe { self.cache.authentic_index_slice(self.guard.region()) }
        } else {
            self.guard.staging_indexes()
        }
    }

    /// Mutable index samples.
    pub fn indexes_mut(&mut self) -> &mut [Quantum] {
        if self.guard.is_authentic() {
            // SAFETY: see `CacheDescriptor::authentic_index_slice`.
            unsafe { self.cache.authentic_index_slice(self.guard.region()) }
        } else {
            self.guard.staging_indexes_mut()
        }
    }

    /// `sync_authentic`: for a synthetic access, composites clip/soft masks
    /// (when present) then writes the staged planes through to the tier. A
    /// no-op for an authentic access — mutations already landed in the
    /// backing (spec.md property 1).
    pub fn sync(mut self) -> Result<()> {
        if self.guard.is_authentic() {
            return Ok(());
        }
        let region = self.guard.region();

        if let Some(clip) = self.cache.clip_mask.read().expect("clip mask lock poisoned").as_ref() {
            composite_clip_mask(self.guard.staging_pixels_mut(), region, CHANNELS_PER_PIXEL, clip);
        }
        if let Some((soft, background)) = self.cache.soft_mask.read().expect("soft mask lock poisoned").as_ref() {
            composite_soft_mask(self.guard.staging_pixels_mut(), background, region, CHANNELS_PER_PIXEL, soft);
        }

        self.cache.write_pixels(region, self.guard.staging_pixels())?;
        let active_index = self
            .cache
            .geometry
            .read()
            .expect("geometry lock poisoned")
            .active_index_channel;
        if active_index {
            self.cache.write_indexes(region, self.guard.staging_indexes())?;
        }
        Ok(())
    }
}

impl Cache {
    /// `acquire(n_threads)`: a new descriptor, tier `Undefined`, refcount 1.
    pub fn acquire(
        columns: u32,
        rows: u32,
        storage_class: StorageClass,
        colorspace: ColorSpace,
        n_threads: usize,
        governor: Arc<ResourceGovernor>,
        config: Arc<CacheConfig>,
    ) -> Result<Self> {
        columns
            .checked_mul(rows)
            .ok_or_else(|| Error::allocation_failed(0, "columns*rows overflows"))?;
        let nexus_count = n_threads.max(1);
        // spec.md §5: thread is one of the seven resources the governor
        // negotiates for, reserved for the descriptor's nexus-array width
        // and released when the descriptor is destroyed.
        let thread_guard = governor
            .acquire(Resource::Thread, nexus_count as u64)
            .ok_or_else(|| crate::resource::exhausted(Resource::Thread, ""))?;
        let descriptor = CacheDescriptor {
            geometry: RwLock::new(Geometry::new(columns, rows, storage_class, colorspace)),
            mode: Mutex::new(Mode::ReadWrite),
            tier: Mutex::new(StorageTier::undefined(Arc::clone(&governor))),
            nexus: (0..nexus_count).map(|_| Mutex::new(Nexus::empty())).collect(),
            virtual_pixel_method: Mutex::new(VirtualPixelMethod::default()),
            background: RwLock::new([0, 0, 0, crate::QUANTUM_RANGE]),
            clip_mask: RwLock::new(None),
            soft_mask: RwLock::new(None),
            random: Mutex::new(None),
            governor,
            config,
            label: RwLock::new(String::new()),
            acquisitions: AtomicU64::new(0),
            signature: CACHE_SIGNATURE,
            _thread_guard: thread_guard,
        };
        Ok(Self(Arc::new(descriptor)))
    }

    /// `clone(src)`: a shallow clone with the same geometry but no backing
    /// (tier `Undefined`), and the virtual-pixel policy copied over.
    pub fn shallow_clone(&self) -> Result<Self> {
        let geometry = *self.0.geometry.read().expect("geometry lock poisoned");
        let nexus_count = self.0.nexus.len();
        let clone = Self::acquire(
            geometry.columns,
            geometry.rows,
            geometry.storage_class,
            geometry.colorspace,
            nexus_count,
            Arc::clone(&self.0.governor),
            Arc::clone(&self.0.config),
        )?;
        *clone.0.virtual_pixel_method.lock().expect("vp method lock poisoned") =
            *self.0.virtual_pixel_method.lock().expect("vp method lock poisoned");
        *clone.0.background.write().expect("background lock poisoned") =
            *self.0.background.read().expect("background lock poisoned");
        *clone.0.label.write().expect("label lock poisoned") = self.0.label();
        Ok(clone)
    }

    /// `reference`: refcount++. Equivalent to [`Clone::clone`]; kept for
    /// parity with spec.md's named operation.
    pub fn reference(&self) -> Self {
        self.clone()
    }

    /// The number of `Cache` handles (including this one) that share this
    /// descriptor — the Rust realization of spec.md's `reference_count`.
    pub fn reference_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// `destroy`: drops this handle. At refcount zero the descriptor's
    /// `Drop` (via `StorageTier`'s) releases the backing, nexuses, and
    /// resource guards. Kept as an explicit method for parity with spec.md's
    /// operation table; equivalent to `drop(cache)`.
    pub fn destroy(self) {
        drop(self);
    }

    /// Sets the descriptor's display label (used only in error messages).
    pub fn set_label(&self, label: impl Into<String>) {
        *self.0.label.write().expect("label lock poisoned") = label.into();
    }

    /// `open(mode)`: ensures backing exists for the current geometry/class.
    pub fn open(&self, mode: Mode) -> Result<()> {
        let geometry = *self.0.geometry.read().expect("geometry lock poisoned");
        let label = self.0.label();
        let mut tier = self.0.tier.lock().expect("tier mutex poisoned");
        if tier.kind() != TierKind::Undefined {
            return Ok(());
        }
        let random = self.0.random();
        let temp_dir = self
            .0
            .config
            .temporary_path
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        tier.open(geometry.total_bytes(), mode, &temp_dir, &random, &label)?;
        *self.0.mode.lock().expect("mode mutex poisoned") = mode;
        debug!(cache = %label, tier = ?tier.kind(), bytes = geometry.total_bytes(), "opened pixel cache backing");
        Ok(())
    }

    /// `open` for a metadata-only ("ping") image: no bytes allocated.
    pub fn open_ping(&self) {
        self.0.tier.lock().expect("tier mutex poisoned").open_ping();
    }

    /// Current tier kind.
    pub fn tier_kind(&self) -> TierKind {
        self.0.tier.lock().expect("tier mutex poisoned").kind()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        *self.0.mode.lock().expect("mode mutex poisoned")
    }

    /// Image columns.
    pub fn columns(&self) -> u32 {
        self.0.geometry.read().expect("geometry lock poisoned").columns
    }

    /// Image rows.
    pub fn rows(&self) -> u32 {
        self.0.geometry.read().expect("geometry lock poisoned").rows
    }

    /// `true` if this descriptor carries an index plane.
    pub fn active_index_channel(&self) -> bool {
        self.0.geometry.read().expect("geometry lock poisoned").active_index_channel
    }

    /// Sets the image background colour used by several virtual-pixel
    /// policies and the clip-mask "off" fill.
    pub fn set_background(&self, pixel: Pixel) {
        *self.0.background.write().expect("background lock poisoned") = pixel;
    }

    /// Installs (or clears, with `None`) the clip mask applied on `sync`.
    pub fn set_clip_mask(&self, mask: Option<ClipMask>) {
        *self.0.clip_mask.write().expect("clip mask lock poisoned") = mask;
    }

    /// Installs (or clears) the soft mask and its compositing background,
    /// applied with `Over` semantics on `sync`.
    pub fn set_soft_mask(&self, mask: Option<(SoftMask, Vec<Quantum>)>) {
        *self.0.soft_mask.write().expect("soft mask lock poisoned") = mask;
    }

    /// `true` if either mask is installed — forces the nexus authenticity
    /// shortcut off (spec.md §4.3 step 3).
    fn has_any_mask(&self) -> bool {
        self.0.clip_mask.read().expect("clip mask lock poisoned").is_some()
            || self.0.soft_mask.read().expect("soft mask lock poisoned").is_some()
    }

    /// `set_virtual_method`: sets the policy, returning the previous one.
    pub fn set_virtual_method(&self, method: VirtualPixelMethod) -> VirtualPixelMethod {
        let mut guard = self.0.virtual_pixel_method.lock().expect("vp method lock poisoned");
        std::mem::replace(&mut *guard, method)
    }

    /// The currently configured virtual-pixel policy.
    pub fn virtual_method(&self) -> VirtualPixelMethod {
        *self.0.virtual_pixel_method.lock().expect("vp method lock poisoned")
    }

    /// `get_image_pixel_cache(image, clone=true)`: the copy-on-write
    /// unification step. If this handle is uniquely held and already
    /// `ReadWrite`, returns a clone of the handle (cheap `Arc` bump, no new
    /// backing). Otherwise opens a fresh descriptor in `ReadWrite` mode,
    /// copy-forwards pixels via [`Cache::clone_pixels`], and returns it — the
    /// caller should adopt the returned handle and drop the old one, which
    /// decrements the original's refcount exactly as spec.md describes.
    pub fn acquire_for_write(&self) -> Result<Self> {
        let unique = self.reference_count() == 1;
        let mode = self.mode();
        if unique && mode == Mode::ReadWrite {
            return Ok(self.clone());
        }
        trace!(
            refs = self.reference_count(),
            mode = ?mode,
            "cloning cache descriptor for copy-on-write"
        );
        let clone = self.shallow_clone()?;
        clone.open(Mode::ReadWrite)?;
        Self::clone_pixels(&clone, self)?;
        Ok(clone)
    }

    /// Revalidates morphology against `columns`/`rows`/`storage_class`/
    /// `colorspace`: if it differs from the descriptor's current geometry,
    /// swaps in the new geometry and re-opens the backing in `ReadWrite`
    /// mode, closing any Disk fd first to bound open files (spec.md §4.2).
    pub fn revalidate(&self, columns: u32, rows: u32, storage_class: StorageClass, colorspace: ColorSpace) -> Result<()> {
        let new_geometry = Geometry::new(columns, rows, storage_class, colorspace);
        let changed = {
            let current = self.0.geometry.read().expect("geometry lock poisoned");
            !current.matches(&new_geometry)
        };
        if !changed {
            return Ok(());
        }
        {
            let mut tier = self.0.tier.lock().expect("tier mutex poisoned");
            tier.release_disk_fd();
            tier.close();
        }
        *self.0.geometry.write().expect("geometry lock poisoned") = new_geometry;
        self.open(Mode::ReadWrite)
    }

    // ---- region transfer protocol ----

    fn bind_nexus<'a>(&'a self, thread_id: usize, region: Region) -> Result<MutexGuard<'a, Nexus>> {
        self.0.throttle_and_check_time()?;
        let (tier_kind, columns, rows, active_index) = {
            let geometry = self.0.geometry.read().expect("geometry lock poisoned");
            let tier_kind = self.0.tier.lock().expect("tier mutex poisoned").kind();
            (tier_kind, geometry.columns, geometry.rows, geometry.active_index_channel)
        };
        let has_mask = self.has_any_mask();
        let mut nexus = self
            .0
            .nexus_slot(thread_id)?
            .lock()
            .expect("nexus mutex poisoned");
        nexus.set_pixels(region, tier_kind, columns, rows, has_mask, has_mask, active_index)?;
        Ok(nexus)
    }

    /// `queue_authentic`: a write-only region, no stage-in. Indexes are
    /// updated in place and flushed on `sync`.
    pub fn queue_authentic(&self, thread_id: usize, region: Region) -> Result<NexusAccess<'_>> {
        if region.width == 0 || region.height == 0 {
            return Err(Error::NoPixelsDefinedInCache { path: self.0.label() });
        }
        if !region.is_within(self.columns(), self.rows()) {
            return Err(Error::NoPixelsDefinedInCache { path: self.0.label() });
        }
        let guard = self.bind_nexus(thread_id, region)?;
        Ok(NexusAccess {
            cache: &self.0,
            thread_id,
            guard,
        })
    }

    /// `get_authentic`: like `queue_authentic`, but stages the region's
    /// current contents in first when the nexus is synthetic.
    pub fn get_authentic(&self, thread_id: usize, region: Region) -> Result<NexusAccess<'_>> {
        let mut access = self.queue_authentic(thread_id, region)?;
        if !access.guard.is_authentic() {
            let pixels = self.0.read_pixels(region)?;
            access.guard.staging_pixels_mut().copy_from_slice(&pixels);
            if self.active_index_channel() {
                let indexes = self.0.read_indexes(region)?;
                access.guard.staging_indexes_mut().copy_from_slice(&indexes);
            }
        }
        Ok(access)
    }

    /// `sync_authentic` taking a thread id directly, for callers that don't
    /// hold the [`NexusAccess`] (e.g. the remote-cache server, which stages
    /// writes from the wire before syncing).
    pub fn sync_authentic(&self, thread_id: usize) -> Result<()> {
        let guard = self
            .0
            .nexus_slot(thread_id)?
            .lock()
            .expect("nexus mutex poisoned");
        let access = NexusAccess {
            cache: &self.0,
            thread_id,
            guard,
        };
        access.sync()
    }

    /// `get_virtual(method,x,y,w,h)`: boundary-extrapolated read. The fast
    /// path defers to [`Cache::get_authentic`] when the whole rectangle is
    /// in-bounds; the slow path walks the rectangle row by row, issuing
    /// bulk in-bounds runs and resolving the rest through
    /// [`virtual_pixel::resolve`].
    pub fn get_virtual(&self, thread_id: usize, method: VirtualPixelMethod, region: Region) -> Result<Vec<Pixel>> {
        let columns = self.columns();
        let rows = self.rows();
        if region.width == 0 || region.height == 0 {
            return Ok(Vec::new());
        }

        if region.is_within(columns, rows) {
            let access = self.get_authentic(thread_id, region)?;
            return Ok(deinterleave(access.pixels()));
        }

        let background = *self.0.background.read().expect("background lock poisoned");
        let random = self.0.random();
        let mut out = Vec::with_capacity(region.area() as usize);

        for row in 0..region.height as i64 {
            let v = region.y + row;
            let mut col = 0i64;
            while col < region.width as i64 {
                let u = region.x + col;
                let run = if u >= 0 && v >= 0 && (u as u64) < u64::from(columns) && (v as u64) < u64::from(rows) {
                    // In-bounds run: extend as far as the image row and the
                    // requested width both allow.
                    std::cmp::min(u64::from(columns) - u as u64, region.width as u64 - col as u64)
                } else {
                    0
                };

                if run > 0 {
                    let run_region = Region::new(u, v, run as u32, 1);
                    let access = self.get_authentic(thread_id, run_region)?;
                    out.extend(deinterleave(access.pixels()));
                    col += run as i64;
                } else {
                    match virtual_pixel::resolve(method, u, v, columns, rows, background, &random) {
                        Sample::Constant(pixel) => out.push(pixel),
                        Sample::Authentic { x, y } => {
                            out.push(self.fetch_disposable_pixel(x, y)?);
                        }
                    }
                    col += 1;
                }
            }
        }
        Ok(out)
    }

    /// Fetches one authentic pixel through a disposable single-slot nexus
    /// (spec.md §4.4), used by the virtual-pixel sampler's Edge/Tile/
    /// Mirror/Random/etc. policies for their one-pixel authentic lookups.
    /// Kept off the caller's own thread nexus so it never re-binds (and so
    /// clobbers) a region that thread might still be holding via
    /// `get_authentic`/`queue_authentic`.
    fn fetch_disposable_pixel(&self, x: u32, y: u32) -> Result<Pixel> {
        let region = Region::new(i64::from(x), i64::from(y), 1, 1);
        let mut nexus = Nexus::empty();
        nexus.bind_disposable(region);
        let pixels = self.0.read_pixels(region)?;
        nexus.staging_pixels_mut().copy_from_slice(&pixels);
        Ok(nexus.staging_pixels().try_into().expect("one pixel"))
    }

    /// `clone_pixels(dst, src)`: transfers pixel (and index, when both sides
    /// are active) planes across any tier combination, per spec.md §4.5.
    /// Any I/O failure along the way is reported as
    /// [`Error::UnableToCloneCache`] (spec.md §7) rather than the raw
    /// read/write error, so the original descriptor's own failure mode
    /// (e.g. a disk read error) isn't mistaken for a clone-specific one.
    pub fn clone_pixels(dst: &Cache, src: &Cache) -> Result<()> {
        Self::clone_pixels_inner(dst, src).map_err(|err| Error::UnableToCloneCache(err.to_string()))
    }

    fn clone_pixels_inner(dst: &Cache, src: &Cache) -> Result<()> {
        let src_kind = src.tier_kind();
        let dst_kind = dst.tier_kind();
        if src_kind == TierKind::Ping || dst_kind == TierKind::Ping {
            return Ok(());
        }

        let src_columns = src.columns();
        let dst_columns = dst.columns();
        let rows = std::cmp::min(src.rows(), dst.rows());
        let cols = std::cmp::min(src_columns, dst_columns);

        if src_kind == TierKind::Memory && dst_kind == TierKind::Memory && src_columns == dst_columns && src.rows() == dst.rows()
        {
            // Identical geometry: one block copy.
            let region = Region::new(0, 0, src_columns, src.rows());
            let pixels = src.0.read_pixels(region)?;
            dst.0.write_pixels(region, &pixels)?;
            if src.active_index_channel() && dst.active_index_channel() {
                let indexes = src.0.read_indexes(region)?;
                dst.0.write_indexes(region, &indexes)?;
            }
            return Ok(());
        }

        // Row-by-row transfer across (possibly) mismatched geometry/tiers.
        // Rows are independent, so this is the one place the spec calls out
        // for data-parallel copying when both sides are in-memory and
        // therefore safe to touch concurrently without risking partial,
        // torn disk writes.
        let copy_row = |row: u32| -> Result<()> {
            let src_region = Region::new(0, i64::from(row), cols, 1);
            let dst_region = Region::new(0, i64::from(row), cols, 1);
            let pixels = src.0.read_pixels(src_region)?;
            dst.0.write_pixels(dst_region, &pixels)?;
            if dst_columns > cols {
                let pad = Region::new(i64::from(cols), i64::from(row), dst_columns - cols, 1);
                let zeros = vec![0 as Quantum; pad.area() as usize * CHANNELS_PER_PIXEL];
                dst.0.write_pixels(pad, &zeros)?;
            }
            if src.active_index_channel() && dst.active_index_channel() {
                let indexes = src.0.read_indexes(src_region)?;
                dst.0.write_indexes(dst_region, &indexes)?;
                if dst_columns > cols {
                    let pad = Region::new(i64::from(cols), i64::from(row), dst_columns - cols, 1);
                    let zeros = vec![0 as Quantum; pad.area() as usize * INDEX_CHANNELS_PER_PIXEL];
                    dst.0.write_indexes(pad, &zeros)?;
                }
            }
            Ok(())
        };

        if src_kind == TierKind::Memory && dst_kind == TierKind::Memory {
            use rayon::prelude::*;
            (0..rows).into_par_iter().try_for_each(copy_row)?;
        } else {
            for row in 0..rows {
                copy_row(row)?;
            }
        }
        Ok(())
    }

    /// `persist_pixel_cache`: attaches this descriptor's Disk tier to a
    /// pre-existing file at `path`, starting at the caller's `offset`.
    /// Returns the advanced, page-size-aligned offset for the next
    /// descriptor to attach after this one (spec.md §6).
    pub fn persist(&self, path: &std::path::Path, offset: u64, mode: Mode) -> Result<u64> {
        let geometry = *self.0.geometry.read().expect("geometry lock poisoned");
        let length = geometry.total_bytes();
        {
            let mut tier = self.0.tier.lock().expect("tier mutex poisoned");
            tier.attach(path, offset, length, mode)?;
        }
        *self.0.mode.lock().expect("mode mutex poisoned") = mode;
        let page_size = crate::tier::page_size();
        Ok(offset + length + page_size - length % page_size)
    }
}

impl CacheDescriptor {
    /// Reads `region`'s pixel plane from the tier into a freshly-allocated
    /// buffer. One bulk copy when the region spans full image rows;
    /// row-by-row otherwise (spec.md §4.3).
    fn read_pixels(&self, region: Region) -> Result<Vec<Quantum>> {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        let mut out = vec![0 as Quantum; region.area() as usize * CHANNELS_PER_PIXEL];
        let mut tier = self.tier.lock().expect("tier mutex poisoned");
        transfer_plane(&mut tier, region, geometry.columns, 0, CHANNELS_PER_PIXEL, &mut out, true)?;
        Ok(out)
    }

    /// Reads `region`'s index plane, which starts immediately after the
    /// pixel plane in the tier's byte layout.
    fn read_indexes(&self, region: Region) -> Result<Vec<Quantum>> {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        let mut out = vec![0 as Quantum; region.area() as usize * INDEX_CHANNELS_PER_PIXEL];
        let mut tier = self.tier.lock().expect("tier mutex poisoned");
        let index_base = geometry.pixel_plane_quanta();
        transfer_plane(&mut tier, region, geometry.columns, index_base, INDEX_CHANNELS_PER_PIXEL, &mut out, true)?;
        Ok(out)
    }

    /// Writes `data` into `region`'s pixel plane.
    fn write_pixels(&self, region: Region, data: &[Quantum]) -> Result<()> {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        let mut tier = self.tier.lock().expect("tier mutex poisoned");
        let mut scratch = data.to_vec();
        transfer_plane(&mut tier, region, geometry.columns, 0, CHANNELS_PER_PIXEL, &mut scratch, false)
    }

    /// Writes `data` into `region`'s index plane.
    fn write_indexes(&self, region: Region, data: &[Quantum]) -> Result<()> {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        let mut tier = self.tier.lock().expect("tier mutex poisoned");
        let index_base = geometry.pixel_plane_quanta();
        let mut scratch = data.to_vec();
        transfer_plane(&mut tier, region, geometry.columns, index_base, INDEX_CHANNELS_PER_PIXEL, &mut scratch, false)
    }

    /// Returns the authentic, zero-copy pixel-plane slice for `region`.
    ///
    /// # Safety
    /// The caller (the region-transfer protocol) has already verified via
    /// `Nexus::set_pixels` that the tier is `Memory` or `Map` and that
    /// `region` lies entirely within the image. spec.md §5 gives the cache
    /// no cross-thread visibility guarantee for *overlapping* regions —
    /// disjoint concurrent callers are exactly the scenario this method
    /// exists to serve without a lock held for the mutation's duration, so
    /// soundness rests on every live authentic nexus on this descriptor
    /// covering disjoint rectangles, which is the caller's contract to
    /// uphold (property tested by scenario S4).
    unsafe fn authentic_pixel_slice<'a>(&'a self, region: Region) -> &'a mut [Quantum] {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        let base = {
            let tier = self.tier.lock().expect("tier mutex poisoned");
            tier.quantum_base_ptr().expect("authentic access requires Memory/Map tier")
        };
        let offset = (region.y as u64 * u64::from(geometry.columns) + region.x as u64) * CHANNELS_PER_PIXEL as u64;
        let len = region.area() as usize * CHANNELS_PER_PIXEL;
        std::slice::from_raw_parts_mut(base.add(offset as usize), len)
    }

    /// Index-plane counterpart of [`CacheDescriptor::authentic_pixel_slice`].
    unsafe fn authentic_index_slice<'a>(&'a self, region: Region) -> &'a mut [Quantum] {
        let geometry = *self.geometry.read().expect("geometry lock poisoned");
        if !geometry.active_index_channel {
            return &mut [];
        }
        let base = {
            let tier = self.tier.lock().expect("tier mutex poisoned");
            tier.quantum_base_ptr().expect("authentic access requires Memory/Map tier")
        };
        let index_base = geometry.pixel_plane_quanta();
        let offset = index_base + (region.y as u64 * u64::from(geometry.columns) + region.x as u64) * INDEX_CHANNELS_PER_PIXEL as u64;
        let len = region.area() as usize * INDEX_CHANNELS_PER_PIXEL;
        std::slice::from_raw_parts_mut(base.add(offset as usize), len)
    }
}

/// Moves `region`'s plane between the tier and `buf`: one bulk transfer when
/// the region spans full image rows and the whole extent fits in one
/// contiguous stripe, otherwise row-by-row striding by `columns*channels` in
/// the tier and `region.width*channels` in `buf` (spec.md §4.3).
///
/// `read` selects direction: `true` copies tier → `buf`, `false` copies
/// `buf` → tier.
fn transfer_plane(
    tier: &mut StorageTier,
    region: Region,
    columns: u32,
    plane_base_quanta: u64,
    channels: usize,
    buf: &mut [Quantum],
    read: bool,
) -> Result<()> {
    if region.width == 0 || region.height == 0 || channels == 0 {
        return Ok(());
    }
    let contiguous = region.width == columns;
    if contiguous {
        let offset = plane_base_quanta + (region.y as u64 * u64::from(columns) + region.x as u64) * channels as u64;
        if read {
            tier.read_quanta_at(offset, buf)?;
        } else {
            tier.write_quanta_at(offset, buf)?;
        }
        return Ok(());
    }
    let row_quanta = region.width as usize * channels;
    for row in 0..region.height as i64 {
        let offset = plane_base_quanta
            + ((region.y + row) as u64 * u64::from(columns) + region.x as u64) * channels as u64;
        let start = row as usize * row_quanta;
        let slice = &mut buf[start..start + row_quanta];
        if read {
            tier.read_quanta_at(offset, slice)?;
        } else {
            tier.write_quanta_at(offset, slice)?;
        }
    }
    Ok(())
}

/// Splits an interleaved `[r,g,b,a, r,g,b,a, ...]` buffer into `Pixel`s.
fn deinterleave(flat: &[Quantum]) -> Vec<Pixel> {
    flat.chunks_exact(CHANNELS_PER_PIXEL)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::resource::ResourceGovernor;

    fn test_cache(columns: u32, rows: u32) -> Cache {
        let config = Arc::new(CacheConfig::default());
        let governor = Arc::new(ResourceGovernor::new(&config));
        let cache = Cache::acquire(columns, rows, StorageClass::Direct, ColorSpace::Rgb, 4, governor, config).unwrap();
        cache.open(Mode::ReadWrite).unwrap();
        cache
    }

    #[test]
    fn authentic_round_trip_full_width_stripe() {
        let cache = test_cache(4, 4);
        {
            let mut access = cache.queue_authentic(0, Region::new(0, 0, 4, 4)).unwrap();
            assert!(access.is_authentic());
            for (i, px) in access.pixels_mut().chunks_exact_mut(CHANNELS_PER_PIXEL).enumerate() {
                let y = (i / 4) as u16;
                let x = (i % 4) as u16;
                px.copy_from_slice(&[y * 64, x * 64, 0, 0xFFFF]);
            }
            access.sync().unwrap();
        }
        let access = cache.get_authentic(0, Region::new(0, 0, 4, 4)).unwrap();
        assert!(access.is_authentic());
        assert_eq!(&access.pixels()[0..4], &[0, 0, 0, 0xFFFF]);
        assert_eq!(&access.pixels()[4 * 4..4 * 4 + 4], &[64, 0, 0, 0xFFFF]);
    }

    #[test]
    fn authentic_pixels_fails_on_a_synthetic_access() {
        let cache = test_cache(4, 4);
        let authentic = cache.get_authentic(0, Region::new(0, 0, 4, 4)).unwrap();
        assert!(authentic.authentic_pixels().is_ok());

        // A clip mask forces every access on this cache to be synthetic.
        cache.set_clip_mask(Some(ClipMask::new(4, vec![1; 16])));
        let synthetic = cache.get_authentic(0, Region::new(0, 0, 1, 1)).unwrap();
        let err = synthetic.authentic_pixels().unwrap_err();
        assert!(matches!(err, Error::PixelsAreNotAuthentic { .. }));
    }

    #[test]
    fn pseudo_class_round_trips_indexes() {
        let config = Arc::new(CacheConfig::default());
        let governor = Arc::new(ResourceGovernor::new(&config));
        let cache = Cache::acquire(2, 2, StorageClass::Pseudo, ColorSpace::Rgb, 1, governor, config).unwrap();
        cache.open(Mode::ReadWrite).unwrap();
        assert!(cache.active_index_channel());
        {
            let mut access = cache.queue_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
            access.indexes_mut().copy_from_slice(&[0, 1, 2, 3]);
            access.sync().unwrap();
        }
        let access = cache.get_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
        assert_eq!(access.indexes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn disk_tier_round_trip_is_synthetic_but_consistent() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        let config = Arc::new(config);
        let governor = Arc::new(ResourceGovernor::new(&config));
        let cache = Cache::acquire(8, 8, StorageClass::Direct, ColorSpace::Rgb, 1, governor, config).unwrap();
        cache.open(Mode::ReadWrite).unwrap();
        assert_eq!(cache.tier_kind(), TierKind::Disk);
        {
            let mut access = cache.queue_authentic(0, Region::new(1, 1, 3, 2)).unwrap();
            assert!(!access.is_authentic());
            access.pixels_mut().fill(7);
            access.sync().unwrap();
        }
        let access = cache.get_authentic(0, Region::new(1, 1, 3, 2)).unwrap();
        assert!(access.pixels().iter().all(|&q| q == 7));
    }

    #[test]
    fn get_virtual_edge_policy_matches_scenario_s1() {
        let cache = test_cache(4, 4);
        {
            let mut access = cache.queue_authentic(0, Region::new(0, 0, 4, 4)).unwrap();
            for (i, px) in access.pixels_mut().chunks_exact_mut(CHANNELS_PER_PIXEL).enumerate() {
                let y = (i / 4) as u16;
                let x = (i % 4) as u16;
                px.copy_from_slice(&[y * 64, x * 64, 0, 0xFFFF]);
            }
            access.sync().unwrap();
        }
        let pixels = cache
            .get_virtual(0, VirtualPixelMethod::Edge, Region::new(-1, -1, 6, 6))
            .unwrap();
        assert_eq!(pixels.len(), 36);
        assert_eq!(pixels[0], [0, 0, 0, 0xFFFF]);
        // Centre of the 6x6 window (at output index (2,2)) is original (1,1).
        let centre = pixels[2 * 6 + 2];
        assert_eq!(centre, [64, 64, 0, 0xFFFF]);
    }

    #[test]
    fn clone_pixels_pads_extra_columns_with_zero() {
        let src = test_cache(2, 2);
        {
            let mut access = src.queue_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
            access.pixels_mut().fill(5);
            access.sync().unwrap();
        }
        let dst = test_cache(4, 2);
        Cache::clone_pixels(&dst, &src).unwrap();
        let access = dst.get_authentic(0, Region::new(0, 0, 4, 2)).unwrap();
        let pixels = access.pixels();
        assert!(pixels[0..CHANNELS_PER_PIXEL].iter().all(|&q| q == 5));
        assert!(pixels[2 * CHANNELS_PER_PIXEL..3 * CHANNELS_PER_PIXEL].iter().all(|&q| q == 0));
    }

    #[test]
    fn reference_then_write_yields_distinct_backings() {
        let a = test_cache(2, 2);
        {
            let mut access = a.queue_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
            access.pixels_mut().fill(1);
            access.sync().unwrap();
        }
        let b = a.reference();
        assert_eq!(b.reference_count(), 2);
        let b_writable = b.acquire_for_write().unwrap();
        assert_ne!(b_writable.reference_count(), a.reference_count().max(2));
        {
            let mut access = b_writable.queue_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
            access.pixels_mut().fill(9);
            access.sync().unwrap();
        }
        let a_access = a.get_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
        assert!(a_access.pixels().iter().all(|&q| q == 1));
    }

    #[test]
    fn unique_readwrite_handle_reuses_backing_on_acquire_for_write() {
        let a = test_cache(2, 2);
        let a2 = a.acquire_for_write().unwrap();
        assert_eq!(a.reference_count(), 2);
        let _ = a2;
    }

    #[test]
    fn clip_mask_zeroes_pixels_on_sync() {
        let cache = test_cache(2, 2);
        cache.set_clip_mask(Some(ClipMask::new(2, vec![1, 0, 0, 1])));
        {
            let mut access = cache.queue_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
            assert!(!access.is_authentic(), "a mask forces synthetic access");
            access.pixels_mut().fill(42);
            access.sync().unwrap();
        }
        let access = cache.get_authentic(0, Region::new(0, 0, 2, 2)).unwrap();
        let pixels = access.pixels();
        assert!(pixels[0..CHANNELS_PER_PIXEL].iter().all(|&q| q == 42));
        assert!(pixels[CHANNELS_PER_PIXEL..2 * CHANNELS_PER_PIXEL].iter().all(|&q| q == 0));
    }

    #[test]
    fn queue_authentic_rejects_out_of_bounds_region() {
        let cache = test_cache(4, 4);
        let err = cache.queue_authentic(0, Region::new(2, 2, 4, 4)).unwrap_err();
        assert!(matches!(err, Error::NoPixelsDefinedInCache { .. }));
    }

    #[test]
    fn unknown_thread_id_fails_with_nexus_error() {
        let cache = test_cache(2, 2);
        let err = cache.queue_authentic(99, Region::new(0, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::UnableToGetCacheNexus { thread_id: 99 }));
    }

    #[test]
    fn acquiring_more_threads_than_the_governor_allows_fails() {
        let mut config = CacheConfig::default();
        config.thread_limit = 2;
        let config = Arc::new(config);
        let governor = Arc::new(ResourceGovernor::new(&config));
        let err = Cache::acquire(4, 4, StorageClass::Direct, ColorSpace::Rgb, 4, governor, config).unwrap_err();
        assert!(matches!(err, Error::CacheResourcesExhausted { resource: "thread", .. }));
    }
}
