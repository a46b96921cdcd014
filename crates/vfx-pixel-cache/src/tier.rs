//! Storage tier: allocation, extension, and positional I/O for the bytes
//! backing a cache descriptor.
//!
//! Four backings, in the order `open` tries them (spec.md §4.1): `Ping`
//! (metadata only), `Memory` (heap, falling back to an anonymous map),
//! `Map` (file-backed map), `Disk` (a plain file, accessed positionally).
//! `Undefined` is the transitional state before the first open and after
//! close.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::{MmapMut, MmapOptions};

use crate::error::{Error, Result};
use crate::random::RandomState;
use crate::resource::{self, Resource, ResourceGovernor, ResourceGuard};
use crate::tempfile_registry;
use crate::Quantum;

/// Which backing currently services a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// No bytes allocated; the descriptor is metadata-only (a "ping" image).
    Ping,
    /// Heap-allocated or anonymously-mapped bytes.
    Memory,
    /// A file-backed memory map.
    Map,
    /// A plain disk file, accessed with positional reads/writes.
    Disk,
    /// Transitional: before first open, or after close.
    Undefined,
}

enum MemoryBacking {
    Heap(Vec<u8>),
    Anon(MmapMut),
}

impl MemoryBacking {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Heap(v) => v,
            Self::Anon(m) => m,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Self::Heap(v) => v,
            Self::Anon(m) => m,
        }
    }
}

/// Read/write mode a tier was opened in, mirroring spec.md §3's `Mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Backing opened read-only.
    Read,
    /// Backing opened write-only (rare; write paths still allow reads in this crate).
    Write,
    /// Default: both directions permitted.
    ReadWrite,
}

/// The byte-addressed backing for one cache descriptor.
pub struct StorageTier {
    kind: TierKind,
    length: u64,
    mode: Mode,
    memory: Option<MemoryBacking>,
    map: Option<MmapMut>,
    file: Option<File>,
    path: Option<PathBuf>,
    /// Byte offset into `file` the backing starts at — nonzero only for a
    /// tier attached via [`StorageTier::attach`] (`persist_pixel_cache`).
    disk_offset: u64,
    governor: Arc<ResourceGovernor>,
    area_guard: Option<ResourceGuard>,
    tier_guard: Option<ResourceGuard>,
    file_guard: Option<ResourceGuard>,
}

impl std::fmt::Debug for StorageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageTier")
            .field("kind", &self.kind)
            .field("length", &self.length)
            .field("mode", &self.mode)
            .field("path", &self.path)
            .finish()
    }
}

impl StorageTier {
    /// Builds the `Undefined` tier a freshly-acquired descriptor starts in.
    pub fn undefined(governor: Arc<ResourceGovernor>) -> Self {
        Self {
            kind: TierKind::Undefined,
            length: 0,
            mode: Mode::ReadWrite,
            memory: None,
            map: None,
            file: None,
            path: None,
            disk_offset: 0,
            governor,
            area_guard: None,
            tier_guard: None,
            file_guard: None,
        }
    }

    /// The tier currently backing this descriptor.
    pub fn kind(&self) -> TierKind {
        self.kind
    }

    /// Total backing length in bytes.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Opens a `Ping` tier: reserves no bytes, used for metadata-only images.
    pub fn open_ping(&mut self) {
        self.close();
        self.kind = TierKind::Ping;
    }

    /// Opens a backing of `length` bytes, trying Memory, then Map, then Disk
    /// in the order spec.md §4.1 describes. `label` is the descriptor's
    /// filename/name, used only for error messages.
    pub fn open(
        &mut self,
        length: u64,
        mode: Mode,
        temp_dir: &Path,
        random: &RandomState,
        label: &str,
    ) -> Result<()> {
        self.close();

        let area_guard = self
            .governor
            .acquire(Resource::Area, length)
            .ok_or_else(|| resource::exhausted(Resource::Area, label))?;

        if let Some(memory_guard) = self.governor.acquire(Resource::Memory, length) {
            if let Some(backing) = allocate_heap(length) {
                self.kind = TierKind::Memory;
                self.length = length;
                self.mode = mode;
                self.memory = Some(backing);
                self.area_guard = Some(area_guard);
                self.tier_guard = Some(memory_guard);
                return Ok(());
            }
            if let Ok(anon) = MmapOptions::new().len(length.max(1) as usize).map_anon() {
                self.kind = TierKind::Memory;
                self.length = length;
                self.mode = mode;
                self.memory = Some(MemoryBacking::Anon(anon));
                self.area_guard = Some(area_guard);
                self.tier_guard = Some(memory_guard);
                return Ok(());
            }
            // memory_guard drops here, releasing the reservation before falling through.
        }

        let disk_guard = self
            .governor
            .acquire(Resource::Disk, length)
            .ok_or_else(|| resource::exhausted(Resource::Disk, label))?;

        let (file, path) = tempfile_registry::create(temp_dir, random)?;
        extend_file(&file, length, &path)?;

        if let Some(map_guard) = self.governor.acquire(Resource::Map, length) {
            match unsafe { MmapOptions::new().len(length.max(1) as usize).map_mut(&file) } {
                Ok(mapped) => {
                    self.kind = TierKind::Map;
                    self.length = length;
                    self.mode = mode;
                    self.map = Some(mapped);
                    self.path = Some(path);
                    self.area_guard = Some(area_guard);
                    self.tier_guard = Some(map_guard);
                    disk_guard.release();
                    return Ok(());
                }
                Err(_) => {
                    // map_guard drops here; fall through to the Disk tier.
                }
            }
        }

        self.kind = TierKind::Disk;
        self.length = length;
        self.mode = mode;
        self.file = Some(file);
        self.path = Some(path);
        self.disk_offset = 0;
        self.area_guard = Some(area_guard);
        self.tier_guard = Some(disk_guard);
        self.track_fd_open();
        Ok(())
    }

    /// `persist_pixel_cache`: attaches this tier to a pre-existing file at
    /// `path`, reading/writing at `offset` for `length` bytes. Tries `Map`
    /// first, falling back to `Disk` positional I/O, the same fallback the
    /// fresh-file `open` path uses.
    pub fn attach(&mut self, path: &Path, offset: u64, length: u64, mode: Mode) -> Result<()> {
        self.close();
        let area_guard = self
            .governor
            .acquire(Resource::Area, length)
            .ok_or_else(|| resource::exhausted(Resource::Area, path.to_string_lossy().as_ref()))?;

        let mut open_opts = std::fs::OpenOptions::new();
        open_opts.read(true).write(mode != Mode::Read);
        let file = open_opts
            .open(path)
            .map_err(|source| Error::UnableToOpenPixelCache { path: path.to_path_buf(), source })?;

        if let Some(map_guard) = self.governor.acquire(Resource::Map, length) {
            let mapped = unsafe {
                MmapOptions::new()
                    .offset(offset)
                    .len(length.max(1) as usize)
                    .map_mut(&file)
            };
            if let Ok(mapped) = mapped {
                self.kind = TierKind::Map;
                self.length = length;
                self.mode = mode;
                self.map = Some(mapped);
                self.path = Some(path.to_path_buf());
                self.disk_offset = offset;
                self.area_guard = Some(area_guard);
                self.tier_guard = Some(map_guard);
                return Ok(());
            }
        }

        let disk_guard = self
            .governor
            .acquire(Resource::Disk, length)
            .ok_or_else(|| resource::exhausted(Resource::Disk, path.to_string_lossy().as_ref()))?;
        self.kind = TierKind::Disk;
        self.length = length;
        self.mode = mode;
        self.file = Some(file);
        self.path = Some(path.to_path_buf());
        self.disk_offset = offset;
        self.area_guard = Some(area_guard);
        self.tier_guard = Some(disk_guard);
        self.track_fd_open();
        Ok(())
    }

    /// Acquires (opportunistically — denial is not fatal, it just means the
    /// guard isn't tracked) the `File` resource for the currently-open Disk
    /// fd, and immediately releases the fd again if that pushes usage over
    /// the configured ceiling (spec.md property 8).
    fn track_fd_open(&mut self) {
        self.file_guard = self.governor.acquire(Resource::File, 1);
        if self.governor.is_over_limit(Resource::File) {
            self.release_disk_fd();
        }
    }

    /// Extends a Disk-tier file to at least `length` bytes; no-op for other tiers.
    pub fn extend(&mut self, length: u64) -> Result<()> {
        if self.kind != TierKind::Disk {
            return Ok(());
        }
        let file = self.file.as_ref().expect("disk tier without a file");
        let path = self.path.clone().unwrap_or_default();
        extend_file(file, length, &path)?;
        if length > self.length {
            self.length = length;
        }
        Ok(())
    }

    /// Reads `buf.len()` bytes starting at `offset`. Lazily reopens a
    /// fd-released Disk tier, and opportunistically releases the fd again
    /// afterward if the file resource is over its ceiling.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        match self.kind {
            TierKind::Memory => {
                let mem = self.memory.as_ref().expect("memory tier without backing");
                copy_from_slice_at(mem.as_slice(), offset, buf)
            }
            TierKind::Map => {
                let map = self.map.as_ref().expect("map tier without mapping");
                copy_from_slice_at(map, offset, buf)
            }
            TierKind::Disk => {
                self.reopen_disk_fd()?;
                let file = self.file.as_ref().expect("disk tier without a file");
                let result = file.read_exact_at(buf, offset + self.disk_offset).map_err(|source| {
                    Error::UnableToReadPixelCache {
                        path: self.path.clone().unwrap_or_default(),
                        source,
                    }
                });
                if self.governor.is_over_limit(Resource::File) {
                    self.release_disk_fd();
                }
                result
            }
            TierKind::Ping | TierKind::Undefined => {
                Err(Error::NoPixelsDefinedInCache { path: String::new() })
            }
        }
    }

    /// Writes `buf` starting at `offset`. Same fd lazy-reopen/opportunistic
    /// release behaviour as [`StorageTier::read_at`].
    pub fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        match self.kind {
            TierKind::Memory => {
                let mem = self.memory.as_mut().expect("memory tier without backing");
                copy_into_slice_at(mem.as_mut_slice(), offset, buf)
            }
            TierKind::Map => {
                let map = self.map.as_mut().expect("map tier without mapping");
                copy_into_slice_at(map, offset, buf)
            }
            TierKind::Disk => {
                self.reopen_disk_fd()?;
                let file = self.file.as_ref().expect("disk tier without a file");
                let result = file.write_all_at(buf, offset + self.disk_offset).map_err(|source| {
                    Error::UnableToWritePixelCache {
                        path: self.path.clone().unwrap_or_default(),
                        source,
                    }
                });
                if self.governor.is_over_limit(Resource::File) {
                    self.release_disk_fd();
                }
                result
            }
            TierKind::Ping | TierKind::Undefined => {
                Err(Error::NoPixelsDefinedInCache { path: String::new() })
            }
        }
    }

    /// Gives a direct, zero-copy `Quantum` view into the backing, when one
    /// exists (`Memory` and `Map` tiers only — `Disk` has no addressable
    /// memory and `get_authentic`'s shortcut never attempts this for it).
    ///
    /// The reinterpretation from bytes to `Quantum` (`u16`) is safe here:
    /// heap `Vec<u8>` allocations and `mmap` regions are both aligned far
    /// more strictly than `u16` requires, and every length this crate opens
    /// a tier with is an exact multiple of `size_of::<Quantum>()`.
    pub fn quantum_view(&self) -> Option<&[Quantum]> {
        match self.kind {
            TierKind::Memory => self.memory.as_ref().map(|m| bytes_as_quantum(m.as_slice())),
            TierKind::Map => self.map.as_deref().map(bytes_as_quantum),
            TierKind::Disk | TierKind::Ping | TierKind::Undefined => None,
        }
    }

    /// Mutable counterpart of [`StorageTier::quantum_view`].
    pub fn quantum_view_mut(&mut self) -> Option<&mut [Quantum]> {
        match self.kind {
            TierKind::Memory => self.memory.as_mut().map(|m| bytes_as_quantum_mut(m.as_mut_slice())),
            TierKind::Map => self.map.as_deref_mut().map(bytes_as_quantum_mut),
            TierKind::Disk | TierKind::Ping | TierKind::Undefined => None,
        }
    }

    /// The raw base pointer of the `Memory`/`Map` backing, reinterpreted as
    /// `Quantum`s. Used only by [`crate::descriptor::Cache`]'s
    /// authentic-access shortcut, which derives offset pointers from it
    /// under its own documented safety contract.
    pub fn quantum_base_ptr(&self) -> Option<*mut Quantum> {
        match self.kind {
            TierKind::Memory => self.memory.as_ref().map(|m| m.as_slice().as_ptr() as *mut Quantum),
            TierKind::Map => self.map.as_deref().map(|s| s.as_ptr() as *mut Quantum),
            TierKind::Disk | TierKind::Ping | TierKind::Undefined => None,
        }
    }

    /// Reads `buf.len()` quanta starting at quantum index `offset`, working
    /// across every tier (Disk goes through positional byte I/O).
    pub fn read_quanta_at(&mut self, offset: u64, buf: &mut [Quantum]) -> Result<()> {
        if let Some(view) = self.quantum_view() {
            let start = offset as usize;
            let end = start + buf.len();
            buf.copy_from_slice(&view[start..end]);
            return Ok(());
        }
        let mut bytes = vec![0u8; buf.len() * std::mem::size_of::<Quantum>()];
        self.read_at(offset * std::mem::size_of::<Quantum>() as u64, &mut bytes)?;
        for (dst, chunk) in buf.iter_mut().zip(bytes.chunks_exact(std::mem::size_of::<Quantum>())) {
            *dst = Quantum::from_ne_bytes(chunk.try_into().expect("chunk is exactly size_of::<Quantum>()"));
        }
        Ok(())
    }

    /// Writes `buf` starting at quantum index `offset`.
    pub fn write_quanta_at(&mut self, offset: u64, buf: &[Quantum]) -> Result<()> {
        if let Some(view) = self.quantum_view_mut() {
            let start = offset as usize;
            let end = start + buf.len();
            view[start..end].copy_from_slice(buf);
            return Ok(());
        }
        let mut bytes = Vec::with_capacity(buf.len() * std::mem::size_of::<Quantum>());
        for q in buf {
            bytes.extend_from_slice(&q.to_ne_bytes());
        }
        self.write_at(offset * std::mem::size_of::<Quantum>() as u64, &bytes)
    }

    /// Closes the current tier: unmaps/frees memory, and for Map/Disk tiers
    /// opened in a non-`Read` mode, deletes the temporary file. Resets to
    /// `Undefined`.
    pub fn close(&mut self) {
        if let Some(path) = self.path.take() {
            self.file = None;
            self.map = None;
            if self.mode != Mode::Read && matches!(self.kind, TierKind::Map | TierKind::Disk) {
                tempfile_registry::remove(&path);
            }
        }
        self.memory = None;
        self.area_guard = None;
        self.tier_guard = None;
        self.file_guard = None;
        self.disk_offset = 0;
        self.length = 0;
        self.kind = TierKind::Undefined;
    }

    /// Closes the Disk tier's file descriptor without deleting the backing
    /// file, to be reopened lazily on next access. Used by the
    /// file-descriptor guard (spec.md property 8) when the file resource
    /// usage exceeds its configured ceiling.
    pub fn release_disk_fd(&mut self) {
        if self.kind == TierKind::Disk {
            self.file = None;
            self.file_guard = None;
        }
    }

    /// Reopens a previously fd-released Disk tier's file for positional I/O.
    pub fn reopen_disk_fd(&mut self) -> Result<()> {
        if self.kind != TierKind::Disk || self.file.is_some() {
            return Ok(());
        }
        let path = self.path.clone().ok_or_else(|| Error::NoPixelsDefinedInCache {
            path: String::new(),
        })?;
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| Error::UnableToOpenPixelCache { path: path.clone(), source })?;
        self.file = Some(file);
        self.file_guard = self.governor.acquire(Resource::File, 1);
        Ok(())
    }
}

impl Drop for StorageTier {
    fn drop(&mut self) {
        self.close();
    }
}

fn bytes_as_quantum(bytes: &[u8]) -> &[Quantum] {
    debug_assert_eq!(bytes.len() % std::mem::size_of::<Quantum>(), 0);
    // SAFETY: see the doc comment on `StorageTier::quantum_view`.
    unsafe {
        std::slice::from_raw_parts(
            bytes.as_ptr().cast::<Quantum>(),
            bytes.len() / std::mem::size_of::<Quantum>(),
        )
    }
}

fn bytes_as_quantum_mut(bytes: &mut [u8]) -> &mut [Quantum] {
    debug_assert_eq!(bytes.len() % std::mem::size_of::<Quantum>(), 0);
    // SAFETY: see the doc comment on `StorageTier::quantum_view`.
    unsafe {
        std::slice::from_raw_parts_mut(
            bytes.as_mut_ptr().cast::<Quantum>(),
            bytes.len() / std::mem::size_of::<Quantum>(),
        )
    }
}

fn allocate_heap(length: u64) -> Option<MemoryBacking> {
    let len = usize::try_from(length).ok()?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).ok()?;
    buf.resize(len, 0);
    Some(MemoryBacking::Heap(buf))
}

/// Extends `file` to `length` bytes: `posix_fallocate` when available, a
/// single-byte write at `length - 1` otherwise. No-op if already long enough.
fn extend_file(file: &File, length: u64, path: &Path) -> Result<()> {
    let current = file
        .metadata()
        .map_err(|source| Error::UnableToExtendCache { path: path.to_path_buf(), length, source })?
        .len();
    if current >= length || length == 0 {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        let rc = unsafe { libc::posix_fallocate(file.as_raw_fd(), 0, length as libc::off_t) };
        if rc == 0 {
            return Ok(());
        }
    }
    let mut f = file.try_clone().map_err(|source| Error::UnableToExtendCache {
        path: path.to_path_buf(),
        length,
        source,
    })?;
    f.seek(SeekFrom::Start(length - 1))
        .and_then(|_| f.write_all(&[0u8]))
        .map_err(|source| Error::UnableToExtendCache { path: path.to_path_buf(), length, source })
}

fn copy_from_slice_at(src: &[u8], offset: u64, buf: &mut [u8]) -> Result<()> {
    let start = usize::try_from(offset).map_err(|_| Error::NoPixelsDefinedInCache { path: String::new() })?;
    let end = start
        .checked_add(buf.len())
        .filter(|&e| e <= src.len())
        .ok_or_else(|| Error::NoPixelsDefinedInCache { path: String::new() })?;
    buf.copy_from_slice(&src[start..end]);
    Ok(())
}

fn copy_into_slice_at(dst: &mut [u8], offset: u64, buf: &[u8]) -> Result<()> {
    let start = usize::try_from(offset).map_err(|_| Error::NoPixelsDefinedInCache { path: String::new() })?;
    let end = start
        .checked_add(buf.len())
        .filter(|&e| e <= dst.len())
        .ok_or_else(|| Error::NoPixelsDefinedInCache { path: String::new() })?;
    dst[start..end].copy_from_slice(buf);
    Ok(())
}

/// Returns the OS page size, used by `persist_pixel_cache`'s offset
/// bookkeeping. Falls back to 4096 on platforms without `sysconf`.
pub fn page_size() -> u64 {
    #[cfg(unix)]
    {
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            return size as u64;
        }
    }
    4096
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn new_governor(config: &CacheConfig) -> Arc<ResourceGovernor> {
        Arc::new(ResourceGovernor::new(config))
    }

    #[test]
    fn opens_memory_tier_when_admitted() {
        let config = CacheConfig::default();
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(4096, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        assert_eq!(tier.kind(), TierKind::Memory);
        assert_eq!(tier.length(), 4096);
    }

    #[test]
    fn falls_back_to_disk_when_memory_and_map_are_zero() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(4096, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        assert_eq!(tier.kind(), TierKind::Disk);
    }

    #[test]
    fn round_trips_bytes_on_memory_tier() {
        let config = CacheConfig::default();
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(64, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        tier.write_at(0, &[1, 2, 3, 4]).unwrap();
        let mut out = [0u8; 4];
        tier.read_at(0, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn round_trips_bytes_on_disk_tier() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(64, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        tier.write_at(10, &[9, 8, 7]).unwrap();
        let mut out = [0u8; 3];
        tier.read_at(10, &mut out).unwrap();
        assert_eq!(out, [9, 8, 7]);
    }

    #[test]
    fn close_deletes_the_temp_file_in_readwrite_mode() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(64, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        let path = tier.path.clone().unwrap();
        assert!(path.exists());
        tier.close();
        assert!(!path.exists());
        assert_eq!(tier.kind(), TierKind::Undefined);
    }

    #[test]
    fn quantum_view_round_trips_on_memory_tier() {
        let config = CacheConfig::default();
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(16, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        assert!(tier.quantum_view().is_some());
        tier.write_quanta_at(0, &[100, 200, 300, 400]).unwrap();
        let mut out = [0u16; 4];
        tier.read_quanta_at(0, &mut out).unwrap();
        assert_eq!(out, [100, 200, 300, 400]);
    }

    #[test]
    fn disk_tier_has_no_quantum_view_but_still_round_trips() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(16, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        assert!(tier.quantum_view().is_none());
        tier.write_quanta_at(0, &[100, 200, 300, 400]).unwrap();
        let mut out = [0u16; 4];
        tier.read_quanta_at(0, &mut out).unwrap();
        assert_eq!(out, [100, 200, 300, 400]);
    }

    #[test]
    fn over_limit_file_resource_closes_and_reopens_the_fd() {
        let mut config = CacheConfig::default();
        config.memory_limit = 0;
        config.map_limit = 0;
        config.file_limit = 0;
        let gov = new_governor(&config);
        let mut tier = StorageTier::undefined(gov);
        let random = RandomState::new();
        tier.open(16, Mode::ReadWrite, &std::env::temp_dir(), &random, "t")
            .unwrap();
        assert!(tier.file.is_none(), "fd should be released immediately under a zero file limit");
        tier.write_at(0, &[1, 2, 3]).unwrap();
        let mut out = [0u8; 3];
        tier.read_at(0, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn attach_reads_back_a_persisted_region() {
        let config = CacheConfig::default();
        let gov = new_governor(&config);
        let dir = std::env::temp_dir();
        let random = RandomState::new();
        let (file, path) = tempfile_registry::create(&dir, &random).unwrap();
        extend_file(&file, 4096, &path).unwrap();
        drop(file);

        let mut tier = StorageTier::undefined(Arc::clone(&gov));
        tier.attach(&path, 0, 64, Mode::ReadWrite).unwrap();
        tier.write_at(0, &[7, 7, 7, 7]).unwrap();
        tier.close();

        let mut tier2 = StorageTier::undefined(gov);
        tier2.attach(&path, 0, 64, Mode::ReadWrite).unwrap();
        let mut out = [0u8; 4];
        tier2.read_at(0, &mut out).unwrap();
        assert_eq!(out, [7, 7, 7, 7]);
        tier2.close();
        let _ = std::fs::remove_file(&path);
    }
}
