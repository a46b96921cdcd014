//! Remote cache transport: an opt-in TCP mode that lets another process's
//! cache stand in for the local tier (spec.md §4.6).
//!
//! [`RemoteServer`] accepts connections and keeps one [`Cache`] per session,
//! keyed by the 64-bit session key negotiated at handshake. [`RemoteClient`]
//! is the matching caller-side session: connect, `open`, then any number of
//! `read_pixels`/`read_indexes`/`write_pixels`/`write_indexes`, `destroy` to
//! close. [`Local`] and [`Remote`] implement the shared [`PixelSource`]
//! capability trait so a descriptor-opening caller can pick either without
//! the rest of its code noticing which one it got — the seam spec.md's
//! design notes ask for in place of the original's function-pointer
//! `CacheMethods` table.
//!
//! The wire format is native byte order, same-host/same-architecture only
//! (spec.md §4.6); `twox_hash::XxHash64` derives the session key from
//! `shared-secret || nonce` the way the original hashes the concatenation.
//! Partial reads/writes need no extra retry loop here: the standard
//! library's `TcpStream` read/write already retry on `Interrupted`
//! internally, which is the EINTR-tolerance spec.md asks both sides for.

use std::collections::HashMap;
use std::hash::Hasher;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, warn};
use twox_hash::XxHash64;

use crate::config::CacheConfig;
use crate::descriptor::{Cache, ColorSpace, StorageClass, INDEX_CHANNELS_PER_PIXEL};
use crate::error::{Error, Result};
use crate::random::RandomState;
use crate::region::Region;
use crate::resource::ResourceGovernor;
use crate::tier::Mode;
use crate::{Quantum, CHANNELS_PER_PIXEL};

/// Wire-level opcodes and fixed-width headers (spec.md §4.6's opcode table).
pub mod protocol {
    /// `o`: open a cache for this session.
    pub const OP_OPEN: u8 = b'o';
    /// `r`: read a region's pixel plane.
    pub const OP_READ_PIXELS: u8 = b'r';
    /// `R`: read a region's index plane.
    pub const OP_READ_INDEXES: u8 = b'R';
    /// `w`: write a region's pixel plane.
    pub const OP_WRITE_PIXELS: u8 = b'w';
    /// `W`: write a region's index plane.
    pub const OP_WRITE_INDEXES: u8 = b'W';
    /// `d`: destroy the session's cache and close the connection.
    pub const OP_DESTROY: u8 = b'd';

    /// `open`'s header: image attributes, native byte order.
    #[derive(Debug, Clone, Copy)]
    pub struct OpenRequest {
        /// `0` = Direct, `1` = Pseudo.
        pub storage_class: u8,
        /// `0` = Rgb, `1` = Gray, `2` = Cmyk.
        pub colorspace: u8,
        /// Image width.
        pub columns: u32,
        /// Image height.
        pub rows: u32,
    }

    impl OpenRequest {
        /// Encoded size in bytes.
        pub const WIRE_LEN: usize = 1 + 1 + 4 + 4;

        /// Serializes to the wire layout.
        pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
            let mut buf = [0u8; Self::WIRE_LEN];
            buf[0] = self.storage_class;
            buf[1] = self.colorspace;
            buf[2..6].copy_from_slice(&self.columns.to_ne_bytes());
            buf[6..10].copy_from_slice(&self.rows.to_ne_bytes());
            buf
        }

        /// Parses a buffer of exactly [`Self::WIRE_LEN`] bytes.
        pub fn decode(buf: &[u8]) -> Self {
            Self {
                storage_class: buf[0],
                colorspace: buf[1],
                columns: u32::from_ne_bytes(buf[2..6].try_into().expect("4 bytes")),
                rows: u32::from_ne_bytes(buf[6..10].try_into().expect("4 bytes")),
            }
        }
    }

    /// `read`/`write`'s header: region plus payload length.
    #[derive(Debug, Clone, Copy)]
    pub struct RegionRequest {
        /// Region left edge.
        pub x: i64,
        /// Region top edge.
        pub y: i64,
        /// Region width.
        pub width: u32,
        /// Region height.
        pub height: u32,
        /// Payload length in bytes, following this header on `write`,
        /// following the response ack on `read`.
        pub length: u64,
    }

    impl RegionRequest {
        /// Encoded size in bytes.
        pub const WIRE_LEN: usize = 8 + 8 + 4 + 4 + 8;

        /// Serializes to the wire layout.
        pub fn encode(&self) -> [u8; Self::WIRE_LEN] {
            let mut buf = [0u8; Self::WIRE_LEN];
            buf[0..8].copy_from_slice(&self.x.to_ne_bytes());
            buf[8..16].copy_from_slice(&self.y.to_ne_bytes());
            buf[16..20].copy_from_slice(&self.width.to_ne_bytes());
            buf[20..24].copy_from_slice(&self.height.to_ne_bytes());
            buf[24..32].copy_from_slice(&self.length.to_ne_bytes());
            buf
        }

        /// Parses a buffer of exactly [`Self::WIRE_LEN`] bytes.
        pub fn decode(buf: &[u8]) -> Self {
            Self {
                x: i64::from_ne_bytes(buf[0..8].try_into().expect("8 bytes")),
                y: i64::from_ne_bytes(buf[8..16].try_into().expect("8 bytes")),
                width: u32::from_ne_bytes(buf[16..20].try_into().expect("4 bytes")),
                height: u32::from_ne_bytes(buf[20..24].try_into().expect("4 bytes")),
                length: u64::from_ne_bytes(buf[24..32].try_into().expect("8 bytes")),
            }
        }
    }
}

/// Derives the 64-bit session key from `shared-secret || nonce`, the way
/// both the server (after generating the nonce) and the client (after
/// receiving it) independently compute the same key.
fn session_key(shared_secret: &[u8], nonce: [u8; 8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(shared_secret);
    hasher.write(&nonce);
    hasher.finish()
}

fn quanta_to_bytes(quanta: &[Quantum]) -> Vec<u8> {
    let mut out = Vec::with_capacity(quanta.len() * std::mem::size_of::<Quantum>());
    for q in quanta {
        out.extend_from_slice(&q.to_ne_bytes());
    }
    out
}

fn bytes_to_quanta(bytes: &[u8]) -> Vec<Quantum> {
    bytes
        .chunks_exact(std::mem::size_of::<Quantum>())
        .map(|c| Quantum::from_ne_bytes(c.try_into().expect("2 bytes")))
        .collect()
}

/// Capability seam between a local descriptor and a remote session: the
/// small trait spec.md's design notes ask for in place of the original's
/// function-pointer `CacheMethods` dispatch table.
pub trait PixelSource {
    /// Reads a region's pixel plane.
    fn get_pixels(&mut self, region: Region) -> Result<Vec<Quantum>>;
    /// Reads a region's index plane (empty if the cache has none active).
    fn get_indexes(&mut self, region: Region) -> Result<Vec<Quantum>>;
    /// Writes and syncs a region's pixel plane.
    fn put_pixels(&mut self, region: Region, pixels: &[Quantum]) -> Result<()>;
    /// Writes and syncs a region's index plane.
    fn put_indexes(&mut self, region: Region, indexes: &[Quantum]) -> Result<()>;
}

/// A [`PixelSource`] backed by a cache living in this process.
pub struct Local(pub Cache);

impl PixelSource for Local {
    fn get_pixels(&mut self, region: Region) -> Result<Vec<Quantum>> {
        Ok(self.0.get_authentic(0, region)?.pixels().to_vec())
    }

    fn get_indexes(&mut self, region: Region) -> Result<Vec<Quantum>> {
        Ok(self.0.get_authentic(0, region)?.indexes().to_vec())
    }

    fn put_pixels(&mut self, region: Region, pixels: &[Quantum]) -> Result<()> {
        let mut access = self.0.queue_authentic(0, region)?;
        access.pixels_mut().copy_from_slice(pixels);
        access.sync()
    }

    fn put_indexes(&mut self, region: Region, indexes: &[Quantum]) -> Result<()> {
        let mut access = self.0.queue_authentic(0, region)?;
        access.indexes_mut().copy_from_slice(indexes);
        access.sync()
    }
}

/// A [`PixelSource`] backed by a session against a [`RemoteServer`].
pub struct Remote(pub RemoteClient);

impl PixelSource for Remote {
    fn get_pixels(&mut self, region: Region) -> Result<Vec<Quantum>> {
        self.0.read_pixels(region)
    }

    fn get_indexes(&mut self, region: Region) -> Result<Vec<Quantum>> {
        self.0.read_indexes(region)
    }

    fn put_pixels(&mut self, region: Region, pixels: &[Quantum]) -> Result<()> {
        self.0.write_pixels(region, pixels)?;
        Ok(())
    }

    fn put_indexes(&mut self, region: Region, indexes: &[Quantum]) -> Result<()> {
        self.0.write_indexes(region, indexes)?;
        Ok(())
    }
}

type Registry = Arc<Mutex<HashMap<u64, Cache>>>;

/// The server half: accepts connections, keeps a registry of open sessions
/// keyed by session key (a plain `HashMap` standing in for the original's
/// splay tree — see DESIGN.md), and tears a session down on `d` or on
/// connection loss.
pub struct RemoteServer {
    governor: Arc<ResourceGovernor>,
    config: Arc<CacheConfig>,
    registry: Registry,
}

impl RemoteServer {
    /// Builds a server sharing the given resource governor and config with
    /// every session it accepts.
    pub fn new(governor: Arc<ResourceGovernor>, config: Arc<CacheConfig>) -> Self {
        Self {
            governor,
            config,
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Accepts connections from `listener` until it errors, spawning one
    /// thread per session (mirroring `vfx-io`'s streaming pipeline's
    /// one-thread-per-overlapped-task style).
    pub fn serve(self, listener: TcpListener) -> Result<()> {
        for stream in listener.incoming() {
            let stream = stream?;
            let governor = Arc::clone(&self.governor);
            let config = Arc::clone(&self.config);
            let registry = Arc::clone(&self.registry);
            thread::spawn(move || {
                if let Err(err) = handle_connection(stream, governor, config, registry) {
                    warn!(error = %err, "remote cache session ended with an error");
                }
            });
        }
        Ok(())
    }

    /// Accepts and fully services exactly one connection on the calling
    /// thread. Used by tests and by single-client embeddings that don't
    /// want a background accept loop.
    pub fn serve_one(&self, listener: &TcpListener) -> Result<()> {
        let (stream, _) = listener.accept()?;
        handle_connection(
            stream,
            Arc::clone(&self.governor),
            Arc::clone(&self.config),
            Arc::clone(&self.registry),
        )
    }
}

fn handle_connection(
    mut stream: TcpStream,
    governor: Arc<ResourceGovernor>,
    config: Arc<CacheConfig>,
    registry: Registry,
) -> Result<()> {
    let shared_secret = config.shared_secret.clone().ok_or_else(|| {
        Error::NotAuthorized("remote cache mode requires a configured shared secret".into())
    })?;
    let random = RandomState::new();
    let nonce = random.nonce();
    stream.write_all(&nonce)?;
    let key = session_key(shared_secret.as_bytes(), nonce);

    loop {
        let mut opcode = [0u8; 1];
        match stream.read_exact(&mut opcode) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                registry.lock().expect("session registry mutex poisoned").remove(&key);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        let mut key_buf = [0u8; 8];
        stream.read_exact(&mut key_buf)?;
        if u64::from_ne_bytes(key_buf) != key {
            debug!("remote cache session key mismatch, closing connection");
            return Ok(());
        }

        match opcode[0] {
            protocol::OP_OPEN => handle_open(&mut stream, &governor, &config, &registry, key)?,
            protocol::OP_READ_PIXELS => handle_read(&mut stream, &registry, key, false)?,
            protocol::OP_READ_INDEXES => handle_read(&mut stream, &registry, key, true)?,
            protocol::OP_WRITE_PIXELS => handle_write(&mut stream, &registry, key, false)?,
            protocol::OP_WRITE_INDEXES => handle_write(&mut stream, &registry, key, true)?,
            protocol::OP_DESTROY => {
                registry.lock().expect("session registry mutex poisoned").remove(&key);
                stream.write_all(&[1u8])?;
                return Ok(());
            }
            other => {
                warn!(opcode = other, "unknown remote cache opcode, closing connection");
                return Ok(());
            }
        }
    }
}

fn handle_open(
    stream: &mut TcpStream,
    governor: &Arc<ResourceGovernor>,
    config: &Arc<CacheConfig>,
    registry: &Registry,
    key: u64,
) -> Result<()> {
    let mut buf = [0u8; protocol::OpenRequest::WIRE_LEN];
    stream.read_exact(&mut buf)?;
    let req = protocol::OpenRequest::decode(&buf);
    let storage_class = if req.storage_class == 1 {
        StorageClass::Pseudo
    } else {
        StorageClass::Direct
    };
    let colorspace = match req.colorspace {
        1 => ColorSpace::Gray,
        2 => ColorSpace::Cmyk,
        _ => ColorSpace::Rgb,
    };

    let opened = Cache::acquire(
        req.columns,
        req.rows,
        storage_class,
        colorspace,
        1,
        Arc::clone(governor),
        Arc::clone(config),
    )
    .and_then(|cache| {
        cache.open(Mode::ReadWrite)?;
        Ok(cache)
    });

    match opened {
        Ok(cache) => {
            registry.lock().expect("session registry mutex poisoned").insert(key, cache);
            stream.write_all(&[1u8])?;
        }
        Err(err) => {
            warn!(error = %err, "remote cache open failed");
            stream.write_all(&[0u8])?;
        }
    }
    Ok(())
}

fn session_cache(registry: &Registry, key: u64) -> Result<Cache> {
    registry
        .lock()
        .expect("session registry mutex poisoned")
        .get(&key)
        .cloned()
        .ok_or_else(|| Error::DistributedPixelCache("no open cache for this session".into()))
}

fn handle_read(stream: &mut TcpStream, registry: &Registry, key: u64, indexes: bool) -> Result<()> {
    let mut buf = [0u8; protocol::RegionRequest::WIRE_LEN];
    stream.read_exact(&mut buf)?;
    let req = protocol::RegionRequest::decode(&buf);
    let region = Region::new(req.x, req.y, req.width, req.height);
    let cache = session_cache(registry, key)?;

    let bytes = if indexes {
        if cache.active_index_channel() {
            quanta_to_bytes(&cache.get_authentic(0, region)?.indexes().to_vec())
        } else {
            vec![0u8; region.area() as usize * INDEX_CHANNELS_PER_PIXEL * std::mem::size_of::<Quantum>()]
        }
    } else {
        quanta_to_bytes(&cache.get_authentic(0, region)?.pixels().to_vec())
    };
    stream.write_all(&bytes)?;
    Ok(())
}

fn handle_write(stream: &mut TcpStream, registry: &Registry, key: u64, indexes: bool) -> Result<()> {
    let mut header = [0u8; protocol::RegionRequest::WIRE_LEN];
    stream.read_exact(&mut header)?;
    let req = protocol::RegionRequest::decode(&header);
    let mut payload = vec![0u8; req.length as usize];
    stream.read_exact(&mut payload)?;
    let region = Region::new(req.x, req.y, req.width, req.height);
    let cache = session_cache(registry, key)?;
    let quanta = bytes_to_quanta(&payload);

    let synced = {
        let mut access = cache.queue_authentic(0, region)?;
        if indexes {
            access.indexes_mut().copy_from_slice(&quanta);
        } else {
            access.pixels_mut().copy_from_slice(&quanta);
        }
        access.sync()
    };

    match synced {
        Ok(()) => stream.write_all(&[1u8])?,
        Err(err) => {
            warn!(error = %err, "remote cache write failed");
            stream.write_all(&[0u8])?;
        }
    }
    Ok(())
}

static NEXT_HOST: AtomicUsize = AtomicUsize::new(0);

/// The client half of one remote-cache session. Connects, negotiates the
/// session key, then issues any number of region ops before `destroy`.
pub struct RemoteClient {
    stream: TcpStream,
    session_key: u64,
}

impl RemoteClient {
    /// Connects to the next host in `config.cache_hosts` (round-robin),
    /// defaulting to `127.0.0.1:DEFAULT_PORT` when the list is empty, and
    /// completes the handshake.
    pub fn connect(config: &CacheConfig) -> Result<Self> {
        let hosts: Vec<(String, u16)> = if config.cache_hosts.is_empty() {
            vec![("127.0.0.1".to_string(), crate::config::DEFAULT_PORT)]
        } else {
            config.cache_hosts.clone()
        };
        let index = NEXT_HOST.fetch_add(1, Ordering::Relaxed) % hosts.len();
        let (host, port) = &hosts[index];
        Self::connect_to((host.as_str(), *port), config)
    }

    /// Connects to an explicit address, skipping host-list round-robin.
    /// Used by tests and by callers that already resolved a specific host.
    pub fn connect_to(addr: impl std::net::ToSocketAddrs, config: &CacheConfig) -> Result<Self> {
        let mut stream = TcpStream::connect(addr)
            .map_err(|e| Error::DistributedPixelCache(format!("connecting to remote cache failed: {e}")))?;
        let shared_secret = config.shared_secret.clone().ok_or_else(|| {
            Error::NotAuthorized("remote cache mode requires a configured shared secret".into())
        })?;
        let mut nonce = [0u8; 8];
        stream.read_exact(&mut nonce)?;
        let session_key = session_key(shared_secret.as_bytes(), nonce);
        Ok(Self { stream, session_key })
    }

    fn send_header(&mut self, opcode: u8) -> Result<()> {
        self.stream.write_all(&[opcode])?;
        self.stream.write_all(&self.session_key.to_ne_bytes())?;
        Ok(())
    }

    /// `o`: opens a cache on the server with the given attributes. Returns
    /// whether the server accepted it.
    pub fn open(&mut self, storage_class: StorageClass, colorspace: ColorSpace, columns: u32, rows: u32) -> Result<bool> {
        self.send_header(protocol::OP_OPEN)?;
        let req = protocol::OpenRequest {
            storage_class: u8::from(storage_class == StorageClass::Pseudo),
            colorspace: match colorspace {
                ColorSpace::Rgb => 0,
                ColorSpace::Gray => 1,
                ColorSpace::Cmyk => 2,
            },
            columns,
            rows,
        };
        self.stream.write_all(&req.encode())?;
        let mut ack = [0u8; 1];
        self.stream.read_exact(&mut ack)?;
        Ok(ack[0] == 1)
    }

    /// `r`: reads a region's pixel plane.
    pub fn read_pixels(&mut self, region: Region) -> Result<Vec<Quantum>> {
        self.read_plane(protocol::OP_READ_PIXELS, region, CHANNELS_PER_PIXEL)
    }

    /// `R`: reads a region's index plane.
    pub fn read_indexes(&mut self, region: Region) -> Result<Vec<Quantum>> {
        self.read_plane(protocol::OP_READ_INDEXES, region, INDEX_CHANNELS_PER_PIXEL)
    }

    fn read_plane(&mut self, opcode: u8, region: Region, channels: usize) -> Result<Vec<Quantum>> {
        self.send_header(opcode)?;
        let length = region.area() * channels as u64 * std::mem::size_of::<Quantum>() as u64;
        let req = protocol::RegionRequest {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            length,
        };
        self.stream.write_all(&req.encode())?;
        let mut buf = vec![0u8; length as usize];
        self.stream.read_exact(&mut buf)?;
        Ok(bytes_to_quanta(&buf))
    }

    /// `w`: writes and syncs a region's pixel plane. Returns whether the
    /// server synced successfully.
    pub fn write_pixels(&mut self, region: Region, pixels: &[Quantum]) -> Result<bool> {
        self.write_plane(protocol::OP_WRITE_PIXELS, region, pixels)
    }

    /// `W`: writes and syncs a region's index plane.
    pub fn write_indexes(&mut self, region: Region, indexes: &[Quantum]) -> Result<bool> {
        self.write_plane(protocol::OP_WRITE_INDEXES, region, indexes)
    }

    fn write_plane(&mut self, opcode: u8, region: Region, samples: &[Quantum]) -> Result<bool> {
        self.send_header(opcode)?;
        let bytes = quanta_to_bytes(samples);
        let req = protocol::RegionRequest {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            length: bytes.len() as u64,
        };
        self.stream.write_all(&req.encode())?;
        self.stream.write_all(&bytes)?;
        let mut ack = [0u8; 1];
        self.stream.read_exact(&mut ack)?;
        Ok(ack[0] == 1)
    }

    /// `d`: destroys the server-side cache and ends the session.
    pub fn destroy(mut self) -> Result<bool> {
        self.send_header(protocol::OP_DESTROY)?;
        let mut ack = [0u8; 1];
        self.stream.read_exact(&mut ack)?;
        Ok(ack[0] == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceGovernor;

    fn test_config() -> Arc<CacheConfig> {
        Arc::new(CacheConfig {
            shared_secret: Some("s3cr3t".to_string()),
            ..CacheConfig::default()
        })
    }

    #[test]
    fn session_key_is_deterministic_given_shared_secret_and_nonce() {
        let a = session_key(b"s3cr3t", [1, 2, 3, 4, 5, 6, 7, 8]);
        let b = session_key(b"s3cr3t", [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(a, b);
        let c = session_key(b"different", [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_ne!(a, c);
    }

    #[test]
    fn open_request_round_trips_through_the_wire_layout() {
        let req = protocol::OpenRequest {
            storage_class: 1,
            colorspace: 2,
            columns: 640,
            rows: 480,
        };
        let decoded = protocol::OpenRequest::decode(&req.encode());
        assert_eq!(decoded.storage_class, 1);
        assert_eq!(decoded.colorspace, 2);
        assert_eq!(decoded.columns, 640);
        assert_eq!(decoded.rows, 480);
    }

    #[test]
    fn region_request_round_trips_through_the_wire_layout() {
        let req = protocol::RegionRequest {
            x: -5,
            y: 7,
            width: 16,
            height: 9,
            length: 576,
        };
        let decoded = protocol::RegionRequest::decode(&req.encode());
        assert_eq!(decoded.x, -5);
        assert_eq!(decoded.y, 7);
        assert_eq!(decoded.width, 16);
        assert_eq!(decoded.height, 9);
        assert_eq!(decoded.length, 576);
    }

    #[test]
    fn open_write_read_destroy_round_trip_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let config = test_config();
        let governor = Arc::new(ResourceGovernor::new(&config));
        let server = RemoteServer::new(governor, Arc::clone(&config));

        let server_thread = thread::spawn(move || server.serve_one(&listener));

        let mut client = RemoteClient::connect_to(addr, &config).expect("client connect");
        assert!(client
            .open(StorageClass::Direct, ColorSpace::Rgb, 4, 4)
            .expect("open request"));

        let region = Region::new(0, 0, 4, 1);
        let pixels = vec![100, 200, 300, 400, 1, 2, 3, 4, 0, 0, 0, 0, 9, 9, 9, 9];
        assert!(client.write_pixels(region, &pixels).expect("write request"));

        let read_back = client.read_pixels(region).expect("read request");
        assert_eq!(read_back, pixels);

        assert!(client.destroy().expect("destroy request"));
        server_thread.join().expect("server thread").expect("server session");
    }

    #[test]
    fn wrong_session_key_is_rejected_without_a_response() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let config = test_config();
        let governor = Arc::new(ResourceGovernor::new(&config));
        let server = RemoteServer::new(governor, Arc::clone(&config));
        let server_thread = thread::spawn(move || server.serve_one(&listener));

        let mut stream = TcpStream::connect(addr).expect("connect");
        let mut nonce = [0u8; 8];
        stream.read_exact(&mut nonce).expect("read nonce");

        stream.write_all(&[protocol::OP_OPEN]).expect("opcode");
        stream.write_all(&0xDEAD_BEEFu64.to_ne_bytes()).expect("bad key");

        // The server closes the connection without a response; reading the
        // next byte should observe EOF, not the ack `handle_open` would send.
        let mut buf = [0u8; 1];
        let n = stream.read(&mut buf).unwrap_or(0);
        assert_eq!(n, 0);

        server_thread.join().expect("server thread").expect("server session");
    }
}
