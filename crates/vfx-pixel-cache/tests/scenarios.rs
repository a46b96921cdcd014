//! End-to-end scenarios spanning tier fallback, cross-tier cloning,
//! concurrent disjoint-stripe access, and the remote transport. The
//! single-module unit tests cover the simpler scenarios (Edge/Mirror
//! virtual-pixel sampling, Pseudo index round-trip) alongside the code they
//! exercise; the ones here need a whole descriptor (and, for the last one,
//! a real TCP loopback connection) to set up.

use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

use vfx_pixel_cache::config::CacheConfig;
use vfx_pixel_cache::descriptor::{ColorSpace, StorageClass};
use vfx_pixel_cache::remote::{RemoteClient, RemoteServer};
use vfx_pixel_cache::resource::ResourceGovernor;
use vfx_pixel_cache::tier::TierKind;
use vfx_pixel_cache::{Cache, Mode, Region, CHANNELS_PER_PIXEL};

fn cache_with_config(columns: u32, rows: u32, threads: usize, config: CacheConfig) -> Cache {
    let config = Arc::new(config);
    let governor = Arc::new(ResourceGovernor::new(&config));
    let cache = Cache::acquire(columns, rows, StorageClass::Direct, ColorSpace::Rgb, threads, governor, config).unwrap();
    cache.open(Mode::ReadWrite).unwrap();
    cache
}

/// S3: a 1000x1000 cache forced to the Disk tier, cloned into a Memory
/// cache of the same size; pixel planes compare equal.
#[test]
fn disk_to_memory_clone_is_byte_exact() {
    let mut disk_config = CacheConfig::default();
    disk_config.memory_limit = 0;
    disk_config.map_limit = 0;
    let src = cache_with_config(1000, 1000, 1, disk_config);
    assert_eq!(src.tier_kind(), TierKind::Disk);

    {
        let mut access = src.queue_authentic(0, Region::new(0, 0, 1000, 1000)).unwrap();
        for (i, px) in access.pixels_mut().chunks_exact_mut(CHANNELS_PER_PIXEL).enumerate() {
            let v = (i % 65536) as u16;
            px.copy_from_slice(&[v, v.wrapping_add(1), v.wrapping_add(2), v.wrapping_add(3)]);
        }
        access.sync().unwrap();
    }

    let dst = cache_with_config(1000, 1000, 1, CacheConfig::default());
    assert_eq!(dst.tier_kind(), TierKind::Memory);
    Cache::clone_pixels(&dst, &src).unwrap();

    let expected = src.get_authentic(0, Region::new(0, 0, 1000, 1000)).unwrap();
    let actual = dst.get_authentic(0, Region::new(0, 0, 1000, 1000)).unwrap();
    assert_eq!(expected.pixels(), actual.pixels());
}

/// S4: 8 threads each own a disjoint 1024x8 horizontal stripe of a shared
/// cache and run 1024 iterations of get_authentic + mutate + sync_authentic
/// with no locking between them; the final image matches the expected
/// composite and no stripe bleeds into another.
#[test]
fn concurrent_disjoint_stripes_see_no_torn_pixels() {
    const THREADS: usize = 8;
    const WIDTH: u32 = 1024;
    const ITERATIONS: u16 = 1024;

    let cache = Arc::new(cache_with_config(WIDTH, THREADS as u32, THREADS, CacheConfig::default()));
    assert_eq!(cache.tier_kind(), TierKind::Memory);

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let region = Region::new(0, thread_id as i64, WIDTH, 1);
                for iteration in 0..ITERATIONS {
                    let value = iteration.wrapping_add(thread_id as u16);
                    {
                        let mut access = cache.queue_authentic(thread_id, region).unwrap();
                        access.pixels_mut().fill(value);
                        access.sync().unwrap();
                    }
                    let access = cache.get_authentic(thread_id, region).unwrap();
                    assert!(
                        access.pixels().iter().all(|&q| q == value),
                        "thread {thread_id} observed a torn pixel at iteration {iteration}"
                    );
                }
                value_of_last(ITERATIONS, thread_id)
            })
        })
        .collect();

    let expected: Vec<u16> = (0..THREADS).map(|t| value_of_last(ITERATIONS, t)).collect();
    for (thread_id, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), expected[thread_id]);
    }

    for thread_id in 0..THREADS {
        let region = Region::new(0, thread_id as i64, WIDTH, 1);
        let access = cache.get_authentic(0, region).unwrap();
        assert!(access.pixels().iter().all(|&q| q == expected[thread_id]));
    }
}

fn value_of_last(iterations: u16, thread_id: usize) -> u16 {
    (iterations - 1).wrapping_add(thread_id as u16)
}

/// S6: remote open of a 100x100 Direct cache over loopback, a `read-pixels`
/// on a subregion, a `write-pixels` of the inverted bytes at the same
/// region, then a `read-pixels` back confirming the inversion landed.
#[test]
fn remote_round_trip_write_is_the_inverse_of_the_original_read() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let config = Arc::new(CacheConfig {
        shared_secret: Some("loopback-secret".to_string()),
        ..CacheConfig::default()
    });
    let governor = Arc::new(ResourceGovernor::new(&config));
    let server = RemoteServer::new(governor, Arc::clone(&config));
    let server_thread = thread::spawn(move || server.serve_one(&listener));

    let mut client = RemoteClient::connect_to(addr, &config).unwrap();
    assert!(client.open(StorageClass::Direct, ColorSpace::Rgb, 100, 100).unwrap());

    let region = Region::new(10, 10, 20, 20);
    let original = client.read_pixels(region).unwrap();
    assert_eq!(original.len(), 20 * 20 * CHANNELS_PER_PIXEL);

    let inverted: Vec<u16> = original.iter().map(|&q| !q).collect();
    assert!(client.write_pixels(region, &inverted).unwrap());

    let read_back = client.read_pixels(region).unwrap();
    assert_eq!(read_back, inverted);

    assert!(client.destroy().unwrap());
    server_thread.join().unwrap().unwrap();
}
