//! Integration tests for concurrent first access.

use singleton_locator::define_locator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;

#[test]
fn test_concurrent_first_access_constructs_once() {
    define_locator!(racing);

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct SlowService;

    racing::provide(|| {
        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        SlowService
    });

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                racing::get_instance::<SlowService>().unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<SlowService>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
    assert!(instances.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_registration_racing_creation_yields_one_instance() {
    define_locator!(contested);

    #[derive(Debug)]
    struct Shared(&'static str);

    contested::provide(|| Shared("created"));

    let barrier = Arc::new(Barrier::new(2));

    let registrar = {
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            contested::add_instance(Shared("registered")).is_ok()
        })
    };
    let resolver = {
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            contested::get_instance::<Shared>().unwrap()
        })
    };

    let registered = registrar.join().unwrap();
    let resolved = resolver.join().unwrap();
    let stored = contested::get_instance::<Shared>().unwrap();

    // Whoever won, every reader sees the same single instance.
    assert!(Arc::ptr_eq(&resolved, &stored));
    assert_eq!(stored.0, if registered { "registered" } else { "created" });
}

#[test]
fn test_shared_binding_converges() {
    define_locator!(bound);

    #[derive(Default)]
    struct Service;

    bound::provide_default::<Service>();
    let binding = Arc::new(bound::bind::<Service>());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let binding = binding.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                binding.get().unwrap()
            })
        })
        .collect();

    let expected = bound::get_instance::<Service>().unwrap();
    for handle in handles {
        assert!(Arc::ptr_eq(&handle.join().unwrap(), &expected));
    }
}
