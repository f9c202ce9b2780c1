use std::{
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::{Duration, Instant},
};

use emuview_engine::TaskPool;
use logging::buffer;
use tracing_subscriber::{layer::SubscriberExt, registry::Registry};

/// Task panics are logged from worker threads, so capture needs a global subscriber.
fn install_log_capture() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let subscriber = Registry::default().with(buffer::layer());
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn wait_until(timeout: Duration, mut pred: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    pred()
}

#[test]
fn keyed_tasks_dedup_while_pending() {
    let pool = TaskPool::new().expect("pool");
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let release_rx = Arc::new(Mutex::new(release_rx));
    let runs = Arc::new(AtomicUsize::new(0));

    let (rx, count) = (release_rx.clone(), runs.clone());
    assert!(pool.submit(
        move || {
            let _ = rx.lock().expect("lock").recv();
            count.fetch_add(1, Ordering::SeqCst);
        },
        7,
    ));
    assert!(pool.is_pending(7));

    let count = runs.clone();
    assert!(!pool.submit(
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        },
        7,
    ));

    release_tx.send(()).expect("release");
    assert!(wait_until(Duration::from_secs(5), || !pool.is_pending(7)));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let count = runs.clone();
    assert!(pool.submit(
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        },
        7,
    ));
    assert!(wait_until(Duration::from_secs(5), || runs.load(Ordering::SeqCst) == 2));
}

#[test]
fn unkeyed_tasks_never_dedup() {
    let pool = TaskPool::with_workers(2).expect("pool");
    let runs = Arc::new(AtomicUsize::new(0));
    for _ in 0..5 {
        let count = runs.clone();
        assert!(pool.submit(
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            },
            0,
        ));
    }
    assert!(!pool.is_pending(0));
    assert!(wait_until(Duration::from_secs(5), || runs.load(Ordering::SeqCst) == 5));
}

#[test]
fn panicking_task_is_logged_as_critical_and_faults() {
    install_log_capture();
    let faults = Arc::new(AtomicUsize::new(0));
    let seen = faults.clone();
    let pool = TaskPool::new().expect("pool").with_fault_handler(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    assert!(pool.submit(|| panic!("boom"), 42));
    assert!(wait_until(Duration::from_secs(5), || faults.load(Ordering::SeqCst) == 1));
    assert!(wait_until(Duration::from_secs(5), || !pool.is_pending(42)));

    let logs = buffer::snapshot();
    let entry = logs
        .iter()
        .find(|l| l.message == "task panicked")
        .expect("panic logged");
    assert_eq!(entry.level, "ERROR");
    assert!(entry.fields.contains("critical=true"));
    assert!(entry.fields.contains("panic=boom"));
}
