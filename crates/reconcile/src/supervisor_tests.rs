use std::sync::Arc;
use std::time::Duration;

use super::*;

#[test]
fn wait_timeout_returns_after_deadline_with_no_notify() {
    let sup = Supervisor::new(ReconcilerState::new());
    let mut guard = sup.lock();
    let start = std::time::Instant::now();
    sup.wait_timeout(&mut guard, Duration::from_millis(20));
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn notify_all_wakes_a_waiting_thread_early() {
    let sup = Arc::new(Supervisor::new(ReconcilerState::new()));
    let sup2 = Arc::clone(&sup);
    let handle = std::thread::spawn(move || {
        let mut guard = sup2.lock();
        sup2.wait_timeout(&mut guard, Duration::from_secs(30));
    });
    std::thread::sleep(Duration::from_millis(20));
    sup.notify_all();
    handle.join().expect("waiter thread panicked");
}
