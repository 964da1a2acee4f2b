use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Calls `tick` right away and then every `interval_ms` while the owner is alive.
pub fn poll_every<F>(interval_ms: u32, tick: F)
where
    F: Fn() + 'static,
{
    let alive = Arc::new(AtomicBool::new(true));
    let alive_for_loop = alive.clone();

    spawn_local(async move {
        while alive_for_loop.load(Ordering::Relaxed) {
            tick();
            TimeoutFuture::new(interval_ms).await;
        }
    });

    on_cleanup(move || alive.store(false, Ordering::Relaxed));
}
