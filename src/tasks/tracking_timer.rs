//! Smart tracking background task

use std::{sync::Arc, time::Duration};

use tokio::time::interval;
use tracing::{debug, info};

use crate::state::{AppState, TrackingTick};

/// Background task that advances the tracking clock while tracking is active
pub async fn tracking_timer_task(state: Arc<AppState>) {
    info!("Starting tracking timer task");

    let mut active_rx = state.tracking_tx.subscribe();

    loop {
        // Wait until a tracking session is started
        while !*active_rx.borrow_and_update() {
            if active_rx.changed().await.is_err() {
                return;
            }
        }

        debug!("Tracking active, running clock");
        let mut ticker = interval(Duration::from_secs(1));
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.advance_tracking() {
                        TrackingTick::Running { share_location_now: true } => {
                            let state = Arc::clone(&state);
                            tokio::spawn(async move { state.share_location().await });
                        }
                        TrackingTick::Running { .. } => {}
                        TrackingTick::Finished | TrackingTick::Idle => break,
                    }
                }

                changed = active_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Restart the clock on a fresh start, stop on a stop
                    if *active_rx.borrow_and_update() {
                        ticker.reset();
                    } else {
                        debug!("Tracking stopped, clock paused");
                        break;
                    }
                }
            }
        }
    }
}
