//! Pulsing indicator shown while the alert is active

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, time::interval};

/// Resting scale of the indicator
pub const REST_SCALE: f32 = 1.0;
/// Peak scale of one pulse
pub const PEAK_SCALE: f32 = 1.2;
/// Duration of one leg (grow or shrink)
pub const LEG: Duration = Duration::from_millis(500);

const FRAME: Duration = Duration::from_millis(50);

/// Scale at `elapsed` into a 1.0 → 1.2 → 1.0 cycle, linear per leg
pub fn scale_at(elapsed: Duration) -> f32 {
    let cycle = LEG.as_millis() * 2;
    let t = elapsed.as_millis() % cycle;
    let leg = LEG.as_millis();
    let progress = if t < leg {
        t as f32 / leg as f32
    } else {
        (cycle - t) as f32 / leg as f32
    };
    REST_SCALE + (PEAK_SCALE - REST_SCALE) * progress
}

/// Publish the indicator scale every frame until aborted
pub async fn pulse_loop(scale_tx: Arc<watch::Sender<f32>>) {
    let mut frames = interval(FRAME);
    let mut elapsed = Duration::ZERO;
    loop {
        frames.tick().await;
        scale_tx.send_replace(scale_at(elapsed));
        elapsed += FRAME;
    }
}
