//! SOS countdown timer

use std::{sync::Weak, time::Duration};

use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use crate::{error::SosError, sos::SosSession, state::Tick};

/// Tick the session once per period until the countdown elapses.
///
/// Holds only a weak reference so an unmounted session is never kept alive
/// by its own timer. `generation` identifies this timer to the session.
pub async fn countdown_task(session: Weak<SosSession>, period: Duration, generation: u64) {
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        let Some(session) = session.upgrade() else {
            debug!("SOS session gone, countdown stopped");
            break;
        };

        match session.tick(generation) {
            Ok(Tick::Remaining(_)) => {}
            Ok(Tick::Activated(_)) => break,
            Err(SosError::StaleCountdown { .. }) => {
                debug!("Countdown timer {} superseded", generation);
                break;
            }
            Err(e) => {
                warn!("Countdown stopped: {}", e);
                break;
            }
        }
    }
}
