//! Live event stream: alert transitions and notices as server-sent events

use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{stream, Stream, StreamExt};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::{
    sos::AlertSnapshot,
    state::{AppState, Notice},
};

struct Feed {
    alerts: watch::Receiver<AlertSnapshot>,
    notices: broadcast::Receiver<Notice>,
}

impl Feed {
    /// Next event, or `None` once the daemon is shutting down
    async fn next_event(&mut self) -> Option<Result<Event, axum::Error>> {
        loop {
            tokio::select! {
                changed = self.alerts.changed() => {
                    changed.ok()?;
                    let snapshot = self.alerts.borrow_and_update().clone();
                    return Some(Event::default().event("alert").json_data(snapshot));
                }
                notice = self.notices.recv() => match notice {
                    Ok(notice) => return Some(Event::default().event("notice").json_data(notice)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Event stream lagged, {} notices skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }
}

/// Handle GET /events - Current alert first, then every transition and notice
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Event stream client connected");
    let mut alerts = state.sos.subscribe();
    let current = alerts.borrow_and_update().clone();
    let feed = Feed {
        alerts,
        notices: state.notices.subscribe(),
    };

    let first = stream::once(async move { Event::default().event("alert").json_data(current) });
    let rest = stream::unfold(feed, |mut feed| async move {
        let event = feed.next_event().await?;
        Some((event, feed))
    });

    Sse::new(first.chain(rest)).keep_alive(KeepAlive::default())
}
