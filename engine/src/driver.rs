//! Async host loop around [`LifecycleController`].
//!
//! Runs on a current-thread runtime: page events are dispatched as they
//! arrive and the controller's timers advance on a fixed tick.

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::lifecycle::{LifecycleController, PageEvent};
use crate::navigation::Disposition;

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Drive `controller` until `events` closes, then shut it down and hand it
/// back. Key events are echoed with their disposition on `reports`.
pub async fn run(
    mut controller: LifecycleController,
    mut events: mpsc::UnboundedReceiver<PageEvent>,
    reports: Option<mpsc::UnboundedSender<(PageEvent, Disposition)>>,
) -> LifecycleController {
    controller.start(Instant::now());
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                let is_key = matches!(event, PageEvent::KeyDown { .. });
                let disposition = controller.dispatch(event.clone(), Instant::now());
                if is_key
                    && let Some(reports) = &reports
                    && reports.send((event, disposition)).is_err()
                {
                    tracing::debug!("Disposition receiver dropped");
                }
            }
            _ = ticker.tick() => controller.tick(Instant::now()),
        }
    }

    controller.shutdown();
    controller
}
