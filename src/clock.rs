use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::store::{Action, Store};

/// Period of the on-screen clock.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// `3:04:05 PM` style 12-hour time, hour without leading zero.
pub fn format_clock<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%-I:%M:%S %p").to_string()
}

/// Publish the current time every `period` until cancelled.
///
/// Ticks are not drift corrected; a late tick just delays the following ones.
pub fn spawn_ticker(store: Arc<Store>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let now = Utc::now();
                    log::trace!("tick {}", now);
                    if let Err(e) = store.dispatch(Action::Tick(now)) {
                        log::warn!("Clock tick rejected: {}", e);
                    }
                }
            }
        }
        log::debug!("Clock stopped");
    })
}
