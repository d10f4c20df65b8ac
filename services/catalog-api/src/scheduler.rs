//! Background jobs
//!
//! One scheduled operation: a daily sweep at midnight UTC that deactivates
//! accounts with no login for the configured period. The sweep only
//! matches still-active rows, so re-running it is a no-op.

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use lyceum_db::UserRepository;

/// Time until the next midnight UTC
fn until_next_midnight(now: chrono::DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now + Duration::days(1))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();

    (next_midnight - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60))
}

/// Spawn the daily inactive-account sweep
pub fn spawn_inactive_user_sweep<U>(users: Arc<U>, inactive_after: Duration) -> JoinHandle<()>
where
    U: UserRepository + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(until_next_midnight(Utc::now())).await;

            let cutoff = Utc::now() - inactive_after;
            match users.deactivate_inactive(cutoff).await {
                Ok(count) => {
                    info!(deactivated = count, "inactive account sweep complete");
                    metrics::counter!("users_deactivated_total").increment(count);
                }
                Err(e) => {
                    error!(error = %e, "inactive account sweep failed");
                }
            }
        }
    })
}
