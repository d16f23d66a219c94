use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tracing::{info, warn};

use super::error::{MongoDaoError, MongoResult};

const PING_ATTEMPTS: u32 = 10;
const FIRST_BACKOFF: Duration = Duration::from_millis(250);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Backoff before ping attempt `attempt + 1`, doubling from [`FIRST_BACKOFF`].
fn backoff(attempt: u32) -> Duration {
    FIRST_BACKOFF
        .saturating_mul(1 << attempt.saturating_sub(1).min(16))
        .min(MAX_BACKOFF)
}

/// Build a client and wait until the server answers a ping.
///
/// The returned handle keeps its client alive.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<Database> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut attempt = 1;
    while let Err(source) = database.run_command(doc! { "ping": 1 }).await {
        if attempt == PING_ATTEMPTS {
            return Err(MongoDaoError::InitialPing {
                attempts: attempt,
                source,
            });
        }
        let wait = backoff(attempt);
        warn!(
            attempt,
            wait_ms = wait.as_millis() as u64,
            error = %source,
            "MongoDB not answering yet"
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }

    info!(database = database_name, attempt, "MongoDB reachable");
    Ok(database)
}
