/*!
Helpers d'attente pour tests asynchrones

Les tâches de fond (poller, serveurs stub) n'exposent pas de point de
synchronisation : on sonde une condition jusqu'à un délai maximal.
*/

use std::time::{Duration, Instant};

/// Sonde `condition` toutes les 10ms, retourne false si le délai expire
pub async fn wait_until<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    let _ = env_logger::builder().is_test(true).try_init();

    while start.elapsed() < Duration::from_millis(timeout_ms) {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let reached = condition();
    if !reached {
        log::warn!("⏰ Timeout after {}ms waiting for condition", timeout_ms);
    }
    reached
}
