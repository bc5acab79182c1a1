use crate::session::{Phase, shared::Shared};

use std::{sync::Weak, time::Duration};

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

/// Periodic amplitude sampler for one recording.
///
/// Bound to the `generation` that entered `Recording`. Each tick re-checks it
/// under the session lock before touching state, so a tick that was already
/// in flight when the recording stopped (or a new one started) exits
/// without mutating anything.
pub(super) async fn run_sampler(shared: Weak<Shared>, generation: u64, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(shared) = shared.upgrade() else {
            break;
        };
        let mut inner = shared.lock();

        if inner.generation != generation || inner.phase != Phase::Recording {
            break;
        }
        let Some(recorder) = inner.recorder.as_mut() else {
            break;
        };

        let amplitude = recorder.max_amplitude();
        inner.amplitude = amplitude;
        inner.amplitude_history.push(amplitude);
        trace!(amplitude, samples = inner.amplitude_history.len(), "Amplitude sampled");

        shared.publish(&inner);
    }

    debug!(generation, "Amplitude sampler stopped");
}
