use crate::session::shared::{Inner, Shared};

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tracing::debug;

impl Shared {
    /// Show a transient save message and schedule its removal after `ttl`.
    ///
    /// A newer message cancels the pending clear of the older one.
    pub(super) fn post_status(self: &Arc<Self>, inner: &mut Inner, message: String, ttl: Duration) {
        inner.status_generation = inner.status_generation.wrapping_add(1);
        inner.save_status = message;

        if let Some(pending) = inner.status_clear.take() {
            pending.abort();
        }

        inner.reap_tasks();
        let clear = clear_status(Arc::downgrade(self), inner.status_generation, ttl);
        inner.status_clear = Some(inner.tasks.spawn_on(clear, &self.runtime));

        self.publish(inner);
    }
}

async fn clear_status(shared: Weak<Shared>, generation: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;

    let Some(shared) = shared.upgrade() else {
        return;
    };
    let mut inner = shared.lock();

    if inner.status_generation == generation {
        inner.save_status.clear();
        inner.status_clear = None;
        debug!("Save status cleared");
        shared.publish(&inner);
    }
}
