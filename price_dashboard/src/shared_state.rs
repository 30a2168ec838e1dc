use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use tokio::sync::Notify;



#[derive(Default)]
pub struct SharedState {
    // While this is 0, all tasks can continue to do their work. When this is
    // set to 1, tasks should finish what they are doing and return.
    shut_down: AtomicUsize,
    // Wakes tasks that are waiting on a timer or channel, so they do not sleep
    // through a shut down request.
    wake: Notify,
}



impl SharedState {
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Relaxed) != 0
    }


    pub fn shut_down_request(&self) {
        self.shut_down.store(1, Ordering::SeqCst);
        self.wake.notify_waiters();
    }


    /// Resolves once shut down has been requested, also when that happened
    /// before the call.
    pub async fn shut_down_wait(&self) {
        loop {
            let notified = self.wake.notified();
            tokio::pin!(notified);

            // Register before checking the flag, otherwise a request made in
            // between would be missed.
            notified.as_mut().enable();
            if self.is_shut_down() {
                return
            }

            notified.await;
        }
    }
}



#[cfg(test)]
mod test {
    use super::*;

    use std::{
        sync::Arc,
        time::Duration,
    };

    #[tokio::test]
    async fn test_shut_down_wait_after_request() {
        let state = SharedState::default();
        state.shut_down_request();

        assert!(state.is_shut_down());
        state.shut_down_wait().await;
    }

    #[tokio::test]
    async fn test_shut_down_wait_wakes_waiter() {
        let state = Arc::new(SharedState::default());
        let waiter = tokio::spawn({
            let state = state.clone();
            async move { state.shut_down_wait().await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        state.shut_down_request();
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }
}
