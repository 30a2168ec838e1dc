use std::{
    sync::Arc,
    time::Duration,
};

use tokio::{
    sync::{
        mpsc,
        watch,
    },
    time::{
        interval,
        MissedTickBehavior,
    },
};

use crate::{
    chart::Snapshot,
    dashboard::{
        Dashboard,
        Event,
    },
    price_fetcher::PriceSource,
    shared_state::SharedState,
};



/// Drives `Dashboard` from timer ticks and symbol changes and publishes the
/// resulting snapshots.
pub struct Poller<S> {
    source: S,
    dashboard: Dashboard,
    rx: mpsc::Receiver<Event>,
    tx_snapshot: watch::Sender<Snapshot>,
    poll_period: Duration,
}



impl<S: PriceSource + Sync> Poller<S> {
    pub fn new(source: S, dashboard: Dashboard, rx: mpsc::Receiver<Event>,
        tx_snapshot: watch::Sender<Snapshot>
    )
        -> Self
    {
        Self {
            source,
            dashboard,
            rx,
            tx_snapshot,
            poll_period: Duration::from_secs(10),
        }
    }


    /// Set how often the price is polled when nothing else happens.
    pub fn poll_period_set(&mut self, poll_period: Duration) {
        self.poll_period = poll_period;
    }


    async fn handle(&mut self, event: Event) {
        let snapshot = self.dashboard.step(event, &self.source).await;
        tracing::debug!("{:?} handled, {} points in history", event, self.dashboard.history().len());

        // Receivers only ever see whole snapshots, history itself never leaves
        // this task.
        self.tx_snapshot.send_replace(snapshot);
    }
}



pub async fn main<S>(mut poller: Poller<S>, shared_state: Arc<SharedState>)
    where S: PriceSource + Sync
{
    let mut ticker = interval(poller.poll_period);
    // A slow fetch pushes the schedule back instead of firing a burst of
    // catch-up ticks afterwards.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut events_open = true;

    tracing::info!("polling {} every {:?}", poller.dashboard.selected(), poller.poll_period);

    while !shared_state.is_shut_down() {
        let event = tokio::select! {
            _ = shared_state.shut_down_wait() => break,

            _ = ticker.tick() => Event::Tick,

            received = poller.rx.recv(), if events_open => match received {
                Some(event) => {
                    // Selection change restarts the period, so the next tick
                    // comes one full period after this poll.
                    ticker.reset();
                    event
                }
                // Every sender is gone, nobody can change the selection any
                // more. Keep ticking.
                None => {
                    events_open = false;
                    continue
                }
            },
        };

        // Each event is handled to completion before the next one is taken,
        // so there is never more than one fetch in flight.
        poller.handle(event).await;
    }

    tracing::info!("poller stopped");
}
