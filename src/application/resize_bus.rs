// Resize bus - fans viewport changes out to every rendered panel
use crate::domain::page::Viewport;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::BroadcastStream;

const RESIZE_CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct ResizeBus {
    events: broadcast::Sender<Viewport>,
    latest: watch::Sender<Viewport>,
}

impl ResizeBus {
    pub fn new(initial: Viewport) -> Self {
        let (events, _) = broadcast::channel(RESIZE_CHANNEL_CAPACITY);
        let (latest, _) = watch::channel(initial);
        Self { events, latest }
    }

    /// Record the new viewport and notify subscribers. Returns how many
    /// panels were listening.
    pub fn publish(&self, viewport: Viewport) -> usize {
        self.latest.send_replace(viewport);
        self.events.send(viewport).unwrap_or(0)
    }

    /// The viewport a freshly initialized chart should lay out against
    pub fn current(&self) -> Viewport {
        *self.latest.borrow()
    }

    pub fn subscribe(&self) -> BroadcastStream<Viewport> {
        BroadcastStream::new(self.events.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}
