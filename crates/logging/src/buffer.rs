//! Keep recent log events in memory.
//!
//! [`BufferLayer`] renders each event it sees and appends it to a process-wide ring of bounded
//! size. The binary prints the ring on request, and tests use it to assert on emitted logs.
//!
//! Usage:
//! - Install [`layer`] in your tracing subscriber.
//! - Read with [`snapshot`]; reset with [`clear`]; resize with [`set_capacity`].

use std::{collections::VecDeque, sync::OnceLock};

use parking_lot::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::fmt::{self, RenderedLog};

/// Events kept when no capacity has been set.
pub const DEFAULT_CAPACITY: usize = 512;

/// The ring and its capacity.
struct Ring {
    /// Oldest first.
    events: VecDeque<RenderedLog>,
    /// Most events kept.
    capacity: usize,
}

/// Process-wide log ring.
static RING: OnceLock<Mutex<Ring>> = OnceLock::new();

/// Access the global ring.
fn ring() -> &'static Mutex<Ring> {
    RING.get_or_init(|| {
        Mutex::new(Ring {
            events: VecDeque::new(),
            capacity: DEFAULT_CAPACITY,
        })
    })
}

/// Change how many events are kept, dropping the oldest if needed.
pub fn set_capacity(capacity: usize) {
    let mut guard = ring().lock();
    guard.capacity = capacity;
    while guard.events.len() > capacity {
        guard.events.pop_front();
    }
}

/// Copy of the buffered events, oldest first.
pub fn snapshot() -> Vec<RenderedLog> {
    ring().lock().events.iter().cloned().collect()
}

/// Drop every buffered event.
pub fn clear() {
    ring().lock().events.clear();
}

/// Tracing layer that appends rendered events to the global ring.
pub struct BufferLayer;

impl<S> Layer<S> for BufferLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let rendered = fmt::render_event(event);
        let mut guard = ring().lock();
        if guard.capacity == 0 {
            return;
        }
        while guard.events.len() >= guard.capacity {
            guard.events.pop_front();
        }
        guard.events.push_back(rendered);
    }
}

/// Create the buffering layer instance to add to your subscriber.
pub fn layer() -> BufferLayer {
    BufferLayer
}
