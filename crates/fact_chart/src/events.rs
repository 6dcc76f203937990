//! Event types and sinks for observing scene assembly and thumbnail batches.
//!
//! Recoverable problems are logged through `tracing` and also sent as [`ChartEvent`]s to the
//! caller's [`EventSink`], so a consuming layer can surface them without a subscriber.

/// Describes events emitted by scene assembly and thumbnail generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// An element could not be built and was left out of its scene.
    ElementSkipped {
        /// Position of the element in its space.
        index: usize,
        /// The requested shape type.
        shape_type: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Emitted when a thumbnail batch starts.
    BatchStarted {
        /// Number of entries to render.
        entry_count: usize,
    },

    /// Emitted after each entry's thumbnail is cached.
    EntryRendered {
        /// Position of the entry in the batch.
        index: usize,
        id: String,
    },

    /// An entry failed to render; other entries are unaffected.
    EntryFailed { id: String, message: String },

    /// The batch paused to let other work run.
    BatchYielded {
        /// Entries processed so far.
        processed: usize,
    },

    /// Emitted when the whole batch finishes.
    BatchFinished { rendered: usize, failed: usize },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. entry id).
        context: String,
        message: String,
    },
}

/// A generic event sink that accepts [`ChartEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ChartEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = ChartEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ChartEvent) {}
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: ChartEvent) {
        (**self).send(event);
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ChartEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ChartEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ChartEvent),
{
    #[inline]
    fn send(&mut self, event: ChartEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ChartEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<ChartEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ChartEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ChartEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: ChartEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.send(event.clone());
        }
        last.send(event);
    }
}
