use std::collections::VecDeque;

use crate::event::{CanvasEvent, CanvasObserver};

/// Queue of drawing-surface events waiting to be handed to an observer.
///
/// The surface only emits; whoever owns both the surface and the observer
/// calls [`EventBus::dispatch`] once the frame's input has been handled.
#[derive(Default)]
pub struct EventBus {
    pending: VecDeque<CanvasEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &format!("<{} events>", self.pending.len()))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: CanvasEvent) {
        log::trace!("Canvas event queued: {}", event.name());
        self.pending.push_back(event);
    }

    /// Deliver every queued event in order, returning how many were delivered
    pub fn dispatch(&mut self, observer: &mut dyn CanvasObserver) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.pending.pop_front() {
            match event {
                CanvasEvent::StrokeChanged { image, strokes } => observer.on_stroke_changed(image, strokes),
                CanvasEvent::ToolSessionEnded { image, strokes } => observer.on_tool_session_end(image, strokes),
            }
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
