mod bus;
mod events;

pub use bus::EventBus;
pub use events::CanvasEvent;

use crate::bitmap::BitmapRef;

/// Receives drawing-surface changes
pub trait CanvasObserver {
    fn on_stroke_changed(&mut self, image: BitmapRef, strokes: Vec<u8>);

    fn on_tool_session_end(&mut self, image: BitmapRef, strokes: Vec<u8>);
}
