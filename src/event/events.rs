use crate::bitmap::BitmapRef;

/// Notifications from the drawing surface.
///
/// Both variants carry the freshly composited canvas and the serialized
/// strokes that produced it.
#[derive(Debug, Clone)]
pub enum CanvasEvent {
    /// A stroke was finished, or the canvas was reset
    StrokeChanged { image: BitmapRef, strokes: Vec<u8> },
    /// The pointer was released and the drawing tool went idle
    ToolSessionEnded { image: BitmapRef, strokes: Vec<u8> },
}

impl CanvasEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CanvasEvent::StrokeChanged { .. } => "stroke_changed",
            CanvasEvent::ToolSessionEnded { .. } => "tool_session_ended",
        }
    }
}
