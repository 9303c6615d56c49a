mod layout_button;

pub use layout_button::{LayoutButton, layout_switcher};
