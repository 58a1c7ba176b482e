pub mod style;
pub mod widgets;

pub use style::{ColorTokens, StyleTokens, LAYOUT_TOKENS, READER_COLORS};
pub use widgets::{icon_button, status_label};
