//! Presentation layer: the wrapped card and the text recap.

mod card;
mod summary;

pub use card::{export_card_png, export_card_svg, open_file};
pub use summary::print_summary;
