pub mod normalize;
pub mod script;

pub use normalize::{is_alignment_char, is_ideograph, normalize, normalize_chars, reading_units};
pub use script::Script;
