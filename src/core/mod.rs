// Core byte primitives: delimiter search and field splitting.

pub mod delimiter;
pub mod field;

pub use delimiter::Delimiter;
pub use field::{take_delimited, take_delimited_text, take_delimited_with, Fields};
