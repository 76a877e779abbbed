pub mod error;
pub mod sensitive;

mod util;
