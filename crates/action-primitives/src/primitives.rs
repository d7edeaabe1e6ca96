//! Action primitives implementation
//!
//! Three primitives drive a host page:
//! 1. input - apply a payload through the input simulator
//! 2. click - scroll into view, settle, click
//! 3. navigate - build a destination URL and hand it to the host

mod click;
mod input;
mod navigate;

pub use click::*;
pub use input::*;
pub use navigate::*;
