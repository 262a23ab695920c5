pub extern crate rand;
pub extern crate serde;
pub extern crate serde_json;

mod draw_log;
mod message;
mod registry;
mod types;

pub use draw_log::*;
pub use message::*;
pub use registry::*;
pub use types::*;
