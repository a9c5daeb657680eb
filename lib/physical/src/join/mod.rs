mod processor;
mod state;

pub use processor::JoinProcessor;
pub use state::{JoinStateLayout, KEY_SEPARATOR};
