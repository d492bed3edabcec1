mod execute;
mod query;
mod state;

pub use state::*;
