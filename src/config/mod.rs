pub mod args;
mod structs;

pub use args::{Cli, Commands};
pub use structs::*;
