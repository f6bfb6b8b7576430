//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module; shared document loading is in
//! `utils`.

mod completions;
mod config;
mod transform;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use transform::handle_transform;
pub use validate::handle_validate;
