#[allow(clippy::module_inception)]
mod api;

pub use api::*;
