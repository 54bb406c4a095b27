// SQL module - join-key extraction and SQL rendering for display

pub mod join_keys;
pub mod render;

pub use join_keys::{parse_join_keys, JoinKeys};
pub use render::*;
