pub mod common;
pub mod layout_engine;
pub mod scene;
