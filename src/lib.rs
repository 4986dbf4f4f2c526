pub mod channel;
pub mod config;
pub mod display;
pub mod filter;
pub mod gesture;
pub mod hand;
pub mod hud;
pub mod pacing;
pub mod render;
pub mod sensing;
pub mod source;
