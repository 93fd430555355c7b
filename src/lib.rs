pub mod config;
pub mod entry;
pub mod export;
pub mod feed;
pub mod renderer;
pub mod slug;
