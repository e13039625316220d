pub mod app;
pub mod slides;
pub mod theme;
pub mod wheel;
