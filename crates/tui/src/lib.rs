pub mod app;
pub mod config;
pub mod input;
pub mod keybinds;
pub mod logging;
pub mod ui;

pub use app::App;
pub use config::Config;
