pub mod active_section;
pub mod config;
pub mod content;
pub mod error;
pub mod intersection;
pub mod mobile_nav;
pub mod parallax;
pub mod section;
pub mod theme;
pub mod throttle;
pub mod timers;
pub mod typewriter;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(target_arch = "wasm32")]
mod hooks;

#[cfg(target_arch = "wasm32")]
pub use frontend::run;
