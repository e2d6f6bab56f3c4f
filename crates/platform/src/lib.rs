//! Platform abstraction layer for the roomview scene viewer.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - Vulkan surface creation
//! - Input handling (keyboard, mouse, scroll)

mod input;
mod window;

pub use input::{InputState, KeyCode, MouseButton};
pub use window::{Surface, Window};

// Re-export winit types that callers need for the event loop
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
