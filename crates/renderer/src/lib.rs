//! Frame orchestration for the roomview scene viewer.
//!
//! Owns the whole Vulkan resource graph and drives the two passes each
//! frame: the directional light's shadow map, then the lit scene.

pub mod depth_buffer;
pub mod mesh;
pub mod renderer;
pub mod shadow;
pub mod ubo;

pub use renderer::Renderer;

pub use roomview_rhi::sync::MAX_FRAMES_IN_FLIGHT;
