//! Vulkan abstraction layer for the roomview scene viewer.
//!
//! Safe wrappers over the `ash` crate covering everything the scene and
//! shadow passes need:
//! - Instance and device creation
//! - Swapchain management
//! - Buffer, image, sampler, and texture resources
//! - Shader modules and graphics pipelines
//! - Descriptor sets
//! - Command recording and synchronization primitives

mod error;

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod image;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod rendering;
pub mod sampler;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod texture;
pub mod vertex;

pub use error::{RhiError, RhiResult};

// Re-export ash types that callers need
pub use ash::vk;
