//! Dynamic rendering helpers (Vulkan 1.3).
//!
//! [`ColorAttachment`], [`DepthAttachment`], and [`RenderingConfig`] describe
//! a rendering operation; [`RenderingConfig::build`] produces a
//! [`RenderingInfoBundle`] whose backing arrays outlive the `VkRenderingInfo`
//! handed to `vkCmdBeginRendering`.

use ash::vk;

/// Color attachment configuration.
///
/// Defaults: `COLOR_ATTACHMENT_OPTIMAL` layout, clear on load, store,
/// opaque black clear color.
#[derive(Clone)]
pub struct ColorAttachment {
    /// The image view to render to.
    pub image_view: vk::ImageView,
    /// The image layout during rendering.
    pub layout: vk::ImageLayout,
    /// Load operation at the start of rendering.
    pub load_op: vk::AttachmentLoadOp,
    /// Store operation at the end of rendering.
    pub store_op: vk::AttachmentStoreOp,
    /// Clear value when `load_op` is CLEAR.
    pub clear_value: vk::ClearColorValue,
}

impl ColorAttachment {
    /// Creates a color attachment with default settings.
    #[inline]
    pub fn new(image_view: vk::ImageView) -> Self {
        Self {
            image_view,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::STORE,
            clear_value: vk::ClearColorValue {
                float32: [0.0, 0.0, 0.0, 1.0],
            },
        }
    }

    /// Sets the clear color as RGBA floats.
    #[inline]
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_value = vk::ClearColorValue { float32: color };
        self
    }

    /// Converts to a `VkRenderingAttachmentInfo`.
    #[inline]
    pub fn to_rendering_attachment_info(&self) -> vk::RenderingAttachmentInfo<'static> {
        vk::RenderingAttachmentInfo::default()
            .image_view(self.image_view)
            .image_layout(self.layout)
            .load_op(self.load_op)
            .store_op(self.store_op)
            .clear_value(vk::ClearValue {
                color: self.clear_value,
            })
    }
}

/// Depth attachment configuration.
///
/// Defaults: `DEPTH_STENCIL_ATTACHMENT_OPTIMAL` layout, clear to 1.0,
/// contents discarded after rendering.
#[derive(Clone, Debug)]
pub struct DepthAttachment {
    /// The depth image view to render to.
    pub image_view: vk::ImageView,
    /// The image layout during rendering.
    pub layout: vk::ImageLayout,
    /// Load operation at the start of rendering.
    pub load_op: vk::AttachmentLoadOp,
    /// Store operation at the end of rendering.
    pub store_op: vk::AttachmentStoreOp,
    /// Clear value when `load_op` is CLEAR.
    pub clear_value: vk::ClearDepthStencilValue,
}

impl DepthAttachment {
    /// Creates a depth attachment with default settings.
    #[inline]
    pub fn new(image_view: vk::ImageView) -> Self {
        Self {
            image_view,
            layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::DONT_CARE,
            clear_value: vk::ClearDepthStencilValue {
                depth: 1.0,
                stencil: 0,
            },
        }
    }

    /// Sets the clear depth value.
    #[inline]
    pub fn with_clear_depth(mut self, depth: f32) -> Self {
        self.clear_value.depth = depth;
        self
    }

    /// Keeps the depth contents after rendering. The shadow pass needs
    /// this so the map can be sampled later in the frame.
    #[inline]
    pub fn store(mut self) -> Self {
        self.store_op = vk::AttachmentStoreOp::STORE;
        self
    }

    /// Converts to a `VkRenderingAttachmentInfo`.
    #[inline]
    pub fn to_rendering_attachment_info(&self) -> vk::RenderingAttachmentInfo<'static> {
        vk::RenderingAttachmentInfo::default()
            .image_view(self.image_view)
            .image_layout(self.layout)
            .load_op(self.load_op)
            .store_op(self.store_op)
            .clear_value(vk::ClearValue {
                depth_stencil: self.clear_value,
            })
    }
}

/// Complete configuration for one dynamic rendering operation.
#[derive(Clone, Default)]
pub struct RenderingConfig {
    /// Color attachments; empty for a depth-only pass.
    pub color_attachments: Vec<ColorAttachment>,
    /// Optional depth attachment.
    pub depth_attachment: Option<DepthAttachment>,
    /// Region to render to.
    pub render_area: vk::Rect2D,
}

impl RenderingConfig {
    /// Creates a configuration covering a `width` x `height` area.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color_attachments: Vec::new(),
            depth_attachment: None,
            render_area: vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: vk::Extent2D { width, height },
            },
        }
    }

    /// Creates a configuration from an extent.
    #[inline]
    pub fn from_extent(extent: vk::Extent2D) -> Self {
        Self::new(extent.width, extent.height)
    }

    /// Adds a color attachment.
    #[inline]
    pub fn with_color_attachment(mut self, attachment: ColorAttachment) -> Self {
        self.color_attachments.push(attachment);
        self
    }

    /// Sets the depth attachment.
    #[inline]
    pub fn with_depth_attachment(mut self, attachment: DepthAttachment) -> Self {
        self.depth_attachment = Some(attachment);
        self
    }

    /// Render area extent.
    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.render_area.extent
    }

    /// Builds the bundle backing a `VkRenderingInfo`.
    pub fn build(&self) -> RenderingInfoBundle {
        RenderingInfoBundle::new(self)
    }
}

/// Owns the attachment info arrays a `VkRenderingInfo` points into.
pub struct RenderingInfoBundle {
    color_attachments: Vec<vk::RenderingAttachmentInfo<'static>>,
    depth_attachment: Option<vk::RenderingAttachmentInfo<'static>>,
    render_area: vk::Rect2D,
}

impl RenderingInfoBundle {
    /// Creates a bundle from a rendering configuration.
    pub fn new(config: &RenderingConfig) -> Self {
        let color_attachments: Vec<vk::RenderingAttachmentInfo> = config
            .color_attachments
            .iter()
            .map(|a| a.to_rendering_attachment_info())
            .collect();

        let depth_attachment = config
            .depth_attachment
            .as_ref()
            .map(|a| a.to_rendering_attachment_info());

        Self {
            color_attachments,
            depth_attachment,
            render_area: config.render_area,
        }
    }

    /// The `VkRenderingInfo` referencing this bundle's data. Valid as long
    /// as the bundle exists.
    pub fn info(&self) -> vk::RenderingInfo<'_> {
        let mut info = vk::RenderingInfo::default()
            .render_area(self.render_area)
            .layer_count(1)
            .color_attachments(&self.color_attachments);

        if let Some(ref depth) = self.depth_attachment {
            info = info.depth_attachment(depth);
        }

        info
    }

    /// Render area.
    #[inline]
    pub fn render_area(&self) -> vk::Rect2D {
        self.render_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_attachment_defaults() {
        let attachment = ColorAttachment::new(vk::ImageView::null());
        assert_eq!(attachment.layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
        assert_eq!(attachment.load_op, vk::AttachmentLoadOp::CLEAR);
        assert_eq!(attachment.store_op, vk::AttachmentStoreOp::STORE);
        let clear = unsafe { attachment.clear_value.float32 };
        assert_eq!(clear, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_color_attachment_clear_color() {
        let attachment =
            ColorAttachment::new(vk::ImageView::null()).with_clear_color([0.9, 0.9, 0.8, 1.0]);
        let clear = unsafe { attachment.clear_value.float32 };
        assert_eq!(clear, [0.9, 0.9, 0.8, 1.0]);
    }

    #[test]
    fn test_depth_attachment_defaults() {
        let attachment = DepthAttachment::new(vk::ImageView::null());
        assert_eq!(
            attachment.layout,
            vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL
        );
        assert_eq!(attachment.store_op, vk::AttachmentStoreOp::DONT_CARE);
        assert_eq!(attachment.clear_value.depth, 1.0);
    }

    #[test]
    fn test_depth_attachment_store() {
        let attachment = DepthAttachment::new(vk::ImageView::null()).store();
        assert_eq!(attachment.store_op, vk::AttachmentStoreOp::STORE);
    }

    #[test]
    fn test_rendering_config_new() {
        let config = RenderingConfig::new(1280, 720);
        assert_eq!(config.render_area.extent.width, 1280);
        assert_eq!(config.render_area.extent.height, 720);
        assert!(config.color_attachments.is_empty());
        assert!(config.depth_attachment.is_none());
    }

    #[test]
    fn test_depth_only_bundle() {
        // Shadow pass shape: no color attachments, stored depth.
        let config = RenderingConfig::new(1024, 1024)
            .with_depth_attachment(DepthAttachment::new(vk::ImageView::null()).store());

        let bundle = config.build();
        let info = bundle.info();

        assert_eq!(info.color_attachment_count, 0);
        assert_eq!(info.render_area.extent.width, 1024);
        assert_eq!(info.layer_count, 1);
    }

    #[test]
    fn test_scene_pass_bundle() {
        let config = RenderingConfig::new(800, 600)
            .with_color_attachment(ColorAttachment::new(vk::ImageView::null()))
            .with_depth_attachment(DepthAttachment::new(vk::ImageView::null()));

        let bundle = config.build();
        let info = bundle.info();

        assert_eq!(info.color_attachment_count, 1);
        assert_eq!(info.render_area.extent.width, 800);
    }
}
