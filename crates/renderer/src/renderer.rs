//! Renderer orchestration.
//!
//! [`Renderer`] owns every Vulkan resource and records two passes per
//! frame: the directional light's depth-only shadow pass, then the lit
//! scene pass over the swapchain image.

use std::collections::HashMap;
use std::mem::ManuallyDrop;
use std::sync::Arc;

use ash::vk;
use tracing::{debug, error, info, warn};

use roomview_core::Config;
use roomview_platform::{InputState, MouseButton, Surface, Window};
use roomview_resources::TextureImage;
use roomview_rhi::buffer::{Buffer, BufferUsage};
use roomview_rhi::command::{CommandBuffer, CommandPool};
use roomview_rhi::descriptor::{
    DescriptorBindingBuilder, DescriptorPool, DescriptorSetLayout, buffer_info, image_info,
    update_descriptor_sets,
};
use roomview_rhi::device::Device;
use roomview_rhi::instance::Instance;
use roomview_rhi::physical_device::select_physical_device;
use roomview_rhi::pipeline::{CullMode, GraphicsPipelineBuilder, Pipeline, PipelineLayout};
use roomview_rhi::rendering::{ColorAttachment, DepthAttachment, RenderingConfig};
use roomview_rhi::sampler::Sampler;
use roomview_rhi::shader::{Shader, ShaderStage};
use roomview_rhi::swapchain::Swapchain;
use roomview_rhi::sync::{Fence, MAX_FRAMES_IN_FLIGHT, Semaphore};
use roomview_rhi::texture::Texture;
use roomview_rhi::vertex::Vertex;
use roomview_rhi::{RhiError, RhiResult};
use roomview_scene::room::{self, CAMERA_START, CAMERA_TARGET};
use roomview_scene::{Camera, OrbitController, Scene};

use crate::depth_buffer::{DEPTH_FORMAT, DepthBuffer};
use crate::mesh::GpuMesh;
use crate::shadow::ShadowMap;
use crate::ubo::{CameraUbo, LightsUbo, ObjectPush, ShadowPush};

/// Largest per-frame mouse delta fed to the orbit controller.
const MAX_MOUSE_DELTA: f32 = 100.0;

/// Depth bias keeping the shadow map from shadowing the surfaces that
/// produced it.
const SHADOW_BIAS_CONSTANT: f32 = 1.25;
const SHADOW_BIAS_SLOPE: f32 = 1.75;

/// Per-frame resources.
struct FrameData {
    /// Fence signaled when this frame's GPU work completes.
    fence: Fence,
    /// Command buffer re-recorded each frame.
    command_buffer: CommandBuffer,
    /// Camera uniform buffer.
    camera_ubo: Buffer,
    /// Lights uniform buffer.
    lights_ubo: Buffer,
    /// Descriptor set binding the UBOs and the shadow map.
    descriptor_set: vk::DescriptorSet,
}

/// Per-swapchain-image semaphores.
struct ImageSync {
    image_available: Semaphore,
    render_finished: Semaphore,
}

/// Everything needed to draw one scene object.
struct ObjectDraw {
    mesh: GpuMesh,
    push: ObjectPush,
    shadow_push: ShadowPush,
    texture_index: usize,
    cast_shadow: bool,
}

/// Owns the Vulkan resource graph and renders the living-room scene.
///
/// Destruction order matters for the handles that reference each other:
/// everything device-level first, then swapchain, surface, device, and
/// the instance last. `ManuallyDrop` makes that order explicit.
pub struct Renderer {
    device: ManuallyDrop<Arc<Device>>,
    instance: ManuallyDrop<Instance>,
    surface: ManuallyDrop<Surface>,
    swapchain: ManuallyDrop<Swapchain>,
    depth_buffer: ManuallyDrop<DepthBuffer>,
    shadow_map: ManuallyDrop<ShadowMap>,

    albedo_sampler: ManuallyDrop<Sampler>,
    shadow_sampler: ManuallyDrop<Sampler>,

    frame_set_layout: ManuallyDrop<DescriptorSetLayout>,
    texture_set_layout: ManuallyDrop<DescriptorSetLayout>,
    descriptor_pool: ManuallyDrop<DescriptorPool>,

    scene_pipeline: ManuallyDrop<Pipeline>,
    scene_pipeline_layout: ManuallyDrop<PipelineLayout>,
    shadow_pipeline: ManuallyDrop<Pipeline>,
    shadow_pipeline_layout: ManuallyDrop<PipelineLayout>,

    command_pool: ManuallyDrop<CommandPool>,

    textures: Vec<Texture>,
    texture_sets: Vec<vk::DescriptorSet>,
    draws: Vec<ObjectDraw>,

    background: [f32; 4],
    lights: LightsUbo,

    frames: Vec<FrameData>,
    image_sync: Vec<ImageSync>,
    current_frame: usize,
    current_semaphore: usize,

    camera: Camera,
    orbit: OrbitController,

    framebuffer_resized: bool,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Creates the renderer: full Vulkan setup, scene upload, and the
    /// orbit camera at its hand-authored start position.
    ///
    /// # Errors
    ///
    /// Returns an error when any Vulkan resource creation or shader load
    /// fails. Missing texture files are not an error; they fall back to a
    /// placeholder pattern.
    pub fn new(window: &Window, config: &Config) -> RhiResult<Self> {
        let width = window.width();
        let height = window.height();

        info!("Initializing renderer ({}x{})", width, height);

        let enable_validation = cfg!(debug_assertions);
        let instance = Instance::new(enable_validation)?;

        let surface = window
            .create_surface(instance.entry(), instance.handle())
            .map_err(|e| RhiError::SurfaceError(e.to_string()))?;

        let physical_device_info =
            select_physical_device(instance.handle(), surface.handle(), surface.loader())?;

        let device = Device::new(&instance, &physical_device_info)?;

        let swapchain = Swapchain::new(&instance, device.clone(), surface.handle(), width, height)?;

        let depth_buffer = DepthBuffer::new(device.clone(), width, height)?;
        let shadow_map = ShadowMap::new(device.clone())?;

        let albedo_sampler = Sampler::linear_repeat(device.clone())?;
        let shadow_sampler = Sampler::shadow(device.clone())?;

        let scene = room::living_room();
        info!(
            "Scene built: {} objects, {} point lights, {} spot lights",
            scene.objects.len(),
            scene.point_lights.len(),
            scene.spot_lights.len()
        );

        let graphics_family = device.queue_families().graphics_family.unwrap();
        let command_pool = CommandPool::new(device.clone(), graphics_family)?;

        // Texture uploads run through a transient pool that is dropped as
        // soon as the last staging copy finishes.
        let (textures, texture_indices) = {
            let upload_pool = CommandPool::new_transient(device.clone(), graphics_family)?;
            Self::upload_textures(&device, &upload_pool, &scene, config)?
        };

        let (frame_set_layout, texture_set_layout, descriptor_pool) =
            Self::create_descriptor_resources(&device, textures.len() as u32)?;

        let (scene_pipeline, scene_pipeline_layout) = Self::create_scene_pipeline(
            device.clone(),
            config,
            &frame_set_layout,
            &texture_set_layout,
            swapchain.format(),
        )?;

        let (shadow_pipeline, shadow_pipeline_layout) =
            Self::create_shadow_pipeline(device.clone(), config, &frame_set_layout)?;

        let draws = Self::upload_scene(&device, &scene, &texture_indices)?;

        let texture_sets =
            Self::create_texture_sets(&device, &descriptor_pool, &texture_set_layout, &textures, &albedo_sampler)?;

        let frames = Self::create_frames(
            &device,
            &command_pool,
            &descriptor_pool,
            &frame_set_layout,
            &shadow_map,
            &shadow_sampler,
        )?;

        let image_sync = Self::create_image_sync(&device, swapchain.image_count() as usize)?;

        let lights = LightsUbo::from_scene(
            &scene,
            ShadowMap::light_view_projection(scene.directional.direction),
        );
        let background = [
            scene.background.x,
            scene.background.y,
            scene.background.z,
            1.0,
        ];

        let mut camera = Camera::new(
            config.camera.fov_deg.to_radians(),
            width as f32 / height as f32,
            config.camera.near,
            config.camera.far,
        );
        let orbit = OrbitController::from_camera(CAMERA_START, CAMERA_TARGET);
        orbit.update_camera(&mut camera);

        info!(
            "Renderer initialized: {} swapchain images, {} frames in flight, {} objects",
            swapchain.image_count(),
            MAX_FRAMES_IN_FLIGHT,
            draws.len()
        );

        Ok(Self {
            device: ManuallyDrop::new(device),
            instance: ManuallyDrop::new(instance),
            surface: ManuallyDrop::new(surface),
            swapchain: ManuallyDrop::new(swapchain),
            depth_buffer: ManuallyDrop::new(depth_buffer),
            shadow_map: ManuallyDrop::new(shadow_map),
            albedo_sampler: ManuallyDrop::new(albedo_sampler),
            shadow_sampler: ManuallyDrop::new(shadow_sampler),
            frame_set_layout: ManuallyDrop::new(frame_set_layout),
            texture_set_layout: ManuallyDrop::new(texture_set_layout),
            descriptor_pool: ManuallyDrop::new(descriptor_pool),
            scene_pipeline: ManuallyDrop::new(scene_pipeline),
            scene_pipeline_layout: ManuallyDrop::new(scene_pipeline_layout),
            shadow_pipeline: ManuallyDrop::new(shadow_pipeline),
            shadow_pipeline_layout: ManuallyDrop::new(shadow_pipeline_layout),
            command_pool: ManuallyDrop::new(command_pool),
            textures,
            texture_sets,
            draws,
            background,
            lights,
            frames,
            image_sync,
            current_frame: 0,
            current_semaphore: 0,
            camera,
            orbit,
            framebuffer_resized: false,
            width,
            height,
        })
    }

    /// Uploads the white fallback texture plus every texture the scene's
    /// materials reference. Returns the textures and a name-to-slot map;
    /// untextured materials use slot 0.
    fn upload_textures(
        device: &Arc<Device>,
        pool: &CommandPool,
        scene: &Scene,
        config: &Config,
    ) -> RhiResult<(Vec<Texture>, HashMap<String, usize>)> {
        let mut textures = Vec::new();
        let mut indices = HashMap::new();

        let white = TextureImage::white();
        textures.push(Texture::from_rgba8(
            device.clone(),
            pool,
            &white.pixels,
            white.width,
            white.height,
        )?);

        for key in scene.texture_keys() {
            let image = TextureImage::load_or_fallback(&config.assets.texture_dir, key);
            let texture =
                Texture::from_rgba8(device.clone(), pool, &image.pixels, image.width, image.height)?;
            indices.insert(key.to_string(), textures.len());
            textures.push(texture);
        }

        info!("Uploaded {} textures", textures.len());

        Ok((textures, indices))
    }

    /// Creates the descriptor layouts and a pool sized for the per-frame
    /// sets plus one set per texture.
    fn create_descriptor_resources(
        device: &Arc<Device>,
        texture_count: u32,
    ) -> RhiResult<(DescriptorSetLayout, DescriptorSetLayout, DescriptorPool)> {
        // Set 0, per frame: camera UBO, lights UBO, shadow map
        let frame_bindings = [
            DescriptorBindingBuilder::uniform_buffer(
                0,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            ),
            DescriptorBindingBuilder::uniform_buffer(
                1,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            ),
            DescriptorBindingBuilder::combined_image_sampler(2, vk::ShaderStageFlags::FRAGMENT),
        ];
        let frame_set_layout = DescriptorSetLayout::new(device.clone(), &frame_bindings)?;

        // Set 1, per texture: albedo
        let texture_bindings = [DescriptorBindingBuilder::combined_image_sampler(
            0,
            vk::ShaderStageFlags::FRAGMENT,
        )];
        let texture_set_layout = DescriptorSetLayout::new(device.clone(), &texture_bindings)?;

        let frames = MAX_FRAMES_IN_FLIGHT as u32;
        let pool_sizes = [
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(frames * 2),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .descriptor_count(frames + texture_count),
        ];
        let descriptor_pool =
            DescriptorPool::new(device.clone(), frames + texture_count, &pool_sizes)?;

        Ok((frame_set_layout, texture_set_layout, descriptor_pool))
    }

    /// Builds the lit scene pipeline.
    fn create_scene_pipeline(
        device: Arc<Device>,
        config: &Config,
        frame_set_layout: &DescriptorSetLayout,
        texture_set_layout: &DescriptorSetLayout,
        swapchain_format: vk::Format,
    ) -> RhiResult<(Pipeline, PipelineLayout)> {
        let shader_dir = &config.assets.shader_dir;

        let vertex_shader = Shader::from_spirv_file(
            device.clone(),
            &shader_dir.join("scene.vert.spv"),
            ShaderStage::Vertex,
            "main",
        )?;
        let fragment_shader = Shader::from_spirv_file(
            device.clone(),
            &shader_dir.join("scene.frag.spv"),
            ShaderStage::Fragment,
            "main",
        )?;

        let push_range = vk::PushConstantRange {
            stage_flags: vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            offset: 0,
            size: ObjectPush::SIZE as u32,
        };
        let pipeline_layout = PipelineLayout::new(
            device.clone(),
            &[frame_set_layout.handle(), texture_set_layout.handle()],
            &[push_range],
        )?;

        // The Y-flipped projection reverses on-screen winding; skip
        // culling rather than flipping the front face, as every mesh is
        // closed.
        let pipeline = GraphicsPipelineBuilder::new()
            .vertex_shader(&vertex_shader)
            .fragment_shader(&fragment_shader)
            .vertex_binding(Vertex::binding_description())
            .vertex_attributes(&Vertex::attribute_descriptions())
            .color_attachment_format(swapchain_format)
            .depth_attachment_format(DEPTH_FORMAT)
            .cull_mode(CullMode::None)
            .build(device, &pipeline_layout)?;

        info!("Scene pipeline created");

        Ok((pipeline, pipeline_layout))
    }

    /// Builds the depth-only shadow pipeline.
    fn create_shadow_pipeline(
        device: Arc<Device>,
        config: &Config,
        frame_set_layout: &DescriptorSetLayout,
    ) -> RhiResult<(Pipeline, PipelineLayout)> {
        let vertex_shader = Shader::from_spirv_file(
            device.clone(),
            &config.assets.shader_dir.join("shadow.vert.spv"),
            ShaderStage::Vertex,
            "main",
        )?;

        let push_range = vk::PushConstantRange {
            stage_flags: vk::ShaderStageFlags::VERTEX,
            offset: 0,
            size: ShadowPush::SIZE as u32,
        };
        let pipeline_layout =
            PipelineLayout::new(device.clone(), &[frame_set_layout.handle()], &[push_range])?;

        let pipeline = GraphicsPipelineBuilder::new()
            .vertex_shader(&vertex_shader)
            .vertex_binding(Vertex::binding_description())
            .vertex_attributes(&Vertex::attribute_descriptions())
            .depth_attachment_format(DEPTH_FORMAT)
            .depth_bias(SHADOW_BIAS_CONSTANT, SHADOW_BIAS_SLOPE)
            .cull_mode(CullMode::None)
            .build(device, &pipeline_layout)?;

        info!("Shadow pipeline created");

        Ok((pipeline, pipeline_layout))
    }

    /// Uploads every scene object's mesh and bakes its push constants.
    fn upload_scene(
        device: &Arc<Device>,
        scene: &Scene,
        texture_indices: &HashMap<String, usize>,
    ) -> RhiResult<Vec<ObjectDraw>> {
        let mut draws = Vec::with_capacity(scene.objects.len());

        for object in &scene.objects {
            let mesh = GpuMesh::upload(device.clone(), &object.mesh)?;
            let model = object.transform.local_matrix();

            let texture_index = match object.material.texture.as_deref() {
                Some(key) => *texture_indices.get(key).unwrap_or(&0),
                None => 0,
            };

            debug!(
                "Uploaded '{}': {} triangles, texture slot {}",
                object.name,
                object.mesh.triangle_count(),
                texture_index
            );

            draws.push(ObjectDraw {
                mesh,
                push: ObjectPush::new(model, &object.material, object.receive_shadow),
                shadow_push: ShadowPush { model },
                texture_index,
                cast_shadow: object.cast_shadow,
            });
        }

        Ok(draws)
    }

    /// Allocates and writes one descriptor set per texture.
    fn create_texture_sets(
        device: &Arc<Device>,
        descriptor_pool: &DescriptorPool,
        texture_set_layout: &DescriptorSetLayout,
        textures: &[Texture],
        albedo_sampler: &Sampler,
    ) -> RhiResult<Vec<vk::DescriptorSet>> {
        let layouts: Vec<_> = textures.iter().map(|_| texture_set_layout.handle()).collect();
        let sets = descriptor_pool.allocate(&layouts)?;

        for (&set, texture) in sets.iter().zip(textures) {
            let infos = [image_info(
                albedo_sampler.handle(),
                texture.view(),
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            )];
            let write = vk::WriteDescriptorSet::default()
                .dst_set(set)
                .dst_binding(0)
                .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .image_info(&infos);
            update_descriptor_sets(device, &[write]);
        }

        Ok(sets)
    }

    /// Creates the per-frame fences, command buffers, uniform buffers, and
    /// descriptor sets.
    fn create_frames(
        device: &Arc<Device>,
        command_pool: &CommandPool,
        descriptor_pool: &DescriptorPool,
        frame_set_layout: &DescriptorSetLayout,
        shadow_map: &ShadowMap,
        shadow_sampler: &Sampler,
    ) -> RhiResult<Vec<FrameData>> {
        let layouts = [frame_set_layout.handle(); MAX_FRAMES_IN_FLIGHT];
        let descriptor_sets = descriptor_pool.allocate(&layouts)?;

        let mut frames = Vec::with_capacity(MAX_FRAMES_IN_FLIGHT);

        for (i, &descriptor_set) in descriptor_sets.iter().enumerate() {
            let fence = Fence::new(device.clone(), true)?;
            let command_buffer = CommandBuffer::new(device.clone(), command_pool)?;

            let camera_ubo =
                Buffer::new(device.clone(), BufferUsage::Uniform, CameraUbo::SIZE as u64)?;
            let lights_ubo =
                Buffer::new(device.clone(), BufferUsage::Uniform, LightsUbo::SIZE as u64)?;

            let camera_infos = [buffer_info(camera_ubo.handle(), 0, CameraUbo::SIZE as u64)];
            let lights_infos = [buffer_info(lights_ubo.handle(), 0, LightsUbo::SIZE as u64)];
            let shadow_infos = [image_info(
                shadow_sampler.handle(),
                shadow_map.view(),
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            )];

            let writes = [
                vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(0)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&camera_infos),
                vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(1)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&lights_infos),
                vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(2)
                    .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                    .image_info(&shadow_infos),
            ];
            update_descriptor_sets(device, &writes);

            debug!("Created frame data for frame {}", i);

            frames.push(FrameData {
                fence,
                command_buffer,
                camera_ubo,
                lights_ubo,
                descriptor_set,
            });
        }

        Ok(frames)
    }

    /// Creates per-swapchain-image semaphores.
    fn create_image_sync(device: &Arc<Device>, count: usize) -> RhiResult<Vec<ImageSync>> {
        (0..count)
            .map(|_| {
                Ok(ImageSync {
                    image_available: Semaphore::new(device.clone())?,
                    render_finished: Semaphore::new(device.clone())?,
                })
            })
            .collect()
    }

    /// Notifies the renderer of a window resize. The swapchain is
    /// recreated on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to zero dimensions");
            return;
        }

        if width != self.width || height != self.height {
            debug!(
                "Resize triggered: {}x{} -> {}x{}",
                self.width, self.height, width, height
            );
            self.width = width;
            self.height = height;
            self.framebuffer_resized = true;

            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// Drives the orbit controller from the frame's input.
    ///
    /// Left drag rotates around the room, scroll zooms.
    pub fn update(&mut self, input: &InputState, _delta_time: f32) {
        let (dx, dy) = input.mouse_delta();

        // Skip the press frame so accumulated motion doesn't jump the view.
        if input.is_mouse_pressed(MouseButton::Left)
            && !input.is_mouse_just_pressed(MouseButton::Left)
        {
            let dx = dx.clamp(-MAX_MOUSE_DELTA, MAX_MOUSE_DELTA);
            let dy = dy.clamp(-MAX_MOUSE_DELTA, MAX_MOUSE_DELTA);
            self.orbit.rotate(dx, dy);
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.orbit.zoom(scroll);
        }

        self.orbit.update_camera(&mut self.camera);
    }

    /// Renders one frame: shadow pass, scene pass, present.
    ///
    /// # Errors
    ///
    /// Returns an error when a Vulkan operation fails. Out-of-date
    /// swapchains are handled internally by recreating.
    pub fn render_frame(&mut self) -> RhiResult<()> {
        if self.framebuffer_resized {
            debug!("Resize requested, recreating swapchain before acquire");
            self.recreate_swapchain()?;
        }

        self.frames[self.current_frame].fence.wait(u64::MAX)?;

        let acquire_semaphore = self.image_sync[self.current_semaphore]
            .image_available
            .handle();

        let (image_index, _suboptimal) = match self.swapchain.acquire_next_image(acquire_semaphore)
        {
            Ok(result) => result,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                debug!("Swapchain out of date, recreating");
                self.recreate_swapchain()?;
                return Ok(());
            }
            Err(e) => return Err(RhiError::VulkanError(e)),
        };

        self.frames[self.current_frame].fence.reset()?;

        self.update_uniform_buffers()?;
        self.record_commands(image_index)?;

        let frame = &self.frames[self.current_frame];
        let image_sync = &self.image_sync[image_index as usize];

        let wait_semaphores = [acquire_semaphore];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [image_sync.render_finished.handle()];
        let command_buffers = [frame.command_buffer.handle()];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .submit_graphics(&[submit_info], frame.fence.handle())?;
        }

        let present_result = self.swapchain.present(
            self.device.present_queue(),
            image_index,
            image_sync.render_finished.handle(),
        );

        self.current_semaphore = (self.current_semaphore + 1) % self.image_sync.len();
        self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;

        let should_recreate = match present_result {
            Ok(suboptimal) => suboptimal,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) | Err(vk::Result::SUBOPTIMAL_KHR) => true,
            Err(e) => return Err(RhiError::VulkanError(e)),
        };

        if should_recreate {
            debug!("Swapchain suboptimal after present, recreating");
            self.recreate_swapchain()?;
        }

        Ok(())
    }

    /// Recreates the swapchain, depth buffer, and per-image semaphores for
    /// the current window size.
    fn recreate_swapchain(&mut self) -> RhiResult<()> {
        self.device.wait_idle()?;

        self.swapchain.recreate(
            &self.instance,
            self.surface.handle(),
            self.width,
            self.height,
        )?;

        let new_depth = DepthBuffer::new(
            Arc::clone(&self.device),
            self.swapchain.width(),
            self.swapchain.height(),
        )?;
        unsafe {
            ManuallyDrop::drop(&mut self.depth_buffer);
        }
        self.depth_buffer = ManuallyDrop::new(new_depth);

        self.image_sync =
            Self::create_image_sync(&self.device, self.swapchain.image_count() as usize)?;
        self.current_semaphore = 0;

        self.framebuffer_resized = false;
        Ok(())
    }

    /// Writes this frame's camera and lights uniforms.
    fn update_uniform_buffers(&self) -> RhiResult<()> {
        let frame = &self.frames[self.current_frame];

        let camera = CameraUbo::new(
            self.camera.view_matrix(),
            self.camera.projection_matrix(),
            self.camera.position,
        );
        frame.camera_ubo.upload(bytemuck::bytes_of(&camera))?;
        frame.lights_ubo.upload(bytemuck::bytes_of(&self.lights))?;

        Ok(())
    }

    /// Records the shadow pass and the scene pass.
    fn record_commands(&self, image_index: u32) -> RhiResult<()> {
        let frame = &self.frames[self.current_frame];
        let cmd = &frame.command_buffer;

        cmd.reset()?;
        cmd.begin()?;

        self.record_shadow_pass(cmd, frame.descriptor_set);
        self.record_scene_pass(cmd, frame.descriptor_set, image_index);

        cmd.end()?;
        Ok(())
    }

    /// Depth-only pass rendering shadow casters from the light.
    fn record_shadow_pass(&self, cmd: &CommandBuffer, descriptor_set: vk::DescriptorSet) {
        self.transition_image(
            cmd,
            self.shadow_map.image(),
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL,
            vk::ImageAspectFlags::DEPTH,
        );

        let extent = self.shadow_map.extent();
        let config = RenderingConfig::from_extent(extent)
            .with_depth_attachment(DepthAttachment::new(self.shadow_map.view()).store());
        let bundle = config.build();

        cmd.begin_rendering(&bundle.info());

        cmd.bind_pipeline(vk::PipelineBindPoint::GRAPHICS, self.shadow_pipeline.handle());
        cmd.set_viewport(&full_viewport(extent));
        cmd.set_scissor(&full_scissor(extent));
        cmd.bind_descriptor_sets(
            vk::PipelineBindPoint::GRAPHICS,
            self.shadow_pipeline_layout.handle(),
            0,
            &[descriptor_set],
            &[],
        );

        for draw in self.draws.iter().filter(|d| d.cast_shadow) {
            cmd.bind_vertex_buffers(0, &[draw.mesh.vertex_buffer().handle()], &[0]);
            cmd.bind_index_buffer(draw.mesh.index_buffer().handle(), 0, vk::IndexType::UINT32);
            cmd.push_constants(
                self.shadow_pipeline_layout.handle(),
                vk::ShaderStageFlags::VERTEX,
                0,
                &draw.shadow_push,
            );
            cmd.draw_indexed(draw.mesh.index_count(), 1, 0, 0, 0);
        }

        cmd.end_rendering();

        // Shadow depth becomes readable before any scene fragment samples it.
        self.transition_image(
            cmd,
            self.shadow_map.image(),
            vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::ImageAspectFlags::DEPTH,
        );
    }

    /// Lit pass over the swapchain image.
    fn record_scene_pass(
        &self,
        cmd: &CommandBuffer,
        descriptor_set: vk::DescriptorSet,
        image_index: u32,
    ) {
        let color_image = self.swapchain.image(image_index as usize);

        self.transition_image(
            cmd,
            color_image,
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::ImageAspectFlags::COLOR,
        );
        self.transition_image(
            cmd,
            self.depth_buffer.image(),
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL,
            vk::ImageAspectFlags::DEPTH,
        );

        let extent = self.swapchain.extent();
        let config = RenderingConfig::from_extent(extent)
            .with_color_attachment(
                ColorAttachment::new(self.swapchain.image_view(image_index as usize))
                    .with_clear_color(self.background),
            )
            .with_depth_attachment(DepthAttachment::new(self.depth_buffer.view()));
        let bundle = config.build();

        cmd.begin_rendering(&bundle.info());

        cmd.bind_pipeline(vk::PipelineBindPoint::GRAPHICS, self.scene_pipeline.handle());
        cmd.set_viewport(&full_viewport(extent));
        cmd.set_scissor(&full_scissor(extent));
        cmd.bind_descriptor_sets(
            vk::PipelineBindPoint::GRAPHICS,
            self.scene_pipeline_layout.handle(),
            0,
            &[descriptor_set],
            &[],
        );

        for draw in &self.draws {
            cmd.bind_descriptor_sets(
                vk::PipelineBindPoint::GRAPHICS,
                self.scene_pipeline_layout.handle(),
                1,
                &[self.texture_sets[draw.texture_index]],
                &[],
            );
            cmd.bind_vertex_buffers(0, &[draw.mesh.vertex_buffer().handle()], &[0]);
            cmd.bind_index_buffer(draw.mesh.index_buffer().handle(), 0, vk::IndexType::UINT32);
            cmd.push_constants(
                self.scene_pipeline_layout.handle(),
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                0,
                &draw.push,
            );
            cmd.draw_indexed(draw.mesh.index_count(), 1, 0, 0, 0);
        }

        cmd.end_rendering();

        self.transition_image(
            cmd,
            color_image,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::ImageLayout::PRESENT_SRC_KHR,
            vk::ImageAspectFlags::COLOR,
        );
    }

    /// Records an image layout transition with stage masks matched to the
    /// transitions this renderer performs.
    fn transition_image(
        &self,
        cmd: &CommandBuffer,
        image: vk::Image,
        old_layout: vk::ImageLayout,
        new_layout: vk::ImageLayout,
        aspect_mask: vk::ImageAspectFlags,
    ) {
        let (src_stage, src_access, dst_stage, dst_access) = match (old_layout, new_layout) {
            (vk::ImageLayout::UNDEFINED, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL) => (
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::AccessFlags::empty(),
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            ),
            (vk::ImageLayout::UNDEFINED, vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL) => (
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::AccessFlags::empty(),
                vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
                vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            ),
            (
                vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL,
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            ) => (
                vk::PipelineStageFlags::LATE_FRAGMENT_TESTS,
                vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
                vk::PipelineStageFlags::FRAGMENT_SHADER,
                vk::AccessFlags::SHADER_READ,
            ),
            (vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL, vk::ImageLayout::PRESENT_SRC_KHR) => (
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
                vk::PipelineStageFlags::BOTTOM_OF_PIPE,
                vk::AccessFlags::empty(),
            ),
            _ => {
                warn!(
                    "Unhandled layout transition: {:?} -> {:?}",
                    old_layout, new_layout
                );
                (
                    vk::PipelineStageFlags::ALL_COMMANDS,
                    vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE,
                    vk::PipelineStageFlags::ALL_COMMANDS,
                    vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE,
                )
            }
        };

        let barrier = vk::ImageMemoryBarrier::default()
            .old_layout(old_layout)
            .new_layout(new_layout)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(image)
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(aspect_mask)
                    .base_mip_level(0)
                    .level_count(1)
                    .base_array_layer(0)
                    .layer_count(1),
            )
            .src_access_mask(src_access)
            .dst_access_mask(dst_access);

        cmd.pipeline_barrier(src_stage, dst_stage, &[barrier]);
    }

    /// Current camera, for inspection.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

fn full_viewport(extent: vk::Extent2D) -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width as f32,
        height: extent.height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

fn full_scissor(extent: vk::Extent2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: 0, y: 0 },
        extent,
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(e) = self.device.wait_idle() {
            error!("Failed to wait for device idle during drop: {:?}", e);
        }

        // Device-level resources first; each holds its own Arc<Device>.
        self.frames.clear();
        self.image_sync.clear();
        self.draws.clear();
        self.textures.clear();
        self.texture_sets.clear();

        unsafe {
            ManuallyDrop::drop(&mut self.scene_pipeline);
            ManuallyDrop::drop(&mut self.shadow_pipeline);
            ManuallyDrop::drop(&mut self.scene_pipeline_layout);
            ManuallyDrop::drop(&mut self.shadow_pipeline_layout);
            ManuallyDrop::drop(&mut self.descriptor_pool);
            ManuallyDrop::drop(&mut self.frame_set_layout);
            ManuallyDrop::drop(&mut self.texture_set_layout);
            ManuallyDrop::drop(&mut self.albedo_sampler);
            ManuallyDrop::drop(&mut self.shadow_sampler);
            ManuallyDrop::drop(&mut self.command_pool);
            ManuallyDrop::drop(&mut self.shadow_map);
            ManuallyDrop::drop(&mut self.depth_buffer);
            ManuallyDrop::drop(&mut self.swapchain);
            ManuallyDrop::drop(&mut self.surface);
            // The device's last reference drops before the instance.
            ManuallyDrop::drop(&mut self.device);
            ManuallyDrop::drop(&mut self.instance);
        }

        info!("Renderer destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_covers_extent() {
        let viewport = full_viewport(vk::Extent2D {
            width: 1280,
            height: 720,
        });
        assert_eq!(viewport.width, 1280.0);
        assert_eq!(viewport.height, 720.0);
        assert_eq!(viewport.min_depth, 0.0);
        assert_eq!(viewport.max_depth, 1.0);
    }

    #[test]
    fn test_scissor_covers_extent() {
        let scissor = full_scissor(vk::Extent2D {
            width: 800,
            height: 600,
        });
        assert_eq!(scissor.offset.x, 0);
        assert_eq!(scissor.extent.width, 800);
    }

    #[test]
    fn test_shadow_bias_is_positive() {
        assert!(SHADOW_BIAS_CONSTANT > 0.0);
        assert!(SHADOW_BIAS_SLOPE > 0.0);
    }
}
