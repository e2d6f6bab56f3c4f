//! Scene description for the roomview scene viewer.
//!
//! Everything the renderer draws is described here:
//! - Transforms, the perspective camera, and the orbit controller
//! - Light definitions
//! - Procedural mesh primitives (box, cylinder, cone)
//! - Materials and scene objects
//! - The hand-authored living-room scene itself

pub mod camera;
pub mod light;
pub mod material;
pub mod orbit;
pub mod primitive;
pub mod room;
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{AmbientLight, DirectionalLight, PointLight, SpotLight};
pub use material::Material;
pub use orbit::OrbitController;
pub use primitive::MeshData;
pub use scene::{Scene, SceneObject};
pub use transform::Transform;
