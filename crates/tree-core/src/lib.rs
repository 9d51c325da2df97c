pub mod ambient;
pub mod animate;
pub mod camera;
pub mod clock;
pub mod constants;
pub mod error;
pub mod instance;
pub mod layout;
pub mod lighting;
pub mod mode;
pub mod palette;
pub mod particles;
pub mod photos;
pub mod pick;
pub mod scene;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static PHOTO_WGSL: &str = include_str!("../shaders/photo.wgsl");

pub use camera::{Camera, CameraRig};
pub use clock::FrameClock;
pub use error::SceneError;
pub use instance::{Batch, Instance, InstanceBatches, InstanceRaw};
pub use lighting::{LightRaw, LightSlot, Lighting, PointLight};
pub use mode::{AppMode, InputEvent, SceneState, Zoom};
pub use particles::{Category, ParticleDataset, ParticleRecord};
pub use photos::{ImageSource, ImageStatus, LoadTicket, PhotoPose};
pub use scene::{Scene, SceneConfig};
