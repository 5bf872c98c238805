pub mod gltf;
pub mod procedural;

pub use self::gltf::{load_model, GltfAssetLoader};
pub use self::procedural::ProceduralAssetLoader;
