pub mod color;
pub mod loader;
pub mod mesh;
pub mod placement;
pub mod preferences;
pub mod project;
pub mod scene;
