pub mod camera;
pub mod core;
pub mod fireflies;
pub mod loading;
pub mod materials;
pub mod render_loop;
pub mod scene;
pub mod systems;
