use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub texture_loaded: bool,
    pub texture_failed: bool,
    pub model_requested: bool,
    pub model_settled: bool,
}

impl LoadingProgress {
    pub fn texture_settled(&self) -> bool {
        self.texture_loaded || self.texture_failed
    }
}
