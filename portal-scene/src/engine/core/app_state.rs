use bevy::prelude::*;

use crate::rpc::web_rpc::WebRpcInterface;

/// Progress of the diorama model, independent of the render loop.
///
/// Fireflies render in every state; only `Composed` has the model attached.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum SceneState {
    #[default]
    Loading,
    Composed,
    Failed,
}

impl SceneState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneState::Loading => "loading",
            SceneState::Composed => "composed",
            SceneState::Failed => "failed",
        }
    }
}

#[derive(Component)]
pub struct FpsText;

// Tell the debug panel once composition has settled.
pub fn notify_scene_state(state: Res<State<SceneState>>, mut rpc_interface: ResMut<WebRpcInterface>) {
    println!("→ Scene {}", state.get().as_str());
    rpc_interface.send_notification(
        "scene_state",
        serde_json::json!({
            "state": state.get().as_str()
        }),
    );
}
