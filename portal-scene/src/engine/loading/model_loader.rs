use std::collections::{HashMap, HashSet};

use bevy::asset::{AssetId, LoadState, RecursiveDependencyLoadState};
use bevy::gltf::{Gltf, GltfMesh, GltfNode};
use bevy::prelude::*;
use thiserror::Error;

use crate::engine::core::settings::SceneSettings;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetLoadError {
    #[error("failed to load model {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("model {0} finished loading but is no longer available")]
    Missing(String),
}

/// One drawable piece of a node: a mesh and the material the file gave it.
#[derive(Debug, Clone)]
pub struct LoadedPrimitive {
    pub mesh: Handle<Mesh>,
    pub material: Option<Handle<StandardMaterial>>,
}

#[derive(Debug, Clone)]
pub struct LoadedNode {
    pub name: String,
    /// Model-space transform, parents already folded in.
    pub transform: Transform,
    pub primitives: Vec<LoadedPrimitive>,
}

/// Mesh-bearing nodes of a loaded model, flattened in file order.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub nodes: Vec<LoadedNode>,
}

impl LoadedModel {
    pub fn node(&self, name: &str) -> Option<&LoadedNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Walk the node graph from its roots and keep every node that owns a mesh.
    ///
    /// Covers every node in the file: `Gltf` keeps no node list per scene, so
    /// the model is expected to hold a single scene.
    pub fn from_gltf(
        gltf: &Gltf,
        gltf_nodes: &Assets<GltfNode>,
        gltf_meshes: &Assets<GltfMesh>,
    ) -> Self {
        let child_ids: HashSet<AssetId<GltfNode>> = gltf
            .nodes
            .iter()
            .filter_map(|handle| gltf_nodes.get(handle))
            .flat_map(|node| node.children.iter().map(Handle::id))
            .collect();

        let mut world_transforms: HashMap<AssetId<GltfNode>, Transform> = HashMap::new();
        let mut stack: Vec<(Handle<GltfNode>, Transform)> = gltf
            .nodes
            .iter()
            .filter(|handle| !child_ids.contains(&handle.id()))
            .map(|handle| (handle.clone(), Transform::IDENTITY))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(node) = gltf_nodes.get(&handle) else {
                continue;
            };
            let world = parent.mul_transform(node.transform);
            world_transforms.insert(handle.id(), world);
            for child in &node.children {
                stack.push((child.clone(), world));
            }
        }

        let nodes = gltf
            .nodes
            .iter()
            .filter_map(|handle| {
                let node = gltf_nodes.get(handle)?;
                let mesh = gltf_meshes.get(node.mesh.as_ref()?)?;
                let transform = world_transforms
                    .get(&handle.id())
                    .copied()
                    .unwrap_or(node.transform);
                Some(LoadedNode {
                    name: node.name.clone(),
                    transform,
                    primitives: mesh
                        .primitives
                        .iter()
                        .map(|primitive| LoadedPrimitive {
                            mesh: primitive.mesh.clone(),
                            material: primitive.material.clone(),
                        })
                        .collect(),
                })
            })
            .collect();

        Self { nodes }
    }
}

/// Outcome of the single model request. Sent exactly once.
#[derive(Event, Debug, Clone)]
pub struct ModelLoaded(pub Result<LoadedModel, AssetLoadError>);

#[derive(Resource, Default)]
pub struct ModelLoader {
    pub handle: Option<Handle<Gltf>>,
    path: String,
}

pub fn start_loading(
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    mut loader: ResMut<ModelLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    if loading_progress.model_requested {
        return;
    }

    loader.handle = Some(asset_server.load(settings.model_path.clone()));
    loader.path = settings.model_path.clone();
    loading_progress.model_requested = true;
    println!("→ Loading model {}", settings.model_path);
}

/// Poll the model until it and every mesh it references settle, then emit
/// the outcome.
pub fn check_model_loading(
    asset_server: Res<AssetServer>,
    loader: Res<ModelLoader>,
    mut loading_progress: ResMut<LoadingProgress>,
    gltfs: Res<Assets<Gltf>>,
    gltf_nodes: Res<Assets<GltfNode>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    mut outcomes: EventWriter<ModelLoaded>,
) {
    if loading_progress.model_settled {
        return;
    }
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    let outcome = if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        Err(AssetLoadError::Fetch {
            path: loader.path.clone(),
            reason: err.to_string(),
        })
    } else {
        match asset_server.get_recursive_dependency_load_state(handle) {
            Some(RecursiveDependencyLoadState::Loaded) => match gltfs.get(handle) {
                Some(gltf) => Ok(LoadedModel::from_gltf(gltf, &gltf_nodes, &gltf_meshes)),
                None => Err(AssetLoadError::Missing(loader.path.clone())),
            },
            Some(RecursiveDependencyLoadState::Failed(err)) => Err(AssetLoadError::Fetch {
                path: loader.path.clone(),
                reason: err.to_string(),
            }),
            _ => return,
        }
    };

    match &outcome {
        Ok(model) => println!("✓ Model loaded ({} mesh nodes)", model.nodes.len()),
        Err(err) => error!("{err}"),
    }
    loading_progress.model_settled = true;
    outcomes.write(ModelLoaded(outcome));
}
