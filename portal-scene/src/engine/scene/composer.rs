use bevy::prelude::*;
use constants::class::{BAKED_NODE, POLE_LIGHT_A_NODE, POLE_LIGHT_B_NODE, PORTAL_LIGHT_NODE};
use thiserror::Error;

use crate::engine::core::app_state::SceneState;
use crate::engine::core::settings::SceneSettings;
use crate::engine::loading::model_loader::{LoadedModel, ModelLoaded};
use crate::engine::materials::MaterialBank;
use crate::engine::materials::portal_material::PortalMaterial;

/// Root of the attached diorama.
#[derive(Component)]
pub struct PortalModel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("model has no node named `{0}`")]
    MissingNode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlannedMaterial {
    Standard(Handle<StandardMaterial>),
    Portal(Handle<PortalMaterial>),
}

#[derive(Debug, Clone)]
pub struct PlannedNode {
    pub name: String,
    pub transform: Transform,
    pub parts: Vec<(Handle<Mesh>, PlannedMaterial)>,
}

/// Material assignment for every mesh node, resolved before anything spawns.
#[derive(Debug, Clone)]
pub struct CompositionPlan {
    pub nodes: Vec<PlannedNode>,
}

impl CompositionPlan {
    /// Check every required node exists, then pick a material per primitive.
    ///
    /// Fails on the first required name missing from the model.
    pub fn resolve(
        model: &LoadedModel,
        required: &[String],
        bank: &MaterialBank,
    ) -> Result<Self, CompositionError> {
        if let Some(missing) = required.iter().find(|name| model.node(name).is_none()) {
            return Err(CompositionError::MissingNode(missing.clone()));
        }

        let nodes = model
            .nodes
            .iter()
            .map(|node| {
                let assigned = match node.name.as_str() {
                    BAKED_NODE => Some(PlannedMaterial::Standard(bank.baked.clone())),
                    POLE_LIGHT_A_NODE | POLE_LIGHT_B_NODE => {
                        Some(PlannedMaterial::Standard(bank.pole_light.clone()))
                    }
                    PORTAL_LIGHT_NODE => Some(PlannedMaterial::Portal(bank.portal.clone())),
                    _ => None,
                };

                let parts = node
                    .primitives
                    .iter()
                    .map(|primitive| {
                        let material = assigned.clone().unwrap_or_else(|| {
                            PlannedMaterial::Standard(
                                primitive.material.clone().unwrap_or_default(),
                            )
                        });
                        (primitive.mesh.clone(), material)
                    })
                    .collect();

                PlannedNode {
                    name: node.name.clone(),
                    transform: node.transform,
                    parts,
                }
            })
            .collect();

        Ok(Self { nodes })
    }

    /// Attach the plan as a single root-level subtree.
    pub fn spawn(self, commands: &mut Commands) -> Entity {
        commands
            .spawn((
                PortalModel,
                Name::new("portal"),
                Transform::IDENTITY,
                Visibility::default(),
            ))
            .with_children(|root| {
                for node in self.nodes {
                    root.spawn((
                        Name::new(node.name),
                        node.transform,
                        Visibility::default(),
                    ))
                    .with_children(|parent| {
                        for (mesh, material) in node.parts {
                            match material {
                                PlannedMaterial::Standard(handle) => {
                                    parent.spawn((Mesh3d(mesh), MeshMaterial3d(handle)));
                                }
                                PlannedMaterial::Portal(handle) => {
                                    parent.spawn((Mesh3d(mesh), MeshMaterial3d(handle)));
                                }
                            }
                        }
                    });
                }
            })
            .id()
    }
}

/// Continuation for the model request: compose on success, record the fault
/// otherwise. Fireflies keep rendering either way.
pub fn compose_on_load(
    mut commands: Commands,
    mut outcomes: EventReader<ModelLoaded>,
    bank: Option<Res<MaterialBank>>,
    settings: Res<SceneSettings>,
    mut next_state: ResMut<NextState<SceneState>>,
) {
    for ModelLoaded(outcome) in outcomes.read() {
        let Some(bank) = bank.as_deref() else {
            error!("Model arrived before the material bank was built");
            next_state.set(SceneState::Failed);
            continue;
        };

        let model = match outcome {
            Ok(model) => model,
            Err(err) => {
                error!("Scene not composed: {err}");
                next_state.set(SceneState::Failed);
                continue;
            }
        };

        match CompositionPlan::resolve(model, &settings.required_nodes, bank) {
            Ok(plan) => {
                let count = plan.nodes.len();
                plan.spawn(&mut commands);
                println!("✓ Portal scene composed ({count} nodes)");
                next_state.set(SceneState::Composed);
            }
            Err(err) => {
                error!("Scene not composed: {err}");
                next_state.set(SceneState::Failed);
            }
        }
    }
}
