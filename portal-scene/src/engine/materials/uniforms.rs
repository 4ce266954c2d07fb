use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

use super::MaterialBank;
use super::firefly_material::FireflyMaterial;
use super::portal_material::PortalMaterial;

/// Shader materials that accept external uniform writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    Portal,
    Fireflies,
}

impl MaterialKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKey::Portal => "portal",
            MaterialKey::Fireflies => "fireflies",
        }
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialKey {
    type Err = UniformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portal" => Ok(MaterialKey::Portal),
            "fireflies" | "firefly" => Ok(MaterialKey::Fireflies),
            other => Err(UniformError::UnknownMaterial(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Color(Color),
}

impl UniformValue {
    fn kind(&self) -> &'static str {
        match self {
            UniformValue::Scalar(_) => "scalar",
            UniformValue::Color(_) => "colour",
        }
    }
}

/// Request to change one uniform on one material.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SetUniform {
    pub material: MaterialKey,
    pub name: String,
    pub value: UniformValue,
}

impl SetUniform {
    pub fn new(material: MaterialKey, name: impl Into<String>, value: UniformValue) -> Self {
        Self {
            material,
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UniformError {
    #[error("unknown material `{0}`")]
    UnknownMaterial(String),
    #[error("material `{material}` has no uniform named `{name}`")]
    UnknownUniform { material: MaterialKey, name: String },
    #[error("uniform `{0}` is driven by the render loop and cannot be set")]
    ReadOnly(String),
    #[error("uniform `{name}` expects a {expected} value, got a {actual}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("material `{0}` is not loaded")]
    MissingMaterial(MaterialKey),
}

impl SetUniform {
    /// Check the uniform name, its value kind and that it is writable.
    ///
    /// Needs no material data, so requests can be rejected before they are
    /// queued. Whether the material is loaded is only known when applying.
    pub fn validate(&self) -> Result<(), UniformError> {
        match (self.material, self.name.as_str()) {
            (MaterialKey::Portal, "color_start" | "color_end") => expect_color(self).map(|_| ()),
            (MaterialKey::Fireflies, "size") => expect_scalar(self).map(|_| ()),
            (_, "time") | (MaterialKey::Fireflies, "pixel_ratio") => {
                Err(UniformError::ReadOnly(self.name.clone()))
            }
            _ => Err(unknown_uniform(self)),
        }
    }
}

/// Apply a single uniform write. The material is left untouched on error.
pub fn apply_set_uniform(
    command: &SetUniform,
    bank: &MaterialBank,
    portal_materials: &mut Assets<PortalMaterial>,
    firefly_materials: &mut Assets<FireflyMaterial>,
) -> Result<(), UniformError> {
    command.validate()?;

    match command.material {
        MaterialKey::Portal => {
            let color = expect_color(command)?;
            let material = portal_materials
                .get_mut(&bank.portal)
                .ok_or(UniformError::MissingMaterial(MaterialKey::Portal))?;
            if command.name == "color_start" {
                material.set_color_start(color);
            } else {
                material.set_color_end(color);
            }
        }
        MaterialKey::Fireflies => {
            let size = expect_scalar(command)?;
            let material = firefly_materials
                .get_mut(&bank.firefly)
                .ok_or(UniformError::MissingMaterial(MaterialKey::Fireflies))?;
            material.set_size(size);
        }
    }
    Ok(())
}

fn expect_color(command: &SetUniform) -> Result<Color, UniformError> {
    match command.value {
        UniformValue::Color(color) => Ok(color),
        other => Err(UniformError::WrongKind {
            name: command.name.clone(),
            expected: "colour",
            actual: other.kind(),
        }),
    }
}

fn expect_scalar(command: &SetUniform) -> Result<f32, UniformError> {
    match command.value {
        UniformValue::Scalar(value) => Ok(value),
        other => Err(UniformError::WrongKind {
            name: command.name.clone(),
            expected: "scalar",
            actual: other.kind(),
        }),
    }
}

fn unknown_uniform(command: &SetUniform) -> UniformError {
    UniformError::UnknownUniform {
        material: command.material,
        name: command.name.clone(),
    }
}

/// Drain queued `SetUniform` commands into the material bank.
pub fn apply_uniform_commands(
    mut commands: EventReader<SetUniform>,
    bank: Option<Res<MaterialBank>>,
    mut portal_materials: ResMut<Assets<PortalMaterial>>,
    mut firefly_materials: ResMut<Assets<FireflyMaterial>>,
) {
    let Some(bank) = bank else {
        return;
    };

    for command in commands.read() {
        match apply_set_uniform(command, &bank, &mut portal_materials, &mut firefly_materials) {
            Ok(()) => info!(
                "Uniform {}.{} set to {:?}",
                command.material, command.name, command.value
            ),
            Err(err) => warn!("Rejected uniform write: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        bank: MaterialBank,
        portals: Assets<PortalMaterial>,
        fireflies: Assets<FireflyMaterial>,
    }

    fn fixture() -> Fixture {
        let mut portals = Assets::<PortalMaterial>::default();
        let mut fireflies = Assets::<FireflyMaterial>::default();
        let bank = MaterialBank {
            baked: Handle::default(),
            pole_light: Handle::default(),
            portal: portals.add(PortalMaterial::new(Color::BLACK, Color::WHITE)),
            firefly: fireflies.add(FireflyMaterial::new(100.0, 1.0)),
        };
        Fixture {
            bank,
            portals,
            fireflies,
        }
    }

    fn apply(f: &mut Fixture, command: SetUniform) -> Result<(), UniformError> {
        apply_set_uniform(&command, &f.bank, &mut f.portals, &mut f.fireflies)
    }

    #[test]
    fn sets_portal_colours() {
        let mut f = fixture();
        let red = Color::srgb(1.0, 0.0, 0.0);

        apply(
            &mut f,
            SetUniform::new(MaterialKey::Portal, "color_start", UniformValue::Color(red)),
        )
        .unwrap();

        let portal = f.portals.get(&f.bank.portal).unwrap();
        assert_eq!(portal.color_start().to_srgba().to_hex().to_lowercase(), "#ff0000");
        assert_eq!(portal.color_end().to_srgba().to_hex().to_lowercase(), "#ffffff");
    }

    #[test]
    fn firefly_size_is_clamped() {
        let mut f = fixture();

        apply(
            &mut f,
            SetUniform::new(MaterialKey::Fireflies, "size", UniformValue::Scalar(640.0)),
        )
        .unwrap();
        assert_eq!(f.fireflies.get(&f.bank.firefly).unwrap().size(), 500.0);

        apply(
            &mut f,
            SetUniform::new(MaterialKey::Fireflies, "size", UniformValue::Scalar(-1.0)),
        )
        .unwrap();
        assert_eq!(f.fireflies.get(&f.bank.firefly).unwrap().size(), 0.0);
    }

    #[test]
    fn rejects_unknown_and_mistyped_writes() {
        let mut f = fixture();

        let err = apply(
            &mut f,
            SetUniform::new(MaterialKey::Portal, "glow", UniformValue::Scalar(1.0)),
        )
        .unwrap_err();
        assert!(matches!(err, UniformError::UnknownUniform { .. }));

        let err = apply(
            &mut f,
            SetUniform::new(MaterialKey::Fireflies, "size", UniformValue::Color(Color::WHITE)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            UniformError::WrongKind {
                name: "size".to_string(),
                expected: "scalar",
                actual: "colour",
            }
        );

        let err = apply(
            &mut f,
            SetUniform::new(MaterialKey::Portal, "time", UniformValue::Scalar(3.0)),
        )
        .unwrap_err();
        assert_eq!(err, UniformError::ReadOnly("time".to_string()));

        // Nothing above may have touched the materials.
        assert_eq!(f.fireflies.get(&f.bank.firefly).unwrap().size(), 100.0);
        assert_eq!(f.portals.get(&f.bank.portal).unwrap().uniforms.time, 0.0);
    }

    #[test]
    fn validation_needs_no_materials() {
        assert_eq!(
            SetUniform::new(MaterialKey::Portal, "color_end", UniformValue::Color(Color::WHITE))
                .validate(),
            Ok(())
        );
        assert_eq!(
            SetUniform::new(MaterialKey::Fireflies, "pixel_ratio", UniformValue::Scalar(2.0))
                .validate(),
            Err(UniformError::ReadOnly("pixel_ratio".to_string()))
        );
        assert!(matches!(
            SetUniform::new(MaterialKey::Fireflies, "color_start", UniformValue::Color(Color::WHITE))
                .validate(),
            Err(UniformError::UnknownUniform { .. })
        ));
    }

    #[test]
    fn valid_write_to_missing_material_fails_on_apply() {
        let mut f = fixture();
        f.bank.firefly = Handle::weak_from_u128(42);

        let command = SetUniform::new(MaterialKey::Fireflies, "size", UniformValue::Scalar(50.0));
        assert_eq!(command.validate(), Ok(()));
        assert_eq!(
            apply(&mut f, command),
            Err(UniformError::MissingMaterial(MaterialKey::Fireflies))
        );
    }

    #[test]
    fn parses_material_names() {
        assert_eq!("portal".parse::<MaterialKey>(), Ok(MaterialKey::Portal));
        assert_eq!("fireflies".parse::<MaterialKey>(), Ok(MaterialKey::Fireflies));
        assert_eq!(
            "baked".parse::<MaterialKey>(),
            Err(UniformError::UnknownMaterial("baked".to_string()))
        );
    }
}
