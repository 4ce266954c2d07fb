use rand::Rng;

/// Box the fireflies are scattered in: centred on the origin in X/Z, resting
/// on the ground plane in Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireflyFootprint {
    pub half_extent: f32,
    pub height: f32,
}

/// Procedurally placed point particles.
///
/// `positions` holds three floats per particle and `scales` one, so
/// `positions.len() == 3 * scales.len()` always holds. Generated once and
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    positions: Vec<f32>,
    scales: Vec<f32>,
}

impl ParticleField {
    /// Scatter `count` particles uniformly inside `footprint`.
    ///
    /// X and Z land in `[-half_extent, half_extent)`, Y in `[0, height)` and
    /// each scale in `[0, 1)`.
    pub fn generate<R: Rng + ?Sized>(
        count: usize,
        footprint: FireflyFootprint,
        rng: &mut R,
    ) -> Self {
        let mut positions = Vec::with_capacity(count * 3);
        let mut scales = Vec::with_capacity(count);

        for _ in 0..count {
            let x = (unit(rng) - 0.5) * 2.0 * footprint.half_extent;
            let y = unit(rng) * footprint.height;
            let z = (unit(rng) - 0.5) * 2.0 * footprint.half_extent;
            positions.extend_from_slice(&[x, y, z]);
            scales.push(unit(rng));
        }

        Self { positions, scales }
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Flat xyz components, three per particle.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// Iterate `(position, scale)` pairs.
    pub fn particles(&self) -> impl Iterator<Item = ([f32; 3], f32)> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.scales.iter().copied())
            .map(|(p, scale)| ([p[0], p[1], p[2]], scale))
    }
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const FOOTPRINT: FireflyFootprint = FireflyFootprint {
        half_extent: 2.0,
        height: 1.5,
    };

    #[test]
    fn default_field_has_thirty_particles() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::generate(30, FOOTPRINT, &mut rng);

        assert_eq!(field.positions().len(), 90);
        assert_eq!(field.scales().len(), 30);
        assert_eq!(field.len(), 30);
        assert_eq!(field.particles().count(), 30);
    }

    #[test]
    fn particles_stay_inside_footprint() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = ParticleField::generate(200, FOOTPRINT, &mut rng);

            for ([x, y, z], scale) in field.particles() {
                assert!((-2.0..2.0).contains(&x), "x out of range: {x}");
                assert!((0.0..1.5).contains(&y), "y out of range: {y}");
                assert!((-2.0..2.0).contains(&z), "z out of range: {z}");
                assert!((0.0..1.0).contains(&scale), "scale out of range: {scale}");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_field() {
        let a = ParticleField::generate(30, FOOTPRINT, &mut StdRng::seed_from_u64(42));
        let b = ParticleField::generate(30, FOOTPRINT, &mut StdRng::seed_from_u64(42));
        let c = ParticleField::generate(30, FOOTPRINT, &mut StdRng::seed_from_u64(43));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_field() {
        let field = ParticleField::generate(0, FOOTPRINT, &mut StdRng::seed_from_u64(1));
        assert!(field.is_empty());
        assert!(field.positions().is_empty());
    }
}
