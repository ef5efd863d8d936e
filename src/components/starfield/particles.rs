//! Star particles with simulated depth and twinkle.

use rand::Rng;

use super::config::StarfieldConfig;

/// A single star.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Planar offset from the projection center.
	pub x: f64,
	pub y: f64,
	/// Distance from the viewer, in `(0, canvas width]`.
	pub z: f64,
	pub opacity: f64,
	/// Magnitude of each twinkle step.
	pub fade_speed: f64,
}

impl Particle {
	/// Spawn a particle anywhere inside a `width` x `height` canvas.
	pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &StarfieldConfig) -> Self {
		let twinkle = &config.twinkle;
		Self {
			x: sample(rng, width) - width / 2.0,
			y: sample(rng, height) - height / 2.0,
			// Flip [0, w) into (0, w] so a fresh particle never sits at the eye.
			z: width - sample(rng, width),
			opacity: rng.gen_range(0.0..1.0),
			fade_speed: if twinkle.fade_speed_max > twinkle.fade_speed_min {
				rng.gen_range(twinkle.fade_speed_min..twinkle.fade_speed_max)
			} else {
				twinkle.fade_speed_min
			},
		}
	}

	/// Move one step closer, respawning at `max_depth` once the eye is reached.
	pub fn advance(&mut self, depth_step: f64, max_depth: f64) {
		self.z -= depth_step;
		if self.z <= 0.0 {
			self.z = max_depth;
		}
	}

	/// Random-walk the opacity by `fade_speed` and clamp to `[min, max]`.
	pub fn twinkle<R: Rng>(&mut self, rng: &mut R, min: f64, max: f64) {
		let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
		self.opacity = (self.opacity + self.fade_speed * direction).clamp(min, max);
	}

	/// Screen position through the perspective divide.
	pub fn project(&self, perspective: f64, cx: f64, cy: f64) -> (f64, f64) {
		let k = perspective / self.z;
		(self.x * k + cx, self.y * k + cy)
	}
}

/// Uniform sample in `[0, extent)`, or 0 for a degenerate extent.
fn sample<R: Rng>(rng: &mut R, extent: f64) -> f64 {
	if extent > 0.0 {
		rng.gen_range(0.0..extent)
	} else {
		0.0
	}
}

/// Fixed-size set of stars that is only ever regenerated as a whole.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
	pub particles: Vec<Particle>,
}

impl ParticleField {
	/// Generate `count` random particles for a `width` x `height` canvas.
	pub fn generate<R: Rng>(
		rng: &mut R,
		count: usize,
		width: f64,
		height: f64,
		config: &StarfieldConfig,
	) -> Self {
		let particles = (0..count)
			.map(|_| Particle::random(rng, width, height, config))
			.collect();
		Self { particles }
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Pull depths back inside a canvas that got narrower.
	pub fn clamp_depth(&mut self, max_depth: f64) {
		for p in &mut self.particles {
			if p.z > max_depth {
				p.z = max_depth;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn particle(z: f64, opacity: f64) -> Particle {
		Particle {
			x: 0.0,
			y: 0.0,
			z,
			opacity,
			fade_speed: 0.003,
		}
	}

	#[test]
	fn test_generate_ranges() {
		let config = StarfieldConfig::default();
		let mut rng = StdRng::seed_from_u64(7);
		let field = ParticleField::generate(&mut rng, 500, 1000.0, 600.0, &config);

		assert_eq!(field.len(), 500);
		for p in &field.particles {
			assert!(p.z > 0.0 && p.z <= 1000.0, "depth out of range: {}", p.z);
			assert!((0.0..=1.0).contains(&p.opacity));
			assert!(p.x >= -500.0 && p.x < 500.0);
			assert!(p.y >= -300.0 && p.y < 300.0);
			assert!(p.fade_speed >= 0.002 && p.fade_speed < 0.004);
		}
	}

	#[test]
	fn test_generate_is_deterministic_for_a_seed() {
		let config = StarfieldConfig::default();
		let a = ParticleField::generate(&mut StdRng::seed_from_u64(42), 32, 800.0, 600.0, &config);
		let b = ParticleField::generate(&mut StdRng::seed_from_u64(42), 32, 800.0, 600.0, &config);
		let c = ParticleField::generate(&mut StdRng::seed_from_u64(43), 32, 800.0, 600.0, &config);
		assert_eq!(a.particles, b.particles);
		assert_ne!(a.particles, c.particles);
	}

	#[test]
	fn test_advance_respawns_at_max_depth() {
		let mut p = particle(0.5, 0.5);
		p.advance(1.2, 1000.0);
		assert_eq!(p.z, 1000.0);

		let mut p = particle(1.2, 0.5);
		p.advance(1.2, 1000.0);
		assert_eq!(p.z, 1000.0);

		let mut p = particle(10.0, 0.5);
		p.advance(1.2, 1000.0);
		assert!((p.z - 8.8).abs() < 1e-9);
	}

	#[test]
	fn test_twinkle_clamps() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut low = particle(100.0, 0.0);
		let mut high = particle(100.0, 1.0);
		for _ in 0..1000 {
			low.twinkle(&mut rng, 0.1, 1.0);
			high.twinkle(&mut rng, 0.1, 1.0);
			assert!((0.1..=1.0).contains(&low.opacity));
			assert!((0.1..=1.0).contains(&high.opacity));
		}
	}

	#[test]
	fn test_twinkle_moves_by_fade_speed() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut p = particle(100.0, 0.5);
		p.twinkle(&mut rng, 0.1, 1.0);
		assert!(((p.opacity - 0.5).abs() - 0.003).abs() < 1e-12);
	}

	#[test]
	fn test_project_perspective_divide() {
		let p = Particle {
			x: 10.0,
			y: -20.0,
			z: 64.0,
			opacity: 1.0,
			fade_speed: 0.0,
		};
		let (sx, sy) = p.project(128.0, 400.0, 300.0);
		assert!((sx - 420.0).abs() < 1e-9);
		assert!((sy - 260.0).abs() < 1e-9);
	}

	#[test]
	fn test_clamp_depth_after_shrink() {
		let mut field = ParticleField {
			particles: vec![particle(900.0, 0.5), particle(300.0, 0.5)],
		};
		field.clamp_depth(500.0);
		assert_eq!(field.particles[0].z, 500.0);
		assert_eq!(field.particles[1].z, 300.0);
	}
}
