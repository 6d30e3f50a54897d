//! Fireworks overlay started when the proposal is accepted.
//! Simulation is in viewport pixels; drawing lives in `app::view`.

use crate::rng::RandomSource;

const GRAVITY: f64 = 0.00012; // px / ms^2
const DRAG: f64 = 0.9985; // per ms

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FireworksConfig {
    pub burst_interval_ms: f64,
    pub particles_per_burst: usize,
    pub max_particles: usize,
    pub particle_life_ms: f64,
    pub max_speed: f64, // px / ms
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            burst_interval_ms: 700.0,
            particles_per_burst: 60,
            max_particles: 600,
            particle_life_ms: 1_600.0,
            max_speed: 0.35,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub hue: f64,
    age_ms: f64,
    life_ms: f64,
}

impl Particle {
    /// Remaining life in `[0, 1]`, used as alpha.
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age_ms / self.life_ms).clamp(0.0, 1.0)
    }
}

pub struct Fireworks {
    config: FireworksConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    until_next_burst_ms: f64,
}

impl Fireworks {
    pub fn new(config: FireworksConfig, width: f64, height: f64) -> Self {
        Self {
            config,
            width,
            height,
            particles: Vec::with_capacity(config.max_particles),
            until_next_burst_ms: 0.0,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn update(&mut self, dt_ms: f64, rng: &mut impl RandomSource) {
        let dt = dt_ms.clamp(0.0, 100.0);

        self.until_next_burst_ms -= dt;
        if self.until_next_burst_ms <= 0.0 {
            self.burst(rng);
            self.until_next_burst_ms = self.config.burst_interval_ms;
        }

        let drag = DRAG.powf(dt);
        for p in &mut self.particles {
            p.vy += GRAVITY * dt;
            p.vx *= drag;
            p.vy *= drag;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.age_ms += dt;
        }
        self.particles.retain(|p| p.age_ms < p.life_ms);
    }

    fn burst(&mut self, rng: &mut impl RandomSource) {
        let room = self.config.max_particles.saturating_sub(self.particles.len());
        let count = self.config.particles_per_burst.min(room);
        if count == 0 {
            return;
        }
        let cx = rng.range(0.15, 0.85) * self.width;
        let cy = rng.range(0.1, 0.5) * self.height;
        let hue = rng.range(0.0, 360.0);
        for _ in 0..count {
            let angle = rng.range(0.0, std::f64::consts::TAU);
            let speed = rng.range(0.3, 1.0) * self.config.max_speed;
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                hue: (hue + rng.range(-20.0, 20.0)).rem_euclid(360.0),
                age_ms: 0.0,
                life_ms: self.config.particle_life_ms * rng.range(0.7, 1.0),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift64;

    #[test]
    fn test_first_update_bursts() {
        let mut fw = Fireworks::new(FireworksConfig::default(), 800.0, 600.0);
        let mut rng = XorShift64::new(1);
        fw.update(16.0, &mut rng);
        assert_eq!(fw.particles().len(), 60);
        for p in fw.particles() {
            assert!(p.alpha() > 0.0 && p.alpha() <= 1.0);
        }
    }

    #[test]
    fn test_particles_expire() {
        let cfg = FireworksConfig { burst_interval_ms: 1e9, ..FireworksConfig::default() };
        let mut fw = Fireworks::new(cfg, 800.0, 600.0);
        let mut rng = XorShift64::new(2);
        fw.update(16.0, &mut rng);
        assert!(!fw.particles().is_empty());
        for _ in 0..40 {
            fw.update(50.0, &mut rng);
        }
        assert!(fw.particles().is_empty());
    }

    #[test]
    fn test_particle_cap_holds() {
        let cfg = FireworksConfig {
            burst_interval_ms: 10.0,
            max_particles: 150,
            particle_life_ms: 1e9,
            ..FireworksConfig::default()
        };
        let mut fw = Fireworks::new(cfg, 800.0, 600.0);
        let mut rng = XorShift64::new(3);
        for _ in 0..100 {
            fw.update(16.0, &mut rng);
            assert!(fw.particles().len() <= 150);
        }
        assert_eq!(fw.particles().len(), 150);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let cfg = FireworksConfig {
            burst_interval_ms: 1e9,
            max_speed: 0.001,
            ..FireworksConfig::default()
        };
        let mut fw = Fireworks::new(cfg, 800.0, 600.0);
        let mut rng = XorShift64::new(4);
        fw.update(1.0, &mut rng);
        let before: f64 = fw.particles().iter().map(|p| p.y).sum::<f64>() / 60.0;
        for _ in 0..10 {
            fw.update(50.0, &mut rng);
        }
        let after: f64 =
            fw.particles().iter().map(|p| p.y).sum::<f64>() / fw.particles().len() as f64;
        assert!(after > before);
    }
}
