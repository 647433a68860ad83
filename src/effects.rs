use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Gravity applied to burst particles, in playfield units per second squared
const PARTICLE_GRAVITY: f64 = 520.0;

/// Audio cue names
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SoundCue {
    Correct,
    Wrong,
    Miss,
    Click,
}

/// Colour family of a particle burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Good,
    Bad,
}

/// Cosmetic side effects requested by the game. Nothing here feeds back into
/// the simulation.
pub trait EffectsSink {
    fn play(&mut self, cue: SoundCue);
    fn burst(&mut self, x: f64, y: f64, color: ColorTag, count: usize);
    fn shake(&mut self, seconds: f64);
    fn update(&mut self, dt: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub life: f64,
    pub color: ColorTag,
}

impl Particle {
    /// Advance one step; false once the particle has expired
    fn update(&mut self, dt: f64) -> bool {
        self.life -= dt;
        if self.life <= 0.0 {
            return false;
        }
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        // y grows downward
        self.vel_y += PARTICLE_GRAVITY * dt;
        true
    }
}

/// Particles, camera shake and sound cues for the play screen
#[derive(Debug)]
pub struct Effects {
    pub particles: Vec<Particle>,
    shake_remaining: f64,
    shake_offset: (f64, f64),
    sound_enabled: bool,
    pending_bell: bool,
    last_cue: Option<SoundCue>,
    rng: StdRng,
}

impl Effects {
    pub fn new(sound_enabled: bool) -> Self {
        Self::with_rng(sound_enabled, StdRng::from_entropy())
    }

    pub fn with_rng(sound_enabled: bool, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            shake_remaining: 0.0,
            shake_offset: (0.0, 0.0),
            sound_enabled,
            pending_bell: false,
            last_cue: None,
            rng,
        }
    }

    /// Current camera displacement in playfield units
    pub fn shake_offset(&self) -> (f64, f64) {
        self.shake_offset
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_remaining > 0.0
    }

    pub fn last_cue(&self) -> Option<SoundCue> {
        self.last_cue
    }

    /// The terminal has no mixer, so audible cues become a bell that the
    /// event loop rings once per frame.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.pending_bell)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if !enabled {
            self.pending_bell = false;
        }
    }

    /// Drop all running particles and shake, e.g. when a new session starts
    pub fn reset(&mut self) {
        self.particles.clear();
        self.shake_remaining = 0.0;
        self.shake_offset = (0.0, 0.0);
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EffectsSink for Effects {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("sound cue {cue}");
        self.last_cue = Some(cue);
        if self.sound_enabled && matches!(cue, SoundCue::Wrong | SoundCue::Miss) {
            self.pending_bell = true;
        }
    }

    fn burst(&mut self, x: f64, y: f64, color: ColorTag, count: usize) {
        for _ in 0..count {
            let particle = Particle {
                x,
                y,
                vel_x: self.rng.gen_range(-160.0..160.0),
                vel_y: -self.rng.gen_range(80.0..280.0),
                life: self.rng.gen_range(0.35..0.7),
                color,
            };
            self.particles.push(particle);
        }
    }

    fn shake(&mut self, seconds: f64) {
        self.shake_remaining = self.shake_remaining.max(seconds);
    }

    fn update(&mut self, dt: f64) {
        self.particles.retain_mut(|p| p.update(dt));

        if self.shake_remaining > 0.0 {
            self.shake_remaining -= dt;
            self.shake_offset = (
                self.rng.gen_range(-6..=6) as f64,
                self.rng.gen_range(-4..=4) as f64,
            );
        } else {
            self.shake_offset = (0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects(sound: bool) -> Effects {
        Effects::with_rng(sound, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_burst_spawns_requested_count() {
        let mut fx = effects(false);
        fx.burst(100.0, 200.0, ColorTag::Good, 20);
        assert_eq!(fx.particles.len(), 20);
        assert!(fx.particles.iter().all(|p| p.color == ColorTag::Good));
        assert!(fx.particles.iter().all(|p| p.vel_y < 0.0));
    }

    #[test]
    fn test_particles_expire() {
        let mut fx = effects(false);
        fx.burst(0.0, 0.0, ColorTag::Bad, 10);
        fx.update(0.1);
        assert_eq!(fx.particles.len(), 10);
        fx.update(1.0);
        assert!(fx.particles.is_empty());
    }

    #[test]
    fn test_particle_gravity_pulls_down() {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            vel_x: 10.0,
            vel_y: -100.0,
            life: 1.0,
            color: ColorTag::Good,
        };
        assert!(p.update(0.1));
        assert_eq!(p.x, 1.0);
        assert_eq!(p.y, -10.0);
        assert!(p.vel_y > -100.0);
    }

    #[test]
    fn test_shake_runs_out() {
        let mut fx = effects(false);
        fx.shake(0.18);
        fx.shake(0.05); // shorter request does not cut the running shake
        assert!(fx.is_shaking());
        fx.update(0.1);
        assert!(fx.is_shaking());
        let (dx, dy) = fx.shake_offset();
        assert!(dx.abs() <= 6.0 && dy.abs() <= 4.0);

        fx.update(0.1);
        fx.update(0.1);
        assert!(!fx.is_shaking());
        assert_eq!(fx.shake_offset(), (0.0, 0.0));
    }

    #[test]
    fn test_bell_only_for_bad_cues_when_enabled() {
        let mut fx = effects(true);
        fx.play(SoundCue::Correct);
        assert!(!fx.take_bell());
        fx.play(SoundCue::Miss);
        assert!(fx.take_bell());
        assert!(!fx.take_bell());
        assert_eq!(fx.last_cue(), Some(SoundCue::Miss));

        let mut muted = effects(false);
        muted.play(SoundCue::Wrong);
        assert!(!muted.take_bell());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut fx = effects(false);
        fx.burst(1.0, 1.0, ColorTag::Bad, 5);
        fx.shake(1.0);
        fx.reset();
        assert!(fx.particles.is_empty());
        assert!(!fx.is_shaking());
    }

    #[test]
    fn test_sound_cue_names() {
        assert_eq!(SoundCue::Correct.to_string(), "correct");
        assert_eq!(SoundCue::Click.to_string(), "click");
    }
}
