use crate::{
    canvas::Canvas,
    spectrum::SpectrumFrame,
    theme::{hsl, Rgb},
};

use super::reactive_scale;

/// Pointer attraction kicks in below this distance.
pub const ATTRACTION_RADIUS: f32 = 200.0;
/// Particle pairs closer than this are joined by a connection line.
pub const CONNECTION_DISTANCE: f32 = 100.0;

const CONNECTION_COLOR: Rgb = Rgb::new(255, 255, 255);

/// A single particle. Life decays every frame; at zero the particle respawns
/// at a random position (the only wrap policy in this mode, edges do not
/// bounce).
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub hue: f32,
    pub life: f32,
    pub decay: f32,
}

impl Particle {
    /// Spawns a particle at a random position with randomised velocity, size,
    /// decay rate and a hue near the theme's base hue.
    pub fn spawn(width: f32, height: f32, base_hue: f32) -> Self {
        Self {
            x: rand::random::<f32>() * width,
            y: rand::random::<f32>() * height,
            vx: (rand::random::<f32>() - 0.5) * 2.0,
            vy: (rand::random::<f32>() - 0.5) * 2.0,
            size: rand::random::<f32>() * 4.0 + 1.0,
            hue: base_hue + rand::random::<f32>() * 60.0,
            life: 1.0,
            decay: rand::random::<f32>() * 0.01 + 0.005,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Advances every particle one step: life decay with random respawn, movement
/// scaled by the bass-reactive factor, and pointer attraction inside
/// [`ATTRACTION_RADIUS`]. Velocities are never modified.
pub fn advance(
    particles: &mut [Particle],
    frame: &SpectrumFrame,
    sensitivity: u8,
    pointer: (f32, f32),
    bounds: (f32, f32),
) {
    let reactive = reactive_scale(frame.bass, sensitivity);
    let speed = 1.0 + 2.0 * reactive;

    for particle in particles.iter_mut() {
        particle.life -= particle.decay;
        if particle.life <= 0.0 {
            particle.x = rand::random::<f32>() * bounds.0;
            particle.y = rand::random::<f32>() * bounds.1;
            particle.life = 1.0;
        }

        particle.x += particle.vx * speed;
        particle.y += particle.vy * speed;

        let dx = pointer.0 - particle.x;
        let dy = pointer.1 - particle.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > f32::EPSILON && dist < ATTRACTION_RADIUS {
            particle.x += dx / dist * reactive * 4.0;
            particle.y += dy / dist * reactive * 4.0;
        }
    }
}

pub fn render(
    canvas: &mut Canvas,
    particles: &mut [Particle],
    frame: &SpectrumFrame,
    sensitivity: u8,
    pointer: (f32, f32),
) {
    let bounds = (canvas.width(), canvas.height());
    advance(particles, frame, sensitivity, pointer, bounds);

    let reactive = reactive_scale(frame.bass, sensitivity);
    for particle in particles.iter() {
        let radius = particle.size * (1.0 + reactive);
        let color = hsl(particle.hue, 80.0, 60.0);
        canvas.fill_circle(particle.x, particle.y, radius, color, particle.life);
        // glow halo
        canvas.fill_circle(particle.x, particle.y, radius * 2.0, color, particle.life * 0.3);
    }

    // O(n^2) pair sweep; fine for the tens-to-hundreds of particles involved.
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let dx = particles[i].x - particles[j].x;
            let dy = particles[i].y - particles[j].y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < CONNECTION_DISTANCE {
                let alpha = 0.3 * (1.0 - dist / CONNECTION_DISTANCE);
                canvas.stroke_segment(
                    particles[i].x,
                    particles[i].y,
                    particles[j].x,
                    particles[j].y,
                    0.5,
                    CONNECTION_COLOR,
                    alpha,
                );
            }
        }
    }
}
