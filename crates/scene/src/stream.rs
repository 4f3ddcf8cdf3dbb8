//! Data streams: particles that travel over the sphere surface leaving a
//! fading trail.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};

use foundation::math::{Vec3, spherical_to_cartesian};
use rand::Rng;

use crate::config::{StreamConfig, Tint};

/// Latitude drift amplitude per frame (radians).
pub const LAT_WOBBLE: f64 = 0.01;

/// Streams stay this far from the poles, where longitude motion collapses.
const POLE_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct DataStream {
    pub lat: f64,
    pub lng: f64,
    /// Longitude advance per frame (radians).
    pub speed: f64,
    /// Model-space surface points, most recent first.
    trail: VecDeque<Vec3>,
    max_trail: usize,
    pub tint: Tint,
    pub size: f64,
    remaining_life: u32,
}

fn sample_life<R: Rng + ?Sized>(rng: &mut R, config: &StreamConfig) -> u32 {
    let life = rng.gen_range(config.life.min..=config.life.max).round();
    (life as u32).max(1)
}

impl DataStream {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &StreamConfig) -> Self {
        let mut stream = Self {
            lat: 0.0,
            lng: 0.0,
            speed: rng.gen_range(config.speed.min..=config.speed.max),
            trail: VecDeque::with_capacity(config.max_trail.max(1)),
            max_trail: config.max_trail.max(1),
            tint: Tint::ALL[rng.gen_range(0..Tint::ALL.len())],
            size: rng.gen_range(config.size.min..=config.size.max),
            remaining_life: 0,
        };
        stream.reseed(rng, config);
        stream
    }

    fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &StreamConfig) {
        self.lat = rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
        self.lng = rng.gen_range(0.0..TAU);
        self.remaining_life = sample_life(rng, config);
        self.trail.clear();
    }

    pub fn remaining_life(&self) -> u32 {
        self.remaining_life
    }

    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    /// Current head position on a sphere of `radius`.
    pub fn head(&self, radius: f64) -> Vec3 {
        spherical_to_cartesian(self.lat, self.lng, radius)
    }

    fn record(&mut self, p: Vec3) {
        self.trail.push_front(p);
        self.trail.truncate(self.max_trail);
    }

    /// Advances one frame.
    ///
    /// An expired stream respawns instead of moving: fresh coordinates, fresh
    /// life, and a trail holding only the spawn point.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        time: f64,
        radius: f64,
        rng: &mut R,
        config: &StreamConfig,
    ) {
        if self.remaining_life == 0 {
            self.reseed(rng, config);
            let head = self.head(radius);
            self.record(head);
            return;
        }

        self.lng += self.speed;
        self.lat += (time * 2.0 + self.lng).sin() * LAT_WOBBLE;
        self.lat = self
            .lat
            .clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
        self.remaining_life -= 1;

        let head = self.head(radius);
        self.record(head);
    }

    /// Rescales stored trail points after the sphere radius changed.
    pub fn rescale(&mut self, factor: f64) {
        for p in self.trail.iter_mut() {
            *p = p.scale(factor);
        }
    }
}

/// Fixed-size pool of streams for the whole session.
#[derive(Debug, Clone)]
pub struct StreamPool {
    config: StreamConfig,
    streams: Vec<DataStream>,
}

impl StreamPool {
    pub fn new<R: Rng + ?Sized>(count: usize, config: &StreamConfig, rng: &mut R) -> Self {
        let streams = (0..count).map(|_| DataStream::spawn(rng, config)).collect();
        Self {
            config: config.clone(),
            streams,
        }
    }

    pub fn streams(&self) -> &[DataStream] {
        &self.streams
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn update<R: Rng + ?Sized>(&mut self, time: f64, radius: f64, rng: &mut R) {
        for stream in &mut self.streams {
            stream.update(time, radius, rng, &self.config);
        }
    }

    pub fn rescale(&mut self, factor: f64) {
        for stream in &mut self.streams {
            stream.rescale(factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataStream, StreamPool};
    use crate::config::{Span, StreamConfig};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn config(max_trail: usize, life: f64) -> StreamConfig {
        StreamConfig {
            max_trail,
            life: Span::new(life, life),
            ..StreamConfig::default()
        }
    }

    #[test]
    fn spawn_starts_alive_with_empty_trail() {
        let mut rng = SmallRng::seed_from_u64(7);
        let s = DataStream::spawn(&mut rng, &config(10, 50.0));
        assert_eq!(s.remaining_life(), 50);
        assert!(s.trail().is_empty());
        assert!(s.lat.abs() <= std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn trail_never_exceeds_max() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = config(5, 30.0);
        let mut s = DataStream::spawn(&mut rng, &cfg);
        for n in 0..200 {
            s.update(n as f64 * 0.01, 100.0, &mut rng, &cfg);
            assert!(s.trail().len() <= 5);
        }
    }

    #[test]
    fn life_is_non_increasing_until_respawn() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = config(8, 20.0);
        let mut s = DataStream::spawn(&mut rng, &cfg);
        let mut prev = s.remaining_life();
        for _ in 0..20 {
            s.update(0.0, 10.0, &mut rng, &cfg);
            assert!(s.remaining_life() <= prev);
            prev = s.remaining_life();
        }
        assert_eq!(s.remaining_life(), 0);
    }

    #[test]
    fn expired_stream_respawns_with_fresh_trail() {
        let mut rng = SmallRng::seed_from_u64(11);
        let cfg = config(16, 4.0);
        let mut s = DataStream::spawn(&mut rng, &cfg);
        for _ in 0..4 {
            s.update(0.0, 10.0, &mut rng, &cfg);
        }
        assert_eq!(s.remaining_life(), 0);
        assert_eq!(s.trail().len(), 4);

        s.update(0.0, 10.0, &mut rng, &cfg);
        assert!(s.remaining_life() > 0);
        assert_eq!(s.trail().len(), 1);
        assert_eq!(s.trail()[0], s.head(10.0));
    }

    #[test]
    fn trail_is_most_recent_first_and_on_surface() {
        let mut rng = SmallRng::seed_from_u64(5);
        let cfg = config(8, 100.0);
        let mut s = DataStream::spawn(&mut rng, &cfg);
        s.update(0.5, 50.0, &mut rng, &cfg);
        s.update(0.6, 50.0, &mut rng, &cfg);
        assert_eq!(s.trail()[0], s.head(50.0));
        for p in s.trail() {
            assert!((p.length() - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rescale_moves_trail_with_radius() {
        let mut rng = SmallRng::seed_from_u64(9);
        let cfg = config(8, 100.0);
        let mut pool = StreamPool::new(3, &cfg, &mut rng);
        pool.update(0.0, 10.0, &mut rng);
        pool.rescale(2.0);
        for s in pool.streams() {
            assert!((s.trail()[0].length() - 20.0).abs() < 1e-9);
        }
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn pool_is_reproducible_for_a_seed() {
        let cfg = StreamConfig::default();
        let a = StreamPool::new(6, &cfg, &mut SmallRng::seed_from_u64(42));
        let b = StreamPool::new(6, &cfg, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a.streams(), b.streams());
    }
}
