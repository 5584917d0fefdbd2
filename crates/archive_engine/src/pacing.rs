use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use archive_core::PacingParams;

/// Randomized delay source for throttling requests against the archive.
///
/// Draws Erlang(shape, scale) waits: the sum of `shape` exponential samples
/// with mean `scale_secs`, so the expected delay is `shape * scale_secs`
/// seconds. Seeding makes a run's delay sequence reproducible.
#[derive(Debug)]
pub struct Pacing {
    shape: u32,
    scale_secs: f64,
    rng: StdRng,
}

impl Pacing {
    pub fn from_params(params: &PacingParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            shape: params.shape.max(1),
            scale_secs: params.scale_secs.max(0.0),
            rng,
        }
    }

    pub fn sample(&mut self) -> Duration {
        let mut total = 0.0_f64;
        for _ in 0..self.shape {
            let u: f64 = self.rng.random();
            // u is in [0, 1), so 1 - u is in (0, 1] and the log is finite.
            total -= self.scale_secs * (1.0 - u).ln();
        }
        Duration::from_secs_f64(total)
    }
}
