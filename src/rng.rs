//! Uniform random source consumed by initialization and sampling.

use rand::Rng;

/// A source of uniform floats in `[0, 1)`.
///
/// Every [`rand::Rng`] is one; tests can supply fixed sequences.
pub trait UniformSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<R: Rng> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Gaussian draw with the given mean and standard deviation (Box–Muller).
pub fn gauss<U: UniformSource + ?Sized>(rng: &mut U, mean: f64, std: f64) -> f64 {
    // u1 must be strictly positive for the log.
    let u1 = 1.0 - rng.next_uniform();
    let u2 = rng.next_uniform();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn std_rng_draws_are_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = rng.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn gauss_matches_requested_moments() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let xs: Vec<f64> = (0..n).map(|_| gauss(&mut rng, 1.0, 0.5)).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.02, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.02, "std {}", var.sqrt());
    }

    #[test]
    fn gauss_is_finite_when_first_draw_is_zero() {
        struct Zeros;
        impl UniformSource for Zeros {
            fn next_uniform(&mut self) -> f64 {
                0.0
            }
        }
        // u1 = 1 - 0 = 1 => z = 0
        assert_eq!(gauss(&mut Zeros, 0.0, 1.0), 0.0);
    }
}
