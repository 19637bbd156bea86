use rand::Rng;

/// Source of uniform randomness for weight initialization and breeding.
///
/// Every operation that consumes randomness takes the source as an explicit
/// parameter, so a run is reproducible from its seed. Any [`rand::Rng`] is a
/// `RandomSource`; implement the trait directly to script the sequence (for
/// tests) or to swap in another distribution.
pub trait RandomSource {
    /// Returns a value uniformly distributed in `[-1, 1]`.
    fn random_clamped(&mut self) -> f64;

    /// Returns a value uniformly distributed in `[0, 1)`.
    fn random_unit(&mut self) -> f64;
}

impl<R> RandomSource for R
where
    R: Rng + ?Sized,
{
    fn random_clamped(&mut self) -> f64 {
        self.random_range(-1.0..=1.0)
    }

    fn random_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}
