//! Simulated ADC sensor noise
//!
//! Readings get a small deterministic jitter so the virtual sliders behave
//! like a real converter.

use rand_core::{impls, Error, RngCore};

/// Full-scale ADC reading
pub const ADC_MAX: u16 = 1023;

/// Largest jitter applied in either direction
pub const JITTER: i32 = 3;

const LCG_MULTIPLIER: u64 = 65_539;
const LCG_MODULUS: u64 = (1 << 31) - 1;
const LCG_SEED: u32 = 7;

/// Multiplicative linear congruential generator
///
/// Always starts from the same seed, so the noise sequence is
/// reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcg {
    pub const fn new() -> Self {
        Self { state: LCG_SEED }
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = ((self.state as u64 * LCG_MULTIPLIER) % LCG_MODULUS) as u32;
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Jitter source for ADC readings
#[derive(Debug, Clone, Default)]
pub struct AdcNoise<R: RngCore = Lcg> {
    rng: R,
}

impl<R: RngCore> AdcNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Next offset in `-JITTER..=JITTER`
    pub fn jitter(&mut self) -> i32 {
        (self.rng.next_u32() % (2 * JITTER as u32 + 1)) as i32 - JITTER
    }

    /// Perturb a register value, clamped to `0..=ADC_MAX`
    pub fn apply(&mut self, value: u16) -> u16 {
        let noisy = i32::from(value) + self.jitter();
        noisy.clamp(0, i32::from(ADC_MAX)) as u16
    }
}
