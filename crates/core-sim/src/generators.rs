use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `(period divisor, amplitude)` of each sinusoid in the environment wave.
const WAVE_COMPONENTS: [(f64, f64); 3] = [(8.0, 10.0), (3.0, 4.0), (20.0, 15.0)];
const SPIKE_INTERVAL: u64 = 17;
const SPIKE_AMPLITUDE: f64 = 15.0;

/// Produces the environmental effect for a tick: three fixed sinusoids plus
/// a randomly signed spike every 17th tick.
///
/// The spike sign is drawn at evaluation time, so callers must evaluate each
/// tick once and hand the same value to every consumer.
#[derive(Debug, Clone)]
pub struct DisturbanceGenerator {
    rng: ChaCha8Rng,
    spikes_enabled: bool,
}

impl DisturbanceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spikes_enabled: true,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            spikes_enabled: true,
        }
    }

    /// Generator whose output is the deterministic baseline wave only.
    pub fn without_spikes() -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(0),
            spikes_enabled: false,
        }
    }

    pub fn spikes_enabled(&self) -> bool {
        self.spikes_enabled
    }

    pub fn disturbance(&mut self, tick: u64, variability_scale: f64) -> f64 {
        debug_assert!(
            variability_scale.is_finite() && variability_scale >= 0.0,
            "variability_scale must be finite and non-negative"
        );

        let mut value = baseline_wave(tick, variability_scale);
        if self.spikes_enabled && is_notable_tick(tick) {
            let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            value += sign * SPIKE_AMPLITUDE * variability_scale;
        }
        value
    }
}

/// Sum of the three sinusoids at `tick`, without the spike term.
pub fn baseline_wave(tick: u64, variability_scale: f64) -> f64 {
    let t = tick as f64;
    WAVE_COMPONENTS
        .iter()
        .map(|(divisor, amplitude)| (t / divisor).sin() * amplitude * variability_scale)
        .sum()
}

/// Ticks that carry a spike and get an environment marker.
pub fn is_notable_tick(tick: u64) -> bool {
    tick % SPIKE_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::{baseline_wave, is_notable_tick, DisturbanceGenerator};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn seeded_generators_are_deterministic() {
        let mut a = DisturbanceGenerator::new(42);
        let mut b = DisturbanceGenerator::new(42);

        let run_a: Vec<f64> = (0..200).map(|tick| a.disturbance(tick, 1.0)).collect();
        let run_b: Vec<f64> = (0..200).map(|tick| b.disturbance(tick, 1.0)).collect();

        assert_eq!(run_a, run_b);
    }

    #[test]
    fn spike_free_generator_is_a_pure_function_of_tick() {
        let mut generator = DisturbanceGenerator::without_spikes();

        for tick in [0, 5, 17, 34, 149] {
            let first = generator.disturbance(tick, 1.3);
            let second = generator.disturbance(tick, 1.3);
            assert_eq!(first, second);
            assert_eq!(first, baseline_wave(tick, 1.3));
        }
    }

    #[test]
    fn baseline_wave_matches_fixed_amplitudes_at_unit_scale() {
        let tick = 12_u64;
        let t = tick as f64;
        let expected = (t / 8.0).sin() * 10.0 + (t / 3.0).sin() * 4.0 + (t / 20.0).sin() * 15.0;

        assert!((baseline_wave(tick, 1.0) - expected).abs() < EPSILON);
        assert!((baseline_wave(tick, 2.0) - 2.0 * expected).abs() < EPSILON);
    }

    #[test]
    fn non_notable_ticks_never_spike() {
        let mut generator = DisturbanceGenerator::new(3);

        for tick in (0..300).filter(|tick| !is_notable_tick(*tick)) {
            assert_eq!(generator.disturbance(tick, 1.0), baseline_wave(tick, 1.0));
        }
    }

    #[test]
    fn notable_ticks_add_a_scaled_spike_of_either_sign() {
        let mut generator = DisturbanceGenerator::new(9);
        let mut saw_positive = false;
        let mut saw_negative = false;

        for _ in 0..64 {
            let spike = generator.disturbance(34, 0.5) - baseline_wave(34, 0.5);
            assert!((spike.abs() - 7.5).abs() < EPSILON);
            saw_positive |= spike > 0.0;
            saw_negative |= spike < 0.0;
        }

        assert!(saw_positive && saw_negative);
    }

    #[test]
    fn zero_variability_silences_the_environment() {
        let mut generator = DisturbanceGenerator::new(1);

        for tick in 0..60 {
            assert_eq!(generator.disturbance(tick, 0.0).abs(), 0.0);
        }
    }

    #[test]
    fn notable_predicate_is_every_seventeenth_tick() {
        let notable: Vec<u64> = (0..60).filter(|tick| is_notable_tick(*tick)).collect();

        assert_eq!(notable, vec![0, 17, 34, 51]);
    }
}
