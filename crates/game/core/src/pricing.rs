//! Shop haggling.

use crate::config::CombatConfig;
use crate::env::RngOracle;

/// Price after a haggle by a buyer of `level`.
///
/// The discount is a percentage drawn from `1..=max(1, level / 2)`, capped at
/// `haggle_cap`, and subtracted from the price.
pub fn haggle(price: u64, level: u32, rng: &mut dyn RngOracle, config: &CombatConfig) -> u64 {
    let ceiling = (level / 2).max(1).min(u32::from(config.haggle_cap.max(1)));
    let percent = rng.range(1, ceiling as i32 + 1).max(1) as u64;
    price - price.saturating_mul(percent) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    #[test]
    fn discount_is_small_and_subtracted() {
        let config = CombatConfig::default();
        // Level 20 haggles up to 10%.
        assert_eq!(haggle(1000, 20, &mut ScriptedRng::constant(10), &config), 900);
        assert_eq!(haggle(1000, 20, &mut ScriptedRng::constant(99), &config), 900);
        assert_eq!(haggle(1000, 1, &mut ScriptedRng::constant(50), &config), 990);
    }

    #[test]
    fn discount_never_exceeds_cap() {
        let config = CombatConfig::default();
        let mut rng = PcgRng::new(3);
        for _ in 0..200 {
            let price = haggle(1000, 90, &mut rng, &config);
            assert!((750..1000).contains(&price));
        }
    }
}
