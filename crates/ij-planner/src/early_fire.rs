use std::fmt;

use ij_config::HumanDuration;
use ij_rel::{RelHint, is_early_fire_hint};

use crate::error::{RuleError, RuleResult};

/// Option keys of the `EARLY_FIRE` hint. The long forms accept durations.
const DELAY: &str = "delay";
const FREQUENCY: &str = "frequency";
const MAX_LATENESS: &str = "max-lateness";
const FIRE_INTERVAL: &str = "fire-interval";

/// Early emission settings for an interval join, in milliseconds.
///
/// `(0, 0)` means results are emitted only when the window closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EarlyFireParameters {
    pub delay: u64,
    pub frequency: u64,
}

impl EarlyFireParameters {
    pub fn new(delay: u64, frequency: u64) -> Self {
        Self { delay, frequency }
    }

    pub fn is_enabled(&self) -> bool {
        self.delay > 0 || self.frequency > 0
    }

    /// Read the first `EARLY_FIRE` hint (name matched case-insensitively).
    ///
    /// `delay` and `frequency` are non-negative millisecond integers; the
    /// aliases `max-lateness` and `fire-interval` also take durations such as
    /// `"30s"`. A short key takes precedence over its alias. Missing keys and
    /// a missing hint default to zero.
    pub fn from_hints(hints: &[RelHint]) -> RuleResult<Self> {
        let Some(hint) = hints.iter().find(|h| is_early_fire_hint(&h.name)) else {
            return Ok(Self::default());
        };
        ij_debug!(hint, hint = %hint, "early-fire hint found");

        let options = hint.lowercase_options();
        let delay = match (options.get(DELAY), options.get(MAX_LATENESS)) {
            (Some(v), alias) => {
                if alias.is_some() {
                    ij_warn!(hint, "`{DELAY}` overrides `{MAX_LATENESS}`");
                }
                parse_millis(DELAY, v)?
            }
            (None, Some(v)) => parse_duration(MAX_LATENESS, v)?,
            (None, None) => 0,
        };
        let frequency = match (options.get(FREQUENCY), options.get(FIRE_INTERVAL)) {
            (Some(v), alias) => {
                if alias.is_some() {
                    ij_warn!(hint, "`{FREQUENCY}` overrides `{FIRE_INTERVAL}`");
                }
                parse_millis(FREQUENCY, v)?
            }
            (None, Some(v)) => parse_duration(FIRE_INTERVAL, v)?,
            (None, None) => 0,
        };
        Ok(Self { delay, frequency })
    }
}

impl fmt::Display for EarlyFireParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delay={}, frequency={}", self.delay, self.frequency)
    }
}

fn parse_millis(key: &str, value: &str) -> RuleResult<u64> {
    value.parse::<u64>().map_err(|_| {
        RuleError::Planning(format!(
            "invalid value '{value}' for option '{key}' of hint EARLY_FIRE: expected a non-negative integer"
        ))
    })
}

/// A plain integer is milliseconds; anything else must be a duration.
fn parse_duration(key: &str, value: &str) -> RuleResult<u64> {
    if let Ok(ms) = value.parse::<u64>() {
        return Ok(ms);
    }
    value
        .parse::<HumanDuration>()
        .map(|d| d.as_millis())
        .map_err(|e| {
            RuleError::Planning(format!(
                "invalid value '{value}' for option '{key}' of hint EARLY_FIRE: {e}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(name: &str, options: &[(&str, &str)]) -> RelHint {
        options
            .iter()
            .fold(RelHint::new(name), |h, (k, v)| h.with_option(*k, *v))
    }

    #[test]
    fn no_hint_means_no_early_fire() {
        let p = EarlyFireParameters::from_hints(&[]).unwrap();
        assert_eq!(p, EarlyFireParameters::new(0, 0));
        assert!(!p.is_enabled());

        let other = [hint("BROADCAST", &[("delay", "7")])];
        assert_eq!(
            EarlyFireParameters::from_hints(&other).unwrap(),
            EarlyFireParameters::default()
        );
    }

    #[test]
    fn name_and_keys_are_case_insensitive() {
        let hints = [hint("early_fire", &[("Delay", "500"), ("FREQUENCY", "1000")])];
        let p = EarlyFireParameters::from_hints(&hints).unwrap();
        assert_eq!(p, EarlyFireParameters::new(500, 1000));
        assert!(p.is_enabled());
    }

    #[test]
    fn missing_key_defaults_to_zero() {
        let hints = [hint("EARLY_FIRE", &[("frequency", "250")])];
        assert_eq!(
            EarlyFireParameters::from_hints(&hints).unwrap(),
            EarlyFireParameters::new(0, 250)
        );
    }

    #[test]
    fn first_matching_hint_wins() {
        let hints = [
            hint("EARLY_FIRE", &[("delay", "1")]),
            hint("EARLY_FIRE", &[("delay", "2")]),
        ];
        assert_eq!(EarlyFireParameters::from_hints(&hints).unwrap().delay, 1);
    }

    #[test]
    fn non_numeric_value_is_a_planning_error() {
        let hints = [hint("EARLY_FIRE", &[("delay", "abc")])];
        let err = EarlyFireParameters::from_hints(&hints).unwrap_err();
        assert!(matches!(
            err,
            RuleError::Planning(ref m) if m.contains("'abc'") && m.contains("delay")
        ));
    }

    #[test]
    fn negative_value_is_a_planning_error() {
        let hints = [hint("EARLY_FIRE", &[("frequency", "-5")])];
        assert!(matches!(
            EarlyFireParameters::from_hints(&hints),
            Err(RuleError::Planning(_))
        ));
    }

    #[test]
    fn long_form_keys_take_durations() {
        let options = [("max-lateness", "10m"), ("fire-interval", "1500")];
        let hints = [hint("EARLY_FIRE", &options)];
        assert_eq!(
            EarlyFireParameters::from_hints(&hints).unwrap(),
            EarlyFireParameters::new(600_000, 1_500)
        );
    }

    #[test]
    fn short_key_overrides_long_form() {
        let hints = [hint("EARLY_FIRE", &[("max-lateness", "10m"), ("delay", "20")])];
        assert_eq!(EarlyFireParameters::from_hints(&hints).unwrap().delay, 20);
    }

    #[test]
    fn malformed_duration_is_a_planning_error() {
        let hints = [hint("EARLY_FIRE", &[("fire-interval", "soon")])];
        let err = EarlyFireParameters::from_hints(&hints).unwrap_err();
        assert!(matches!(err, RuleError::Planning(ref m) if m.contains("fire-interval")));
    }
}
