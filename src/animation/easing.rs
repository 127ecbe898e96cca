use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

const BACK_OVERSHOOT: f64 = 1.70158;
const BACK_IN_OUT_OVERSHOOT: f64 = BACK_OVERSHOOT * 1.525;
const ELASTIC_PERIOD: f64 = 0.3;
const ELASTIC_IN_OUT_PERIOD: f64 = 0.45;
const BOUNCE_STRENGTH: f64 = 7.5625;
const BOUNCE_STEP: f64 = 2.75;

/// Easing curve applied to an animation phase in `[0, 1]`.
///
/// Every curve maps 0 to 0 and 1 to 1. `Back` and `Elastic` overshoot in
/// between; the animator clamps the resulting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    pub const ALL: [Self; 28] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
        Self::InExpo,
        Self::OutExpo,
        Self::InOutExpo,
        Self::InCirc,
        Self::OutCirc,
        Self::InOutCirc,
        Self::InElastic,
        Self::OutElastic,
        Self::InOutElastic,
        Self::InBack,
        Self::OutBack,
        Self::InOutBack,
        Self::InBounce,
        Self::OutBounce,
        Self::InOutBounce,
    ];

    /// Eases `t`. Input outside `[0, 1]` is clamped first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => -t * (t - 2.0),
            Self::InOutQuad => in_out(t, |u| u * u),
            Self::InCubic => t.powi(3),
            Self::OutCubic => (t - 1.0).powi(3) + 1.0,
            Self::InOutCubic => in_out(t, |u| u.powi(3)),
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (t - 1.0).powi(4),
            Self::InOutQuart => in_out(t, |u| u.powi(4)),
            Self::InSine => 1.0 - (t * FRAC_PI_2).cos(),
            Self::OutSine => (t * FRAC_PI_2).sin(),
            Self::InOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Self::InExpo => ease_in_expo(t),
            Self::OutExpo => 1.0 - ease_in_expo(1.0 - t),
            Self::InOutExpo => in_out(t, ease_in_expo),
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::InOutCirc => in_out(t, |u| 1.0 - (1.0 - u * u).sqrt()),
            Self::InElastic => ease_in_elastic(t, ELASTIC_PERIOD),
            Self::OutElastic => 1.0 - ease_in_elastic(1.0 - t, ELASTIC_PERIOD),
            Self::InOutElastic => in_out(t, |u| ease_in_elastic(u, ELASTIC_IN_OUT_PERIOD)),
            Self::InBack => ease_in_back(t, BACK_OVERSHOOT),
            Self::OutBack => 1.0 - ease_in_back(1.0 - t, BACK_OVERSHOOT),
            Self::InOutBack => in_out(t, |u| ease_in_back(u, BACK_IN_OUT_OVERSHOOT)),
            Self::InBounce => 1.0 - ease_out_bounce(1.0 - t),
            Self::OutBounce => ease_out_bounce(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    0.5 * (1.0 - ease_out_bounce(1.0 - 2.0 * t))
                } else {
                    0.5 * ease_out_bounce(2.0 * t - 1.0) + 0.5
                }
            }
        }
    }
}

/// Mirrors an ease-in curve into an ease-in-out curve.
fn in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        0.5 * ease_in(2.0 * t)
    } else {
        1.0 - 0.5 * ease_in(2.0 - 2.0 * t)
    }
}

fn ease_in_expo(t: f64) -> f64 {
    if t <= 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * (t - 1.0))
    }
}

fn ease_in_elastic(t: f64, period: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let shift = period / 4.0;
    let u = t - 1.0;
    -(2f64.powf(10.0 * u) * ((u - shift) * TAU / period).sin())
}

fn ease_in_back(t: f64, overshoot: f64) -> f64 {
    t * t * ((overshoot + 1.0) * t - overshoot)
}

fn ease_out_bounce(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_STEP {
        BOUNCE_STRENGTH * t * t
    } else if t < 2.0 / BOUNCE_STEP {
        let u = t - 1.5 / BOUNCE_STEP;
        BOUNCE_STRENGTH * u * u + 0.75
    } else if t < 2.5 / BOUNCE_STEP {
        let u = t - 2.25 / BOUNCE_STEP;
        BOUNCE_STRENGTH * u * u + 0.9375
    } else {
        let u = t - 2.625 / BOUNCE_STEP;
        BOUNCE_STRENGTH * u * u + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn every_curve_pins_its_endpoints() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() <= 1e-9, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() <= 1e-9, "{easing:?} at 1");
        }
    }

    #[test]
    fn in_out_curves_pass_through_half() {
        for easing in [
            Easing::InOutQuad,
            Easing::InOutCubic,
            Easing::InOutQuart,
            Easing::InOutSine,
            Easing::InOutExpo,
            Easing::InOutCirc,
            Easing::InOutBounce,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() <= 1e-9, "{easing:?}");
        }
    }

    #[test]
    fn out_curves_lead_in_curves() {
        assert!(Easing::OutQuad.apply(0.3) > Easing::InQuad.apply(0.3));
        assert!(Easing::OutCubic.apply(0.3) > Easing::Linear.apply(0.3));
        assert!((Easing::InQuad.apply(0.5) - 0.25).abs() <= 1e-12);
    }

    #[test]
    fn back_overshoots_below_zero() {
        assert!(Easing::InBack.apply(0.2) < 0.0);
        assert!(Easing::OutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-2.0), 0.0);
        assert_eq!(Easing::Linear.apply(3.0), 1.0);
        assert_eq!(Easing::Linear.apply(f64::NAN), 0.0);
    }

    #[test]
    fn easing_serializes_as_snake_case() {
        let json = serde_json::to_string(&Easing::InOutBounce).expect("serialize");
        assert_eq!(json, "\"in_out_bounce\"");
    }
}
