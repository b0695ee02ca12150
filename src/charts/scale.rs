//! Linear scales
//! Maps a data domain onto a pixel range, with "nice" tick generation.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A degenerate domain is widened by 0.5 on each side.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d_min, mut d_max) = domain;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min -= 0.5;
            d_max += 0.5;
        }
        Self {
            domain: (d_min, d_max),
            range,
        }
    }

    /// Domain spanning `values`, padded by `pad` of its width on each side.
    pub fn from_extent(values: impl IntoIterator<Item = f64>, pad: f64) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        let margin = (hi - lo) * pad;
        Some((lo - margin, hi + margin))
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Position of `value` within the domain, 0.0 at the start and 1.0 at the end.
    pub fn normalize(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        (value - d0) / (d1 - d0)
    }

    /// Roughly `count` ticks at 1/2/5 multiples inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let step = nice_step(d1 - d0, count.max(1));
        if step <= 0.0 || !step.is_finite() {
            return Vec::new();
        }
        let start = (d0 / step).ceil() * step;
        let mut ticks: Vec<f64> = Vec::new();
        for i in 0..=count.max(1) * 4 {
            let v = start + step * i as f64;
            if v > d1 + step * 1e-9 {
                break;
            }
            // step below the precision of v
            if ticks.last() == Some(&v) {
                break;
            }
            ticks.push(v);
        }
        ticks
    }
}

fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 500.0));
        assert_eq!(s.map(50.0), 250.0);

        // inverted y axis
        let y = LinearScale::new((40.0, 80.0), (300.0, 0.0));
        assert_eq!(y.map(40.0), 300.0);
        assert_eq!(y.map(80.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(s.map(4.5), 0.0);
        assert_eq!(s.map(5.5), 10.0);
        assert_eq!(s.map(5.0), 5.0);
    }

    #[test]
    fn test_ticks_are_nice() {
        let s = LinearScale::new((41.3, 82.7), (0.0, 1.0));
        let ticks = s.ticks(8);
        // 41.4 / 8 = 5.175 rounds up to a step of 10
        assert_eq!(ticks, vec![50.0, 60.0, 70.0, 80.0]);
        assert!(ticks.iter().all(|t| *t >= 41.3 && *t <= 82.7));
    }

    #[test]
    fn test_ticks_terminate_on_narrow_domain_at_large_magnitude() {
        let s = LinearScale::new((1.0e17, 1.0e17 + 64.0), (0.0, 1.0));
        let ticks = s.ticks(6);
        assert!(ticks.len() <= 25);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));

        let tiny = LinearScale::new((1.0e15, 1.0e15 + 0.5), (0.0, 1.0));
        assert!(tiny.ticks(8).len() <= 33);
    }

    #[test]
    fn test_from_extent() {
        assert_eq!(LinearScale::from_extent([1.0, 3.0], 0.5), Some((0.0, 4.0)));
        assert_eq!(LinearScale::from_extent(std::iter::empty(), 0.1), None);
    }
}
