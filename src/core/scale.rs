use serde::{Deserialize, Serialize};

use crate::error::{VisError, VisResult};

/// Continuous linear mapping from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain_start: 0.0,
            domain_end: 1.0,
            range_start: 0.0,
            range_end: 1.0,
        }
    }
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> VisResult<Self> {
        let mut scale = Self::default();
        scale.set_domain(domain_start, domain_end)?;
        Ok(scale)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn set_domain(&mut self, domain_start: f64, domain_end: f64) -> VisResult<()> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(VisError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        self.domain_start = domain_start;
        self.domain_end = domain_end;
        Ok(())
    }

    pub fn set_range(&mut self, range_start: f64, range_end: f64) -> VisResult<()> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(VisError::InvalidData("scale range must be finite".to_owned()));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(())
    }

    /// Maps a domain value into the range. A zero-width domain maps
    /// everything to the middle of the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return (self.range_start + self.range_end) / 2.0;
        }
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a range value back into the domain.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Extends the domain outward to round tick boundaries.
    pub fn nice(&mut self, tick_count: usize) {
        let ticks = nice_ticks(self.domain_start, self.domain_end, tick_count);
        if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
            if ticks.len() >= 2 {
                let (first, last) = (*first, *last);
                if self.domain_start <= self.domain_end {
                    self.domain_start = first;
                    self.domain_end = last;
                } else {
                    self.domain_start = last;
                    self.domain_end = first;
                }
            }
        }
    }

    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let step = nice_step(span_of(self.domain_start, self.domain_end) / count.max(1) as f64);
        if count == 0 || step == 0.0 {
            return nice_ticks(self.domain_start, self.domain_end, count);
        }
        let (min, max) = ordered(self.domain_start, self.domain_end);
        let start = (min / step).ceil();
        let stop = (max / step).floor();
        if stop < start {
            return Vec::new();
        }
        let n = (stop - start).round() as usize;
        (0..=n).map(|i| (start + i as f64) * step).collect()
    }
}

/// Maps a continuous domain onto `count` equal buckets `0..count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeScale {
    domain_start: f64,
    domain_end: f64,
    count: usize,
}

impl QuantizeScale {
    #[must_use]
    pub fn new(domain: (f64, f64), count: usize) -> Self {
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            count,
        }
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// Returns the bucket for `value`, clamping out-of-domain values to the
    /// first and last bucket. `None` for an empty scale or a `NaN` value.
    #[must_use]
    pub fn bucket(self, value: f64) -> Option<usize> {
        if self.count == 0 || value.is_nan() {
            return None;
        }
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return Some(0);
        }
        let normalized = (value - self.domain_start) / span;
        let scaled = (normalized * self.count as f64).floor();
        if scaled <= 0.0 {
            Some(0)
        } else {
            Some((scaled as usize).min(self.count - 1))
        }
    }
}

/// Evenly spaced round values covering `[min, max]` outward.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    let (min, max) = ordered(min, max);
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;
    let n = ((stop - start) / step).round();
    if !n.is_finite() || n < 0.0 {
        return vec![min, max];
    }
    let n = n.min(10_000.0) as usize;
    (0..=n).map(|i| start + i as f64 * step).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn span_of(a: f64, b: f64) -> f64 {
    (b - a).abs()
}
