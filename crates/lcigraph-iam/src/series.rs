//! Piecewise-linear time series

use serde::{Deserialize, Serialize};

/// Linear interpolation through `(xs, ys)`, clamped to the end values.
///
/// `xs` must be sorted ascending and as long as `ys`. Returns `None` for an
/// empty table.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Option<f64> {
    let (first, last) = (*xs.first()?, *xs.last()?);
    if x <= first {
        return ys.first().copied();
    }
    if x >= last {
        return ys.last().copied();
    }
    let upper = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// Values of one variable in one region at declared year breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Breakpoints are sorted by year; `NaN` values mark missing data.
    pub fn new(points: impl IntoIterator<Item = (i32, f64)>) -> Self {
        let mut points: Vec<(i32, f64)> = points.into_iter().collect();
        points.sort_by_key(|(year, _)| *year);
        let (years, values) = points.into_iter().unzip();
        Self { years, values }
    }

    pub fn constant(value: f64) -> Self {
        Self::new([(2020, value)])
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Value at `year`, or `None` if the series is empty or the result is NaN.
    pub fn at(&self, year: i32) -> Option<f64> {
        let xs: Vec<f64> = self.years.iter().map(|&y| f64::from(y)).collect();
        interp(f64::from(year), &xs, &self.values).filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_is_clamped_at_both_ends() {
        let xs = [2020.0, 2035.0, 2050.0];
        let ys = [12.0, 8.0, 6.0];
        assert_eq!(interp(2000.0, &xs, &ys), Some(12.0));
        assert_eq!(interp(2035.0, &xs, &ys), Some(8.0));
        assert_eq!(interp(2042.5, &xs, &ys), Some(7.0));
        assert_eq!(interp(2100.0, &xs, &ys), Some(6.0));
        assert_eq!(interp(2030.0, &[], &[]), None);
    }

    #[test]
    fn series_sorts_breakpoints() {
        let s = TimeSeries::new([(2050, 4.0), (2020, 1.0)]);
        assert_eq!(s.years(), &[2020, 2050]);
        assert_eq!(s.at(2030), Some(2.0));
        assert_eq!(TimeSeries::new([(2020, f64::NAN)]).at(2020), None);
    }
}
