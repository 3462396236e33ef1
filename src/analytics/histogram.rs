use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning the observed range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets over `[min, max]`.
    ///
    /// Each bin is half-open except the last, which also holds `max`.
    /// No values gives no bins; a single distinct value gives one bin.
    pub fn from_values<I>(values: I, bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        }) else {
            return Self::default();
        };

        if max == min {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                }],
            };
        }

        let n = bins.max(1);
        let width = (max - min) / n as f64;
        let mut counts = vec![0usize; n];
        for v in &values {
            let slot = (((v - min) / width) as usize).min(n - 1);
            counts[slot] += 1;
        }

        Self {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| HistogramBin {
                    lower: min + width * i as f64,
                    upper: if i + 1 == n { max } else { min + width * (i + 1) as f64 },
                    count,
                })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
