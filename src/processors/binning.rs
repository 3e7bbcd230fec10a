/// Equal-width, right-closed bins fitted to an observed range.
///
/// Edges follow the usual dataframe `cut` convention: `n + 1` evenly spaced
/// edges from min to max, with the lowest edge pushed down by 0.1% of the
/// span so the minimum itself lands in bin 0. A degenerate range is widened
/// by 0.1% of the value on each side first.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualWidthBins {
    edges: Vec<f64>,
}

impl EqualWidthBins {
    /// Fit `bins` intervals over the finite values. `None` when there are no
    /// values to fit or `bins` is zero.
    pub fn fit<I>(values: I, bins: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if bins == 0 {
            return None;
        }

        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        Some(Self::from_range(min, max, bins))
    }

    pub fn from_range(min: f64, max: f64, bins: usize) -> Self {
        let (mut lo, mut hi) = (min, max);

        if lo == hi {
            let pad = if lo != 0.0 { 0.001 * lo.abs() } else { 0.001 };
            lo -= pad;
            hi += pad;
            let edges = linspace(lo, hi, bins + 1);
            return Self { edges };
        }

        let mut edges = linspace(lo, hi, bins + 1);
        edges[0] -= (hi - lo) * 0.001;
        Self { edges }
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Index of the bin `(edge[i], edge[i + 1]]` holding `value`, or `None`
    /// when it falls outside every bin.
    pub fn assign(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }

        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if value <= first || value > last {
            return None;
        }

        // first edge >= value closes the containing bin
        let upper = self.edges.partition_point(|edge| *edge < value);
        Some(upper - 1)
    }
}

fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    let intervals = (num - 1) as f64;
    let step = (stop - start) / intervals;
    let mut edges: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
    edges[num - 1] = stop;
    edges
}
