use serde::Serialize;

/// Descriptive statistics of a set of fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
}

impl FitnessSummary {
    /// Computes the summary of `values`.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// ```
    /// # use evotris_training::summary::FitnessSummary;
    /// let summary = FitnessSummary::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 5.0);
    /// assert_eq!(summary.mean, 3.0);
    /// assert_eq!(summary.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
