pub struct StatsHelper;

impl StatsHelper {
    /// Largest value of the sequence, or `None` when it is empty.
    pub fn max<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().reduce(f64::max)
    }

    /// Rounds to `places` decimals based on the exact binary value, so a
    /// stored 0.0625 becomes 0.062 and 0.0125 (stored slightly above) 0.013.
    pub fn round_to(value: f64, places: usize) -> f64 {
        format!("{:.*}", places, value).parse().unwrap_or(value)
    }
}
