/// Tuning knobs for a `Counter`.
///
/// # Example
///
/// ```
/// use lencount_rs::CounterConfig;
///
/// let config = CounterConfig::default().with_max_length(64);
/// assert_eq!(config.max_length, Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    /// Largest length a caller may request. `None` means unbounded.
    ///
    /// Cache size grows with the square of the requested length, so
    /// long-lived hosts should set this.
    pub max_length: Option<usize>,

    /// Upper bound on the number of strings exhaustive expansion will produce.
    pub exhaustive_limit: u128,
}

impl CounterConfig {
    pub const DEFAULT_EXHAUSTIVE_LIMIT: u128 = 1 << 16;

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_exhaustive_limit(mut self, limit: u128) -> Self {
        self.exhaustive_limit = limit;
        self
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            max_length: None,
            exhaustive_limit: Self::DEFAULT_EXHAUSTIVE_LIMIT,
        }
    }
}
