/// A simple statistics module with utility functions for summarising sampled values and
/// synthesised profiles.
use statrs::statistics::{Data, OrderStatistics, Statistics};

pub fn percentile(numbers: &[f64], percentile: usize) -> f64 {
    let mut data = Data::new(numbers.to_vec());

    data.percentile(percentile)
}

pub fn mean(numbers: &[f64]) -> f64 {
    numbers.mean()
}
