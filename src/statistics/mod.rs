//! Monthly statistics and chart data for transactions.
//!
//! This module contains:
//! - Sales totals and sold/unsold counts for a month
//! - Price histograms for a month
//! - Per-category counts for bar and pie charts
//!
//! Every query here needs a month, a request without one matches no
//! transactions.

mod categories;
mod price_distribution;
mod stats;

use serde::Deserialize;

pub use categories::{CategoryCounts, get_bar_chart_data, get_pie_chart_data};
pub use price_distribution::{
    PriceBucket, PriceDistribution, get_price_distribution, price_distribution,
};
pub use stats::{Statistics, get_statistics, statistics};

use crate::transaction::MonthFilter;

/// The query parameters for monthly statistics and charts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthParams {
    /// The month name, e.g. "March".
    pub month: Option<String>,
}

impl MonthParams {
    /// The month filter for these parameters.
    pub fn month_filter(&self) -> MonthFilter {
        MonthFilter::required(self.month.as_deref())
    }
}
