//! The API endpoint URIs.

/// The route that replaces the stored transactions with the remote dataset.
pub const INITIALIZE: &str = "/initialize";
/// The route for searching transactions one page at a time.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the sales statistics of a month.
pub const STATISTICS: &str = "/transactions/stats";
/// The route for the price histogram of a month.
pub const CHART: &str = "/transactions/chart";
/// The route for the per-category counts of a month, for bar charts.
pub const BAR_CHART_DATA: &str = "/api/bar-chart-data";
/// The route for the per-category counts of a month, for pie charts.
pub const PIE_CHART_DATA: &str = "/api/pie-chart-data";
/// The route for the transactions, statistics and histogram of a month in
/// one response.
pub const COMBINED: &str = "/combined";
