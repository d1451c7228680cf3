//! Resolves month names from query parameters into month filters.

use time::Month;

/// The months in calendar order with their full English names.
const MONTH_NAMES: [(&str, Month); 12] = [
    ("january", Month::January),
    ("february", Month::February),
    ("march", Month::March),
    ("april", Month::April),
    ("may", Month::May),
    ("june", Month::June),
    ("july", Month::July),
    ("august", Month::August),
    ("september", Month::September),
    ("october", Month::October),
    ("november", Month::November),
    ("december", Month::December),
];

/// Resolve a month name such as "January" to its calendar month.
///
/// Matching ignores case and surrounding whitespace, and accepts the
/// three-letter abbreviation ("Jan") as well as the full name.
///
/// Returns `None` if `name` is not the name of a month.
pub fn resolve_month(name: &str) -> Option<Month> {
    let name = name.trim().to_lowercase();

    MONTH_NAMES
        .iter()
        .find(|(full_name, _)| *full_name == name || (name.len() == 3 && full_name[..3] == name))
        .map(|(_, month)| *month)
}

/// Restricts a query to transactions sold in one calendar month, in any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// Match transactions sold in this month.
    Month(Month),
    /// The requested month name was not recognized, match nothing.
    Unrecognized,
}

impl MonthFilter {
    /// Create a filter from a month name, see [resolve_month].
    pub fn from_name(name: &str) -> Self {
        match resolve_month(name) {
            Some(month) => Self::Month(month),
            None => Self::Unrecognized,
        }
    }

    /// Create a filter for a query where the month is optional.
    ///
    /// An absent or empty name means "any month" and gives `None`.
    pub fn optional(name: Option<&str>) -> Option<Self> {
        name.filter(|name| !name.trim().is_empty())
            .map(Self::from_name)
    }

    /// Create a filter for a query that always needs a month.
    ///
    /// An absent name is treated the same as an unrecognized one.
    pub fn required(name: Option<&str>) -> Self {
        name.map_or(Self::Unrecognized, Self::from_name)
    }
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::{MonthFilter, resolve_month};

    #[test]
    fn resolves_every_month_name() {
        let names = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];

        for (i, name) in names.iter().enumerate() {
            let month = resolve_month(name).unwrap_or_else(|| panic!("{name} did not resolve"));
            assert_eq!(u8::from(month) as usize, i + 1, "wrong month for {name}");
        }
    }

    #[test]
    fn ignores_case_and_whitespace() {
        assert_eq!(resolve_month("MARCH"), Some(Month::March));
        assert_eq!(resolve_month("  june "), Some(Month::June));
    }

    #[test]
    fn accepts_abbreviations() {
        assert_eq!(resolve_month("Sep"), Some(Month::September));
        assert_eq!(resolve_month("dec"), Some(Month::December));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(resolve_month("Smarch"), None);
        assert_eq!(resolve_month("Ja"), None);
        assert_eq!(resolve_month("Janu"), None);
        assert_eq!(resolve_month("January 1, 2020"), None);
        assert_eq!(resolve_month("13"), None);
        assert_eq!(resolve_month(""), None);
    }

    #[test]
    fn filter_from_name_resolves_month() {
        assert_eq!(MonthFilter::from_name("Smarch"), MonthFilter::Unrecognized);
        assert_eq!(
            MonthFilter::from_name("April"),
            MonthFilter::Month(Month::April)
        );
    }

    #[test]
    fn optional_month_ignores_absent_and_empty_names() {
        assert_eq!(MonthFilter::optional(None), None);
        assert_eq!(MonthFilter::optional(Some("")), None);
        assert_eq!(
            MonthFilter::optional(Some("May")),
            Some(MonthFilter::Month(Month::May))
        );
        assert_eq!(
            MonthFilter::optional(Some("Smarch")),
            Some(MonthFilter::Unrecognized)
        );
    }

    #[test]
    fn required_month_treats_absent_name_as_unrecognized() {
        assert_eq!(MonthFilter::required(None), MonthFilter::Unrecognized);
        assert_eq!(
            MonthFilter::required(Some("July")),
            MonthFilter::Month(Month::July)
        );
    }
}
