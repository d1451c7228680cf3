//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A one-based page number and a page size, both at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The page number, starting from one.
    pub number: u64,
    /// The maximum number of items on a page.
    pub size: u64,
}

impl Page {
    /// Create a page, falling back to the defaults in `config` for missing
    /// values.
    ///
    /// A page number or size of zero is raised to one.
    pub fn new(number: Option<u64>, size: Option<u64>, config: &PaginationConfig) -> Self {
        Self {
            number: number.unwrap_or(config.default_page).max(1),
            size: size.unwrap_or(config.default_page_size).max(1),
        }
    }

    /// The number of items that come before this page.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// The number of pages needed to show `item_count` items.
    pub fn count(&self, item_count: u64) -> u64 {
        item_count.div_ceil(self.size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Page, PaginationConfig};

    #[test]
    fn uses_defaults_for_missing_values() {
        let config = PaginationConfig::default();

        let got = Page::new(None, None, &config);

        assert_eq!(got, Page { number: 1, size: 10 });
    }

    #[test]
    fn raises_zero_to_one() {
        let config = PaginationConfig::default();

        let got = Page::new(Some(0), Some(0), &config);

        assert_eq!(got, Page { number: 1, size: 1 });
    }

    #[test]
    fn offset_skips_previous_pages() {
        let page = Page { number: 3, size: 20 };

        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn zero_page_and_size_do_not_panic() {
        let page = Page { number: 0, size: 0 };

        assert_eq!(page.offset(), 0);
        assert_eq!(page.count(5), 5);
    }

    #[test]
    fn first_page_has_no_offset() {
        let page = Page { number: 1, size: 20 };

        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = Page { number: 1, size: 2 };

        assert_eq!(page.count(0), 0);
        assert_eq!(page.count(4), 2);
        assert_eq!(page.count(5), 3);
    }
}
