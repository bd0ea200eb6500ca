//! Requesting and displaying pages of data.

use serde::{Deserialize, Serialize};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to request when none is specified.
    pub default_page: u64,
    /// The number of items to request per page when none is specified.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

impl PaginationConfig {
    /// A request for `page`, or the default page, of the default size.
    pub fn page(&self, page: Option<u64>) -> PageRequest {
        PageRequest {
            page_number: page.unwrap_or(self.default_page).max(1),
            page_size: self.default_page_size,
        }
    }
}

/// Which page of a list to request, sent as the `pageNumber` and `pageSize`
/// query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// The 1-based page number.
    pub page_number: u64,
    /// The maximum number of items on a page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a request for page `page_number` with `page_size` items per page.
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PaginationConfig::default().page(None)
    }
}

/// One page of a list plus the information needed to navigate to the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// The 1-based number of this page.
    pub page_number: u64,
    /// The maximum number of items on a page.
    pub page_size: u64,
    /// The number of items across all pages.
    pub total_count: u64,
    /// The number of pages.
    pub total_pages: u64,
    /// Whether there is a page after this one.
    pub has_next: bool,
    /// Whether there is a page before this one.
    pub has_previous: bool,
}

impl<T> Paginated<T> {
    /// The indicators for a page navigation bar centred on this page.
    pub fn indicators(&self, max_pages: u64) -> Vec<PaginationIndicator> {
        create_pagination_indicators(self.page_number, self.total_pages, max_pages)
    }
}

/// One element of a page navigation bar.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page being shown.
    CurrPage(u64),
    /// Pages left out of the bar.
    Ellipsis,
    /// A link to the next page.
    NextButton(u64),
    /// A link to the previous page.
    BackButton(u64),
}

impl std::fmt::Display for PaginationIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaginationIndicator::Page(page) => write!(f, "{page}"),
            PaginationIndicator::CurrPage(page) => write!(f, "[{page}]"),
            PaginationIndicator::Ellipsis => write!(f, "..."),
            PaginationIndicator::NextButton(_) => write!(f, ">"),
            PaginationIndicator::BackButton(_) => write!(f, "<"),
        }
    }
}

/// Lay out a page navigation bar for `curr_page` out of `page_count` pages,
/// showing at most `max_pages` page numbers around the current page.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    if page_count == 0 {
        return Vec::new();
    }

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

#[cfg(test)]
mod tests {
    use crate::pagination::{
        PageRequest, Paginated, PaginationConfig, PaginationIndicator,
        create_pagination_indicators,
    };

    #[test]
    fn page_request_serializes_as_query_parameters() {
        let query = serde_urlencoded::to_string(PageRequest::new(2, 20)).unwrap();

        assert_eq!(query, "pageNumber=2&pageSize=20");
    }

    #[test]
    fn config_clamps_page_to_one() {
        let config = PaginationConfig::default();

        assert_eq!(config.page(Some(0)), PageRequest::new(1, 20));
        assert_eq!(config.page(None), PageRequest::new(1, 20));
    }

    #[test]
    fn deserializes_envelope() {
        let json = r#"{
            "data": [1, 2],
            "pageNumber": 1,
            "pageSize": 2,
            "totalCount": 3,
            "totalPages": 2,
            "hasNext": true,
            "hasPrevious": false
        }"#;

        let page: Paginated<u32> = serde_json::from_str(json).unwrap();

        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next);
        assert_eq!(
            page.indicators(5),
            vec![
                PaginationIndicator::CurrPage(1),
                PaginationIndicator::Page(2),
                PaginationIndicator::NextButton(2),
            ]
        );
    }

    #[test]
    fn empty_list_has_no_indicators() {
        assert!(create_pagination_indicators(1, 0, 5).is_empty());
    }

    #[test]
    fn indicators_render_as_text() {
        let text = create_pagination_indicators(2, 3, 5)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(text, "< 1 [2] 3 >");
    }

    #[test]
    fn shows_page_subset_on_left() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_both_buttons_and_trailing_ellipsis() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 3;
        let want = [
            PaginationIndicator::BackButton(2),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::CurrPage(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(4),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn pagination_indicator_shows_page_subset_in_center() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 5;
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }
}
