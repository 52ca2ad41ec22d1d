use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Window over a listing. `limit`/`offset` override the page-derived window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<PageParams> for Pagination {
    fn from(params: PageParams) -> Self {
        Pagination {
            page: params.page.unwrap_or(1).max(1),
            per_page: params
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
            limit: params.limit.map(|l| l.clamp(1, MAX_PER_PAGE)),
            offset: params.offset.map(|o| o.max(0)),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        PageParams::default().into()
    }
}

impl Pagination {
    pub fn sql_limit(&self) -> i64 {
        self.limit.unwrap_or(self.per_page)
    }

    pub fn sql_offset(&self) -> i64 {
        self.offset
            .unwrap_or_else(|| (self.page - 1).saturating_mul(self.per_page))
    }

    pub fn meta(&self, total: i64) -> Value {
        json!({
            "page": self.page,
            "per_page": self.per_page,
            "total": total,
            "limit": self.limit,
            "offset": self.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = Pagination::default();
        assert_eq!((p.sql_limit(), p.sql_offset()), (10, 0));
        assert_eq!(p.meta(3), json!({
            "page": 1, "per_page": 10, "total": 3, "limit": null, "offset": null
        }));
    }

    #[test]
    fn page_derives_offset() {
        let p: Pagination = PageParams { page: Some(3), per_page: Some(20), ..Default::default() }.into();
        assert_eq!((p.sql_limit(), p.sql_offset()), (20, 40));
    }

    #[test]
    fn limit_and_offset_override_page() {
        let p: Pagination = PageParams {
            page: Some(5),
            per_page: Some(10),
            limit: Some(2),
            offset: Some(7),
        }
        .into();
        assert_eq!((p.sql_limit(), p.sql_offset()), (2, 7));
        assert_eq!(p.meta(0)["limit"], 2);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let p: Pagination = PageParams {
            page: Some(-4),
            per_page: Some(10_000),
            limit: Some(0),
            offset: Some(-1),
        }
        .into();
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, MAX_PER_PAGE);
        assert_eq!(p.limit, Some(1));
        assert_eq!(p.offset, Some(0));
    }
}
