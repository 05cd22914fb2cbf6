//! Page/limit/offset derivation from query parameters.

/// Derived pagination window. `offset = (page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

fn numeric_param(params: &[(String, String)], name: &str, default: i64) -> i64 {
    params
        .iter()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .unwrap_or(default)
}

/// Coerce `page`/`limit` from textual query parameters; page defaults to 1,
/// limit to 10. Page is clamped to at least 1 and limit to at least 0 so
/// the derived offset is never negative. No upper bound on limit is
/// enforced.
pub fn use_pagination(params: &[(String, String)]) -> Pagination {
    let page = numeric_param(params, "page", 1).max(1);
    let limit = numeric_param(params, "limit", 10).max(0);

    Pagination {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_absent() {
        let p = use_pagination(&[]);
        assert_eq!(p, Pagination { page: 1, limit: 10, offset: 0 });
    }

    #[test]
    fn offset_derives_from_page_and_limit() {
        let p = use_pagination(&params(&[("page", "3"), ("limit", "25")]));
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 25);
        assert_eq!(p.offset, 50);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        // page=0 must not produce a negative offset.
        let p = use_pagination(&params(&[("page", "0")]));
        assert_eq!(p, Pagination { page: 1, limit: 10, offset: 0 });

        let p = use_pagination(&params(&[("page", "-3"), ("limit", "-5")]));
        assert_eq!(p, Pagination { page: 1, limit: 0, offset: 0 });
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let p = use_pagination(&params(&[("page", "abc"), ("limit", "")]));
        assert_eq!(p, Pagination { page: 1, limit: 10, offset: 0 });
    }
}
