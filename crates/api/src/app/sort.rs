//! Ordering derivation from repeated `sort=field=asc|desc` parameters.

use dashbore_infra::{SortDirection, SortKey};

use super::errors::ApiError;

/// Default user-listing order: newest first.
pub fn default_sort() -> Vec<SortKey> {
    vec![
        SortKey::new("id", SortDirection::Desc),
        SortKey::new("createdAt", SortDirection::Desc),
    ]
}

fn parse_sort_value(value: &str) -> Result<SortKey, ApiError> {
    let (field, direction) = value.split_once('=').unwrap_or((value, ""));

    let direction = match direction {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => {
            return Err(ApiError::Validation(format!(
                "invalid sort parameter at object {{\"{field}\":\"{other}\"}}"
            )));
        }
    };

    Ok(SortKey::new(field, direction))
}

/// Read zero or more repeated `sort` parameters.
///
/// Zero occurrences yield the supplied default; otherwise each occurrence is
/// parsed independently and returned in order (multi-key sort, evaluated in
/// list order). Directions other than exactly `asc`/`desc` fail validation,
/// naming the offending pair.
pub fn use_sort(
    params: &[(String, String)],
    default: Vec<SortKey>,
) -> Result<Vec<SortKey>, ApiError> {
    let values: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "sort")
        .map(|(_, value)| value.as_str())
        .collect();

    if values.is_empty() {
        return Ok(default);
    }

    values.into_iter().map(parse_sort_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(values: &[&str]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|v| ("sort".to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn zero_params_return_the_default() {
        let sort = use_sort(&[], default_sort()).unwrap();
        assert_eq!(sort, default_sort());
    }

    #[test]
    fn single_param_parses_to_one_pair() {
        let sort = use_sort(&params(&["name=asc"]), default_sort()).unwrap();
        assert_eq!(sort, vec![SortKey::new("name", SortDirection::Asc)]);
    }

    #[test]
    fn invalid_direction_is_a_validation_failure() {
        let err = use_sort(&params(&["name=ascx"]), default_sort()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("name") && msg.contains("ascx")));

        let err = use_sort(&params(&["name"]), default_sort()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn multiple_params_keep_their_order() {
        let sort = use_sort(&params(&["a=desc", "b=asc"]), default_sort()).unwrap();
        assert_eq!(
            sort,
            vec![
                SortKey::new("a", SortDirection::Desc),
                SortKey::new("b", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn other_query_params_are_ignored() {
        let mixed = vec![
            ("page".to_string(), "2".to_string()),
            ("sort".to_string(), "email=asc".to_string()),
        ];
        let sort = use_sort(&mixed, default_sort()).unwrap();
        assert_eq!(sort, vec![SortKey::new("email", SortDirection::Asc)]);
    }
}
