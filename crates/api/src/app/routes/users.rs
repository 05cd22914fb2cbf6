//! `/users` routes.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use dashbore_core::User;
use dashbore_infra::{ListQuery, SortKey, UserStore};

use crate::app::errors::ApiError;
use crate::app::pagination::use_pagination;
use crate::app::response;
use crate::app::services::AppServices;
use crate::app::sort::{default_sort, use_sort};
use crate::middleware::{auth_middleware, AuthState};

/// Cache namespace for user listings.
const CACHE_NS: &str = "users";

pub fn router(services: Arc<AppServices>) -> Router {
    Router::new().route(
        "/",
        get(list_users).route_layer(from_fn_with_state(
            AuthState::strict(services, &["users:read"]),
            auth_middleware,
        )),
    )
}

/// Cached shape of one listing page.
///
/// Users deserialize with an empty password (the field is never serialized),
/// so cached pages hold no hashes.
#[derive(Debug, Serialize, Deserialize)]
struct UsersPage {
    data: Vec<User>,
    total: i64,
}

fn cache_params(
    page: i64,
    limit: i64,
    sort: &[SortKey],
    search: Option<&str>,
) -> Vec<(String, String)> {
    let sort_sig: Vec<String> = sort
        .iter()
        .map(|key| format!("{}={}", key.field, key.direction.as_sql().to_lowercase()))
        .collect();

    let mut params = vec![
        ("page".to_string(), page.to_string()),
        ("limit".to_string(), limit.to_string()),
        ("sort".to_string(), sort_sig.join(",")),
    ];
    if let Some(search) = search {
        params.push(("search".to_string(), search.to_string()));
    }
    params
}

/// GET /users — paginated listing with sort/search, memoized in the cache
/// under the canonical parameter signature.
async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let paging = use_pagination(&params);
    let sort = use_sort(&params, default_sort())?;
    let search = params
        .iter()
        .find(|(key, _)| key == "search")
        .map(|(_, value)| value.clone())
        .filter(|value| !value.is_empty());

    let (users, total) = services
        .store
        .list_users(&ListQuery {
            offset: paging.offset,
            limit: paging.limit,
            sort: sort.clone(),
            search: search.clone(),
        })
        .await?;

    let page = services
        .cache
        .get_or_set(
            CACHE_NS,
            &cache_params(paging.page, paging.limit, &sort, search.as_deref()),
            UsersPage { data: users, total },
            None,
        )
        .await?;

    Ok(Json(response::paginated(
        &page.data,
        page.total,
        paging.page,
        paging.limit,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashbore_infra::{build_key, SortDirection};

    #[test]
    fn cache_signature_is_canonical() {
        let sort = vec![
            SortKey::new("id", SortDirection::Desc),
            SortKey::new("email", SortDirection::Asc),
        ];
        let params = cache_params(2, 10, &sort, Some("doe"));
        let key = build_key(CACHE_NS, &params);
        assert_eq!(key, "users:limit=10:page=2:search=doe:sort=id=desc,email=asc");
    }
}
