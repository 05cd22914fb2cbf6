//! Route metadata and the documentation endpoints.
//!
//! Handlers do not participate in documentation assembly: this module holds
//! a plain catalog of route metadata and a generator that renders it as a
//! minimal OpenAPI 3 document. Swapping the generator never touches the
//! handlers.

use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

/// Plain structured description of one route.
pub struct RouteMeta {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub required_permissions: &'static [&'static str],
    pub secured: bool,
}

/// Everything the API exposes, in declaration order.
pub fn catalog() -> &'static [RouteMeta] {
    &[
        RouteMeta {
            method: "post",
            path: "/auth/login",
            summary: "Login to the application",
            description: "Password-based authentication; returns a bearer token.",
            tags: &["auth"],
            required_permissions: &[],
            secured: false,
        },
        RouteMeta {
            method: "get",
            path: "/auth/whoami",
            summary: "Get the current user information",
            description: "Resolves the caller's full user record from the token.",
            tags: &["auth"],
            required_permissions: &[],
            secured: true,
        },
        RouteMeta {
            method: "get",
            path: "/users",
            summary: "List users",
            description: "Paginated user listing with sort and search.",
            tags: &["users"],
            required_permissions: &["users:read"],
            secured: true,
        },
    ]
}

/// Render the catalog as a minimal OpenAPI 3 document.
pub fn openapi_document(routes: &[RouteMeta]) -> Value {
    let mut paths = serde_json::Map::new();
    for route in routes {
        let mut operation = json!({
            "summary": route.summary,
            "description": route.description,
            "tags": route.tags,
            "responses": { "200": { "description": "Success envelope" } },
        });
        if route.secured {
            operation["security"] = json!([{ "bearerAuth": [] }]);
        }
        if !route.required_permissions.is_empty() {
            operation["x-required-permissions"] = json!(route.required_permissions);
        }

        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| json!({}));
        entry[route.method] = operation;
    }

    json!({
        "openapi": "3.0.3",
        "info": { "title": "dashbore API", "version": env!("CARGO_PKG_VERSION") },
        "paths": paths,
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" },
            },
        },
    })
}

pub async fn openapi() -> Json<Value> {
    Json(openapi_document(catalog()))
}

/// Static Swagger-UI page pointing at `/openapi`.
pub async fn swagger() -> Html<&'static str> {
    Html(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>dashbore API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({ url: "/openapi", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>"##,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_cataloged_route() {
        let doc = openapi_document(catalog());
        assert_eq!(doc["openapi"], "3.0.3");
        assert!(doc["paths"]["/auth/login"]["post"].is_object());
        assert!(doc["paths"]["/auth/whoami"]["get"].is_object());
        assert_eq!(
            doc["paths"]["/users"]["get"]["x-required-permissions"][0],
            "users:read"
        );
        // Public routes carry no security requirement.
        assert!(doc["paths"]["/auth/login"]["post"].get("security").is_none());
    }
}
