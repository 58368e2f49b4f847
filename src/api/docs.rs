use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Map, Value};

/// Documented query parameter: name, required, is array, schema type
type Param = (&'static str, bool, bool, &'static str);

struct RouteDoc {
    method: &'static str,
    path: &'static str,
    summary: &'static str,
    params: &'static [Param],
    payload: bool,
}

const VARS: Param = ("vars", false, true, "string");
const VAR_FILES: Param = ("var_files", false, true, "string");
const PARALLELISM: Param = ("parallelism", false, false, "integer");

const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "post",
        path: "/init",
        summary: "Prepares your working directory for other commands",
        params: &[],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/validate",
        summary: "Checks whether the configuration is valid",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/plan",
        summary: "Shows changes required by the current configuration",
        params: &[VARS, VAR_FILES],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/apply",
        summary: "Creates or updates infrastructure",
        params: &[
            ("refresh_only", false, false, "boolean"),
            ("replace", false, false, "string"),
            VARS,
            VAR_FILES,
            PARALLELISM,
        ],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/destroy",
        summary: "Destroys previously-created infrastructure",
        params: &[VARS, VAR_FILES, PARALLELISM],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/fmt",
        summary: "Reformats your configuration in the standard style",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/force-unlock",
        summary: "Releases a stuck lock on the current workspace",
        params: &[("lock_id", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/get",
        summary: "Installs or upgrades remote modules",
        params: &[],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/graph",
        summary: "Generates a Graphviz graph of the steps in an operation",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/import",
        summary: "Associates existing infrastructure with a resource",
        params: &[("address", true, false, "string"), ("id", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "get",
        path: "/output",
        summary: "Shows output values from your root module",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "get",
        path: "/providers/schema",
        summary: "Shows schemas for the providers used in the configuration",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/providers/lock",
        summary: "Writes out dependency locks for the configured providers",
        params: &[],
        payload: false,
    },
    RouteDoc {
        method: "get",
        path: "/show",
        summary: "Shows the current state",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "delete",
        path: "/state/rm",
        summary: "Removes instances from the state",
        params: &[("address", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/state/mv",
        summary: "Moves an item in the state",
        params: &[("source", true, false, "string"), ("destination", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "delete",
        path: "/untaint",
        summary: "Removes the 'tainted' state from a resource instance",
        params: &[("address", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "get",
        path: "/version",
        summary: "Shows the Terraform and provider versions",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "get",
        path: "/workspace/show",
        summary: "Shows the name of the current workspace",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "get",
        path: "/workspace/list",
        summary: "Lists workspaces",
        params: &[],
        payload: true,
    },
    RouteDoc {
        method: "post",
        path: "/workspace/select",
        summary: "Selects a workspace",
        params: &[("name", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "post",
        path: "/workspace/new",
        summary: "Creates a new workspace",
        params: &[("name", true, false, "string")],
        payload: false,
    },
    RouteDoc {
        method: "delete",
        path: "/workspace/delete",
        summary: "Deletes a workspace",
        params: &[("name", true, false, "string")],
        payload: false,
    },
];

fn parameter((name, required, array, kind): Param) -> Value {
    let schema = if array {
        json!({ "type": "array", "items": { "type": kind } })
    } else {
        json!({ "type": kind })
    };
    json!({ "name": name, "in": "query", "required": required, "schema": schema })
}

fn operation(route: &RouteDoc) -> Value {
    let envelope = if route.payload { "JSONResult" } else { "Message" };
    let mut responses = json!({
        "200": {
            "description": "Success",
            "content": {
                "application/json": {
                    "schema": { "$ref": format!("#/components/schemas/{}", envelope) }
                }
            }
        },
        "500": {
            "description": "Terraform command failed or the folder is not initialized",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/Message" } }
            }
        }
    });
    if !route.params.is_empty() {
        responses["400"] = json!({
            "description": "Invalid query parameters",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/Message" } }
            }
        });
    }

    json!({
        "summary": route.summary,
        "parameters": route.params.iter().copied().map(parameter).collect::<Vec<_>>(),
        "responses": responses
    })
}

/// OpenAPI document for every route of the API
pub fn openapi_document(api_version: &str) -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        entry[route.method] = operation(route);
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Terraform LCM Service API",
            "version": api_version,
            "description": "A stateful Terraform API for orchestration environment \
                (single user, single project, single deployment)",
            "license": {
                "name": "Mozilla Public License 2.0",
                "url": "https://www.mozilla.org/en-US/MPL/2.0/"
            }
        },
        "servers": [{ "url": "/", "description": "Current server" }],
        "paths": paths,
        "components": {
            "schemas": {
                "Message": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } },
                    "required": ["message"]
                },
                "JSONResult": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "data": { "type": "object" }
                    },
                    "required": ["message"]
                }
            }
        }
    })
}

fn swagger_ui_html() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Terraform LCM Service API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: '/swagger.json',
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#
    .to_string()
}

/// Documentation routes, mounted only in debug mode
pub fn docs_router<S>(swagger_url: &str, api_version: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let base = format!("/{}", swagger_url.trim_matches('/'));
    let index = format!("{}/index.html", base);
    let document = openapi_document(api_version);

    let redirect_to = index.clone();
    Router::new()
        .route(
            &base,
            get(move || {
                let location = redirect_to.clone();
                async move {
                    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
                }
            }),
        )
        .route(&index, get(|| async { Html(swagger_ui_html()) }))
        .route(
            "/swagger.json",
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
}
