//! Response bodies that aren't upstream payloads.

use serde::Serialize;

/// Error body: `{ "error": { "message": ... } }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
            },
        }
    }
}

/// Reply to the arrivals smoke test.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body of `GET /api`.
#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub message: &'static str,
    pub routes: ApiRoutes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoutes {
    pub arrivals: &'static str,
    pub buses_in_service: &'static str,
}

impl Default for ApiIndex {
    fn default() -> Self {
        Self {
            message: "Seta Bus API",
            routes: ApiRoutes {
                arrivals: "/api/arrivals/:stopId",
                buses_in_service: "/api/buses-in-service",
            },
        }
    }
}

/// Body of `GET /static`.
#[derive(Debug, Serialize)]
pub struct StaticIndex {
    pub message: &'static str,
    pub routes: StaticRoutes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticRoutes {
    pub route_codes: &'static str,
    pub route_numbers: &'static str,
    pub stop_list: &'static str,
}

impl Default for StaticIndex {
    fn default() -> Self {
        Self {
            message: "Static Files API",
            routes: StaticRoutes {
                route_codes: "/static/route-codes",
                route_numbers: "/static/route-numbers",
                stop_list: "/static/stop-list",
            },
        }
    }
}
