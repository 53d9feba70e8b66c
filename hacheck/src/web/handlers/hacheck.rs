// Health check endpoints for HAProxy and uptime monitors

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use super::common::{error_response, parse_deviance, DevianceQuery};
use crate::constants::http::HAPROXY_STATE_HEADER;
use crate::errors::HaCheckError;
use crate::status::StatusRequest;
use crate::web::AppState;

/// Identifier supplied by the route, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    None,
    Node { group: String, node_id: String },
    MiningAddress(String),
}

/// Pull the server name out of an `X-Haproxy-Server-State` value,
/// e.g. `UP 2/3; name=bck/srv2; node=lb1; weight=1/2`
pub fn parse_haproxy_server_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("name="))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Decide what a request asks about.
///
/// The HAProxy state header wins over path parameters, which win over a
/// mining address. Only header requests are failover checks.
pub fn resolve_lookup(
    headers: &HeaderMap,
    route: RouteTarget,
    deviance: Option<&str>,
) -> Result<StatusRequest, HaCheckError> {
    let deviance_override = parse_deviance(deviance)?;

    if let Some(value) = headers.get(HAPROXY_STATE_HEADER) {
        let raw = value.to_str().unwrap_or_default();
        info!("{}: {}", HAPROXY_STATE_HEADER, raw);

        let key = parse_haproxy_server_name(raw).ok_or_else(|| HaCheckError::InvalidRequest {
            reason: format!("{} header carries no server name", HAPROXY_STATE_HEADER),
        })?;

        return Ok(StatusRequest {
            key,
            mining_address: false,
            deviance_override,
            failover_check: true,
        });
    }

    match route {
        RouteTarget::Node { group, node_id } => Ok(StatusRequest {
            key: format!("{}/{}", group, node_id),
            mining_address: false,
            deviance_override,
            failover_check: false,
        }),
        RouteTarget::MiningAddress(address) => Ok(StatusRequest {
            key: address,
            mining_address: true,
            deviance_override,
            failover_check: false,
        }),
        RouteTarget::None => Err(HaCheckError::InvalidRequest {
            reason: format!(
                "request is missing header {} or a node name",
                HAPROXY_STATE_HEADER
            ),
        }),
    }
}

fn respond(state: &AppState, headers: &HeaderMap, route: RouteTarget, query: &DevianceQuery) -> Response {
    let request = match resolve_lookup(headers, route, query.deviance.as_deref()) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected health check: {}", e);
            return error_response(e);
        }
    };

    match state.evaluator.evaluate(&request) {
        Ok(report) => {
            let code = if report.status.is_up() {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (code, Json(report)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// `GET /hacheck` - identified by the HAProxy state header
pub async fn hacheck_by_header(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DevianceQuery>,
) -> Response {
    respond(&state, &headers, RouteTarget::None, &query)
}

/// `GET /hacheck/{node_group}/{node_id}`
pub async fn hacheck_by_node(
    State(state): State<AppState>,
    Path((node_group, node_id)): Path<(String, String)>,
    headers: HeaderMap,
    Query(query): Query<DevianceQuery>,
) -> Response {
    let route = RouteTarget::Node {
        group: node_group,
        node_id,
    };
    respond(&state, &headers, route, &query)
}

/// `GET /hacheck/miningaddress/{mining_address}`
pub async fn hacheck_by_mining_address(
    State(state): State<AppState>,
    Path(mining_address): Path<String>,
    headers: HeaderMap,
    Query(query): Query<DevianceQuery>,
) -> Response {
    respond(&state, &headers, RouteTarget::MiningAddress(mining_address), &query)
}
