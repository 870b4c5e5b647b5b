use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;
use crate::upstream;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activenodes", get(active_nodes_page))
        .route("/nodecontinents", get(node_continents))
        .route("/rpcsitestats", get(rpc_site_stats))
        .route("/yournodes", get(your_nodes))
}

/// Pool membership table, one row per connected node.
async fn active_nodes_page(State(state): State<AppState>) -> PageResult {
    let nodes = upstream::pool::fetch_pool_nodes(&state)
        .await
        .map_err(|e| PageError::internal("Active Nodes", e))?;
    if nodes.is_empty() {
        return Ok(Html(page::empty_page(
            "Active Nodes",
            "Active Nodes",
            "No nodes are currently connected to the pool.",
        )));
    }

    let mut rows = String::new();
    for node in nodes.values() {
        rows.push_str(&node_row(node));
    }

    let body = format!(
        r#"    <h1>Active Nodes ({count})</h1>
    <table id="nodesTable">
      <thead>
        <tr>
          <th data-sort="string">Node ID</th>
          <th data-sort="string">Owner</th>
          <th data-sort="string">Node Version</th>
          <th data-sort="string">Execution Client</th>
          <th data-sort="string">Consensus Client</th>
          <th data-sort="string">System Usage</th>
          <th data-sort="string">Block Info</th>
          <th data-sort="string">Peers</th>
          <th data-sort="string">Git Info</th>
          <th>Peer Details</th>
          <th>Ports</th>
          <th data-sort="string">Socket ID</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#,
        count = nodes.len(),
    );

    Ok(Html(page::document(
        "Active Nodes",
        &[page::BASE_STYLE, page::TABLE_STYLE, NODES_STYLE],
        &page::sortable_script("nodesTable", 1, "asc"),
        &body,
    )))
}

fn node_row(node: &Value) -> String {
    // Execution port is the trailing segment of the enode URL.
    let execution_port = node
        .get("enode")
        .and_then(Value::as_str)
        .and_then(|e| e.rsplit(':').next())
        .map_or_else(|| "N/A".to_string(), |p| page::escape(p));
    let socket_id = match node.get("socket_id").and_then(|s| s.get("id")) {
        Some(Value::String(s)) => page::escape(s),
        _ => "N/A".to_string(),
    };
    format!(
        r#"          <tr>
            <td>{id}</td>
            <td>{owner}</td>
            <td>{version}</td>
            <td>{execution}</td>
            <td>{consensus}</td>
            <td>CPU: {cpu}%<br>Memory: {memory}%<br>Storage: {storage}%</td>
            <td>Number: {block_number}<br>Hash: <span class="mono">{block_hash}</span></td>
            <td>Execution: {execution_peers}<br>Consensus: {consensus_peers}</td>
            <td>Branch: {git_branch}<br>Last Commit: {last_commit}<br>Hash: <span class="mono">{commit_hash}</span></td>
            <td><details><summary>View Details</summary><div class="peer-details"><strong>Enode:</strong><br><span class="mono">{enode}</span><br><br><strong>Peer ID:</strong><br><span class="mono">{peerid}</span><br><br><strong>ENR:</strong><br><span class="mono">{enr}</span></div></details></td>
            <td>EP: {execution_port}<br>CP: {consensus_tcp}, {consensus_udp}</td>
            <td>{socket_id}</td>
          </tr>
"#,
        id = field(node, "id"),
        owner = field(node, "owner"),
        version = field(node, "node_version"),
        execution = field(node, "execution_client"),
        consensus = field(node, "consensus_client"),
        cpu = field(node, "cpu_usage"),
        memory = field(node, "memory_usage"),
        storage = field(node, "storage_usage"),
        block_number = field(node, "block_number"),
        block_hash = field(node, "block_hash"),
        execution_peers = field(node, "execution_peers"),
        consensus_peers = field(node, "consensus_peers"),
        git_branch = field(node, "git_branch"),
        last_commit = field(node, "last_commit"),
        commit_hash = field(node, "commit_hash"),
        enode = field(node, "enode"),
        peerid = field(node, "peerid"),
        enr = field(node, "enr"),
        consensus_tcp = field(node, "consensus_tcp_port"),
        consensus_udp = field(node, "consensus_udp_port"),
    )
}

const NODES_STYLE: &str = r#"
.mono { font-family: monospace; font-size: 0.9em; word-break: break-all; }
.peer-details { margin-top: 8px; }
details summary { cursor: pointer; color: #0066cc; }
details summary:hover { text-decoration: underline; }
"#;

/// Render one node field, `N/A` when absent.
fn field(node: &Value, key: &str) -> String {
    match node.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => page::escape(s),
        Some(other) => page::escape(&other.to_string()),
    }
}

type JsonError = (StatusCode, Json<Value>);

fn upstream_error(what: &str, err: anyhow::Error) -> JsonError {
    tracing::error!("Failed to fetch {what}: {err:#}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("Failed to fetch {what}") })),
    )
}

async fn node_continents(State(state): State<AppState>) -> Result<Json<Value>, JsonError> {
    upstream::pool::fetch_node_continents(&state)
        .await
        .map(Json)
        .map_err(|e| upstream_error("node continents data", e))
}

async fn rpc_site_stats(State(state): State<AppState>) -> Result<Json<Value>, JsonError> {
    upstream::pool::fetch_rpc_site_stats(&state)
        .await
        .map(Json)
        .map_err(|e| upstream_error("site stats", e))
}

#[derive(Deserialize)]
struct OwnerQuery {
    owner: Option<String>,
}

/// Relay the pool's per-owner node list, preserving its status code.
async fn your_nodes(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<(StatusCode, Json<Value>), JsonError> {
    let owner = match query.owner.as_deref() {
        Some(owner) if !owner.is_empty() => owner,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing owner",
                    "message": "Provide an owner address via the owner query parameter.",
                })),
            ))
        }
    };

    let (status, body) = upstream::pool::fetch_owner_nodes(&state, owner)
        .await
        .map_err(|e| upstream_error("owner nodes", e))?;
    let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_node_fields_render_na() {
        let node = json!({ "owner": "0xabc" });
        assert_eq!(field(&node, "owner"), "0xabc");
        assert_eq!(field(&node, "country"), "N/A");
        assert_eq!(field(&node, "null_field"), "N/A");
    }

    #[test]
    fn non_string_fields_are_stringified() {
        let node = json!({ "block_number": 19000000 });
        assert_eq!(field(&node, "block_number"), "19000000");
    }

    #[test]
    fn node_row_unpacks_nested_fields() {
        let node = json!({
            "id": "node-1",
            "enode": "enode://abc@1.2.3.4:30303",
            "socket_id": { "id": "sock-9" },
        });
        let row = node_row(&node);
        assert!(row.contains("EP: 30303"));
        assert!(row.contains("<td>sock-9</td>"));
        assert!(row.contains("CPU: N/A%"));
    }
}
