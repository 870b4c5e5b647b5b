use axum::{extract::State, response::Html, routing::get, Router};

use crate::db;
use crate::render::page;
use crate::routes::{PageError, PageResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/points", get(points_page))
}

/// Owner points leaderboard, highest first.
async fn points_page(State(state): State<AppState>) -> PageResult {
    let owners = db::points::all_owner_points(&state.pool)
        .await
        .map_err(|e| PageError::internal("Owner Points", e))?;
    if owners.is_empty() {
        return Ok(Html(page::empty_page(
            "Owner Points",
            "Owner Points",
            "No points have been awarded yet.",
        )));
    }

    let mut rows = String::new();
    for (rank, row) in owners.iter().enumerate() {
        rows.push_str(&format!(
            "          <tr><td>{}</td><td>{}</td><td data-value=\"{points}\">{points}</td></tr>\n",
            rank + 1,
            page::escape(&row.owner),
            points = row.points,
        ));
    }

    let body = format!(
        r#"    <h1>Owner Points</h1>
    <p class="stats">{count} owners</p>
    <table id="pointsTable">
      <thead>
        <tr>
          <th data-sort="number">Rank</th>
          <th data-sort="string">Owner</th>
          <th data-sort="number">Points</th>
        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#,
        count = owners.len(),
    );

    Ok(Html(page::document(
        "Owner Points",
        &[page::BASE_STYLE, page::TABLE_STYLE],
        &page::sortable_script("pointsTable", 2, "desc"),
        &body,
    )))
}
