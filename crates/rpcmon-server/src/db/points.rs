use sqlx::PgPool;

use rpcmon_common::models::OwnerPoints;

pub async fn all_owner_points(pool: &PgPool) -> anyhow::Result<Vec<OwnerPoints>> {
    let rows = sqlx::query_as::<_, OwnerPoints>(
        "SELECT owner, points FROM owner_points ORDER BY points DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
