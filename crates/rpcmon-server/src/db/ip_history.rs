use sqlx::PgPool;

use rpcmon_common::models::{IpHourRow, IpOriginCount, IpTotals, OriginHourRow};

/// IPs with the highest total request count over the trailing window.
pub async fn top_ips(pool: &PgPool, days: i64, limit: i64) -> anyhow::Result<Vec<String>> {
    let ips = sqlx::query_scalar::<_, String>(
        r#"SELECT ip
           FROM ip_history
           WHERE hour_timestamp >= EXTRACT(EPOCH FROM NOW() - ($1 || ' days')::interval)
           GROUP BY ip
           ORDER BY SUM(request_count) DESC
           LIMIT $2"#,
    )
    .bind(days.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(ips)
}

/// Hourly request counts for the given IPs, oldest hour first.
pub async fn ip_timeseries(pool: &PgPool, days: i64, ips: &[String]) -> anyhow::Result<Vec<IpHourRow>> {
    let rows = sqlx::query_as::<_, IpHourRow>(
        r#"SELECT ip, hour_timestamp, request_count
           FROM ip_history
           WHERE hour_timestamp >= EXTRACT(EPOCH FROM NOW() - ($1 || ' days')::interval)
             AND ip = ANY($2)
           ORDER BY hour_timestamp ASC, ip"#,
    )
    .bind(days.to_string())
    .bind(ips)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Origins with the highest summed request counts, unpacked from the
/// per-IP jsonb breakdown.
pub async fn top_origins(pool: &PgPool, days: i64, limit: i64) -> anyhow::Result<Vec<String>> {
    let origins = sqlx::query_scalar::<_, String>(
        r#"SELECT origin_key
           FROM ip_history,
                jsonb_each_text(origins) AS origin_data(origin_key, origin_value)
           WHERE hour_timestamp >= EXTRACT(EPOCH FROM NOW() - ($1 || ' days')::interval)
           GROUP BY origin_key
           ORDER BY SUM((origin_value)::bigint) DESC
           LIMIT $2"#,
    )
    .bind(days.to_string())
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(origins)
}

/// Hourly request counts per origin for the given origins, oldest first.
pub async fn origin_timeseries(
    pool: &PgPool,
    days: i64,
    origins: &[String],
) -> anyhow::Result<Vec<OriginHourRow>> {
    let rows = sqlx::query_as::<_, OriginHourRow>(
        r#"SELECT origin_key AS origin,
                  hour_timestamp,
                  SUM((origin_value)::bigint)::bigint AS request_count
           FROM ip_history,
                jsonb_each_text(origins) AS origin_data(origin_key, origin_value)
           WHERE hour_timestamp >= EXTRACT(EPOCH FROM NOW() - ($1 || ' days')::interval)
             AND origin_key = ANY($2)
           GROUP BY hour_timestamp, origin_key
           ORDER BY hour_timestamp ASC, origin_key"#,
    )
    .bind(days.to_string())
    .bind(origins)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Aggregate totals for the IP table page: top IPs by all-time requests,
/// with a trailing-hour count alongside.
pub async fn ip_totals(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<IpTotals>> {
    let rows = sqlx::query_as::<_, IpTotals>(
        r#"SELECT ip,
                  SUM(request_count)::bigint AS total_requests,
                  SUM(request_count) FILTER (
                      WHERE hour_timestamp >= EXTRACT(EPOCH FROM NOW() - interval '1 hour')
                  )::bigint AS requests_last_hour
           FROM ip_history
           GROUP BY ip
           ORDER BY total_requests DESC
           LIMIT $1"#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-origin request counts for the given IPs.
pub async fn ip_origin_counts(pool: &PgPool, ips: &[String]) -> anyhow::Result<Vec<IpOriginCount>> {
    let rows = sqlx::query_as::<_, IpOriginCount>(
        r#"SELECT ip,
                  origin_key AS origin,
                  SUM((origin_value)::bigint)::bigint AS request_count
           FROM ip_history,
                jsonb_each_text(origins) AS origin_data(origin_key, origin_value)
           WHERE ip = ANY($1)
           GROUP BY ip, origin_key
           ORDER BY ip, request_count DESC"#,
    )
    .bind(ips)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
