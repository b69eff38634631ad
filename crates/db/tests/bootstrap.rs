use sqlx::PgPool;

/// Connect, migrate, verify the schema came up.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    procura_db::health_check(&pool).await.unwrap();

    // All eight tables exist and are empty on a fresh database.
    let tables = [
        "employees",
        "organizations",
        "organization_responsibles",
        "tenders",
        "tender_versions",
        "bids",
        "bid_versions",
        "bid_decisions",
    ];
    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}
