//! Integration tests for the content version stores.
//!
//! Exercises the tender and bid repositories against a real database:
//! - Version chains start at 1 and stay contiguous under patch/rollback
//! - Patch overlays only the fields present in the payload
//! - Rollback copies target content verbatim at a new version number
//! - The unique constraint rejects duplicate version numbers
//! - Status updates are compare-and-set

use procura_db::models::bid::{BidPatch, CreateBid};
use procura_db::models::organization::CreateOrganization;
use procura_db::models::tender::{CreateTender, TenderPatch};
use procura_db::repositories::{BidRepo, OrganizationRepo, TenderRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_organization(pool: &PgPool) -> i64 {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: "Acme Construction".to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_tender(organization_id: i64, name: &str) -> CreateTender {
    CreateTender {
        organization_id,
        name: name.to_string(),
        description: "Initial description".to_string(),
        service_type: "Construction".to_string(),
    }
}

async fn seed_bid(pool: &PgPool, tender_id: i64) -> i64 {
    BidRepo::create(
        pool,
        &CreateBid {
            tender_id,
            author_type: "Organization".to_string(),
            author_id: seed_organization(pool).await,
            name: "Competitive offer".to_string(),
            description: "We can do it".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_starts_chain_at_version_one(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    assert_eq!(tender.version, 1);
    assert_eq!(tender.status, "Created");
    assert_eq!(tender.name, "Roof repair");

    let found = TenderRepo::find_latest(&pool, tender.id).await.unwrap();
    assert_eq!(found.unwrap().version, 1);
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_overlays_only_present_fields(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    let patch = TenderPatch {
        description: Some("Updated scope".to_string()),
        ..Default::default()
    };
    let updated = TenderRepo::patch(&pool, tender.id, &patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.version, 2);
    assert_eq!(updated.name, "Roof repair");
    assert_eq!(updated.description, "Updated scope");
    assert_eq!(updated.service_type, "Construction");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_patch_still_advances_version(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    let updated = TenderRepo::patch(&pool, tender.id, &TenderPatch::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.version, 2);
    assert_eq!(updated.name, tender.name);
    assert_eq!(updated.description, tender.description);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_unknown_tender_returns_none(pool: PgPool) {
    let patch = TenderPatch {
        name: Some("Ghost".to_string()),
        ..Default::default()
    };
    let result = TenderRepo::patch(&pool, 424242, &patch).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sequential_patches_stay_contiguous(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    for i in 2..=6 {
        let patch = TenderPatch {
            description: Some(format!("revision {i}")),
            ..Default::default()
        };
        let updated = TenderRepo::patch(&pool, tender.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, i);
    }

    let versions = TenderRepo::list_versions(&pool, tender.id).await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![6, 5, 4, 3, 2, 1]);
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_copies_target_content_verbatim(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    let patch = TenderPatch {
        name: Some("Roof replacement".to_string()),
        description: Some("Bigger scope".to_string()),
        service_type: Some("Demolition".to_string()),
    };
    TenderRepo::patch(&pool, tender.id, &patch).await.unwrap();

    let restored = TenderRepo::rollback(&pool, tender.id, 1)
        .await
        .unwrap()
        .unwrap();

    // Content reverts, the counter advances.
    assert_eq!(restored.version, 3);
    assert_eq!(restored.name, "Roof repair");
    assert_eq!(restored.description, "Initial description");
    assert_eq!(restored.service_type, "Construction");

    // History did not shrink: version 2 is still there.
    let v2 = TenderRepo::find_version(&pool, tender.id, 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(v2.name, "Roof replacement");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_to_missing_version_returns_none(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    let result = TenderRepo::rollback(&pool, tender.id, 9).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Version uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_version_number_rejected(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    // Simulate the losing side of a concurrent read-max-then-insert race.
    let err = sqlx::query(
        "INSERT INTO tender_versions (tender_id, version, name, description, service_type) \
         VALUES ($1, 1, 'dup', 'dup', 'dup')",
    )
    .bind(tender.id)
    .execute(&pool)
    .await
    .unwrap_err();

    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(
        db_err.constraint(),
        Some("uq_tender_versions_tender_version")
    );
}

// ---------------------------------------------------------------------------
// Status compare-and-set
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transition_status_is_compare_and_set(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();

    let moved = TenderRepo::transition_status(&pool, tender.id, "Created", "Published")
        .await
        .unwrap();
    assert!(moved);

    // Same expectation again: the row is no longer 'Created'.
    let moved_again = TenderRepo::transition_status(&pool, tender.id, "Created", "Published")
        .await
        .unwrap();
    assert!(!moved_again);

    let current = TenderRepo::find_latest(&pool, tender.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.status, "Published");
}

// ---------------------------------------------------------------------------
// Bids mirror the tender chain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bid_chain_patch_and_rollback(pool: PgPool) {
    let org_id = seed_organization(&pool).await;
    let tender = TenderRepo::create(&pool, &new_tender(org_id, "Roof repair"))
        .await
        .unwrap();
    let bid_id = seed_bid(&pool, tender.id).await;

    let patch = BidPatch {
        name: Some("Improved offer".to_string()),
        description: None,
    };
    let patched = BidRepo::patch(&pool, bid_id, &patch).await.unwrap().unwrap();
    assert_eq!(patched.version, 2);
    assert_eq!(patched.name, "Improved offer");
    assert_eq!(patched.description, "We can do it");

    let restored = BidRepo::rollback(&pool, bid_id, 1).await.unwrap().unwrap();
    assert_eq!(restored.version, 3);
    assert_eq!(restored.name, "Competitive offer");

    let versions = BidRepo::list_versions(&pool, bid_id).await.unwrap();
    let numbers: Vec<i32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}
