//! Shared fixtures for engine integration tests.
//!
//! Seeding goes through the repository layer directly; the tests then
//! exercise the service layer against that state.

#![allow(dead_code)]

use procura_core::status::{BidStatus, TenderStatus};
use procura_core::types::DbId;
use procura_db::models::bid::{Bid, CreateBid};
use procura_db::models::employee::CreateEmployee;
use procura_db::models::organization::CreateOrganization;
use procura_db::models::tender::{CreateTender, Tender};
use procura_db::repositories::{
    BidRepo, EmployeeRepo, OrganizationRepo, ResponsibilityRepo, TenderRepo,
};
use sqlx::PgPool;

pub async fn employee(pool: &PgPool, username: &str) -> DbId {
    EmployeeRepo::create(
        pool,
        &CreateEmployee {
            username: username.to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn organization(pool: &PgPool, name: &str) -> DbId {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn responsible(pool: &PgPool, organization_id: DbId, employee_id: DbId) {
    ResponsibilityRepo::assign(pool, organization_id, employee_id)
        .await
        .unwrap();
}

/// An employee already responsible for the organization.
pub async fn responsible_employee(pool: &PgPool, organization_id: DbId, username: &str) -> DbId {
    let id = employee(pool, username).await;
    responsible(pool, organization_id, id).await;
    id
}

pub async fn created_tender(pool: &PgPool, organization_id: DbId) -> Tender {
    TenderRepo::create(
        pool,
        &CreateTender {
            organization_id,
            name: "Office renovation".to_string(),
            description: "Scope of works".to_string(),
            service_type: "Construction".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn published_tender(pool: &PgPool, organization_id: DbId) -> Tender {
    let tender = created_tender(pool, organization_id).await;
    TenderRepo::transition_status(
        pool,
        tender.id,
        TenderStatus::Created.as_str(),
        TenderStatus::Published.as_str(),
    )
    .await
    .unwrap();
    TenderRepo::find_latest(pool, tender.id).await.unwrap().unwrap()
}

pub async fn created_bid(
    pool: &PgPool,
    tender_id: DbId,
    author_type: &str,
    author_id: DbId,
) -> Bid {
    BidRepo::create(
        pool,
        &CreateBid {
            tender_id,
            author_type: author_type.to_string(),
            author_id,
            name: "Competitive offer".to_string(),
            description: "We can do it".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn published_bid(
    pool: &PgPool,
    tender_id: DbId,
    author_type: &str,
    author_id: DbId,
) -> Bid {
    let bid = created_bid(pool, tender_id, author_type, author_id).await;
    BidRepo::transition_status(
        pool,
        bid.id,
        BidStatus::Created.as_str(),
        BidStatus::Published.as_str(),
    )
    .await
    .unwrap();
    BidRepo::find_latest(pool, bid.id).await.unwrap().unwrap()
}
