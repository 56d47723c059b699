//! Certificate lookups against Postgres.
//!
//! Expected tables: `applications`, `villages`, `village_documents`
//! (one row per village, a nullable data-URL column per asset role) and
//! `certificate_templates` (at most one row per village).

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CertificateStore, StoreError};
use crate::certificate::model::{ApplicationRecord, VillageDocumentSet};

const APPLICATION_SELECT: &str = r#"
    SELECT a.id, a.application_number, a.applicant_name, a.title, a.relation,
           a.father_name, a.house_number, a.tribe_name, a.religion,
           a.annual_income::text AS annual_income, a.annual_income_words,
           a.purpose_of_noc, a.village_id, a.status::text AS status,
           v.name AS village_name, v.district, v.state, v.pin_code::text AS pin_code,
           v.admin_name, v.post_office, v.police_station, v.sub_division
      FROM applications a
      JOIN villages v ON v.id = a.village_id
"#;

pub struct PgCertificateStore {
    pool: PgPool,
    template_cache: Cache<Uuid, String>,
}

impl PgCertificateStore {
    pub fn new(pool: PgPool, template_ttl: Duration) -> Self {
        let template_cache = Cache::builder()
            .time_to_live(template_ttl)
            .max_capacity(1_000)
            .build();

        Self {
            pool,
            template_cache,
        }
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn find_approved_application(
        &self,
        id: &Uuid,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        let sql = format!("{} WHERE a.id = $1 AND a.status = 'approved'", APPLICATION_SELECT);
        let record = sqlx::query_as::<_, ApplicationRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_approved_by_number(
        &self,
        application_number: &str,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        let sql = format!(
            "{} WHERE a.application_number = $1 AND a.status = 'approved'",
            APPLICATION_SELECT
        );
        let record = sqlx::query_as::<_, ApplicationRecord>(&sql)
            .bind(application_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_village_documents(
        &self,
        village_id: &Uuid,
    ) -> Result<Option<VillageDocumentSet>, StoreError> {
        let documents = sqlx::query_as::<_, VillageDocumentSet>(
            "SELECT letterhead, signature, seal, round_seal FROM village_documents WHERE village_id = $1",
        )
        .bind(village_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(documents)
    }

    async fn find_template(&self, village_id: &Uuid) -> Result<Option<String>, StoreError> {
        if let Some(template) = self.template_cache.get(village_id).await {
            log::debug!("template cache hit for village {}", village_id);
            return Ok(Some(template));
        }

        let template: Option<String> = sqlx::query_scalar(
            "SELECT template FROM certificate_templates WHERE village_id = $1 LIMIT 1",
        )
        .bind(village_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(template) = &template {
            self.template_cache
                .insert(*village_id, template.clone())
                .await;
        }
        Ok(template)
    }
}
