#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use tokio::sync::Mutex;
use uuid::Uuid;

use village_certificate_server::certificate::model::{
    ApplicationRecord, ApplicationStatus, VillageDocumentSet, VillageRecord,
};
use village_certificate_server::db::{CertificateStore, StoreError};

/// In-memory store mirroring the Postgres lookups.
#[derive(Default)]
pub struct MockCertificateStore {
    applications: Mutex<HashMap<Uuid, ApplicationRecord>>,
    documents: Mutex<HashMap<Uuid, VillageDocumentSet>>,
    templates: Mutex<HashMap<Uuid, String>>,
    fail: bool,
}

impl MockCertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn add_application(&self, application: ApplicationRecord) {
        self.applications
            .lock()
            .await
            .insert(application.id, application);
    }

    pub async fn set_documents(&self, village_id: Uuid, documents: VillageDocumentSet) {
        self.documents.lock().await.insert(village_id, documents);
    }

    pub async fn set_template(&self, village_id: Uuid, template: &str) {
        self.templates
            .lock()
            .await
            .insert(village_id, template.to_string());
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CertificateStore for MockCertificateStore {
    async fn find_approved_application(
        &self,
        id: &Uuid,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        self.check()?;
        let applications = self.applications.lock().await;
        Ok(applications
            .get(id)
            .filter(|a| a.status == ApplicationStatus::Approved)
            .cloned())
    }

    async fn find_approved_by_number(
        &self,
        application_number: &str,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        self.check()?;
        let applications = self.applications.lock().await;
        Ok(applications
            .values()
            .find(|a| {
                a.application_number == application_number
                    && a.status == ApplicationStatus::Approved
            })
            .cloned())
    }

    async fn find_village_documents(
        &self,
        village_id: &Uuid,
    ) -> Result<Option<VillageDocumentSet>, StoreError> {
        self.check()?;
        Ok(self.documents.lock().await.get(village_id).cloned())
    }

    async fn find_template(&self, village_id: &Uuid) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.templates.lock().await.get(village_id).cloned())
    }
}

pub fn shared(store: MockCertificateStore) -> Arc<MockCertificateStore> {
    Arc::new(store)
}

pub fn sample_application(status: ApplicationStatus) -> ApplicationRecord {
    ApplicationRecord {
        id: Uuid::new_v4(),
        application_number: "ZSV20122024".to_string(),
        applicant_name: "Lalremruata".to_string(),
        title: Some("Mr.".to_string()),
        relation: None,
        father_name: Some("Zothanpuia".to_string()),
        house_number: Some("12".to_string()),
        tribe_name: Some("Mizo".to_string()),
        religion: Some("Christian".to_string()),
        annual_income: None,
        annual_income_words: None,
        purpose_of_noc: Some("availing a bank loan".to_string()),
        village_id: Uuid::new_v4(),
        status,
        village: VillageRecord {
            name: "Zawlsei".to_string(),
            district: "Aizawl".to_string(),
            state: "Mizoram".to_string(),
            pin_code: "796001".to_string(),
            admin_name: Some("C. Lalthanzara".to_string()),
            post_office: None,
            police_station: None,
            sub_division: None,
        },
    }
}

pub const SAMPLE_TEMPLATE: &str = "This is to certify that {{TITLE}} {{APPLICANT_NAME}} \
{{RELATION}} {{FATHER_NAME}} of House No. {{HOUSE_NUMBER}}, {{VILLAGE_NAME}} Village, \
P.O. {{POST_OFFICE}}, P.S. {{POLICE_STATION}}, {{SUB_DIVISION}} Sub-Division, is a \
permanent resident of this village belonging to the {{TRIBE_NAME}} tribe.\n\n\
The annual income of the family is Rs. {{ANNUAL_INCOME_NUMBER}} ({{ANNUAL_INCOME_WORDS}}).\n\
The village authority has no objection to {{PURPOSE}}. {{RELATION}}";

pub fn png_data_url(width: u32, height: u32) -> String {
    let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba([200, 0, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Store holding one approved application with template and assets.
pub async fn seeded_store() -> (Arc<MockCertificateStore>, ApplicationRecord) {
    let store = MockCertificateStore::new();
    let application = sample_application(ApplicationStatus::Approved);
    store.set_template(application.village_id, SAMPLE_TEMPLATE).await;
    store
        .set_documents(
            application.village_id,
            VillageDocumentSet {
                letterhead: Some(png_data_url(60, 24)),
                signature: Some(png_data_url(24, 10)),
                seal: Some(png_data_url(12, 12)),
                round_seal: Some(png_data_url(12, 12)),
            },
        )
        .await;
    store.add_application(application.clone()).await;
    (shared(store), application)
}
