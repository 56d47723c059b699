use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Approval state of a certificate application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl TryFrom<String> for ApplicationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown application status '{}'", other)),
        }
    }
}

/// Village fields joined onto an application row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct VillageRecord {
    #[sqlx(rename = "village_name")]
    pub name: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub admin_name: Option<String>,
    pub post_office: Option<String>,
    pub police_station: Option<String>,
    pub sub_division: Option<String>,
}

/// Application row as read for rendering, already joined with its village.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub application_number: String,
    pub applicant_name: String,
    pub title: Option<String>,
    pub relation: Option<String>,
    pub father_name: Option<String>,
    pub house_number: Option<String>,
    pub tribe_name: Option<String>,
    pub religion: Option<String>,
    pub annual_income: Option<String>,
    pub annual_income_words: Option<String>,
    pub purpose_of_noc: Option<String>,
    pub village_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    #[sqlx(flatten)]
    pub village: VillageRecord,
}

impl ApplicationRecord {
    pub fn is_renderable(&self) -> bool {
        self.status == ApplicationStatus::Approved
    }
}

/// Image slot on a village's document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetRole {
    Letterhead,
    Signature,
    Seal,
    RoundSeal,
}

impl AssetRole {
    pub const ALL: [AssetRole; 4] = [
        AssetRole::Letterhead,
        AssetRole::Signature,
        AssetRole::Seal,
        AssetRole::RoundSeal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letterhead => "letterhead",
            Self::Signature => "signature",
            Self::Seal => "seal",
            Self::RoundSeal => "roundSeal",
        }
    }
}

/// Optional data-URL images uploaded for a village.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VillageDocumentSet {
    pub letterhead: Option<String>,
    pub signature: Option<String>,
    pub seal: Option<String>,
    pub round_seal: Option<String>,
}

impl VillageDocumentSet {
    pub fn get(&self, role: AssetRole) -> Option<&str> {
        let value = match role {
            AssetRole::Letterhead => &self.letterhead,
            AssetRole::Signature => &self.signature,
            AssetRole::Seal => &self.seal,
            AssetRole::RoundSeal => &self.round_seal,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// Body of `POST /api/certificates/generate`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCertificateRequest {
    #[schema(example = "0b9f8e2c-6f1d-4c55-9a43-1d2f0c7e5a10")]
    pub application_id: String,
}

/// Summary returned by the verification endpoint; mirrors the QR payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateVerification {
    pub application_number: String,
    pub applicant_name: String,
    pub relation: String,
    pub post_office: String,
    pub police_station: String,
    pub village: String,
    pub status: ApplicationStatus,
}
