//! Placeholder substitution for village certificate templates.
//!
//! Templates are free text with `{{TOKEN}}` placeholders. Every occurrence of a
//! known token is replaced in a single pass; unknown tokens stay verbatim so a
//! typo in an authored template is visible on the rendered certificate.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::model::ApplicationRecord;

pub const DEFAULT_TITLE: &str = "Mr./Ms.";
pub const DEFAULT_RELATION: &str = "S/o";
pub const DEFAULT_INCOME: &str = "Not specified";
pub const DEFAULT_ADMIN_NAME: &str = "Village Authority";

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\{\{([A-Z0-9_]+)\}\}").unwrap();
}

/// Format used for dates printed on the certificate.
pub fn format_certificate_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Returns the trimmed value, or `None` when it is absent or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves a field against its fallback.
pub fn or_default(value: Option<&str>, fallback: &str) -> String {
    present(value).unwrap_or(fallback).to_string()
}

pub fn resolve_title(value: Option<&str>) -> String {
    or_default(value, DEFAULT_TITLE)
}

pub fn resolve_relation(value: Option<&str>) -> String {
    or_default(value, DEFAULT_RELATION)
}

pub fn resolve_post_office(value: Option<&str>, village_name: &str) -> String {
    or_default(value, village_name)
}

pub fn resolve_police_station(value: Option<&str>, district: &str) -> String {
    or_default(value, district)
}

pub fn resolve_sub_division(value: Option<&str>, district: &str) -> String {
    or_default(value, district)
}

pub fn resolve_income(value: Option<&str>) -> String {
    or_default(value, DEFAULT_INCOME)
}

pub fn resolve_admin_name(value: Option<&str>) -> String {
    or_default(value, DEFAULT_ADMIN_NAME)
}

/// Every field a template may reference, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateContext {
    pub application_number: String,
    pub applicant_name: String,
    pub title: String,
    pub relation: String,
    pub father_name: String,
    pub house_number: String,
    pub village_name: String,
    pub post_office: String,
    pub police_station: String,
    pub sub_division: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub tribe_name: String,
    pub religion: String,
    pub annual_income_number: String,
    pub annual_income_words: String,
    pub purpose: String,
    pub admin_name: String,
    pub date: String,
}

impl CertificateContext {
    pub fn new(application: &ApplicationRecord, date: NaiveDate) -> Self {
        let village = &application.village;
        let village_name = village.name.trim().to_string();
        let district = village.district.trim().to_string();

        Self {
            application_number: application.application_number.trim().to_string(),
            applicant_name: application.applicant_name.trim().to_string(),
            title: resolve_title(application.title.as_deref()),
            relation: resolve_relation(application.relation.as_deref()),
            father_name: or_default(application.father_name.as_deref(), ""),
            house_number: or_default(application.house_number.as_deref(), ""),
            post_office: resolve_post_office(village.post_office.as_deref(), &village_name),
            police_station: resolve_police_station(village.police_station.as_deref(), &district),
            sub_division: resolve_sub_division(village.sub_division.as_deref(), &district),
            state: village.state.trim().to_string(),
            pin_code: village.pin_code.trim().to_string(),
            tribe_name: or_default(application.tribe_name.as_deref(), ""),
            religion: or_default(application.religion.as_deref(), ""),
            annual_income_number: resolve_income(application.annual_income.as_deref()),
            annual_income_words: resolve_income(application.annual_income_words.as_deref()),
            purpose: or_default(application.purpose_of_noc.as_deref(), ""),
            admin_name: resolve_admin_name(village.admin_name.as_deref()),
            date: format_certificate_date(date),
            village_name,
            district,
        }
    }

    /// Value for a placeholder name, or `None` if the token is not known.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let value = match token {
            "APPLICATION_NUMBER" => &self.application_number,
            "APPLICANT_NAME" => &self.applicant_name,
            "TITLE" => &self.title,
            "RELATION" => &self.relation,
            "FATHER_NAME" => &self.father_name,
            "HOUSE_NUMBER" => &self.house_number,
            "VILLAGE_NAME" => &self.village_name,
            "POST_OFFICE" => &self.post_office,
            "POLICE_STATION" => &self.police_station,
            "SUB_DIVISION" => &self.sub_division,
            "DISTRICT" => &self.district,
            "STATE" => &self.state,
            "PIN_CODE" => &self.pin_code,
            "TRIBE_NAME" => &self.tribe_name,
            "RELIGION" => &self.religion,
            "ANNUAL_INCOME_NUMBER" => &self.annual_income_number,
            "ANNUAL_INCOME_WORDS" => &self.annual_income_words,
            "PURPOSE" => &self.purpose,
            "ADMIN_NAME" => &self.admin_name,
            "DATE" => &self.date,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Replaces every known `{{TOKEN}}` in `template`.
pub fn substitute(template: &str, context: &CertificateContext) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures| match context.lookup(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                log::debug!("leaving unknown template token {} in place", &caps[0]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::model::{ApplicationStatus, VillageRecord};
    use uuid::Uuid;

    fn application() -> ApplicationRecord {
        ApplicationRecord {
            id: Uuid::new_v4(),
            application_number: "ZSV20122024".to_string(),
            applicant_name: "Lalremruata".to_string(),
            title: None,
            relation: None,
            father_name: Some("Zothanpuia".to_string()),
            house_number: None,
            tribe_name: Some("Mizo".to_string()),
            religion: Some("  ".to_string()),
            annual_income: None,
            annual_income_words: Some("Fifty thousand".to_string()),
            purpose_of_noc: Some("bank loan".to_string()),
            village_id: Uuid::new_v4(),
            status: ApplicationStatus::Approved,
            village: VillageRecord {
                name: "Zawlsei".to_string(),
                district: "Aizawl".to_string(),
                state: "Mizoram".to_string(),
                pin_code: "796001".to_string(),
                admin_name: None,
                post_office: None,
                police_station: Some("Kolasib PS".to_string()),
                sub_division: None,
            },
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 20).unwrap()
    }

    #[test]
    fn test_fallbacks_apply_to_empty_fields() {
        let ctx = CertificateContext::new(&application(), date());

        assert_eq!(ctx.title, "Mr./Ms.");
        assert_eq!(ctx.relation, "S/o");
        assert_eq!(ctx.house_number, "");
        assert_eq!(ctx.post_office, "Zawlsei");
        assert_eq!(ctx.police_station, "Kolasib PS");
        assert_eq!(ctx.sub_division, "Aizawl");
        assert_eq!(ctx.religion, "");
        assert_eq!(ctx.annual_income_number, "Not specified");
        assert_eq!(ctx.annual_income_words, "Fifty thousand");
        assert_eq!(ctx.admin_name, "Village Authority");
        assert_eq!(ctx.date, "20-12-2024");
    }

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let ctx = CertificateContext::new(&application(), date());
        let out = substitute(
            "{{TITLE}} {{APPLICANT_NAME}} {{RELATION}} {{FATHER_NAME}}, {{RELATION}} again",
            &ctx,
        );

        assert_eq!(out, "Mr./Ms. Lalremruata S/o Zothanpuia, S/o again");
    }

    #[test]
    fn test_unknown_tokens_left_verbatim() {
        let ctx = CertificateContext::new(&application(), date());
        let out = substitute("Ward {{WARD_NO}} of {{VILLAGE_NAME}} {{lower}}", &ctx);

        assert_eq!(out, "Ward {{WARD_NO}} of Zawlsei {{lower}}");
    }

    #[test]
    fn test_no_known_token_survives() {
        let ctx = CertificateContext::new(&application(), date());
        let tokens = [
            "TITLE",
            "RELATION",
            "HOUSE_NUMBER",
            "POST_OFFICE",
            "POLICE_STATION",
            "SUB_DIVISION",
            "TRIBE_NAME",
            "RELIGION",
            "ANNUAL_INCOME_NUMBER",
            "ANNUAL_INCOME_WORDS",
        ];
        let template: String = tokens
            .iter()
            .map(|t| format!("{{{{{}}}}} and {{{{{}}}}}\n", t, t))
            .collect();

        let out = substitute(&template, &ctx);

        for token in tokens {
            assert!(!out.contains(&format!("{{{{{}}}}}", token)), "{} survived", token);
        }
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let mut app = application();
        app.applicant_name = "{{RELATION}}".to_string();
        let ctx = CertificateContext::new(&app, date());

        assert_eq!(substitute("{{APPLICANT_NAME}}", &ctx), "{{RELATION}}");
    }

    #[test]
    fn test_newlines_are_kept() {
        let ctx = CertificateContext::new(&application(), date());
        assert_eq!(substitute("A\n{{STATE}}", &ctx), "A\nMizoram");
    }
}
