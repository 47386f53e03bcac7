use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::work_type::WorkType;

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

/// A contributor affiliation; `id` is a ROR URL when known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    /// ORCID or ROR URL when known.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// "Person" or "Organization".
    #[serde(rename = "type", default)]
    pub contributor_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub given_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub family_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
    #[serde(default)]
    pub contributor_roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Named dates of a work. All values are partial ISO dates
/// (YYYY, YYYY-MM, or YYYY-MM-DD) or full timestamps as reported
/// upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyrighted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    #[serde(default)]
    pub title: String,
    /// MainTitle, Subtitle, or TranslatedTitle; empty otherwise.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub title_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier_type: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub container_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_page: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_page: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub issue: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// SPDX identifier, empty when the URL is not a known license.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default)]
    pub key: String,
    /// PID of the referenced work, shaped like the top-level pid.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publication_year: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unstructured: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub relation_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub funder_identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub funder_identifier_type: String,
    #[serde(default)]
    pub funder_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub award_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub award_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub description: String,
    /// Abstract, Summary, Methods, TechnicalInfo, or Other.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub description_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocationPoint {
    #[serde(default)]
    pub point_longitude: f64,
    #[serde(default)]
    pub point_latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocationBox {
    #[serde(default)]
    pub west_bound_longitude: f64,
    #[serde(default)]
    pub east_bound_longitude: f64,
    #[serde(default)]
    pub south_bound_latitude: f64,
    #[serde(default)]
    pub north_bound_latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub geo_location_place: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location_point: Option<GeoLocationPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location_box: Option<GeoLocationBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateIdentifier {
    #[serde(default)]
    pub identifier: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
}

/// The canonical record: a scholarly work in Commonmeta form.
///
/// `pid` is the case-insensitive unique key (serialized as `id`).
/// `work_type` is `None` for a minimal record that has not yet been
/// normalized from an upstream source; such records can only answer a
/// landing-page redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    #[serde(rename = "id")]
    pub pid: String,
    #[serde(rename = "type", default, with = "work_type_string")]
    pub work_type: Option<WorkType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    #[serde(default)]
    pub publisher: Publisher,
    #[serde(default)]
    pub date: WorkDates,
    #[serde(default)]
    pub titles: Vec<Title>,
    #[serde(default)]
    pub container: Container,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(default)]
    pub license: License,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub funding_references: Vec<FundingReference>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub geo_locations: Vec<GeoLocation>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default)]
    pub alternate_identifiers: Vec<AlternateIdentifier>,
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub archive_locations: Vec<String>,
    #[serde(default = "default_now")]
    pub created: DateTime<Utc>,
    #[serde(default = "default_now")]
    pub updated: DateTime<Utc>,
}

impl Work {
    /// A record with only the pid set and all metadata at its empty
    /// default. Readers fill the rest in.
    pub fn base(pid: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            pid: pid.into(),
            work_type: None,
            additional_type: String::new(),
            url: String::new(),
            contributors: Vec::new(),
            publisher: Publisher::default(),
            date: WorkDates::default(),
            titles: Vec::new(),
            container: Container::default(),
            subjects: Vec::new(),
            sizes: Vec::new(),
            formats: Vec::new(),
            language: String::new(),
            license: License::default(),
            version: String::new(),
            references: Vec::new(),
            relations: Vec::new(),
            funding_references: Vec::new(),
            descriptions: Vec::new(),
            geo_locations: Vec::new(),
            provider: String::new(),
            alternate_identifiers: Vec::new(),
            files: Vec::new(),
            archive_locations: Vec::new(),
            created: now,
            updated: now,
        }
    }

    /// A minimal "not yet normalized" record: pid, landing URL, and
    /// provider only.
    pub fn minimal(
        pid: impl Into<String>,
        url: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        let mut work = Self::base(pid);
        work.url = url.into();
        work.provider = provider.into();
        work
    }

    pub fn is_minimal(&self) -> bool {
        self.work_type.is_none()
    }

    /// The file URL for a MIME type, if one is attached.
    pub fn file_url(&self, mime_type: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.mime_type == mime_type)
            .map(|f| f.url.as_str())
    }
}

/// `type` on the wire is the vocabulary name, with the empty string
/// standing for a minimal record.
mod work_type_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::WorkType;

    pub fn serialize<S: Serializer>(
        value: &Option<WorkType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_ref().map(|t| t.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<WorkType>, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(WorkType::parse(&s))
    }
}
