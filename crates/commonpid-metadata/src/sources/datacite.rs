use std::time::Duration;

use async_trait::async_trait;
use commonpid_core::{Doi, Work};
use serde::Deserialize;

use super::crossref::lenient;
use crate::error::Result;
use crate::http::RateLimitedClient;
use crate::read::read_datacite;
use crate::sources::UpstreamAdapter;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteAttributes {
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub types: DataciteTypes,
    #[serde(default, deserialize_with = "lenient")]
    pub creators: Vec<DataciteCreator>,
    #[serde(default, deserialize_with = "lenient")]
    pub contributors: Vec<DataciteCreator>,
    #[serde(default, deserialize_with = "lenient")]
    pub titles: Vec<DataciteTitle>,
    #[serde(default, deserialize_with = "lenient")]
    pub publisher: String,
    #[serde(default, deserialize_with = "lenient")]
    pub container: DataciteContainer,
    #[serde(default, deserialize_with = "lenient")]
    pub subjects: Vec<DataciteSubject>,
    #[serde(default, deserialize_with = "lenient")]
    pub dates: Vec<DataciteDate>,
    #[serde(default)]
    pub language: String,
    #[serde(default, deserialize_with = "lenient")]
    pub related_identifiers: Vec<DataciteRelatedIdentifier>,
    #[serde(default, deserialize_with = "lenient")]
    pub sizes: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub formats: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rights_list: Vec<DataciteRights>,
    #[serde(default, deserialize_with = "lenient")]
    pub descriptions: Vec<DataciteDescription>,
    #[serde(default, deserialize_with = "lenient")]
    pub geo_locations: Vec<DataciteGeoLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub funding_references: Vec<DataciteFundingReference>,
    #[serde(default, deserialize_with = "lenient")]
    pub alternate_identifiers: Vec<DataciteAlternateIdentifier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteTypes {
    #[serde(default)]
    pub resource_type_general: String,
    #[serde(default)]
    pub resource_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteCreator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub name_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name_identifiers: Vec<DataciteNameIdentifier>,
    #[serde(default, deserialize_with = "lenient")]
    pub affiliation: Vec<String>,
    #[serde(default)]
    pub contributor_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteNameIdentifier {
    #[serde(default)]
    pub scheme_uri: String,
    #[serde(default)]
    pub name_identifier: String,
    #[serde(default)]
    pub name_identifier_scheme: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteTitle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub title_type: String,
    #[serde(default)]
    pub lang: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteContainer {
    #[serde(rename = "type", default)]
    pub container_type: String,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub identifier_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub first_page: String,
    #[serde(default)]
    pub last_page: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataciteSubject {
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteDate {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub date_type: String,
    #[serde(default)]
    pub date_information: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteRelatedIdentifier {
    #[serde(default)]
    pub related_identifier: String,
    #[serde(default)]
    pub related_identifier_type: String,
    #[serde(default)]
    pub relation_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteRights {
    #[serde(default)]
    pub rights: String,
    #[serde(default)]
    pub rights_uri: String,
    #[serde(default)]
    pub rights_identifier: String,
    #[serde(default)]
    pub rights_identifier_scheme: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteDescription {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_type: String,
    #[serde(default)]
    pub lang: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteGeoLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub geo_location_point: DataciteGeoPoint,
    #[serde(default, deserialize_with = "lenient")]
    pub geo_location_box: DataciteGeoBox,
    #[serde(default)]
    pub geo_location_place: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteGeoPoint {
    #[serde(default, deserialize_with = "lenient")]
    pub point_longitude: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub point_latitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteGeoBox {
    #[serde(default, deserialize_with = "lenient")]
    pub west_bound_longitude: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub east_bound_longitude: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub south_bound_latitude: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub north_bound_latitude: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteFundingReference {
    #[serde(default)]
    pub funder_name: String,
    #[serde(default)]
    pub funder_identifier: String,
    #[serde(default)]
    pub funder_identifier_type: String,
    #[serde(default)]
    pub award_number: String,
    #[serde(default, deserialize_with = "lenient")]
    pub award_uri: String,
    #[serde(default)]
    pub award_title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataciteAlternateIdentifier {
    #[serde(alias = "alternateIdentifier", default)]
    pub identifier: String,
    #[serde(alias = "alternateIdentifierType", default)]
    pub identifier_type: String,
}

#[derive(Debug, Default, Deserialize)]
struct DataciteEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    data: DataciteData,
}

#[derive(Debug, Default, Deserialize)]
struct DataciteData {
    #[serde(default, deserialize_with = "lenient")]
    attributes: DataciteAttributes,
}

pub struct DataciteClient {
    client: RateLimitedClient,
    base_url: String,
}

impl DataciteClient {
    pub fn new() -> Result<Self> {
        Self::with_params("https://api.datacite.org", Duration::from_millis(100))
    }

    pub fn with_params(base_url: &str, min_interval: Duration) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new(min_interval, 2, "commonpid/0.1")?,
            base_url: base_url.to_string(),
        })
    }

    pub async fn fetch(&self, doi: &Doi) -> Result<DataciteAttributes> {
        let url = format!("{}/dois/{}", self.base_url, doi.value);
        let envelope: DataciteEnvelope = self.client.get_json(&url).await?;
        Ok(envelope.data.attributes)
    }
}

#[async_trait]
impl UpstreamAdapter for DataciteClient {
    fn name(&self) -> &'static str {
        "DataCite"
    }

    async fn fetch_work(&self, doi: &Doi) -> Result<Work> {
        let attributes = self.fetch(doi).await?;
        Ok(read_datacite(&attributes))
    }
}
