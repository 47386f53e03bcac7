use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use commonpid_core::{Doi, Work};
use serde::{Deserialize, Deserializer};

use crate::error::Result;
use crate::http::RateLimitedClient;
use crate::read::read_crossref;
use crate::sources::UpstreamAdapter;

/// Deserialize a field, falling back to its default when the upstream
/// shape does not match. Normalization never aborts a record over one
/// bad subfield.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring malformed upstream subfield");
        T::default()
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefMessage {
    #[serde(rename = "DOI", default)]
    pub doi: String,
    #[serde(rename = "type", default)]
    pub work_type: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Vec<CrossrefAuthor>,
    #[serde(default)]
    pub publisher: String,
    #[serde(rename = "container-title", default, deserialize_with = "lenient")]
    pub container_title: Vec<String>,
    #[serde(rename = "ISSN", default, deserialize_with = "lenient")]
    pub issn: Vec<String>,
    #[serde(rename = "isbn-type", default, deserialize_with = "lenient")]
    pub isbn_type: Vec<CrossrefIsbn>,
    #[serde(default, deserialize_with = "lenient")]
    pub issued: CrossrefDate,
    #[serde(default, deserialize_with = "lenient")]
    pub created: CrossrefDate,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub subject: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub license: Vec<CrossrefLicense>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Vec<CrossrefLink>,
    #[serde(default, deserialize_with = "lenient")]
    pub archive: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reference: Vec<CrossrefReference>,
    #[serde(default, deserialize_with = "lenient")]
    pub relation: HashMap<String, Vec<CrossrefRelation>>,
    #[serde(default, deserialize_with = "lenient")]
    pub funder: Vec<CrossrefFunder>,
    #[serde(default, deserialize_with = "lenient")]
    pub resource: CrossrefResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefAuthor {
    #[serde(default)]
    pub given: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "ORCID", default)]
    pub orcid: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default, deserialize_with = "lenient")]
    pub affiliation: Vec<CrossrefAffiliation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefAffiliation {
    #[serde(default)]
    pub ror: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefIsbn {
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub isbn_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefDate {
    #[serde(rename = "date-parts", default, deserialize_with = "lenient")]
    pub date_parts: Vec<Vec<i64>>,
    #[serde(rename = "date-time", default)]
    pub date_time: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefLicense {
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "content-version", default)]
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefLink {
    #[serde(rename = "content-type", default)]
    pub content_type: String,
    #[serde(rename = "URL", alias = "url", default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefReference {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "DOI", default)]
    pub doi: String,
    #[serde(rename = "article-title", default)]
    pub article_title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub unstructured: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefRelation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "id-type", default)]
    pub id_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefFunder {
    #[serde(rename = "DOI", default)]
    pub doi: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub award: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefResource {
    #[serde(default, deserialize_with = "lenient")]
    pub primary: CrossrefPrimaryResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefPrimaryResource {
    #[serde(rename = "content_type", default)]
    pub content_type: String,
    #[serde(rename = "URL", alias = "url", default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct CrossrefEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    message: CrossrefMessage,
}

pub struct CrossrefClient {
    client: RateLimitedClient,
    base_url: String,
}

impl CrossrefClient {
    pub fn new(polite_email: Option<&str>) -> Result<Self> {
        Self::with_params("https://api.crossref.org", Duration::from_millis(100), polite_email)
    }

    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        polite_email: Option<&str>,
    ) -> Result<Self> {
        let user_agent = match polite_email {
            Some(email) => format!("commonpid/0.1 (mailto:{email})"),
            None => "commonpid/0.1".to_string(),
        };
        Ok(Self {
            client: RateLimitedClient::new(min_interval, 2, &user_agent)?,
            base_url: base_url.to_string(),
        })
    }

    pub async fn fetch(&self, doi: &Doi) -> Result<CrossrefMessage> {
        let url = format!("{}/works/{}", self.base_url, doi.value);
        let envelope: CrossrefEnvelope = self.client.get_json(&url).await?;
        Ok(envelope.message)
    }
}

#[async_trait]
impl UpstreamAdapter for CrossrefClient {
    fn name(&self) -> &'static str {
        "Crossref"
    }

    async fn fetch_work(&self, doi: &Doi) -> Result<Work> {
        let message = self.fetch(doi).await?;
        Ok(read_crossref(&message))
    }
}
