//! Commonmeta to Schema.org JSON-LD.

use commonpid_core::{Work, WorkType};
use serde_json::{json, Map, Value};

fn schema_type(work_type: WorkType) -> &'static str {
    match work_type {
        WorkType::JournalArticle => "ScholarlyArticle",
        WorkType::Article => "Article",
        WorkType::Book
        | WorkType::BookChapter
        | WorkType::BookPart
        | WorkType::BookSection
        | WorkType::BookSet => "Book",
        WorkType::Dataset | WorkType::Database => "Dataset",
        WorkType::Software | WorkType::ComputationalNotebook => "SoftwareSourceCode",
        WorkType::Image => "ImageObject",
        WorkType::Sound => "AudioObject",
        WorkType::Audiovisual => "VideoObject",
        WorkType::Collection => "Collection",
        WorkType::Dissertation => "Thesis",
        WorkType::PeerReview => "Review",
        WorkType::Report => "Report",
        WorkType::Journal => "Periodical",
        WorkType::Event => "Event",
        _ => "CreativeWork",
    }
}

/// Render a Work as Schema.org JSON-LD. References surface as
/// `citation` entries by id; funding and geo data have no slot here.
pub fn write_schema_org(work: &Work) -> Value {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert("@id".into(), json!(work.pid));
    doc.insert(
        "@type".into(),
        json!(schema_type(work.work_type.unwrap_or(WorkType::Other))),
    );

    if !work.additional_type.is_empty() {
        doc.insert("additionalType".into(), json!(work.additional_type));
    }
    if let Some(title) = work.titles.first() {
        doc.insert("name".into(), json!(title.title));
    }
    if !work.url.is_empty() {
        doc.insert("url".into(), json!(work.url));
    }

    let authors: Vec<Value> = work
        .contributors
        .iter()
        .map(|c| {
            let mut author = Map::new();
            author.insert(
                "@type".into(),
                json!(if c.contributor_type == "Organization" { "Organization" } else { "Person" }),
            );
            if !c.id.is_empty() {
                author.insert("@id".into(), json!(c.id));
            }
            if !c.given_name.is_empty() {
                author.insert("givenName".into(), json!(c.given_name));
            }
            if !c.family_name.is_empty() {
                author.insert("familyName".into(), json!(c.family_name));
            }
            if !c.name.is_empty() {
                author.insert("name".into(), json!(c.name));
            }
            Value::Object(author)
        })
        .collect();
    if !authors.is_empty() {
        doc.insert("author".into(), json!(authors));
    }

    if !work.publisher.name.is_empty() {
        doc.insert(
            "publisher".into(),
            json!({"@type": "Organization", "name": work.publisher.name}),
        );
    }
    if let Some(published) = work.date.published.as_deref() {
        doc.insert("datePublished".into(), json!(published));
    }
    if let Some(created) = work.date.created.as_deref() {
        doc.insert("dateCreated".into(), json!(created));
    }
    if !work.language.is_empty() {
        doc.insert("inLanguage".into(), json!(work.language));
    }
    if !work.license.url.is_empty() {
        doc.insert("license".into(), json!(work.license.url));
    }
    if !work.version.is_empty() {
        doc.insert("version".into(), json!(work.version));
    }
    if !work.subjects.is_empty() {
        let keywords: Vec<&str> = work.subjects.iter().map(|s| s.subject.as_str()).collect();
        doc.insert("keywords".into(), json!(keywords.join(", ")));
    }
    if let Some(description) = work.descriptions.first() {
        doc.insert("description".into(), json!(description.description));
    }
    if !work.container.title.is_empty() {
        doc.insert(
            "isPartOf".into(),
            json!({"@type": "Periodical", "name": work.container.title}),
        );
    }

    let citations: Vec<Value> = work
        .references
        .iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| json!({"@id": r.id}))
        .collect();
    if !citations.is_empty() {
        doc.insert("citation".into(), json!(citations));
    }

    Value::Object(doc)
}
