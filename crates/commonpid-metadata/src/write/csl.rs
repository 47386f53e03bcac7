//! Commonmeta to Citation Style Language JSON.

use commonpid_core::{Doi, Work, WorkType};
use serde_json::{json, Map, Value};

use super::date_parts_of;

fn csl_type(work_type: WorkType) -> &'static str {
    match work_type {
        WorkType::JournalArticle => "article-journal",
        WorkType::Article => "article",
        WorkType::Book | WorkType::BookSet | WorkType::Proceedings => "book",
        WorkType::BookChapter | WorkType::BookPart | WorkType::BookSection => "chapter",
        WorkType::ProceedingsArticle => "paper-conference",
        WorkType::Dataset | WorkType::Database => "dataset",
        WorkType::Dissertation => "thesis",
        WorkType::Report | WorkType::ReportComponent => "report",
        WorkType::Software | WorkType::ComputationalNotebook => "software",
        WorkType::PeerReview => "review",
        WorkType::Presentation => "speech",
        WorkType::Standard => "standard",
        WorkType::Image => "graphic",
        _ => "document",
    }
}

/// Render a Work as a CSL-JSON item. Fields with no CSL slot are left
/// out; the stored record is untouched.
pub fn write_csl(work: &Work) -> Value {
    let mut item = Map::new();
    item.insert("id".into(), json!(work.pid));
    item.insert(
        "type".into(),
        json!(csl_type(work.work_type.unwrap_or(WorkType::Other))),
    );

    if let Some(doi) = Doi::from_pid(&work.pid) {
        item.insert("DOI".into(), json!(doi.value));
    }
    if !work.url.is_empty() {
        item.insert("URL".into(), json!(work.url));
    }
    if let Some(title) = work.titles.first() {
        item.insert("title".into(), json!(title.title));
    }

    let authors: Vec<Value> = work
        .contributors
        .iter()
        .filter(|c| c.contributor_roles.iter().any(|r| r == "Author"))
        .map(|c| {
            if !c.given_name.is_empty() || !c.family_name.is_empty() {
                json!({"family": c.family_name, "given": c.given_name})
            } else {
                json!({"literal": c.name})
            }
        })
        .collect();
    if !authors.is_empty() {
        item.insert("author".into(), json!(authors));
    }

    if let Some(published) = work.date.published.as_deref().or(work.date.created.as_deref()) {
        let parts = date_parts_of(published);
        if !parts.is_empty() {
            item.insert("issued".into(), json!({"date-parts": [parts]}));
        }
    }

    if !work.container.title.is_empty() {
        item.insert("container-title".into(), json!(work.container.title));
    }
    if !work.container.volume.is_empty() {
        item.insert("volume".into(), json!(work.container.volume));
    }
    if !work.container.issue.is_empty() {
        item.insert("issue".into(), json!(work.container.issue));
    }
    if !work.container.first_page.is_empty() {
        let page = if work.container.last_page.is_empty() {
            work.container.first_page.clone()
        } else {
            format!("{}-{}", work.container.first_page, work.container.last_page)
        };
        item.insert("page".into(), json!(page));
    }
    if !work.publisher.name.is_empty() {
        item.insert("publisher".into(), json!(work.publisher.name));
    }
    if !work.language.is_empty() {
        item.insert("language".into(), json!(work.language));
    }
    if let Some(description) = work.descriptions.first() {
        item.insert("abstract".into(), json!(description.description));
    }
    if !work.version.is_empty() {
        item.insert("version".into(), json!(work.version));
    }

    Value::Object(item)
}
