//! Crossref REST API JSON to Commonmeta.

use commonpid_core::{
    doi_as_url, Affiliation, Container, Contributor, Description, File, FundingReference, License,
    Publisher, Reference, Relation, Subject, Title, Work, WorkType, DOI_RE,
};

use super::{issn_as_url, split_pages};
use crate::licenses::{normalize_cc_url, url_to_spdx};
use crate::sanitize::sanitize_html;
use crate::sources::crossref::CrossrefMessage;

// source: http://api.crossref.org/types
fn map_work_type(source: &str) -> WorkType {
    match source {
        "book-chapter" => WorkType::BookChapter,
        "book-part" => WorkType::BookPart,
        "book-section" => WorkType::BookSection,
        "book-series" => WorkType::BookSeries,
        "book-set" => WorkType::BookSet,
        "book-track" => WorkType::BookTrack,
        "book" => WorkType::Book,
        "component" => WorkType::Component,
        "database" => WorkType::Database,
        "dataset" => WorkType::Dataset,
        "dissertation" => WorkType::Dissertation,
        "edited-book" => WorkType::Book,
        "grant" => WorkType::Grant,
        "journal-article" => WorkType::JournalArticle,
        "journal-issue" => WorkType::JournalIssue,
        "journal-volume" => WorkType::JournalVolume,
        "journal" => WorkType::Journal,
        "monograph" => WorkType::Book,
        "other" => WorkType::Other,
        "peer-review" => WorkType::PeerReview,
        "posted-content" => WorkType::Article,
        "proceedings-article" => WorkType::ProceedingsArticle,
        "proceedings-series" => WorkType::ProceedingsSeries,
        "proceedings" => WorkType::Proceedings,
        "reference-book" => WorkType::Book,
        "reference-entry" => WorkType::Entry,
        "report-component" => WorkType::ReportComponent,
        "report-series" => WorkType::ReportSeries,
        "report" => WorkType::Report,
        "standard" => WorkType::Standard,
        _ => WorkType::Other,
    }
}

// Two stages: the work type names the kind of container it sits in,
// and the kind translates into the Commonmeta container vocabulary.
fn container_kind(work_type: &str) -> &'static str {
    match work_type {
        "book-chapter" => "book",
        "dataset" => "database",
        "journal-article" => "journal",
        "journal-issue" => "journal",
        "monograph" => "book-series",
        "proceedings-article" => "proceedings",
        "posted-content" => "periodical",
        _ => "",
    }
}

fn map_container_type(kind: &str) -> &'static str {
    match kind {
        "book" => "Book",
        "book-series" => "BookSeries",
        "database" => "DataRepository",
        "journal" => "Journal",
        "proceedings" => "Proceedings",
        "periodical" => "Periodical",
        _ => "",
    }
}

/// Crossref `relation` fields carried over, with their Commonmeta
/// relation type.
const RELATION_FIELDS: &[(&str, &str)] = &[
    ("is-part-of", "IsPartOf"),
    ("has-part", "HasPart"),
    ("is-variant-form-of", "IsVariantFormOf"),
    ("is-original-form-of", "IsOriginalFormOf"),
    ("is-identical-to", "IsIdenticalTo"),
    ("is-translation-of", "IsTranslationOf"),
    ("is-reviewed-by", "IsReviewedBy"),
    ("reviews", "Reviews"),
    ("has-review", "HasReview"),
    ("is-preprint-of", "IsPreprintOf"),
    ("has-preprint", "HasPreprint"),
    ("is-supplement-to", "IsSupplementTo"),
    ("is-supplemented-by", "IsSupplementedBy"),
];

/// Normalize a Crossref works message into a Commonmeta Work.
/// Deterministic: list order follows the upstream payload.
pub fn read_crossref(message: &CrossrefMessage) -> Work {
    let mut work = Work::base(doi_as_url(&message.doi));
    work.work_type = Some(map_work_type(&message.work_type));
    work.url = message.resource.primary.url.clone();
    work.provider = "Crossref".to_string();
    work.language = message.language.clone();
    work.version = message.version.clone();

    work.contributors = contributors(message);
    work.publisher = Publisher { id: String::new(), name: message.publisher.clone() };
    work.date = dates(message);
    if let Some(title) = message.title.first() {
        work.titles = vec![Title { title: title.clone(), ..Default::default() }];
    }
    work.container = container(message);
    work.subjects = message
        .subject
        .iter()
        .map(|s| Subject { subject: s.clone() })
        .collect();
    work.descriptions = descriptions(message);
    work.references = references(message);
    work.relations = relations(message);
    work.funding_references = funding_references(message);
    work.license = license(message);
    work.files = files(message);
    work.archive_locations = message.archive.clone();

    work
}

fn contributors(message: &CrossrefMessage) -> Vec<Contributor> {
    message
        .author
        .iter()
        .filter(|a| !a.name.is_empty() || !a.given.is_empty() || !a.family.is_empty())
        .map(|a| {
            let is_person =
                !a.orcid.is_empty() || !a.given.is_empty() || !a.family.is_empty();
            Contributor {
                id: a.orcid.clone(),
                contributor_type: if is_person { "Person" } else { "Organization" }.to_string(),
                name: a.name.clone(),
                given_name: a.given.clone(),
                family_name: a.family.clone(),
                affiliations: a
                    .affiliation
                    .iter()
                    .map(|af| Affiliation { id: af.ror.clone(), name: af.name.clone() })
                    .collect(),
                contributor_roles: vec!["Author".to_string()],
            }
        })
        .collect()
}

fn dates(message: &CrossrefMessage) -> commonpid_core::WorkDates {
    let mut date = commonpid_core::WorkDates::default();
    if !message.issued.date_time.is_empty() {
        date.published = Some(message.issued.date_time.clone());
    } else if let Some(issued) = commonpid_core::dates::date_from_date_parts(&message.issued.date_parts) {
        date.published = Some(issued);
    } else if !message.created.date_time.is_empty() {
        date.created = Some(message.created.date_time.clone());
    } else if let Some(created) = commonpid_core::dates::date_from_date_parts(&message.created.date_parts) {
        date.created = Some(created);
    }
    date
}

fn container(message: &CrossrefMessage) -> Container {
    let mut identifier = String::new();
    let mut identifier_type = String::new();
    if let Some(issn) = message.issn.first() {
        identifier = issn_as_url(issn);
        identifier_type = "ISSN".to_string();
    }
    if let Some(isbn) = message.isbn_type.first() {
        identifier = isbn.value.clone();
        identifier_type = "ISBN".to_string();
    }

    let (first_page, last_page) = split_pages(&message.page);

    Container {
        identifier,
        identifier_type,
        container_type: map_container_type(container_kind(&message.work_type)).to_string(),
        title: message.container_title.first().cloned().unwrap_or_default(),
        first_page,
        last_page,
        volume: message.volume.clone(),
        issue: message.issue.clone(),
    }
}

fn descriptions(message: &CrossrefMessage) -> Vec<Description> {
    if message.abstract_text.is_empty() {
        return Vec::new();
    }
    let sanitized = sanitize_html(&message.abstract_text);
    vec![Description {
        description: sanitized.trim_matches('\n').to_string(),
        description_type: "Abstract".to_string(),
        language: String::new(),
    }]
}

fn references(message: &CrossrefMessage) -> Vec<Reference> {
    message
        .reference
        .iter()
        .map(|r| Reference {
            key: r.key.clone(),
            id: doi_as_url(&r.doi),
            title: r.article_title.clone(),
            publication_year: r.year.clone(),
            unstructured: r.unstructured.clone(),
        })
        .collect()
}

fn relations(message: &CrossrefMessage) -> Vec<Relation> {
    let mut relations = Vec::new();
    for (field, relation_type) in RELATION_FIELDS {
        let Some(entries) = message.relation.get(*field) else {
            continue;
        };
        for entry in entries {
            let id = if DOI_RE.is_match(&entry.id) {
                doi_as_url(&entry.id)
            } else {
                entry.id.clone()
            };
            relations.push(Relation { id, relation_type: (*relation_type).to_string() });
        }
    }
    relations
}

fn funding_references(message: &CrossrefMessage) -> Vec<FundingReference> {
    let mut funding = Vec::new();
    for funder in &message.funder {
        let funder_identifier = doi_as_url(&funder.doi);
        let funder_identifier_type = if funder.doi.starts_with("10.13039") {
            "Crossref Funder ID".to_string()
        } else {
            String::new()
        };
        if funder.award.is_empty() {
            let entry = FundingReference {
                funder_identifier: funder_identifier.clone(),
                funder_identifier_type: funder_identifier_type.clone(),
                funder_name: funder.name.clone(),
                ..Default::default()
            };
            if !funding.contains(&entry) {
                funding.push(entry);
            }
        } else {
            for award in &funder.award {
                let entry = FundingReference {
                    funder_identifier: funder_identifier.clone(),
                    funder_identifier_type: funder_identifier_type.clone(),
                    funder_name: funder.name.clone(),
                    award_number: award.clone(),
                    ..Default::default()
                };
                if !funding.contains(&entry) {
                    funding.push(entry);
                }
            }
        }
    }
    funding
}

fn license(message: &CrossrefMessage) -> License {
    let Some(first) = message.license.first() else {
        return License::default();
    };
    let url = normalize_cc_url(&first.url);
    let id = url_to_spdx(&url);
    if id.is_empty() {
        tracing::debug!(url = %url, "license URL not found in SPDX");
    }
    License { id, url }
}

fn files(message: &CrossrefMessage) -> Vec<File> {
    let mut files = Vec::new();
    for link in &message.link {
        if link.content_type == "unspecified" {
            continue;
        }
        let file = File { url: link.url.clone(), mime_type: link.content_type.clone() };
        if !files.contains(&file) {
            files.push(file);
        }
    }
    files
}
