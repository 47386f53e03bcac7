//! Commonmeta to DataCite JSON attributes.

use commonpid_core::{Doi, Work, WorkType, DOI_RE};
use serde_json::{json, Map, Value};

use super::year_of;

fn resource_type_general(work_type: WorkType) -> &'static str {
    match work_type {
        WorkType::Article => "Preprint",
        WorkType::Audiovisual => "Audiovisual",
        WorkType::Book => "Book",
        WorkType::BookChapter => "BookChapter",
        WorkType::Collection => "Collection",
        WorkType::ComputationalNotebook => "ComputationalNotebook",
        WorkType::ProceedingsArticle => "ConferencePaper",
        WorkType::Proceedings => "ConferenceProceeding",
        WorkType::Dataset => "Dataset",
        WorkType::Dissertation => "Dissertation",
        WorkType::Document => "Text",
        WorkType::Event => "Event",
        WorkType::Image => "Image",
        WorkType::Instrument => "Instrument",
        WorkType::InteractiveResource => "InteractiveResource",
        WorkType::Journal => "Journal",
        WorkType::JournalArticle => "JournalArticle",
        WorkType::Model => "Model",
        WorkType::OutputManagementPlan => "OutputManagementPlan",
        WorkType::PeerReview => "PeerReview",
        WorkType::PhysicalObject => "PhysicalObject",
        WorkType::Presentation => "Poster",
        WorkType::Report => "Report",
        WorkType::Service => "Service",
        WorkType::Software => "Software",
        WorkType::Sound => "Sound",
        WorkType::Standard => "Standard",
        WorkType::StudyRegistration => "StudyRegistration",
        WorkType::Workflow => "Workflow",
        _ => "Other",
    }
}

fn related_identifier(id: &str, relation_type: &str) -> Value {
    let identifier_type = if id.starts_with("https://doi.org/") || DOI_RE.is_match(id) {
        "DOI"
    } else {
        "URL"
    };
    json!({
        "relatedIdentifier": id,
        "relatedIdentifierType": identifier_type,
        "relationType": relation_type,
    })
}

/// Render a Work as DataCite JSON attributes. Files and archive
/// locations have no DataCite slot and are not represented.
pub fn write_datacite(work: &Work) -> Value {
    let mut attributes = Map::new();

    let doi = Doi::from_pid(&work.pid);
    if let Some(doi) = &doi {
        attributes.insert("doi".into(), json!(doi.value));
        attributes.insert("prefix".into(), json!(doi.prefix()));
        attributes.insert("suffix".into(), json!(doi.suffix()));
    }
    if !work.url.is_empty() {
        attributes.insert("url".into(), json!(work.url));
    }

    attributes.insert(
        "types".into(),
        json!({
            "resourceTypeGeneral": resource_type_general(work.work_type.unwrap_or(WorkType::Other)),
            "resourceType": work.additional_type,
        }),
    );

    let creators: Vec<Value> = work
        .contributors
        .iter()
        .map(|c| {
            let mut creator = Map::new();
            creator.insert(
                "nameType".into(),
                json!(if c.contributor_type == "Organization" { "Organizational" } else { "Personal" }),
            );
            if !c.name.is_empty() {
                creator.insert("name".into(), json!(c.name));
            } else if !c.family_name.is_empty() || !c.given_name.is_empty() {
                creator.insert(
                    "name".into(),
                    json!(format!("{}, {}", c.family_name, c.given_name)),
                );
            }
            if !c.given_name.is_empty() {
                creator.insert("givenName".into(), json!(c.given_name));
            }
            if !c.family_name.is_empty() {
                creator.insert("familyName".into(), json!(c.family_name));
            }
            if !c.id.is_empty() {
                let scheme = if c.id.contains("orcid.org") { "ORCID" } else { "ROR" };
                creator.insert(
                    "nameIdentifiers".into(),
                    json!([{"nameIdentifier": c.id, "nameIdentifierScheme": scheme}]),
                );
            }
            if !c.affiliations.is_empty() {
                let names: Vec<&str> =
                    c.affiliations.iter().map(|a| a.name.as_str()).collect();
                creator.insert("affiliation".into(), json!(names));
            }
            Value::Object(creator)
        })
        .collect();
    attributes.insert("creators".into(), json!(creators));

    let titles: Vec<Value> = work
        .titles
        .iter()
        .map(|t| {
            let mut title = Map::new();
            title.insert("title".into(), json!(t.title));
            if !t.title_type.is_empty() {
                title.insert("titleType".into(), json!(t.title_type));
            }
            if !t.language.is_empty() {
                title.insert("lang".into(), json!(t.language));
            }
            Value::Object(title)
        })
        .collect();
    attributes.insert("titles".into(), json!(titles));

    if !work.publisher.name.is_empty() {
        attributes.insert("publisher".into(), json!(work.publisher.name));
    }
    if let Some(year) = work.date.published.as_deref().and_then(year_of) {
        attributes.insert("publicationYear".into(), json!(year));
    }

    let mut dates = Vec::new();
    for (value, date_type) in [
        (&work.date.accepted, "Accepted"),
        (&work.date.available, "Available"),
        (&work.date.collected, "Collected"),
        (&work.date.copyrighted, "Copyrighted"),
        (&work.date.created, "Created"),
        (&work.date.published, "Issued"),
        (&work.date.submitted, "Submitted"),
        (&work.date.updated, "Updated"),
        (&work.date.valid, "Valid"),
        (&work.date.withdrawn, "Withdrawn"),
        (&work.date.other, "Other"),
    ] {
        if let Some(date) = value {
            dates.push(json!({"date": date, "dateType": date_type}));
        }
    }
    attributes.insert("dates".into(), json!(dates));

    if !work.language.is_empty() {
        attributes.insert("language".into(), json!(work.language));
    }
    if !work.subjects.is_empty() {
        let subjects: Vec<Value> = work
            .subjects
            .iter()
            .map(|s| json!({"subject": s.subject}))
            .collect();
        attributes.insert("subjects".into(), json!(subjects));
    }

    let mut related = Vec::new();
    for reference in &work.references {
        if !reference.id.is_empty() {
            related.push(related_identifier(&reference.id, "References"));
        }
    }
    for relation in &work.relations {
        related.push(related_identifier(&relation.id, &relation.relation_type));
    }
    attributes.insert("relatedIdentifiers".into(), json!(related));

    if !work.license.url.is_empty() {
        let mut rights = Map::new();
        rights.insert("rightsUri".into(), json!(work.license.url));
        if !work.license.id.is_empty() {
            rights.insert("rightsIdentifier".into(), json!(work.license.id));
            rights.insert("rightsIdentifierScheme".into(), json!("SPDX"));
        }
        attributes.insert("rightsList".into(), json!([Value::Object(rights)]));
    }

    if !work.descriptions.is_empty() {
        let descriptions: Vec<Value> = work
            .descriptions
            .iter()
            .map(|d| {
                let mut description = Map::new();
                description.insert("description".into(), json!(d.description));
                if !d.description_type.is_empty() {
                    description.insert("descriptionType".into(), json!(d.description_type));
                }
                if !d.language.is_empty() {
                    description.insert("lang".into(), json!(d.language));
                }
                Value::Object(description)
            })
            .collect();
        attributes.insert("descriptions".into(), json!(descriptions));
    }

    if !work.funding_references.is_empty() {
        let funding: Vec<Value> = work
            .funding_references
            .iter()
            .map(|f| {
                let mut entry = Map::new();
                entry.insert("funderName".into(), json!(f.funder_name));
                if !f.funder_identifier.is_empty() {
                    entry.insert("funderIdentifier".into(), json!(f.funder_identifier));
                }
                if !f.funder_identifier_type.is_empty() {
                    entry.insert("funderIdentifierType".into(), json!(f.funder_identifier_type));
                }
                if !f.award_number.is_empty() {
                    entry.insert("awardNumber".into(), json!(f.award_number));
                }
                if !f.award_uri.is_empty() {
                    entry.insert("awardUri".into(), json!(f.award_uri));
                }
                Value::Object(entry)
            })
            .collect();
        attributes.insert("fundingReferences".into(), json!(funding));
    }

    if !work.geo_locations.is_empty() {
        attributes.insert(
            "geoLocations".into(),
            serde_json::to_value(&work.geo_locations).unwrap_or_else(|_| json!([])),
        );
    }
    if !work.alternate_identifiers.is_empty() {
        attributes.insert(
            "alternateIdentifiers".into(),
            serde_json::to_value(&work.alternate_identifiers).unwrap_or_else(|_| json!([])),
        );
    }
    if !work.sizes.is_empty() {
        attributes.insert("sizes".into(), json!(work.sizes));
    }
    if !work.formats.is_empty() {
        attributes.insert("formats".into(), json!(work.formats));
    }
    if !work.version.is_empty() {
        attributes.insert("version".into(), json!(work.version));
    }
    if !work.container.title.is_empty() {
        attributes.insert(
            "container".into(),
            json!({
                "type": work.container.container_type,
                "title": work.container.title,
                "identifier": work.container.identifier,
                "identifierType": work.container.identifier_type,
                "volume": work.container.volume,
                "issue": work.container.issue,
                "firstPage": work.container.first_page,
                "lastPage": work.container.last_page,
            }),
        );
    }

    Value::Object(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonpid_core::{Contributor, License, Reference, Relation, Title, WorkDates};

    #[test]
    fn dataset_attributes_shape() {
        let mut work = Work::base("https://doi.org/10.5281/zenodo.5244404");
        work.work_type = Some(WorkType::Dataset);
        work.url = "https://zenodo.org/record/5244404".to_string();
        work.titles = vec![Title { title: "Sensor readings".into(), ..Default::default() }];
        work.date = WorkDates {
            published: Some("2021-08-24".into()),
            created: Some("2021-08-20".into()),
            ..Default::default()
        };
        work.license = License {
            id: "CC-BY-4.0".into(),
            url: "https://creativecommons.org/licenses/by/4.0/legalcode".into(),
        };
        work.contributors = vec![Contributor {
            contributor_type: "Person".into(),
            given_name: "Sofia".into(),
            family_name: "Garcia".into(),
            contributor_roles: vec!["Author".into()],
            ..Default::default()
        }];
        work.references = vec![Reference {
            key: "ref1".into(),
            id: "https://doi.org/10.1038/nature14539".into(),
            ..Default::default()
        }];
        work.relations = vec![Relation {
            id: "https://example.org/v2".into(),
            relation_type: "IsVersionOf".into(),
        }];

        let attributes = write_datacite(&work);
        assert_eq!(attributes["doi"], "10.5281/zenodo.5244404");
        assert_eq!(attributes["prefix"], "10.5281");
        assert_eq!(attributes["types"]["resourceTypeGeneral"], "Dataset");
        assert_eq!(attributes["publicationYear"], 2021);
        assert_eq!(attributes["creators"][0]["name"], "Garcia, Sofia");
        assert_eq!(attributes["creators"][0]["nameType"], "Personal");
        assert_eq!(attributes["rightsList"][0]["rightsIdentifier"], "CC-BY-4.0");

        let related = attributes["relatedIdentifiers"].as_array().unwrap();
        assert_eq!(related.len(), 2);
        assert_eq!(related[0]["relationType"], "References");
        assert_eq!(related[0]["relatedIdentifierType"], "DOI");
        assert_eq!(related[1]["relatedIdentifierType"], "URL");

        let dates = attributes["dates"].as_array().unwrap();
        assert!(dates.iter().any(|d| d["dateType"] == "Issued"));
        assert!(dates.iter().any(|d| d["dateType"] == "Created"));
    }

    #[test]
    fn document_reverses_to_text() {
        let mut work = Work::base("https://doi.org/10.5555/t");
        work.work_type = Some(WorkType::Document);
        assert_eq!(
            write_datacite(&work)["types"]["resourceTypeGeneral"],
            "Text"
        );
    }
}
