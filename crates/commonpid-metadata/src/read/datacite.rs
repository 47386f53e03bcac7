//! DataCite JSON:API attributes to Commonmeta.

use commonpid_core::{
    doi_as_url, Affiliation, AlternateIdentifier, Container, Contributor, Description,
    FundingReference, GeoLocation, GeoLocationBox, GeoLocationPoint, License, Publisher,
    Reference, Relation, Subject, Title, Work, WorkDates, WorkType, DOI_RE,
};
use url::Url;

use super::CONTRIBUTOR_ROLES;
use crate::licenses::url_to_spdx;
use crate::sources::datacite::{DataciteAttributes, DataciteCreator};

// source: https://github.com/datacite/schema, resourceTypeGeneral v4
fn map_work_type(source: &str) -> Option<WorkType> {
    let t = match source {
        "Audiovisual" => WorkType::Audiovisual,
        "BlogPosting" => WorkType::Article,
        "Book" => WorkType::Book,
        "BookChapter" => WorkType::BookChapter,
        "Collection" => WorkType::Collection,
        "ComputationalNotebook" => WorkType::ComputationalNotebook,
        "ConferencePaper" => WorkType::ProceedingsArticle,
        "ConferenceProceeding" => WorkType::Proceedings,
        "DataPaper" => WorkType::JournalArticle,
        "Dataset" => WorkType::Dataset,
        "Dissertation" => WorkType::Dissertation,
        "Event" => WorkType::Event,
        "Image" => WorkType::Image,
        "Instrument" => WorkType::Instrument,
        "InteractiveResource" => WorkType::InteractiveResource,
        "Journal" => WorkType::Journal,
        "JournalArticle" => WorkType::JournalArticle,
        "Model" => WorkType::Model,
        "OutputManagementPlan" => WorkType::OutputManagementPlan,
        "PeerReview" => WorkType::PeerReview,
        "PhysicalObject" => WorkType::PhysicalObject,
        "Poster" => WorkType::Presentation,
        "Preprint" => WorkType::Article,
        "Report" => WorkType::Report,
        "Service" => WorkType::Service,
        "Software" => WorkType::Software,
        "Sound" => WorkType::Sound,
        "Standard" => WorkType::Standard,
        "StudyRegistration" => WorkType::StudyRegistration,
        "Text" => WorkType::Document,
        "Thesis" => WorkType::Dissertation,
        "Workflow" => WorkType::Workflow,
        "Other" => WorkType::Other,
        _ => return None,
    };
    Some(t)
}

/// relatedIdentifier relation types that become references.
const REFERENCE_RELATIONS: &[&str] = &["Cites", "References"];

/// relatedIdentifier relation types kept as relations.
const RELATION_TYPES: &[&str] = &[
    "IsNewVersionOf",
    "IsPreviousVersionOf",
    "IsVersionOf",
    "HasVersion",
    "IsPartOf",
    "HasPart",
    "IsVariantFormOf",
    "IsOriginalFormOf",
    "IsIdenticalTo",
    "IsTranslationOf",
    "IsReviewedBy",
    "Reviews",
    "IsPreprintOf",
    "HasPreprint",
    "IsSupplementTo",
];

/// Normalize DataCite DOI attributes into a Commonmeta Work.
pub fn read_datacite(attributes: &DataciteAttributes) -> Work {
    let mut work = Work::base(doi_as_url(&attributes.doi));
    work.url = attributes.url.clone();
    work.provider = "DataCite".to_string();
    work.language = attributes.language.clone();
    work.version = attributes.version.clone();

    let general = map_work_type(&attributes.types.resource_type_general)
        .unwrap_or(WorkType::Other);
    // A mappable resourceType is more specific than the general
    // category and takes its place.
    match map_work_type(&attributes.types.resource_type) {
        Some(specific) => work.work_type = Some(specific),
        None => {
            work.work_type = Some(general);
            work.additional_type = attributes.types.resource_type.clone();
        }
    }

    work.contributors = contributors(attributes);
    work.publisher = Publisher { id: String::new(), name: attributes.publisher.clone() };
    work.date = dates(attributes);
    work.titles = titles(attributes);
    work.container = Container {
        identifier: attributes.container.identifier.clone(),
        identifier_type: attributes.container.identifier_type.clone(),
        container_type: attributes.container.container_type.clone(),
        title: attributes.container.title.clone(),
        first_page: attributes.container.first_page.clone(),
        last_page: attributes.container.last_page.clone(),
        volume: attributes.container.volume.clone(),
        issue: attributes.container.issue.clone(),
    };
    work.subjects = attributes
        .subjects
        .iter()
        .map(|s| Subject { subject: s.subject.clone() })
        .collect();
    work.sizes = attributes.sizes.clone();
    work.formats = attributes.formats.clone();
    work.license = license(attributes);
    work.references = references(attributes);
    work.relations = relations(attributes);
    work.funding_references = funding_references(attributes);
    work.descriptions = descriptions(attributes);
    work.geo_locations = geo_locations(attributes);
    work.alternate_identifiers = attributes
        .alternate_identifiers
        .iter()
        .map(|a| AlternateIdentifier {
            identifier: a.identifier.clone(),
            identifier_type: a.identifier_type.clone(),
        })
        .collect();

    work
}

fn name_type_to_contributor_type(name_type: &str) -> &'static str {
    match name_type {
        "Personal" => "Person",
        "Organizational" => "Organization",
        _ => "",
    }
}

fn contributor_from(creator: &DataciteCreator, roles: Vec<String>) -> Option<Contributor> {
    if creator.name.is_empty() && creator.given_name.is_empty() && creator.family_name.is_empty() {
        return None;
    }

    let mut contributor_type = name_type_to_contributor_type(&creator.name_type).to_string();
    let mut id = String::new();
    if let Some(ni) = creator.name_identifiers.first() {
        id = ni.name_identifier.clone();
        let scheme_uri = if !ni.scheme_uri.is_empty() {
            ni.scheme_uri.clone()
        } else {
            // Derive the scheme from the identifier URL host.
            Url::parse(&ni.name_identifier)
                .ok()
                .and_then(|mut u| {
                    u.set_path("");
                    Some(u.to_string().trim_end_matches('/').to_string())
                })
                .unwrap_or_default()
        };
        if scheme_uri == "https://orcid.org" || ni.name_identifier_scheme == "ORCID" {
            contributor_type = "Person".to_string();
        } else if scheme_uri == "https://ror.org" || ni.name_identifier_scheme == "ROR" {
            contributor_type = "Organization".to_string();
        }
    }

    let mut name = creator.name.clone();
    if contributor_type.is_empty() {
        if !creator.given_name.is_empty() || !creator.family_name.is_empty() {
            contributor_type = "Person".to_string();
            name = String::new();
        } else {
            contributor_type = "Organization".to_string();
        }
    }

    Some(Contributor {
        id,
        contributor_type,
        name,
        given_name: creator.given_name.clone(),
        family_name: creator.family_name.clone(),
        affiliations: creator
            .affiliation
            .iter()
            .map(|a| Affiliation { id: String::new(), name: a.clone() })
            .collect(),
        contributor_roles: roles,
    })
}

fn contributors(attributes: &DataciteAttributes) -> Vec<Contributor> {
    let mut all: Vec<Contributor> = attributes
        .creators
        .iter()
        .filter_map(|c| contributor_from(c, vec!["Author".to_string()]))
        .collect();

    // Merge the contributors list, de-duplicating on identifier and
    // keeping only schema-admitted roles.
    for extra in &attributes.contributors {
        let roles = if CONTRIBUTOR_ROLES.contains(&extra.contributor_type.as_str()) {
            vec![extra.contributor_type.clone()]
        } else {
            Vec::new()
        };
        let Some(contributor) = contributor_from(extra, roles) else {
            continue;
        };
        let duplicate = !contributor.id.is_empty()
            && all.iter().any(|c| c.id == contributor.id);
        if duplicate {
            tracing::debug!(id = %contributor.id, "contributor already present, skipping");
            continue;
        }
        all.push(contributor);
    }

    all
}

fn dates(attributes: &DataciteAttributes) -> WorkDates {
    let mut date = WorkDates::default();
    for entry in &attributes.dates {
        let value = Some(entry.date.clone());
        match entry.date_type.as_str() {
            "Accepted" => date.accepted = value,
            "Available" => date.available = value,
            "Collected" => date.collected = value,
            "Copyrighted" => date.copyrighted = value,
            "Created" => date.created = value,
            "Issued" => date.published = value,
            "Submitted" => date.submitted = value,
            "Updated" => date.updated = value,
            "Valid" => date.valid = value,
            "Withdrawn" => date.withdrawn = value,
            "Other" => date.other = value,
            _ => {}
        }
    }
    date
}

fn titles(attributes: &DataciteAttributes) -> Vec<Title> {
    attributes
        .titles
        .iter()
        .map(|t| {
            let title_type = match t.title_type.as_str() {
                kind @ ("MainTitle" | "Subtitle" | "TranslatedTitle") => kind.to_string(),
                _ => String::new(),
            };
            Title { title: t.title.clone(), title_type, language: t.lang.clone() }
        })
        .collect()
}

fn license(attributes: &DataciteAttributes) -> License {
    let Some(rights) = attributes.rights_list.first() else {
        return License::default();
    };
    let id = url_to_spdx(&rights.rights_uri);
    if id.is_empty() {
        tracing::debug!(url = %rights.rights_uri, "license URL not found in SPDX");
    }
    License { id, url: rights.rights_uri.clone() }
}

fn references(attributes: &DataciteAttributes) -> Vec<Reference> {
    let mut references = Vec::new();
    for (i, related) in attributes.related_identifiers.iter().enumerate() {
        if !REFERENCE_RELATIONS.contains(&related.relation_type.as_str()) {
            continue;
        }
        let (id, unstructured) = if DOI_RE.is_match(&related.related_identifier) {
            (doi_as_url(&related.related_identifier), String::new())
        } else {
            (String::new(), related.related_identifier.clone())
        };
        references.push(Reference {
            key: format!("ref{}", i + 1),
            id,
            unstructured,
            ..Default::default()
        });
    }
    references
}

fn relations(attributes: &DataciteAttributes) -> Vec<Relation> {
    attributes
        .related_identifiers
        .iter()
        .filter(|r| RELATION_TYPES.contains(&r.relation_type.as_str()))
        .map(|r| {
            let id = if DOI_RE.is_match(&r.related_identifier) {
                doi_as_url(&r.related_identifier)
            } else {
                r.related_identifier.clone()
            };
            Relation { id, relation_type: r.relation_type.clone() }
        })
        .collect()
}

fn funding_references(attributes: &DataciteAttributes) -> Vec<FundingReference> {
    attributes
        .funding_references
        .iter()
        .map(|f| FundingReference {
            funder_identifier: f.funder_identifier.clone(),
            funder_identifier_type: f.funder_identifier_type.clone(),
            funder_name: f.funder_name.clone(),
            award_number: f.award_number.clone(),
            award_uri: f.award_uri.clone(),
        })
        .collect()
}

fn descriptions(attributes: &DataciteAttributes) -> Vec<Description> {
    attributes
        .descriptions
        .iter()
        .map(|d| {
            let description_type = match d.description_type.as_str() {
                kind @ ("Abstract" | "Summary" | "Methods" | "TechnicalInfo" | "Other") => {
                    kind.to_string()
                }
                _ => String::new(),
            };
            Description {
                description: d.description.clone(),
                description_type,
                language: d.lang.clone(),
            }
        })
        .collect()
}

fn geo_locations(attributes: &DataciteAttributes) -> Vec<GeoLocation> {
    attributes
        .geo_locations
        .iter()
        .map(|g| {
            let point = GeoLocationPoint {
                point_longitude: g.geo_location_point.point_longitude,
                point_latitude: g.geo_location_point.point_latitude,
            };
            let bx = GeoLocationBox {
                west_bound_longitude: g.geo_location_box.west_bound_longitude,
                east_bound_longitude: g.geo_location_box.east_bound_longitude,
                south_bound_latitude: g.geo_location_box.south_bound_latitude,
                north_bound_latitude: g.geo_location_box.north_bound_latitude,
            };
            GeoLocation {
                geo_location_place: g.geo_location_place.clone(),
                geo_location_point: (point != GeoLocationPoint::default()).then_some(point),
                geo_location_box: (bx != GeoLocationBox::default()).then_some(bx),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::datacite::DataciteAttributes;

    fn attributes(json: serde_json::Value) -> DataciteAttributes {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn maps_dataset() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.5244404",
            "url": "https://zenodo.org/record/5244404",
            "types": {"resourceTypeGeneral": "Dataset", "resourceType": ""},
            "titles": [{"title": "Sensor readings 2021"}],
            "publisher": "Zenodo",
            "dates": [{"date": "2021-08-24", "dateType": "Issued"},
                      {"date": "2021-08-20", "dateType": "Created"}],
            "language": "en"
        })));

        assert_eq!(work.pid, "https://doi.org/10.5281/zenodo.5244404");
        assert_eq!(work.work_type, Some(WorkType::Dataset));
        assert_eq!(work.provider, "DataCite");
        assert_eq!(work.date.published.as_deref(), Some("2021-08-24"));
        assert_eq!(work.date.created.as_deref(), Some("2021-08-20"));
        assert_eq!(work.titles[0].title, "Sensor readings 2021");
    }

    #[test]
    fn generic_text_becomes_document() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.1",
            "types": {"resourceTypeGeneral": "Text", "resourceType": "Newsletter"}
        })));
        assert_eq!(work.work_type, Some(WorkType::Document));
        assert_eq!(work.additional_type, "Newsletter");
    }

    #[test]
    fn specific_resource_type_takes_precedence() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.2",
            "types": {"resourceTypeGeneral": "Text", "resourceType": "BlogPosting"}
        })));
        assert_eq!(work.work_type, Some(WorkType::Article));
        assert_eq!(work.additional_type, "");
    }

    #[test]
    fn unknown_general_type_is_other() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.3",
            "types": {"resourceTypeGeneral": "Hologram"}
        })));
        assert_eq!(work.work_type, Some(WorkType::Other));
    }

    #[test]
    fn creators_and_contributors_merge_with_dedupe() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.4",
            "types": {"resourceTypeGeneral": "Dataset"},
            "creators": [
                {"name": "Garcia, Sofia", "givenName": "Sofia", "familyName": "Garcia",
                 "nameType": "Personal",
                 "nameIdentifiers": [{"nameIdentifier": "https://orcid.org/0000-0002-1825-0097",
                                      "schemeUri": "https://orcid.org",
                                      "nameIdentifierScheme": "ORCID"}]}
            ],
            "contributors": [
                {"name": "Garcia, Sofia", "givenName": "Sofia", "familyName": "Garcia",
                 "contributorType": "DataCurator",
                 "nameIdentifiers": [{"nameIdentifier": "https://orcid.org/0000-0002-1825-0097",
                                      "nameIdentifierScheme": "ORCID"}]},
                {"name": "Example University", "nameType": "Organizational",
                 "contributorType": "HostingInstitution"},
                {"name": "Someone", "contributorType": "NotARealRole"}
            ]
        })));

        assert_eq!(work.contributors.len(), 3);
        assert_eq!(work.contributors[0].contributor_type, "Person");
        assert_eq!(work.contributors[0].contributor_roles, vec!["Author"]);
        assert_eq!(work.contributors[1].name, "Example University");
        assert_eq!(work.contributors[1].contributor_type, "Organization");
        assert_eq!(work.contributors[1].contributor_roles, vec!["HostingInstitution"]);
        // Unknown contributorType keeps the contributor, drops the role.
        assert!(work.contributors[2].contributor_roles.is_empty());
    }

    #[test]
    fn ror_scheme_marks_organizations() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.5",
            "types": {"resourceTypeGeneral": "Dataset"},
            "creators": [
                {"name": "DataCite",
                 "nameIdentifiers": [{"nameIdentifier": "https://ror.org/04wxnsj81"}]}
            ]
        })));
        assert_eq!(work.contributors[0].contributor_type, "Organization");
        assert_eq!(work.contributors[0].id, "https://ror.org/04wxnsj81");
    }

    #[test]
    fn related_identifiers_split_into_references_and_relations() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.6",
            "types": {"resourceTypeGeneral": "Dataset"},
            "relatedIdentifiers": [
                {"relatedIdentifier": "10.1038/nature14539", "relatedIdentifierType": "DOI",
                 "relationType": "Cites"},
                {"relatedIdentifier": "https://example.org/paper", "relatedIdentifierType": "URL",
                 "relationType": "References"},
                {"relatedIdentifier": "10.5281/zenodo.7", "relatedIdentifierType": "DOI",
                 "relationType": "IsVersionOf"},
                {"relatedIdentifier": "10.5281/zenodo.8", "relatedIdentifierType": "DOI",
                 "relationType": "IsCitedBy"}
            ]
        })));

        assert_eq!(work.references.len(), 2);
        assert_eq!(work.references[0].key, "ref1");
        assert_eq!(work.references[0].id, "https://doi.org/10.1038/nature14539");
        assert_eq!(work.references[1].key, "ref2");
        assert_eq!(work.references[1].unstructured, "https://example.org/paper");

        assert_eq!(work.relations.len(), 1);
        assert_eq!(work.relations[0].relation_type, "IsVersionOf");
        assert_eq!(work.relations[0].id, "https://doi.org/10.5281/zenodo.7");
    }

    #[test]
    fn typed_dates_land_in_named_fields() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.9",
            "types": {"resourceTypeGeneral": "Dataset"},
            "dates": [
                {"date": "2020-01-01", "dateType": "Accepted"},
                {"date": "2020-02-01", "dateType": "Available"},
                {"date": "2020-03-01", "dateType": "Withdrawn"},
                {"date": "2020-04-01", "dateType": "NoSuchType"}
            ]
        })));
        assert_eq!(work.date.accepted.as_deref(), Some("2020-01-01"));
        assert_eq!(work.date.available.as_deref(), Some("2020-02-01"));
        assert_eq!(work.date.withdrawn.as_deref(), Some("2020-03-01"));
        assert_eq!(work.date.other, None);
    }

    #[test]
    fn rights_uri_maps_to_spdx() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.10",
            "types": {"resourceTypeGeneral": "Dataset"},
            "rightsList": [{"rights": "Creative Commons Attribution 4.0",
                            "rightsUri": "https://creativecommons.org/licenses/by/4.0/legalcode"}]
        })));
        assert_eq!(work.license.id, "CC-BY-4.0");
    }

    #[test]
    fn geo_locations_carry_point_box_and_place() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.11",
            "types": {"resourceTypeGeneral": "Dataset"},
            "geoLocations": [{
                "geoLocationPlace": "Atlantic Ocean",
                "geoLocationPoint": {"pointLongitude": -31.233, "pointLatitude": 67.0},
                "geoLocationBox": {"westBoundLongitude": -71.032, "eastBoundLongitude": -68.211,
                                    "southBoundLatitude": 41.09, "northBoundLatitude": 42.893}
            }]
        })));
        let geo = &work.geo_locations[0];
        assert_eq!(geo.geo_location_place, "Atlantic Ocean");
        assert_eq!(geo.geo_location_point.as_ref().unwrap().point_latitude, 67.0);
        assert_eq!(geo.geo_location_box.as_ref().unwrap().north_bound_latitude, 42.893);
    }

    #[test]
    fn title_type_whitelist() {
        let work = read_datacite(&attributes(serde_json::json!({
            "doi": "10.5281/zenodo.12",
            "types": {"resourceTypeGeneral": "Dataset"},
            "titles": [
                {"title": "Main"},
                {"title": "Sub", "titleType": "Subtitle"},
                {"title": "Alt", "titleType": "AlternativeTitle"}
            ]
        })));
        assert_eq!(work.titles[0].title_type, "");
        assert_eq!(work.titles[1].title_type, "Subtitle");
        assert_eq!(work.titles[2].title_type, "");
    }
}
