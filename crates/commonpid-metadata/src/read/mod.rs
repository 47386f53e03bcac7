mod crossref;
mod datacite;

pub use crossref::read_crossref;
pub use datacite::read_datacite;

/// Contributor roles admitted by the Commonmeta schema.
pub const CONTRIBUTOR_ROLES: &[&str] = &[
    "Author",
    "Editor",
    "Chair",
    "Reviewer",
    "ReviewAssistant",
    "StatsReviewer",
    "ReviewerExternal",
    "Reader",
    "Translator",
    "ContactPerson",
    "DataCollector",
    "DataManager",
    "Distributor",
    "HostingInstitution",
    "Producer",
    "ProjectLeader",
    "ProjectManager",
    "ProjectMember",
    "RegistrationAgency",
    "RegistrationAuthority",
    "RelatedPerson",
    "ResearchGroup",
    "RightsHolder",
    "Researcher",
    "Sponsor",
    "WorkPackageLeader",
    "Conceptualization",
    "DataCuration",
    "FormalAnalysis",
    "FundingAcquisition",
    "Investigation",
    "Methodology",
    "ProjectAdministration",
    "Resources",
    "Software",
    "Supervision",
    "Validation",
    "Visualization",
    "WritingOriginalDraft",
    "WritingReviewEditing",
    "Maintainer",
    "Other",
];

/// ISSN portal URL for an ISSN, empty in, empty out.
pub fn issn_as_url(issn: &str) -> String {
    if issn.is_empty() {
        return String::new();
    }
    format!("https://portal.issn.org/resource/ISSN/{issn}")
}

/// Split a pagination string on `-` into (firstPage, lastPage).
pub fn split_pages(page: &str) -> (String, String) {
    let mut parts = page.splitn(2, '-');
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().to_string();
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issn_url() {
        assert_eq!(
            issn_as_url("2146-8427"),
            "https://portal.issn.org/resource/ISSN/2146-8427"
        );
        assert_eq!(issn_as_url(""), "");
    }

    #[test]
    fn page_ranges_split() {
        assert_eq!(split_pages("89-96"), ("89".to_string(), "96".to_string()));
        assert_eq!(split_pages("42"), ("42".to_string(), String::new()));
        assert_eq!(split_pages(""), (String::new(), String::new()));
    }
}
