use serde::{Deserialize, Serialize};

/// The closed Commonmeta work-type vocabulary.
///
/// Values are the union of the Crossref and DataCite translation
/// targets; anything a source reports outside those tables maps to
/// `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    Article,
    Audiovisual,
    Book,
    BookChapter,
    BookPart,
    BookSection,
    BookSeries,
    BookSet,
    BookTrack,
    Collection,
    Component,
    ComputationalNotebook,
    Database,
    Dataset,
    Dissertation,
    Document,
    Entry,
    Event,
    Grant,
    Image,
    Instrument,
    InteractiveResource,
    Journal,
    JournalArticle,
    JournalIssue,
    JournalVolume,
    Model,
    Other,
    OutputManagementPlan,
    PeerReview,
    PhysicalObject,
    Presentation,
    Proceedings,
    ProceedingsArticle,
    ProceedingsSeries,
    Report,
    ReportComponent,
    ReportSeries,
    Service,
    Software,
    Sound,
    Standard,
    StudyRegistration,
    Workflow,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Audiovisual => "Audiovisual",
            Self::Book => "Book",
            Self::BookChapter => "BookChapter",
            Self::BookPart => "BookPart",
            Self::BookSection => "BookSection",
            Self::BookSeries => "BookSeries",
            Self::BookSet => "BookSet",
            Self::BookTrack => "BookTrack",
            Self::Collection => "Collection",
            Self::Component => "Component",
            Self::ComputationalNotebook => "ComputationalNotebook",
            Self::Database => "Database",
            Self::Dataset => "Dataset",
            Self::Dissertation => "Dissertation",
            Self::Document => "Document",
            Self::Entry => "Entry",
            Self::Event => "Event",
            Self::Grant => "Grant",
            Self::Image => "Image",
            Self::Instrument => "Instrument",
            Self::InteractiveResource => "InteractiveResource",
            Self::Journal => "Journal",
            Self::JournalArticle => "JournalArticle",
            Self::JournalIssue => "JournalIssue",
            Self::JournalVolume => "JournalVolume",
            Self::Model => "Model",
            Self::Other => "Other",
            Self::OutputManagementPlan => "OutputManagementPlan",
            Self::PeerReview => "PeerReview",
            Self::PhysicalObject => "PhysicalObject",
            Self::Presentation => "Presentation",
            Self::Proceedings => "Proceedings",
            Self::ProceedingsArticle => "ProceedingsArticle",
            Self::ProceedingsSeries => "ProceedingsSeries",
            Self::Report => "Report",
            Self::ReportComponent => "ReportComponent",
            Self::ReportSeries => "ReportSeries",
            Self::Service => "Service",
            Self::Software => "Software",
            Self::Sound => "Sound",
            Self::Standard => "Standard",
            Self::StudyRegistration => "StudyRegistration",
            Self::Workflow => "Workflow",
        }
    }

    /// Parse a vocabulary name. Empty or unknown strings return `None`,
    /// which callers treat as "minimal record".
    pub fn parse(s: &str) -> Option<Self> {
        let t = match s {
            "Article" => Self::Article,
            "Audiovisual" => Self::Audiovisual,
            "Book" => Self::Book,
            "BookChapter" => Self::BookChapter,
            "BookPart" => Self::BookPart,
            "BookSection" => Self::BookSection,
            "BookSeries" => Self::BookSeries,
            "BookSet" => Self::BookSet,
            "BookTrack" => Self::BookTrack,
            "Collection" => Self::Collection,
            "Component" => Self::Component,
            "ComputationalNotebook" => Self::ComputationalNotebook,
            "Database" => Self::Database,
            "Dataset" => Self::Dataset,
            "Dissertation" => Self::Dissertation,
            "Document" => Self::Document,
            "Entry" => Self::Entry,
            "Event" => Self::Event,
            "Grant" => Self::Grant,
            "Image" => Self::Image,
            "Instrument" => Self::Instrument,
            "InteractiveResource" => Self::InteractiveResource,
            "Journal" => Self::Journal,
            "JournalArticle" => Self::JournalArticle,
            "JournalIssue" => Self::JournalIssue,
            "JournalVolume" => Self::JournalVolume,
            "Model" => Self::Model,
            "Other" => Self::Other,
            "OutputManagementPlan" => Self::OutputManagementPlan,
            "PeerReview" => Self::PeerReview,
            "PhysicalObject" => Self::PhysicalObject,
            "Presentation" => Self::Presentation,
            "Proceedings" => Self::Proceedings,
            "ProceedingsArticle" => Self::ProceedingsArticle,
            "ProceedingsSeries" => Self::ProceedingsSeries,
            "Report" => Self::Report,
            "ReportComponent" => Self::ReportComponent,
            "ReportSeries" => Self::ReportSeries,
            "Service" => Self::Service,
            "Software" => Self::Software,
            "Sound" => Self::Sound,
            "Standard" => Self::Standard,
            "StudyRegistration" => Self::StudyRegistration,
            "Workflow" => Self::Workflow,
            _ => return None,
        };
        Some(t)
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DOI registration agencies the resolver can populate from or
/// delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAgency {
    Crossref,
    DataCite,
}

impl RegistrationAgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crossref => "Crossref",
            Self::DataCite => "DataCite",
        }
    }

    /// Parse the RA name as reported by the handle service or stored
    /// in `Work.provider`. Unknown agencies (mEDRA, KISTI, ...) return
    /// `None`; the resolver answers 404 for those.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Crossref" => Some(Self::Crossref),
            "DataCite" => Some(Self::DataCite),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistrationAgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for name in ["JournalArticle", "Dataset", "Other", "BookChapter"] {
            let t = WorkType::parse(name).unwrap();
            assert_eq!(t.as_str(), name);
        }
    }

    #[test]
    fn unknown_is_none() {
        assert_eq!(WorkType::parse(""), None);
        assert_eq!(WorkType::parse("journal-article"), None);
    }

    #[test]
    fn agency_parse() {
        assert_eq!(RegistrationAgency::parse("Crossref"), Some(RegistrationAgency::Crossref));
        assert_eq!(RegistrationAgency::parse("DataCite"), Some(RegistrationAgency::DataCite));
        assert_eq!(RegistrationAgency::parse("mEDRA"), None);
    }
}
