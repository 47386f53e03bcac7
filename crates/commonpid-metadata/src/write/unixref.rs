//! Commonmeta to Crossref UNIXREF XML.

use std::io::Cursor;

use commonpid_core::{Contributor, Doi, Work, WorkType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{MetadataError, Result};

use super::date_parts_of;

fn xml_err<E: std::fmt::Display>(e: E) -> MetadataError {
    MetadataError::Parse(format!("XML write error: {e}"))
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn start(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name))).map_err(xml_err)
}

fn start_with_attrs(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(name);
    for attr in attrs {
        el.push_attribute(*attr);
    }
    w.write_event(Event::Start(el)).map_err(xml_err)
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name))).map_err(xml_err)
}

fn text_element(w: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(text))).map_err(xml_err)?;
    end(w, name)
}

/// Render a Work as a UNIXREF `doi_records` document. Journal articles
/// get the full journal shape; every other type is emitted as
/// `posted_content`. No citation list is carried.
pub fn write_unixref(work: &Work) -> Result<String> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    start(&mut w, "doi_records")?;
    start(&mut w, "doi_record")?;
    start(&mut w, "crossref")?;

    if work.work_type == Some(WorkType::JournalArticle) {
        write_journal(&mut w, work)?;
    } else {
        write_posted_content(&mut w, work)?;
    }

    end(&mut w, "crossref")?;
    end(&mut w, "doi_record")?;
    end(&mut w, "doi_records")?;

    String::from_utf8(w.into_inner().into_inner()).map_err(xml_err)
}

fn write_journal(w: &mut XmlWriter, work: &Work) -> Result<()> {
    start(w, "journal")?;

    start(w, "journal_metadata")?;
    if !work.container.title.is_empty() {
        text_element(w, "full_title", &work.container.title)?;
    }
    if work.container.identifier_type == "ISSN" && !work.container.identifier.is_empty() {
        let issn = work
            .container
            .identifier
            .rsplit('/')
            .next()
            .unwrap_or(&work.container.identifier);
        start_with_attrs(w, "issn", &[("media_type", "electronic")])?;
        w.write_event(Event::Text(BytesText::new(issn))).map_err(xml_err)?;
        end(w, "issn")?;
    }
    end(w, "journal_metadata")?;

    start(w, "journal_article")?;
    write_titles(w, work)?;
    write_contributors(w, work)?;
    write_publication_date(w, work)?;
    if !work.container.first_page.is_empty() {
        start(w, "pages")?;
        text_element(w, "first_page", &work.container.first_page)?;
        if !work.container.last_page.is_empty() {
            text_element(w, "last_page", &work.container.last_page)?;
        }
        end(w, "pages")?;
    }
    write_doi_data(w, work)?;
    end(w, "journal_article")?;

    end(w, "journal")
}

fn write_posted_content(w: &mut XmlWriter, work: &Work) -> Result<()> {
    start_with_attrs(w, "posted_content", &[("type", "other")])?;
    write_titles(w, work)?;
    write_contributors(w, work)?;
    write_posted_date(w, work)?;
    write_doi_data(w, work)?;
    end(w, "posted_content")
}

fn write_titles(w: &mut XmlWriter, work: &Work) -> Result<()> {
    if work.titles.is_empty() {
        return Ok(());
    }
    start(w, "titles")?;
    for title in &work.titles {
        text_element(w, "title", &title.title)?;
    }
    end(w, "titles")
}

fn write_contributors(w: &mut XmlWriter, work: &Work) -> Result<()> {
    let authors: Vec<&Contributor> = work
        .contributors
        .iter()
        .filter(|c| c.contributor_roles.iter().any(|r| r == "Author"))
        .collect();
    if authors.is_empty() {
        return Ok(());
    }
    start(w, "contributors")?;
    for (i, author) in authors.iter().enumerate() {
        let sequence = if i == 0 { "first" } else { "additional" };
        if author.contributor_type == "Organization" {
            start_with_attrs(
                w,
                "organization",
                &[("sequence", sequence), ("contributor_role", "author")],
            )?;
            w.write_event(Event::Text(BytesText::new(&author.name))).map_err(xml_err)?;
            end(w, "organization")?;
        } else {
            start_with_attrs(
                w,
                "person_name",
                &[("sequence", sequence), ("contributor_role", "author")],
            )?;
            if !author.given_name.is_empty() {
                text_element(w, "given_name", &author.given_name)?;
            }
            if !author.family_name.is_empty() {
                text_element(w, "surname", &author.family_name)?;
            }
            if !author.id.is_empty() {
                text_element(w, "ORCID", &author.id)?;
            }
            end(w, "person_name")?;
        }
    }
    end(w, "contributors")
}

fn date_elements(w: &mut XmlWriter, date: &str) -> Result<()> {
    let parts = date_parts_of(date);
    if parts.len() > 1 {
        text_element(w, "month", &format!("{:02}", parts[1]))?;
    }
    if parts.len() > 2 {
        text_element(w, "day", &format!("{:02}", parts[2]))?;
    }
    if let Some(year) = parts.first() {
        text_element(w, "year", &format!("{year:04}"))?;
    }
    Ok(())
}

fn write_publication_date(w: &mut XmlWriter, work: &Work) -> Result<()> {
    let Some(date) = work.date.published.as_deref() else {
        return Ok(());
    };
    start_with_attrs(w, "publication_date", &[("media_type", "online")])?;
    date_elements(w, date)?;
    end(w, "publication_date")
}

fn write_posted_date(w: &mut XmlWriter, work: &Work) -> Result<()> {
    let Some(date) = work.date.published.as_deref().or(work.date.created.as_deref()) else {
        return Ok(());
    };
    start(w, "posted_date")?;
    date_elements(w, date)?;
    end(w, "posted_date")
}

fn write_doi_data(w: &mut XmlWriter, work: &Work) -> Result<()> {
    start(w, "doi_data")?;
    if let Some(doi) = Doi::from_pid(&work.pid) {
        text_element(w, "doi", &doi.value)?;
    }
    if !work.url.is_empty() {
        text_element(w, "resource", &work.url)?;
    }
    end(w, "doi_data")
}
