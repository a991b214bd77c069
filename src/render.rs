use url::Url;

use crate::{
    config::Style,
    record::{RenderedCitation, SourceRecord},
};

/// Render one record into its display string for `style` plus the JSON-ready
/// projection. Pure in `entry_type` and `fields`: identical input yields
/// byte-identical output.
pub fn render(record: &SourceRecord, style: Style, profile: &str) -> RenderedCitation {
    let citation = match style {
        Style::Apa => apa(record),
        Style::Plain => plain(record),
    };
    RenderedCitation {
        key: record.key.clone(),
        entry_type: record.entry_type.clone(),
        fields: record.fields().map(|(n, v)| (n.into(), v.into())).collect(),
        citation,
        year: sort_year(record),
        scholar_url: scholar_search_url(record),
        profile: profile.to_string(),
    }
}

/// Numeric year for sorting; `None` when missing or non-numeric.
pub fn sort_year(record: &SourceRecord) -> Option<i32> {
    record.get("year").and_then(|y| y.trim().parse().ok())
}

/// Scholar title-search link for the record. Built locally, never fetched.
fn scholar_search_url(record: &SourceRecord) -> String {
    let query = record.get("title").unwrap_or(&record.key);
    match Url::parse_with_params("https://scholar.google.com/scholar", &[("q", query)]) {
        Ok(url) => url.into(),
        Err(_) => String::new(),
    }
}

fn authors(record: &SourceRecord) -> Vec<&str> {
    record
        .get("author")
        .map(|a| a.split(" and ").map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// `Family, I. J.` form for APA. Accepts both `Family, Given` and
/// `Given Family` BibTeX name order.
fn apa_name(name: &str) -> String {
    let (family, given) = match name.split_once(',') {
        Some((family, given)) => (family.trim(), given.trim()),
        None => match name.rsplit_once(char::is_whitespace) {
            Some((given, family)) => (family.trim(), given.trim()),
            None => (name.trim(), ""),
        },
    };
    let initials: Vec<String> = given
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect();
    if initials.is_empty() {
        family.to_string()
    } else {
        format!("{}, {}", family, initials.join(" "))
    }
}

fn apa_author_list(record: &SourceRecord) -> String {
    let names: Vec<String> = authors(record).iter().map(|n| apa_name(n)).collect();
    match names.len() {
        0 => String::new(),
        1 => names[0].clone(),
        _ => format!(
            "{}, & {}",
            names[..names.len() - 1].join(", "),
            names[names.len() - 1]
        ),
    }
}

/// Venue segment shared by both styles: journal for articles, `In booktitle`
/// for proceedings-like types, falling back through publisher and
/// howpublished.
fn venue(record: &SourceRecord) -> Option<String> {
    match record.entry_type.as_str() {
        "article" => record.get("journal").map(str::to_string),
        "inproceedings" | "incollection" | "conference" => {
            record.get("booktitle").map(|b| format!("In {b}"))
        }
        "phdthesis" => Some(match record.get("school") {
            Some(school) => format!("PhD thesis, {school}"),
            None => "PhD thesis".to_string(),
        }),
        "mastersthesis" => Some(match record.get("school") {
            Some(school) => format!("Master's thesis, {school}"),
            None => "Master's thesis".to_string(),
        }),
        _ => record
            .get("journal")
            .map(str::to_string)
            .or_else(|| record.get("booktitle").map(|b| format!("In {b}")))
            .or_else(|| record.get("publisher").map(str::to_string))
            .or_else(|| record.get("howpublished").map(str::to_string)),
    }
}

fn volume_pages(record: &SourceRecord) -> Option<String> {
    let volume = record.get("volume");
    let number = record.get("number");
    let pages = record.get("pages");
    let vol = match (volume, number) {
        (Some(v), Some(n)) => Some(format!("{v}({n})")),
        (Some(v), None) => Some(v.to_string()),
        (None, _) => None,
    };
    match (vol, pages) {
        (Some(v), Some(p)) => Some(format!("{v}, {p}")),
        (Some(v), None) => Some(v),
        (None, Some(p)) => Some(p.to_string()),
        (None, None) => None,
    }
}

fn push_segment(out: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(segment);
    if !segment.ends_with('.') {
        out.push('.');
    }
}

/// `Doe, J., & Smith, A. (2020). Title. Journal, 12(3), 1-10.`
fn apa(record: &SourceRecord) -> String {
    let mut out = String::new();
    let authors = apa_author_list(record);
    match record.get("year") {
        Some(year) if !authors.is_empty() => {
            out.push_str(&format!("{authors} ({year})."));
        }
        Some(year) => out.push_str(&format!("({year}).")),
        None if !authors.is_empty() => push_segment(&mut out, &authors),
        None => {}
    }
    if let Some(title) = record.get("title") {
        push_segment(&mut out, title);
    }
    let tail = match (venue(record), volume_pages(record)) {
        (Some(venue), Some(vp)) => Some(format!("{venue}, {vp}")),
        (Some(venue), None) => Some(venue),
        (None, Some(vp)) => Some(vp),
        (None, None) => None,
    };
    if let Some(tail) = tail {
        push_segment(&mut out, &tail);
    }
    out
}

/// `Doe, John, Smith, Alice. Title. Journal, 12(3), 1-10, 2020.`
fn plain(record: &SourceRecord) -> String {
    let mut out = String::new();
    let names = authors(record).join(", ");
    push_segment(&mut out, &names);
    if let Some(title) = record.get("title") {
        push_segment(&mut out, title);
    }
    let mut tail: Vec<String> = Vec::new();
    if let Some(venue) = venue(record) {
        tail.push(venue);
    }
    if let Some(vp) = volume_pages(record) {
        tail.push(vp);
    }
    if let Some(year) = record.get("year") {
        tail.push(year.to_string());
    }
    if !tail.is_empty() {
        push_segment(&mut out, &tail.join(", "));
    }
    out
}
