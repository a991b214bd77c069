use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::record::RenderedCitation;

/// Persist one profile's artifacts: `{user_id}.bib`, `{user_id}.html`,
/// `{user_id}.json`. Whole-file overwrites; the next scheduled run replaces
/// anything an interrupted run left behind.
pub fn write_profile(
    output_dir: &Path,
    user_id: &str,
    title: &str,
    bibtex: &str,
    citations: &[RenderedCitation],
) -> anyhow::Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    write(output_dir, &format!("{user_id}.bib"), bibtex)?;
    write(
        output_dir,
        &format!("{user_id}.html"),
        &html_page(title, citations, false),
    )?;
    write(output_dir, &format!("{user_id}.json"), &json_text(citations)?)?;
    Ok(())
}

/// Persist the combined artifacts `all.html` and `all.json`. There is no
/// combined `.bib`: merging BibTeX across profiles is not well-defined without
/// re-keying.
pub fn write_combined(output_dir: &Path, citations: &[RenderedCitation]) -> anyhow::Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    write(
        output_dir,
        "all.html",
        &html_page("All publications", citations, true),
    )?;
    write(output_dir, "all.json", &json_text(citations)?)?;
    Ok(())
}

fn write(output_dir: &Path, name: &str, contents: &str) -> anyhow::Result<()> {
    let path = output_dir.join(name);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))
}

pub fn json_text(citations: &[RenderedCitation]) -> anyhow::Result<String> {
    let values: Vec<serde_json::Value> = citations.iter().map(|c| c.to_json()).collect();
    serde_json::to_string_pretty(&values).context("serializing citations to JSON")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const PAGE_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }\n\
table { border-collapse: collapse; width: 100%; }\n\
th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }\n\
th { background-color: #f2f2f2; }\n\
tr[data-name]:hover { background-color: #f5f5f5; color: #0066cc; cursor: pointer; }\n\
h1 { color: #333; }\n\
.filter-links { margin-bottom: 20px; }\n\
.filter-links a { margin-right: 15px; color: #0066cc; padding: 5px 10px; border-radius: 3px; cursor: pointer; }\n\
.filter-links a.active { background-color: #0066cc; color: white; }\n\
.hidden { display: none; }";

const PAGE_SCRIPT: &str = "\
function filterByName(name) {\n\
  document.querySelectorAll('.filter-links a').forEach(function (link) {\n\
    link.classList.toggle('active', link.getAttribute('data-name') === name);\n\
  });\n\
  document.querySelectorAll('table tr[data-name]').forEach(function (row) {\n\
    row.classList.toggle('hidden', name !== 'all' && row.getAttribute('data-name') !== name);\n\
  });\n\
}\n\
function openUrl(url) { window.open(url, '_blank'); }";

/// A standalone page with a Year/Citation table. Callers pass citations
/// already sorted by descending year. The combined page additionally gets
/// per-profile filter links.
fn html_page(title: &str, citations: &[RenderedCitation], filters: bool) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(&format!("<style>\n{PAGE_STYLE}\n</style>\n"));
    html.push_str(&format!("<script>\n{PAGE_SCRIPT}\n</script>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));

    if filters {
        let names: BTreeSet<&str> = citations.iter().map(|c| c.profile.as_str()).collect();
        html.push_str("<div class=\"filter-links\">\n");
        html.push_str(
            "<a onclick=\"filterByName('all')\" data-name=\"all\" class=\"active\">All</a>\n",
        );
        for name in names {
            html.push_str(&format!(
                "<a onclick=\"filterByName('{0}')\" data-name=\"{0}\">{1}</a>\n",
                escape(name),
                escape(&name.replace('_', " ")),
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str("<table>\n<tr><th>Year</th><th>Citation</th></tr>\n");
    for citation in citations {
        if citation.citation.is_empty() {
            continue;
        }
        let year = citation
            .fields
            .iter()
            .find(|(n, _)| n == "year")
            .map(|(_, v)| v.as_str())
            .unwrap_or("");
        html.push_str(&format!(
            "<tr data-name=\"{}\" onclick=\"openUrl('{}')\"><td>{}</td><td>{}</td></tr>\n",
            escape(&citation.profile),
            escape(&citation.scholar_url),
            escape(year),
            escape(&citation.citation),
        ));
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}
