use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use crate::{
    aggregate::{aggregate, sort_by_year},
    config::{Config, Profile},
    fetch::Fetcher,
    output::{write_combined, write_profile},
    parser,
    record::RenderedCitation,
    render::render,
    validate::validate,
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Drive the whole pipeline for every configured profile, then once more for
/// the combined set.
///
/// Profiles are processed sequentially, in configuration order. A failing
/// profile is logged and skipped; the run keeps going and still exits
/// successfully. When every configured profile fails, the combined artifacts
/// are left untouched so the previous run's output stays available.
pub fn run(config: &Config, fetcher: &dyn Fetcher) -> anyhow::Result<RunSummary> {
    let mut per_profile: Vec<(String, Vec<RenderedCitation>)> = Vec::new();
    let mut summary = RunSummary::default();
    let progress = ProgressBar::new(config.citations.len() as u64);

    for profile in &config.citations {
        match process_profile(config, fetcher, profile, &progress) {
            Ok(citations) => {
                progress.suspend(|| {
                    eprintln!(
                        "{} {} ({} citations)",
                        "✓".green(),
                        profile.user_id,
                        citations.len()
                    )
                });
                summary.succeeded += 1;
                per_profile.push((profile.user_id.clone(), citations));
            }
            Err(err) => {
                progress.suspend(|| eprintln!("{} {}: {err:#}", "✗".red(), profile.user_id));
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if summary.failed > 0 && summary.succeeded == 0 {
        eprintln!("{} {} {} {}", "✓".green(), summary.succeeded, "✗".red(), summary.failed);
        return Ok(summary);
    }

    let combined = aggregate(&per_profile);
    write_combined(&config.output_dir, &combined)?;
    eprintln!("{} {} {} {}", "✓".green(), summary.succeeded, "✗".red(), summary.failed);
    Ok(summary)
}

/// Fetch → parse → validate → render → write for a single profile. The
/// returned citations are already sorted by descending year.
fn process_profile(
    config: &Config,
    fetcher: &dyn Fetcher,
    profile: &Profile,
    progress: &ProgressBar,
) -> anyhow::Result<Vec<RenderedCitation>> {
    let raw = fetcher.fetch(profile)?;

    let parsed = parser::parse(&raw);
    for diagnostic in &parsed.diagnostics {
        progress.suspend(|| eprintln!("  {}: {diagnostic}", profile.user_id));
    }

    let (kept, dropped) = validate(parsed.records, &config.mandatory_fields);
    for drop in &dropped {
        progress.suspend(|| {
            eprintln!(
                "  {}: dropping {} (missing {})",
                profile.user_id,
                drop.record.key,
                drop.missing.join(", ")
            )
        });
    }

    let bibtex: String = kept.iter().map(|r| r.to_bibtex_string()).collect();
    let mut citations: Vec<RenderedCitation> = kept
        .iter()
        .map(|record| render(record, config.style, profile.display_name()))
        .collect();
    sort_by_year(&mut citations);

    write_profile(
        &config.output_dir,
        &profile.user_id,
        profile.display_name(),
        &bibtex,
        &citations,
    )?;
    Ok(citations)
}
