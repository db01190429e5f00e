use crate::application::parsers::section;
use crate::application::services::RequestService;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI configuration for qurl
#[derive(Parser, Debug)]
#[command(name = "qurl", version = "0.1.0")]
#[command(about = "qurl: run curl request files and keep the answers", long_about = None)]
pub struct Cli {
    /// Request file: a JSON request object, a curl command, or a
    /// multi-request document with `## <title>` headings.
    pub file: PathBuf,

    /// Run only the section with this exact title.
    #[arg(long)]
    pub section: Option<String>,

    /// Request timeout in seconds.
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Print the response instead of writing the .res file.
    #[arg(long)]
    pub no_save: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(&self, service: &RequestService) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("could not read {}", self.file.display()))?;

        let jobs = self.collect_jobs(&text)?;
        let destination = self.destination_identity();

        let mut results: Vec<(Option<String>, String)> = Vec::new();
        for (title, command_text) in jobs {
            if self.verbose {
                if let Some(title) = &title {
                    println!("{}", format!("Running: {title}").cyan());
                }
            }
            let execution = service.execute(&command_text, &destination).await?;
            if self.verbose {
                println!(
                    "{}",
                    format!(
                        "Status: {} {}  ({:.2} s)",
                        execution.status_code, execution.status_text, execution.elapsed_secs
                    )
                    .cyan()
                );
            }
            results.push((title, execution.rendered));
        }

        let document = render_document(&results);
        if service.config().save_to_file {
            let path = response_path(&self.file);
            std::fs::write(&path, &document)
                .with_context(|| format!("could not write {}", path.display()))?;
            if self.verbose {
                println!("Saved response to {}", path.display());
            }
        } else {
            crate::infrastructure::output::print_response(&document);
        }
        Ok(())
    }

    /// One (title, command text) pair per request to execute. A file
    /// without headings is a single implicit request.
    fn collect_jobs(&self, text: &str) -> Result<Vec<(Option<String>, String)>> {
        let sections = section::sections(text);

        if sections.is_empty() {
            if let Some(wanted) = &self.section {
                return Err(anyhow!(
                    "section '{wanted}' requested but the file has no sections"
                ));
            }
            let trimmed = text.trim_start();
            // JSON requests go to the parser untouched; command text is
            // rebuilt from the whole file so line continuations fold.
            // The leading tool name is optional for a single-request
            // file, so a failed curl-substring search falls back to
            // the folded lines and the parser decides.
            let command_text = if trimmed.starts_with('{') || trimmed.starts_with('[') {
                text.to_string()
            } else {
                let last_line = text.lines().count().saturating_sub(1);
                section::extract(text, 0, last_line)
                    .unwrap_or_else(|| section::fold_lines(text, 0, last_line))
            };
            if command_text.trim().is_empty() {
                return Err(anyhow!("no request found in {}", self.file.display()));
            }
            return Ok(vec![(None, command_text)]);
        }

        let selected: Vec<_> = match &self.section {
            Some(wanted) => {
                let matched: Vec<_> = sections
                    .iter()
                    .filter(|s| &s.title == wanted)
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    let titles: Vec<&str> =
                        sections.iter().map(|s| s.title.as_str()).collect();
                    return Err(anyhow!(
                        "no section titled '{wanted}'; available: {}",
                        titles.join(", ")
                    ));
                }
                matched
            }
            None => sections,
        };

        let mut jobs = Vec::new();
        for sec in selected {
            let command_text = section::extract(text, sec.start_line, sec.end_line)
                .ok_or_else(|| anyhow!("no command found in section '{}'", sec.title))?;
            jobs.push((Some(sec.title), command_text));
        }
        Ok(jobs)
    }

    fn destination_identity(&self) -> String {
        let path = response_path(&self.file);
        if self.no_save {
            format!("untitled:{}", path.display())
        } else {
            path.display().to_string()
        }
    }
}

/// `.rq` request files pair with `.res` response files, which keeps
/// the two adjacent in a sorted listing. Any other extension is
/// replaced the same way.
pub fn response_path(request: &Path) -> PathBuf {
    request.with_extension("res")
}

/// One response document for the whole run. Section titles are kept as
/// headings so the output mirrors the input's structure.
fn render_document(results: &[(Option<String>, String)]) -> String {
    let mut out = String::new();
    for (title, rendered) in results {
        if let Some(title) = title {
            out.push_str(&format!("## {title}\n\n"));
        }
        out.push_str(rendered);
        if !rendered.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
