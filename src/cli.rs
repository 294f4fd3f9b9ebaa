//! Minimal CLI: sanitize JSON documents against a schema file.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};

use json_sanitize::error::Error;
use json_sanitize::path_de;
use json_sanitize::{sanitize, Report};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate and coerce JSON documents against a shape-mirroring type schema
#[derive(Parser, Debug)]
#[command(name = "json-sanitize", version, about)]
pub struct CommandLineInterface {
    /// more logging; repeat for more (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// sanitize documents and print the resulting trees
    Run(RunOut),
    /// sanitize documents and report where diagnostics were substituted
    Check(CheckOut),
    /// run every job listed in a JSON manifest
    Batch(BatchOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// schema file (JSON) mirroring the shape of the documents
    #[arg(long, short)]
    schema: PathBuf,

    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RunOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// pretty-print the output
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print the report as JSON instead of a coloured summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct BatchOut {
    /// manifest file: {"jobs": [{"data": ..., "schema": ..., "out": ...}]}
    #[arg(long, short)]
    manifest: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Job {
    data: PathBuf,
    schema: PathBuf,
    #[serde(default)]
    out: Option<PathBuf>,
}

/// One parsed input document.
struct Document {
    label: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<(Value, Vec<Document>), Error> {
        let schema: Value = path_de::read_json(&self.schema)?;
        let mut documents = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let label = source_path.to_string_lossy().to_string();
            if self.ndjson {
                let source = std::fs::read_to_string(&source_path).map_err(|source| Error::Read {
                    path: source_path.clone(),
                    source,
                })?;
                for (label, value) in path_de::ndjson_with_path::<Value>(&source, &label)? {
                    documents.push(Document { label, value });
                }
            } else {
                let value = path_de::read_json(&source_path)?;
                documents.push(Document { label, value });
            }
        }
        tracing::info!(documents = documents.len(), schema = %self.schema.display(), "inputs loaded");
        Ok((schema, documents))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<ExitCode> {
        match &self.cmd {
            Command::Run(target) => {
                let (schema, documents) = target.input_settings.load()?;
                let results = sanitize_all(&documents, &schema);
                let output = if results.len() == 1 {
                    results.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
                } else {
                    Value::Object(results.into_iter().collect::<Map<String, Value>>())
                };
                emit(&output, target.out.as_deref(), target.pretty)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Check(target) => {
                let (schema, documents) = target.input_settings.load()?;
                let reports: Vec<(String, Report)> = sanitize_all(&documents, &schema)
                    .into_iter()
                    .map(|(label, result)| (label, Report::of(&result)))
                    .collect();
                let clean = reports.iter().all(|(_, r)| r.is_clean());
                if target.json {
                    let as_json: Map<String, Value> = reports
                        .iter()
                        .map(|(label, r)| Ok((label.clone(), serde_json::to_value(r)?)))
                        .collect::<serde_json::Result<_>>()?;
                    println!("{}", serde_json::to_string_pretty(&as_json)?);
                } else {
                    for (label, report) in &reports {
                        print_report(label, report);
                    }
                }
                Ok(if clean { ExitCode::SUCCESS } else { ExitCode::from(1) })
            }
            Command::Batch(target) => {
                let clean = run_manifest(&target.manifest)?;
                Ok(if clean { ExitCode::SUCCESS } else { ExitCode::from(1) })
            }
        }
    }
}

fn sanitize_all(documents: &[Document], schema: &Value) -> Vec<(String, Value)> {
    documents
        .par_iter()
        .map(|doc| {
            let _span = tracing::debug_span!("document", label = %doc.label).entered();
            (doc.label.clone(), sanitize(&doc.value, schema))
        })
        .collect()
}

/// Returns whether every job came out free of diagnostics.
fn run_manifest(manifest_path: &Path) -> anyhow::Result<bool> {
    let manifest: Manifest = path_de::read_json(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let mut clean = true;
    for (i, job) in manifest.jobs.iter().enumerate() {
        let data: Value = path_de::read_json(&base.join(&job.data))?;
        let schema: Value = path_de::read_json(&base.join(&job.schema))?;
        let result = sanitize(&data, &schema);
        let report = Report::of(&result);
        clean &= report.is_clean();
        tracing::info!(job = i, data = %job.data.display(), diagnostics = report.diagnostics.len(), "job done");
        match job.out.as_ref() {
            Some(out) => emit(&result, Some(base.join(out).as_path()), true)?,
            None => print_report(&job.data.to_string_lossy(), &report),
        }
    }
    Ok(clean)
}

fn emit(value: &Value, out: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let src = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &src).map_err(|source| Error::Write {
                path: out.to_path_buf(),
                source,
            })?;
        }
        None => println!("{src}"),
    }
    Ok(())
}

fn print_report(label: &str, report: &Report) {
    if report.is_clean() {
        println!("{} {label} ({} leaves)", "ok".green().bold(), report.leaves);
        return;
    }
    println!(
        "{} {label} ({} of {} leaves)",
        "diagnostics".red().bold(),
        report.diagnostics.len(),
        report.leaves
    );
    for finding in &report.diagnostics {
        println!("  {} {}", finding.path.as_str().yellow(), finding.message);
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                return Err(Error::NoMatch(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "b/c.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("b/c.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        assert!(matches!(resolve_file_path_patterns([pattern]), Err(Error::NoMatch(_))));
    }

    #[test]
    fn manifest_runs_jobs_relative_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), r#"{"p": "8(999)333-22-55", "n": "12"}"#).unwrap();
        std::fs::write(dir.path().join("schema.json"), r#"{"p": "phone", "n": "integer"}"#).unwrap();
        std::fs::write(
            dir.path().join("jobs.json"),
            r#"{"jobs": [{"data": "data.json", "schema": "schema.json", "out": "out/result.json"}]}"#,
        )
        .unwrap();

        let clean = run_manifest(&dir.path().join("jobs.json")).unwrap();
        assert!(clean);

        let written: Value = path_de::read_json(&dir.path().join("out/result.json")).unwrap();
        assert_eq!(written, serde_json::json!({"p": "79993332255", "n": 12}));
    }

    #[test]
    fn manifest_shape_errors_name_the_field() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jobs.json"), r#"{"jobs": [{"data": "d.json"}]}"#).unwrap();
        let err = run_manifest(&dir.path().join("jobs.json")).unwrap_err();
        assert!(err.to_string().contains("jobs.json"), "{err}");
    }
}
