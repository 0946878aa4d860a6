//! Minimal CLI: build a checker from flags → check JSON/NDJSON documents
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, Args, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use crate::checker::{is_array, is_object, Checker, Shape, Spec};
use crate::scalar;
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against composable runtime type checkers
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// check every document against a checker built from flags
    Check(CheckOut),
    /// print which scalar kinds accept each document
    Kinds(KindsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// strings that parse as dates (RFC 3339 or YYYY-MM-DD) become dates
    #[arg(long, default_value_t = false)]
    parse_dates: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// accepted scalar kind; repeat for a union (e.g. --accept number --accept string)
    #[arg(long, value_enum, conflicts_with = "field", required_unless_present = "field")]
    accept: Vec<Kind>,

    /// required record field as NAME=KIND[|KIND...] (e.g. --field id=number|string)
    #[arg(long)]
    field: Vec<FieldArg>,

    /// the document must be an array whose every element passes
    #[arg(long, default_value_t = false)]
    each: bool,

    /// output .json report file (stdout lines if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// only print the summary
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct KindsOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Boolean,
    Number,
    String,
    Date,
    Null,
    Undefined,
}

/// `NAME=KIND[|KIND...]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArg {
    pub name: String,
    pub kinds: Vec<Kind>,
}

/// One input document after pointer/jq selection.
#[derive(Debug, Clone)]
struct Document {
    source: String,
    index: usize,
    value: Value,
}

#[derive(Debug, Serialize)]
struct Outcome {
    source: String,
    index: usize,
    pass: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// CHECKER CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    const ALL: [Kind; 6] = [
        Kind::Boolean,
        Kind::Number,
        Kind::String,
        Kind::Date,
        Kind::Null,
        Kind::Undefined,
    ];

    fn predicate(self) -> fn(&Value) -> bool {
        match self {
            Kind::Boolean => scalar::is_boolean,
            Kind::Number => scalar::is_number,
            Kind::String => scalar::is_string,
            Kind::Date => scalar::is_date,
            Kind::Null => scalar::is_null,
            Kind::Undefined => scalar::is_undefined,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
        }
    }
}

fn union_of(kinds: &[Kind]) -> Result<Spec> {
    Spec::try_any_of(kinds.iter().map(|kind| kind.predicate())).map_err(Into::into)
}

impl FromStr for FieldArg {
    type Err = String;
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let (name, kinds) = src
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=KIND[|KIND...], got `{src}`"))?;
        if name.is_empty() {
            return Err(format!("empty field name in `{src}`"));
        }
        let kinds = kinds
            .split('|')
            .map(|k| <Kind as ValueEnum>::from_str(k.trim(), true))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FieldArg { name: name.to_owned(), kinds })
    }
}

impl CheckOut {
    fn build_checker(&self) -> Result<Checker> {
        let base = if self.field.is_empty() {
            union_of(&self.accept)?.into_checker()
        } else {
            let mut fields = Vec::with_capacity(self.field.len());
            for field in &self.field {
                let spec = union_of(&field.kinds)
                    .with_context(|| format!("field `{}`", field.name))?;
                fields.push((field.name.clone(), spec));
            }
            is_object(Shape::try_from_fields(fields)?)
        };
        Ok(if self.each { is_array(base) } else { base })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let json_values = if self.ndjson {
                source
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(serde_json::from_str::<serde_json::Value>)
                    .collect::<Result<Vec<_>, _>>()
            } else {
                serde_json::from_str::<serde_json::Value>(&source).map(|x| vec![x])
            };
            let json_values = json_values
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            let mut index = 0;
            for json_value in json_values {
                for value in self.select(json_value, &source_path_str)? {
                    out.push(Document { source: source_path_str.clone(), index, value });
                    index += 1;
                }
            }
        }
        Ok(out)
    }

    /// Apply `--json-pointer` then `--jq-expr`. A pointer that selects
    /// nothing yields one `Undefined` document, like reading an absent field.
    fn select(&self, json_value: serde_json::Value, source_path_str: &str) -> Result<Vec<Value>> {
        let json_value = match self.json_pointer.as_ref() {
            None => json_value,
            Some(pointer) => match json_value.pointer(pointer) {
                Some(x) => x.clone(),
                None => {
                    eprintln!("⚠️ {source_path_str}: JSON pointer {pointer} selects nothing; checking as undefined");
                    return Ok(vec![Value::Undefined]);
                }
            },
        };
        let selected = match self.jq_expr.as_ref() {
            None => vec![json_value],
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                format!("failed to apply jq expression to source file ({source_path_str})")
            })?,
        };
        Ok(selected.into_iter().map(|x| self.lift(x)).collect())
    }

    fn lift(&self, json_value: serde_json::Value) -> Value {
        if self.parse_dates {
            Value::from_json_parsing_dates(json_value)
        } else {
            Value::from(json_value)
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(true)
                }

                // 1) build checker once
                let checker = target.build_checker()?;

                // 2) load & check in parallel; collect keeps input order
                let documents = target.input_settings.load_documents()?;
                let outcomes: Vec<Outcome> = documents
                    .into_par_iter()
                    .map(|doc| Outcome {
                        pass: checker.check(&doc.value),
                        source: doc.source,
                        index: doc.index,
                    })
                    .collect();
                let failed = outcomes.iter().filter(|o| !o.pass).count();

                // 3) report
                if let Some(out) = target.out.as_ref() {
                    let report_src = serde_json::to_string_pretty(&outcomes)?;
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &report_src)
                        .with_context(|| format!("failed to write report ({})", out.display()))?;
                } else if !target.quiet {
                    for outcome in &outcomes {
                        let mark = if outcome.pass { "pass".green() } else { "fail".red() };
                        println!("{mark} {}#{}", outcome.source, outcome.index);
                    }
                }
                let summary = format!("{} checked, {} failed", outcomes.len(), failed);
                if failed == 0 {
                    eprintln!("✅ {}", summary.green());
                } else {
                    eprintln!("❌ {}", summary.red());
                }
                Ok(failed == 0)
            }
            Command::Kinds(target) => {
                let documents = target.input_settings.load_documents()?;
                for doc in &documents {
                    let kinds = accepted_kinds(&doc.value);
                    let kinds = if kinds.is_empty() {
                        doc.value.kind().dimmed().to_string()
                    } else {
                        kinds.join("|")
                    };
                    println!("{}#{}\t{kinds}", doc.source, doc.index);
                }
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Labels of the scalar kinds whose predicate accepts `value`.
fn accepted_kinds(value: &Value) -> Vec<&'static str> {
    Kind::ALL
        .iter()
        .filter(|kind| (kind.predicate())(value))
        .map(|kind| kind.label())
        .collect()
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
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
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
