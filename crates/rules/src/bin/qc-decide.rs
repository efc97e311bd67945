//! qc-decide — resolve quality-control decisions from the command line.
//!
//! Loads rule files (paths or glob patterns) and prints INCLUDE / EXCLUDE for
//! either a single observation given as `--tag key=value` pairs, or for every
//! line of a JSON-lines query file (`--queries FILE`, `-` for stdin).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use qcgate_core::config::{load_dotenv, Config};
use qcgate_rules::{Decision, DecisionResolver, RuleDatabase, TagMap};

// ── CLI ─────────────────────────────────────────────────────────────

/// Decide whether observations are included in or excluded from analysis.
#[derive(Parser, Debug)]
#[command(name = "qc-decide", version, about)]
struct Cli {
    /// Rule file or glob pattern. Repeatable. Defaults to QC_RULE_FILES.
    #[arg(long = "rules", value_name = "SOURCE")]
    rules: Vec<String>,

    /// Observation tag as key=value. Repeatable.
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    tags: Vec<(String, String)>,

    /// JSON-lines file with one tag object per line, or `-` for stdin.
    #[arg(long, value_name = "FILE", conflicts_with = "tags")]
    queries: Option<PathBuf>,

    /// Print one JSON object per observation instead of a bare decision.
    #[arg(long)]
    json: bool,
}

fn parse_tag(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

// ── Output ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Verdict<'a> {
    tags: &'a TagMap,
    decision: Decision,
}

fn write_verdict(out: &mut impl Write, tags: &TagMap, decision: Decision, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &Verdict { tags, decision })?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", decision)?;
    }
    Ok(())
}

fn read_queries(path: &PathBuf) -> anyhow::Result<Vec<TagMap>> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut queries = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let tags: TagMap = serde_json::from_str(&line)
            .with_context(|| format!("invalid query on line {}", n + 1))?;
        queries.push(tags);
    }
    Ok(queries)
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    let cli = Cli::parse();
    config.log_summary();

    let sources = if cli.rules.is_empty() {
        config.rules.sources.clone()
    } else {
        cli.rules
    };
    if sources.is_empty() {
        warn!("no rule sources given, every observation will be included");
    }

    let database = RuleDatabase::load(&sources).context("failed to load quality rating rules")?;
    let resolver = DecisionResolver::new(database);

    let queries = match &cli.queries {
        Some(path) => read_queries(path)?,
        None if cli.tags.is_empty() => bail!("nothing to resolve: pass --tag KEY=VALUE or --queries FILE"),
        None => vec![cli.tags.into_iter().collect()],
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut excluded = 0usize;
    for tags in &queries {
        let decision = resolver.resolve(tags);
        if decision == Decision::Exclude {
            excluded += 1;
        }
        write_verdict(&mut out, tags, decision, cli.json)?;
    }

    info!(observations = queries.len(), excluded, "resolved quality control decisions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_splits_on_first_equals() {
        assert_eq!(parse_tag("desc=a=b").unwrap(), ("desc".to_string(), "a=b".to_string()));
        assert_eq!(parse_tag("sub=").unwrap(), ("sub".to_string(), String::new()));
        assert!(parse_tag("=01").is_err());
        assert!(parse_tag("sub").is_err());
    }

    #[test]
    fn json_verdict_line() {
        let tags: TagMap = [("sub", "01")].into_iter().collect();
        let mut buf = Vec::new();
        write_verdict(&mut buf, &tags, Decision::Exclude, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"tags\":{\"sub\":\"01\"},\"decision\":\"exclude\"}\n");
    }

    #[test]
    fn plain_verdict_line() {
        let mut buf = Vec::new();
        write_verdict(&mut buf, &TagMap::new(), Decision::Include, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "INCLUDE\n");
    }
}
