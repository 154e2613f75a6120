//! Command-line interface for codeprobe.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{self, AnalyzerConfig, ConfigFile};
use crate::detect::SignatureCatalogue;
use crate::engine::{AnalysisResult, Analyzer, SourceUnit};
use crate::parser::Language;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Path that reads source text from standard input.
const STDIN_PATH: &str = "-";

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["__pycache__", "venv", "node_modules", "site-packages"];

/// Static code quality analysis - complexity, issues, security signatures.
#[derive(Parser)]
#[command(name = "codeprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze source files and print a report
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// Write a default codeprobe.yaml
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze ("-" reads standard input)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format: text, pretty, or json
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language of standard input or of files without a known extension
    #[arg(short, long, default_value = "python")]
    pub language: String,

    /// Override the oversized-function line limit
    #[arg(long, allow_negative_numbers = true)]
    pub max_function_lines: Option<i64>,

    /// Override the long-line character limit
    #[arg(long, allow_negative_numbers = true)]
    pub max_line_length: Option<i64>,

    /// Exit non-zero if any file scores below this maintainability index
    #[arg(long)]
    pub fail_under: Option<f64>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codeprobe.yaml")]
    pub output: PathBuf,
}

/// Load the config file (explicit or discovered) and apply CLI overrides.
fn load_settings(args: &AnalyzeArgs) -> anyhow::Result<(AnalyzerConfig, SignatureCatalogue)> {
    let file = match &args.config {
        Some(path) => ConfigFile::parse_file(path)?,
        None => match config::discover(Path::new(".")) {
            Some(path) => {
                debug!(path = %path.display(), "using discovered config");
                ConfigFile::parse_file(&path)?
            }
            None => ConfigFile::default(),
        },
    };

    let base = file.analyzer_config()?;
    let analyzer_config = AnalyzerConfig::new(
        args.max_function_lines
            .unwrap_or(base.max_function_lines() as i64),
        args.max_line_length
            .unwrap_or(base.max_line_length() as i64),
    )?;

    Ok((analyzer_config, file.signature_catalogue()?))
}

/// Collect analyzable files under `root`.
pub fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if Language::from_extension(ext).is_some() {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Expand the command-line paths into individual inputs.
fn collect_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.as_os_str() == STDIN_PATH {
            inputs.push(path.clone());
            continue;
        }
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot access path {:?}", path))?;
        if metadata.is_dir() {
            inputs.extend(collect_files(path)?);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn language_for(path: &Path, fallback: Language) -> Language {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
        .unwrap_or(fallback)
}

/// Analyze every input in parallel, keeping input order.
fn analyze_all(
    analyzer: &Analyzer,
    inputs: &[PathBuf],
    fallback: Language,
) -> anyhow::Result<Vec<(String, AnalysisResult)>> {
    inputs
        .par_iter()
        .map(|path| {
            let text = read_input(path)?;
            let language = language_for(path, fallback);
            let result = analyzer.analyze(&SourceUnit::new(&text, language));
            Ok((path.to_string_lossy().to_string(), result))
        })
        .collect()
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if args.format != "text" && args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'text', 'pretty', or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let fallback = match args.language.parse::<Language>() {
        Ok(lang) => lang,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (analyzer_config, catalogue) = match load_settings(args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: invalid configuration: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let inputs = collect_inputs(&args.paths)?;
    if inputs.is_empty() {
        warn!("no files to analyze");
        return Ok(EXIT_SUCCESS);
    }

    let analyzer = Analyzer::new(analyzer_config).with_catalogue(catalogue);
    let results = analyze_all(&analyzer, &inputs, fallback)?;
    info!(files = results.len(), "analysis complete");

    match args.format.as_str() {
        "json" => {
            let json = report::render_json(results.iter().map(|(p, r)| (p.as_str(), r)))?;
            println!("{}", json);
        }
        "pretty" => {
            for (path, result) in &results {
                report::write_pretty(path, result);
            }
        }
        _ => {
            for (idx, (path, result)) in results.iter().enumerate() {
                if results.len() > 1 {
                    if idx > 0 {
                        println!();
                    }
                    println!("==> {} <==", path);
                }
                println!("{}", result.render());
            }
        }
    }

    Ok(exit_code(&results, args.fail_under))
}

/// EXIT_FAILED when any result scores below `fail_under`.
fn exit_code(results: &[(String, AnalysisResult)], fail_under: Option<f64>) -> i32 {
    match fail_under {
        Some(threshold)
            if results
                .iter()
                .any(|(_, r)| r.maintainability_index < threshold) =>
        {
            EXIT_FAILED
        }
        _ => EXIT_SUCCESS,
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    std::fs::write(&args.output, config::DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune thresholds", args.output.display());
    println!(
        "  2. Run: codeprobe analyze . --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn analyze_args(paths: Vec<PathBuf>) -> AnalyzeArgs {
        AnalyzeArgs {
            paths,
            format: "json".to_string(),
            config: None,
            language: "python".to_string(),
            max_function_lines: None,
            max_line_length: None,
            fail_under: None,
        }
    }

    #[test]
    fn test_collect_files_skips_hidden_and_cache_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("pkg")).unwrap();
        std::fs::create_dir_all(root.join("__pycache__")).unwrap();
        std::fs::create_dir_all(root.join(".venv")).unwrap();
        std::fs::write(root.join("pkg/a.py"), "x = 1\n").unwrap();
        std::fs::write(root.join("pkg/b.pyi"), "x: int\n").unwrap();
        std::fs::write(root.join("pkg/notes.txt"), "hello\n").unwrap();
        std::fs::write(root.join("__pycache__/c.py"), "x = 1\n").unwrap();
        std::fs::write(root.join(".venv/d.py"), "x = 1\n").unwrap();

        let files = collect_files(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.py", "b.pyi"]);
    }

    #[test]
    fn test_language_fallback() {
        assert_eq!(
            language_for(Path::new("script"), Language::Python),
            Language::Python
        );
        assert_eq!(
            language_for(Path::new("mod.py"), Language::Python),
            Language::Python
        );
    }

    #[test]
    fn test_run_analyze_fail_under() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("risky.py");
        std::fs::write(
            &file,
            "def run(cmd):\n    try:\n        return eval(cmd)\n    except:\n        return 1000\n",
        )
        .unwrap();

        let mut args = analyze_args(vec![file.clone()]);
        assert_eq!(run_analyze(&args).unwrap(), EXIT_SUCCESS);

        args.fail_under = Some(99.0);
        assert_eq!(run_analyze(&args).unwrap(), EXIT_FAILED);
    }

    #[test]
    fn test_run_analyze_rejects_bad_settings() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.py");
        std::fs::write(&file, "x = 1\n").unwrap();

        let mut args = analyze_args(vec![file.clone()]);
        args.max_function_lines = Some(-3);
        assert_eq!(run_analyze(&args).unwrap(), EXIT_ERROR);

        let mut args = analyze_args(vec![file]);
        args.format = "xml".to_string();
        assert_eq!(run_analyze(&args).unwrap(), EXIT_ERROR);
    }

    #[test]
    fn test_run_init_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("conf/codeprobe.yaml");
        let args = InitArgs {
            output: output.clone(),
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let file = ConfigFile::parse_file(&output).unwrap();
        assert_eq!(file.analyzer_config().unwrap(), AnalyzerConfig::default());

        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }
}
