//! Typograph CLI - typography for text, markup and document XML

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glob::glob;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use typograph::{Config, Profile, Rule, Typographer};

#[derive(Parser)]
#[command(
    name = "typograph",
    version,
    about = "Russian and English typography",
    long_about = "Rewrites quotes, dashes, spaces and symbols in plain text, HTML fragments \
                  and extracted word/document.xml parts."
)]
struct Cli {
    /// Files to rewrite (supports globs, - for stdin)
    files: Vec<String>,

    /// Language profile
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,

    /// How to read the input
    #[arg(short, long, value_enum, default_value = "auto")]
    mode: Mode,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write to specific file (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write results back to files
    #[arg(short, long)]
    write: bool,

    /// Check whether files would change (exit 1 if so)
    #[arg(long)]
    check: bool,

    /// Print per-rule timing statistics
    #[arg(long)]
    timing: bool,

    /// Rewrite text detected as verse with the reduced verse rules
    #[arg(long)]
    verse: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Cache entries per profile (0 disables)
    #[arg(long)]
    cache_size: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active rule table in application order
    Rules {
        /// Profile to list (defaults to the configured one)
        #[arg(short, long, value_enum)]
        profile: Option<ProfileArg>,
    },
    /// Show detailed information about a rule
    Explain {
        /// Rule name to explain
        rule: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    #[value(alias = "ru")]
    Primary,
    #[value(alias = "en")]
    Secondary,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Primary => Profile::Primary,
            ProfileArg::Secondary => Profile::Secondary,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Mode {
    /// Pick by extension: .html/.htm/.xhtml markup, .xml document, else text
    Auto,
    Text,
    Markup,
    Document,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = build_config(&cli)?;
    let typographer = Typographer::new(config).context("Failed to build rule tables")?;
    let profile = typographer.config().profile;

    match &cli.command {
        Some(Commands::Rules { profile: p }) => {
            list_rules(&typographer, p.map(Profile::from).unwrap_or(profile));
            return Ok(true);
        }
        Some(Commands::Explain { rule }) => {
            explain_rule(&typographer, rule)?;
            return Ok(true);
        }
        None => {}
    }

    let files = if cli.files.is_empty() {
        vec!["-".to_string()]
    } else {
        expand_files(&cli.files)?
    };

    if cli.output.is_some() && files.len() > 1 {
        bail!("--output requires a single input");
    }

    if cli.verbose {
        eprintln!("Processing {} file(s) as {}", files.len(), profile);
    }

    // Track if any files would change (for --check mode)
    let mut changed_any = false;

    for file in &files {
        let changed = if file == "-" {
            process_stdin(&typographer, profile, &cli)?
        } else {
            process_file(&typographer, profile, Path::new(file), &cli)
                .with_context(|| format!("Failed to process {}", file))?
        };
        changed_any |= changed;
    }

    if cli.timing {
        eprintln!("{}", typographer.timings().format_timings());
    }

    if cli.check && changed_any {
        eprintln!("{}: some files would change", "check".yellow().bold());
        return Ok(false);
    }

    Ok(true)
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(
        cli.profile.map(Profile::from),
        cli.timing.then_some(true),
        cli.verse.then_some(true),
        cli.cache_size,
        cli.disable.clone(),
    );

    Ok(config)
}

fn expand_files(patterns: &[String]) -> anyhow::Result<Vec<String>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern == "-" {
            files.push("-".to_string());
        } else if pattern.contains('*') || pattern.contains('?') {
            for entry in glob(pattern)? {
                files.push(entry?.to_string_lossy().to_string());
            }
        } else {
            files.push(pattern.clone());
        }
    }

    Ok(files)
}

fn resolve_mode(mode: Mode, path: Option<&Path>) -> Mode {
    if mode != Mode::Auto {
        return mode;
    }
    let ext = path
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html" | "htm" | "xhtml") => Mode::Markup,
        Some("xml") => Mode::Document,
        _ => Mode::Text,
    }
}

fn rewrite(
    typographer: &Typographer,
    profile: Profile,
    mode: Mode,
    source: &str,
) -> anyhow::Result<String> {
    // Empty input passes through rather than failing the whole batch
    if source.is_empty() {
        return Ok(String::new());
    }

    let output = match mode {
        Mode::Markup => typographer.rewrite_markup(source, profile)?,
        Mode::Document => typographer.rewrite_document_xml(source, profile)?,
        Mode::Text | Mode::Auto => typographer.rewrite_text(source, profile)?,
    };
    Ok(output)
}

fn process_stdin(typographer: &Typographer, profile: Profile, cli: &Cli) -> anyhow::Result<bool> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read stdin")?;

    let mode = resolve_mode(cli.mode, None);
    let rewritten = rewrite(typographer, profile, mode, &source)?;
    let changed = source != rewritten;

    if cli.check {
        Ok(changed)
    } else if let Some(ref output_path) = cli.output {
        fs::write(output_path, &rewritten)?;
        if cli.verbose {
            eprintln!("Wrote to {}", output_path.display());
        }
        Ok(changed)
    } else {
        io::stdout().write_all(rewritten.as_bytes())?;
        Ok(changed)
    }
}

fn process_file(
    typographer: &Typographer,
    profile: Profile,
    path: &Path,
    cli: &Cli,
) -> anyhow::Result<bool> {
    let source = fs::read_to_string(path)?;
    let mode = resolve_mode(cli.mode, Some(path));
    let rewritten = rewrite(typographer, profile, mode, &source)?;

    let changed = source != rewritten;

    if cli.check {
        if changed {
            eprintln!("{}: would change", path.display());
        }
        Ok(changed)
    } else if cli.write {
        if changed {
            fs::write(path, &rewritten)?;
            if cli.verbose {
                eprintln!("{}: rewritten", path.display());
            }
        } else if cli.verbose {
            eprintln!("{}: unchanged", path.display());
        }
        Ok(changed)
    } else if let Some(ref output_path) = cli.output {
        fs::write(output_path, &rewritten)?;
        if cli.verbose {
            eprintln!("Wrote to {}", output_path.display());
        }
        Ok(changed)
    } else {
        io::stdout().write_all(rewritten.as_bytes())?;
        Ok(changed)
    }
}

fn list_rules(typographer: &Typographer, profile: Profile) {
    let rules = typographer.processor(profile).engine().rules();
    println!(
        "{} ({} rules, in application order)",
        profile.to_string().bold(),
        rules.len()
    );
    for rule in rules {
        println!(
            "  {:>7} {} {}",
            rule.priority,
            rule.name.cyan(),
            rule.description
        );
    }
}

fn print_rule(rule: &Rule, profile: Profile) {
    println!("  {}: {}", "Profile".bold(), profile);
    println!("  {}: {}", "Priority".bold(), rule.priority);
    println!("  {}: {}", "Pattern".bold(), rule.pattern.as_str());
    println!("  {}: {}", "Replacement".bold(), rule.replacement);
    if !rule.description.is_empty() {
        println!("  {}: {}", "Description".bold(), rule.description);
    }
}

/// Print a rule's details for every profile that carries it
fn explain_rule(typographer: &Typographer, name: &str) -> anyhow::Result<()> {
    let mut found = false;
    for profile in Profile::ALL {
        if let Some(rule) = typographer.processor(profile).engine().find(name) {
            if !found {
                println!("{}", "Rule Details".bold());
                println!("  {}: {}", "Name".bold(), name.cyan());
            }
            found = true;
            println!();
            print_rule(rule, profile);
        }
    }

    if !found {
        bail!("Rule '{}' not found (use `typograph rules` to list them)", name);
    }
    Ok(())
}
