//! pagefit CLI - page overflow analysis, document build and print-rule validation

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagefit::build::{
    BuildOptions, BuildOutput, DocumentBuilder, SectionSource, SourceWatcher,
    DEFAULT_POLL_INTERVAL,
};
use pagefit::report::{self, AnalysisReport};
use pagefit::{validate_file, Analyzer, AnalyzerOptions, JsonFormat, LayoutSnapshot, PageSelection};

#[derive(Parser)]
#[command(name = "pagefit")]
#[command(version)]
#[command(about = "Page overflow analysis for paginated HTML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a layout snapshot for page overflow
    Analyze {
        /// Layout snapshot (JSON)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Analyzer configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Maximum page height in px
        #[arg(long, value_name = "PX")]
        max_height: Option<f32>,

        /// Utilization ratio above which a page is a warning
        #[arg(long, value_name = "RATIO")]
        warning_threshold: Option<f32>,

        /// Apply fixes and re-analyze
        #[arg(long)]
        fix: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the fixed snapshot to this file
        #[arg(long, value_name = "FILE")]
        write_snapshot: Option<PathBuf>,

        /// Exit with an error if any page still overflows
        #[arg(long)]
        strict: bool,

        /// Re-analyze whenever the snapshot changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Assemble section fragments into index.html
    Build {
        /// Project root
        #[arg(long, value_name = "DIR", default_value = ".")]
        root: PathBuf,

        /// Output directory (defaults to the project root)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Watch for changes and auto-rebuild
        #[arg(short, long)]
        watch: bool,

        /// Clean build artifacts
        #[arg(short, long)]
        clean: bool,
    },

    /// Validate a built document against the US Letter print rules
    Validate {
        /// Built HTML or CSS file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary
    Text,
    /// JSON report
    Json,
    /// Standalone HTML page
    Html,
}

/// Arguments of the analyze command.
struct AnalyzeArgs {
    snapshot: PathBuf,
    config: Option<PathBuf>,
    max_height: Option<f32>,
    warning_threshold: Option<f32>,
    fix: bool,
    pages: Option<String>,
    format: ReportFormat,
    compact: bool,
    output: Option<PathBuf>,
    write_snapshot: Option<PathBuf>,
    strict: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            snapshot,
            config,
            max_height,
            warning_threshold,
            fix,
            pages,
            format,
            compact,
            output,
            write_snapshot,
            strict,
            watch,
        } => {
            let args = AnalyzeArgs {
                snapshot,
                config,
                max_height,
                warning_threshold,
                fix,
                pages,
                format,
                compact,
                output,
                write_snapshot,
                strict,
            };
            if watch {
                cmd_analyze_watch(&args)
            } else {
                cmd_analyze(&args)
            }
        }
        Commands::Build {
            root,
            output,
            watch,
            clean,
        } => cmd_build(&root, output.as_deref(), watch, clean),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn analyzer_options(args: &AnalyzeArgs) -> Result<AnalyzerOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.config {
        Some(path) => AnalyzerOptions::from_path(path)?,
        None => AnalyzerOptions::new(),
    };

    if let Some(px) = args.max_height {
        options = options.with_max_page_height(px);
    }
    if let Some(ratio) = args.warning_threshold {
        options = options.with_warning_threshold(ratio);
    }
    if args.fix {
        options = options.with_auto_fix(true);
    }
    if let Some(p) = &args.pages {
        options = options.with_pages(PageSelection::parse(p)?);
    }

    Ok(options)
}

fn cmd_analyze(args: &AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = analyzer_options(args)?;
    let mut analyzer = Analyzer::new(options)?;
    let mut snapshot = LayoutSnapshot::from_path(&args.snapshot)?;
    log::debug!("Loaded snapshot {}", args.snapshot.display());

    let outcome = analyzer.run(&mut snapshot);
    let report = AnalysisReport::new(outcome.latest(), outcome.fixes.as_ref());

    let rendered = match args.format {
        ReportFormat::Text => report::to_text(&report),
        ReportFormat::Json => {
            let format = if args.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            report::to_json(&report, format)?
        }
        ReportFormat::Html => report::to_html(&report),
    };

    if let Some(path) = &args.output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    if let Some(path) = &args.write_snapshot {
        fs::write(path, snapshot.to_json()?)?;
        println!("{} {}", "Snapshot saved to".green(), path.display());
    }

    if args.output.is_some() || args.format != ReportFormat::Text {
        print_summary(&report);
    }

    if args.strict && report.summary.overflow_pages > 0 {
        return Err(format!("{} pages overflow", report.summary.overflow_pages).into());
    }

    Ok(())
}

fn cmd_analyze_watch(args: &AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Reject bad options before entering the loop.
    Analyzer::new(analyzer_options(args)?)?;

    if let Err(e) = cmd_analyze(args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
    }

    println!(
        "{} {} {}",
        "Watching".cyan(),
        args.snapshot.display(),
        "for changes... Press Ctrl+C to stop".dimmed()
    );
    let mut watcher = SourceWatcher::new(vec![args.snapshot.clone()]);
    watcher.run(DEFAULT_POLL_INTERVAL, || {
        if let Err(e) = cmd_analyze(args) {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
    })
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    let overflow = format!("{} overflow", s.overflow_pages);
    let warning = format!("{} warning", s.warning_pages);
    eprintln!(
        "{} {} pages: {}, {}, {} ok",
        "Analyzed".cyan().bold(),
        s.total_pages,
        if s.overflow_pages > 0 {
            overflow.red()
        } else {
            overflow.normal()
        },
        if s.warning_pages > 0 {
            warning.yellow()
        } else {
            warning.normal()
        },
        s.ok_pages
    );
    if s.fixes_applied > 0 || s.fixes_failed > 0 {
        eprintln!(
            "{} {} fixes applied, {} pages failed",
            "Fixes:".cyan().bold(),
            s.fixes_applied,
            s.fixes_failed
        );
    }
}

fn cmd_build(
    root: &Path,
    output: Option<&Path>,
    watch: bool,
    clean: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = BuildOptions::new(root);
    if let Some(dir) = output {
        options = options.with_output_dir(dir);
    }

    if clean {
        println!("{}", "Cleaning build artifacts...".cyan());
        let removed = DocumentBuilder::new(options).clean()?;
        for path in &removed {
            println!("  {} {}", "Removed".green(), path.display());
        }
        if removed.is_empty() {
            println!("  {}", "Nothing to clean".dimmed());
        }
        return Ok(());
    }

    let output = build_once(&options)?;
    print_build(&output);

    if !watch {
        return Ok(());
    }

    println!("{}", "Watching for changes... Press Ctrl+C to stop".cyan());
    let mut watcher = SourceWatcher::new(options.watch_paths());
    watcher.run(DEFAULT_POLL_INTERVAL, || match build_once(&options) {
        Ok(output) => {
            print_build(&output);
            println!("{}", "Auto-rebuild completed".green());
        }
        Err(e) => eprintln!("{}: {}", "Auto-rebuild failed".red().bold(), e),
    })
}

fn build_once(options: &BuildOptions) -> Result<BuildOutput, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message("Building document...");

    log::debug!("Building from {}", options.root.display());
    let result = DocumentBuilder::new(options.clone()).build();

    pb.finish_and_clear();
    result.map_err(|e| format!("Build failed: {}", e).into())
}

fn print_build(output: &BuildOutput) {
    println!(
        "{} {} ({} KB)",
        "Document built:".green().bold(),
        output.output.display(),
        (output.size as f64 / 1024.0).round()
    );
    println!(
        "  {} {} ({} @ {})",
        "├─".dimmed(),
        output.info.id,
        output.info.branch,
        output.info.short_commit()
    );
    for section in &output.sections {
        let status = match &section.source {
            SectionSource::File { .. } | SectionSource::Directory { .. } => "ok".green(),
            SectionSource::Placeholder => "placeholder".yellow(),
            SectionSource::Missing { .. } => "missing".yellow(),
        };
        println!("  {} {} [{}]", "├─".dimmed(), section.title, status);
    }
    println!("  {} {}", "└─".dimmed(), output.report.display());
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let report = validate_file(input);

    println!("{}", "US Letter Pagination Validation Report".cyan().bold());
    println!("{}", "=".repeat(50).dimmed());

    if !report.warnings.is_empty() {
        println!("\n{}", "WARNINGS:".yellow().bold());
        for warning in &report.warnings {
            println!("   {}", warning);
        }
    }

    if !report.is_valid() {
        println!("\n{}", "CRITICAL ERRORS:".red().bold());
        for error in &report.errors {
            println!("   {}", error);
        }
        println!(
            "\n{}",
            "BUILD/COMMIT BLOCKED - Fix pagination violations above".red()
        );
        return Err(format!("{} pagination violations", report.errors.len()).into());
    }

    println!("\n{}", "Pagination validation passed".green().bold());
    println!("Document conforms to US Letter requirements");
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pagefit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page overflow analysis for paginated HTML documents");
    println!();
    println!("Library: pagefit {}", pagefit::VERSION.dimmed());
    println!("License: MIT");
}
