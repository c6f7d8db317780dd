//! Assembly of the final document from section fragments.

use super::manifest::{default_manifest, ManifestEntry};
use crate::error::{Error, Result};
use crate::report::escape_html;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Document version stamped into builds.
pub const DEFAULT_VERSION: &str = "2025.1.0";

/// File name of the assembled document.
pub const OUTPUT_FILE: &str = "index.html";

/// File name of the build report.
pub const REPORT_FILE: &str = "build-report.json";

const EMBLEM_SRC: &str = "./optimized/bmpoa-emblem.png";

/// Options for building the document.
///
/// Relative directories are resolved against `root`.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root
    pub root: PathBuf,

    /// Directory holding section fragments
    pub sections_dir: PathBuf,

    /// Directory holding the document template
    pub templates_dir: PathBuf,

    /// Template file name inside `templates_dir`
    pub template: String,

    /// Output directory (defaults to `root`)
    pub output_dir: Option<PathBuf>,

    /// Document version
    pub version: String,

    /// Entries in reading order
    pub manifest: Vec<ManifestEntry>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sections_dir: PathBuf::from("src/sections"),
            templates_dir: PathBuf::from("src/templates"),
            template: "document-template.html".to_string(),
            output_dir: None,
            version: DEFAULT_VERSION.to_string(),
            manifest: default_manifest(),
        }
    }
}

impl BuildOptions {
    /// Create build options for a project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the sections directory.
    pub fn with_sections_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sections_dir = dir.into();
        self
    }

    /// Set the templates directory.
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    /// Set the template file name.
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = name.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the document version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace the section manifest.
    pub fn with_manifest(mut self, manifest: Vec<ManifestEntry>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Resolved sections directory.
    pub fn sections_path(&self) -> PathBuf {
        self.root.join(&self.sections_dir)
    }

    /// Resolved templates directory.
    pub fn templates_path(&self) -> PathBuf {
        self.root.join(&self.templates_dir)
    }

    /// Resolved template file.
    pub fn template_path(&self) -> PathBuf {
        self.templates_path().join(&self.template)
    }

    /// Resolved output directory.
    pub fn output_path(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    /// Source directories that trigger a rebuild when watched.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        vec![
            self.sections_path(),
            self.templates_path(),
            self.root.join("src/styles"),
            self.root.join("src/scripts"),
        ]
    }
}

/// Identity of one build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildInfo {
    /// Unique build id, `build-<base36 millis>-<5 chars>`
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Git branch, or `unknown`
    pub branch: String,
    /// Git commit hash, or `unknown`
    pub commit: String,
    pub version: String,
}

impl BuildInfo {
    /// Stamp a new build, reading git metadata from `root`.
    pub fn generate(root: &Path, version: &str) -> Self {
        let timestamp = Utc::now();
        Self {
            id: build_id(timestamp),
            timestamp,
            branch: git(root, &["rev-parse", "--abbrev-ref", "HEAD"]),
            commit: git(root, &["rev-parse", "HEAD"]),
            version: version.to_string(),
        }
    }

    /// First 8 characters of the commit hash.
    pub fn short_commit(&self) -> &str {
        self.commit.get(..8).unwrap_or(&self.commit)
    }

    /// Timestamp as RFC 3339 with millisecond precision.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn build_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    let nanos = u64::from(now.timestamp_subsec_nanos());
    let seed = (millis ^ nanos.rotate_left(17)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let suffix = to_base36(seed % 36u64.pow(5));
    format!("build-{}-{:0>5}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.iter().rev().map(|&b| b as char).collect()
}

fn git(root: &Path, args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Where the content of a manifest entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SectionSource {
    /// A single fragment file
    File { path: String },
    /// The sorted fragments of a section directory
    Directory { files: Vec<String> },
    /// No content found, a placeholder page was generated
    Placeholder,
    /// The entry was skipped
    Missing { reason: String },
}

/// Outcome of assembling one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub title: String,
    #[serde(flatten)]
    pub source: SectionSource,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Path of the assembled document
    pub output: PathBuf,
    /// Path of the build report
    pub report: PathBuf,
    /// Document size in bytes
    pub size: u64,
    pub info: BuildInfo,
    pub sections: Vec<SectionOutcome>,
}

impl BuildOutput {
    /// Number of entries that were skipped or replaced by a placeholder.
    pub fn warning_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| !matches!(s.source, SectionSource::File { .. } | SectionSource::Directory { .. }))
            .count()
    }
}

#[derive(Serialize)]
struct BuildReport<'a> {
    build: &'a BuildInfo,
    timestamp: String,
    status: &'static str,
    sections: &'a [SectionOutcome],
    files: ReportFiles,
    environment: ReportEnvironment,
}

#[derive(Serialize)]
struct ReportFiles {
    output: &'static str,
    size: u64,
    template: String,
}

#[derive(Serialize)]
struct ReportEnvironment {
    tool: String,
    platform: &'static str,
    cwd: String,
}

/// Builds the document from its template and section fragments.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    options: BuildOptions,
    info: BuildInfo,
}

impl DocumentBuilder {
    /// Create a builder, stamping a new build.
    pub fn new(options: BuildOptions) -> Self {
        let info = BuildInfo::generate(&options.root, &options.version);
        Self { options, info }
    }

    /// Use a fixed build identity.
    pub fn with_info(mut self, info: BuildInfo) -> Self {
        self.info = info;
        self
    }

    /// Build options.
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Identity of this build.
    pub fn info(&self) -> &BuildInfo {
        &self.info
    }

    /// Assemble the document and write it with its build report.
    ///
    /// A missing template is fatal. Missing fragments are logged and
    /// skipped; sections without content get a placeholder page.
    pub fn build(&self) -> Result<BuildOutput> {
        log::info!(
            "Starting build {} (branch {}, commit {})",
            self.info.id,
            self.info.branch,
            self.info.short_commit()
        );

        let template = self.load_template()?;
        let (content, sections) = self.build_content();
        let document = render_template(&template, &self.info, &content);

        let out_dir = self.options.output_path();
        fs::create_dir_all(&out_dir)?;
        let output = out_dir.join(OUTPUT_FILE);
        fs::write(&output, &document)?;

        let size = document.len() as u64;
        log::info!(
            "Document built: {} ({} KB)",
            output.display(),
            (size as f64 / 1024.0).round()
        );

        let report = self.write_report(&out_dir, size, &sections)?;

        Ok(BuildOutput {
            output,
            report,
            size,
            info: self.info.clone(),
            sections,
        })
    }

    /// Remove build artifacts. Returns the removed paths.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for artifact in [REPORT_FILE] {
            let path = self.options.output_path().join(artifact);
            if path.exists() {
                fs::remove_file(&path)?;
                log::info!("Removed {}", artifact);
                removed.push(path);
            }
        }
        Ok(removed)
    }

    fn load_template(&self) -> Result<String> {
        let path = self.options.template_path();
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn build_content(&self) -> (String, Vec<SectionOutcome>) {
        let mut parts = Vec::new();
        let mut outcomes = Vec::new();

        for entry in &self.options.manifest {
            let source = match self.build_entry(entry) {
                Ok((html, source)) => {
                    parts.push(html);
                    source
                }
                Err(e) => {
                    log::warn!("Could not load {}: {}", entry.title(), e);
                    SectionSource::Missing {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(SectionOutcome {
                title: entry.title().to_string(),
                source,
            });
        }

        (parts.join("\n\n"), outcomes)
    }

    fn build_entry(&self, entry: &ManifestEntry) -> Result<(String, SectionSource)> {
        let sections = self.options.sections_path();

        let (key, number) = match entry {
            ManifestEntry::File { file, title } => {
                log::debug!("Loading {}", title);
                let path = sections.join(file);
                if !path.is_file() {
                    return Err(Error::SectionNotFound(path));
                }
                let html = fs::read_to_string(&path)?;
                return Ok((html, SectionSource::File { path: file.clone() }));
            }
            ManifestEntry::Section { key, number, .. } => (key, number),
        };

        log::debug!("Building {} (section {})", entry.title(), number);
        let divider = section_divider(entry, "divider");

        let direct = sections.join(format!("{}.html", key));
        if direct.is_file() {
            let html = fs::read_to_string(&direct)?;
            let path = format!("{}.html", key);
            return Ok((format!("{}\n\n{}", divider, html), SectionSource::File { path }));
        }

        let dir = sections.join(key);
        let files = if dir.is_dir() {
            fragment_files(&dir)?
        } else {
            Vec::new()
        };

        if files.is_empty() {
            log::warn!("No content found for section {}, creating placeholder", key);
            return Ok((self.placeholder(entry), SectionSource::Placeholder));
        }

        let mut html = divider;
        html.push_str("\n\n");
        for file in &files {
            html.push_str(&fs::read_to_string(dir.join(file))?);
            html.push('\n');
        }

        let files = files.iter().map(|f| format!("{}/{}", key, f)).collect();
        Ok((html, SectionSource::Directory { files }))
    }

    fn write_report(
        &self,
        out_dir: &Path,
        size: u64,
        sections: &[SectionOutcome],
    ) -> Result<PathBuf> {
        let report = BuildReport {
            build: &self.info,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status: "success",
            sections,
            files: ReportFiles {
                output: OUTPUT_FILE,
                size,
                template: self
                    .options
                    .templates_dir
                    .join(&self.options.template)
                    .display()
                    .to_string(),
            },
            environment: ReportEnvironment {
                tool: format!("pagefit {}", crate::VERSION),
                platform: std::env::consts::OS,
                cwd: std::env::current_dir()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            },
        };

        let json =
            serde_json::to_string_pretty(&report).map_err(|e| Error::Render(e.to_string()))?;
        let path = out_dir.join(REPORT_FILE);
        fs::write(&path, json)?;
        log::info!("Build report generated: {}", path.display());
        Ok(path)
    }

    fn placeholder(&self, entry: &ManifestEntry) -> String {
        let ManifestEntry::Section { key, title, number, .. } = entry else {
            return String::new();
        };
        let title = escape_html(title);
        let key = escape_html(key);

        format!(
            r#"{divider}

<div class="paper-page" data-page-number="{key}-1">
    <div class="page-content">
        <h2>Section {number}: {title}</h2>
        <div class="alert-box">
            <h3>Content Coming Soon</h3>
            <p>This section is currently being modularized. Content will be available in the next build.</p>
            <p><strong>Section:</strong> {key}</p>
            <p><strong>Build:</strong> {build}</p>
        </div>
    </div>
</div>
"#,
            divider = section_divider(entry, "placeholder"),
            key = key,
            number = escape_html(number),
            title = title,
            build = escape_html(&self.info.id),
        )
    }
}

/// HTML fragment files of a section directory, sorted by name.
fn fragment_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Divider page introducing a section.
fn section_divider(entry: &ManifestEntry, page_number: &str) -> String {
    let (title, number) = match entry {
        ManifestEntry::Section { title, number, .. } => (title.as_str(), number.as_str()),
        ManifestEntry::File { title, .. } => (title.as_str(), ""),
    };
    let label = if page_number == "divider" {
        "Section Divider"
    } else {
        "Placeholder"
    };

    format!(
        r#"
<!-- Section {number}: {title} - {label} -->
<div class="paper-page section-divider" data-page-number="{page_number}">
    <div class="section-divider-content">
        <div class="section-number">{number}</div>
        <div class="section-title">{upper}</div>
        <div class="section-decoration">
            <div class="section-line"></div>
            <div class="section-emblem">
                <img src="{emblem}" alt="BMPOA Emblem" class="emblem-image">
            </div>
            <div class="section-line"></div>
        </div>
        <div class="section-subtitle">{subtitle}</div>
    </div>
</div>"#,
        number = escape_html(number),
        title = escape_html(title),
        label = label,
        page_number = page_number,
        upper = escape_html(&title.to_uppercase()),
        emblem = EMBLEM_SRC,
        subtitle = escape_html(entry.subtitle().unwrap_or_default()),
    )
}

/// Substitute every build placeholder in the template.
///
/// `{{DOCUMENT_CONTENT}}` is replaced last so fragment text is never
/// scanned for placeholders.
pub fn render_template(template: &str, info: &BuildInfo, content: &str) -> String {
    template
        .replace("{{BUILD_ID}}", &info.id)
        .replace("{{COMMIT_HASH}}", &info.commit)
        .replace("{{BRANCH_NAME}}", &info.branch)
        .replace("{{BUILD_TIMESTAMP}}", &info.timestamp_string())
        .replace("{{DOCUMENT_CONTENT}}", content)
}
