//! Document assembly.
//!
//! The guide is authored as HTML fragments under `src/sections` and merged
//! into a single `index.html` through `src/templates/document-template.html`.
//!
//! ```no_run
//! use pagefit::build::{BuildOptions, DocumentBuilder};
//!
//! let builder = DocumentBuilder::new(BuildOptions::new("."));
//! let output = builder.build()?;
//! println!("{} ({} bytes)", output.output.display(), output.size);
//! # Ok::<(), pagefit::Error>(())
//! ```

mod builder;
mod manifest;
mod watch;

pub use builder::{
    render_template, BuildInfo, BuildOptions, BuildOutput, DocumentBuilder, SectionOutcome,
    SectionSource, DEFAULT_VERSION, OUTPUT_FILE, REPORT_FILE,
};
pub use manifest::{default_manifest, default_subtitle, ManifestEntry, DEFAULT_SUBTITLE};
pub use watch::{SourceWatcher, DEFAULT_POLL_INTERVAL};
