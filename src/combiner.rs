use glob::{MatchOptions, Pattern};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CombineError, Result};

/// Default name of the combined file.
pub const OUTPUT_FILENAME: &str = "combined_file_with_headings.py";

/// Default candidate pattern.
pub const DEFAULT_PATTERN: &str = "*.py";

// Shell-style matching: `*` does not pick up dotfiles.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// What to do when a candidate file cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Log the failure, skip the file and keep going.
    #[default]
    Continue,
    /// Stop the run and return the read error.
    Abort,
}

/// When the heading of a block is written relative to reading its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingMode {
    /// Heading, body and footer are written together once the body has been read.
    /// A failed read leaves nothing behind.
    #[default]
    Atomic,
    /// Heading is written before the read. A failed read leaves an orphaned heading.
    Eager,
}

#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Directory scanned for candidates.
    pub directory: PathBuf,
    /// Glob matched against file names in `directory`.
    pub pattern: String,
    /// Destination file. Relative paths are resolved against `directory`.
    pub output: PathBuf,
    pub on_error: OnError,
    pub heading_mode: HeadingMode,
}

impl CombineOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            pattern: DEFAULT_PATTERN.to_string(),
            output: PathBuf::from(OUTPUT_FILENAME),
            on_error: OnError::default(),
            heading_mode: HeadingMode::default(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            self.directory.join(&self.output)
        }
    }
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a combine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Number of files matched by the pattern, the output file included
    /// when it matched.
    pub candidates: usize,
    /// Number of files whose contents made it into the output.
    pub embedded: usize,
    /// Candidates that could not be read.
    pub skipped: Vec<SkippedFile>,
}

pub fn heading(name: &str) -> String {
    format!("\n# --- Start of file: {} ---\n\n", name)
}

pub fn footer(name: &str) -> String {
    format!("\n\n# --- End of file: {} ---\n\n", name)
}

/// Lists the regular files directly inside `directory` whose names match
/// `pattern`, sorted by file name.
pub fn discover_candidates(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern).map_err(|source| CombineError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(directory)
        .map_err(|source| CombineError::ListDirectory {
            path: directory.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            matcher.matches_with(&name.to_string_lossy(), MATCH_OPTIONS) && entry.path().is_file()
        })
        .collect();

    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(entries.into_iter().map(|entry| entry.path()).collect())
}

/// Writes every candidate, except the output file itself, into the output
/// file bounded by its heading and footer.
pub fn combine(candidates: &[PathBuf], options: &CombineOptions) -> Result<CombineReport> {
    let output_path = options.output_path();
    let file = File::create(&output_path).map_err(|source| CombineError::CreateOutput {
        path: output_path.clone(),
        source,
    })?;
    let output_canonical = fs::canonicalize(&output_path).ok();
    let mut out = BufWriter::new(file);

    let mut report = CombineReport {
        candidates: candidates.len(),
        ..CombineReport::default()
    };

    for path in candidates {
        if is_output(path, output_canonical.as_deref()) {
            debug!("Skipping output file {}", path.display());
            continue;
        }

        let name = display_name(path);
        if options.heading_mode == HeadingMode::Eager {
            write_text(&mut out, &heading(&name), &output_path)?;
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                let block = match options.heading_mode {
                    HeadingMode::Atomic => format!("{}{}{}", heading(&name), content, footer(&name)),
                    HeadingMode::Eager => format!("{}{}", content, footer(&name)),
                };
                write_text(&mut out, &block, &output_path)?;
                report.embedded += 1;
                debug!("Embedded {} ({} bytes)", name, content.len());
            }
            Err(source) => {
                warn!("Error reading file {}: {}", name, source);
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: source.to_string(),
                });
                if options.on_error == OnError::Abort {
                    flush(&mut out, &output_path)?;
                    return Err(CombineError::Read {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
    }

    flush(&mut out, &output_path)?;
    Ok(report)
}

/// Discovers candidates and combines them into the configured output file.
pub fn run(options: &CombineOptions) -> Result<CombineReport> {
    let candidates = discover_candidates(&options.directory, &options.pattern)?;
    debug!(
        "Found {} candidates matching {} in {}",
        candidates.len(),
        options.pattern,
        options.directory.display()
    );
    combine(&candidates, options)
}

fn is_output(path: &Path, output_canonical: Option<&Path>) -> bool {
    match (output_canonical, fs::canonicalize(path)) {
        (Some(output), Ok(candidate)) => candidate == output,
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_text(out: &mut impl Write, text: &str, output_path: &Path) -> Result<()> {
    out.write_all(text.as_bytes())
        .map_err(|source| CombineError::Write {
            path: output_path.to_path_buf(),
            source,
        })
}

fn flush(out: &mut impl Write, output_path: &Path) -> Result<()> {
    out.flush().map_err(|source| CombineError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}
