//! Input loading and batch processing for the CLI.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use rayon::prelude::*;

use unoutline::{
    has_pdf_extension, parse_file_with_options, render, Error, JsonFormat, Outliner, ParseOptions,
    SourceDocument,
};

/// Load a document's lines from a PDF, or from a `.json` dump of a
/// [`SourceDocument`] produced by another parser.
pub fn load_source(path: &Path, options: &ParseOptions) -> unoutline::Result<SourceDocument> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Other(format!("Invalid source document {}: {}", path.display(), e)))
    } else {
        parse_file_with_options(path, options.clone())
    }
}

/// PDF files directly inside `dir`, sorted by name.
pub fn collect_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Output file for an input: the input's stem with a `.json` extension.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, in input order
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(PathBuf, Error)>,
}

/// Settings shared by every document of a batch.
pub struct BatchJob<'a> {
    pub outliner: &'a Outliner,
    pub options: &'a ParseOptions,
    pub format: JsonFormat,
}

impl BatchJob<'_> {
    /// Outline one input and write its JSON record.
    pub fn process(&self, input: &Path, output_dir: &Path) -> unoutline::Result<PathBuf> {
        let source = load_source(input, self.options)?;
        let result = self.outliner.outline(&source)?;
        let json = render::to_json(&result, self.format)?;

        let path = output_path(output_dir, input);
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Process inputs in parallel. A failing document is reported and
    /// skipped; it never stops the others.
    ///
    /// Inputs whose output file would collide with an earlier input's
    /// (`a.pdf` and `a.PDF`, or equal stems differing only in case) are
    /// reported as failed without being processed.
    pub fn run(&self, inputs: &[PathBuf], output_dir: &Path, progress: &ProgressBar) -> BatchReport {
        let mut report = BatchReport::default();
        let mut claimed: HashMap<String, &PathBuf> = HashMap::new();
        let mut unique = Vec::with_capacity(inputs.len());

        for input in inputs {
            let output = output_path(output_dir, input);
            let key = output.to_string_lossy().to_lowercase();
            match claimed.get(&key) {
                Some(first) => {
                    let e = Error::Other(format!(
                        "{} would overwrite the output of {}",
                        output.display(),
                        first.display()
                    ));
                    log::warn!("Skipping {}: {}", input.display(), e);
                    progress.inc(1);
                    report.failed.push((input.clone(), e));
                }
                None => {
                    claimed.insert(key, input);
                    unique.push(input);
                }
            }
        }

        let outcomes: Vec<_> = unique
            .par_iter()
            .map(|&input| {
                let outcome = self.process(input, output_dir);
                if let Err(ref e) = outcome {
                    log::warn!("Skipping {}: {}", input.display(), e);
                }
                progress.inc(1);
                (input.clone(), outcome)
            })
            .collect();

        for (input, outcome) in outcomes {
            match outcome {
                Ok(path) => report.written.push(path),
                Err(e) => report.failed.push((input, e)),
            }
        }
        report
    }
}
