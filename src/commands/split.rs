use anyhow::{bail, Context, Result};
use bilby::pdf::{split_pdf, SplitOptions, SplitOutcome};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output_dir: Q,
    options: &SplitOptions,
) -> Result<Vec<SplitOutcome>> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let sources = if input.is_dir() {
        find_pdfs(input, output_dir)?
    } else {
        vec![input.to_path_buf()]
    };

    let mut outcomes = Vec::with_capacity(sources.len());
    for source in &sources {
        let outcome = split_pdf(source, output_dir, options)
            .with_context(|| format!("Failed to split {}", source.display()))?;
        match &outcome {
            SplitOutcome::Copied { path } => {
                println!("{} -> {} (copied)", source.display(), path.display());
            }
            SplitOutcome::Split { chunks } => {
                for chunk in chunks {
                    println!("{} {} -> {}", source.display(), chunk.range, chunk.path.display());
                }
            }
        }
        outcomes.push(outcome);
    }

    println!(
        "Split {} file(s) into {}",
        sources.len(),
        output_dir.display()
    );

    Ok(outcomes)
}

/// Every `*.pdf` below `dir`, sorted, skipping anything already in `output_dir`.
/// Chunks from every source land in one directory, so file names must be unique.
pub fn find_pdfs(dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir
        .canonicalize()
        .unwrap_or_else(|_| output_dir.to_path_buf());

    let mut seen = HashSet::new();
    let mut pdfs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_pdf(path) {
            continue;
        }
        let in_output = path
            .canonicalize()
            .map(|p| p.starts_with(&output_dir))
            .unwrap_or(false);
        if in_output {
            continue;
        }
        if !seen.insert(path.file_name().map(|n| n.to_os_string())) {
            bail!(
                "more than one input named {:?}; their chunks would collide",
                path.file_name().unwrap_or_default()
            );
        }
        pdfs.push(path.to_path_buf());
    }
    Ok(pdfs)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
