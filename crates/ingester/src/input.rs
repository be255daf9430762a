//! CSV input: file discovery, parsing and batch identifiers.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use pipeline::{IngestError, RawRow};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Collect input files from explicit paths and folders, de-duplicated in order.
///
/// Directories are expanded one level deep, keeping files whose extension
/// matches `extension` case-insensitively.
pub fn collect_files(paths: &[PathBuf], folders: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            files.push(path);
        }
    };

    for path in paths {
        if path.is_dir() {
            expand_dir(path, extension).into_iter().for_each(&mut push);
        } else {
            push(path.clone());
        }
    }

    for folder in folders {
        expand_dir(folder, extension).into_iter().for_each(&mut push);
    }

    files
}

fn expand_dir(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    files
}

/// Parse CSV text with a header row into raw rows, one result per record.
///
/// Only an unreadable header fails the whole input; a record that cannot be
/// decoded becomes an error in its own slot and the following records are
/// still read.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Result<RawRow, IngestError>>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();

    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let fatal = matches!(e.kind(), csv::ErrorKind::Io(_));
                rows.push(Err(IngestError::Parse(e.to_string())));
                if fatal {
                    break;
                }
                continue;
            }
        };

        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            let value = Some(value.to_string()).filter(|v| !v.trim().is_empty());
            row.insert(header, value);
        }
        rows.push(Ok(row));
    }

    Ok(rows)
}

/// Batch identifier derived from file contents, so re-running a file reuses it.
pub fn batch_id(bytes: &[u8]) -> String {
    format!("batch_{}", short_hash(&sha256_hex(bytes)))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(12).collect()
}
