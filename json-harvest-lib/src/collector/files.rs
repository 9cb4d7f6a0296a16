//! Repository file scanner
//!
//! Walks the repository contents API and records the size and line count of every
//! source file into a dedicated matrix.

use super::{Client, RepoPath};
use crate::Result;
use crate::matrix::{Matrix, MatrixError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ohno::{IntoAppError, app_err, bail};
use serde::Deserialize;
use std::collections::VecDeque;

const LOG_TARGET: &str = "     files";

/// Root id of the files matrix
pub const FILES_ROOT: &str = "files";

pub const SIZE_BYTES: &str = "size_bytes";
pub const SIZE_LINES: &str = "size_lines";

/// Entry names never scanned, neither as files nor as directories
const IGNORED: [&str; 10] = ["bin", "cert", ".clabot", ".git", ".github", "go.mod", "go.sum", "log", "pid", "vendor"];

#[derive(Debug, Deserialize)]
struct Content {
    name: String,
    path: String,
    #[serde(default)]
    size: i64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: String,
}

/// Create the matrix file scans write into
pub fn new_files_matrix(repo: &RepoPath) -> Result<Matrix, MatrixError> {
    let mut matrix = Matrix::new(format!("Github.{FILES_ROOT}"), FILES_ROOT);
    matrix.set_global_label("repo", repo.to_string());
    let _ = matrix.new_metric(SIZE_BYTES, SIZE_BYTES)?;
    let _ = matrix.new_metric(SIZE_LINES, SIZE_LINES)?;
    Ok(matrix)
}

#[must_use]
pub fn is_ignored(name: &str) -> bool {
    IGNORED.contains(&name)
}

/// Text after the last `.` of a file name, if any
#[must_use]
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

/// Number of lines in a base64 encoded file body; embedded line breaks in the encoding are ignored
pub fn count_lines(encoded: &str) -> Result<usize> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let data = STANDARD.decode(compact).into_app_err("decoding file content")?;
    Ok(data.iter().filter(|&&b| b == b'\n').count())
}

/// Walk the whole repository, replacing all previously recorded values.
pub async fn scan(client: &Client, matrix: &mut Matrix) -> Result<()> {
    matrix.reset();

    let mut pending = VecDeque::from([String::new()]);
    while let Some(dir) = pending.pop_front() {
        let entries: Vec<Content> = fetch(client, &dir).await?;

        for entry in entries {
            if is_ignored(&entry.name) {
                continue;
            }

            if entry.kind == "dir" {
                pending.push_back(entry.path);
                continue;
            }

            let Some(ext) = extension(&entry.name) else {
                log::debug!(target: LOG_TARGET, "skip file [{}], no extension parsed", entry.name);
                continue;
            };

            let file: Content = fetch(client, &entry.path).await?;
            let lines = count_lines(&file.content)?;

            record(matrix, &dir, &entry, ext, file.size, lines)?;
            log::debug!(target: LOG_TARGET, " + ({}) ({ext}) [{} bytes] [{lines} lines]", entry.path, file.size);
        }
    }

    Ok(())
}

async fn fetch<T: serde::de::DeserializeOwned>(client: &Client, path: &str) -> Result<T> {
    let (status, body) = client.get(&format!("/contents/{path}")).await?;

    if status != 200 {
        log::warn!(target: LOG_TARGET, "requested: [{path}] response: {status}");
        bail!("contents request for '{path}' rejected with status {status}");
    }

    serde_json::from_slice(&body).into_app_err_with(|| format!("parsing contents of '{path}'"))
}

fn record(matrix: &mut Matrix, dir: &str, entry: &Content, ext: &str, size: i64, lines: usize) -> Result<()> {
    let instance = match matrix.instance(&entry.path) {
        Some(id) => id,
        None => matrix.new_instance(&entry.path)?,
    };

    matrix.set_label(instance, "dir", dir)?;
    matrix.set_label(instance, "file", &entry.name)?;
    matrix.set_label(instance, "path", &entry.path)?;
    matrix.set_label(instance, "ext", ext)?;

    let size_bytes = matrix.metric(SIZE_BYTES).ok_or_else(|| app_err!("files matrix has no '{SIZE_BYTES}' metric"))?;
    let size_lines = matrix.metric(SIZE_LINES).ok_or_else(|| app_err!("files matrix has no '{SIZE_LINES}' metric"))?;

    matrix.set_int_value(size_bytes, instance, size)?;
    matrix.set_int_value(size_lines, instance, i64::try_from(lines).into_app_err("line count out of range")?)?;
    Ok(())
}
