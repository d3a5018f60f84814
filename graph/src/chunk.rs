//! Chunked emission of node and edge records.
//!
//! A record list is cut into contiguous batches of a fixed size without
//! reordering or splitting records. Batch `i` (1-based) of prefix `p` is named
//! `p_i` and written to `p_i.json` as a pretty-printed JSON array.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, Result};

/// Default number of records per output file.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Prefix of node chunk files.
pub const NODES_PREFIX: &str = "nodes";

/// Prefix of edge chunk files.
pub const EDGES_PREFIX: &str = "edges";

/// One batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a, T> {
    /// 1-based position of the chunk.
    pub index: usize,
    /// Records of this chunk, in original order.
    pub records: &'a [T],
}

/// Deterministic name of chunk `index` for `prefix`.
#[must_use]
pub fn chunk_name(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}")
}

/// Splits `records` into `ceil(len / size)` contiguous chunks.
///
/// # Errors
///
/// Returns [`Error::InvalidChunkSize`] if `size` is zero.
pub fn chunks<T>(records: &[T], size: usize) -> Result<impl Iterator<Item = Chunk<'_, T>>> {
    if size == 0 {
        return Err(Error::InvalidChunkSize);
    }
    Ok(records
        .chunks(size)
        .enumerate()
        .map(|(i, records)| Chunk {
            index: i + 1,
            records,
        }))
}

/// Removes `dir` if it exists and creates it empty.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be removed or created.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Writes `records` as `<dir>/<prefix>_<i>.json` files of at most `size`
/// records each and returns the written paths in chunk order.
///
/// The directory must already exist. Output uses four-space indentation and
/// keeps non-ASCII characters unescaped.
///
/// # Errors
///
/// Returns [`Error::InvalidChunkSize`] for a zero `size`, [`Error::Io`] if a
/// file cannot be written, or [`Error::Json`] if a record fails to serialize.
pub fn write_chunks<T: Serialize>(
    dir: &Path,
    prefix: &str,
    records: &[T],
    size: usize,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for chunk in chunks(records, size)? {
        let path = dir.join(format!("{}.json", chunk_name(prefix, chunk.index)));
        write_json(&path, chunk.records)?;
        debug!(path = %path.display(), records = chunk.records.len(), "wrote chunk");
        written.push(path);
    }
    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    out.flush().map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_names_are_one_based() {
        assert_eq!(chunk_name(NODES_PREFIX, 1), "nodes_1");
        assert_eq!(chunk_name(EDGES_PREFIX, 12), "edges_12");
    }

    #[test]
    fn last_chunk_holds_the_remainder() {
        let records: Vec<u32> = (0..7).collect();
        let sizes: Vec<(usize, usize)> = chunks(&records, 3)
            .expect("valid size")
            .map(|c| (c.index, c.records.len()))
            .collect();
        assert_eq!(sizes, vec![(1, 3), (2, 3), (3, 1)]);
    }

    #[test]
    fn empty_input_emits_no_chunks() {
        let records: Vec<u32> = Vec::new();
        assert_eq!(chunks(&records, 5).expect("valid size").count(), 0);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(chunks(&[1, 2, 3], 0).map(|c| c.count()), Err(Error::InvalidChunkSize)));
    }

    #[test]
    fn writes_files_in_chunk_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let records = vec!["å", "b", "c"];
        let paths = write_chunks(dir.path(), "nodes", &records, 2).expect("written");
        assert_eq!(
            paths,
            vec![dir.path().join("nodes_1.json"), dir.path().join("nodes_2.json")]
        );
        let first = fs::read_to_string(&paths[0]).expect("readable");
        assert_eq!(first, "[\n    \"å\",\n    \"b\"\n]");
        let second: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&paths[1]).expect("readable")).expect("json");
        assert_eq!(second, vec!["c".to_string()]);
    }

    #[test]
    fn recreate_dir_discards_previous_output() {
        let root = tempfile::tempdir().expect("tempdir");
        let out = root.path().join("out");
        fs::create_dir_all(&out).expect("mkdir");
        fs::write(out.join("nodes_9.json"), "[]").expect("write");
        recreate_dir(&out).expect("recreated");
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).expect("readable").count(), 0);
    }
}
