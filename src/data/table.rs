// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Header-prefixed tab-separated exchange format.
//!
//! Line 1 is `<column_count>\t<row_count>`, followed by one tab-separated
//! row per record with a trailing newline. A label file is the degenerate
//! one-column case. Reads and writes are symmetric: exporting a loaded
//! table reproduces it byte for byte.
//!
//! Values are written in Rust's shortest round-trip `Display` form, so
//! byte-identity with files produced by other tooling holds only for
//! values whose shortest form matches (e.g. `1.0` re-exports as `1`).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2, Axis};

use crate::errors::TableError;

fn parse_table<P: AsRef<Path>>(path: P) -> Result<(usize, Vec<Vec<f64>>), TableError> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let header = lines.next().ok_or(TableError::MissingHeader)?;
    let mut fields = header.split('\t');
    let n_cols: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(TableError::MissingHeader)?;
    let n_rows: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(TableError::MissingHeader)?;
    if fields.next().is_some() || n_cols == 0 {
        return Err(TableError::MissingHeader);
    }

    let mut data: Vec<Vec<f64>> = Vec::with_capacity(n_rows);
    for (i, line) in lines.enumerate() {
        let row: Vec<f64> = line
            .split('\t')
            .map(|token| {
                token.parse::<f64>().map_err(|e| TableError::InvalidNumeric {
                    value: token.to_string(),
                    row: i + 1,
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() != n_cols {
            return Err(TableError::InconsistentColumns {
                row: i + 1,
                actual: row.len(),
                expected: n_cols,
            });
        }
        data.push(row);
    }

    if data.len() != n_rows {
        return Err(TableError::RowCountMismatch { expected: n_rows, actual: data.len() });
    }
    Ok((n_cols, data))
}

/// Loads a feature matrix from the exchange format.
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, TableError> {
    let (n_cols, data) = parse_table(path)?;
    let n_rows = data.len();
    let flat: Vec<f64> = data.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((n_rows, n_cols), flat)?)
}

/// Loads a label vector from a one-column exchange-format file.
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Array1<f64>, TableError> {
    let (n_cols, data) = parse_table(path)?;
    if n_cols != 1 {
        return Err(TableError::InconsistentColumns { row: 1, actual: n_cols, expected: 1 });
    }
    Ok(Array1::from_iter(data.into_iter().map(|row| row[0])))
}

/// Writes a feature matrix in the exchange format.
pub fn save_matrix<P: AsRef<Path>>(path: P, x: &Array2<f64>) -> Result<(), TableError> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}\t{}", x.ncols(), x.nrows())?;
    for row in x.axis_iter(Axis(0)) {
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(file, "{}", fields.join("\t"))?;
    }
    file.flush()?;
    Ok(())
}

/// Writes a label vector as a one-column exchange-format file.
pub fn save_labels<P: AsRef<Path>>(path: P, y: &Array1<f64>) -> Result<(), TableError> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "1\t{}", y.len())?;
    for value in y.iter() {
        writeln!(file, "{}", value)?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn load_matrix_basic() {
        let temp = create_temp_table("2\t3\n1\t2\n3.5\t4\n5\t-6\n");
        let x = load_matrix(temp.path()).expect("Failed to load table");
        assert_eq!(x, array![[1.0, 2.0], [3.5, 4.0], [5.0, -6.0]]);
    }

    #[test]
    fn matrix_round_trip_is_byte_identical() {
        let x = array![[1.0, 2.5, -0.125], [3.0, 0.0001, 6.0]];
        let temp = NamedTempFile::new().unwrap();
        save_matrix(temp.path(), &x).unwrap();
        let first = std::fs::read(temp.path()).unwrap();

        let loaded = load_matrix(temp.path()).unwrap();
        assert_eq!(loaded, x);

        save_matrix(temp.path(), &loaded).unwrap();
        let second = std::fs::read(temp.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn export_uses_shortest_display_form() {
        // Whole-valued floats normalize to their shortest form on export.
        let temp = NamedTempFile::new().unwrap();
        save_matrix(temp.path(), &array![[1.0, 2.50]]).unwrap();
        assert_eq!(std::fs::read_to_string(temp.path()).unwrap(), "2\t1\n1\t2.5\n");
    }

    #[test]
    fn labels_round_trip() {
        let y = array![0.0, 1.0, 1.0, 0.0];
        let temp = NamedTempFile::new().unwrap();
        save_labels(temp.path(), &y).unwrap();
        assert_eq!(
            std::fs::read_to_string(temp.path()).unwrap(),
            "1\t4\n0\n1\n1\n0\n"
        );
        let loaded = load_labels(temp.path()).unwrap();
        assert_eq!(loaded, y);
    }

    #[test]
    fn load_empty_file_fails() {
        let temp = create_temp_table("");
        assert!(matches!(load_matrix(temp.path()), Err(TableError::MissingHeader)));
    }

    #[test]
    fn load_malformed_header_fails() {
        let temp = create_temp_table("abc\t2\n1\t2\n3\t4\n");
        assert!(matches!(load_matrix(temp.path()), Err(TableError::MissingHeader)));
    }

    #[test]
    fn load_non_numeric_token_fails() {
        let temp = create_temp_table("2\t2\n1\t2\n3\tabc\n");
        let result = load_matrix(temp.path());
        assert!(matches!(result, Err(TableError::InvalidNumeric { row: 2, .. })));
    }

    #[test]
    fn load_inconsistent_columns_fails() {
        let temp = create_temp_table("2\t2\n1\t2\n3\t4\t5\n");
        assert!(matches!(
            load_matrix(temp.path()),
            Err(TableError::InconsistentColumns { row: 2, actual: 3, expected: 2 })
        ));
    }

    #[test]
    fn load_row_count_mismatch_fails() {
        let temp = create_temp_table("2\t3\n1\t2\n3\t4\n");
        assert!(matches!(
            load_matrix(temp.path()),
            Err(TableError::RowCountMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn load_labels_rejects_wide_table() {
        let temp = create_temp_table("2\t1\n1\t2\n");
        assert!(matches!(
            load_labels(temp.path()),
            Err(TableError::InconsistentColumns { actual: 2, expected: 1, .. })
        ));
    }

    #[test]
    fn load_nonexistent_file_fails() {
        assert!(matches!(load_matrix("nonexistent.tsv"), Err(TableError::FileOpen(_))));
    }
}
