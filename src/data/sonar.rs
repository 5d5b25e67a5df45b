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

//! Raw dataset import.
//!
//! Parses a comma-delimited table of numeric feature columns plus one
//! trailing categorical label column. The sentinel token maps to label 0.0,
//! every other token to 1.0 (a fixed binary collapse, not general
//! multi-class support).

use std::fs::File;
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::data::DataLoader;
use crate::errors::TableError;

/// Label sentinel for the sonar dataset (60 features, 2 classes,
/// 208 samples): "R" for rock, everything else mine.
pub const SONAR_SENTINEL: &str = "R";

pub struct SonarLoader;

/// Loads a raw comma-delimited dataset, collapsing the trailing categorical
/// column into binary labels against `sentinel`.
pub fn load_raw<P: AsRef<Path>>(
    path: P,
    sentinel: &str,
) -> Result<(Array2<f64>, Array1<f64>), TableError> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .flexible(true)
        .from_reader(file);

    let mut features: Vec<f64> = Vec::new();
    let mut labels: Vec<f64> = Vec::new();
    let mut n_cols = 0;
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            return Err(TableError::MissingLabel { row: i + 1 });
        }
        if i == 0 {
            n_cols = record.len();
        } else if record.len() != n_cols {
            return Err(TableError::InconsistentColumns {
                row: i + 1,
                actual: record.len(),
                expected: n_cols,
            });
        }

        for field in record.iter().take(n_cols - 1) {
            let value = field.parse::<f64>().map_err(|e| TableError::InvalidNumeric {
                value: field.to_string(),
                row: i + 1,
                source: e,
            })?;
            features.push(value);
        }
        let token = &record[n_cols - 1];
        labels.push(if token == sentinel { 0.0 } else { 1.0 });
    }

    if labels.is_empty() {
        return Err(TableError::EmptyFile);
    }
    let x = Array2::from_shape_vec((labels.len(), n_cols - 1), features)?;
    Ok((x, Array1::from_vec(labels)))
}

impl DataLoader for SonarLoader {
    type Error = TableError;

    fn load<P: AsRef<Path>>(path: P) -> Result<(Array2<f64>, Array1<f64>), TableError> {
        load_raw(path, SONAR_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_data;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn sentinel_maps_to_zero_everything_else_to_one() {
        let temp = create_temp_csv("0.1,0.2,R\n0.3,0.4,M\n0.5,0.6,X\n0.7,0.8,R\n");
        let (x, y) = load_data::<SonarLoader, _>(temp.path()).expect("Failed to load");
        assert_eq!(x, array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6], [0.7, 0.8]]);
        assert_eq!(y, array![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn custom_sentinel() {
        let temp = create_temp_csv("1.0,yes\n2.0,no\n");
        let (_, y) = load_raw(temp.path(), "yes").unwrap();
        assert_eq!(y, array![0.0, 1.0]);
    }

    #[test]
    fn non_numeric_feature_fails() {
        let temp = create_temp_csv("0.1,abc,R\n");
        let result = load_data::<SonarLoader, _>(temp.path());
        assert!(matches!(result, Err(TableError::InvalidNumeric { row: 1, .. })));
    }

    #[test]
    fn inconsistent_columns_fail() {
        let temp = create_temp_csv("0.1,0.2,R\n0.3,M\n");
        let result = load_data::<SonarLoader, _>(temp.path());
        assert!(matches!(
            result,
            Err(TableError::InconsistentColumns { row: 2, actual: 2, expected: 3 })
        ));
    }

    #[test]
    fn empty_file_fails() {
        let temp = create_temp_csv("");
        assert!(load_data::<SonarLoader, _>(temp.path()).is_err());
    }
}
