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

use thiserror::Error;

/// Errors raised while reading or writing tabular data files.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("Input file is empty")]
    EmptyFile,

    #[error("Missing or malformed header line")]
    MissingHeader,

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Invalid numeric value '{value}' at row {row}: {source}")]
    InvalidNumeric { value: String, row: usize, source: std::num::ParseFloatError },

    #[error("Row count mismatch: header declares {expected} rows, file has {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("Raw dataset row {row} has no label column")]
    MissingLabel { row: usize },

    #[error("Failed to shape data into array: {0}")]
    ArrayShape(#[from] ndarray::ShapeError),

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}

/// Errors raised by the KNN classifier itself.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Input data has no feature columns")]
    NoFeatures,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid neighbor count k={k} for {n_train} training samples")]
    InvalidNeighborCount { k: usize, n_train: usize },

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Unknown distance metric '{0}', expected 'euclidean' or 'chebyshev'")]
    UnknownMetric(String),
}

/// Errors raised by the repeated-trial evaluation loop.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Trial count must be nonzero")]
    NoTrials,

    #[error("Test block is empty; nothing to score")]
    EmptyTestBlock,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}
