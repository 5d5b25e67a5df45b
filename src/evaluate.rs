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

//! Repeated-trial evaluation loop.
//!
//! Each trial draws a fresh uniform permutation of the sample pool, slices
//! a train prefix and a test block off it, fits a brute-force KNN model and
//! scores it. Trials run strictly sequentially; the running sum and the
//! shared report stream require total ordering.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use log::debug;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::algorithms::{Metric, KNN};
use crate::errors::{EvalError, ModelError};

/// Parameters for one evaluation run.
pub struct EvalOptions {
    /// Number of independent trials.
    pub test_times: usize,
    /// Rows sliced off the shuffled pool for training, per trial.
    pub train_size: usize,
    /// Rows sliced off immediately after the train block, per trial.
    pub test_size: usize,
    /// Neighbor count.
    pub k: usize,
    /// Distance metric.
    pub metric: Metric,
    /// RNG seed; `None` draws a fresh permutation from entropy each run.
    pub seed: Option<u64>,
    /// Identifier prefixed to every report line.
    pub log_target: String,
}

/// One reporting interface over two independent sinks: a console stream and
/// an append-only log. Tests substitute in-memory writers for both.
pub struct Reporter {
    console: Box<dyn Write>,
    log: Box<dyn Write>,
}

impl Reporter {
    pub fn new(console: Box<dyn Write>, log: Box<dyn Write>) -> Self {
        Reporter { console, log }
    }

    /// Standard output plus a log file opened in append mode for the whole
    /// run.
    pub fn stdout_and_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Reporter::new(Box::new(io::stdout()), Box::new(file)))
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.console, "{}", text)?;
        writeln!(self.log, "{}", text)?;
        self.log.flush()
    }

    /// Blank separator, written to the log sink only.
    fn separator(&mut self) -> io::Result<()> {
        writeln!(self.log)?;
        self.log.flush()
    }
}

/// Shuffles the row indices `0..n` and slices a train prefix and the test
/// block that follows it. Oversized requests truncate or underfill silently.
fn split_indices(
    n: usize,
    train_size: usize,
    test_size: usize,
    rng: &mut StdRng,
) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let train_end = train_size.min(n);
    let test_end = train_size.saturating_add(test_size).min(n).max(train_end);
    (order[..train_end].to_vec(), order[train_end..test_end].to_vec())
}

/// Runs `test_times` randomized split/fit/predict/score trials and returns
/// the mean accuracy.
///
/// Per-trial accuracies are only observable through the reporter; the
/// return value is the mean alone. Each trial line has the form
/// `"<log-target> k=<k> trial #<i> accuracy: <pct>%"` with the percentage
/// to five decimal places, and the mean line follows the same convention.
pub fn evaluate(
    x: &Array2<f64>,
    y: &Array1<f64>,
    opts: &EvalOptions,
    reporter: &mut Reporter,
) -> Result<f64, EvalError> {
    if opts.test_times == 0 {
        return Err(EvalError::NoTrials);
    }
    let n = x.nrows();
    if n != y.len() {
        return Err(ModelError::DimensionMismatch { expected: n, actual: y.len() }.into());
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut accuracy_sum = 0.0;
    for trial in 0..opts.test_times {
        let (train_idx, test_idx) = split_indices(n, opts.train_size, opts.test_size, &mut rng);
        if test_idx.is_empty() {
            return Err(EvalError::EmptyTestBlock);
        }

        let train_x = x.select(Axis(0), &train_idx);
        let train_y = y.select(Axis(0), &train_idx);
        let test_x = x.select(Axis(0), &test_idx);
        let test_y = y.select(Axis(0), &test_idx);

        // The model lives for one trial only.
        let mut model = KNN::new().k(opts.k).metric(opts.metric).build();
        model.fit(&train_x, &train_y)?;
        let predictions = model.predict(&test_x)?;
        let accuracy = model.calculate_accuracy(&predictions, &test_y);
        debug!(
            "trial {}: train={} test={} accuracy={}",
            trial,
            train_idx.len(),
            test_idx.len(),
            accuracy
        );

        reporter.line(&format!(
            "{} k={} trial #{} accuracy: {:.5}%",
            opts.log_target,
            opts.k,
            trial,
            accuracy * 100.0
        ))?;
        accuracy_sum += accuracy;
    }

    let mean = accuracy_sum / opts.test_times as f64;
    reporter.line(&format!(
        "{} k={} mean accuracy: {:.5}%",
        opts.log_target,
        opts.k,
        mean * 100.0
    ))?;
    reporter.separator()?;
    Ok(mean)
}
