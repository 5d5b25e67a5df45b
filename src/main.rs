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

//! Repeated-trial KNN evaluation over exchange-format data files.
//!
//! Results go to standard output and are appended to `./logfile.txt`.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use knn_eval::algorithms::Metric;
use knn_eval::data::{load_labels, load_matrix};
use knn_eval::evaluate::{evaluate, EvalOptions, Reporter};

const LOG_FILE: &str = "./logfile.txt";

/// Repeated-trial evaluation harness for a brute-force KNN classifier.
#[derive(Parser)]
#[command(name = "knn-eval", version, about)]
struct Cli {
    /// Exchange-format file holding the feature vectors
    #[arg(short, long)]
    vectors: PathBuf,

    /// Exchange-format file holding the labels (one column)
    #[arg(short, long)]
    labels: PathBuf,

    /// Number of independent trials
    #[arg(short, long)]
    trials: usize,

    /// Test-block size sliced off each shuffled split
    #[arg(short = 'e', long)]
    test_size: usize,

    /// Train-block size sliced off each shuffled split
    #[arg(short = 'r', long)]
    train_size: usize,

    /// Neighbor count
    #[arg(short, long)]
    k: usize,

    /// Distance metric: euclidean or chebyshev
    #[arg(short, long)]
    metric: Metric,

    /// RNG seed for reproducible splits (unseeded by default)
    #[arg(long)]
    seed: Option<u64>,
}

fn print_banner() {
    println!(" _  __ _   _ _   _     _______     ___    _     ");
    println!("| |/ /| \\ | | \\ | |   | ____\\ \\   / / \\  | |    ");
    println!("| ' / |  \\| |  \\| |   |  _|  \\ \\ / / _ \\ | |    ");
    println!("| . \\ | |\\  | |\\  |   | |___  \\ V / ___ \\| |___ ");
    println!("|_|\\_\\|_| \\_|_| \\_|   |_____|  \\_/_/   \\_\\_____|");
    println!();
    println!();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let x = load_matrix(&cli.vectors)?;
    let y = load_labels(&cli.labels)?;
    info!("loaded {} samples with {} features", x.nrows(), x.ncols());

    let opts = EvalOptions {
        test_times: cli.trials,
        train_size: cli.train_size,
        test_size: cli.test_size,
        k: cli.k,
        metric: cli.metric,
        seed: cli.seed,
        log_target: LOG_FILE.to_string(),
    };
    let mut reporter = Reporter::stdout_and_file(LOG_FILE)?;
    let mean = evaluate(&x, &y, &opts, &mut reporter)?;
    info!("mean accuracy over {} trials: {:.5}", cli.trials, mean);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    print_banner();
    if let Err(err) = run(cli) {
        eprintln!("knn-eval: {}", err);
        process::exit(1);
    }
}
