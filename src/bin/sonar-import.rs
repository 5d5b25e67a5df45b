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

//! Converts a raw comma-delimited dataset into the two exchange-format
//! files the evaluation harness consumes.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use knn_eval::data::sonar::{load_raw, SONAR_SENTINEL};
use knn_eval::data::{save_labels, save_matrix};

/// Raw-dataset importer: numeric feature columns plus one trailing
/// categorical label column.
#[derive(Parser)]
#[command(name = "sonar-import", version, about)]
struct Cli {
    /// Raw comma-delimited dataset
    input: PathBuf,

    /// Output path for the feature-vector table
    #[arg(short, long, default_value = "vectors.txt")]
    vectors: PathBuf,

    /// Output path for the label table
    #[arg(short, long, default_value = "labels.txt")]
    labels: PathBuf,

    /// Label token mapped to class 0; every other token maps to class 1
    #[arg(long, default_value = SONAR_SENTINEL)]
    sentinel: String,
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let (x, y) = load_raw(&cli.input, &cli.sentinel)?;
    save_matrix(&cli.vectors, &x)?;
    save_labels(&cli.labels, &y)?;
    println!(
        "imported {} samples with {} features -> {} / {}",
        x.nrows(),
        x.ncols(),
        cli.vectors.display(),
        cli.labels.display()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("sonar-import: {}", err);
        process::exit(1);
    }
}
