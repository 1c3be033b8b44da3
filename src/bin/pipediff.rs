//! Pipeline table comparison.
//!
//! This program reads two table dumps written by `pipetable
//! --db-output` (usually the same workload run on two simulator
//! configurations) and prints every cell where the reconstructed
//! pipeline state differs, plus a summary.

use ciborium::from_reader;
use itertools::Itertools;
use pipetrace::PipelineReport;
use std::fs::File;
use std::io::BufReader;
use std::process::exit;

#[derive(clap::Parser, Debug)]
struct PipeDiffArgs {
    /// The first table dump
    db1: String,
    /// The second table dump
    db2: String,
    /// Maximum number of differing cells to print.
    #[clap(long, default_value_t = 200)]
    limit: usize,
}

fn main() {
    clilog::init_stderr_color_debug();
    let args = <PipeDiffArgs as clap::Parser>::parse();
    println!("args: {:#?}", args);

    let r1: PipelineReport = from_reader(
        BufReader::new(File::open(&args.db1).unwrap())
    ).unwrap();
    let r2: PipelineReport = from_reader(
        BufReader::new(File::open(&args.db2).unwrap())
    ).unwrap();

    if r1.labels != r2.labels {
        let only1 = r1.labels.iter().filter(|l| !r2.labels.contains(*l));
        let only2 = r2.labels.iter().filter(|l| !r1.labels.contains(*l));
        clilog::error!(
            PIPE_DIFF_SHAPE,
            "table shapes differ; rows only in {}: {{ {} }}, only in {}: {{ {} }}",
            args.db1, only1.format(", "),
            args.db2, only2.format(", ")
        );
        exit(1);
    }
    if r1.start_cycle != r2.start_cycle {
        clilog::warn!(
            PIPE_DIFF_WINDOW,
            "windows start at different cycles ({} vs {}), \
             columns are compared by position",
            r1.start_cycle, r2.start_cycle
        );
    }

    let cycles = r1.columns.len().min(r2.columns.len());
    if r1.columns.len() != r2.columns.len() {
        clilog::warn!(
            PIPE_DIFF_LEN,
            "cycle counts differ ({} vs {}), comparing the first {}",
            r1.columns.len(), r2.columns.len(), cycles
        );
    }

    let mut num_diff = 0usize;
    for c in 0..cycles {
        for (row, label) in r1.labels.iter().enumerate() {
            let (a, b) = (&r1.columns[c][row], &r2.columns[c][row]);
            if a != b {
                num_diff += 1;
                if num_diff <= args.limit {
                    println!(
                        "{} @ cycle {}: {} != {}",
                        label, r1.start_cycle + c as u64, a, b
                    );
                }
            }
        }
    }
    if num_diff > args.limit {
        println!("... {} more differing cells", num_diff - args.limit);
    }
    println!(
        "compared {} rows x {} cycles: {} differing cells",
        r1.labels.len(), cycles, num_diff
    );
}
