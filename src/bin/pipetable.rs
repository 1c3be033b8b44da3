//! Pipeline trace to table conversion.
//!
//! This program reads one debug trace produced by a network simulator
//! run (one `" | "`-delimited event per line) and reconstructs the
//! per-cycle state of every tracked router pipeline signal inside the
//! requested cycle window. It writes a transposed text table, rows =
//! (router, port, signal), columns = cycles, for visual inspection
//! with a spreadsheet-like tool.
//!
//! The table can optionally be persisted as a CBOR dump, which
//! `pipediff` later compares across runs.

use ciborium::into_writer;
use compact_str::CompactString;
use pipetrace::{reconstruct, Topology, Window};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::exit;

#[derive(clap::Parser, Debug)]
struct PipeTableArgs {
    /// The input trace file path
    trace: String,
    /// The output table file path
    output: String,
    /// First cycle of the report window (inclusive)
    start: u64,
    /// Last cycle of the report window (inclusive)
    end: u64,
    /// Mesh topology, e.g. `4x4` (columns x rows)
    #[clap(long)]
    mesh: Option<String>,
    /// Ring topology with the given number of routers
    #[clap(long, conflicts_with = "mesh")]
    ring: Option<usize>,
    /// Custom topology: file with one router path per line, in index order
    #[clap(long, conflicts_with_all = ["mesh", "ring"])]
    router_list: Option<String>,
    /// Ports per router
    #[clap(long, default_value_t = 5)]
    ports: usize,
    /// Per-port credit buffer capacity (initial credit availability)
    #[clap(long, default_value_t = 5)]
    credits: u32,
    /// Optional CBOR dump of the table, for `pipediff`
    #[clap(long)]
    db_output: Option<String>,
}

fn parse_mesh(spec: &str) -> Option<(usize, usize)> {
    let (x, y) = spec.split_once('x')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn topology(args: &PipeTableArgs) -> std::io::Result<Option<Topology>> {
    if let Some(spec) = &args.mesh {
        let Some((x, y)) = parse_mesh(spec) else {
            clilog::error!(PIPE_ARGS, "bad mesh spec `{}`, expected e.g. 4x4", spec);
            exit(2);
        };
        return Ok(Some(Topology::mesh(x, y, args.ports)));
    }
    if let Some(n) = args.ring {
        return Ok(Some(Topology::ring(n, args.ports)));
    }
    if let Some(path) = &args.router_list {
        let f = BufReader::new(File::open(path)?);
        let mut paths = Vec::new();
        for line in f.lines() {
            let line = line?;
            let path = line.trim();
            if !path.is_empty() {
                paths.push(CompactString::from(path));
            }
        }
        return Ok(Some(Topology::custom(paths, args.ports)));
    }
    Ok(None)
}

fn main() {
    clilog::init_stderr_color_debug();
    let args = <PipeTableArgs as clap::Parser>::parse();
    println!("args: {:?}", args);

    let topo = match topology(&args) {
        Ok(Some(t)) => t,
        Ok(None) => {
            clilog::error!(
                PIPE_ARGS,
                "one of --mesh, --ring or --router-list is required"
            );
            exit(2);
        }
        Err(e) => {
            clilog::error!(PIPE_IO, "cannot read router list: {}", e);
            exit(1);
        }
    };

    let trace = match File::open(&args.trace) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            clilog::error!(PIPE_IO, "cannot open trace {}: {}", args.trace, e);
            exit(1);
        }
    };

    let window = Window {
        start: args.start,
        end: args.end,
    };
    let report = match reconstruct(trace, &topo, window, args.credits) {
        Ok(r) => r,
        Err(e) => {
            clilog::error!(PIPE_FATAL, "{}", e);
            exit(1);
        }
    };

    let mut out = BufWriter::new(File::create(&args.output).unwrap());
    report.write_text(&mut out).unwrap();
    out.flush().unwrap();

    if let Some(db) = &args.db_output {
        into_writer(&report, File::create(db).unwrap()).unwrap();
    }
}
