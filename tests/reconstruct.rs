//! End-to-end reconstruction tests on small hand-written traces.

use pipetrace::{reconstruct, PipelineReport, TraceError, Topology, Window};
use std::io::Cursor;

fn run(log: &str, start: u64, end: u64) -> PipelineReport {
    let topo = Topology::mesh(1, 1, 1);
    reconstruct(Cursor::new(log), &topo, Window { start, end }, 5).unwrap()
}

fn text(report: &PipelineReport) -> String {
    let mut out = Vec::new();
    report.write_text(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn row<'a>(table: &'a str, label: &str) -> &'a str {
    let prefix = format!("{}; ", label);
    table
        .lines()
        .find(|l| l.starts_with(&prefix))
        .unwrap_or_else(|| panic!("no row `{}` in output", label))
}

#[test]
fn one_column_per_closed_cycle_in_window() {
    let log = "\
10 | network_0/router_0_0 | BW | Flit 1 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | BW | Flit 2 | Input 0 | in vc 0 | PID 1
12 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 11);
    assert_eq!(report.num_cycles(), 2);
    assert!(text(&report).starts_with("Router; 10; 11; \n"));
}

#[test]
fn credit_availability_carries_forward() {
    // cycle 11 does not touch the credit count, so the cycle-10 value
    // persists into its snapshot
    let log = "\
10 | network_0/router_0_0 | Credit availability | Output 0 | 3
11 | network_0/router_0_0 | BW | Flit 2 | Input 0 | in vc 0 | PID 1
12 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 11);
    let table = text(&report);
    assert_eq!(row(&table, "R0 Credits O0"), "R0 Credits O0; 3; 3; ");
}

#[test]
fn credit_availability_update_overrides_carry() {
    let log = "\
10 | network_0/router_0_0 | Credit availability | Output 0 | 3
11 | network_0/router_0_0 | Credit availability | Output 0 | 4
12 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 11);
    assert_eq!(row(&text(&report), "R0 Credits O0"), "R0 Credits O0; 3; 4; ");
}

#[test]
fn ephemeral_signals_reset_every_cycle() {
    let log = "\
10 | network_0/router_0_0 | BW | Flit 7 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | Credit availability | Output 0 | 4
12 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 11);
    assert_eq!(row(&text(&report), "R0 BW I0"), "R0 BW I0; 7; X; ");
}

#[test]
fn untouched_credits_report_buffer_capacity() {
    let log = "\
10 | network_0/router_0_0 | BW | Flit 7 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 10);
    assert_eq!(row(&text(&report), "R0 Credits O0"), "R0 Credits O0; 5; ");
}

#[test]
fn allocation_failure_records_sentinel() {
    let log = "\
10 | network_0/router_0_0 | No free VC | Flit 31 | Input 0 | Output 0
11 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 10);
    let table = text(&report);
    assert_eq!(
        row(&table, "R0 SA-L (MISS) O0"),
        "R0 SA-L (MISS) O0; -1; "
    );
    // the grant row stays untouched by the failure
    assert_eq!(row(&table, "R0 SA-L O0"), "R0 SA-L O0; X; ");
}

#[test]
fn last_write_wins_within_a_cycle() {
    let log = "\
10 | network_0/router_0_0 | SA-L | Flit 1 | Input 0 | Output 0 | PID 1
10 | network_0/router_0_0 | SA-L | Flit 2 | Input 0 | Output 0 | PID 2
11 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 10);
    assert_eq!(row(&text(&report), "R0 SA-L O0"), "R0 SA-L O0; 2; ");
}

#[test]
fn inverted_window_yields_header_only() {
    let log = "\
10 | network_0/router_0_0 | BW | Flit 1 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | end of trace
";
    let report = run(log, 20, 10);
    assert!(report.is_empty());
    assert_eq!(text(&report), "Router; \n");
}

#[test]
fn final_in_progress_cycle_is_not_flushed() {
    // no boundary after cycle 11, so only cycle 10 is reported
    let log = "\
10 | network_0/router_0_0 | BW | Flit 1 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | BW | Flit 2 | Input 0 | in vc 0 | PID 1
";
    let report = run(log, 10, 11);
    assert_eq!(report.num_cycles(), 1);
}

#[test]
fn rerun_is_byte_identical() {
    let log = "\
9 | network_0/router_0_0 | ST+LT | Flit 4 | Input 0 | Output 0 | PID 2
10 | network_0/router_0_0 | Credit availability | Output 0 | 2
10 | network_0/router_0_0 | SA-G | Flit 5 | Input 0 | Output 0 | PID 3
11 | network_0/router_0_0 | Credit Local | Flit 5 | Input 0 | vc 0 | PID 3
12 | network_0/router_0_0 | end of trace
";
    assert_eq!(text(&run(log, 9, 12)), text(&run(log, 9, 12)));
}

#[test]
fn diagnostic_lines_advance_the_cycle() {
    // the cycle-11 line is not a pipeline event, but it still closes
    // cycle 10
    let log = "\
10 | network_0/router_0_0 | BW | Flit 1 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | Starting SAG | Flit 1
";
    let report = run(log, 10, 10);
    assert_eq!(report.num_cycles(), 1);
}

#[test]
fn blank_and_freeform_lines_are_ignored() {
    let log = "\

time 10 inserting packet 1
10 | network_0/router_0_0 | BW | Flit 1 | Input 0 | in vc 0 | PID 1
11 | network_0/router_0_0 | end of trace
";
    let report = run(log, 10, 10);
    assert_eq!(row(&text(&report), "R0 BW I0"), "R0 BW I0; 1; ");
}

#[test]
fn unknown_router_aborts_the_run() {
    let topo = Topology::mesh(1, 1, 1);
    let log = "10 | network_0/router_3_3 | BW | Flit 1 | Input 0 | in vc 0\n";
    let err = reconstruct(
        Cursor::new(log), &topo, Window { start: 0, end: 100 }, 5,
    )
    .unwrap_err();
    assert!(matches!(err, TraceError::UnknownRouter(_)));
}

#[test]
fn multi_router_rows_are_bucketed_by_path() {
    let topo = Topology::mesh(2, 1, 2);
    let log = "\
10 | network_0/router_1_0 | BW | Flit 9 | Input 1 | in vc 0 | PID 4
11 | network_0/router_0_0 | end of trace
";
    let report = reconstruct(
        Cursor::new(log), &topo, Window { start: 10, end: 10 }, 5,
    )
    .unwrap();
    let table = text(&report);
    assert_eq!(row(&table, "R1 BW I1"), "R1 BW I1; 9; ");
    assert_eq!(row(&table, "R0 BW I1"), "R0 BW I1; X; ");
}
