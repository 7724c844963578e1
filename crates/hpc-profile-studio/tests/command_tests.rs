use hpc_profile_studio::commands::{
    execute_components, execute_csv, execute_dates, execute_map_bar, execute_map_box,
    execute_min_max, execute_report_bar, execute_report_box, execute_scaling, execute_stacked,
    execute_value, ChartOutput, ComponentsArgs, CsvArgs, MapBarArgs, MapBoxArgs, ReportBarArgs,
    ReportBoxArgs, ScaledMetricArgs, ScalingArgs, ValueArgs,
};
use hpc_profile_studio::output::{load_document, write_document};
use hpc_profile_studio::sampling::{MetricField, TimeCategory};
use hpc_profile_studio::scaling::Scaling;
use hpc_profile_studio::series::report::ReportTime;
use hpc_profile_studio::series::ScalingAxis;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn create_test_profile(procs: u64, runtime_ms: u64) -> Value {
    json!({
        "info": {
            "runtime": runtime_ms,
            "number_of_processes": procs,
            "number_of_nodes": 1,
            "metrics": {"num_omp_threads_per_process": {"max": 1}}
        },
        "samples": {
            "count": 3,
            "window_start_offsets": [0, 100, 200],
            "metrics": {
                "memory": {
                    "mins": [1, 2, 3],
                    "maxs": [5, 6, 7],
                    "means": [3, 4, 5],
                    "vars": [0, 0, 0],
                    "sums": [30, 40, 50]
                },
                "cpu_time_percentage": {
                    "mins": [90, 80, 70],
                    "maxs": [100, 100, 100],
                    "means": [95, 90, 85],
                    "vars": [1, 2, 3],
                    "sums": [950, 900, 850]
                }
            },
            "activity": {
                "main_thread": {
                    "normal_compute": [80, 70, 60],
                    "collective_mpi": [20, 30, 40]
                }
            }
        }
    })
}

/// Report started on `day` March 2020 (the 1st was a Sunday)
fn create_test_report(procs: u64, runtime: f64, day: u32) -> Value {
    let weekday = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"][(day as usize - 1) % 7];
    json!({"data": {
        "applicationDetails": {
            "processes": {"plain": procs},
            "ompNumThreads": 1,
            "nodes": {"plain": 1},
            "hostMemory": {"plain": {"value": 64.0}},
            "time": {"plain": runtime},
            "startDate": {"plain": format!("{} Mar {:02} 2020 10:00:00 (UTC)", weekday, day)}
        },
        "overview": {
            "io": {"percent": 10.0},
            "mpi": {"percent": 30.0},
            "cpu": {"percent": 60.0}
        },
        "mpi": {"collectivePercent": 50.0, "p2pPercent": 50.0},
        "io": {"readPercent": 25.0, "writePercent": 75.0},
        "memory": {"mean": 2.0}
    }})
}

/// Write each document into `dir` and a list naming them
fn write_file_list(dir: &Path, name: &str, docs: &[Value]) -> PathBuf {
    let mut lines = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        let path = dir.join(format!("{}_{}.json", name, i));
        write_document(doc, &path).unwrap();
        lines.push(path.display().to_string());
    }

    let list = dir.join(format!("{}.txt", name));
    fs::write(&list, lines.join("\n")).unwrap();
    list
}

fn assert_svg(path: &Path) {
    let svg = fs::read_to_string(path).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_value_writes_selected_subtree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("run.json");
    let output = dir.path().join("info.json");
    write_document(&create_test_profile(2, 300), &input).unwrap();

    execute_value(ValueArgs {
        input,
        fields: vec!["info".to_string(), "number_of_processes".to_string()],
        output: Some(output.clone()),
    })
    .unwrap();

    assert_eq!(load_document(&output).unwrap(), json!(2));
}

#[test]
fn test_value_missing_field_is_not_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("run.json");
    let output = dir.path().join("missing.json");
    write_document(&create_test_profile(2, 300), &input).unwrap();

    execute_value(ValueArgs {
        input,
        fields: vec!["info".to_string(), "nothing".to_string()],
        output: Some(output.clone()),
    })
    .unwrap();

    assert!(!output.exists());
}

#[test]
fn test_csv_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("run.json");
    write_document(&create_test_profile(2, 300), &input).unwrap();

    let (samples, names) = execute_csv(CsvArgs {
        input,
        output: None,
        field: MetricField::Means,
    })
    .unwrap();

    assert_eq!(samples, dir.path().join("run_allsamples.txt"));
    assert_eq!(names, dir.path().join("run_fieldnames.txt"));
    assert_eq!(fs::read_to_string(&samples).unwrap(), "95,90,85\n3,4,5\n");
    assert_eq!(
        fs::read_to_string(&names).unwrap(),
        "cpu_time_percentage\nmemory\n"
    );
}

#[test]
fn test_csv_export_to_named_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("run.json");
    write_document(&create_test_profile(2, 300), &input).unwrap();

    let (samples, names) = execute_csv(CsvArgs {
        input,
        output: Some(dir.path().join("out.csv")),
        field: MetricField::Maxs,
    })
    .unwrap();

    assert_eq!(names, dir.path().join("out_fieldnames.txt"));
    assert_eq!(fs::read_to_string(samples).unwrap(), "100,100,100\n5,6,7\n");
}

#[test]
fn test_map_bar_renders_svg() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "runs",
        &[create_test_profile(2, 300), create_test_profile(4, 200)],
    );

    let output = execute_map_bar(MapBarArgs {
        scaled: ScaledMetricArgs {
            file_list: list,
            metric: "memory".to_string(),
            chart: ChartOutput::new(dir.path().join("bar.svg")),
            ..Default::default()
        },
        ..Default::default()
    })
    .unwrap();

    assert_eq!(output, dir.path().join("bar.svg"));
    assert_svg(&output);
}

#[test]
fn test_map_bar_line_with_expected_scaling() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "runs",
        &[create_test_profile(2, 300), create_test_profile(4, 200)],
    );

    let output = execute_map_bar(MapBarArgs {
        scaled: ScaledMetricArgs {
            file_list: list,
            metric: "memory".to_string(),
            log_y: true,
            chart: ChartOutput::new(dir.path().join("line.svg")),
            ..Default::default()
        },
        line: true,
        expected: Some(Scaling::LinearDecreasing),
    })
    .unwrap();

    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("actual"));
    assert!(svg.contains("linear"));
}

#[test]
fn test_map_bar_unknown_metric_fails() {
    let dir = tempdir().unwrap();
    let list = write_file_list(dir.path(), "runs", &[create_test_profile(2, 300)]);
    let chart = dir.path().join("bar.svg");

    let result = execute_map_bar(MapBarArgs {
        scaled: ScaledMetricArgs {
            file_list: list,
            metric: "no_such_metric".to_string(),
            chart: ChartOutput::new(chart.clone()),
            ..Default::default()
        },
        ..Default::default()
    });

    assert!(result.is_err());
    assert!(!chart.exists());
}

#[test]
fn test_min_max_renders_svg() {
    let dir = tempdir().unwrap();
    let list = write_file_list(dir.path(), "runs", &[create_test_profile(2, 300)]);

    let output = execute_min_max(ScaledMetricArgs {
        file_list: list,
        metric: "cpu_time_percentage".to_string(),
        chart: ChartOutput::new(dir.path().join("min_max.svg")),
        ..Default::default()
    })
    .unwrap();

    assert_svg(&output);
}

#[test]
fn test_map_box_missing_profile_fails() {
    let dir = tempdir().unwrap();
    let list = write_file_list(dir.path(), "runs", &[create_test_profile(2, 300)]);
    let mut text = fs::read_to_string(&list).unwrap();
    text.push_str("\n/nonexistent/run.json\n");
    fs::write(&list, text).unwrap();

    let result = execute_map_box(MapBoxArgs {
        file_list: list,
        category: TimeCategory::Total,
        title: None,
        chart: ChartOutput::new(dir.path().join("box.svg")),
    });

    assert!(result.is_err());
}

#[test]
fn test_report_box_renders_svg() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "reports",
        &[
            create_test_report(2, 100.0, 1),
            create_test_report(2, 110.0, 2),
            create_test_report(4, 60.0, 3),
        ],
    );

    let output = execute_report_box(ReportBoxArgs {
        file_list: list,
        category: ReportTime::Mpi,
        title: Some("MPI time".to_string()),
        chart: ChartOutput::new(dir.path().join("box.svg")),
    })
    .unwrap();

    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("MPI time"));
}

#[test]
fn test_stacked_skips_missing_reports() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "reports",
        &[create_test_report(2, 100.0, 1), create_test_report(4, 60.0, 2)],
    );
    let mut text = fs::read_to_string(&list).unwrap();
    text.push_str("\n/nonexistent/report.json\n");
    fs::write(&list, text).unwrap();

    let output = execute_stacked(
        &list,
        ScalingAxis::Processes,
        &ChartOutput::new(dir.path().join("stacked.svg")),
    )
    .unwrap();

    assert_svg(&output);
}

#[test]
fn test_stacked_with_nothing_readable_fails() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("reports.txt");
    fs::write(&list, "/nonexistent/a.json\n/nonexistent/b.json\n").unwrap();

    let result = execute_stacked(
        &list,
        ScalingAxis::Processes,
        &ChartOutput::new(dir.path().join("stacked.svg")),
    );

    assert!(result.is_err());
}

#[test]
fn test_components_renders_svg() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "reports",
        &[create_test_report(2, 100.0, 1), create_test_report(4, 60.0, 2)],
    );

    let output = execute_components(ComponentsArgs {
        file_list: list,
        axis: ScalingAxis::Processes,
        expected: vec![Scaling::LinearDecreasing, Scaling::Constant],
        chart: ChartOutput::new(dir.path().join("components.svg")),
    })
    .unwrap();

    assert_svg(&output);
}

#[test]
fn test_scaling_label_count_must_match() {
    let dir = tempdir().unwrap();
    let list = write_file_list(dir.path(), "reports", &[create_test_report(2, 100.0, 1)]);

    let result = execute_scaling(ScalingArgs {
        file_lists: vec![list],
        labels: Some(vec!["a".to_string(), "b".to_string()]),
        chart: ChartOutput::new(dir.path().join("scaling.svg")),
        ..Default::default()
    });

    assert_eq!(
        result.unwrap_err().to_string(),
        "2 labels given for 1 file lists"
    );
}

#[test]
fn test_scaling_two_series() {
    let dir = tempdir().unwrap();
    let first = write_file_list(
        dir.path(),
        "first",
        &[create_test_report(2, 100.0, 1), create_test_report(4, 55.0, 2)],
    );
    let second = write_file_list(
        dir.path(),
        "second",
        &[create_test_report(2, 120.0, 3), create_test_report(4, 70.0, 4)],
    );

    let output = execute_scaling(ScalingArgs {
        file_lists: vec![first, second],
        labels: Some(vec!["gcc".to_string(), "icc".to_string()]),
        chart: ChartOutput::new(dir.path().join("scaling.svg")),
        ..Default::default()
    })
    .unwrap();

    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("gcc"));
    assert!(svg.contains("icc"));
}

#[test]
fn test_report_bar_from_metric_file() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "reports",
        &[create_test_report(2, 100.0, 1), create_test_report(4, 60.0, 2)],
    );
    let metric_file = dir.path().join("metrics.txt");
    fs::write(
        &metric_file,
        "data, overview, cpu, percent : CPU\ndata, memory, mean\n",
    )
    .unwrap();

    let output = execute_report_bar(ReportBarArgs {
        file_list: list,
        metric_file,
        axis: ScalingAxis::Processes,
        y_label: "Value".to_string(),
        chart: ChartOutput::new(dir.path().join("report_bar.svg")),
    })
    .unwrap();

    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("CPU"));
    assert!(svg.contains("mean"));
}

#[test]
fn test_dates_renders_svg() {
    let dir = tempdir().unwrap();
    let list = write_file_list(
        dir.path(),
        "reports",
        &[create_test_report(2, 100.0, 9), create_test_report(2, 90.0, 2)],
    );

    let output = execute_dates(
        &list,
        Some("Nightly runs".to_string()),
        &ChartOutput::new(dir.path().join("dates.svg")),
    )
    .unwrap();

    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("Nightly runs"));
}

#[test]
fn test_dates_reject_unparseable_start_date() {
    let dir = tempdir().unwrap();
    let mut report = create_test_report(2, 100.0, 1);
    report["data"]["applicationDetails"]["startDate"]["plain"] = json!("yesterday");
    let list = write_file_list(dir.path(), "reports", &[report]);

    let result = execute_dates(&list, None, &ChartOutput::new(dir.path().join("dates.svg")));
    assert!(result.is_err());
}
