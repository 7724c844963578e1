use hpc_profile_studio::sampling::{
    lustre_integrals, time_secs, IndexWindow, MetricField, SamplingProfile, TimeCategory,
};
use hpc_profile_studio::series::sampling::{
    activity_timeline, metric_across_files, metric_summary_by_scale, min_mean_max_by_scale,
    times_by_processes, Summary,
};
use hpc_profile_studio::series::ScalingAxis;
use hpc_profile_studio::utils::ProfileError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;

fn create_test_profile(procs: u64, threads: u64, runtime_ms: u64, scale: f64) -> SamplingProfile {
    let means: Vec<f64> = [1.0, 2.0, 3.0, 4.0].iter().map(|v| v * scale).collect();
    let mins: Vec<f64> = means.iter().map(|v| v - 1.0).collect();
    let maxs: Vec<f64> = means.iter().map(|v| v + 1.0).collect();
    let totals: Vec<f64> = [0.0, 10.0, 30.0, 60.0].iter().map(|v| v * scale).collect();

    SamplingProfile::new(json!({
        "info": {
            "runtime": runtime_ms,
            "number_of_processes": procs,
            "number_of_nodes": 2,
            "metrics": {"num_omp_threads_per_process": {"max": threads}}
        },
        "samples": {
            "count": 4,
            "window_start_offsets": [0, 500, 1000, 1500],
            "metrics": {
                "cpu_time_percentage": {
                    "mins": mins,
                    "maxs": maxs,
                    "means": means,
                    "vars": [0, 0, 0, 0],
                    "sums": means
                },
                "wchar_total": {
                    "mins": totals,
                    "maxs": totals,
                    "means": totals,
                    "vars": [0, 0, 0, 0],
                    "sums": totals
                },
                "lustre_bytes_read": {
                    "mins": [0, 0, 0, 0],
                    "maxs": [0, 0, 0, 0],
                    "means": [50, 50, 0, 0],
                    "vars": [0, 0, 0, 0],
                    "sums": [0, 0, 0, 0]
                },
                "lustre_rchar_total": {
                    "mins": [0, 0, 0, 0],
                    "maxs": [0, 0, 0, 0],
                    "means": [0, 0, 0, 0],
                    "vars": [0, 0, 0, 0],
                    "sums": [50, 100, 100, 100]
                },
                "lustre_bytes_written": {
                    "mins": [1, 1, 1, 1],
                    "maxs": [1, 1, 1, 1],
                    "means": [100, 100, 100, 100],
                    "vars": [0, 0, 0, 0],
                    "sums": [200, 200, 200, 200]
                },
                "lustre_wchar_total": {
                    "mins": [0, 0, 0, 0],
                    "maxs": [0, 0, 0, 0],
                    "means": [0, 0, 0, 0],
                    "vars": [0, 0, 0, 0],
                    "sums": [0, 100, 200, 400]
                }
            },
            "activity": {
                "main_thread": {
                    "normal_compute": [50, 50, 50, 50],
                    "openmp": [10, 10, 10, 10],
                    "collective_mpi": [20, 20, 20, 20],
                    "point_to_point_mpi": [5, 5, 5, 5],
                    "io_reads": [10, 10, 10, 10],
                    "io_writes": [5, 5, 5, 5]
                }
            }
        }
    }))
}

#[test]
fn test_absent_activity_category_is_skipped() {
    let profile = create_test_profile(1, 1, 2000, 1.0);

    // No accelerator data was recorded: skipped, not treated as zeros
    let series = profile
        .activity_samples("main_thread", &["normal_compute", "accelerator"])
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].0, "normal_compute");

    assert!(profile.accelerator_activity("main_thread").unwrap().is_empty());
    assert_eq!(profile.mpi_activity("main_thread").unwrap(), vec![25.0; 4]);
    assert_eq!(profile.io_activity("main_thread").unwrap(), vec![15.0; 4]);
}

#[test]
fn test_missing_timeline_gives_empty_series() {
    let profile = create_test_profile(1, 1, 2000, 1.0);
    assert!(profile.cpu_activity("worker_thread").unwrap().is_empty());
}

#[test]
fn test_activity_timeline_order() {
    let profile = create_test_profile(1, 1, 2000, 1.0);
    let timeline = activity_timeline(&profile).unwrap();

    let labels: Vec<&str> = timeline.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["cpu", "io", "openmp", "mpi"]);
    assert_eq!(timeline[2].1, vec![10.0; 4]);
}

#[test]
fn test_time_categories() {
    let profile = create_test_profile(4, 1, 2000, 1.0);

    assert_eq!(time_secs(&profile, TimeCategory::Total).unwrap(), 2.0);
    assert_eq!(time_secs(&profile, TimeCategory::Cpu).unwrap(), 1.0);
    assert_eq!(time_secs(&profile, TimeCategory::Mpi).unwrap(), 0.5);
    assert!((time_secs(&profile, TimeCategory::Io).unwrap() - 0.3).abs() < 1e-9);
    assert!((time_secs(&profile, TimeCategory::NonSleeping).unwrap() - 1.8).abs() < 1e-9);
}

#[test]
fn test_times_grouped_by_processes() {
    let a = create_test_profile(2, 1, 4000, 1.0);
    let b = create_test_profile(2, 1, 3000, 1.0);
    let c = create_test_profile(8, 1, 1000, 1.0);

    let grouped = times_by_processes(&[&a, &b, &c], TimeCategory::Total).unwrap();
    assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![2, 8]);
    assert_eq!(grouped[&2], vec![4.0, 3.0]);
    assert_eq!(grouped[&8], vec![1.0]);
}

#[test]
fn test_metric_average_by_scale() {
    let a = create_test_profile(4, 1, 2000, 1.0);
    let b = create_test_profile(2, 1, 2000, 2.0);
    let sources = [(Path::new("a.json"), &a), (Path::new("b.json"), &b)];

    let averages = metric_summary_by_scale(
        &sources,
        "cpu_time_percentage",
        ScalingAxis::Processes,
        IndexWindow::all(),
        Summary::Average,
    )
    .unwrap();

    assert_eq!(averages.keys().copied().collect::<Vec<_>>(), vec![2, 4]);
    assert_eq!(averages[&2], 5.0);
    assert_eq!(averages[&4], 2.5);
}

#[test]
fn test_metric_total_over_window() {
    let a = create_test_profile(4, 2, 2000, 1.0);
    let sources = [(Path::new("a.json"), &a)];

    let totals = metric_summary_by_scale(
        &sources,
        "wchar_total",
        ScalingAxis::Threads,
        IndexWindow::new(1, Some(3)),
        Summary::Total,
    )
    .unwrap();

    assert_eq!(totals[&2], 50.0);
}

#[test]
fn test_min_mean_max_by_scale() {
    let a = create_test_profile(4, 1, 2000, 1.0);
    let sources = [(Path::new("a.json"), &a)];

    let stats = min_mean_max_by_scale(
        &sources,
        "cpu_time_percentage",
        ScalingAxis::Processes,
        IndexWindow::all(),
        Summary::Average,
    )
    .unwrap();

    assert_eq!(stats[&4], [1.5, 2.5, 3.5]);
}

#[test]
fn test_unknown_metric_names_file() {
    let a = create_test_profile(4, 1, 2000, 1.0);
    let sources = [(Path::new("runs/a.json"), &a)];

    let err = metric_across_files(&sources, "no_such_metric", false).unwrap_err();
    assert!(matches!(err, ProfileError::MetricNotFound { .. }));
    assert_eq!(
        err.to_string(),
        "Unable to find metric no_such_metric in JSON profile runs/a.json"
    );
}

#[test]
fn test_metric_across_files_by_processes() {
    let a = create_test_profile(8, 1, 2000, 1.0);
    let b = create_test_profile(2, 1, 4000, 1.0);
    let sources = [(Path::new("a.json"), &a), (Path::new("b.json"), &b)];

    let runs = metric_across_files(&sources, "normal_compute", true).unwrap();
    let keys: Vec<&str> = runs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["2", "8"]);
    assert_eq!(runs[0].1.samples, vec![50.0; 4]);
    assert_eq!(runs[0].1.x_values(true), vec![0.0, 1000.0, 2000.0, 3000.0]);
}

#[test]
fn test_metric_field_lookup() {
    let profile = create_test_profile(1, 1, 2000, 1.0);
    assert_eq!(
        profile
            .metric_field("cpu_time_percentage", MetricField::Maxs)
            .unwrap(),
        vec![2.0, 3.0, 4.0, 5.0]
    );
}

#[test]
fn test_lustre_integrals() {
    let profile = create_test_profile(1, 1, 2000, 1.0);
    let integrals = lustre_integrals(&profile, "a.json").unwrap();

    // 0.5 s windows on 2 nodes
    assert_eq!(integrals.read_approx, vec![50.0, 100.0, 100.0, 100.0]);
    assert_eq!(integrals.read_actual, vec![50.0, 100.0, 100.0, 100.0]);
    assert_eq!(integrals.write_approx, vec![100.0, 200.0, 300.0, 400.0]);
    assert_eq!(integrals.write_actual, vec![0.0, 100.0, 200.0, 400.0]);
}

#[test]
fn test_lustre_integrals_need_every_metric() {
    let mut doc = create_test_profile(1, 1, 2000, 1.0).into_document();
    doc["samples"]["metrics"]
        .as_object_mut()
        .unwrap()
        .remove("lustre_rchar_total");

    let err = lustre_integrals(&SamplingProfile::new(doc), "a.json").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to find metric lustre_rchar_total in JSON profile a.json"
    );
}
