use std::fs;
use std::io::Cursor;
use std::path::Path;

use depmap::export::{self, EdgePolicy, ExportFormat};
use depmap::graph::{BuildOptions, GraphError};
use depmap::pipeline;
use depmap::render::RenderOptions;
use tempfile::TempDir;

const DUMP: &str = r#"{"name": "numpy", "requires_dist": [], "requires_python": ">=3.9"}
{"name": "pandas", "requires_dist": ["numpy (>=1.16.0)", "python-dateutil (>=2.8.2)", "pytz>=2020.1"], "requires_python": ">=3.8"}
{"name": "cash4u", "requires_dist": ["numpy"]}
{"name": "scipy", "requires_dist": ["numpy<2.3,>=1.22.4", "pytest ; extra == \"test\""]}
{"name": "py2app", "requires_dist": ["numpy"]}
{"name": "Flask", "requires_dist": ["Werkzeug>=3.0.0", "click>=8.1.3"]}

{"name": "free-stuff", "requires_dist": ["flask"]}
"#;

fn write_dump(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("deps.jsonl");
    fs::write(&path, DUMP).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn build_writes_numpy_component_as_json() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir);
    let output = dir.path().join("component.json");

    let summary = pipeline::run_build(
        &input,
        "numpy",
        &output,
        ExportFormat::Json,
        BuildOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.stats.records_read, 7);
    assert_eq!(summary.full_nodes, 9);
    assert_eq!(summary.component_nodes, 6);

    let doc = read_json(&output);
    let ids: Vec<&str> = doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["pandas", "numpy", "python-dateutil", "pytz", "scipy", "pytest"]
    );
    assert_eq!(doc["nodes"][1]["usage"], 2);
    assert_eq!(doc["edges"].as_array().unwrap().len(), 5);
}

#[test]
fn build_reports_missing_seed() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir);
    let output = dir.path().join("component.gexf");

    let err = pipeline::run_build(
        &input,
        "tensorflow",
        &output,
        ExportFormat::Gexf,
        BuildOptions::default(),
    )
    .unwrap_err();

    assert_eq!(
        err.downcast_ref::<GraphError>(),
        Some(&GraphError::SeedNotFound("tensorflow".to_string()))
    );
    assert!(!output.exists());
}

#[test]
fn build_aborts_on_malformed_line() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("deps.jsonl");
    fs::write(&input, "{\"name\": \"pandas\", \"requires_dist\": [\"numpy\"]}\n{oops\n").unwrap();

    let result = pipeline::run_build(
        &input,
        "numpy",
        &dir.path().join("out.gexf"),
        ExportFormat::Gexf,
        BuildOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn gexf_layout_round_trip_then_export_and_render() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir);
    let gexf = dir.path().join("pypi_deps.gexf");

    pipeline::run_build(
        &input,
        "numpy",
        &gexf,
        ExportFormat::Gexf,
        BuildOptions::default(),
    )
    .unwrap();

    // Simulate an external layout pass by moving pandas.
    let laid_out = fs::read_to_string(&gexf)
        .unwrap()
        .replacen(
            "<viz:position x=\"0\" y=\"0\" z=\"0\"/>",
            "<viz:position x=\"-42.5\" y=\"17\" z=\"0\"/>",
            1,
        );
    let layout = dir.path().join("g.gexf");
    fs::write(&layout, laid_out).unwrap();

    let json_out = dir.path().join("pypi_data.json");
    let document = pipeline::run_export(&layout, &json_out, EdgePolicy::Reject).unwrap();
    assert_eq!(document.nodes.len(), 6);
    assert_eq!(document.nodes[0].id, "pandas");
    assert_eq!((document.nodes[0].x, document.nodes[0].y), (-42.5, 17.0));

    let bytes = fs::read(&json_out).unwrap();
    let on_disk = export::read_document(ExportFormat::Json, Cursor::new(bytes)).unwrap();
    assert_eq!(on_disk, document);

    let figure_path = dir.path().join("figure.json");
    let frame = pipeline::run_render(
        &layout,
        Some(input.as_path()),
        &figure_path,
        RenderOptions {
            label_threshold: 2,
            ..RenderOptions::default()
        },
        EdgePolicy::AutoRegister,
    )
    .unwrap();

    assert_eq!(frame.len(), 6);
    let numpy = frame.ids.iter().position(|id| id == "numpy").unwrap();
    assert_eq!(frame.text[numpy], "numpy");
    assert_eq!(frame.color[numpy], 3.9);
    let pandas = frame.ids.iter().position(|id| id == "pandas").unwrap();
    assert_eq!(frame.color[pandas], 3.8);
    assert_eq!(frame.text[pandas], "");

    let figure = read_json(&figure_path);
    assert_eq!(figure["data"][0]["x"].as_array().unwrap().len(), 6);
}

#[test]
fn max_records_limits_input() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir);

    let (graph, summary) = pipeline::build_component(
        &input,
        "numpy",
        BuildOptions {
            max_records: Some(2),
        },
    )
    .unwrap();

    assert_eq!(summary.stats.records_read, 2);
    assert_eq!(graph.node_count(), 4);
}
