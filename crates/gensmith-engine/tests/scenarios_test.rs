//! End-to-end generator runs: spec YAML in, ordered rendered files out.
//!
//! Uses in-memory sources for the pure pipeline and a temp directory for the
//! load → generate → write path.

use std::fs;
use std::path::{Path, PathBuf};

use gensmith_engine::loader::{load_generator, parse_spec};
use gensmith_engine::{
    run, ErrorKind, Generator, MemorySource, OutputWriter, OverwritePolicy, RenderedFile,
    SuppliedValues,
};

fn values(pairs: &[(&str, &str)]) -> SuppliedValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn paths(files: &[RenderedFile]) -> Vec<PathBuf> {
    files.iter().map(|f| f.path.clone()).collect()
}

#[test]
fn test_plain_variable_target() {
    let spec = parse_spec(
        r#"
templates:
  - source: t.tmpl
    target: "out/{{ name }}.txt"
variables:
  name:
    default: x
"#,
    )
    .unwrap();
    let reader = MemorySource::new().with_file("t.tmpl", "name={{ name }}");

    let files = run(&spec, &SuppliedValues::new(), &reader).unwrap();
    assert_eq!(paths(&files), vec![PathBuf::from("out/x.txt")]);
    assert_eq!(files[0].content, "name=x");
}

#[test]
fn test_iterated_targets_in_item_order() {
    let spec = parse_spec(
        r#"
templates:
  - source: t.tmpl
    target: "out/{{ item }}.txt"
    with_items: [a, b]
"#,
    )
    .unwrap();
    let reader = MemorySource::new().with_file("t.tmpl", "item={{ item }}");

    let files = run(&spec, &SuppliedValues::new(), &reader).unwrap();
    assert_eq!(
        paths(&files),
        vec![PathBuf::from("out/a.txt"), PathBuf::from("out/b.txt")]
    );
    assert_eq!(files[0].content, "item=a");
    assert_eq!(files[1].content, "item=b");
    assert_eq!(files[1].location.item_index, Some(1));
}

#[test]
fn test_missing_required_variable_produces_nothing() {
    let spec = parse_spec(
        r#"
templates:
  - source: t.tmpl
    target: "out/{{ version }}.txt"
variables:
  version:
    pattern: "\\d+\\.\\d+"
"#,
    )
    .unwrap();
    let reader = MemorySource::new().with_file("t.tmpl", "v{{ version }}");

    let err = run(&spec, &SuppliedValues::new(), &reader).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredVariable);
    assert!(err.to_string().contains("version"));
}

#[test]
fn test_templates_render_in_declaration_order() {
    let spec = parse_spec(
        r#"
templates:
  - { source: one.tmpl, target: "1-{{ item }}.txt", with_items: [x, y, z] }
  - { source: two.tmpl, target: "2.txt", condition: "" }
  - { source: one.tmpl, target: "3-{{ item }}.txt", with_items: [p], condition: "{{ item == 'q' }}" }
  - { source: two.tmpl, target: "4.txt" }
"#,
    )
    .unwrap();
    let reader = MemorySource::new()
        .with_file("one.tmpl", "{{ item }}")
        .with_file("two.tmpl", "two");

    let files = run(&spec, &SuppliedValues::new(), &reader).unwrap();
    assert_eq!(
        paths(&files),
        ["1-x.txt", "1-y.txt", "1-z.txt", "2.txt", "4.txt"]
            .into_iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_failure_midway_returns_no_files() {
    let spec = parse_spec(
        r#"
templates:
  - { source: good.tmpl, target: good.txt }
  - { source: missing.tmpl, target: bad.txt }
"#,
    )
    .unwrap();
    let reader = MemorySource::new().with_file("good.tmpl", "ok");

    let err = run(&spec, &SuppliedValues::new(), &reader).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceFileUnavailable);
    assert_eq!(err.location().map(|l| l.template_index), Some(1));
}

#[test]
fn test_structured_items_and_filters() {
    let spec = parse_spec(
        r#"
templates:
  - source: "handlers/{{ lang }}.tmpl"
    target: "src/{{ item.name | snake_case }}.{{ lang }}"
    with_items:
      - { name: CreateOrder, retries: 3 }
      - { name: ShipOrder, retries: 1 }
variables:
  lang:
    pattern: "rs|py"
    default: rs
"#,
    )
    .unwrap();
    let reader = MemorySource::new().with_file(
        "handlers/rs.tmpl",
        "struct {{ item.name | pascal_case }}; // retries: {{ item.retries }}",
    );

    let generator = Generator::new(&spec);
    let bindings = generator.resolve(&SuppliedValues::new()).unwrap();
    let files = generator.generate(&bindings, &reader).unwrap();

    assert_eq!(
        paths(&files),
        vec![
            PathBuf::from("src/create_order.rs"),
            PathBuf::from("src/ship_order.rs")
        ]
    );
    assert_eq!(files[0].content, "struct CreateOrder; // retries: 3");
    assert_eq!(files[0].source, "handlers/rs.tmpl");

    let err = run(&spec, &values(&[("lang", "go")]), &reader).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

fn write_generator(root: &Path) {
    fs::create_dir_all(root.join("templates")).unwrap();
    fs::write(
        root.join("generator-service.yaml"),
        r#"
templates:
  - source: templates/main.tmpl
    target: "{{ name }}/main.txt"
  - source: templates/readme.tmpl
    target: "{{ name }}/README.md"
    condition: "{{ with_readme }}"
variables:
  name:
    description: Service name
    pattern: "[a-z][a-z0-9-]*"
  with_readme:
    default: "no"
"#,
    )
    .unwrap();
    fs::write(root.join("templates/main.tmpl"), "service {{ name }}\n").unwrap();
    fs::write(root.join("templates/readme.tmpl"), "# {{ name }}\n").unwrap();
}

#[test]
fn test_load_generate_and_write() {
    let gen_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    write_generator(gen_dir.path());

    let generator = load_generator(gen_dir.path()).unwrap();
    assert_eq!(generator.name, "service");

    let files = run(
        &generator.spec,
        &values(&[("name", "billing"), ("with_readme", "yes")]),
        &generator.source_reader(),
    )
    .unwrap();
    assert_eq!(files.len(), 2);

    let summary = OutputWriter::new(out_dir.path(), OverwritePolicy::Fail)
        .write_all(&files)
        .unwrap();
    assert_eq!(summary.written.len(), 2);
    assert_eq!(
        fs::read_to_string(out_dir.path().join("billing/main.txt")).unwrap(),
        "service billing\n"
    );
    assert_eq!(
        fs::read_to_string(out_dir.path().join("billing/README.md")).unwrap(),
        "# billing\n"
    );
}

#[test]
fn test_escaping_source_path_is_unavailable() {
    let gen_dir = tempfile::tempdir().unwrap();
    write_generator(gen_dir.path());
    let generator = load_generator(gen_dir.path()).unwrap();

    let spec = parse_spec("templates:\n  - { source: ../outside.tmpl, target: x }\n").unwrap();
    let err = run(&spec, &SuppliedValues::new(), &generator.source_reader()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceFileUnavailable);
}
