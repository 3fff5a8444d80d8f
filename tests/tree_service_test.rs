//! Integration tests for TreeService: build, persist and inspect tree files.

use std::fs;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use bintree::application::ApplicationError;
use bintree::config::{RandomConfig, Settings};
use bintree::domain::{DomainError, ListSource, Scalar};
use bintree::infrastructure::di::ServiceContainer;
use bintree::infrastructure::traits::RealFileSystem;
use bintree::infrastructure::StoreError;
use bintree::util::testing::{init_test_setup, quiet_settings, tree_path};

fn container(settings: Settings) -> ServiceContainer {
    init_test_setup();
    ServiceContainer::with_deps(settings, Arc::new(RealFileSystem))
}

fn floats(values: &[f64]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Float(v)).collect()
}

// ============================================================
// Random generation
// ============================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
#[case(20)]
#[case(150)]
fn given_node_count_when_generating_then_file_holds_exactly_that_many(#[case] nodes: usize) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "random");
    let ctx = container(Settings {
        random: RandomConfig { min: 0, max: 9 },
        ..quiet_settings()
    });

    // Act
    let report = ctx.trees.generate_random(nodes, &path).unwrap();

    // Assert
    assert_eq!(report.nodes, nodes);
    assert!(!report.is_truncated());
    assert_eq!(ctx.trees.count_nodes(&path).unwrap(), nodes);
    let values = ctx.trees.values(&path).unwrap();
    assert_eq!(values.len(), nodes, "every node carries a value");
    assert!(values
        .iter()
        .all(|v| matches!(v, Scalar::Int(i) if (0..=9).contains(i))));
}

#[test]
fn given_zero_nodes_when_generating_then_rejected_and_nothing_written() {
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "zero");
    let ctx = container(quiet_settings());

    let result = ctx.trees.generate_random(0, &path);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::ZeroNodes))
    ));
    assert!(!path.exists());
}

// ============================================================
// Flat list construction
// ============================================================

#[test]
fn given_short_list_when_building_then_tree_is_truncated() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "short");
    let ctx = container(quiet_settings());
    let mut source = ListSource::new(floats(&[1.0, 2.0, 3.0]));

    // Act
    let report = ctx.trees.build(5, &mut source, &path).unwrap();

    // Assert
    assert!(report.is_truncated());
    assert_eq!(report.nodes, 3);
    assert_eq!(ctx.trees.count_nodes(&path).unwrap(), 3);
}

#[test]
fn given_level_order_list_when_inspecting_then_draws_tree_and_max() {
    //        5
    //      /   \
    //     9     3
    //    /
    //   7
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "small");
    let ctx = container(quiet_settings());
    let mut source = ListSource::new(floats(&[5.0, 9.0, 3.0, 7.0]));
    ctx.trees.build(4, &mut source, &path).unwrap();

    let inspection = ctx.trees.inspect(&path).unwrap();

    assert_eq!(inspection.nodes, 4);
    assert_eq!(inspection.max_internal, 9.0);
    let drawing = inspection.rendering.expect("small tree is drawn");
    let lines: Vec<&str> = drawing.lines().collect();
    assert_eq!(lines, vec!["5.0", "├── 9.0", "│   └── 7.0", "└── 3.0"]);
}

#[test]
fn given_tree_above_display_limit_when_inspecting_then_drawing_skipped() {
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "large");
    let ctx = container(quiet_settings());
    ctx.trees.generate_random(21, &path).unwrap();

    let inspection = ctx.trees.inspect(&path).unwrap();

    assert_eq!(inspection.nodes, 21);
    assert!(inspection.rendering.is_none());
    assert!(inspection.max_internal.is_finite());
}

#[test]
fn given_single_node_when_computing_max_then_negative_infinity() {
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "single");
    let ctx = container(quiet_settings());
    let mut source = ListSource::new(floats(&[42.0]));
    ctx.trees.build(1, &mut source, &path).unwrap();

    let max = ctx.trees.max_internal(&path).unwrap();

    assert_eq!(max, f64::NEG_INFINITY);
}

// ============================================================
// Damaged files
// ============================================================

#[test]
fn given_file_without_root_when_inspecting_then_corrupt_tree() {
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "noroot");
    fs::write(&path, "[trunk]\nvalue = 1\n").unwrap();
    let ctx = container(quiet_settings());

    let result = ctx.trees.inspect(&path);

    assert!(matches!(result, Err(ApplicationError::CorruptTree { .. })));
}

#[test]
fn given_hand_written_file_with_gaps_when_reading_then_tolerates_missing_values() {
    // Arrange: the left child has no value, the right child a string
    let temp = TempDir::new().unwrap();
    let path = tree_path(temp.path(), "gaps");
    let content = r#"
[root]
value = 4

[root.left]

[root.left.left]
value = 8

[root.right]
value = "x"
"#;
    fs::write(&path, content).unwrap();
    let ctx = container(quiet_settings());

    // Act
    let inspection = ctx.trees.inspect(&path).unwrap();
    let values = ctx.trees.values(&path).unwrap();

    // Assert
    assert_eq!(inspection.nodes, 4);
    assert_eq!(inspection.max_internal, 4.0);
    assert!(inspection.rendering.unwrap().contains("(empty)"));
    assert_eq!(
        values,
        vec![Scalar::Int(4), Scalar::Int(8), Scalar::Text("x".into())]
    );
}

#[test]
fn given_missing_file_when_inspecting_then_io_error() {
    let temp = TempDir::new().unwrap();
    let ctx = container(quiet_settings());

    let result = ctx.trees.inspect(&temp.path().join("absent.toml"));

    assert!(matches!(
        result,
        Err(ApplicationError::Store(StoreError::Io { .. }))
    ));
}
