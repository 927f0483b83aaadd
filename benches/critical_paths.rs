//! Criterion benchmarks for felib-build critical paths
//!
//! Benchmarks the operations that run once per component or per compile:
//! - Scanner: recursive source discovery
//! - Naming: identifier and module name derivation
//! - Manifest: scanning and rendering `js.txt` / `css.txt`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use felib_build::build::manifest::{write_manifests, AssetKind, Manifest};
use felib_build::build::naming::{camel_case, ComponentName};
use felib_build::build::scanner::scan_files;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Create `n` component sources spread over nested directories.
fn make_source_tree(n: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    for i in 0..n {
        let dir = temp.path().join(format!("group{}/widget-{}", i % 8, i));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.vue"), "<template><div/></template>").unwrap();
        fs::write(dir.join("README.md"), "docs").unwrap();
    }
    temp
}

/// Create a target directory with `n` compiled components.
fn make_target_dir(n: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    for kind in AssetKind::ALL {
        let dir = temp.path().join(kind.dir_name());
        fs::create_dir_all(&dir).unwrap();
        for i in 0..n {
            fs::write(dir.join(format!("widget{}{}", i, kind.suffix())), "").unwrap();
        }
    }
    temp
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");

    for size in [10, 100, 500].iter() {
        let tree = make_source_tree(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("scan_files", size), tree.path(), |b, root| {
            b.iter(|| scan_files(black_box(root), black_box(root), ".vue").unwrap())
        });
    }

    group.finish();
}

fn bench_naming(c: &mut Criterion) {
    let mut group = c.benchmark_group("naming");

    let shallow = PathBuf::from("navbar/template.vue");
    let deep = PathBuf::from("forms/inputs/text-field/variants/outlined/index.vue");
    group.bench_function("from_source_path_shallow", |b| {
        b.iter(|| ComponentName::from_source_path(black_box(&shallow)))
    });
    group.bench_function("from_source_path_deep", |b| {
        b.iter(|| ComponentName::from_source_path(black_box(&deep)))
    });
    group.bench_function("camel_case", |b| {
        b.iter(|| camel_case(black_box("forms-inputs-text_field-variants-outlined")))
    });

    group.finish();
}

fn bench_manifest(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest");

    for size in [10, 100, 500].iter() {
        let target = make_target_dir(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("scan", size), target.path(), |b, dir: &Path| {
            b.iter(|| Manifest::scan(black_box(dir), AssetKind::Script).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("write", size), target.path(), |b, dir: &Path| {
            b.iter(|| write_manifests(black_box(dir), "<!-- auto generated by build -->").unwrap())
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_scanner, bench_naming, bench_manifest);

criterion_main!(benches);
