//! End-to-end extraction against a Go workspace on disk.

mod common;

use std::sync::Arc;

use pkgextract::closure::{scan, PathFilter, PrefixRenamer};
use pkgextract::context::ServiceContext;
use pkgextract::error::ExtractError;
use pkgextract::extract::{extract_all, extract_all_concurrent, ExtractSummary};
use pkgextract::import_path::ImportPath;

use common::Workspace;

fn scan_app(ctx: &ServiceContext, filter: &PathFilter) -> pkgextract::closure::IdentifierMap {
    scan(ctx.resolver.as_ref(), &ImportPath::from("example.com/app"), filter, &PrefixRenamer::new("v"))
        .expect("scan should succeed")
}

#[test]
fn extracts_closure_with_relocated_imports() {
    let ws = Workspace::new("tree_basic");
    ws.seed();
    let ctx = ServiceContext::live(ws.environment());

    let map = scan_app(&ctx, &PathFilter::non_stdlib());
    let originals: Vec<&str> = map.iter().map(|(o, _)| o.as_str()).collect();
    assert_eq!(
        originals,
        vec!["example.com/app", "example.com/lib", "example.com/util", "golang.org/x/text"]
    );

    let summary = extract_all(&ctx, &map, &ws.out()).unwrap();
    assert_eq!(summary, ExtractSummary { packages: 4, files: 4 });

    let main = ws.read("out/v/example.com/app/main.go");
    assert_eq!(
        main,
        "// Command app.\npackage main\n\nimport (\n\t\"fmt\"\n\n\tlib \"v/example.com/lib\"\n)\n\nfunc main() {\n\tfmt.Println(lib.Name)\n}\n"
    );

    let lib = ws.read("out/v/example.com/lib/lib.go");
    assert!(lib.contains("\t\"v/example.com/util\"\n"));
    assert!(lib.contains("\t\"v/golang.org/x/text\"\n"), "raw literal is re-emitted quoted");
    assert!(!ws.exists("out/v/example.com/lib/lib_test.go"));
    assert!(!ws.exists("out/v/example.com/lib/gen.go"), "ignored file is not part of the package");

    let util = ws.read("out/v/example.com/util/util.go");
    assert!(util.contains("import _ \"v/example.com/lib\"\n"));
    assert!(util.contains("// Upper is a stub.\n"));

    assert!(!ws.exists("out/v/fmt"));
}

#[test]
fn excluded_prefix_stays_external() {
    let ws = Workspace::new("tree_exclude");
    ws.seed();
    let ctx = ServiceContext::live(ws.environment());
    let filter = PathFilter { exclude: vec!["golang.org/x".into()], ..PathFilter::non_stdlib() };

    let map = scan_app(&ctx, &filter);
    assert!(!map.contains(&ImportPath::from("golang.org/x/text")));

    extract_all(&ctx, &map, &ws.out()).unwrap();
    let lib = ws.read("out/v/example.com/lib/lib.go");
    assert!(lib.contains("\t`golang.org/x/text`\n"), "excluded import is left verbatim");
    assert!(!ws.exists("out/v/golang.org"));
}

#[test]
fn rerun_into_fresh_directory_is_byte_identical() {
    let ws = Workspace::new("tree_idempotent");
    ws.seed();
    let ctx = ServiceContext::live(ws.environment());
    let map = scan_app(&ctx, &PathFilter::non_stdlib());

    extract_all(&ctx, &map, &ws.root.join("first")).unwrap();
    extract_all(&ctx, &map, &ws.root.join("second")).unwrap();

    for file in [
        "v/example.com/app/main.go",
        "v/example.com/lib/lib.go",
        "v/example.com/util/util.go",
        "v/golang.org/x/text/text.go",
    ] {
        assert_eq!(ws.read(&format!("first/{file}")), ws.read(&format!("second/{file}")), "{file}");
    }
}

#[test]
fn missing_dependency_fails_the_scan() {
    let ws = Workspace::new("tree_missing");
    ws.seed();
    std::fs::remove_dir_all(ws.gopath().join("src/golang.org")).unwrap();
    let ctx = ServiceContext::live(ws.environment());

    let err = scan(
        ctx.resolver.as_ref(),
        &ImportPath::from("example.com/app"),
        &PathFilter::non_stdlib(),
        &PrefixRenamer::new("v"),
    )
    .unwrap_err();
    match err {
        ExtractError::Resolution { path, message } => {
            assert_eq!(path.as_str(), "golang.org/x/text");
            assert!(message.contains("cannot find package"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_file_aborts_extraction_with_position() {
    let ws = Workspace::new("tree_malformed");
    ws.seed();
    let ctx = ServiceContext::live(ws.environment());
    let map = scan_app(&ctx, &PathFilter::non_stdlib());

    // Break a file after the scan so only extraction sees it.
    ws.write("gopath/src/example.com/util/util.go", "package util\n\nimport \"example.com/lib\n");

    let err = extract_all(&ctx, &map, &ws.out()).unwrap_err();
    match err {
        ExtractError::Parse { file, line, .. } => {
            assert!(file.ends_with("util.go"));
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn concurrent_extraction_writes_same_tree() {
    let ws = Workspace::new("tree_concurrent");
    ws.seed();
    let ctx = Arc::new(ServiceContext::live(ws.environment()));
    let map = scan_app(&ctx, &PathFilter::non_stdlib());

    let sequential = extract_all(&ctx, &map, &ws.root.join("seq")).unwrap();
    let concurrent =
        extract_all_concurrent(Arc::clone(&ctx), Arc::new(map), ws.root.join("par"), 3).await.unwrap();
    assert_eq!(sequential, concurrent);

    for file in ["v/example.com/app/main.go", "v/example.com/lib/lib.go", "v/example.com/util/util.go"] {
        assert_eq!(ws.read(&format!("seq/{file}")), ws.read(&format!("par/{file}")), "{file}");
    }
}
