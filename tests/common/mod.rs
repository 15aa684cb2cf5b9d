//! Shared fixtures for integration tests: a throwaway GOROOT/GOPATH on disk.

#![allow(dead_code)]

use std::path::PathBuf;

use pkgextract::environment::Environment;

/// A temporary Go workspace with `goroot/src` and `gopath/src`.
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    /// Creates an empty workspace under the system temp directory.
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("pkgextract_it_{name}"));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("goroot/src")).unwrap();
        std::fs::create_dir_all(root.join("gopath/src")).unwrap();
        Self { root }
    }

    pub fn goroot(&self) -> PathBuf {
        self.root.join("goroot")
    }

    pub fn gopath(&self) -> PathBuf {
        self.root.join("gopath")
    }

    pub fn out(&self) -> PathBuf {
        self.root.join("out")
    }

    pub fn environment(&self) -> Environment {
        Environment {
            goroot: self.goroot(),
            gopath: vec![self.gopath()],
            goos: "linux".into(),
            goarch: "amd64".into(),
            cgo_enabled: true,
            go_minor: 21,
        }
    }

    /// Writes `contents` to `rel`, relative to the workspace root.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    /// Populates a small module graph:
    ///
    /// `example.com/app` imports `example.com/lib` and `fmt`;
    /// `example.com/lib` imports `example.com/util` and `golang.org/x/text`;
    /// `example.com/util` imports `example.com/lib` (a cycle).
    /// `example.com/lib/gen.go` is a `//go:build ignore` generator whose
    /// import does not exist.
    pub fn seed(&self) {
        self.write("goroot/src/fmt/print.go", "package fmt\n\nfunc Println(a ...any) {}\n");
        self.write(
            "gopath/src/example.com/app/main.go",
            "// Command app.\npackage main\n\nimport (\n\t\"fmt\"\n\n\tlib \"example.com/lib\"\n)\n\nfunc main() {\n\tfmt.Println(lib.Name)\n}\n",
        );
        self.write(
            "gopath/src/example.com/lib/lib.go",
            "package lib\n\nimport (\n\t\"example.com/util\"\n\t`golang.org/x/text`\n)\n\nvar Name = util.Upper(text.Hello)\n",
        );
        self.write("gopath/src/example.com/lib/lib_test.go", "package lib\n\nimport \"testing\"\n");
        self.write(
            "gopath/src/example.com/lib/gen.go",
            "//go:build ignore\n\npackage main\n\nimport \"example.com/generator\"\n\nfunc main() { generator.Run() }\n",
        );
        self.write(
            "gopath/src/example.com/util/util.go",
            "package util\n\nimport _ \"example.com/lib\"\n\n// Upper is a stub.\nfunc Upper(s string) string { return s }\n",
        );
        self.write("gopath/src/golang.org/x/text/text.go", "package text\n\nconst Hello = \"hi\"\n");
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

