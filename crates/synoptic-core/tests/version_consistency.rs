//! Every workspace member inherits the workspace version, and the internal
//! dependency pins follow it.

use std::path::{Path, PathBuf};

const MEMBERS: [&str; 3] = [
    "crates/synoptic-core",
    "crates/synoptic-store",
    "crates/synoptic-cli",
];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("workspace root above crates/synoptic-core")
        .to_path_buf()
}

fn manifest(dir: &Path) -> toml::Value {
    let text = std::fs::read_to_string(dir.join("Cargo.toml"))
        .unwrap_or_else(|e| panic!("reading {}: {e}", dir.display()));
    text.parse()
        .unwrap_or_else(|e| panic!("parsing {}: {e}", dir.display()))
}

fn workspace_version() -> String {
    manifest(&workspace_root())["workspace"]["package"]["version"]
        .as_str()
        .expect("workspace.package.version")
        .to_string()
}

#[test]
fn members_inherit_workspace_version() {
    let root = workspace_root();
    for member in MEMBERS {
        let doc = manifest(&root.join(member));
        let inherits = doc["package"]["version"]
            .get("workspace")
            .and_then(toml::Value::as_bool);
        assert_eq!(
            inherits,
            Some(true),
            "{member} must declare version.workspace = true"
        );
    }
}

#[test]
fn workspace_members_list_matches() {
    let doc = manifest(&workspace_root());
    let listed: Vec<&str> = doc["workspace"]["members"]
        .as_array()
        .expect("workspace.members")
        .iter()
        .filter_map(toml::Value::as_str)
        .collect();
    assert_eq!(listed, MEMBERS);
}

#[test]
fn internal_pins_follow_workspace_version() {
    let version = workspace_version();
    let doc = manifest(&workspace_root());
    for name in ["synoptic-core", "synoptic-store"] {
        let pinned = doc["workspace"]["dependencies"][name]["version"]
            .as_str()
            .unwrap_or_default();
        assert_eq!(pinned, version, "workspace dependency {name}");
    }
}

#[test]
fn compiled_version_matches_workspace() {
    assert_eq!(env!("CARGO_PKG_VERSION"), workspace_version());
    assert_eq!(synoptic_core::VERSION, workspace_version());
}
