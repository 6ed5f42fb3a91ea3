//! End-to-end runs of the `merchant` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn merchant(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("merchant.toml");
    if !config.exists() {
        std::fs::write(
            &config,
            format!("cache_dir = {:?}\n", dir.join("cache").display().to_string()),
        )
        .unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_merchant"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_catalog(dir: &Path) -> String {
    let path = dir.join("catalog.json");
    std::fs::write(
        &path,
        r#"[
  {
    "id": 1,
    "title": "Shirt",
    "variants": [
      { "id": 10, "product_id": 1, "sku": "SHIRT-S", "option1": "S" },
      { "id": 11, "product_id": 1, "sku": "SHIRT-M", "option1": "M" }
    ]
  }
]"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let out = merchant(dir.path(), &["version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("merchant "));
}

#[test]
fn test_count_json() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let out = merchant(dir.path(), &["count", "--catalog", &catalog, "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["products"], 1);
    assert_eq!(json["variants"], 2);
}

#[test]
fn test_verify_clean_catalog() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let out = merchant(dir.path(), &["verify", "--catalog", &catalog]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "Everything looks good!"
    );
}

#[test]
fn test_unknown_variant_fails_without_changes() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let before = std::fs::read_to_string(&catalog).unwrap();
    let edits = dir.path().join("edits.csv");
    std::fs::write(&edits, "Variant ID,SKU,Title\n99,SHIRT-L,Shirt\n").unwrap();

    let out = merchant(
        dir.path(),
        &["push", "--catalog", &catalog, edits.to_str().unwrap()],
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("(error)"));
    assert_eq!(std::fs::read_to_string(&catalog).unwrap(), before);
}

#[test]
fn test_missing_catalog_json_error() {
    let dir = TempDir::new().unwrap();
    let out = merchant(dir.path(), &["count", "--catalog", "missing.json", "--json"]);
    assert!(!out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert!(json["error"].as_str().unwrap().contains("missing.json"));
}
