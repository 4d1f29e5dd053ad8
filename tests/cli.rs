use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TOKENIZE_JSON: &str = r#"{
    "tokens": [
        {"id": 15496, "token_str": "Hello", "token_bytes_hex": "48656c6c6f", "byte_length": 5},
        {"id": 995, "token_str": " world", "token_bytes_hex": "20776f726c64", "byte_length": 6}
    ],
    "token_count": 2,
    "char_count": 11
}"#;

const GROUP_JSON: &str = r#"{
    "base_form": "the",
    "count": 2,
    "variants": [
        {"token_id": 1169, "token_str": "the", "has_space_prefix": false, "casing": "lower", "has_punctuation": false},
        {"token_id": 383, "token_str": " The", "has_space_prefix": true, "casing": "title", "has_punctuation": false}
    ]
}"#;

fn tokensnap_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tokensnap").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    tokensnap_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Export token and variant visualizations as PNG or PDF artifacts",
        ));
}

#[test]
fn export_action_is_required() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("tokens.json");
    std::fs::write(&input, TOKENIZE_JSON).unwrap();

    tokensnap_cmd(&temp)
        .arg("chips")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn copy_and_pdf_conflict() {
    let temp = TempDir::new().unwrap();
    tokensnap_cmd(&temp)
        .args(["chips", "in.json", "--copy", "--pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_input_fails() {
    let temp = TempDir::new().unwrap();
    tokensnap_cmd(&temp)
        .arg("chips")
        .arg(temp.path().join("absent.json"))
        .arg("--pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn card_index_out_of_range_fails() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("group.json");
    std::fs::write(&input, GROUP_JSON).unwrap();

    tokensnap_cmd(&temp)
        .arg("card")
        .arg(&input)
        .args(["--index", "3", "--pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No group at index 3 (1 available)"));
}

#[test]
fn chips_pdf_is_saved_to_out_dir() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("tokens.json");
    std::fs::write(&input, TOKENIZE_JSON).unwrap();
    let out_dir = temp.path().join("out");

    tokensnap_cmd(&temp)
        .arg("chips")
        .arg(&input)
        .args(["--pdf", "--label", "gpt2", "--font-size", "20", "--out-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("tokens.pdf"));

    let pdf = std::fs::read(out_dir.join("tokens.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn card_pdf_uses_configured_save_directory() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("group.json");
    std::fs::write(&input, GROUP_JSON).unwrap();
    let out_dir = temp.path().join("from-config");
    let config_dir = temp.path().join("tokensnap");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("[output]\nsave_directory = {:?}\n", out_dir.display().to_string()),
    )
    .unwrap();

    tokensnap_cmd(&temp)
        .arg("card")
        .arg(&input)
        .arg("--pdf")
        .assert()
        .success();

    assert!(out_dir.join("tokens.pdf").exists());
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "[export]\nlayout = \"wide\"\n").unwrap();

    tokensnap_cmd(&temp)
        .arg("--config")
        .arg(&config)
        .args(["chips", "in.json", "--pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
