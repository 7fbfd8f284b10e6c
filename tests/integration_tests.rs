//! End-to-end tests driving the built binary against a mocked registry.

use std::process::{Command, Output};

/// Run the binary with the given args, pointing the registry client at
/// `registry_url`.
fn run_fetch_hashes(registry_url: &str, args: &[&str]) -> Output {
    let bin_path = env!("CARGO_BIN_EXE_fetch-hashes");
    Command::new(bin_path)
        .args(args)
        .env("FETCH_HASHES_REGISTRY_URL", registry_url)
        .output()
        .expect("failed to run fetch-hashes")
}

fn mock_glass_registry(server: &mut mockito::ServerGuard) {
    let listing = r#"{
        "repo": "release",
        "path": "/edu/wpi/first/tools/Glass/2025.1.1",
        "children": [
            {"uri": "/Glass-2025.1.1-winarm64.zip", "folder": false},
            {"uri": "/Glass-2025.1.1-macarm64.zip", "folder": false},
            {"uri": "/Glass-2025.1.1-linux.zip", "folder": false},
            {"uri": "/Glass-2025.1.1.pom", "folder": false}
        ]
    }"#;
    server
        .mock("GET", "/release/edu/wpi/first/tools/Glass/2025.1.1")
        .with_header("content-type", "application/json")
        .with_body(listing)
        .expect_at_least(1)
        .create();

    // Hex SHA-256 of the empty input for macarm64, of "linux" content below
    for (file, sha256) in [
        (
            "Glass-2025.1.1-macarm64.zip",
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        (
            "Glass-2025.1.1-linux.zip",
            "caf90169eefa5f807d577486b9f795ab86ae2983c5c20806cff959117e90af18",
        ),
    ] {
        let body = format!(
            r#"{{"downloadUri": "https://example.test/{file}",
                 "mimeType": "application/zip",
                 "size": "1024",
                 "checksums": {{"sha1": "", "md5": "", "sha256": "{sha256}"}}}}"#
        );
        server
            .mock(
                "GET",
                format!("/release/edu/wpi/first/tools/Glass/2025.1.1/{file}").as_str(),
            )
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect_at_least(1)
            .create();
    }
}

#[test]
fn test_help_runs() {
    let output = run_fetch_hashes("http://127.0.0.1:1", &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--tool"));
}

#[test]
fn test_maven_path_renders_sorted_block() {
    let mut server = mockito::Server::new();
    mock_glass_registry(&mut server);

    let output = run_fetch_hashes(
        &server.url(),
        &[
            "--tool",
            "Glass",
            "--branch",
            "release",
            "--version",
            "2025.1.1",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // Sorted by platform, windows and .pom excluded, trailing blank line
    assert_eq!(
        stdout,
        "Glass (2025.1.1):\n\
         artifactHashes = {\n  \
           linux = \"sha256-yvkBae76X4B9V3SGufeVq4auKYPFwggGz/lZEX6Qrxg=\";\n  \
           macarm64 = \"sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=\";\n\
         };\n\n"
    );
}

#[test]
fn test_runs_are_byte_identical() {
    let mut server = mockito::Server::new();
    mock_glass_registry(&mut server);

    let args = [
        "--tool",
        "Glass",
        "--branch",
        "release",
        "--version",
        "2025.1.1",
    ];
    let first = run_fetch_hashes(&server.url(), &args);
    let second = run_fetch_hashes(&server.url(), &args);

    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_registry_404_fails_without_output() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/release/edu/wpi/first/tools/Glass/2025.1.1")
        .with_status(404)
        .create();

    let output = run_fetch_hashes(
        &server.url(),
        &[
            "--tool",
            "Glass",
            "--branch",
            "release",
            "--version",
            "2025.1.1",
        ],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(" = \""));
}

#[test]
fn test_unknown_github_tool_fails() {
    let output = run_fetch_hashes(
        "http://127.0.0.1:1",
        &[
            "--tool",
            "NotARealTool",
            "--version",
            "1.0.0",
            "--type",
            "github",
        ],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown tool"));
}

#[test]
fn test_maven_path_without_branch_fails() {
    let output = run_fetch_hashes(
        "http://127.0.0.1:1",
        &["--tool", "Glass", "--version", "2025.1.1"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--branch"));
}
