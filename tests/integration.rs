use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn doci_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("doci");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    // Point the backend at a port nothing listens on: every network path
    // must fail fast and cleanly.
    let config_content = format!(
        r#"[backend]
base_url = "http://127.0.0.1:1"
timeout_secs = 2

[registry]
path = "{}/data/documents.json"

[retrieval]
top_k = 8
qa_top_k = 3
min_confidence = 0.1
recency_days = "30"
"#,
        root.display()
    );

    let config_path = config_dir.join("doci.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn seed_registry(root: &Path) {
    let registry = r#"[
  {
    "doc_id": "doc-newer",
    "original_filename": "master_service_agreement.pdf",
    "created_at": "2024-03-01T00:00:00Z",
    "page_count": 12,
    "ocr_engine": "paddleocr",
    "pdf_render_dpi": 200,
    "preprocess_deskew": true,
    "block_y_gap": 14.0,
    "index": { "chunks_added": 42, "total_chunks": 42 }
  },
  {
    "doc_id": "doc-older",
    "original_filename": "q3_financial_statement.pdf",
    "created_at": "2024-01-01T00:00:00Z",
    "page_count": 5,
    "ocr_engine": "paddleocr",
    "pdf_render_dpi": 200,
    "preprocess_deskew": false,
    "block_y_gap": 14.0,
    "index": { "chunks_added": 9, "total_chunks": 51 }
  }
]"#;
    fs::write(root.join("data").join("documents.json"), registry).unwrap();
}

fn run_doci(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = doci_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run doci binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_docs_empty_registry() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_doci(&config_path, &["docs"]);
    assert!(success, "docs failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("No documents ingested yet"));
}

#[test]
fn test_docs_lists_seeded_registry_newest_first() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());

    let (stdout, _, success) = run_doci(&config_path, &["docs"]);
    assert!(success);
    assert!(stdout.contains("doc-newer"));
    assert!(stdout.contains("doc-older"));
    assert!(stdout.contains("2 of 2 documents"));

    let newer = stdout.find("doc-newer").unwrap();
    let older = stdout.find("doc-older").unwrap();
    assert!(newer < older, "expected newest-first listing: {}", stdout);
}

#[test]
fn test_docs_filter() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());

    let (stdout, _, success) = run_doci(&config_path, &["docs", "--filter", "financial"]);
    assert!(success);
    assert!(stdout.contains("doc-older"));
    assert!(!stdout.contains("doc-newer"));
    assert!(stdout.contains("1 of 2 documents"));

    let (stdout, _, _) = run_doci(&config_path, &["docs", "--filter", "zzz"]);
    assert!(stdout.contains("No documents match the filter."));
}

#[test]
fn test_corrupt_registry_degrades_to_empty() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("data").join("documents.json"),
        "{definitely not json",
    )
    .unwrap();

    let (stdout, stderr, success) = run_doci(&config_path, &["docs"]);
    assert!(
        success,
        "corrupt registry must not fail the command: {}",
        stderr
    );
    assert!(stdout.contains("No documents ingested yet"));
}

#[test]
fn test_search_empty_query_skips_network() {
    let (_tmp, config_path) = setup_test_env();

    // The backend is unreachable, so this only passes if no request is made.
    let (stdout, _, success) = run_doci(&config_path, &["search", "   "]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_search_unreachable_backend_fails_with_fixed_message() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_doci(&config_path, &["search", "anything"]);
    assert!(!success);
    assert!(stderr.contains("Search failed. Check backend connectivity or index state."));
}

#[test]
fn test_qa_empty_question_rejected_before_network() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_doci(&config_path, &["qa", "  "]);
    assert!(!success);
    assert!(stderr.contains("Enter a question"));
}

#[test]
fn test_qa_unreachable_backend_fails_with_fixed_message() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_doci(&config_path, &["qa", "what is the margin?"]);
    assert!(!success);
    assert!(stderr.contains("Failed to retrieve a grounded answer from the backend."));
}

#[test]
fn test_ingest_rejects_non_pdf_before_network() {
    let (tmp, config_path) = setup_test_env();
    let not_pdf = tmp.path().join("notes.txt");
    fs::write(&not_pdf, "plain text").unwrap();

    let (_, stderr, success) = run_doci(&config_path, &["ingest", not_pdf.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Only PDF files are supported."));
}

#[test]
fn test_ingest_unreachable_backend_leaves_registry_untouched() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());
    let registry_path = tmp.path().join("data").join("documents.json");
    let before = fs::read_to_string(&registry_path).unwrap();

    let pdf = tmp.path().join("upload.pdf");
    fs::write(&pdf, b"%PDF-1.4 stub").unwrap();

    let (_, stderr, success) = run_doci(&config_path, &["ingest", pdf.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Upload failed. Check backend connectivity."));

    let after = fs::read_to_string(&registry_path).unwrap();
    assert_eq!(before, after, "failed ingest must not mutate the registry");
}

#[test]
fn test_view_unknown_doc_id() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());

    let (_, stderr, success) = run_doci(&config_path, &["view", "no-such-doc"]);
    assert!(!success);
    assert!(stderr.contains("not in registry"));
}

#[test]
fn test_view_unreachable_backend_fails_with_fixed_message() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());

    let (_, stderr, success) = run_doci(&config_path, &["view", "doc-newer"]);
    assert!(!success);
    assert!(stderr.contains("Unable to load OCR output for this document."));
}

#[test]
fn test_status_reports_offline_backend_and_registry_totals() {
    let (tmp, config_path) = setup_test_env();
    seed_registry(tmp.path());

    let (stdout, _, success) = run_doci(&config_path, &["status"]);
    assert!(success, "status must work without a backend: {}", stdout);
    assert!(stdout.contains("OFFLINE"));
    assert!(stdout.contains("Documents:    2"));
    assert!(stdout.contains("Pages:        17"));
    assert!(stdout.contains("Chunks added: 51"));
    assert!(stdout.contains("Last ingest:  2024-03-01T00:00:00Z"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("nonexistent.toml");

    // `docs` touches neither the network nor a seeded registry, so it
    // must succeed purely on built-in defaults. Run from the temp dir so
    // the default relative registry path resolves somewhere empty.
    let output = Command::new(doci_binary())
        .current_dir(tmp.path())
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("docs")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("No documents"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let (tmp, _) = setup_test_env();
    let bad_config = tmp.path().join("config").join("bad.toml");
    fs::write(
        &bad_config,
        r#"
[retrieval]
min_confidence = 7.5
"#,
    )
    .unwrap();

    let (_, stderr, success) = run_doci(&bad_config, &["docs"]);
    assert!(!success);
    assert!(stderr.contains("min_confidence"));
}
