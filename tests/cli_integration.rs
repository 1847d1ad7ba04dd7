use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn cinesync(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cinesync").unwrap();
    cmd.current_dir(root)
        .env("HOME", root)
        .env("XDG_CONFIG_HOME", root.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("CINESYNC_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_movies(root: &Path) {
    fs::write(
        root.join("movies.json"),
        r#"[
  {"title": "Inception", "reviews": ["Mind-bending visuals"]},
  {"title": "Barbie", "genres": ["Comedy"]}
]"#,
    )
    .unwrap();
}

#[test]
fn seeding_twice_creates_then_leaves_unchanged() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_movies(temp_dir.path());

    cinesync(temp_dir.path())
        .args(["seed", "movies", "movies.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created: 2."))
        .stdout(predicate::str::contains("Inception"));

    assert!(temp_dir.path().join(".cinesync/data/movies.json").exists());

    cinesync(temp_dir.path())
        .args(["seed", "movies", "movies.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged: 2."))
        .stdout(predicate::str::contains("Created: 0."));
}

#[test]
fn json_report_lists_field_changes() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_movies(temp_dir.path());

    cinesync(temp_dir.path())
        .args(["seed", "movies", "movies.json"])
        .assert()
        .success();

    fs::write(
        temp_dir.path().join("movies.json"),
        r#"[{"title": "Inception", "reviews": ["Mind-bending visuals", "Viewer review"]}]"#,
    )
    .unwrap();

    let report = json_stdout(cinesync(temp_dir.path()).args(["--json", "seed", "movies", "movies.json"]));
    assert_eq!(report["kind"], "field");
    assert_eq!(report["counts"]["updated"], 1);
    assert_eq!(report["entries"][0]["identifier"], "Inception");
    assert_eq!(report["entries"][0]["outcome"], "updated");
}

#[test]
fn dry_run_leaves_the_collection_alone() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_movies(temp_dir.path());

    cinesync(temp_dir.path())
        .args(["--dry-run", "seed", "movies", "movies.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run."));

    assert!(!temp_dir.path().join(".cinesync/data/movies.json").exists());
}

#[test]
fn seeding_only_invalid_records_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("bad.json"),
        r#"[{"title": ""}, {"genres": ["Drama"]}]"#,
    )
    .unwrap();

    cinesync(temp_dir.path())
        .args(["seed", "movies", "bad.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Skipped: 2."));
}

#[test]
fn showrooms_use_their_configured_key() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("showrooms.json"),
        r#"[{"_id": "showroom_1", "showtimes": []}, {"_id": "showroom_2", "showtimes": []}]"#,
    )
    .unwrap();

    let report = json_stdout(cinesync(temp_dir.path()).args([
        "--json",
        "seed",
        "showrooms",
        "showrooms.json",
    ]));
    assert_eq!(report["counts"]["created"], 2);
    assert_eq!(report["entries"][1]["identifier"], "showroom_2");
}

#[test]
fn rewrite_applies_literal_replacements() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("app.env"), "API=http://10.0.0.2:8080\n").unwrap();
    fs::write(
        temp_dir.path().join("targets.json"),
        r#"[
  {"path": "app.env", "replacements": [{"old": "10.0.0.2", "new": "10.0.0.15"}]},
  {"path": "missing.env", "replacements": [{"old": "a", "new": "b"}]}
]"#,
    )
    .unwrap();

    cinesync(temp_dir.path())
        .args(["rewrite", "targets.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated: 1."))
        .stdout(predicate::str::contains("Skipped: 1."));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.env")).unwrap(),
        "API=http://10.0.0.15:8080\n"
    );
}

fn write_project(root: &Path) {
    let front = root.join("cinema-frontend");
    let resources = root.join("backend/src/main/resources");
    fs::create_dir_all(&front).unwrap();
    fs::create_dir_all(&resources).unwrap();
    fs::write(front.join(".env.local"), "NEXT_PUBLIC_API_HOST=10.0.0.2\n").unwrap();
    fs::write(
        resources.join("application.properties"),
        "cors.allowed=http://10.0.0.2:3000\napi.base=http://10.0.0.2:8080\n",
    )
    .unwrap();
}

#[test]
fn host_shows_and_moves_the_network_host() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    cinesync(temp_dir.path())
        .arg("host")
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.0.2"));

    cinesync(temp_dir.path())
        .args(["host", "10.0.0.15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Host updated from 10.0.0.2 to 10.0.0.15"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("cinema-frontend/.env.local")).unwrap(),
        "NEXT_PUBLIC_API_HOST=10.0.0.15\n"
    );
    assert_eq!(
        fs::read_to_string(
            temp_dir
                .path()
                .join("backend/src/main/resources/application.properties")
        )
        .unwrap(),
        "cors.allowed=http://10.0.0.15:3000\napi.base=http://10.0.0.15:8080\n"
    );

    cinesync(temp_dir.path())
        .args(["host", "10.0.0.15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already set"));
}

#[test]
fn invalid_host_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    cinesync(temp_dir.path())
        .args(["host", "not.a.host"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid host format"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("cinema-frontend/.env.local")).unwrap(),
        "NEXT_PUBLIC_API_HOST=10.0.0.2\n"
    );
}

#[test]
fn init_writes_a_config_that_is_then_used() {
    let temp_dir = tempfile::tempdir().unwrap();

    cinesync(temp_dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(temp_dir.path().join("cinesync.json").exists());

    let mut config: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("cinesync.json")).unwrap())
            .unwrap();
    config["data_dir"] = Value::from("store");
    fs::write(temp_dir.path().join("cinesync.json"), config.to_string()).unwrap();

    write_movies(temp_dir.path());
    cinesync(temp_dir.path())
        .args(["seed", "movies", "movies.json"])
        .assert()
        .success();
    assert!(temp_dir.path().join("store/movies.json").exists());

    let shown = json_stdout(cinesync(temp_dir.path()).args(["--json", "config"]));
    assert_eq!(shown["data_dir"], "store");
}

#[test]
fn root_flag_points_at_another_directory() {
    let project = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    write_project(project.path());

    cinesync(elsewhere.path())
        .arg("--root")
        .arg(project.path())
        .args(["--json", "host"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""host": "10.0.0.2""#));
}

#[test]
fn user_emails_match_regardless_of_case() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("admin.json"),
        r#"[{"email": "Admin@Local", "name": "Administrator", "role": "ADMIN"}]"#,
    )
    .unwrap();
    cinesync(temp_dir.path())
        .args(["seed", "users", "admin.json", "--create-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created: 1."));

    fs::write(
        temp_dir.path().join("admin.json"),
        r#"[{"email": "admin@local", "name": "Administrator", "role": "ADMIN"}]"#,
    )
    .unwrap();
    let report = json_stdout(cinesync(temp_dir.path()).args([
        "--json",
        "seed",
        "users",
        "admin.json",
        "--create-only",
    ]));
    assert_eq!(report["counts"]["unchanged"], 1);
    assert_eq!(report["entries"][0]["identifier"], "admin@local");

    let stored: Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join(".cinesync/data/users.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["email"], "admin@local");
}

#[test]
fn dry_run_previews_what_a_real_run_reports() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("movies.json"),
        r#"[{"title": "A", "rating": "PG"}, {"title": "A", "rating": "R"}]"#,
    )
    .unwrap();

    let preview = json_stdout(cinesync(temp_dir.path()).args([
        "--json",
        "--dry-run",
        "seed",
        "movies",
        "movies.json",
    ]));
    let live = json_stdout(cinesync(temp_dir.path()).args(["--json", "seed", "movies", "movies.json"]));

    assert_eq!(live["counts"]["created"], 1);
    assert_eq!(live["counts"]["updated"], 1);
    assert_eq!(preview["counts"], live["counts"]);
}

fn write_network_setup(root: &Path) {
    write_project(root);
    fs::write(
        root.join("cinema-frontend/.env.local"),
        "NEXT_PUBLIC_API_HOST=10.0.0.2\nNEXT_PUBLIC_API_PORT=8080\n",
    )
    .unwrap();
    fs::write(
        root.join("backend/src/main/resources/application.properties"),
        "spring.web.cors.allowed-origins=http://10.0.0.2:3000\n",
    )
    .unwrap();
    fs::write(
        root.join("cinema-frontend/next.config.ts"),
        "export default { allowedDevOrigins: [\"10.0.0.2\"] };\n",
    )
    .unwrap();
}

#[test]
fn verify_passes_on_a_consistent_setup() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_network_setup(temp_dir.path());

    cinesync(temp_dir.path())
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed."));
}

#[test]
fn verify_fails_after_the_host_drifts() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_network_setup(temp_dir.path());
    fs::write(
        temp_dir.path().join("cinema-frontend/.env.local"),
        "NEXT_PUBLIC_API_HOST=10.0.0.9\nNEXT_PUBLIC_API_PORT=8080\n",
    )
    .unwrap();

    cinesync(temp_dir.path())
        .arg("verify")
        .assert()
        .failure()
        .stdout(predicate::str::contains("CORS: missing 10.0.0.9:3000"));
}
