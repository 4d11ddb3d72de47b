//! Integration tests for the `tripplan` binary.
//!
//! Each test runs the built binary against an isolated temp dir: the config
//! dir and the plan store both live inside it, and no API key is visible.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

use tripplan_store::{FileStore, Plan, PlanId, PlanStore};
use tripplan_test_utils::{sample_outing, sample_trip};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn store_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    fn store(&self) -> PlanStore<FileStore> {
        PlanStore::new(FileStore::open(self.store_path()))
    }

    fn seed(&self, plan: &Plan) -> PlanId {
        self.store().save_plan(plan).unwrap()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_tripplan"))
            .args(args)
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("TRIPPLAN_STORE_PATH", self.store_path())
            .env("RUST_LOG", "off")
            .env_remove("OPENAI_API_KEY")
            .env_remove("TRIPPLAN_BASE_URL")
            .env_remove("TRIPPLAN_MODEL")
            .env_remove("TRIPPLAN_OPENAI_BASE_URL")
            .output()
            .expect("failed to run tripplan binary")
    }

    fn config_file(&self) -> PathBuf {
        self.dir.path().join("config").join("tripplan").join("config.toml")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn id_from_url(url: &str) -> PlanId {
    url.trim().rsplit('/').next().unwrap().parse().unwrap()
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}

// -----------------------------------------------------------------------
// plan list / show
// -----------------------------------------------------------------------

#[test]
fn list_with_empty_store_prints_hint() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["plan", "list"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("No saved plans"));
    assert!(!exists(&sandbox.store_path()), "listing must not create the store");
}

#[test]
fn list_prints_share_urls_in_save_order() {
    let sandbox = Sandbox::new();
    let first = sandbox.seed(&sample_trip());
    let second = sandbox.seed(&sample_outing());

    let out = sandbox.run(&["plan", "list", "--base-url", "https://trips.example.com"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            format!("https://trips.example.com/plans/{first}"),
            format!("https://trips.example.com/plans/{second}"),
        ]
    );
}

#[test]
fn show_renders_trip_as_text() {
    let sandbox = Sandbox::new();
    let id = sandbox.seed(&sample_trip());

    let out = sandbox.run(&["plan", "show", &id.to_string()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Day 1 (2025-06-01)"));
    assert!(text.contains("Fushimi Inari"));
    assert!(text.contains("Stay: Ryokan Sakura"));
    assert!(text.contains("(no activities)"));
}

#[test]
fn show_json_is_the_stored_plan() {
    let sandbox = Sandbox::new();
    let id = sandbox.seed(&sample_outing());

    let out = sandbox.run(&["plan", "show", &id.to_string(), "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let plan: Plan = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(plan, sample_outing());
}

#[test]
fn show_unknown_plan_fails() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["plan", "show", &PlanId::generate().to_string()]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("not found"));
}

// -----------------------------------------------------------------------
// plan edit
// -----------------------------------------------------------------------

#[test]
fn edit_moves_day_and_saves_new_snapshot() {
    let sandbox = Sandbox::new();
    let id = sandbox.seed(&sample_trip());

    let out = sandbox.run(&[
        "plan",
        "edit",
        &id.to_string(),
        r#"{"op":"move_day_down","index":0}"#,
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let url = stdout(&out)
        .trim()
        .strip_prefix("Saved edited plan: ")
        .unwrap()
        .to_string();
    let new_id = id_from_url(&url);

    let store = sandbox.store();
    match store.load_plan(new_id).unwrap() {
        Plan::Trip(trip) => {
            assert_eq!(trip.plan[0].date, "2025-06-02");
            assert_eq!(trip.plan[1].date, "2025-06-01");
        }
        other => panic!("expected trip, got {other:?}"),
    }
    assert_eq!(store.load_plan(id).unwrap(), sample_trip());
    assert_eq!(store.saved_plan_ids().unwrap(), vec![id, new_id]);
}

#[test]
fn edit_out_of_range_fails_without_saving() {
    let sandbox = Sandbox::new();
    let id = sandbox.seed(&sample_trip());

    let out = sandbox.run(&[
        "plan",
        "edit",
        &id.to_string(),
        r#"{"op":"remove_schedule_item","day":5,"item":0}"#,
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("remove_schedule_item"));
    assert_eq!(sandbox.store().saved_plan_ids().unwrap(), vec![id]);
}

// -----------------------------------------------------------------------
// init / generate
// -----------------------------------------------------------------------

#[test]
fn init_writes_config_and_refuses_overwrite() {
    let sandbox = Sandbox::new();

    let out = sandbox.run(&["init", "--api-key", "sk-test-1234567890"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!stdout(&out).contains("sk-test-1234567890"), "key must be masked");

    let contents = std::fs::read_to_string(sandbox.config_file()).unwrap();
    assert!(contents.contains("api_key = \"sk-test-1234567890\""));

    let again = sandbox.run(&["init", "--api-key", "sk-other"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));

    let forced = sandbox.run(&["init", "--api-key", "sk-other", "--force"]);
    assert!(forced.status.success(), "stderr: {}", stderr(&forced));
}

#[test]
fn generate_without_api_key_explains_setup() {
    let sandbox = Sandbox::new();
    let out = sandbox.run(&["generate", "--date", "2025-06-01", "--area", "Ueno"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("OpenAI API key not found"));
}

#[test]
fn generate_reports_missing_fields_before_sending() {
    let sandbox = Sandbox::new();
    // Nothing listens on port 1; validation must fail first.
    let out = sandbox.run(&[
        "generate",
        "--start-date",
        "2025-06-01",
        "--end-date",
        "2025-06-03",
        "--endpoint",
        "http://127.0.0.1:1",
    ]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(
        err.contains("required fields are missing: area, transportation"),
        "got: {err}"
    );
}
