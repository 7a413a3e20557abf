use cirro_run::{stream, CirroRun, Context, RunResult, Runner, StepPayload, Workflow};
use std::path::PathBuf;

struct TestRunner;

#[cirro_run::async_trait]
impl Runner for TestRunner {
  async fn run(&self, _ctx: Context) -> cirro_run::RunResponse {
    let (tx, rx) = stream();
    tx.end(RunResult::Succeeded);
    Ok(rx)
  }
}

fn temp_workspace() -> PathBuf {
  let dir = std::env::temp_dir().join(format!("cirro-cache-ws-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

fn cache_workflow(cirro_run: &CirroRun) -> Workflow {
  let workflow = r#"
jobs:
  check:
    timeout-minutes: 5
    steps:
      - uses: checkout
      - uses: cache
        with:
          path:
            - target
          key:
            prefix: linux-cargo
            files:
              - "**/Cargo.lock"
          restore-keys:
            - linux-cargo-
      - run: cargo test
  "#;

  Workflow::builder()
    .config(workflow)
    .build(cirro_run)
    .unwrap()
}

#[cirro_run_test::test]
async fn test_cache_key_is_content_addressed() {
  let cirro_run = CirroRun::builder().runner(TestRunner).build();
  let workflow = cache_workflow(&cirro_run);

  let job = workflow.jobs.get("check").unwrap();
  let options = match &job.steps[1].payload {
    StepPayload::Cache(options) => options.clone(),
    _ => panic!("Second step should be the cache step"),
  };

  let workspace = temp_workspace();
  std::fs::write(workspace.join("Cargo.lock"), "[[package]]").unwrap();

  // Identical inputs resolve to identical keys
  let first = options.key.resolve(&workspace).unwrap();
  let second = options.key.resolve(&workspace).unwrap();
  assert_eq!(first, second);
  assert!(first.starts_with("linux-cargo-"));

  // Any content difference changes the key
  std::fs::write(workspace.join("Cargo.lock"), "[[package]] changed").unwrap();
  let third = options.key.resolve(&workspace).unwrap();
  assert_ne!(first, third);
}

#[cirro_run_test::test]
async fn test_cache_restore_keys_are_ordered() {
  let cirro_run = CirroRun::builder().runner(TestRunner).build();
  let workflow = cache_workflow(&cirro_run);

  let job = workflow.jobs.get("check").unwrap();

  if let StepPayload::Cache(options) = &job.steps[1].payload {
    assert_eq!(options.path, vec!["target".to_string()]);
    assert_eq!(options.restore_keys, vec!["linux-cargo-".to_string()]);
  } else {
    panic!("Second step should be the cache step");
  }
}

#[cirro_run_test::test]
async fn test_invalid_cache_parameters() {
  let cirro_run = CirroRun::builder().runner(TestRunner).build();

  let workflow = r#"
jobs:
  check:
    steps:
      - uses: cache
        with:
          path: []
          key:
            prefix: linux-cargo
  "#;

  let res = Workflow::builder().config(workflow).build(&cirro_run);

  assert_eq!(
    res.unwrap_err(),
    cirro_run::Error::workflow_config_error("The cache action requires at least one path")
  );
}
