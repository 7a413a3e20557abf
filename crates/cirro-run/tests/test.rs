use cirro_run::{
  stream, Action, ActionSteps, CirroRun, Context, JobId, Plugin, RunResult, Runner, Signal,
  StepPayload, UserCommandStep, UserStep, Workflow, WorkflowLog, WorkflowState,
};
use parking_lot::Mutex;

struct TestRunner;

impl TestRunner {
  fn new() -> Self {
    TestRunner
  }
}

#[cirro_run::async_trait]
impl Runner for TestRunner {
  async fn run(&self, ctx: Context) -> cirro_run::RunResponse {
    let (tx, rx) = stream();

    let run = match ctx.command.payload {
      StepPayload::Run(run) => run,
      StepPayload::Checkout(_) => "checkout".to_string(),
      StepPayload::Cache(_) => "cache".to_string(),
    };

    match run.as_str() {
      "throw-error" => return Err(cirro_run::Error::internal_runtime_error(0)),
      "fail" => {
        tx.error(run);
        tx.end(RunResult::Failed { exit_code: 1 });
      }
      "wait-for-signal" => {
        tokio::task::spawn(async move {
          tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(10)) => {
              tx.end(RunResult::Succeeded);
            }
            signal = ctx.signal.recv() => {
              match signal {
                Signal::Cancel => tx.cancelled(),
                Signal::Timeout => tx.timeout(),
              }
            }
          }
        });
      }
      _ => {
        tx.log(run);
        tx.end(RunResult::Succeeded);
      }
    }

    Ok(rx)
  }
}

struct AssertLogsPlugin {
  excepted_logs: Vec<&'static str>,
  index: Mutex<usize>,
}

impl AssertLogsPlugin {
  fn new(excepted_logs: Vec<&'static str>) -> Self {
    AssertLogsPlugin {
      excepted_logs,
      index: Mutex::new(0),
    }
  }
}

impl Plugin for AssertLogsPlugin {
  fn name(&self) -> &'static str {
    "test-plugin"
  }

  fn on_log(&self, log: WorkflowLog) {
    let mut i = self.index.lock();
    assert_eq!(log.message, self.excepted_logs[*i]);
    *i += 1;
  }
}

#[cirro_run_test::test]
async fn test_full_features() {
  let workflow = r#"
on: [push]

jobs:
  test:
    name: Test Job
    runs-on: host
    timeout-minutes: 5
    env:
      CI: true
    steps:
      - name: Step
        continue-on-error: false
        env:
          name: value
        timeout: 60m
        run: Hello World
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec!["Hello World"]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Succeeded);
  let job_result = res.jobs.get("test").unwrap();
  assert_eq!(job_result.state, WorkflowState::Succeeded);
  assert_eq!(job_result.steps.len(), 1);

  assert_eq!(job_result.steps[0].state, WorkflowState::Succeeded);
}

#[cirro_run_test::test]
async fn test_failed_step_fails_fast() {
  let workflow = r#"
jobs:
  test:
    steps:
      - run: fail
      - run: Hello World2
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec!["fail"]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Failed);
  let job_result = res.jobs.get("test").unwrap();
  assert_eq!(job_result.state, WorkflowState::Failed);
  assert_eq!(job_result.steps.len(), 2);

  assert_eq!(job_result.steps[0].state, WorkflowState::Failed);
  assert_eq!(job_result.steps[0].exit_code, Some(1));
  assert_eq!(job_result.steps[1].state, WorkflowState::Skipped);
}

#[cirro_run_test::test]
async fn test_continue_on_error() {
  let workflow = r#"
jobs:
  test:
    steps:
      - run: fail
        continue-on-error: true
      - run: Hello World2
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec!["fail", "Hello World2"]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  // The failing step is recorded but does not abandon the job
  assert_eq!(res.state, WorkflowState::Succeeded);
  let job_result = res.jobs.get("test").unwrap();
  assert_eq!(job_result.state, WorkflowState::Succeeded);
  assert_eq!(job_result.steps[0].state, WorkflowState::Failed);
  assert_eq!(job_result.steps[1].state, WorkflowState::Succeeded);
}

#[cirro_run_test::test]
async fn test_throw_error() {
  let workflow = r#"
jobs:
  test:
    steps:
      - run: throw-error
      - run: Hello World2
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec![]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Failed);
  let job_result = res.jobs.get("test").unwrap();
  assert_eq!(job_result.state, WorkflowState::Failed);
  assert_eq!(job_result.steps[0].state, WorkflowState::Failed);
  assert_eq!(job_result.steps[0].exit_code, Some(1));
  assert_eq!(job_result.steps[1].state, WorkflowState::Skipped);
}

#[cirro_run_test::test]
async fn test_cancel_job() {
  let workflow = r#"
jobs:
  test:
    steps:
      - run: wait-for-signal
  "#;

  let cirro_run = CirroRun::builder().runner(TestRunner::new()).build();

  let workflow = Workflow::builder()
    .id("cancel-test")
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let job_id = JobId::new("cancel-test", "test");

  let run = workflow.run(ctx);
  tokio::pin!(run);

  let res = tokio::select! {
    res = &mut run => res,
    _ = tokio::time::sleep(std::time::Duration::from_millis(200)) => {
      cirro_run.cancel(&job_id).unwrap();
      run.await
    }
  };

  assert_eq!(res.state, WorkflowState::Cancelled);
  let job_result = res.jobs.get("test").unwrap();
  assert_eq!(job_result.state, WorkflowState::Cancelled);
  assert_eq!(job_result.steps[0].state, WorkflowState::Cancelled);
}

#[cirro_run_test::test]
async fn test_cancel_unknown_job() {
  let cirro_run = CirroRun::builder().runner(TestRunner::new()).build();

  let res = cirro_run.cancel(&JobId::new("unknown", "job"));

  assert_eq!(
    res.unwrap_err(),
    cirro_run::Error::error("Job unknown/job not found")
  );
}

#[cirro_run_test::test]
async fn test_depends_on_ordering() {
  let workflow = r#"
jobs:
  second:
    depends-on: [first]
    steps:
      - run: from second
  first:
    steps:
      - run: from first
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec!["from first", "from second"]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Succeeded);
  assert_eq!(res.jobs.len(), 2);
}

#[cirro_run_test::test]
async fn test_dependent_of_failed_job_is_skipped() {
  let workflow = r#"
jobs:
  second:
    depends-on: [first]
    steps:
      - run: from second
  first:
    steps:
      - run: fail
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec!["fail"]))
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Failed);
  assert_eq!(res.jobs.get("first").unwrap().state, WorkflowState::Failed);
  assert_eq!(res.jobs.get("second").unwrap().state, WorkflowState::Skipped);
}

#[cirro_run_test::test]
async fn test_custom_action() {
  struct GreetAction;

  impl Action for GreetAction {
    fn normalize(&self, _step: cirro_run::UserActionStep) -> cirro_run::Result<ActionSteps> {
      Ok(ActionSteps {
        pre: Some(UserStep::Command(UserCommandStep {
          run: "before greeting".to_string(),
          ..Default::default()
        })),
        run: UserStep::Command(UserCommandStep {
          run: "greeting".to_string(),
          ..Default::default()
        }),
        post: Some(UserStep::Command(UserCommandStep {
          run: "after everything".to_string(),
          ..Default::default()
        })),
      })
    }
  }

  let workflow = r#"
jobs:
  test:
    steps:
      - uses: greet
      - run: Hello World
  "#;

  let cirro_run = CirroRun::builder()
    .runner(TestRunner::new())
    .plugin(AssertLogsPlugin::new(vec![
      "before greeting",
      "greeting",
      "Hello World",
      "after everything",
    ]))
    .action("greet", GreetAction)
    .build();

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  assert_eq!(res.state, WorkflowState::Succeeded);
  assert_eq!(res.jobs.get("test").unwrap().steps.len(), 4);
}

#[cirro_run_test::test]
async fn test_unregistered_action_fails_to_parse() {
  let workflow = r#"
jobs:
  test:
    steps:
      - uses: mystery-action@v2
  "#;

  let cirro_run = CirroRun::builder().runner(TestRunner::new()).build();

  let res = Workflow::builder().config(workflow).build(&cirro_run);

  assert_eq!(
    res.unwrap_err(),
    cirro_run::Error::unsupported_feature("Action `mystery-action` is not registered")
  );
}
