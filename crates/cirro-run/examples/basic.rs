use cirro_run::{stream, CirroRun, RunResult, StepPayload, Workflow};

struct Runner;

impl Runner {
  fn new() -> Self {
    Runner
  }
}

#[cirro_run::async_trait]
impl cirro_run::Runner for Runner {
  async fn run(&self, ctx: cirro_run::Context) -> cirro_run::RunResponse {
    let (tx, rx) = stream();

    tokio::task::spawn(async move {
      // Send running log
      if let StepPayload::Run(run) = ctx.command.payload {
        tx.log(run);
      }

      // Send success log
      tx.end(RunResult::Succeeded);
    });

    Ok(rx)
  }
}

#[tokio::main]
async fn main() {
  // Create cirro run
  let cirro_run = CirroRun::builder().runner(Runner::new()).build();

  // Workflow
  let workflow = r#"
jobs:
  job:
    name: Job
    steps:
      - run: Hello World
  "#;

  // Create workflow
  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  // Create a new execution context
  let ctx = cirro_run.execution_context().build();

  // Run workflow
  let _res = workflow.run(ctx).await;
}
