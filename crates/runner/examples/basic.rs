use cirro_run::{CirroRun, Workflow};
use cirro_runner::CirroRunner;

#[tokio::main]
async fn main() {
  cirro_run_logger::init_logger();

  let runner = CirroRunner::builder().build().unwrap();

  let cirro_run = CirroRun::builder().runner(runner).build();

  let workflow = r#"
jobs:
  check:
    timeout-minutes: 5
    env:
      CARGO_TERM_COLOR: always
    steps:
      - run: echo "Hello World"
  "#;

  let workflow = Workflow::builder()
    .config(workflow)
    .build(&cirro_run)
    .unwrap();

  let ctx = cirro_run.execution_context().build();

  let res = workflow.run(ctx).await;

  log::info!("Workflow finished with state {:?}", res.state);
}
