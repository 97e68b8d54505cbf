// ABOUTME: Deploy command implementation.
// ABOUTME: Wires git, S3, OpsWorks, hooks and output into the deployment orchestrator.

use stackpack::aws::AwsCli;
use stackpack::deploy::{DeployInput, Orchestrator, PollSettings, TokioClock};
use stackpack::error::Result;
use stackpack::fleet::OpsWorksCli;
use stackpack::hooks::HookTable;
use stackpack::output::Output;
use stackpack::source::{GitCli, SnapshotProvider};
use stackpack::store::S3Store;

use super::Context;

pub async fn deploy(
    ctx: &Context,
    app_name: Option<String>,
    stack_name: Option<String>,
    filename: Option<String>,
    output: &mut Output,
) -> Result<()> {
    output.start_timer();
    let naming = ctx.naming();
    let git = GitCli::new(&ctx.root);

    let revision = git.revision().await?;
    let filename = filename.unwrap_or_else(|| naming.default_filename(&revision));

    let store = S3Store::new(naming.region());
    let fleet = OpsWorksCli::new(AwsCli::new(naming.region()));
    let hooks = HookTable::from_config(&ctx.config.hooks, &ctx.root);

    let orchestrator = Orchestrator {
        upstream: &git,
        store: &store,
        fleet: &fleet,
        hooks: &hooks,
        clock: &TokioClock,
        progress: &*output,
        settings: PollSettings::from(&ctx.config.deploy),
    };

    let input = DeployInput {
        app_name,
        stack_name,
        filename,
        revision,
    };
    let report = orchestrator.run(input, &naming).await?;

    output.report(&report);
    Ok(())
}
