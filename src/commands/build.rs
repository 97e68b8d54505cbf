// ABOUTME: Build command implementation.
// ABOUTME: Runs the registered build task to produce the archive under the build directory.

use stackpack::error::{Error, Result};
use stackpack::output::Output;
use stackpack::pipeline::PipelineRegistry;
use stackpack::source::GitCli;

use super::{Context, artifact_filename};

pub async fn build(
    ctx: &Context,
    registry: &PipelineRegistry,
    filename: Option<String>,
    output: &mut Output,
) -> Result<()> {
    let task = registry
        .build_task()
        .ok_or_else(|| Error::InvalidConfig("no build task registered".to_string()))?;

    output.start_timer();
    let git = GitCli::new(&ctx.root);
    let filename = artifact_filename(filename, &ctx.naming(), &git).await?;

    output.progress(&format!("Packaging {filename}..."));
    let archive = task
        .run(&ctx.root, &ctx.build_dir(), &git, &filename)
        .await?;

    output.success(&format!("Packaged Application: {}", archive.filename));
    tracing::debug!(path = %archive.path.display(), "archive written");
    Ok(())
}
