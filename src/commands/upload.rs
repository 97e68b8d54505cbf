// ABOUTME: Upload command implementation.
// ABOUTME: Publishes a built archive to the object store and prints its public URL.

use stackpack::error::{Error, Result};
use stackpack::output::Output;
use stackpack::source::GitCli;
use stackpack::store::{ArtifactStore, S3Store};

use super::{Context, artifact_filename};

pub async fn upload(ctx: &Context, filename: Option<String>, output: &mut Output) -> Result<()> {
    output.start_timer();
    let naming = ctx.naming();
    let git = GitCli::new(&ctx.root);
    let filename = artifact_filename(filename, &naming, &git).await?;

    let location = naming.artifact_location(&filename)?;
    let local = ctx.build_dir().join(&filename);
    if !local.is_file() {
        return Err(Error::ArtifactNotBuilt(local));
    }

    output.progress("Starting upload...");
    let store = S3Store::new(naming.region());
    store.upload(&local, &location).await?;

    output.success(&format!("Uploaded Application: {}", location.public_url()));
    Ok(())
}
