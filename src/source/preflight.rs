// ABOUTME: Pre-deploy check that the local tree matches its upstream.
// ABOUTME: Any pending upstream change fails fast before remote calls.

use super::{SourceError, UpstreamProbe};

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error(
        "local repository has diverged from upstream; pull and merge before deploying\n{pending}"
    )]
    Diverged { pending: String },

    #[error("could not compare with upstream: {0}")]
    Source(#[from] SourceError),
}

/// Fail unless a dry-run fetch reports nothing pending.
pub async fn assert_synchronized(probe: &dyn UpstreamProbe) -> Result<(), PreflightError> {
    let pending = probe.pending_changes().await?;
    let pending = pending.trim();

    if !pending.is_empty() {
        return Err(PreflightError::Diverged {
            pending: pending.to_string(),
        });
    }

    tracing::info!("local repository is in sync with upstream");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl UpstreamProbe for Canned {
        async fn pending_changes(&self) -> Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn empty_output_passes() {
        assert!(assert_synchronized(&Canned("")).await.is_ok());
    }

    #[tokio::test]
    async fn whitespace_only_output_passes() {
        assert!(assert_synchronized(&Canned("\n  \n")).await.is_ok());
    }

    #[tokio::test]
    async fn pending_refs_fail_with_remediation() {
        let probe = Canned("From github.com:org/app\n   1a2b3c4..5d6e7f8  main -> origin/main");
        let err = assert_synchronized(&probe).await.unwrap_err();

        assert!(matches!(err, PreflightError::Diverged { .. }));
        let message = err.to_string();
        assert!(message.contains("pull and merge"));
        assert!(message.contains("main -> origin/main"));
    }
}
