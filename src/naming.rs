// ABOUTME: Naming rules for artifacts, their remote location, and the deploy region.
// ABOUTME: Reads PACKAGE_FILENAME, PACKAGE_FOLDER, DEPLOY_BUCKET and AWS region variables once.

use crate::archive::Format;
use crate::error::{Error, Result};
use crate::store::ArtifactLocation;
use crate::types::Revision;

pub const PACKAGE_FILENAME: &str = "PACKAGE_FILENAME";
pub const PACKAGE_FOLDER: &str = "PACKAGE_FOLDER";
pub const DEPLOY_BUCKET: &str = "DEPLOY_BUCKET";

/// Region used when neither configuration nor environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Resolves names from a snapshot of the environment taken at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingResolver {
    format: Format,
    filename_override: Option<String>,
    bucket: Option<String>,
    folder: Option<String>,
    region: String,
}

impl NamingResolver {
    /// Capture the relevant environment variables.
    ///
    /// `configured_region` wins over `AWS_REGION` and `AWS_DEFAULT_REGION`.
    pub fn from_env(format: Format, configured_region: Option<&str>) -> Self {
        let region = configured_region
            .map(str::to_string)
            .or_else(|| non_empty_var("AWS_REGION"))
            .or_else(|| non_empty_var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            format,
            filename_override: non_empty_var(PACKAGE_FILENAME),
            bucket: non_empty_var(DEPLOY_BUCKET),
            folder: non_empty_var(PACKAGE_FOLDER),
            region,
        }
    }

    /// Whether the artifact name is fixed by the environment, so no revision is needed.
    pub fn has_filename_override(&self) -> bool {
        self.filename_override.is_some()
    }

    pub fn filename_override(&self) -> Option<&str> {
        self.filename_override.as_deref()
    }

    /// `PACKAGE_FILENAME` verbatim, else `git-<hash>.<ext>`.
    pub fn default_filename(&self, revision: &Revision) -> String {
        match &self.filename_override {
            Some(name) => name.clone(),
            None => format!("git-{}.{}", revision, self.format.extension()),
        }
    }

    pub fn bucket_name(&self) -> Result<&str> {
        self.bucket
            .as_deref()
            .ok_or(Error::MissingEnvVar(DEPLOY_BUCKET))
    }

    pub fn package_folder(&self) -> Result<&str> {
        self.folder
            .as_deref()
            .ok_or(Error::MissingEnvVar(PACKAGE_FOLDER))
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Remote location of `filename`. The bucket is checked before the folder.
    pub fn artifact_location(&self, filename: &str) -> Result<ArtifactLocation> {
        let bucket = self.bucket_name()?;
        let folder = self.package_folder()?;
        Ok(ArtifactLocation::new(bucket, folder, filename))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
