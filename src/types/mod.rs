// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Phantom-typed fleet IDs and the validated git revision.

mod id;
mod revision;

pub use id::{AppId, DeploymentId, Id, StackId};
pub use revision::{Revision, RevisionError};
