use super::StatusCell;
use crate::models::VersionRecord;
use tracing::{debug, info};

pub const PROMPT_TITLE: &str = "Rollback?";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RollbackError {
    #[error("version {version} cannot be rolled back to; status is '{status}'")]
    NotRevertible { version: u64, status: StatusCell },

    #[error("could not get an answer to the rollback prompt; {0}")]
    Prompt(String),
}

/// Where an image most likely lives, guessed from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ImageSource {
    /// Pulled from a remote registry; it could have been deleted there.
    #[strum(to_string = "registry")]
    Registry,

    /// Only on the local disk; it could have been cleaned up.
    #[strum(to_string = "local")]
    Local,
}

impl ImageSource {
    /// Any name with a '/' in it is treated as registry hosted. Locally built images
    /// can carry path-like tags too, so this is only ever a guess.
    pub fn of(image_name: &str) -> Self {
        if image_name.contains('/') {
            ImageSource::Registry
        } else {
            ImageSource::Local
        }
    }
}

/// The content of the confirmation shown before a rollback is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackPrompt {
    pub title: String,
    pub image_name: String,
    pub source: ImageSource,

    /// What could make the rollback fail, depending on where the image lives.
    pub warning: String,

    pub question: String,
}

impl RollbackPrompt {
    pub fn for_image(image_name: &str) -> Self {
        let source = ImageSource::of(image_name);

        let warning = match source {
            ImageSource::Registry => format!(
                "{} appears to be hosted on Docker Registry. Make sure you have not deleted this \
                image from the repository since it was originally deployed. Deletion usually does \
                not happen automatically, so if you have not deleted the image intentionally, you \
                don't need to worry about this.",
                image_name
            ),
            ImageSource::Local => "If you had previously deleted this image explicitly through \
                disk cleanup, this revert process will fail."
                .to_string(),
        };

        Self {
            title: PROMPT_TITLE.to_string(),
            image_name: image_name.to_string(),
            source,
            warning,
            question: format!(
                "Do you want to continue with rolling back your app to {}?",
                image_name
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,

    /// Also covers the prompt being dismissed without an answer.
    Cancelled,
}

/// Anything able to put a [`RollbackPrompt`] in front of the user and report back their choice.
pub trait Confirm {
    fn confirm(&mut self, prompt: &RollbackPrompt) -> Result<Decision, RollbackError>;
}

/// Accepts every prompt without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &RollbackPrompt) -> Result<Decision, RollbackError> {
        Ok(Decision::Confirmed)
    }
}

/// Asks for confirmation to roll back to `record` and, only if the user confirms, hands that
/// same record to `on_requested`.
///
/// Performing the rollback and reporting on it is entirely up to `on_requested`. Nothing here
/// deduplicates requests: calling this twice asks twice.
pub fn initiate_rollback<'a, C, F>(
    record: &'a VersionRecord,
    deployed_version: u64,
    confirmer: &mut C,
    on_requested: F,
) -> Result<Decision, RollbackError>
where
    C: Confirm + ?Sized,
    F: FnOnce(&'a VersionRecord),
{
    let status = StatusCell::for_record(record, deployed_version);
    let image_name = match (status, record.image_name()) {
        (StatusCell::Revertible, Some(image_name)) => image_name,
        _ => {
            return Err(RollbackError::NotRevertible {
                version: record.version,
                status,
            })
        }
    };

    let prompt = RollbackPrompt::for_image(image_name);
    let decision = confirmer.confirm(&prompt)?;

    debug!(
        version = record.version,
        image = image_name,
        source = %prompt.source,
        ?decision,
        "rollback prompt answered"
    );

    if decision == Decision::Confirmed {
        info!(
            version = record.version,
            image = image_name,
            "rollback requested"
        );
        on_requested(record);
    }

    Ok(decision)
}
