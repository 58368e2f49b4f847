use crate::api::ApiError;
use crate::engine::EngineFailure;

/// Map a failed tool invocation onto the error reported to the client.
///
/// A not-initialized working directory wins over everything else; any other
/// failure, including lock conflicts, is a generic engine error.
pub fn classify(command: &'static str, failure: EngineFailure) -> ApiError {
    match failure {
        failure @ EngineFailure::NotInitialized { .. } => ApiError::NeedsInit { source: failure },
        failure => ApiError::Engine {
            command,
            source: failure,
        },
    }
}
