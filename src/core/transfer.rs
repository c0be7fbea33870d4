// ZipDrop - core/transfer.rs
//
// The network seam. The orchestrator only knows this trait; the HTTP
// implementation lives in platform::http and tests plug in scripted ones.

use crate::core::model::CandidateFile;
use crate::core::unit::TransferOutcome;
use crate::util::constants;
use crate::util::error::TransferError;

/// What the server said about one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    pub status: u16,
    /// Response body, decoded lossily and trimmed.
    pub body: String,
}

/// Sends one file as a single upload request.
///
/// Implementations call `progress(bytes_sent, bytes_total)` as the body is
/// written (`bytes_total` is `None` when unknown) and return every HTTP
/// response as `Ok`, whatever its status. `Err` is reserved for failures
/// that produced no response.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        file: &CandidateFile,
        progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<TransferResponse, TransferError>;
}

/// Map a transport result to a unit outcome: status 200 succeeds,
/// everything else fails with the body or the error text as reason.
pub fn evaluate(result: Result<TransferResponse, TransferError>) -> TransferOutcome {
    match result {
        Ok(response) if response.status == constants::SUCCESS_STATUS => TransferOutcome::Succeeded,
        Ok(response) => TransferOutcome::Failed {
            reason: TransferError::Rejected {
                status: response.status,
                body: response.body,
            }
            .to_string(),
        },
        Err(e) => TransferOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Result<TransferResponse, TransferError> {
        Ok(TransferResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn only_200_succeeds() {
        assert_eq!(evaluate(response(200, "")), TransferOutcome::Succeeded);
        assert_eq!(
            evaluate(response(201, "created")),
            TransferOutcome::Failed {
                reason: "created".to_string()
            }
        );
        assert_eq!(
            evaluate(response(500, "disk full")),
            TransferOutcome::Failed {
                reason: "disk full".to_string()
            }
        );
    }

    #[test]
    fn transport_error_becomes_failure_reason() {
        let outcome = evaluate(Err(TransferError::Transport {
            message: "connection refused".to_string(),
        }));
        assert_eq!(
            outcome,
            TransferOutcome::Failed {
                reason: "Network error: connection refused".to_string()
            }
        );
    }
}
