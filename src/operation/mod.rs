//!
//! IPP operations: request construction and response projection
//!
pub mod core;
pub mod cups;

pub use core::{
    CancelJob, GetJobAttributes, GetJobs, GetPrinterAttributes, HoldJob, PrintJob, ReleaseJob, RestartJob, ValidateJob,
    WhichJobs,
};
pub use cups::{CupsGetDefault, CupsGetPrinters, CupsMoveJob};

use crate::request::IppRequestResponse;

/// Common shape shared by every IPP operation: build the wire request, and
/// (implicitly, via the IPP version negotiated) accept the matching response.
///
/// Per-operation structs hold only the fields that vary between calls; the
/// operation-attributes prelude (`attributes-charset`,
/// `attributes-natural-language`, `printer-uri`) is assembled once by
/// [`crate::request::IppRequestResponse::new`]/`new_internal` rather than
/// repeated per operation.
pub trait IppOperation {
    /// IPP protocol version this operation is encoded with. `1.1` unless a
    /// caller has a specific reason to negotiate otherwise.
    fn version(&self) -> (u8, u8) {
        (1, 1)
    }

    /// Consume the operation and produce the request to send over the wire.
    fn into_ipp_request(self) -> IppRequestResponse;
}
