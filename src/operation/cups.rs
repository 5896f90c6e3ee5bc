//!
//! CUPS-specific IPP operations. For operations which require user authentication the URI may include authority part.
//!

use http::Uri;

use crate::attribute::IppAttribute;
use crate::error::Result;
use crate::model::{DelimiterTag, Operation};
use crate::operation::IppOperation;
use crate::request::IppRequestResponse;
use crate::value::{IppName, IppString, IppValue};

/// IPP operation CUPS-Get-Printers
#[derive(Default)]
pub struct CupsGetPrinters;

impl CupsGetPrinters {
    /// Create CUPS-Get-Printers operation
    pub fn new() -> CupsGetPrinters {
        CupsGetPrinters
    }
}

impl IppOperation for CupsGetPrinters {
    fn into_ipp_request(self) -> IppRequestResponse {
        IppRequestResponse::new(self.version(), Operation::CupsGetPrinters, None)
            .expect("CupsGetPrinters carries no target URI")
    }
}

/// IPP operation CUPS-Get-Default
#[derive(Default)]
pub struct CupsGetDefault;

impl CupsGetDefault {
    /// Create CUPS-Get-Default operation
    pub fn new() -> CupsGetDefault {
        CupsGetDefault
    }
}

impl IppOperation for CupsGetDefault {
    fn into_ipp_request(self) -> IppRequestResponse {
        IppRequestResponse::new(self.version(), Operation::CupsGetDefault, None)
            .expect("CupsGetDefault carries no target URI")
    }
}

/// IPP operation CUPS-Move-Job: relocate a queued job to a different printer.
pub struct CupsMoveJob {
    job_uri: IppString,
    target_printer_uri: IppString,
    user_name: IppName,
}

impl CupsMoveJob {
    pub fn new(job_uri: Uri, target_printer_uri: Uri, user_name: &str) -> Result<CupsMoveJob> {
        Ok(CupsMoveJob {
            job_uri: job_uri.try_into()?,
            target_printer_uri: target_printer_uri.try_into()?,
            user_name: user_name.try_into()?,
        })
    }
}

impl IppOperation for CupsMoveJob {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request = IppRequestResponse::new(self.version(), Operation::CupsMoveJob, None)
            .expect("CupsMoveJob target is attached as job-uri, not printer-uri");

        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::JOB_URI, IppValue::Uri(self.job_uri)),
        );
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
        );
        request.set_attribute(
            DelimiterTag::JobAttributes,
            IppAttribute::new(IppAttribute::JOB_PRINTER_URI, IppValue::Uri(self.target_printer_uri)),
        );
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_job_targets_job_uri_not_printer_uri() {
        let op = CupsMoveJob::new(
            Uri::from_static("ipp://h:631/jobs/42"),
            Uri::from_static("ipp://h:631/printers/B"),
            "alice",
        )
        .unwrap();
        let request = op.into_ipp_request();
        let op_attrs = request
            .attributes
            .groups_of(DelimiterTag::OperationAttributes)
            .next()
            .unwrap()
            .attributes();
        assert!(op_attrs.contains_key(IppAttribute::JOB_URI));
        assert!(!op_attrs.contains_key(IppAttribute::PRINTER_URI));

        let job_attrs = request.attributes.groups_of(DelimiterTag::JobAttributes).next().unwrap().attributes();
        assert!(job_attrs.contains_key(IppAttribute::JOB_PRINTER_URI));
    }
}
