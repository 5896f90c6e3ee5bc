//!
//! The stateless client facade: a small value type bundling the target
//! server, default identity and credentials, with one method per operation.
//!
use std::time::Duration;

use http::Uri;

use crate::entities::{project_jobs, project_printers, Credentials, PrintJob, PrintJobAttributes, Printer};
use crate::error::{IppClientError, Result};
use crate::model::{DelimiterTag, StatusCode};
use crate::operation::core::PrintJob as PrintJobOperation;
use crate::operation::{
    CancelJob, CupsGetDefault, CupsGetPrinters, CupsMoveJob, GetJobAttributes, GetJobs, GetPrinterAttributes,
    HoldJob, IppOperation, ReleaseJob, RestartJob, ValidateJob, WhichJobs,
};
use crate::request::IppRequestResponse;
use crate::transport::Transport;

/// Default CUPS server host, used when [`ClientConfig::host`] is left unset.
pub const DEFAULT_HOST: &str = "localhost";
/// Default IPP port (RFC 8011 §3.1).
pub const DEFAULT_PORT: u16 = 631;

fn default_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "anonymous".to_owned())
}

/// Target server and identity a [`CupsClient`] operates against. `user` is
/// resolved once, at construction, never re-read per call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub base_path: Option<String>,
    pub user: String,
    pub credentials: Option<Credentials>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            use_tls: false,
            base_path: None,
            user: default_user(),
            credentials: None,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
        }
    }
}

/// A stateless handle to a CUPS/IPP server. Cheap to construct; every method
/// opens its own HTTP request through the shared [`Transport`] and returns a
/// typed failure rather than panicking.
pub struct CupsClient {
    config: ClientConfig,
    transport: Transport,
}

impl CupsClient {
    pub fn new(config: ClientConfig) -> CupsClient {
        let transport = Transport::new(config.connect_timeout, config.read_timeout, config.credentials.clone());
        CupsClient { config, transport }
    }

    fn base_uri(&self, path: &str) -> Result<Uri> {
        let scheme = if self.config.use_tls { "https" } else { "http" };
        let base = self.config.base_path.as_deref().unwrap_or("");
        format!("{scheme}://{}:{}{base}{path}", self.config.host, self.config.port)
            .parse()
            .map_err(|err| IppClientError::InvalidArgument(format!("invalid target uri: {err}")))
    }

    /// Build the IPP URI for a named printer (`/printers/<name>`).
    pub fn printer_uri(&self, name: &str) -> Result<Uri> {
        self.base_uri(&format!("/printers/{name}"))
    }

    /// Build the IPP URI for a job (`/jobs/<id>`).
    pub fn job_uri(&self, job_id: i32) -> Result<Uri> {
        self.base_uri(&format!("/jobs/{job_id}"))
    }

    fn server_uri(&self) -> Result<Uri> {
        self.base_uri("/")
    }

    fn execute(&self, uri: &Uri, request: IppRequestResponse) -> Result<IppRequestResponse> {
        let response = self.transport.send(uri, request)?;
        let status = StatusCode(response.header.code_or_status);
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .attributes
            .groups_of(DelimiterTag::OperationAttributes)
            .next()
            .and_then(|group| group.attributes().get(crate::attribute::IppAttribute::STATUS_MESSAGE))
            .map(|attr| attr.value().to_string());
        log::warn!("{uri} returned IPP status {status}: {message:?}");
        Err(IppClientError::IppStatus { code: status, message })
    }

    /// `CUPS-Get-Printers`, projected and flagged against the current
    /// default printer. Includes the CUPS implicit-class entry; see
    /// [`CupsClient::list_printers_without_default`] to exclude it.
    pub fn list_printers(&self) -> Result<Vec<Printer>> {
        let default_uri = self.get_default_printer()?.map(|printer| printer.uri);
        let uri = self.server_uri()?;
        let response = self.execute(&uri, CupsGetPrinters::new().into_ipp_request())?;
        Ok(project_printers(&response.attributes, default_uri.as_deref()))
    }

    /// Like [`CupsClient::list_printers`], with the CUPS-synthesized
    /// implicit-class printer (`printer-type` bit `0x00000004`) filtered out.
    pub fn list_printers_without_default(&self) -> Result<Vec<Printer>> {
        Ok(self.list_printers()?.into_iter().filter(|printer| !printer.is_implicit_class()).collect())
    }

    /// `CUPS-Get-Default`.
    pub fn get_default_printer(&self) -> Result<Option<Printer>> {
        let uri = self.server_uri()?;
        let response = self.execute(&uri, CupsGetDefault::new().into_ipp_request())?;
        Ok(project_printers(&response.attributes, None)
            .into_iter()
            .next()
            .map(|printer| Printer { is_default: true, ..printer }))
    }

    /// Convenience filter over [`CupsClient::list_printers`] by name.
    pub fn get_printer(&self, name: &str) -> Result<Option<Printer>> {
        Ok(self.list_printers()?.into_iter().find(|printer| printer.name == name))
    }

    /// Convenience filter over [`CupsClient::list_printers`] by URI.
    pub fn get_printer_by_url(&self, url: &str) -> Result<Option<Printer>> {
        Ok(self.list_printers()?.into_iter().find(|printer| printer.uri == url))
    }

    /// `Get-Printer-Attributes` against a specific printer URI.
    pub fn get_printer_attributes(&self, printer_uri: Uri) -> Result<Printer> {
        let op = GetPrinterAttributes::new(printer_uri.clone(), &self.config.user)?;
        let response = self.execute(&printer_uri, op.into_ipp_request())?;
        project_printers(&response.attributes, None)
            .into_iter()
            .next()
            .ok_or_else(|| IppClientError::InvalidArgument("response carried no printer-attributes group".into()))
    }

    /// `Print-Job`: stream `job.document` to `printer_uri` and return the
    /// job attributes the server assigned.
    pub fn print_job(&self, printer_uri: Uri, job: PrintJob) -> Result<PrintJobAttributes> {
        let op = PrintJobOperation::new(printer_uri.clone(), job)?;
        let response = self.execute(&printer_uri, op.into_ipp_request())?;
        project_jobs(&response.attributes)
            .into_iter()
            .next()
            .ok_or_else(|| IppClientError::InvalidArgument("response carried no job-attributes group".into()))
    }

    /// `Validate-Job`: check a submission would be accepted without
    /// transmitting its document body.
    pub fn validate_job(&self, printer_uri: Uri, job: PrintJob) -> Result<()> {
        let op = ValidateJob::new(printer_uri.clone(), job)?;
        self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(())
    }

    /// `Get-Job-Attributes`.
    pub fn get_job_attributes(&self, printer_uri: Uri, job_id: i32) -> Result<PrintJobAttributes> {
        let op = GetJobAttributes::new(printer_uri.clone(), job_id, &self.config.user)?;
        let response = self.execute(&printer_uri, op.into_ipp_request())?;
        project_jobs(&response.attributes)
            .into_iter()
            .next()
            .ok_or_else(|| IppClientError::InvalidArgument("response carried no job-attributes group".into()))
    }

    /// `Get-Jobs`.
    pub fn get_jobs(&self, printer_uri: Uri, which_jobs: WhichJobs, my_jobs: bool) -> Result<Vec<PrintJobAttributes>> {
        let op = GetJobs::new(printer_uri.clone(), &self.config.user, which_jobs, my_jobs)?;
        let response = self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(project_jobs(&response.attributes))
    }

    /// `Cancel-Job`. Cancelling an already-terminal job surfaces
    /// `IppStatus { code: 0x040C, .. }` rather than silently succeeding.
    pub fn cancel_job(&self, printer_uri: Uri, job_id: i32) -> Result<()> {
        let op = CancelJob::new(printer_uri.clone(), job_id, &self.config.user)?;
        self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(())
    }

    /// `Hold-Job`.
    pub fn hold_job(&self, printer_uri: Uri, job_id: i32) -> Result<()> {
        let op = HoldJob::new(printer_uri.clone(), job_id, &self.config.user)?;
        self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(())
    }

    /// `Release-Job`.
    pub fn release_job(&self, printer_uri: Uri, job_id: i32) -> Result<()> {
        let op = ReleaseJob::new(printer_uri.clone(), job_id, &self.config.user)?;
        self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(())
    }

    /// `Restart-Job`.
    pub fn restart_job(&self, printer_uri: Uri, job_id: i32) -> Result<()> {
        let op = RestartJob::new(printer_uri.clone(), job_id, &self.config.user)?;
        self.execute(&printer_uri, op.into_ipp_request())?;
        Ok(())
    }

    /// `CUPS-Move-Job`: relocate a queued job to a different printer.
    /// Returns `true` when the target accepts it.
    pub fn move_job(&self, job_uri: Uri, target_printer_uri: Uri) -> Result<bool> {
        let op = CupsMoveJob::new(job_uri.clone(), target_printer_uri, &self.config.user)?;
        match self.execute(&job_uri, op.into_ipp_request()) {
            Ok(_) => Ok(true),
            Err(IppClientError::IppStatus { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_localhost_631() {
        let config = ClientConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.user.is_empty());
    }

    #[test]
    fn printer_uri_and_job_uri_use_expected_paths() {
        let client = CupsClient::new(ClientConfig::default());
        assert_eq!(client.printer_uri("LaserJet").unwrap().path(), "/printers/LaserJet");
        assert_eq!(client.job_uri(42).unwrap().path(), "/jobs/42");
    }
}
