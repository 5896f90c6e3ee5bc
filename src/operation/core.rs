//!
//! RFC 8011 operations: job submission, attribute queries and job lifecycle
//!
use std::io::Read;

use http::Uri;

use crate::attribute::IppAttribute;
use crate::entities::PrintJob as PrintJobSubmission;
use crate::error::{IppClientError, Result};
use crate::model::{DelimiterTag, Operation};
use crate::operation::IppOperation;
use crate::request::IppRequestResponse;
use crate::value::{IppKeyword, IppName, IppString, IppValue};

fn parse_page_ranges(spec: &str) -> Result<IppValue> {
    let mut ranges = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(IppClientError::InvalidArgument(format!("empty page range segment in {spec:?}")));
        }
        let (lower, upper) = match part.split_once('-') {
            Some((a, b)) => (
                a.trim()
                    .parse::<i32>()
                    .map_err(|_| IppClientError::InvalidArgument(format!("invalid page range {part:?}")))?,
                b.trim()
                    .parse::<i32>()
                    .map_err(|_| IppClientError::InvalidArgument(format!("invalid page range {part:?}")))?,
            ),
            None => {
                let n = part
                    .parse::<i32>()
                    .map_err(|_| IppClientError::InvalidArgument(format!("invalid page range {part:?}")))?;
                (n, n)
            }
        };
        if lower > upper {
            return Err(IppClientError::InvalidArgument(format!("descending page range {part:?}")));
        }
        ranges.push(IppValue::RangeOfInteger { min: lower, max: upper });
    }

    Ok(if ranges.len() == 1 {
        ranges.into_iter().next().expect("checked len == 1")
    } else {
        IppValue::Array(ranges)
    })
}

fn parse_resolution(spec: &str) -> Result<IppValue> {
    let (digits, units) = if let Some(rest) = spec.strip_suffix("dpi") {
        (rest, 3i8)
    } else if let Some(rest) = spec.strip_suffix("dpc") {
        (rest, 4i8)
    } else {
        return Err(IppClientError::InvalidArgument(format!("unrecognized resolution unit in {spec:?}")));
    };

    let (cross_feed, feed) = match digits.split_once('x') {
        Some((a, b)) => (
            a.parse::<i32>()
                .map_err(|_| IppClientError::InvalidArgument(format!("invalid resolution {spec:?}")))?,
            b.parse::<i32>()
                .map_err(|_| IppClientError::InvalidArgument(format!("invalid resolution {spec:?}")))?,
        ),
        None => {
            let n = digits
                .parse::<i32>()
                .map_err(|_| IppClientError::InvalidArgument(format!("invalid resolution {spec:?}")))?;
            (n, n)
        }
    };

    Ok(IppValue::Resolution { cross_feed, feed, units })
}

fn sides_keyword(duplex: bool, portrait: bool) -> &'static str {
    match (duplex, portrait) {
        (false, _) => "one-sided",
        (true, true) => "two-sided-long-edge",
        (true, false) => "two-sided-short-edge",
    }
}

fn job_attribute_from_triple(name: &str, syntax: &str, value: &str) -> Result<IppAttribute> {
    let parsed = match syntax {
        "integer" => IppValue::Integer(
            value
                .parse()
                .map_err(|_| IppClientError::InvalidArgument(format!("invalid integer for job attribute {name}")))?,
        ),
        "enum" => IppValue::Enum(
            value
                .parse()
                .map_err(|_| IppClientError::InvalidArgument(format!("invalid enum for job attribute {name}")))?,
        ),
        "boolean" => IppValue::Boolean(value.eq_ignore_ascii_case("true")),
        "uri" => IppValue::Uri(value.try_into()?),
        _ => IppValue::Keyword(value.try_into()?),
    };
    Ok(IppAttribute::new(name, parsed))
}

/// Operation attributes whose canonical IPP syntax isn't `keyword`. Looked
/// up by name so `document-format`/`document-natural-language` encode as
/// `mimeMediaType`/`naturalLanguage` rather than being flattened to keyword
/// like every other caller-supplied operation attribute.
fn operation_attribute_value(name: &str, value: &str) -> Result<IppValue> {
    let parsed = match name {
        IppAttribute::DOCUMENT_FORMAT => IppValue::MimeMediaType(value.try_into()?),
        IppAttribute::DOCUMENT_NATURAL_LANGUAGE => IppValue::NaturalLanguage(value.try_into()?),
        _ => IppValue::Keyword(value.try_into()?),
    };
    Ok(parsed)
}

/// Print-Job (`0x0002`): submit a document for printing.
pub struct PrintJob {
    target: IppString,
    user_name: IppName,
    job_name: Option<IppName>,
    job_attrs: Vec<IppAttribute>,
    operation_attrs: Vec<IppAttribute>,
    document: Box<dyn Read + Send>,
}

impl PrintJob {
    pub fn new(printer_uri: Uri, submission: PrintJobSubmission) -> Result<PrintJob> {
        let target = IppString::try_from(printer_uri)?;
        let user_name: IppName = submission.user_name.as_str().try_into()?;
        let job_name = submission.job_name.as_deref().map(TryInto::try_into).transpose()?;

        let mut job_attrs = vec![IppAttribute::new(
            IppAttribute::COPIES,
            IppValue::Integer(submission.copies.max(1) as i32),
        )];

        if let Some(ranges) = submission.page_ranges.as_deref() {
            job_attrs.push(IppAttribute::new(IppAttribute::PAGE_RANGES, parse_page_ranges(ranges)?));
        }

        job_attrs.push(IppAttribute::new(
            IppAttribute::SIDES,
            IppValue::Keyword(sides_keyword(submission.duplex, submission.portrait).try_into()?),
        ));
        job_attrs.push(IppAttribute::new(
            IppAttribute::ORIENTATION_REQUESTED,
            IppValue::Enum(if submission.portrait { 3 } else { 4 }),
        ));
        job_attrs.push(IppAttribute::new(
            IppAttribute::OUTPUT_MODE,
            IppValue::Keyword(if submission.color { "color" } else { "monochrome" }.try_into()?),
        ));

        if let Some(format) = submission.page_format.as_deref() {
            job_attrs.push(IppAttribute::new(IppAttribute::MEDIA, IppValue::Keyword(format.try_into()?)));
        }
        if let Some(resolution) = submission.resolution.as_deref() {
            job_attrs.push(IppAttribute::new(IppAttribute::PRINTER_RESOLUTION, parse_resolution(resolution)?));
        }

        for (name, syntax, value) in &submission.job_attributes {
            job_attrs.push(job_attribute_from_triple(name, syntax, value)?);
        }

        let mut operation_attrs = Vec::new();
        for (name, value) in &submission.operation_attributes {
            operation_attrs.push(IppAttribute::new(name.clone(), operation_attribute_value(name, value)?));
        }

        Ok(PrintJob {
            target,
            user_name,
            job_name,
            job_attrs,
            operation_attrs,
            document: submission.document,
        })
    }
}

impl IppOperation for PrintJob {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request = IppRequestResponse::new_internal(self.version(), Operation::PrintJob, Some(self.target));

        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
        );
        if let Some(job_name) = self.job_name {
            request.set_attribute(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::JOB_NAME, IppValue::NameWithoutLanguage(job_name)),
            );
        }
        for attr in self.operation_attrs {
            request.set_attribute(DelimiterTag::OperationAttributes, attr);
        }
        for attr in self.job_attrs {
            request.set_attribute(DelimiterTag::JobAttributes, attr);
        }
        request.set_payload(self.document);
        request
    }
}

/// Validate-Job (`0x0001`): identical attribute assembly to [`PrintJob`]
/// without a document body, used to check a submission will be accepted
/// before streaming potentially large print data.
pub struct ValidateJob(PrintJob);

impl ValidateJob {
    pub fn new(printer_uri: Uri, submission: PrintJobSubmission) -> Result<ValidateJob> {
        Ok(ValidateJob(PrintJob::new(printer_uri, submission)?))
    }
}

impl IppOperation for ValidateJob {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request = self.0.into_ipp_request();
        request.header.code_or_status = Operation::ValidateJob as u16;
        request.payload = None;
        request
    }
}

/// Get-Printer-Attributes (`0x000B`).
pub struct GetPrinterAttributes {
    target: IppString,
    user_name: IppName,
    requested_attributes: Vec<IppKeyword>,
}

impl GetPrinterAttributes {
    pub fn new(printer_uri: Uri, user_name: &str) -> Result<GetPrinterAttributes> {
        Ok(GetPrinterAttributes {
            target: IppString::try_from(printer_uri)?,
            user_name: user_name.try_into()?,
            requested_attributes: Vec::new(),
        })
    }

    pub fn with_requested_attributes<I, S>(mut self, attrs: I) -> Result<GetPrinterAttributes>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for attr in attrs {
            self.requested_attributes.push(attr.as_ref().try_into()?);
        }
        Ok(self)
    }
}

impl IppOperation for GetPrinterAttributes {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request =
            IppRequestResponse::new_internal(self.version(), Operation::GetPrinterAttributes, Some(self.target));
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
        );
        if !self.requested_attributes.is_empty() {
            let values = self.requested_attributes.into_iter().map(IppValue::Keyword).collect();
            request.set_attribute(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::REQUESTED_ATTRIBUTES, IppValue::Array(values)),
            );
        }
        request
    }
}

/// Get-Job-Attributes (`0x0009`).
pub struct GetJobAttributes {
    target: IppString,
    job_id: i32,
    user_name: IppName,
}

impl GetJobAttributes {
    pub fn new(printer_uri: Uri, job_id: i32, user_name: &str) -> Result<GetJobAttributes> {
        Ok(GetJobAttributes {
            target: IppString::try_from(printer_uri)?,
            job_id,
            user_name: user_name.try_into()?,
        })
    }
}

impl IppOperation for GetJobAttributes {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request =
            IppRequestResponse::new_internal(self.version(), Operation::GetJobAttributes, Some(self.target));
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(self.job_id)),
        );
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
        );
        request
    }
}

/// `which-jobs` selector for [`GetJobs`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WhichJobs {
    Completed,
    NotCompleted,
    All,
}

impl WhichJobs {
    fn as_keyword(self) -> &'static str {
        match self {
            WhichJobs::Completed => "completed",
            WhichJobs::NotCompleted => "not-completed",
            WhichJobs::All => "all",
        }
    }
}

/// Get-Jobs (`0x000A`).
pub struct GetJobs {
    target: IppString,
    user_name: IppName,
    which_jobs: WhichJobs,
    my_jobs: bool,
}

impl GetJobs {
    pub fn new(printer_uri: Uri, user_name: &str, which_jobs: WhichJobs, my_jobs: bool) -> Result<GetJobs> {
        Ok(GetJobs {
            target: IppString::try_from(printer_uri)?,
            user_name: user_name.try_into()?,
            which_jobs,
            my_jobs,
        })
    }
}

impl IppOperation for GetJobs {
    fn into_ipp_request(self) -> IppRequestResponse {
        let mut request = IppRequestResponse::new_internal(self.version(), Operation::GetJobs, Some(self.target));
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
        );
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(
                IppAttribute::WHICH_JOBS,
                IppValue::Keyword(self.which_jobs.as_keyword().try_into().expect("keyword literal fits")),
            ),
        );
        request.set_attribute(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(IppAttribute::MY_JOBS, IppValue::Boolean(self.my_jobs)),
        );
        request
    }
}

macro_rules! job_lifecycle_operation {
    ($name:ident, $op:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name {
            target: IppString,
            job_id: i32,
            user_name: IppName,
        }

        impl $name {
            pub fn new(printer_uri: Uri, job_id: i32, user_name: &str) -> Result<$name> {
                Ok($name {
                    target: IppString::try_from(printer_uri)?,
                    job_id,
                    user_name: user_name.try_into()?,
                })
            }
        }

        impl IppOperation for $name {
            fn into_ipp_request(self) -> IppRequestResponse {
                let mut request = IppRequestResponse::new_internal(self.version(), $op, Some(self.target));
                request.set_attribute(
                    DelimiterTag::OperationAttributes,
                    IppAttribute::new(IppAttribute::JOB_ID, IppValue::Integer(self.job_id)),
                );
                request.set_attribute(
                    DelimiterTag::OperationAttributes,
                    IppAttribute::new(IppAttribute::REQUESTING_USER_NAME, IppValue::NameWithoutLanguage(self.user_name)),
                );
                request
            }
        }
    };
}

job_lifecycle_operation!(CancelJob, Operation::CancelJob, "Cancel-Job (`0x0008`).");
job_lifecycle_operation!(HoldJob, Operation::HoldJob, "Hold-Job (`0x000C`).");
job_lifecycle_operation!(ReleaseJob, Operation::ReleaseJob, "Release-Job (`0x000D`).");
job_lifecycle_operation!(RestartJob, Operation::RestartJob, "Restart-Job (`0x000E`).");
