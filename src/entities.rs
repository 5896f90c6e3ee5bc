//!
//! Domain entities projected from raw IPP attribute groups
//!
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io::Read;

use crate::attribute::{IppAttribute, IppAttributeGroup};
use crate::error::{IppClientError, Result};
use crate::model::{DelimiterTag, JobState, PrinterState};
use crate::value::IppValue;
use crate::FromPrimitive as _;

/// CUPS flags printer-type implicit-class printers with this bit; used to
/// filter the synthetic "default printer" entry CUPS injects into
/// CUPS-Get-Printers responses.
const PRINTER_TYPE_IMPLICIT_CLASS: i32 = 0x0000_0004;

fn first_string(group: &IppAttributeGroup, name: &str) -> Option<String> {
    group.attributes().get(name).map(|attr| attr.value().to_string())
}

fn first_integer(group: &IppAttributeGroup, name: &str) -> Option<i32> {
    match group.attributes().get(name).map(IppAttribute::value) {
        Some(IppValue::Integer(n)) | Some(IppValue::Enum(n)) => Some(*n),
        _ => None,
    }
}

fn keyword_list(group: &IppAttributeGroup, name: &str) -> Vec<String> {
    match group.attributes().get(name).map(IppAttribute::value) {
        Some(IppValue::Array(values)) => values.iter().map(|v| v.to_string()).collect(),
        Some(value) => vec![value.to_string()],
        None => Vec::new(),
    }
}

/// A printer, projected from one `printer-attributes` group.
#[derive(Debug, Clone)]
pub struct Printer {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub state: Option<PrinterState>,
    pub state_reasons: BTreeSet<String>,
    pub is_default: bool,
    pub media_supported: Vec<String>,
    pub resolution_supported: Vec<String>,
    pub mime_types_supported: Vec<String>,
    pub attributes: IppAttributeGroup,
}

impl Printer {
    /// Project a `printer-attributes` group. `is_default` is supplied by the
    /// caller (the group itself carries no such flag; CUPS-Get-Default vs.
    /// CUPS-Get-Printers determines it).
    pub fn from_group(group: IppAttributeGroup, is_default: bool) -> Printer {
        let uri = first_string(&group, IppAttribute::PRINTER_URI_SUPPORTED)
            .or_else(|| first_string(&group, IppAttribute::PRINTER_URI))
            .unwrap_or_default();
        let name = first_string(&group, IppAttribute::PRINTER_NAME).unwrap_or_default();
        let description = first_string(&group, IppAttribute::PRINTER_INFO);
        let location = first_string(&group, IppAttribute::PRINTER_LOCATION);
        let state = first_integer(&group, IppAttribute::PRINTER_STATE).and_then(PrinterState::from_i32);
        let state_reasons = match group.attributes().get(IppAttribute::PRINTER_STATE_REASONS).map(IppAttribute::value)
        {
            Some(IppValue::Array(values)) => values.iter().map(|v| v.to_string()).collect(),
            Some(value) => BTreeSet::from([value.to_string()]),
            None => BTreeSet::new(),
        };
        let media_supported = keyword_list(&group, IppAttribute::MEDIA_SUPPORTED);
        let resolution_supported = keyword_list(&group, IppAttribute::PRINTER_RESOLUTION_SUPPORTED);
        let mime_types_supported = keyword_list(&group, IppAttribute::DOCUMENT_FORMAT_SUPPORTED);

        Printer {
            uri,
            name,
            description,
            location,
            state,
            state_reasons,
            is_default,
            media_supported,
            resolution_supported,
            mime_types_supported,
            attributes: group,
        }
    }

    /// Whether this entry is the CUPS-synthesized implicit-class printer
    /// that `getPrintersWithoutDefault`-style filtering should drop.
    pub fn is_implicit_class(&self) -> bool {
        first_integer(&self.attributes, IppAttribute::PRINTER_TYPE)
            .map(|t| t & PRINTER_TYPE_IMPLICIT_CLASS != 0)
            .unwrap_or(false)
    }
}

/// A document submission for Print-Job. Defaults match common expectations:
/// one upright monochrome single-sided copy.
pub struct PrintJob {
    pub document: Box<dyn Read + Send>,
    pub user_name: String,
    pub job_name: Option<String>,
    pub copies: u32,
    pub page_ranges: Option<String>,
    pub duplex: bool,
    pub portrait: bool,
    pub color: bool,
    pub page_format: Option<String>,
    pub resolution: Option<String>,
    pub operation_attributes: BTreeMap<String, String>,
    /// Extra job attributes beyond the named fields above, as
    /// `(name, syntax, value)` triples — `syntax` is an IPP value-syntax
    /// keyword (`integer`, `enum`, `boolean`, `uri`, ...); an unrecognized
    /// one is carried through as `keyword`. Use
    /// [`PrintJob::add_job_attributes_str`] to populate this from the
    /// `name:syntax:value#name:syntax:value` string format.
    pub job_attributes: Vec<(String, String, String)>,
}

impl PrintJob {
    /// A submission of `document` on behalf of `user_name`, with every other
    /// field at its default (copies=1, portrait, monochrome, single-sided).
    pub fn new(document: impl Read + Send + 'static, user_name: impl Into<String>) -> PrintJob {
        PrintJob {
            document: Box::new(document),
            user_name: user_name.into(),
            job_name: None,
            copies: 1,
            page_ranges: None,
            duplex: false,
            portrait: true,
            color: false,
            page_format: None,
            resolution: None,
            operation_attributes: BTreeMap::new(),
            job_attributes: Vec::new(),
        }
    }

    /// Parse `name:syntax:value` entries, separated by `#`, and append them
    /// to [`PrintJob::job_attributes`]. `value` may itself contain `:`
    /// characters — only the first two colons in an entry split off `name`
    /// and `syntax`.
    pub fn add_job_attributes_str(&mut self, spec: &str) -> Result<()> {
        self.job_attributes.extend(parse_job_attributes_spec(spec)?);
        Ok(())
    }
}

/// Parse the `name:syntax:value#name:syntax:value` job-attribute string
/// format into `(name, syntax, value)` triples.
pub fn parse_job_attributes_spec(spec: &str) -> Result<Vec<(String, String, String)>> {
    spec.split('#')
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(syntax), Some(value)) if !name.is_empty() && !syntax.is_empty() => {
                    Ok((name.to_owned(), syntax.to_owned(), value.to_owned()))
                }
                _ => Err(IppClientError::InvalidArgument(format!(
                    "malformed job attribute entry {entry:?}, expected name:syntax:value"
                ))),
            }
        })
        .collect()
}

/// The attributes of a print job as returned by Print-Job, Get-Job-Attributes
/// or Get-Jobs.
#[derive(Debug, Clone)]
pub struct PrintJobAttributes {
    pub job_id: Option<i32>,
    pub job_uri: Option<String>,
    pub printer_uri: Option<String>,
    pub user_name: Option<String>,
    pub job_name: Option<String>,
    pub state: Option<JobState>,
    pub attributes: IppAttributeGroup,
}

impl PrintJobAttributes {
    pub fn from_group(group: IppAttributeGroup) -> PrintJobAttributes {
        PrintJobAttributes {
            job_id: first_integer(&group, IppAttribute::JOB_ID),
            job_uri: first_string(&group, IppAttribute::JOB_URI),
            printer_uri: first_string(&group, IppAttribute::JOB_PRINTER_URI),
            user_name: first_string(&group, IppAttribute::REQUESTING_USER_NAME),
            job_name: first_string(&group, IppAttribute::JOB_NAME),
            state: first_integer(&group, IppAttribute::JOB_STATE).and_then(JobState::from_i32),
            attributes: group,
        }
    }
}

/// HTTP Basic/Digest credentials for a CUPS server requiring authentication.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Credentials {
        Credentials {
            user: user.into(),
            password: Some(password.into()),
        }
    }
}

/// Project all groups of `tag` in `attrs` into `PrintJobAttributes`, one per
/// group (Get-Jobs carries one `job-attributes` group per job).
pub fn project_jobs(attrs: &crate::attribute::IppAttributes) -> Vec<PrintJobAttributes> {
    attrs
        .groups_of(DelimiterTag::JobAttributes)
        .cloned()
        .map(PrintJobAttributes::from_group)
        .collect()
}

/// Project all `printer-attributes` groups into [`Printer`]s. `default_uri`,
/// when known, marks the matching entry as the default.
pub fn project_printers(attrs: &crate::attribute::IppAttributes, default_uri: Option<&str>) -> Vec<Printer> {
    attrs
        .groups_of(DelimiterTag::PrinterAttributes)
        .cloned()
        .map(|group| {
            let is_default = default_uri
                .zip(first_string(&group, IppAttribute::PRINTER_URI_SUPPORTED))
                .map(|(default, uri)| default == uri)
                .unwrap_or(false);
            Printer::from_group(group, is_default)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::IppValue;

    fn group_with(tag: DelimiterTag, pairs: Vec<(&str, IppValue)>) -> IppAttributeGroup {
        let mut group = IppAttributeGroup::new(tag);
        for (name, value) in pairs {
            group.attributes_mut().insert(name.to_owned(), IppAttribute::new(name, value));
        }
        group
    }

    #[test]
    fn printer_projects_idle_state() {
        let group = group_with(
            DelimiterTag::PrinterAttributes,
            vec![
                (IppAttribute::PRINTER_NAME, IppValue::NameWithoutLanguage("LaserJet".try_into().unwrap())),
                (
                    IppAttribute::PRINTER_URI_SUPPORTED,
                    IppValue::Uri("ipp://host:631/printers/LaserJet".try_into().unwrap()),
                ),
                (IppAttribute::PRINTER_STATE, IppValue::Enum(3)),
            ],
        );
        let printer = Printer::from_group(group, false);
        assert_eq!(printer.name, "LaserJet");
        assert_eq!(printer.state, Some(PrinterState::Idle));
    }

    #[test]
    fn implicit_class_printer_is_flagged() {
        let group = group_with(
            DelimiterTag::PrinterAttributes,
            vec![(IppAttribute::PRINTER_TYPE, IppValue::Integer(PRINTER_TYPE_IMPLICIT_CLASS))],
        );
        let printer = Printer::from_group(group, false);
        assert!(printer.is_implicit_class());
    }

    #[test]
    fn job_attributes_project_job_id_and_state() {
        let group = group_with(
            DelimiterTag::JobAttributes,
            vec![
                (IppAttribute::JOB_ID, IppValue::Integer(42)),
                (IppAttribute::JOB_STATE, IppValue::Enum(5)),
            ],
        );
        let job = PrintJobAttributes::from_group(group);
        assert_eq!(job.job_id, Some(42));
        assert_eq!(job.state, Some(JobState::Processing));
    }

    #[test]
    fn job_attributes_str_splits_on_hash_then_colon() {
        let parsed = parse_job_attributes_spec("job-priority:integer:50#job-hold-until:keyword:no-hold").unwrap();
        assert_eq!(
            parsed,
            vec![
                ("job-priority".to_owned(), "integer".to_owned(), "50".to_owned()),
                ("job-hold-until".to_owned(), "keyword".to_owned(), "no-hold".to_owned()),
            ]
        );
    }

    #[test]
    fn job_attributes_str_value_may_contain_colons() {
        let parsed = parse_job_attributes_spec("job-sheets:keyword:standard:a4").unwrap();
        assert_eq!(parsed, vec![("job-sheets".to_owned(), "keyword".to_owned(), "standard:a4".to_owned())]);
    }

    #[test]
    fn job_attributes_str_rejects_missing_value() {
        assert!(matches!(
            parse_job_attributes_spec("job-priority:integer"),
            Err(IppClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn add_job_attributes_str_appends_to_existing_triples() {
        let mut job = PrintJob::new(std::io::Cursor::new(Vec::<u8>::new()), "alice");
        job.job_attributes.push(("existing".to_owned(), "keyword".to_owned(), "x".to_owned()));
        job.add_job_attributes_str("job-priority:integer:50").unwrap();
        assert_eq!(
            job.job_attributes,
            vec![
                ("existing".to_owned(), "keyword".to_owned(), "x".to_owned()),
                ("job-priority".to_owned(), "integer".to_owned(), "50".to_owned()),
            ]
        );
    }
}
