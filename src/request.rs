//!
//! The in-memory representation of an IPP request or response
//!
use std::fmt;
use std::io::Read;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use http::Uri;

use crate::attribute::{IppAttribute, IppAttributes};
use crate::model::{DelimiterTag, Operation};
use crate::parser::{IppParseError, IppParser};
use crate::reader::IppReader;
use crate::value::{IppString, IppValue};

static NEXT_REQUEST_ID: AtomicU32 = AtomicU32::new(1);

fn next_request_id() -> u32 {
    NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
}

/// The 8-byte header every IPP message starts with. `code_or_status` carries
/// the operation id on a request and the status code on a response — the
/// wire format uses the same two bytes for both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IppHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub code_or_status: u16,
    pub request_id: u32,
}

impl IppHeader {
    pub fn new(version: (u8, u8), code_or_status: u16, request_id: u32) -> IppHeader {
        IppHeader {
            version_major: version.0,
            version_minor: version.1,
            code_or_status,
            request_id,
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(8);
        buffer.put_u8(self.version_major);
        buffer.put_u8(self.version_minor);
        buffer.put_u16(self.code_or_status);
        buffer.put_u32(self.request_id);
        buffer.freeze()
    }
}

/// An IPP request or a decoded IPP response: header, attribute groups, and
/// an optional document stream (request side only — print data follows the
/// attributes in the body of a Print-Job/Send-Document request).
pub struct IppRequestResponse {
    pub header: IppHeader,
    pub attributes: IppAttributes,
    pub payload: Option<Box<dyn Read + Send>>,
}

impl fmt::Debug for IppRequestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IppRequestResponse")
            .field("header", &self.header)
            .field("attributes", &self.attributes)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

impl IppRequestResponse {
    /// Build a new request for `operation`, optionally targeting `uri`
    /// (encoded as the `printer-uri` operation attribute). Fails if `uri`
    /// does not fit the IPP `uri` value length bound.
    pub fn new(version: (u8, u8), operation: Operation, uri: Option<Uri>) -> Result<IppRequestResponse, IppParseError> {
        let uri = uri.map(IppString::try_from).transpose()?;
        Ok(IppRequestResponse::new_internal(version, operation, uri))
    }

    /// Like [`IppRequestResponse::new`] but takes an already-validated
    /// target string, so it cannot fail.
    pub fn new_internal(version: (u8, u8), operation: Operation, uri: Option<IppString>) -> IppRequestResponse {
        let mut attributes = IppAttributes::new();
        attributes.add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(
                IppAttribute::ATTRIBUTES_CHARSET,
                IppValue::Charset("utf-8".try_into().expect("charset literal fits")),
            ),
        );
        attributes.add(
            DelimiterTag::OperationAttributes,
            IppAttribute::new(
                IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
                IppValue::NaturalLanguage("en".try_into().expect("language literal fits")),
            ),
        );
        if let Some(uri) = uri {
            attributes.add(
                DelimiterTag::OperationAttributes,
                IppAttribute::new(IppAttribute::PRINTER_URI, IppValue::Uri(uri)),
            );
        }

        IppRequestResponse {
            header: IppHeader::new(version, operation as u16, next_request_id()),
            attributes,
            payload: None,
        }
    }

    pub(crate) fn from_header(header: IppHeader) -> IppRequestResponse {
        IppRequestResponse {
            header,
            attributes: IppAttributes::new(),
            payload: None,
        }
    }

    /// The IPP protocol version this message was built/decoded with.
    pub fn version(&self) -> (u8, u8) {
        (self.header.version_major, self.header.version_minor)
    }

    /// Add or replace an attribute in the group identified by `tag`.
    pub fn set_attribute(&mut self, tag: DelimiterTag, attribute: IppAttribute) {
        self.attributes.add(tag, attribute);
    }

    /// Attach a document stream to be written after the attribute groups.
    pub fn set_payload(&mut self, payload: Box<dyn Read + Send>) {
        self.payload = Some(payload);
    }

    /// Encode the header and attribute groups. The document payload, if any,
    /// is streamed separately by the transport layer rather than buffered here.
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        buffer.put(self.header.to_bytes());
        buffer.put(self.attributes.to_bytes());
        buffer.freeze()
    }

    /// Decode a full message (header + attribute groups) from a byte source.
    pub fn from_reader<R: Read>(reader: R) -> Result<IppRequestResponse, IppParseError> {
        IppParser::new(IppReader::new(reader)).parse()
    }
}
