//!
//! Streaming decoder for the IPP binary wire format
//!
use std::collections::BTreeMap;
use std::io::Read;

use thiserror::Error;

use crate::attribute::{IppAttribute, IppAttributeGroup};
use crate::model::{is_delimiter_tag, DelimiterTag, ValueTag};
use crate::reader::IppReader;
use crate::request::{IppHeader, IppRequestResponse};
use crate::value::{IppName, IppValue};
use crate::FromPrimitive as _;

/// Maximum nesting depth accepted for collection values.
const MAX_COLLECTION_DEPTH: usize = 16;

/// Errors produced while decoding an IPP message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IppParseError {
    #[error("unexpected end of message")]
    Truncated,
    #[error("unsupported or unknown tag 0x{0:02x}")]
    BadTag(u8),
    #[error("attribute group or value appeared out of order")]
    BadOrder,
    #[error("string length {len} exceeds maximum {max}")]
    InvalidStringLength { len: usize, max: u16 },
    #[error("value length mismatch: expected {expected}, found {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("I/O error: {0}")]
    Io(String),
}

/// Decodes a byte stream into an [`IppRequestResponse`].
pub struct IppParser<R> {
    reader: IppReader<R>,
}

impl<R: Read> IppParser<R> {
    pub fn new(reader: IppReader<R>) -> IppParser<R> {
        IppParser { reader }
    }

    /// Decode the full message: header, attribute groups, end-of-attributes tag.
    pub fn parse(&mut self) -> Result<IppRequestResponse, IppParseError> {
        let version_major = self.reader.read_u8()?;
        let version_minor = self.reader.read_u8()?;
        let code_or_status = self.reader.read_u16()?;
        let request_id = self.reader.read_u32()?;
        let header = IppHeader {
            version_major,
            version_minor,
            code_or_status,
            request_id,
        };

        let mut request = IppRequestResponse::from_header(header);
        let mut current_group: Option<IppAttributeGroup> = None;
        let mut pending: Option<IppAttribute> = None;

        loop {
            let tag = self.reader.read_u8()?;

            if tag == DelimiterTag::EndOfAttributes as u8 {
                Self::flush(&mut pending, &mut current_group);
                if let Some(group) = current_group.take() {
                    request.attributes.push_group(group);
                }
                break;
            }

            if is_delimiter_tag(tag) {
                Self::flush(&mut pending, &mut current_group);
                if let Some(group) = current_group.take() {
                    request.attributes.push_group(group);
                }
                let dtag = DelimiterTag::from_u8(tag).ok_or(IppParseError::BadTag(tag))?;
                current_group = Some(IppAttributeGroup::new(dtag));
                continue;
            }

            let name_len = self.reader.read_u16()? as usize;
            let name = if name_len > 0 {
                Some(self.reader.read_string(name_len)?)
            } else {
                None
            };
            let value_len = self.reader.read_u16()? as usize;

            let value = if tag == ValueTag::BegCollection as u8 {
                // begin-collection carries no value of its own; skip its
                // (always empty) length and decode members recursively.
                let _ = self.reader.read_bytes(value_len)?;
                IppValue::Collection(self.parse_collection(1)?)
            } else {
                let bytes = self.reader.read_bytes(value_len)?;
                IppValue::parse(tag, bytes)?
            };

            match (name, pending.take()) {
                (Some(n), Some(prev)) => {
                    if let Some(group) = current_group.as_mut() {
                        group_insert(group, prev);
                    } else {
                        return Err(IppParseError::BadOrder);
                    }
                    pending = Some(IppAttribute::new(n, value));
                }
                (Some(n), None) => {
                    pending = Some(IppAttribute::new(n, value));
                }
                (None, Some(prev)) => {
                    pending = Some(IppAttribute::new(prev.name().to_owned(), merge_value(prev.into_value(), value)));
                }
                (None, None) => return Err(IppParseError::BadOrder),
            }
        }

        Ok(request)
    }

    /// Decode the members of a (possibly nested) collection value, starting
    /// just after its `begCollection` framing has been consumed.
    fn parse_collection(&mut self, depth: usize) -> Result<BTreeMap<IppName, IppValue>, IppParseError> {
        if depth > MAX_COLLECTION_DEPTH {
            return Err(IppParseError::BadOrder);
        }

        let mut map = BTreeMap::new();
        let mut pending_member: Option<IppName> = None;

        loop {
            let tag = self.reader.read_u8()?;
            let name_len = self.reader.read_u16()? as usize;
            if name_len != 0 {
                // collection members are always encoded with a zero-length name
                return Err(IppParseError::BadOrder);
            }
            let value_len = self.reader.read_u16()? as usize;

            if tag == ValueTag::EndCollection as u8 {
                return Ok(map);
            }

            if tag == ValueTag::MemberAttrName as u8 {
                let bytes = self.reader.read_bytes(value_len)?;
                match IppValue::parse(tag, bytes)? {
                    IppValue::MemberAttrName(name) => pending_member = Some(name),
                    _ => return Err(IppParseError::BadOrder),
                }
                continue;
            }

            let value = if tag == ValueTag::BegCollection as u8 {
                let _ = self.reader.read_bytes(value_len)?;
                IppValue::Collection(self.parse_collection(depth + 1)?)
            } else {
                let bytes = self.reader.read_bytes(value_len)?;
                IppValue::parse(tag, bytes)?
            };

            let key = pending_member.take().ok_or(IppParseError::BadOrder)?;
            map.insert(key, value);
        }
    }

    fn flush(pending: &mut Option<IppAttribute>, group: &mut Option<IppAttributeGroup>) {
        if let Some(attr) = pending.take() {
            if let Some(group) = group.as_mut() {
                group_insert(group, attr);
            }
        }
    }
}

fn group_insert(group: &mut IppAttributeGroup, attr: IppAttribute) {
    group.attributes_mut().insert(attr.name().to_owned(), attr);
}

fn merge_value(existing: IppValue, next: IppValue) -> IppValue {
    match existing {
        IppValue::Array(mut values) => {
            values.push(next);
            IppValue::Array(values)
        }
        other => IppValue::Array(vec![other, next]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn truncated_header_is_classified() {
        let mut parser = IppParser::new(IppReader::new(Cursor::new(vec![1, 1])));
        assert!(matches!(parser.parse(), Err(IppParseError::Truncated)));
    }

    #[test]
    fn subscription_attributes_group_is_recognized() {
        let data = vec![1, 1, 0, 0, 0, 0, 0, 0, 0x06, 0x03];
        let mut parser = IppParser::new(IppReader::new(Cursor::new(data)));
        let result = parser.parse().unwrap();
        assert_eq!(result.attributes.groups_of(DelimiterTag::SubscriptionAttributes).count(), 1);
    }

    #[test]
    fn collection_depth_cap_is_enforced() {
        let mut data = vec![1, 1, 0, 0, 0, 0, 0, 0, 0x04];
        // an attribute that opens a begCollection without ever closing it,
        // repeated past the depth cap
        for _ in 0..20 {
            data.extend_from_slice(&[0x34, 0, 4, b'c', b'o', b'l', b'l', 0, 0]);
        }
        let mut parser = IppParser::new(IppReader::new(Cursor::new(data)));
        assert!(matches!(parser.parse(), Err(IppParseError::Truncated) | Err(IppParseError::BadOrder)));
    }
}
