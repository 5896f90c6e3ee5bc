//!
//! IPP tag, operation and status enumerations
//!
use enum_primitive_derive::Primitive;

/// Delimiter tags introduce an attribute group within an IPP message.
///
/// See [RFC 8010 §3.5.1](https://tools.ietf.org/html/rfc8010#section-3.5.1).
#[derive(Primitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DelimiterTag {
    OperationAttributes = 0x01,
    JobAttributes = 0x02,
    EndOfAttributes = 0x03,
    PrinterAttributes = 0x04,
    UnsupportedAttributes = 0x05,
    SubscriptionAttributes = 0x06,
    EventNotificationAttributes = 0x07,
}

/// Returns whether a raw tag byte is one of the [`DelimiterTag`] values.
pub fn is_delimiter_tag(tag: u8) -> bool {
    (0x01..=0x07).contains(&tag)
}

/// Returns whether a raw tag byte is a value-tag (out-of-band, integer,
/// octet or character-string family).
pub fn is_value_tag(tag: u8) -> bool {
    tag == 0x10 || tag == 0x12 || tag == 0x13 || (0x20..=0x4a).contains(&tag)
}

/// IPP attribute value tags, see [RFC 8010 §3.5.2](https://tools.ietf.org/html/rfc8010#section-3.5.2).
#[derive(Primitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Unsupported = 0x10,
    Unknown = 0x12,
    NoValue = 0x13,
    Integer = 0x21,
    Boolean = 0x22,
    Enum = 0x23,
    OctetStringUnspecified = 0x30,
    DateTime = 0x31,
    Resolution = 0x32,
    RangeOfInteger = 0x33,
    BegCollection = 0x34,
    TextWithLanguage = 0x35,
    NameWithLanguage = 0x36,
    EndCollection = 0x37,
    TextWithoutLanguage = 0x41,
    NameWithoutLanguage = 0x42,
    Keyword = 0x44,
    Uri = 0x45,
    UriScheme = 0x46,
    Charset = 0x47,
    NaturalLanguage = 0x48,
    MimeMediaType = 0x49,
    MemberAttrName = 0x4a,
}

/// IPP/CUPS operation codes carried in the request header.
#[derive(Primitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    PrintJob = 0x0002,
    ValidateJob = 0x0001,
    CancelJob = 0x0008,
    GetJobAttributes = 0x0009,
    GetJobs = 0x000A,
    GetPrinterAttributes = 0x000B,
    HoldJob = 0x000C,
    ReleaseJob = 0x000D,
    RestartJob = 0x000E,
    CupsGetDefault = 0x4001,
    CupsGetPrinters = 0x4002,
    CupsMoveJob = 0x400D,
}

/// A 16-bit IPP status code, classified per [RFC 8011 §13](https://tools.ietf.org/html/rfc8011#section-13).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0x0000);

    /// `status-code < 0x0100` — successful-ok or successful-with-warnings.
    pub fn is_success(&self) -> bool {
        self.0 < 0x0100
    }

    pub fn is_client_error(&self) -> bool {
        (0x0400..=0x04FF).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (0x0500..=0x05FF).contains(&self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(value: u16) -> Self {
        StatusCode(value)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// `job-state` values, see [RFC 8011 §5.3.7](https://tools.ietf.org/html/rfc8011#section-5.3.7).
#[derive(Primitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending = 3,
    PendingHeld = 4,
    Processing = 5,
    ProcessingStopped = 6,
    Canceled = 7,
    Aborted = 8,
    Completed = 9,
}

/// `printer-state` values, see [RFC 8011 §5.4.15](https://tools.ietf.org/html/rfc8011#section-5.4.15).
#[derive(Primitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrinterState {
    Idle = 3,
    Processing = 4,
    Stopped = 5,
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    #[test]
    fn delimiter_roundtrip() {
        assert_eq!(DelimiterTag::from_u8(0x01), Some(DelimiterTag::OperationAttributes));
        assert_eq!(DelimiterTag::from_u8(0x03), Some(DelimiterTag::EndOfAttributes));
        assert_eq!(DelimiterTag::from_u8(0x99), None);
    }

    #[test]
    fn value_tag_roundtrip() {
        assert_eq!(ValueTag::from_u8(0x21), Some(ValueTag::Integer));
        assert_eq!(ValueTag::from_u8(0x45), Some(ValueTag::Uri));
    }

    #[test]
    fn tag_classification() {
        assert!(is_delimiter_tag(0x03));
        assert!(!is_delimiter_tag(0x21));
        assert!(is_value_tag(0x21));
        assert!(is_value_tag(0x10));
        assert!(!is_value_tag(0x03));
    }

    #[test]
    fn status_family() {
        assert!(StatusCode(0x0000).is_success());
        assert!(StatusCode(0x0001).is_success());
        assert!(!StatusCode(0x0400).is_success());
        assert!(StatusCode(0x040C).is_client_error());
        assert!(StatusCode(0x0503).is_server_error());
    }
}
