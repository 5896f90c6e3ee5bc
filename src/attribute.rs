//!
//! Attribute-related structs
//!
use bytes::{BufMut, Bytes, BytesMut};

use crate::model::DelimiterTag;
use crate::value::IppValue;

fn is_header_attr(attr: &str) -> bool {
    IppAttribute::HEADER_ATTRS.contains(&attr)
}

/// `IppAttribute` represents an IPP attribute: a name paired with a
/// (possibly multi-valued, possibly nested) typed value.
#[derive(Clone, Debug)]
pub struct IppAttribute {
    /// Attribute name
    name: String,
    /// Attribute value
    value: IppValue,
}

impl IppAttribute {
    pub const ATTRIBUTES_CHARSET: &'static str = "attributes-charset";
    pub const ATTRIBUTES_NATURAL_LANGUAGE: &'static str = "attributes-natural-language";
    pub const CHARSET_CONFIGURED: &'static str = "charset-configured";
    pub const CHARSET_SUPPORTED: &'static str = "charset-supported";
    pub const COLOR_SUPPORTED: &'static str = "color-supported";
    pub const COMPRESSION: &'static str = "compression";
    pub const COMPRESSION_SUPPORTED: &'static str = "compression-supported";
    pub const COPIES: &'static str = "copies";
    pub const COPIES_DEFAULT: &'static str = "copies-default";
    pub const COPIES_SUPPORTED: &'static str = "copies-supported";
    pub const DOCUMENT_FORMAT: &'static str = "document-format";
    pub const DOCUMENT_FORMAT_DEFAULT: &'static str = "document-format-default";
    pub const DOCUMENT_FORMAT_SUPPORTED: &'static str = "document-format-supported";
    pub const DOCUMENT_NATURAL_LANGUAGE: &'static str = "document-natural-language";
    pub const FINISHINGS_DEFAULT: &'static str = "finishings-default";
    pub const FINISHINGS_SUPPORTED: &'static str = "finishings-supported";
    pub const GENERATED_NATURAL_LANGUAGE_SUPPORTED: &'static str = "generated-natural-language-supported";
    pub const IPP_VERSIONS_SUPPORTED: &'static str = "ipp-versions-supported";
    pub const JOB_ID: &'static str = "job-id";
    pub const JOB_NAME: &'static str = "job-name";
    pub const JOB_PRINTER_URI: &'static str = "job-printer-uri";
    pub const JOB_STATE: &'static str = "job-state";
    pub const JOB_STATE_REASONS: &'static str = "job-state-reasons";
    pub const JOB_URI: &'static str = "job-uri";
    pub const LAST_DOCUMENT: &'static str = "last-document";
    pub const LIMIT: &'static str = "limit";
    pub const MEDIA: &'static str = "media";
    pub const MEDIA_DEFAULT: &'static str = "media-default";
    pub const MEDIA_SUPPORTED: &'static str = "media-supported";
    pub const MY_JOBS: &'static str = "my-jobs";
    pub const NATURAL_LANGUAGE_CONFIGURED: &'static str = "natural-language-configured";
    pub const OPERATIONS_SUPPORTED: &'static str = "operations-supported";
    pub const ORIENTATION_REQUESTED: &'static str = "orientation-requested";
    pub const ORIENTATION_REQUESTED_DEFAULT: &'static str = "orientation-requested-default";
    pub const ORIENTATION_REQUESTED_SUPPORTED: &'static str = "orientation-requested-supported";
    pub const OUTPUT_BIN_DEFAULT: &'static str = "output-bin-default";
    pub const OUTPUT_BIN_SUPPORTED: &'static str = "output-bin-supported";
    pub const OUTPUT_MODE: &'static str = "output-mode";
    pub const OUTPUT_MODE_SUPPORTED: &'static str = "output-mode-supported";
    pub const PAGE_RANGES: &'static str = "page-ranges";
    pub const PAGES_PER_MINUTE: &'static str = "pages-per-minute";
    pub const PDL_OVERRIDE_SUPPORTED: &'static str = "pdl-override-supported";
    pub const PRINT_QUALITY_DEFAULT: &'static str = "print-quality-default";
    pub const PRINT_QUALITY_SUPPORTED: &'static str = "print-quality-supported";
    pub const PRINTER_INFO: &'static str = "printer-info";
    pub const PRINTER_IS_ACCEPTING_JOBS: &'static str = "printer-is-accepting-jobs";
    pub const PRINTER_IS_SHARED: &'static str = "printer-is-shared";
    pub const PRINTER_LOCATION: &'static str = "printer-location";
    pub const PRINTER_MAKE_AND_MODEL: &'static str = "printer-make-and-model";
    pub const PRINTER_MORE_INFO: &'static str = "printer-more-info";
    pub const PRINTER_NAME: &'static str = "printer-name";
    pub const PRINTER_RESOLUTION: &'static str = "printer-resolution";
    pub const PRINTER_RESOLUTION_DEFAULT: &'static str = "printer-resolution-default";
    pub const PRINTER_RESOLUTION_SUPPORTED: &'static str = "printer-resolution-supported";
    pub const PRINTER_STATE: &'static str = "printer-state";
    pub const PRINTER_STATE_MESSAGE: &'static str = "printer-state-message";
    pub const PRINTER_STATE_REASONS: &'static str = "printer-state-reasons";
    pub const PRINTER_TYPE: &'static str = "printer-type";
    pub const PRINTER_UP_TIME: &'static str = "printer-up-time";
    pub const PRINTER_URI: &'static str = "printer-uri";
    pub const PRINTER_URI_SUPPORTED: &'static str = "printer-uri-supported";
    pub const QUEUED_JOB_COUNT: &'static str = "queued-job-count";
    pub const REQUESTED_ATTRIBUTES: &'static str = "requested-attributes";
    pub const REQUESTING_USER_NAME: &'static str = "requesting-user-name";
    pub const SIDES: &'static str = "sides";
    pub const SIDES_DEFAULT: &'static str = "sides-default";
    pub const SIDES_SUPPORTED: &'static str = "sides-supported";
    pub const STATUS_MESSAGE: &'static str = "status-message";
    pub const URI_AUTHENTICATION_SUPPORTED: &'static str = "uri-authentication-supported";
    pub const URI_SECURITY_SUPPORTED: &'static str = "uri-security-supported";
    pub const WHICH_JOBS: &'static str = "which-jobs";

    // Per RFC 8011 §4.1.4: "attributes-charset" and "attributes-natural-language"
    // MUST be the first two attributes of the Operation Attributes group, and
    // the operation target attribute ("printer-uri") MUST be third when present.
    const HEADER_ATTRS: [&'static str; 3] = [
        IppAttribute::ATTRIBUTES_CHARSET,
        IppAttribute::ATTRIBUTES_NATURAL_LANGUAGE,
        IppAttribute::PRINTER_URI,
    ];

    /// Create new instance of the attribute
    pub fn new<S>(name: S, value: IppValue) -> IppAttribute
    where
        S: AsRef<str>,
    {
        IppAttribute {
            name: name.as_ref().to_owned(),
            value,
        }
    }

    /// Return attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return attribute value
    pub fn value(&self) -> &IppValue {
        &self.value
    }

    /// Consume this attribute and return the value
    pub fn into_value(self) -> IppValue {
        self.value
    }

    /// Write attribute to byte array
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        buffer.put_u8(self.value.to_tag());
        buffer.put_u16(self.name.len() as u16);
        buffer.put_slice(self.name.as_bytes());
        buffer.put(self.value.to_bytes());
        buffer.freeze()
    }
}

/// A name→attribute map that preserves insertion order. A plain `HashMap`
/// would let a decode→re-encode round trip reorder attributes within a
/// group; re-inserting an already-seen name replaces it in place rather than
/// moving it to the end, so the wire order a decoder observed survives
/// re-encoding.
#[derive(Clone, Debug, Default)]
pub struct AttributeMap {
    entries: Vec<(String, IppAttribute)>,
}

impl AttributeMap {
    pub fn new() -> AttributeMap {
        AttributeMap::default()
    }

    pub fn get(&self, name: &str) -> Option<&IppAttribute> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, attr)| attr)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn insert(&mut self, name: String, attribute: IppAttribute) {
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = attribute;
        } else {
            self.entries.push((name, attribute));
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &IppAttribute> {
        self.entries.iter().map(|(_, attr)| attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IppAttribute)> {
        self.entries.iter().map(|(key, attr)| (key, attr))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, IppAttribute);
    type IntoIter = std::vec::IntoIter<(String, IppAttribute)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Attribute group: an ordered, delimiter-tagged collection of attributes.
///
/// One instance corresponds to exactly one occurrence of a delimiter tag on
/// the wire — a response listing several printers carries several
/// `PrinterAttributes` groups, one per printer.
#[derive(Clone, Debug)]
pub struct IppAttributeGroup {
    tag: DelimiterTag,
    attributes: AttributeMap,
}

impl IppAttributeGroup {
    /// Create new attribute group of a given type
    pub fn new(tag: DelimiterTag) -> IppAttributeGroup {
        IppAttributeGroup {
            tag,
            attributes: AttributeMap::new(),
        }
    }

    /// Return group type tag
    pub fn tag(&self) -> DelimiterTag {
        self.tag
    }

    /// Return read-only attributes, in the order they were inserted (decode
    /// order, for a parsed response).
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Return mutable attributes
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }

    /// Consume this group and return its attributes
    pub fn into_attributes(self) -> AttributeMap {
        self.attributes
    }

    fn insert(&mut self, attribute: IppAttribute) {
        self.attributes.insert(attribute.name().to_owned(), attribute);
    }
}

/// The ordered list of attribute groups making up a request or response body.
#[derive(Clone, Debug, Default)]
pub struct IppAttributes {
    groups: Vec<IppAttributeGroup>,
}

impl IppAttributes {
    /// Create an empty attribute list
    pub fn new() -> IppAttributes {
        IppAttributes::default()
    }

    /// Get all groups, in wire order
    pub fn groups(&self) -> &[IppAttributeGroup] {
        &self.groups
    }

    /// Get all mutable groups
    pub fn groups_mut(&mut self) -> &mut Vec<IppAttributeGroup> {
        &mut self.groups
    }

    /// Consume this attribute list and return all attribute groups
    pub fn into_groups(self) -> Vec<IppAttributeGroup> {
        self.groups
    }

    /// Append a new, distinct group (used by the decoder: every delimiter tag
    /// occurrence on the wire starts a fresh group, even when it repeats a
    /// tag already seen, e.g. one `PrinterAttributes` group per printer).
    pub fn push_group(&mut self, group: IppAttributeGroup) {
        self.groups.push(group);
    }

    /// Get an iterator over attribute groups matching a given delimiter tag
    pub fn groups_of(&self, tag: DelimiterTag) -> impl Iterator<Item = &IppAttributeGroup> {
        self.groups.iter().filter(move |g| g.tag == tag)
    }

    /// Add an attribute to the (first) group of the given tag, creating it if
    /// necessary. Intended for request assembly, where only one group per
    /// delimiter tag exists; use [`IppAttributes::push_group`] to decode
    /// responses with repeated groups.
    pub fn add(&mut self, tag: DelimiterTag, attribute: IppAttribute) {
        if let Some(group) = self.groups_mut().iter_mut().find(|g| g.tag() == tag) {
            group.insert(attribute);
        } else {
            let mut new_group = IppAttributeGroup::new(tag);
            new_group.insert(attribute);
            self.groups_mut().push(new_group);
        }
    }

    /// Write the attribute list to a byte buffer, `attributes-charset` and
    /// `attributes-natural-language` first per RFC 8011 §4.1.4.
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::new();

        buffer.put_u8(DelimiterTag::OperationAttributes as u8);

        if let Some(group) = self.groups_of(DelimiterTag::OperationAttributes).next() {
            for hdr in &IppAttribute::HEADER_ATTRS {
                if let Some(attr) = group.attributes().get(*hdr) {
                    buffer.put(attr.to_bytes());
                }
            }

            for attr in group.attributes().values() {
                if !is_header_attr(attr.name()) {
                    buffer.put(attr.to_bytes());
                }
            }
        }

        for group in self
            .groups()
            .iter()
            .filter(|group| group.tag() != DelimiterTag::OperationAttributes)
        {
            buffer.put_u8(group.tag() as u8);

            for attr in group.attributes().values() {
                buffer.put(attr.to_bytes());
            }
        }
        buffer.put_u8(DelimiterTag::EndOfAttributes as u8);

        buffer.freeze()
    }
}
