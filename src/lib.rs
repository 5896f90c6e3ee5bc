//!
//! A synchronous client for the Internet Printing Protocol (IPP/1.1) and
//! the CUPS operation extensions layered on top of it.
//!
//! The crate is organized bottom-up: [`value`] and [`attribute`] implement
//! the wire data model, [`parser`]/[`reader`]/[`request`] implement the
//! codec, [`operation`] builds and interprets individual IPP operations,
//! [`transport`] carries them over HTTP, and [`client`] exposes the
//! stateless facade most callers want.

pub use num_traits::FromPrimitive;

pub mod attribute;
pub mod client;
pub mod entities;
pub mod error;
pub mod model;
pub mod operation;
pub mod parser;
pub mod reader;
pub mod request;
pub mod transport;
pub mod value;

pub use attribute::{IppAttribute, IppAttributeGroup, IppAttributes};
pub use client::{ClientConfig, CupsClient};
pub use entities::{Credentials, PrintJob, PrintJobAttributes, Printer};
pub use error::{IppClientError, Result};
pub use model::{DelimiterTag, JobState, Operation, PrinterState, StatusCode, ValueTag};
pub use parser::IppParseError;
pub use request::{IppHeader, IppRequestResponse};
pub use value::IppValue;
