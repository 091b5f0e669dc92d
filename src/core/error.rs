// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for the decoder.
//!
//! [`DecodeError`] is the core's own taxonomy (schema resolution and wire
//! decoding failures); [`Error`] is the crate-wide type that also carries the
//! ambient collaborators' failure modes (container I/O, archive extraction,
//! XML parsing).

use std::fmt;

/// Errors raised by the schema-directed wire decoder (C1-C4).
#[derive(Debug, Clone)]
pub enum DecodeError {
    /// Schema index could not find a `managedObject` with this class in either schema.
    UnknownClass {
        /// The class name that was looked up.
        name: String,
    },

    /// No `p`/`action` descriptor in the class maps to this field number.
    UnknownField {
        /// The class being decoded.
        class: String,
        /// The field number from the wire tag.
        field_number: u64,
    },

    /// An enum integer had no matching `enum value="..."` child.
    UnknownEnumValue {
        /// The decoded integer value.
        value: u64,
    },

    /// A composite field's descriptor has no preceding sibling in the schema.
    MissingSiblingDescriptor {
        /// The class being decoded.
        class: String,
        /// The field name whose sibling lookup failed.
        field: String,
    },

    /// The wire reader produced a wire type the core does not handle (I32 or UNKNOWN).
    UnsupportedWireType {
        /// The raw wire type value.
        wire_type: u8,
    },

    /// Advancing the cursor would exceed the buffer bound.
    TruncatedBuffer {
        /// Bytes requested.
        requested: usize,
        /// Bytes available from the cursor.
        available: usize,
        /// Cursor position at the point of failure.
        cursor_pos: usize,
    },

    /// Neither a `proto` child nor an `id` attribute is present on a descriptor.
    SchemaDialectError {
        /// The field-descriptor name that could not be resolved to a field number.
        field: String,
    },
}

impl DecodeError {
    pub fn unknown_class(name: impl Into<String>) -> Self {
        DecodeError::UnknownClass { name: name.into() }
    }

    pub fn unknown_field(class: impl Into<String>, field_number: u64) -> Self {
        DecodeError::UnknownField {
            class: class.into(),
            field_number,
        }
    }

    pub fn unknown_enum_value(value: u64) -> Self {
        DecodeError::UnknownEnumValue { value }
    }

    pub fn missing_sibling_descriptor(class: impl Into<String>, field: impl Into<String>) -> Self {
        DecodeError::MissingSiblingDescriptor {
            class: class.into(),
            field: field.into(),
        }
    }

    pub fn unsupported_wire_type(wire_type: u8) -> Self {
        DecodeError::UnsupportedWireType { wire_type }
    }

    pub fn truncated_buffer(requested: usize, available: usize, cursor_pos: usize) -> Self {
        DecodeError::TruncatedBuffer {
            requested,
            available,
            cursor_pos,
        }
    }

    pub fn schema_dialect_error(field: impl Into<String>) -> Self {
        DecodeError::SchemaDialectError {
            field: field.into(),
        }
    }

    /// Structured fields for tracing spans/events.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            DecodeError::UnknownClass { name } => vec![("class", name.clone())],
            DecodeError::UnknownField {
                class,
                field_number,
            } => vec![
                ("class", class.clone()),
                ("field_number", field_number.to_string()),
            ],
            DecodeError::UnknownEnumValue { value } => vec![("value", value.to_string())],
            DecodeError::MissingSiblingDescriptor { class, field } => {
                vec![("class", class.clone()), ("field", field.clone())]
            }
            DecodeError::UnsupportedWireType { wire_type } => {
                vec![("wire_type", wire_type.to_string())]
            }
            DecodeError::TruncatedBuffer {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            DecodeError::SchemaDialectError { field } => vec![("field", field.clone())],
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownClass { name } => write!(f, "unknown class '{name}'"),
            DecodeError::UnknownField {
                class,
                field_number,
            } => write!(f, "unknown field {field_number} on class '{class}'"),
            DecodeError::UnknownEnumValue { value } => {
                write!(f, "no enum member matches value {value}")
            }
            DecodeError::MissingSiblingDescriptor { class, field } => write!(
                f,
                "field '{field}' on class '{class}' has no preceding sibling descriptor"
            ),
            DecodeError::UnsupportedWireType { wire_type } => {
                write!(f, "unsupported wire type {wire_type}")
            }
            DecodeError::TruncatedBuffer {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "truncated buffer: requested {requested} bytes at position {cursor_pos}, only {available} available"
            ),
            DecodeError::SchemaDialectError { field } => write!(
                f,
                "field '{field}' has neither a proto child nor an id attribute"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Crate-wide error, wrapping the core decode taxonomy alongside the ambient
/// collaborators' failure modes (container I/O, archive extraction, XML parsing).
#[derive(Debug)]
pub enum Error {
    /// A core decode failure, attributed to the change that triggered it.
    Decode {
        /// Name of the change being decoded when the error occurred.
        change: String,
        /// The underlying decode error.
        source: DecodeError,
    },

    /// Underlying file/stream I/O failure.
    Io {
        /// What was being read or written.
        context: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The 12-byte frame magic did not match at the expected offset.
    BadMagic {
        /// Byte offset where the magic was expected.
        offset: u64,
    },

    /// Zip extraction of the META frame failed.
    Archive {
        /// What was being extracted.
        context: String,
        /// Error message from the archive library.
        message: String,
    },

    /// XML parsing of a schema document failed.
    Xml {
        /// Which schema document (e.g. "bm/meta.xml").
        document: String,
        /// Error message from the XML parser.
        message: String,
    },

    /// Other error not covered by the above (unsupported frame/compression kind, etc).
    Other(String),
}

impl Error {
    pub fn decode(change: impl Into<String>, source: DecodeError) -> Self {
        Error::Decode {
            change: change.into(),
            source,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub fn bad_magic(offset: u64) -> Self {
        Error::BadMagic { offset }
    }

    pub fn archive(context: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Archive {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn xml(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Xml {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Structured fields for tracing spans/events.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Error::Decode { change, source } => {
                let mut fields = vec![("change", change.clone())];
                fields.extend(source.log_fields());
                fields
            }
            Error::Io { context, source } => {
                vec![("context", context.clone()), ("cause", source.to_string())]
            }
            Error::BadMagic { offset } => vec![("offset", offset.to_string())],
            Error::Archive { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            Error::Xml { document, message } => {
                vec![("document", document.clone()), ("message", message.clone())]
            }
            Error::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode { change, source } => {
                write!(f, "failed to decode change '{change}': {source}")
            }
            Error::Io { context, source } => write!(f, "I/O error ({context}): {source}"),
            Error::BadMagic { offset } => {
                write!(f, "frame magic mismatch at offset {offset}")
            }
            Error::Archive { context, message } => {
                write!(f, "archive error ({context}): {message}")
            }
            Error::Xml { document, message } => {
                write!(f, "XML parse error in {document}: {message}")
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io("I/O", err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::decode("<unattributed>", err)
    }
}

/// Result type for core decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Result type for crate-wide operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_includes_context() {
        let err = DecodeError::unknown_field("Cell", 7);
        assert_eq!(err.to_string(), "unknown field 7 on class 'Cell'");
    }

    #[test]
    fn decode_error_log_fields_cover_variant_data() {
        let err = DecodeError::truncated_buffer(8, 3, 12);
        let fields = err.log_fields();
        assert!(fields.contains(&("requested", "8".to_string())));
        assert!(fields.contains(&("available", "3".to_string())));
        assert!(fields.contains(&("cursor", "12".to_string())));
    }

    #[test]
    fn wrapped_decode_error_attributes_the_change() {
        let err = Error::decode("RncFunction-1", DecodeError::unknown_class("RncFunction"));
        assert_eq!(
            err.to_string(),
            "failed to decode change 'RncFunction-1': unknown class 'RncFunction'"
        );
    }

    #[test]
    fn io_error_converts_with_generic_context() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
