use wasm_bindgen::JsValue;

/// Coarse classification of a [`GpxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not a GPX document, or not well-formed XML.
    MalformedDocument,
    /// `lat`/`lon` absent or unparsable on a point element.
    MissingRequiredField,
    /// Element text that does not fit the field's type.
    TypeCoercionError,
    /// Failure of the underlying reader or writer.
    IoError,
}

#[derive(Debug, thiserror::Error)]
pub enum GpxError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Malformed GPX document: {0}")]
    MalformedDocument(String),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Invalid content '{value}' in <{element}>: expected {expected}")]
    TypeCoercion {
        element: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GpxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::XmlParse(_) | Self::MalformedDocument(_) => ErrorKind::MalformedDocument,
            Self::MissingAttribute { .. } | Self::InvalidAttribute { .. } => {
                ErrorKind::MissingRequiredField
            }
            Self::TypeCoercion { .. } => ErrorKind::TypeCoercionError,
            Self::Io(_) => ErrorKind::IoError,
        }
    }
}

impl From<GpxError> for JsValue {
    fn from(e: GpxError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
