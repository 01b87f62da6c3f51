//! The response-side error model.

use std::{error::Error, fmt, sync::Arc};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::{
    parser::{ParseError, SourceLocation, SourcePosition, Spanning},
    value::Value,
};

/// One step of a response path: a field's response key or a list index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathSegment::Key(k) => serializer.serialize_str(k),
            PathSegment::Index(i) => serializer.serialize_u64(*i as u64),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An error reported in a request's response.
///
/// Carries the human-readable message, the source positions of the nodes
/// involved, and the response path of the field the error occurred at (empty
/// for syntax, validation and variable-coercion errors). An opaque
/// `original_error` may be attached for server-side logging; it is never
/// serialized.
#[derive(Clone)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<SourceLocation>,
    pub path: Vec<PathSegment>,
    pub extensions: Value,
    pub original_error: Option<Arc<dyn Error + Send + Sync>>,
}

impl GraphQLError {
    /// Creates an error located at the given source positions.
    pub fn new(message: impl Into<String>, positions: &[SourcePosition]) -> Self {
        Self {
            message: message.into(),
            locations: positions.iter().map(position_to_location).collect(),
            path: Vec::new(),
            extensions: Value::Null,
            original_error: None,
        }
    }

    /// Attaches a response path.
    #[must_use]
    pub fn at_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// Attaches resolver-provided extension data.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = extensions;
        self
    }

    /// Attaches the underlying cause for server-side logging.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn Error + Send + Sync>) -> Self {
        self.original_error = Some(source);
        self
    }

    /// Converts a parse failure into the response error format.
    pub fn from_parse_error(error: &Spanning<ParseError>, source_name: &str) -> Self {
        let location = position_to_location(&error.span.start);
        Self {
            message: format!(
                "Syntax Error {source_name} ({}:{}) {}",
                location.line, location.column, error.item,
            ),
            locations: vec![location],
            path: Vec::new(),
            extensions: Value::Null,
            original_error: None,
        }
    }
}

fn position_to_location(pos: &SourcePosition) -> SourceLocation {
    SourceLocation {
        line: pos.line() + 1,
        column: pos.column() + 1,
    }
}

impl PartialEq for GraphQLError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.locations == other.locations
            && self.path == other.path
    }
}

impl fmt::Debug for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQLError")
            .field("message", &self.message)
            .field("locations", &self.locations)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.path.is_empty() {
            write!(
                f,
                " At path {}",
                itertools::Itertools::format(self.path.iter(), "."),
            )?;
        }
        if let Some(location) = self.locations.first() {
            write!(f, " ({}:{})", location.line, location.column)?;
        }
        Ok(())
    }
}

impl Error for GraphQLError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.original_error
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl Serialize for GraphQLError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("message", &self.message)?;
        if !self.locations.is_empty() {
            map.serialize_entry("locations", &self.locations)?;
        }
        if !self.path.is_empty() {
            map.serialize_entry("path", &self.path)?;
        }
        if !self.extensions.is_null_or_undefined() {
            map.serialize_entry("extensions", &self.extensions)?;
        }
        map.end()
    }
}
