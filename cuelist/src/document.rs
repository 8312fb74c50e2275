//! Document structure: a head describing the schema and a body.

use crate::element::Body;

/// A cue list document, created by the `X!` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub head: Option<Head>,
    pub body: Option<Body>,
}

/// Known schema versions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    #[default]
    Empty,
    P400,
    P676,

    /// A version number this reader does not know about
    Other(i32),
}

/// Head using one of the schemas built into the reader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredefinedSchemaHead {
    pub schema_version: SchemaVersion,
    pub schema_id: i32,
    pub title: String,
}

/// Head referring to an external schema file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedSchemaHead {
    pub schema_version: SchemaVersion,
    pub title: String,
    pub schema_path: String,

    /// Number of string parameters received so far
    strings: u8,
}

/// Document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Predefined(PredefinedSchemaHead),
    Linked(LinkedSchemaHead),
}

impl From<i32> for SchemaVersion {
    fn from(value: i32) -> Self {
        match value {
            0 => SchemaVersion::Empty,
            4 => SchemaVersion::P400,
            6 => SchemaVersion::P676,
            other => SchemaVersion::Other(other),
        }
    }
}

impl From<SchemaVersion> for i32 {
    fn from(value: SchemaVersion) -> Self {
        match value {
            SchemaVersion::Empty => 0,
            SchemaVersion::P400 => 4,
            SchemaVersion::P676 => 6,
            SchemaVersion::Other(other) => other,
        }
    }
}

impl Document {
    /// A document with an empty body and no head yet
    pub fn new() -> Self {
        Self {
            head: None,
            body: Some(Body::new()),
        }
    }
}

impl LinkedSchemaHead {
    pub fn new(title: impl Into<String>, schema_path: impl Into<String>) -> Self {
        Self {
            schema_version: SchemaVersion::Empty,
            title: title.into(),
            schema_path: schema_path.into(),
            strings: 2,
        }
    }
}

impl Head {
    pub fn predefined() -> Self {
        Head::Predefined(PredefinedSchemaHead::default())
    }

    pub fn linked() -> Self {
        Head::Linked(LinkedSchemaHead::default())
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            Head::Predefined(head) => head.schema_version,
            Head::Linked(head) => head.schema_version,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Head::Predefined(head) => &head.title,
            Head::Linked(head) => &head.title,
        }
    }

    /// How many string parameters a `X+` command carries for this head
    pub(crate) fn string_params(&self) -> usize {
        match self {
            Head::Predefined(_) => 1,
            Head::Linked(_) => 2,
        }
    }

    /// A predefined head reads its version first, then its schema id.  A
    /// linked head only takes a version.
    pub fn add_num_param(&mut self, v: i32) {
        match self {
            Head::Predefined(head) => {
                if head.schema_version == SchemaVersion::Empty {
                    head.schema_version = v.into();
                } else {
                    head.schema_id = v;
                }
            }
            Head::Linked(head) => head.schema_version = v.into(),
        }
    }

    /// A predefined head only has a title.  A linked head reads its title
    /// first, then the schema path.
    pub fn add_str_param(&mut self, value: &str) {
        match self {
            Head::Predefined(head) => head.title = value.to_string(),
            Head::Linked(head) => {
                if head.strings == 0 {
                    head.title = value.to_string();
                } else {
                    head.schema_path = value.to_string();
                }
                head.strings = head.strings.saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_head_reads_version_then_id() {
        let mut head = Head::predefined();
        head.add_num_param(4);
        head.add_num_param(17);
        head.add_num_param(18);

        assert_eq!(
            head,
            Head::Predefined(PredefinedSchemaHead {
                schema_version: SchemaVersion::P400,
                schema_id: 18,
                title: String::new(),
            })
        );
    }

    #[test]
    fn zero_version_keeps_waiting_for_a_version() {
        let mut head = Head::predefined();
        head.add_num_param(0);
        head.add_num_param(6);

        assert_eq!(head.schema_version(), SchemaVersion::P676);
    }

    #[test]
    fn linked_head_reads_title_then_path() {
        let mut head = Head::linked();
        head.add_num_param(6);
        head.add_num_param(4);
        head.add_str_param("");
        head.add_str_param("schemas/show.xsd");

        let mut expected = LinkedSchemaHead::new("", "schemas/show.xsd");
        expected.schema_version = SchemaVersion::P400;
        assert_eq!(head, Head::Linked(expected));
    }

    #[test]
    fn unknown_versions_round_trip() {
        assert_eq!(SchemaVersion::from(9), SchemaVersion::Other(9));
        assert_eq!(i32::from(SchemaVersion::Other(9)), 9);
        assert_eq!(i32::from(SchemaVersion::P676), 6);
    }
}
