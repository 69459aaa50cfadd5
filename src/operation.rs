//! OpenAPI operation metadata collected from registered procedures.

/// Metadata for a single API operation, used to generate the OpenAPI spec.
pub struct Meta {
    pub path: String,
    pub method: String,
    pub summary: String,
    pub tag: String,
    pub status: u16,
    pub input_schema: Option<schemars::Schema>,
    /// `None` for operations answering without a body.
    pub output_schema: Option<schemars::Schema>,
}

impl Meta {
    /// Names of the `{param}` segments in the path.
    pub fn path_params(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}
