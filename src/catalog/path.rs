//! Path template rendering
//!
//! Each placeholder value is pushed as a single percent-encoded path segment,
//! so table names containing spaces or slashes stay one segment.

use std::collections::BTreeMap;

use reqwest::Url;

use crate::error::{AirtableError, Result};

use super::descriptor::{OperationDescriptor, placeholder_name};

impl OperationDescriptor {
    /// Resolve the concrete URL under `base`.
    ///
    /// Every placeholder must have a non-empty value; all missing names are
    /// reported together.
    pub fn render_url(&self, base: &Url, path_params: &BTreeMap<String, String>) -> Result<Url> {
        let mut segments = Vec::new();
        let mut missing = Vec::new();

        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            match placeholder_name(segment) {
                Some(name) => match path_params.get(name).filter(|v| !v.is_empty()) {
                    Some(value) => segments.push(value.as_str()),
                    None => missing.push(name),
                },
                None => segments.push(segment),
            }
        }

        if !missing.is_empty() {
            return Err(AirtableError::MissingParameter(missing.join(", ")));
        }

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| AirtableError::InvalidArgument(format!("API base URL cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
