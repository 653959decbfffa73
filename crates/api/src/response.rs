// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Output sink for listings.

use serde_json::{Map, Value};

/// Receives a listing as a sequence of sections and elements.
///
/// A listing announces each section with `add_response_meta`, then emits
/// elements as `start_tag`, any number of `attribute` calls, and `end_tag`.
pub trait DalResponseBuilder {
    fn add_response_meta(&mut self, section: &str);
    fn start_tag(&mut self, tag: &str);
    fn attribute(&mut self, name: &str, value: &str);
    fn end_tag(&mut self);
}

/// Builds the DAL JSON layout:
///
/// ```json
/// {"RecordMeta": [{"TagName": "SystemGroup"}], "SystemGroup": [{"SystemGroupId": "1"}]}
/// ```
#[derive(Debug, Default)]
pub struct JsonResponseBuilder {
    meta: Vec<Value>,
    sections: Map<String, Value>,
    open: Option<(String, Map<String, Value>)>,
}

impl JsonResponseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finishes the document. An element left open is discarded.
    #[must_use]
    pub fn into_json(self) -> Value {
        let mut document = Map::new();
        document.insert("RecordMeta".to_string(), Value::Array(self.meta));
        document.extend(self.sections);
        Value::Object(document)
    }
}

impl DalResponseBuilder for JsonResponseBuilder {
    fn add_response_meta(&mut self, section: &str) {
        let mut meta = Map::new();
        meta.insert("TagName".to_string(), Value::String(section.to_string()));
        self.meta.push(Value::Object(meta));
        self.sections
            .entry(section.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
    }

    fn start_tag(&mut self, tag: &str) {
        self.open = Some((tag.to_string(), Map::new()));
    }

    fn attribute(&mut self, name: &str, value: &str) {
        if let Some((_, attributes)) = self.open.as_mut() {
            attributes.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    fn end_tag(&mut self) {
        if let Some((tag, attributes)) = self.open.take() {
            let section = self
                .sections
                .entry(tag)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(elements) = section {
                elements.push(Value::Object(attributes));
            }
        }
    }
}
