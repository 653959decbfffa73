// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operation name templates.
//!
//! A template is a `/`-separated list of literal segments and placeholders.
//! Placeholders start with an underscore, e.g. `list/genotype/_nperpage/page/_num`.
//! Templates are recognised by an ordered list of patterns; the first pattern
//! that matches decides the shape of the operation.

use std::collections::BTreeMap;

use bms_interop_domain::EntityKind;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::CoreError;

/// What an operation does, as decided by the pattern that recognised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationShape {
    /// `get/<entity>/_id`
    Get { entity: String },
    /// `list/<entity>`
    List { entity: String },
    /// `list/<entity>/_nperpage/page/_num`
    PagedList { entity: String },
    /// `<parent>/_<parentid>/list/<child>`
    ListChildren {
        parent: String,
        parent_param: String,
        child: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A template that has been recognised by one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTemplate {
    template: String,
    shape: OperationShape,
    segments: Vec<Segment>,
}

/// Placeholder values extracted from a concrete request path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    params: BTreeMap<String, String>,
}

impl Invocation {
    /// Returns the value bound to a placeholder, named without its underscore.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl OperationTemplate {
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub const fn shape(&self) -> &OperationShape {
        &self.shape
    }

    /// Names of the placeholders in the order they appear.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches a concrete request path against this template.
    ///
    /// Literal segments compare case-insensitively; every placeholder must
    /// receive a non-empty value. Returns `None` when the path does not fit.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Invocation> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if !literal.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(Invocation { params })
    }

    fn from_shape(template: &str, shape: OperationShape) -> Self {
        let segments = template
            .split('/')
            .map(|part| {
                part.strip_prefix('_').map_or_else(
                    || Segment::Literal(part.to_string()),
                    |name| Segment::Placeholder(name.to_string()),
                )
            })
            .collect();
        Self {
            template: template.to_string(),
            shape,
            segments,
        }
    }
}

type ShapeBuilder = fn(&Captures<'_>) -> OperationShape;

fn capture(captures: &Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map_or_else(String::new, |m| m.as_str().to_string())
}

fn get_shape(c: &Captures<'_>) -> OperationShape {
    OperationShape::Get {
        entity: capture(c, 1),
    }
}

fn list_shape(c: &Captures<'_>) -> OperationShape {
    OperationShape::List {
        entity: capture(c, 1),
    }
}

fn paged_list_shape(c: &Captures<'_>) -> OperationShape {
    OperationShape::PagedList {
        entity: capture(c, 1),
    }
}

fn list_children_shape(c: &Captures<'_>) -> OperationShape {
    OperationShape::ListChildren {
        parent: capture(c, 1),
        parent_param: capture(c, 2),
        child: capture(c, 3),
    }
}

const PATTERNS: [(&str, ShapeBuilder); 4] = [
    (r"^get/([a-z][a-z0-9]*)/_id$", get_shape),
    (r"^list/([a-z][a-z0-9]*)$", list_shape),
    (r"^list/([a-z][a-z0-9]*)/_nperpage/page/_num$", paged_list_shape),
    (
        r"^([a-z][a-z0-9]*)/_([a-z][a-z0-9]*)/list/([a-z][a-z0-9]*)$",
        list_children_shape,
    ),
];

/// The ordered list of template patterns. First match wins.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    patterns: Vec<(Regex, ShapeBuilder)>,
}

impl TemplateMatcher {
    /// Compiles the built-in patterns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPattern` if a pattern fails to compile.
    pub fn new() -> Result<Self, CoreError> {
        let patterns = PATTERNS
            .iter()
            .map(|(pattern, builder)| {
                Regex::new(pattern)
                    .map(|regex| (regex, *builder))
                    .map_err(|e| CoreError::InvalidPattern {
                        pattern: (*pattern).to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Recognises a template string.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnsupportedTemplate` if no pattern matches.
    pub fn parse(&self, template: &str) -> Result<OperationTemplate, CoreError> {
        self.patterns
            .iter()
            .find_map(|(regex, builder)| regex.captures(template).map(|c| builder(&c)))
            .map(|shape| OperationTemplate::from_shape(template, shape))
            .ok_or_else(|| CoreError::UnsupportedTemplate(template.to_string()))
    }
}

/// One registered template, bound to an entity type and a provider.
#[derive(Debug, Clone)]
pub struct Registration<P> {
    pub template: OperationTemplate,
    pub entity: EntityKind,
    pub provider: P,
}

/// Ordered set of operation registrations.
///
/// Templates are recognised when registered, so a malformed template fails
/// while the adapter is being assembled rather than at first dispatch.
#[derive(Debug, Clone)]
pub struct OperationRegistry<P> {
    matcher: TemplateMatcher,
    registrations: Vec<Registration<P>>,
}

impl<P> OperationRegistry<P> {
    /// Creates an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in patterns fail to compile.
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            matcher: TemplateMatcher::new()?,
            registrations: Vec::new(),
        })
    }

    /// Registers a template for an entity type.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnsupportedTemplate` if no pattern recognises the
    /// template, or `CoreError::DuplicateTemplate` if it is already registered.
    pub fn register(
        &mut self,
        template: &str,
        entity: EntityKind,
        provider: P,
    ) -> Result<&mut Self, CoreError> {
        if self
            .registrations
            .iter()
            .any(|r| r.template.template() == template)
        {
            return Err(CoreError::DuplicateTemplate(template.to_string()));
        }

        let template = self.matcher.parse(template)?;
        debug!(template = template.template(), %entity, "Registered operation template");
        self.registrations.push(Registration {
            template,
            entity,
            provider,
        });
        Ok(self)
    }

    #[must_use]
    pub fn registrations(&self) -> &[Registration<P>] {
        &self.registrations
    }

    /// Builds one value per registration, in registration order.
    pub fn build<T>(&self, builder: impl Fn(&Registration<P>) -> T) -> Vec<T> {
        self.registrations.iter().map(builder).collect()
    }
}
