//! The element list and its persisted form.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::element::{Element, ElementId, ElementKind};

/// Errors from strict document parsing.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document has no elements array")]
    MissingElements,
    #[error("Invalid element at index {index}: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered element list. Array order is z-order, later elements on top.
///
/// Bindings between connectors and shapes are id lookups into this list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut doc = Self { elements };
        doc.sanitize();
        doc
    }

    /// Load a document, tolerating any input.
    ///
    /// Unparsable JSON, non-objects and a missing `elements` array give an
    /// empty document. Malformed element records are skipped.
    pub fn load(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                log::warn!("Discarding unparsable document: {err}");
                Self::default()
            }
        }
    }

    /// Lenient load from an already parsed value.
    pub fn from_value(value: Value) -> Self {
        let Some(items) = elements_array(value) else {
            log::info!("Document has no elements array, starting empty");
            return Self::default();
        };

        let mut elements = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Element>(item) {
                Ok(element) => elements.push(element),
                Err(err) => log::warn!("Skipping invalid element at index {index}: {err}"),
            }
        }

        let doc = Self::from_elements(elements);
        log::info!("Loaded document with {} elements", doc.len());
        doc
    }

    /// Strict load; every record must parse.
    pub fn try_from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        let items = elements_array(value).ok_or(DocumentError::MissingElements)?;
        let elements = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Element>(item)
                    .map_err(|source| DocumentError::InvalidElement { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_elements(elements))
    }

    /// The `{ "elements": [...] }` payload.
    pub fn to_value(&self) -> Value {
        // Element serialization has no fallible fields.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Null)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| &el.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Append an element on top. An element whose id is already present
    /// replaces the existing one in place.
    pub fn push(&mut self, element: Element) {
        match self.get_mut(&element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    /// Replace the element with the same id. Returns false if absent.
    pub fn replace(&mut self, element: Element) -> bool {
        match self.get_mut(&element.id) {
            Some(existing) => {
                *existing = element;
                true
            }
            None => false,
        }
    }

    /// Remove an element and null every binding that referenced it.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|el| &el.id == id)?;
        let removed = self.elements.remove(index);
        let severed = self.sever_bindings_to(id);
        if severed > 0 {
            log::debug!("Removed {id}, severed {severed} connector bindings");
        }
        Some(removed)
    }

    /// Ids of connectors with at least one end bound to `id`.
    pub fn connectors_bound_to(&self, id: &ElementId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| el.kind.is_connector() && el.is_bound_to(id))
            .map(|el| el.id.clone())
            .collect()
    }

    fn sever_bindings_to(&mut self, id: &ElementId) -> usize {
        let mut severed = 0;
        for el in &mut self.elements {
            for binding in [&mut el.start_binding_id, &mut el.end_binding_id] {
                if binding.as_ref() == Some(id) {
                    *binding = None;
                    severed += 1;
                }
            }
        }
        severed
    }

    /// Restore the document invariants after loading.
    ///
    /// Drops duplicate ids (first wins) and freedraw strokes without points,
    /// then nulls bindings that do not name an existing bindable shape.
    fn sanitize(&mut self) {
        let mut seen = HashSet::new();
        self.elements.retain(|el| {
            if !seen.insert(el.id.clone()) {
                log::warn!("Dropping element with duplicate id {}", el.id);
                return false;
            }
            if el.kind == ElementKind::Freedraw && el.points.is_empty() {
                log::warn!("Dropping freedraw element {} without points", el.id);
                return false;
            }
            true
        });

        let bindable: HashSet<ElementId> = self
            .elements
            .iter()
            .filter(|el| el.kind.is_bindable())
            .map(|el| el.id.clone())
            .collect();
        for el in &mut self.elements {
            let is_connector = el.kind.is_connector();
            for binding in [&mut el.start_binding_id, &mut el.end_binding_id] {
                let Some(id) = binding.as_ref() else {
                    continue;
                };
                if !is_connector || !bindable.contains(id) {
                    log::warn!("Clearing invalid binding on element {}", el.id);
                    *binding = None;
                }
            }
        }
    }
}

fn elements_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Object(mut map) => match map.remove("elements") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
