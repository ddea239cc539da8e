//! In-memory page model.
//!
//! `PageState` is the concrete page used everywhere in this crate: the terminal
//! front end draws from it, `--once` prints it, and tests inspect it. It counts
//! writes per region so callers can verify which regions a render pass touched.

use super::{ElementId, ElementKind, Page, UNAVAILABLE_TEXT};
use crate::error::{DashError, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub content: ElementContent,
    /// Set while the region shows the "unavailable" state, holding the failure reason
    pub unavailable: Option<String>,
}

impl Element {
    fn empty(kind: ElementKind) -> Self {
        let content = match kind {
            ElementKind::Text => ElementContent::Text(String::new()),
            ElementKind::List => ElementContent::List(Vec::new()),
        };
        Self {
            content,
            unavailable: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    elements: BTreeMap<ElementId, Element>,
    writes: BTreeMap<ElementId, usize>,
    alerts: Vec<String>,
    location: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            elements: ElementId::ALL
                .iter()
                .map(|id| (*id, Element::empty(id.kind())))
                .collect(),
            writes: BTreeMap::new(),
            alerts: Vec::new(),
            location: None,
        }
    }

    /// Seed a text region with placeholder content (not counted as a write).
    pub fn with_text(mut self, id: ElementId, text: &str) -> Self {
        if let Some(element) = self.elements.get_mut(&id) {
            if let ElementContent::Text(current) = &mut element.content {
                *current = text.to_string();
            }
        }
        self
    }

    /// Seed a list region with placeholder entries (not counted as a write).
    pub fn with_items(mut self, id: ElementId, items: &[&str]) -> Self {
        if let Some(element) = self.elements.get_mut(&id) {
            if let ElementContent::List(current) = &mut element.content {
                *current = items.iter().map(|item| item.to_string()).collect();
            }
        }
        self
    }

    pub fn element(&self, id: ElementId) -> &Element {
        // Every id is inserted in `new`.
        &self.elements[&id]
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        match &self.element(id).content {
            ElementContent::Text(text) => Some(text),
            ElementContent::List(_) => None,
        }
    }

    pub fn items(&self, id: ElementId) -> &[String] {
        match &self.element(id).content {
            ElementContent::List(items) => items,
            ElementContent::Text(_) => &[],
        }
    }

    pub fn unavailable_reason(&self, id: ElementId) -> Option<&str> {
        self.element(id).unavailable.as_deref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Last location navigated to, if any.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn write_count(&self, id: ElementId) -> usize {
        self.writes.get(&id).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.writes.values().sum()
    }

    /// Plain-text rendering used by `--once`.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for alert in &self.alerts {
            let _ = writeln!(out, "! {alert}");
        }
        if let Some(location) = &self.location {
            let _ = writeln!(out, "-> {location}");
        }

        let _ = writeln!(out, "Name: {}", self.text(ElementId::UserName).unwrap_or(""));
        let _ = writeln!(out, "Cart:");
        for item in self.items(ElementId::CartItems) {
            let _ = writeln!(out, "  - {item}");
        }
        let _ = writeln!(
            out,
            "Latest order: {}",
            self.text(ElementId::LatestOrder).unwrap_or("")
        );
        let _ = writeln!(out, "Past orders:");
        for entry in self.items(ElementId::PastOrders) {
            let _ = writeln!(out, "  - {entry}");
        }
        out
    }

    fn element_mut(&mut self, id: ElementId, expected: ElementKind) -> Result<&mut Element> {
        if id.kind() != expected {
            return Err(DashError::page(
                id.as_str(),
                format!("{:?} element, not {:?}", id.kind(), expected),
            ));
        }
        *self.writes.entry(id).or_insert(0) += 1;
        self.elements
            .get_mut(&id)
            .ok_or_else(|| DashError::page(id.as_str(), "no such element"))
    }
}

impl Page for PageState {
    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()> {
        let element = self.element_mut(id, ElementKind::Text)?;
        element.content = ElementContent::Text(text.to_string());
        element.unavailable = None;
        Ok(())
    }

    fn clear_list(&mut self, id: ElementId) -> Result<()> {
        let element = self.element_mut(id, ElementKind::List)?;
        element.content = ElementContent::List(Vec::new());
        element.unavailable = None;
        Ok(())
    }

    fn append_list_item(&mut self, id: ElementId, text: &str) -> Result<()> {
        let element = self.element_mut(id, ElementKind::List)?;
        if let ElementContent::List(items) = &mut element.content {
            items.push(text.to_string());
        }
        Ok(())
    }

    fn mark_unavailable(&mut self, id: ElementId, reason: &str) -> Result<()> {
        let element = self.element_mut(id, id.kind())?;
        element.content = match id.kind() {
            ElementKind::Text => ElementContent::Text(UNAVAILABLE_TEXT.to_string()),
            ElementKind::List => ElementContent::List(Vec::new()),
        };
        element.unavailable = Some(reason.to_string());
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        self.alerts.push(message.to_string());
        Ok(())
    }

    fn navigate(&mut self, path: &str) -> Result<()> {
        self.location = Some(path.to_string());
        Ok(())
    }
}
