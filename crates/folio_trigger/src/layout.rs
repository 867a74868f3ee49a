// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout model: named element boxes in document coordinates.
//!
//! Elements form a tree through parent links so a section can be detached
//! as a whole. Detached elements keep their ids and boxes but are invisible
//! to [`Layout::rect`].

use folio_motion::ElementId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Size of the visible window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// Axis-aligned element box in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementBox {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl ElementBox {
    /// Create a box
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Whether a document point lies inside the box (edges inclusive)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[derive(Debug, Clone)]
struct LayoutNode {
    name: String,
    rect: ElementBox,
    parent: Option<ElementId>,
    attached: bool,
}

/// Table of element boxes plus the viewport they are seen through
#[derive(Debug, Clone, Default)]
pub struct Layout {
    viewport: Viewport,
    nodes: IndexMap<ElementId, LayoutNode>,
    names: IndexMap<String, ElementId>,
}

impl Layout {
    /// Create an empty layout
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: IndexMap::new(),
            names: IndexMap::new(),
        }
    }

    /// Add an element, or update and reattach an existing one of the same
    /// name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        rect: ElementBox,
        parent: Option<ElementId>,
    ) -> ElementId {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.rect = rect;
                node.parent = parent;
                node.attached = true;
            }
            return id;
        }

        let id = ElementId::new();
        self.names.insert(name.clone(), id);
        self.nodes.insert(
            id,
            LayoutNode {
                name,
                rect,
                parent,
                attached: true,
            },
        );
        id
    }

    /// Find an element by name, attached or not
    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    /// Name of an element
    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }

    /// Box of an attached element
    pub fn rect(&self, id: ElementId) -> Option<ElementBox> {
        self.nodes
            .get(&id)
            .filter(|n| n.attached)
            .map(|n| n.rect)
    }

    /// Whether the element exists and is attached
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.attached)
    }

    /// Direct children of an element
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Detach an element and its whole subtree; returns how many elements
    /// changed state
    pub fn detach(&mut self, id: ElementId) -> usize {
        self.set_attached(id, false)
    }

    /// Reattach an element and its whole subtree
    pub fn attach(&mut self, id: ElementId) -> usize {
        self.set_attached(id, true)
    }

    fn set_attached(&mut self, id: ElementId, attached: bool) -> usize {
        let mut pending = vec![id];
        let mut changed = 0;
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                if node.attached != attached {
                    node.attached = attached;
                    changed += 1;
                }
            }
            pending.extend(self.children(current));
        }
        changed
    }

    /// Viewport size
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Bottom of the lowest attached element, never less than the viewport
    pub fn document_height(&self) -> f32 {
        self.nodes
            .values()
            .filter(|n| n.attached)
            .map(|n| n.rect.bottom())
            .fold(self.viewport.height, f32::max)
    }

    /// Largest scroll position the document allows
    pub fn max_scroll(&self) -> f32 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    /// Number of elements, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layout has no elements
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut layout = Layout::new(Viewport::default());
        let id = layout.insert("hero", ElementBox::new(0.0, 0.0, 1440.0, 900.0), None);
        assert_eq!(layout.lookup("hero"), Some(id));
        assert_eq!(layout.name(id), Some("hero"));
        let again = layout.insert("hero", ElementBox::new(0.0, 0.0, 1440.0, 1000.0), None);
        assert_eq!(again, id);
        assert_eq!(layout.rect(id).map(|r| r.height), Some(1000.0));
    }

    #[test]
    fn test_detach_subtree() {
        let mut layout = Layout::new(Viewport::default());
        let section = layout.insert("about", ElementBox::new(0.0, 900.0, 1440.0, 900.0), None);
        let image = layout.insert("about.image", ElementBox::new(0.0, 1000.0, 400.0, 500.0), Some(section));
        let badge = layout.insert("about.badge", ElementBox::new(0.0, 1400.0, 100.0, 50.0), Some(image));

        assert_eq!(layout.detach(section), 3);
        assert!(layout.rect(badge).is_none());
        assert!(!layout.is_attached(image));
        assert_eq!(layout.attach(section), 3);
        assert!(layout.is_attached(badge));
    }

    #[test]
    fn test_document_height_and_max_scroll() {
        let mut layout = Layout::new(Viewport {
            width: 1000.0,
            height: 100.0,
        });
        assert_eq!(layout.max_scroll(), 0.0);
        layout.insert("a", ElementBox::new(0.0, 0.0, 1000.0, 600.0), None);
        let b = layout.insert("b", ElementBox::new(0.0, 600.0, 1000.0, 500.0), None);
        assert_eq!(layout.document_height(), 1100.0);
        assert_eq!(layout.max_scroll(), 1000.0);
        layout.detach(b);
        assert_eq!(layout.max_scroll(), 500.0);
    }

    #[test]
    fn test_box_contains() {
        let rect = ElementBox::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(60.0, 45.0));
        assert!(!rect.contains(111.0, 45.0));
    }
}
