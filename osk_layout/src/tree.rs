// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: storage, structure, and per-item access.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use osk_shape::{CoordinateTransform, KeyGeometry, RectExt};

use crate::error::LayoutError;
use crate::types::{ItemConfig, ItemFlags, ItemId, ItemKind, KeyConfig};

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena holding a keyboard layout: the main tree and any popup sublayouts.
///
/// Items are addressed by [`ItemId`]. Mutators called with a stale id do
/// nothing; accessors return `None`.
pub struct LayoutTree {
    items: Vec<ItemData>,
    generation: u32,
}

impl fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self
            .items
            .iter()
            .filter(|d| d.parent.is_none() && d.sublayout_parent.is_none())
            .count();
        let sublayouts = self
            .items
            .iter()
            .filter(|d| d.sublayout_parent.is_some())
            .count();
        f.debug_struct("LayoutTree")
            .field("items", &self.items.len())
            .field("roots", &roots)
            .field("sublayouts", &sublayouts)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ItemData {
    pub(crate) parent: Option<ItemId>,
    /// Owner of a sublayout root. Not an ownership relation.
    pub(crate) sublayout_parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) sublayouts: Vec<ItemId>,
    pub(crate) config: ItemConfig,
    pub(crate) kind: ItemKind,
    pub(crate) transform: CoordinateTransform,
}

/// Read-only view of one item.
#[derive(Clone, Copy, Debug)]
pub struct Item<'a> {
    id: ItemId,
    data: &'a ItemData,
}

impl<'a> Item<'a> {
    /// The item's handle.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Kind and kind-specific settings.
    pub fn kind(&self) -> &'a ItemKind {
        &self.data.kind
    }

    /// Shared settings.
    pub fn config(&self) -> &'a ItemConfig {
        &self.data.config
    }

    /// Key settings, if this item is a key.
    pub fn key(&self) -> Option<&'a KeyConfig> {
        match &self.data.kind {
            ItemKind::Key(key) => Some(key),
            _ => None,
        }
    }

    /// True for keys.
    pub fn is_key(&self) -> bool {
        self.data.kind.is_key()
    }

    /// Non-rectangular outline of a key.
    pub fn geometry(&self) -> Option<&'a KeyGeometry> {
        self.key().and_then(|k| k.geometry.as_ref())
    }

    /// The item's name.
    pub fn name(&self) -> Option<&'a str> {
        self.data.config.id.as_deref()
    }

    /// The item's own group.
    pub fn group(&self) -> Option<&'a str> {
        self.data.config.group.as_deref()
    }

    /// The layer set on this item itself, ignoring ancestors.
    ///
    /// See [`LayoutTree::layer_of`] for the inherited layer.
    pub fn layer_id(&self) -> Option<&'a str> {
        self.data.config.layer_id.as_deref()
    }

    /// The scan priority set on this item itself.
    pub fn scan_priority(&self) -> Option<i32> {
        self.data.config.scan_priority
    }

    /// Parent in the tree; `None` for roots and sublayout roots.
    pub fn parent(&self) -> Option<ItemId> {
        self.data.parent
    }

    /// Children in drawing order: later children are drawn on top.
    pub fn children(&self) -> &'a [ItemId] {
        &self.data.children
    }

    /// Roots of the sublayouts attached to this item.
    pub fn sublayouts(&self) -> &'a [ItemId] {
        &self.data.sublayouts
    }

    /// For a sublayout root, the item it is attached to.
    pub fn sublayout_parent(&self) -> Option<ItemId> {
        self.data.sublayout_parent
    }

    /// Behavior flags.
    pub fn flags(&self) -> ItemFlags {
        self.data.config.flags
    }

    /// The item's own visibility flag, ignoring ancestors.
    pub fn is_visible(&self) -> bool {
        self.flags().contains(ItemFlags::VISIBLE)
    }

    /// Whether the item reacts to input.
    pub fn is_sensitive(&self) -> bool {
        self.flags().contains(ItemFlags::SENSITIVE)
    }

    /// Whether the item absorbs leftover space in a box.
    pub fn expands(&self) -> bool {
        self.flags().contains(ItemFlags::EXPAND)
    }

    /// The item's own scannable flag, ignoring ancestors.
    pub fn is_scannable(&self) -> bool {
        self.flags().contains(ItemFlags::SCANNABLE)
    }

    /// Border inset in logical units.
    pub fn border(&self) -> f64 {
        self.data.config.border
    }

    /// The item's logical-to-canvas transform.
    pub fn transform(&self) -> &'a CoordinateTransform {
        &self.data.transform
    }

    /// Bounding rect including the border, in logical units.
    pub fn border_rect(&self) -> Rect {
        self.data.transform.log_rect()
    }

    /// Border rect as inserted, before containers recomputed it.
    pub fn initial_border_rect(&self) -> Rect {
        self.data.transform.initial_log_rect()
    }

    /// Bounding rect without the border, in logical units.
    pub fn rect(&self) -> Rect {
        let border = self.border();
        self.border_rect().deflate_by(border, border)
    }

    /// Bounding rect without the border, in canvas units.
    pub fn canvas_rect(&self) -> Rect {
        self.data.transform.log_to_canvas_rect(self.rect())
    }

    /// Bounding rect including the border, in canvas units.
    pub fn canvas_border_rect(&self) -> Rect {
        self.data.transform.canvas_rect()
    }

    /// Canvas rect used to pre-select hit test candidates.
    ///
    /// One canvas unit larger than the border rect on every side.
    pub fn hit_rect(&self) -> Rect {
        self.canvas_border_rect().inflate_by(1.0, 1.0)
    }
}

/// Iterator from an item towards its root. See [`LayoutTree::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a LayoutTree,
    next: Option<ItemId>,
    global: bool,
}

impl Iterator for Ancestors<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let id = self.next?;
        let data = self.tree.data(id)?;
        self.next = match (data.parent, self.global) {
            (Some(parent), _) => Some(parent),
            (None, true) => data.sublayout_parent,
            (None, false) => None,
        };
        Some(id)
    }
}

impl LayoutTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generation: 1,
        }
    }

    /// Number of items, sublayouts included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item, invalidating all existing [`ItemId`]s.
    pub fn clear(&mut self) {
        self.items.clear();
        self.generation = self.generation.saturating_add(1);
    }

    /// Returns true if `id` refers to a live item.
    pub fn is_alive(&self, id: ItemId) -> bool {
        id.1 == self.generation && id.idx() < self.items.len()
    }

    /// View of a live item.
    pub fn item(&self, id: ItemId) -> Option<Item<'_>> {
        self.data(id).map(|data| Item { id, data })
    }

    pub(crate) fn data(&self, id: ItemId) -> Option<&ItemData> {
        if id.1 != self.generation {
            return None;
        }
        self.items.get(id.idx())
    }

    pub(crate) fn data_mut(&mut self, id: ItemId) -> Option<&mut ItemData> {
        if id.1 != self.generation {
            return None;
        }
        self.items.get_mut(id.idx())
    }

    fn validate(config: &ItemConfig, kind: &ItemKind) -> Result<(), LayoutError> {
        if !(config.border.is_finite() && config.border >= 0.0) {
            return Err(LayoutError::InvalidBorder(config.border));
        }
        let r = config.border_rect;
        let finite = [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite());
        if !finite || r.width() < 0.0 || r.height() < 0.0 {
            return Err(LayoutError::InvalidBorderRect);
        }
        if let ItemKind::Box(b) = kind {
            if !(b.spacing.is_finite() && b.spacing >= 0.0) {
                return Err(LayoutError::InvalidSpacing(b.spacing));
            }
        }
        Ok(())
    }

    fn alloc(&mut self, config: ItemConfig, kind: ItemKind) -> ItemId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ItemId uses 32-bit indices by design."
        )]
        let id = ItemId::new(self.items.len() as u32, self.generation);
        self.items.push(ItemData {
            parent: None,
            sublayout_parent: None,
            children: Vec::new(),
            sublayouts: Vec::new(),
            transform: CoordinateTransform::new(config.border_rect),
            config,
            kind,
        });
        id
    }

    /// Insert an item as the last child of `parent` (or as a root if `None`).
    ///
    /// Settings are validated here, once: a negative or non-finite border or
    /// spacing, a non-finite or inverted border rect, and a stale parent are
    /// rejected.
    pub fn insert(
        &mut self,
        parent: Option<ItemId>,
        config: ItemConfig,
        kind: ItemKind,
    ) -> Result<ItemId, LayoutError> {
        Self::validate(&config, &kind)?;
        if let Some(p) = parent {
            if !self.is_alive(p) {
                return Err(LayoutError::UnknownItem(p));
            }
        }
        let id = self.alloc(config, kind);
        if let Some(p) = parent {
            if let Some(parent) = self.data_mut(p) {
                parent.children.push(id);
            }
            if let Some(item) = self.data_mut(id) {
                item.parent = Some(p);
            }
        }
        Ok(id)
    }

    /// Insert the root of a sublayout attached to `owner`.
    ///
    /// The sublayout is not a child of `owner`: it takes no part in fitting
    /// or traversal of the main tree, and is found by id through
    /// [`LayoutTree::find_sublayout`].
    pub fn insert_sublayout(
        &mut self,
        owner: ItemId,
        config: ItemConfig,
        kind: ItemKind,
    ) -> Result<ItemId, LayoutError> {
        Self::validate(&config, &kind)?;
        if !self.is_alive(owner) {
            return Err(LayoutError::UnknownItem(owner));
        }
        let id = self.alloc(config, kind);
        if let Some(o) = self.data_mut(owner) {
            o.sublayouts.push(id);
        }
        if let Some(item) = self.data_mut(id) {
            item.sublayout_parent = Some(owner);
        }
        Ok(id)
    }

    /// Show or hide an item. Returns true if its visibility changed.
    pub fn set_visible(&mut self, id: ItemId, visible: bool) -> bool {
        let Some(d) = self.data_mut(id) else {
            return false;
        };
        let was = d.config.flags.contains(ItemFlags::VISIBLE);
        d.config.flags.set(ItemFlags::VISIBLE, visible);
        was != visible
    }

    /// Replace the logical border rect.
    pub fn set_border_rect(&mut self, id: ItemId, rect: Rect) {
        if let Some(d) = self.data_mut(id) {
            d.transform.set_log_rect(rect);
        }
    }

    /// Replace the initial logical border rect.
    pub fn set_initial_border_rect(&mut self, id: ItemId, rect: Rect) {
        if let Some(d) = self.data_mut(id) {
            d.transform.set_initial_log_rect(rect);
        }
    }

    /// Set a key's chamfer size. Does nothing for containers.
    pub fn set_chamfer_size(&mut self, id: ItemId, size: Option<f64>) {
        if let Some(ItemData {
            kind: ItemKind::Key(key),
            ..
        }) = self.data_mut(id)
        {
            key.chamfer_size = size;
        }
    }

    /// Move an item to the end of its siblings, drawing it on top.
    pub fn raise_to_top(&mut self, id: ItemId) {
        self.reorder(id, true);
    }

    /// Move an item to the start of its siblings, drawing it below the others.
    pub fn lower_to_bottom(&mut self, id: ItemId) {
        self.reorder(id, false);
    }

    fn reorder(&mut self, id: ItemId, to_top: bool) {
        let Some(parent) = self.data(id).and_then(|d| d.parent) else {
            return;
        };
        let Some(p) = self.data_mut(parent) else {
            return;
        };
        p.children.retain(|c| *c != id);
        if to_top {
            p.children.push(id);
        } else {
            p.children.insert(0, id);
        }
    }

    /// Show the containers of the listed layers and hide those of all other layers.
    ///
    /// Applies to every non-key item below `root` that sets a layer id itself.
    /// Keys keep their own visibility.
    pub fn set_visible_layers(&mut self, root: ItemId, layer_ids: &[&str]) {
        let ids: Vec<ItemId> = self.items(root).collect();
        for id in ids {
            let Some(d) = self.data_mut(id) else {
                continue;
            };
            if d.kind.is_key() {
                continue;
            }
            if let Some(layer) = d.config.layer_id.as_deref() {
                let visible = layer_ids.contains(&layer);
                d.config.flags.set(ItemFlags::VISIBLE, visible);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(?layer_ids, "visible layers changed");
    }

    /// `id` followed by its ancestors up to the root of its tree.
    pub fn ancestors(&self, id: ItemId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
            global: false,
        }
    }

    /// Like [`LayoutTree::ancestors`], continuing from sublayout roots to
    /// the items they are attached to.
    pub fn ancestors_global(&self, id: ItemId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
            global: true,
        }
    }

    /// Find a sublayout by id, looking at the sublayouts attached to `from`
    /// and each of its ancestors.
    pub fn find_sublayout(&self, from: ItemId, id: &str) -> Option<ItemId> {
        self.ancestors(from)
            .filter_map(|a| self.data(a))
            .flat_map(|d| d.sublayouts.iter().copied())
            .find(|s| self.item(*s).and_then(|i| i.name()) == Some(id))
    }

    /// The popup sublayout named by a key's `popup_id`.
    pub fn popup_layout(&self, key: ItemId) -> Option<ItemId> {
        let popup_id = self.item(key)?.key()?.popup_id.as_deref()?;
        self.find_sublayout(key, popup_id)
    }

    /// Items below `root` whose id is one of `ids`, in tree order.
    pub fn find_ids(&self, root: ItemId, ids: &[&str]) -> Vec<ItemId> {
        self.items(root)
            .filter(|id| {
                self.item(*id)
                    .and_then(|i| i.name())
                    .is_some_and(|name| ids.contains(&name))
            })
            .collect()
    }

    /// Multi-line description of the subtree at `root`, one item per line.
    pub fn dump(&self, root: ItemId) -> String {
        Dump { tree: self, root }.to_string()
    }

    fn dump_into(&self, id: ItemId, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(item) = self.item(id) else {
            return Ok(());
        };
        writeln!(
            f,
            "{:indent$}{} id={:?} layer_id={:?} vis={}",
            "",
            item.kind().class_name(),
            item.name(),
            item.layer_id(),
            item.is_visible(),
            indent = level * 3,
        )?;
        for &child in item.children() {
            self.dump_into(child, level + 1, f)?;
        }
        Ok(())
    }
}

struct Dump<'a> {
    tree: &'a LayoutTree,
    root: ItemId,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.dump_into(self.root, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoxConfig, PanelConfig};
    use alloc::string::ToString;
    use alloc::vec;

    fn named(id: &str) -> ItemConfig {
        ItemConfig {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn key() -> ItemKind {
        ItemKind::Key(KeyConfig::default())
    }

    #[test]
    fn insert_links_parent_and_children() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(None, named("root"), ItemKind::Box(BoxConfig::default()))
            .unwrap();
        let a = tree.insert(Some(root), named("a"), key()).unwrap();
        let b = tree.insert(Some(root), named("b"), key()).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.item(root).unwrap().children(), &[a, b]);
        assert_eq!(tree.item(b).unwrap().parent(), Some(root));
        assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![b, root]);
    }

    #[test]
    fn insert_validates_settings() {
        let mut tree = LayoutTree::new();
        let bad_border = ItemConfig {
            border: -1.0,
            ..Default::default()
        };
        assert_eq!(
            tree.insert(None, bad_border, key()),
            Err(LayoutError::InvalidBorder(-1.0))
        );
        let bad_rect = ItemConfig {
            border_rect: Rect::new(0.0, 0.0, f64::NAN, 1.0),
            ..Default::default()
        };
        assert_eq!(
            tree.insert(None, bad_rect, key()),
            Err(LayoutError::InvalidBorderRect)
        );
        let inverted = ItemConfig {
            border_rect: Rect::new(5.0, 0.0, 1.0, 1.0),
            ..Default::default()
        };
        assert_eq!(
            tree.insert(None, inverted, key()),
            Err(LayoutError::InvalidBorderRect)
        );
        let bad_spacing = ItemKind::Box(BoxConfig {
            spacing: f64::INFINITY,
            ..Default::default()
        });
        assert_eq!(
            tree.insert(None, ItemConfig::default(), bad_spacing),
            Err(LayoutError::InvalidSpacing(f64::INFINITY))
        );
        assert!(tree.is_empty(), "rejected items are not stored");
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut tree = LayoutTree::new();
        let old = tree.insert(None, named("old"), key()).unwrap();
        tree.clear();
        assert!(!tree.is_alive(old));
        let new = tree.insert(None, named("new"), key()).unwrap();
        assert_ne!(old, new, "same slot, different generation");
        assert!(tree.item(old).is_none());
        assert_eq!(
            tree.insert(Some(old), ItemConfig::default(), key()),
            Err(LayoutError::UnknownItem(old))
        );
        // Stale mutators are no-ops.
        assert!(!tree.set_visible(old, false));
        tree.set_border_rect(old, Rect::ZERO);
        assert_eq!(
            tree.item(new).unwrap().border_rect(),
            Rect::new(0.0, 0.0, 1.0, 1.0)
        );
    }

    #[test]
    fn rects_and_border() {
        let mut tree = LayoutTree::new();
        let k = tree
            .insert(
                None,
                ItemConfig {
                    border: 1.0,
                    border_rect: Rect::new(0.0, 0.0, 10.0, 6.0),
                    ..Default::default()
                },
                key(),
            )
            .unwrap();
        let item = tree.item(k).unwrap();
        assert_eq!(item.rect(), Rect::new(1.0, 1.0, 9.0, 5.0));
        assert_eq!(item.initial_border_rect(), Rect::new(0.0, 0.0, 10.0, 6.0));
        tree.set_border_rect(k, Rect::new(0.0, 0.0, 20.0, 6.0));
        let item = tree.item(k).unwrap();
        assert_eq!(item.border_rect(), Rect::new(0.0, 0.0, 20.0, 6.0));
        assert_eq!(item.initial_border_rect(), Rect::new(0.0, 0.0, 10.0, 6.0));
    }

    #[test]
    fn set_visible_reports_changes() {
        let mut tree = LayoutTree::new();
        let k = tree.insert(None, ItemConfig::default(), key()).unwrap();
        assert!(!tree.set_visible(k, true), "already visible");
        assert!(tree.set_visible(k, false));
        assert!(!tree.item(k).unwrap().is_visible());
    }

    #[test]
    fn raise_and_lower() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(None, ItemConfig::default(), ItemKind::Panel(PanelConfig::default()))
            .unwrap();
        let a = tree.insert(Some(root), named("a"), key()).unwrap();
        let b = tree.insert(Some(root), named("b"), key()).unwrap();
        let c = tree.insert(Some(root), named("c"), key()).unwrap();
        tree.raise_to_top(a);
        assert_eq!(tree.item(root).unwrap().children(), &[b, c, a]);
        tree.lower_to_bottom(c);
        assert_eq!(tree.item(root).unwrap().children(), &[c, b, a]);
        tree.raise_to_top(root);
        assert_eq!(tree.item(root).unwrap().children(), &[c, b, a], "roots have no siblings");
    }

    #[test]
    fn sublayouts_and_popups() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(None, named("root"), ItemKind::Panel(PanelConfig::default()))
            .unwrap();
        let k = tree
            .insert(
                Some(root),
                named("a"),
                ItemKind::Key(KeyConfig {
                    popup_id: Some("accents".to_string()),
                    ..Default::default()
                }),
            )
            .unwrap();
        let popup = tree
            .insert_sublayout(root, named("accents"), ItemKind::Panel(PanelConfig::default()))
            .unwrap();
        let inner = tree.insert(Some(popup), named("a-grave"), key()).unwrap();

        assert_eq!(tree.item(root).unwrap().children(), &[k], "sublayouts are not children");
        assert_eq!(tree.item(popup).unwrap().parent(), None);
        assert_eq!(tree.item(popup).unwrap().sublayout_parent(), Some(root));
        assert_eq!(tree.find_sublayout(k, "accents"), Some(popup));
        assert_eq!(tree.find_sublayout(k, "missing"), None);
        assert_eq!(tree.popup_layout(k), Some(popup));
        assert_eq!(tree.popup_layout(inner), None);
        assert_eq!(tree.ancestors(inner).collect::<Vec<_>>(), vec![inner, popup]);
        assert_eq!(
            tree.ancestors_global(inner).collect::<Vec<_>>(),
            vec![inner, popup, root]
        );
    }

    #[test]
    fn visible_layers_only_touch_layered_containers() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(None, ItemConfig::default(), ItemKind::Box(BoxConfig::default()))
            .unwrap();
        let layer = |name: &str| ItemConfig {
            layer_id: Some(name.to_string()),
            ..Default::default()
        };
        let alpha = tree
            .insert(Some(root), layer("alpha"), ItemKind::Panel(PanelConfig::default()))
            .unwrap();
        let num = tree
            .insert(Some(root), layer("num"), ItemKind::Panel(PanelConfig::default()))
            .unwrap();
        let layered_key = tree.insert(Some(alpha), layer("num"), key()).unwrap();

        tree.set_visible_layers(root, &["num"]);
        assert!(!tree.item(alpha).unwrap().is_visible());
        assert!(tree.item(num).unwrap().is_visible());
        assert!(tree.item(layered_key).unwrap().is_visible(), "keys are left alone");
        assert!(tree.item(root).unwrap().is_visible(), "items without a layer are left alone");
    }

    #[test]
    fn find_ids_and_dump() {
        let mut tree = LayoutTree::new();
        let root = tree
            .insert(None, named("root"), ItemKind::Box(BoxConfig::default()))
            .unwrap();
        let a = tree.insert(Some(root), named("a"), key()).unwrap();
        let _ = tree.insert(Some(root), named("b"), key()).unwrap();
        assert_eq!(tree.find_ids(root, &["a", "zz"]), vec![a]);
        let dump = tree.dump(root);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "LayoutBox id=Some(\"root\") layer_id=None vis=true");
        assert_eq!(lines[1], "   RectKey id=Some(\"a\") layer_id=None vis=true");
    }
}
