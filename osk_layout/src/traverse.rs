// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree walks and inherited properties.

use alloc::string::String;
use alloc::vec::Vec;

use crate::tree::LayoutTree;
use crate::types::{ItemFlags, ItemId, KeyGroup};

/// Pre-order walk over a subtree. See [`LayoutTree::items`].
#[derive(Clone, Debug)]
pub struct Items<'a> {
    tree: &'a LayoutTree,
    stack: Vec<ItemId>,
    visible_only: bool,
    global: bool,
}

impl Iterator for Items<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let tree = self.tree;
        loop {
            let id = self.stack.pop()?;
            let Some(data) = tree.data(id) else {
                continue;
            };
            if self.visible_only && !data.config.flags.contains(ItemFlags::VISIBLE) {
                continue;
            }
            // Sublayouts go below the children so they are visited after them.
            if self.global {
                self.stack.extend(data.sublayouts.iter().rev());
            }
            self.stack.extend(data.children.iter().rev());
            return Some(id);
        }
    }
}

impl LayoutTree {
    fn walk(&self, root: ItemId, visible_only: bool, global: bool) -> Items<'_> {
        let mut stack = Vec::new();
        if self.is_alive(root) {
            stack.push(root);
        }
        Items {
            tree: self,
            stack,
            visible_only,
            global,
        }
    }

    /// `root` and every item below it, parents before children.
    pub fn items(&self, root: ItemId) -> Items<'_> {
        self.walk(root, false, false)
    }

    /// Like [`LayoutTree::items`], skipping hidden items together with their subtrees.
    pub fn visible_items(&self, root: ItemId) -> Items<'_> {
        self.walk(root, true, false)
    }

    /// Like [`LayoutTree::items`], also descending into sublayouts after an item's children.
    pub fn global_items(&self, root: ItemId) -> Items<'_> {
        self.walk(root, false, true)
    }

    /// Keys below `root`, optionally restricted to one group.
    pub fn keys<'a>(
        &'a self,
        root: ItemId,
        group: Option<&'a str>,
    ) -> impl Iterator<Item = ItemId> + 'a {
        self.items(root).filter(move |id| self.is_key_in_group(*id, group))
    }

    /// Keys below `root` and in its sublayouts, optionally restricted to one group.
    pub fn global_keys<'a>(
        &'a self,
        root: ItemId,
        group: Option<&'a str>,
    ) -> impl Iterator<Item = ItemId> + 'a {
        self.global_items(root)
            .filter(move |id| self.is_key_in_group(*id, group))
    }

    fn is_key_in_group(&self, id: ItemId, group: Option<&str>) -> bool {
        self.item(id)
            .is_some_and(|i| i.is_key() && (group.is_none() || i.group() == group))
    }

    /// `root` and every item below it, children before parents.
    pub fn depth_first(&self, root: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        self.collect_depth_first(root, &mut out);
        out
    }

    fn collect_depth_first(&self, id: ItemId, out: &mut Vec<ItemId>) {
        let Some(data) = self.data(id) else {
            return;
        };
        for &child in &data.children {
            self.collect_depth_first(child, out);
        }
        out.push(id);
    }

    /// Items below `root` whose effective layer is `layer`, in pre-order.
    ///
    /// The effective layer of an item is the nearest layer id on its path to
    /// `root` (see [`LayoutTree::layer_of`]); `None` selects items without
    /// any layer on that path. With `only_visible`, hidden items and their
    /// subtrees are skipped.
    pub fn layer_items(&self, root: ItemId, layer: Option<&str>, only_visible: bool) -> Vec<ItemId> {
        let mut out = Vec::new();
        self.collect_layer_items(root, layer, only_visible, None, &mut out);
        out
    }

    fn collect_layer_items<'a>(
        &'a self,
        id: ItemId,
        layer: Option<&str>,
        only_visible: bool,
        inherited: Option<&'a str>,
        out: &mut Vec<ItemId>,
    ) {
        let Some(data) = self.data(id) else {
            return;
        };
        if only_visible && !data.config.flags.contains(ItemFlags::VISIBLE) {
            return;
        }
        let effective = data.config.layer_id.as_deref().or(inherited);
        if effective == layer {
            out.push(id);
        }
        for &child in &data.children {
            self.collect_layer_items(child, layer, only_visible, effective, out);
        }
    }

    /// Visible keys below `root` whose effective layer is `layer`.
    pub fn layer_keys(&self, root: ItemId, layer: Option<&str>) -> Vec<ItemId> {
        let mut keys = self.layer_items(root, layer, true);
        keys.retain(|id| self.item(*id).is_some_and(|i| i.is_key()));
        keys
    }

    /// Layer ids set below `root`, in order of first appearance.
    pub fn layer_ids(&self, root: ItemId) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.items(root) {
            if let Some(layer) = self.item(id).and_then(|i| i.layer_id()) {
                if !ids.iter().any(|l| l == layer) {
                    ids.push(String::from(layer));
                }
            }
        }
        ids
    }

    /// Keys below `root` grouped by their group name.
    ///
    /// Groups appear in order of their first key; keys keep tree order.
    pub fn key_groups(&self, root: ItemId) -> Vec<KeyGroup> {
        let mut groups: Vec<KeyGroup> = Vec::new();
        for id in self.keys(root, None) {
            let name = self.item(id).and_then(|i| i.group());
            match groups.iter_mut().find(|g| g.name.as_deref() == name) {
                Some(group) => group.keys.push(id),
                None => groups.push(KeyGroup {
                    name: name.map(String::from),
                    keys: alloc::vec![id],
                }),
            }
        }
        groups
    }

    /// True if `id` and all of its ancestors are visible.
    pub fn is_path_visible(&self, id: ItemId) -> bool {
        self.is_alive(id)
            && self
                .ancestors(id)
                .all(|a| self.item(a).is_some_and(|i| i.is_visible()))
    }

    /// True if `id` and all of its ancestors are scannable.
    pub fn is_path_scannable(&self, id: ItemId) -> bool {
        self.is_alive(id)
            && self
                .ancestors(id)
                .all(|a| self.item(a).is_some_and(|i| i.is_scannable()))
    }

    /// The nearest scan priority on the path to the root, or `0`.
    pub fn path_scan_priority(&self, id: ItemId) -> i32 {
        self.ancestors(id)
            .find_map(|a| self.item(a).and_then(|i| i.scan_priority()))
            .unwrap_or(0)
    }

    /// True if a visible key exists in the subtree at `id`, `id` included.
    ///
    /// Hidden items cut off their subtrees.
    pub fn has_visible_key(&self, id: ItemId) -> bool {
        self.visible_items(id)
            .any(|v| self.item(v).is_some_and(|i| i.is_key()))
    }

    /// The nearest layer id on the path from `id` to the root.
    pub fn layer_of(&self, id: ItemId) -> Option<&str> {
        self.ancestors(id)
            .find_map(|a| self.data(a).and_then(|d| d.config.layer_id.as_deref()))
    }

    /// Root of the tree `id` belongs to. For sublayout items, the sublayout root.
    pub fn layout_root_of(&self, id: ItemId) -> Option<ItemId> {
        self.ancestors(id).last()
    }

    /// Root of the main tree, following sublayouts back to their owners.
    pub fn global_layout_root_of(&self, id: ItemId) -> Option<ItemId> {
        self.ancestors_global(id).last()
    }
}
