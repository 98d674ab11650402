// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caching facade over a layout tree, with hit testing.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::{Equivalent, HashMap};
use kurbo::{Point, Rect};
use osk_shape::KeyPath;

use crate::error::LayoutError;
use crate::tree::{Item, LayoutTree};
use crate::types::{ItemId, KeyGroup};

/// Owned layer or group name used as a cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct NameKey(Option<String>);

impl From<Option<&str>> for NameKey {
    fn from(name: Option<&str>) -> Self {
        Self(name.map(String::from))
    }
}

/// Borrowed lookup key for [`NameKey`] maps.
///
/// Hashes exactly like `NameKey`, so lookups need no allocation.
#[derive(Hash)]
struct NameQuery<'a>(Option<&'a str>);

impl Equivalent<NameKey> for NameQuery<'_> {
    fn equivalent(&self, key: &NameKey) -> bool {
        self.0 == key.0.as_deref()
    }
}

type Snapshots = HashMap<NameKey, Rc<[ItemId]>>;

#[derive(Debug, Default)]
struct TraversalCache {
    items: Option<Rc<[ItemId]>>,
    visible_items: Option<Rc<[ItemId]>>,
    keys: Snapshots,
    layer_keys: Snapshots,
    /// Indexed by `only_visible`.
    layer_items: [Snapshots; 2],
    layer_ids: Option<Rc<[String]>>,
    key_groups: Option<Rc<[KeyGroup]>>,
}

#[derive(Clone, Debug)]
struct HitRect {
    rect: Rect,
    key: ItemId,
    /// Canvas outline of shaped keys. Rectangular keys are decided by `rect` alone.
    path: Option<KeyPath>,
}

impl HitRect {
    fn new(item: Item<'_>) -> Self {
        Self {
            rect: item.hit_rect(),
            key: item.id(),
            path: item.hit_path(),
        }
    }

    fn contains(&self, point: Point) -> bool {
        self.rect.contains(point) && self.path.as_ref().is_none_or(|p| p.contains(point))
    }
}

#[derive(Debug)]
struct LastHit {
    point: Point,
    layer: NameKey,
    key: Option<ItemId>,
}

#[derive(Debug, Default)]
struct GeometryCache {
    hit_rects: HashMap<NameKey, Rc<[HitRect]>>,
    last_hit: Option<LastHit>,
}

/// A layout tree together with its root, memoizing traversals and hit tests.
///
/// Snapshots are computed on first use and shared as `Rc` slices until a
/// mutation through this type invalidates them. Tree shape and visibility
/// changes drop every cache; fitting only drops the hit test caches.
///
/// Mutating the tree behind the root's back is possible through
/// [`LayoutRoot::tree_mut`], which drops every cache up front.
#[derive(Debug)]
pub struct LayoutRoot {
    tree: LayoutTree,
    root: ItemId,
    traversal: TraversalCache,
    geometry: GeometryCache,
}

impl LayoutRoot {
    /// Wrap `tree` with `root` as the main layout root.
    ///
    /// Keys without an explicit chamfer size receive the default of their
    /// layer here, see [`LayoutRoot::init_chamfer_sizes`].
    pub fn new(tree: LayoutTree, root: ItemId) -> Result<Self, LayoutError> {
        if !tree.is_alive(root) {
            return Err(LayoutError::UnknownItem(root));
        }
        let mut this = Self {
            tree,
            root,
            traversal: TraversalCache::default(),
            geometry: GeometryCache::default(),
        };
        this.init_chamfer_sizes();
        Ok(this)
    }

    /// The wrapped tree.
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    /// Mutable access to the wrapped tree. Drops every cache.
    pub fn tree_mut(&mut self) -> &mut LayoutTree {
        self.invalidate_caches();
        &mut self.tree
    }

    /// The main layout root.
    pub fn root(&self) -> ItemId {
        self.root
    }

    /// View of a live item.
    pub fn item(&self, id: ItemId) -> Option<Item<'_>> {
        self.tree.item(id)
    }

    /// Give up the caches and return the tree.
    pub fn into_tree(self) -> LayoutTree {
        self.tree
    }

    /// Drop all traversal and hit test caches.
    pub fn invalidate_caches(&mut self) {
        self.invalidate_traversal_caches();
        self.invalidate_geometry_caches();
    }

    /// Drop all traversal snapshots.
    pub fn invalidate_traversal_caches(&mut self) {
        self.traversal = TraversalCache::default();
    }

    /// Drop the hit rects and the last hit test result.
    pub fn invalidate_geometry_caches(&mut self) {
        self.geometry = GeometryCache::default();
    }

    /// Fit the main layout into `canvas_border_rect`. See [`LayoutTree::fit_inside_canvas`].
    pub fn fit_inside_canvas(&mut self, canvas_border_rect: Rect) {
        self.tree.fit_inside_canvas(self.root, canvas_border_rect);
        self.invalidate_geometry_caches();
    }

    /// Place the main layout without recomputing logical bounds.
    pub fn do_fit_inside_canvas(&mut self, canvas_border_rect: Rect) {
        self.tree.do_fit_inside_canvas(self.root, canvas_border_rect);
        self.invalidate_geometry_caches();
    }

    /// Fit a sublayout, such as a popup, into its own canvas rect.
    pub fn fit_sublayout(&mut self, sublayout: ItemId, canvas_border_rect: Rect) {
        self.tree.fit_inside_canvas(sublayout, canvas_border_rect);
        self.invalidate_geometry_caches();
    }

    /// Show the listed layers and hide all others. See [`LayoutTree::set_visible_layers`].
    pub fn set_visible_layers(&mut self, layer_ids: &[&str]) {
        self.invalidate_caches();
        self.tree.set_visible_layers(self.root, layer_ids);
    }

    /// Show or hide an item. Caches survive if nothing changed.
    pub fn set_item_visible(&mut self, id: ItemId, visible: bool) {
        if self.tree.set_visible(id, visible) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?id, visible, "item visibility changed");
            self.invalidate_caches();
        }
    }

    /// Replace an item's logical border rect.
    pub fn set_border_rect(&mut self, id: ItemId, rect: Rect) {
        self.tree.set_border_rect(id, rect);
        self.invalidate_geometry_caches();
    }

    /// Draw an item on top of its siblings.
    pub fn raise_to_top(&mut self, id: ItemId) {
        self.tree.raise_to_top(id);
        self.invalidate_caches();
    }

    /// Draw an item below its siblings.
    pub fn lower_to_bottom(&mut self, id: ItemId) {
        self.tree.lower_to_bottom(id);
        self.invalidate_caches();
    }

    /// Snapshot of [`LayoutTree::items`] for the root.
    pub fn items(&mut self) -> Rc<[ItemId]> {
        let (tree, root) = (&self.tree, self.root);
        self.traversal
            .items
            .get_or_insert_with(|| snapshot("items", tree.items(root)))
            .clone()
    }

    /// Snapshot of [`LayoutTree::visible_items`] for the root.
    pub fn visible_items(&mut self) -> Rc<[ItemId]> {
        let (tree, root) = (&self.tree, self.root);
        self.traversal
            .visible_items
            .get_or_insert_with(|| snapshot("visible_items", tree.visible_items(root)))
            .clone()
    }

    /// Snapshot of [`LayoutTree::keys`] for the root.
    pub fn keys(&mut self, group: Option<&str>) -> Rc<[ItemId]> {
        let (tree, root) = (&self.tree, self.root);
        cached(&mut self.traversal.keys, group, || {
            snapshot("keys", tree.keys(root, group))
        })
    }

    /// Snapshot of [`LayoutTree::layer_keys`] for the root.
    pub fn layer_keys(&mut self, layer: Option<&str>) -> Rc<[ItemId]> {
        let (tree, root) = (&self.tree, self.root);
        cached(&mut self.traversal.layer_keys, layer, || {
            snapshot("layer_keys", tree.layer_keys(root, layer))
        })
    }

    /// Snapshot of [`LayoutTree::layer_items`] for the root.
    pub fn layer_items(&mut self, layer: Option<&str>, only_visible: bool) -> Rc<[ItemId]> {
        let (tree, root) = (&self.tree, self.root);
        cached(
            &mut self.traversal.layer_items[usize::from(only_visible)],
            layer,
            || snapshot("layer_items", tree.layer_items(root, layer, only_visible)),
        )
    }

    /// Snapshot of [`LayoutTree::layer_ids`] for the root.
    pub fn layer_ids(&mut self) -> Rc<[String]> {
        let (tree, root) = (&self.tree, self.root);
        self.traversal
            .layer_ids
            .get_or_insert_with(|| snapshot("layer_ids", tree.layer_ids(root)))
            .clone()
    }

    /// Snapshot of [`LayoutTree::key_groups`] for the root.
    pub fn key_groups(&mut self) -> Rc<[KeyGroup]> {
        let (tree, root) = (&self.tree, self.root);
        self.traversal
            .key_groups
            .get_or_insert_with(|| snapshot("key_groups", tree.key_groups(root)))
            .clone()
    }

    /// The topmost visible key at canvas `point`.
    ///
    /// Keys of `active_layer` are tested first, later siblings before
    /// earlier ones, then keys outside any layer in the same order. A key is
    /// hit if `point` lies in its [`hit_rect`](Item::hit_rect) (half-open)
    /// and, for shaped keys, inside its [`hit_path`](Item::hit_path).
    ///
    /// Repeating the previous query returns the previous answer without
    /// searching.
    pub fn key_at(&mut self, point: Point, active_layer: Option<&str>) -> Option<ItemId> {
        if let Some(last) = &self.geometry.last_hit {
            if last.point == point && NameQuery(active_layer).equivalent(&last.layer) {
                return last.key;
            }
        }
        let hit_rects = self.hit_rects(active_layer);
        let key = hit_rects
            .iter()
            .find(|h| h.contains(point))
            .map(|h| h.key);
        self.geometry.last_hit = Some(LastHit {
            point,
            layer: NameKey::from(active_layer),
            key,
        });
        key
    }

    fn hit_rects(&mut self, active_layer: Option<&str>) -> Rc<[HitRect]> {
        if let Some(rects) = self.geometry.hit_rects.get(&NameQuery(active_layer)) {
            return rects.clone();
        }
        let mut keys: Vec<ItemId> = self.layer_keys(active_layer).iter().rev().copied().collect();
        if active_layer.is_some() {
            keys.extend(self.layer_keys(None).iter().rev());
        }
        let tree = &self.tree;
        let rects: Rc<[HitRect]> = keys
            .into_iter()
            .filter_map(|k| tree.item(k))
            .map(HitRect::new)
            .collect();
        #[cfg(feature = "tracing")]
        tracing::trace!(layer = ?active_layer, len = rects.len(), "hit rects repopulated");
        self.geometry
            .hit_rects
            .insert(NameKey::from(active_layer), rects.clone());
        rects
    }

    /// Give every key without a chamfer size the default of its layer.
    ///
    /// The default is half the most frequent `min(width, height)` of the
    /// layer's key border rects, preferring the larger size on ties. Keys
    /// outside any layer, sublayout keys included, share one default.
    pub fn init_chamfer_sizes(&mut self) {
        let mut layers: Vec<Option<String>> = Vec::from([None]);
        layers.extend(self.tree.layer_ids(self.root).into_iter().map(Some));
        let defaults: Vec<(Option<String>, Option<f64>)> = layers
            .into_iter()
            .map(|layer| {
                let size = self.most_frequent_key_size(layer.as_deref());
                (layer, size.map(|s| s * 0.5))
            })
            .collect();

        let assignments: Vec<(ItemId, f64)> = self
            .tree
            .global_keys(self.root, None)
            .filter_map(|id| {
                let item = self.tree.item(id)?;
                if item.key()?.chamfer_size.is_some() {
                    return None;
                }
                let layer = self.tree.layer_of(id);
                defaults
                    .iter()
                    .find(|(l, _)| l.as_deref() == layer)
                    .and_then(|(_, size)| *size)
                    .map(|size| (id, size))
            })
            .collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            layers = defaults.len(),
            keys = assignments.len(),
            "chamfer sizes initialized"
        );
        for (id, size) in assignments {
            self.tree.set_chamfer_size(id, Some(size));
        }
    }

    fn most_frequent_key_size(&self, layer: Option<&str>) -> Option<f64> {
        let mut histogram: HashMap<u64, usize> = HashMap::new();
        for id in self.tree.layer_items(self.root, layer, false) {
            let Some(item) = self.tree.item(id).filter(|i| i.is_key()) else {
                continue;
            };
            let r = item.border_rect();
            *histogram.entry(r.width().min(r.height()).to_bits()).or_default() += 1;
        }
        histogram
            .into_iter()
            .map(|(bits, count)| (count, f64::from_bits(bits)))
            .max_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
            .map(|(_, size)| size)
    }
}

fn cached(
    map: &mut Snapshots,
    name: Option<&str>,
    build: impl FnOnce() -> Rc<[ItemId]>,
) -> Rc<[ItemId]> {
    if let Some(hit) = map.get(&NameQuery(name)) {
        return hit.clone();
    }
    let items = build();
    map.insert(NameKey::from(name), items.clone());
    items
}

#[cfg_attr(
    not(feature = "tracing"),
    expect(unused_variables, reason = "`cache` is only logged.")
)]
fn snapshot<T>(cache: &'static str, items: impl IntoIterator<Item = T>) -> Rc<[T]> {
    let items: Rc<[T]> = items.into_iter().collect();
    #[cfg(feature = "tracing")]
    tracing::trace!(cache, len = items.len(), "traversal cache repopulated");
    items
}
