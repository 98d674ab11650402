// Copyright 2025 the Osk Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout tree: item identifiers, flags, and configuration.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;
use osk_shape::{Axis, KeyGeometry};

/// Identifier for an item in a [`LayoutTree`](crate::LayoutTree).
///
/// This is a small, copyable handle consisting of a slot index and a generation.
///
/// ## Semantics
///
/// - Items are never removed one by one; a layout is torn down as a whole with
///   [`LayoutTree::clear`](crate::LayoutTree::clear).
/// - Clearing bumps the tree's generation, so every `ItemId` handed out before
///   becomes stale and never aliases an item of the next layout.
///
/// Use [`LayoutTree::is_alive`](crate::LayoutTree::is_alive) to check whether an
/// `ItemId` still refers to a live item.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ItemId(pub(crate) u32, pub(crate) u32);

impl ItemId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-item behavior flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// Item is shown. Hiding an item hides its whole subtree.
        const VISIBLE   = 0b0000_0001;
        /// Item reacts to input.
        const SENSITIVE = 0b0000_0010;
        /// Item absorbs leftover space along its parent box's axis.
        const EXPAND    = 0b0000_0100;
        /// Item takes part in switch scanning.
        const SCANNABLE = 0b0000_1000;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::SENSITIVE | Self::EXPAND | Self::SCANNABLE
    }
}

/// Settings shared by every item kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemConfig {
    /// Name of the item, unique within a layout by convention.
    pub id: Option<String>,
    /// Key group, used to size labels of related keys alike.
    pub group: Option<String>,
    /// Layer this item and its descendants belong to.
    pub layer_id: Option<String>,
    /// Behavior flags. See [`ItemFlags`].
    pub flags: ItemFlags,
    /// Inset between the border rect and the content rect, in logical units.
    pub border: f64,
    /// Scan priority, inherited by descendants that set none.
    pub scan_priority: Option<i32>,
    /// Initial bounding rect including the border, in logical units.
    ///
    /// Containers recompute theirs from their children before every fit.
    pub border_rect: Rect,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            id: None,
            group: None,
            layer_id: None,
            flags: ItemFlags::default(),
            border: 0.0,
            scan_priority: None,
            border_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// Settings of a linear container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxConfig {
    /// Axis children are placed along.
    pub axis: Axis,
    /// Logical gap between adjacent children.
    pub spacing: f64,
    /// Leave hidden children out of the bounding box.
    pub compact: bool,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            spacing: 1.0,
            compact: false,
        }
    }
}

/// Settings of a fixed-position container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelConfig {
    /// Leave hidden children out of the bounding box.
    pub compact: bool,
}

/// The closed set of key classes a layout can declare.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Ordinary rectangular (or shaped) key.
    #[default]
    Rect,
    /// Key that always keeps its full size.
    FullSize,
    /// Full-size key in a bar, such as a word suggestion row.
    Bar,
    /// Word suggestion.
    Word,
    /// Text entry line.
    Inputline,
}

impl KeyClass {
    /// Look up a key class by its layout file class name.
    pub fn from_class_name(name: &str) -> Option<Self> {
        Some(match name {
            "RectKey" => Self::Rect,
            "FullSizeKey" => Self::FullSize,
            "BarKey" => Self::Bar,
            "WordKey" => Self::Word,
            "InputlineKey" => Self::Inputline,
            _ => return None,
        })
    }

    /// The layout file class name.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Rect => "RectKey",
            Self::FullSize => "FullSizeKey",
            Self::Bar => "BarKey",
            Self::Word => "WordKey",
            Self::Inputline => "InputlineKey",
        }
    }

    /// Whether keys of this class shrink with the theme's key size.
    pub fn honors_key_size(self) -> bool {
        matches!(self, Self::Rect | Self::Inputline)
    }
}

/// Settings of a key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyConfig {
    /// Key class.
    pub class: KeyClass,
    /// Non-rectangular outline. `None` means the key is its rect.
    pub geometry: Option<KeyGeometry>,
    /// Size of the rounded corners, in logical units.
    ///
    /// Keys without one get a per-layer default when wrapped in a
    /// [`LayoutRoot`](crate::LayoutRoot).
    pub chamfer_size: Option<f64>,
    /// Id of the sublayout shown as this key's popup.
    pub popup_id: Option<String>,
}

/// What an item is, with its kind-specific settings.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    /// Linear container.
    Box(BoxConfig),
    /// Fixed-position container.
    Panel(PanelConfig),
    /// Leaf key.
    Key(KeyConfig),
}

impl ItemKind {
    /// Default-configured kind for a layout file class name.
    ///
    /// Understands `LayoutBox`, `LayoutPanel`, and every [`KeyClass`] name.
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "LayoutBox" => Some(Self::Box(BoxConfig::default())),
            "LayoutPanel" => Some(Self::Panel(PanelConfig::default())),
            _ => KeyClass::from_class_name(name).map(|class| {
                Self::Key(KeyConfig {
                    class,
                    ..KeyConfig::default()
                })
            }),
        }
    }

    /// The layout file class name.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "LayoutBox",
            Self::Panel(_) => "LayoutPanel",
            Self::Key(key) => key.class.class_name(),
        }
    }

    /// True for keys.
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }
}

/// Keys sharing a group name, in tree order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGroup {
    /// Group name; `None` collects keys without a group.
    pub name: Option<String>,
    /// Keys of the group.
    pub keys: Vec<ItemId>,
}
