//! Paged category picker along the bottom of the editor window.
//!
//! The outer pages show one button per menu group. Right-clicking a button
//! cycles through the categories of its group; middle-clicking opens the
//! inner pages, which list the variants of the shown category.

use macroquad::prelude::{vec2, Color, Rect, Vec2};

use crate::assets::{AssetCache, AssetLoader};
use crate::catalog::{Catalog, CategoryId, MenuGroup};
use crate::render::command::DrawCommand;

const BUTTON_BG: Color = Color::new(0x33 as f32 / 255.0, 0x32 as f32 / 255.0, 0x3d as f32 / 255.0, 1.0);
const BUTTON_LINE: Color = Color::new(0xf5 as f32 / 255.0, 0xf1 as f32 / 255.0, 0xde as f32 / 255.0, 1.0);
const MENU_LINE: Color = Color::new(21.0 / 255.0, 20.0 / 255.0, 26.0 / 255.0, 80.0 / 255.0);

/// Button geometry of the menu strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    /// Button side in pixels.
    pub tile: f32,
    /// Gap between buttons.
    pub margin: f32,
    /// Buttons per page.
    pub per_page: usize,
    /// Strip background.
    pub rect: Rect,
    screen: Vec2,
}

impl MenuLayout {
    /// Fits as many buttons as the width allows, then spreads the leftover
    /// width evenly as margin.
    pub fn new(screen: Vec2, tile: f32, margin: f32) -> Self {
        let per_page = ((screen.x - margin * 3.0) / (tile + margin)).floor().max(1.0) as usize;
        let margin = (screen.x - tile * per_page as f32) / (per_page as f32 + 3.0);
        let height = tile + margin * 2.0;
        MenuLayout {
            tile,
            margin,
            per_page,
            rect: Rect::new(margin, screen.y - margin - height, screen.x - margin * 2.0, height),
            screen,
        }
    }

    /// Screen rect of button `slot` on the current page.
    pub fn slot_rect(&self, slot: usize) -> Rect {
        Rect::new(
            (self.tile + self.margin) * slot as f32 + self.margin * 2.0,
            self.screen.y - self.rect.h,
            self.tile,
            self.tile,
        )
    }

    /// Button under `pos`.
    pub fn slot_at(&self, pos: Vec2) -> Option<usize> {
        (0..self.per_page).find(|&slot| self.slot_rect(slot).contains(pos))
    }
}

fn page_count(items: usize, per_page: usize) -> usize {
    items.div_ceil(per_page).max(1)
}

/// Editor palette: a page of group buttons, or the variants of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuPager {
    layout: MenuLayout,
    groups: Vec<MenuGroup>,
    /// Which category of each group its button shows.
    shown: Vec<usize>,
    selection: usize,
    page: usize,
    inner_mode: bool,
    variant: usize,
    inner_page: usize,
}

impl MenuPager {
    /// Pager over the groups of `catalog`, first group selected.
    pub fn new(catalog: &Catalog, layout: MenuLayout) -> Self {
        let groups = catalog.menu_groups();
        MenuPager {
            layout,
            shown: vec![0; groups.len()],
            groups,
            selection: 0,
            page: 0,
            inner_mode: false,
            variant: 0,
            inner_page: 0,
        }
    }

    /// Button geometry.
    pub fn layout(&self) -> &MenuLayout {
        &self.layout
    }

    /// Menu groups, in button order.
    pub fn groups(&self) -> &[MenuGroup] {
        &self.groups
    }

    /// Whether `pos` is over the strip.
    pub fn contains(&self, pos: Vec2) -> bool {
        self.layout.rect.contains(pos)
    }

    /// Selected group.
    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Outer page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Variant page while in inner mode.
    pub fn inner_page(&self) -> usize {
        self.inner_page
    }

    /// Whether the variants of one category are shown.
    pub fn inner_mode(&self) -> bool {
        self.inner_mode
    }

    /// Number of outer pages.
    pub fn page_count(&self) -> usize {
        page_count(self.groups.len(), self.layout.per_page)
    }

    /// Category shown on the button of group `group`.
    pub fn shown_category(&self, group: usize) -> Option<CategoryId> {
        let g = self.groups.get(group)?;
        g.categories.get(self.shown[group]).copied()
    }

    /// Category placements come from.
    pub fn active_category(&self) -> Option<CategoryId> {
        self.shown_category(self.selection)
    }

    /// Variant placements come from.
    pub fn active_variant(&self) -> usize {
        self.variant
    }

    fn variant_count(&self, catalog: &Catalog) -> usize {
        self.active_category()
            .and_then(|id| catalog.get(id))
            .map_or(0, |def| def.variants.len())
    }

    /// Number of variant pages of the active category.
    pub fn inner_page_count(&self, catalog: &Catalog) -> usize {
        page_count(self.variant_count(catalog), self.layout.per_page)
    }

    /// Handles a press inside the menu. Buttons are left, middle, right.
    pub fn click(&mut self, pos: Vec2, buttons: [bool; 3], catalog: &Catalog) {
        let Some(slot) = self.layout.slot_at(pos) else {
            return;
        };
        let [left, middle, right] = buttons;
        let per = self.layout.per_page;

        if self.inner_mode {
            if left {
                let index = self.inner_page * per + slot;
                if index < self.variant_count(catalog) {
                    self.variant = index;
                }
            }
            if middle || right {
                self.inner_mode = false;
            }
            return;
        }

        let group = self.page * per + slot;
        if group >= self.groups.len() {
            return;
        }
        self.selection = group;
        self.variant = 0;
        self.inner_page = 0;
        if right {
            self.shown[group] = (self.shown[group] + 1) % self.groups[group].categories.len().max(1);
        }
        if middle {
            self.inner_mode = true;
        }
    }

    /// Left/right hotkeys: step the selection within the current page.
    pub fn step_selection(&mut self, forward: bool, catalog: &Catalog) {
        let per = self.layout.per_page;
        if self.inner_mode {
            let total = self.variant_count(catalog);
            let (lo, hi) = page_range(self.inner_page, per, total);
            self.variant = step(self.variant, forward, 1).clamp(lo, hi);
        } else {
            let (lo, hi) = page_range(self.page, per, self.groups.len());
            let selection = step(self.selection, forward, 1).clamp(lo, hi);
            if selection != self.selection {
                self.selection = selection;
                self.variant = 0;
            }
        }
    }

    /// Up/down hotkeys: turn the page and carry the selection along.
    pub fn step_page(&mut self, forward: bool, catalog: &Catalog) {
        let per = self.layout.per_page;
        if self.inner_mode {
            let total = self.variant_count(catalog);
            self.inner_page = step(self.inner_page, forward, 1).min(page_count(total, per) - 1);
            let (lo, hi) = page_range(self.inner_page, per, total);
            self.variant = step(self.variant, forward, per).clamp(lo, hi);
        } else {
            self.page = step(self.page, forward, 1).min(self.page_count() - 1);
            let (lo, hi) = page_range(self.page, per, self.groups.len());
            let selection = step(self.selection, forward, per).clamp(lo, hi);
            if selection != self.selection {
                self.selection = selection;
                self.variant = 0;
            }
        }
    }

    /// Emits the strip, its buttons and the selection frame.
    pub fn draw<L: AssetLoader>(&self, catalog: &Catalog, cache: &mut AssetCache<L>, out: &mut Vec<DrawCommand>) {
        let frame = inflate(self.layout.rect, 2.0);
        out.push(DrawCommand::FillRect {
            rect: frame,
            color: MENU_LINE,
        });

        let per = self.layout.per_page;
        let mut highlight = None;
        if self.inner_mode {
            let Some(id) = self.active_category() else {
                return;
            };
            let start = self.inner_page * per;
            for slot in 0..per {
                let rect = self.layout.slot_rect(slot);
                out.push(DrawCommand::FillRect { rect, color: BUTTON_BG });
                if let Some(path) = catalog.variant_path(id, start + slot) {
                    let image = cache.image(&path);
                    out.push(DrawCommand::sprite(image, centered(rect, cache.size(image))));
                }
                if start + slot == self.variant {
                    highlight = Some(rect);
                }
            }
        } else {
            let start = self.page * per;
            for (slot, group) in (start..self.groups.len().min(start + per)).enumerate() {
                let rect = self.layout.slot_rect(slot);
                out.push(DrawCommand::FillRect { rect, color: BUTTON_BG });
                if let Some(path) = self.shown_category(group).and_then(|id| catalog.variant_path(id, 0)) {
                    let image = cache.image(&path);
                    out.push(DrawCommand::sprite(image, centered(rect, cache.size(image))));
                }
                if group == self.selection {
                    highlight = Some(rect);
                }
            }
        }

        if let Some(rect) = highlight {
            out.push(DrawCommand::OutlineRect {
                rect: inflate(rect, 2.0),
                thickness: 5.0,
                color: BUTTON_LINE,
            });
        }
    }
}

fn step(value: usize, forward: bool, by: usize) -> usize {
    if forward {
        value.saturating_add(by)
    } else {
        value.saturating_sub(by)
    }
}

/// First and last item index shown on `page`.
fn page_range(page: usize, per: usize, total: usize) -> (usize, usize) {
    let lo = page * per;
    let hi = (lo + per).min(total).saturating_sub(1).max(lo);
    (lo, hi)
}

fn inflate(rect: Rect, by: f32) -> Rect {
    Rect::new(rect.x - by, rect.y - by, rect.w + by * 2.0, rect.h + by * 2.0)
}

fn centered(slot: Rect, size: (u32, u32)) -> Vec2 {
    let center = slot.center();
    vec2(center.x - size.0 as f32 / 2.0, center.y - size.1 as f32 / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryDef, Style};

    fn catalog(groups: usize) -> Catalog {
        let mut defs: Vec<CategoryDef> = (0..groups)
            .map(|i| CategoryDef {
                style: Style::Terrain,
                menu: format!("group{i}"),
                sprite_dir: format!("tiles/{i}"),
                animation_dir: None,
                variants: (0..3).map(|v| format!("{v}.png")).collect(),
            })
            .collect();
        // second category in group0
        defs.push(CategoryDef {
            style: Style::Terrain,
            menu: "group0".into(),
            sprite_dir: "tiles/alt".into(),
            animation_dir: None,
            variants: (0..25).map(|v| format!("{v:02}.png")).collect(),
        });
        Catalog::new(defs)
    }

    fn layout() -> MenuLayout {
        MenuLayout::new(vec2(1280.0, 720.0), 64.0, 6.0)
    }

    #[test]
    fn layout_fits_eighteen_buttons() {
        let l = layout();
        assert_eq!(l.per_page, 18);
        assert!((l.margin - 128.0 / 21.0).abs() < 1e-4);
        assert_eq!(l.slot_at(l.slot_rect(3).center()), Some(3));
        assert!(l.rect.contains(l.slot_rect(17).center()));
    }

    #[test]
    fn right_click_cycles_group_categories() {
        let cat = catalog(2);
        let mut menu = MenuPager::new(&cat, layout());
        let button = menu.layout().slot_rect(0).center();
        assert_eq!(menu.active_category(), Some(CategoryId(0)));
        menu.click(button, [false, false, true], &cat);
        assert_eq!(menu.active_category(), Some(CategoryId(2)));
        menu.click(button, [false, false, true], &cat);
        assert_eq!(menu.active_category(), Some(CategoryId(0)));
    }

    #[test]
    fn inner_pages_pick_variants() {
        let cat = catalog(1);
        let mut menu = MenuPager::new(&cat, layout());
        let l = *menu.layout();
        let slot = |i| l.slot_rect(i).center();
        let (s0, s2) = (slot(0), slot(2));
        menu.click(s0, [false, false, true], &cat);
        menu.click(s0, [false, true, false], &cat);
        assert!(menu.inner_mode());
        assert_eq!(menu.inner_page_count(&cat), 2);

        menu.step_page(true, &cat);
        assert_eq!(menu.inner_page(), 1);
        menu.click(s2, [true, false, false], &cat);
        assert_eq!(menu.active_variant(), 20);

        // past the last variant
        menu.click(slot(10), [true, false, false], &cat);
        assert_eq!(menu.active_variant(), 20);

        menu.click(s0, [false, false, true], &cat);
        assert!(!menu.inner_mode());
        assert_eq!(menu.active_variant(), 20);
    }

    #[test]
    fn outer_pages_and_selection_keys() {
        let cat = catalog(20);
        let mut menu = MenuPager::new(&cat, layout());
        assert_eq!(menu.page_count(), 2);

        menu.step_selection(false, &cat);
        assert_eq!(menu.selection(), 0);
        menu.step_page(true, &cat);
        assert_eq!((menu.page(), menu.selection()), (1, 18));
        menu.step_selection(true, &cat);
        menu.step_selection(true, &cat);
        assert_eq!(menu.selection(), 19);
        menu.step_page(true, &cat);
        assert_eq!(menu.page(), 1);
    }
}
