//! Background pixel composition.
//!
//! One screen coordinate resolves to a color through four lookups, all made
//! against PPU memory with the scroll offsets applied first:
//!
//! ```text
//! nametable -> tile index -> pattern planes -> 2-bit pattern color
//!           -> attribute byte -> 2-bit palette group
//! palette RAM[$3F00 + (group << 2 | pattern)] -> hardware palette -> RGB
//! ```

use crate::{
    address::{BgPatternBase, Coord, NametableBase, Pixel, PpuMem, ScrollX, ScrollY},
    bus::Bus,
    memory::ppu as ppu_mem,
    ppu::{SCREEN_HEIGHT, SCREEN_WIDTH, palette::Color},
};

/// Nametable columns.
const TILES_PER_ROW: u16 = 32;
/// Nametable rows.
const TILES_PER_COLUMN: u16 = 30;
/// Columns of the 2x2 nametable arrangement the scrolled tile grid wraps in.
const SUPER_GRID_COLUMNS: u16 = 2 * TILES_PER_ROW;
/// Rows of the 2x2 nametable arrangement the scrolled tile grid wraps in.
const SUPER_GRID_ROWS: u16 = 2 * TILES_PER_COLUMN;
/// Pixels along one side of a tile.
const TILE_SIZE: u16 = 8;
/// Tiles along one side of an attribute group.
const ATTRIBUTE_GROUP_TILES: u16 = 4;
/// Attribute groups per nametable row.
const ATTRIBUTE_GROUPS_PER_ROW: u16 = TILES_PER_ROW / ATTRIBUTE_GROUP_TILES;

/// Position inside the scrolled background plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlanePos {
    x: u16,
    y: u16,
}

impl PlanePos {
    /// Applies the scroll offsets, wrapping at the picture size.
    fn scrolled(at: Coord, scroll_x: u8, scroll_y: u8) -> Self {
        Self {
            x: (at.x() as u16 + scroll_x as u16) % SCREEN_WIDTH as u16,
            y: (at.y() as u16 + scroll_y as u16) % SCREEN_HEIGHT as u16,
        }
    }

    /// Column and row in the nametable tile grid.
    ///
    /// Coordinates first wrap on the 64x60 super-grid, then reduce into the
    /// 32x30 grid of a single nametable.
    fn tile(self) -> (u16, u16) {
        let tile_x = (self.x / TILE_SIZE) % SUPER_GRID_COLUMNS % TILES_PER_ROW;
        let tile_y = (self.y / TILE_SIZE) % SUPER_GRID_ROWS % TILES_PER_COLUMN;
        (tile_x, tile_y)
    }

    fn fine_x(self) -> u16 {
        self.x % TILE_SIZE
    }

    fn fine_y(self) -> u16 {
        self.y % TILE_SIZE
    }
}

/// Reads the two bit-planes of `tile` at row `fine_y` and picks column
/// `fine_x`, giving a pattern color in `0..=3`.
fn pattern_color<M: Bus>(bus: &M, tile: u8, fine_x: u16, fine_y: u16) -> u8 {
    let offset = bus.load(BgPatternBase) + tile as u16 * ppu_mem::TILE_BYTES;
    let plane0 = bus.load(PpuMem(offset + fine_y));
    let plane1 = bus.load(PpuMem(offset + fine_y + 8));
    let bit = 7 - fine_x;
    let lo = (plane0 >> bit) & 1;
    let hi = (plane1 >> bit) & 1;
    (hi << 1) | lo
}

/// Palette group of the tile at `(tile_x, tile_y)`.
fn attribute_color<M: Bus>(bus: &M, nametable: u16, tile_x: u16, tile_y: u16) -> u8 {
    let group = (tile_y / ATTRIBUTE_GROUP_TILES) * ATTRIBUTE_GROUPS_PER_ROW
        + tile_x / ATTRIBUTE_GROUP_TILES;
    let attribute = bus.load(PpuMem(nametable + ppu_mem::ATTRIBUTE_OFFSET + group));

    let left = tile_x % ATTRIBUTE_GROUP_TILES < 2;
    let top = tile_y % ATTRIBUTE_GROUP_TILES < 2;
    let shift = match (top, left) {
        (true, true) => 0,
        (true, false) => 2,
        (false, true) => 4,
        (false, false) => 6,
    };
    (attribute >> shift) & 0b11
}

/// Resolves the background color visible at `at` under the current scroll.
pub fn background_color<M: Bus>(bus: &M, at: Coord) -> Color {
    let pos = PlanePos::scrolled(at, bus.load(ScrollX), bus.load(ScrollY));
    let (tile_x, tile_y) = pos.tile();
    let nametable = bus.load(NametableBase);

    let tile = bus.load(PpuMem(nametable + TILES_PER_ROW * tile_y + tile_x));
    let pattern = pattern_color(bus, tile, pos.fine_x(), pos.fine_y());
    let attribute = attribute_color(bus, nametable, tile_x, tile_y);

    let index = (attribute << 2) | pattern;
    let entry = bus.load(PpuMem(ppu_mem::PALETTE_BASE + index as u16));
    Color::from_index(entry)
}

/// Draws the background pixel at `at` into the screen buffer.
pub fn render_pixel<M: Bus>(bus: &mut M, at: Coord) {
    let color = background_color(bus, at);
    bus.store(Pixel(at), color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FixtureBus;

    const NT: u16 = ppu_mem::NAMETABLE_BASE;
    const ATTR: u16 = NT + ppu_mem::ATTRIBUTE_OFFSET;
    const PALETTE: u16 = ppu_mem::PALETTE_BASE;

    fn at(x: u8, y: u8) -> Coord {
        Coord::new(x, y).expect("on screen")
    }

    /// Palette entries `0x00..=0x0F` hold hardware colors `0x20..=0x2F` so
    /// every palette index maps to a distinct color.
    fn distinct_palette(bus: FixtureBus) -> FixtureBus {
        let entries: Vec<u8> = (0x20..0x30).collect();
        bus.with_ppu_bytes(PALETTE, &entries)
    }

    fn palette_color(index: u8) -> Color {
        Color::from_index(0x20 + index)
    }

    #[test]
    fn pattern_planes_select_bits_from_msb() {
        // Tile 1, row 0: plane 0 = 0b1000_0001, plane 1 = 0b1100_0000.
        let bus = distinct_palette(FixtureBus::new())
            .with_ppu_bytes(NT, &[1])
            .with_ppu_bytes(16, &[0b1000_0001])
            .with_ppu_bytes(16 + 8, &[0b1100_0000]);

        assert_eq!(background_color(&bus, at(0, 0)), palette_color(3));
        assert_eq!(background_color(&bus, at(1, 0)), palette_color(2));
        assert_eq!(background_color(&bus, at(2, 0)), palette_color(0));
        assert_eq!(background_color(&bus, at(7, 0)), palette_color(1));
        // Row 1 of tile 1 is empty.
        assert_eq!(background_color(&bus, at(0, 1)), palette_color(0));
    }

    #[test]
    fn tiles_are_read_row_major_from_the_nametable() {
        // Tile 1 is solid pattern color 1; place it at column 3, row 2.
        let bus = distinct_palette(FixtureBus::new())
            .with_ppu_fill(16, 8, 0xFF)
            .with_ppu_bytes(NT + 32 * 2 + 3, &[1]);

        assert_eq!(background_color(&bus, at(3 * 8, 2 * 8)), palette_color(1));
        assert_eq!(background_color(&bus, at(3 * 8 + 7, 2 * 8 + 7)), palette_color(1));
        assert_eq!(background_color(&bus, at(4 * 8, 2 * 8)), palette_color(0));
        assert_eq!(background_color(&bus, at(3 * 8, 3 * 8)), palette_color(0));
    }

    #[test]
    fn attribute_quadrants() {
        // Group 0: TL=0, TR=1, BL=2, BR=3. Group 9 (tiles 4..8, rows 4..8): BR=1.
        let bus = distinct_palette(FixtureBus::new())
            .with_ppu_bytes(ATTR, &[0b11_10_01_00])
            .with_ppu_bytes(ATTR + 9, &[0b01_00_00_00]);

        assert_eq!(background_color(&bus, at(0, 0)), palette_color(0));
        assert_eq!(background_color(&bus, at(16, 0)), palette_color(1 << 2));
        assert_eq!(background_color(&bus, at(0, 16)), palette_color(2 << 2));
        assert_eq!(background_color(&bus, at(31, 31)), palette_color(3 << 2));
        assert_eq!(background_color(&bus, at(48, 48)), palette_color(1 << 2));
        assert_eq!(background_color(&bus, at(32, 32)), palette_color(0));
    }

    #[test]
    fn pattern_table_and_nametable_bases_are_honoured() {
        let mut bus = distinct_palette(FixtureBus::new())
            .with_ppu_fill(ppu_mem::PATTERN_TABLE_1, 8, 0xFF)
            .with_ppu_bytes(0x2400, &[0]);

        assert_eq!(background_color(&bus, at(0, 0)), palette_color(0));
        bus.store(BgPatternBase, ppu_mem::PATTERN_TABLE_1);
        assert_eq!(background_color(&bus, at(0, 0)), palette_color(1));

        let mut bus = bus.with_ppu_bytes(NT, &[5]);
        bus.store(NametableBase, 0x2400);
        assert_eq!(background_color(&bus, at(0, 0)), palette_color(1));
    }

    #[test]
    fn scroll_shifts_the_plane() {
        let mut bus = distinct_palette(FixtureBus::new())
            .with_ppu_fill(16, 8, 0xFF)
            .with_ppu_bytes(NT + 1, &[1]);
        assert_eq!(background_color(&bus, at(0, 0)), palette_color(0));

        bus.store(ScrollX, 8);
        assert_eq!(background_color(&bus, at(0, 0)), palette_color(1));
    }

    #[test]
    fn scroll_wraps_at_picture_edges() {
        let mut bus = distinct_palette(FixtureBus::new())
            .with_ppu_fill(16, 8, 0xFF)
            .with_ppu_bytes(NT, &[1]);

        // 255 + 1 wraps to column 0, not 256.
        bus.store(ScrollX, 1);
        assert_eq!(background_color(&bus, at(255, 0)), palette_color(1));

        // 239 + 1 wraps to row 0, not 240.
        bus.store(ScrollX, 0);
        bus.store(ScrollY, 1);
        assert_eq!(background_color(&bus, at(0, 239)), palette_color(1));
    }

    #[test]
    fn render_pixel_stores_at_the_unscrolled_coordinate() {
        let mut bus = distinct_palette(FixtureBus::new())
            .with_ppu_fill(16, 8, 0xFF)
            .with_ppu_bytes(NT + 1, &[1]);
        bus.store(ScrollX, 8);

        render_pixel(&mut bus, at(0, 0));
        assert_eq!(bus.load(Pixel(at(0, 0))), palette_color(1));
        assert_eq!(bus.load(Pixel(at(8, 0))), Color::default());
    }
}
