//! Property tests for the raster counters, phase classification and the
//! background pixel pipeline.

use proptest::prelude::*;
use scanbeam_core::{
    address::{Coord, Cycle, Pixel, ScrollX, ScrollY, Scanline},
    bus::{Bus, FixtureBus},
    memory::ppu as ppu_mem,
    ppu::{
        self, CYCLES_PER_SCANLINE, DOTS_PER_FRAME, SCANLINES_PER_FRAME,
        background::{background_color, render_pixel},
        phase::classify,
    },
};

/// A fixture with random pattern data for tiles 0-15, a nametable that only
/// references those tiles, random attributes and a random palette.
fn scene() -> impl Strategy<Value = FixtureBus> {
    (
        prop::collection::vec(any::<u8>(), 16 * 16),
        prop::collection::vec(0u8..16, 960),
        prop::collection::vec(any::<u8>(), 64),
        prop::collection::vec(0u8..64, 32),
    )
        .prop_map(|(patterns, tiles, attributes, palette)| {
            FixtureBus::new()
                .with_ppu_bytes(ppu_mem::PATTERN_TABLE_0, &patterns)
                .with_ppu_bytes(ppu_mem::NAMETABLE_BASE, &tiles)
                .with_ppu_bytes(
                    ppu_mem::NAMETABLE_BASE + ppu_mem::ATTRIBUTE_OFFSET,
                    &attributes,
                )
                .with_ppu_bytes(ppu_mem::PALETTE_BASE, &palette)
        })
}

fn coord() -> impl Strategy<Value = Coord> {
    (any::<u8>(), 0u8..240).prop_map(|(x, y)| Coord::new(x, y).expect("row in range"))
}

proptest! {
    #[test]
    fn classify_is_total_over_the_raster(
        scanline in 0u16..SCANLINES_PER_FRAME,
        cycle in 0u16..CYCLES_PER_SCANLINE,
    ) {
        let first = classify(scanline, cycle);
        prop_assert!(first.is_ok());
        prop_assert_eq!(first.ok(), classify(scanline, cycle).ok());
    }

    #[test]
    fn classify_rejects_positions_off_the_raster(
        scanline in SCANLINES_PER_FRAME..u16::MAX,
        cycle in 0u16..CYCLES_PER_SCANLINE,
    ) {
        prop_assert!(classify(scanline, cycle).is_err());
        let past_line_end = scanline.max(CYCLES_PER_SCANLINE);
        prop_assert!(classify(cycle % SCANLINES_PER_FRAME, past_line_end).is_err());
    }

    #[test]
    fn tick_advances_one_dot_and_stays_in_range(
        scanline in 0u16..SCANLINES_PER_FRAME,
        cycle in 0u16..CYCLES_PER_SCANLINE,
    ) {
        let mut bus = FixtureBus::new().at_position(scanline, cycle);
        ppu::tick(&mut bus);

        let next_scanline = bus.load(Scanline);
        let next_cycle = bus.load(Cycle);
        prop_assert!(next_scanline < SCANLINES_PER_FRAME);
        prop_assert!(next_cycle < CYCLES_PER_SCANLINE);

        let dot = |s: u16, c: u16| s as u32 * CYCLES_PER_SCANLINE as u32 + c as u32;
        prop_assert_eq!(
            dot(next_scanline, next_cycle),
            (dot(scanline, cycle) + 1) % DOTS_PER_FRAME
        );
    }

    #[test]
    fn rendering_a_pixel_is_idempotent(
        bus in scene(),
        at in coord(),
        scroll_x in any::<u8>(),
        scroll_y in any::<u8>(),
    ) {
        let mut bus = bus;
        bus.store(ScrollX, scroll_x);
        bus.store(ScrollY, scroll_y);

        render_pixel(&mut bus, at);
        let first = bus.load(Pixel(at));
        render_pixel(&mut bus, at);

        prop_assert_eq!(first, bus.load(Pixel(at)));
        prop_assert_eq!(first, background_color(&bus, at));
    }

    #[test]
    fn scrolling_shifts_the_sample_point_with_wraparound(
        bus in scene(),
        at in coord(),
        scroll_x in any::<u8>(),
        scroll_y in any::<u8>(),
    ) {
        let mut bus = bus;
        let shifted_x = ((at.x() as u16 + scroll_x as u16) % 256) as u8;
        let shifted_y = ((at.y() as u16 + scroll_y as u16) % 240) as u8;
        let shifted = Coord::new(shifted_x, shifted_y).expect("row in range");
        let unscrolled = background_color(&bus, shifted);

        bus.store(ScrollX, scroll_x);
        bus.store(ScrollY, scroll_y);
        prop_assert_eq!(background_color(&bus, at), unscrolled);
    }
}
