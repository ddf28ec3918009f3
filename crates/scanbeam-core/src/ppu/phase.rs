//! Classification of the raster position into frame phases.

use crate::error::Error;

/// Last visible scanline.
const LAST_RENDER_SCANLINE: u16 = 239;
/// The idle line between the picture and vertical blank.
const POST_RENDER_SCANLINE: u16 = 240;
/// Scanline whose dot 1 raises vertical blank.
const VBLANK_START_SCANLINE: u16 = 241;
/// Scanline whose dot 1 drops vertical blank.
const VBLANK_END_SCANLINE: u16 = 261;
/// Dot on which both vertical-blank edges happen.
const VBLANK_EDGE_CYCLE: u16 = 1;
/// Last dot of a scanline.
const LAST_CYCLE: u16 = 340;

/// What the PPU does at one raster position.
///
/// Derived fresh from the counters every dot and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Scanlines 0..=239.
    Render(RenderPhase),
    /// Scanline 240.
    PostRender,
    /// Scanlines 241..=261.
    VBlank(VBlankPhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// Dots 1..=256 each produce the pixel at `x = cycle - 1`.
    Visible { scanline: u16, cycle: u16 },
    /// Dots 321..=336, where hardware fetches the first tiles of the next line.
    PreFetch,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VBlankPhase {
    /// (241, 1)
    Enter,
    /// (261, 1)
    Exit,
    Idle,
}

/// Classifies `(scanline, cycle)`.
///
/// Pure: the result depends on nothing but the two arguments. Positions
/// outside `0..=261` x `0..=340` are reported as [`Error::PhaseInvariant`].
pub fn classify(scanline: u16, cycle: u16) -> Result<FramePhase, Error> {
    if cycle > LAST_CYCLE {
        return Err(Error::PhaseInvariant { scanline, cycle });
    }

    let phase = match scanline {
        0..=LAST_RENDER_SCANLINE => FramePhase::Render(match cycle {
            0 => RenderPhase::Idle,
            1..=256 => RenderPhase::Visible { scanline, cycle },
            321..=336 => RenderPhase::PreFetch,
            _ => RenderPhase::Idle,
        }),
        POST_RENDER_SCANLINE => FramePhase::PostRender,
        VBLANK_START_SCANLINE..=VBLANK_END_SCANLINE => FramePhase::VBlank(
            match (scanline, cycle) {
                (VBLANK_START_SCANLINE, VBLANK_EDGE_CYCLE) => VBlankPhase::Enter,
                (VBLANK_END_SCANLINE, VBLANK_EDGE_CYCLE) => VBlankPhase::Exit,
                _ => VBlankPhase::Idle,
            },
        ),
        _ => return Err(Error::PhaseInvariant { scanline, cycle }),
    };

    Ok(phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_line_boundaries() {
        let render = |cycle| classify(100, cycle).expect("in range");
        assert_eq!(render(0), FramePhase::Render(RenderPhase::Idle));
        assert_eq!(
            render(1),
            FramePhase::Render(RenderPhase::Visible {
                scanline: 100,
                cycle: 1
            })
        );
        assert_eq!(
            render(256),
            FramePhase::Render(RenderPhase::Visible {
                scanline: 100,
                cycle: 256
            })
        );
        assert_eq!(render(257), FramePhase::Render(RenderPhase::Idle));
        assert_eq!(render(320), FramePhase::Render(RenderPhase::Idle));
        assert_eq!(render(321), FramePhase::Render(RenderPhase::PreFetch));
        assert_eq!(render(336), FramePhase::Render(RenderPhase::PreFetch));
        assert_eq!(render(337), FramePhase::Render(RenderPhase::Idle));
        assert_eq!(render(340), FramePhase::Render(RenderPhase::Idle));
    }

    #[test]
    fn post_render_line_does_nothing_at_any_dot() {
        for cycle in [0, 1, 128, 340] {
            assert_eq!(classify(240, cycle).expect("in range"), FramePhase::PostRender);
        }
    }

    #[test]
    fn vblank_edges() {
        assert_eq!(
            classify(241, 1).expect("in range"),
            FramePhase::VBlank(VBlankPhase::Enter)
        );
        assert_eq!(
            classify(261, 1).expect("in range"),
            FramePhase::VBlank(VBlankPhase::Exit)
        );
        assert_eq!(
            classify(241, 0).expect("in range"),
            FramePhase::VBlank(VBlankPhase::Idle)
        );
        assert_eq!(
            classify(250, 1).expect("in range"),
            FramePhase::VBlank(VBlankPhase::Idle)
        );
    }

    #[test]
    fn unreachable_positions_are_errors() {
        assert!(matches!(
            classify(262, 0),
            Err(Error::PhaseInvariant {
                scanline: 262,
                cycle: 0
            })
        ));
        assert!(matches!(
            classify(0, 341),
            Err(Error::PhaseInvariant {
                scanline: 0,
                cycle: 341
            })
        ));
    }
}
