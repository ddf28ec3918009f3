mod args;

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use scanbeam_core::{
    Session,
    bus::cpu::cpu_write,
    config::SessionConfig,
    memory::ppu::Register,
    ppu::{
        SCREEN_HEIGHT, SCREEN_WIDTH,
        buffer::{ColorFormat, pack_frame},
    },
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// PPUCTRL bit 7.
const CONTROL_NMI_ENABLE: u8 = 0b1000_0000;

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level `{level}`"))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn write_png(path: &Path, rgb: &[u8]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
    );
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = SessionConfig::default().with_interleave(args.interleave.into());
    let mut session = Session::from_file(&args.rom, config)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    if let Some(path) = &args.ppu_dump {
        let dump = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        session
            .state_mut()
            .load_ppu_dump(&dump)
            .with_context(|| format!("loading PPU dump {}", path.display()))?;
    }

    let state = session.state_mut();
    if args.nmi {
        cpu_write(state, Register::Control.addr(), CONTROL_NMI_ENABLE);
    }
    cpu_write(state, Register::Scroll.addr(), args.scroll_x);
    cpu_write(state, Register::Scroll.addr(), args.scroll_y);

    for frame in 0..args.frames {
        session
            .step_frame()
            .with_context(|| format!("stepping frame {frame}"))?;
    }
    info!(
        frames = args.frames,
        nmis = session.cpu().nmi_serviced(),
        interleave = %session.config().interleave,
        "run finished"
    );

    let mut rgb = Vec::new();
    pack_frame(session.state(), ColorFormat::Rgb888, &mut rgb);
    write_png(&args.out, &rgb)?;
    info!(path = %args.out.display(), "frame written");
    Ok(())
}
