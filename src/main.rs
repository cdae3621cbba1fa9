//! Host-side helper.
//!
//! `cargo run` builds the WASM bundle into `static/pkg` and serves `static/`
//! on port 8000. `cargo run -- preview <scene> [frames] [width]x[height]`
//! runs a scene headless and prints what it would have drawn.

use std::collections::BTreeMap;
use std::error::Error;
use std::process::{Command, Stdio};
use std::{env, thread, time::Duration};

use folio_canvas::surface::Command as Draw;
use folio_canvas::{Animation, ColorMode, EngineConfig, FrameHost, Recorder, SceneKind};
use kurbo::Size;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> Result<(), Box<dyn Error>> {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return Ok(());
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("preview") => preview(&args[1..]),
        Some("serve") | None => serve(),
        Some(other) => {
            Err(format!("unknown command `{other}` (expected `serve` or `preview`)").into())
        }
    }
}

fn serve() -> Result<(), Box<dyn Error>> {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => return Err("wasm-pack finished with errors".into()),
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the bundle may be stale.");
        }
    }

    println!("Launching local server at http://127.0.0.1:8000 …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    loop {
        if let Some(status) = server.try_wait()? {
            return Err(format!("http server exited with {status}").into());
        }
        thread::sleep(Duration::from_secs(1));
    }
}

/// Counts frame requests; the preview loop drives frames itself.
#[derive(Default)]
struct Ticker {
    requested: usize,
}

impl FrameHost for Ticker {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

fn preview(args: &[String]) -> Result<(), Box<dyn Error>> {
    let kind: SceneKind = args.first().map(String::as_str).unwrap_or("hero").parse()?;
    let frames: u32 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(120);
    let size = match args.get(2) {
        Some(dims) => parse_size(dims)?,
        None => Size::new(1280.0, 720.0),
    };

    let config = EngineConfig {
        seed: Some(0x5eed),
        ..EngineConfig::default()
    };
    let mut animation = Animation::new(kind, size, &config, 0, false)?;
    let mut host = Ticker::default();
    let mut surface = Recorder::new();
    animation.start(&mut host);

    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    for f in 1..=frames {
        animation.on_frame(f as f64 * FRAME_MS, ColorMode::Dark, &mut surface, &mut host);
        for cmd in surface.take() {
            *tally.entry(command_name(&cmd)).or_default() += 1;
        }
    }

    println!(
        "{kind} scene, {}x{}, {} frames, {} entities",
        size.width,
        size.height,
        animation.frames(),
        animation.scene().population()
    );
    for (name, count) in tally {
        println!("  {name:<12} {:>8.1}/frame", count as f64 / frames.max(1) as f64);
    }
    Ok(())
}

fn parse_size(dims: &str) -> Result<Size, Box<dyn Error>> {
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{dims}`"))?;
    Ok(Size::new(w.parse()?, h.parse()?))
}

fn command_name(cmd: &Draw) -> &'static str {
    match cmd {
        Draw::Clear => "clear",
        Draw::FillRect(..) => "fill_rect",
        Draw::StrokeRect(..) => "stroke_rect",
        Draw::FillCircle { .. } => "fill_circle",
        Draw::Glow { .. } => "glow",
        Draw::Line { .. } => "line",
        Draw::Polyline(..) => "polyline",
        Draw::StrokeOval(..) => "stroke_oval",
        Draw::FillOval(..) => "fill_oval",
        Draw::Arc { .. } => "arc",
        Draw::FillPolygon(..) => "fill_polygon",
        Draw::Text(_) => "text",
    }
}
