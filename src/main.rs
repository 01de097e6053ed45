// AR Paint: paint with a colored marker held in front of the webcam, or with the mouse.
// What you SEE:
// • Canvas   – the drawing (or the drawing on top of the camera with --blend) + status line.
// • Original – mirrored camera, a crosshair follows the tracked marker.
// • Mask     – every pixel inside the calibrated color range.
// • MaxArea  – only the largest blob, in green.
// Keys: r/g/b color, +/- pen size, m mouse, n marker, t toggle, c clear, w save,
//       hold s rectangle, hold o circle, q/Esc quit.

use ar_paint::calibration::ColorRange;
use ar_paint::camera::CameraCapture;
use ar_paint::canvas::{drawing_file_name, Canvas};
use ar_paint::draw::{draw_crosshair, draw_text_5x7, Drawer};
use ar_paint::error::Error;
use ar_paint::session::{Command, PaintSession, SessionConfig, DEFAULT_PEN_SIZE};
use ar_paint::stroke::{ShakeFilter, DEFAULT_SHAKE_THRESHOLD};
use ar_paint::types::{pack_rgb, FrameBuffer, PaintColor, PointerMode};
use ar_paint::vision;
use chrono::Local;
use clap::Parser;
use image::Rgb;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Paint on augmented reality
#[derive(Parser, Debug)]
#[command(name = "ar-paint", version, about, long_about = None)]
struct Args {
    /// Calibration file written by color-segmenter
    #[arg(short, long)]
    json: PathBuf,

    /// Camera index
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Requested capture width (also the canvas width when no camera is found)
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height (also the canvas height when no camera is found)
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Start painting with the marker instead of the mouse
    #[arg(long)]
    marker: bool,

    /// Ignore marker jumps longer than --shake-threshold pixels
    #[arg(long)]
    shake_prevention: bool,

    #[arg(long, default_value_t = DEFAULT_SHAKE_THRESHOLD)]
    shake_threshold: f64,

    /// Show the drawing on top of the camera image
    #[arg(long)]
    blend: bool,

    /// Keep the camera image unmirrored
    #[arg(long)]
    no_mirror: bool,

    /// Directory for saved drawings
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

/// The camera-derived windows; only opened when a camera is available.
struct Views {
    original: Drawer,
    mask: Drawer,
    max_area: Drawer,
}

impl Views {
    fn open(w: usize, h: usize) -> Result<Self, Error> {
        Ok(Self {
            original: Drawer::new("Original", w, h, (w as isize, 0))?,
            mask: Drawer::new("Mask", w, h, (0, h as isize))?,
            max_area: Drawer::new("MaxArea", w, h, (w as isize, h as isize))?,
        })
    }

    fn paint_command(&self) -> Option<Command> {
        [&self.original, &self.mask, &self.max_area]
            .into_iter()
            .find_map(Drawer::paint_command)
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let args = Args::parse();

    /* --- Calibration (fatal when missing or malformed) --- */
    let range = ColorRange::load(&args.json)?;
    info!(path = %args.json.display(), ?range, "calibration loaded");

    /* --- Camera: without one we keep going with mouse painting only --- */
    let mut cam = match CameraCapture::new(args.camera, args.width, args.height, !args.no_mirror) {
        Ok(cam) => Some(cam),
        Err(e) => {
            warn!(error = %e, "camera is off, only mouse painting is available");
            None
        }
    };
    let (w, h) = cam.as_ref().map_or((args.width, args.height), CameraCapture::resolution);
    let (wu, hu) = (w as usize, h as usize);

    /* --- Windows --- */
    let mut canvas_win = Drawer::new("Canvas", wu, hu, (0, 0))?;
    let mut views = if cam.is_some() { Some(Views::open(wu, hu)?) } else { None };

    /* --- Session --- */
    let config = SessionConfig {
        mode: if args.marker { PointerMode::Blob } else { PointerMode::Mouse },
        color: PaintColor::Blue,
        pen_size: DEFAULT_PEN_SIZE,
        shake: args.shake_prevention.then(|| ShakeFilter::new(args.shake_threshold)),
    };
    let mut session = PaintSession::new(w, h, config);
    info!(
        color = session.color().name(),
        size = session.pen_size(),
        mode = session.mode().name(),
        "AR paint ready. r/g/b color | +/- size | m mouse, n marker, t toggle | c clear | w save | hold s rectangle, hold o circle | q quit"
    );

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while canvas_win.is_open() {
        let now = Instant::now();

        /* 1) Grab a frame; a failed grab only costs this tick's tracking. */
        let frame = match cam.as_mut().map(CameraCapture::next_frame) {
            Some(Ok(f)) => Some(f),
            Some(Err(e)) => {
                warn!(error = %e, "frame skipped");
                None
            }
            None => None,
        };

        /* 2) Mask + dominant blob */
        let tracked = frame.as_ref().map(|f| vision::track(f, &range));
        let centroid = tracked.as_ref().and_then(|(_, t)| t.blob.as_ref().map(|b| b.centroid));

        /* 3) Inputs: mouse events first, then one command */
        if let Some(event) = canvas_win.poll_pointer() {
            session.pointer_event(event);
        }
        let command = canvas_win
            .paint_command()
            .or_else(|| views.as_ref().and_then(Views::paint_command));

        /* 4) Advance the session */
        let outcome = session.tick(command, centroid);
        if outcome.save {
            save_drawing(session.canvas(), &args.output_dir);
        }
        if outcome.quit {
            info!("the program closed");
            break;
        }

        /* 5) Canvas view: drawing (optionally over the camera) + status line */
        let mut screen = match (&frame, args.blend) {
            (Some(f), true) => match session.canvas().blend_over(f) {
                Ok(img) => FrameBuffer::from_rgb(&img),
                Err(e) => {
                    warn!(error = %e, "blend skipped");
                    FrameBuffer::from_rgb(session.canvas().image())
                }
            },
            _ => FrameBuffer::from_rgb(session.canvas().image()),
        };
        if session.mode() == PointerMode::Blob {
            if let Some(p) = session.active_point() {
                draw_crosshair(&mut screen, p.x, p.y, 10, 0x00_80_80_80);
            }
        }
        let Rgb([r, g, b]) = session.color().rgb();
        let hud = format!(
            "{} | SIZE {} | {} | {}",
            session.color().name(),
            session.pen_size(),
            session.mode().name(),
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, pack_rgb(r, g, b));
        canvas_win.present(&screen)?;

        /* 6) Camera views */
        if let (Some(v), Some(f), Some((raw, tracking))) = (views.as_mut(), &frame, &tracked) {
            let mut original = FrameBuffer::from_rgb(f);
            if let Some(c) = centroid.map(|c| c.to_point()) {
                draw_crosshair(&mut original, c.x, c.y, 12, 0x00_FF_CC_33);
            }
            if v.original.is_open() {
                v.original.present(&original)?;
            }
            if v.mask.is_open() {
                v.mask.present(&FrameBuffer::from_mask(raw))?;
            }
            if v.max_area.is_open() {
                v.max_area.present(&FrameBuffer::from_mask_green(&tracking.mask))?;
            }
        }

        /* 7) FPS counter (debug log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

/// Export the canvas with a timestamped name; failures are reported, not retried.
fn save_drawing(canvas: &Canvas, dir: &Path) {
    let path = dir.join(drawing_file_name(Local::now().naive_local()));
    match canvas.export(&path) {
        Ok(()) => info!(path = %path.display(), "current image saved"),
        Err(e) => error!(path = %path.display(), error = %e, "could not save the canvas"),
    }
}
