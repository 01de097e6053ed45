// Color segmenter: pick the RGB range of your marker and write it to a JSON file.
// What you SEE:
// • Camera – live mirrored feed with the six bounds listed on top (">" marks the selected one).
// • Mask   – pixels inside the current range in white.
// Keys: 1..6 select R min, R max, G min, G max, B min, B max;
//       Up/Right +1, Down/Left -1, PageUp +10, PageDown -10;
//       w save and exit, q/Esc exit without saving.

use ar_paint::calibration::{Bound, Calibrator};
use ar_paint::camera::CameraCapture;
use ar_paint::draw::{draw_text_5x7, Drawer};
use ar_paint::error::Error;
use ar_paint::types::FrameBuffer;
use ar_paint::vision;
use clap::Parser;
use minifb::Key;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Define the color limits of the painting marker
#[derive(Parser, Debug)]
#[command(name = "color-segmenter", version, about, long_about = None)]
struct Args {
    /// Where to write the limits
    #[arg(short, long, default_value = "limits.json")]
    output: PathBuf,

    /// Camera index
    #[arg(long, default_value_t = 0)]
    camera: u32,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,
}

/// Consecutive failed grabs before giving up on the camera.
const MAX_FAILED_FRAMES: u32 = 30;

const SELECT_KEYS: [Key; 6] = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6];
const STEP_KEYS: [(Key, i32); 6] = [
    (Key::Up, 1),
    (Key::Right, 1),
    (Key::Down, -1),
    (Key::Left, -1),
    (Key::PageUp, 10),
    (Key::PageDown, -10),
];

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let args = Args::parse();

    // Calibration means nothing without a camera, so here the device is required.
    let mut cam = CameraCapture::new(args.camera, args.width, args.height, true)?;
    let (w, h) = cam.resolution();
    let (wu, hu) = (w as usize, h as usize);

    let mut camera_win = Drawer::new("Camera", wu, hu, (0, 0))?;
    let mut mask_win = Drawer::new("Mask", wu, hu, (wu as isize, 0))?;

    let mut cal = Calibrator::default();
    let mut failed_frames = 0u32;
    info!("color segmenter is on: 1..6 select a bound, arrows adjust, w save and exit, q exit without saving");

    while camera_win.is_open() && mask_win.is_open() {
        let frame = match cam.next_frame() {
            Ok(f) => {
                failed_frames = 0;
                f
            }
            Err(e) if failed_frames < MAX_FAILED_FRAMES => {
                failed_frames += 1;
                warn!(error = %e, "frame skipped");
                continue;
            }
            Err(e) => return Err(e),
        };

        /* Inputs (both windows take keys) */
        let wins = [&camera_win, &mask_win];
        let pressed = |k: Key| wins.iter().any(|d| d.key_pressed_once(k));
        if pressed(Key::Q) || wins.iter().any(|d| d.esc_pressed()) {
            info!("exiting without saving");
            break;
        }
        if pressed(Key::W) {
            let range = cal.range();
            range.save(&args.output)?;
            info!(path = %args.output.display(), ?range, "limits saved");
            break;
        }
        if let Some(i) = SELECT_KEYS.iter().position(|k| pressed(*k)) {
            cal.select(i);
        }
        for (k, delta) in STEP_KEYS {
            if wins.iter().any(|d| d.key_pressed_repeat(k)) {
                cal.adjust(delta);
            }
        }

        /* Views */
        let mask = vision::in_range(&frame, &cal.range());
        let mut screen = FrameBuffer::from_rgb(&frame);
        draw_hud(&mut screen, &cal);
        camera_win.present(&screen)?;
        mask_win.present(&FrameBuffer::from_mask(&mask))?;
    }

    Ok(())
}

/// Six lines, one per bound, the selected one marked with ">".
fn draw_hud(screen: &mut FrameBuffer, cal: &Calibrator) {
    let range = cal.range();
    for (i, bound) in Bound::ALL.iter().enumerate() {
        let value = range.value(*bound);
        let marker = if *bound == cal.selected() { ">" } else { " " };
        let line = format!("{marker}{} {} {value}", i + 1, bound.label());
        draw_text_5x7(screen, 8, 8 + 10 * i as i32, &line, 0x00_FF_FF_FF);
    }
}
