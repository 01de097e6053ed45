//! # AR Paint
//!
//! Paint on a white canvas with a colored marker held in front of a webcam,
//! or with the mouse.
//!
//! Each frame is thresholded against a calibrated RGB range, the largest
//! 4-connected blob is kept, and its centroid drives the brush. A
//! [`session::PaintSession`] owns the canvas and turns keyboard commands and
//! pointer positions into freehand strokes, rectangles and circles.
//!
//! ```rust,no_run
//! use ar_paint::{calibration::ColorRange, session::{PaintSession, SessionConfig}, vision};
//! use std::path::Path;
//!
//! let range = ColorRange::load(Path::new("limits.json"))?;
//! let frame = image::open("frame.png")?.to_rgb8();
//! let (_raw, tracking) = vision::track(&frame, &range);
//!
//! let mut session = PaintSession::new(frame.width(), frame.height(), SessionConfig::default());
//! session.tick(None, tracking.blob.map(|b| b.centroid));
//! session.canvas().export(Path::new("drawing.png"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calibration;
pub mod camera;
pub mod canvas;
pub mod draw;
pub mod error;
pub mod pointer;
pub mod session;
pub mod shape;
pub mod stroke;
pub mod types;
pub mod vision;

pub use error::{Error, Result};
