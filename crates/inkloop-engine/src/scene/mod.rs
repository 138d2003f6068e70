//! Recorded drawing commands.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands in call order
//! - freeze a recording into an immutable, thread-shareable [`Picture`]
//! - keep shape payloads isolated per shape file under `scene::shapes`

mod cmd;
mod list;
mod picture;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use picture::{Picture, PictureRecorder};
pub use shapes::{Border, CircleCmd, RectCmd, RoundedRectCmd, TextCmd};
