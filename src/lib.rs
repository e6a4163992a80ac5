pub mod cli;
pub mod engine;
pub mod label;
pub mod server;
pub mod session;
pub mod util;

pub use label::{render_label, LabelError, LabelImage, LabelRenderer, LabelRequest};
pub use server::{Config, ServerError};
pub use session::GameSession;
pub use util::{shuffle, shuffle_with, to_radians};
