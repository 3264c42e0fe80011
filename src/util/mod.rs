//! Rendering widgets.
//!
//! # Spinner
//!
//! [`Spinner`] cycles through animation frames on each [`tick`](Spinner::tick):
//!
//! ```rust,ignore
//! let mut spinner = Spinner::pulse(); // ⣷ ⣯ ⣟ ...
//! spinner.tick();
//! write!(f, "{} working...", spinner.frame())?;
//!
//! // Other presets:
//! let s = Spinner::dots(); // ⠋ ⠙ ⠹ ...
//! let s = Spinner::line(); // | / - \
//!
//! // Custom frames:
//! let s = Spinner::custom(&["🌑", "🌒", "🌓", "🌔", "🌕"]);
//! ```

mod spinner;

pub use spinner::*;
