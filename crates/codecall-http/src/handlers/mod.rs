//! Provider webhook handlers.
//!
//! No state crosses from `/voice` to `/gather`; the provider correlates the
//! two requests with the call it placed.

mod gather;
mod voice;

pub use gather::handle_gather;
pub use voice::handle_voice;
