//! Interactive terminal screens.
//!
//! - `program`: the event loop every screen runs on
//! - `loader`: spinner shown while work is in flight
//! - `fetch`: one asynchronous operation behind a spinner, optionally polled
//! - `form`: free text or single choice for one field
//! - `pipeline`: ordered resolution of the fields a command needs
//! - `detail`: live view of an asset and its operations

pub mod detail;
pub mod fetch;
pub mod form;
pub mod loader;
pub mod pipeline;
pub mod program;
pub mod styles;
