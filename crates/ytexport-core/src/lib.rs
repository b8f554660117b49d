//! ytexport-core: YouTube metadata to FreeTube / Piped / NewPipe export formats

pub mod config;
pub mod error;
pub mod freetube;
pub mod lists;
pub mod mapper;
pub mod newpipe;
pub mod output;
pub mod piped;
pub mod pipeline;
pub mod record;
pub mod stamp;
pub mod text;

pub use config::Config;
pub use error::{ExportError, Result};
