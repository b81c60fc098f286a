//! Library side of the `xtal-merge` command: logging setup and the
//! load → ingest → merge pipeline.

pub mod logging;
pub mod pipeline;
