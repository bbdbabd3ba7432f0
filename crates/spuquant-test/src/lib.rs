//! spuquant-test - Regression test framework for the spuquant workspace
//!
//! Every integration test drives a [`RegParams`], which numbers each check,
//! records failures instead of panicking on the first one, and reports them
//! all from [`RegParams::cleanup`].
//!
//! # Usage
//!
//! ```ignore
//! use spuquant_test::RegParams;
//!
//! let mut rp = RegParams::new("quantize");
//! rp.compare_values(4.0, hist.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: `compare` (default) or `display`; display mode also
//!   writes regression outputs under `tests/regout/`
//! - `RUST_LOG`: tracing filter for library events (default `warn`)

mod error;
pub mod images;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Install a tracing subscriber for the test process, once.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // spuquant-test is at crates/spuquant-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
