//! orgiam CLI
//!

#![deny(missing_docs)]

use anyhow::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    orgiam_lib::cli().await
}
