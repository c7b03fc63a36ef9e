//! Pulse terminal client

use crate::util::ResultExt;

mod cmd;
mod term;
mod util;

#[tokio::main]
async fn main() {
    cmd::run().await.unwrap_or_exit();
}
