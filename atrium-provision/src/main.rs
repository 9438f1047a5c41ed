use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    atrium_provision::init_tracing();

    let response = atrium_provision::run_from(tokio::io::stdin()).await;

    let mut out = serde_json::to_vec(&response).context("encoding function response")?;
    out.push(b'\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&out).await?;
    stdout.flush().await?;
    Ok(())
}
