use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    extern crate imagemagic;

    rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::ring::default_provider().into(),
    )
    .map_err(|_| anyhow::anyhow!("failed to set crypto provider"))?;

    imagemagic::desktop_main(imagemagic::cli::Args::parse()).await
}
