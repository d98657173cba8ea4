use gattpoll::PollerBuilder;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), gattpoll::Error> {
    env_logger::init();

    // Ctrl-C flips the watch channel; the poll loop checks it each
    // iteration and exits cleanly instead of dying mid-read.
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });

    let mut poller = PollerBuilder::new().build()?;

    poller.open().await?;
    println!("Connected");

    let result = poller.run(rx).await;

    poller.close().await?;
    result
}
