use crate::driver::Driver;
use crate::{CaptureConfig, Error, FullPageScreenshot, Result};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Navigate(String, oneshot::Sender<Result<()>>),
    Prepare(Option<usize>, oneshot::Sender<Result<usize>>),
    Png(oneshot::Sender<Result<Vec<u8>>>),
    Base64(oneshot::Sender<Result<String>>),
    Save(PathBuf, oneshot::Sender<Result<()>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly screenshotter backed by a dedicated worker thread.
///
/// The worker thread owns the driver and the [`FullPageScreenshot`] built over
/// it, so drivers that are not `Send` can still be used from async code.
/// Commands from every clone are executed one at a time, in arrival order.
#[derive(Clone)]
pub struct Screenshotter {
    cmd_tx: Sender<Command>,
}

impl Screenshotter {
    /// Spawn the worker thread and build the driver on it with `make_driver`.
    pub async fn new<D, F>(make_driver: F, config: CaptureConfig) -> Result<Self>
    where
        D: Driver + 'static,
        F: FnOnce() -> Result<D> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let mut shot = match make_driver().and_then(|d| FullPageScreenshot::new(d, config)) {
                Ok(s) => s,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Navigate(url, resp) => {
                        let _ = resp.send(shot.navigate(&url));
                    }
                    Command::Prepare(limit, resp) => {
                        let res = match limit {
                            Some(n) => shot.prepare_document_with_limit(n),
                            None => shot.prepare_document(),
                        };
                        let _ = resp.send(res);
                    }
                    Command::Png(resp) => {
                        let _ = resp.send(shot.screenshot_as_png());
                    }
                    Command::Base64(resp) => {
                        let _ = resp.send(shot.screenshot_as_base64());
                    }
                    Command::Save(path, resp) => {
                        let _ = resp.send(shot.screenshot_as_file(&path));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(shot.close());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    async fn request<T>(&self, what: &str, build: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(tx))
            .map_err(|_| Error::DriverUnavailable(format!("{}: worker has shut down", what)))?;
        rx.await
            .map_err(|e| Error::Other(format!("{} canceled: {}", what, e)))?
    }

    /// Navigate to a URL
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let url = url.to_string();
        self.request("Navigate", |tx| Command::Navigate(url, tx)).await
    }

    /// Scroll through the page to trigger lazy content; `None` uses the
    /// configured ceiling.
    pub async fn prepare_document(&self, max_scrolls: Option<usize>) -> Result<usize> {
        self.request("Prepare", |tx| Command::Prepare(max_scrolls, tx)).await
    }

    /// Full-page PNG bytes
    pub async fn png(&self) -> Result<Vec<u8>> {
        self.request("Png", Command::Png).await
    }

    /// Full-page PNG as base64
    pub async fn base64(&self) -> Result<String> {
        self.request("Base64", Command::Base64).await
    }

    /// Save the full-page PNG to `path`
    pub async fn save(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.request("Save", |tx| Command::Save(path, tx)).await
    }

    /// Shut down the worker and close the session.
    pub async fn close(self) -> Result<()> {
        self.request("Close", Command::Close).await
    }
}
