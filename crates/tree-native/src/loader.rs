//! Background photo decoding.
//!
//! Requests go to a single worker thread; results are drained once per frame
//! with [`ImageLoader::poll`] and never block the render loop.

use anyhow::{bail, Context};
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tree_core::{ImageSource, LoadTicket};

const MAX_TEXTURE_EDGE: u32 = 2048; // larger photos are downscaled before upload

/// Decoded RGBA8 pixels, row-major, no padding.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub struct LoadResult {
    pub ticket: LoadTicket,
    pub image: anyhow::Result<LoadedImage>,
}

pub struct ImageLoader {
    requests: Option<Sender<LoadTicket>>,
    results: Receiver<LoadResult>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ImageLoader {
    pub fn spawn() -> anyhow::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<LoadTicket>();
        let (res_tx, res_rx) = mpsc::channel::<LoadResult>();
        let worker = thread::Builder::new()
            .name("photo-loader".into())
            .spawn(move || {
                for ticket in req_rx {
                    let image = load(&ticket.source);
                    if res_tx.send(LoadResult { ticket, image }).is_err() {
                        break;
                    }
                }
                log::debug!("[loader] worker exiting");
            })
            .context("spawning photo loader thread")?;
        Ok(Self {
            requests: Some(req_tx),
            results: res_rx,
            worker: Some(worker),
        })
    }

    pub fn request(&self, ticket: LoadTicket) {
        log::debug!("[loader] queued panel {} <- {}", ticket.panel, ticket.source);
        let sent = self
            .requests
            .as_ref()
            .map(|tx| tx.send(ticket).is_ok())
            .unwrap_or(false);
        if !sent {
            log::warn!("[loader] worker is gone, dropping request");
        }
    }

    /// Every result finished since the last call.
    pub fn poll(&self) -> Vec<LoadResult> {
        let mut out = Vec::new();
        loop {
            match self.results.try_recv() {
                Ok(r) => out.push(r),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("[loader] worker disconnected");
                    break;
                }
            }
        }
        out
    }
}

impl Drop for ImageLoader {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn load(source: &ImageSource) -> anyhow::Result<LoadedImage> {
    match source {
        ImageSource::Path(path) => decode_file(path),
        ImageSource::Data(url) => decode_data_url(url),
        ImageSource::Url(url) => bail!("remote images are not fetched: {url}"),
    }
}

fn decode_file(path: &Path) -> anyhow::Result<LoadedImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    let loaded = into_loaded(img);
    log::info!(
        "[loader] decoded {} ({}x{})",
        path.display(),
        loaded.width,
        loaded.height
    );
    Ok(loaded)
}

/// `data:[<mime>][;base64],<payload>`; only base64 payloads carry binary images.
fn decode_data_url(url: &str) -> anyhow::Result<LoadedImage> {
    let rest = url.get(5..).context("data URL too short")?;
    let (header, payload) = rest
        .split_once(',')
        .context("data URL has no ',' before the payload")?;
    if !header
        .split(';')
        .any(|p| p.trim().eq_ignore_ascii_case("base64"))
    {
        bail!("data URL is not base64 encoded ({header})");
    }
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .context("decoding base64 payload")?;
    let img = image::load_from_memory(&bytes).context("decoding inline image")?;
    let loaded = into_loaded(img);
    log::info!(
        "[loader] decoded inline {} image ({}x{})",
        if header.is_empty() { "untyped" } else { header },
        loaded.width,
        loaded.height
    );
    Ok(loaded)
}

fn into_loaded(img: DynamicImage) -> LoadedImage {
    let img = if img.width() > MAX_TEXTURE_EDGE || img.height() > MAX_TEXTURE_EDGE {
        img.thumbnail(MAX_TEXTURE_EDGE, MAX_TEXTURE_EDGE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    LoadedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instant::Instant;
    use std::path::PathBuf;
    use std::time::Duration;

    // 1x1 RGBA pixel (200, 30, 40, 255)
    const RED_PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGM4IafxHwAEzgIOvZGGtQAAAABJRU5ErkJggg==";

    fn wait_for(loader: &ImageLoader, n: usize) -> Vec<LoadResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut got = Vec::new();
        while got.len() < n && Instant::now() < deadline {
            got.extend(loader.poll());
            thread::sleep(Duration::from_millis(5));
        }
        got
    }

    #[test]
    fn urls_fail_without_blocking() {
        let loader = ImageLoader::spawn().expect("spawn");
        loader.request(LoadTicket {
            panel: 0,
            generation: 3,
            source: ImageSource::parse("https://example.com/a.jpg"),
        });
        let results = wait_for(&loader, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ticket.generation, 3);
        assert!(results[0].image.is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let loader = ImageLoader::spawn().expect("spawn");
        loader.request(LoadTicket {
            panel: 2,
            generation: 1,
            source: ImageSource::Path(PathBuf::from("/definitely/not/here.png")),
        });
        let results = wait_for(&loader, 1);
        assert!(results[0].image.is_err());
    }

    #[test]
    fn decodes_png_from_disk() {
        let path = std::env::temp_dir().join(format!("lumiere-loader-{}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        img.save(&path).expect("write png");

        let loader = ImageLoader::spawn().expect("spawn");
        loader.request(LoadTicket {
            panel: 1,
            generation: 1,
            source: ImageSource::Path(path.clone()),
        });
        let results = wait_for(&loader, 1);
        let _ = std::fs::remove_file(&path);
        let image = results[0].image.as_ref().expect("decoded");
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.rgba.len(), 4 * 3 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decodes_inline_data_url() {
        let source = ImageSource::parse(RED_PIXEL_PNG);
        assert!(matches!(source, ImageSource::Data(_)));
        let image = load(&source).expect("decoded");
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.rgba, vec![200, 30, 40, 255]);
    }

    #[test]
    fn data_url_goes_through_the_worker() {
        let loader = ImageLoader::spawn().expect("spawn");
        loader.request(LoadTicket {
            panel: 0,
            generation: 2,
            source: ImageSource::parse(RED_PIXEL_PNG),
        });
        let results = wait_for(&loader, 1);
        assert_eq!(results.len(), 1);
        assert!(results[0].image.is_ok());
    }

    #[test]
    fn malformed_data_urls_fail() {
        for bad in [
            "data:image/png;base64",
            "data:text/plain,hello",
            "data:image/png;base64,!!!not-base64!!!",
            "data:image/png;base64,aGVsbG8=",
        ] {
            assert!(load(&ImageSource::parse(bad)).is_err(), "{bad} should fail");
        }
    }
}
