//! Headless Chrome/Chromium renderer.
//!
//! The browser process is the one expensive, stateful resource in the crate. [`BrowserHandle`]
//! launches it on first use, keeps it for later conversions and releases it on `close`.

use crate::{
    convert::{
        backend::{RasterBackend, RasterImage, UnavailableReason},
        options::ConversionRequest,
    },
    foundation::error::SpriteResult,
};

/// Minimal HTML page that hosts the markup at exactly `width x height` CSS pixels.
pub fn host_document(svg: &str, width: u32, height: u32) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>\
         html,body{{margin:0;padding:0;background:transparent;overflow:hidden;}}\
         body>svg{{display:block;width:{width}px;height:{height}px;}}\
         </style></head><body>{svg}</body></html>"
    )
}

pub struct ChromeBackend {
    request: ConversionRequest,
    handle: BrowserHandle,
}

impl ChromeBackend {
    pub fn new(request: ConversionRequest) -> Self {
        Self {
            request,
            handle: BrowserHandle::default(),
        }
    }

    /// Whether a browser process is currently held.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }
}

impl RasterBackend for ChromeBackend {
    fn display_name(&self) -> &'static str {
        "Chrome (headless)"
    }

    fn description(&self) -> &'static str {
        "Headless Chrome/Chromium via the DevTools protocol. Browser-accurate rendering; \
         requires a local Chrome or Chromium."
    }

    fn request(&self) -> &ConversionRequest {
        &self.request
    }

    fn check_availability(&self) -> Result<(), UnavailableReason> {
        imp::check_availability()
    }

    fn convert_to_image(&mut self, svg: &[u8]) -> SpriteResult<RasterImage> {
        let (w, h) = self.target_size(svg)?;
        let html = host_document(&String::from_utf8_lossy(svg), w, h);
        self.handle.render(&html, w, h)
    }

    fn close(&mut self) -> SpriteResult<()> {
        self.handle.close();
        Ok(())
    }
}

impl Drop for ChromeBackend {
    fn drop(&mut self) {
        self.handle.close();
    }
}

pub use imp::BrowserHandle;

#[cfg(feature = "browser")]
mod imp {
    use base64::Engine as _;
    use headless_chrome::{
        Browser, LaunchOptions,
        protocol::cdp::{
            DOM, Emulation,
            Page::{CaptureScreenshotFormatOption, Viewport},
        },
        types::Bounds,
    };

    use crate::{
        convert::backend::{RasterImage, UnavailableReason, decode_raster},
        foundation::error::{SpriteError, SpriteResult},
    };

    pub(super) fn check_availability() -> Result<(), UnavailableReason> {
        headless_chrome::browser::default_executable()
            .map(|_| ())
            .map_err(|e| {
                UnavailableReason::new(format!("no Chrome/Chromium executable found: {e}"))
            })
    }

    /// Lazily launched browser shared across conversions.
    #[derive(Default)]
    pub struct BrowserHandle {
        browser: Option<Browser>,
    }

    impl BrowserHandle {
        pub fn is_open(&self) -> bool {
            self.browser.is_some()
        }

        fn browser(&mut self) -> SpriteResult<&Browser> {
            if self.browser.is_none() {
                tracing::debug!("launching headless browser");
                let opts = LaunchOptions::default_builder()
                    .headless(true)
                    .sandbox(false)
                    .window_size(Some((1024, 1024)))
                    .build()
                    .map_err(|e| SpriteError::conversion(format!("browser launch options: {e}")))?;
                let browser = Browser::new(opts)
                    .map_err(|e| {
                        SpriteError::conversion(format!("failed to launch browser: {e}"))
                    })?;
                self.browser = Some(browser);
            }
            self.browser
                .as_ref()
                .ok_or_else(|| SpriteError::conversion("browser handle is closed"))
        }

        /// Load `html` in a fresh tab and capture the top-left `width x height` region.
        pub fn render(&mut self, html: &str, width: u32, height: u32) -> SpriteResult<RasterImage> {
            let url = format!(
                "data:text/html;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(html)
            );
            let browser = self.browser()?;

            let result = (|| -> anyhow::Result<Vec<u8>> {
                let tab = browser.new_tab()?;
                let shot = (|| -> anyhow::Result<Vec<u8>> {
                    tab.set_bounds(Bounds::Normal {
                        left: Some(0),
                        top: Some(0),
                        width: Some(f64::from(width)),
                        height: Some(f64::from(height)),
                    })?;
                    tab.call_method(Emulation::SetDefaultBackgroundColorOverride {
                        color: Some(DOM::RGBA {
                            r: 0,
                            g: 0,
                            b: 0,
                            a: Some(0.0),
                        }),
                    })?;
                    tab.navigate_to(&url)?.wait_until_navigated()?;
                    tab.capture_screenshot(
                        CaptureScreenshotFormatOption::Png,
                        None,
                        Some(Viewport {
                            x: 0.0,
                            y: 0.0,
                            width: f64::from(width),
                            height: f64::from(height),
                            scale: 1.0,
                        }),
                        true,
                    )
                })();
                if let Err(e) = tab.close(true) {
                    tracing::debug!(error = %e, "failed to close browser tab");
                }
                shot
            })();

            let png =
                result.map_err(|e| SpriteError::conversion(format!("browser render: {e:#}")))?;
            let image = decode_raster(&png)?;
            if image.dimensions() != (width, height) {
                // Device scale can differ from 1.0; normalize to the requested size.
                return crate::image_ops::resize_nearest(&image, width, height);
            }
            Ok(image)
        }

        /// Drop the browser process. Safe to call repeatedly.
        pub fn close(&mut self) {
            if self.browser.take().is_some() {
                tracing::debug!("closed headless browser");
            }
        }
    }
}

#[cfg(not(feature = "browser"))]
mod imp {
    use crate::{
        convert::backend::{RasterImage, UnavailableReason},
        foundation::error::{SpriteError, SpriteResult},
    };

    pub(super) fn check_availability() -> Result<(), UnavailableReason> {
        Err(UnavailableReason::new(
            "built without the `browser` feature",
        ))
    }

    #[derive(Default)]
    pub struct BrowserHandle;

    impl BrowserHandle {
        pub fn is_open(&self) -> bool {
            false
        }

        pub fn render(
            &mut self,
            _html: &str,
            _width: u32,
            _height: u32,
        ) -> SpriteResult<RasterImage> {
            Err(SpriteError::UnavailableBackend {
                backend: "chrome".to_string(),
                reason: "built without the `browser` feature".to_string(),
            })
        }

        pub fn close(&mut self) {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/browser.rs"]
mod tests;
