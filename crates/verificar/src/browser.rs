//! Browser session control via the Chrome DevTools Protocol.
//!
//! The browser/page session is the one resource with a scoped lifecycle: it
//! is acquired before the workflow starts and must be released on every exit
//! path, success or failure, so repeated runs never leak a browser process.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::{
    GetDocumentParams, QuerySelectorParams, SetFileInputFilesParams,
};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as InnerPage;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::driver::{MouseAction, UiDriver};
use crate::result::{VerifyError, VerifyResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// A launched browser instance
#[derive(Debug)]
pub struct Browser {
    config: BrowserConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a new browser instance
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched
    pub async fn launch(config: BrowserConfig) -> VerifyResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| VerifyError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| VerifyError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP message stream for the lifetime of the session
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a new page
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be created
    pub async fn page(&self) -> VerifyResult<CdpPage> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| VerifyError::Page {
                message: e.to_string(),
            })?;

        Ok(CdpPage {
            inner: Arc::new(Mutex::new(page)),
        })
    }

    /// Get the browser configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the browser, releasing the session
    pub async fn close(self) -> VerifyResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| VerifyError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// A live browser page implementing [`UiDriver`] over CDP.
#[derive(Debug, Clone)]
pub struct CdpPage {
    inner: Arc<Mutex<InnerPage>>,
}

impl CdpPage {
    async fn dispatch_mouse(
        &self,
        kind: DispatchMouseEventType,
        x: f64,
        y: f64,
    ) -> VerifyResult<()> {
        let page = self.inner.lock().await;
        let params = DispatchMouseEventParams::builder()
            .r#type(kind)
            .x(x)
            .y(y)
            .button(MouseButton::Left)
            .click_count(1)
            .build()
            .map_err(|e| VerifyError::Input {
                message: e.to_string(),
            })?;
        page.execute(params).await.map_err(|e| VerifyError::Input {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl UiDriver for CdpPage {
    async fn goto(&self, url: &str) -> VerifyResult<()> {
        let page = self.inner.lock().await;
        page.goto(url).await.map_err(|e| VerifyError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn evaluate(&self, js: &str) -> VerifyResult<Value> {
        let page = self.inner.lock().await;
        let result = page.evaluate(js).await.map_err(|e| VerifyError::Evaluate {
            message: e.to_string(),
        })?;
        // Statements without a value (undefined) come back as Null
        Ok(result.into_value().unwrap_or(Value::Null))
    }

    async fn add_init_script(&self, source: &str) -> VerifyResult<()> {
        let page = self.inner.lock().await;
        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source(source)
            .build()
            .map_err(|e| VerifyError::Page { message: e })?;
        page.execute(params).await.map_err(|e| VerifyError::Page {
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn set_file_input(&self, selector: &str, path: &Path) -> VerifyResult<()> {
        let page = self.inner.lock().await;
        let doc = page
            .execute(GetDocumentParams::default())
            .await
            .map_err(|e| VerifyError::Input {
                message: e.to_string(),
            })?;

        let query = QuerySelectorParams::builder()
            .node_id(doc.root.node_id.clone())
            .selector(selector)
            .build()
            .map_err(|e| VerifyError::Input { message: e })?;
        let node = page
            .execute(query)
            .await
            .map_err(|e| VerifyError::Input {
                message: format!("file input '{selector}' not found: {e}"),
            })?;

        let params = SetFileInputFilesParams::builder()
            .files(vec![path.to_string_lossy().into_owned()])
            .node_id(node.node_id.clone())
            .build()
            .map_err(|e| VerifyError::Input { message: e })?;
        page.execute(params).await.map_err(|e| VerifyError::Input {
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn mouse(&self, action: MouseAction, x: f64, y: f64) -> VerifyResult<()> {
        let kind = match action {
            MouseAction::Press => DispatchMouseEventType::MousePressed,
            MouseAction::Move => DispatchMouseEventType::MouseMoved,
            MouseAction::Release => DispatchMouseEventType::MouseReleased,
        };
        self.dispatch_mouse(kind, x, y).await
    }

    async fn screenshot(&self) -> VerifyResult<Vec<u8>> {
        let page = self.inner.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| VerifyError::Screenshot {
                message: e.to_string(),
            })?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| VerifyError::Screenshot {
                message: e.to_string(),
            })
    }
}
