//! # Glimpse CDP Driver
//!
//! [`PageDriver`](glimpse_protocols::PageDriver) backend that talks to
//! Chrome/Chromium over the DevTools Protocol.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Attach a driver to a page:
//!    ```rust,ignore
//!    let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//!    let page = client.new_page().await?;
//!    page.navigate("https://example.com", Duration::from_secs(30)).await?;
//!    let driver = CdpPageDriver::new(page);
//!    ```
//!
//! Element handles are integers assigned by a small registry the driver
//! installs in the page (`window.__glimpse`). They stay stable until the
//! document is replaced.

pub mod cdp;
mod driver;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use driver::CdpPageDriver;
