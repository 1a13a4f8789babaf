//! WKWebView website data store access.

use std::cell::Cell;

use block2::RcBlock;
use objc2_foundation::{NSDate, NSSet, NSString};
use objc2_web_kit::{
    WKWebView, WKWebsiteDataStore, WKWebsiteDataTypeDiskCache, WKWebsiteDataTypeMemoryCache,
};
use sekai_core::Result;
use tauri::WebviewWindow;

use super::completion::completion;
use super::session_store::ClearScope;

/// Clears the website data selected by `scope` from the view's data store
/// and waits for WebKit to report completion.
pub async fn clear_website_data(window: &WebviewWindow, scope: ClearScope) -> Result<()> {
    let (done, pending) = completion("website data clear");

    window
        .with_webview(move |platform| {
            // SAFETY: the platform handle is the live WKWebView of this window
            // and this closure runs on the main thread.
            let view: &WKWebView = unsafe { &*platform.inner().cast() };
            unsafe {
                let store = view.configuration().websiteDataStore();
                let types = match scope {
                    ClearScope::Cache => NSSet::<NSString>::from_slice(&[
                        WKWebsiteDataTypeDiskCache,
                        WKWebsiteDataTypeMemoryCache,
                    ]),
                    ClearScope::Everything => WKWebsiteDataStore::allWebsiteDataTypes(),
                };

                let done = Cell::new(Some(done));
                let handler = RcBlock::new(move || {
                    if let Some(done) = done.take() {
                        done.succeed();
                    }
                });
                store.removeDataOfTypes_modifiedSince_completionHandler(
                    &types,
                    &NSDate::distantPast(),
                    &handler,
                );
            }
        })
        .map_err(|e| super::host_error("website data clear", e))?;

    pending.wait().await
}
