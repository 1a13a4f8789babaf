//! Script installed into the main page before any page script runs.
//!
//! It exposes a frozen `window.__sekaiBridge` object with exactly two
//! members (`notify` and `dispatchClick`) and replaces the page's
//! `Notification` constructor with one that routes through it.

use sekai_core::{NotificationId, ViewerConfig};
use serde::Serialize;

const PAGE_BRIDGE: &str = include_str!("../bridge/page_bridge.js");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BridgeOptions {
    smooth_scroll: bool,
}

/// Builds the initialization script for `config`.
pub fn initialization_script(config: &ViewerConfig) -> String {
    let options = BridgeOptions {
        smooth_scroll: config.smooth_scroll,
    };
    let options = serde_json::to_string(&options).unwrap_or_else(|_| "{}".to_string());
    format!("{}({});", PAGE_BRIDGE.trim_end(), options)
}

/// Script that delivers a notification click to the page.
pub fn click_script(id: NotificationId) -> String {
    format!(
        "window.__sekaiBridge && window.__sekaiBridge.dispatchClick({});",
        id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use boa_engine::{Context, Source};

    /// Minimal browser surface the bridge touches. `__engine` keeps the
    /// engine's own `Notification` reachable after the bridge replaces it.
    const PAGE_ENV: &str = r#"
globalThis.window = globalThis;
globalThis.top = globalThis;
globalThis.console = { error: function () {}, warn: function () {} };
globalThis.queueMicrotask = function (fn) { Promise.resolve().then(fn); };
globalThis.Event = class { constructor(type) { this.type = type; } };
globalThis.EventTarget = class {
  constructor() { this._listeners = {}; }
  addEventListener(type, fn) { (this._listeners[type] = this._listeners[type] || []).push(fn); }
  dispatchEvent(event) {
    (this._listeners[event.type] || []).forEach((fn) => fn.call(this, event));
    return true;
  }
};
globalThis.document = {
  readyState: 'complete',
  styles: [],
  head: { appendChild: function (node) { document.styles.push(node.textContent); } },
  createElement: function () { return { textContent: '' }; },
  addEventListener: function () {}
};
globalThis.__log = [];
globalThis.__invoked = [];
globalThis.__requested = 0;
globalThis.__notifyResult = 1;
globalThis.__engine = function Notification() {};
__engine.permission = 'granted';
__engine.requestPermission = function () {
  __requested += 1;
  return Promise.resolve(__engine.permission);
};
globalThis.Notification = __engine;
globalThis.__TAURI_INTERNALS__ = {
  invoke: function (command, args) {
    __invoked.push(command);
    return Promise.resolve(__notifyResult);
  }
};
"#;

    struct Page {
        context: Context,
    }

    impl Page {
        fn load(config: &ViewerConfig) -> Self {
            let mut page = Self {
                context: Context::default(),
            };
            page.run(PAGE_ENV);
            page.run(&initialization_script(config));
            page
        }

        fn run(&mut self, script: &str) {
            self.context.eval(Source::from_bytes(script)).unwrap();
            self.context.run_jobs();
        }

        fn read(&mut self, expression: &str) -> String {
            let value = self.context.eval(Source::from_bytes(expression)).unwrap();
            value
                .to_string(&mut self.context)
                .unwrap()
                .to_std_string_escaped()
        }
    }

    #[test]
    fn test_script_is_invoked_with_options() {
        let script = initialization_script(&ViewerConfig::default());
        assert!(script.contains("__sekaiBridge"));
        assert!(script.ends_with("({\"smoothScroll\":true});"));

        let config = ViewerConfig {
            smooth_scroll: false,
            ..ViewerConfig::default()
        };
        assert!(initialization_script(&config).ends_with("({\"smoothScroll\":false});"));
    }

    #[test]
    fn test_bridge_only_invokes_notification_command() {
        let invoked: Vec<&str> = PAGE_BRIDGE
            .match_indices("invoke('")
            .map(|(i, _)| {
                let rest = &PAGE_BRIDGE[i + "invoke('".len()..];
                &rest[..rest.find('\'').unwrap()]
            })
            .collect();
        assert_eq!(invoked, vec!["show_native_notification"]);
    }

    #[test]
    fn test_permission_passes_through_to_engine() {
        let mut page = Page::load(&ViewerConfig::default());
        assert_eq!(page.read("Notification === __engine"), "false");
        assert_eq!(page.read("Notification.permission"), "granted");

        page.run(
            "__engine.permission = 'denied';
             Notification.requestPermission().then((p) => __log.push('requested:' + p));",
        );
        assert_eq!(page.read("Notification.permission"), "denied");
        assert_eq!(page.read("__requested"), "1");
        assert_eq!(page.read("__log.join()"), "requested:denied");
    }

    #[test]
    fn test_null_result_fires_error_instead_of_show() {
        let mut page = Page::load(&ViewerConfig::default());
        page.run(
            "__notifyResult = null;
             var n = new Notification('Live', { body: 'starting' });
             n.onerror = () => __log.push('onerror');
             n.addEventListener('error', () => __log.push('error'));
             n.addEventListener('show', () => __log.push('show'));",
        );
        assert_eq!(page.read("__invoked.join()"), "show_native_notification");
        assert_eq!(page.read("__log.join()"), "onerror,error");
    }

    #[test]
    fn test_denied_permission_never_reaches_host() {
        let mut page = Page::load(&ViewerConfig::default());
        page.run(
            "__engine.permission = 'default';
             var n = new Notification('Live');
             n.addEventListener('error', () => __log.push('error'));",
        );
        assert_eq!(page.read("__invoked.length"), "0");
        assert_eq!(page.read("__log.join()"), "error");
    }

    #[test]
    fn test_click_reaches_the_shown_notification() {
        let mut page = Page::load(&ViewerConfig::default());
        page.run(
            "__notifyResult = 7;
             var n = new Notification('Event', { silent: true });
             n.addEventListener('show', () => __log.push('show'));
             n.onclick = () => __log.push('click');",
        );
        page.run(&click_script(8));
        page.run(&click_script(7));
        assert_eq!(page.read("__log.join()"), "show,click");

        page.run("n.close();");
        page.run(&click_script(7));
        assert_eq!(page.read("__log.join()"), "show,click");
    }

    #[test]
    fn test_bridge_object_is_frozen() {
        let mut page = Page::load(&ViewerConfig::default());
        page.run("window.__sekaiBridge = null; __sekaiBridge.notify = null;");
        assert_eq!(page.read("Object.isFrozen(__sekaiBridge)"), "true");
        assert_eq!(page.read("Object.keys(__sekaiBridge).join()"), "notify,dispatchClick");
        assert_eq!(page.read("typeof __sekaiBridge.notify"), "function");
        assert_eq!(page.read("document.styles.length"), "1");

        let mut plain = Page::load(&ViewerConfig {
            smooth_scroll: false,
            ..ViewerConfig::default()
        });
        assert_eq!(plain.read("document.styles.length"), "0");
    }

    #[test]
    fn test_click_script() {
        assert_eq!(
            click_script(7),
            "window.__sekaiBridge && window.__sekaiBridge.dispatchClick(7);"
        );
    }
}
