pub mod notifications;

pub use notifications::*;

pub fn handlers() -> impl Fn(tauri::ipc::Invoke<tauri::Wry>) -> bool + Send + Sync + 'static {
    tauri::generate_handler![notifications::show_native_notification]
}
