fn main() {
    // Remote pages may only reach the commands listed here. The capability
    // granting them is added at runtime for the configured origin.
    let attributes = tauri_build::Attributes::new().app_manifest(
        tauri_build::AppManifest::new().commands(&["show_native_notification"]),
    );
    tauri_build::try_build(attributes).expect("failed to run tauri-build");
}
