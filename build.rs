fn main() {
    // Build number shown in the What's New caption and used to key the
    // per-release acknowledgement flag.
    println!("cargo:rerun-if-env-changed=LIMON_BUILD_NUMBER");
    let build = std::env::var("LIMON_BUILD_NUMBER").unwrap_or_else(|_| "1".to_string());
    println!("cargo:rustc-env=LIMON_BUILD={}", build);

    // Only embed Windows icon when building for Windows target on a Windows host
    #[cfg(target_os = "windows")]
    {
        // Check the actual target OS (not host OS) so Android cross builds
        // never pick up Windows resources
        let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
        if target_os == "windows" && std::path::Path::new("resources/limon.ico").exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon("resources/limon.ico");
            if let Err(e) = res.compile() {
                eprintln!("Warning: Failed to embed icon in executable: {}", e);
            }
        }
    }
}
