fn main() {
    // 仅桌面壳需要生成 Tauri 上下文
    #[cfg(feature = "tauri-app")]
    tauri_build::build();
}
