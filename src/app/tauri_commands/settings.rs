use crate::i18n;

// ==========================================
// 设置命令
// ==========================================

/// 切换界面语言（"en" / "zh-CN"）
#[tauri::command(rename_all = "snake_case")]
pub async fn set_locale(locale: String) -> Result<String, String> {
    if !i18n::set_locale(&locale) {
        return Err(format!(
            "不支持的语言: {}（可选: {}）",
            locale,
            i18n::SUPPORTED_LOCALES.join(", ")
        ));
    }
    Ok(i18n::current_locale())
}
