// ==========================================
// Transfer Model - 操作输入校验
// ==========================================
// 职责: 在调用存储过程之前拦截无效输入
// 规则:
// - 转移数量必须为有限正数
// - 转出站点 ≠ 转入站点
// - 站点必须来自当前渲染的站点列表（按 site_key 原值比较，不做裁剪）
// 约束: 纯函数，不访问数据库
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::MoveRequest;
use crate::i18n::{t, t_with_args};

/// 校验转移请求
///
/// # 参数
/// - request: 转移请求
/// - known_site_keys: 当前站点列表中的 site_key
pub fn validate_move(request: &MoveRequest, known_site_keys: &[String]) -> ApiResult<()> {
    if !request.delta_mt.is_finite() || request.delta_mt <= 0.0 {
        return Err(ApiError::InvalidInput(t_with_args(
            "validation.amount_not_positive",
            &[("amount", &request.delta_mt.to_string())],
        )));
    }

    let from = request.from_key.as_str();
    let to = request.to_key.as_str();
    if from.trim().is_empty() || to.trim().is_empty() {
        return Err(ApiError::InvalidInput(t("validation.site_required")));
    }

    if from == to {
        return Err(ApiError::InvalidInput(t("validation.same_site")));
    }

    ensure_known(from, known_site_keys)?;
    ensure_known(to, known_site_keys)?;
    Ok(())
}

/// 校验单站点重置
pub fn validate_reset_site(site_key: &str, known_site_keys: &[String]) -> ApiResult<()> {
    if site_key.trim().is_empty() {
        return Err(ApiError::InvalidInput(t("validation.site_required")));
    }
    ensure_known(site_key, known_site_keys)
}

fn ensure_known(site_key: &str, known_site_keys: &[String]) -> ApiResult<()> {
    if known_site_keys.iter().any(|k| k == site_key) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(t_with_args(
            "validation.unknown_site",
            &[("site", site_key)],
        )))
    }
}
