// ==========================================
// 端到端场景测试
// ==========================================
// 场景: SiteA(100 MT) / SiteB(50 MT)
// 1. 渲染看板（填充缓存）
// 2. 从 A 转移 20 MT 到 B
// 3. 重新查询站点: A=80, B=70
// 4. 全部重置: 回到 100 / 50
// ==========================================

mod helpers;

use helpers::*;
use transfer_model::app::dashboard::render_dashboard;
use transfer_model::app::{Notice, TransferWorkflow};

#[tokio::test]
async fn test_e2e_转移后站点吨位更新() {
    transfer_model::logging::init_test();
    transfer_model::i18n::set_locale("en");
    let env = TestEnv::two_sites();

    // 1. 首次渲染
    let view = render_dashboard(&env.read_api, None).await;
    let before = view.sites.data().expect("站点应就绪");
    assert_eq!(before[0].mt_total, 100.0);
    assert_eq!(before[1].mt_total, 50.0);

    let mut workflow = TransferWorkflow::new();
    workflow.sync_sites(&view.site_options);

    // 2. 转移
    workflow.select_from("A").unwrap();
    workflow.select_to("B").unwrap();
    workflow.set_amount(20.0).unwrap();
    let outcome = workflow
        .submit_move(&env.transfer_api, &env.read_api, TEST_ACTOR)
        .await
        .expect("转移失败");

    assert_eq!(outcome.totals.from_before, 100.0);
    assert_eq!(outcome.totals.from_after, 80.0);
    assert_eq!(outcome.totals.to_before, 50.0);
    assert_eq!(outcome.totals.to_after, 70.0);
    assert!(matches!(workflow.notice(), Some(Notice::Success(_))));

    // 3. 缓存已失效，重新查询读到新值
    let sites = env.read_api.fetch_sites().await.expect("查询失败");
    assert_eq!(sites[0].mt_total, 80.0);
    assert_eq!(sites[1].mt_total, 70.0);
    assert_eq!(env.store.calls(FakeQuery::Sites), 2);

    // 4. 全部重置
    let view = render_dashboard(&env.read_api, None).await;
    workflow.sync_sites(&view.site_options);
    let reset = workflow
        .submit_reset_all(&env.transfer_api, &env.read_api, TEST_ACTOR)
        .await
        .expect("重置失败");
    assert_eq!(reset.rows_reset, 2);

    let sites = env.read_api.fetch_sites().await.expect("查询失败");
    assert_eq!(sites[0].mt_total, 100.0);
    assert_eq!(sites[1].mt_total, 50.0);

    let totals = env.read_api.fetch_totals().await.expect("查询失败");
    assert!(totals.delta_loads_annual.abs() < 1e-9);

    // 操作日志: 一次转移 + 一次重置
    assert_eq!(env.action_log_repo.count().unwrap(), 2);
}
