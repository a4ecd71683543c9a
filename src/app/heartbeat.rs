// ==========================================
// 药品配送无人机调度系统 - 心跳任务
// ==========================================
// 职责: 按固定间隔记录机队概况
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::api::FleetApi;

/// 启动心跳任务,间隔为 0 时不启动
pub fn spawn_heartbeat(fleet_api: Arc<FleetApi>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        tracing::info!("心跳已关闭");
        return None;
    }
    Some(tokio::spawn(run_heartbeat(
        fleet_api,
        Duration::from_secs(interval_secs),
    )))
}

async fn run_heartbeat(fleet_api: Arc<FleetApi>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // 第一次 tick 立即返回
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let api = fleet_api.clone();
        let summary = tokio::task::spawn_blocking(move || {
            let _perf = crate::perf::PerfGuard::new("heartbeat.fleet_summary");
            api.fleet_summary()
        })
        .await;

        match summary {
            Ok(Ok(s)) => tracing::info!(
                target: "heartbeat",
                drones = s.drones,
                idle = s.idle,
                loading = s.loading,
                loaded = s.loaded,
                medications = s.medications,
                unassigned = s.unassigned_medications,
                "fleet"
            ),
            Ok(Err(e)) => tracing::warn!(target: "heartbeat", error = %e, "机队概况查询失败"),
            Err(e) => tracing::warn!(target: "heartbeat", error = %e, "心跳任务执行失败"),
        }
    }
}
