// ==========================================
// 药品配送无人机调度系统 - 性能统计
// ==========================================
// 每个线程维护一个操作作用域栈:
// - 作用域内执行的 SQL 语句数 / 慢 SQL 数
// - 慢 SQL 告警带上当前操作名与所属无人机序列号
// 作用域结束时在 target "perf" 下输出耗时与计数
// ==========================================

use rusqlite::Connection;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const ENV_PERF_SQL: &str = "DRONE_DISPATCH_PERF_SQL";
pub const ENV_SLOW_SQL_MS: &str = "DRONE_DISPATCH_SLOW_SQL_MS";

const SQL_LOG_MAX_CHARS: usize = 420;

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

struct PerfScope {
    op: &'static str,
    serial: Option<String>,
    sql_count: u64,
    slow_sql_count: u64,
}

thread_local! {
    static SCOPES: RefCell<Vec<PerfScope>> = RefCell::new(Vec::new());
}

// ==========================================
// PerfSettings - SQL 追踪开关
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSettings {
    pub sql_tracing: bool, // Debug 默认开启,Release 默认关闭
    pub slow_sql_ms: u64,  // 0 = 不告警
}

impl Default for PerfSettings {
    fn default() -> Self {
        Self {
            sql_tracing: cfg!(debug_assertions),
            slow_sql_ms: if cfg!(debug_assertions) { 50 } else { 200 },
        }
    }
}

impl PerfSettings {
    /// 从环境变量读取
    ///
    /// - `DRONE_DISPATCH_PERF_SQL=1` 强制开启
    /// - `DRONE_DISPATCH_SLOW_SQL_MS=50` 慢 SQL 阈值（毫秒）
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let sql_tracing = lookup(ENV_PERF_SQL)
            .map(|v| is_true(&v))
            .unwrap_or(defaults.sql_tracing);
        let slow_sql_ms = lookup(ENV_SLOW_SQL_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.slow_sql_ms);

        Self {
            sql_tracing,
            slow_sql_ms,
        }
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 截断过长 SQL（按字符计数）
fn truncate_sql(sql: &str, max_chars: usize) -> String {
    let s = sql.trim().replace('\n', " ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{}…", head)
}

// ==========================================
// SQLite 回调
// ==========================================

/// 按环境变量安装语句 trace/profile 回调
pub fn install_sqlite_tracing(conn: &mut Connection) -> PerfSettings {
    let settings = PerfSettings::from_env();
    apply_sqlite_tracing(conn, settings);
    settings
}

pub fn apply_sqlite_tracing(conn: &mut Connection, settings: PerfSettings) {
    if !settings.sql_tracing {
        conn.trace(None);
        conn.profile(None);
        return;
    }

    SLOW_SQL_THRESHOLD_MS.store(settings.slow_sql_ms, Ordering::Relaxed);
    conn.trace(Some(on_sql_statement));
    conn.profile(Some(on_sql_finished));
}

fn on_sql_statement(_sql: &str) {
    SCOPES.with(|scopes| {
        if let Ok(mut scopes) = scopes.try_borrow_mut() {
            for scope in scopes.iter_mut() {
                scope.sql_count = scope.sql_count.saturating_add(1);
            }
        }
    });
}

fn on_sql_finished(sql: &str, duration: Duration) {
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    let ms = duration.as_millis() as u64;
    if threshold == 0 || ms < threshold {
        return;
    }

    let (op, serial) = record_slow_sql();
    tracing::warn!(
        target: "slow_sql",
        op = op.unwrap_or("-"),
        serial = serial.as_deref().unwrap_or("-"),
        duration_ms = ms,
        sql = %truncate_sql(sql, SQL_LOG_MAX_CHARS),
        "slow sql"
    );
}

/// 计入慢 SQL,返回最内层操作名与最近的无人机序列号
fn record_slow_sql() -> (Option<&'static str>, Option<String>) {
    SCOPES.with(|scopes| match scopes.try_borrow_mut() {
        Ok(mut scopes) => {
            for scope in scopes.iter_mut() {
                scope.slow_sql_count = scope.slow_sql_count.saturating_add(1);
            }
            let op = scopes.last().map(|s| s.op);
            let serial = scopes.iter().rev().find_map(|s| s.serial.clone());
            (op, serial)
        }
        Err(_) => (None, None),
    })
}

// ==========================================
// PerfGuard - 操作作用域
// ==========================================
/// 作用域绑定当前线程,Drop 时输出 elapsed_ms + SQL 语句数 + 慢 SQL 数
///
/// ```ignore
/// let _perf = drone_dispatch::perf::PerfGuard::for_drone("engine.load", "SN-001");
/// ```
pub struct PerfGuard {
    depth: usize,
    start: Instant,
    _thread_bound: PhantomData<*const ()>,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self::open(op, None)
    }

    /// 针对单架无人机的操作（慢 SQL 告警带序列号）
    pub fn for_drone(op: &'static str, serial: &str) -> Self {
        Self::open(op, Some(serial.to_string()))
    }

    fn open(op: &'static str, serial: Option<String>) -> Self {
        let depth = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            scopes.push(PerfScope {
                op,
                serial,
                sql_count: 0,
                slow_sql_count: 0,
            });
            scopes.len() - 1
        });

        Self {
            depth,
            start: Instant::now(),
            _thread_bound: PhantomData,
        }
    }

    pub fn sql_count(&self) -> u64 {
        self.read(|s| s.sql_count)
    }

    pub fn slow_sql_count(&self) -> u64 {
        self.read(|s| s.slow_sql_count)
    }

    fn read(&self, f: impl Fn(&PerfScope) -> u64) -> u64 {
        SCOPES.with(|scopes| {
            scopes
                .try_borrow()
                .ok()
                .and_then(|s| s.get(self.depth).map(&f))
                .unwrap_or(0)
        })
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let depth = self.depth;
        let scope = SCOPES.with(|scopes| {
            let mut scopes = scopes.try_borrow_mut().ok()?;
            if depth >= scopes.len() {
                return None;
            }
            // 未正常释放的内层作用域一并清理
            let scope = scopes.drain(depth..).next();
            scope
        });

        if let Some(scope) = scope {
            tracing::info!(
                target: "perf",
                op = scope.op,
                serial = scope.serial.as_deref().unwrap_or("-"),
                elapsed_ms = self.start.elapsed().as_millis() as u64,
                sql_count = scope.sql_count,
                slow_sql_count = scope.slow_sql_count,
                "done"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_scopes() -> usize {
        SCOPES.with(|s| s.borrow().len())
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = PerfSettings::from_lookup(|key| match key {
            ENV_PERF_SQL => Some(" YES ".to_string()),
            ENV_SLOW_SQL_MS => Some("120".to_string()),
            _ => None,
        });
        assert_eq!(
            settings,
            PerfSettings {
                sql_tracing: true,
                slow_sql_ms: 120
            }
        );

        let fallback = PerfSettings::from_lookup(|key| match key {
            ENV_PERF_SQL => Some("off".to_string()),
            ENV_SLOW_SQL_MS => Some("fast".to_string()),
            _ => None,
        });
        assert!(!fallback.sql_tracing);
        assert_eq!(fallback.slow_sql_ms, PerfSettings::default().slow_sql_ms);

        assert_eq!(PerfSettings::from_lookup(|_| None), PerfSettings::default());
    }

    #[test]
    fn test_truncate_sql_counts_chars() {
        assert_eq!(truncate_sql("SELECT 1\n", 20), "SELECT 1");

        let short = truncate_sql("SELECT '无人机' FROM drone", 10);
        assert_eq!(short.chars().count(), 11);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn test_nested_scopes_count_statements() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_sqlite_tracing(
            &mut conn,
            PerfSettings {
                sql_tracing: true,
                slow_sql_ms: 0,
            },
        );

        let outer = PerfGuard::new("http.load_drone");
        conn.execute("CREATE TABLE t (x INTEGER)", []).unwrap();
        conn.execute("INSERT INTO t VALUES (1)", []).unwrap();
        {
            let inner = PerfGuard::for_drone("engine.load", "SN-1");
            conn.execute("UPDATE t SET x = 2", []).unwrap();
            assert_eq!(inner.sql_count(), 1);
        }
        assert_eq!(outer.sql_count(), 3);
        drop(outer);
        assert_eq!(open_scopes(), 0);
    }

    #[test]
    fn test_slow_sql_attributed_to_drone_scope() {
        let outer = PerfGuard::new("http.load_drone");
        {
            let inner = PerfGuard::for_drone("engine.load", "SN-9");
            assert_eq!(
                record_slow_sql(),
                (Some("engine.load"), Some("SN-9".to_string()))
            );
            assert_eq!(inner.slow_sql_count(), 1);
        }
        assert_eq!(record_slow_sql(), (Some("http.load_drone"), None));
        assert_eq!(outer.slow_sql_count(), 2);
    }

    #[test]
    fn test_slow_sql_outside_scope_is_unattributed() {
        assert_eq!(open_scopes(), 0);
        assert_eq!(record_slow_sql(), (None, None));
    }
}
