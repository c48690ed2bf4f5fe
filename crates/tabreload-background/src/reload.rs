//! Sequential reload of every tab in a window

use crate::delay::DelayPolicy;
use tabreload_core::types::WindowId;
use tabreload_core::TabHost;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Counters for one pass over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Tabs the host reloaded.
    pub reloaded: usize,
    /// Tabs whose reload call failed.
    pub failed: usize,
    /// Tabs without an id.
    pub skipped_without_id: usize,
}

/// Result of a reload request for a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Another loop already holds the window; nothing was done.
    Skipped,
    /// Every tab was visited.
    Completed(ReloadReport),
    /// The window's tabs could not be enumerated.
    Aborted,
}

/// Reload each tab of `window_id` in host order, waiting between tabs.
///
/// Per-tab failures are logged and do not stop the loop. No wait follows
/// the last tab, and zero-length waits are not awaited.
pub async fn reload_window(
    tabs: &dyn TabHost,
    window_id: WindowId,
    policy: &DelayPolicy,
) -> ReloadOutcome {
    let list = match tabs.query_window(window_id).await {
        Ok(list) => list,
        Err(e) => {
            error!(%window_id, error = %e, "failed to enumerate tabs");
            return ReloadOutcome::Aborted;
        }
    };

    debug!(%window_id, tab_count = list.len(), "reloading window");

    let mut report = ReloadReport::default();
    let last = list.len().saturating_sub(1);

    for (index, tab) in list.iter().enumerate() {
        match tab.id {
            Some(tab_id) => match tabs.reload(tab_id).await {
                Ok(()) => report.reloaded += 1,
                Err(e) => {
                    warn!(%window_id, %tab_id, error = %e, "tab reload failed");
                    report.failed += 1;
                }
            },
            None => report.skipped_without_id += 1,
        }

        if index < last {
            let delay = policy.next_delay();
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }

    ReloadOutcome::Completed(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tabreload_core::types::{TabId, TabInfo};
    use tabreload_shell::BrowserShell;

    #[tokio::test]
    async fn test_reloads_in_host_order() {
        let shell = BrowserShell::new();
        let (window, tabs) = shell.open_window_with_tabs(3);

        let outcome = reload_window(&shell, window, &DelayPolicy::Fixed(Duration::ZERO)).await;

        assert_eq!(
            outcome,
            ReloadOutcome::Completed(ReloadReport {
                reloaded: 3,
                ..ReloadReport::default()
            })
        );
        assert_eq!(shell.reloads(), tabs);
    }

    #[tokio::test]
    async fn test_failed_tab_does_not_stop_loop() {
        let shell = BrowserShell::new();
        let (window, tabs) = shell.open_window_with_tabs(3);
        shell.fail_reload(tabs[1]);

        let outcome = reload_window(&shell, window, &DelayPolicy::Fixed(Duration::ZERO)).await;

        assert_eq!(
            outcome,
            ReloadOutcome::Completed(ReloadReport {
                reloaded: 2,
                failed: 1,
                skipped_without_id: 0,
            })
        );
        assert_eq!(shell.reloads(), tabs);
    }

    #[tokio::test]
    async fn test_empty_window() {
        let shell = BrowserShell::new();
        let window = shell.open_window();

        let outcome = reload_window(&shell, window, &DelayPolicy::Fixed(Duration::ZERO)).await;

        assert_eq!(outcome, ReloadOutcome::Completed(ReloadReport::default()));
        assert!(shell.reloads().is_empty());
    }

    #[tokio::test]
    async fn test_enumeration_failure_aborts() {
        let shell = BrowserShell::new();
        let (window, _) = shell.open_window_with_tabs(2);
        shell.fail_query(window);

        let outcome = reload_window(&shell, window, &DelayPolicy::Fixed(Duration::ZERO)).await;

        assert_eq!(outcome, ReloadOutcome::Aborted);
        assert!(shell.reloads().is_empty());
    }

    struct IdlessTabs;

    #[async_trait::async_trait]
    impl TabHost for IdlessTabs {
        async fn query_window(
            &self,
            window_id: WindowId,
        ) -> tabreload_core::HostResult<Vec<TabInfo>> {
            Ok(vec![
                TabInfo {
                    id: None,
                    ..TabInfo::new(TabId(0), window_id)
                },
                TabInfo::new(TabId(1), window_id),
            ])
        }

        async fn reload(&self, _tab_id: TabId) -> tabreload_core::HostResult<()> {
            Ok(())
        }

        async fn create(&self, _url: url::Url) -> tabreload_core::HostResult<TabId> {
            Ok(TabId(2))
        }
    }

    #[tokio::test]
    async fn test_tab_without_id_is_skipped() {
        let outcome =
            reload_window(&IdlessTabs, WindowId(1), &DelayPolicy::Fixed(Duration::ZERO)).await;

        assert_eq!(
            outcome,
            ReloadOutcome::Completed(ReloadReport {
                reloaded: 1,
                failed: 0,
                skipped_without_id: 1,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_last_tab() {
        let shell = BrowserShell::new();
        let (window, _) = shell.open_window_with_tabs(3);
        let start = tokio::time::Instant::now();

        reload_window(&shell, window, &DelayPolicy::Fixed(Duration::from_millis(250))).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(502), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_closed_mid_loop() {
        let shell = std::sync::Arc::new(BrowserShell::new());
        let (window, tabs) = shell.open_window_with_tabs(3);

        let closer = {
            let shell = std::sync::Arc::clone(&shell);
            tokio::spawn(async move {
                sleep(Duration::from_millis(50)).await;
                shell.close_window(window);
            })
        };

        let outcome = reload_window(
            shell.as_ref(),
            window,
            &DelayPolicy::Fixed(Duration::from_millis(100)),
        )
        .await;
        closer.await.unwrap();

        assert_eq!(
            outcome,
            ReloadOutcome::Completed(ReloadReport {
                reloaded: 1,
                failed: 2,
                skipped_without_id: 0,
            })
        );
        assert_eq!(shell.reloads(), tabs);
    }
}
