use cloner_core::{AppViewModel, Notice, Phase, ReadyView, Severity};

/// Status lines for whatever changed between two snapshots of the view.
pub fn render(previous: &AppViewModel, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.notice != previous.notice {
        if let Some(notice) = &view.notice {
            lines.push(notice_line(notice));
        }
    }

    let in_flight = view.phase.is_busy();
    if in_flight && view.progress_percent / 10 != previous.progress_percent / 10 {
        lines.push(format!("Progress: {}%", view.progress_percent));
    }

    if view.phase == Phase::Resolving && previous.phase != Phase::Resolving {
        lines.push("Fetching cloned code and stylesheets...".to_string());
    }

    if view.ready != previous.ready {
        if let Some(ready) = &view.ready {
            lines.extend(metrics_lines(ready));
        }
    }

    lines
}

fn notice_line(notice: &Notice) -> String {
    match notice.severity {
        Severity::Info => notice.text.clone(),
        Severity::Success => format!("[ok] {}", notice.text),
        Severity::Error => format!("[error] {}", notice.text),
    }
}

fn metrics_lines(ready: &ReadyView) -> Vec<String> {
    vec![
        format!("  Assets:     {}", ready.metrics.assets_count),
        format!("  Total size: {}", ready.metrics.total_size),
        format!("  Time:       {}", ready.metrics.elapsed),
        format!("  Accuracy:   {}", ready.metrics.accuracy_label),
        format!("  Preview:    {}", ready.preview_url),
    ]
}

#[cfg(test)]
mod tests {
    use super::render;
    use cloner_core::{AppViewModel, CloneMetrics, Notice, Phase, ReadyView};
    use pretty_assertions::assert_eq;

    fn submitting(percent: u8) -> AppViewModel {
        AppViewModel {
            phase: Phase::Submitting,
            progress_percent: percent,
            notice: Some(Notice::info("Cloning https://example.com")),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn unchanged_view_renders_nothing() {
        let view = submitting(42);
        assert!(render(&view, &view).is_empty());
    }

    #[test]
    fn submission_announces_target() {
        let lines = render(&AppViewModel::default(), &submitting(0));
        assert_eq!(lines, vec!["Cloning https://example.com"]);
    }

    #[test]
    fn progress_is_reported_per_ten_percent() {
        assert!(render(&submitting(11), &submitting(18)).is_empty());
        assert_eq!(render(&submitting(18), &submitting(23)), vec!["Progress: 23%"]);
    }

    #[test]
    fn ready_prints_metrics_once() {
        let previous = AppViewModel {
            phase: Phase::Resolving,
            progress_percent: 100,
            ..submitting(100)
        };
        let ready = AppViewModel {
            phase: Phase::Ready,
            progress_percent: 100,
            notice: Some(Notice::success("Website cloned successfully!")),
            ready: Some(ReadyView {
                metrics: CloneMetrics {
                    assets_count: 2,
                    total_size: "2 KB".into(),
                    elapsed: "1.3s".into(),
                    accuracy_label: "99.8%".into(),
                },
                preview_url: "http://localhost:8000/cloned/abc/index.html".into(),
                asset_count: 2,
            }),
            ..AppViewModel::default()
        };

        assert_eq!(
            render(&previous, &ready),
            vec![
                "[ok] Website cloned successfully!",
                "  Assets:     2",
                "  Total size: 2 KB",
                "  Time:       1.3s",
                "  Accuracy:   99.8%",
                "  Preview:    http://localhost:8000/cloned/abc/index.html",
            ]
        );
        assert!(render(&ready, &ready).is_empty());
    }

    #[test]
    fn failures_are_marked() {
        let failed = AppViewModel {
            phase: Phase::Failed,
            notice: Some(Notice::error("upstream timeout")),
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&submitting(60), &failed),
            vec!["[error] upstream timeout"]
        );
    }
}
