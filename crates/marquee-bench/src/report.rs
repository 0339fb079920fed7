use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub label: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if it is missing or
/// unreadable.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Baseline {} is not valid JSON: {e}", path.display());
            None
        }
    }
}

pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Scenes whose mean step time grew by more than `threshold_pct` percent
/// over the baseline, as (scene name, percent change).
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    current
        .iter()
        .filter_map(|result| {
            let base = baseline
                .results
                .iter()
                .find(|b| b.scene_name == result.scene_name)?;
            if base.step_timings.mean_ms <= 0.0 {
                return None;
            }
            let pct = (result.step_timings.mean_ms - base.step_timings.mean_ms)
                / base.step_timings.mean_ms
                * 100.0;
            if pct > threshold_pct {
                Some((result.scene_name.clone(), pct))
            } else {
                None
            }
        })
        .collect()
}

const COLUMNS: [&str; 9] = [
    "Scene",
    "Fragments",
    "Steps to settle",
    "Timeouts",
    "Mean (ms)",
    "Median (ms)",
    "P95 (ms)",
    "P99 (ms)",
    "Max (ms)",
];

pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", COLUMNS.join(" | ")));
    let rule: Vec<String> = COLUMNS.iter().map(|c| "-".repeat(c.len() + 2)).collect();
    out.push_str(&format!("|{}|\n", rule.join("|")));

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {:.1} | {}/{} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.fragments,
            r.mean_steps_to_settle,
            r.timeouts,
            r.seeds,
            r.step_timings.mean_ms,
            r.step_timings.median_ms,
            r.step_timings.p95_ms,
            r.step_timings.p99_ms,
            r.step_timings.max_ms,
        ));
    }

    out
}

pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {threshold_pct:.0}% threshold. No regressions detected.\n"
        );
    }

    let mut out = format!("REGRESSIONS DETECTED (>{threshold_pct:.0}% threshold):\n");
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {scene}: +{pct:.1}%\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{compute_timings, BenchmarkResult};

    fn result(name: &str, mean_ms: f64) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            fragments: 4,
            seeds: 1,
            mean_steps_to_settle: 120.0,
            timeouts: 0,
            step_timings: compute_timings(&[mean_ms]),
        }
    }

    #[test]
    fn test_compare_flags_only_regressions_over_threshold() {
        let baseline = Baseline {
            label: "base".into(),
            results: vec![result("hero-4", 1.0), result("nav-8", 2.0)],
        };
        let current = vec![
            result("hero-4", 1.05),
            result("nav-8", 3.0),
            result("new", 9.0),
        ];
        let regressions = compare(&current, &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].0, "nav-8");
        assert!((regressions[0].1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_json_survives_disk() {
        let name = format!("marquee-bench-{}", std::process::id());
        let dir = std::env::temp_dir().join(name);
        let path = dir.join("baseline.json");
        let baseline = Baseline {
            label: "test".into(),
            results: vec![result("hero-4", 1.5)],
        };
        save_baseline(&path, &baseline).expect("save");
        let loaded = load_baseline(&path).expect("load");
        assert_eq!(loaded.label, "test");
        assert_eq!(loaded.results[0].scene_name, "hero-4");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let md = format_markdown(&[result("hero-4", 1.0), result("nav-8", 2.0)]);
        assert_eq!(md.lines().count(), 4);
        assert!(md.contains("| hero-4 | 4 |"));
        let mut lines = md.lines();
        let header = lines.next().unwrap_or_default();
        assert!(header.starts_with("| Scene | Fragments |"));
        assert!(header.ends_with("| P99 (ms) | Max (ms) |"));
        let rule = lines.next().unwrap_or_default();
        assert!(rule.starts_with("|-------|-----------|"));
        assert_eq!(rule.len(), header.len());
    }

    #[test]
    fn test_comparison_message() {
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
        let text = format_comparison(&[("nav-8".into(), 25.0)], 10.0);
        assert!(text.contains("nav-8: +25.0%"));
    }
}
