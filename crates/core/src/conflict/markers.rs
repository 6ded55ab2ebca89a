//! Git-style conflict marker rendering.

use crate::config::{MarkerConfig, MarkerStyle};
use crate::models::{FileMergeResult, MergeRegion};
use crate::text::join_lines;

fn marker_line(ch: char, size: usize, label: &str) -> String {
    let marker: String = std::iter::repeat(ch).take(size).collect();
    if label.is_empty() {
        marker
    } else {
        format!("{} {}", marker, label)
    }
}

/// Append the marked-up lines of one conflict region to `out`.
pub fn push_conflict(region: &MergeRegion, config: &MarkerConfig, out: &mut Vec<String>) {
    out.push(marker_line('<', config.size, &config.ours_label));
    out.extend(region.ours_lines.iter().cloned());
    if config.style == MarkerStyle::Diff3 {
        out.push(marker_line('|', config.size, &config.base_label));
        out.extend(region.base_lines.iter().cloned());
    }
    out.push(marker_line('=', config.size, ""));
    out.extend(region.theirs_lines.iter().cloned());
    out.push(marker_line('>', config.size, &config.theirs_label));
}

/// The merged document with every conflict written out between markers.
pub fn render_with_markers(result: &FileMergeResult, config: &MarkerConfig) -> String {
    let mut out = Vec::new();
    for region in &result.regions {
        if region.is_conflict() {
            push_conflict(region, config, &mut out);
        } else {
            out.extend(region.lines.iter().cloned());
        }
    }
    join_lines(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> FileMergeResult {
        FileMergeResult {
            file_path: None,
            regions: vec![
                MergeRegion::unchanged(lines(&["a"]), lines(&["a"])),
                MergeRegion::conflict(lines(&["x"]), lines(&["y"]), lines(&["b"])),
                MergeRegion::ours_only(lines(&["c2"]), lines(&["c"])),
            ],
        }
    }

    #[test]
    fn test_merge_style() {
        let rendered = render_with_markers(&sample(), &MarkerConfig::default());
        assert_eq!(
            rendered,
            "a\n<<<<<<< ours\nx\n=======\ny\n>>>>>>> theirs\nc2"
        );
    }

    #[test]
    fn test_diff3_style_with_labels() {
        let config = MarkerConfig {
            style: MarkerStyle::Diff3,
            size: 3,
            ours_label: "HEAD".into(),
            theirs_label: String::new(),
            base_label: "base".into(),
        };
        let rendered = render_with_markers(&sample(), &config);
        assert_eq!(rendered, "a\n<<< HEAD\nx\n||| base\nb\n===\ny\n>>>\nc2");
    }

    #[test]
    fn test_no_conflicts_is_plain_text() {
        let result = FileMergeResult {
            file_path: None,
            regions: vec![MergeRegion::unchanged(lines(&["a", "b"]), lines(&["a", "b"]))],
        };
        assert_eq!(render_with_markers(&result, &MarkerConfig::default()), "a\nb");
    }
}
