use crate::progress::types::GitDiffStat;

// Git diff metadata line prefixes that never count as content changes.
const GIT_METADATA_PREFIXES: [&str; 5] = ["diff --git", "index ", "--- ", "+++ ", "@@ "];

/// Compute added/deleted/total line counts from a unified diff.
///
/// Total function: malformed or empty input degrades to the zero stat
/// rather than erroring. Metadata lines are checked before the `+`/`-`
/// classification so that `+++ `/`--- ` file headers are never counted
/// as content.
pub fn compute_diff_stats(diff: &str) -> GitDiffStat {
    let mut stat = GitDiffStat::default();

    for line in diff.lines() {
        let line = line.trim_start();

        if GIT_METADATA_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }

        if line.starts_with('+') {
            stat.added_lines += 1;
            stat.total_lines += 1;
        } else if line.starts_with('-') {
            stat.deleted_lines += 1;
            stat.total_lines += 1;
        }
    }

    stat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diff_is_zero() {
        let stat = compute_diff_stats("");
        assert_eq!(stat, GitDiffStat::default());
    }

    #[test]
    fn test_counts_additions() {
        let stat = compute_diff_stats("+added line 1\n+added line 2");
        assert_eq!(stat.added_lines, 2);
        assert_eq!(stat.deleted_lines, 0);
        assert_eq!(stat.total_lines, 2);
    }

    #[test]
    fn test_counts_deletions() {
        let stat = compute_diff_stats("-deleted line 1\n-deleted line 2");
        assert_eq!(stat.added_lines, 0);
        assert_eq!(stat.deleted_lines, 2);
        assert_eq!(stat.total_lines, 2);
    }

    #[test]
    fn test_counts_mixed_changes() {
        let stat = compute_diff_stats("+added line\n-deleted line\n+another added line");
        assert_eq!(stat.added_lines, 2);
        assert_eq!(stat.deleted_lines, 1);
        assert_eq!(stat.total_lines, 3);
    }

    #[test]
    fn test_ignores_git_metadata_lines() {
        let diff = "diff --git a/file.rs b/file.rs\n\
                    index 1234567..abcdefg 100644\n\
                    --- a/file.rs\n\
                    +++ b/file.rs\n\
                    @@ -1,2 +1,2 @@\n\
                    +added line\n\
                    -deleted line";
        let stat = compute_diff_stats(diff);
        assert_eq!(stat.added_lines, 1);
        assert_eq!(stat.deleted_lines, 1);
        assert_eq!(stat.total_lines, 2);
    }

    #[test]
    fn test_leading_whitespace_does_not_hide_markers() {
        let stat = compute_diff_stats("\n   \n+added line 1\n\t-deleted line 1\n");
        assert_eq!(stat.added_lines, 1);
        assert_eq!(stat.deleted_lines, 1);
        assert_eq!(stat.total_lines, 2);
    }

    #[test]
    fn test_context_lines_are_ignored() {
        let stat = compute_diff_stats(" unchanged context\nplain text\n+one addition");
        assert_eq!(stat.added_lines, 1);
        assert_eq!(stat.deleted_lines, 0);
        assert_eq!(stat.total_lines, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let stat = compute_diff_stats("+a\r\n-b\r\n+c\r\n");
        assert_eq!(stat.added_lines, 2);
        assert_eq!(stat.deleted_lines, 1);
        assert_eq!(stat.total_lines, 3);
    }

    #[test]
    fn test_total_equals_added_plus_deleted() {
        let samples = [
            "",
            "+a",
            "-b",
            "+a\n-b\n c\n@@ -1 +1 @@\n--- x\n+++ y",
            "random noise\n+++ not counted\n-real deletion",
        ];
        for diff in samples {
            let stat = compute_diff_stats(diff);
            assert_eq!(stat.total_lines, stat.added_lines + stat.deleted_lines);
        }
    }
}
