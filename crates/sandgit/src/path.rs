//! Path algebra on `/`-separated strings.
//!
//! No filesystem access and no dependence on the host OS: the sandbox
//! addresses files with POSIX-style strings regardless of where the bridge
//! runs, so `std::path` (which follows host conventions) is not used here.

const SEP: char = '/';

/// Parent directory of `path`.
///
/// Returns `.` when no separator is present and `/` when only the root
/// remains.
pub fn dirname(path: &str) -> String {
    if !path.contains(SEP) {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches(SEP);
    match trimmed.rfind(SEP) {
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches(SEP);
            if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            }
        }
        // "name/" or "/" after trimming
        None if trimmed.is_empty() => "/".to_string(),
        None => ".".to_string(),
    }
}

/// Final segment of `path`, with `ext` removed when the segment ends with it.
pub fn basename(path: &str, ext: Option<&str>) -> String {
    let trimmed = path.trim_end_matches(SEP);
    let name = match trimmed.rfind(SEP) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };
    match ext {
        Some(ext) if !ext.is_empty() => {
            name.strip_suffix(ext).unwrap_or(name).to_string()
        }
        _ => name.to_string(),
    }
}

/// Path from `from` to `to`, using `..` to climb out of `from`.
///
/// Both arguments are compared segment by segment; empty segments (from
/// repeated or trailing separators) are ignored. Returns `.` when the two
/// name the same location.
pub fn relative(from: &str, to: &str) -> String {
    let from_segs = segments(from);
    let to_segs = segments(to);

    let common = from_segs
        .iter()
        .zip(to_segs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from_segs.len() + to_segs.len() - 2 * common);
    parts.extend(std::iter::repeat_n("..", from_segs.len() - common));
    parts.extend(to_segs[common..].iter().copied());

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Resolve `rel` against `base`.
///
/// An absolute `rel` replaces `base`. `.` segments are dropped and `..` pops
/// one segment, never climbing above the root of an absolute base.
pub fn join(base: &str, rel: &str) -> String {
    let absolute = if rel.starts_with(SEP) {
        true
    } else {
        base.starts_with(SEP)
    };
    let mut stack: Vec<&str> = if rel.starts_with(SEP) {
        Vec::new()
    } else {
        segments(base)
    };

    for seg in segments(rel) {
        match seg {
            "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Translate `path` into a path relative to `workdir`.
///
/// Absolute paths are made relative; relative paths are taken as already
/// rooted at `workdir` and only normalized.
pub fn to_relative(workdir: &str, path: &str) -> String {
    relative(workdir, &join(workdir, path))
}

fn segments(path: &str) -> Vec<&str> {
    path.split(SEP).filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("file.txt"), ".");
        assert_eq!(dirname("/a/b/c"), "/a/b");
        assert_eq!(dirname("/a/b/c/"), "/a/b");
        assert_eq!(dirname("a/b"), "a");
        assert_eq!(dirname("/a"), "/");
        assert_eq!(dirname("/"), "/");
        assert_eq!(dirname("a/"), ".");
        assert_eq!(dirname("a//b"), "a");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/a/b/c.txt", None), "c.txt");
        assert_eq!(basename("/a/b/c.txt", Some(".txt")), "c");
        assert_eq!(basename("/a/b/c.txt", Some(".md")), "c.txt");
        assert_eq!(basename("/a/b/", None), "b");
        assert_eq!(basename("plain", None), "plain");
        assert_eq!(basename(".txt", Some(".txt")), "");
        assert_eq!(basename("/a/.gitignore", Some(".gitignore")), "");
        assert_eq!(basename("/", None), "");
    }

    #[test]
    fn test_relative() {
        assert_eq!(relative("/a/b", "/a/b/c"), "c");
        assert_eq!(relative("/a/b", "/a/b"), ".");
        assert_eq!(relative("/a/b/", "/a/b"), ".");
        assert_eq!(relative("/a/b/c", "/a/d"), "../../d");
        assert_eq!(relative("/home/project", "/home/project/.git/config"), ".git/config");
        assert_eq!(relative("/x", "/y/z"), "../y/z");
        assert_eq!(relative("/", "/a"), "a");
    }

    #[test]
    fn test_relative_segment_equality_not_prefix() {
        // "/a/bc" must not be treated as living under "/a/b"
        assert_eq!(relative("/a/b", "/a/bc"), "../bc");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/a/b", "c"), "/a/b/c");
        assert_eq!(join("/a/b", "../c"), "/a/c");
        assert_eq!(join("/a/b", "."), "/a/b");
        assert_eq!(join("/a/b", "/x/y"), "/x/y");
        assert_eq!(join("/", "../.."), "/");
        assert_eq!(join("a", "../.."), "..");
    }

    #[test]
    fn test_to_relative() {
        assert_eq!(to_relative("/home/project", "/home/project/src/a.rs"), "src/a.rs");
        assert_eq!(to_relative("/home/project", "src/./a.rs"), "src/a.rs");
        assert_eq!(to_relative("/home/project", "/home/project"), ".");
        assert_eq!(to_relative("/home/project", "/home/other"), "../other");
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn abs_path() -> impl Strategy<Value = String> {
            prop::collection::vec("[a-c]{1,2}", 0..5).prop_map(|segs| format!("/{}", segs.join("/")))
        }

        proptest! {
            #[test]
            fn dirname_without_separator_is_dot(p in "[a-z.]{0,12}") {
                prop_assert_eq!(dirname(&p), ".");
            }

            #[test]
            fn relative_to_self_is_dot(p in abs_path(), trailing in proptest::bool::ANY) {
                let q = if trailing { format!("{}/", p) } else { p.clone() };
                prop_assert_eq!(relative(&p, &q), ".");
            }

            #[test]
            fn relative_then_join_round_trips(from in abs_path(), to in abs_path()) {
                let rel = relative(&from, &to);
                prop_assert!(!rel.starts_with('/'));
                prop_assert_eq!(join(&from, &rel), join("/", &to));
            }
        }
    }
}
