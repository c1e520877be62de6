//! Object key computation.

use crate::file::FileDescriptor;

/// A computed object key: the prefix (path portion, trailing slash included)
/// and the full key. Derived per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub prefix: String,
    pub key: String,
}

/// Compute the object key for a file.
///
/// The key is `prefix + hash + ext`. In the default (non-pool) layout a
/// non-root path is emitted twice in the prefix, so path `"tmp"` yields
/// `"tmp/tmp/<hash><ext>"`. Callers have stored objects under such keys for
/// a long time, so the layout is kept as-is; the pool layout uses the path
/// once. A missing extension yields a key with no suffix.
pub fn object_key(file: &FileDescriptor, pool: bool) -> ObjectKey {
    let path = file.path.as_deref().filter(|p| !p.is_empty());
    let file_prefix = path.map(|p| format!("{p}/")).unwrap_or_default();
    let prefix = match path {
        Some(p) if !pool && p != "/" => format!("{}/{}", remove_leading_slash(p), file_prefix),
        _ => file_prefix,
    };
    let key = format!("{}{}{}", prefix, file.hash, file.ext.as_deref().unwrap_or(""));
    ObjectKey { prefix, key }
}

fn remove_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: Option<&str>, hash: &str, ext: Option<&str>) -> FileDescriptor {
        FileDescriptor {
            path: path.map(str::to_string),
            hash: hash.to_string(),
            ext: ext.map(str::to_string),
            ..FileDescriptor::default()
        }
    }

    #[test]
    fn test_pool_layout_uses_path_once() {
        let key = object_key(&file(Some("tmp"), "test", Some(".json")), true);
        assert_eq!(key.prefix, "tmp/");
        assert_eq!(key.key, "tmp/test.json");

        let key = object_key(&file(Some("tmp/test"), "test", Some(".json")), true);
        assert_eq!(key.key, "tmp/test/test.json");
    }

    #[test]
    fn test_default_layout_duplicates_path() {
        let key = object_key(&file(Some("tmp"), "test", Some(".json")), false);
        assert_eq!(key.prefix, "tmp/tmp/");
        assert_eq!(key.key, "tmp/tmp/test.json");
    }

    #[test]
    fn test_default_layout_strips_leading_slash_from_first_copy() {
        let key = object_key(&file(Some("/uploads"), "abc", Some(".png")), false);
        assert_eq!(key.key, "uploads//uploads/abc.png");
    }

    #[test]
    fn test_root_path_is_not_duplicated() {
        let key = object_key(&file(Some("/"), "abc", Some(".png")), false);
        assert_eq!(key.key, "//abc.png");
    }

    #[test]
    fn test_absent_or_empty_path() {
        assert_eq!(object_key(&file(None, "abc", Some(".png")), false).key, "abc.png");
        assert_eq!(object_key(&file(Some(""), "abc", Some(".png")), false).key, "abc.png");
    }

    #[test]
    fn test_missing_extension_yields_bare_hash() {
        assert_eq!(object_key(&file(None, "abc", None), false).key, "abc");
        assert_eq!(object_key(&file(Some("tmp"), "abc", None), true).key, "tmp/abc");
    }
}
