//! Migration file lookup by table name

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Return the first name in `listing` that contains `table`
///
/// Ties resolve to listing order; a tie is never an error.
pub fn find_in_listing<I, S>(table: &str, listing: I) -> Option<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    listing
        .into_iter()
        .find(|name| name.as_ref().contains(table))
}

/// Find the migration in `dir` whose file name contains `table`
///
/// Files are listed in file-name order, so timestamp-prefixed migrations
/// resolve to the earliest match on every platform. A directory that cannot be
/// listed is treated the same as no match.
#[must_use]
pub fn locate_migration(dir: &Path, table: &str) -> Option<PathBuf> {
    if table.is_empty() {
        return None;
    }

    let listing = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "cannot list migrations");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_owned));

    let found = find_in_listing(table, listing).map(|name| dir.join(name));
    match &found {
        Some(path) => tracing::debug!(table, path = %path.display(), "located migration"),
        None => tracing::debug!(table, dir = %dir.display(), "no migration matches table"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_first_listed_match_wins() {
        let listing = vec![
            "1700000000002_create_user_roles_table.ts",
            "1700000000001_create_roles_table.ts",
        ];
        assert_eq!(
            find_in_listing("roles", listing),
            Some("1700000000002_create_user_roles_table.ts")
        );
    }

    #[test]
    fn test_no_match_in_listing() {
        let listing = vec!["1700000000001_create_users_table.ts"];
        assert_eq!(find_in_listing("posts", listing), None);
    }

    #[test]
    fn test_locate_sorts_by_file_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1763020149395_create_user_roles_table.ts"), "").unwrap();
        fs::write(dir.path().join("1763020149000_create_roles_table.ts"), "").unwrap();

        let found = locate_migration(dir.path(), "roles").unwrap();
        assert_eq!(
            found.file_name().unwrap(),
            "1763020149000_create_roles_table.ts"
        );
    }

    #[test]
    fn test_locate_ignores_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("0000_posts_archive")).unwrap();
        fs::write(dir.path().join("1763020149395_create_posts_table.ts"), "").unwrap();

        let found = locate_migration(dir.path(), "posts").unwrap();
        assert!(found.ends_with("1763020149395_create_posts_table.ts"));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        assert_eq!(locate_migration(&dir.path().join("nope"), "posts"), None);
    }

    #[test]
    fn test_empty_table_name_is_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("1_create_posts_table.ts"), "").unwrap();
        assert_eq!(locate_migration(dir.path(), ""), None);
    }
}
