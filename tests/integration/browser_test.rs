//! Directory browser tests on real temporary directories.

use pretty_assertions::assert_eq;
use scratchsql::browser::{DirEntry, DirectoryBrowser, NavTarget};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sample_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::create_dir(dir.path().join("Archive")).unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join("zeta.sql"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("Alpha.csv"), "a,b\n").unwrap();
    fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
    fs::write(dir.path().join("docs").join("guide.md"), "# guide").unwrap();
    dir
}

fn names(entries: &[DirEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}

#[test]
fn test_listing_hides_dotfiles_and_sorts_directories_first() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());

    let entries = browser.list().to_vec();

    assert_eq!(names(&entries), vec!["Archive", "docs", "Alpha.csv", "zeta.sql"]);
    assert!(entries[0].is_dir && entries[1].is_dir);
    assert!(!entries[2].is_dir && !entries[3].is_dir);
}

#[test]
fn test_listing_is_not_recursive() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());

    assert!(!names(browser.list()).contains(&"guide.md".to_string()));
}

#[test]
fn test_enter_child_and_return_to_parent() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());

    browser
        .change_directory(&NavTarget::parse("docs"))
        .unwrap();
    assert_eq!(browser.current_path(), tree.path().join("docs"));
    assert_eq!(names(browser.list()), vec!["guide.md"]);

    browser.change_directory(&NavTarget::parse("..")).unwrap();
    assert_eq!(browser.current_path(), tree.path());
    assert_eq!(names(browser.list()).len(), 4);
}

#[test]
fn test_relative_start_directory() {
    let mut browser = DirectoryBrowser::new(".");
    browser.change_directory(&NavTarget::parse("src")).unwrap();

    assert_eq!(browser.current_path(), Path::new("./src"));
    assert_eq!(browser.resolve_entry_path("lib.rs"), PathBuf::from("./src/lib.rs"));

    browser.change_directory(&NavTarget::Parent).unwrap();
    assert_eq!(browser.current_path(), Path::new("."));
}

#[test]
fn test_navigation_to_a_file_is_rejected() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());

    let err = browser
        .change_directory(&NavTarget::parse("zeta.sql"))
        .unwrap_err();

    assert!(err.to_string().contains("not a readable directory"));
    assert_eq!(browser.current_path(), tree.path());
}

#[test]
fn test_navigation_with_nested_name_is_rejected() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());

    assert!(browser
        .change_directory(&NavTarget::parse("docs/../docs"))
        .is_err());
    assert_eq!(browser.current_path(), tree.path());
}

#[test]
fn test_force_refresh_picks_up_new_files() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());
    assert_eq!(browser.list().len(), 4);

    fs::write(tree.path().join("new.sql"), "").unwrap();
    assert_eq!(browser.list().len(), 4, "listing is cached until refreshed");

    browser.force_refresh();
    assert!(names(browser.list()).contains(&"new.sql".to_string()));
}

#[test]
fn test_force_refresh_drops_removed_files() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());
    assert!(names(browser.list()).contains(&"zeta.sql".to_string()));

    fs::remove_file(tree.path().join("zeta.sql")).unwrap();
    assert!(
        names(browser.list()).contains(&"zeta.sql".to_string()),
        "listing is cached until refreshed"
    );

    browser.force_refresh();
    assert_eq!(names(browser.list()), vec!["Archive", "docs", "Alpha.csv"]);
}

#[test]
fn test_removed_directory_resets_to_initial() {
    let tree = sample_tree();
    let mut browser = DirectoryBrowser::new(tree.path());
    browser.change_directory(&NavTarget::parse("docs")).unwrap();
    browser.list();

    fs::remove_dir_all(tree.path().join("docs")).unwrap();
    browser.force_refresh();

    assert!(browser.list().is_empty());
    assert_eq!(browser.current_path(), tree.path());
    assert!(browser.take_notice().is_some());
    assert_eq!(browser.list().len(), 4);
}

#[test]
fn test_resolve_entry_path_does_not_check_existence() {
    let tree = sample_tree();
    let browser = DirectoryBrowser::new(tree.path());

    assert_eq!(
        browser.resolve_entry_path("missing.txt"),
        tree.path().join("missing.txt")
    );
}
