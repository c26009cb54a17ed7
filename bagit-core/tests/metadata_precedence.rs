use bagit_core::{BagReader, MetadataPrecedence, ReadOptions};
use std::fs;
use std::path::Path;

fn bag_with_both_metadata_files(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join("bagit.txt"), "BagIt-Version: 0.95\n").unwrap();
    fs::write(root.join("bag-info.txt"), "Source: modern\n").unwrap();
    fs::write(root.join("package-info.txt"), "Source: legacy\nExtra: 1\n").unwrap();
}

#[test]
fn package_info_replaces_bag_info_by_default() {
    let tmp = tempfile::tempdir().unwrap();
    bag_with_both_metadata_files(tmp.path());

    let bag = BagReader::new().read(tmp.path()).unwrap();
    assert_eq!(
        bag.metadata(),
        &[("Source".to_string(), "legacy".to_string()), ("Extra".to_string(), "1".to_string())]
    );
}

#[test]
fn bag_info_can_be_preferred() {
    let tmp = tempfile::tempdir().unwrap();
    bag_with_both_metadata_files(tmp.path());

    let options =
        ReadOptions { metadata_precedence: MetadataPrecedence::BagInfo, ..Default::default() };
    let bag = BagReader::new().with_options(options).read(tmp.path()).unwrap();
    assert_eq!(bag.metadata(), &[("Source".to_string(), "modern".to_string())]);
}

#[test]
fn package_info_alone_is_used() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("bagit.txt"), "BagIt-Version: 0.93\n").unwrap();
    fs::write(tmp.path().join("package-info.txt"), "Packing-Date: 2008-01-15\n").unwrap();

    let options =
        ReadOptions { metadata_precedence: MetadataPrecedence::BagInfo, ..Default::default() };
    let bag = BagReader::new().with_options(options).read(tmp.path()).unwrap();
    assert_eq!(bag.metadata_values("Packing-Date").collect::<Vec<_>>(), vec!["2008-01-15"]);
}

#[test]
fn broken_bag_info_fails_even_when_package_info_would_win() {
    let tmp = tempfile::tempdir().unwrap();
    bag_with_both_metadata_files(tmp.path());
    fs::write(tmp.path().join("bag-info.txt"), "  dangling continuation\n").unwrap();

    assert!(BagReader::new().read(tmp.path()).is_err());
}
