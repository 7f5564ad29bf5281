//! End-to-end builds against temporary directories and images.

use std::fs;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use fixture_builder::destination::{FatImage, HostDir};
use fixture_builder::error::{FixtureError, ManifestError};
use fixture_builder::manifest::Manifest;
use fixture_builder::target::Target;
use fixture_builder::{BuildConfig, BuildSummary, build, populate};
use probe_api_types::layout::COMPANIONS;
use probe_api_types::UNIT_SIZE;

fn source_dir(manifest: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for c in &COMPANIONS {
        fs::write(dir.path().join(c.source_name), format!("<{}>", c.source_name)).unwrap();
    }
    fs::write(dir.path().join("list.txt"), manifest).unwrap();
    dir
}

fn config(out: &Path, src: &Path) -> BuildConfig {
    BuildConfig {
        target: Target::Directory(out.to_path_buf()),
        source: src.to_path_buf(),
        unit:   UNIT_SIZE,
    }
}

fn tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let data = fs::read(&path).unwrap();
                out.push((path.strip_prefix(root).unwrap().to_path_buf(), data));
            }
        }
    }
    out.sort();
    out
}

#[test]
fn builds_scenario_tree_with_boot_payload() {
    let src = source_dir("4096 a/b/f1.bin\n8192 c/f2.bin\n");
    let out = tempfile::tempdir().unwrap();

    let summary = build(&config(out.path(), src.path())).unwrap();
    assert_eq!(summary, BuildSummary { files: 2, bytes: 12288, blocks: 3, copied: 3 });

    let f1 = fs::read(out.path().join("a/b/f1.bin")).unwrap();
    assert_eq!(f1, vec![0x00; 4096]);
    let f2 = fs::read(out.path().join("c/f2.bin")).unwrap();
    assert_eq!(&f2[..4096], &[0x11; 4096][..]);
    assert_eq!(&f2[4096..], &[0x22; 4096][..]);

    assert_eq!(fs::read(out.path().join("runme.nsh")).unwrap(), b"<runme.nsh>");
    assert_eq!(fs::read(out.path().join("readcheck.efi")).unwrap(), b"<readcheck.efi>");
    assert_eq!(
        fs::read(out.path().join("efi/boot/bootx64.efi")).unwrap(),
        b"<shellx64.efi>"
    );
    assert!(!out.path().join("list.txt").exists());
}

#[test]
fn backslash_paths_land_in_subdirectories() {
    let src = source_dir("10 dir\\sub\\x.bin\n");
    let out = tempfile::tempdir().unwrap();
    build(&config(out.path(), src.path())).unwrap();
    assert_eq!(fs::read(out.path().join("dir/sub/x.bin")).unwrap(), vec![0; 10]);
}

#[test]
fn duplicate_destination_writes_nothing() {
    let src = source_dir("4096 a/f.bin\n4096 b/g.bin\n4096 A/F.BIN\n");
    let out = tempfile::tempdir().unwrap();

    let err = build(&config(out.path(), src.path())).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::Manifest(ManifestError::DuplicateDestination { first_line: 1, line: 3, .. })
    ));
    assert!(tree(out.path()).is_empty());
}

#[test]
fn malformed_manifest_writes_nothing() {
    let src = source_dir("4096 a/f.bin\nnot-a-size b.bin\n");
    let out = tempfile::tempdir().unwrap();
    let err = build(&config(out.path(), src.path())).unwrap_err();
    assert!(matches!(err, FixtureError::Manifest(ManifestError::Malformed { line: 2, .. })));
    assert!(tree(out.path()).is_empty());
}

#[test]
fn entries_on_boot_payload_paths_write_nothing() {
    for manifest in [
        "8192 a/f.bin\n8192 runme.nsh\n",
        "8192 a/f.bin\n8192 EFI/BOOT/BOOTX64.EFI\n",
        "8192 a/f.bin\n1 efi\n",
    ] {
        let src = source_dir(manifest);
        let out = tempfile::tempdir().unwrap();
        let err = build(&config(out.path(), src.path())).unwrap_err();
        assert!(
            matches!(err, FixtureError::Manifest(ManifestError::ReservedDestination { line: 2, .. })),
            "{manifest:?}: {err}"
        );
        assert!(tree(out.path()).is_empty(), "{manifest:?}");
    }
}

#[test]
fn missing_prerequisite_leaves_destination_untouched() {
    let src = source_dir("4096 a/f.bin\n");
    fs::remove_file(src.path().join("shellx64.efi")).unwrap();
    let out = tempfile::tempdir().unwrap();

    match build(&config(out.path(), src.path())) {
        Err(FixtureError::MissingPrerequisite(p)) => assert!(p.ends_with("shellx64.efi")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(tree(out.path()).is_empty());
}

#[test]
fn unavailable_destination_is_reported() {
    let src = source_dir("1 f.bin\n");
    let out = tempfile::tempdir().unwrap();
    let missing = out.path().join("not-mounted");
    assert!(matches!(
        build(&config(&missing, src.path())),
        Err(FixtureError::TargetUnavailable(_))
    ));
}

#[test]
fn rebuilding_gives_identical_trees() {
    let src = source_dir("5000 a/x.bin\n1 y.bin\n12288 b/c/z.bin\n");
    let one = tempfile::tempdir().unwrap();
    let two = tempfile::tempdir().unwrap();
    build(&config(one.path(), src.path())).unwrap();
    build(&config(two.path(), src.path())).unwrap();
    assert_eq!(tree(one.path()), tree(two.path()));

    // Rebuilding over an existing tree truncates and rewrites in place.
    build(&config(one.path(), src.path())).unwrap();
    assert_eq!(tree(one.path()), tree(two.path()));
}

#[test]
fn custom_unit_size() {
    let src = source_dir("1024 f.bin\n");
    let out = tempfile::tempdir().unwrap();
    let cfg = BuildConfig { unit: 512, ..config(out.path(), src.path()) };
    let summary = build(&cfg).unwrap();
    assert_eq!(summary.blocks, 2);
    let f = fs::read(out.path().join("f.bin")).unwrap();
    assert!(f[..512].iter().all(|&b| b == 0x00));
    assert!(f[512..].iter().all(|&b| b == 0x11));
}

#[test]
fn zero_unit_size_is_a_usage_error() {
    let src = source_dir("1 f.bin\n");
    let out = tempfile::tempdir().unwrap();
    let cfg = BuildConfig { unit: 0, ..config(out.path(), src.path()) };
    assert!(matches!(build(&cfg), Err(FixtureError::Usage(_))));
}

#[test]
fn populate_refuses_zero_unit() {
    let src = source_dir("");
    let out = tempfile::tempdir().unwrap();
    let manifest = Manifest::parse("1 f.bin\n").unwrap();
    let mut dest = HostDir::new(out.path());
    assert!(matches!(populate(&mut dest, &manifest, src.path(), 0), Err(FixtureError::Usage(_))));
    assert!(tree(out.path()).is_empty());
}

// ── FAT images ──────────────────────────────────────────────────────────────

fn read_fat_file<T: Read + std::io::Write + Seek>(fs: &fatfs::FileSystem<T>, path: &str) -> Vec<u8> {
    let mut f = fs.root_dir().open_file(path).unwrap();
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn builds_into_new_image_file() {
    let src = source_dir("4096 a/b/f1.bin\n8192 c/f2.bin\n");
    let out = tempfile::tempdir().unwrap();
    let img = out.path().join("probe.img");
    let cfg = BuildConfig {
        target: Target::image(img.to_str().unwrap(), 16).unwrap(),
        ..config(out.path(), src.path())
    };
    build(&cfg).unwrap();
    assert_eq!(fs::metadata(&img).unwrap().len(), 16 * 1024 * 1024);

    let disk = fs::OpenOptions::new().read(true).write(true).open(&img).unwrap();
    let fs = fatfs::FileSystem::new(disk, fatfs::FsOptions::new()).unwrap();
    let f2 = read_fat_file(&fs, "c/f2.bin");
    assert_eq!(f2.len(), 8192);
    assert_eq!(f2[4095], 0x11);
    assert_eq!(f2[4096], 0x22);
    assert_eq!(read_fat_file(&fs, "efi/boot/bootx64.efi"), b"<shellx64.efi>");

    // A second run must not clobber the existing image.
    assert!(matches!(build(&cfg), Err(FixtureError::TargetUnavailable(_))));
}

#[test]
fn populates_in_memory_image() {
    let src = source_dir("");
    let manifest = Manifest::parse("100 one.bin\n5000 d/two.bin\n").unwrap();
    let mut disk = Cursor::new(vec![0u8; 8 * 1024 * 1024]);
    {
        let mut img = FatImage::format(&mut disk, "mem").unwrap();
        let summary = populate(&mut img, &manifest, src.path(), UNIT_SIZE).unwrap();
        assert_eq!(summary.blocks, 3);
        img.unmount().unwrap();
    }
    disk.seek(SeekFrom::Start(0)).unwrap();
    let fs = fatfs::FileSystem::new(&mut disk, fatfs::FsOptions::new()).unwrap();
    assert_eq!(read_fat_file(&fs, "one.bin"), vec![0x00; 100]);
    let two = read_fat_file(&fs, "d/two.bin");
    assert!(two[..4096].iter().all(|&b| b == 0x11));
    assert!(two[4096..].iter().all(|&b| b == 0x22));
}
