// SPDX-License-Identifier: MIT

mod common;

use std::io::{Read, Seek, SeekFrom, Write};

use common::*;
use vsfs::vsfs::*;

/// An image with one defect of every repairable kind and no cross-links.
fn messy() -> Vec<u8> {
    let mut img = formatted();

    // Wrong inode count
    img[32..36].copy_from_slice(&128u32.to_le_bytes());

    // Valid but unmarked, block 20 unmarked, bad direct pointer
    let mut a = file_inode(1);
    a.direct[0] = 20;
    a.direct[1] = 2;
    put_inode(&mut img, 1, &a);

    // Valid, marked, single indirect with one good and one bad slot
    put_indirect(&mut img, 30, &[(0, 31), (9, 70)]);
    let mut b = file_inode(2);
    b.single_indirect = 30;
    b.double_indirect = 4096;
    add_file(&mut img, 18, &b);
    set_data_bit(&mut img, 30, true);
    set_data_bit(&mut img, 31, true);

    // Marked but deleted
    let mut c = file_inode(1);
    c.dtime = 99;
    put_inode(&mut img, 40, &c);
    set_inode_bit(&mut img, 40, true);

    // Orphaned allocations
    set_data_bit(&mut img, 50, true);
    set_data_bit(&mut img, 51, true);

    img
}

#[test]
fn phases_run_in_order() {
    let mut img = formatted();
    let rep = check_only(&mut img);
    let titles: Vec<_> = rep.phases.iter().map(|p| p.title).collect();
    assert_eq!(
        titles,
        vec![
            "Superblock",
            "Inode bitmap",
            "Data bitmap",
            "Block pointers",
            "Duplicate blocks"
        ]
    );
}

#[test]
fn repair_is_idempotent() {
    let mut img = messy();

    let first = repair(&mut img);
    assert!(first.defects() > 0);
    assert_eq!(first.phase(VerifyPhases::SUPERBLOCK).unwrap().defects, 1);
    assert_eq!(first.count_code("IBM.RULE_A"), 1);
    assert_eq!(first.count_code("IBM.RULE_B"), 1);
    assert_eq!(first.count_code("DBM.RULE_A"), 2);
    assert_eq!(first.count_code("DBM.RULE_B"), 1);
    assert_eq!(first.count_code("PTR.RANGE"), 3);
    assert_eq!(first.count_code("DUP.BLOCK"), 0);

    let after_first = img.clone();
    let (second, writes) = run_traced(&mut img, &VsfsCheckOptions::default());
    assert_eq!(second.defects(), 0, "{second}");
    assert_eq!(second.repairs(), 0);
    assert!(writes.is_empty(), "second run wrote blocks {writes:?}");
    assert_eq!(img, after_first);

    assert!(inode_bit(&img, 1) && !inode_bit(&img, 40));
    assert!(data_bit(&img, 20) && !data_bit(&img, 50) && !data_bit(&img, 51));
    assert_eq!(get_inode(&mut img, 1).direct[1], 0);
    assert_eq!(get_inode(&mut img, 18).double_indirect, 0);
    assert_eq!(get_indirect(&mut img, 30).slots[9], 0);
    println!("✓ second run finds nothing to repair");
}

#[test]
fn no_repair_leaves_image_untouched() {
    let mut img = messy();
    let before = img.clone();

    let (rep, writes) = run_traced(&mut img, &VsfsCheckOptions::read_only());
    assert!(rep.defects() > 0);
    assert_eq!(rep.repairs(), 0);
    assert!(writes.is_empty());
    assert_eq!(img, before);

    // Same defects on every read-only run
    let again = check_only(&mut img);
    assert_eq!(again.defects(), rep.defects());
}

#[test]
fn fail_fast_stops_after_first_bad_phase() {
    let mut img = messy();
    let opt = VsfsCheckOptions {
        fail_fast: true,
        ..VsfsCheckOptions::read_only()
    };
    let rep = run(&mut img, &opt);
    assert_eq!(rep.phases.len(), 1);
    assert_eq!(rep.phases[0].phase, VerifyPhases::SUPERBLOCK);

    // A clean superblock lets the next phase run
    let mut img = formatted();
    set_inode_bit(&mut img, 3, true);
    let rep = run(&mut img, &opt);
    assert_eq!(rep.phases.len(), 2);
}

#[test]
fn unselected_phases_are_skipped() {
    let mut img = messy();
    let rep = run(
        &mut img,
        &only(VerifyPhases::SUPERBLOCK | VerifyPhases::DUPLICATES, false),
    );
    assert_eq!(rep.phases.len(), 2);
    assert!(rep.phase(VerifyPhases::INODE_BITMAP).is_none());
    assert_eq!(rep.count_code("IBM.RULE_B"), 0);
}

#[test]
fn repairs_a_file_backed_image() {
    let mut seed = formatted();
    let mut inode = file_inode(1);
    inode.direct[0] = 20;
    add_file(&mut seed, 7, &inode);
    set_data_bit(&mut seed, 44, true);

    let mut file = tempfile::tempfile().unwrap();
    file.write_all(&seed).unwrap();

    let meta = VsfsMeta::new();
    {
        let mut io = StdVsIO::new(&mut file);
        let rep = VsfsChecker::new(&mut io, &meta)
            .check_with(&VsfsCheckOptions::default())
            .unwrap();
        assert_eq!(rep.count_code("DBM.RULE_A"), 1);
        assert_eq!(rep.count_code("DBM.RULE_B"), 1);
    }

    let mut img = Vec::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_end(&mut img).unwrap();
    assert_eq!(img.len(), VSFS_IMAGE_SIZE as usize);
    assert!(data_bit(&img, 20));
    assert!(!data_bit(&img, 44));
    assert_eq!(check_only(&mut img).defects(), 0);
}

#[test]
fn truncated_image_is_an_io_error() {
    let mut img = formatted();
    img.truncate(6 * BS);
    let meta = VsfsMeta::new();
    let mut io = MemVsIO::new(&mut img);
    let err = VsfsChecker::new(&mut io, &meta)
        .check_with(&VsfsCheckOptions::read_only())
        .unwrap_err();
    assert!(
        matches!(err, FsCheckerError::IO(_) | FsCheckerError::Parsing(_)),
        "{err}"
    );
}
