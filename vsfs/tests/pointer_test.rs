// SPDX-License-Identifier: MIT

mod common;

use common::*;
use vsfs::fs::vsfs::checker::build_references;
use vsfs::vsfs::*;

#[test]
fn bad_indirect_field_rewrites_only_its_inode_block() {
    let mut img = formatted();
    let mut inode = file_inode(1);
    inode.direct[0] = 20;
    inode.single_indirect = 100;
    add_file(&mut img, 17, &inode);

    let (rep, writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, true));
    assert_eq!(rep.count_code("PTR.RANGE"), 1);
    assert!(rep.findings.iter().any(|f| f.msg
        == "Inode 17: single indirect pointer 100 in single indirect outside data range [8, 63]"));
    assert_eq!(writes, vec![4], "inode 17 lives in table block 4");

    let fixed = get_inode(&mut img, 17);
    assert_eq!(fixed.single_indirect, 0);
    assert_eq!(fixed.direct[0], 20);
    println!("✓ out-of-range indirect pointer nulled");
}

#[test]
fn nested_slot_rewrites_only_its_container() {
    let mut img = formatted();
    put_indirect(&mut img, 30, &[(0, 31), (5, 500)]);
    let mut inode = file_inode(1);
    inode.single_indirect = 30;
    add_file(&mut img, 2, &inode);

    let (rep, writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, true));
    assert_eq!(rep.count_code("PTR.RANGE"), 1);
    assert_eq!(writes, vec![30]);

    let ib = get_indirect(&mut img, 30);
    assert_eq!(ib.slots[0], 31);
    assert_eq!(ib.slots[5], 0);
    assert_eq!(get_inode(&mut img, 2).single_indirect, 30);
}

#[test]
fn deep_slots_are_sanitized() {
    let mut img = formatted();
    put_indirect(&mut img, 40, &[(0, 41)]);
    put_indirect(&mut img, 41, &[(3, 9999), (4, 42)]);
    put_indirect(&mut img, 50, &[(1, 51)]);
    put_indirect(&mut img, 51, &[(0, 52)]);
    put_indirect(&mut img, 52, &[(7, 2)]);
    let mut inode = file_inode(1);
    inode.double_indirect = 40;
    inode.triple_indirect = 50;
    add_file(&mut img, 0, &inode);

    let (rep, mut writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, true));
    writes.sort_unstable();
    assert_eq!(rep.count_code("PTR.RANGE"), 2);
    assert_eq!(writes, vec![41, 52]);
    assert_eq!(get_indirect(&mut img, 41).slots[3], 0);
    assert_eq!(get_indirect(&mut img, 41).slots[4], 42);
    assert_eq!(get_indirect(&mut img, 52).slots[7], 0);
}

#[test]
fn invalid_inodes_are_sanitized_too() {
    let mut img = formatted();
    let mut inode = file_inode(0);
    inode.direct[3] = 7;
    put_inode(&mut img, 33, &inode);

    let rep = run(&mut img, &only(VerifyPhases::POINTERS, true));
    assert_eq!(rep.count_code("PTR.RANGE"), 1);
    assert_eq!(get_inode(&mut img, 33).direct[3], 0);
}

#[test]
fn report_only_keeps_pointers() {
    let mut img = formatted();
    let mut inode = file_inode(1);
    inode.direct[11] = 64;
    add_file(&mut img, 5, &inode);
    let before = img.clone();

    let (rep, writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, false));
    assert_eq!(rep.count_code("PTR.RANGE"), 1);
    assert_eq!(rep.count_code("PTR.KEPT"), 1);
    assert!(writes.is_empty());
    assert_eq!(img, before);
}

#[test]
fn clean_pointers_write_nothing() {
    let mut img = formatted();
    put_indirect(&mut img, 30, &[(0, 31)]);
    let mut inode = file_inode(1);
    inode.direct[0] = 20;
    inode.single_indirect = 30;
    add_file(&mut img, 1, &inode);

    let (rep, writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, true));
    assert_eq!(rep.count_code("PTR.OK"), 1);
    assert!(writes.is_empty());
}

#[test]
fn block_shared_across_levels_is_sanitized_at_each_level() {
    let mut img = formatted();
    put_indirect(&mut img, 30, &[(0, 31)]);
    put_indirect(&mut img, 31, &[(0, 9999), (1, 45)]);
    let mut inode = file_inode(1);
    inode.single_indirect = 30;
    inode.double_indirect = 30;
    add_file(&mut img, 6, &inode);

    {
        let meta = VsfsMeta::new();
        let mut io = MemVsIO::new(&mut img);
        let mut rep = VerifyReport::default();
        let refs = build_references(&mut io, &meta, &mut rep).unwrap();
        assert!(refs.referenced_by_valid(45));
        assert_eq!(refs.any().marked(), 3, "blocks 30, 31 and 45");
        assert_eq!(refs.valid().marked(), 3);
        assert_eq!(rep.count_code("WALK.RANGE"), 1);
    }

    let (rep, writes) = run_traced(&mut img, &only(VerifyPhases::POINTERS, true));
    assert_eq!(rep.count_code("PTR.RANGE"), 1);
    assert!(rep.findings.iter().any(|f| f.msg
        == "Inode 6: data pointer 9999 in block 31 slot 0 outside data range [8, 63]"));
    assert_eq!(writes, vec![31]);

    let ib = get_indirect(&mut img, 31);
    assert_eq!(ib.slots[0], 0);
    assert_eq!(ib.slots[1], 45);
    assert_eq!(get_indirect(&mut img, 30).slots[0], 31);
}
