// SPDX-License-Identifier: MIT
#![allow(dead_code)]

use vsfs::core::utils::bitmap::BitmapOps;
use vsfs::fs::vsfs::utils;
use vsfs::vsfs::*;

pub const BS: usize = VSFS_BLOCK_SIZE as usize;

/// A freshly formatted image.
pub fn formatted() -> Vec<u8> {
    let meta = VsfsMeta::new();
    let mut img = vec![0u8; VSFS_IMAGE_SIZE as usize];
    let mut io = MemVsIO::new(&mut img);
    VsfsFormatter::new(&mut io, &meta).format(true).unwrap();
    img
}

pub fn file_inode(links: u32) -> VsfsInode {
    VsfsInode {
        mode: 0o100644,
        links,
        ..VsfsInode::default()
    }
}

pub fn put_inode(img: &mut [u8], ino: u32, inode: &VsfsInode) {
    let meta = VsfsMeta::new();
    let mut io = MemVsIO::new(img);
    utils::write_inode(&mut io, &meta, ino, inode).unwrap();
}

pub fn get_inode(img: &mut [u8], ino: u32) -> VsfsInode {
    let meta = VsfsMeta::new();
    let mut io = MemVsIO::new(img);
    utils::read_inode(&mut io, &meta, ino).unwrap()
}

pub fn put_indirect(img: &mut [u8], block: u32, slots: &[(usize, u32)]) {
    let meta = VsfsMeta::new();
    let mut ib = IndirectBlock::default();
    for &(slot, value) in slots {
        ib.slots[slot] = value;
    }
    let mut io = MemVsIO::new(img);
    utils::write_indirect(&mut io, &meta, block, &ib).unwrap();
}

pub fn get_indirect(img: &mut [u8], block: u32) -> IndirectBlock {
    let meta = VsfsMeta::new();
    let mut io = MemVsIO::new(img);
    utils::read_indirect(&mut io, &meta, block).unwrap()
}

fn bitmap_mut(img: &mut [u8], block: u32) -> &mut [u8] {
    let start = block as usize * BS;
    &mut img[start..start + BS]
}

fn bitmap(img: &[u8], block: u32) -> &[u8] {
    let start = block as usize * BS;
    &img[start..start + BS]
}

pub fn set_inode_bit(img: &mut [u8], ino: u32, value: bool) {
    bitmap_mut(img, VSFS_INODE_BITMAP_BLOCK).set_bit(ino as usize, value);
}

pub fn inode_bit(img: &[u8], ino: u32) -> bool {
    bitmap(img, VSFS_INODE_BITMAP_BLOCK).get_bit(ino as usize)
}

pub fn set_data_bit(img: &mut [u8], block: u32, value: bool) {
    let bit = (block - VSFS_FIRST_DATA_BLOCK) as usize;
    bitmap_mut(img, VSFS_DATA_BITMAP_BLOCK).set_bit(bit, value);
}

pub fn data_bit(img: &[u8], block: u32) -> bool {
    let bit = (block - VSFS_FIRST_DATA_BLOCK) as usize;
    bitmap(img, VSFS_DATA_BITMAP_BLOCK).get_bit(bit)
}

/// Stores a valid inode and marks it in the inode bitmap.
pub fn add_file(img: &mut [u8], ino: u32, inode: &VsfsInode) {
    put_inode(img, ino, inode);
    set_inode_bit(img, ino, true);
}

pub fn run(img: &mut [u8], opt: &VsfsCheckOptions) -> VerifyReport {
    let meta = VsfsMeta::new();
    let mut io = MemVsIO::new(img);
    let rep = VsfsChecker::new(&mut io, &meta).check_with(opt).unwrap();
    println!("{rep}");
    rep
}

pub fn repair(img: &mut [u8]) -> VerifyReport {
    run(img, &VsfsCheckOptions::default())
}

pub fn check_only(img: &mut [u8]) -> VerifyReport {
    run(img, &VsfsCheckOptions::read_only())
}

pub fn only(phases: VerifyPhases, repair: bool) -> VsfsCheckOptions {
    VsfsCheckOptions {
        phases,
        repair,
        fail_fast: false,
    }
}

/// Records the block number of every write.
#[derive(Default)]
pub struct WriteLog(pub Vec<u64>);

impl IOTracer for WriteLog {
    fn on_write(&mut self, off: u64, _len: usize) {
        self.0.push(off / BS as u64);
    }
}

/// Runs the checker and returns the blocks it wrote.
pub fn run_traced(img: &mut [u8], opt: &VsfsCheckOptions) -> (VerifyReport, Vec<u64>) {
    let meta = VsfsMeta::new();
    let mut mem = MemVsIO::new(img);
    let mut io = TracingIO::new(&mut mem, WriteLog::default());
    let rep = VsfsChecker::new(&mut io, &meta).check_with(opt).unwrap();
    (rep, io.into_tracer().0)
}
