//! Multi-file driver tests

mod common;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use ydecode::{Channel, Decoder, Status, scan_header};

fn record(decoder: &mut Decoder, channel: Channel) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    decoder.subscribe(channel, move |msg| sink.borrow_mut().push(msg.to_string()));
    seen
}

#[test]
fn test_scan_header() {
    let dir = tempfile::tempdir().unwrap();
    let posts = common::multipart("scan.bin", &common::sample_data(300), 128);
    let paths = common::write_posts(dir.path(), "scan", &posts);

    let header = scan_header(&paths[1]).unwrap();
    assert_eq!(header.name, "scan.bin");
    assert_eq!(header.part, Some(2));
    assert_eq!(header.total, Some(3));
}

#[test]
fn test_groups_shuffled_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let first = common::sample_data(300);
    let second: Vec<u8> = (0..500u32).map(|i| (i * 31 % 251) as u8).collect();

    let first_posts = common::multipart("first.bin", &first, 128);
    let second_posts = common::multipart("second.bin", &second, 200);
    let single_posts = [common::single_part("single.bin", b"solo")];

    let mut paths = common::write_posts(dir.path(), "first", &first_posts);
    paths.extend(common::write_posts(dir.path(), "second", &second_posts));
    paths.extend(common::write_posts(dir.path(), "single", &single_posts));
    paths.reverse();
    paths.swap(0, 3);

    let mut decoder = Decoder::new();
    let outcomes = decoder.decode_groups(&paths, &out);

    let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["first.bin", "second.bin", "single.bin"]);
    assert!(outcomes.iter().all(|o| o.status == Status::SUCCESS));
    assert_eq!(fs::read(out.join("first.bin")).unwrap(), first);
    assert_eq!(fs::read(out.join("second.bin")).unwrap(), second);
    assert_eq!(fs::read(out.join("single.bin")).unwrap(), b"solo");
}

#[test]
fn test_strict_rejects_incomplete_group() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let posts = common::multipart("gappy.bin", &common::sample_data(300), 128);
    let paths = common::write_posts(dir.path(), "gappy", &posts);

    let mut decoder = Decoder::new();
    let errors = record(&mut decoder, Channel::Error);
    let outcomes = decoder.decode_groups(&[&paths[0], &paths[2]], &out);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, Status::FAILED);
    assert_eq!(outcomes[0].written, None);
    assert!(!out.join("gappy.bin").exists());
    assert_eq!(*errors.borrow(), vec!["gappy.bin: 1 of 3 parts missing ([2])"]);
}

#[test]
fn test_force_fills_incomplete_group() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let data = common::sample_data(300);
    let posts = common::multipart("gappy.bin", &data, 128);
    let paths = common::write_posts(dir.path(), "gappy", &posts);

    let mut decoder = Decoder::new().force();
    let outcomes = decoder.decode_groups(&[&paths[2], &paths[1]], &out);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].status.contains(Status::CRC_MISMATCH));
    let written = fs::read(outcomes[0].written.as_ref().unwrap()).unwrap();
    assert_eq!(written.len(), data.len());
    assert!(written[..128].iter().all(|&b| b == 0));
    assert_eq!(&written[128..], &data[128..]);
}

#[test]
fn test_force_fills_trailing_parts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let data = common::sample_data(300);
    let posts = common::multipart("short.bin", &data, 128);
    let paths = common::write_posts(dir.path(), "short", &posts);

    let mut decoder = Decoder::new().force();
    let outcomes = decoder.decode_groups(&paths[..1], &out);

    let written = fs::read(outcomes[0].written.as_ref().unwrap()).unwrap();
    assert_eq!(written.len(), 300);
    assert_eq!(&written[..128], &data[..128]);
    assert!(written[128..].iter().all(|&b| b == 0));
}

#[test]
fn test_unreadable_inputs_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let junk = dir.path().join("junk.txt");
    fs::write(&junk, b"no yenc here\n").unwrap();
    let missing = dir.path().join("missing.yenc");
    let paths = common::write_posts(dir.path(), "ok", &[common::single_part("ok.bin", b"fine")]);

    let mut decoder = Decoder::new();
    let errors = record(&mut decoder, Channel::Error);
    let outcomes = decoder.decode_groups(&[&junk, &missing, &paths[0]], &out);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].name, "ok.bin");
    assert_eq!(errors.borrow().len(), 2);
    assert!(errors.borrow().iter().all(|m| m.starts_with("Skipping")));
}

#[test]
fn test_duplicate_parts_warn() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let data = common::sample_data(300);
    let posts = common::multipart("dup.bin", &data, 128);
    let mut paths = common::write_posts(dir.path(), "dup", &posts);
    let copy = dir.path().join("dup.copy.yenc");
    fs::copy(&paths[1], &copy).unwrap();
    paths.push(copy);

    let mut decoder = Decoder::new();
    let warnings = record(&mut decoder, Channel::Warning);
    let outcomes = decoder.decode_groups(&paths, &out);

    assert_eq!(outcomes[0].status, Status::SUCCESS);
    assert_eq!(fs::read(out.join("dup.bin")).unwrap(), data);
    assert!(warnings.borrow()[0].starts_with("Duplicate part 2 of dup.bin"));
}
