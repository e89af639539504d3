use msglink::SPSC::{channel, ChannelBuilder, Message, Roles};
use std::io;

#[derive(Default)]
struct Image {
    pixels: Vec<u8>,
}

impl Message for Image {}

#[test]
fn defaults() {
    let (tx, rx) = channel::<Image>();
    assert_eq!(tx.channel_id(), 0);
    assert_eq!(rx.channel_id(), 0);
    assert_eq!(tx.name(), "link-0");
    assert_eq!(tx.roles(), Roles::INITIAL);
    assert_eq!(tx.last_sequence(), 0);
}

#[test]
fn id_and_name_are_shared_by_both_ends() {
    let (tx, rx) = ChannelBuilder::new()
        .with_channel_id(7)
        .with_name("display")
        .build::<Image>();
    assert_eq!(tx.channel_id(), 7);
    assert_eq!(rx.channel_id(), 7);
    assert_eq!(tx.name(), "display");
    assert_eq!(rx.name(), "display");
}

#[test]
fn build_with_presizes_every_slot() {
    let (mut tx, mut rx) = ChannelBuilder::new().build_with(|| Image {
        pixels: vec![0; 1024],
    });

    for _ in 0..3 {
        assert_eq!(tx.acquire_write().pixels.len(), 1024);
        tx.commit();
        assert_eq!(rx.try_claim().map(|img| img.pixels.len()), Some(1024));
    }
}

#[test]
fn try_build_with_propagates_constructor_error() {
    let mut made = 0;
    let result = ChannelBuilder::new()
        .with_name("camera")
        .try_build_with(|| {
            made += 1;
            if made == 2 {
                Err(io::Error::new(io::ErrorKind::OutOfMemory, "frame too large"))
            } else {
                Ok(Image::default())
            }
        });

    let err = result.expect_err("second payload fails");
    assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);
    let msg = err.to_string();
    assert!(msg.contains("camera"), "{msg}");
    assert!(msg.contains("frame too large"), "{msg}");
    // Construction stops at the first failure.
    assert_eq!(made, 2);
}

#[test]
fn try_build_with_succeeds() -> io::Result<()> {
    let (mut tx, mut rx) = ChannelBuilder::new().try_build_with(|| Ok(Image::default()))?;
    tx.acquire_write().pixels.push(1);
    tx.commit();
    assert_eq!(rx.try_claim().map(|img| img.pixels.clone()), Some(vec![1]));
    Ok(())
}

#[test]
fn drop_closes_by_default() {
    let (tx, rx) = channel::<Image>();
    drop(tx);
    assert!(rx.is_closed());
}

#[test]
fn drop_close_can_be_disabled() {
    let (tx, rx) = ChannelBuilder::new().close_on_drop(false).build::<Image>();
    drop(tx);
    assert!(!rx.is_closed());
    rx.close();
    assert!(rx.is_closed());
}

#[test]
fn unit_payload_is_a_signal() {
    let (mut tx, mut rx) = channel::<()>();
    tx.commit();
    tx.commit();
    assert!(rx.try_claim().is_some());
    assert!(rx.try_claim().is_none());
    assert_eq!(rx.sequence(), 2);
}

#[test]
fn debug_output_omits_payloads() {
    let (mut tx, rx) = ChannelBuilder::new().with_name("dbg").build::<Image>();
    tx.acquire_write().pixels = vec![0xAB; 4];
    tx.commit();

    let producer = format!("{tx:?}");
    assert!(producer.starts_with("Producer"), "{producer}");
    assert!(producer.contains("\"dbg\""), "{producer}");
    assert!(producer.contains("last_sequence: 1"), "{producer}");
    assert!(!producer.contains("171"), "{producer}");

    let consumer = format!("{rx:?}");
    assert!(consumer.contains("middle_sequence: 1"), "{consumer}");
    assert!(consumer.contains("claimed: 0"), "{consumer}");
}
