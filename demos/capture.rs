// In demos/capture.rs
//
// Capture thread -> display thread over one link. The capture side renders
// frames as fast as it can; the display side shows (here: verifies and
// counts) whichever frame is newest when it gets around to it.
//
// cargo run --example capture -- [frames_to_display]
use msglink::SPSC::{ChannelBuilder, Consumer, Message};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

mod common;

use common::{frame_digest, init_logging, SyntheticCamera};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

/// One captured frame. Nothing needs to survive buffer reuse, so the default
/// no-op merge is kept.
struct DispMsg {
    image: Vec<u8>,
    digest: [u8; 32],
    captured_at: Option<Instant>,
}

impl Message for DispMsg {}

/// Average of `total` over `frames` frames, in floating point so that large
/// frame counts are not truncated.
fn mean_latency(total: Duration, frames: u64) -> Duration {
    if frames == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(total.as_secs_f64() / frames as f64)
}

fn display_thread(mut link: Consumer<DispMsg>, wanted: u64, interrupted: Arc<AtomicBool>) -> u64 {
    let mut shown = 0u64;
    let mut latency = Duration::ZERO;
    let mut last_report = Instant::now();

    while shown < wanted && !interrupted.load(Ordering::SeqCst) {
        if let Some(msg) = link.try_claim() {
            if frame_digest(&msg.image) != msg.digest {
                eprintln!("Display: torn frame #{}", link.sequence());
                break;
            }
            if let Some(at) = msg.captured_at {
                latency += at.elapsed();
            }
            shown += 1;
        }

        if last_report.elapsed() >= Duration::from_secs(1) {
            log::info!(
                "displayed {} frames, skipped {} (latest #{})",
                shown,
                link.skipped(),
                link.sequence()
            );
            last_report = Instant::now();
        }

        // Stand-in for the GUI event wait of a real display loop.
        thread::sleep(Duration::from_millis(30));
    }

    if shown > 0 {
        println!(
            "Display: {} frames shown, {} skipped, mean capture-to-display latency {:.2?}",
            shown,
            link.skipped(),
            mean_latency(latency, shown)
        );
    }
    link.close();
    shown
}

fn main() -> std::io::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let wanted: u64 = match args.get(1) {
        Some(arg) => arg.parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid frame count {arg:?}: {e}"),
            )
        })?,
        None => 100,
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_for_handler = Arc::clone(&interrupted);

    // Handle Ctrl+C by letting the display side close the link
    ctrlc::set_handler(move || {
        interrupted_for_handler.store(true, Ordering::SeqCst);
    })
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let (mut link, display) = ChannelBuilder::new()
        .with_name("display")
        .try_build_with(|| {
            Ok(DispMsg {
                image: vec![0; WIDTH * HEIGHT],
                digest: [0; 32],
                captured_at: None,
            })
        })?;

    let display = thread::spawn(move || display_thread(display, wanted, interrupted));

    println!("Capture: {}x{} frames, displaying {}", WIDTH, HEIGHT, wanted);
    let mut camera = SyntheticCamera::new(WIDTH, HEIGHT);
    let start = Instant::now();

    loop {
        let msg = link.acquire_write();
        camera.read(&mut msg.image);
        msg.digest = frame_digest(&msg.image);
        msg.captured_at = Some(Instant::now());
        link.commit();

        if link.is_closed() {
            break;
        }
    }

    let elapsed = start.elapsed();
    let shown = display.join().unwrap_or(0);
    println!(
        "Capture: {} frames in {:.2?} ({:.1} fps), {} displayed",
        link.last_sequence(),
        elapsed,
        link.last_sequence() as f64 / elapsed.as_secs_f64(),
        shown
    );
    Ok(())
}
