// In demos/track.rs
//
// Template tracker with two links:
// - frames + tracking history flow from the tracker to the display thread;
//   only the history is merged forward, the image buffer is simply reused;
// - retarget requests flow back from the display thread to the tracker (the
//   display "clicks" on the brightest blob every few seconds).
//
// cargo run --example track -- [frames_to_display] [--no-ui] [--snapshot out.pgm]
use msglink::SPSC::{channel, ChannelBuilder, Consumer, History, Message, Producer};
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

mod common;

use common::{init_logging, write_pgm, Point, SyntheticCamera};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const TEMPLATE_SIZE: i32 = 64;
const SEARCH_SIZE: i32 = 72;
const NHISTORY: usize = 32;
const RETARGET_EVERY: u64 = 90;

struct DispMsg {
    image: Vec<u8>,
    centers: History<Point, NHISTORY>,
}

impl Message for DispMsg {
    fn merge_forward(&self, dest: &mut Self) {
        dest.centers = self.centers;
    }
}

#[derive(Default)]
struct UiMsg {
    target: Point,
}

impl Message for UiMsg {}

struct Options {
    frames: u64,
    ui: bool,
    snapshot: Option<PathBuf>,
}

fn parse_args() -> std::io::Result<Options> {
    let mut options = Options {
        frames: 300,
        ui: true,
        snapshot: None,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-ui" => options.ui = false,
            "--snapshot" => {
                let path = args.next().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "--snapshot needs a path")
                })?;
                options.snapshot = Some(PathBuf::from(path));
            }
            n => {
                options.frames = n.parse().map_err(|e| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Invalid frame count {n:?}: {e}"),
                    )
                })?;
            }
        }
    }
    Ok(options)
}

struct Tracker {
    template: Vec<u8>,
    center: Point,
}

impl Tracker {
    fn new(frame: &[u8], center: Point) -> Self {
        let mut tracker = Self {
            template: vec![0; (TEMPLATE_SIZE * TEMPLATE_SIZE) as usize],
            center,
        };
        tracker.set_template(frame, center);
        tracker
    }

    /// Cuts a new template around `center`, clamped so it fits the frame.
    fn set_template(&mut self, frame: &[u8], center: Point) {
        let half = TEMPLATE_SIZE / 2;
        self.center = Point::new(
            center.x.clamp(half, WIDTH as i32 - 1 - half),
            center.y.clamp(half, HEIGHT as i32 - 1 - half),
        );
        let (left, top) = (self.center.x - half, self.center.y - half);
        for row in 0..TEMPLATE_SIZE {
            let src = ((top + row) as usize) * WIDTH + left as usize;
            let dst = (row * TEMPLATE_SIZE) as usize;
            self.template[dst..dst + TEMPLATE_SIZE as usize]
                .copy_from_slice(&frame[src..src + TEMPLATE_SIZE as usize]);
        }
    }

    /// Moves `center` to the best sum-of-squared-differences match inside the
    /// search window around the previous position.
    fn track(&mut self, frame: &[u8]) -> Point {
        let half = SEARCH_SIZE / 2;
        let left = (self.center.x - half).max(0);
        let top = (self.center.y - half).max(0);
        let right = (self.center.x + half - 1).min(WIDTH as i32 - 1);
        let bottom = (self.center.y + half - 1).min(HEIGHT as i32 - 1);

        let mut best = (u64::MAX, self.center);
        for y in top..=bottom - TEMPLATE_SIZE + 1 {
            for x in left..=right - TEMPLATE_SIZE + 1 {
                let score = self.score_at(frame, x, y, best.0);
                if score < best.0 {
                    best = (score, Point::new(x + TEMPLATE_SIZE / 2, y + TEMPLATE_SIZE / 2));
                }
            }
        }
        self.center = best.1;
        self.center
    }

    fn score_at(&self, frame: &[u8], x: i32, y: i32, give_up_above: u64) -> u64 {
        let mut score = 0u64;
        for row in 0..TEMPLATE_SIZE {
            let src = ((y + row) as usize) * WIDTH + x as usize;
            let tpl = (row * TEMPLATE_SIZE) as usize;
            let window = &frame[src..src + TEMPLATE_SIZE as usize];
            let template = &self.template[tpl..tpl + TEMPLATE_SIZE as usize];
            score += window
                .iter()
                .zip(template)
                .map(|(&a, &b)| {
                    let d = a as i64 - b as i64;
                    (d * d) as u64
                })
                .sum::<u64>();
            if score >= give_up_above {
                break;
            }
        }
        score
    }
}

/// Renders the tracking result on top of the frame: the template box around
/// the latest center and a dot per remembered center, older dots dimmer.
fn draw_track(canvas: &mut [u8], centers: &History<Point, NHISTORY>) {
    let mut put = |x: i32, y: i32, shade: u8| {
        if (0..WIDTH as i32).contains(&x) && (0..HEIGHT as i32).contains(&y) {
            canvas[y as usize * WIDTH + x as usize] = shade;
        }
    };

    if let Some(c) = centers.latest() {
        let half = TEMPLATE_SIZE / 2;
        for d in -half..half {
            put(c.x + d, c.y - half, 255);
            put(c.x + d, c.y + half - 1, 255);
            put(c.x - half, c.y + d, 255);
            put(c.x + half - 1, c.y + d, 255);
        }
    }
    let count = centers.len();
    for (age, c) in centers.iter().enumerate() {
        let shade = trail_shade(age, count);
        for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
            put(c.x + dx, c.y + dy, shade);
        }
    }
}

/// Brightness of the `age`-th of `count` trail dots, oldest first: from 128
/// for the oldest up to 255 for the newest.
fn trail_shade(age: usize, count: usize) -> u8 {
    if count <= 1 {
        return 255;
    }
    (128 + age * 127 / (count - 1)) as u8
}

/// Centroid of the bright pixels: what a user would click on.
fn brightest_blob(image: &[u8]) -> Option<Point> {
    let (mut sx, mut sy, mut n) = (0i64, 0i64, 0i64);
    for (i, &px) in image.iter().enumerate() {
        if px >= 170 {
            sx += (i % WIDTH) as i64;
            sy += (i / WIDTH) as i64;
            n += 1;
        }
    }
    (n > 0).then(|| Point::new((sx / n) as i32, (sy / n) as i32))
}

fn display_thread(
    mut frames: Consumer<DispMsg>,
    mut ui: Option<Producer<UiMsg>>,
    options: &Options,
) -> std::io::Result<u64> {
    let mut canvas = vec![0u8; WIDTH * HEIGHT];
    let mut shown = 0u64;

    while shown < options.frames {
        if let Some(msg) = frames.try_claim() {
            canvas.copy_from_slice(&msg.image);
            draw_track(&mut canvas, &msg.centers);
            shown += 1;

            if let Some(c) = msg.centers.latest() {
                log::debug!("frame {}: target at ({}, {})", shown, c.x, c.y);
            }

            if shown % RETARGET_EVERY == 0 {
                if let (Some(ui), Some(target)) = (ui.as_mut(), brightest_blob(&msg.image)) {
                    log::info!("retargeting to ({}, {})", target.x, target.y);
                    ui.acquire_write().target = target;
                    ui.commit();
                }
            }
        }
        thread::sleep(Duration::from_millis(30));
    }
    frames.close();

    if let Some(path) = &options.snapshot {
        write_pgm(path, &canvas, WIDTH, HEIGHT)?;
        println!("Display: last frame written to {}", path.display());
    }
    println!(
        "Display: {} frames shown, {} skipped",
        shown,
        frames.skipped()
    );
    Ok(shown)
}

fn main() -> std::io::Result<()> {
    init_logging();
    let options = parse_args()?;

    let (mut frames, display) = ChannelBuilder::new()
        .with_channel_id(0)
        .with_name("frames")
        .build_with(|| DispMsg {
            image: vec![0; WIDTH * HEIGHT],
            centers: History::default(),
        });

    let (ui_tx, mut ui_rx) = if options.ui {
        let (tx, rx) = channel::<UiMsg>();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    let mut camera = SyntheticCamera::new(WIDTH, HEIGHT);
    let mut first = vec![0u8; WIDTH * HEIGHT];
    camera.read(&mut first);
    let mut tracker = Tracker::new(&first, Point::new(WIDTH as i32 / 2, HEIGHT as i32 / 2));

    let display = thread::spawn(move || display_thread(display, ui_tx, &options));

    let mut error_sum = 0f64;
    loop {
        let msg = frames.acquire_write();
        camera.read(&mut msg.image);

        let retarget = ui_rx.as_mut().and_then(|ui| ui.try_claim().map(|m| m.target));
        let center = match retarget {
            Some(target) => {
                tracker.set_template(&msg.image, target);
                tracker.center
            }
            None => tracker.track(&msg.image),
        };
        msg.centers.push(center);
        frames.commit();

        let truth = camera.target();
        error_sum += (((center.x - truth.x).pow(2) + (center.y - truth.y).pow(2)) as f64).sqrt();

        if frames.is_closed() {
            break;
        }
    }

    let shown = display
        .join()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "display thread panicked"))??;
    println!(
        "Tracker: {} frames tracked, {} displayed, mean error {:.1}px",
        frames.last_sequence(),
        shown,
        error_sum / frames.last_sequence() as f64
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_fades_from_oldest_to_newest() {
        assert_eq!(trail_shade(0, 1), 255);
        assert_eq!(trail_shade(0, NHISTORY), 128);
        assert_eq!(trail_shade(NHISTORY - 1, NHISTORY), 255);
        let shades: Vec<u8> = (0..NHISTORY).map(|age| trail_shade(age, NHISTORY)).collect();
        assert!(shades.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn partial_history_is_drawn_with_full_brightness_at_the_head() {
        let mut centers: History<Point, NHISTORY> = History::default();
        centers.push(Point::new(100, 100));
        centers.push(Point::new(110, 100));
        let mut canvas = vec![0u8; WIDTH * HEIGHT];
        draw_track(&mut canvas, &centers);
        assert_eq!(canvas[100 * WIDTH + 100], 128);
        assert_eq!(canvas[100 * WIDTH + 110], 255);
    }
}
